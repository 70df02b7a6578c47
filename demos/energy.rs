use chrono::Duration;
use spothinta::{PriceSeries, Region, SpotHinta};
use tracing_subscriber::EnvFilter;

fn print_prices(region: Region, energy: &PriceSeries) {
    let next_interval = energy.utc_now() + energy.resolution().duration();

    println!("--- ENERGY TODAY FOR REGION {region} ---");
    println!("Lowest price today: {:?}", energy.lowest_price_today());
    println!("Highest price today: {:?}", energy.highest_price_today());
    println!("Average price: {:?}", energy.average_price_today());
    println!();
    println!("Highest price time: {:?}", energy.highest_price_time_today());
    println!("Lowest price time: {:?}", energy.lowest_price_time_today());
    println!();
    println!("Current price: {:?}", energy.current_price());
    println!("Next interval price: {:?}", energy.price_at_time(next_interval));
    println!(
        "Intervals priced equal or lower: {}",
        energy.count_intervals_priced_equal_or_lower()
    );
    println!();
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = SpotHinta::new().expect("Creating client failed.");

    for region in [Region::FI, Region::SE2] {
        let energy = client
            .energy_prices(region, Duration::minutes(60))
            .await
            .expect("Querying prices failed.");
        print_prices(region, &energy);
    }

    client.close();
}
