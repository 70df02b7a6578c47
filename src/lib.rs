//! Client for the day-ahead electricity prices of
//! [spot-hinta.fi](https://spot-hinta.fi).
//!
//! One call to [`SpotHinta::energy_prices`] fetches today's and tomorrow's
//! prices for a [`Region`] and returns a [`PriceSeries`] that answers queries
//! such as the current, lowest or average price.

mod clock;
mod error;
mod region;
mod resolution;
mod series;

use std::time::Duration as StdDuration;

use chrono::Duration;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT as USER_AGENT_HEADER};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Result, SpotHintaError};
pub use region::{Region, UnknownRegion};
pub use resolution::Resolution;
pub use series::{round_price, Extreme, PricePoint, PriceRecord, PriceSeries};

pub const API_HOST: &str = "api.spot-hinta.fi";
pub const DEFAULT_BASE_URL: &str = "https://api.spot-hinta.fi";
pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(10);
pub const USER_AGENT: &str = concat!("RustSpotHinta/", env!("CARGO_PKG_VERSION"));

const TODAY_AND_DAY_FORWARD: &str = "/TodayAndDayForward";

/// Builder for [`SpotHinta`].
#[derive(Debug, Clone)]
pub struct SpotHintaBuilder {
    base_url: String,
    timeout: StdDuration,
    http_client: Option<reqwest::Client>,
}

impl SpotHintaBuilder {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            http_client: None,
        }
    }

    /// Overrides scheme and host, e.g. to point at a local mock server.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Timeout for a whole request, from connecting until the body is read.
    pub fn timeout(mut self, timeout: StdDuration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Uses an existing `reqwest` client, sharing its connection pool.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn build(self) -> Result<SpotHinta> {
        let http = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder().build()?,
        };

        Ok(SpotHinta {
            http,
            base_url: self.base_url,
            timeout: self.timeout,
        })
    }
}

impl Default for SpotHintaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the spot-hinta.fi API.
///
/// The client holds its own handle to the HTTP connection pool and may be
/// used for any number of requests. The handle is released when the client
/// is dropped or [`closed`](SpotHinta::close). Share one client by reference
/// rather than cloning it; to share a pool between clients, pass the same
/// `reqwest::Client` to [`SpotHintaBuilder::http_client`].
#[derive(Debug)]
pub struct SpotHinta {
    http: reqwest::Client,
    base_url: String,
    timeout: StdDuration,
}

impl SpotHinta {
    /// Creates a client with the default base URL and a 10 second timeout.
    pub fn new() -> Result<Self> {
        SpotHintaBuilder::new().build()
    }

    pub fn builder() -> SpotHintaBuilder {
        SpotHintaBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request<T>(&self, path: &str, params: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, ?params, "requesting spot-hinta.fi");

        let response = self
            .http
            .get(&url)
            .query(params)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT_HEADER, USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            warn!("rate limited by spot-hinta.fi");
            return Err(SpotHintaError::RateLimited);
        }
        let response = response.error_for_status()?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        let body = response.text().await?;

        if !content_type.contains("application/json") {
            warn!(content_type = %content_type, "unexpected content type from spot-hinta.fi");
            return Err(SpotHintaError::Protocol { content_type, body });
        }

        serde_json::from_str(&body).map_err(SpotHintaError::InvalidPayload)
    }

    /// Query prices for today and tomorrow in the given `region`.
    ///
    /// `resolution` must be 15 or 60 minutes, anything else fails with
    /// [`SpotHintaError::UnsupportedResolution`] before a request is made.
    /// Tomorrow's prices are usually published in the afternoon; until then
    /// the queries for tomorrow return `None`.
    #[tracing::instrument(skip_all, fields(region = %region, resolution = resolution.num_minutes()))]
    pub async fn energy_prices(&self, region: Region, resolution: Duration) -> Result<PriceSeries> {
        let resolution = Resolution::try_from(resolution)?;

        let records: Vec<PriceRecord> = self
            .request(
                TODAY_AND_DAY_FORWARD,
                &[
                    ("region", region.code().to_owned()),
                    ("priceResolution", resolution.minutes().to_string()),
                ],
            )
            .await?;

        if records.is_empty() {
            warn!("no energy prices found");
            return Err(SpotHintaError::NoData);
        }
        info!(count = records.len(), "fetched energy prices");

        PriceSeries::from_records(records, region.time_zone(), resolution)
    }

    /// Closes the client, releasing its connection pool handle.
    pub fn close(self) {
        debug!(base_url = %self.base_url, "closing spot-hinta.fi client");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = SpotHinta::new().unwrap();

        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.timeout, DEFAULT_TIMEOUT);
        assert!(DEFAULT_BASE_URL.ends_with(API_HOST));
    }

    #[test]
    fn test_builder_trims_base_url() {
        let client = SpotHinta::builder()
            .base_url("http://127.0.0.1:8080/")
            .timeout(StdDuration::from_millis(100))
            .build()
            .unwrap();

        assert_eq!(client.base_url(), "http://127.0.0.1:8080");
        assert_eq!(client.timeout, StdDuration::from_millis(100));
    }

    #[test]
    fn test_user_agent() {
        assert_eq!(USER_AGENT, format!("RustSpotHinta/{}", env!("CARGO_PKG_VERSION")));
    }
}
