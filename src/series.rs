use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Days, FixedOffset, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::error::SpotHintaError;
use crate::resolution::Resolution;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Rounds a price to 5 decimal places.
///
/// Rounding goes through the exact decimal expansion of the stored value, so
/// `0.123455` (stored as `0.12345499..`) rounds down.
pub fn round_price(price: f64) -> f64 {
    format!("{price:.5}").parse().unwrap_or(price)
}

/// A price record as returned by the API.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PriceRecord {
    /// Start of the interval, ISO 8601 with UTC offset
    #[serde(rename = "DateTime")]
    pub date_time: String,
    /// Price in €/kWh, including VAT
    #[serde(rename = "PriceWithTax")]
    pub price_with_tax: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Start time of the interval
    pub timestamp: DateTime<FixedOffset>,
    pub price: f64,
}

impl PricePoint {
    fn rounded(self) -> Self {
        Self {
            price: round_price(self.price),
            ..self
        }
    }
}

impl TryFrom<PriceRecord> for PricePoint {
    type Error = SpotHintaError;

    fn try_from(record: PriceRecord) -> Result<Self, Self::Error> {
        match DateTime::parse_from_str(&record.date_time, TIMESTAMP_FORMAT) {
            Ok(timestamp) => Ok(Self {
                timestamp,
                price: record.price_with_tax,
            }),
            Err(source) => Err(SpotHintaError::InvalidTimestamp {
                value: record.date_time,
                source,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Lowest,
    Highest,
}

/// Day-ahead prices for a region, queried relative to the current moment.
///
/// "Today" and "tomorrow" are civil dates in the region's timezone. The
/// current moment comes from the series' [`Clock`], so a series built by the
/// client can be evaluated at any frozen instant with [`PriceSeries::with_clock`].
#[derive(Debug, Clone)]
pub struct PriceSeries<C = SystemClock> {
    points: Vec<PricePoint>,
    time_zone: Tz,
    resolution: Resolution,
    clock: C,
}

impl PriceSeries {
    /// Builds a series from raw API records.
    ///
    /// Records sharing an interval start keep the position of the first one
    /// and the price of the last one. Prices are stored unrounded.
    pub fn from_records<I>(
        records: I,
        time_zone: Tz,
        resolution: Resolution,
    ) -> Result<Self, SpotHintaError>
    where
        I: IntoIterator<Item = PriceRecord>,
    {
        let mut points: Vec<PricePoint> = Vec::new();
        let mut positions: HashMap<DateTime<FixedOffset>, usize> = HashMap::new();

        for record in records {
            let point = PricePoint::try_from(record)?;
            match positions.get(&point.timestamp) {
                Some(&index) => points[index].price = point.price,
                None => {
                    positions.insert(point.timestamp, points.len());
                    points.push(point);
                }
            }
        }

        if points.is_empty() {
            return Err(SpotHintaError::NoData);
        }

        tracing::debug!(
            count = points.len(),
            time_zone = time_zone.name(),
            resolution = resolution.minutes(),
            "built price series"
        );

        Ok(Self {
            points,
            time_zone,
            resolution,
            clock: SystemClock,
        })
    }
}

impl<C: Clock> PriceSeries<C> {
    /// Replaces the time source used for "now".
    pub fn with_clock<D: Clock>(self, clock: D) -> PriceSeries<D> {
        PriceSeries {
            points: self.points,
            time_zone: self.time_zone,
            resolution: self.resolution,
            clock,
        }
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// All prices in insertion order, unrounded.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn utc_now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Current moment in the series' timezone.
    pub fn now(&self) -> DateTime<Tz> {
        self.clock.now().with_timezone(&self.time_zone)
    }

    fn date_for_offset(&self, offset_days: i64) -> Option<NaiveDate> {
        let today = self.now().date_naive();
        let days = Days::new(offset_days.unsigned_abs());
        if offset_days >= 0 {
            today.checked_add_days(days)
        } else {
            today.checked_sub_days(days)
        }
    }

    /// Prices whose interval starts on today's date plus `offset_days`.
    pub fn prices_for_day(&self, offset_days: i64) -> Vec<PricePoint> {
        let Some(date) = self.date_for_offset(offset_days) else {
            return Vec::new();
        };

        self.points
            .iter()
            .filter(|point| point.timestamp.with_timezone(&self.time_zone).date_naive() == date)
            .copied()
            .collect()
    }

    pub fn prices_today(&self) -> Vec<PricePoint> {
        self.prices_for_day(0)
    }

    pub fn prices_tomorrow(&self) -> Vec<PricePoint> {
        self.prices_for_day(1)
    }

    /// Returns the price of the interval containing `moment`.
    ///
    /// All known prices are searched, not just today's. If intervals overlap,
    /// the one inserted last wins.
    pub fn price_at_time<TZ: TimeZone>(&self, moment: DateTime<TZ>) -> Option<f64> {
        let moment = moment.with_timezone(&Utc);
        let length = self.resolution.duration();

        self.points
            .iter()
            .rev()
            .find(|point| {
                let start = point.timestamp.with_timezone(&Utc);
                start <= moment && moment < start + length
            })
            .map(|point| round_price(point.price))
    }

    pub fn current_price(&self) -> Option<f64> {
        self.price_at_time(self.now())
    }

    pub fn lowest_price_for_day(&self, offset_days: i64) -> Option<f64> {
        self.prices_for_day(offset_days)
            .into_iter()
            .map(|point| point.price)
            .reduce(f64::min)
            .map(round_price)
    }

    pub fn highest_price_for_day(&self, offset_days: i64) -> Option<f64> {
        self.prices_for_day(offset_days)
            .into_iter()
            .map(|point| point.price)
            .reduce(f64::max)
            .map(round_price)
    }

    pub fn average_price_for_day(&self, offset_days: i64) -> Option<f64> {
        let prices = self.prices_for_day(offset_days);
        if prices.is_empty() {
            return None;
        }

        let total: f64 = prices.iter().map(|point| point.price).sum();
        Some(round_price(total / prices.len() as f64))
    }

    /// Returns the start of the cheapest or most expensive interval of the day.
    ///
    /// When several intervals share the extreme price, the earliest one wins.
    pub fn time_of_extreme_for_day(
        &self,
        offset_days: i64,
        extreme: Extreme,
    ) -> Option<DateTime<FixedOffset>> {
        let by_price = |a: &PricePoint, b: &PricePoint| {
            a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal)
        };
        let prices = self.prices_for_day(offset_days).into_iter();

        let point = match extreme {
            Extreme::Lowest => {
                prices.min_by(|a, b| by_price(a, b).then_with(|| a.timestamp.cmp(&b.timestamp)))
            }
            Extreme::Highest => {
                prices.max_by(|a, b| by_price(a, b).then_with(|| b.timestamp.cmp(&a.timestamp)))
            }
        };
        point.map(|point| point.timestamp)
    }

    pub fn lowest_price_today(&self) -> Option<f64> {
        self.lowest_price_for_day(0)
    }

    pub fn lowest_price_tomorrow(&self) -> Option<f64> {
        self.lowest_price_for_day(1)
    }

    pub fn highest_price_today(&self) -> Option<f64> {
        self.highest_price_for_day(0)
    }

    pub fn highest_price_tomorrow(&self) -> Option<f64> {
        self.highest_price_for_day(1)
    }

    pub fn average_price_today(&self) -> Option<f64> {
        self.average_price_for_day(0)
    }

    pub fn average_price_tomorrow(&self) -> Option<f64> {
        self.average_price_for_day(1)
    }

    pub fn lowest_price_time_today(&self) -> Option<DateTime<FixedOffset>> {
        self.time_of_extreme_for_day(0, Extreme::Lowest)
    }

    pub fn lowest_price_time_tomorrow(&self) -> Option<DateTime<FixedOffset>> {
        self.time_of_extreme_for_day(1, Extreme::Lowest)
    }

    pub fn highest_price_time_today(&self) -> Option<DateTime<FixedOffset>> {
        self.time_of_extreme_for_day(0, Extreme::Highest)
    }

    pub fn highest_price_time_tomorrow(&self) -> Option<DateTime<FixedOffset>> {
        self.time_of_extreme_for_day(1, Extreme::Highest)
    }

    /// Number of intervals on the given day priced at or below `threshold`.
    pub fn count_intervals_priced_at_most(&self, offset_days: i64, threshold: f64) -> usize {
        self.prices_for_day(offset_days)
            .iter()
            .filter(|point| point.price <= threshold)
            .count()
    }

    /// Number of intervals today priced at or below the current price.
    ///
    /// A missing current price counts as zero.
    pub fn count_intervals_priced_equal_or_lower(&self) -> usize {
        let current = self.current_price().unwrap_or(0.0);
        self.count_intervals_priced_at_most(0, current)
    }

    /// All prices in insertion order, rounded to 5 decimals.
    pub fn as_timestamp_price_list(&self) -> Vec<PricePoint> {
        self.points.iter().map(|point| point.rounded()).collect()
    }

    pub fn as_timestamp_price_list_for_day(&self, offset_days: i64) -> Vec<PricePoint> {
        self.prices_for_day(offset_days)
            .into_iter()
            .map(PricePoint::rounded)
            .collect()
    }
}
