use chrono::{DateTime, NaiveDate, Utc};
use quantities::{
    point::{self, PricePoint},
    rate::CentsPerKilowattHour,
};

use crate::{api::proxy::Api, core, prelude::*};

/// In-process cache of the latest-prices series. Lookups prefer the cached
/// series and fall back to point queries for instants outside it.
#[derive(Default)]
pub struct PriceCache {
    points: Vec<PricePoint>,
    signature: String,
}

impl PriceCache {
    pub fn replace(&mut self, points: Vec<PricePoint>) {
        self.signature = point::signature(&points);
        self.points = points;
    }

    #[must_use]
    pub fn lookup(&self, at: DateTime<Utc>) -> Option<CentsPerKilowattHour> {
        self.points
            .iter()
            .find(|point| point.interval().contains(at))
            .map(|point| point.price)
    }

    /// Point with the lowest rate. On ties `min_by_key` keeps the first,
    /// which is the earliest hour in a chronological series.
    #[must_use]
    pub fn cheapest(&self) -> Option<&PricePoint> {
        self.points.iter().min_by_key(|point| point.price)
    }

    /// Fills the cache on first use. A failure downgrades to point queries.
    pub fn warm_up(&mut self, api: &Api) {
        if !self.points.is_empty() {
            return;
        }
        match api.latest_prices() {
            Ok(points) => self.replace(points),
            Err(error) => {
                warn!(error = format!("{error:#}"), "could not cache the latest prices");
            }
        }
    }

    /// Cached rate when some cached interval contains the instant, a point
    /// query otherwise.
    pub fn resolve(&mut self, api: &Api, at: DateTime<Utc>) -> Result<CentsPerKilowattHour> {
        self.warm_up(api);
        match self.lookup(at) {
            Some(rate) => Ok(rate),
            None => api.price_at(at),
        }
    }

    /// All 24 hourly rates of the local day.
    pub fn resolve_day(&mut self, api: &Api, date: NaiveDate) -> Result<Vec<CentsPerKilowattHour>> {
        (0..24)
            .map(|hour| {
                let at = core::local_instant(date, hour)?;
                self.resolve(api, at)
                    .with_context(|| format!("no price for {date} at {hour:02}:00"))
            })
            .collect()
    }

    /// Re-fetches the series and swaps it in only when its content changed.
    pub fn refresh_if_changed(&mut self, api: &Api) -> Result<bool> {
        let points = api.latest_prices()?;
        if !self.should_replace(&points) {
            return Ok(false);
        }
        self.replace(points);
        Ok(true)
    }

    /// An empty fetch never evicts a populated cache.
    fn should_replace(&self, points: &[PricePoint]) -> bool {
        !points.is_empty() && point::signature(points) != self.signature
    }
}
