use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use quantities::{point::PricePoint, rate::CentsPerKilowattHour};
use serde::{Deserialize, Serialize};
use ureq::Agent;

use crate::prelude::*;

/// Blocking client for the price proxy.
pub struct Api {
    client: Agent,
    base_url: String,
}

impl Api {
    #[must_use]
    pub fn new(base_url: String) -> Self {
        let client = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(10)))
            .http_status_as_error(false)
            .build()
            .into();
        Self { client, base_url }
    }

    /// Rolling ~48-hour series of hourly prices.
    #[instrument(skip_all)]
    pub fn latest_prices(&self) -> Result<Vec<PricePoint>> {
        info!("fetching the latest prices…");
        let response: LatestResponse = self
            .client
            .get(&self.base_url)
            .query("latest", "true")
            .call()
            .context("failed to call the price proxy")?
            .body_mut()
            .read_json()
            .context("failed to deserialize the latest prices")?;
        let points = match response {
            LatestResponse::Wrapped { prices } | LatestResponse::Bare(prices) => prices,
        };
        info!(n_points = points.len(), "fetched");
        Ok(points)
    }

    /// Rate at the instant via a point query.
    #[instrument(skip_all, fields(at = %at))]
    pub fn price_at(&self, at: DateTime<Utc>) -> Result<CentsPerKilowattHour> {
        let body: PriceResponse = self
            .client
            .get(&self.base_url)
            .query("date", &at.to_rfc3339_opts(SecondsFormat::Millis, true))
            .call()
            .context("failed to call the price proxy")?
            .body_mut()
            .read_json()
            .context("failed to deserialize the price response")?;
        if body.ok {
            body.price
                .map(CentsPerKilowattHour::from)
                .context("the proxy response is missing the price")
        } else if body.error.as_deref() == Some("No data yet") {
            bail!("day-ahead prices for {at} are not published yet")
        } else {
            bail!(
                "price lookup failed: {}",
                body.error.unwrap_or_else(|| "unknown error".to_owned()),
            )
        }
    }

    #[instrument(skip_all)]
    pub fn send_feedback(&self, feedback: &Feedback<'_>) -> Result<String> {
        let response: FeedbackResponse = self
            .client
            .post(format!("{}/feedback", self.base_url))
            .send_json(feedback)
            .context("failed to call the price proxy")?
            .body_mut()
            .read_json()
            .context("failed to deserialize the feedback response")?;
        if response.ok {
            response.key.context("the proxy did not return a record key")
        } else {
            bail!(
                "the feedback was rejected: {}",
                response.error.unwrap_or_else(|| "unknown error".to_owned()),
            )
        }
    }

    #[instrument(skip_all)]
    pub fn validate_premium(&self, key: &str, device_id: &str) -> Result<bool> {
        let response: PremiumResponse = self
            .client
            .post(format!("{}/validate-premium", self.base_url))
            .send_json(PremiumRequest { key, device_id })
            .context("failed to call the price proxy")?
            .body_mut()
            .read_json()
            .context("failed to deserialize the validation response")?;
        Ok(response.valid)
    }
}

/// The latest-prices payload is passed through from the upstream, which has
/// shipped both a bare array and a `{"prices": […]}` wrapper.
#[derive(Deserialize)]
#[serde(untagged)]
enum LatestResponse {
    Wrapped { prices: Vec<PricePoint> },
    Bare(Vec<PricePoint>),
}

#[derive(Deserialize)]
struct PriceResponse {
    #[serde(default)]
    ok: bool,

    #[serde(default)]
    price: Option<f64>,

    #[serde(default)]
    error: Option<String>,
}

#[derive(Serialize)]
pub struct Feedback<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<&'a str>,

    pub message: &'a str,
    pub page: &'a str,
    pub ts: String,
}

#[derive(Serialize)]
struct PremiumRequest<'a> {
    key: &'a str,

    #[serde(rename = "deviceId")]
    device_id: &'a str,
}

#[derive(Deserialize)]
struct FeedbackResponse {
    #[serde(default)]
    ok: bool,

    #[serde(default)]
    key: Option<String>,

    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct PremiumResponse {
    #[serde(default)]
    valid: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_response_accepts_both_shapes() {
        let bare: LatestResponse = serde_json::from_str(
            r#"[{"startDate": "2025-01-01T00:00:00.000Z", "endDate": "2025-01-01T01:00:00.000Z", "price": 1.5}]"#,
        )
        .unwrap();
        let wrapped: LatestResponse = serde_json::from_str(
            r#"{"prices": [{"startDate": "2025-01-01T00:00:00.000Z", "endDate": "2025-01-01T01:00:00.000Z", "price": 1.5}]}"#,
        )
        .unwrap();
        for response in [bare, wrapped] {
            let (LatestResponse::Wrapped { prices } | LatestResponse::Bare(prices)) = response;
            assert_eq!(prices.len(), 1);
            assert_eq!(prices[0].price, CentsPerKilowattHour::from(1.5));
        }
    }

    #[test]
    fn test_price_response_tolerates_missing_fields() {
        let response: PriceResponse = serde_json::from_str(r#"{"error": "No data yet"}"#).unwrap();
        assert!(!response.ok);
        assert_eq!(response.error.as_deref(), Some("No data yet"));
        assert!(response.price.is_none());
    }
}
