use std::time::Duration;

use axum::http::StatusCode;
use chrono::{DateTime, SecondsFormat, Utc};
use quantities::rate::CentsPerKilowattHour;
use reqwest::Client;
use serde_json::Value;

use crate::prelude::*;

pub struct Upstream {
    client: Client,
    base_url: String,
}

pub enum Latest {
    Prices(Value),
    Unavailable(StatusCode),
}

impl Upstream {
    pub fn try_new(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("failed to build the upstream client")?;
        Ok(Self { client, base_url })
    }

    /// Price at the given instant, or [`None`] when the upstream has no data
    /// or answers in none of the known shapes.
    #[instrument(skip_all, fields(at = %at))]
    pub async fn price_at(&self, at: DateTime<Utc>) -> Result<Option<CentsPerKilowattHour>> {
        let response = self
            .client
            .get(format!("{}/price.json", self.base_url))
            .query(&[("date", at.to_rfc3339_opts(SecondsFormat::Millis, true))])
            .send()
            .await
            .context("failed to call the upstream price API")?;
        if !response.status().is_success() {
            info!(status = %response.status(), "no upstream price");
            return Ok(None);
        }
        let body: Value =
            response.json().await.context("failed to read the upstream price response")?;
        Ok(extract_price(&body).map(CentsPerKilowattHour::from))
    }

    /// Rolling latest-prices window, passed through unparsed.
    #[instrument(skip_all)]
    pub async fn latest(&self) -> Result<Latest> {
        let response = self
            .client
            .get(format!("{}/latest-prices.json", self.base_url))
            .send()
            .await
            .context("failed to call the upstream latest-prices API")?;
        let status = response.status();
        if !status.is_success() {
            return Ok(Latest::Unavailable(status));
        }
        let body =
            response.json().await.context("failed to read the upstream latest-prices response")?;
        Ok(Latest::Prices(body))
    }
}

/// The upstream has shipped several response shapes over time: a bare object
/// with `price`, an object with `PriceWithTax`, and an array of records.
/// Accept any of them.
pub fn extract_price(body: &Value) -> Option<f64> {
    if let Some(price) = body.get("price").and_then(Value::as_f64) {
        return Some(price);
    }
    if let Some(price) = body.get("PriceWithTax").and_then(Value::as_f64) {
        return Some(price);
    }
    body.as_array()?.first()?.get("price")?.as_f64()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_extract_plain_price() {
        assert_eq!(extract_price(&json!({"price": 8.2})), Some(8.2));
    }

    #[test]
    fn test_extract_price_with_tax() {
        assert_eq!(extract_price(&json!({"PriceWithTax": 10.5})), Some(10.5));
    }

    #[test]
    fn test_extract_array_head() {
        let body = json!([{"price": 4.1}, {"price": 5.0}]);
        assert_eq!(extract_price(&body), Some(4.1));
    }

    #[test]
    fn test_extract_prefers_plain_price() {
        assert_eq!(extract_price(&json!({"price": 1.0, "PriceWithTax": 2.0})), Some(1.0));
    }

    #[test]
    fn test_extract_unrecognized_shapes() {
        assert_eq!(extract_price(&json!({"price": "8.2"})), None);
        assert_eq!(extract_price(&json!([])), None);
        assert_eq!(extract_price(&json!("8.2")), None);
    }
}
