use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};

use crate::{interval::Interval, rate::CentsPerKilowattHour};

/// One record of the upstream day-ahead price series.
#[derive(Copy, Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PricePoint {
    #[serde(rename = "startDate")]
    pub start: DateTime<Utc>,

    #[serde(rename = "endDate")]
    pub end: DateTime<Utc>,

    /// May arrive either as a JSON number or as a comma-decimal string.
    #[serde(deserialize_with = "deserialize_rate")]
    pub price: CentsPerKilowattHour,
}

impl PricePoint {
    #[must_use]
    pub const fn interval(&self) -> Interval {
        Interval::new(self.start, self.end)
    }
}

fn deserialize_rate<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<CentsPerKilowattHour, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(CentsPerKilowattHour::from(value)),
        Raw::Text(text) => CentsPerKilowattHour::parse_lenient(&text).map_err(|_| {
            de::Error::invalid_value(de::Unexpected::Str(&text), &"a decimal price")
        }),
    }
}

/// Content signature of a price series: length plus the boundary records.
///
/// Used to detect whether a freshly fetched series actually differs from the
/// cached one without comparing every record.
#[must_use]
pub fn signature(points: &[PricePoint]) -> String {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return String::new();
    };
    let mut signature = points.len().to_string();
    for point in [first, last] {
        // The write cannot fail on a string buffer.
        let _ = write!(
            signature,
            "|{}|{}|{}",
            point.start.to_rfc3339(),
            point.end.to_rfc3339(),
            point.price.0,
        );
    }
    signature
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(json: &str) -> PricePoint {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_deserialize_numeric_price() {
        let point = point(
            r#"{"startDate": "2025-01-01T10:00:00.000Z", "endDate": "2025-01-01T10:15:00.000Z", "price": 8.2}"#,
        );
        assert_eq!(point.price, CentsPerKilowattHour::from(8.2));
    }

    #[test]
    fn test_deserialize_comma_decimal_price() {
        let point = point(
            r#"{"startDate": "2025-01-01T10:00:00.000Z", "endDate": "2025-01-01T10:15:00.000Z", "price": "8,25"}"#,
        );
        assert_eq!(point.price, CentsPerKilowattHour::from(8.25));
    }

    #[test]
    fn test_signature_empty() {
        assert_eq!(signature(&[]), "");
    }

    #[test]
    fn test_signature_detects_change() {
        let series_1 = [point(
            r#"{"startDate": "2025-01-01T10:00:00Z", "endDate": "2025-01-01T11:00:00Z", "price": 1.0}"#,
        )];
        let series_2 = [point(
            r#"{"startDate": "2025-01-01T10:00:00Z", "endDate": "2025-01-01T11:00:00Z", "price": 2.0}"#,
        )];
        assert_eq!(signature(&series_1), signature(&series_1));
        assert_ne!(signature(&series_1), signature(&series_2));
    }
}
