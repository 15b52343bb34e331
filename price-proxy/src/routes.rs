use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{CACHE_CONTROL, CONTENT_TYPE, ORIGIN},
    },
    response::{IntoResponse, Response},
};
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{AppState, prelude::*, upstream::Latest};

#[derive(Deserialize)]
pub struct RootQuery {
    date: Option<String>,
    latest: Option<String>,
}

pub async fn get_root(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RootQuery>,
) -> Response {
    if query.latest.as_deref() == Some("true") {
        return get_latest(&state).await;
    }
    match query.date.as_deref() {
        Some(raw) if !raw.is_empty() => get_price(&state, raw).await,
        _ => json_response(
            StatusCode::OK,
            json!({
                "ok": true,
                "usage": "Use ?date=<ISO8601-timestamp> to get price in cents/kWh, or ?latest=true for 48-hour prices",
                "example": "?date=2026-02-02T14:00:00.000Z or ?latest=true",
            }),
        ),
    }
}

async fn get_price(state: &AppState, raw: &str) -> Response {
    let requested = match classify_date(raw, Utc::now()) {
        DateQuery::Invalid => {
            return json_response(
                StatusCode::BAD_REQUEST,
                json!({"ok": false, "error": "Invalid date format. Use ISO 8601 format."}),
            );
        }
        DateQuery::TooFarAhead(requested) => {
            // Day-ahead prices only: distinguishable from the plain 404 below.
            return json_response(
                StatusCode::BAD_REQUEST,
                json!({
                    "ok": false,
                    "error": "No data yet",
                    "timestamp": iso(requested),
                    "note": "Data is not available for dates more than 2 days in the future",
                }),
            );
        }
        DateQuery::Valid(requested) => requested,
    };

    let price = match state.upstream.price_at(requested).await {
        Ok(price) => price,
        Err(error) => {
            error!(error = format!("{error:#}"), "upstream price fetch failed");
            None
        }
    };
    match price {
        Some(price) => json_response(
            StatusCode::OK,
            json!({
                "ok": true,
                "price": price.into_inner(),
                "timestamp": iso(requested),
                "unit": "snt/kWh",
            }),
        ),
        // Never fabricate a price: no recognizable upstream data is a hard 404.
        None => json_response(
            StatusCode::NOT_FOUND,
            json!({
                "ok": false,
                "error": "No data available",
                "timestamp": iso(requested),
                "note": "External API unavailable or no data available for this date",
            }),
        ),
    }
}

async fn get_latest(state: &AppState) -> Response {
    match state.upstream.latest().await {
        Ok(Latest::Prices(body)) => {
            let mut response = json_response(StatusCode::OK, body);
            response
                .headers_mut()
                .insert(CACHE_CONTROL, HeaderValue::from_static("max-age=3600"));
            response
        }
        Ok(Latest::Unavailable(status)) => json_response(
            status,
            json!({"ok": false, "error": "Failed to fetch latest prices from upstream"}),
        ),
        Err(error) => {
            error!(error = format!("{error:#}"), "latest prices fetch failed");
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"ok": false, "error": "Failed to fetch latest prices"}),
            )
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct FeedbackBody {
    name: Option<String>,
    rating: Option<String>,
    message: Option<String>,
    page: Option<String>,
    ts: Option<String>,
}

#[derive(Debug, Eq, PartialEq, Serialize)]
pub struct FeedbackRecord {
    name: String,
    rating: String,
    message: String,
    page: String,
    ts: String,
    origin: Option<String>,
}

pub async fn post_feedback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<FeedbackBody>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return json_response(StatusCode::BAD_REQUEST, json!({"ok": false, "error": "Invalid JSON"}));
    };
    let origin =
        headers.get(ORIGIN).and_then(|value| value.to_str().ok()).map(ToOwned::to_owned);
    let Some(record) = sanitize_feedback(body, origin, Utc::now()) else {
        return json_response(
            StatusCode::BAD_REQUEST,
            json!({"ok": false, "error": "Message required"}),
        );
    };

    let key = format!("fb:{}:{}", Utc::now().timestamp_millis(), Uuid::new_v4());
    info!(key, "saving feedback");
    let value = match serde_json::to_value(&record) {
        Ok(value) => value,
        Err(error) => return storage_failure(error.into()),
    };
    match state.store.put(&key, &value, TimeDelta::days(90)) {
        Ok(()) => json_response(StatusCode::OK, json!({"ok": true, "key": key})),
        Err(error) => storage_failure(error),
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct PremiumBody {
    key: Option<String>,

    #[serde(rename = "deviceId")]
    device_id: Option<String>,
}

pub async fn post_validate_premium(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PremiumBody>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return json_response(StatusCode::BAD_REQUEST, json!({"ok": false, "error": "Invalid JSON"}));
    };
    let key = body.key.as_deref().map(normalize_key).unwrap_or_default();
    let device_id = body.device_id.map(|device_id| device_id.trim().to_owned()).unwrap_or_default();
    if key.is_empty() || device_id.is_empty() {
        return json_response(
            StatusCode::BAD_REQUEST,
            json!({"valid": false, "error": "Key and deviceId required"}),
        );
    }

    let valid = state.premium_keys.contains(&key);
    if valid {
        // Keys are reusable static secrets; the activation record is
        // book-keeping, not a single-use marker.
        let storage_key = format!("premium:{device_id}");
        if let Ok(Some(_)) = state.store.get(&storage_key) {
            debug!(device_id, "device was already activated, refreshing the record");
        }
        let record = json!({
            "key": key,
            "deviceId": device_id,
            "activatedAt": iso(Utc::now()),
        });
        if let Err(error) = state.store.put(&storage_key, &record, TimeDelta::days(365)) {
            return storage_failure(error);
        }
    }
    json_response(StatusCode::OK, json!({"valid": valid}))
}

pub async fn not_found() -> Response {
    json_response(StatusCode::NOT_FOUND, json!({"ok": false, "error": "Not found"}))
}

pub async fn method_not_allowed() -> Response {
    json_response(
        StatusCode::METHOD_NOT_ALLOWED,
        json!({"ok": false, "error": "Method not allowed"}),
    )
}

pub enum DateQuery {
    Valid(DateTime<Utc>),
    TooFarAhead(DateTime<Utc>),
    Invalid,
}

/// The upstream publishes day-ahead prices only, so anything more than 2 days
/// out cannot have data yet.
pub fn classify_date(raw: &str, now: DateTime<Utc>) -> DateQuery {
    let Ok(parsed) = DateTime::parse_from_rfc3339(raw) else {
        return DateQuery::Invalid;
    };
    let requested = parsed.to_utc();
    if requested > now + TimeDelta::days(2) {
        DateQuery::TooFarAhead(requested)
    } else {
        DateQuery::Valid(requested)
    }
}

pub fn normalize_key(key: &str) -> String {
    key.trim().to_uppercase()
}

fn sanitize_feedback(
    body: FeedbackBody,
    origin: Option<String>,
    now: DateTime<Utc>,
) -> Option<FeedbackRecord> {
    let message = truncated(body.message.unwrap_or_default(), 2000);
    if message.trim().is_empty() {
        return None;
    }
    Some(FeedbackRecord {
        name: truncated(body.name.unwrap_or_else(|| "Nimetön".to_owned()), 80),
        rating: truncated(body.rating.unwrap_or_else(|| "ei annettu".to_owned()), 20),
        message,
        page: truncated(body.page.unwrap_or_default(), 300),
        ts: truncated(body.ts.unwrap_or_else(|| iso(now)), 80),
        origin,
    })
}

fn truncated(text: String, max_chars: usize) -> String {
    if text.chars().count() <= max_chars { text } else { text.chars().take(max_chars).collect() }
}

fn iso(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn storage_failure(error: Error) -> Response {
    error!(error = format!("{error:#}"), "storage failure");
    json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"ok": false, "error": "Storage failure"}),
    )
}

fn json_response(status: StatusCode, body: Value) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json; charset=utf-8"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw).unwrap().to_utc()
    }

    #[test]
    fn test_classify_valid_date() {
        let now = at("2025-01-03T10:00:00Z");
        assert!(matches!(
            classify_date("2025-01-01T10:00:00.000Z", now),
            DateQuery::Valid(requested) if requested == at("2025-01-01T10:00:00Z"),
        ));
    }

    #[test]
    fn test_classify_tomorrow_is_fine() {
        let now = at("2025-01-03T10:00:00Z");
        assert!(matches!(classify_date("2025-01-04T23:00:00Z", now), DateQuery::Valid(_)));
    }

    #[test]
    fn test_classify_three_days_ahead() {
        let now = at("2025-01-03T10:00:00Z");
        assert!(matches!(classify_date("2025-01-06T10:00:01Z", now), DateQuery::TooFarAhead(_)));
    }

    #[test]
    fn test_classify_invalid() {
        assert!(matches!(classify_date("invalid", Utc::now()), DateQuery::Invalid));
        assert!(matches!(classify_date("2025-01-01", Utc::now()), DateQuery::Invalid));
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("  prem-8k9l "), "PREM-8K9L");
    }

    #[test]
    fn test_sanitize_defaults() {
        let body =
            FeedbackBody { message: Some("Great app".to_owned()), ..FeedbackBody::default() };
        let record = sanitize_feedback(body, None, at("2025-01-01T00:00:00Z")).unwrap();
        assert_eq!(record.name, "Nimetön");
        assert_eq!(record.rating, "ei annettu");
        assert_eq!(record.message, "Great app");
        assert_eq!(record.page, "");
        assert_eq!(record.ts, "2025-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_sanitize_truncates() {
        let body = FeedbackBody {
            name: Some("x".repeat(100)),
            message: Some("y".repeat(3000)),
            ..FeedbackBody::default()
        };
        let record = sanitize_feedback(body, None, Utc::now()).unwrap();
        assert_eq!(record.name.chars().count(), 80);
        assert_eq!(record.message.chars().count(), 2000);
    }

    #[test]
    fn test_sanitize_rejects_blank_message() {
        for message in [None, Some(String::new()), Some("   ".to_owned())] {
            let body = FeedbackBody { message, ..FeedbackBody::default() };
            assert!(sanitize_feedback(body, None, Utc::now()).is_none());
        }
    }

    #[test]
    fn test_sanitize_keeps_origin() {
        let body = FeedbackBody { message: Some("hi".to_owned()), ..FeedbackBody::default() };
        let record =
            sanitize_feedback(body, Some("http://localhost:5500".to_owned()), Utc::now()).unwrap();
        assert_eq!(record.origin.as_deref(), Some("http://localhost:5500"));
    }
}
