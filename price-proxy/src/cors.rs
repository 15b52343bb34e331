use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        HeaderValue, Method, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, ORIGIN, VARY,
        },
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{AppState, prelude::*};

/// Origin allow-list. A request from an origin outside the list still gets a
/// CORS response, but carrying the first configured origin instead of its own,
/// so the browser refuses the cross-origin read.
#[derive(Clone)]
pub struct CorsPolicy {
    allowed: Vec<HeaderValue>,
}

impl CorsPolicy {
    pub fn new(origins: &[String]) -> Result<Self> {
        ensure!(!origins.is_empty(), "at least one allowed origin is required");
        let allowed = origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("invalid origin `{origin}`"))
            })
            .collect::<Result<_>>()?;
        Ok(Self { allowed })
    }

    pub fn resolve(&self, origin: Option<&str>) -> HeaderValue {
        origin
            .and_then(|origin| {
                self.allowed.iter().find(|allowed| allowed.as_bytes() == origin.as_bytes())
            })
            .unwrap_or(&self.allowed[0])
            .clone()
    }
}

/// Answers preflight requests and stamps the CORS headers onto every response.
pub async fn apply(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let origin =
        request.headers().get(ORIGIN).and_then(|value| value.to_str().ok()).map(ToOwned::to_owned);
    let allow_origin = state.cors.resolve(origin.as_deref());

    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET,POST,OPTIONS"));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type"));
    headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("86400"));
    headers.insert(VARY, HeaderValue::from_static("Origin"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> CorsPolicy {
        CorsPolicy::new(&["http://localhost:5500".to_string(), "http://127.0.0.1:5500".to_string()])
            .unwrap()
    }

    #[test]
    fn test_allowed_origin_is_echoed() {
        assert_eq!(policy().resolve(Some("http://127.0.0.1:5500")), "http://127.0.0.1:5500");
    }

    #[test]
    fn test_unmatched_origin_gets_the_default() {
        assert_eq!(policy().resolve(Some("https://evil.example")), "http://localhost:5500");
    }

    #[test]
    fn test_missing_origin_gets_the_default() {
        assert_eq!(policy().resolve(None), "http://localhost:5500");
    }

    #[test]
    fn test_empty_allow_list_is_rejected() {
        assert!(CorsPolicy::new(&[]).is_err());
    }
}
