//! Response format negotiation and the fixed tenancy error responses.

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;

pub const NOT_FOUND_HTML: &str = include_str!("../static/404.html");
pub const FORBIDDEN_HTML: &str = include_str!("../static/403.html");

/// Alert shown to browser clients on a policy denial.
pub const NOT_AUTHORIZED_ALERT: &str = "You are not authorized to perform this action.";

/// Header carrying the alert along with the redirect.
pub const FLASH_ALERT_HEADER: &str = "x-flash-alert";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Html,
}

impl ResponseFormat {
    /// JSON when the path ends in `.json` or the most preferred recognised
    /// media range in `Accept` is JSON; HTML otherwise. Ranges are ranked by
    /// their `q` value, ties go to the one listed first, and `q=0` excludes.
    pub fn negotiate(headers: &HeaderMap, uri: &Uri) -> Self {
        if uri.path().ends_with(".json") {
            return ResponseFormat::Json;
        }

        let Some(accept) = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok()) else {
            return ResponseFormat::Html;
        };

        let mut best: Option<(f32, ResponseFormat)> = None;
        for range in accept.split(',') {
            let mut params = range.split(';');
            let media = params.next().unwrap_or("").trim().to_ascii_lowercase();
            let format = if media == "application/json" || media.ends_with("+json") {
                ResponseFormat::Json
            } else if media == "text/html" || media == "application/xhtml+xml" || media == "*/*" {
                ResponseFormat::Html
            } else {
                continue;
            };

            let q = params
                .filter_map(|p| p.trim().strip_prefix("q="))
                .find_map(|v| v.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            if q <= 0.0 {
                continue;
            }
            if best.map_or(true, |(top, _)| q > top) {
                best = Some((q, format));
            }
        }
        best.map_or(ResponseFormat::Html, |(_, format)| format)
    }

    pub fn is_json(&self) -> bool {
        matches!(self, ResponseFormat::Json)
    }
}

/// 404 for a missing tenant: `{"error":"Not Found"}` or the static document.
pub fn tenant_not_found(format: ResponseFormat) -> Response {
    match format {
        ResponseFormat::Json => {
            (StatusCode::NOT_FOUND, Json(json!({"error": "Not Found"}))).into_response()
        }
        ResponseFormat::Html => (StatusCode::NOT_FOUND, Html(NOT_FOUND_HTML)).into_response(),
    }
}

/// 403 for cross-tenant access: `{"error":"Forbidden"}` or the static document.
pub fn access_denied(format: ResponseFormat) -> Response {
    match format {
        ResponseFormat::Json => {
            (StatusCode::FORBIDDEN, Json(json!({"error": "Forbidden"}))).into_response()
        }
        ResponseFormat::Html => (StatusCode::FORBIDDEN, Html(FORBIDDEN_HTML)).into_response(),
    }
}

/// Policy denial: API clients get `{"error":"forbidden"}`, browsers are sent
/// back to the referring page (or `/`) with an alert.
pub fn not_authorized(format: ResponseFormat, referer: Option<&str>) -> Response {
    match format {
        ResponseFormat::Json => {
            (StatusCode::FORBIDDEN, Json(json!({"error": "forbidden"}))).into_response()
        }
        ResponseFormat::Html => {
            let target = referer.filter(|r| !r.trim().is_empty()).unwrap_or("/");
            let mut res = StatusCode::SEE_OTHER.into_response();
            let headers = res.headers_mut();
            match HeaderValue::from_str(target) {
                Ok(location) => headers.insert(header::LOCATION, location),
                Err(_) => headers.insert(header::LOCATION, HeaderValue::from_static("/")),
            };
            headers.insert(FLASH_ALERT_HEADER, HeaderValue::from_static(NOT_AUTHORIZED_ALERT));
            res
        }
    }
}
