//! JSON:API media-type enforcement.

use crate::error::ApiError;
use axum::{
    extract::Request,
    http::header::ACCEPT,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The media type clients must name in `accept`.
pub const MEDIA_TYPE: &str = "application/vnd.api+json";

/// Reject requests whose accept header does not name the JSON:API media
/// type. Media-type parameters (charset and friends) are stripped before
/// matching; absence or mismatch is a 406 error document.
pub async fn require_json_api_accept(request: Request, next: Next) -> Response {
    let accepted = request
        .headers()
        .get(ACCEPT)
        .and_then(|value| value.to_str().ok())
        .map(accepts_json_api)
        .unwrap_or(false);
    if !accepted {
        return ApiError::NotAcceptable.into_response();
    }
    next.run(request).await
}

fn accepts_json_api(header: &str) -> bool {
    header
        .split(',')
        .filter_map(|entry| entry.split(';').next())
        .any(|media| media.trim() == MEDIA_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_exact_media_type() {
        assert!(accepts_json_api("application/vnd.api+json"));
    }

    #[test]
    fn strips_parameters() {
        assert!(accepts_json_api("application/vnd.api+json; charset=utf-8"));
    }

    #[test]
    fn matches_within_a_list() {
        assert!(accepts_json_api("text/html, application/vnd.api+json"));
    }

    #[test]
    fn rejects_empty_and_other_types() {
        assert!(!accepts_json_api(""));
        assert!(!accepts_json_api("text/html"));
        assert!(!accepts_json_api("*/*"));
    }
}
