//! Outbound header and URL construction.
//!
//! Both functions are pure so they can be tested without a server.

use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method};

/// Media type for FHIR JSON resources.
pub const FHIR_JSON: &str = "application/fhir+json";

const PREFER: HeaderName = HeaderName::from_static("prefer");

/// Build the complete header set for an upstream call.
///
/// Only POST carries the caller's `Content-Type`; everything else is fixed.
/// No other inbound header reaches the upstream.
pub fn upstream_headers(
    method: &Method,
    inbound_content_type: Option<&HeaderValue>,
    authorization: Option<&HeaderValue>,
) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(FHIR_JSON));
    headers.insert(PREFER, HeaderValue::from_static("return=representation"));

    let content_type = match inbound_content_type {
        Some(value) if method == Method::POST => value.clone(),
        _ => HeaderValue::from_static(FHIR_JSON),
    };
    headers.insert(CONTENT_TYPE, content_type);

    if let Some(auth) = authorization {
        let mut auth = auth.clone();
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
    }

    headers
}

/// `<base>/<path>` plus `?<query>` when the caller sent one.
pub fn upstream_url(base: &str, path: &str, query: Option<&str>) -> String {
    let mut url = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(query);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_headers_are_fixed() {
        let inbound = HeaderValue::from_static("text/plain");
        let headers = upstream_headers(&Method::GET, Some(&inbound), None);

        assert_eq!(headers.len(), 3);
        assert_eq!(headers[ACCEPT], FHIR_JSON);
        assert_eq!(headers["prefer"], "return=representation");
        assert_eq!(headers[CONTENT_TYPE], FHIR_JSON);
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_post_keeps_inbound_content_type() {
        let inbound = HeaderValue::from_static("application/json");
        let headers = upstream_headers(&Method::POST, Some(&inbound), None);
        assert_eq!(headers[CONTENT_TYPE], "application/json");

        let headers = upstream_headers(&Method::POST, None, None);
        assert_eq!(headers[CONTENT_TYPE], FHIR_JSON);
    }

    #[test]
    fn test_authorization_attached_and_sensitive() {
        let auth = HeaderValue::from_static("Basic X1NZU1RFTTpTWVM=");
        let headers = upstream_headers(&Method::GET, None, Some(&auth));

        assert_eq!(headers[AUTHORIZATION], "Basic X1NZU1RFTTpTWVM=");
        assert!(headers[AUTHORIZATION].is_sensitive());
        assert_eq!(headers.len(), 4);
    }

    #[test]
    fn test_upstream_url_joins_once() {
        assert_eq!(
            upstream_url("http://fhir.local/r4/", "Patient/1", None),
            "http://fhir.local/r4/Patient/1"
        );
        assert_eq!(
            upstream_url("http://fhir.local/r4", "/Patient", Some("name=smith&_count=5")),
            "http://fhir.local/r4/Patient?name=smith&_count=5"
        );
        assert_eq!(
            upstream_url("http://fhir.local/r4", "metadata", Some("")),
            "http://fhir.local/r4/metadata"
        );
    }
}
