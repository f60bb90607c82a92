//! Request inspection.
//!
//! # Responsibilities
//! - Attach a unique request ID (UUID v4) and echo it on the response
//! - Decode urlencoded form bodies
//! - Resolve the effective verb, honouring method override on POST
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An override naming an unknown verb is rejected, not ignored

use axum::http::{header, HeaderMap, HeaderName, Method};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::routing::{Params, RoutingError, Verb};

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Header naming the verb a POST stands in for.
pub const X_HTTP_METHOD_OVERRIDE: &str = "x-http-method-override";

/// Form field naming the verb a POST stands in for.
pub const METHOD_FIELD: &str = "_method";

/// Layer that assigns a request ID when the client sent none.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeRequestUuid)
}

/// Layer that copies the request ID onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}

/// The request ID, or `unknown` outside the request-id layer.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Whether the body is `application/x-www-form-urlencoded`.
pub fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/x-www-form-urlencoded"))
}

/// Decode a urlencoded body. Later duplicates of a field win.
pub fn parse_form(body: &[u8]) -> Params {
    url::form_urlencoded::parse(body).into_owned().collect()
}

/// Verb to dispatch on.
pub fn effective_verb(method: &Method, headers: &HeaderMap, form: &Params) -> Result<Verb, RoutingError> {
    if method == Method::POST {
        let requested = form.get(METHOD_FIELD).or_else(|| {
            headers
                .get(X_HTTP_METHOD_OVERRIDE)
                .and_then(|v| v.to_str().ok())
        });
        if let Some(requested) = requested.filter(|v| !v.trim().is_empty()) {
            return requested.trim().parse();
        }
    }
    method.as_str().parse()
}
