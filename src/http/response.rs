//! Response helpers.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};

use crate::app::views::escape_html;

/// 404 page for a request no route accepted.
pub fn not_found(path: &str) -> Response {
    let body = format!(
        "<!DOCTYPE html>\n<html><head><title>Not Found</title></head>\
         <body><h1>Not Found</h1><p>Cannot find {}</p></body></html>\n",
        escape_html(path)
    );
    (StatusCode::NOT_FOUND, Html(body)).into_response()
}

/// Append a `Set-Cookie` header. An unencodable cookie is dropped and logged.
pub fn set_cookie(response: &mut Response, cookie: &str) {
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        Err(e) => tracing::error!(error = %e, "Session cookie not encodable"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_escapes_path() {
        let response = not_found("/<x>");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_set_cookie_appends() {
        let mut response = StatusCode::OK.into_response();
        set_cookie(&mut response, "a=1");
        set_cookie(&mut response, "b=2");
        assert_eq!(response.headers().get_all(header::SET_COOKIE).iter().count(), 2);
    }
}
