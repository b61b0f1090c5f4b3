use hyper::body::Bytes;
use hyper::header::{CONTENT_TYPE, ETAG};

use xcap_xml::errtypes::XCapError;
use xcap_xml::xml;

pub const XCAP_ERROR_CONTENT_TYPE: &str = "application/xcap-error+xml";

/// What the client keeps of an HTTP response.
/// Headers and body are only kept for 200, 201 and 409.
#[derive(Debug, Clone, PartialEq)]
pub struct XCapHttpResponse {
    http_code: u16,
    content_type: Option<String>,
    content: Option<Bytes>,
    etag: Option<String>,
}

impl XCapHttpResponse {
    pub fn from_http(response: http::Response<Bytes>) -> Self {
        let http_code = response.status().as_u16();
        if !matches!(http_code, 200 | 201 | 409) {
            return Self {
                http_code,
                content_type: None,
                content: None,
                etag: None,
            };
        }

        let header = |name: http::header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header(CONTENT_TYPE);
        let etag = header(ETAG);

        Self {
            http_code,
            content_type,
            content: Some(response.into_body()),
            etag,
        }
    }

    pub fn http_code(&self) -> u16 {
        self.http_code
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn content(&self) -> Option<&[u8]> {
        self.content.as_deref()
    }

    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }
}

/// Phrase of the xcap-error document carried by a 409 response
pub(crate) fn xcap_error_message(response: &XCapHttpResponse) -> Option<String> {
    if response.http_code() != 409 {
        return None;
    }
    if !response.content_type()?.starts_with(XCAP_ERROR_CONTENT_TYPE) {
        return None;
    }

    match xml::deserialize::<XCapError>(response.content()?) {
        Ok(err) => err.phrase().map(str::to_string),
        Err(e) => {
            tracing::warn!(err=?e, "unable to parse the xcap-error body");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, content_type: Option<&str>, body: &'static str) -> XCapHttpResponse {
        let mut builder = http::Response::builder().status(status).header(ETAG, "\"abc123\"");
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        XCapHttpResponse::from_http(builder.body(Bytes::from_static(body.as_bytes())).unwrap())
    }

    const CONFLICT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xcap-error xmlns="urn:ietf:params:xml:ns:xcap-error">
  <constraint-failure phrase="Too many entries"/>
</xcap-error>"#;

    #[test]
    fn ok_keeps_everything() {
        for status in [200, 201] {
            let got = response(status, Some("application/resource-lists+xml"), "<x/>");
            assert_eq!(got.http_code(), status);
            assert_eq!(got.content_type(), Some("application/resource-lists+xml"));
            assert_eq!(got.content(), Some(&b"<x/>"[..]));
            assert_eq!(got.etag(), Some("\"abc123\""));
        }
    }

    #[test]
    fn other_status_keeps_only_the_code() {
        for status in [204, 304, 404, 412, 500] {
            let got = response(status, Some("text/plain"), "nope");
            assert_eq!(got.http_code(), status);
            assert_eq!(got.content_type(), None);
            assert_eq!(got.content(), None);
            assert_eq!(got.etag(), None);
        }
    }

    #[test]
    fn error_phrase() {
        let got = response(409, Some("application/xcap-error+xml; charset=utf-8"), CONFLICT);
        assert_eq!(xcap_error_message(&got).as_deref(), Some("Too many entries"));
    }

    #[test]
    fn no_error_phrase() {
        // wrong status
        assert_eq!(xcap_error_message(&response(200, Some(XCAP_ERROR_CONTENT_TYPE), CONFLICT)), None);
        // wrong or missing content type
        assert_eq!(xcap_error_message(&response(409, Some("application/xml"), CONFLICT)), None);
        assert_eq!(xcap_error_message(&response(409, None, CONFLICT)), None);
        // broken body
        assert_eq!(
            xcap_error_message(&response(409, Some(XCAP_ERROR_CONTENT_TYPE), "<xcap-error")),
            None
        );
    }
}
