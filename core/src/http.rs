//! HTTP transport types and the `Transport` seam.
//!
//! # Design
//! Requests and responses are plain data. The resilient client builds
//! `HttpRequest` values and interprets `HttpResponse` values; a `Transport`
//! implementation performs the actual round trip. Production code uses
//! `UreqTransport`, tests substitute a scripted fake.

use crate::error::TransportError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data, addressed at one absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn is_json(&self) -> bool {
        self.header("content-type")
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Executes one HTTP round trip.
///
/// Non-2xx statuses must be returned as `Ok(HttpResponse)`; `Err` is reserved
/// for requests that produced no response at all.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, content_type: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: vec![("Content-Type".to_string(), content_type.to_string())],
            body: String::new(),
        }
    }

    #[test]
    fn success_range_is_2xx_only() {
        assert!(response(200, "text/plain").is_success());
        assert!(response(204, "text/plain").is_success());
        assert!(!response(199, "text/plain").is_success());
        assert!(!response(301, "text/plain").is_success());
        assert!(!response(500, "text/plain").is_success());
    }

    #[test]
    fn json_detection_ignores_charset_and_case() {
        assert!(response(200, "application/json; charset=utf-8").is_json());
        assert!(response(200, "Application/JSON").is_json());
        assert!(!response(200, "text/html").is_json());
    }

    #[test]
    fn missing_content_type_is_not_json() {
        let resp = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: "[]".to_string(),
        };
        assert!(!resp.is_json());
    }
}
