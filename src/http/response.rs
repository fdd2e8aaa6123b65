//! The result of an executed request.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

use super::cookie::Cookie;
use super::error::HttpError;
use super::headers::Headers;
use super::status::HttpStatus;
use super::xml::XmlNode;
use crate::transport::TransportResponse;

const SET_COOKIE: &str = "Set-Cookie";

/// Body content decoded according to the response's Content-Type.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Json(Value),
    Xml(XmlNode),
    Text(String),
}

impl Content {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Content::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_xml(&self) -> Option<&XmlNode> {
        match self {
            Content::Xml(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(text) => Some(text),
            _ => None,
        }
    }

    /// True for an empty text body or a JSON `null`.
    pub fn is_empty(&self) -> bool {
        match self {
            Content::Json(v) => v.is_null(),
            Content::Xml(_) => false,
            Content::Text(text) => text.is_empty(),
        }
    }
}

/// A received HTTP response. Read-only once constructed.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    url: String,
    status: HttpStatus,
    headers: Headers,
    cookies: HashMap<String, Cookie>,
    content_type: String,
    content_length: u64,
    content: Vec<u8>,
    error: Option<String>,
}

impl HttpResponse {
    /// Builds a response from what the transport observed.
    ///
    /// The first `header_size` bytes of the payload are the header block
    /// and are dropped from the body.
    pub fn from_transport(response: TransportResponse) -> Self {
        let cookies = parse_cookies(&response.headers);

        let mut payload = response.payload;
        let header_size = response.header_size.min(payload.len());
        let content = payload.split_off(header_size);
        let content_length = response
            .content_length
            .unwrap_or(content.len() as u64);

        let content_type = response
            .content_type
            .or_else(|| response.headers.get("Content-Type").map(str::to_string))
            .unwrap_or_default();

        Self {
            url: response.url,
            status: HttpStatus(response.status),
            headers: response.headers,
            cookies,
            content_type,
            content_length,
            content,
            error: response.error.filter(|e| !e.is_empty()),
        }
    }

    /// URL the response came from, after redirects.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> HttpStatus {
        self.status
    }

    pub fn status_code(&self) -> u16 {
        self.status.0
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// All values of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&[String]> {
        self.headers.get_all(name)
    }

    pub fn cookies(&self) -> &HashMap<String, Cookie> {
        &self.cookies
    }

    pub fn cookie(&self, name: &str) -> Option<&Cookie> {
        self.cookies.get(name)
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    pub fn content_raw(&self) -> &[u8] {
        &self.content
    }

    /// The body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }

    /// Transport-level error reported with the response.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Decodes the body based on the Content-Type: JSON, XML or plain text.
    pub fn content(&self) -> Result<Content> {
        let content_type = self.content_type.to_ascii_lowercase();

        if content_type.contains("application/json") {
            if self.content.iter().all(u8::is_ascii_whitespace) {
                return Ok(Content::Json(Value::Null));
            }
            let value = serde_json::from_slice(&self.content)
                .map_err(|e| HttpError::parse(format!("invalid JSON: {}", e)))?;
            return Ok(Content::Json(value));
        }

        if content_type.contains("text/xml") || content_type.contains("application/xml") {
            let text = std::str::from_utf8(&self.content)
                .map_err(|e| HttpError::parse(format!("XML body is not UTF-8: {}", e)))?;
            return Ok(Content::Xml(XmlNode::parse(text)?));
        }

        Ok(Content::Text(self.text()))
    }

    /// Deserializes a JSON body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.content)
            .map_err(|e| HttpError::parse(format!("invalid JSON: {}", e)))
            .with_context(|| format!("Failed to deserialize response from {}", self.url))
    }

    /// True if the transport reported an error or the status is 4xx/5xx.
    pub fn is_error(&self) -> bool {
        self.error.is_some() || self.status.is_error()
    }

    pub fn is_informational(&self) -> bool {
        self.status.is_informational()
    }

    pub fn is_success(&self) -> bool {
        self.status.is_successful()
    }

    pub fn is_redirection(&self) -> bool {
        self.status.is_redirection()
    }

    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }
}

// Later cookies with the same name replace earlier ones.
fn parse_cookies(headers: &Headers) -> HashMap<String, Cookie> {
    headers
        .get_all(SET_COOKIE)
        .unwrap_or_default()
        .iter()
        .map(|raw| Cookie::parse(raw))
        .map(|cookie| (cookie.name().to_string(), cookie))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transport_response(status: u16, content_type: &str, body: &str) -> TransportResponse {
        let mut headers = Headers::new();
        headers.append("Content-Type", content_type);
        TransportResponse {
            url: "https://host/get".to_string(),
            status,
            headers,
            content_type: Some(content_type.to_string()),
            content_length: None,
            header_size: 0,
            payload: body.as_bytes().to_vec(),
            error: None,
        }
    }

    #[test]
    fn test_json_content() {
        let response = HttpResponse::from_transport(transport_response(
            200,
            "application/json",
            r#"{"url": "https://host/get", "args": {"a": "1"}}"#,
        ));

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.url(), "https://host/get");
        let content = response.content().unwrap();
        assert_eq!(content.as_json().unwrap()["args"]["a"], json!("1"));
    }

    #[test]
    fn test_typed_json() {
        #[derive(serde::Deserialize)]
        struct Echo {
            url: String,
        }
        let response = HttpResponse::from_transport(transport_response(
            200,
            "application/json; charset=utf-8",
            r#"{"url": "https://host/get"}"#,
        ));
        let echo: Echo = response.json().unwrap();
        assert_eq!(echo.url, "https://host/get");
    }

    #[test]
    fn test_empty_json_body_is_null() {
        let response =
            HttpResponse::from_transport(transport_response(400, "application/json", ""));
        assert!(response.content().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let response =
            HttpResponse::from_transport(transport_response(200, "application/json", "{nope"));
        let err = response.content().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HttpError>(),
            Some(HttpError::Parse(_))
        ));
    }

    #[test]
    fn test_xml_content() {
        let response = HttpResponse::from_transport(transport_response(
            200,
            "application/xml",
            "<root><item id=\"1\">one</item></root>",
        ));
        let content = response.content().unwrap();
        let root = content.as_xml().unwrap();
        assert_eq!(root.name, "root");
        assert_eq!(root.child("item").unwrap().attribute("id"), Some("1"));

        let response = HttpResponse::from_transport(transport_response(
            200,
            "text/xml; charset=utf-8",
            "<a>b</a>",
        ));
        assert_eq!(response.content().unwrap().as_xml().unwrap().text, "b");
    }

    #[test]
    fn test_text_content() {
        let response =
            HttpResponse::from_transport(transport_response(200, "text/html", "<p>hi</p>"));
        assert_eq!(
            response.content().unwrap(),
            Content::Text("<p>hi</p>".to_string())
        );
        assert_eq!(response.content_length(), 9);
    }

    #[test]
    fn test_header_block_is_stripped() {
        let raw = "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\n";
        let mut response = transport_response(200, "text/plain", "");
        response.payload = format!("{}hello", raw).into_bytes();
        response.header_size = raw.len();
        response.content_length = Some(5);

        let response = HttpResponse::from_transport(response);
        assert_eq!(response.content_raw(), b"hello");
        assert_eq!(response.content_length(), 5);
    }

    #[test]
    fn test_cookies_are_parsed_last_wins() {
        let mut raw = transport_response(200, "text/plain", "");
        raw.headers.append("Set-Cookie", "k1=v1; Path=/");
        raw.headers.append("set-cookie", "k2=v2; Secure");
        raw.headers.append("SET-COOKIE", "k1=override");

        let response = HttpResponse::from_transport(raw);
        assert_eq!(response.cookies().len(), 2);
        assert_eq!(response.cookie("k1").unwrap().value(), "override");
        assert!(response.cookie("k2").unwrap().secure());
        assert!(response.cookie("missing").is_none());
    }

    #[test]
    fn test_partitioned_cookie_keeps_its_name() {
        let mut raw = transport_response(200, "text/plain", "");
        raw.headers.append("Set-Cookie", "id=42; Path=/; Secure; Partitioned");

        let response = HttpResponse::from_transport(raw);
        assert_eq!(response.cookies().len(), 1);
        assert_eq!(response.cookie("id").unwrap().value(), "42");
        assert!(response.cookie("Partitioned").is_none());
    }

    #[test]
    fn test_is_error_on_status() {
        for status in [400, 404, 499, 500, 503, 599] {
            let response =
                HttpResponse::from_transport(transport_response(status, "text/plain", ""));
            assert!(response.is_error(), "{}", status);
        }
        for status in [100, 200, 204, 302, 399, 600] {
            let response =
                HttpResponse::from_transport(transport_response(status, "text/plain", ""));
            assert!(!response.is_error(), "{}", status);
        }
    }

    #[test]
    fn test_is_error_on_transport_error() {
        let mut raw = transport_response(200, "text/plain", "");
        raw.error = Some("SSL certificate problem".to_string());
        let response = HttpResponse::from_transport(raw);
        assert!(response.is_error());
        assert!(response.is_success());
        assert_eq!(response.error(), Some("SSL certificate problem"));

        let mut raw = transport_response(200, "text/plain", "");
        raw.error = Some(String::new());
        assert!(!HttpResponse::from_transport(raw).is_error());
    }

    #[test]
    fn test_content_type_falls_back_to_header() {
        let mut raw = transport_response(200, "application/json", "{}");
        raw.content_type = None;
        let response = HttpResponse::from_transport(raw);
        assert_eq!(response.content_type(), "application/json");
    }
}
