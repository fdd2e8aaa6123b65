//! The seam between the request builder and the network.
//!
//! The builder turns its configuration into a [`TransportRequest`] and a
//! [`Transport`] performs the I/O. [`ReqwestTransport`] is the default.

mod native;

use anyhow::Result;
use std::time::Duration;

use crate::http::{Headers, HttpMethod};

pub use native::ReqwestTransport;

/// Username and password for HTTP Basic authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

/// A fully prepared request, independent of the builder that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: String,
    /// One `(name, value)` per header line.
    pub headers: Vec<(String, String)>,
    /// Value for the `Cookie` header, if any cookies were set.
    pub cookie: Option<String>,
    pub body: Option<Vec<u8>>,
    pub basic_auth: Option<BasicAuth>,
    pub timeout: Duration,
    pub verify_ssl_certificate: bool,
}

impl TransportRequest {
    /// First value of a header, matching the name case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// What the transport observed after executing a request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransportResponse {
    /// URL that produced the response, after redirects.
    pub url: String,
    pub status: u16,
    pub headers: Headers,
    pub content_type: Option<String>,
    /// Length reported by the server, if any.
    pub content_length: Option<u64>,
    /// Size of the header block at the start of `payload`.
    pub header_size: usize,
    pub payload: Vec<u8>,
    /// Low-level error reported alongside a response.
    pub error: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
pub trait Transport: Send + Sync {
    /// Executes the request, blocking until a response arrives.
    fn execute(&self, request: &TransportRequest) -> Result<TransportResponse>;
}
