//! Blocking transport backed by reqwest.

use anyhow::Result;
use log::debug;
use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

use super::{Transport, TransportRequest, TransportResponse};
use crate::http::{HttpError, Headers};

const USER_AGENT: &str = concat!("fluent-http/", env!("CARGO_PKG_VERSION"));

/// Executes requests with a blocking reqwest client.
///
/// Redirects are followed with reqwest's default policy. A client is built
/// per request because timeout and certificate checks are per request. The
/// request timeout bounds connection setup only; reading the response has
/// no time limit.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport;

impl ReqwestTransport {
    /// Creates the transport.
    pub fn new() -> Self {
        Self
    }

    fn client(&self, request: &TransportRequest) -> Result<Client> {
        Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(request.timeout)
            .timeout(None::<Duration>)
            .danger_accept_invalid_certs(!request.verify_ssl_certificate)
            .build()
            .map_err(|e| HttpError::request(format!("Failed to build HTTP client: {}", e)))
    }

    fn prepare(&self, client: &Client, request: &TransportRequest) -> Result<RequestBuilder> {
        let method = Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|e| HttpError::invalid_argument(e.to_string()))?;

        let mut builder = client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(cookie) = &request.cookie {
            builder = builder.header(reqwest::header::COOKIE, cookie.as_str());
        }
        if let Some(auth) = &request.basic_auth {
            builder = builder.basic_auth(&auth.username, Some(&auth.password));
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }
        Ok(builder)
    }
}

impl Transport for ReqwestTransport {
    #[tracing::instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    fn execute(&self, request: &TransportRequest) -> Result<TransportResponse> {
        let client = self.client(request)?;
        let response = self
            .prepare(&client, request)?
            .send()
            .map_err(|e| HttpError::request(e.to_string()))?;

        let url = response.url().to_string();
        let status = response.status().as_u16();
        let content_length = response.content_length();

        let mut headers = Headers::new();
        for (name, value) in response.headers() {
            headers.append(name.as_str(), String::from_utf8_lossy(value.as_bytes()));
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

        let payload = response
            .bytes()
            .map_err(|e| HttpError::request(format!("Failed to read response body: {}", e)))?
            .to_vec();

        debug!("{} {} -> {} ({} bytes)", request.method, url, status, payload.len());

        Ok(TransportResponse {
            url,
            status,
            headers,
            content_type,
            content_length,
            header_size: 0,
            payload,
            error: None,
        })
    }
}
