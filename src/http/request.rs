//! Fluent request builder.

use anyhow::Result;
use log::debug;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use super::body::{RequestBody, implied_content_type, normalize_content_type};
use super::config::RequestDefaults;
use super::error::HttpError;
use super::headers::Headers;
use super::method::HttpMethod;
use super::query::build_url;
use super::response::HttpResponse;
use crate::transport::{BasicAuth, ReqwestTransport, Transport, TransportRequest};

const CONTENT_TYPE: &str = "Content-Type";

/// Accumulates request settings and executes them with a verb method.
///
/// Setters consume and return the builder so calls chain. Verb methods take
/// `&self`, so one configured builder can issue several requests.
///
/// ```no_run
/// use fluent_http::HttpRequest;
/// use serde_json::json;
///
/// # fn main() -> anyhow::Result<()> {
/// let response = HttpRequest::create("https://httpbin.org")
///     .content_type("application/json")
///     .parameter("page", "1")
///     .post("post", json!({"name": "fluent"}))?;
///
/// if !response.is_error() {
///     println!("{:?}", response.content()?);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HttpRequest {
    base_url: String,
    headers: Headers,
    parameters: Vec<(String, String)>,
    cookies: Vec<(String, String)>,
    basic_auth: Option<BasicAuth>,
    timeout: Duration,
    verify_ssl_certificate: bool,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("base_url", &self.base_url)
            .field("headers", &self.headers)
            .field("parameters", &self.parameters)
            .field("cookies", &self.cookies)
            .field("basic_auth", &self.basic_auth.as_ref().map(|a| &a.username))
            .field("timeout", &self.timeout)
            .field("verify_ssl_certificate", &self.verify_ssl_certificate)
            .finish_non_exhaustive()
    }
}

impl HttpRequest {
    /// Creates a builder for `base_url`, seeded from the environment.
    pub fn create(base_url: impl Into<String>) -> Self {
        Self::with_defaults(base_url, RequestDefaults::from_env())
    }

    /// Creates a builder for `base_url` from explicit defaults.
    pub fn with_defaults(base_url: impl Into<String>, defaults: RequestDefaults) -> Self {
        Self {
            base_url: base_url.into(),
            headers: defaults.headers,
            parameters: Vec::new(),
            cookies: Vec::new(),
            basic_auth: None,
            timeout: defaults.timeout,
            verify_ssl_certificate: defaults.verify_ssl_certificate,
            transport: Arc::new(ReqwestTransport::new()),
        }
    }

    /// Executes requests through `transport` instead of reqwest.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// The URL every path is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Headers configured so far.
    pub fn header_values(&self) -> &Headers {
        &self.headers
    }

    /// Adds a header value; existing values for the name are kept.
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Adds several headers; see [`HttpRequest::header`].
    pub fn headers<I, N, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.headers.append(name.as_ref(), value);
        }
        self
    }

    /// Sets the Content-Type. A `multipart/*` type without a boundary gets
    /// one generated.
    pub fn content_type(mut self, content_type: &str) -> Self {
        self.headers
            .set(CONTENT_TYPE, normalize_content_type(content_type));
        self
    }

    /// Adds an Accept header.
    pub fn accept(self, content_type: &str) -> Self {
        let content_type = content_type.trim().to_string();
        self.header("Accept", content_type)
    }

    /// Adds `Authorization: <scheme> <value>`. Both parts must be non-empty.
    pub fn authorization(self, scheme: &str, value: &str) -> Result<Self> {
        if scheme.trim().is_empty() {
            return Err(HttpError::invalid_argument("Scheme was empty"));
        }
        if value.trim().is_empty() {
            return Err(HttpError::invalid_argument("Value was empty"));
        }
        Ok(self.header("Authorization", format!("{} {}", scheme, value)))
    }

    /// Shortcut for `authorization("Bearer", token)`.
    pub fn bearer(self, token: &str) -> Result<Self> {
        self.authorization("Bearer", token)
    }

    /// Sets a query parameter, replacing an earlier value of the same name.
    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        upsert(&mut self.parameters, name.into(), value.into());
        self
    }

    /// Sets several query parameters.
    pub fn parameters<I, N, V>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        for (name, value) in parameters {
            upsert(&mut self.parameters, name.into(), value.into());
        }
        self
    }

    /// Sets a cookie sent with the request.
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        upsert(&mut self.cookies, name.into(), value.into());
        self
    }

    /// Sets several request cookies.
    pub fn cookies<I, N, V>(mut self, cookies: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        for (name, value) in cookies {
            upsert(&mut self.cookies, name.into(), value.into());
        }
        self
    }

    /// Carries cookies set by `response` over to this builder. Cookies the
    /// server cleared or expired are removed.
    pub fn import_cookies(mut self, response: &HttpResponse) -> Self {
        let now = SystemTime::now();
        let mut names: Vec<&String> = response.cookies().keys().collect();
        names.sort();

        for name in names {
            let cookie = &response.cookies()[name];
            if cookie.is_removal(now) {
                debug!("Dropping cookie '{}' cleared by {}", name, response.url());
                self.cookies.retain(|(n, _)| n != name);
            } else {
                upsert(&mut self.cookies, name.clone(), cookie.value().to_string());
            }
        }
        self
    }

    /// Sends HTTP basic credentials. An empty username sends none.
    pub fn basic_authentication(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.basic_auth = Some(BasicAuth {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Connect timeout in seconds. Reading the response is not time limited.
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout = Duration::from_secs(seconds);
        self
    }

    /// Whether TLS certificates are checked. Turning this off is for
    /// debugging only.
    pub fn verify_ssl_certificate(mut self, verify: bool) -> Self {
        self.verify_ssl_certificate = verify;
        self
    }

    /// Issues a GET request.
    #[tracing::instrument(skip(self))]
    pub fn get(&self, path: &str) -> Result<HttpResponse> {
        self.send(HttpMethod::Get, path, None)
    }

    /// Issues a PUT request with `body`.
    #[tracing::instrument(skip(self, body))]
    pub fn put(&self, path: &str, body: impl Into<RequestBody>) -> Result<HttpResponse> {
        self.send(HttpMethod::Put, path, Some(body.into()))
    }

    /// Issues a POST request with `body`.
    #[tracing::instrument(skip(self, body))]
    pub fn post(&self, path: &str, body: impl Into<RequestBody>) -> Result<HttpResponse> {
        self.send(HttpMethod::Post, path, Some(body.into()))
    }

    /// Issues a DELETE request with `body`.
    #[tracing::instrument(skip(self, body))]
    pub fn delete(&self, path: &str, body: impl Into<RequestBody>) -> Result<HttpResponse> {
        self.send(HttpMethod::Delete, path, Some(body.into()))
    }

    /// Executes the request with any method.
    ///
    /// 4xx and 5xx responses are returned as `Ok`; only configuration and
    /// transport failures are errors.
    pub fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<RequestBody>,
    ) -> Result<HttpResponse> {
        let request = self.prepare(method, path, body.as_ref())?;
        debug!("{} {}...", method, request.url);

        let response = self.transport.execute(&request)?;
        if let Some(error) = response.error.as_deref().filter(|e| !e.is_empty()) {
            return Err(HttpError::request(error));
        }

        let response = HttpResponse::from_transport(response);
        debug!("{} {} -> {}", method, response.url(), response.status());
        Ok(response)
    }

    /// The URL a request to `path` would go to.
    pub fn build_url(&self, path: &str) -> String {
        build_url(&self.base_url, path, &self.parameters)
    }

    /// Snapshots the builder into the request the transport would receive.
    pub fn prepare(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&RequestBody>,
    ) -> Result<TransportRequest> {
        let mut headers = self.headers.clone();
        let content_type = headers.get(CONTENT_TYPE).map(str::to_string);

        let encoded = body
            .map(|b| b.encode(content_type.as_deref()))
            .transpose()?;
        if let Some(implied) = implied_content_type(body, content_type.as_deref()) {
            headers.set(CONTENT_TYPE, implied);
        }

        let cookie = (!self.cookies.is_empty()).then(|| {
            self.cookies
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>()
                .join("; ")
        });

        Ok(TransportRequest {
            method,
            url: self.build_url(path),
            headers: headers
                .lines()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
            cookie,
            body: encoded,
            basic_auth: self
                .basic_auth
                .clone()
                .filter(|auth| !auth.username.is_empty()),
            timeout: self.timeout,
            verify_ssl_certificate: self.verify_ssl_certificate,
        })
    }
}

fn upsert(entries: &mut Vec<(String, String)>, name: String, value: String) {
    match entries.iter_mut().find(|(n, _)| *n == name) {
        Some(entry) => entry.1 = value,
        None => entries.push((name, value)),
    }
}
