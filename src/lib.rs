//! A fluent, blocking HTTP client.
//!
//! [`HttpRequest`] collects headers, query parameters, cookies and
//! credentials, then executes GET/PUT/POST/DELETE through a [`Transport`].
//! [`HttpResponse`] exposes the status, headers, parsed cookies and the body
//! decoded as JSON, XML or text.

pub mod http;
pub mod transport;

pub use http::{
    Content, Cookie, Headers, HttpError, HttpMethod, HttpRequest, HttpResponse, HttpStatus,
    RequestBody, RequestDefaults, XmlNode,
};
pub use transport::{ReqwestTransport, Transport, TransportRequest, TransportResponse};
