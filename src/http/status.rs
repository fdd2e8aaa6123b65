//! Classification of numeric HTTP status codes and their reason phrases.

use anyhow::Result;
use std::fmt;

use super::error::HttpError;

/// A numeric HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HttpStatus(pub u16);

impl HttpStatus {
    // Range boundaries
    pub const INFORMATIONAL: u16 = 100;
    pub const SUCCESSFUL: u16 = 200;
    pub const REDIRECTION: u16 = 300;
    pub const CLIENT_ERROR: u16 = 400;
    pub const SERVER_ERROR: u16 = 500;
    pub const SERVER_ERROR_END: u16 = 600;

    // 1xx
    pub const CONTINUE: HttpStatus = HttpStatus(100);
    pub const SWITCHING_PROTOCOLS: HttpStatus = HttpStatus(101);
    // 2xx
    pub const OK: HttpStatus = HttpStatus(200);
    pub const CREATED: HttpStatus = HttpStatus(201);
    pub const ACCEPTED: HttpStatus = HttpStatus(202);
    pub const NON_AUTHORITATIVE_INFORMATION: HttpStatus = HttpStatus(203);
    pub const NO_CONTENT: HttpStatus = HttpStatus(204);
    pub const RESET_CONTENT: HttpStatus = HttpStatus(205);
    pub const PARTIAL_CONTENT: HttpStatus = HttpStatus(206);
    // 3xx
    pub const MULTIPLE_CHOICES: HttpStatus = HttpStatus(300);
    pub const MOVED_PERMANENTLY: HttpStatus = HttpStatus(301);
    pub const FOUND: HttpStatus = HttpStatus(302);
    pub const SEE_OTHER: HttpStatus = HttpStatus(303);
    pub const NOT_MODIFIED: HttpStatus = HttpStatus(304);
    pub const USE_PROXY: HttpStatus = HttpStatus(305);
    // 306 is reserved
    pub const TEMPORARY_REDIRECT: HttpStatus = HttpStatus(307);
    // 4xx
    pub const BAD_REQUEST: HttpStatus = HttpStatus(400);
    pub const UNAUTHORIZED: HttpStatus = HttpStatus(401);
    pub const PAYMENT_REQUIRED: HttpStatus = HttpStatus(402);
    pub const FORBIDDEN: HttpStatus = HttpStatus(403);
    pub const NOT_FOUND: HttpStatus = HttpStatus(404);
    pub const METHOD_NOT_ALLOWED: HttpStatus = HttpStatus(405);
    pub const NOT_ACCEPTABLE: HttpStatus = HttpStatus(406);
    pub const PROXY_AUTHENTICATION_REQUIRED: HttpStatus = HttpStatus(407);
    pub const REQUEST_TIMEOUT: HttpStatus = HttpStatus(408);
    pub const CONFLICT: HttpStatus = HttpStatus(409);
    pub const GONE: HttpStatus = HttpStatus(410);
    pub const LENGTH_REQUIRED: HttpStatus = HttpStatus(411);
    pub const PRECONDITION_FAILED: HttpStatus = HttpStatus(412);
    pub const REQUEST_ENTITY_TOO_LARGE: HttpStatus = HttpStatus(413);
    pub const REQUEST_URI_TOO_LONG: HttpStatus = HttpStatus(414);
    pub const UNSUPPORTED_MEDIA_TYPE: HttpStatus = HttpStatus(415);
    pub const REQUESTED_RANGE_NOT_SATISFIABLE: HttpStatus = HttpStatus(416);
    pub const EXPECTATION_FAILED: HttpStatus = HttpStatus(417);
    // 5xx
    pub const INTERNAL_SERVER_ERROR: HttpStatus = HttpStatus(500);
    pub const NOT_IMPLEMENTED: HttpStatus = HttpStatus(501);
    pub const BAD_GATEWAY: HttpStatus = HttpStatus(502);
    pub const SERVICE_UNAVAILABLE: HttpStatus = HttpStatus(503);
    pub const GATEWAY_TIMEOUT: HttpStatus = HttpStatus(504);
    pub const HTTP_VERSION_NOT_SUPPORTED: HttpStatus = HttpStatus(505);

    pub fn as_u16(self) -> u16 {
        self.0
    }

    /// 1xx
    pub fn is_informational(self) -> bool {
        (Self::INFORMATIONAL..Self::SUCCESSFUL).contains(&self.0)
    }

    /// 2xx
    pub fn is_successful(self) -> bool {
        (Self::SUCCESSFUL..Self::REDIRECTION).contains(&self.0)
    }

    /// 3xx
    pub fn is_redirection(self) -> bool {
        (Self::REDIRECTION..Self::CLIENT_ERROR).contains(&self.0)
    }

    /// 4xx
    pub fn is_client_error(self) -> bool {
        (Self::CLIENT_ERROR..Self::SERVER_ERROR).contains(&self.0)
    }

    /// 5xx
    pub fn is_server_error(self) -> bool {
        (Self::SERVER_ERROR..Self::SERVER_ERROR_END).contains(&self.0)
    }

    /// Either a client or a server error.
    pub fn is_error(self) -> bool {
        (Self::CLIENT_ERROR..Self::SERVER_ERROR_END).contains(&self.0)
    }

    /// Returns the standard reason phrase, or an `InvalidArgument` error for
    /// codes without one.
    pub fn reason_phrase(self) -> Result<&'static str> {
        reason_phrase(self.0)
            .ok_or_else(|| HttpError::invalid_argument(format!("Invalid status code {}", self.0)))
    }
}

impl From<u16> for HttpStatus {
    fn from(code: u16) -> Self {
        HttpStatus(code)
    }
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match reason_phrase(self.0) {
            Some(reason) => write!(f, "{} {}", self.0, reason),
            None => write!(f, "{}", self.0),
        }
    }
}

fn reason_phrase(code: u16) -> Option<&'static str> {
    let phrase = match code {
        100 => "Continue",
        101 => "Switching Protocols",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        203 => "Non-Authoritative Information",
        204 => "No Content",
        205 => "Reset Content",
        206 => "Partial Content",
        300 => "Multiple Choices",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        305 => "Use Proxy",
        307 => "Temporary Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        402 => "Payment Required",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        407 => "Proxy Authentication Required",
        408 => "Request Time-out",
        409 => "Conflict",
        410 => "Gone",
        411 => "Length Required",
        412 => "Precondition Failed",
        413 => "Request Entity Too Large",
        414 => "Request-URI Too Long",
        415 => "Unsupported Media Type",
        416 => "Requested Range Not Satisfiable",
        417 => "Expectation Failed",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        505 => "HTTP Version Not Supported",
        _ => return None,
    };
    Some(phrase)
}
