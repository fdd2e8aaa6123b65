//! Request builder, response model and the helpers they share.

mod body;
mod config;
mod cookie;
mod error;
mod headers;
mod method;
mod query;
mod request;
mod response;
mod status;
mod xml;

pub use body::{
    FORM_URLENCODED, JSON, MULTIPART_FORM_DATA, RequestBody, media_type, multipart_body,
    normalize_content_type, parse_boundary,
};
pub use config::{DEFAULT_TIMEOUT_SECS, ENV_HEADERS, ENV_TIMEOUT, ENV_VERIFY_SSL, RequestDefaults};
pub use cookie::Cookie;
pub use error::HttpError;
pub use headers::Headers;
pub use method::HttpMethod;
pub use query::{build_url, encode_form, encode_pairs};
pub use request::HttpRequest;
pub use response::{Content, HttpResponse};
pub use status::HttpStatus;
pub use xml::XmlNode;
