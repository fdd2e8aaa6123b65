//! Request bodies and their encoding according to the Content-Type.

use anyhow::Result;
use log::debug;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::LazyLock;

use super::error::HttpError;
use super::query::{encode_form, scalar_to_string};

pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
pub const JSON: &str = "application/json";
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

static BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)boundary\s*=\s*(?:"([^"]+)"|([^\s;"]+))"#).expect("valid boundary pattern")
});

static REPEATED_SEMICOLONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*;(?:\s*;)+").expect("valid semicolon pattern"));

/// The payload of a PUT, POST or DELETE request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Sent as-is.
    Text(String),
    /// Sent as-is.
    Bytes(Vec<u8>),
    /// Encoded according to the request's Content-Type.
    Structured(Value),
}

impl RequestBody {
    /// Serializes `value` into a structured body.
    pub fn structured<T: Serialize>(value: &T) -> Result<Self> {
        Ok(RequestBody::Structured(serde_json::to_value(value)?))
    }

    fn is_structured(&self) -> bool {
        match self {
            RequestBody::Structured(Value::String(_)) => false,
            RequestBody::Structured(_) => true,
            _ => false,
        }
    }

    /// Encodes the body for the wire.
    ///
    /// `content_type` is the request's Content-Type, if any. Structured
    /// bodies without one are form-encoded.
    pub fn encode(&self, content_type: Option<&str>) -> Result<Vec<u8>> {
        let value = match self {
            RequestBody::Text(text) => return Ok(text.clone().into_bytes()),
            RequestBody::Bytes(bytes) => return Ok(bytes.clone()),
            RequestBody::Structured(Value::String(text)) => return Ok(text.clone().into_bytes()),
            RequestBody::Structured(value) => value,
        };

        let Some(content_type) = content_type else {
            return Ok(encode_form(value).into_bytes());
        };

        let media_type = media_type(content_type);
        if media_type == JSON || media_type.ends_with("+json") {
            debug!("Encoding request body as JSON");
            Ok(serde_json::to_vec(value)?)
        } else if media_type == FORM_URLENCODED {
            debug!("Encoding request body as form data");
            Ok(encode_form(value).into_bytes())
        } else if media_type == MULTIPART_FORM_DATA {
            let boundary = parse_boundary(content_type)?;
            debug!("Encoding request body as multipart with boundary {}", boundary);
            Ok(multipart_body(value, &boundary).into_bytes())
        } else {
            Err(HttpError::invalid_argument(format!(
                "Cannot encode a structured body as '{}'",
                content_type
            )))
        }
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        RequestBody::Text(text.to_string())
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Text(text)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        RequestBody::Bytes(bytes)
    }
}

impl From<&[u8]> for RequestBody {
    fn from(bytes: &[u8]) -> Self {
        RequestBody::Bytes(bytes.to_vec())
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        RequestBody::Structured(value)
    }
}

/// Decides the Content-Type a request goes out with.
///
/// Returns `Some(FORM_URLENCODED)` when a body is present but no
/// Content-Type was set, which is what form-encoded structured bodies need.
pub(crate) fn implied_content_type(
    body: Option<&RequestBody>,
    content_type: Option<&str>,
) -> Option<&'static str> {
    match (body, content_type) {
        (Some(body), None) => {
            if body.is_structured() {
                debug!("No Content-Type set, defaulting structured body to form encoding");
            }
            Some(FORM_URLENCODED)
        }
        _ => None,
    }
}

/// Lower-cased media type without parameters: `Multipart/Form-Data; x=y`
/// becomes `multipart/form-data`.
pub fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Normalizes a Content-Type value, adding a boundary to `multipart/*`
/// types that lack one.
pub fn normalize_content_type(content_type: &str) -> String {
    let content_type = REPEATED_SEMICOLONS
        .replace_all(content_type.trim(), ";")
        .into_owned();
    if !media_type(&content_type).starts_with("multipart/")
        || content_type.to_ascii_lowercase().contains("boundary")
    {
        return content_type;
    }

    let base = content_type.trim_end_matches([';', ' ', '\t']);
    format!("{}; boundary=\"{}\"", base, generate_boundary())
}

fn generate_boundary() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Extracts the multipart boundary from a Content-Type value.
pub fn parse_boundary(content_type: &str) -> Result<String> {
    BOUNDARY
        .captures(content_type)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| {
            HttpError::invalid_argument(
                "The Content-Type is 'multipart/*' but does not define a boundary",
            )
        })
}

/// Builds a `multipart/form-data` body.
///
/// A field whose value is an object with `data` (and optionally `filename`)
/// becomes a file part. Null and empty fields are skipped.
pub fn multipart_body(fields: &Value, boundary: &str) -> String {
    let mut body = String::new();

    let entries: Vec<(String, &Value)> = match fields {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => Vec::new(),
    };

    for (name, value) in entries {
        let (data, filename) = match value {
            Value::Object(file) => (
                file.get("data").and_then(part_data).unwrap_or_default(),
                file.get("filename").and_then(scalar_to_string),
            ),
            other => match part_data(other) {
                Some(data) if !data.is_empty() => (data, None),
                _ => continue,
            },
        };

        body.push_str(&format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"",
            boundary,
            disposition_param(&name)
        ));
        if let Some(filename) = filename {
            body.push_str(&format!("; filename=\"{}\"", disposition_param(&filename)));
        }
        body.push_str(&format!("\r\n\r\n{}\r\n", data));
    }

    body.push_str(&format!("--{}--", boundary));
    body
}

/// Makes a value safe inside a quoted `Content-Disposition` parameter.
fn disposition_param(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .collect::<String>()
        .replace('"', "%22")
}

fn part_data(value: &Value) -> Option<String> {
    match value {
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
        scalar => scalar_to_string(scalar),
    }
}
