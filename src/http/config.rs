//! Defaults applied to every new request builder.

use log::{debug, warn};
use std::env;
use std::time::Duration;

use super::headers::Headers;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_TIMEOUT: &str = "FLUENT_HTTP_TIMEOUT";
pub const ENV_VERIFY_SSL: &str = "FLUENT_HTTP_VERIFY_SSL";
pub const ENV_HEADERS: &str = "FLUENT_HTTP_HEADERS";

/// Settings a builder starts from: headers sent with every request,
/// the connect timeout and whether TLS certificates are verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDefaults {
    pub headers: Headers,
    pub timeout: Duration,
    pub verify_ssl_certificate: bool,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            headers: Headers::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            verify_ssl_certificate: true,
        }
    }
}

impl RequestDefaults {
    /// Reads overrides from `FLUENT_HTTP_TIMEOUT`, `FLUENT_HTTP_VERIFY_SSL`
    /// and `FLUENT_HTTP_HEADERS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`RequestDefaults::from_env`] with a custom variable source.
    /// Invalid values are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut defaults = Self::default();

        if let Some(raw) = lookup(ENV_TIMEOUT) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => defaults.timeout = Duration::from_secs(secs),
                Err(_) => warn!("Ignoring invalid {}='{}'", ENV_TIMEOUT, raw),
            }
        }

        if let Some(raw) = lookup(ENV_VERIFY_SSL) {
            match parse_bool(&raw) {
                Some(verify) => defaults.verify_ssl_certificate = verify,
                None => warn!("Ignoring invalid {}='{}'", ENV_VERIFY_SSL, raw),
            }
        }

        if let Some(raw) = lookup(ENV_HEADERS) {
            for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
                match line.split_once(':') {
                    Some((name, value)) if !name.trim().is_empty() => {
                        defaults.headers.append(name.trim(), value.trim());
                    }
                    _ => warn!("Ignoring malformed default header '{}'", line),
                }
            }
        }

        debug!("Request defaults: {:?}", defaults);
        defaults
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let defaults = RequestDefaults::default();
        assert_eq!(defaults.timeout, Duration::from_secs(30));
        assert!(defaults.verify_ssl_certificate);
        assert!(defaults.headers.is_empty());
    }

    #[test]
    fn test_from_lookup_without_vars() {
        assert_eq!(
            RequestDefaults::from_lookup(lookup(&[])),
            RequestDefaults::default()
        );
    }

    #[test]
    fn test_from_lookup_overrides() {
        let defaults = RequestDefaults::from_lookup(lookup(&[
            (ENV_TIMEOUT, "5"),
            (ENV_VERIFY_SSL, "no"),
            (ENV_HEADERS, "X-Api-Key: secret\nAccept: application/json\n"),
        ]));

        assert_eq!(defaults.timeout, Duration::from_secs(5));
        assert!(!defaults.verify_ssl_certificate);
        assert_eq!(defaults.headers.get("x-api-key"), Some("secret"));
        assert_eq!(defaults.headers.get("Accept"), Some("application/json"));
    }

    #[test]
    fn test_from_lookup_ignores_invalid_values() {
        let defaults = RequestDefaults::from_lookup(lookup(&[
            (ENV_TIMEOUT, "soon"),
            (ENV_VERIFY_SSL, "maybe"),
            (ENV_HEADERS, "no colon here\n: empty name"),
        ]));

        assert_eq!(defaults, RequestDefaults::default());
    }
}
