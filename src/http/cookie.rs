//! `Set-Cookie` parsing.

use log::debug;
use std::time::SystemTime;

/// A cookie parsed from a single `Set-Cookie` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    name: String,
    value: String,
    expires: Option<SystemTime>,
    max_age: Option<i64>,
    domain: Option<String>,
    path: String,
    secure: bool,
    http_only: bool,
    same_site: Option<String>,
}

impl Default for Cookie {
    fn default() -> Self {
        Self {
            name: String::new(),
            value: String::new(),
            expires: None,
            max_age: None,
            domain: None,
            path: "/".to_string(),
            secure: false,
            http_only: true,
            same_site: None,
        }
    }
}

impl Cookie {
    /// Parses `name=value; Attr=val; Flag` into a cookie.
    ///
    /// Attribute names are matched case-insensitively. Any pair that is not a
    /// known attribute is taken as the cookie's name and value. Unknown bare
    /// flags such as `Partitioned` are ignored.
    pub fn parse(set_cookie: &str) -> Self {
        let mut cookie = Cookie::default();

        for part in set_cookie.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let (key, value, is_pair) = match part.split_once('=') {
                Some((k, v)) => (k.trim(), v.trim(), true),
                None => (part, "", false),
            };

            match key.to_ascii_lowercase().as_str() {
                "expires" => {
                    cookie.expires = httpdate::parse_http_date(value).ok();
                    if cookie.expires.is_none() {
                        debug!("Ignoring unparsable cookie expiry '{}'", value);
                    }
                }
                "max-age" => cookie.max_age = value.parse().ok(),
                "domain" => cookie.domain = Some(value.to_string()),
                "path" => cookie.path = value.to_string(),
                "secure" => cookie.secure = true,
                "httponly" => cookie.http_only = true,
                "samesite" => cookie.same_site = Some(value.to_string()),
                _ if is_pair => {
                    cookie.name = key.to_string();
                    cookie.value = value.to_string();
                }
                _ => debug!("Ignoring unknown cookie flag '{}'", key),
            }
        }

        cookie
    }

    /// The cookie name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The cookie value, empty when the server cleared it.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Absolute expiry from the `Expires` attribute.
    pub fn expires(&self) -> Option<SystemTime> {
        self.expires
    }

    /// Lifetime in seconds from the `Max-Age` attribute.
    pub fn max_age(&self) -> Option<i64> {
        self.max_age
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Defaults to `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn secure(&self) -> bool {
        self.secure
    }

    /// Always true; the attribute only confirms the default.
    pub fn http_only(&self) -> bool {
        self.http_only
    }

    pub fn same_site(&self) -> Option<&str> {
        self.same_site.as_deref()
    }

    /// Whether the server asked for the cookie to be dropped, either by an
    /// empty value, a non-positive Max-Age or an expiry at or before `now`.
    pub fn is_removal(&self, now: SystemTime) -> bool {
        self.value.is_empty()
            || self.max_age.is_some_and(|age| age <= 0)
            || self.expires.is_some_and(|at| at <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_parse_session_cookie() {
        let cookie = Cookie::parse("session=abc; Path=/; HttpOnly");
        assert_eq!(cookie.name(), "session");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.path(), "/");
        assert!(cookie.http_only());
        assert!(!cookie.secure());
        assert_eq!(cookie.domain(), None);
    }

    #[test]
    fn test_parse_all_attributes() {
        let cookie = Cookie::parse(
            "id=a3fWa; Expires=Wed, 21 Oct 2015 07:28:00 GMT; Max-Age=3600; \
             Domain=example.com; Path=/docs; Secure; SameSite=Strict",
        );
        assert_eq!(cookie.name(), "id");
        assert_eq!(cookie.value(), "a3fWa");
        assert_eq!(
            cookie.expires(),
            Some(UNIX_EPOCH + Duration::from_secs(1_445_412_480))
        );
        assert_eq!(cookie.max_age(), Some(3600));
        assert_eq!(cookie.domain(), Some("example.com"));
        assert_eq!(cookie.path(), "/docs");
        assert!(cookie.secure());
        assert_eq!(cookie.same_site(), Some("Strict"));
    }

    #[test]
    fn test_attribute_names_are_case_insensitive() {
        let cookie = Cookie::parse("k=v; path=/a; secure; samesite=lax; DOMAIN=x.org");
        assert_eq!(cookie.path(), "/a");
        assert!(cookie.secure());
        assert_eq!(cookie.same_site(), Some("lax"));
        assert_eq!(cookie.domain(), Some("x.org"));
    }

    #[test]
    fn test_defaults() {
        let cookie = Cookie::parse("k=v");
        assert_eq!(cookie.path(), "/");
        assert!(cookie.http_only());
        assert!(!cookie.secure());
        assert_eq!(cookie.max_age(), None);
        assert_eq!(cookie.expires(), None);
    }

    #[test]
    fn test_value_may_contain_equals() {
        let cookie = Cookie::parse("token=YWJj==; Path=/");
        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "YWJj==");
    }

    #[test]
    fn test_invalid_expiry_and_max_age_are_ignored() {
        let cookie = Cookie::parse("k=v; Expires=tomorrow; Max-Age=soon");
        assert_eq!(cookie.expires(), None);
        assert_eq!(cookie.max_age(), None);
        assert_eq!(cookie.value(), "v");
    }

    #[test]
    fn test_unknown_flags_do_not_replace_the_cookie() {
        let cookie = Cookie::parse("id=42; Path=/; Secure; Partitioned");
        assert_eq!(cookie.name(), "id");
        assert_eq!(cookie.value(), "42");
        assert!(cookie.secure());
        assert!(!cookie.is_removal(UNIX_EPOCH));
    }

    #[test]
    fn test_is_removal() {
        let now = UNIX_EPOCH + Duration::from_secs(2_000_000_000);
        assert!(Cookie::parse("k=; Path=/").is_removal(now));
        assert!(Cookie::parse("k=v; Max-Age=0").is_removal(now));
        assert!(Cookie::parse("k=v; Expires=Thu, 01 Jan 1970 00:00:00 GMT").is_removal(now));
        assert!(!Cookie::parse("k=v; Max-Age=60").is_removal(now));
    }
}
