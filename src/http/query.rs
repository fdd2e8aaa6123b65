//! URL assembly and `application/x-www-form-urlencoded` encoding.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use url::form_urlencoded::Serializer;

// A run of slashes not directly preceded by a scheme colon.
static DUPLICATE_SLASHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^:])(/{2,})").expect("valid slash pattern"));

// `name[3]` after percent-encoding.
static INDEXED_BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)%5B[0-9]+%5D").expect("valid bracket pattern"));

/// Joins base URL, path and query parameters into a request URL.
///
/// Duplicate slashes are collapsed (the `//` after a scheme survives) and
/// indexed array keys lose their index, so `ids[0]=1` is sent as `ids[]=1`.
pub fn build_url(base_url: &str, path: &str, parameters: &[(String, String)]) -> String {
    let mut url = base_url.to_string();
    if !path.is_empty() {
        url.push('/');
        url.push_str(path);
    }

    if !parameters.is_empty() {
        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str(&encode_pairs(parameters));
    }

    let url = DUPLICATE_SLASHES.replace_all(&url, "$1/");
    INDEXED_BRACKETS.replace_all(&url, "%5B%5D").into_owned()
}

/// Form-encodes flat `(name, value)` pairs, spaces becoming `+`.
pub fn encode_pairs<K, V>(pairs: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut serializer = Serializer::new(String::new());
    for (name, value) in pairs {
        serializer.append_pair(name.as_ref(), value.as_ref());
    }
    serializer.finish()
}

/// Form-encodes a structured value.
///
/// Nested objects and arrays use bracketed keys (`user[name]=x`,
/// `ids[0]=1`), booleans become `1`/`0` and nulls are left out. A bare
/// scalar is encoded on its own.
pub fn encode_form(value: &Value) -> String {
    match value {
        Value::Object(_) | Value::Array(_) => {
            let mut pairs = Vec::new();
            flatten(None, value, &mut pairs);
            encode_pairs(&pairs)
        }
        other => scalar_to_string(other).unwrap_or_default(),
    }
}

fn flatten(prefix: Option<&str>, value: &Value, out: &mut Vec<(String, String)>) {
    let key_for = |k: &str| match prefix {
        Some(p) => format!("{}[{}]", p, k),
        None => k.to_string(),
    };

    match value {
        Value::Object(map) => {
            for (k, v) in map {
                flatten(Some(&key_for(k)), v, out);
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                flatten(Some(&key_for(&i.to_string())), v, out);
            }
        }
        scalar => {
            if let (Some(p), Some(s)) = (prefix, scalar_to_string(scalar)) {
                out.push((p.to_string(), s));
            }
        }
    }
}

/// String form of a JSON scalar, `None` for null and containers.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some("0".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_build_url_with_path() {
        assert_eq!(build_url("https://host", "get", &[]), "https://host/get");
        assert_eq!(build_url("https://host", "", &[]), "https://host");
    }

    #[test]
    fn test_build_url_encodes_parameters() {
        let url = build_url(
            "https://host",
            "get",
            &params(&[("param1", "value1"), ("param 2", "value2")]),
        );
        assert_eq!(url, "https://host/get?param1=value1&param+2=value2");
    }

    #[test]
    fn test_build_url_collapses_slashes() {
        assert_eq!(
            build_url("https://host/", "/api//v1/", &[]),
            "https://host/api/v1/"
        );
        assert_eq!(build_url("http://host", "", &[]), "http://host");
    }

    #[test]
    fn test_build_url_allows_two_slashes_after_colon() {
        assert_eq!(build_url("file:///tmp", "x", &[]), "file://tmp/x");
    }

    #[test]
    fn test_build_url_appends_to_existing_query() {
        let url = build_url("https://host", "cookies/set?k1=v1", &params(&[("k2", "v2")]));
        assert_eq!(url, "https://host/cookies/set?k1=v1&k2=v2");
    }

    #[test]
    fn test_build_url_strips_array_indexes() {
        let url = build_url(
            "https://host",
            "search",
            &params(&[("tag[0]", "a"), ("tag[12]", "b")]),
        );
        assert_eq!(url, "https://host/search?tag%5B%5D=a&tag%5B%5D=b");
    }

    #[test]
    fn test_encode_form_flat_object() {
        let body = encode_form(&json!({"param1": "value1", "param2": "value 2"}));
        assert_eq!(body, "param1=value1&param2=value+2");
    }

    #[test]
    fn test_encode_form_nested() {
        let body = encode_form(&json!({
            "user": {"name": "ann"},
            "ids": [1, 2],
            "active": true,
            "skip": null
        }));
        assert_eq!(
            body,
            "user%5Bname%5D=ann&ids%5B0%5D=1&ids%5B1%5D=2&active=1"
        );
    }

    #[test]
    fn test_encode_form_scalar() {
        assert_eq!(encode_form(&json!(42)), "42");
        assert_eq!(encode_form(&Value::Null), "");
    }
}
