//! Ordered, case-insensitive header multimap.

/// Header names mapped to every value they were given, in insertion order.
///
/// Lookups ignore ASCII case; the name is kept as first inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<HeaderEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HeaderEntry {
    key: String,
    name: String,
    values: Vec<String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value to `name`, keeping any values already present.
    pub fn append(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.position(name) {
            Some(idx) => self.entries[idx].values.push(value),
            None => self.entries.push(HeaderEntry {
                key: name.to_ascii_lowercase(),
                name: name.to_string(),
                values: vec![value],
            }),
        }
    }

    /// Replaces every value of `name` with `value`.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        match self.position(name) {
            Some(idx) => self.entries[idx].values = vec![value.into()],
            None => self.append(name, value),
        }
    }

    /// Removes `name`, returning its values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.position(name)
            .map(|idx| self.entries.remove(idx).values)
    }

    /// First value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Every value of `name`.
    pub fn get_all(&self, name: &str) -> Option<&[String]> {
        self.position(name)
            .map(|idx| self.entries[idx].values.as_slice())
    }

    /// Whether `name` has any value.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Iterates `(name, values)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|e| (e.name.as_str(), e.values.as_slice()))
    }

    /// One `(name, value)` pair per value, the way headers go on the wire.
    pub fn lines(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|e| {
            e.values
                .iter()
                .map(move |v| (e.name.as_str(), v.as_str()))
        })
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        let key = name.to_ascii_lowercase();
        self.entries.iter().position(|e| e.key == key)
    }
}

impl<N, V> FromIterator<(N, V)> for Headers
where
    N: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.append(name.as_ref(), value);
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_all_values() {
        let mut headers = Headers::new();
        headers.append("Accept", "text/html");
        headers.append("accept", "application/json");

        assert_eq!(headers.len(), 1);
        assert_eq!(
            headers.get_all("ACCEPT").unwrap(),
            &["text/html".to_string(), "application/json".to_string()]
        );
        assert_eq!(headers.get("Accept"), Some("text/html"));
    }

    #[test]
    fn test_name_case_is_preserved() {
        let mut headers = Headers::new();
        headers.append("X-Request-Id", "1");
        headers.append("x-request-id", "2");

        let names: Vec<&str> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["X-Request-Id"]);
    }

    #[test]
    fn test_set_replaces_values() {
        let mut headers = Headers::new();
        headers.append("Content-Type", "text/plain");
        headers.append("Content-Type", "text/html");
        headers.set("content-type", "application/json");

        assert_eq!(
            headers.get_all("Content-Type").unwrap(),
            &["application/json".to_string()]
        );
    }

    #[test]
    fn test_lines_flatten_in_order() {
        let headers: Headers = [("A", "1"), ("B", "2"), ("a", "3")].into_iter().collect();
        let lines: Vec<(&str, &str)> = headers.lines().collect();
        assert_eq!(lines, vec![("A", "1"), ("A", "3"), ("B", "2")]);
    }

    #[test]
    fn test_remove() {
        let mut headers = Headers::new();
        headers.append("Cookie", "a=1");
        assert_eq!(headers.remove("COOKIE"), Some(vec!["a=1".to_string()]));
        assert!(!headers.contains("Cookie"));
        assert!(headers.is_empty());
        assert_eq!(headers.remove("Cookie"), None);
    }
}
