//! Submitted form payloads.
//!
//! [`FormData`] is the raw key/value data a form is bound to: the decoded
//! body of an `application/x-www-form-urlencoded` POST, or pairs assembled
//! by an API layer.

use freeadmin_core::utils::MultiValueDict;
use percent_encoding::percent_decode_str;

/// Raw submitted form data, possibly with several values per key.
///
/// # Examples
///
/// ```
/// use freeadmin_forms::data::FormData;
///
/// let data = FormData::parse("gc_hostname=nas%2Da&cron_dayweek=1&cron_dayweek=5");
/// assert_eq!(data.get("gc_hostname"), Some("nas-a"));
/// assert_eq!(data.get_list("cron_dayweek"), vec!["1", "5"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    data: MultiValueDict<String, String>,
}

impl FormData {
    /// Creates an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a url-encoded body such as `"a=1&b=two+words"`.
    ///
    /// `+` decodes to a space; malformed percent sequences are kept as-is.
    pub fn parse(body: &str) -> Self {
        let data = body
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode(key), decode(value))
            })
            .collect();
        Self { data }
    }

    /// Builds a payload from key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            data: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns the last value submitted for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Returns every value submitted for `key` (empty when absent).
    pub fn get_list(&self, key: &str) -> Vec<&str> {
        self.data
            .get_list(key)
            .map(|values| values.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Replaces the values for `key` with a single value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.set(key.into(), value.into());
    }

    /// Appends a value for `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.append(key.into(), value.into());
    }

    /// Returns `true` if any value was submitted for `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Returns an iterator over submitted keys, in submission order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    /// Returns `true` if nothing was submitted.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

fn decode(s: &str) -> String {
    let spaced = s.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plus_and_percent() {
        let data = FormData::parse("name=two+words&path=%2Fmnt%2Ftank");
        assert_eq!(data.get("name"), Some("two words"));
        assert_eq!(data.get("path"), Some("/mnt/tank"));
    }

    #[test]
    fn test_parse_empty_and_bare_keys() {
        let data = FormData::parse("&flag&x=");
        assert_eq!(data.get("flag"), Some(""));
        assert_eq!(data.get("x"), Some(""));
        assert!(!data.contains_key(""));
    }

    #[test]
    fn test_parse_empty_body() {
        assert!(FormData::parse("").is_empty());
    }

    #[test]
    fn test_from_pairs_and_get_list() {
        let data = FormData::from_pairs([("m", "1"), ("m", "2")]);
        assert_eq!(data.get("m"), Some("2"));
        assert_eq!(data.get_list("m"), vec!["1", "2"]);
        assert!(data.get_list("missing").is_empty());
    }

    #[test]
    fn test_set_and_append() {
        let mut data = FormData::new();
        data.append("a", "1");
        data.append("a", "2");
        data.set("a", "3");
        assert_eq!(data.get_list("a"), vec!["3"]);
        assert_eq!(data.keys().count(), 1);
    }

    #[test]
    fn test_keys_in_submission_order() {
        let data = FormData::parse("z=1&a=2&z=3&m=4");
        assert_eq!(data.keys().collect::<Vec<_>>(), ["z", "a", "m"]);
    }
}
