//! An insertion-ordered map holding several values per key.
//!
//! Submitted form payloads repeat a key once per selected option of a
//! multi-select widget, and keys should come back out in the order the
//! browser sent them, so the form layer stores payloads in a
//! [`MultiValueDict`] rather than a plain map.

use std::borrow::Borrow;

/// A map from keys to lists of values, keeping keys in first-insertion order.
///
/// [`get`](MultiValueDict::get) returns the **last** value for a key, while
/// [`get_list`](MultiValueDict::get_list) returns all values in insertion
/// order. Lookups are linear; payloads are a few dozen keys at most.
///
/// # Examples
///
/// ```
/// use freeadmin_core::utils::MultiValueDict;
///
/// let mut d: MultiValueDict<String, String> = MultiValueDict::new();
/// d.append("cron_dayweek".into(), "1".into());
/// d.append("cron_dayweek".into(), "5".into());
/// d.append("cron_hour".into(), "*".into());
///
/// assert_eq!(d.get("cron_dayweek").map(String::as_str), Some("5"));
/// assert_eq!(d.get_list("cron_dayweek").map(<[String]>::len), Some(2));
/// assert_eq!(d.keys().collect::<Vec<_>>(), ["cron_dayweek", "cron_hour"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiValueDict<K, V> {
    entries: Vec<(K, Vec<V>)>,
}

impl<K, V> Default for MultiValueDict<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: Eq, V> MultiValueDict<K, V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.entries.iter().position(|(k, _)| k.borrow() == key)
    }

    /// Returns the last value for `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.get_list(key).and_then(<[V]>::last)
    }

    /// Returns every value for `key`, oldest first.
    pub fn get_list<Q>(&self, key: &Q) -> Option<&[V]>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.position(key).map(|i| self.entries[i].1.as_slice())
    }

    /// Replaces the values for `key` with `value`. A new key goes last.
    pub fn set(&mut self, key: K, value: V) {
        match self.position(&key) {
            Some(i) => self.entries[i].1 = vec![value],
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Adds `value` after the existing values for `key`.
    pub fn append(&mut self, key: K, value: V) {
        match self.position(&key) {
            Some(i) => self.entries[i].1.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Removes `key`, returning its values.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<Vec<V>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    /// Returns `true` if `key` has any value.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.position(key).is_some()
    }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Iterates over `(key, values)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &[V])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Eq, V> FromIterator<(K, V)> for MultiValueDict<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut d = Self::new();
        for (k, v) in iter {
            d.append(k, v);
        }
        d
    }
}
