//! Case-insensitive, multi-valued string map used for headers, cookies
//! and query parameters. Grounded in pion's `ihash_multimap`: a
//! `std::multimap` keyed by a case-insensitive string comparator, which
//! preserves insertion order among entries sharing the same key.

#[allow(unused_imports)]
use std::ascii::AsciiExt;

/// A multimap preserving insertion order within each key's equal range.
///
/// Keys are compared ASCII case-insensitively; the original case of the
/// first-inserted key is kept for iteration/serialization, but lookups
/// never depend on case.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: Vec<(String, String)>,
}

impl Dictionary {
    pub fn new() -> Dictionary {
        Dictionary { entries: Vec::new() }
    }

    fn key_eq(a: &str, b: &str) -> bool {
        a.eq_ignore_ascii_case(b)
    }

    /// Appends a new entry; does not remove any existing entry for `key`.
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.entries.push((key.into(), value.into()));
    }

    /// Returns the first-inserted value for `key`, or `""` if absent.
    pub fn find(&self, key: &str) -> &str {
        self.entries.iter()
            .find(|&&(ref k, _)| Dictionary::key_eq(k, key))
            .map(|&(_, ref v)| v.as_str())
            .unwrap_or("")
    }

    /// Returns all values for `key`, in insertion order.
    pub fn equal_range<'a>(&'a self, key: &'a str) -> Vec<&'a str> {
        self.entries.iter()
            .filter(move |&&(ref k, _)| Dictionary::key_eq(k, key))
            .map(|&(_, ref v)| v.as_str())
            .collect()
    }

    /// Replaces all entries for `key` with a single entry holding `value`.
    pub fn change<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        self.delete(&key);
        self.insert(key, value);
    }

    /// Removes every entry for `key`.
    pub fn delete(&mut self, key: &str) {
        self.entries.retain(|&(ref k, _)| !Dictionary::key_eq(k, key));
    }

    /// True if at least one entry for `key` exists.
    pub fn has(&self, key: &str) -> bool {
        self.entries.iter().any(|&(ref k, _)| Dictionary::key_eq(k, key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates all `(key, value)` pairs in insertion order, for
    /// serialization on the send side.
    pub fn iter(&self) -> ::std::slice::Iter<(String, String)> {
        self.entries.iter()
    }
}
