//! Line and block primitives shared by all probe parsers.
//!
//! Every multi-line grammar in this crate reduces to the same few moves:
//! classify a line as blank/separator/key-value/opaque text, split at the
//! first `:` or `=`, strip surrounding quotes, and accumulate ordered
//! key-value blocks. Nothing here can fail; a line that matches no form is
//! handed back to the caller as opaque text.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Classification of a single input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty or whitespace-only.
    Blank,
    /// Three or more repeated `=` or `-` characters.
    Separator,
    /// `key: value` candidate, split at the first colon.
    KeyValue { key: &'a str, value: &'a str },
    /// Anything else, passed through untouched.
    Text(&'a str),
}

/// Classify one line. Key-value candidates split at the first `:`.
pub fn classify_line(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if is_separator(trimmed) {
        return LineKind::Separator;
    }
    match split_key_value(trimmed, ':') {
        Some((key, value)) => LineKind::KeyValue { key, value },
        None => LineKind::Text(trimmed),
    }
}

/// Whether a line is a separator: three or more repeats of `=` or `-`.
pub fn is_separator(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 3
        && (trimmed.bytes().all(|b| b == b'=') || trimmed.bytes().all(|b| b == b'-'))
}

/// Split a line at the first occurrence of `sep` into trimmed key and value.
///
/// The value has one layer of surrounding double quotes stripped. Returns
/// None when `sep` is absent or the key side is empty.
pub fn split_key_value(line: &str, sep: char) -> Option<(&str, &str)> {
    let idx = line.find(sep)?;
    let key = line[..idx].trim();
    if key.is_empty() {
        return None;
    }
    let value = strip_quotes(line[idx + sep.len_utf8()..].trim());
    Some((key, value))
}

/// Strip one layer of surrounding double quotes, then re-trim.
pub fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        s[1..s.len() - 1].trim()
    } else {
        s
    }
}

/// Ordered label-to-value mapping used as the common intermediate form.
///
/// Insertion order is source order; re-inserting an existing label
/// overwrites the value in place (last wins) without moving the entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValueBlock {
    entries: Vec<(String, String)>,
}

impl KeyValueBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a label-value pair, overwriting in place if the label exists.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for KeyValueBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for KeyValueBlock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BlockVisitor;

        impl<'de> Visitor<'de> for BlockVisitor {
            type Value = KeyValueBlock;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of string keys to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut block = KeyValueBlock::new();
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    block.insert(k, v);
                }
                Ok(block)
            }
        }

        deserializer.deserialize_map(BlockVisitor)
    }
}

impl FromIterator<(String, String)> for KeyValueBlock {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut block = KeyValueBlock::new();
        for (k, v) in iter {
            block.insert(k, v);
        }
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_blank_and_separator() {
        assert_eq!(classify_line("   "), LineKind::Blank);
        assert_eq!(classify_line("==="), LineKind::Separator);
        assert_eq!(classify_line("--------"), LineKind::Separator);
        // Mixed runs are not separators.
        assert_eq!(classify_line("=-="), LineKind::Text("=-="));
        // Too short.
        assert_eq!(classify_line("--"), LineKind::Text("--"));
    }

    #[test]
    fn test_classify_key_value() {
        assert_eq!(
            classify_line("Kernel Release: 6.1.0-18-amd64"),
            LineKind::KeyValue {
                key: "Kernel Release",
                value: "6.1.0-18-amd64"
            }
        );
    }

    #[test]
    fn test_split_on_equals() {
        assert_eq!(
            split_key_value("PRETTY_NAME=\"Debian GNU/Linux 12 (bookworm)\"", '='),
            Some(("PRETTY_NAME", "Debian GNU/Linux 12 (bookworm)"))
        );
    }

    #[test]
    fn test_split_first_occurrence_only() {
        assert_eq!(
            split_key_value("Namespace: time: 2", ':'),
            Some(("Namespace", "time: 2"))
        );
    }

    #[test]
    fn test_split_empty_key_rejected() {
        assert_eq!(split_key_value(": value", ':'), None);
        assert_eq!(split_key_value("no separator", ':'), None);
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("\"quoted\""), "quoted");
        assert_eq!(strip_quotes("plain"), "plain");
        assert_eq!(strip_quotes("\"unbalanced"), "\"unbalanced");
        assert_eq!(strip_quotes("\"\""), "");
    }

    #[test]
    fn test_kv_block_last_wins_in_place() {
        let mut block = KeyValueBlock::new();
        block.insert("a", "1");
        block.insert("b", "2");
        block.insert("a", "3");
        assert_eq!(block.get("a"), Some("3"));
        let order: Vec<&str> = block.iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn test_kv_block_serializes_as_map() {
        let mut block = KeyValueBlock::new();
        block.insert("Model Number", "Samsung SSD 990 PRO");
        let json = serde_json::to_string(&block).unwrap();
        assert_eq!(json, r#"{"Model Number":"Samsung SSD 990 PRO"}"#);
        let back: KeyValueBlock = serde_json::from_str(&json).unwrap();
        assert_eq!(back, block);
    }
}
