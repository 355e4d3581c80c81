//! Insertion-ordered source fingerprints.
//!
//! A [`FingerprintMap`] records, for every distinct source of a bundle, the
//! SHA-1 of its (transformed) content. Entries keep the position of their
//! first insertion, so the serialized manifest depends on which files were
//! bundled and in what order, not just on their contents.

use serde::Serialize;
use sha1::{Digest, Sha1};

use crate::bundler::Result;

/// One `(source, content hash)` pair.
///
/// The value is empty while the source is pending (seen but not yet hashed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FingerprintEntry {
    /// Source reference exactly as requested.
    #[serde(rename = "Key")]
    pub key: String,
    /// Lowercase hex SHA-1 of the source content.
    #[serde(rename = "Value")]
    pub value: String,
}

/// Ordered key/value map with set-or-update semantics and no deletion.
///
/// Lookups are linear; bundles list a handful of files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FingerprintMap {
    entries: Vec<FingerprintEntry>,
}

impl FingerprintMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `key` has been set.
    pub fn exists(&self, key: &str) -> bool {
        self.index_of(key).is_some()
    }

    /// Position of `key`, if present.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key)
    }

    /// Value stored for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index_of(key).map(|i| self.entries[i].value.as_str())
    }

    /// Updates `key` in place, or appends it when new.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.index_of(&key) {
            Some(at) => self.entries[at].value = value,
            None => self.entries.push(FingerprintEntry { key, value }),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[FingerprintEntry] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// Appends an entry without looking for an existing one.
    ///
    /// For callers that deduplicate on something finer than the key string.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push(FingerprintEntry {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Compact JSON form of the manifest: `[{"Key":..,"Value":..},..]`.
    ///
    /// An empty manifest is `null`, which keeps empty-bundle names equal to
    /// those produced by earlier builds of the same assets.
    pub fn to_manifest_json(&self) -> Result<String> {
        if self.is_empty() {
            return Ok("null".to_string());
        }
        Ok(serde_json::to_string(self)?)
    }

    /// Hex SHA-1 of the serialized manifest. This is the artifact's identity.
    pub fn manifest_digest(&self) -> Result<String> {
        let json = self.to_manifest_json()?;
        Ok(hex::encode(Sha1::digest(json.as_bytes())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_appends_new_keys_in_order() {
        let mut m = FingerprintMap::new();
        m.set("b.js", "");
        m.set("a.js", "");
        m.set("c.js", "");
        assert_eq!(m.keys().collect::<Vec<_>>(), vec!["b.js", "a.js", "c.js"]);
    }

    #[test]
    fn set_updates_in_place() {
        let mut m = FingerprintMap::new();
        m.set("a.js", "");
        m.set("b.js", "");
        m.set("a.js", "ffff");
        assert_eq!(m.len(), 2);
        assert_eq!(m.index_of("a.js"), Some(0));
        assert_eq!(m.get("a.js"), Some("ffff"));
    }

    #[test]
    fn duplicates_keep_first_seen_order() {
        let requests = [
            vec!["a.js", "b.js", "a.js", "c.js", "b.js"],
            vec!["a.js", "a.js", "b.js", "b.js", "c.js", "a.js"],
            vec!["a.js", "b.js", "c.js", "c.js", "b.js", "a.js"],
        ];
        for request in requests {
            let mut m = FingerprintMap::new();
            for key in request {
                if !m.exists(key) {
                    m.set(key, "");
                }
            }
            assert_eq!(m.keys().collect::<Vec<_>>(), vec!["a.js", "b.js", "c.js"]);
        }
    }

    #[test]
    fn missing_key() {
        let m = FingerprintMap::new();
        assert!(!m.exists("x"));
        assert_eq!(m.index_of("x"), None);
        assert_eq!(m.get("x"), None);
    }

    #[test]
    fn manifest_json_shape() {
        let mut m = FingerprintMap::new();
        m.set("tpl/views/1.js", "55a72fae552af377887c1ea69fb5305a824f7dd4");
        assert_eq!(
            m.to_manifest_json().unwrap(),
            r#"[{"Key":"tpl/views/1.js","Value":"55a72fae552af377887c1ea69fb5305a824f7dd4"}]"#
        );
    }

    #[test]
    fn manifest_digest_known_answer() {
        let mut m = FingerprintMap::new();
        m.set("tpl/views/1.js", "55a72fae552af377887c1ea69fb5305a824f7dd4");
        assert_eq!(
            m.manifest_digest().unwrap(),
            "cbe88841a0d1c699592e2a61e3ffa7c33b61a4f7"
        );
    }

    #[test]
    fn empty_manifest_digest() {
        let m = FingerprintMap::new();
        assert_eq!(m.to_manifest_json().unwrap(), "null");
        assert_eq!(
            m.manifest_digest().unwrap(),
            "2be88ca4242c76e8253ac62474851065032d6833"
        );
    }

    #[test]
    fn push_keeps_colliding_keys() {
        let mut m = FingerprintMap::new();
        m.push("a\u{fffd}.js", "01");
        m.push("a\u{fffd}.js", "02");
        assert_eq!(m.len(), 2);
        assert_eq!(m.get("a\u{fffd}.js"), Some("01"));
    }

    #[test]
    fn digest_depends_on_order() {
        let mut ab = FingerprintMap::new();
        ab.set("a", "01");
        ab.set("b", "02");
        let mut ba = FingerprintMap::new();
        ba.set("b", "02");
        ba.set("a", "01");
        assert_ne!(ab.manifest_digest().unwrap(), ba.manifest_digest().unwrap());
    }
}
