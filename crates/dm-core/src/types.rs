use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{CoreError, Result};

/// Ordered string-to-string mapping. Keeps insertion order, which is also the
/// order fields are rendered in prompts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a key. Overwriting keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build from raw pairs, rejecting empty or repeated keys.
    pub fn try_from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut meta = Self::new();
        for (k, v) in pairs {
            let k = k.into();
            if k.is_empty() {
                return Err(CoreError::InvalidRecord("empty metadata key".into()));
            }
            if meta.get(&k).is_some() {
                return Err(CoreError::InvalidRecord(format!("duplicate metadata key: {k}")));
            }
            meta.entries.push((k, v.into()));
        }
        Ok(meta)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut meta = Self::new();
        for (k, v) in iter {
            meta.insert(k, v);
        }
        meta
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Metadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct MetadataVisitor;

        impl<'de> Visitor<'de> for MetadataVisitor {
            type Value = Metadata;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of string keys to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Metadata, A::Error> {
                let mut pairs: Vec<(String, String)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    pairs.push((k, v));
                }
                Metadata::try_from_pairs(pairs).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_map(MetadataVisitor)
    }
}

/// Immutable unit of reference knowledge stored in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Record {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Check the ingestion-time invariants of a record.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(CoreError::InvalidRecord("record id must not be empty".into()));
        }
        if self.metadata.keys().any(str::is_empty) {
            return Err(CoreError::InvalidRecord(format!(
                "record {} has an empty metadata key",
                self.id
            )));
        }
        Ok(())
    }
}
