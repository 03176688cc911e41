//! Insertion-ordered supporting character mapping.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde::ser::SerializeMap;

/// Supporting character name → description, in first-insertion order.
///
/// Keys are case-sensitive. Inserting an existing name replaces its
/// description in place (last write wins, position kept).
///
/// # Examples
///
/// ```
/// use kidbook_core::SupportingCast;
///
/// let mut cast = SupportingCast::default();
/// cast.insert("Pip", "a small grey owl");
/// cast.insert("Luna", "a silver cat");
/// cast.insert("Pip", "a small grey owl with a red scarf");
///
/// assert_eq!(cast.len(), 2);
/// assert_eq!(cast.get("Pip"), Some("a small grey owl with a red scarf"));
/// assert_eq!(cast.names().collect::<Vec<_>>(), vec!["Pip", "Luna"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupportingCast {
    entries: Vec<(String, String)>,
}

impl SupportingCast {
    /// Insert or replace a character description.
    pub fn insert(&mut self, name: impl Into<String>, description: impl Into<String>) {
        let name = name.into();
        let description = description.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = description,
            None => self.entries.push((name, description)),
        }
    }

    /// Insert after trimming both parts; blank names or descriptions are ignored.
    ///
    /// Returns whether the entry was accepted.
    pub fn insert_trimmed(&mut self, name: &str, description: &str) -> bool {
        let (name, description) = (name.trim(), description.trim());
        if name.is_empty() || description.is_empty() {
            return false;
        }
        self.insert(name, description);
        true
    }

    /// Apply every entry of `overrides`, which win on name collision.
    pub fn merge(&mut self, overrides: &SupportingCast) {
        for (name, description) in overrides.iter() {
            self.insert_trimmed(name, description);
        }
    }

    /// Look up a description by exact name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, description)| description.as_str())
    }

    /// Iterate over `(name, description)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, description)| (name.as_str(), description.as_str()))
    }

    /// Iterate over names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no characters are declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for SupportingCast
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut cast = SupportingCast::default();
        for (name, description) in iter {
            cast.insert(name, description);
        }
        cast
    }
}

impl Serialize for SupportingCast {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, description) in &self.entries {
            map.serialize_entry(name, description)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SupportingCast {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CastVisitor;

        impl<'de> serde::de::Visitor<'de> for CastVisitor {
            type Value = SupportingCast;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "a mapping of character names to descriptions")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut cast = SupportingCast::default();
                while let Some((name, description)) = access.next_entry::<String, String>()? {
                    cast.insert(name, description);
                }
                Ok(cast)
            }
        }

        deserializer.deserialize_map(CastVisitor)
    }
}
