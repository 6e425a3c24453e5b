//! Ordered string map with case-insensitive keys.

use thiserror::Error;

/// Error for a header or parameter key that cannot be used.
///
/// Keys must contain at least one non-whitespace character. This is a
/// configuration error: it is surfaced before any network activity, either
/// synchronously from the map API or by the terminal send operation when the
/// key was supplied through a fluent builder setter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid key {key:?}: keys must not be empty or blank")]
pub struct InvalidKeyError {
    key: String,
}

impl InvalidKeyError {
    /// Returns the offending key as it was supplied.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// An ordered mapping from string key to string value with case-insensitive
/// key comparison.
///
/// Keys are lowercased before every lookup, insertion, and containment
/// check. Iteration yields entries in the order their normalized keys were
/// first inserted; inserting an existing key under a different casing
/// replaces the value in place and keeps the original position.
///
/// This is a dedicated container rather than a wrapper around a generic map
/// so that ordering and normalization behave the same everywhere the client
/// needs them: headers, query parameters, and path parameters.
///
/// # Example
///
/// ```
/// use webclient::headers::CaseInsensitiveMap;
///
/// let mut map = CaseInsensitiveMap::new();
/// map.insert("Content-Type", "application/json").unwrap();
/// map.insert("CONTENT-TYPE", "text/plain").unwrap();
///
/// assert_eq!(map.len(), 1);
/// assert_eq!(map.get("content-type"), Some("text/plain"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseInsensitiveMap {
    entries: Vec<(String, String)>,
}

impl CaseInsensitiveMap {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Normalizes a key for storage and comparison.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidKeyError`] if the key is empty or all-whitespace.
    fn normalize(key: &str) -> Result<String, InvalidKeyError> {
        if key.trim().is_empty() {
            return Err(InvalidKeyError {
                key: key.to_string(),
            });
        }
        Ok(key.to_lowercase())
    }

    /// Inserts a key/value pair, replacing any existing value for the same
    /// normalized key.
    ///
    /// Returns the previous value if the key was already present. The entry
    /// keeps the position of its first insertion.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidKeyError`] if the key is empty or all-whitespace.
    pub fn insert(
        &mut self,
        key: impl AsRef<str>,
        value: impl Into<String>,
    ) -> Result<Option<String>, InvalidKeyError> {
        let key = Self::normalize(key.as_ref())?;
        let value = value.into();

        if let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Ok(Some(std::mem::replace(existing, value)));
        }

        self.entries.push((key, value));
        Ok(None)
    }

    /// Returns the value for the given key, comparing case-insensitively.
    ///
    /// Unusable keys (empty/blank) simply miss rather than erroring.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = Self::normalize(key).ok()?;
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if the map contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Removes the entry for the given key, returning its value if present.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let key = Self::normalize(key).ok()?;
        let index = self.entries.iter().position(|(k, _)| *k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    ///
    /// Keys are yielded in their normalized (lowercase) form.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Inserts every pair from `iter`, applying the same normalization and
    /// overwrite rules as [`insert`](Self::insert).
    ///
    /// # Errors
    ///
    /// Returns [`InvalidKeyError`] on the first unusable key; entries before
    /// it are kept.
    pub fn try_extend<K, V, I>(&mut self, iter: I) -> Result<(), InvalidKeyError>
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in iter {
            self.insert(key, value)?;
        }
        Ok(())
    }

    /// Builds a map from `(key, value)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidKeyError`] if any key is empty or all-whitespace.
    pub fn try_from_iter<K, V, I>(iter: I) -> Result<Self, InvalidKeyError>
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = Self::new();
        map.try_extend(iter)?;
        Ok(map)
    }
}

impl<'a> IntoIterator for &'a CaseInsensitiveMap {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}
