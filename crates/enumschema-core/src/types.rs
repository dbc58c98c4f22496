//! Domain types for enum schema generation.
//!
//! # Examples
//!
//! ```
//! use enumschema_core::{Entry, EntryList, TypeName};
//!
//! let type_name = TypeName::new("Fruit").unwrap();
//! let mut entries = EntryList::new();
//! entries.push(Entry::new("Apple", 0, false, "0"));
//! entries.push(Entry::new("Banana", 1, false, "1"));
//!
//! assert_eq!(type_name.as_str(), "Fruit");
//! assert_eq!(entries.display_names(), vec!["Apple", "Banana"]);
//! ```

use crate::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Name of the enumerated type being extracted.
///
/// Always non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TypeName(String);

impl TypeName {
    /// Creates a type name, rejecting empty or blank input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if `name` is empty after trimming.
    ///
    /// # Examples
    ///
    /// ```
    /// use enumschema_core::TypeName;
    ///
    /// assert!(TypeName::new("Fruit").is_ok());
    /// assert!(TypeName::new("  ").unwrap_err().is_config_error());
    /// ```
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(Error::ConfigError {
                message: "type name missing".to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the type name as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One member of the enumerated type.
///
/// `original_name` is fixed at construction; only the display name changes
/// as the entry moves through the transform pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    original_name: String,
    display_name: String,
    value: u64,
    signed: bool,
    source_text: String,
}

impl Entry {
    /// Creates an entry whose display name equals its declared identifier.
    ///
    /// `value` is the 64-bit pattern of the constant; `signed` tells
    /// consumers to reinterpret it as `i64`.
    #[must_use]
    pub fn new(
        original_name: impl Into<String>,
        value: u64,
        signed: bool,
        source_text: impl Into<String>,
    ) -> Self {
        let original_name = original_name.into();
        Self {
            display_name: original_name.clone(),
            original_name,
            value,
            signed,
            source_text: source_text.into(),
        }
    }

    /// Replaces the initial display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Declared identifier of the constant.
    #[must_use]
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Current display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Sets the display name.
    pub fn set_display_name(&mut self, display_name: impl Into<String>) {
        self.display_name = display_name.into();
    }

    /// Raw 64-bit pattern of the value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Whether the value must be read as `i64`.
    #[must_use]
    pub const fn is_signed(&self) -> bool {
        self.signed
    }

    /// Value reinterpreted as a signed integer.
    ///
    /// # Examples
    ///
    /// ```
    /// use enumschema_core::Entry;
    ///
    /// let entry = Entry::new("Neg", u64::MAX, true, "-1");
    /// assert_eq!(entry.signed_value(), -1);
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn signed_value(&self) -> i64 {
        self.value as i64
    }

    /// Canonical decimal text of the value, as produced by the checker.
    #[must_use]
    pub fn source_text(&self) -> &str {
        &self.source_text
    }
}

/// Ordered list of entries, in declaration order across files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EntryList(Vec<Entry>);

impl EntryList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends an entry, keeping insertion order.
    pub fn push(&mut self, entry: Entry) {
        self.0.push(entry);
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the list holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.0.iter()
    }

    /// Iterates mutably over the entries in order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Entry> {
        self.0.iter_mut()
    }

    /// Current display names, in order, duplicates included.
    #[must_use]
    pub fn display_names(&self) -> Vec<&str> {
        self.0.iter().map(Entry::display_name).collect()
    }
}

impl From<Vec<Entry>> for EntryList {
    fn from(entries: Vec<Entry>) -> Self {
        Self(entries)
    }
}

impl FromIterator<Entry> for EntryList {
    fn from_iter<T: IntoIterator<Item = Entry>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a EntryList {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for EntryList {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name_trims_whitespace() {
        let name = TypeName::new(" Fruit ").unwrap();
        assert_eq!(name.as_str(), "Fruit");
        assert_eq!(name.to_string(), "Fruit");
    }

    #[test]
    fn test_type_name_rejects_empty() {
        let err = TypeName::new("").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_entry_display_name_starts_as_original() {
        let mut entry = Entry::new("FBanana", 1, false, "1");
        assert_eq!(entry.display_name(), "FBanana");

        entry.set_display_name("banana");
        assert_eq!(entry.display_name(), "banana");
        assert_eq!(entry.original_name(), "FBanana");
    }

    #[test]
    fn test_entry_with_display_name() {
        let entry = Entry::new("Apple", 0, false, "0").with_display_name("apple");
        assert_eq!(entry.display_name(), "apple");
        assert_eq!(entry.original_name(), "Apple");
    }

    #[test]
    fn test_entry_unsigned_pattern() {
        let entry = Entry::new("Max", u64::MAX, false, "18446744073709551615");
        assert!(!entry.is_signed());
        assert_eq!(entry.value(), u64::MAX);
    }

    #[test]
    fn test_entry_list_keeps_order_and_duplicates() {
        let list: EntryList = vec![
            Entry::new("A", 0, true, "0").with_display_name("x"),
            Entry::new("B", 1, true, "1").with_display_name("x"),
            Entry::new("C", 2, true, "2"),
        ]
        .into_iter()
        .collect();

        assert_eq!(list.len(), 3);
        assert_eq!(list.display_names(), vec!["x", "x", "C"]);
    }

    #[test]
    fn test_entry_list_serializes_as_array() {
        let mut list = EntryList::new();
        list.push(Entry::new("A", 0, true, "0"));
        let json = serde_json::to_value(&list).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["original_name"], "A");
    }
}
