//! Template rendering context.
//!
//! Defines the data exposed to user templates: the target type, the
//! package it was found in and the ordered entries.
//!
//! # Examples
//!
//! ```
//! use enumschema_codegen::types::TemplateContext;
//! use enumschema_core::{Entry, EntryList, TypeName};
//!
//! let entries: EntryList = vec![Entry::new("Low", u64::MAX, true, "-1")].into();
//! let context = TemplateContext::new(&TypeName::new("Level").unwrap(), "levels", &entries);
//!
//! let json = serde_json::to_value(&context).unwrap();
//! assert_eq!(json["type_name"], "Level");
//! assert_eq!(json["entries"][0]["value"], -1);
//! ```

use enumschema_core::{Entry, EntryList, TypeName};
use serde::Serialize;

/// Context for rendering a user template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateContext {
    /// Name of the enumerated type
    pub type_name: String,
    /// Package clause of the compilation unit
    pub package: String,
    /// Entries in declaration order
    pub entries: Vec<EntryContext>,
}

impl TemplateContext {
    /// Builds the context from the final entry list.
    #[must_use]
    pub fn new(type_name: &TypeName, package: &str, entries: &EntryList) -> Self {
        Self {
            type_name: type_name.to_string(),
            package: package.to_string(),
            entries: entries.iter().map(EntryContext::from).collect(),
        }
    }
}

/// One entry as seen by templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryContext {
    /// Final display name
    pub name: String,
    /// Numeric value, signed or unsigned per `signed`
    pub value: EntryValue,
    /// Canonical decimal text of the value
    pub str: String,
    /// Declared identifier
    pub original_name: String,
    /// Whether the value is read as `i64`
    pub signed: bool,
}

impl From<&Entry> for EntryContext {
    fn from(entry: &Entry) -> Self {
        let value = if entry.is_signed() {
            EntryValue::Signed(entry.signed_value())
        } else {
            EntryValue::Unsigned(entry.value())
        };
        Self {
            name: entry.display_name().to_string(),
            value,
            str: entry.source_text().to_string(),
            original_name: entry.original_name().to_string(),
            signed: entry.is_signed(),
        }
    }
}

/// Entry value, serialized as a plain JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EntryValue {
    /// Two's complement reading of the bit pattern
    Signed(i64),
    /// Raw bit pattern
    Unsigned(u64),
}
