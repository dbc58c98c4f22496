//! Configuration types for a generation run.
//!
//! # Examples
//!
//! ```
//! use enumschema_core::{GenerateConfig, RenderSpec, Transform, TransformSpec, TypeName};
//!
//! let config = GenerateConfig::new(TypeName::new("Fruit").unwrap())
//!     .with_transform(
//!         TransformSpec::default()
//!             .with_trim_prefix("F")
//!             .with_transform(Transform::from_selector("snake")),
//!     )
//!     .with_render(RenderSpec::template("enum.hbs"));
//!
//! assert_eq!(config.transform.transform, Transform::Snake);
//! assert!(config.render.is_template());
//! ```

use crate::{Error, Result, TypeName};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Case function applied to every display name.
///
/// Unknown selectors map to [`Transform::Identity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Transform {
    /// Leave the name unchanged
    #[default]
    Identity,
    /// `lower_snake_case`
    Snake,
    /// `UPPER_SNAKE_CASE`
    SnakeUpper,
    /// `lower-kebab-case`
    Kebab,
    /// `UPPER-KEBAB-CASE`
    KebabUpper,
    /// Upper-case every character
    Upper,
    /// Lower-case every character
    Lower,
    /// Upper-case the first letter of every word
    Title,
    /// Title case with a lower-cased first character
    TitleLower,
    /// Keep only the first character
    First,
    /// Keep only the first character, upper-cased
    FirstUpper,
    /// Keep only the first character, lower-cased
    FirstLower,
    /// `lower space delimited`
    Whitespace,
}

impl Transform {
    /// Selects a transform by name, case-insensitively.
    ///
    /// # Examples
    ///
    /// ```
    /// use enumschema_core::Transform;
    ///
    /// assert_eq!(Transform::from_selector("SNAKE-upper"), Transform::SnakeUpper);
    /// assert_eq!(Transform::from_selector("camel"), Transform::Identity);
    /// ```
    #[must_use]
    pub fn from_selector(selector: &str) -> Self {
        match selector.trim().to_lowercase().as_str() {
            "snake" => Self::Snake,
            "snake_upper" | "snake-upper" => Self::SnakeUpper,
            "kebab" => Self::Kebab,
            "kebab_upper" | "kebab-upper" => Self::KebabUpper,
            "upper" => Self::Upper,
            "lower" => Self::Lower,
            "title" => Self::Title,
            "title-lower" | "title_lower" => Self::TitleLower,
            "first" => Self::First,
            "first_upper" | "first-upper" => Self::FirstUpper,
            "first_lower" | "first-lower" => Self::FirstLower,
            "whitespace" => Self::Whitespace,
            _ => Self::Identity,
        }
    }

    /// Canonical selector for this transform.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Snake => "snake",
            Self::SnakeUpper => "snake-upper",
            Self::Kebab => "kebab",
            Self::KebabUpper => "kebab-upper",
            Self::Upper => "upper",
            Self::Lower => "lower",
            Self::Title => "title",
            Self::TitleLower => "title-lower",
            Self::First => "first",
            Self::FirstUpper => "first-upper",
            Self::FirstLower => "first-lower",
            Self::Whitespace => "whitespace",
        }
    }
}

/// Name derivation and transformation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformSpec {
    /// Prefix removed from the start of each display name
    pub trim_prefix: String,
    /// Prefix prepended after the transform
    pub add_prefix: String,
    /// Case function
    pub transform: Transform,
    /// Use a single trailing line comment as the display name
    pub line_comment: bool,
}

impl TransformSpec {
    /// Sets the prefix to trim.
    #[must_use]
    pub fn with_trim_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.trim_prefix = prefix.into();
        self
    }

    /// Sets the prefix to add.
    #[must_use]
    pub fn with_add_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.add_prefix = prefix.into();
        self
    }

    /// Sets the case function.
    #[must_use]
    pub const fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Enables or disables comment-derived names.
    #[must_use]
    pub const fn with_line_comment(mut self, enabled: bool) -> Self {
        self.line_comment = enabled;
        self
    }
}

/// Vendor extension keys attached to the fixed schema.
///
/// Keys are kept sorted so the serialized document is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Extensions(BTreeMap<String, Value>);

impl Extensions {
    /// Creates an empty extension map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Inserts an arbitrary extension value.
    ///
    /// Extension keys start with `x-`, which keeps them clear of the
    /// schema's own `description`, `enum`, `example` and `type` keys.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if `key` does not start with `x-`.
    ///
    /// # Examples
    ///
    /// ```
    /// use enumschema_core::Extensions;
    ///
    /// let mut ext = Extensions::new();
    /// ext.insert("x-order", 3).unwrap();
    /// assert!(ext.insert("type", "integer").unwrap_err().is_config_error());
    /// assert_eq!(ext.iter().count(), 1);
    /// ```
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let key = key.into();
        if !key.starts_with("x-") {
            return Err(Error::ConfigError {
                message: format!("extension key {key:?} must start with \"x-\""),
            });
        }
        self.0.insert(key, value.into());
        Ok(())
    }

    fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Sets `x-go-type`.
    #[must_use]
    pub fn with_go_type(mut self, go_type: impl Into<String>) -> Self {
        self.set("x-go-type", go_type.into());
        self
    }

    /// Sets `x-go-type-import` from an optional path and name.
    ///
    /// Nothing is inserted when both are `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use enumschema_core::Extensions;
    ///
    /// let ext = Extensions::new().with_go_type_import(Some("example.com/fruit"), None);
    /// assert_eq!(ext.get("x-go-type-import").unwrap()["path"], "example.com/fruit");
    /// assert!(Extensions::new().with_go_type_import(None, None).is_empty());
    /// ```
    #[must_use]
    pub fn with_go_type_import(mut self, path: Option<&str>, name: Option<&str>) -> Self {
        if path.is_none() && name.is_none() {
            return self;
        }
        let mut import = serde_json::Map::new();
        if let Some(path) = path {
            import.insert("path".to_string(), Value::from(path));
        }
        if let Some(name) = name {
            import.insert("name".to_string(), Value::from(name));
        }
        self.set("x-go-type-import", Value::Object(import));
        self
    }

    /// Sets `x-go-type-skip-optional-pointer: true`.
    #[must_use]
    pub fn with_go_type_skip_optional_pointer(mut self) -> Self {
        self.set("x-go-type-skip-optional-pointer", true);
        self
    }

    /// Looks up an extension value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns `true` if no extension is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over extensions in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// Options of the fixed schema encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaOptions {
    /// Optional example value
    pub example: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Vendor extensions
    pub extensions: Extensions,
    /// Pretty print with 2-space indentation
    pub indent: bool,
}

impl SchemaOptions {
    /// Sets the example; empty strings are ignored.
    #[must_use]
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into()).filter(|s| !s.is_empty());
        self
    }

    /// Sets the description; empty strings are ignored.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into()).filter(|s| !s.is_empty());
        self
    }

    /// Sets the vendor extensions.
    #[must_use]
    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = extensions;
        self
    }

    /// Enables or disables indentation.
    #[must_use]
    pub const fn with_indent(mut self, indent: bool) -> Self {
        self.indent = indent;
        self
    }
}

/// How the entry list is rendered. Exactly one mode per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderSpec {
    /// Built-in string enumeration schema
    FixedSchema(SchemaOptions),
    /// User-supplied handlebars template
    Template {
        /// Path of the template file
        path: PathBuf,
    },
}

impl RenderSpec {
    /// Template mode for the given file.
    #[must_use]
    pub fn template(path: impl AsRef<Path>) -> Self {
        Self::Template {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns `true` in template mode.
    #[must_use]
    pub const fn is_template(&self) -> bool {
        matches!(self, Self::Template { .. })
    }
}

impl Default for RenderSpec {
    fn default() -> Self {
        Self::FixedSchema(SchemaOptions::default())
    }
}

/// Complete configuration of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateConfig {
    /// Target type
    pub type_name: TypeName,
    /// Name derivation settings
    pub transform: TransformSpec,
    /// Output mode
    pub render: RenderSpec,
}

impl GenerateConfig {
    /// Fixed schema output with no name transformation.
    #[must_use]
    pub fn new(type_name: TypeName) -> Self {
        Self {
            type_name,
            transform: TransformSpec::default(),
            render: RenderSpec::default(),
        }
    }

    /// Sets the transform settings.
    #[must_use]
    pub fn with_transform(mut self, transform: TransformSpec) -> Self {
        self.transform = transform;
        self
    }

    /// Sets the render mode.
    #[must_use]
    pub fn with_render(mut self, render: RenderSpec) -> Self {
        self.render = render;
        self
    }
}
