//! Error types for enum schema generation.
//!
//! Every failure in a generation run is fatal: there is no retry policy,
//! the run stops and the error is reported to the caller.
//!
//! # Examples
//!
//! ```
//! use enumschema_core::{Error, Result};
//!
//! fn require_values(type_name: &str, count: usize) -> Result<()> {
//!     if count == 0 {
//!         return Err(Error::NoValues {
//!             type_name: type_name.to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = require_values("Fruit", 0).unwrap_err();
//! assert!(err.is_extraction_error());
//! assert_eq!(err.to_string(), "no values defined for type Fruit");
//! ```

use thiserror::Error;

/// Main error type for enum schema generation.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid invocation setup.
    ///
    /// Raised when zero or several compilation units were resolved, or when
    /// the target type name is missing.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// The source loader could not produce a compilation unit.
    #[error("Failed to load sources: {message}")]
    LoadFailed {
        /// Summary of the load failure
        message: String,
        /// Underlying loader error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No constant of the target type was found in any loaded file.
    #[error("no values defined for type {type_name}")]
    NoValues {
        /// The requested type name
        type_name: String,
    },

    /// The target type's underlying type is not an integer kind.
    #[error("can't handle non-integer constant type {type_name}")]
    NonIntegerType {
        /// The offending type name
        type_name: String,
    },

    /// A constant's value does not fit either 64-bit interpretation.
    #[error("internal error: value of {name} is not an integer: {value}")]
    NotAnInteger {
        /// Constant identifier
        name: String,
        /// Canonical text of the value
        value: String,
    },

    /// A declared identifier has no entry in the symbol table.
    ///
    /// Indicates the syntax tree and the checker disagree; never expected
    /// for a well-formed compilation unit.
    #[error("no value for constant {name}{}", reason_suffix(.reason.as_deref()))]
    UnresolvedSymbol {
        /// Constant identifier
        name: String,
        /// Checker diagnostic explaining the missing value, if any
        reason: Option<String>,
    },

    /// A name transformation erased a non-empty display name.
    #[error("transformation of {name:?} ({original}) got an empty result")]
    EmptyTransform {
        /// Display name before the transformation
        name: String,
        /// Declared identifier of the constant
        original: String,
    },

    /// Rendering the output failed.
    ///
    /// Covers missing or malformed template files, template execution
    /// errors and schema serialization failures.
    #[error("Render error: {message}")]
    RenderError {
        /// Description of the failure
        message: String,
        /// Optional underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Creating, writing or committing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path involved in the failed operation
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Returns `true` if this is a configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use enumschema_core::Error;
    ///
    /// let err = Error::ConfigError {
    ///     message: "type name missing".to_string(),
    /// };
    /// assert!(err.is_config_error());
    /// ```
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. } | Self::LoadFailed { .. })
    }

    /// Returns `true` if no values were found for the target type.
    #[must_use]
    pub const fn is_extraction_error(&self) -> bool {
        matches!(self, Self::NoValues { .. })
    }

    /// Returns `true` if a constant was not of an integer kind.
    #[must_use]
    pub const fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::NonIntegerType { .. } | Self::NotAnInteger { .. })
    }

    /// Returns `true` if a declared constant had no resolved symbol.
    #[must_use]
    pub const fn is_symbol_error(&self) -> bool {
        matches!(self, Self::UnresolvedSymbol { .. })
    }

    /// Returns `true` if a transformation produced an empty name.
    ///
    /// # Examples
    ///
    /// ```
    /// use enumschema_core::Error;
    ///
    /// let err = Error::EmptyTransform {
    ///     name: "_".to_string(),
    ///     original: "Underscore".to_string(),
    /// };
    /// assert!(err.is_transform_error());
    /// ```
    #[must_use]
    pub const fn is_transform_error(&self) -> bool {
        matches!(self, Self::EmptyTransform { .. })
    }

    /// Returns `true` if this is a rendering error.
    #[must_use]
    pub const fn is_render_error(&self) -> bool {
        matches!(self, Self::RenderError { .. })
    }

    /// Returns `true` if this is an I/O error.
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Result type alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

fn reason_suffix(reason: Option<&str>) -> String {
    reason.map(|r| format!(": {r}")).unwrap_or_default()
}
