//! Fixed schema encoding.
//!
//! Renders the entry list as an OpenAPI string schema: the final display
//! names form the `enum` array, followed by the optional example and
//! description and the vendor extensions.
//!
//! # Examples
//!
//! ```
//! use enumschema_codegen::schema::render_schema;
//! use enumschema_core::{Entry, EntryList, SchemaOptions};
//!
//! let entries: EntryList = vec![
//!     Entry::new("Apple", 0, true, "0"),
//!     Entry::new("Banana", 1, true, "1"),
//! ]
//! .into();
//!
//! let bytes = render_schema(&entries, &SchemaOptions::default()).unwrap();
//! assert_eq!(
//!     String::from_utf8(bytes).unwrap(),
//!     "{\"enum\":[\"Apple\",\"Banana\"],\"type\":\"string\"}\n"
//! );
//! ```

use enumschema_core::{EntryList, Error, Extensions, Result, SchemaOptions};
use serde::Serialize;

/// Serialized form of the schema. Field order matches key order.
#[derive(Debug, Serialize)]
struct EnumSchema<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(rename = "enum")]
    values: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    example: Option<&'a str>,
    #[serde(rename = "type")]
    schema_type: &'static str,
    #[serde(flatten)]
    extensions: &'a Extensions,
}

/// Serializes the schema document, newline terminated.
///
/// # Errors
///
/// Returns [`Error::RenderError`] if serialization fails.
pub fn render_schema(entries: &EntryList, options: &SchemaOptions) -> Result<Vec<u8>> {
    let schema = EnumSchema {
        description: options.description.as_deref(),
        values: entries.display_names(),
        example: options.example.as_deref(),
        schema_type: "string",
        extensions: &options.extensions,
    };

    let encoded = if options.indent {
        serde_json::to_vec_pretty(&schema)
    } else {
        serde_json::to_vec(&schema)
    };

    let mut bytes = encoded.map_err(|e| Error::RenderError {
        message: format!("Failed to encode schema: {e}"),
        source: Some(Box::new(e)),
    })?;
    bytes.push(b'\n');

    tracing::debug!("Encoded schema with {} values", entries.len());
    Ok(bytes)
}
