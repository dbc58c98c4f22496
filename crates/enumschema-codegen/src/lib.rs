//! Enum extraction and rendering.
//!
//! Takes a checked Go package from `enumschema-loader` and turns the
//! constants of one named integer type into an output document.
//!
//! # Architecture
//!
//! Stages run strictly in order over a per-invocation entry list:
//! - [`scanner`]: finds the constants declared with the target type
//! - [`resolver`]: reads their value and signedness from the symbol table
//! - [`naming`]: picks the identifier or its trailing comment as display name
//! - [`transform`]: trims a prefix, applies the case function, adds a prefix
//! - [`schema`] and [`template_engine`]: render the fixed schema or a
//!   user template
//!
//! [`EnumGenerator`] drives the stages from a [`SourceLoader`]
//! implementation.
//!
//! [`SourceLoader`]: enumschema_loader::SourceLoader

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod case;
pub mod generator;
pub mod naming;
pub mod resolver;
pub mod scanner;
pub mod schema;
pub mod template_engine;
pub mod transform;
pub mod types;

pub use generator::{CompilationUnit, EnumGenerator, generate_unit};
pub use types::{EntryContext, EntryValue, TemplateContext};
