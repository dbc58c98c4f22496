//! Core types, configuration, and errors for enum schema generation.
//!
//! This crate provides the foundational types shared by the loader, the
//! generation pipeline, the atomic writer and the CLI.
//!
//! # Architecture
//!
//! The core consists of:
//! - Domain types (`TypeName`, `Entry`, `EntryList`)
//! - Error hierarchy with contextual information
//! - Configuration types (`TransformSpec`, `RenderSpec`, `GenerateConfig`)

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod error;
mod types;

pub use config::{Extensions, GenerateConfig, RenderSpec, SchemaOptions, Transform, TransformSpec};
pub use error::{Error, Result};
pub use types::{Entry, EntryList, TypeName};
