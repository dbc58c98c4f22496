//! enumschema CLI library.
//!
//! Exposes the argument definitions and the generate command so they can
//! be tested without spawning the binary.

pub mod cli;
pub mod commands;
pub mod exit_code;

pub use cli::Cli;
pub use exit_code::ExitCode;
