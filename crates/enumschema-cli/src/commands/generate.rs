//! Generate command implementation.
//!
//! This command:
//! 1. Maps the flags onto a [`GenerateConfig`]
//! 2. Loads the Go package and renders the enum
//! 3. Writes the result atomically next to the package

use crate::cli::Cli;
use crate::exit_code::ExitCode;
use anyhow::{Context, Result};
use enumschema_codegen::EnumGenerator;
use enumschema_core::{
    Extensions, GenerateConfig, RenderSpec, SchemaOptions, Transform, TransformSpec, TypeName,
};
use enumschema_files::AtomicWriter;
use enumschema_loader::GoSourceLoader;
use std::path::{Path, PathBuf};
use tracing::info;

/// Runs the generate command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, generation fails, or
/// the output cannot be written.
pub fn run(cli: &Cli) -> Result<ExitCode> {
    let config = build_config(cli)?;
    let dir = infer_dir(&cli.patterns);
    let output = resolve_output(&dir, &cli.output);

    let generator = EnumGenerator::new(GoSourceLoader::new());
    let bytes = generator
        .generate(&cli.patterns, &config)
        .with_context(|| format!("Failed to generate enum for type {}", config.type_name))?;

    AtomicWriter::new(&output)
        .with_prefix(format!("{}-schema-enum.json", config.type_name))
        .write(&bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Generated {} ({} bytes)", output.display(), bytes.len());
    Ok(ExitCode::SUCCESS)
}

/// Maps command-line flags onto the generation config.
///
/// # Errors
///
/// Returns an error if `--type` is missing or blank.
pub fn build_config(cli: &Cli) -> Result<GenerateConfig> {
    let type_name = TypeName::new(cli.type_name.clone().unwrap_or_default())?;

    let transform = TransformSpec::default()
        .with_trim_prefix(cli.trim_prefix.as_str())
        .with_add_prefix(cli.add_prefix.as_str())
        .with_transform(Transform::from_selector(&cli.transform))
        .with_line_comment(cli.line_comment);

    let render = match &cli.template {
        Some(path) => RenderSpec::template(path),
        None => RenderSpec::FixedSchema(schema_options(cli)),
    };

    Ok(GenerateConfig::new(type_name)
        .with_transform(transform)
        .with_render(render))
}

fn schema_options(cli: &Cli) -> SchemaOptions {
    let mut extensions = Extensions::new().with_go_type_import(
        non_empty(cli.x_go_type_import_path.as_deref()),
        non_empty(cli.x_go_type_import_name.as_deref()),
    );
    if let Some(go_type) = non_empty(cli.x_go_type.as_deref()) {
        extensions = extensions.with_go_type(go_type);
    }
    if cli.x_go_type_skip_optional_pointer {
        extensions = extensions.with_go_type_skip_optional_pointer();
    }

    SchemaOptions::default()
        .with_example(cli.example.clone().unwrap_or_default())
        .with_description(cli.description.clone().unwrap_or_default())
        .with_extensions(extensions)
        .with_indent(cli.indent)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Directory the package lives in: a single directory argument, else the
/// parent of the first argument, else the current directory.
#[must_use]
pub fn infer_dir(patterns: &[String]) -> PathBuf {
    match patterns {
        [single] if Path::new(single).is_dir() => PathBuf::from(single),
        [first, ..] => Path::new(first)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
        [] => PathBuf::from("."),
    }
}

/// Resolves a relative output path against the package directory.
#[must_use]
pub fn resolve_output(dir: &Path, output: &Path) -> PathBuf {
    if output.is_absolute() {
        output.to_path_buf()
    } else {
        dir.join(output)
    }
}
