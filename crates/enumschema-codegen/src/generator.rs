//! Enum schema generator.
//!
//! Runs the whole pipeline over one compilation unit: scan the constant
//! declarations, resolve values, derive display names, transform them and
//! render the result.
//!
//! # Examples
//!
//! ```
//! use enumschema_codegen::generate_unit;
//! use enumschema_core::{GenerateConfig, Transform, TransformSpec, TypeName};
//! use enumschema_loader::load_sources;
//!
//! let pkg = load_sources(&[(
//!     "fruit.go",
//!     "package fruit\ntype Fruit int\nconst (\n\tFApple Fruit = iota\n\tFBanana\n)\n",
//! )])
//! .unwrap();
//!
//! let config = GenerateConfig::new(TypeName::new("Fruit").unwrap()).with_transform(
//!     TransformSpec::default()
//!         .with_trim_prefix("F")
//!         .with_transform(Transform::Lower),
//! );
//!
//! let bytes = generate_unit(&pkg, &config).unwrap();
//! assert_eq!(
//!     String::from_utf8(bytes).unwrap(),
//!     "{\"enum\":[\"apple\",\"banana\"],\"type\":\"string\"}\n"
//! );
//! ```

use crate::naming::derive_display_name;
use crate::resolver::resolve;
use crate::scanner::scan;
use crate::schema::render_schema;
use crate::template_engine::TemplateEngine;
use crate::transform::apply_pipeline;
use crate::types::TemplateContext;
use enumschema_core::{EntryList, Error, GenerateConfig, RenderSpec, Result, TransformSpec, TypeName};
use enumschema_loader::{Package, SourceLoader};

/// The checked package an invocation extracts from.
pub type CompilationUnit = Package;

/// Name under which the user template is registered.
const TEMPLATE_NAME: &str = "enum";

/// Generator for enum schemas and templated enum files.
///
/// Holds the source loader; every call to [`EnumGenerator::generate`] loads
/// a fresh compilation unit and owns it for the duration of the call.
#[derive(Debug, Clone)]
pub struct EnumGenerator<L> {
    loader: L,
}

impl<L: SourceLoader> EnumGenerator<L> {
    /// Creates a generator using `loader` to resolve patterns.
    pub const fn new(loader: L) -> Self {
        Self { loader }
    }

    /// Loads the compilation unit for `patterns` and renders it.
    ///
    /// # Errors
    ///
    /// - [`Error::LoadFailed`] if the loader fails
    /// - [`Error::ConfigError`] unless exactly one package was loaded
    /// - any error of [`generate_unit`]
    pub fn generate(&self, patterns: &[String], config: &GenerateConfig) -> Result<Vec<u8>> {
        tracing::info!(
            "Generating enum for type {} from {}",
            config.type_name,
            patterns.join(" ")
        );

        let packages = self.loader.load(patterns).map_err(|e| Error::LoadFailed {
            message: e.to_string(),
            source: Box::new(e),
        })?;
        let unit = select_unit(packages)?;

        generate_unit(&unit, config)
    }
}

/// Runs extraction, transformation and rendering on a loaded unit.
///
/// # Errors
///
/// - [`Error::NoValues`] if no constant has the target type
/// - [`Error::UnresolvedSymbol`], [`Error::NonIntegerType`] or
///   [`Error::NotAnInteger`] from value resolution
/// - [`Error::EmptyTransform`] from the transform pipeline
/// - [`Error::RenderError`] from rendering
pub fn generate_unit(unit: &CompilationUnit, config: &GenerateConfig) -> Result<Vec<u8>> {
    let mut entries = extract_entries(unit, &config.type_name, &config.transform)?;
    apply_pipeline(&mut entries, &config.transform)?;
    render(unit, &config.type_name, &entries, &config.render)
}

/// Requires exactly one loaded package.
///
/// # Errors
///
/// Returns [`Error::ConfigError`] with the package count otherwise.
pub fn select_unit(packages: Vec<Package>) -> Result<CompilationUnit> {
    let count = packages.len();
    let mut packages = packages.into_iter();
    match (packages.next(), packages.next()) {
        (Some(unit), None) => {
            tracing::debug!(
                "Loaded package {} with {} files and {} constants",
                unit.name,
                unit.files.len(),
                unit.symbols.len()
            );
            Ok(unit)
        }
        _ => Err(Error::ConfigError {
            message: format!("error: {count} packages found"),
        }),
    }
}

/// Builds the entry list of `type_name`, with initial display names.
///
/// # Errors
///
/// Returns [`Error::NoValues`] if no constant of the type was found, or the
/// first value resolution error.
pub fn extract_entries(
    unit: &CompilationUnit,
    type_name: &TypeName,
    spec: &TransformSpec,
) -> Result<EntryList> {
    let mut entries = EntryList::new();

    for matched in scan(unit, type_name) {
        let display = derive_display_name(&matched.ident.name, matched.spec, spec.line_comment);
        let entry = resolve(unit, &matched, type_name)?.with_display_name(display);
        entries.push(entry);
    }

    if entries.is_empty() {
        return Err(Error::NoValues {
            type_name: type_name.to_string(),
        });
    }

    tracing::info!("Found {} values for type {}", entries.len(), type_name);
    Ok(entries)
}

/// Renders the final entry list in the configured mode.
///
/// # Errors
///
/// Returns [`Error::RenderError`] if serialization fails, or if the
/// template cannot be read, parsed or executed.
pub fn render(
    unit: &CompilationUnit,
    type_name: &TypeName,
    entries: &EntryList,
    spec: &RenderSpec,
) -> Result<Vec<u8>> {
    match spec {
        RenderSpec::FixedSchema(options) => {
            tracing::debug!("Rendering fixed schema (indent: {})", options.indent);
            render_schema(entries, options)
        }
        RenderSpec::Template { path } => {
            tracing::debug!("Rendering template {}", path.display());
            let mut engine = TemplateEngine::new();
            engine.register_template_file(TEMPLATE_NAME, path)?;

            let context = TemplateContext::new(type_name, &unit.name, entries);
            Ok(engine.render(TEMPLATE_NAME, &context)?.into_bytes())
        }
    }
}
