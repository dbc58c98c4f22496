//! Template engine for user-supplied templates, using Handlebars.
//!
//! Wraps Handlebars in strict mode with HTML escaping disabled, and
//! registers the case helpers `snake`, `kebab`, `upper` and `lower`.
//!
//! # Examples
//!
//! ```
//! use enumschema_codegen::template_engine::TemplateEngine;
//! use serde_json::json;
//!
//! let mut engine = TemplateEngine::new();
//! engine
//!     .register_template_string("enum", "{{#each entries}}{{snake name}} {{/each}}")
//!     .unwrap();
//!
//! let out = engine
//!     .render("enum", &json!({"entries": [{"name": "BananaSplit"}]}))
//!     .unwrap();
//! assert_eq!(out, "banana_split ");
//! ```

use enumschema_core::{Error, Result};
use handlebars::Handlebars;
use serde::Serialize;
use std::path::Path;

mod helpers {
    use crate::case;
    use enumschema_core::Transform;
    use handlebars::handlebars_helper;

    handlebars_helper!(snake: |s: str| case::apply(Transform::Snake, s));
    handlebars_helper!(kebab: |s: str| case::apply(Transform::Kebab, s));
    handlebars_helper!(upper: |s: str| case::apply(Transform::Upper, s));
    handlebars_helper!(lower: |s: str| case::apply(Transform::Lower, s));
}

/// Template engine for rendering entry lists.
///
/// # Thread Safety
///
/// This type is `Send` and `Sync`.
#[derive(Debug)]
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl TemplateEngine<'_> {
    /// Creates an engine with no templates and the case helpers registered.
    #[must_use]
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();

        // Strict mode: fail on missing variables
        handlebars.set_strict_mode(true);
        // Output is not HTML
        handlebars.register_escape_fn(handlebars::no_escape);

        handlebars.register_helper("snake", Box::new(helpers::snake));
        handlebars.register_helper("kebab", Box::new(helpers::kebab));
        handlebars.register_helper("upper", Box::new(helpers::upper));
        handlebars.register_helper("lower", Box::new(helpers::lower));

        Self { handlebars }
    }

    /// Registers a template from a string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RenderError`] if the template does not parse.
    pub fn register_template_string(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| Error::RenderError {
                message: format!("Failed to parse template '{name}': {e}"),
                source: Some(Box::new(e)),
            })
    }

    /// Reads `path` once and registers its content under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RenderError`] if the file cannot be read or does
    /// not parse.
    pub fn register_template_file(&mut self, name: &str, path: &Path) -> Result<()> {
        let template = std::fs::read_to_string(path).map_err(|e| Error::RenderError {
            message: format!("Failed to read template {}: {e}", path.display()),
            source: Some(Box::new(e)),
        })?;

        tracing::debug!("Loaded template {} ({} bytes)", path.display(), template.len());
        self.register_template_string(name, &template)
    }

    /// Renders a registered template with the given context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RenderError`] if the template is not registered,
    /// references an undefined value, or fails while executing.
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(template_name, context)
            .map_err(|e| Error::RenderError {
                message: format!("Template rendering failed: {e}"),
                source: Some(Box::new(e)),
            })
    }
}

impl Default for TemplateEngine<'_> {
    fn default() -> Self {
        Self::new()
    }
}
