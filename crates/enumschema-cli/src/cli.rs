//! CLI argument definitions and parsing.

use clap::Parser;
use std::path::PathBuf;

/// Generate an OpenAPI string enum schema from Go integer constants.
///
/// Loads the Go package named by the positional arguments (the current
/// directory by default), collects the constants of `--type` and writes
/// either a JSON schema or the output of a template.
///
/// # Examples
///
/// ```bash
/// # Schema for Fruit in ./fruit, names as snake case without the F prefix
/// enumschema --type Fruit --trimprefix F --transform snake -o fruit.json ./fruit
///
/// # Render a template instead
/// enumschema --type Fruit -t enum.hbs -o fruit_names.go ./fruit
/// ```
#[derive(Parser, Debug)]
#[command(name = "enumschema")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Name of the integer type whose constants are collected
    #[arg(long = "type", env = "ENUMSCHEMA_TYPE")]
    pub type_name: Option<String>,

    /// Use a single trailing line comment as the value name
    #[arg(long = "linecomment", visible_alias = "line-comment")]
    pub line_comment: bool,

    /// Prefix removed from each name
    #[arg(long = "trimprefix", default_value = "")]
    pub trim_prefix: String,

    /// Prefix added to each name after the transform
    #[arg(long = "addprefix", default_value = "")]
    pub add_prefix: String,

    /// Name transform (snake, snake-upper, kebab, kebab-upper, upper, lower,
    /// title, title-lower, first, first-upper, first-lower, whitespace)
    #[arg(long, default_value = "")]
    pub transform: String,

    /// Handlebars template rendered instead of the JSON schema
    #[arg(short = 't', long)]
    pub template: Option<PathBuf>,

    /// Output file, relative to the package directory
    #[arg(short, long, default_value = "schema.json", env = "ENUMSCHEMA_OUTPUT")]
    pub output: PathBuf,

    /// Pretty print the schema with 2-space indentation
    #[arg(long)]
    pub indent: bool,

    /// Example value of the schema
    #[arg(long)]
    pub example: Option<String>,

    /// Description of the schema
    #[arg(long)]
    pub description: Option<String>,

    /// Value of the x-go-type extension
    #[arg(long = "x-go-type")]
    pub x_go_type: Option<String>,

    /// Import path of the x-go-type-import extension
    #[arg(long = "x-go-type-import-path")]
    pub x_go_type_import_path: Option<String>,

    /// Import name of the x-go-type-import extension
    #[arg(long = "x-go-type-import-name")]
    pub x_go_type_import_name: Option<String>,

    /// Set x-go-type-skip-optional-pointer to true
    #[arg(long = "x-go-type-skip-optional-pointer")]
    pub x_go_type_skip_optional_pointer: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Package directories, Go files, or `dir/...` patterns
    pub patterns: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["enumschema", "--type", "Fruit"]).unwrap();
        assert_eq!(cli.type_name.as_deref(), Some("Fruit"));
        assert_eq!(cli.output, PathBuf::from("schema.json"));
        assert!(cli.transform.is_empty());
        assert!(!cli.line_comment);
        assert!(!cli.indent);
        assert!(cli.patterns.is_empty());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "enumschema",
            "--type=Fruit",
            "--linecomment",
            "--trimprefix",
            "F",
            "--addprefix",
            "fruit_",
            "--transform",
            "snake",
            "-o",
            "out.json",
            "--indent",
            "--example",
            "apple",
            "--description",
            "Fruits",
            "--x-go-type",
            "fruit.Fruit",
            "--x-go-type-import-path",
            "example.com/fruit",
            "--x-go-type-import-name",
            "fruit",
            "--x-go-type-skip-optional-pointer",
            "-v",
            "./fruit",
        ])
        .unwrap();

        assert!(cli.line_comment);
        assert_eq!(cli.trim_prefix, "F");
        assert_eq!(cli.add_prefix, "fruit_");
        assert_eq!(cli.transform, "snake");
        assert_eq!(cli.output, PathBuf::from("out.json"));
        assert_eq!(cli.example.as_deref(), Some("apple"));
        assert_eq!(cli.x_go_type_import_name.as_deref(), Some("fruit"));
        assert!(cli.x_go_type_skip_optional_pointer);
        assert!(cli.verbose);
        assert_eq!(cli.patterns, vec!["./fruit"]);
    }

    #[test]
    fn test_line_comment_alias_and_template() {
        let cli =
            Cli::try_parse_from(["enumschema", "--line-comment", "-t", "enum.hbs", "a.go", "b.go"])
                .unwrap();
        assert!(cli.line_comment);
        assert_eq!(cli.template, Some(PathBuf::from("enum.hbs")));
        assert_eq!(cli.patterns, vec!["a.go", "b.go"]);
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Cli::try_parse_from(["enumschema", "--bogus"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
