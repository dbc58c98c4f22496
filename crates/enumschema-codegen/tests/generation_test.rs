//! End-to-end generation tests.
//!
//! Writes Go packages to a temporary directory, loads them with the
//! filesystem loader and checks the rendered output.

use enumschema_codegen::EnumGenerator;
use enumschema_core::{
    Extensions, GenerateConfig, RenderSpec, SchemaOptions, Transform, TransformSpec, TypeName,
};
use enumschema_loader::GoSourceLoader;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const FRUIT_GO: &str = r#"package fruit

// Fruit is a kind of fruit.
type Fruit int

const (
	FApple Fruit = iota // apple
	FBanana             // bananana
	FCherry
	_
	FDurian
)

type Color string

const (
	Red  Color = "red"
	Blue Color = "blue"
)

const Unrelated = 42
"#;

const EXTRA_GO: &str = r"package fruit

const FElderberry Fruit = 10
";

fn write(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn fruit_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "fruit.go", FRUIT_GO);
    write(temp.path(), "fruit_extra.go", EXTRA_GO);
    temp
}

fn generate(dir: &Path, config: &GenerateConfig) -> enumschema_core::Result<Vec<u8>> {
    EnumGenerator::new(GoSourceLoader::new()).generate(&[dir.display().to_string()], config)
}

fn fruit_config() -> GenerateConfig {
    GenerateConfig::new(TypeName::new("Fruit").unwrap())
}

#[test]
fn test_fixed_schema_across_files() {
    let temp = fruit_dir();
    let out = generate(temp.path(), &fruit_config()).unwrap();
    let doc: Value = serde_json::from_slice(&out).unwrap();

    assert_eq!(
        doc,
        json!({
            "enum": ["FApple", "FBanana", "FCherry", "FDurian", "FElderberry"],
            "type": "string"
        })
    );
}

#[test]
fn test_line_comments_trim_and_snake() {
    let temp = fruit_dir();
    let config = fruit_config().with_transform(
        TransformSpec::default()
            .with_trim_prefix("F")
            .with_transform(Transform::from_selector("snake-upper"))
            .with_add_prefix("FRUIT_")
            .with_line_comment(true),
    );
    let doc: Value = serde_json::from_slice(&generate(temp.path(), &config).unwrap()).unwrap();

    assert_eq!(
        doc["enum"],
        json!([
            "FRUIT_APPLE",
            "FRUIT_BANANANA",
            "FRUIT_CHERRY",
            "FRUIT_DURIAN",
            "FRUIT_ELDERBERRY"
        ])
    );
}

#[test]
fn test_schema_options_and_indent() {
    let temp = fruit_dir();
    let options = SchemaOptions::default()
        .with_example("FApple")
        .with_description("Kinds of fruit")
        .with_extensions(
            Extensions::new()
                .with_go_type("fruit.Fruit")
                .with_go_type_import(Some("example.com/fruit"), None),
        )
        .with_indent(true);
    let config = fruit_config().with_render(RenderSpec::FixedSchema(options));

    let out = String::from_utf8(generate(temp.path(), &config).unwrap()).unwrap();
    assert!(out.starts_with("{\n  \"description\": \"Kinds of fruit\",\n  \"enum\": [\n"));
    assert!(out.ends_with("}\n"));

    let doc: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(doc["example"], "FApple");
    assert_eq!(doc["x-go-type-import"], json!({"path": "example.com/fruit"}));
}

#[test]
fn test_template_mode() {
    let temp = fruit_dir();
    write(
        temp.path(),
        "tmpl/enum.hbs",
        "package {{package}}\n\n// {{type_name}} names\nconst (\n{{#each entries}}\t{{original_name}}Name = \"{{name}}\" // {{value}} {{str}} {{signed}}\n{{/each}})\n",
    );
    let config = fruit_config()
        .with_transform(
            TransformSpec::default()
                .with_trim_prefix("F")
                .with_transform(Transform::Lower),
        )
        .with_render(RenderSpec::template(temp.path().join("tmpl/enum.hbs")));

    let out = String::from_utf8(generate(temp.path(), &config).unwrap()).unwrap();
    assert_eq!(
        out,
        "package fruit\n\n// Fruit names\nconst (\n\
         \tFAppleName = \"apple\" // 0 0 true\n\
         \tFBananaName = \"banana\" // 1 1 true\n\
         \tFCherryName = \"cherry\" // 2 2 true\n\
         \tFDurianName = \"durian\" // 4 4 true\n\
         \tFElderberryName = \"elderberry\" // 10 10 true\n\
         )\n"
    );
}

#[test]
fn test_template_values_signed_and_unsigned() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "levels.go",
        "package levels\n\ntype Level int8\ntype Mask uint64\n\nconst (\n\tLow Level = -2 + iota\n\tMid\n)\n\nconst All Mask = ^Mask(0)\n",
    );
    write(
        temp.path(),
        "values.hbs",
        "{{#each entries}}{{original_name}}={{value}};{{/each}}",
    );
    let template = RenderSpec::template(temp.path().join("values.hbs"));

    let level = GenerateConfig::new(TypeName::new("Level").unwrap()).with_render(template.clone());
    let out = generate(temp.path(), &level).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "Low=-2;Mid=-1;");

    let mask = GenerateConfig::new(TypeName::new("Mask").unwrap()).with_render(template);
    let out = generate(temp.path(), &mask).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "All=18446744073709551615;");
}

#[test]
fn test_missing_template_is_render_error() {
    let temp = fruit_dir();
    let config = fruit_config().with_render(RenderSpec::template(temp.path().join("none.hbs")));
    let err = generate(temp.path(), &config).unwrap_err();
    assert!(err.is_render_error());
}

#[test]
fn test_template_with_undefined_reference() {
    let temp = fruit_dir();
    write(temp.path(), "bad.hbs", "{{#each entries}}{{nope}}{{/each}}");
    let config = fruit_config().with_render(RenderSpec::template(temp.path().join("bad.hbs")));
    let err = generate(temp.path(), &config).unwrap_err();
    assert!(err.is_render_error());
}

#[test]
fn test_missing_type_reports_no_values() {
    let temp = fruit_dir();
    let config = GenerateConfig::new(TypeName::new("Missing").unwrap());
    let err = generate(temp.path(), &config).unwrap_err();
    assert_eq!(err.to_string(), "no values defined for type Missing");
}

#[test]
fn test_string_type_is_rejected() {
    let temp = fruit_dir();
    let config = GenerateConfig::new(TypeName::new("Color").unwrap());
    let err = generate(temp.path(), &config).unwrap_err();
    assert!(err.is_type_mismatch());
}

#[test]
fn test_imported_constant_is_unresolved() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "t.go",
        "package t\n\nimport \"math\"\n\ntype T int64\n\nconst Big T = math.MaxInt64\n",
    );
    let config = GenerateConfig::new(TypeName::new("T").unwrap());
    let err = generate(temp.path(), &config).unwrap_err();
    assert!(err.is_symbol_error());
    let message = err.to_string();
    assert!(message.starts_with("no value for constant Big: "), "{message}");
    assert!(message.contains("t.go:7: cannot resolve math.MaxInt64"), "{message}");
}

#[test]
fn test_load_failure() {
    let temp = TempDir::new().unwrap();
    let err = generate(&temp.path().join("absent"), &fruit_config()).unwrap_err();
    assert!(err.is_config_error());
    assert!(err.to_string().starts_with("Failed to load sources"));
}

#[test]
fn test_recursive_pattern_with_two_packages() {
    let temp = fruit_dir();
    write(temp.path(), "sub/other.go", "package other\n\nconst X = 1\n");
    let pattern = format!("{}/...", temp.path().display());
    let err = EnumGenerator::new(GoSourceLoader::new())
        .generate(&[pattern], &fruit_config())
        .unwrap_err();
    assert!(err.is_config_error());
    assert!(err.to_string().contains("2 packages found"));
}

#[test]
fn test_repeated_runs_are_identical() {
    let temp = fruit_dir();
    let first = generate(temp.path(), &fruit_config()).unwrap();
    let second = generate(temp.path(), &fruit_config()).unwrap();
    assert_eq!(first, second);
}
