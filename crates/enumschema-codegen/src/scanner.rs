//! Declaration scanner.
//!
//! Walks the const declarations of every file and picks the names declared
//! with the target type, following const-block type carry-over: a spec with
//! an explicit type sets the current type, a spec with values but no type
//! clears it, and a bare spec inherits it.

use enumschema_core::TypeName;
use enumschema_loader::{ConstSpec, Decl, Ident, Package, TypeExpr};

/// A constant name whose declared type is the target type.
#[derive(Debug, Clone, Copy)]
pub struct MatchedConst<'a> {
    /// Index of the declaring file within the package
    pub file: usize,
    /// The declared name
    pub ident: &'a Ident,
    /// The spec declaring it
    pub spec: &'a ConstSpec,
}

/// Finds every constant of `type_name`, in file then declaration order.
///
/// Blank identifiers are skipped.
///
/// # Examples
///
/// ```
/// use enumschema_codegen::scanner::scan;
/// use enumschema_core::TypeName;
/// use enumschema_loader::load_sources;
///
/// let pkg = load_sources(&[(
///     "f.go",
///     "package f\ntype Fruit int\nconst (\n\tApple Fruit = iota\n\t_\n\tBanana\n)\n",
/// )])
/// .unwrap();
/// let matched = scan(&pkg, &TypeName::new("Fruit").unwrap());
/// let names: Vec<_> = matched.iter().map(|m| m.ident.name.as_str()).collect();
/// assert_eq!(names, vec!["Apple", "Banana"]);
/// ```
#[must_use]
pub fn scan<'a>(pkg: &'a Package, type_name: &TypeName) -> Vec<MatchedConst<'a>> {
    let mut matched = Vec::new();

    for (file_idx, file) in pkg.files.iter().enumerate() {
        for decl in &file.decls {
            let Decl::Const(decl) = decl else {
                continue;
            };

            let mut current: Option<&str> = None;
            for spec in &decl.specs {
                match (&spec.ty, spec.values.is_empty()) {
                    (None, false) => {
                        current = None;
                        continue;
                    }
                    (Some(TypeExpr::Name(ty)), _) => current = Some(ty.name.as_str()),
                    (Some(_), _) => {
                        current = None;
                        continue;
                    }
                    (None, true) => {}
                }

                if current != Some(type_name.as_str()) {
                    continue;
                }

                for ident in spec.names.iter().filter(|ident| !ident.is_blank()) {
                    tracing::debug!("Matched constant {} in {}", ident.name, file.name);
                    matched.push(MatchedConst {
                        file: file_idx,
                        ident,
                        spec,
                    });
                }
            }
        }
    }

    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use enumschema_loader::load_sources;

    fn names(source: &str, type_name: &str) -> Vec<String> {
        let pkg = load_sources(&[("test.go", source)]).unwrap();
        scan(&pkg, &TypeName::new(type_name).unwrap())
            .iter()
            .map(|m| m.ident.name.clone())
            .collect()
    }

    #[test]
    fn test_type_carries_over_bare_specs() {
        let src = "package p\ntype T int\nconst (\n\tA T = iota\n\tB\n\tC\n)\n";
        assert_eq!(names(src, "T"), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_untyped_value_resets_current_type() {
        let src = "package p\ntype T int\nconst (\n\tA T = iota\n\tB = 5\n\tC\n)\n";
        assert_eq!(names(src, "T"), vec!["A"]);
    }

    #[test]
    fn test_new_explicit_type_switches() {
        let src = "package p\ntype T int\ntype U int\nconst (\n\tA T = 0\n\tB U = 1\n\tC\n\tD T = 3\n)\n";
        assert_eq!(names(src, "T"), vec!["A", "D"]);
        assert_eq!(names(src, "U"), vec!["B", "C"]);
    }

    #[test]
    fn test_qualified_type_resets_current_type() {
        let src = "package p\nimport \"time\"\ntype T int\nconst (\n\tA T = 1\n\tB time.Duration = 2\n\tC\n)\n";
        assert_eq!(names(src, "T"), vec!["A"]);
    }

    #[test]
    fn test_type_does_not_leak_between_decls() {
        let src = "package p\ntype T int\nconst A T = 1\nconst (\n\tB = 2\n)\n";
        assert_eq!(names(src, "T"), vec!["A"]);
    }

    #[test]
    fn test_multiple_names_per_spec_and_blanks() {
        let src = "package p\ntype T int\nconst (\n\tA, _, B T = 1, 2, 3\n)\n";
        assert_eq!(names(src, "T"), vec!["A", "B"]);
    }

    #[test]
    fn test_file_order_is_preserved() {
        let pkg = load_sources(&[
            ("b.go", "package p\nconst Z T = 9\n"),
            ("a.go", "package p\ntype T int\nconst A T = 1\n"),
        ])
        .unwrap();
        let matched = scan(&pkg, &TypeName::new("T").unwrap());
        assert_eq!(matched[0].ident.name, "Z");
        assert_eq!(matched[0].file, 0);
        assert_eq!(matched[1].ident.name, "A");
        assert_eq!(matched[1].file, 1);
    }

    #[test]
    fn test_no_match() {
        let src = "package p\ntype T int\nconst (\n\tA T = iota\n)\n";
        assert!(names(src, "Missing").is_empty());
    }
}
