//! Display name derivation from identifiers and trailing comments.

use enumschema_loader::{Comment, ConstSpec};

/// Computes the initial display name of a constant.
///
/// With `line_comment` set, a spec carrying exactly one trailing `//`
/// comment is named by that comment's text, trimmed. Otherwise the
/// identifier is used.
///
/// # Examples
///
/// ```
/// use enumschema_codegen::naming::derive_display_name;
/// use enumschema_loader::load_sources;
///
/// let pkg = load_sources(&[("f.go", "package f\nconst Apple = 0 // red apple\n")]).unwrap();
/// let spec = pkg.files[0].const_specs().next().unwrap();
///
/// assert_eq!(derive_display_name("Apple", spec, true), "red apple");
/// assert_eq!(derive_display_name("Apple", spec, false), "Apple");
/// ```
#[must_use]
pub fn derive_display_name(original_name: &str, spec: &ConstSpec, line_comment: bool) -> String {
    match spec.trailing_comments.as_slice() {
        [comment] if line_comment && !comment.block => comment_text(comment).trim().to_string(),
        _ => original_name.to_string(),
    }
}

/// Comment body, with tool directives reading as empty.
fn comment_text(comment: &Comment) -> &str {
    if comment.is_directive() {
        ""
    } else {
        comment.body()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enumschema_loader::load_sources;

    fn display(source: &str, line_comment: bool) -> Vec<String> {
        let pkg = load_sources(&[("t.go", source)]).unwrap();
        pkg.files[0]
            .const_specs()
            .map(|spec| derive_display_name(&spec.names[0].name, spec, line_comment))
            .collect()
    }

    #[test]
    fn test_comment_replaces_identifier() {
        let src = "package p\nconst (\n\tApple = iota // apple\n\tBanana // bananana \n)\n";
        assert_eq!(display(src, true), vec!["apple", "bananana"]);
        assert_eq!(display(src, false), vec!["Apple", "Banana"]);
    }

    #[test]
    fn test_missing_comment_falls_back() {
        let src = "package p\nconst (\n\tApple = iota\n\t// above\n\tBanana\n)\n";
        assert_eq!(display(src, true), vec!["Apple", "Banana"]);
    }

    #[test]
    fn test_block_or_multiple_comments_ignored() {
        let src = "package p\nconst (\n\tApple = iota /* apple */\n\tBanana /* a */ // b\n)\n";
        assert_eq!(display(src, true), vec!["Apple", "Banana"]);
    }

    #[test]
    fn test_directive_comment_gives_empty_name() {
        let src = "package p\nconst Apple = 0 //nolint:gochecknoglobals\n";
        assert_eq!(display(src, true), vec![""]);
    }

    #[test]
    fn test_empty_comment_gives_empty_name() {
        let src = "package p\nconst Apple = 0 //\n";
        assert_eq!(display(src, true), vec![""]);
    }
}
