//! Name transform pipeline: trim prefix, case function, add prefix.

use crate::case;
use enumschema_core::{EntryList, Error, Result, Transform, TransformSpec};

/// Runs the three pipeline stages over every entry, in order.
///
/// # Errors
///
/// Returns [`Error::EmptyTransform`] if the case function turns a
/// non-empty display name into an empty one.
///
/// # Examples
///
/// ```
/// use enumschema_codegen::transform::apply_pipeline;
/// use enumschema_core::{Entry, EntryList, Transform, TransformSpec};
///
/// let mut entries: EntryList = vec![
///     Entry::new("FBanana", 0, true, "0"),
///     Entry::new("FCherry", 1, true, "1"),
/// ]
/// .into();
/// let spec = TransformSpec::default()
///     .with_trim_prefix("F")
///     .with_transform(Transform::Snake);
///
/// apply_pipeline(&mut entries, &spec).unwrap();
/// assert_eq!(entries.display_names(), vec!["banana", "cherry"]);
/// ```
pub fn apply_pipeline(entries: &mut EntryList, spec: &TransformSpec) -> Result<()> {
    tracing::debug!(
        "Transforming {} names (trim {:?}, transform {}, add {:?})",
        entries.len(),
        spec.trim_prefix,
        spec.transform.as_str(),
        spec.add_prefix
    );

    trim_prefix(entries, &spec.trim_prefix);
    transform_names(entries, spec.transform)?;
    add_prefix(entries, &spec.add_prefix);
    Ok(())
}

/// Removes `prefix` from the start of every display name that has it.
pub fn trim_prefix(entries: &mut EntryList, prefix: &str) {
    if prefix.is_empty() {
        return;
    }
    for entry in entries.iter_mut() {
        if let Some(rest) = entry.display_name().strip_prefix(prefix) {
            let rest = rest.to_string();
            entry.set_display_name(rest);
        }
    }
}

/// Applies the case function to every display name.
///
/// A name that was empty before the transform, or whose entry has an empty
/// original name, may come out empty.
///
/// # Errors
///
/// Returns [`Error::EmptyTransform`] for the first name the transform
/// erased.
pub fn transform_names(entries: &mut EntryList, transform: Transform) -> Result<()> {
    for entry in entries.iter_mut() {
        let after = case::apply(transform, entry.display_name());
        if !entry.original_name().is_empty() && !entry.display_name().is_empty() && after.is_empty()
        {
            return Err(Error::EmptyTransform {
                name: entry.display_name().to_string(),
                original: entry.original_name().to_string(),
            });
        }
        entry.set_display_name(after);
    }
    Ok(())
}

/// Prepends `prefix` to every display name.
pub fn add_prefix(entries: &mut EntryList, prefix: &str) {
    if prefix.is_empty() {
        return;
    }
    for entry in entries.iter_mut() {
        let prefixed = format!("{prefix}{}", entry.display_name());
        entry.set_display_name(prefixed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enumschema_core::Entry;

    fn entries(names: &[&str]) -> EntryList {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Entry::new(*name, i as u64, true, i.to_string()))
            .collect()
    }

    #[test]
    fn test_identity_keeps_names() {
        let mut list = entries(&["Apple", "Banana"]);
        apply_pipeline(&mut list, &TransformSpec::default()).unwrap();
        assert_eq!(list.display_names(), vec!["Apple", "Banana"]);
    }

    #[test]
    fn test_trim_only_when_present() {
        let mut list = entries(&["FApple", "Banana"]);
        trim_prefix(&mut list, "F");
        assert_eq!(list.display_names(), vec!["Apple", "Banana"]);
    }

    #[test]
    fn test_trim_removes_prefix_once() {
        let mut list = entries(&["FFig"]);
        trim_prefix(&mut list, "F");
        assert_eq!(list.display_names(), vec!["Fig"]);
    }

    #[test]
    fn test_add_prefix_after_transform() {
        let mut list = entries(&["BananaSplit"]);
        let spec = TransformSpec::default()
            .with_transform(Transform::Kebab)
            .with_add_prefix("Fruit-");
        apply_pipeline(&mut list, &spec).unwrap();
        assert_eq!(list.display_names(), vec!["Fruit-banana-split"]);
    }

    #[test]
    fn test_empty_result_is_error() {
        let mut list: EntryList = vec![Entry::new("Under", 0, true, "0").with_display_name("__")].into();
        let err = transform_names(&mut list, Transform::Snake).unwrap_err();
        assert!(err.is_transform_error());
        assert_eq!(
            err.to_string(),
            "transformation of \"__\" (Under) got an empty result"
        );
    }

    #[test]
    fn test_trim_to_empty_then_transform_is_allowed() {
        let mut list = entries(&["F"]);
        let spec = TransformSpec::default()
            .with_trim_prefix("F")
            .with_transform(Transform::Upper)
            .with_add_prefix("x");
        apply_pipeline(&mut list, &spec).unwrap();
        assert_eq!(list.display_names(), vec!["x"]);
    }

    #[test]
    fn test_empty_comment_name_is_exempt() {
        let mut list: EntryList = vec![Entry::new("Apple", 0, true, "0").with_display_name("")].into();
        transform_names(&mut list, Transform::First).unwrap();
        assert_eq!(list.display_names(), vec![""]);
    }

    #[test]
    fn test_duplicates_survive() {
        let mut list = entries(&["A_b", "AB"]);
        let spec = TransformSpec::default().with_transform(Transform::Lower);
        apply_pipeline(&mut list, &spec).unwrap();
        assert_eq!(list.display_names(), vec!["a_b", "ab"]);
        assert_eq!(list.len(), 2);
    }
}
