//! Loaded packages and their symbol tables.

use crate::ast::{Ident, SourceFile};
use crate::constant::ConstValue;
use crate::error::CheckError;
use crate::types::Type;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Declaration site of an identifier: file index within the package plus
/// the byte offset of the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IdentId {
    /// Index into [`Package::files`]
    pub file: usize,
    /// Byte offset of the identifier in its file
    pub offset: usize,
}

impl IdentId {
    /// Identifies `ident` declared in file `file`.
    #[must_use]
    pub const fn new(file: usize, ident: &Ident) -> Self {
        Self {
            file,
            offset: ident.span.start,
        }
    }
}

/// A checked package-level constant.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    /// Declared name
    pub name: String,
    /// Resolved type, untyped kinds included
    pub ty: Type,
    /// Folded value
    pub value: ConstValue,
}

/// Checked constants keyed by declaration site, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable(BTreeMap<IdentId, Object>);

impl SymbolTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Records a checked constant.
    pub fn insert(&mut self, id: IdentId, object: Object) {
        self.0.insert(id, object);
    }

    /// Looks up the constant declared at `id`.
    #[must_use]
    pub fn get(&self, id: &IdentId) -> Option<&Object> {
        self.0.get(id)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&IdentId, &Object)> {
        self.0.iter()
    }
}

/// A loaded, checked Go package.
#[derive(Debug, Clone)]
pub struct Package {
    /// Name from the package clause
    pub name: String,
    /// Directory the files were read from
    pub dir: PathBuf,
    /// Parsed files in load order
    pub files: Vec<SourceFile>,
    /// Every constant that checked successfully
    pub symbols: SymbolTable,
    /// Problems found while checking
    pub diagnostics: Vec<CheckError>,
}

impl Package {
    /// Finds a constant by name.
    #[must_use]
    pub fn lookup_const(&self, name: &str) -> Option<&Object> {
        self.symbols
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(_, object)| object)
    }

    /// Looks up the constant declared by `ident` in file `file`.
    #[must_use]
    pub fn object_of(&self, file: usize, ident: &Ident) -> Option<&Object> {
        self.symbols.get(&IdentId::new(file, ident))
    }

    /// Why the constant declared by `ident` in file `file` was left out of
    /// the symbol table, if the checker recorded a reason.
    #[must_use]
    pub fn diagnostic_of(&self, file: usize, ident: &Ident) -> Option<&CheckError> {
        let site = IdentId::new(file, ident);
        self.diagnostics.iter().find(|d| d.site == site)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Span;
    use crate::types::BasicKind;

    fn ident(name: &str, start: usize) -> Ident {
        Ident {
            name: name.to_string(),
            span: Span::new(start, start + name.len()),
        }
    }

    #[test]
    fn test_symbol_table_orders_by_site() {
        let mut table = SymbolTable::new();
        let object = |name: &str| Object {
            name: name.to_string(),
            ty: Type::Basic(BasicKind::UntypedInt),
            value: ConstValue::Int(0),
        };
        table.insert(IdentId::new(1, &ident("C", 5)), object("C"));
        table.insert(IdentId::new(0, &ident("B", 40)), object("B"));
        table.insert(IdentId::new(0, &ident("A", 20)), object("A"));

        let names: Vec<_> = table.iter().map(|(_, o)| o.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_diagnostic_of_finds_skipped_constant() {
        let pkg = crate::loader::load_sources(&[(
            "d.go",
            "package d\nimport \"os\"\nconst (\n\tA = os.Value\n\tB = 2\n)\n",
        )])
        .unwrap();
        let specs: Vec<_> = pkg.files[0].const_specs().collect();
        let (a, b) = (&specs[0].names[0], &specs[1].names[0]);

        let diagnostic = pkg.diagnostic_of(0, a).unwrap();
        assert_eq!(diagnostic.line, 4);
        assert!(diagnostic.message.contains("os.Value"));
        assert!(pkg.object_of(0, a).is_none());
        assert!(pkg.diagnostic_of(0, b).is_none());
        assert!(pkg.object_of(0, b).is_some());
    }

    #[test]
    fn test_object_of_uses_declaration_site() {
        let declared = ident("A", 20);
        let mut symbols = SymbolTable::new();
        symbols.insert(
            IdentId::new(0, &declared),
            Object {
                name: "A".into(),
                ty: Type::Basic(BasicKind::Int),
                value: ConstValue::Int(7),
            },
        );
        let pkg = Package {
            name: "p".into(),
            dir: PathBuf::from("."),
            files: Vec::new(),
            symbols,
            diagnostics: Vec::new(),
        };

        assert!(pkg.object_of(0, &declared).is_some());
        assert!(pkg.object_of(1, &declared).is_none());
        assert!(pkg.object_of(0, &ident("A", 99)).is_none());
        assert_eq!(pkg.lookup_const("A").unwrap().value, ConstValue::Int(7));
    }
}
