//! Go source loader for enum schema generation.
//!
//! Loads Go packages from directory or file patterns and produces a checked
//! [`Package`]: the parsed declarations of every file plus a symbol table
//! holding the resolved type and value of every package-level constant.
//!
//! Only what constant extraction needs is modelled. `const` and `type`
//! declarations are parsed in full; `import`, `var` and `func` declarations
//! are skipped token by token.
//!
//! # Examples
//!
//! ```
//! use enumschema_loader::{load_sources, ConstValue};
//!
//! let pkg = load_sources(&[(
//!     "fruit.go",
//!     "package fruit\n\ntype Fruit uint8\n\nconst (\n\tApple Fruit = iota\n\tBanana\n)\n",
//! )])
//! .unwrap();
//!
//! assert_eq!(pkg.name, "fruit");
//! let banana = pkg.lookup_const("Banana").unwrap();
//! assert_eq!(banana.value, ConstValue::Int(1));
//! assert_eq!(banana.ty.to_string(), "Fruit");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod ast;
pub mod checker;
pub mod constant;
pub mod constraint;
pub mod error;
pub mod lexer;
pub mod loader;
pub mod package;
pub mod parser;
pub mod token;
pub mod types;

pub use ast::{Comment, ConstDecl, ConstSpec, Decl, Expr, Ident, SourceFile, TypeExpr, TypeSpec};
pub use constant::ConstValue;
pub use constraint::{BuildContext, Constraint, ConstraintError};
pub use error::{CheckError, LoadError, LoadResult};
pub use lexer::SyntaxError;
pub use loader::{GoSourceLoader, SourceLoader, load_sources};
pub use package::{IdentId, Object, Package, SymbolTable};
pub use types::{BasicKind, Type};
