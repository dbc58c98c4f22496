//! Syntax tree for the declarations the loader cares about.
//!
//! Only `const` and `type` declarations are kept. Imports, variables and
//! functions are skipped during parsing.

use crate::token::{Op, Span};

/// A comment, with its delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Raw text including `//` or `/* */`
    pub text: String,
    /// Byte range
    pub span: Span,
    /// 1-based line the comment starts on
    pub line: usize,
    /// `true` for `/* */` comments
    pub block: bool,
}

impl Comment {
    /// Text with the comment markers removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use enumschema_loader::lexer::tokenize;
    ///
    /// let lexed = tokenize("// apple\n/* pear */").unwrap();
    /// assert_eq!(lexed.comments[0].body(), " apple");
    /// assert_eq!(lexed.comments[1].body(), " pear ");
    /// ```
    #[must_use]
    pub fn body(&self) -> &str {
        if self.block {
            self.text
                .strip_prefix("/*")
                .and_then(|t| t.strip_suffix("*/"))
                .unwrap_or(&self.text)
        } else {
            self.text.strip_prefix("//").unwrap_or(&self.text)
        }
    }

    /// Whether this is a tool directive such as `//go:generate` or
    /// `//line file.go:10`.
    #[must_use]
    pub fn is_directive(&self) -> bool {
        if self.block {
            return false;
        }
        let body = self.body();
        if body.starts_with("line ") {
            return true;
        }
        if body.starts_with("extern ") || body.starts_with("export ") {
            return true;
        }
        // `//name:arg`, lowercase alphanumerics around the colon
        let Some(colon) = body.find(':') else {
            return false;
        };
        let lower_alnum = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();
        colon > 0
            && body.as_bytes()[..colon].iter().all(|&b| lower_alnum(b))
            && body.as_bytes().get(colon + 1).is_some_and(|&b| lower_alnum(b))
    }
}

/// An identifier occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    /// Spelling
    pub name: String,
    /// Byte range
    pub span: Span,
}

impl Ident {
    /// Whether this is the blank identifier `_`.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }
}

/// Type written in a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A plain name such as `Fruit` or `uint8`
    Name(Ident),
    /// A package-qualified name such as `time.Duration`
    Qualified {
        /// Package identifier
        package: Ident,
        /// Selected name
        name: Ident,
    },
    /// Any composite type (struct, slice, pointer, generic instance, ...)
    Other(Span),
}

impl TypeExpr {
    /// Byte range of the whole type.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Name(ident) => ident.span,
            Self::Qualified { package, name } => package.span.to(name.span),
            Self::Other(span) => *span,
        }
    }
}

/// Constant expression.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum Expr {
    /// Integer literal, raw text
    Int { text: String, span: Span },
    /// Float literal, raw text
    Float { text: String, span: Span },
    /// Imaginary literal, raw text
    Imag { text: String, span: Span },
    /// Rune literal, decoded
    Rune { value: u32, span: Span },
    /// String literal, decoded
    Str { value: String, span: Span },
    /// Identifier reference
    Ident(Ident),
    /// `x.Sel`
    Selector { base: Box<Expr>, sel: Ident },
    /// `(x)`
    Paren { inner: Box<Expr>, span: Span },
    /// `op x`
    Unary { op: Op, operand: Box<Expr>, span: Span },
    /// `x op y`
    Binary { op: Op, lhs: Box<Expr>, rhs: Box<Expr> },
    /// `f(args)`, which covers conversions and builtins
    Call { func: Box<Expr>, args: Vec<Expr>, span: Span },
    /// Anything the constant evaluator cannot handle (composite literals,
    /// index expressions, function literals)
    Unsupported(Span),
}

impl Expr {
    /// Byte range of the expression.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Int { span, .. }
            | Self::Float { span, .. }
            | Self::Imag { span, .. }
            | Self::Rune { span, .. }
            | Self::Str { span, .. }
            | Self::Paren { span, .. }
            | Self::Unary { span, .. }
            | Self::Call { span, .. }
            | Self::Unsupported(span) => *span,
            Self::Ident(ident) => ident.span,
            Self::Selector { base, sel } => base.span().to(sel.span),
            Self::Binary { lhs, rhs, .. } => lhs.span().to(rhs.span()),
        }
    }
}

/// One line of a `const` declaration: `A, B T = x, y`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstSpec {
    /// Declared names, blank identifiers included
    pub names: Vec<Ident>,
    /// Explicit type, if written
    pub ty: Option<TypeExpr>,
    /// Explicit values; empty when the previous list is repeated
    pub values: Vec<Expr>,
    /// Index within the enclosing declaration, the value of `iota`
    pub iota: usize,
    /// Comments on the spec's last line, after its last token
    pub trailing_comments: Vec<Comment>,
}

/// A `const` declaration, grouped or not.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstDecl {
    /// Specs in source order
    pub specs: Vec<ConstSpec>,
    /// Whether the specs were written in parentheses
    pub grouped: bool,
}

/// One `type` spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    /// Declared name
    pub name: Ident,
    /// `type A = B` rather than `type A B`
    pub alias: bool,
    /// The right-hand side
    pub ty: TypeExpr,
}

/// Top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    /// `const ...`
    Const(ConstDecl),
    /// `type ...`
    Type(Vec<TypeSpec>),
}

/// A parsed file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    /// File name used in diagnostics
    pub name: String,
    /// Source text
    pub source: String,
    /// Package clause
    pub package: Ident,
    /// Declarations in source order
    pub decls: Vec<Decl>,
}

impl SourceFile {
    /// Iterates over every const spec in the file, in order.
    pub fn const_specs(&self) -> impl Iterator<Item = &ConstSpec> {
        self.decls.iter().flat_map(|decl| match decl {
            Decl::Const(c) => c.specs.as_slice(),
            Decl::Type(_) => &[],
        })
    }
}
