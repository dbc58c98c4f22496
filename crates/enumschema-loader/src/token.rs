//! Token definitions for the Go lexer.

use std::fmt;

/// Byte range of a token or node within its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Offset of the first byte
    pub start: usize,
    /// Offset one past the last byte
    pub end: usize,
}

impl Span {
    /// Creates a span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both.
    #[must_use]
    pub fn to(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Go keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Keyword {
    Break,
    Case,
    Chan,
    Const,
    Continue,
    Default,
    Defer,
    Else,
    Fallthrough,
    For,
    Func,
    Go,
    Goto,
    If,
    Import,
    Interface,
    Map,
    Package,
    Range,
    Return,
    Select,
    Struct,
    Switch,
    Type,
    Var,
}

impl Keyword {
    /// Looks up a keyword by its spelling.
    #[must_use]
    pub fn from_ident(ident: &str) -> Option<Self> {
        Some(match ident {
            "break" => Self::Break,
            "case" => Self::Case,
            "chan" => Self::Chan,
            "const" => Self::Const,
            "continue" => Self::Continue,
            "default" => Self::Default,
            "defer" => Self::Defer,
            "else" => Self::Else,
            "fallthrough" => Self::Fallthrough,
            "for" => Self::For,
            "func" => Self::Func,
            "go" => Self::Go,
            "goto" => Self::Goto,
            "if" => Self::If,
            "import" => Self::Import,
            "interface" => Self::Interface,
            "map" => Self::Map,
            "package" => Self::Package,
            "range" => Self::Range,
            "return" => Self::Return,
            "select" => Self::Select,
            "struct" => Self::Struct,
            "switch" => Self::Switch,
            "type" => Self::Type,
            "var" => Self::Var,
            _ => return None,
        })
    }
}

/// Operators that can appear in constant expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Quo,
    /// `%`
    Rem,
    /// `&`
    And,
    /// `|`
    Or,
    /// `^`
    Xor,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `&^`
    AndNot,
    /// `&&`
    LAnd,
    /// `||`
    LOr,
    /// `==`
    Eql,
    /// `!=`
    Neq,
    /// `<`
    Lss,
    /// `<=`
    Leq,
    /// `>`
    Gtr,
    /// `>=`
    Geq,
    /// `!`
    Not,
}

impl Op {
    /// Binary precedence, or `None` for unary-only operators.
    #[must_use]
    pub const fn precedence(self) -> Option<u8> {
        match self {
            Self::LOr => Some(1),
            Self::LAnd => Some(2),
            Self::Eql | Self::Neq | Self::Lss | Self::Leq | Self::Gtr | Self::Geq => Some(3),
            Self::Add | Self::Sub | Self::Or | Self::Xor => Some(4),
            Self::Mul | Self::Quo | Self::Rem | Self::Shl | Self::Shr | Self::And | Self::AndNot => {
                Some(5)
            }
            Self::Not => None,
        }
    }

    /// Source spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Quo => "/",
            Self::Rem => "%",
            Self::And => "&",
            Self::Or => "|",
            Self::Xor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::AndNot => "&^",
            Self::LAnd => "&&",
            Self::LOr => "||",
            Self::Eql => "==",
            Self::Neq => "!=",
            Self::Lss => "<",
            Self::Leq => "<=",
            Self::Gtr => ">",
            Self::Geq => ">=",
            Self::Not => "!",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token categories produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier
    Ident(String),
    /// Integer literal, raw text
    Int(String),
    /// Floating-point literal, raw text
    Float(String),
    /// Imaginary literal, raw text
    Imag(String),
    /// Rune literal, decoded code point
    Rune(u32),
    /// String literal, decoded contents
    Str(String),
    /// Keyword
    Keyword(Keyword),
    /// Expression operator
    Op(Op),
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `,`
    Comma,
    /// `;`, explicit or inserted at a line end
    Semicolon,
    /// `.`
    Dot,
    /// `=`
    Assign,
    /// Any other punctuation (`:=`, `+=`, `++`, `<-`, `...`, `:`, `~`, ...)
    Other(&'static str),
    /// End of input
    Eof,
}

impl TokenKind {
    /// Whether a newline after this token inserts a semicolon.
    #[must_use]
    pub fn ends_statement(&self) -> bool {
        matches!(
            self,
            Self::Ident(_)
                | Self::Int(_)
                | Self::Float(_)
                | Self::Imag(_)
                | Self::Rune(_)
                | Self::Str(_)
                | Self::Keyword(
                    Keyword::Break | Keyword::Continue | Keyword::Fallthrough | Keyword::Return
                )
                | Self::Other("++" | "--")
                | Self::RParen
                | Self::RBracket
                | Self::RBrace
        )
    }

    /// Short description used in syntax errors.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Ident(name) => format!("name {name}"),
            Self::Int(text) | Self::Float(text) | Self::Imag(text) => format!("literal {text}"),
            Self::Rune(_) => "rune literal".to_string(),
            Self::Str(_) => "string literal".to_string(),
            Self::Keyword(kw) => format!("keyword {}", format!("{kw:?}").to_lowercase()),
            Self::Op(op) => format!("'{op}'"),
            Self::LParen => "'('".to_string(),
            Self::RParen => "')'".to_string(),
            Self::LBracket => "'['".to_string(),
            Self::RBracket => "']'".to_string(),
            Self::LBrace => "'{'".to_string(),
            Self::RBrace => "'}'".to_string(),
            Self::Comma => "','".to_string(),
            Self::Semicolon => "newline or ';'".to_string(),
            Self::Dot => "'.'".to_string(),
            Self::Assign => "'='".to_string(),
            Self::Other(text) => format!("'{text}'"),
            Self::Eof => "EOF".to_string(),
        }
    }
}

/// A token with its location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Category and payload
    pub kind: TokenKind,
    /// Byte range
    pub span: Span,
    /// 1-based line of the token's last byte
    pub end_line: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(Keyword::from_ident("const"), Some(Keyword::Const));
        assert_eq!(Keyword::from_ident("iota"), None);
    }

    #[test]
    fn test_precedence_ordering() {
        assert!(Op::Mul.precedence() > Op::Add.precedence());
        assert!(Op::Add.precedence() > Op::Eql.precedence());
        assert!(Op::LAnd.precedence() > Op::LOr.precedence());
        assert_eq!(Op::Not.precedence(), None);
    }

    #[test]
    fn test_semicolon_insertion_triggers() {
        assert!(TokenKind::Ident("x".into()).ends_statement());
        assert!(TokenKind::RParen.ends_statement());
        assert!(TokenKind::Keyword(Keyword::Return).ends_statement());
        assert!(!TokenKind::Keyword(Keyword::Const).ends_statement());
        assert!(!TokenKind::Op(Op::Add).ends_statement());
        assert!(!TokenKind::LParen.ends_statement());
    }

    #[test]
    fn test_span_to() {
        let span = Span::new(4, 6).to(Span::new(1, 3));
        assert_eq!(span, Span::new(1, 6));
    }
}
