//! Lexer for Go source text.
//!
//! Converts a file into a token vector plus the list of comments, applying
//! Go's automatic semicolon insertion at line ends. Comments are kept out of
//! the token stream; the parser looks them up by position.

use crate::ast::Comment;
use crate::token::{Keyword, Op, Span, Token, TokenKind};
use std::fmt;

/// A lexical or syntactic error with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// What went wrong
    pub message: String,
    /// Where it went wrong
    pub span: Span,
}

impl SyntaxError {
    pub(crate) fn new(message: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            message: message.into(),
            span: Span::new(start, end),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {}..{})", self.message, self.span.start, self.span.end)
    }
}

impl std::error::Error for SyntaxError {}

/// Output of [`tokenize`].
#[derive(Debug, Clone, Default)]
pub struct Lexed {
    /// Tokens, terminated by [`TokenKind::Eof`]
    pub tokens: Vec<Token>,
    /// Comments in source order
    pub comments: Vec<Comment>,
}

/// Tokenizes a whole file.
///
/// # Errors
///
/// Returns [`SyntaxError`] on malformed literals, unterminated comments or
/// strings, and characters that cannot start a token.
///
/// # Examples
///
/// ```
/// use enumschema_loader::lexer::tokenize;
/// use enumschema_loader::token::TokenKind;
///
/// let lexed = tokenize("const A = 1 // one\n").unwrap();
/// assert_eq!(lexed.tokens.len(), 6); // const A = 1 ; EOF
/// assert_eq!(lexed.tokens[4].kind, TokenKind::Semicolon);
/// assert_eq!(lexed.comments[0].body(), " one");
/// ```
pub fn tokenize(source: &str) -> Result<Lexed, SyntaxError> {
    Lexer::new(source).run()
}

/// Pull-based lexer over one file.
struct Lexer<'a> {
    source: &'a str,
    cursor: usize,
    line: usize,
    insert_semi: bool,
    out: Lexed,
}

enum Escaped {
    Char(char),
    Byte(u8),
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            cursor: 0,
            line: 1,
            insert_semi: false,
            out: Lexed::default(),
        }
    }

    fn run(mut self) -> Result<Lexed, SyntaxError> {
        if self.peek_char() == Some('\u{feff}') {
            self.bump_char();
        }

        loop {
            self.skip_blanks();
            let start = self.cursor;
            match self.peek_char() {
                None => {
                    if self.insert_semi {
                        self.push(TokenKind::Semicolon, start, start);
                    }
                    self.push(TokenKind::Eof, start, start);
                    break;
                }
                Some('\n') => {
                    if self.insert_semi {
                        self.push(TokenKind::Semicolon, start, start + 1);
                    }
                    self.insert_semi = false;
                    self.bump_char();
                }
                Some('/') if self.peek_next_char() == Some('/') => self.lex_line_comment(),
                Some('/') if self.peek_next_char() == Some('*') => self.lex_block_comment()?,
                Some(ch) if is_letter(ch) => self.lex_identifier_or_keyword(),
                Some(ch) if ch.is_ascii_digit() => self.lex_number()?,
                Some('.') if self.peek_next_char().is_some_and(|c| c.is_ascii_digit()) => {
                    self.lex_number()?;
                }
                Some('\'') => self.lex_rune()?,
                Some('"') => self.lex_string()?,
                Some('`') => self.lex_raw_string()?,
                Some(_) => self.lex_symbol()?,
            }
        }

        Ok(self.out)
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.insert_semi = kind.ends_statement();
        self.out.tokens.push(Token {
            kind,
            span: Span::new(start, end),
            end_line: self.line,
        });
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.cursor..].chars().next()
    }

    fn peek_next_char(&self) -> Option<char> {
        let mut chars = self.source[self.cursor..].chars();
        chars.next();
        chars.next()
    }

    fn bump_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.cursor += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while let Some(ch) = self.peek_char() {
            if !pred(ch) {
                break;
            }
            self.bump_char();
            count += 1;
        }
        count
    }

    fn skip_blanks(&mut self) {
        self.bump_while(|c| matches!(c, ' ' | '\t' | '\r'));
    }

    fn lex_line_comment(&mut self) {
        let start = self.cursor;
        let line = self.line;
        self.bump_while(|c| c != '\n');
        self.out.comments.push(Comment {
            text: self.source[start..self.cursor].trim_end_matches('\r').to_string(),
            span: Span::new(start, self.cursor),
            line,
            block: false,
        });
    }

    fn lex_block_comment(&mut self) -> Result<(), SyntaxError> {
        let start = self.cursor;
        let line = self.line;
        self.bump_char();
        self.bump_char();
        loop {
            match self.bump_char() {
                Some('*') if self.peek_char() == Some('/') => {
                    self.bump_char();
                    break;
                }
                Some(_) => {}
                None => {
                    return Err(SyntaxError::new("comment not terminated", start, self.cursor));
                }
            }
        }

        self.out.comments.push(Comment {
            text: self.source[start..self.cursor].to_string(),
            span: Span::new(start, self.cursor),
            line,
            block: true,
        });

        // A block comment spanning lines acts like a newline.
        if self.line > line && self.insert_semi {
            self.push(TokenKind::Semicolon, self.cursor, self.cursor);
            self.insert_semi = false;
        }
        Ok(())
    }

    fn lex_identifier_or_keyword(&mut self) {
        let start = self.cursor;
        self.bump_while(|c| is_letter(c) || c.is_numeric());
        let ident = &self.source[start..self.cursor];
        let kind = Keyword::from_ident(ident)
            .map_or_else(|| TokenKind::Ident(ident.to_string()), TokenKind::Keyword);
        self.push(kind, start, self.cursor);
    }

    fn lex_number(&mut self) -> Result<(), SyntaxError> {
        let start = self.cursor;
        let mut is_float = false;

        let prefix = if self.peek_char() == Some('0') {
            self.peek_next_char().map(|c| c.to_ascii_lowercase())
        } else {
            None
        };

        match prefix {
            Some('x') => {
                self.bump_char();
                self.bump_char();
                let mut digits = self.bump_while(|c| c.is_ascii_hexdigit() || c == '_');
                if self.peek_char() == Some('.') {
                    is_float = true;
                    self.bump_char();
                    digits += self.bump_while(|c| c.is_ascii_hexdigit() || c == '_');
                }
                if digits == 0 {
                    return Err(SyntaxError::new(
                        "hexadecimal literal has no digits",
                        start,
                        self.cursor,
                    ));
                }
                if matches!(self.peek_char(), Some('p' | 'P')) {
                    is_float = true;
                    self.lex_exponent(start)?;
                } else if is_float {
                    return Err(SyntaxError::new(
                        "hexadecimal mantissa requires a 'p' exponent",
                        start,
                        self.cursor,
                    ));
                }
            }
            Some('b' | 'o') => {
                self.bump_char();
                self.bump_char();
                if self.bump_while(|c| c.is_ascii_alphanumeric() || c == '_') == 0 {
                    return Err(SyntaxError::new("literal has no digits", start, self.cursor));
                }
            }
            _ => {
                self.bump_while(|c| c.is_ascii_digit() || c == '_');
                if self.peek_char() == Some('.') {
                    is_float = true;
                    self.bump_char();
                    self.bump_while(|c| c.is_ascii_digit() || c == '_');
                }
                if matches!(self.peek_char(), Some('e' | 'E')) {
                    is_float = true;
                    self.lex_exponent(start)?;
                }
            }
        }

        let imaginary = self.peek_char() == Some('i');
        if imaginary {
            self.bump_char();
        }

        let text = self.source[start..self.cursor].to_string();
        let kind = if imaginary {
            TokenKind::Imag(text)
        } else if is_float {
            TokenKind::Float(text)
        } else {
            TokenKind::Int(text)
        };
        self.push(kind, start, self.cursor);
        Ok(())
    }

    fn lex_exponent(&mut self, start: usize) -> Result<(), SyntaxError> {
        self.bump_char();
        if matches!(self.peek_char(), Some('+' | '-')) {
            self.bump_char();
        }
        if self.bump_while(|c| c.is_ascii_digit() || c == '_') == 0 {
            return Err(SyntaxError::new("exponent has no digits", start, self.cursor));
        }
        Ok(())
    }

    fn lex_rune(&mut self) -> Result<(), SyntaxError> {
        let start = self.cursor;
        self.bump_char();

        let value = match self.peek_char() {
            Some('\'') => return Err(SyntaxError::new("empty rune literal", start, self.cursor + 1)),
            Some('\n') | None => {
                return Err(SyntaxError::new("rune literal not terminated", start, self.cursor));
            }
            Some('\\') => match self.lex_escape('\'', start)? {
                Escaped::Char(ch) => u32::from(ch),
                Escaped::Byte(b) => u32::from(b),
            },
            Some(ch) => {
                self.bump_char();
                u32::from(ch)
            }
        };

        if self.peek_char() != Some('\'') {
            self.bump_while(|c| c != '\'' && c != '\n');
            return Err(SyntaxError::new(
                "more than one character in rune literal",
                start,
                self.cursor,
            ));
        }
        self.bump_char();
        self.push(TokenKind::Rune(value), start, self.cursor);
        Ok(())
    }

    fn lex_string(&mut self) -> Result<(), SyntaxError> {
        let start = self.cursor;
        self.bump_char();

        let mut bytes = Vec::new();
        loop {
            match self.peek_char() {
                Some('"') => {
                    self.bump_char();
                    break;
                }
                Some('\\') => match self.lex_escape('"', start)? {
                    Escaped::Char(ch) => {
                        let mut buf = [0; 4];
                        bytes.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                    }
                    Escaped::Byte(b) => bytes.push(b),
                },
                Some('\n') | None => {
                    return Err(SyntaxError::new(
                        "string literal not terminated",
                        start,
                        self.cursor,
                    ));
                }
                Some(ch) => {
                    self.bump_char();
                    let mut buf = [0; 4];
                    bytes.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                }
            }
        }

        let value = String::from_utf8_lossy(&bytes).into_owned();
        self.push(TokenKind::Str(value), start, self.cursor);
        Ok(())
    }

    fn lex_raw_string(&mut self) -> Result<(), SyntaxError> {
        let start = self.cursor;
        self.bump_char();
        let body_start = self.cursor;
        loop {
            match self.bump_char() {
                Some('`') => break,
                Some(_) => {}
                None => {
                    return Err(SyntaxError::new(
                        "raw string literal not terminated",
                        start,
                        self.cursor,
                    ));
                }
            }
        }
        let value = self.source[body_start..self.cursor - 1].replace('\r', "");
        self.push(TokenKind::Str(value), start, self.cursor);
        Ok(())
    }

    /// Decodes one escape sequence; the cursor sits on the backslash.
    fn lex_escape(&mut self, quote: char, literal_start: usize) -> Result<Escaped, SyntaxError> {
        let esc_start = self.cursor;
        self.bump_char();
        let Some(ch) = self.bump_char() else {
            return Err(SyntaxError::new("escape sequence not terminated", literal_start, self.cursor));
        };

        let simple = match ch {
            'a' => Some('\u{7}'),
            'b' => Some('\u{8}'),
            'f' => Some('\u{c}'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            'v' => Some('\u{b}'),
            '\\' => Some('\\'),
            c if c == quote => Some(c),
            _ => None,
        };
        if let Some(c) = simple {
            return Ok(Escaped::Char(c));
        }

        let (digits, radix) = match ch {
            'x' => (2, 16),
            'u' => (4, 16),
            'U' => (8, 16),
            '0'..='7' => (2, 8),
            _ => {
                return Err(SyntaxError::new("unknown escape sequence", esc_start, self.cursor));
            }
        };

        let mut value = if radix == 8 { ch.to_digit(8).unwrap_or(0) } else { 0 };
        for _ in 0..digits {
            let digit = self.peek_char().and_then(|c| c.to_digit(radix));
            let Some(digit) = digit else {
                return Err(SyntaxError::new(
                    "illegal character in escape sequence",
                    esc_start,
                    self.cursor,
                ));
            };
            self.bump_char();
            value = value * radix + digit;
        }

        match ch {
            'x' | '0'..='7' => u8::try_from(value)
                .map(Escaped::Byte)
                .map_err(|_| SyntaxError::new("octal escape value > 255", esc_start, self.cursor)),
            _ => char::from_u32(value).map(Escaped::Char).ok_or_else(|| {
                SyntaxError::new(
                    "escape sequence is invalid Unicode code point",
                    esc_start,
                    self.cursor,
                )
            }),
        }
    }

    fn lex_symbol(&mut self) -> Result<(), SyntaxError> {
        let start = self.cursor;
        let rest = &self.source[start..];
        for len in [3, 2, 1] {
            if let Some(kind) = rest.get(..len).and_then(punct) {
                self.cursor += len;
                self.push(kind, start, self.cursor);
                return Ok(());
            }
        }

        let ch = self.peek_char().unwrap_or('\0');
        Err(SyntaxError::new(
            format!("invalid character U+{:04X}", u32::from(ch)),
            start,
            start + ch.len_utf8(),
        ))
    }
}

fn is_letter(ch: char) -> bool {
    ch == '_' || ch.is_alphabetic()
}

fn punct(text: &str) -> Option<TokenKind> {
    Some(match text {
        "(" => TokenKind::LParen,
        ")" => TokenKind::RParen,
        "[" => TokenKind::LBracket,
        "]" => TokenKind::RBracket,
        "{" => TokenKind::LBrace,
        "}" => TokenKind::RBrace,
        "," => TokenKind::Comma,
        ";" => TokenKind::Semicolon,
        "." => TokenKind::Dot,
        "=" => TokenKind::Assign,
        "+" => TokenKind::Op(Op::Add),
        "-" => TokenKind::Op(Op::Sub),
        "*" => TokenKind::Op(Op::Mul),
        "/" => TokenKind::Op(Op::Quo),
        "%" => TokenKind::Op(Op::Rem),
        "&" => TokenKind::Op(Op::And),
        "|" => TokenKind::Op(Op::Or),
        "^" => TokenKind::Op(Op::Xor),
        "<<" => TokenKind::Op(Op::Shl),
        ">>" => TokenKind::Op(Op::Shr),
        "&^" => TokenKind::Op(Op::AndNot),
        "&&" => TokenKind::Op(Op::LAnd),
        "||" => TokenKind::Op(Op::LOr),
        "==" => TokenKind::Op(Op::Eql),
        "!=" => TokenKind::Op(Op::Neq),
        "<" => TokenKind::Op(Op::Lss),
        "<=" => TokenKind::Op(Op::Leq),
        ">" => TokenKind::Op(Op::Gtr),
        ">=" => TokenKind::Op(Op::Geq),
        "!" => TokenKind::Op(Op::Not),
        "..." => TokenKind::Other("..."),
        ":" => TokenKind::Other(":"),
        ":=" => TokenKind::Other(":="),
        "~" => TokenKind::Other("~"),
        "<-" => TokenKind::Other("<-"),
        "++" => TokenKind::Other("++"),
        "--" => TokenKind::Other("--"),
        "+=" => TokenKind::Other("+="),
        "-=" => TokenKind::Other("-="),
        "*=" => TokenKind::Other("*="),
        "/=" => TokenKind::Other("/="),
        "%=" => TokenKind::Other("%="),
        "&=" => TokenKind::Other("&="),
        "|=" => TokenKind::Other("|="),
        "^=" => TokenKind::Other("^="),
        "<<=" => TokenKind::Other("<<="),
        ">>=" => TokenKind::Other(">>="),
        "&^=" => TokenKind::Other("&^="),
        _ => return None,
    })
}
