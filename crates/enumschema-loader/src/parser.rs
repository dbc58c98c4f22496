//! Recursive-descent parser for package-level Go declarations.

use crate::ast::{
    Comment, ConstDecl, ConstSpec, Decl, Expr, Ident, SourceFile, TypeExpr, TypeSpec,
};
use crate::error::{LoadError, LoadResult, line_col};
use crate::lexer::{SyntaxError, tokenize};
use crate::token::{Keyword, Op, Span, Token, TokenKind};

type PResult<T> = Result<T, SyntaxError>;

/// Parses one file.
///
/// # Errors
///
/// Returns [`LoadError::Syntax`] with the file name, line and column of the
/// first lexical or syntactic error.
///
/// # Examples
///
/// ```
/// use enumschema_loader::parser::parse_file;
///
/// let file = parse_file("a.go", "package a\n\nconst X = 1 // ex\n").unwrap();
/// assert_eq!(file.package.name, "a");
/// let spec = file.const_specs().next().unwrap();
/// assert_eq!(spec.names[0].name, "X");
/// assert_eq!(spec.trailing_comments[0].body(), " ex");
/// ```
pub fn parse_file(name: &str, source: &str) -> LoadResult<SourceFile> {
    parse_inner(name, source).map_err(|err| {
        let (line, column) = line_col(source, err.span.start);
        LoadError::Syntax {
            file: name.to_string(),
            line,
            column,
            message: err.message,
        }
    })
}

fn parse_inner(name: &str, source: &str) -> PResult<SourceFile> {
    let lexed = tokenize(source)?;
    let mut parser = Parser {
        source,
        tokens: lexed.tokens,
        comments: lexed.comments,
        pos: 0,
    };

    let package = parser.parse_package_clause()?;
    let mut decls = Vec::new();
    loop {
        match parser.peek() {
            TokenKind::Eof => break,
            TokenKind::Semicolon => {
                parser.bump();
            }
            TokenKind::Keyword(Keyword::Const) => decls.push(parser.parse_const_decl()?),
            TokenKind::Keyword(Keyword::Type) => decls.push(parser.parse_type_decl()?),
            TokenKind::Keyword(Keyword::Import | Keyword::Var | Keyword::Func) => {
                parser.skip_decl()?;
            }
            _ => return Err(parser.error_here("non-declaration statement outside function body")),
        }
    }

    Ok(SourceFile {
        name: name.to_string(),
        source: source.to_string(),
        package,
        decls,
    })
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    comments: Vec<Comment>,
    pos: usize,
}

impl Parser<'_> {
    fn peek_token(&self) -> &Token {
        // The lexer always terminates the stream with Eof.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &TokenKind {
        &self.peek_token().kind
    }

    fn bump(&mut self) -> Token {
        let token = self.peek_token().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn error_here(&self, message: impl Into<String>) -> SyntaxError {
        let span = self.peek_token().span;
        SyntaxError::new(message, span.start, span.end)
    }

    fn expected(&self, what: &str) -> SyntaxError {
        self.error_here(format!("expected {what}, found {}", self.peek().describe()))
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> PResult<Token> {
        if self.peek() == kind {
            Ok(self.bump())
        } else {
            Err(self.expected(what))
        }
    }

    fn expect_ident(&mut self) -> PResult<Ident> {
        match self.peek().clone() {
            TokenKind::Ident(name) => {
                let span = self.bump().span;
                Ok(Ident { name, span })
            }
            _ => Err(self.expected("name")),
        }
    }

    fn expect_semi(&mut self) -> PResult<()> {
        match self.peek() {
            TokenKind::Semicolon => {
                self.bump();
                Ok(())
            }
            TokenKind::Eof | TokenKind::RParen => Ok(()),
            _ => Err(self.error_here(format!(
                "expected ';', found {}",
                self.peek().describe()
            ))),
        }
    }

    fn last_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(0, |t| t.span.end)
    }

    fn parse_package_clause(&mut self) -> PResult<Ident> {
        self.expect(&TokenKind::Keyword(Keyword::Package), "'package'")?;
        let name = self.expect_ident()?;
        if name.is_blank() {
            return Err(SyntaxError::new(
                "invalid package name _",
                name.span.start,
                name.span.end,
            ));
        }
        self.expect_semi()?;
        Ok(name)
    }

    /// Skips an `import`, `var` or `func` declaration.
    fn skip_decl(&mut self) -> PResult<()> {
        self.bump();
        let mut depth = 0usize;
        loop {
            match self.peek() {
                TokenKind::Eof => {
                    if depth > 0 {
                        return Err(self.error_here("unexpected EOF"));
                    }
                    return Ok(());
                }
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    if depth == 0 {
                        return Err(self.error_here(format!(
                            "unexpected {}",
                            self.peek().describe()
                        )));
                    }
                    depth -= 1;
                }
                TokenKind::Semicolon if depth == 0 => {
                    self.bump();
                    return Ok(());
                }
                _ => {}
            }
            self.bump();
        }
    }

    /// Consumes a balanced `(...)`, `[...]` or `{...}` group.
    fn skip_balanced(&mut self) -> PResult<Span> {
        let start = self.peek_token().span.start;
        let mut depth = 0usize;
        loop {
            match self.peek() {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        let end = self.bump().span.end;
                        return Ok(Span::new(start, end));
                    }
                }
                TokenKind::Eof => return Err(self.error_here("unexpected EOF")),
                _ => {}
            }
            self.bump();
        }
    }

    /// Consumes tokens up to the end of the current list element.
    fn skip_to_boundary(&mut self, stop_at_assign: bool) -> PResult<Span> {
        let start = self.peek_token().span.start;
        loop {
            match self.peek() {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                    self.skip_balanced()?;
                }
                TokenKind::Assign if stop_at_assign => break,
                TokenKind::Comma
                | TokenKind::Semicolon
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
                | TokenKind::Eof => break,
                _ => {
                    self.bump();
                }
            }
        }
        Ok(Span::new(start, self.last_end().max(start)))
    }

    fn parse_const_decl(&mut self) -> PResult<Decl> {
        self.bump();
        let mut specs = Vec::new();

        if self.eat(&TokenKind::LParen) {
            let mut iota = 0;
            loop {
                match self.peek() {
                    TokenKind::RParen => {
                        self.bump();
                        break;
                    }
                    TokenKind::Semicolon => {
                        self.bump();
                    }
                    _ => {
                        specs.push(self.parse_const_spec(iota)?);
                        iota += 1;
                        if self.peek() != &TokenKind::RParen {
                            self.expect_semi()?;
                        }
                    }
                }
            }
            self.expect_semi()?;
            return Ok(Decl::Const(ConstDecl {
                specs,
                grouped: true,
            }));
        }

        specs.push(self.parse_const_spec(0)?);
        self.expect_semi()?;
        Ok(Decl::Const(ConstDecl {
            specs,
            grouped: false,
        }))
    }

    fn parse_const_spec(&mut self, iota: usize) -> PResult<ConstSpec> {
        let mut names = vec![self.expect_ident()?];
        while self.eat(&TokenKind::Comma) {
            names.push(self.expect_ident()?);
        }

        let ty = match self.peek() {
            TokenKind::Assign | TokenKind::Semicolon | TokenKind::RParen | TokenKind::Eof => None,
            _ => Some(self.parse_type_expr(true)?),
        };

        let values = if self.eat(&TokenKind::Assign) {
            self.parse_expr_list()?
        } else {
            Vec::new()
        };

        let trailing_comments = self.trailing_comments();
        Ok(ConstSpec {
            names,
            ty,
            values,
            iota,
            trailing_comments,
        })
    }

    /// Comments after the last consumed token on that token's line, up to
    /// the next real token.
    fn trailing_comments(&self) -> Vec<Comment> {
        let Some(last) = self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) else {
            return Vec::new();
        };

        let next = self.peek_token();
        let explicit_semi = next.kind == TokenKind::Semicolon
            && self.source.get(next.span.start..next.span.end) == Some(";");
        let bound = if explicit_semi {
            self.tokens
                .get(self.pos + 1)
                .map_or(next.span.end, |t| t.span.start)
        } else {
            next.span.start
        };

        self.comments
            .iter()
            .filter(|c| {
                c.line == last.end_line && c.span.start >= last.span.end && c.span.start < bound
            })
            .cloned()
            .collect()
    }

    fn parse_type_decl(&mut self) -> PResult<Decl> {
        self.bump();
        let mut specs = Vec::new();

        if self.eat(&TokenKind::LParen) {
            loop {
                match self.peek() {
                    TokenKind::RParen => {
                        self.bump();
                        break;
                    }
                    TokenKind::Semicolon => {
                        self.bump();
                    }
                    _ => {
                        specs.push(self.parse_type_spec()?);
                        if self.peek() != &TokenKind::RParen {
                            self.expect_semi()?;
                        }
                    }
                }
            }
        } else {
            specs.push(self.parse_type_spec()?);
        }

        self.expect_semi()?;
        Ok(Decl::Type(specs))
    }

    fn parse_type_spec(&mut self) -> PResult<TypeSpec> {
        let name = self.expect_ident()?;

        // Type parameters or an array type; neither has a basic underlying kind.
        if self.peek() == &TokenKind::LBracket {
            let span = self.skip_to_boundary(false)?;
            return Ok(TypeSpec {
                name,
                alias: false,
                ty: TypeExpr::Other(span),
            });
        }

        let alias = self.eat(&TokenKind::Assign);
        let ty = self.parse_type_expr(false)?;
        Ok(TypeSpec { name, alias, ty })
    }

    fn parse_type_expr(&mut self, in_const: bool) -> PResult<TypeExpr> {
        if let TokenKind::Ident(_) = self.peek() {
            let first = self.expect_ident()?;
            let ty = if self.eat(&TokenKind::Dot) {
                let name = self.expect_ident()?;
                TypeExpr::Qualified {
                    package: first,
                    name,
                }
            } else {
                TypeExpr::Name(first)
            };

            if self.peek() == &TokenKind::LBracket {
                let start = ty.span().start;
                self.skip_balanced()?;
                return Ok(TypeExpr::Other(Span::new(start, self.last_end())));
            }
            return Ok(ty);
        }

        match self.peek() {
            TokenKind::Semicolon | TokenKind::Eof => Err(self.expected("type")),
            _ => Ok(TypeExpr::Other(self.skip_to_boundary(in_const)?)),
        }
    }

    fn parse_expr_list(&mut self) -> PResult<Vec<Expr>> {
        let mut exprs = vec![self.parse_expr()?];
        while self.eat(&TokenKind::Comma) {
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }

    fn parse_expr(&mut self) -> PResult<Expr> {
        self.parse_binary(1)
    }

    fn parse_binary(&mut self, min_prec: u8) -> PResult<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let TokenKind::Op(op) = *self.peek() else {
                break;
            };
            let Some(prec) = op.precedence() else {
                break;
            };
            if prec < min_prec {
                break;
            }
            self.bump();
            let rhs = self.parse_binary(prec + 1)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        let start = self.peek_token().span.start;
        match *self.peek() {
            TokenKind::Op(op @ (Op::Add | Op::Sub | Op::Xor | Op::Not)) => {
                self.bump();
                let operand = self.parse_unary()?;
                let span = Span::new(start, operand.span().end);
                Ok(Expr::Unary {
                    op,
                    operand: Box::new(operand),
                    span,
                })
            }
            TokenKind::Op(Op::Mul | Op::And) | TokenKind::Other("<-") => {
                self.bump();
                let operand = self.parse_unary()?;
                Ok(Expr::Unsupported(Span::new(start, operand.span().end)))
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_operand(&mut self) -> PResult<Expr> {
        let token = self.peek_token().clone();
        let span = token.span;
        let expr = match token.kind {
            TokenKind::Int(text) => Expr::Int { text, span },
            TokenKind::Float(text) => Expr::Float { text, span },
            TokenKind::Imag(text) => Expr::Imag { text, span },
            TokenKind::Rune(value) => Expr::Rune { value, span },
            TokenKind::Str(value) => Expr::Str { value, span },
            TokenKind::Ident(name) => Expr::Ident(Ident { name, span }),
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_expr()?;
                let close = self.expect(&TokenKind::RParen, "')'")?;
                return Ok(Expr::Paren {
                    inner: Box::new(inner),
                    span: Span::new(span.start, close.span.end),
                });
            }
            TokenKind::LBracket
            | TokenKind::Keyword(
                Keyword::Func | Keyword::Struct | Keyword::Map | Keyword::Chan | Keyword::Interface,
            ) => {
                return Ok(Expr::Unsupported(self.skip_to_boundary(false)?));
            }
            _ => return Err(self.expected("expression")),
        };
        self.bump();
        Ok(expr)
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_operand()?;
        loop {
            match self.peek() {
                TokenKind::Dot => {
                    self.bump();
                    if self.peek() == &TokenKind::LParen {
                        let span = self.skip_balanced()?;
                        expr = Expr::Unsupported(expr.span().to(span));
                        continue;
                    }
                    let sel = self.expect_ident()?;
                    expr = Expr::Selector {
                        base: Box::new(expr),
                        sel,
                    };
                }
                TokenKind::LParen => {
                    self.bump();
                    let mut args = Vec::new();
                    while self.peek() != &TokenKind::RParen {
                        args.push(self.parse_expr()?);
                        self.eat(&TokenKind::Other("..."));
                        if !self.eat(&TokenKind::Comma) {
                            break;
                        }
                    }
                    let close = self.expect(&TokenKind::RParen, "')'")?;
                    let span = expr.span().to(close.span);
                    expr = Expr::Call {
                        func: Box::new(expr),
                        args,
                        span,
                    };
                }
                TokenKind::LBracket | TokenKind::LBrace => {
                    let span = self.skip_balanced()?;
                    expr = Expr::Unsupported(expr.span().to(span));
                }
                _ => break,
            }
        }
        Ok(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> SourceFile {
        parse_file("test.go", source).unwrap()
    }

    fn specs(file: &SourceFile) -> Vec<&ConstSpec> {
        file.const_specs().collect()
    }

    #[test]
    fn test_grouped_const_with_iota() {
        let file = parse(
            "package fruit\n\nconst (\n\tApple Fruit = iota\n\tBanana\n\t_\n\tCherry\n)\n",
        );
        let specs = specs(&file);
        assert_eq!(specs.len(), 4);
        assert_eq!(specs[0].iota, 0);
        assert_eq!(specs[3].iota, 3);
        assert!(matches!(&specs[0].ty, Some(TypeExpr::Name(id)) if id.name == "Fruit"));
        assert!(specs[1].ty.is_none());
        assert!(specs[1].values.is_empty());
        assert!(specs[2].names[0].is_blank());
    }

    #[test]
    fn test_single_const_decls_are_separate() {
        let file = parse("package p\nconst A T = 1\nconst B T = 2\n");
        assert_eq!(file.decls.len(), 2);
        let Decl::Const(decl) = &file.decls[0] else {
            panic!("expected const decl");
        };
        assert!(!decl.grouped);
    }

    #[test]
    fn test_skips_imports_vars_and_funcs() {
        let file = parse(
            "package p\n\nimport (\n\t\"fmt\"\n)\n\nvar x = map[string]int{\n\t\"a\": 1,\n}\n\n\
             func f() {\n\tif true {\n\t\tfmt.Println()\n\t}\n}\n\nconst A = 1\n",
        );
        assert_eq!(file.decls.len(), 1);
        assert_eq!(specs(&file)[0].names[0].name, "A");
    }

    #[test]
    fn test_type_decls() {
        let file = parse(
            "package p\ntype (\n\tA int\n\tB = A\n\tC struct{ x int }\n\tD[T any] []T\n\tE time.Duration\n)\n",
        );
        let Decl::Type(specs) = &file.decls[0] else {
            panic!("expected type decl");
        };
        assert_eq!(specs.len(), 5);
        assert!(matches!(&specs[0].ty, TypeExpr::Name(id) if id.name == "int"));
        assert!(specs[1].alias);
        assert!(matches!(specs[2].ty, TypeExpr::Other(_)));
        assert!(matches!(specs[3].ty, TypeExpr::Other(_)));
        assert!(matches!(specs[4].ty, TypeExpr::Qualified { .. }));
    }

    #[test]
    fn test_qualified_const_type() {
        let file = parse("package p\nconst D time.Duration = 5\n");
        assert!(matches!(specs(&file)[0].ty, Some(TypeExpr::Qualified { .. })));
    }

    #[test]
    fn test_operator_precedence() {
        let file = parse("package p\nconst X = 1 + 2*3 << 1\n");
        let Expr::Binary { op, rhs, .. } = &specs(&file)[0].values[0] else {
            panic!("expected binary");
        };
        assert_eq!(*op, Op::Add);
        assert!(matches!(**rhs, Expr::Binary { op: Op::Shl, .. }));
    }

    #[test]
    fn test_calls_and_selectors() {
        let file = parse("package p\nconst (\n\tA = T(1)\n\tB = len(\"abc\")\n\tC = pkg.Value\n)\n");
        let specs = specs(&file);
        assert!(matches!(&specs[0].values[0], Expr::Call { args, .. } if args.len() == 1));
        assert!(matches!(&specs[1].values[0], Expr::Call { .. }));
        assert!(matches!(&specs[2].values[0], Expr::Selector { .. }));
    }

    #[test]
    fn test_trailing_line_comment() {
        let file = parse("package p\nconst (\n\tA T = iota // apple\n\t// leading\n\tB\n)\n");
        let specs = specs(&file);
        assert_eq!(specs[0].trailing_comments.len(), 1);
        assert_eq!(specs[0].trailing_comments[0].body(), " apple");
        assert!(specs[1].trailing_comments.is_empty());
    }

    #[test]
    fn test_trailing_comment_after_explicit_semicolon() {
        let file = parse("package p\nconst (\n\tA = 1; // a\n\tB = 2; C = 3 // c\n)\n");
        let specs = specs(&file);
        assert_eq!(specs[0].trailing_comments[0].body(), " a");
        assert!(specs[1].trailing_comments.is_empty());
        assert_eq!(specs[2].trailing_comments[0].body(), " c");
    }

    #[test]
    fn test_multiple_trailing_comments_collected() {
        let file = parse("package p\nconst A = 1 /* x */ // y\n");
        assert_eq!(specs(&file)[0].trailing_comments.len(), 2);
    }

    #[test]
    fn test_missing_package_clause() {
        let err = parse_file("bad.go", "const A = 1\n").unwrap_err();
        assert!(matches!(err, LoadError::Syntax { line: 1, column: 1, .. }));
        assert!(err.to_string().contains("expected 'package'"));
    }

    #[test]
    fn test_syntax_error_position() {
        let err = parse_file("bad.go", "package p\nconst (\n\tA = \n)\n").unwrap_err();
        let LoadError::Syntax { line, message, .. } = err else {
            panic!("expected syntax error");
        };
        assert_eq!(line, 4);
        assert!(message.contains("expected expression"));
    }

    #[test]
    fn test_statement_outside_function() {
        let err = parse_file("bad.go", "package p\nx := 1\n").unwrap_err();
        assert!(err.to_string().contains("non-declaration statement"));
    }
}
