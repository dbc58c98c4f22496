//! Build constraints: `//go:build` lines and `_GOOS`/`_GOARCH` file name
//! suffixes.
//!
//! A [`BuildContext`] names the target platform. Files written for another
//! platform, or guarded by a tag such as `ignore`, are left out of a
//! directory's package the same way `go build` leaves them out.
//!
//! # Examples
//!
//! ```
//! use enumschema_loader::BuildContext;
//!
//! let linux = BuildContext::new("linux", "amd64");
//! assert!(linux.matches_file_name("fruit_linux.go"));
//! assert!(!linux.matches_file_name("fruit_windows_arm64.go"));
//! assert!(!linux.matches_source("//go:build ignore\n\npackage main\n").unwrap());
//! assert!(linux.matches_source("//go:build unix && !cgo\n\npackage fruit\n").unwrap());
//! ```

use thiserror::Error;

const KNOWN_OS: &[&str] = &[
    "aix",
    "android",
    "darwin",
    "dragonfly",
    "freebsd",
    "hurd",
    "illumos",
    "ios",
    "js",
    "linux",
    "nacl",
    "netbsd",
    "openbsd",
    "plan9",
    "solaris",
    "wasip1",
    "windows",
    "zos",
];

const UNIX_OS: &[&str] = &[
    "aix",
    "android",
    "darwin",
    "dragonfly",
    "freebsd",
    "hurd",
    "illumos",
    "ios",
    "linux",
    "netbsd",
    "openbsd",
    "solaris",
];

const KNOWN_ARCH: &[&str] = &[
    "386",
    "amd64",
    "amd64p32",
    "arm",
    "armbe",
    "arm64",
    "arm64be",
    "loong64",
    "mips",
    "mipsle",
    "mips64",
    "mips64le",
    "mips64p32",
    "mips64p32le",
    "ppc",
    "ppc64",
    "ppc64le",
    "riscv",
    "riscv64",
    "s390",
    "s390x",
    "sparc",
    "sparc64",
    "wasm",
];

/// A malformed or repeated `//go:build` line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid //go:build line: {0}")]
pub struct ConstraintError(String);

/// Target platform and extra tags that build constraints are matched
/// against.
///
/// Satisfied tags are the target OS and architecture, `unix` on Unix-like
/// systems, the `gc` compiler, every `go1.N` release tag and any tag added
/// with [`BuildContext::with_tag`]. `cgo` is not satisfied unless added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    goos: String,
    goarch: String,
    tags: Vec<String>,
}

impl BuildContext {
    /// Creates a context for the given Go OS and architecture names.
    #[must_use]
    pub fn new(goos: impl Into<String>, goarch: impl Into<String>) -> Self {
        Self {
            goos: goos.into(),
            goarch: goarch.into(),
            tags: Vec::new(),
        }
    }

    /// Context of the machine running the loader.
    #[must_use]
    pub fn host() -> Self {
        let little = cfg!(target_endian = "little");
        let goos = match std::env::consts::OS {
            "macos" => "darwin",
            other => other,
        };
        let goarch = match std::env::consts::ARCH {
            "x86" => "386",
            "x86_64" => "amd64",
            "aarch64" => "arm64",
            "loongarch64" => "loong64",
            "powerpc" => "ppc",
            "powerpc64" if little => "ppc64le",
            "powerpc64" => "ppc64",
            "mips" if little => "mipsle",
            "mips64" if little => "mips64le",
            "wasm32" => "wasm",
            other => other,
        };
        Self::new(goos, goarch)
    }

    /// Adds a tag that constraints treat as satisfied.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Target OS.
    #[must_use]
    pub fn goos(&self) -> &str {
        &self.goos
    }

    /// Target architecture.
    #[must_use]
    pub fn goarch(&self) -> &str {
        &self.goarch
    }

    /// Whether a single build tag holds.
    #[must_use]
    pub fn matches_tag(&self, tag: &str) -> bool {
        if self.tags.iter().any(|t| t == tag) {
            return true;
        }
        match tag {
            "gc" => true,
            "unix" => UNIX_OS.contains(&self.goos.as_str()),
            "linux" => matches!(self.goos.as_str(), "linux" | "android"),
            "solaris" => matches!(self.goos.as_str(), "solaris" | "illumos"),
            "darwin" => matches!(self.goos.as_str(), "darwin" | "ios"),
            _ => is_release_tag(tag) || tag == self.goos || tag == self.goarch,
        }
    }

    /// Whether a file name's `_GOOS`, `_GOARCH` or `_GOOS_GOARCH` suffix
    /// (before an optional `_test`) allows the file on this platform.
    ///
    /// The part before the first `_` never counts, so `windows.go` is an
    /// ordinary file.
    #[must_use]
    pub fn matches_file_name(&self, name: &str) -> bool {
        let stem = name.split_once('.').map_or(name, |(stem, _)| stem);
        let Some(idx) = stem.find('_') else {
            return true;
        };
        let mut parts: Vec<&str> = stem[idx..].split('_').collect();
        if parts.last() == Some(&"test") {
            parts.pop();
        }

        match parts.as_slice() {
            [.., os, arch] if KNOWN_OS.contains(os) && KNOWN_ARCH.contains(arch) => {
                self.matches_tag(os) && self.matches_tag(arch)
            }
            [.., last] if KNOWN_OS.contains(last) || KNOWN_ARCH.contains(last) => {
                self.matches_tag(last)
            }
            _ => true,
        }
    }

    /// Whether the `//go:build` line in the header of `source`, if any,
    /// holds.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError`] if the header carries more than one
    /// `//go:build` line or the expression does not parse.
    pub fn matches_source(&self, source: &str) -> Result<bool, ConstraintError> {
        match build_line(source)? {
            Some(expr) => Ok(Constraint::parse(expr)?.eval(&|tag| self.matches_tag(tag))),
            None => Ok(true),
        }
    }
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::host()
    }
}

fn is_release_tag(tag: &str) -> bool {
    tag.strip_prefix("go1.")
        .is_some_and(|minor| !minor.is_empty() && minor.bytes().all(|b| b.is_ascii_digit()))
}

/// Expression of the `//go:build` line in the file header.
///
/// The header is everything before the first line that is neither blank
/// nor a comment, so a `//go:build` after the package clause is ignored.
///
/// # Errors
///
/// Returns [`ConstraintError`] for a second `//go:build` line.
pub fn build_line(source: &str) -> Result<Option<&str>, ConstraintError> {
    let mut found = None;
    let mut in_block = false;

    for raw in source.lines() {
        let mut line = raw.trim();
        if in_block {
            let Some(end) = line.find("*/") else {
                continue;
            };
            in_block = false;
            line = line[end + 2..].trim_start();
        }
        while let Some(rest) = line.strip_prefix("/*") {
            if let Some(end) = rest.find("*/") {
                line = rest[end + 2..].trim_start();
            } else {
                in_block = true;
                line = "";
            }
        }
        if line.is_empty() {
            continue;
        }

        let Some(comment) = line.strip_prefix("//") else {
            break;
        };
        let Some(expr) = comment.strip_prefix("go:build") else {
            continue;
        };
        if !(expr.is_empty() || expr.starts_with([' ', '\t'])) {
            continue;
        }
        if found.is_some() {
            return Err(ConstraintError("multiple //go:build lines".to_string()));
        }
        found = Some(expr.trim());
    }
    Ok(found)
}

/// Parsed `//go:build` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// A single tag
    Tag(String),
    /// `!x`
    Not(Box<Constraint>),
    /// `x && y`
    And(Box<Constraint>, Box<Constraint>),
    /// `x || y`
    Or(Box<Constraint>, Box<Constraint>),
}

impl Constraint {
    /// Parses a build expression such as `linux && (amd64 || arm64)`.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError`] for an empty or malformed expression.
    pub fn parse(expr: &str) -> Result<Self, ConstraintError> {
        let mut parser = ExprParser {
            tokens: tokenize(expr)?,
            pos: 0,
        };
        let constraint = parser.or()?;
        match parser.tokens.get(parser.pos) {
            None => Ok(constraint),
            Some(tok) => Err(ConstraintError(format!("unexpected {tok:?} in {expr:?}"))),
        }
    }

    /// Evaluates the expression with `tag_ok` deciding single tags.
    pub fn eval<F: Fn(&str) -> bool>(&self, tag_ok: &F) -> bool {
        match self {
            Self::Tag(tag) => tag_ok(tag),
            Self::Not(inner) => !inner.eval(tag_ok),
            Self::And(left, right) => left.eval(tag_ok) && right.eval(tag_ok),
            Self::Or(left, right) => left.eval(tag_ok) || right.eval(tag_ok),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok {
    LParen,
    RParen,
    Not,
    And,
    Or,
    Tag(String),
}

fn tokenize(expr: &str) -> Result<Vec<Tok>, ConstraintError> {
    let mut tokens = Vec::new();
    let mut chars = expr.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        match c {
            ' ' | '\t' => {}
            '(' => tokens.push(Tok::LParen),
            ')' => tokens.push(Tok::RParen),
            '!' => tokens.push(Tok::Not),
            '&' | '|' => {
                if chars.next_if(|&(_, n)| n == c).is_none() {
                    return Err(ConstraintError(format!("expected {c}{c} in {expr:?}")));
                }
                tokens.push(if c == '&' { Tok::And } else { Tok::Or });
            }
            c if is_tag_char(c) => {
                let mut end = start + c.len_utf8();
                while let Some((i, n)) = chars.next_if(|&(_, n)| is_tag_char(n)) {
                    end = i + n.len_utf8();
                }
                tokens.push(Tok::Tag(expr[start..end].to_string()));
            }
            other => {
                return Err(ConstraintError(format!(
                    "unexpected character {other:?} in {expr:?}"
                )));
            }
        }
    }
    Ok(tokens)
}

fn is_tag_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

struct ExprParser {
    tokens: Vec<Tok>,
    pos: usize,
}

impl ExprParser {
    fn eat(&mut self, tok: &Tok) -> bool {
        if self.tokens.get(self.pos) == Some(tok) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn or(&mut self) -> Result<Constraint, ConstraintError> {
        let mut left = self.and()?;
        while self.eat(&Tok::Or) {
            let right = self.and()?;
            left = Constraint::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and(&mut self) -> Result<Constraint, ConstraintError> {
        let mut left = self.not()?;
        while self.eat(&Tok::And) {
            let right = self.not()?;
            left = Constraint::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn not(&mut self) -> Result<Constraint, ConstraintError> {
        if self.eat(&Tok::Not) {
            return Ok(Constraint::Not(Box::new(self.not()?)));
        }
        if self.eat(&Tok::LParen) {
            let inner = self.or()?;
            if !self.eat(&Tok::RParen) {
                return Err(ConstraintError("missing )".to_string()));
            }
            return Ok(inner);
        }
        match self.tokens.get(self.pos) {
            Some(Tok::Tag(tag)) => {
                let tag = tag.clone();
                self.pos += 1;
                Ok(Constraint::Tag(tag))
            }
            Some(tok) => Err(ConstraintError(format!("unexpected {tok:?}"))),
            None => Err(ConstraintError("unexpected end of expression".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linux() -> BuildContext {
        BuildContext::new("linux", "amd64")
    }

    #[test]
    fn test_file_name_suffixes() {
        let ctx = linux();
        assert!(ctx.matches_file_name("fruit.go"));
        assert!(ctx.matches_file_name("windows.go"));
        assert!(ctx.matches_file_name("fruit_linux.go"));
        assert!(ctx.matches_file_name("fruit_amd64.go"));
        assert!(ctx.matches_file_name("fruit_linux_amd64.go"));
        assert!(ctx.matches_file_name("fruit_kinds.go"));
        assert!(!ctx.matches_file_name("fruit_windows.go"));
        assert!(!ctx.matches_file_name("fruit_arm64.go"));
        assert!(!ctx.matches_file_name("fruit_linux_arm64.go"));
        assert!(!ctx.matches_file_name("fruit_windows_test.go"));
    }

    #[test]
    fn test_implied_os_tags() {
        let android = BuildContext::new("android", "arm64");
        assert!(android.matches_tag("linux"));
        assert!(android.matches_tag("unix"));
        assert!(android.matches_file_name("x_linux.go"));
        assert!(!BuildContext::new("windows", "amd64").matches_tag("unix"));
        assert!(BuildContext::new("ios", "arm64").matches_tag("darwin"));
    }

    #[test]
    fn test_release_and_custom_tags() {
        let ctx = linux().with_tag("enum_extra");
        assert!(ctx.matches_tag("go1.21"));
        assert!(ctx.matches_tag("gc"));
        assert!(ctx.matches_tag("enum_extra"));
        assert!(!ctx.matches_tag("go1."));
        assert!(!ctx.matches_tag("cgo"));
        assert!(!ctx.matches_tag("ignore"));
    }

    #[test]
    fn test_expression_precedence() {
        let ctx = linux();
        let eval = |expr: &str| Constraint::parse(expr).unwrap().eval(&|t| ctx.matches_tag(t));
        assert!(eval("linux"));
        assert!(eval("windows || linux && amd64"));
        assert!(!eval("(windows || linux) && arm64"));
        assert!(eval("!windows && !(darwin || ignore)"));
        assert!(!eval("!!windows"));
    }

    #[test]
    fn test_malformed_expressions() {
        for expr in ["", "linux &", "(linux", "linux)", "linux windows", "a || || b", "a-b"] {
            assert!(Constraint::parse(expr).is_err(), "{expr}");
        }
    }

    #[test]
    fn test_build_line_in_header_only() {
        assert_eq!(
            build_line("// Copyright\n\n//go:build ignore\n\npackage main\n").unwrap(),
            Some("ignore")
        );
        assert_eq!(
            build_line("/* license\n text */\n//go:build  linux \npackage x\n").unwrap(),
            Some("linux")
        );
        assert_eq!(build_line("package x\n//go:build ignore\n").unwrap(), None);
        assert_eq!(build_line("//go:buildx ignore\npackage x\n").unwrap(), None);
        assert!(build_line("//go:build a\n//go:build b\npackage x\n").is_err());
    }

    #[test]
    fn test_matches_source() {
        let ctx = linux();
        assert!(ctx.matches_source("package fruit\n").unwrap());
        assert!(!ctx.matches_source("//go:build ignore\n\npackage main\n").unwrap());
        assert!(ctx.matches_source("//go:build !windows\n\npackage fruit\n").unwrap());
        assert!(ctx.matches_source("//go:build linux &&\n").is_err());
    }

    #[test]
    fn test_host_uses_go_names() {
        let host = BuildContext::host();
        assert_ne!(host.goos(), "macos");
        assert_ne!(host.goarch(), "x86_64");
        assert_ne!(host.goarch(), "aarch64");
        assert_eq!(BuildContext::default(), host);
    }
}
