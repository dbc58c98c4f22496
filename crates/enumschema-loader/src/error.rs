//! Loader error types.

use crate::package::IdentId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that prevent a package from being loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading a file or directory failed.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        /// Path being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Walking a recursive `/...` pattern failed.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// The source text is not valid Go.
    #[error("{file}:{line}:{column}: {message}")]
    Syntax {
        /// File name
        file: String,
        /// 1-based line
        line: usize,
        /// 1-based column
        column: usize,
        /// What went wrong
        message: String,
    },

    /// A pattern names a path that does not exist.
    #[error("pattern {pattern}: no such file or directory")]
    PatternNotFound {
        /// The offending pattern
        pattern: String,
    },

    /// A directory pattern matched no buildable Go files.
    #[error("no buildable Go files in {}", dir.display())]
    NoGoFiles {
        /// The directory searched
        dir: PathBuf,
    },

    /// Files of one package declare different package names.
    #[error("found packages {first} and {second} in {}", dir.display())]
    MixedPackages {
        /// Directory holding the files
        dir: PathBuf,
        /// First package name seen
        first: String,
        /// Conflicting package name
        second: String,
    },

    /// A `//go:build` line could not be evaluated.
    #[error("{}: {message}", path.display())]
    BuildConstraint {
        /// File carrying the line
        path: PathBuf,
        /// What went wrong
        message: String,
    },

    /// File patterns and directory patterns were combined.
    #[error("named files must be .go files and cannot be mixed with directories: {pattern}")]
    MixedPatterns {
        /// The first pattern that broke the rule
        pattern: String,
    },
}

/// Result alias for loader operations.
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// A constant or type declaration the checker could not resolve.
///
/// Check errors do not abort loading; the affected names are left out of
/// the symbol table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{file}:{line}: {message}")]
pub struct CheckError {
    /// Declaration site of the skipped constant
    pub site: IdentId,
    /// File name
    pub file: String,
    /// 1-based line
    pub line: usize,
    /// What went wrong
    pub message: String,
}

/// Converts a byte offset into a 1-based line and column.
#[must_use]
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let column = before
        .rfind('\n')
        .map_or(before.chars().count(), |nl| before[nl + 1..].chars().count())
        + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_first_line() {
        assert_eq!(line_col("package x", 0), (1, 1));
        assert_eq!(line_col("package x", 8), (1, 9));
    }

    #[test]
    fn test_line_col_after_newline() {
        let src = "package x\n\nconst A = 1";
        assert_eq!(line_col(src, 11), (3, 1));
        assert_eq!(line_col(src, 17), (3, 7));
    }

    #[test]
    fn test_syntax_error_display() {
        let err = LoadError::Syntax {
            file: "a.go".to_string(),
            line: 3,
            column: 7,
            message: "expected ')'".to_string(),
        };
        assert_eq!(err.to_string(), "a.go:3:7: expected ')'");
    }
}
