//! Package loading from file and directory patterns.
//!
//! # Examples
//!
//! ```no_run
//! use enumschema_loader::{GoSourceLoader, SourceLoader};
//!
//! let packages = GoSourceLoader::new().load(&["./fruit".to_string()]).unwrap();
//! for pkg in &packages {
//!     println!("{}: {} constants", pkg.name, pkg.symbols.len());
//! }
//! ```

use crate::ast::SourceFile;
use crate::checker::check_package;
use crate::constraint::BuildContext;
use crate::error::{LoadError, LoadResult};
use crate::package::Package;
use crate::parser::parse_file;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Source of checked packages.
///
/// Implementations turn a list of patterns into loaded packages. Pattern
/// syntax is up to the implementation.
pub trait SourceLoader {
    /// Loads the packages matched by `patterns`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if a pattern cannot be resolved or a file
    /// cannot be read or parsed.
    fn load(&self, patterns: &[String]) -> LoadResult<Vec<Package>>;
}

/// Loads Go packages from the local filesystem.
///
/// Patterns are directories, `.go` files, or a directory followed by `/...`
/// for a recursive walk. Relative patterns resolve against the base
/// directory, which defaults to the process working directory.
///
/// Files found through a directory pattern are subject to build
/// constraints, evaluated against the host platform unless another
/// [`BuildContext`] is set. Files named explicitly are always loaded.
#[derive(Debug, Clone, Default)]
pub struct GoSourceLoader {
    base_dir: Option<PathBuf>,
    context: BuildContext,
}

#[derive(Debug)]
enum Pattern {
    File(PathBuf),
    Dir(PathBuf),
    Recursive(PathBuf),
}

impl GoSourceLoader {
    /// Creates a loader resolving patterns against the working directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves relative patterns against `dir` instead.
    #[must_use]
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Matches build constraints against `context` instead of the host.
    #[must_use]
    pub fn with_build_context(mut self, context: BuildContext) -> Self {
        self.context = context;
        self
    }

    fn resolve(&self, pattern: &str) -> PathBuf {
        match &self.base_dir {
            Some(base) => base.join(pattern),
            None => PathBuf::from(pattern),
        }
    }

    fn classify(&self, pattern: &str) -> LoadResult<Pattern> {
        if pattern == "..." || pattern.ends_with("/...") {
            let root = pattern.trim_end_matches("...").trim_end_matches('/');
            let root = self.resolve(if root.is_empty() { "." } else { root });
            if !root.is_dir() {
                return Err(LoadError::PatternNotFound {
                    pattern: pattern.to_string(),
                });
            }
            return Ok(Pattern::Recursive(root));
        }

        let path = self.resolve(pattern);
        if pattern.ends_with(".go") && path.is_file() {
            Ok(Pattern::File(path))
        } else if path.is_dir() {
            Ok(Pattern::Dir(path))
        } else {
            Err(LoadError::PatternNotFound {
                pattern: pattern.to_string(),
            })
        }
    }
}

impl SourceLoader for GoSourceLoader {
    fn load(&self, patterns: &[String]) -> LoadResult<Vec<Package>> {
        let default = [".".to_string()];
        let patterns = if patterns.is_empty() {
            &default[..]
        } else {
            patterns
        };

        let classified = patterns
            .iter()
            .map(|p| self.classify(p))
            .collect::<LoadResult<Vec<_>>>()?;

        let is_file = |p: &Pattern| matches!(p, Pattern::File(_));
        if classified.iter().any(is_file) {
            if let Some(idx) = classified.iter().position(|p| !is_file(p)) {
                return Err(LoadError::MixedPatterns {
                    pattern: patterns[idx].clone(),
                });
            }
            let files = classified
                .into_iter()
                .filter_map(|p| match p {
                    Pattern::File(path) => Some(path),
                    _ => None,
                })
                .map(|path| read_source(&path).map(|source| (path, source)))
                .collect::<LoadResult<Vec<_>>>()?;
            let dir = files
                .first()
                .and_then(|(f, _)| f.parent())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
            return Ok(vec![load_package(&dir, files)?]);
        }

        let mut packages = Vec::new();
        let mut seen: Vec<PathBuf> = Vec::new();
        for pattern in classified {
            match pattern {
                Pattern::Dir(dir) => {
                    if seen.contains(&dir) {
                        continue;
                    }
                    let files = go_files_in(&dir, &self.context)?;
                    if files.is_empty() {
                        return Err(LoadError::NoGoFiles { dir });
                    }
                    packages.push(load_package(&dir, files)?);
                    seen.push(dir);
                }
                Pattern::Recursive(root) => {
                    for dir in package_dirs(&root)? {
                        if seen.contains(&dir) {
                            continue;
                        }
                        let files = go_files_in(&dir, &self.context)?;
                        if !files.is_empty() {
                            packages.push(load_package(&dir, files)?);
                        }
                        seen.push(dir);
                    }
                }
                Pattern::File(_) => {}
            }
        }

        tracing::debug!("Loaded {} packages", packages.len());
        Ok(packages)
    }
}

/// Loads a package from in-memory `(file name, source)` pairs.
///
/// # Errors
///
/// Returns [`LoadError`] if a file fails to parse or the files disagree on
/// the package name.
pub fn load_sources(sources: &[(&str, &str)]) -> LoadResult<Package> {
    let files = sources
        .iter()
        .map(|(name, source)| parse_file(name, source))
        .collect::<LoadResult<Vec<_>>>()?;
    build_package(PathBuf::from("."), files)
}

/// Buildable Go files directly inside `dir` with their source, sorted by
/// name.
///
/// Test files, files with a `_GOOS`/`_GOARCH` suffix for another platform
/// and files whose `//go:build` line does not hold are left out.
fn go_files_in(dir: &Path, context: &BuildContext) -> LoadResult<Vec<(PathBuf, String)>> {
    let entries = fs::read_dir(dir).map_err(|source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        let buildable = name.ends_with(".go")
            && !name.ends_with("_test.go")
            && !name.starts_with('.')
            && !name.starts_with('_');
        if !buildable || !path.is_file() {
            continue;
        }
        if context.matches_file_name(&name) {
            paths.push(path);
        } else {
            tracing::debug!("Skipping {}: built only for another platform", path.display());
        }
    }
    paths.sort();

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let source = read_source(&path)?;
        let included = context
            .matches_source(&source)
            .map_err(|e| LoadError::BuildConstraint {
                path: path.clone(),
                message: e.to_string(),
            })?;
        if included {
            files.push((path, source));
        } else {
            tracing::debug!("Skipping {}: excluded by //go:build", path.display());
        }
    }
    Ok(files)
}

/// Directories below `root` that may hold a package, in walk order.
fn package_dirs(root: &Path) -> LoadResult<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            !(name.starts_with('.')
                || name.starts_with('_')
                || name == "testdata"
                || name == "vendor")
        });

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }
    Ok(dirs)
}

fn read_source(path: &Path) -> LoadResult<String> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_package(dir: &Path, sources: Vec<(PathBuf, String)>) -> LoadResult<Package> {
    let files = sources
        .into_iter()
        .map(|(path, source)| parse_file(&path.display().to_string(), &source))
        .collect::<LoadResult<Vec<_>>>()?;
    build_package(dir.to_path_buf(), files)
}

fn build_package(dir: PathBuf, files: Vec<SourceFile>) -> LoadResult<Package> {
    let name = files
        .first()
        .map(|f| f.package.name.clone())
        .ok_or_else(|| LoadError::NoGoFiles { dir: dir.clone() })?;

    if let Some(other) = files.iter().find(|f| f.package.name != name) {
        return Err(LoadError::MixedPackages {
            dir,
            first: name,
            second: other.package.name.clone(),
        });
    }

    let (symbols, diagnostics) = check_package(&files);
    tracing::debug!(
        "Loaded package {} from {} ({} files, {} constants)",
        name,
        dir.display(),
        files.len(),
        symbols.len()
    );

    Ok(Package {
        name,
        dir,
        files,
        symbols,
        diagnostics,
    })
}
