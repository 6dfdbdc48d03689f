//! Search path management for `.pc` file discovery.
//!
//! A [`SearchPath`] is an ordered list of directories probed when resolving a
//! package name to a `.pc` file; the first hit wins. The effective list is
//! assembled from `PKG_CONFIG_PATH` (prepended) and either
//! `PKG_CONFIG_LIBDIR` (which replaces the built-in list) or the built-in
//! system directories.

use std::fs;
use std::path::{Path, PathBuf};

/// Separator for `PKG_CONFIG_PATH`-style environment variables.
pub const PATH_SEPARATOR: char = ':';

/// An ordered list of directories to probe for `.pc` files.
#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    /// An empty search path.
    pub fn new() -> Self {
        Self::default()
    }

    /// A search path from a slice of directory strings.
    pub fn from_paths(paths: &[&str]) -> Self {
        Self {
            dirs: paths.iter().map(PathBuf::from).collect(),
        }
    }

    /// Parse a delimited string; empty segments are skipped.
    pub fn from_delimited(s: &str, separator: char) -> Self {
        Self {
            dirs: s
                .split(separator)
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
                .collect(),
        }
    }

    /// Append a directory.
    pub fn add<P: Into<PathBuf>>(&mut self, path: P) {
        let path = path.into();
        if !path.as_os_str().is_empty() {
            self.dirs.push(path);
        }
    }

    /// Prepend every directory of `other`, preserving its order.
    pub fn prepend_list(&mut self, other: &SearchPath) {
        let mut merged = other.dirs.clone();
        merged.append(&mut self.dirs);
        self.dirs = merged;
    }

    /// Probe the directories for `<name>.pc`, returning the first hit.
    pub fn find_pc_file(&self, name: &str) -> Option<PathBuf> {
        let filename = format!("{name}.pc");
        self.dirs
            .iter()
            .map(|dir| dir.join(&filename))
            .find(|candidate| candidate.is_file())
    }

    /// Enumerate every `.pc` file reachable from the search path as
    /// `(package_name, path)` pairs. Earlier directories shadow later ones;
    /// results are sorted by package name.
    pub fn list_all_pc_files(&self) -> Vec<(String, PathBuf)> {
        let mut found: Vec<(String, PathBuf)> = Vec::new();

        for dir in &self.dirs {
            let entries = match fs::read_dir(dir) {
                Ok(entries) => entries,
                Err(_) => continue,
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_none_or(|e| e != "pc") {
                    continue;
                }
                let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                if !found.iter().any(|(name, _)| name == stem) {
                    found.push((stem.to_string(), path));
                }
            }
        }

        found.sort_by(|(a, _), (b, _)| a.cmp(b));
        found
    }

    /// The directories as a slice.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.dirs.iter()
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// Render as a delimited string (used for the self-package's `pc_path`).
    pub fn to_delimited(&self, separator: char) -> String {
        self.dirs
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(&separator.to_string())
    }

    /// Whether `path` names a directory in this list.
    pub fn contains<P: AsRef<Path>>(&self, path: P) -> bool {
        let needle = normalize(path.as_ref());
        self.dirs.iter().any(|d| normalize(d) == needle)
    }
}

/// Trailing-slash-insensitive path text for comparisons.
fn normalize(path: &Path) -> String {
    let text = path.to_string_lossy();
    let trimmed = text.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}
