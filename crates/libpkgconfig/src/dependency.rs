//! Dependency specifications: a package name with an optional version
//! constraint.
//!
//! Dependencies come from `Requires` / `Requires.private` tokens and from
//! command-line positionals. In both places the textual form is a bare name
//! or `name OP version`, with commas and whitespace as separators.

use crate::error::{Error, Result};
use crate::parser::split_requires;
use crate::version::{Comparator, is_operator_char};

/// A single dependency: package name plus optional version constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// The package name (e.g. `glib-2.0`).
    pub package: String,

    /// The constraint operator; `Any` when unconstrained.
    pub compare: Comparator,

    /// The constraint version, present iff `compare` is not `Any`.
    pub version: Option<String>,
}

impl Dependency {
    /// An unconstrained dependency on `package`.
    pub fn unconstrained(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            compare: Comparator::Any,
            version: None,
        }
    }

    /// A constrained dependency.
    pub fn with_version(
        package: impl Into<String>,
        compare: Comparator,
        version: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            compare,
            version: Some(version.into()),
        }
    }

    /// Parse a single fused token (`zlib`, `foo>=1.2`).
    pub fn parse(token: &str) -> Result<Self> {
        let op_start = match token.find(is_operator_char) {
            Some(pos) => pos,
            None => return Ok(Self::unconstrained(token)),
        };

        let package = token[..op_start].to_string();
        let rest = &token[op_start..];
        let op_end = rest
            .find(|c| !is_operator_char(c))
            .unwrap_or(rest.len());
        let compare = Comparator::from_str(&rest[..op_end])?;
        let version = &rest[op_end..];

        if package.is_empty() || version.is_empty() {
            return Err(Error::ArgumentError {
                message: format!("malformed package specification '{token}'"),
            });
        }

        Ok(Self::with_version(package, compare, version))
    }

    /// Whether `installed` satisfies this dependency's constraint.
    pub fn satisfied_by(&self, installed: &str) -> bool {
        match &self.version {
            Some(required) => self.compare.eval(installed, required),
            None => true,
        }
    }
}

impl std::fmt::Display for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{} {} {}", self.package, self.compare, version),
            None => f.write_str(&self.package),
        }
    }
}

/// An ordered list of dependencies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyList {
    entries: Vec<Dependency>,
}

impl DependencyList {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma/whitespace-separated list of specifications.
    pub fn parse(input: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for token in split_requires(input) {
            entries.push(Dependency::parse(&token)?);
        }
        Ok(Self { entries })
    }

    /// Parse a list of already-split fused tokens.
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = Vec::new();
        for token in tokens {
            entries.push(Dependency::parse(token.as_ref())?);
        }
        Ok(Self { entries })
    }

    pub fn push(&mut self, dep: Dependency) {
        self.entries.push(dep);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dependency> {
        self.entries.iter()
    }

    pub fn entries_mut(&mut self) -> &mut [Dependency] {
        &mut self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a DependencyList {
    type Item = &'a Dependency;
    type IntoIter = std::slice::Iter<'a, Dependency>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
