//! Load cache for resolved packages.
//!
//! Every package name resolves at most once per process: the cache stores
//! either the loaded [`Package`] or a negative marker recording that the
//! lookup failed, and is never invalidated. The synthetic self-package is
//! pre-seeded so other packages may name `pkg-config` as a dependency.
//!
//! The cache also owns the process-wide "an uninstalled variant was used"
//! flag, set the first time a lookup lands on an `-uninstalled.pc` file.

use std::collections::HashMap;

use crate::client::Client;
use crate::error::Error;
use crate::pkg::Package;

/// The result of a cached lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// Never requested.
    Unknown,
    /// Loaded and valid.
    Loaded,
    /// Requested before and failed; the failure was already diagnosed.
    Failed,
}

/// Process-wide package cache.
#[derive(Debug, Default)]
pub struct Cache {
    entries: HashMap<String, Option<Package>>,
    uninstalled_found: bool,
}

impl Cache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache pre-seeded with the tool's own synthetic package.
    pub fn with_self_package(client: &Client) -> Self {
        let mut cache = Self::new();
        let self_pkg = Package::self_package(client);
        cache.entries.insert(self_pkg.id.clone(), Some(self_pkg));
        cache
    }

    /// What the cache knows about `name`.
    pub fn state(&self, name: &str) -> CacheState {
        match self.entries.get(name) {
            None => CacheState::Unknown,
            Some(Some(_)) => CacheState::Loaded,
            Some(None) => CacheState::Failed,
        }
    }

    /// A previously loaded package.
    pub fn lookup(&self, name: &str) -> Option<&Package> {
        self.entries.get(name).and_then(|e| e.as_ref())
    }

    /// Ensure `name` has been resolved, loading it on first request.
    ///
    /// Diagnostics from a failed first load are appended to `diags`; repeat
    /// requests for a failed name stay silent (the failure was already
    /// reported). Returns the loaded package, if any.
    pub fn load(
        &mut self,
        client: &Client,
        name: &str,
        diags: &mut Vec<Error>,
    ) -> Option<&Package> {
        if !self.entries.contains_key(name) {
            let loaded = Package::load(client, name, diags);
            if let Some(ref pkg) = loaded {
                if pkg.uninstalled {
                    self.uninstalled_found = true;
                }
            }
            self.entries.insert(name.to_string(), loaded);
        }
        self.entries.get(name).and_then(|e| e.as_ref())
    }

    /// Whether any lookup so far used an `-uninstalled` variant.
    pub fn uninstalled_found(&self) -> bool {
        self.uninstalled_found
    }

    /// The number of resolved names (including negative entries).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
