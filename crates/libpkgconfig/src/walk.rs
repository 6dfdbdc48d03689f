//! Recursive dependency resolution.
//!
//! The walker loads each requested package through the cache, prepends it to
//! a growing accumulation list, checks version constraints, and recurses into
//! the dependency properties selected by the query mode. Constraint failures
//! are diagnosed and recorded without aborting the walk, so one invocation
//! reports every problem it can find.
//!
//! The raw accumulation list is projected two ways: shared mode keeps the
//! first occurrence of each package and reverses (dependents before their
//! dependencies); static mode reverses without deduplication, because
//! archive linkers need repeated occurrences preserved.

use crate::cache::{Cache, CacheState};
use crate::client::Client;
use crate::dependency::Dependency;
use crate::error::Error;

/// Which dependency properties the walk traverses, derived from the query.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkMode {
    /// Any of the cflags family was requested.
    pub want_cflags: bool,
    /// Any of the libs family was requested.
    pub want_libs: bool,
    /// `--static`.
    pub static_link: bool,
    /// `--print-requires-private`.
    pub print_requires_private: bool,
    /// `--exists` (and the `--*-version` checks, which imply it).
    pub exists: bool,
    /// `--validate`.
    pub validate: bool,
}

impl WalkMode {
    /// `Requires.private` edges are followed for cflags, static libs,
    /// `--print-requires-private`, and existence checks.
    fn traverse_private(self) -> bool {
        self.want_cflags
            || (self.want_libs && self.static_link)
            || self.print_requires_private
            || self.exists
    }

    /// `Requires` edges are followed for everything except `--validate`.
    fn traverse_public(self) -> bool {
        !self.validate
    }
}

/// Walk state: the accumulation list plus collected diagnostics.
#[derive(Debug)]
pub struct Walker<'a> {
    client: &'a Client,
    mode: WalkMode,

    /// Accumulated package names; each visited package is prepended, so leaf
    /// dependencies end up at the tail once the walk completes.
    list: Vec<String>,

    /// Diagnostics collected along the way.
    pub errors: Vec<Error>,

    /// Set when any load or constraint check failed.
    pub failed: bool,
}

impl<'a> Walker<'a> {
    pub fn new(client: &'a Client, mode: WalkMode) -> Self {
        Self {
            client,
            mode,
            list: Vec::new(),
            errors: Vec::new(),
            failed: false,
        }
    }

    /// Resolve one requested dependency (a CLI positional or a recursion
    /// step). Failures mark the walker failed but do not abort.
    pub fn walk(&mut self, cache: &mut Cache, dep: &Dependency) {
        let pkg = match cache.load(self.client, &dep.package, &mut self.errors) {
            Some(pkg) => pkg,
            None => {
                self.failed = true;
                return;
            }
        };

        let version = pkg.version();
        self.list.insert(0, dep.package.clone());
        self.client
            .trace(format!("walking {} {}", dep.package, version));

        if !dep.satisfied_by(&version) {
            self.report_mismatch(dep, &version);
        }

        let mut edges = Vec::new();
        if self.mode.traverse_public() {
            edges.extend(pkg.property("Requires"));
        }
        if self.mode.traverse_private() {
            edges.extend(pkg.property("Requires.private"));
        }

        for token in edges {
            let child = match Dependency::parse(&token) {
                Ok(child) => child,
                Err(e) => {
                    self.errors.push(e);
                    self.failed = true;
                    continue;
                }
            };

            match cache.state(&child.package) {
                CacheState::Loaded => {
                    // Already resolved elsewhere in the graph: apply the
                    // version check only.
                    let installed = cache.lookup(&child.package).unwrap().version();
                    if !child.satisfied_by(&installed) {
                        self.report_mismatch(&child, &installed);
                    }
                }
                CacheState::Failed => {
                    self.failed = true;
                }
                CacheState::Unknown => {
                    self.walk(cache, &child);
                }
            }
        }
    }

    fn report_mismatch(&mut self, dep: &Dependency, installed: &str) {
        self.errors.push(Error::VersionMismatch {
            name: dep.package.clone(),
            found: installed.to_string(),
            required: dep.version.clone().unwrap_or_default(),
            comparator: dep.compare.as_str().to_string(),
        });
        self.failed = true;
    }

    /// The raw accumulation list (head = most recently visited).
    pub fn raw_list(&self) -> &[String] {
        &self.list
    }

    /// Projection for the current mode: static when `--static`, else shared.
    pub fn order(&self) -> Vec<String> {
        if self.mode.static_link {
            self.static_order()
        } else {
            self.shared_order()
        }
    }

    /// Shared-mode projection: first occurrence wins, then reverse, giving
    /// dependency order with duplicates suppressed.
    pub fn shared_order(&self) -> Vec<String> {
        let mut seen: Vec<&str> = Vec::new();
        let mut kept: Vec<String> = Vec::new();
        for name in &self.list {
            if !seen.contains(&name.as_str()) {
                seen.push(name);
                kept.push(name.clone());
            }
        }
        kept.reverse();
        kept
    }

    /// Static-mode projection: plain reversal, duplicates preserved.
    pub fn static_order(&self) -> Vec<String> {
        let mut kept = self.list.clone();
        kept.reverse();
        kept
    }
}
