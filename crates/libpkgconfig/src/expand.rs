//! Variable expansion for `${name}` references.
//!
//! Expansion merges two sources: the file's own variables and a process-wide
//! overrides mapping (`--define-variable`, `PKG_CONFIG_<PKG>_<var>`
//! environment entries, and built-in globals like `pc_sysrootdir`).
//!
//! Overrides have two behaviours. An override whose value contains no
//! reference resolves normally. An override whose value itself contains a
//! `${...}` reference is *opaque*: it is substituted literally, exactly once
//! per occurrence, and expansion of the string halts there. This keeps
//! `--define-variable=libdir='${prefix}/lib64'` from being re-expanded
//! against the wrong file's variables.
//!
//! Otherwise each pass substitutes every reference in the string
//! simultaneously and repeats until no references remain, with an iteration
//! cap guarding against self-referential definitions.

use std::collections::HashMap;

use crate::parser::PcFile;

/// Iteration cap for the outer expansion loop; a string still holding
/// references after this many passes is self-referential and is returned
/// as-is.
const MAX_ITERATIONS: usize = 64;

/// Process-wide variable overrides, shadowing file-level variables.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    map: HashMap<String, String>,
}

impl Overrides {
    /// An empty overrides set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing name → value mapping.
    pub fn from_map(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    /// Define (or redefine) an override.
    pub fn define(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.map.insert(name.into(), value.into());
    }

    /// Look up an override value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(|s| s.as_str())
    }

    /// A copy of this set with `extra` entries layered on top.
    pub fn layered(&self, extra: &HashMap<String, String>) -> Self {
        let mut map = self.map.clone();
        for (k, v) in extra {
            map.insert(k.clone(), v.clone());
        }
        Self { map }
    }
}

/// Whether a string contains a `${...}` reference.
pub fn has_reference(s: &str) -> bool {
    s.contains("${")
}

/// Expand all `${name}` references in `s` against `pc`'s variables and the
/// given overrides. Undefined names expand to the empty string.
pub fn expand(s: &str, pc: &PcFile, overrides: &Overrides) -> String {
    let mut current = s.to_string();

    for _ in 0..MAX_ITERATIONS {
        let refs = collect_references(&current);
        if refs.is_empty() {
            break;
        }

        // An override that itself carries a reference is opaque: substitute
        // it literally and stop expanding this string.
        if let Some(name) = refs
            .iter()
            .find(|n| overrides.get(n).is_some_and(has_reference))
        {
            let value = overrides.get(name).unwrap().to_string();
            current = current.replace(&format!("${{{name}}}"), &value);
            break;
        }

        current = substitute_all(&current, pc, overrides);
    }

    current
}

/// Collect the names of all well-formed `${...}` references in `s`.
fn collect_references(s: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    names
}

/// Substitute every reference in `s` in a single pass.
fn substitute_all(s: &str, pc: &PcFile, overrides: &Overrides) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                out.push_str(&resolve(&after[..end], pc, overrides));
                rest = &after[end + 1..];
            }
            None => {
                // Unterminated reference: emit literally.
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

/// Resolve a single name: overrides first, then file variables, then the
/// per-file `pcfiledir` built-in, then the empty string.
fn resolve(name: &str, pc: &PcFile, overrides: &Overrides) -> String {
    if let Some(value) = overrides.get(name) {
        return value.to_string();
    }
    if let Some(value) = pc.get_variable_raw(name) {
        return value.to_string();
    }
    if name == "pcfiledir" {
        if let Some(ref dir) = pc.pc_filedir {
            return dir.to_string_lossy().into_owned();
        }
    }
    String::new()
}
