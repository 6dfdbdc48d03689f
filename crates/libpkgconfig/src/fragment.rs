//! Projection of resolved packages to compiler/linker flag output.
//!
//! Flags are plain string tokens classified by their prefix (`-I`, `-L`,
//! `-l`, anything else). The projector walks packages in resolution order,
//! filters out system directories, deduplicates, applies the sysroot, and
//! keeps only the token classes the invocation asked for.
//!
//! Deduplication differs by class: include paths, library paths, and other
//! flags keep their first occurrence; `-l` names are deduplicated from the
//! right so a library named both early and late stays at the latest
//! position, which static-link resolution requires.

use crate::cache::Cache;
use crate::client::Client;
use crate::parser::dedup_keep_first;

/// The class of one flag token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    /// `-I<path>`
    Include,
    /// `-L<path>`
    LibPath,
    /// `-l<name>`
    LibName,
    /// Anything else (`-pthread`, `-DX=1`, bare words).
    Other,
}

/// Classify a flag token by its prefix.
pub fn classify(token: &str) -> FragmentKind {
    if token.len() > 2 {
        match &token[..2] {
            "-I" => return FragmentKind::Include,
            "-L" => return FragmentKind::LibPath,
            "-l" => return FragmentKind::LibName,
            _ => {}
        }
    }
    FragmentKind::Other
}

/// Which cflags classes the invocation asked for.
#[derive(Debug, Clone, Copy, Default)]
pub struct CflagsSelection {
    /// Keep `-I` tokens (`--cflags`, `--cflags-only-I`).
    pub include_paths: bool,
    /// Keep everything else (`--cflags`, `--cflags-only-other`).
    pub other: bool,
}

/// Which libs classes the invocation asked for.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibsSelection {
    /// Keep `-l` tokens (`--libs`, `--libs-only-l`).
    pub lib_names: bool,
    /// Keep `-L` tokens (`--libs`, `--libs-only-L`).
    pub lib_paths: bool,
    /// Keep everything else (`--libs`, `--libs-only-other`).
    pub other: bool,
}

/// Project `Cflags` across `order`, filtered, deduplicated, and sysrooted.
pub fn collect_cflags(
    client: &Client,
    cache: &Cache,
    order: &[String],
    selection: CflagsSelection,
) -> Vec<String> {
    let mut tokens = Vec::new();
    for name in order {
        if let Some(pkg) = cache.lookup(name) {
            tokens.extend(pkg.property("Cflags"));
        }
    }

    if !client.allow_system_cflags() {
        tokens.retain(|t| !is_system_include(t, client.system_includedirs()));
    }

    let mut tokens = dedup_keep_first(tokens);

    tokens.retain(|t| match classify(t) {
        FragmentKind::Include => selection.include_paths,
        _ => selection.other,
    });

    if let Some(sysroot) = client.sysroot_dir() {
        for token in &mut tokens {
            if classify(token) == FragmentKind::Include {
                apply_sysroot(token, "-I", sysroot);
            }
        }
    }

    tokens
}

/// Project `Libs` (plus `Libs.private` in static mode) across `order`.
///
/// The output is the `-L`-and-other partition followed by the `-l`
/// partition, each deduplicated with its own bias.
pub fn collect_libs(
    client: &Client,
    cache: &Cache,
    order: &[String],
    selection: LibsSelection,
) -> Vec<String> {
    let mut tokens = Vec::new();
    for name in order {
        if let Some(pkg) = cache.lookup(name) {
            tokens.extend(pkg.property("Libs"));
            if client.is_static() {
                tokens.extend(pkg.property("Libs.private"));
            }
        }
    }

    if !client.allow_system_libs() {
        tokens.retain(|t| !is_system_libpath(t));
    }

    let (names, rest): (Vec<String>, Vec<String>) = tokens
        .into_iter()
        .partition(|t| classify(t) == FragmentKind::LibName);

    let mut rest = dedup_keep_first(rest);
    rest.retain(|t| match classify(t) {
        FragmentKind::LibPath => selection.lib_paths,
        _ => selection.other,
    });

    let mut names = dedup_keep_last(names);
    if !selection.lib_names {
        names.clear();
    }

    let mut out = rest;
    out.extend(names);

    if let Some(sysroot) = client.sysroot_dir() {
        for token in &mut out {
            match classify(token) {
                FragmentKind::LibPath => apply_sysroot(token, "-L", sysroot),
                FragmentKind::LibName => apply_sysroot(token, "-l", sysroot),
                _ => {}
            }
        }
    }

    out
}

/// Deduplicate keeping the *last* occurrence of each token.
fn dedup_keep_last(tokens: Vec<String>) -> Vec<String> {
    let mut reversed: Vec<String> = tokens.into_iter().rev().collect();
    reversed = dedup_keep_first(reversed);
    reversed.reverse();
    reversed
}

/// Whether a token is `-I<dir>` for a system include directory.
fn is_system_include(token: &str, system_includedirs: &[String]) -> bool {
    if classify(token) != FragmentKind::Include {
        return false;
    }
    let payload = trim_dir(&token[2..]);
    system_includedirs.iter().any(|d| trim_dir(d) == payload)
}

/// Whether a token is an `-L` flag into `/usr/lib32` or `/usr/lib64`.
///
/// Deliberately narrower than it looks: plain `/usr/lib` is NOT matched.
fn is_system_libpath(token: &str) -> bool {
    if classify(token) != FragmentKind::LibPath {
        return false;
    }
    let payload = &token[2..];
    for root in ["/usr/lib32", "/usr/lib64"] {
        if let Some(rest) = payload.strip_prefix(root) {
            if rest.is_empty() || rest.starts_with('/') {
                return true;
            }
        }
    }
    false
}

/// Insert the sysroot between a flag prefix and its absolute-path payload.
fn apply_sysroot(token: &mut String, prefix: &str, sysroot: &str) {
    if let Some(payload) = token.strip_prefix(prefix) {
        if payload.starts_with('/') && !payload.starts_with(sysroot) {
            *token = format!("{prefix}{sysroot}{payload}");
        }
    }
}

fn trim_dir(dir: &str) -> &str {
    let trimmed = dir.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}
