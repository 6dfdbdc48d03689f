//! Parser and value model for `.pc` (pkg-config) metadata files.
//!
//! The file format is line-oriented:
//!
//! - **Variable definitions**: `name = value` (quotes around the value are
//!   stripped)
//! - **Property declarations**: `Name: value`
//! - **Comments**: an unescaped `#` starts a comment running to end-of-line
//! - **Continuations**: a backslash immediately before a newline joins the
//!   next physical line onto the current logical line
//!
//! Property values are split into tokens according to the property's kind:
//! `Requires`-class properties split on commas/whitespace and fuse relational
//! operators back onto their package names; everything else splits on runs of
//! unescaped whitespace. Any non-empty line matching neither form, and any
//! duplicate variable or property name, is a fatal parse error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::expand;
use crate::version::is_operator_char;

/// The names of the properties every valid file must define.
pub const REQUIRED_PROPERTIES: &[&str] = &["Name", "Description", "Version"];

/// How a property's raw value is split into tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// `Requires` / `Requires.private`: comma/whitespace split with operator
    /// fusion, yielding `name` or `nameOPversion` tokens.
    RequiresLike,
    /// `Libs` / `Libs.private`: whitespace split, deduplicated on output.
    LibsLike,
    /// Everything else: split on runs of unescaped whitespace.
    Default,
}

/// Look up the parse/serialize kind for a property name.
pub fn property_kind(name: &str) -> PropertyKind {
    match name {
        "Requires" | "Requires.private" => PropertyKind::RequiresLike,
        "Libs" | "Libs.private" => PropertyKind::LibsLike,
        _ => PropertyKind::Default,
    }
}

impl PropertyKind {
    /// Split a raw value string into tokens according to this kind.
    pub fn split(self, value: &str) -> Vec<String> {
        match self {
            PropertyKind::RequiresLike => split_requires(value),
            PropertyKind::LibsLike | PropertyKind::Default => split_whitespace_escaped(value),
        }
    }
}

/// A parsed `.pc` file: ordered variables and ordered, tokenized properties.
#[derive(Debug, Clone, Default)]
pub struct PcFile {
    /// The path this file was loaded from, if any.
    pub path: Option<PathBuf>,

    /// The directory containing the file (backs the `pcfiledir` built-in).
    pub pc_filedir: Option<PathBuf>,

    /// Variable definitions with raw (unexpanded) values, in file order.
    variables: Vec<(String, String)>,

    /// Properties as ordered token sequences, in file order.
    properties: Vec<(String, Vec<String>)>,
}

impl PcFile {
    /// Parse a `.pc` file from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::NotFound {
                    name: path.display().to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;

        let mut pc = Self::from_str(&content, path)?;
        pc.path = Some(path.to_path_buf());
        pc.pc_filedir = path.parent().map(|p| p.to_path_buf());
        Ok(pc)
    }

    /// Parse a `.pc` file from a string; `source_path` is used in errors.
    pub fn from_str(content: &str, source_path: &Path) -> Result<Self> {
        let content = content.replace("\r\n", "\n");
        let mut pc = Self::default();

        for (line_no, line) in logical_lines(&content) {
            let line = strip_comment(&line);
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            // The first unescaped `:` or `=` decides the line form.
            match (find_delimiter(line, ':'), find_delimiter(line, '=')) {
                (Some(ci), Some(ei)) if ci < ei => {
                    pc.parse_property(line, ci, source_path, line_no)?;
                }
                (Some(ci), None) => {
                    pc.parse_property(line, ci, source_path, line_no)?;
                }
                (_, Some(ei)) => {
                    pc.parse_variable(line, ei, source_path, line_no)?;
                }
                (None, None) => {
                    return Err(Error::ParseError {
                        path: source_path.to_path_buf(),
                        line: line_no,
                        message: format!("couldn't parse line '{line}'"),
                    });
                }
            }
        }

        Ok(pc)
    }

    fn parse_variable(
        &mut self,
        line: &str,
        eq_pos: usize,
        source_path: &Path,
        line_no: usize,
    ) -> Result<()> {
        let name = line[..eq_pos].trim();
        if !is_valid_name(name) {
            return Err(Error::ParseError {
                path: source_path.to_path_buf(),
                line: line_no,
                message: format!("invalid variable name '{name}'"),
            });
        }

        let value = strip_quotes(line[eq_pos + 1..].trim());

        if self.get_variable_raw(name).is_some() {
            return Err(Error::ParseError {
                path: source_path.to_path_buf(),
                line: line_no,
                message: format!("duplicate definition of variable '{name}'"),
            });
        }

        self.variables.push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn parse_property(
        &mut self,
        line: &str,
        colon_pos: usize,
        source_path: &Path,
        line_no: usize,
    ) -> Result<()> {
        let name = line[..colon_pos].trim();
        if !is_valid_name(name) {
            return Err(Error::ParseError {
                path: source_path.to_path_buf(),
                line: line_no,
                message: format!("invalid property name '{name}'"),
            });
        }

        if self.get_property_raw(name).is_some() {
            return Err(Error::ParseError {
                path: source_path.to_path_buf(),
                line: line_no,
                message: format!("duplicate definition of property '{name}'"),
            });
        }

        let value = line[colon_pos + 1..].trim();
        let mut tokens = property_kind(name).split(value);

        // Libs is stored deduplicated, keeping each token's first position.
        if name == "Libs" {
            tokens = dedup_keep_first(tokens);
        }

        self.properties.push((name.to_string(), tokens));
        Ok(())
    }

    // ── Raw access ──────────────────────────────────────────────────

    /// Look up a raw (unexpanded) variable value.
    pub fn get_variable_raw(&self, name: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a property's raw token list.
    pub fn get_property_raw(&self, name: &str) -> Option<&[String]> {
        self.properties
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_slice())
    }

    /// All variable names, in file order.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|(k, _)| k.as_str())
    }

    /// All property names, in file order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|(k, _)| k.as_str())
    }

    /// Raw `(name, value)` variable pairs, in file order.
    pub fn variables(&self) -> &[(String, String)] {
        &self.variables
    }

    /// Define a variable programmatically; duplicates are rejected.
    pub fn add_variable(&mut self, name: &str, value: &str) -> Result<()> {
        if self.get_variable_raw(name).is_some() {
            return Err(Error::ParseError {
                path: self.path.clone().unwrap_or_default(),
                line: 0,
                message: format!("duplicate definition of variable '{name}'"),
            });
        }
        self.variables.push((name.to_string(), value.to_string()));
        Ok(())
    }

    /// Define a property programmatically; duplicates are rejected.
    pub fn add_property(&mut self, name: &str, tokens: Vec<String>) -> Result<()> {
        if self.get_property_raw(name).is_some() {
            return Err(Error::ParseError {
                path: self.path.clone().unwrap_or_default(),
                line: 0,
                message: format!("duplicate definition of property '{name}'"),
            });
        }
        self.properties.push((name.to_string(), tokens));
        Ok(())
    }

    // ── Expanded access ─────────────────────────────────────────────

    /// The expanded value of a variable, applying override semantics.
    ///
    /// Undefined variables expand to the empty string.
    pub fn variable(&self, name: &str, overrides: &expand::Overrides) -> String {
        expand::expand(&format!("${{{name}}}"), self, overrides)
    }

    /// The expanded token list of a property.
    ///
    /// Each raw token is expanded; tokens whose expansion changed them are
    /// re-split with the property's split rule, so a variable carrying
    /// several flags contributes several tokens.
    pub fn property(&self, name: &str, overrides: &expand::Overrides) -> Vec<String> {
        let kind = property_kind(name);
        let mut out = Vec::new();
        for raw in self.get_property_raw(name).unwrap_or_default() {
            let expanded = expand::expand(raw, self, overrides);
            if expanded == *raw {
                out.push(raw.clone());
            } else {
                out.extend(kind.split(&expanded));
            }
        }
        out
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Check that the required properties are present.
    pub fn validate(&self) -> Result<()> {
        for required in REQUIRED_PROPERTIES {
            if self.get_property_raw(required).is_none() {
                return Err(Error::Invalid {
                    path: self.path.clone().unwrap_or_default(),
                    message: format!("missing required property '{required}'"),
                });
            }
        }
        Ok(())
    }

    /// Rewrite raw strings, replacing the absolute path prefix `base` with a
    /// `${var}` reference. Applied at most once, right after parsing.
    pub fn rebase(&mut self, base: &str, var: &str) {
        if base.is_empty() {
            return;
        }
        let replacement = format!("${{{var}}}");
        for (_, value) in &mut self.variables {
            if let Some(rest) = value.strip_prefix(base) {
                *value = format!("{replacement}{rest}");
            }
        }
        for (_, tokens) in &mut self.properties {
            for token in tokens {
                if let Some(rest) = token.strip_prefix(base) {
                    *token = format!("{replacement}{rest}");
                }
            }
        }
    }

    /// Serialize back to the `.pc` text format.
    ///
    /// Variables come first in insertion order, then a blank separator, then
    /// properties in insertion order. `Libs`-class token lists are written
    /// deduplicated.
    pub fn serialize(&self) -> String {
        let mut out = String::new();

        for (name, value) in &self.variables {
            out.push_str(name);
            out.push('=');
            out.push_str(value);
            out.push('\n');
        }

        if !self.variables.is_empty() && !self.properties.is_empty() {
            out.push('\n');
        }

        for (name, tokens) in &self.properties {
            let tokens = match property_kind(name) {
                PropertyKind::LibsLike => dedup_keep_first(tokens.clone()),
                _ => tokens.clone(),
            };
            out.push_str(name);
            out.push(':');
            if !tokens.is_empty() {
                out.push(' ');
                out.push_str(&tokens.join(" "));
            }
            out.push('\n');
        }

        out
    }
}

// ── Line handling ───────────────────────────────────────────────────────

/// Join physical lines into logical lines, honoring trailing-backslash
/// continuations. Yields `(starting_line_number, logical_line)` pairs.
fn logical_lines(content: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut lines = content.lines().enumerate();

    while let Some((idx, first)) = lines.next() {
        let start = idx + 1;
        if !first.ends_with('\\') {
            out.push((start, first.to_string()));
            continue;
        }

        let mut buf = String::from(&first[..first.len() - 1]);
        while let Some((_, next)) = lines.next() {
            if next.ends_with('\\') {
                buf.push_str(&next[..next.len() - 1]);
            } else {
                buf.push_str(next);
                break;
            }
        }
        out.push((start, buf));
    }

    out
}

/// Strip an end-of-line comment: everything from the first `#` that is not
/// preceded by a backslash. The `\#` escape is left intact for the splitters.
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'#' && (i == 0 || bytes[i - 1] != b'\\') {
            return &line[..i];
        }
    }
    line
}

/// Find the byte offset of the first `delim` outside any `${...}` reference.
fn find_delimiter(line: &str, delim: char) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'$' && i + 1 < bytes.len() && bytes[i + 1] == b'{' {
            i += 2;
            while i < bytes.len() && bytes[i] != b'}' {
                i += 1;
            }
            if i < bytes.len() {
                i += 1;
            }
        } else if bytes[i] == delim as u8 {
            return Some(i);
        } else {
            i += 1;
        }
    }
    None
}

/// Variable and property names match `[A-Za-z0-9_.]+`.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// Strip one pair of surrounding double quotes, if present.
fn strip_quotes(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

// ── Token splitting ─────────────────────────────────────────────────────

/// Split on runs of unescaped whitespace. Backslash escapes are kept in the
/// token (so `path\ with\ space` stays one token, escapes intact).
pub fn split_whitespace_escaped(value: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            current.push(c);
            if let Some(next) = chars.next() {
                current.push(next);
            }
        } else if c.is_ascii_whitespace() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else {
            current.push(c);
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Split a `Requires`-class value on commas/whitespace, then fuse relational
/// operators with their neighbors so each token is `name` or `nameOPversion`.
pub fn split_requires(value: &str) -> Vec<String> {
    let fragments = value
        .split(|c: char| c == ',' || c.is_ascii_whitespace())
        .filter(|f| !f.is_empty());

    let mut tokens: Vec<String> = Vec::new();
    for fragment in fragments {
        if let Some(last) = tokens.last_mut() {
            let last_ends_op = last.ends_with(is_operator_char);
            let fragment_starts_op = fragment.starts_with(is_operator_char);
            if last_ends_op || fragment_starts_op {
                last.push_str(fragment);
                continue;
            }
        }
        tokens.push(fragment.to_string());
    }

    tokens
}

/// Remove duplicate tokens, keeping the first occurrence of each.
pub fn dedup_keep_first(tokens: Vec<String>) -> Vec<String> {
    let mut seen = Vec::new();
    tokens
        .into_iter()
        .filter(|t| {
            if seen.contains(t) {
                false
            } else {
                seen.push(t.clone());
                true
            }
        })
        .collect()
}
