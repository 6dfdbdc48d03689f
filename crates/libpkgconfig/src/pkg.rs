//! Loaded package representation.
//!
//! A [`Package`] pairs a parsed [`PcFile`] with the lookup id it was resolved
//! under, the override set in effect for it, and its on-disk origin. Property
//! and variable reads go through the expander lazily, so flags are expanded
//! with the overrides that apply to this specific package.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::client::Client;
use crate::dependency::DependencyList;
use crate::error::{Error, Result};
use crate::expand::Overrides;
use crate::parser::PcFile;

/// A package loaded from a `.pc` file (or synthesized, for the tool itself).
#[derive(Debug, Clone)]
pub struct Package {
    /// The lookup identifier (e.g. `zlib`, `glib-2.0`).
    pub id: String,

    /// Where the file came from; `None` for the synthetic self-package.
    pub path: Option<PathBuf>,

    /// True when the `-uninstalled` variant was used.
    pub uninstalled: bool,

    pc: PcFile,
    overrides: Overrides,
}

impl Package {
    /// Locate, parse, and validate a package.
    ///
    /// Failures are appended to `diags` (possibly more than one: an empty
    /// file gets both an "appears to be empty" diagnostic and the
    /// missing-`Name` validation error) and `None` is returned.
    pub fn load(client: &Client, name: &str, diags: &mut Vec<Error>) -> Option<Self> {
        let located = match client.locate(name) {
            Some(located) => located,
            None => {
                diags.push(Error::NotFound {
                    name: name.to_string(),
                });
                return None;
            }
        };

        client.trace(format!("loading '{name}' from {}", located.path.display()));

        let content = match fs::read_to_string(&located.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                diags.push(Error::NotFound {
                    name: name.to_string(),
                });
                return None;
            }
            Err(e) => {
                diags.push(Error::Io(e));
                return None;
            }
        };

        if content.trim().is_empty() {
            diags.push(Error::Invalid {
                path: located.path.clone(),
                message: "file appears to be empty".to_string(),
            });
        }

        let mut pc = match PcFile::from_str(&content, &located.path) {
            Ok(pc) => pc,
            Err(e) => {
                diags.push(e);
                return None;
            }
        };
        pc.path = Some(located.path.clone());
        pc.pc_filedir = located.path.parent().map(|p| p.to_path_buf());

        // In-tree builds: rewrite the build-tree prefix of an uninstalled
        // file to ${pc_top_builddir} so the variable stays overridable.
        if located.uninstalled && client.top_build_dir().is_some() {
            if let Some(file_dir) = pc.pc_filedir.clone() {
                pc.rebase(&file_dir.to_string_lossy(), "pc_top_builddir");
            }
        }

        if let Err(e) = pc.validate() {
            diags.push(e);
            return None;
        }

        Some(Self {
            id: name.to_string(),
            path: Some(located.path),
            uninstalled: located.uninstalled,
            pc,
            overrides: client.overrides_for(name),
        })
    }

    /// The synthetic package describing the tool itself.
    ///
    /// Pre-seeded into the cache so other packages may depend on
    /// `pkg-config`; carries a `pc_path` variable holding the effective
    /// search path.
    pub fn self_package(client: &Client) -> Self {
        let mut pc = PcFile::default();
        let _ = pc.add_variable("pc_path", &client.search_path().to_delimited(':'));
        let _ = pc.add_property("Name", vec!["pkg-config".to_string()]);
        let _ = pc.add_property(
            "Description",
            "pkg-config is a system for managing compile/link flags"
                .split_whitespace()
                .map(str::to_string)
                .collect(),
        );
        let _ = pc.add_property("Version", vec![crate::TOOL_COMPAT_VERSION.to_string()]);
        let _ = pc.add_property(
            "URL",
            vec!["http://pkg-config.freedesktop.org/".to_string()],
        );

        Self {
            id: crate::SELF_PACKAGE_NAME.to_string(),
            path: None,
            uninstalled: false,
            pc,
            overrides: client.overrides().clone(),
        }
    }

    /// Direct access to the underlying model.
    pub fn pc(&self) -> &PcFile {
        &self.pc
    }

    // ── Expanded reads ──────────────────────────────────────────────

    /// A property's expanded token list (empty when absent).
    pub fn property(&self, name: &str) -> Vec<String> {
        self.pc.property(name, &self.overrides)
    }

    /// A property's expanded tokens joined back into one string.
    pub fn property_text(&self, name: &str) -> String {
        self.property(name).join(" ")
    }

    /// A variable's expanded value (empty when undefined).
    pub fn variable(&self, name: &str) -> String {
        self.pc.variable(name, &self.overrides)
    }

    /// The names of the variables this package defines, in file order.
    pub fn variable_names(&self) -> Vec<&str> {
        self.pc.variable_names().collect()
    }

    /// The `Name` property.
    pub fn name(&self) -> String {
        self.property_text("Name")
    }

    /// The `Version` property.
    pub fn version(&self) -> String {
        self.property_text("Version")
    }

    /// The `Requires` list, expanded and parsed.
    pub fn requires(&self) -> Result<DependencyList> {
        DependencyList::from_tokens(self.property("Requires"))
    }

    /// The `Requires.private` list, expanded and parsed.
    pub fn requires_private(&self) -> Result<DependencyList> {
        DependencyList::from_tokens(self.property("Requires.private"))
    }
}
