//! The per-invocation run context.
//!
//! A [`Client`] gathers everything that is decided once, at startup, from the
//! environment and command line: the search path, the sysroot, variable
//! overrides, system directory filter lists, and mode flags. It is built
//! once and read-only for the rest of the run.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::expand::Overrides;
use crate::path::{PATH_SEPARATOR, SearchPath};

/// Where a located `.pc` file came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub path: PathBuf,
    /// True when the hit was an `-uninstalled` variant.
    pub uninstalled: bool,
}

/// The immutable run context.
#[derive(Debug, Clone)]
pub struct Client {
    /// Directories probed for `.pc` files, in order.
    search_path: SearchPath,

    /// `PKG_CONFIG_SYSROOT_DIR`, when set and non-empty.
    sysroot_dir: Option<String>,

    /// `PKG_CONFIG_TOP_BUILD_DIR`, when set and non-empty.
    top_build_dir: Option<String>,

    /// Variable overrides from `--define-variable` plus built-in globals.
    overrides: Overrides,

    /// System include directories filtered from `-I` output.
    system_includedirs: Vec<String>,

    /// Keep `-I` flags pointing into system include directories.
    allow_system_cflags: bool,

    /// Keep `-L` flags pointing into system library directories.
    allow_system_libs: bool,

    /// Static-link mode (`--static`).
    static_mode: bool,

    /// Skip the `-uninstalled` probe (`PKG_CONFIG_DISABLE_UNINSTALLED`).
    disable_uninstalled: bool,

    /// Verbose tracing to stderr.
    debug: bool,
}

impl Client {
    /// Build a client from the process environment.
    pub fn from_environment() -> Self {
        ClientBuilder::new().build()
    }

    /// A builder, mostly for tests that need a deterministic context.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    // ── Getters ─────────────────────────────────────────────────────

    pub fn search_path(&self) -> &SearchPath {
        &self.search_path
    }

    pub fn sysroot_dir(&self) -> Option<&str> {
        self.sysroot_dir.as_deref()
    }

    pub fn top_build_dir(&self) -> Option<&str> {
        self.top_build_dir.as_deref()
    }

    pub fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    pub fn system_includedirs(&self) -> &[String] {
        &self.system_includedirs
    }

    pub fn allow_system_cflags(&self) -> bool {
        self.allow_system_cflags
    }

    pub fn allow_system_libs(&self) -> bool {
        self.allow_system_libs
    }

    pub fn is_static(&self) -> bool {
        self.static_mode
    }

    pub fn uninstalled_enabled(&self) -> bool {
        !self.disable_uninstalled
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Emit a trace line to stderr when debug spew is enabled.
    pub fn trace(&self, message: impl AsRef<str>) {
        if self.debug {
            eprintln!("{}", message.as_ref());
        }
    }

    // ── Lookup ──────────────────────────────────────────────────────

    /// Resolve a package name to a `.pc` file path.
    ///
    /// A name containing `.pc` is treated as a literal path. Otherwise the
    /// uninstalled variant is probed first (unless disabled or the name
    /// already carries the suffix), then the plain `<name>.pc`.
    pub fn locate(&self, name: &str) -> Option<Located> {
        if name.contains(".pc") {
            return Some(Located {
                path: PathBuf::from(name),
                uninstalled: name.contains("-uninstalled"),
            });
        }

        if self.uninstalled_enabled() && !name.ends_with("-uninstalled") {
            if let Some(path) = self.search_path.find_pc_file(&format!("{name}-uninstalled")) {
                self.trace(format!("found uninstalled variant {}", path.display()));
                return Some(Located {
                    path,
                    uninstalled: true,
                });
            }
        }

        self.search_path.find_pc_file(name).map(|path| Located {
            path,
            uninstalled: name.ends_with("-uninstalled"),
        })
    }

    /// The overrides in effect for one specific package: the global set plus
    /// any `PKG_CONFIG_<PKG>_<SUFFIX>` environment entries.
    pub fn overrides_for(&self, package: &str) -> Overrides {
        let prefix = format!("PKG_CONFIG_{}_", env_key(package));
        let mut extra = HashMap::new();
        for (key, value) in std::env::vars() {
            if let Some(suffix) = key.strip_prefix(&prefix) {
                if !suffix.is_empty() {
                    extra.insert(suffix.to_lowercase(), value);
                }
            }
        }

        if extra.is_empty() {
            self.overrides.clone()
        } else {
            self.overrides.layered(&extra)
        }
    }
}

/// Uppercase a package name for use in an environment variable key, mapping
/// every non-alphanumeric byte to `_`.
fn env_key(package: &str) -> String {
    package
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Treat an environment variable as set when it is present and non-empty.
fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Builder for a [`Client`].
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    with_paths: Vec<PathBuf>,
    defines: Vec<(String, String)>,
    sysroot_dir: Option<String>,
    top_build_dir: Option<String>,
    system_includedirs: Option<Vec<String>>,
    allow_system_cflags: bool,
    allow_system_libs: bool,
    static_mode: bool,
    disable_uninstalled: bool,
    debug: bool,
    skip_env: bool,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a search directory ahead of everything else.
    pub fn with_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.with_paths.push(path.into());
        self
    }

    /// Define a variable override (`--define-variable`).
    pub fn define_variable(mut self, name: &str, value: &str) -> Self {
        self.defines.push((name.to_string(), value.to_string()));
        self
    }

    pub fn sysroot_dir(mut self, dir: &str) -> Self {
        self.sysroot_dir = Some(dir.to_string());
        self
    }

    pub fn top_build_dir(mut self, dir: &str) -> Self {
        self.top_build_dir = Some(dir.to_string());
        self
    }

    pub fn system_includedirs(mut self, dirs: Vec<String>) -> Self {
        self.system_includedirs = Some(dirs);
        self
    }

    pub fn allow_system_cflags(mut self, allow: bool) -> Self {
        self.allow_system_cflags = allow;
        self
    }

    pub fn allow_system_libs(mut self, allow: bool) -> Self {
        self.allow_system_libs = allow;
        self
    }

    pub fn static_mode(mut self, enabled: bool) -> Self {
        self.static_mode = enabled;
        self
    }

    pub fn disable_uninstalled(mut self, disabled: bool) -> Self {
        self.disable_uninstalled = disabled;
        self
    }

    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Ignore the process environment entirely (for tests).
    pub fn skip_env(mut self, skip: bool) -> Self {
        self.skip_env = skip;
        self
    }

    pub fn build(self) -> Client {
        let mut search_path = SearchPath::new();
        for p in &self.with_paths {
            search_path.add(p.clone());
        }

        let mut sysroot_dir = self.sysroot_dir;
        let mut top_build_dir = self.top_build_dir;
        let mut allow_system_cflags = self.allow_system_cflags;
        let mut allow_system_libs = self.allow_system_libs;
        let mut disable_uninstalled = self.disable_uninstalled;
        let mut debug = self.debug;
        let mut system_includedirs = self.system_includedirs.unwrap_or_else(|| {
            crate::DEFAULT_SYSTEM_INCLUDEDIRS
                .iter()
                .map(|s| s.to_string())
                .collect()
        });

        if !self.skip_env {
            // PKG_CONFIG_LIBDIR replaces the built-in list; PKG_CONFIG_PATH
            // is prepended to whichever list is in effect.
            let base = match env_nonempty(crate::ENV_PKG_CONFIG_LIBDIR) {
                Some(libdir) => SearchPath::from_delimited(&libdir, PATH_SEPARATOR),
                None => SearchPath::from_paths(crate::DEFAULT_PKGCONFIG_PATH),
            };
            let mut from_env = base;
            if let Some(extra) = env_nonempty(crate::ENV_PKG_CONFIG_PATH) {
                from_env.prepend_list(&SearchPath::from_delimited(&extra, PATH_SEPARATOR));
            }
            for dir in from_env.iter() {
                search_path.add(dir.clone());
            }

            if sysroot_dir.is_none() {
                sysroot_dir = env_nonempty(crate::ENV_PKG_CONFIG_SYSROOT_DIR);
            }
            if top_build_dir.is_none() {
                top_build_dir = env_nonempty(crate::ENV_PKG_CONFIG_TOP_BUILD_DIR);
            }
            allow_system_cflags |=
                env_nonempty(crate::ENV_PKG_CONFIG_ALLOW_SYSTEM_CFLAGS).is_some();
            allow_system_libs |= env_nonempty(crate::ENV_PKG_CONFIG_ALLOW_SYSTEM_LIBS).is_some();
            disable_uninstalled |=
                env_nonempty(crate::ENV_PKG_CONFIG_DISABLE_UNINSTALLED).is_some();
            debug |= env_nonempty(crate::ENV_PKG_CONFIG_DEBUG_SPEW).is_some();

            for var in [
                crate::ENV_PKG_CONFIG_SYSTEM_INCLUDE_PATH,
                "C_PATH",
                "C_INCLUDE_PATH",
                "CPLUS_INCLUDE_PATH",
            ] {
                if let Some(value) = env_nonempty(var) {
                    for dir in value.split(PATH_SEPARATOR).filter(|d| !d.is_empty()) {
                        system_includedirs.push(dir.to_string());
                    }
                }
            }
        }

        let mut overrides = Overrides::new();
        overrides.define(
            "pc_sysrootdir",
            sysroot_dir.clone().unwrap_or_else(|| "/".to_string()),
        );
        if let Some(ref dir) = top_build_dir {
            overrides.define("pc_top_builddir", dir.clone());
        }
        for (name, value) in self.defines {
            overrides.define(name, value);
        }

        Client {
            search_path,
            sysroot_dir,
            top_build_dir,
            overrides,
            system_includedirs,
            allow_system_cflags,
            allow_system_libs,
            static_mode: self.static_mode,
            disable_uninstalled,
            debug,
        }
    }
}
