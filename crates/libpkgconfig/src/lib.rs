//! `libpkgconfig` — the core of a pure-Rust drop-in replacement for the
//! `pkg-config` utility.
//!
//! This crate locates `.pc` metadata files on disk, parses them, resolves
//! their transitive dependencies, and projects the result to compiler and
//! linker flag fragments. The `pkgconfig` binary crate provides the CLI on
//! top of it.
//!
//! # Architecture
//!
//! - [`error`] — error types and result alias
//! - [`parser`] — `.pc` file parsing, the value model, and serialization
//! - [`expand`] — `${variable}` expansion with override semantics
//! - [`version`] — version comparison and constraint operators
//! - [`dependency`] — `name OP version` dependency specifications
//! - [`path`] — search path assembly and `.pc` file discovery
//! - [`client`] — the immutable per-invocation run context
//! - [`cache`] — the process-wide load cache and self-package
//! - [`pkg`] — loaded packages with lazily expanded reads
//! - [`walk`] — recursive dependency resolution and link ordering
//! - [`fragment`] — cflags/libs projection, filtering, and deduplication
//!
//! # Example
//!
//! ```rust,no_run
//! use libpkgconfig::cache::Cache;
//! use libpkgconfig::client::Client;
//! use libpkgconfig::dependency::Dependency;
//! use libpkgconfig::fragment::{self, LibsSelection};
//! use libpkgconfig::walk::{WalkMode, Walker};
//!
//! let client = Client::from_environment();
//! let mut cache = Cache::with_self_package(&client);
//! let mut walker = Walker::new(&client, WalkMode { want_libs: true, ..Default::default() });
//! walker.walk(&mut cache, &Dependency::unconstrained("zlib"));
//!
//! let selection = LibsSelection { lib_names: true, lib_paths: true, other: true };
//! let libs = fragment::collect_libs(&client, &cache, &walker.order(), selection);
//! println!("{}", libs.join(" "));
//! ```

pub mod cache;
pub mod client;
pub mod dependency;
pub mod error;
pub mod expand;
pub mod fragment;
pub mod parser;
pub mod path;
pub mod pkg;
pub mod version;
pub mod walk;

/// The version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The pkg-config version this tool reports and claims compatibility with.
///
/// Used for `--version` and `--atleast-pkgconfig-version` checks.
pub const TOOL_COMPAT_VERSION: &str = "0.29.2";

/// The name under which the tool's own synthetic package is cached.
pub const SELF_PACKAGE_NAME: &str = "pkg-config";

/// Built-in `.pc` search directories, probed in order when neither
/// `PKG_CONFIG_LIBDIR` replaces them nor `--with-path` overrides apply.
pub const DEFAULT_PKGCONFIG_PATH: &[&str] = &[
    "/usr/lib/pkgconfig",
    "/usr/share/pkgconfig",
    "/usr/local/lib/pkgconfig",
    "/usr/local/share/pkgconfig",
];

/// System include directories filtered from `-I` output by default.
pub const DEFAULT_SYSTEM_INCLUDEDIRS: &[&str] = &["/usr/include"];

/// The `PKG_CONFIG_PATH` environment variable: directories prepended to the
/// search path.
pub const ENV_PKG_CONFIG_PATH: &str = "PKG_CONFIG_PATH";

/// The `PKG_CONFIG_LIBDIR` environment variable: when set, *replaces* the
/// built-in search directories.
pub const ENV_PKG_CONFIG_LIBDIR: &str = "PKG_CONFIG_LIBDIR";

/// The `PKG_CONFIG_SYSROOT_DIR` environment variable.
pub const ENV_PKG_CONFIG_SYSROOT_DIR: &str = "PKG_CONFIG_SYSROOT_DIR";

/// The `PKG_CONFIG_TOP_BUILD_DIR` environment variable.
pub const ENV_PKG_CONFIG_TOP_BUILD_DIR: &str = "PKG_CONFIG_TOP_BUILD_DIR";

/// The `PKG_CONFIG_DISABLE_UNINSTALLED` environment variable.
pub const ENV_PKG_CONFIG_DISABLE_UNINSTALLED: &str = "PKG_CONFIG_DISABLE_UNINSTALLED";

/// The `PKG_CONFIG_ALLOW_SYSTEM_CFLAGS` environment variable.
pub const ENV_PKG_CONFIG_ALLOW_SYSTEM_CFLAGS: &str = "PKG_CONFIG_ALLOW_SYSTEM_CFLAGS";

/// The `PKG_CONFIG_ALLOW_SYSTEM_LIBS` environment variable.
pub const ENV_PKG_CONFIG_ALLOW_SYSTEM_LIBS: &str = "PKG_CONFIG_ALLOW_SYSTEM_LIBS";

/// The `PKG_CONFIG_SYSTEM_INCLUDE_PATH` environment variable: extra system
/// include directories for `-I` filtering.
pub const ENV_PKG_CONFIG_SYSTEM_INCLUDE_PATH: &str = "PKG_CONFIG_SYSTEM_INCLUDE_PATH";

/// The `PKG_CONFIG_DEBUG_SPEW` environment variable.
pub const ENV_PKG_CONFIG_DEBUG_SPEW: &str = "PKG_CONFIG_DEBUG_SPEW";

/// The `PKG_CONFIG_LOG` environment variable: invocation log file.
pub const ENV_PKG_CONFIG_LOG: &str = "PKG_CONFIG_LOG";
