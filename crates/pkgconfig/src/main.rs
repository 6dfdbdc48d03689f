//! `pkg-config` — a pure-Rust drop-in replacement for the pkg-config utility.
//!
//! Parses the classic pkg-config command-line surface, resolves the requested
//! packages through `libpkgconfig`, and prints compiler/linker flags or
//! answers meta-queries (`--modversion`, `--exists`, `--variable`, ...).

use std::fs::OpenOptions;
use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};

use libpkgconfig::cache::Cache;
use libpkgconfig::client::Client;
use libpkgconfig::dependency::DependencyList;
use libpkgconfig::fragment::{self, CflagsSelection, LibsSelection};
use libpkgconfig::version::{Comparator, tool_version_at_least};
use libpkgconfig::walk::{WalkMode, Walker};
use libpkgconfig::{ENV_PKG_CONFIG_LOG, TOOL_COMPAT_VERSION};

/// Return metainformation about installed libraries.
#[derive(Parser, Debug)]
#[command(
    name = "pkg-config",
    about = "Return metainformation about installed libraries",
    disable_version_flag = true,
    args_override_self = true
)]
struct Cli {
    /// Show verbose debug information.
    #[arg(long)]
    debug: bool,

    /// Print brief usage information and exit.
    #[arg(long)]
    usage: bool,

    /// Output version of pkg-config.
    #[arg(long)]
    version: bool,

    /// Require given version of pkg-config.
    #[arg(long = "atleast-pkgconfig-version", value_name = "VERSION")]
    atleast_pkgconfig_version: Option<String>,

    /// List all known packages.
    #[arg(long = "list-all")]
    list_all: bool,

    /// Print errors from stdout instead of stderr.
    #[arg(long = "errors-to-stdout")]
    errors_to_stdout: bool,

    /// Show verbose information about missing or conflicting packages.
    #[arg(long = "print-errors")]
    print_errors: bool,

    /// Be quiet about errors.
    #[arg(long = "silence-errors")]
    silence_errors: bool,

    // ── Version checks ──────────────────────────────────────────────
    /// Require at least the given version of the packages.
    #[arg(long = "atleast-version", value_name = "VERSION")]
    atleast_version: Option<String>,

    /// Require exactly the given version of the packages.
    #[arg(long = "exact-version", value_name = "VERSION")]
    exact_version: Option<String>,

    /// Require at most the given version of the packages.
    #[arg(long = "max-version", value_name = "VERSION")]
    max_version: Option<String>,

    /// Check whether the packages exist.
    #[arg(long)]
    exists: bool,

    /// Validate the packages without traversing their Requires.
    #[arg(long)]
    validate: bool,

    /// Return 0 if an uninstalled variant was used.
    #[arg(long)]
    uninstalled: bool,

    // ── Flag output ─────────────────────────────────────────────────
    /// Output all pre-processor and compiler flags.
    #[arg(long)]
    cflags: bool,

    /// Output -I flags only.
    #[arg(long = "cflags-only-I")]
    cflags_only_i: bool,

    /// Output cflags not covered by the -I flags.
    #[arg(long = "cflags-only-other")]
    cflags_only_other: bool,

    /// Output all linker flags.
    #[arg(long)]
    libs: bool,

    /// Output -l flags only.
    #[arg(long = "libs-only-l")]
    libs_only_l: bool,

    /// Output -L flags only.
    #[arg(long = "libs-only-L")]
    libs_only_big_l: bool,

    /// Output other libs (e.g. -pthread) only.
    #[arg(long = "libs-only-other")]
    libs_only_other: bool,

    /// Adjust output for static linking.
    #[arg(long = "static")]
    static_link: bool,

    // ── Meta queries ────────────────────────────────────────────────
    /// Output version for each package.
    #[arg(long)]
    modversion: bool,

    /// Print which packages the package provides.
    #[arg(long = "print-provides")]
    print_provides: bool,

    /// Print which packages the package requires.
    #[arg(long = "print-requires")]
    print_requires: bool,

    /// Print which packages the package requires for static linking.
    #[arg(long = "print-requires-private")]
    print_requires_private: bool,

    /// Output the value of the given variable.
    #[arg(long, value_name = "NAME")]
    variable: Option<String>,

    /// Print all variables defined by each package.
    #[arg(long = "print-variables")]
    print_variables: bool,

    /// Set a variable before parsing (NAME=VALUE).
    #[arg(long = "define-variable", value_name = "NAME=VALUE")]
    define_variable: Vec<String>,

    /// Package names, optionally with version constraints (`foo >= 1.2`).
    packages: Vec<String>,
}

impl Cli {
    fn want_cflags(&self) -> bool {
        self.cflags || self.cflags_only_i || self.cflags_only_other
    }

    fn want_libs(&self) -> bool {
        self.libs || self.libs_only_l || self.libs_only_big_l || self.libs_only_other
    }

    fn version_check_requested(&self) -> bool {
        self.atleast_version.is_some() || self.exact_version.is_some() || self.max_version.is_some()
    }
}

/// Where and whether diagnostics are printed.
struct Diagnostics {
    enabled: bool,
    to_stdout: bool,
}

impl Diagnostics {
    fn from_cli(cli: &Cli) -> Self {
        // Silenced by default; auto-enabled for flag output, --list-all and
        // --validate; --print-errors / --silence-errors override.
        let auto = cli.want_cflags() || cli.want_libs() || cli.list_all || cli.validate;
        let enabled = if cli.print_errors {
            true
        } else if cli.silence_errors {
            false
        } else {
            auto
        };
        Self {
            enabled,
            to_stdout: cli.errors_to_stdout,
        }
    }

    fn emit(&self, message: impl AsRef<str>) {
        if !self.enabled {
            return;
        }
        if self.to_stdout {
            println!("{}", message.as_ref());
        } else {
            eprintln!("{}", message.as_ref());
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            if !cli.silence_errors {
                if cli.errors_to_stdout {
                    println!("{e:#}");
                } else {
                    eprintln!("{e:#}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    write_invocation_log()?;

    if cli.usage {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    }

    if cli.version {
        println!("{TOOL_COMPAT_VERSION}");
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(ref required) = cli.atleast_pkgconfig_version {
        return Ok(if tool_version_at_least(TOOL_COMPAT_VERSION, required) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let mut builder = Client::builder()
        .static_mode(cli.static_link)
        .debug(cli.debug);
    for definition in &cli.define_variable {
        let (name, value) = definition.split_once('=').with_context(|| {
            format!("--define-variable argument '{definition}' does not have a value")
        })?;
        builder = builder.define_variable(name, value);
    }
    let client = builder.build();
    let diags = Diagnostics::from_cli(cli);

    if cli.list_all {
        list_all(&client, &diags);
        return Ok(ExitCode::SUCCESS);
    }

    // Positional arguments form one query string; commas and interleaved
    // `NAME OP VERSION` triples are both accepted.
    let query = cli.packages.join(" ");
    let mut deps = DependencyList::parse(&query)?;

    if deps.is_empty() {
        bail!("Must specify package names on the command line");
    }

    // --atleast-version and friends constrain every unconstrained positional.
    let forced = [
        (Comparator::GreaterThanEqual, &cli.atleast_version),
        (Comparator::Equal, &cli.exact_version),
        (Comparator::LessThanEqual, &cli.max_version),
    ];
    for (op, version) in forced {
        if let Some(version) = version {
            for dep in deps.entries_mut() {
                if dep.compare == Comparator::Any {
                    dep.compare = op;
                    dep.version = Some(version.clone());
                }
            }
        }
    }

    let mode = WalkMode {
        want_cflags: cli.want_cflags(),
        want_libs: cli.want_libs(),
        static_link: cli.static_link,
        print_requires_private: cli.print_requires_private,
        exists: cli.exists || cli.version_check_requested(),
        validate: cli.validate,
    };

    let mut cache = Cache::with_self_package(&client);
    let mut walker = Walker::new(&client, mode);
    for dep in deps.iter() {
        walker.walk(&mut cache, dep);
    }

    for error in &walker.errors {
        diags.emit(error.to_string());
    }

    if walker.failed {
        return Ok(ExitCode::FAILURE);
    }

    if cli.uninstalled {
        return Ok(if cache.uninstalled_found() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    // Per-line meta queries, one entry per positional package.
    for dep in deps.iter() {
        let Some(pkg) = cache.lookup(&dep.package) else {
            continue;
        };

        if cli.modversion {
            println!("{}", pkg.version());
        }
        if cli.print_provides {
            println!("{} = {}", dep.package, pkg.version());
        }
        if cli.print_requires {
            for entry in pkg.requires()?.iter() {
                println!("{}", entry.package);
            }
        }
        if cli.print_requires_private {
            for entry in pkg.requires_private()?.iter() {
                println!("{}", entry.package);
            }
        }
        if cli.print_variables {
            for name in pkg.variable_names() {
                println!("{name}");
            }
        }
    }

    // Variable values and flag output share a single line.
    let mut parts: Vec<String> = Vec::new();

    if let Some(ref name) = cli.variable {
        for dep in deps.iter() {
            if let Some(pkg) = cache.lookup(&dep.package) {
                parts.push(pkg.variable(name));
            }
        }
    }

    let order = walker.order();

    if cli.want_cflags() {
        let selection = CflagsSelection {
            include_paths: cli.cflags || cli.cflags_only_i,
            other: cli.cflags || cli.cflags_only_other,
        };
        parts.extend(fragment::collect_cflags(&client, &cache, &order, selection));
    }

    if cli.want_libs() {
        let selection = LibsSelection {
            lib_names: cli.libs || cli.libs_only_l,
            lib_paths: cli.libs || cli.libs_only_big_l,
            other: cli.libs || cli.libs_only_other,
        };
        parts.extend(fragment::collect_libs(&client, &cache, &order, selection));
    }

    if cli.variable.is_some() || cli.want_cflags() || cli.want_libs() {
        parts.retain(|p| !p.is_empty());
        println!("{}", parts.join(" "));
    }

    Ok(ExitCode::SUCCESS)
}

/// Append one record with the invocation arguments to `PKG_CONFIG_LOG`,
/// when set. The handle is closed again before any dispatch happens, and a
/// file that cannot be opened aborts the run so misconfiguration is visible.
fn write_invocation_log() -> Result<()> {
    let Ok(path) = std::env::var(ENV_PKG_CONFIG_LOG) else {
        return Ok(());
    };
    if path.is_empty() {
        return Ok(());
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("cannot open log file '{path}'"))?;

    let args: Vec<String> = std::env::args().collect();
    writeln!(file, "{}", args.join(" "))
        .with_context(|| format!("cannot write log file '{path}'"))?;
    Ok(())
}

/// Enumerate every discoverable package as `name  Name - Description`.
fn list_all(client: &Client, diags: &Diagnostics) {
    let mut cache = Cache::new();
    let mut errors = Vec::new();
    let mut rows: Vec<(String, String)> = Vec::new();

    for (name, _path) in client.search_path().list_all_pc_files() {
        match cache.load(client, &name, &mut errors) {
            Some(pkg) => {
                let text = format!(
                    "{} - {}",
                    pkg.name(),
                    pkg.property_text("Description")
                );
                rows.push((name, text));
            }
            None => {
                for error in errors.drain(..) {
                    diags.emit(error.to_string());
                }
            }
        }
    }

    let width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, text) in rows {
        println!("{name:width$} {text}");
    }
}
