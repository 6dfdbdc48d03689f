//! Integration tests for the `pkg-config` binary.
//!
//! These exercise the CLI end-to-end against the fixtures in the
//! workspace-level `tests/data/` directory:
//!
//! - Meta queries (version, modversion, variable, exists, validate)
//! - Flag output, ordering, and deduplication
//! - Static linking and `Libs.private`
//! - Version constraints and pre-release ordering
//! - Sysroot prefixing
//! - Uninstalled variants
//! - Diagnostics routing and exit codes
//! - The invocation log

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

/// The workspace-level `tests/data/` directory.
fn test_data_dir() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    // crates/pkgconfig -> workspace root
    let workspace_root = manifest_dir.parent().unwrap().parent().unwrap();
    workspace_root.join("tests").join("data")
}

/// A command with the search path pinned to the fixture directory and the
/// ambient environment scrubbed.
fn pkg_config() -> Command {
    let mut cmd = Command::cargo_bin("pkg-config").unwrap();
    cmd.env("PKG_CONFIG_PATH", test_data_dir());
    cmd.env("PKG_CONFIG_LIBDIR", test_data_dir());
    cmd.env_remove("PKG_CONFIG_SYSROOT_DIR");
    cmd.env_remove("PKG_CONFIG_TOP_BUILD_DIR");
    cmd.env_remove("PKG_CONFIG_DISABLE_UNINSTALLED");
    cmd.env_remove("PKG_CONFIG_ALLOW_SYSTEM_CFLAGS");
    cmd.env_remove("PKG_CONFIG_ALLOW_SYSTEM_LIBS");
    cmd.env_remove("PKG_CONFIG_SYSTEM_INCLUDE_PATH");
    cmd.env_remove("PKG_CONFIG_DEBUG_SPEW");
    cmd.env_remove("PKG_CONFIG_LOG");
    cmd.env_remove("C_PATH");
    cmd.env_remove("C_INCLUDE_PATH");
    cmd.env_remove("CPLUS_INCLUDE_PATH");
    cmd
}

// ============================================================================
// Meta queries
// ============================================================================

mod meta {
    use super::*;

    #[test]
    fn version_flag() {
        pkg_config()
            .arg("--version")
            .assert()
            .success()
            .stdout("0.29.2\n");
    }

    #[test]
    fn atleast_pkgconfig_version_satisfied() {
        pkg_config()
            .args(["--atleast-pkgconfig-version=0.29"])
            .assert()
            .success();
        pkg_config()
            .args(["--atleast-pkgconfig-version=0.9.0"])
            .assert()
            .success();
    }

    #[test]
    fn atleast_pkgconfig_version_not_satisfied() {
        pkg_config()
            .args(["--atleast-pkgconfig-version=99.0"])
            .assert()
            .failure();
    }

    #[test]
    fn modversion_simple() {
        pkg_config()
            .args(["--modversion", "simple"])
            .assert()
            .success()
            .stdout("1.0.0\n");
    }

    #[test]
    fn modversion_multiple_packages() {
        pkg_config()
            .args(["--modversion", "simple", "zlib"])
            .assert()
            .success()
            .stdout("1.0.0\n1.2.13\n");
    }

    #[test]
    fn no_packages_fails() {
        pkg_config().assert().failure();
    }

    #[test]
    fn print_provides() {
        pkg_config()
            .args(["--print-provides", "liba"])
            .assert()
            .success()
            .stdout("liba = 2.1\n");
    }

    #[test]
    fn print_requires() {
        pkg_config()
            .args(["--print-requires", "liba"])
            .assert()
            .success()
            .stdout("libb\n");
    }

    #[test]
    fn print_requires_private() {
        pkg_config()
            .args(["--print-requires-private", "privdep"])
            .assert()
            .success()
            .stdout("zlib\n");
    }

    #[test]
    fn print_variables() {
        let assert = pkg_config()
            .args(["--print-variables", "simple"])
            .assert()
            .success();
        let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
        for var in ["prefix", "exec_prefix", "libdir", "includedir"] {
            assert!(stdout.contains(var), "missing {var} in {stdout}");
        }
    }

    #[test]
    fn variable_query() {
        pkg_config()
            .args(["--variable=prefix", "simple"])
            .assert()
            .success()
            .stdout("/usr\n");
    }

    #[test]
    fn variable_query_chained_expansion() {
        pkg_config()
            .args(["--variable=libdir", "simple"])
            .assert()
            .success()
            .stdout("/usr/lib\n");
    }

    #[test]
    fn variable_query_undefined_prints_empty_line() {
        pkg_config()
            .args(["--variable=nonexistent", "simple"])
            .assert()
            .success()
            .stdout("\n");
    }

    #[test]
    fn variable_combined_with_libs_shares_the_line() {
        pkg_config()
            .args(["--variable=prefix", "--libs", "simple"])
            .assert()
            .success()
            .stdout("/usr -L/usr/lib -lsimple\n");
    }

    #[test]
    fn list_all_enumerates_packages() {
        pkg_config()
            .arg("--list-all")
            .assert()
            .success()
            .stdout(predicate::str::contains("simple"))
            .stdout(predicate::str::contains("zlib compression library"));
    }
}

// ============================================================================
// Flag output
// ============================================================================

mod flags {
    use super::*;

    #[test]
    fn cflags_simple() {
        pkg_config()
            .args(["--cflags", "simple"])
            .assert()
            .success()
            .stdout("-I/usr/include/simple\n");
    }

    #[test]
    fn libs_simple() {
        pkg_config()
            .args(["--libs", "simple"])
            .assert()
            .success()
            .stdout("-L/usr/lib -lsimple\n");
    }

    #[test]
    fn libs_follow_dependency_order() {
        pkg_config()
            .args(["--libs", "liba"])
            .assert()
            .success()
            .stdout("-la -lb\n");
    }

    #[test]
    fn static_appends_private_libs_per_package() {
        pkg_config()
            .args(["--libs", "--static", "liba"])
            .assert()
            .success()
            .stdout("-la -lm -lb\n");
    }

    #[test]
    fn cflags_and_libs_combine_on_one_line() {
        pkg_config()
            .args(["--cflags", "--libs", "simple"])
            .assert()
            .success()
            .stdout("-I/usr/include/simple -L/usr/lib -lsimple\n");
    }

    #[test]
    fn cflags_only_i_and_only_other() {
        pkg_config()
            .args(["--cflags-only-I", "multiflag"])
            .assert()
            .success()
            .stdout("-I/opt/multi/include\n");
        pkg_config()
            .args(["--cflags-only-other", "multiflag"])
            .assert()
            .success()
            .stdout("-DONE -DTWO\n");
    }

    #[test]
    fn libs_only_filters() {
        pkg_config()
            .args(["--libs-only-l", "simple"])
            .assert()
            .success()
            .stdout("-lsimple\n");
        pkg_config()
            .args(["--libs-only-L", "simple"])
            .assert()
            .success()
            .stdout("-L/usr/lib\n");
    }

    #[test]
    fn variable_carrying_multiple_flags_is_resplit() {
        pkg_config()
            .args(["--cflags", "multiflag"])
            .assert()
            .success()
            .stdout("-DONE -DTWO -I/opt/multi/include\n");
    }

    #[test]
    fn diamond_dependency_deduplicates() {
        // base is reached through left first; right's later edge only
        // re-checks the cache, so base keeps its earlier position.
        pkg_config()
            .args(["--libs", "top"])
            .assert()
            .success()
            .stdout("-ltop -lleft -lbase -lright\n");
    }

    #[test]
    fn private_requires_contribute_cflags_but_not_shared_libs() {
        pkg_config()
            .args(["--cflags", "privdep"])
            .assert()
            .success()
            .stdout(predicate::str::contains("-I/opt/privdep/include"))
            .stdout(predicate::str::contains("-I/usr/include").not());
        pkg_config()
            .args(["--libs", "privdep"])
            .assert()
            .success()
            .stdout("-lprivdep\n");
    }

    #[test]
    fn static_libs_pull_private_requires() {
        pkg_config()
            .args(["--libs", "--static", "privdep"])
            .assert()
            .success()
            .stdout("-L/usr/lib -lprivdep -lz\n");
    }

    #[test]
    fn sysroot_prefixes_include_and_lib_paths() {
        pkg_config()
            .env("PKG_CONFIG_SYSROOT_DIR", "/sysroot")
            .args(["--cflags", "sysrooted"])
            .assert()
            .success()
            .stdout("-I/sysroot/opt/x/include\n");
        pkg_config()
            .env("PKG_CONFIG_SYSROOT_DIR", "/sysroot")
            .args(["--libs", "sysrooted"])
            .assert()
            .success()
            .stdout("-L/sysroot/opt/x/lib -lsysrooted\n");
    }

    #[test]
    fn system_include_filtered_unless_allowed() {
        pkg_config()
            .args(["--cflags", "zlib"])
            .assert()
            .success()
            .stdout("\n");
        pkg_config()
            .env("PKG_CONFIG_ALLOW_SYSTEM_CFLAGS", "1")
            .args(["--cflags", "zlib"])
            .assert()
            .success()
            .stdout("-I/usr/include\n");
    }

    #[test]
    fn self_package_resolves_as_dependency() {
        pkg_config()
            .args(["--libs", "needs-tool"])
            .assert()
            .success()
            .stdout("-lneedstool\n");
    }

    #[test]
    fn pc_path_variable_of_self_package() {
        let data = test_data_dir();
        let assert = pkg_config()
            .args(["--variable=pc_path", "pkg-config"])
            .assert()
            .success();
        let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
        assert!(stdout.contains(data.to_str().unwrap()));
    }
}

// ============================================================================
// Version constraints
// ============================================================================

mod constraints {
    use super::*;

    #[test]
    fn exists_success() {
        pkg_config().args(["--exists", "simple"]).assert().success();
    }

    #[test]
    fn exists_with_inline_constraint() {
        pkg_config()
            .args(["--exists", "simple", ">=", "0.5"])
            .assert()
            .success();
        pkg_config()
            .args(["--exists", "simple", ">=", "2.0"])
            .assert()
            .failure();
    }

    #[test]
    fn exists_fails_on_unmet_transitive_constraint() {
        pkg_config()
            .args(["--print-errors", "--exists", "needs-new-b"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("libb"))
            .stderr(predicate::str::contains("1.5"));
    }

    #[test]
    fn atleast_version_rejects_prerelease() {
        // 1.02b1 sorts before 1.02.
        pkg_config()
            .args(["--atleast-version=1.02", "prerelease"])
            .assert()
            .failure();
    }

    #[test]
    fn max_version_accepts_prerelease() {
        pkg_config()
            .args(["--max-version=1.02", "prerelease"])
            .assert()
            .success();
    }

    #[test]
    fn exact_version() {
        pkg_config()
            .args(["--exact-version=1.02b1", "prerelease"])
            .assert()
            .success();
        pkg_config()
            .args(["--exact-version=1.02", "prerelease"])
            .assert()
            .failure();
    }

    #[test]
    fn validate_ignores_requires() {
        pkg_config()
            .args(["--validate", "needs-new-b"])
            .assert()
            .success();
    }

    #[test]
    fn validate_still_checks_required_properties() {
        pkg_config()
            .args(["--validate", "no-such-package"])
            .assert()
            .failure();
    }
}

// ============================================================================
// Uninstalled variants
// ============================================================================

mod uninstalled {
    use super::*;

    #[test]
    fn uninstalled_variant_is_preferred() {
        let data = test_data_dir();
        pkg_config()
            .args(["--libs", "uninst"])
            .assert()
            .success()
            .stdout(format!("-L{}/.libs -luninst\n", data.display()));
    }

    #[test]
    fn uninstalled_query_exit_codes() {
        pkg_config()
            .args(["--uninstalled", "uninst"])
            .assert()
            .success();
        pkg_config()
            .args(["--uninstalled", "simple"])
            .assert()
            .failure();
    }

    #[test]
    fn disable_uninstalled_env() {
        pkg_config()
            .env("PKG_CONFIG_DISABLE_UNINSTALLED", "1")
            .args(["--uninstalled", "uninst"])
            .assert()
            .failure();
    }
}

// ============================================================================
// Overrides
// ============================================================================

mod overrides {
    use super::*;

    #[test]
    fn define_variable_shadows_file_value() {
        pkg_config()
            .args(["--define-variable=prefix=/opt", "--variable=libdir", "simple"])
            .assert()
            .success()
            .stdout("/opt/lib\n");
    }

    #[test]
    fn define_variable_with_reference_stays_literal() {
        pkg_config()
            .args([
                "--define-variable=libdir=${prefix}/lib64",
                "--variable=libdir",
                "simple",
            ])
            .assert()
            .success()
            .stdout("${prefix}/lib64\n");
    }

    #[test]
    fn define_variable_rewrites_flags() {
        pkg_config()
            .args(["--define-variable=prefix=/opt", "--cflags", "simple"])
            .assert()
            .success()
            .stdout("-I/opt/include/simple\n");
    }

    #[test]
    fn malformed_define_variable_fails() {
        pkg_config()
            .args(["--define-variable=broken", "--cflags", "simple"])
            .assert()
            .failure();
    }

    #[test]
    fn per_package_environment_override() {
        pkg_config()
            .env("PKG_CONFIG_SIMPLE_PREFIX", "/from-env")
            .args(["--variable=prefix", "simple"])
            .assert()
            .success()
            .stdout("/from-env\n");
    }
}

// ============================================================================
// Diagnostics and exit codes
// ============================================================================

mod diagnostics {
    use super::*;

    #[test]
    fn missing_package_fails_with_diagnostic() {
        pkg_config()
            .args(["--libs", "no-such-package"])
            .assert()
            .failure()
            .stdout("")
            .stderr(predicate::str::contains("no-such-package"))
            .stderr(predicate::str::contains("not found"));
    }

    #[test]
    fn exists_is_silent_by_default() {
        pkg_config()
            .args(["--exists", "no-such-package"])
            .assert()
            .failure()
            .stderr("");
    }

    #[test]
    fn print_errors_enables_diagnostics() {
        pkg_config()
            .args(["--print-errors", "--exists", "no-such-package"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("no-such-package"));
    }

    #[test]
    fn silence_errors_suppresses_diagnostics() {
        pkg_config()
            .args(["--silence-errors", "--libs", "no-such-package"])
            .assert()
            .failure()
            .stderr("");
    }

    #[test]
    fn errors_to_stdout() {
        pkg_config()
            .args(["--errors-to-stdout", "--libs", "no-such-package"])
            .assert()
            .failure()
            .stdout(predicate::str::contains("not found"));
    }

    #[test]
    fn failure_suppresses_flag_output() {
        // liba resolves, no-such-package does not: flags must not leak.
        pkg_config()
            .args(["--silence-errors", "--libs", "liba", "no-such-package"])
            .assert()
            .failure()
            .stdout("");
    }

    #[test]
    fn walk_reports_every_problem() {
        pkg_config()
            .args(["--libs", "no-such-package", "also-missing"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("no-such-package"))
            .stderr(predicate::str::contains("also-missing"));
    }
}

// ============================================================================
// Invocation log
// ============================================================================

mod invocation_log {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn log_records_arguments() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("pkg.log");

        pkg_config()
            .env("PKG_CONFIG_LOG", &log_path)
            .args(["--modversion", "simple"])
            .assert()
            .success();

        let contents = std::fs::read_to_string(&log_path).unwrap();
        assert!(contents.contains("--modversion"));
        assert!(contents.contains("simple"));
    }

    #[test]
    fn log_appends_across_invocations() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("pkg.log");

        for _ in 0..2 {
            pkg_config()
                .env("PKG_CONFIG_LOG", &log_path)
                .arg("--version")
                .assert()
                .success();
        }

        let contents = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn unopenable_log_is_fatal() {
        pkg_config()
            .env("PKG_CONFIG_LOG", "/nonexistent-dir/pkg.log")
            .arg("--version")
            .assert()
            .failure();
    }
}
