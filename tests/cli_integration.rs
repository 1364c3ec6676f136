//! CLI integration tests for extforge.
//!
//! These tests drive the binary against small throwaway projects.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the extforge binary command, isolated from the user's global config.
fn extforge(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("extforge").unwrap();
    cmd.env("HOME", home).env_remove("PKG_CONFIG").env_remove("MSGFMT");
    cmd
}

/// Create a project directory with the given manifest.
fn project(manifest: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("Extforge.toml"), manifest).unwrap();
    tmp
}

const DEFINITIONS: &str = r#"
[[inputs]]
name = "pressure"

[[settings]]
name = "opaque"

[[settings]]
name = "radius_logarithmic"
cname = "radius_log"

[[states]]
name = "x"
"#;

// ============================================================================
// extforge order
// ============================================================================

#[test]
fn test_order_moves_extension_first_and_translations_last() {
    let tmp = TempDir::new().unwrap();

    extforge(tmp.path())
        .args(["order", "build_py", "build_translations", "build_ext", "build_scripts"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout("build_ext\nbuild_py\nbuild_scripts\nbuild_translations\n");
}

#[test]
fn test_order_without_manifest_uses_default_stages() {
    let tmp = TempDir::new().unwrap();

    extforge(tmp.path())
        .arg("order")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout("build_ext\nbuild_py\nbuild_scripts\nbuild_translations\n");
}

#[test]
fn test_order_reads_manifest_stages() {
    let tmp = project(
        r#"
[build]
stages = ["install_data", "build_ext"]
"#,
    );

    extforge(tmp.path())
        .arg("order")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout("build_ext\ninstall_data\nbuild_translations\n");
}

// ============================================================================
// extforge generate
// ============================================================================

#[test]
fn test_generate_writes_header_once() {
    let tmp = project(
        r#"
[header]
definitions = "brushsettings.toml"
output = "brushsettings-gen.h"
"#,
    );
    fs::write(tmp.path().join("brushsettings.toml"), DEFINITIONS).unwrap();

    extforge(tmp.path())
        .arg("generate")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Writing"));

    let header = fs::read_to_string(tmp.path().join("brushsettings-gen.h")).unwrap();
    assert!(header.starts_with("// DO NOT EDIT - autogenerated by extforge\n"));
    assert!(header.contains("#define INPUT_PRESSURE 0\n#define INPUT_COUNT 1\n"));
    assert!(header.contains("#define BRUSH_RADIUS_LOG 1\n"));
    assert!(header.contains("#define STATE_X 0\n#define STATE_COUNT 1\n"));

    extforge(tmp.path())
        .arg("generate")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Checked"));
}

#[test]
fn test_generate_with_explicit_paths() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("defs.toml"), DEFINITIONS).unwrap();

    extforge(tmp.path())
        .args(["generate", "--definitions", "defs.toml", "--output", "out.h", "--dry-run"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Would write"));

    assert!(!tmp.path().join("out.h").exists());
}

#[test]
fn test_generate_rejects_index_mismatch() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("defs.toml"),
        "[[inputs]]\nname = \"pressure\"\nindex = 3\n",
    )
    .unwrap();

    extforge(tmp.path())
        .args(["generate", "--definitions", "defs.toml", "--output", "out.h"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));

    assert!(!tmp.path().join("out.h").exists());
}

#[test]
fn test_generate_without_header_section_fails() {
    let tmp = project("[project]\nname = \"mypaint\"\n");

    extforge(tmp.path())
        .arg("generate")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no [header] section"));
}

// ============================================================================
// extforge flags
// ============================================================================

#[cfg(unix)]
#[test]
fn test_flags_uses_configured_pkg_config() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let script = tmp.path().join("fake-pkg-config.sh");
    fs::write(
        &script,
        "#!/bin/sh\n\
         case \"$1\" in\n\
           --libs) echo '-L/opt/lib -lpng16 -pthread' ;;\n\
           --cflags) echo '-I/usr/include/libpng16 -I/numpy' ;;\n\
         esac\n",
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    fs::write(
        tmp.path().join("Extforge.toml"),
        format!(
            r#"
[extension]
name = "_mypaintlib"
packages = ["libpng"]
include-dirs = ["/numpy"]

[tools]
pkg-config = "{}"
"#,
            script.display()
        ),
    )
    .unwrap();

    extforge(tmp.path())
        .args(["flags", "--no-platform"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "include-dirs: /numpy /usr/include/libpng16\n",
        ))
        .stdout(predicate::str::contains("library-dirs: /opt/lib\n"))
        .stdout(predicate::str::contains("libraries: png16\n"))
        .stdout(predicate::str::contains("extra-link-args: -pthread\n"));
}

#[test]
fn test_flags_reports_missing_pkg_config() {
    let tmp = project(
        r#"
[extension]
name = "_mypaintlib"
packages = ["libpng"]

[tools]
pkg-config = "/nonexistent/bin/pkg-config"
"#,
    );

    extforge(tmp.path())
        .arg("flags")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("pkg-config"));
}

// ============================================================================
// extforge translations
// ============================================================================

#[test]
fn test_translations_dry_run_lists_commands() {
    let tmp = project(
        r#"
[tools]
msgfmt = "/nonexistent/bin/msgfmt"
"#,
    );
    fs::create_dir_all(tmp.path().join("po")).unwrap();
    fs::write(tmp.path().join("po/de.po"), "").unwrap();
    fs::write(tmp.path().join("po/fr.po"), "").unwrap();

    extforge(tmp.path())
        .args(["translations", "--dry-run"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Would run"))
        .stderr(predicate::str::contains("de.po"))
        .stderr(predicate::str::contains("fr.po"));

    assert!(!tmp.path().join("build").exists());
}

#[test]
fn test_translations_without_catalogs() {
    let tmp = project("");

    extforge(tmp.path())
        .args(["translations", "--json"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout("[]\n");
}

// ============================================================================
// extforge build / clean
// ============================================================================

#[test]
fn test_build_dry_run_touches_nothing() {
    let tmp = project(
        r#"
[header]
definitions = "defs.toml"
output = "lib/brushsettings-gen.h"

[build.commands]
build_py = ["python3", "-m", "compileall", "lib"]
"#,
    );
    fs::write(tmp.path().join("defs.toml"), DEFINITIONS).unwrap();

    extforge(tmp.path())
        .args(["build", "--dry-run"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Would write"))
        .stderr(predicate::str::contains("python3 -m compileall lib"));

    assert!(!tmp.path().join("lib").exists());
    assert!(!tmp.path().join("build").exists());
}

#[test]
fn test_build_writes_header_and_install_manifest() {
    let tmp = project(
        r#"
[header]
definitions = "defs.toml"
output = "brushsettings-gen.h"

[[data-files.fixed]]
target-dir = "applications"
files = ["desktop/mypaint.desktop"]
"#,
    );
    fs::write(tmp.path().join("defs.toml"), DEFINITIONS).unwrap();

    extforge(tmp.path())
        .arg("build")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Finished"));

    assert!(tmp.path().join("brushsettings-gen.h").exists());
    let manifest =
        fs::read_to_string(tmp.path().join("build/temp/install-manifest.json")).unwrap();
    assert!(manifest.contains("applications"));
    assert!(manifest.contains("desktop/mypaint.desktop"));

    extforge(tmp.path())
        .arg("clean")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Removed"));

    assert!(!tmp.path().join("build/temp").exists());
}

#[test]
fn test_commands_outside_project_fail() {
    let tmp = TempDir::new().unwrap();

    extforge(tmp.path())
        .arg("build")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Extforge.toml"));
}

#[test]
fn test_misspelt_extension_key_fails_build() {
    let tmp = project(
        r#"
[extension]
name = "_mypaintlib"
extra_compile_args = ["-Wall"]
"#,
    );

    extforge(tmp.path())
        .args(["build", "--dry-run"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("extra_compile_args"));
}

// ============================================================================
// extforge doctor
// ============================================================================

#[test]
fn test_doctor_reports_broken_manifest() {
    let tmp = project("[header\n");

    extforge(tmp.path())
        .arg("doctor")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse manifest"));
}

#[test]
fn test_flags_with_packages_reports_broken_manifest() {
    let tmp = project("[header\n");

    extforge(tmp.path())
        .args(["flags", "--package", "libpng"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse manifest"));
}

// ============================================================================
// extforge completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();

    extforge(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("extforge"));
}
