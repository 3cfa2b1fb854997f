//! End-to-end tests for the deptrim CLI
//!
//! These tests verify:
//! - Redundant references are removed from built projects
//! - Dry-run mode leaves files unchanged
//! - CLI produces the expected JSON output schema
//! - Exit codes are correct for various scenarios

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PROJECT: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
  </PropertyGroup>
  <ItemGroup>
    <PackageReference Include="Azure.Storage.Blobs" Version="12.19.1" />
    <PackageReference Include="Azure.Core" Version="1.36.0" />
  </ItemGroup>
</Project>
"#;

/// Command for the compiled binary
fn deptrim() -> Command {
    Command::new(env!("CARGO_BIN_EXE_deptrim"))
}

/// Create a workspace with one project that was never built, plus an empty cache
fn create_test_project() -> (TempDir, TempDir) {
    let workspace = tempfile::tempdir().expect("Failed to create temp directory");
    let cache = tempfile::tempdir().expect("Failed to create temp directory");

    let dir = workspace.path().join("App");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("App.csproj"), PROJECT).unwrap();

    (workspace, cache)
}

/// Package cache in which Azure.Storage.Blobs depends on Azure.Core
fn create_test_cache() -> TempDir {
    let cache = tempfile::tempdir().expect("Failed to create temp directory");
    let packages: [(&str, &str, &str); 2] = [
        (
            "Azure.Storage.Blobs",
            "12.19.1",
            r#"<group targetFramework=".NETStandard2.0"><dependency id="Azure.Core" version="1.36.0" /></group>"#,
        ),
        ("Azure.Core", "1.36.0", ""),
    ];
    for (id, version, groups) in packages {
        let dir = cache.path().join(id.to_ascii_lowercase()).join(version);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(format!("{}.nuspec", id.to_ascii_lowercase())),
            format!(
                "<package><metadata><id>{id}</id><version>{version}</version>\
                 <dependencies>{groups}</dependencies></metadata></package>"
            ),
        )
        .unwrap();
    }
    cache
}

/// Create a workspace whose project has been built against the test cache
///
/// The build output only references `System.Runtime`, so nothing vetoes a removal.
fn create_built_project() -> (TempDir, TempDir) {
    let (workspace, _) = create_test_project();
    let bin = workspace.path().join("App").join("bin").join("Debug").join("net8.0");
    fs::create_dir_all(&bin).unwrap();
    fs::copy(
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("assemblies")
            .join("runtime-only.dll"),
        bin.join("App.dll"),
    )
    .unwrap();

    (workspace, create_test_cache())
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

mod removal_tests {
    use super::*;

    /// Test that a redundant reference is removed and the file rewritten
    #[test]
    fn test_removes_redundant_reference() {
        let (workspace, cache) = create_built_project();
        let project = workspace.path().join("App").join("App.csproj");

        deptrim()
            .args([path_arg(workspace.path()), "--packages-dir", path_arg(cache.path())])
            .assert()
            .success()
            .stdout(predicate::str::contains("Azure.Core"))
            .stdout(predicate::str::contains("1 reference(s) removed from 1 project(s)"));

        let content = fs::read_to_string(&project).unwrap();
        assert!(content.contains(r#"<PackageReference Include="Azure.Storage.Blobs" Version="12.19.1" />"#));
        assert!(!content.contains("Azure.Core"));
        assert!(content.contains("<TargetFramework>net8.0</TargetFramework>"));
    }

    /// Test the JSON report of a real removal
    #[test]
    fn test_json_reports_removal() {
        let (workspace, cache) = create_built_project();

        let output = deptrim()
            .args([
                "--json",
                path_arg(workspace.path()),
                "--packages-dir",
                path_arg(cache.path()),
            ])
            .output()
            .expect("Failed to execute command");

        assert!(output.status.success());
        let json: serde_json::Value = serde_json::from_slice(&output.stdout)
            .expect("Output should be valid JSON");
        assert_eq!(json["dry_run"], false);
        assert_eq!(json["summary"]["removed"].as_i64(), Some(1));
        assert_eq!(json["summary"]["modified"].as_i64(), Some(1));

        let manifest = &json["manifests"][0];
        assert_eq!(manifest["target_framework"], "net8.0");
        assert_eq!(manifest["modified"], true);
        assert_eq!(manifest["removed"][0]["name"], "Azure.Core");
        assert_eq!(manifest["removed"][0]["reached_by"][0], "Azure.Storage.Blobs");
        assert!(json.get("errors").is_none());
    }

    /// Test that --keep protects a redundant reference
    #[test]
    fn test_keep_protects_reference() {
        let (workspace, cache) = create_built_project();
        let project = workspace.path().join("App").join("App.csproj");

        deptrim()
            .args([
                path_arg(workspace.path()),
                "--packages-dir",
                path_arg(cache.path()),
                "--keep",
                "azure.core",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("protected by --keep"));

        assert_eq!(fs::read_to_string(&project).unwrap(), PROJECT);
    }
}

mod dry_run_tests {
    use super::*;

    /// Test that dry-run reports the removal without touching the project
    #[test]
    fn test_dry_run_reports_without_writing() {
        let (workspace, cache) = create_built_project();
        let project = workspace.path().join("App").join("App.csproj");

        let output = deptrim()
            .args([
                "--dry-run",
                "--json",
                path_arg(workspace.path()),
                "--packages-dir",
                path_arg(cache.path()),
            ])
            .output()
            .expect("Failed to execute command");

        assert!(output.status.success());
        let json: serde_json::Value = serde_json::from_slice(&output.stdout)
            .expect("Output should be valid JSON");
        assert_eq!(json["dry_run"], true);
        assert_eq!(json["summary"]["removed"].as_i64(), Some(1));
        assert_eq!(json["summary"]["modified"].as_i64(), Some(0));
        assert_eq!(json["manifests"][0]["removed"][0]["name"], "Azure.Core");
        assert_eq!(fs::read_to_string(&project).unwrap(), PROJECT);
    }

    /// Test that dry-run text output marks removals as pending
    #[test]
    fn test_dry_run_text_output() {
        let (workspace, cache) = create_built_project();

        deptrim()
            .args([
                "-n",
                path_arg(workspace.path()),
                "--packages-dir",
                path_arg(cache.path()),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("1 reference(s) can be removed"));
    }

    /// Test that an unbuilt project fails before anything is written
    #[test]
    fn test_dry_run_unbuilt_project_unchanged() {
        let (workspace, cache) = create_test_project();
        let project = workspace.path().join("App").join("App.csproj");
        let original = fs::read_to_string(&project).unwrap();

        deptrim()
            .args([
                "--dry-run",
                path_arg(workspace.path()),
                "--packages-dir",
                path_arg(cache.path()),
            ])
            .assert()
            .code(2);

        assert_eq!(
            original,
            fs::read_to_string(&project).unwrap(),
            "App.csproj should not be modified in dry-run mode"
        );
    }

    /// Test that quiet dry-run prints a single line
    #[test]
    fn test_dry_run_with_quiet_mode() {
        let workspace = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();

        deptrim()
            .args([
                "-n",
                "-q",
                path_arg(workspace.path()),
                "--packages-dir",
                path_arg(cache.path()),
            ])
            .assert()
            .success()
            .stdout("(dry-run) Nothing to remove\n");
    }
}

mod json_output_tests {
    use super::*;

    /// Test JSON output with empty directory
    #[test]
    fn test_json_output_empty_directory() {
        let workspace = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();

        let output = deptrim()
            .args([
                "--dry-run",
                "--json",
                path_arg(workspace.path()),
                "--packages-dir",
                path_arg(cache.path()),
            ])
            .output()
            .expect("Failed to execute command");

        assert!(output.status.success());
        let json: serde_json::Value = serde_json::from_slice(&output.stdout)
            .expect("Output should be valid JSON");
        assert_eq!(json["dry_run"], true);
        assert!(json["manifests"].as_array().unwrap().is_empty());
        assert_eq!(json["summary"]["removed"].as_i64(), Some(0));
        assert!(json.get("errors").is_none());
    }

    /// Test JSON output reports the missing build output
    #[test]
    fn test_json_output_errors() {
        let (workspace, cache) = create_test_project();

        let output = deptrim()
            .args([
                "--json",
                path_arg(workspace.path()),
                "--packages-dir",
                path_arg(cache.path()),
            ])
            .output()
            .expect("Failed to execute command");

        assert_eq!(output.status.code(), Some(2));
        let json: serde_json::Value = serde_json::from_slice(&output.stdout)
            .expect("Output should be valid JSON");
        let errors = json["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0]["path"].as_str().unwrap().ends_with("App.csproj"));
        assert!(errors[0]["message"]
            .as_str()
            .unwrap()
            .contains("Please build the project first"));
    }
}

mod exit_code_tests {
    use super::*;

    /// Test exit code for successful run with nothing to remove
    #[test]
    fn test_exit_code_empty_directory() {
        let workspace = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();

        deptrim()
            .args([path_arg(workspace.path()), "--packages-dir", path_arg(cache.path())])
            .assert()
            .success()
            .stdout(predicate::str::contains("No redundant references"));
    }

    /// Test exit code with help flag
    #[test]
    fn test_exit_code_help() {
        deptrim()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("deptrim"))
            .stdout(predicate::str::contains("--packages-dir"));
    }

    /// Test exit code with version flag
    #[test]
    fn test_exit_code_version() {
        deptrim()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    /// Test exit code with invalid path
    #[test]
    fn test_exit_code_nonexistent_path() {
        let cache = tempfile::tempdir().unwrap();

        deptrim()
            .args([
                "/nonexistent/path/that/does/not/exist",
                "--packages-dir",
                path_arg(cache.path()),
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("does not exist"));
    }

    /// Test exit code when a project file cannot be parsed
    #[test]
    fn test_exit_code_invalid_project() {
        let workspace = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();
        fs::write(
            workspace.path().join("Legacy.csproj"),
            "<Project ToolsVersion=\"15.0\"></Project>",
        )
        .unwrap();

        deptrim()
            .args([path_arg(workspace.path()), "--packages-dir", path_arg(cache.path())])
            .assert()
            .code(2)
            .stdout(predicate::str::contains("not an SDK-style project"));
    }

    /// Test exit code with conflicting options
    #[test]
    fn test_exit_code_conflicting_options() {
        let cache = tempfile::tempdir().unwrap();

        deptrim()
            .args(["-q", "--verbose", "--packages-dir", path_arg(cache.path())])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("conflicting options"));
    }

    /// Test exit code with an invalid job count
    #[test]
    fn test_exit_code_invalid_jobs() {
        deptrim().args(["--jobs", "0"]).assert().failure();
    }
}

mod cli_options_tests {
    use super::*;

    /// Test verbose mode output
    #[test]
    fn test_verbose_mode() {
        let (workspace, cache) = create_test_project();

        deptrim()
            .args([
                "--dry-run",
                "--verbose",
                path_arg(workspace.path()),
                "--packages-dir",
                path_arg(cache.path()),
            ])
            .assert()
            .stderr(predicate::str::contains("deptrim v"))
            .stderr(predicate::str::contains("Mode: dry-run"));
    }

    /// Test that the configuration option changes the probed build directory
    #[test]
    fn test_configuration_option() {
        let (workspace, cache) = create_test_project();

        deptrim()
            .args([
                "-c",
                "Release",
                path_arg(workspace.path()),
                "--packages-dir",
                path_arg(cache.path()),
            ])
            .assert()
            .code(2)
            .stdout(predicate::str::contains("Release"));
    }
}
