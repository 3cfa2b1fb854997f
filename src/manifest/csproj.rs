//! SDK-style `.csproj` parsing and `PackageReference` removal
//!
//! Reading goes through quick-xml; removal edits the raw text so that every
//! byte outside the removed element is preserved.

use crate::domain::{DeclaredDependency, SemanticVersion, TargetFramework};
use crate::error::ManifestError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::warn;

const SDK_PREFIX: &str = "Microsoft.NET.Sdk";

/// Kind of artifact a project builds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Library,
    Executable,
}

impl OutputKind {
    fn from_output_type(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "exe" | "winexe" => OutputKind::Executable,
            _ => OutputKind::Library,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputKind::Library => "dll",
            OutputKind::Executable => "exe",
        }
    }
}

/// A parsed SDK-style project
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectManifest {
    pub path: PathBuf,
    pub target_framework: TargetFramework,
    pub output_kind: OutputKind,
    /// Artifact file stem
    pub assembly_name: String,
    /// Package references in document order
    pub dependencies: Vec<DeclaredDependency>,
}

impl ProjectManifest {
    /// Directory containing the project file
    pub fn project_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// File name of the build artifact, e.g. `App.dll`
    pub fn artifact_file_name(&self) -> String {
        format!("{}.{}", self.assembly_name, self.output_kind.extension())
    }
}

#[derive(Default)]
struct PendingReference {
    include: Option<String>,
    version: Option<String>,
}

/// Parse the content of a `.csproj` file
pub fn parse_project(path: &Path, content: &str) -> Result<ProjectManifest, ManifestError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<String> = Vec::new();
    let mut sdk_checked = false;
    let mut target_framework: Option<String> = None;
    let mut target_frameworks: Option<String> = None;
    let mut output_type: Option<String> = None;
    let mut assembly_name: Option<String> = None;
    let mut references: Vec<PendingReference> = Vec::new();
    let mut pending: Option<PendingReference> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ManifestError::xml_parse_error(path, e.to_string()))?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let tag = local_name(e);
                if !sdk_checked {
                    check_sdk(path, &tag, e)?;
                    sdk_checked = true;
                }
                let is_empty = matches!(event, Event::Empty(_));
                if tag == "PackageReference" && context(&stack) == "Project>ItemGroup" {
                    let reference = PendingReference {
                        include: attribute(e, "Include"),
                        version: attribute(e, "Version"),
                    };
                    if is_empty {
                        references.push(reference);
                    } else {
                        pending = Some(reference);
                    }
                }
                if !is_empty {
                    stack.push(tag);
                }
            }
            Event::Text(ref e) => {
                let text = e
                    .unescape()
                    .map_err(|err| ManifestError::xml_parse_error(path, err.to_string()))?
                    .trim()
                    .to_string();
                match context(&stack).as_str() {
                    "Project>PropertyGroup>TargetFramework" => target_framework = Some(text),
                    "Project>PropertyGroup>TargetFrameworks" => target_frameworks = Some(text),
                    "Project>PropertyGroup>OutputType" => output_type = Some(text),
                    "Project>PropertyGroup>AssemblyName" => assembly_name = Some(text),
                    "Project>ItemGroup>PackageReference>Version" => {
                        if let Some(reference) = pending.as_mut() {
                            reference.version = Some(text);
                        }
                    }
                    _ => {}
                }
            }
            Event::End(_) => {
                if stack.last().map(|s| s.as_str()) == Some("PackageReference") {
                    if let Some(reference) = pending.take() {
                        references.push(reference);
                    }
                }
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !sdk_checked {
        return Err(ManifestError::NotSdkProject {
            path: path.to_path_buf(),
        });
    }

    let target_framework = target_framework
        .filter(|t| !t.is_empty())
        .or_else(|| {
            target_frameworks.and_then(|list| {
                list.split(';')
                    .map(str::trim)
                    .find(|t| !t.is_empty())
                    .map(str::to_string)
            })
        })
        .ok_or_else(|| ManifestError::MissingTargetFramework {
            path: path.to_path_buf(),
        })?;

    let mut dependencies = Vec::new();
    for reference in references {
        let Some(name) = reference.include else {
            warn!(path = %path.display(), "skipping PackageReference without Include");
            continue;
        };
        let Some(version) = reference.version.filter(|v| !v.is_empty()) else {
            return Err(ManifestError::MissingVersion {
                path: path.to_path_buf(),
                package: name,
            });
        };
        let parsed =
            SemanticVersion::parse(&version).map_err(|_| ManifestError::InvalidVersion {
                path: path.to_path_buf(),
                package: name.clone(),
                version: version.clone(),
            })?;
        dependencies.push(DeclaredDependency::new(name, parsed));
    }

    let assembly_name = assembly_name.filter(|n| !n.is_empty()).unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    });

    Ok(ProjectManifest {
        path: path.to_path_buf(),
        target_framework: TargetFramework::new(target_framework),
        output_kind: output_type
            .as_deref()
            .map(OutputKind::from_output_type)
            .unwrap_or(OutputKind::Library),
        assembly_name,
        dependencies,
    })
}

fn check_sdk(path: &Path, root: &str, e: &BytesStart<'_>) -> Result<(), ManifestError> {
    let sdk = attribute(e, "Sdk");
    let is_sdk = root == "Project"
        && sdk
            .as_deref()
            .map(|s| s.starts_with(SDK_PREFIX))
            .unwrap_or(false);
    if is_sdk {
        Ok(())
    } else {
        Err(ManifestError::NotSdkProject {
            path: path.to_path_buf(),
        })
    }
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).to_string()
}

fn attribute(e: &BytesStart<'_>, name: &str) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == name.as_bytes())
        .and_then(|a| a.unescape_value().ok().map(|v| v.trim().to_string()))
}

fn context(stack: &[String]) -> String {
    stack.join(">")
}

/// Remove the `PackageReference` element for `package` from project text.
///
/// An element alone on its line is removed together with that line.
/// Returns `None` when no element matches.
pub fn remove_package_reference(content: &str, package: &str) -> Option<String> {
    let element = format!(
        r#"<PackageReference\b[^>]*?\bInclude\s*=\s*["']{}["'][^>]*?(?:/>|>.*?</PackageReference\s*>)"#,
        regex::escape(package)
    );

    // Whole line first, then the bare element
    let line_pattern = format!(r"(?ms)^[ \t]*{element}[ \t]*(?:\r?\n|\z)");
    let bare_pattern = format!(r"(?s){element}");

    for pattern in [line_pattern, bare_pattern] {
        if let Ok(re) = Regex::new(&pattern) {
            if re.is_match(content) {
                return Some(re.replace(content, "").into_owned());
            }
        }
    }
    None
}
