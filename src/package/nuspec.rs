//! `.nuspec` parsing: package identity and framework-scoped dependency groups.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::domain::{DependencySetDescriptor, PackageDependency, VersionRange};
use crate::error::ResolveError;

/// The parts of a `.nuspec` manifest the resolver needs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Nuspec {
    pub id: Option<String>,
    pub version: Option<String>,
    pub dependency_sets: Vec<DependencySetDescriptor>,
}

/// Parse a `.nuspec` document.
///
/// `package` and `version` only label errors.
pub fn parse_nuspec(package: &str, version: &str, xml: &str) -> Result<Nuspec, ResolveError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut nuspec = Nuspec::default();
    let mut path: Vec<String> = Vec::new();
    let mut current_group: Option<DependencySetDescriptor> = None;
    // <dependency> elements directly under <dependencies> form one unscoped set
    let mut ungrouped: Vec<PackageDependency> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let tag = local_name(e);
                match tag.as_str() {
                    "group" if parent_is(&path, "dependencies") => {
                        current_group = Some(DependencySetDescriptor {
                            target_framework: attribute(e, "targetFramework"),
                            dependencies: Vec::new(),
                        });
                    }
                    // <dependency ...></dependency> carries the same attributes as the empty form
                    "dependency" => {
                        let dependency = read_dependency(package, version, e)?;
                        place(dependency, &path, current_group.as_mut(), &mut ungrouped);
                    }
                    _ => {}
                }
                path.push(tag);
            }
            Ok(Event::Empty(ref e)) => {
                let tag = local_name(e);
                match tag.as_str() {
                    "dependency" => {
                        let dependency = read_dependency(package, version, e)?;
                        place(dependency, &path, current_group.as_mut(), &mut ungrouped);
                    }
                    "group" if parent_is(&path, "dependencies") => {
                        nuspec.dependency_sets.push(DependencySetDescriptor {
                            target_framework: attribute(e, "targetFramework"),
                            dependencies: Vec::new(),
                        });
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().unwrap_or_default().trim().to_string();
                match path_context(&path).as_str() {
                    "package>metadata>id" => nuspec.id = Some(text),
                    "package>metadata>version" => nuspec.version = Some(text),
                    _ => {}
                }
            }
            Ok(Event::End(_)) => {
                if path.last().map(|s| s.as_str()) == Some("group") {
                    if let Some(group) = current_group.take() {
                        nuspec.dependency_sets.push(group);
                    }
                }
                path.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ResolveError::metadata(
                    package,
                    version,
                    format!("invalid nuspec: {e}"),
                ))
            }
            _ => {}
        }
    }

    if !ungrouped.is_empty() {
        nuspec
            .dependency_sets
            .push(DependencySetDescriptor::unscoped(ungrouped));
    }

    Ok(nuspec)
}

fn read_dependency(
    package: &str,
    version: &str,
    e: &BytesStart<'_>,
) -> Result<PackageDependency, ResolveError> {
    let id = attribute(e, "id").ok_or_else(|| {
        ResolveError::metadata(package, version, "<dependency> without an id attribute")
    })?;
    let range = VersionRange::parse(attribute(e, "version").as_deref().unwrap_or(""))?;
    Ok(PackageDependency::new(id, range))
}

fn place(
    dependency: PackageDependency,
    path: &[String],
    group: Option<&mut DependencySetDescriptor>,
    ungrouped: &mut Vec<PackageDependency>,
) {
    if let Some(group) = group {
        group.dependencies.push(dependency);
    } else if parent_is(path, "dependencies") {
        ungrouped.push(dependency);
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

fn parent_is(path: &[String], name: &str) -> bool {
    path.last().map(|s| s.as_str()) == Some(name)
}

fn path_context(path: &[String]) -> String {
    path.join(">")
}
