//! Assembly reference listing for built .NET assemblies
//!
//! The image is loaded through `dotscope`, which parses the PE headers and the
//! ECMA-335 metadata. Only the name column of the `AssemblyRef` table is used.

use super::AssemblyInspector;
use crate::error::InspectError;
use dotscope::CilObject;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Reads assembly references from the metadata of a built assembly
#[derive(Debug, Clone, Copy, Default)]
pub struct PeMetadataInspector;

impl PeMetadataInspector {
    pub fn new() -> Self {
        Self
    }
}

impl AssemblyInspector for PeMetadataInspector {
    fn referenced_assemblies(&self, path: &Path) -> Result<Vec<String>, InspectError> {
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => InspectError::ArtifactNotFound {
                path: path.to_path_buf(),
            },
            _ => InspectError::ReadError {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        let names =
            read_assembly_refs(bytes).map_err(|message| InspectError::malformed(path, message))?;
        debug!(path = %path.display(), references = names.len(), "read assembly references");
        Ok(names)
    }
}

/// Names of the `AssemblyRef` rows of an in-memory image, in table order
pub fn read_assembly_refs(image: Vec<u8>) -> Result<Vec<String>, String> {
    let assembly = CilObject::from_mem(image).map_err(|e| e.to_string())?;
    Ok(assembly
        .refs_assembly()
        .iter()
        .map(|entry| entry.value().name.clone())
        .collect())
}
