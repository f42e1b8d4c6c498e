//! JSON input files: graph literals and structures for the CLI.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{CausewayResult, InputError};

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> CausewayResult<T> {
    let content = std::fs::read_to_string(path).map_err(|e| InputError::Read {
        path: path.display().to_string(),
        source: e,
    })?;
    let value = serde_json::from_str(&content).map_err(|e| InputError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CausewayError;
    use crate::graph::GraphLiteral;
    use crate::structure::{Label, Structure};

    #[test]
    fn reads_a_structure_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("structure.json");
        std::fs::write(&path, r#"{"Labeled":[{"Agent":"MEK1"},"phosphate"]}"#).unwrap();
        let s: Structure = read_json(&path).unwrap();
        assert_eq!(s, Structure::agent("MEK1").labeled(Label::new("phosphate")));
    }

    #[test]
    fn missing_file_is_an_input_read_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = read_json::<GraphLiteral>(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, CausewayError::Input(InputError::Read { .. })));
    }

    #[test]
    fn malformed_graph_is_an_input_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("graph.json");
        std::fs::write(&path, "{ nodes: ").unwrap();
        let err = read_json::<GraphLiteral>(&path).unwrap_err();
        assert!(matches!(err, CausewayError::Input(InputError::Parse { .. })));
    }
}
