// ============================================================
// Layer 6 — Config Store
// ============================================================
// Reads JSON configuration files into typed structs. The config
// types themselves live with the code they configure; this module
// only does the file I/O and error context.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::{fs, path::Path};

/// Read and deserialise a JSON file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read config from '{}'", path.display()))?;

    let value = serde_json::from_str(&json)
        .with_context(|| format!("Invalid config in '{}'", path.display()))?;

    tracing::debug!("Loaded config from '{}'", path.display());
    Ok(value)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(deny_unknown_fields)]
    struct Sample {
        topn: usize,
    }

    #[test]
    fn test_load_json() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"topn": 4}"#).unwrap();
        assert_eq!(load_json::<Sample>(&path).unwrap(), Sample { topn: 4 });
    }

    #[test]
    fn test_errors_name_the_file() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let err = load_json::<Sample>(&path).unwrap_err();
        assert!(format!("{err:#}").contains("config.json"));

        fs::write(&path, r#"{"topn": 4, "extra": 1}"#).unwrap();
        let err = load_json::<Sample>(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid config"));
    }
}
