//! Loading configuration, stored as JSON.

use crate::options::{ErrorPolicy, SignatureMode};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::{BufReader, Write};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Config {
    // what to do with malformed statements during bulk loads
    #[serde(default)]
    pub error_policy: ErrorPolicy,
    // give up after this many skipped statements; unlimited if unset
    #[serde(default)]
    pub max_errors: Option<usize>,
    // blank node signatures used by graph comparison
    #[serde(default)]
    pub signature_mode: SignatureMode,
}

impl Config {
    pub fn strict() -> Self {
        Config {
            error_policy: ErrorPolicy::Abort,
            ..Default::default()
        }
    }

    pub fn save_to_file(&self, file: &Path) -> Result<()> {
        let config_str = serde_json::to_string_pretty(&self)?;
        let mut file = std::fs::File::create(file)?;
        file.write_all(config_str.as_bytes())?;
        Ok(())
    }

    pub fn from_file(file: &Path) -> Result<Self> {
        let file = std::fs::File::open(file)?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.error_policy, ErrorPolicy::Skip);
        assert_eq!(config.signature_mode, SignatureMode::Bidirectional);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = Config {
            error_policy: ErrorPolicy::Abort,
            max_errors: Some(3),
            signature_mode: SignatureMode::Outgoing,
        };
        config.save_to_file(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"abort\""));
        assert_eq!(Config::from_file(&path).unwrap(), config);
    }
}
