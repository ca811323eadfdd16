//! JSON configuration file for a merge run

use crate::bulk::BulkOptions;
use crate::error::{Error, Result};
use crate::parser::DelimitedParser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything needed to repeat a merge run
///
/// Bulk options sit at the top level of the file; parser options live
/// under `"parser"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeConfig {
    #[serde(flatten)]
    pub bulk: BulkOptions,
    #[serde(default)]
    pub parser: DelimitedParser,
    /// Output of an earlier run to place in front of the new rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior: Option<PathBuf>,
}

impl MergeConfig {
    /// Load a config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.parser.validate()?;
        Ok(config)
    }

    /// Save the config to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::SubdirSpec;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "directory": "raw",
            "subdirectories": true,
            "fixed": "session",
            "parser": { "delimiter": ";", "na_values": ["NA", "-"] },
            "prior": "merged.csv"
        }"#;

        let config: MergeConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.bulk.directory, PathBuf::from("raw"));
        assert_eq!(config.bulk.subdirectories, SubdirSpec::All);
        assert_eq!(config.bulk.fixed.as_deref(), Some("session"));
        assert!(config.bulk.verbose);
        assert_eq!(config.parser.delimiter, ';');
        assert!(config.parser.has_headers);
        assert_eq!(config.parser.na_values, vec!["NA", "-"]);
        assert_eq!(config.prior, Some(PathBuf::from("merged.csv")));
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: MergeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, MergeConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merge.json");
        let config = MergeConfig {
            bulk: BulkOptions {
                subdirectories: SubdirSpec::Named(vec!["s1".to_string()]),
                extension: Some(".csv".to_string()),
                ..BulkOptions::default()
            },
            ..MergeConfig::default()
        };

        config.save(&path).unwrap();

        assert_eq!(MergeConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_rejects_non_ascii_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merge.json");
        std::fs::write(&path, r#"{ "parser": { "delimiter": "§" } }"#).unwrap();

        assert!(matches!(
            MergeConfig::load(&path),
            Err(Error::InvalidArgument(_))
        ));
    }
}
