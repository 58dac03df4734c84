//! # Configuration
//!
//! Folio configuration is managed by [`confique`], which layers environment
//! variables over a TOML file over compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `FOLIO_DATA_DIR`, `FOLIO_FILE_EXT`.
//! 2. **Config file**: `<root>/.folio/folio.toml`, when present.
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_dir` | `.folio` | Name of the data directory under the root |
//! | `file_ext` | `.yaml` | Extension for newly written documents |

use crate::error::Result;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = ".folio";
pub const CONFIG_FILE: &str = "folio.toml";

/// Configuration for folio, stored in `folio.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FolioConfig {
    /// Name of the data directory that holds one subdirectory per kind.
    #[config(env = "FOLIO_DATA_DIR", default = ".folio")]
    pub data_dir: String,

    /// Extension for newly written document files (e.g. ".yaml", ".yml").
    #[config(env = "FOLIO_FILE_EXT", default = ".yaml")]
    pub file_ext: String,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            data_dir: DEFAULT_DATA_DIR.to_string(),
            file_ext: ".yaml".to_string(),
        }
    }
}

impl FolioConfig {
    /// Loads configuration for the store rooted at `root`.
    pub fn load(root: &Path) -> Result<Self> {
        let config = FolioConfig::builder()
            .env()
            .file(root.join(DEFAULT_DATA_DIR).join(CONFIG_FILE))
            .load()?;
        Ok(config)
    }

    /// Get the file extension, normalized to start with a dot.
    pub fn file_ext(&self) -> String {
        if self.file_ext.starts_with('.') {
            self.file_ext.clone()
        } else {
            format!(".{}", self.file_ext)
        }
    }

    /// Absolute data directory for a root.
    pub fn data_path(&self, root: &Path) -> PathBuf {
        root.join(&self.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FolioConfig::default();
        assert_eq!(config.data_dir, ".folio");
        assert_eq!(config.file_ext(), ".yaml");
    }

    #[test]
    fn test_file_ext_normalization_without_dot() {
        let config = FolioConfig {
            file_ext: "yml".to_string(),
            ..Default::default()
        };
        assert_eq!(config.file_ext(), ".yml");
    }

    #[test]
    fn test_data_path_joins_root() {
        let config = FolioConfig::default();
        assert_eq!(
            config.data_path(Path::new("/tmp/project")),
            PathBuf::from("/tmp/project/.folio")
        );
    }

    #[test]
    fn test_load_reads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join(DEFAULT_DATA_DIR);
        std::fs::create_dir_all(&data).unwrap();
        std::fs::write(data.join(CONFIG_FILE), "file_ext = \"yml\"\n").unwrap();

        let config = FolioConfig::load(dir.path()).unwrap();
        assert_eq!(config.file_ext(), ".yml");
    }
}
