//! Configuration file support for ferro-geneid.
//!
//! # Example Configuration
//!
//! ```toml
//! [store]
//! path = "/data/geneid/master.json.gz"
//! default_null_id = "NA"
//!
//! [build]
//! key_symbol = "symbol"
//! alias_field = "alias_symbol"
//! prev_field = "prev_symbol"
//! fields = ["ensembl_gene_id", "entrez_id", "hgnc_id", "uniprot_ids"]
//! ```
//!
//! # Config File Locations
//!
//! Configuration is searched in this order (first found wins):
//! 1. `.ferro-geneid.toml` in current directory
//! 2. `~/.config/ferro/geneid.toml`
//!
//! CLI flags take precedence over config file settings.

use crate::builder::BuildConfig;
use crate::error::GeneIdError;
use crate::store::default_store_path;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file name looked up in the current directory.
pub const LOCAL_CONFIG: &str = ".ferro-geneid.toml";

/// Parsed configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneIdConfig {
    /// Persisted store settings.
    pub store: StoreConfig,
    /// Reference file layout.
    pub build: BuildConfig,
}

/// `[store]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store to load; the bundled store when unset.
    pub path: Option<PathBuf>,
    /// Value returned for unresolvable identifiers.
    pub default_null_id: Option<String>,
}

impl GeneIdConfig {
    /// Load configuration from the default locations.
    pub fn load() -> Option<Self> {
        let cwd_config = PathBuf::from(LOCAL_CONFIG);
        if cwd_config.exists() {
            match Self::load_from_path(&cwd_config) {
                Ok(config) => return Some(config),
                Err(e) => log::warn!("Ignoring {}: {}", cwd_config.display(), e),
            }
        }

        if let Some(home) = dirs_home() {
            let home_config = home.join(".config").join("ferro").join("geneid.toml");
            if home_config.exists() {
                match Self::load_from_path(&home_config) {
                    Ok(config) => return Some(config),
                    Err(e) => log::warn!("Ignoring {}: {}", home_config.display(), e),
                }
            }
        }

        None
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, GeneIdError> {
        let content = fs::read_to_string(path).map_err(|e| GeneIdError::Config {
            msg: format!("{}: {}", path.display(), e),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML content.
    pub fn parse(content: &str) -> Result<Self, GeneIdError> {
        toml::from_str(content).map_err(|e| GeneIdError::Config { msg: e.to_string() })
    }

    /// Save configuration as TOML.
    pub fn to_file(&self, path: &Path) -> Result<(), GeneIdError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| GeneIdError::Config { msg: e.to_string() })?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Store path to use: CLI value, then config, then `$FERRO_GENEID_STORE`.
    ///
    /// `None` selects the bundled store.
    pub fn resolve_store_path(&self, cli_path: Option<&Path>) -> Option<PathBuf> {
        cli_path
            .map(Path::to_path_buf)
            .or_else(|| self.store.path.clone())
            .or_else(default_store_path)
    }

    /// Where `add-db` writes: `--output`, else the store it read.
    ///
    /// The bundled store is read-only, so it needs an explicit output.
    pub fn resolve_add_db_output(
        &self,
        cli_store: Option<&Path>,
        cli_output: Option<&Path>,
    ) -> Result<PathBuf, GeneIdError> {
        cli_output
            .map(Path::to_path_buf)
            .or_else(|| self.resolve_store_path(cli_store))
            .ok_or_else(|| GeneIdError::Config {
                msg: "add-db on the bundled store needs --output".to_string(),
            })
    }

    /// Missing-value default: CLI value, then config.
    pub fn resolve_null_id(&self, cli_null: Option<&str>) -> Option<String> {
        cli_null
            .map(str::to_string)
            .or_else(|| self.store.default_null_id.clone())
    }
}

/// Get the user's home directory.
fn dirs_home() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_empty_config() {
        let config = GeneIdConfig::parse("").unwrap();
        assert_eq!(config, GeneIdConfig::default());
        assert_eq!(config.build.key_symbol, "symbol");
        assert_eq!(config.build.fields.len(), 3);
    }

    #[test]
    fn test_parse_store_section() {
        let content = r#"
[store]
path = "/data/master.json.gz"
default_null_id = "NA"
"#;
        let config = GeneIdConfig::parse(content).unwrap();
        assert_eq!(
            config.store.path,
            Some(PathBuf::from("/data/master.json.gz"))
        );
        assert_eq!(config.store.default_null_id.as_deref(), Some("NA"));
    }

    #[test]
    fn test_parse_partial_build_section() {
        let content = r#"
[build]
fields = ["entrez_id", "uniprot_ids"]
"#;
        let config = GeneIdConfig::parse(content).unwrap();
        assert_eq!(config.build.fields, vec!["entrez_id", "uniprot_ids"]);
        assert_eq!(config.build.alias_field, "alias_symbol");
    }

    #[test]
    fn test_parse_invalid() {
        let err = GeneIdConfig::parse("[store\npath = 1").unwrap_err();
        assert!(matches!(err, GeneIdError::Config { .. }));
    }

    #[test]
    fn test_round_trip_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("geneid.toml");
        let mut config = GeneIdConfig::default();
        config.store.default_null_id = Some("unknown".to_string());
        config.to_file(&path).unwrap();
        assert_eq!(GeneIdConfig::load_from_path(&path).unwrap(), config);
    }

    #[test]
    fn test_cli_precedence() {
        let config = GeneIdConfig {
            store: StoreConfig {
                path: Some(PathBuf::from("from_config.json")),
                default_null_id: Some("NA".to_string()),
            },
            ..Default::default()
        };
        assert_eq!(
            config.resolve_store_path(Some(Path::new("cli.json"))),
            Some(PathBuf::from("cli.json"))
        );
        assert_eq!(
            config.resolve_store_path(None),
            Some(PathBuf::from("from_config.json"))
        );
        assert_eq!(config.resolve_null_id(Some("-")).as_deref(), Some("-"));
        assert_eq!(config.resolve_null_id(None).as_deref(), Some("NA"));
    }

    #[test]
    fn test_add_db_output() {
        let bundled = GeneIdConfig::default();
        if std::env::var_os(crate::store::STORE_PATH_ENV).is_none() {
            let err = bundled.resolve_add_db_output(None, None).unwrap_err();
            assert!(matches!(err, GeneIdError::Config { .. }));
        }
        assert_eq!(
            bundled
                .resolve_add_db_output(None, Some(Path::new("out.json")))
                .unwrap(),
            PathBuf::from("out.json")
        );
        assert_eq!(
            bundled
                .resolve_add_db_output(Some(Path::new("mine.json")), None)
                .unwrap(),
            PathBuf::from("mine.json")
        );

        let configured = GeneIdConfig {
            store: StoreConfig {
                path: Some(PathBuf::from("from_config.json")),
                default_null_id: None,
            },
            ..Default::default()
        };
        assert_eq!(
            configured.resolve_add_db_output(None, None).unwrap(),
            PathBuf::from("from_config.json")
        );
    }
}
