//! Configuration for the club ledger

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants;
use crate::session::Session;

// =============================================================================
// File-based Configuration (club-ledger.toml)
// =============================================================================

/// Configuration loaded from club-ledger.toml
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub club: ClubConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

/// Club section
#[derive(Debug, Default, Deserialize)]
pub struct ClubConfig {
    /// Owner (administrator account) the CLI acts for
    #[serde(default)]
    pub owner_id: Option<String>,
    /// Label appended to amounts, e.g. "Tk"
    #[serde(default)]
    pub currency_unit: Option<String>,
}

/// Where the database and generated reports go
#[derive(Debug, Default, Deserialize)]
pub struct PathsConfig {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

/// Hosted realtime store, for `sync pull`
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    /// Database root, e.g. https://<project>-default-rtdb.firebaseio.com
    pub database_url: String,
    /// Database secret or ID token appended as `?auth=`
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl FileConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("In config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| {
            "Failed to parse club-ledger.toml. Check for:\n\
             - Invalid TOML syntax (missing quotes, brackets, etc.)\n\
             - A [remote] section without database_url\n\
             - Incorrect data types (strings vs numbers)\n\n\
             See club-ledger.toml.example for the expected format."
        })
    }
}

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Command-line values that take precedence over the config file
#[derive(Debug, Default)]
pub struct Overrides {
    pub owner_id: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

/// Main configuration struct with resolved values
#[derive(Debug)]
pub struct Config {
    /// Owner every store call runs as
    pub session: Session,
    pub currency_unit: String,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub remote: Option<RemoteConfig>,
}

impl Config {
    /// Create config from file config and command-line overrides
    pub fn from_file(file_config: &FileConfig, overrides: Overrides) -> Result<Self> {
        let owner_id = overrides
            .owner_id
            .or_else(|| file_config.club.owner_id.clone())
            .context("No owner id: set club.owner_id in club-ledger.toml or pass --owner")?;
        let session = Session::new(owner_id)?;

        let config = Self {
            session,
            currency_unit: file_config
                .club
                .currency_unit
                .clone()
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| constants::DEFAULT_CURRENCY_UNIT.to_string()),
            data_dir: overrides
                .data_dir
                .or_else(|| file_config.paths.data_dir.clone())
                .unwrap_or_else(|| PathBuf::from(constants::DEFAULT_DATA_DIR)),
            output_dir: overrides
                .output_dir
                .or_else(|| file_config.paths.output_dir.clone())
                .unwrap_or_else(|| PathBuf::from(constants::DEFAULT_OUTPUT_DIR)),
            remote: file_config.remote.clone(),
        };

        debug!(
            "Config: owner '{}', data dir {}, output dir {}",
            config.session,
            config.data_dir.display(),
            config.output_dir.display()
        );
        Ok(config)
    }

    /// SQLite database location
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(constants::DATABASE_FILENAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
        [club]
        owner_id = "uid-42"
        currency_unit = "BDT"

        [paths]
        data_dir = "/var/lib/club"
        output_dir = "/tmp/reports"

        [remote]
        database_url = "https://club-default-rtdb.firebaseio.com"
        auth_token = "secret"
    "#;

    #[test]
    fn test_parse_full_config() {
        let file = FileConfig::parse(FULL).unwrap();
        let config = Config::from_file(&file, Overrides::default()).unwrap();

        assert_eq!(config.session.owner_id(), "uid-42");
        assert_eq!(config.currency_unit, "BDT");
        assert_eq!(config.database_path(), PathBuf::from("/var/lib/club/ledger.db"));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/reports"));
        let remote = config.remote.unwrap();
        assert_eq!(remote.auth_token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let file = FileConfig::parse(FULL).unwrap();
        let config = Config::from_file(
            &file,
            Overrides {
                owner_id: Some("uid-cli".to_string()),
                data_dir: Some(PathBuf::from("./other")),
                output_dir: None,
            },
        )
        .unwrap();

        assert_eq!(config.session.owner_id(), "uid-cli");
        assert_eq!(config.data_dir, PathBuf::from("./other"));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/reports"));
    }

    #[test]
    fn test_defaults_without_file() {
        let config = Config::from_file(
            &FileConfig::default(),
            Overrides {
                owner_id: Some("uid-1".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(config.currency_unit, constants::DEFAULT_CURRENCY_UNIT);
        assert_eq!(config.data_dir, PathBuf::from(constants::DEFAULT_DATA_DIR));
        assert!(config.remote.is_none());
    }

    #[test]
    fn test_missing_owner_id() {
        let err = Config::from_file(&FileConfig::default(), Overrides::default()).unwrap_err();
        assert!(err.to_string().contains("No owner id"));
    }

    #[test]
    fn test_remote_requires_database_url() {
        assert!(FileConfig::parse("[remote]\nauth_token = \"x\"\n").is_err());
    }
}
