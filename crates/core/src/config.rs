//! Layered configuration: defaults, optional config file, environment.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::save::DEFAULT_SNAPSHOT_FILE;

/// Directory under the user's config directory holding `config.toml`.
pub const CONFIG_DIR: &str = "subway";
/// Prefix for environment overrides, e.g. `SUBWAY_DATA_DIR`.
pub const ENV_PREFIX: &str = "SUBWAY";

const DEFAULT_CONFIG: &str = r#"# Subway network configuration.

# Directory holding the network snapshot and the log file.
# data_dir = "~/.local/share/subway"

# Snapshot file name inside data_dir.
snapshot_file = "network.json"

# Log file name inside data_dir.
log_file = "subway.log"
"#;

/// Runtime settings for the subway tools.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubwayConfig {
    /// Directory holding persisted data.
    pub data_dir: PathBuf,
    /// Snapshot file name relative to `data_dir`.
    pub snapshot_file: String,
    /// Log file name relative to `data_dir`.
    pub log_file: String,
}

impl Default for SubwayConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            snapshot_file: DEFAULT_SNAPSHOT_FILE.to_string(),
            log_file: "subway.log".to_string(),
        }
    }
}

impl SubwayConfig {
    /// Load from the default config file and `SUBWAY_*` environment variables.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path().as_deref())
    }

    /// Load using an explicit config file, which may be absent.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("data_dir", defaults.data_dir.to_string_lossy().into_owned())?
            .set_default("snapshot_file", defaults.snapshot_file)?
            .set_default("log_file", defaults.log_file)?;
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }
        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("failed to assemble configuration")?;
        config
            .try_deserialize()
            .context("failed to deserialize configuration")
    }

    /// Full path of the snapshot file.
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(&self.snapshot_file)
    }

    /// Full path of the log file.
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(&self.log_file)
    }
}

/// Location of the user config file, if a config directory is known.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join("config.toml"))
}

/// Write a commented default config file when none exists yet.
///
/// Returns the path of the file when it was newly written.
pub fn ensure_default_config() -> Result<Option<PathBuf>> {
    let Some(path) = config_path() else {
        return Ok(None);
    };
    Ok(write_default_config(&path)?.then_some(path))
}

fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_falls_back_to_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = SubwayConfig::load_from(Some(dir.path().join("absent.toml").as_path()))?;
        assert_eq!(config.snapshot_file, DEFAULT_SNAPSHOT_FILE);
        assert_eq!(config.log_file, "subway.log");
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            format!(
                "data_dir = {:?}\nsnapshot_file = \"lines.json\"\n",
                dir.path().display().to_string()
            ),
        )?;
        let config = SubwayConfig::load_from(Some(path.as_path()))?;
        assert_eq!(config.data_dir, dir.path());
        assert_eq!(config.snapshot_path(), dir.path().join("lines.json"));
        assert_eq!(config.log_path(), dir.path().join("subway.log"));
        Ok(())
    }

    #[test]
    fn default_config_is_written_once_and_parses() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("subway").join("config.toml");
        assert!(write_default_config(&path)?);
        let config = SubwayConfig::load_from(Some(path.as_path()))?;
        assert_eq!(config.snapshot_file, DEFAULT_SNAPSHOT_FILE);

        fs::write(&path, "log_file = \"custom.log\"\n")?;
        assert!(!write_default_config(&path)?);
        let config = SubwayConfig::load_from(Some(path.as_path()))?;
        assert_eq!(config.log_file, "custom.log");
        Ok(())
    }
}
