//! Vault lookup through the Obsidian and CLI config files
//!
//! Obsidian records its vaults in `<config>/obsidian/obsidian.json`; the
//! CLI keeps its default vault name in `<config>/obsidian-cli/preferences.json`.
//! `<config>` is the user config directory unless `OBSIDIAN_CLI_CONFIG_HOME`
//! points elsewhere.

use crate::error::{FmqError, Result};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the config root
pub const CONFIG_HOME_ENV: &str = "OBSIDIAN_CLI_CONFIG_HOME";

const OBSIDIAN_CONFIG_DIR: &str = "obsidian";
const OBSIDIAN_CONFIG_FILE: &str = "obsidian.json";
const CLI_CONFIG_DIR: &str = "obsidian-cli";
const CLI_PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Deserialize)]
struct ObsidianConfig {
    #[serde(default)]
    vaults: BTreeMap<String, VaultEntry>,
}

#[derive(Debug, Deserialize)]
struct VaultEntry {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct Preferences {
    #[serde(default)]
    default_vault_name: Option<String>,
}

/// Finds vault directories by name
#[derive(Debug, Clone)]
pub struct VaultLocator {
    config_home: PathBuf,
}

impl VaultLocator {
    /// Create a locator reading config files below `config_home`
    pub fn new(config_home: impl Into<PathBuf>) -> Self {
        Self {
            config_home: config_home.into(),
        }
    }

    /// Use `OBSIDIAN_CLI_CONFIG_HOME` when set, else the platform config directory
    pub fn from_env() -> Result<Self> {
        if let Some(home) = std::env::var_os(CONFIG_HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::new(home));
        }

        let home = dirs::config_dir()
            .ok_or_else(|| FmqError::validation("Could not determine the user config directory"))?;
        Ok(Self::new(home))
    }

    pub fn config_home(&self) -> &Path {
        &self.config_home
    }

    pub fn obsidian_config_file(&self) -> PathBuf {
        self.config_home
            .join(OBSIDIAN_CONFIG_DIR)
            .join(OBSIDIAN_CONFIG_FILE)
    }

    pub fn preferences_file(&self) -> PathBuf {
        self.config_home
            .join(CLI_CONFIG_DIR)
            .join(CLI_PREFERENCES_FILE)
    }

    /// The vault name stored as the CLI default
    pub fn default_vault_name(&self) -> Result<String> {
        let path = self.preferences_file();
        let preferences: Preferences = read_json(&path)?;
        preferences
            .default_vault_name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| {
                FmqError::config(path, "no default vault is set, pass --vault <NAME>")
            })
    }

    /// Directory of the vault called `name`.
    ///
    /// A vault matches when its directory name or its key in
    /// `obsidian.json` equals `name`.
    pub fn vault_path(&self, name: &str) -> Result<PathBuf> {
        let config: ObsidianConfig = read_json(&self.obsidian_config_file())?;

        config
            .vaults
            .into_iter()
            .find(|(id, entry)| {
                id == name || entry.path.file_name().is_some_and(|dir| dir == name)
            })
            .map(|(_, entry)| entry.path)
            .ok_or_else(|| FmqError::vault_not_found(name))
    }

    /// Resolve `name`, falling back to the default vault when it is absent
    pub fn locate(&self, name: Option<&str>) -> Result<PathBuf> {
        let name = match name.filter(|n| !n.trim().is_empty()) {
            Some(name) => name.to_string(),
            None => self.default_vault_name()?,
        };

        let path = self.vault_path(&name)?;
        debug!("Vault '{}' is at {}", name, path.display());
        Ok(path)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|e| FmqError::config(path, e))?;
    serde_json::from_str(&text).map_err(|e| FmqError::config(path, e))
}
