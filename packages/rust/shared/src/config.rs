//! Application configuration for stagedoor.
//!
//! User config lives at `~/.stagedoor/stagedoor.toml`.
//! CLI flags override the `STAGEDOOR_API_BASE` env var, which overrides
//! config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "stagedoor.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".stagedoor";

/// Env var that overrides the configured API base URL.
pub const API_BASE_ENV: &str = "STAGEDOOR_API_BASE";

// ---------------------------------------------------------------------------
// Config structs (matching stagedoor.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// `[source]` section.
    #[serde(default)]
    pub source: SourceSection,
}

/// Which backend the catalog loads entity data from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Static CSV files (local directory or HTTP-served).
    Csv,
    /// The theater REST API.
    Rest,
}

impl std::str::FromStr for SourceKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "rest" => Ok(Self::Rest),
            other => Err(CatalogError::config(format!(
                "unknown source kind '{other}' (expected 'csv' or 'rest')"
            ))),
        }
    }
}

/// `[source]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    /// Backend to load from.
    #[serde(default = "default_kind")]
    pub kind: SourceKind,

    /// Base URL of the REST API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Directory or http(s) base the CSV files are served from.
    #[serde(default = "default_data_location")]
    pub data_location: String,
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            api_base_url: default_api_base_url(),
            data_location: default_data_location(),
        }
    }
}

fn default_kind() -> SourceKind {
    SourceKind::Csv
}
fn default_api_base_url() -> String {
    "http://localhost:5248/api".into()
}
fn default_data_location() -> String {
    "./data".into()
}

// ---------------------------------------------------------------------------
// Source config (runtime, merged from config + env + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime source configuration after flag/env/file merging.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Backend to load from.
    pub kind: SourceKind,
    /// Base URL of the REST API.
    pub api_base_url: String,
    /// Directory or http(s) base the CSV files are served from.
    pub data_location: String,
}

impl SourceConfig {
    /// Merge the config file with the API-base env var and optional CLI
    /// overrides. Flags win over the env var, which wins over the file.
    pub fn resolve(
        config: &AppConfig,
        kind: Option<SourceKind>,
        api_base: Option<&str>,
        data: Option<&str>,
    ) -> Self {
        let env_base = std::env::var(API_BASE_ENV).ok().filter(|v| !v.is_empty());

        Self {
            kind: kind.unwrap_or(config.source.kind),
            api_base_url: api_base
                .map(String::from)
                .or(env_base)
                .unwrap_or_else(|| config.source.api_base_url.clone()),
            data_location: data
                .map(String::from)
                .unwrap_or_else(|| config.source.data_location.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.stagedoor/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CatalogError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.stagedoor/stagedoor.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| CatalogError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| CatalogError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| CatalogError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| CatalogError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("api_base_url"));
        assert!(toml_str.contains("data_location"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.source.kind, SourceKind::Csv);
        assert_eq!(parsed.source.api_base_url, "http://localhost:5248/api");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[source]
kind = "rest"
api_base_url = "https://theater.example.com/api"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.source.kind, SourceKind::Rest);
        assert_eq!(config.source.data_location, "./data");
    }

    #[test]
    fn source_kind_parses() {
        assert_eq!("CSV".parse::<SourceKind>().unwrap(), SourceKind::Csv);
        assert_eq!("rest".parse::<SourceKind>().unwrap(), SourceKind::Rest);
        assert!("sqlite".parse::<SourceKind>().is_err());
    }

    #[test]
    fn flags_override_file() {
        let config = AppConfig::default();
        let resolved = SourceConfig::resolve(
            &config,
            Some(SourceKind::Rest),
            Some("http://localhost:9999/api"),
            None,
        );
        assert_eq!(resolved.kind, SourceKind::Rest);
        assert_eq!(resolved.api_base_url, "http://localhost:9999/api");
        assert_eq!(resolved.data_location, "./data");
    }
}
