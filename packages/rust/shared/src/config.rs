//! Application configuration for Groups2BuildingInstructions.
//!
//! User config lives at `~/.groups2bi/groups2bi.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Groups2BiError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "groups2bi.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".groups2bi";

// ---------------------------------------------------------------------------
// Config structs (matching groups2bi.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Generation defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Output formatting.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Maximum nesting depth of sub-steps. Negative values disable sub-steps.
    #[serde(default = "default_max_substep_depth")]
    pub max_substep_depth: i32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            max_substep_depth: default_max_substep_depth(),
        }
    }
}

fn default_max_substep_depth() -> i32 {
    3
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Spaces per nesting level in the generated `BuildingInstructions` block.
    #[serde(default = "default_indent")]
    pub indent: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
        }
    }
}

fn default_indent() -> usize {
    2
}

// ---------------------------------------------------------------------------
// Build options (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime generation options, merged from config file + CLI flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Maximum sub-step nesting depth.
    pub max_substep_depth: i32,
    /// Indentation width for the generated XML block.
    pub indent: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for BuildOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_substep_depth: config.defaults.max_substep_depth,
            indent: config.output.indent,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.groups2bi/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| Groups2BiError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.groups2bi/groups2bi.toml`).
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
    let content = std::fs::read_to_string(path).map_err(|e| Groups2BiError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        Groups2BiError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| Groups2BiError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| Groups2BiError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| Groups2BiError::io(&path, e))?;
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
        assert!(toml_str.contains("max_substep_depth = 3"));
        assert!(toml_str.contains("indent = 2"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.max_substep_depth, 3);
        assert_eq!(parsed.output.indent, 2);
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let toml_str = r#"
[defaults]
max_substep_depth = -1
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.max_substep_depth, -1);
        assert_eq!(config.output.indent, 2);
    }

    #[test]
    fn build_options_from_app_config() {
        let mut app = AppConfig::default();
        app.output.indent = 4;
        let options = BuildOptions::from(&app);
        assert_eq!(options.max_substep_depth, 3);
        assert_eq!(options.indent, 4);
        assert_eq!(BuildOptions::default().indent, 2);
    }

    #[test]
    fn load_config_from_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("groups2bi-no-such-dir/groups2bi.toml");
        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, Groups2BiError::Io { .. }));
    }

    #[test]
    fn load_config_from_invalid_toml() {
        let path = std::env::temp_dir().join(format!(
            "groups2bi-config-test-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[defaults]\nmax_substep_depth = \"deep\"\n").unwrap();
        let err = load_config_from(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().starts_with("config error: failed to parse"));
    }
}
