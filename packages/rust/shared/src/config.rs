//! Application configuration for EndorseTrack.
//!
//! User config lives at `~/.endorsetrack/endorsetrack.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EndorseTrackError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "endorsetrack.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".endorsetrack";

// ---------------------------------------------------------------------------
// Config structs (matching endorsetrack.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Document walking knobs.
    #[serde(default)]
    pub import: ImportConfig,

    /// Resolver match-tier policy.
    #[serde(default)]
    pub resolver: ResolverPolicy,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default database path.
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

fn default_db_path() -> String {
    "~/.endorsetrack/endorsetrack.db".into()
}

/// `[import]` section.
///
/// The heading base offset is corpus-specific: endorsement pages open their
/// outline at `==`-level headings, so pair count minus 2 gives the stack
/// depth. It is kept overridable rather than hard-coded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Subtracted from a heading's marker-pair count to get its stack depth.
    #[serde(default = "default_heading_base_offset")]
    pub heading_base_offset: usize,

    /// Heading names that cleanly terminate the walk.
    #[serde(default = "default_terminal_sections")]
    pub terminal_sections: Vec<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            heading_base_offset: default_heading_base_offset(),
            terminal_sections: default_terminal_sections(),
        }
    }
}

fn default_heading_base_offset() -> usize {
    2
}
fn default_terminal_sections() -> Vec<String> {
    vec!["See also".into(), "References".into()]
}

/// `[resolver]` section: thresholds for the fuzzy match cascade.
///
/// The source corpus used these values inconsistently across call sites;
/// they are policy parameters to change deliberately, not constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverPolicy {
    /// How many leading characters of the candidate's first token must
    /// prefix a registry name in the first/last tier.
    #[serde(default = "default_first_token_prefix_len")]
    pub first_token_prefix_len: usize,

    /// Minimum length of the candidate's last token for the first/last tier
    /// to apply at all.
    #[serde(default = "default_min_last_token_len")]
    pub min_last_token_len: usize,
}

impl Default for ResolverPolicy {
    fn default() -> Self {
        Self {
            first_token_prefix_len: default_first_token_prefix_len(),
            min_last_token_len: default_min_last_token_len(),
        }
    }
}

fn default_first_token_prefix_len() -> usize {
    3
}
fn default_min_last_token_len() -> usize {
    3
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.endorsetrack/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| EndorseTrackError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.endorsetrack/endorsetrack.toml`).
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
    let content = std::fs::read_to_string(path).map_err(|e| EndorseTrackError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        EndorseTrackError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| EndorseTrackError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| EndorseTrackError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| EndorseTrackError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
