//! Configuration management for the CV renderer.
//!
//! Parses `cv.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` or `$VAR` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `output.title`
//! - `output.stylesheet`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "cv.toml";

/// Extension names enabled when `render.extensions` is not set, in
/// precedence order.
pub const DEFAULT_EXTENSIONS: [&str; 4] = ["lrn", "centerline", "iconify-inline", "strong-adjacency-fix"];

/// Upper bound accepted for `render.max_depth`.
pub const MAX_DEPTH_LIMIT: usize = 256;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override standalone document output.
    pub standalone: Option<bool>,
    /// Override document title.
    pub title: Option<String>,
    /// Override stylesheet href.
    pub stylesheet: Option<String>,
    /// Extensions removed from the configured list.
    pub disabled_extensions: Vec<String>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rendering configuration.
    pub render: RenderConfig,
    /// Output configuration.
    pub output: OutputConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Enabled extensions in precedence order.
    pub extensions: Vec<String>,
    /// Inputs longer than this are truncated.
    pub max_input_bytes: usize,
    /// Maximum nesting depth.
    pub max_depth: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.map(str::to_owned).to_vec(),
            max_input_bytes: 1 << 20,
            max_depth: 32,
        }
    }
}

/// Output configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Wrap the fragment in a complete HTML document.
    pub standalone: bool,
    /// Document title (standalone output).
    pub title: String,
    /// Stylesheet href linked from standalone output.
    pub stylesheet: Option<String>,
    /// Document language (standalone output).
    pub lang: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            standalone: false,
            title: "Curriculum Vitae".to_owned(),
            stylesheet: None,
            lang: "en".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`output.stylesheet`").
        field: String,
        /// Error message (e.g., "${`CV_THEME`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `cv.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails
    /// or the resulting configuration is invalid.
    pub fn load(config_path: Option<&Path>, cli_settings: Option<&CliSettings>) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir().ok().and_then(|cwd| Self::discover_config(&cwd)) {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(standalone) = settings.standalone {
            self.output.standalone = standalone;
        }
        if let Some(title) = &settings.title {
            self.output.title.clone_from(title);
        }
        if let Some(stylesheet) = &settings.stylesheet {
            self.output.stylesheet = Some(stylesheet.clone());
        }
        if !settings.disabled_extensions.is_empty() {
            self.render
                .extensions
                .retain(|name| !settings.disabled_extensions.contains(name));
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and expansion
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after applying CLI
    /// settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_render()?;
        self.validate_output()?;
        Ok(())
    }

    /// Validate render configuration.
    fn validate_render(&self) -> Result<(), ConfigError> {
        for (i, name) in self.render.extensions.iter().enumerate() {
            require_non_empty(name, "render.extensions entry")?;
            if self.render.extensions[..i].contains(name) {
                return Err(ConfigError::Validation(format!(
                    "render.extensions lists \"{name}\" more than once"
                )));
            }
        }

        if self.render.max_input_bytes == 0 {
            return Err(ConfigError::Validation(
                "render.max_input_bytes must be greater than 0".to_owned(),
            ));
        }

        if !(1..=MAX_DEPTH_LIMIT).contains(&self.render.max_depth) {
            return Err(ConfigError::Validation(format!(
                "render.max_depth must be between 1 and {MAX_DEPTH_LIMIT}"
            )));
        }

        Ok(())
    }

    /// Validate output configuration.
    fn validate_output(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.output.title, "output.title")?;
        require_non_empty(&self.output.lang, "output.lang")?;
        if let Some(stylesheet) = &self.output.stylesheet {
            require_non_empty(stylesheet, "output.stylesheet")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.output.title = expand::expand_env(&self.output.title, "output.title")?;
        if let Some(ref stylesheet) = self.output.stylesheet {
            self.output.stylesheet = Some(expand::expand_env(stylesheet, "output.stylesheet")?);
        }
        Ok(())
    }
}
