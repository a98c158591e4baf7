use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub model: ModelSettings,
    pub directory: DirectorySettings,
    pub search: SearchSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// External text-generation API settings
#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    pub endpoint: String,
    pub api_key: String,
    #[serde(default = "default_model_name")]
    pub name: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_model_timeout")]
    pub timeout_secs: u64,
}

fn default_model_name() -> String { "deepseek-chat".to_string() }
fn default_temperature() -> f64 { 0.2 }
fn default_max_tokens() -> u32 { 1000 }
fn default_model_timeout() -> u64 { 30 }

/// Profile directory (candidate store) settings
#[derive(Debug, Clone, Deserialize)]
pub struct DirectorySettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    #[serde(default = "default_profiles_collection")]
    pub profiles_collection: String,
    #[serde(default = "default_directory_timeout")]
    pub timeout_secs: u64,
}

fn default_profiles_collection() -> String { "profiles".to_string() }
fn default_directory_timeout() -> u64 { 15 }

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_max_context")]
    pub max_context_entries: usize,
}

fn default_max_context() -> usize { 100 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with TALENT_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with TALENT_)
            // e.g., TALENT_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("TALENT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Inject secret material from the process environment
        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("TALENT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Inject credentials from well-known environment variables
///
/// The model API key is never shipped in a config file; it comes from
/// DEEPSEEK_API_KEY (or TALENT_MODEL__API_KEY). Same policy for the
/// directory credentials.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let model_api_key = env::var("DEEPSEEK_API_KEY")
        .or_else(|_| env::var("TALENT_MODEL__API_KEY"))
        .ok();

    let directory_api_key = env::var("TALENT_DIRECTORY__API_KEY").ok();
    let directory_project_id = env::var("TALENT_DIRECTORY__PROJECT_ID").ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(api_key) = model_api_key {
        builder = builder.set_override("model.api_key", api_key)?;
    }
    if let Some(api_key) = directory_api_key {
        builder = builder.set_override("directory.api_key", api_key)?;
    }
    if let Some(project_id) = directory_project_id {
        builder = builder.set_override("directory.project_id", project_id)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_defaults() {
        assert_eq!(default_model_name(), "deepseek-chat");
        assert_eq!(default_temperature(), 0.2);
        assert_eq!(default_max_tokens(), 1000);
        assert_eq!(default_model_timeout(), 30);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_search_defaults() {
        assert_eq!(default_max_context(), 100);
    }
}
