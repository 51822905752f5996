use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use crate::logging::LoggingConfig;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub cache: CacheConfig,
    pub llm: LlmConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory holding one JSON file per (query, source) cache entry.
    /// Injected explicitly so tests can point it at a temporary directory.
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub endpoint: String,
    pub model: String,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub default_format: String,
    pub output_directory: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = get_data_directory();

        Self {
            cache: CacheConfig {
                directory: data_dir.join("cache"),
            },
            llm: LlmConfig {
                endpoint: "http://localhost:11434".to_string(),
                model: "llama3".to_string(),
                request_timeout_seconds: 30,
            },
            export: ExportConfig {
                default_format: "csv".to_string(),
                output_directory: data_dir.join("exports"),
            },
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location, writing defaults if absent
    pub async fn load() -> Result<Self> {
        let config_path = get_config_path();

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            info!("No configuration file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub async fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: AppConfig = toml::from_str(&content)?;

        config.validate()?;

        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Save configuration to the default location
    pub async fn save(&self) -> Result<()> {
        let config_path = get_config_path();

        if let Some(parent) = config_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = toml::to_string_pretty(self)?;
        tokio::fs::write(&config_path, content).await?;

        info!("Configuration saved to: {}", config_path.display());
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.cache.directory.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("Cache directory must not be empty"));
        }

        if url::Url::parse(&self.llm.endpoint).is_err() {
            return Err(anyhow::anyhow!("LLM endpoint is not a valid URL: {}", self.llm.endpoint));
        }

        if self.llm.model.is_empty() {
            return Err(anyhow::anyhow!("LLM model name must not be empty"));
        }

        if self.llm.request_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("LLM request timeout must be > 0"));
        }

        Ok(())
    }

    /// Ensure all required directories exist
    pub async fn ensure_directories(&self) -> Result<()> {
        let dirs_to_create = vec![
            self.cache.directory.clone(),
            self.export.output_directory.clone(),
        ];

        for dir in dirs_to_create {
            if !dir.exists() {
                tokio::fs::create_dir_all(&dir).await?;
                info!("Created directory: {}", dir.display());
            }
        }

        Ok(())
    }
}

/// Get the default data directory
fn get_data_directory() -> PathBuf {
    directories::ProjectDirs::from("com", "partfinder", "partfinder")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default().join("data"))
}

/// Get the configuration file path
fn get_config_path() -> PathBuf {
    directories::ProjectDirs::from("com", "partfinder", "partfinder")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default().join("config.toml"))
}

/// Environment-based configuration overrides
pub struct ConfigOverrides;

impl ConfigOverrides {
    /// Apply environment variable overrides to configuration
    pub fn apply(config: &mut AppConfig) {
        if let Ok(cache_dir) = std::env::var("PF_CACHE_DIR") {
            config.cache.directory = PathBuf::from(cache_dir);
        }

        if let Ok(endpoint) = std::env::var("PF_LLM_ENDPOINT") {
            config.llm.endpoint = endpoint;
        }

        if let Ok(model) = std::env::var("PF_LLM_MODEL") {
            config.llm.model = model;
        }

        if let Ok(timeout_str) = std::env::var("PF_LLM_TIMEOUT") {
            if let Ok(timeout) = timeout_str.parse::<u64>() {
                config.llm.request_timeout_seconds = timeout;
            }
        }

        if let Ok(output_dir) = std::env::var("PF_EXPORT_DIR") {
            config.export.output_directory = PathBuf::from(output_dir);
        }

        if let Ok(log_level) = std::env::var("PF_LOG_LEVEL") {
            config.logging.level = log_level;
        }
    }
}
