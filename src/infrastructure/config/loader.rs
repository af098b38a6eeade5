//! Configuration loading and validation

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::{Config, EmbeddingProviderKind};

/// Project-local configuration directory
pub const CONFIG_DIR: &str = ".ragline";

/// Prefix for environment overrides, e.g. `RAGLINE_RETRIEVAL__TOP_K=5`
pub const ENV_PREFIX: &str = "RAGLINE_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Unknown log level
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Chunk size or overlap out of range
    #[error("Invalid chunking configuration: {0}")]
    InvalidChunking(String),

    /// Embedding batch size of zero
    #[error("Invalid embedding batch_size: {0}. Must be at least 1")]
    InvalidBatchSize(usize),

    /// Embedding dimension of zero
    #[error("Invalid embedding dimension: {0}. Must be at least 1")]
    InvalidDimension(usize),

    /// Retrieval depth of zero
    #[error("Invalid top_k: {0}. Must be at least 1")]
    InvalidTopK(usize),

    #[error(
        "Invalid rerank window: rerank_top_n ({0}) must be at least 1 and no more than rerank_candidates ({1})"
    )]
    /// Rerank top-N larger than the candidate count
    InvalidRerankWindow(usize, usize),

    /// Temperature outside the accepted range
    #[error("Invalid temperature: {0}. Must be between 0.0 and 1.0")]
    InvalidTemperature(f32),

    /// Top-p outside (0, 1]
    #[error("Invalid top_p: {0}. Must be greater than 0.0 and at most 1.0")]
    InvalidTopP(f32),

    /// Max tokens of zero
    #[error("Invalid max_tokens: {0}. Must be at least 1")]
    InvalidMaxTokens(u32),

    /// A model name is blank
    #[error("{0} model name cannot be empty")]
    EmptyModel(&'static str),

    /// Any other validation failure
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. `.ragline/config.yaml`
    /// 3. `.ragline/local.yaml` (optional overrides)
    /// 4. `RAGLINE_*` environment variables, nested keys split on `__`
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(format!("{CONFIG_DIR}/config.yaml")))
            .merge(Yaml::file(format!("{CONFIG_DIR}/local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring environment overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        config
            .chunking
            .validate()
            .map_err(ConfigError::InvalidChunking)?;

        if config.embedding.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize(config.embedding.batch_size));
        }

        if config.embedding.dimension == 0 {
            return Err(ConfigError::InvalidDimension(config.embedding.dimension));
        }

        if config.embedding.provider == EmbeddingProviderKind::Cohere
            && config.embedding.model.trim().is_empty()
        {
            return Err(ConfigError::EmptyModel("Embedding"));
        }

        let retrieval = &config.retrieval;
        if retrieval.top_k == 0 {
            return Err(ConfigError::InvalidTopK(retrieval.top_k));
        }

        if retrieval.rerank_top_n == 0 || retrieval.rerank_top_n > retrieval.rerank_candidates {
            return Err(ConfigError::InvalidRerankWindow(
                retrieval.rerank_top_n,
                retrieval.rerank_candidates,
            ));
        }

        if config.reranker.enabled {
            if config.reranker.model.trim().is_empty() {
                return Err(ConfigError::EmptyModel("Rerank"));
            }
            if config.reranker.endpoint_name.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(
                    "reranker endpoint_name cannot be empty".to_string(),
                ));
            }
        }

        let generation = &config.generation;
        if generation.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel("Generation"));
        }

        if !(0.0..=1.0).contains(&generation.temperature) {
            return Err(ConfigError::InvalidTemperature(generation.temperature));
        }

        if generation.top_p <= 0.0 || generation.top_p > 1.0 {
            return Err(ConfigError::InvalidTopP(generation.top_p));
        }

        if generation.max_tokens == 0 {
            return Err(ConfigError::InvalidMaxTokens(generation.max_tokens));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::logging::LogFormat;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.chunking.chunk_size, 512);
        assert_eq!(config.embedding.batch_size, 50);
        assert_eq!(config.retrieval.top_k, 3);
        assert!(!config.reranker.enabled);
        assert!((config.generation.temperature - 0.1).abs() < f32::EPSILON);
        assert!((config.generation.top_p - 0.9).abs() < f32::EPSILON);
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
logging:
  level: debug
  format: json
chunking:
  chunk_size: 256
  chunk_overlap: 20
embedding:
  provider: lexical
  dimension: 64
retrieval:
  top_k: 2
generation:
  temperature: 0.0
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.chunking.chunk_size, 256);
        assert_eq!(config.chunking.chunk_overlap, 20);
        assert_eq!(config.chunking.separators.len(), 5);
        assert_eq!(config.embedding.provider, EmbeddingProviderKind::Lexical);
        assert_eq!(config.embedding.dimension, 64);
        assert_eq!(config.embedding.batch_size, 50);
        assert_eq!(config.retrieval.top_k, 2);
        assert_eq!(config.retrieval.rerank_candidates, 10);

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "retrieval:\n  top_k: 7\nreranker:\n  enabled: true\n  endpoint_name: my-rerank"
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.retrieval.top_k, 7);
        assert!(config.reranker.enabled);
        assert_eq!(config.reranker.endpoint_name, "my-rerank");
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = ConfigLoader::load_from_file("/nonexistent/ragline.yaml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file_rejects_invalid_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "embedding:\n  batch_size: 0").unwrap();

        let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("batch_size"));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "retrieval:\n  rerank_candidates: 4").unwrap();

        temp_env::with_vars(
            [
                ("RAGLINE_RETRIEVAL__RERANK_CANDIDATES", Some("12")),
                ("RAGLINE_GENERATION__MODEL", Some("claude-test")),
            ],
            || {
                let config = ConfigLoader::load_from_file(file.path()).unwrap();
                assert_eq!(config.retrieval.rerank_candidates, 12);
                assert_eq!(config.generation.model, "claude-test");
            },
        );
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config) {
            Err(ConfigError::InvalidLogLevel(level)) => assert_eq!(level, "invalid"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_chunking() {
        let mut config = Config::default();
        config.chunking.chunk_overlap = config.chunking.chunk_size;

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidChunking(_))
        ));
    }

    #[test]
    fn test_validate_zero_dimension() {
        let mut config = Config::default();
        config.embedding.dimension = 0;

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidDimension(0))
        ));
    }

    #[test]
    fn test_validate_zero_top_k() {
        let mut config = Config::default();
        config.retrieval.top_k = 0;

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTopK(0))
        ));
    }

    #[test]
    fn test_validate_rerank_window() {
        let mut config = Config::default();
        config.retrieval.rerank_candidates = 2;
        config.retrieval.rerank_top_n = 5;

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidRerankWindow(5, 2))
        ));
    }

    #[test]
    fn test_validate_sampling_ranges() {
        let mut config = Config::default();
        config.generation.temperature = 1.5;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTemperature(_))
        ));

        let mut config = Config::default();
        config.generation.top_p = 0.0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTopP(_))
        ));

        let mut config = Config::default();
        config.generation.max_tokens = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxTokens(0))
        ));
    }

    #[test]
    fn test_validate_empty_generation_model() {
        let mut config = Config::default();
        config.generation.model = "  ".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyModel("Generation"))
        ));
    }

    #[test]
    fn test_lexical_provider_ignores_model_name() {
        let mut config = Config::default();
        config.embedding.provider = EmbeddingProviderKind::Lexical;
        config.embedding.model = String::new();

        assert!(ConfigLoader::validate(&config).is_ok());
    }
}
