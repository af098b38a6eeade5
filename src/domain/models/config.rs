//! Application configuration, one section per pipeline stage

use serde::{Deserialize, Serialize};

use super::chunking::ChunkingConfig;
use super::endpoint::EndpointSpec;
use crate::infrastructure::logging::LogConfig;

/// Main configuration structure for ragline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LogConfig,

    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Embedding service configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Reranking service configuration
    #[serde(default)]
    pub reranker: RerankerConfig,

    /// Generation service configuration
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Which embedding backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProviderKind {
    /// Cohere-compatible HTTP embedding service
    Cohere,
    /// Deterministic in-process lexical hashing (offline runs)
    Lexical,
}

/// Embedding service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EmbeddingConfig {
    /// Which embedding backend to use
    #[serde(default = "default_embedding_provider")]
    pub provider: EmbeddingProviderKind,

    /// API key. Falls back to `CO_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Embedding service root URL
    #[serde(default = "default_cohere_base_url")]
    pub base_url: String,

    /// Embedding model name
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Expected vector dimension
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Texts per request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_embedding_provider() -> EmbeddingProviderKind {
    EmbeddingProviderKind::Cohere
}

fn default_cohere_base_url() -> String {
    "https://api.cohere.com".to_string()
}

fn default_embedding_model() -> String {
    "embed-multilingual-v3.0".to_string()
}

const fn default_dimension() -> usize {
    1024
}

const fn default_batch_size() -> usize {
    50
}

const fn default_timeout_secs() -> u64 {
    60
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            api_key: None,
            base_url: default_cohere_base_url(),
            model: default_embedding_model(),
            dimension: default_dimension(),
            batch_size: default_batch_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetrievalConfig {
    /// Nearest chunks passed to generation when reranking is off
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Nearest chunks handed to the reranker as candidates
    #[serde(default = "default_rerank_candidates")]
    pub rerank_candidates: usize,

    /// Candidates kept after reranking
    #[serde(default = "default_rerank_top_n")]
    pub rerank_top_n: usize,
}

const fn default_top_k() -> usize {
    3
}

const fn default_rerank_candidates() -> usize {
    10
}

const fn default_rerank_top_n() -> usize {
    3
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            rerank_candidates: default_rerank_candidates(),
            rerank_top_n: default_rerank_top_n(),
        }
    }
}

/// Reranking service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RerankerConfig {
    /// Whether retrieval results go through the reranker
    #[serde(default)]
    pub enabled: bool,

    /// API key. Falls back to `CO_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Rerank model served by the endpoint
    #[serde(default = "default_rerank_model")]
    pub model: String,

    /// Control plane that provisions endpoints. When unset, `endpoint_url`
    /// is treated as a pre-existing endpoint.
    #[serde(default)]
    pub control_plane_url: Option<String>,

    /// Fixed endpoint URL used when no control plane is configured
    #[serde(default = "default_cohere_base_url")]
    pub endpoint_url: String,

    /// Name of the endpoint to ensure
    #[serde(default = "default_endpoint_name")]
    pub endpoint_name: String,

    /// Hardware class requested for a new endpoint
    #[serde(default = "default_instance_type")]
    pub instance_type: String,

    /// How often to poll a creating endpoint
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// How long to wait for an endpoint to become live
    #[serde(default = "default_max_wait_secs")]
    pub max_wait_secs: u64,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_rerank_model() -> String {
    "rerank-multilingual-v3.0".to_string()
}

fn default_endpoint_name() -> String {
    "ragline-rerank".to_string()
}

fn default_instance_type() -> String {
    "ml.g5.xlarge".to_string()
}

const fn default_poll_interval_ms() -> u64 {
    5_000
}

const fn default_max_wait_secs() -> u64 {
    900
}

impl RerankerConfig {
    /// The endpoint this configuration asks for
    pub fn endpoint_spec(&self) -> EndpointSpec {
        EndpointSpec {
            name: self.endpoint_name.clone(),
            model: self.model.clone(),
            instance_type: self.instance_type.clone(),
        }
    }
}

impl Default for RerankerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            model: default_rerank_model(),
            control_plane_url: None,
            endpoint_url: default_cohere_base_url(),
            endpoint_name: default_endpoint_name(),
            instance_type: default_instance_type(),
            poll_interval_ms: default_poll_interval_ms(),
            max_wait_secs: default_max_wait_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Generation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GenerationConfig {
    /// API key. Falls back to `ANTHROPIC_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Generation service root URL
    #[serde(default = "default_anthropic_base_url")]
    pub base_url: String,

    /// Generation model identifier
    #[serde(default = "default_generation_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus sampling threshold
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Maximum tokens per reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-request timeout
    #[serde(default = "default_generation_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_anthropic_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_generation_model() -> String {
    "claude-3-5-sonnet-20241022".to_string()
}

const fn default_temperature() -> f32 {
    0.1
}

const fn default_top_p() -> f32 {
    0.9
}

const fn default_max_tokens() -> u32 {
    1024
}

const fn default_generation_timeout_secs() -> u64 {
    300
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_anthropic_base_url(),
            model: default_generation_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_generation_timeout_secs(),
        }
    }
}
