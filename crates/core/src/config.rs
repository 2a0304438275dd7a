//! Configuration management for the concierge pipeline.
//!
//! Configuration is merged from three layers, later layers winning:
//! - Built-in defaults (the hotel domain registry and pipeline knobs)
//! - A YAML config file (`concierge.yaml` or `CONCIERGE_CONFIG`)
//! - Environment variables and CLI overrides

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConciergeError, ConciergeResult};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Pipeline tuning knobs
    pub pipeline: PipelineSettings,

    /// Completion and embedding provider settings
    pub provider: ProviderSettings,

    /// The domain registry: every routable domain with its topical scope
    pub domains: Vec<DomainProfile>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Tuning knobs for chunking and retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSettings {
    /// Maximum chunk length in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared between consecutive chunks
    #[serde(default = "default_overlap")]
    pub overlap: usize,

    /// Number of chunks retrieved per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Per-call timeout for provider requests, in seconds
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,

    /// Optional minimum similarity score for retrieved chunks.
    /// Off by default: every query returns up to `top_k` chunks
    /// regardless of how weak the best match is.
    #[serde(default)]
    pub min_score: Option<f32>,
}

fn default_chunk_size() -> usize {
    500
}

fn default_overlap() -> usize {
    100
}

fn default_top_k() -> usize {
    4
}

fn default_provider_timeout_secs() -> u64 {
    30
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
            top_k: default_top_k(),
            provider_timeout_secs: default_provider_timeout_secs(),
            min_score: None,
        }
    }
}

/// Provider endpoints and model identifiers.
///
/// The embedding model and dimension must stay fixed between index build
/// and query time; mixing dimensions is a configuration error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Base URL of the completion/embedding API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Completion model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Embedding provider name ("ollama" or "trigram")
    #[serde(default = "default_embedding_provider")]
    pub embedding_provider: String,

    /// Embedding model identifier
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Embedding vector dimension
    #[serde(default = "default_embedding_dimensions")]
    pub embedding_dimensions: usize,
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3.2".to_string()
}

fn default_embedding_provider() -> String {
    "ollama".to_string()
}

fn default_embedding_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_embedding_dimensions() -> usize {
    768
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            embedding_provider: default_embedding_provider(),
            embedding_model: default_embedding_model(),
            embedding_dimensions: default_embedding_dimensions(),
        }
    }
}

/// One routable domain: its name, the topical scope shown to the router,
/// and the specialty phrase used in the answer prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DomainProfile {
    pub name: String,

    /// Topical scope, phrased to complete "For questions about {scope}."
    pub scope: String,

    /// Specialty phrase, phrased to complete "specializing in {specialty}."
    pub specialty: String,
}

impl DomainProfile {
    pub fn new(
        name: impl Into<String>,
        scope: impl Into<String>,
        specialty: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            scope: scope.into(),
            specialty: specialty.into(),
        }
    }
}

/// The default hotel concierge registry.
pub fn default_domains() -> Vec<DomainProfile> {
    vec![
        DomainProfile::new(
            "dining",
            "restaurants, menus, and dining hours",
            "dining",
        ),
        DomainProfile::new(
            "rooms",
            "room types, amenities, and hotel policies like check-in/out",
            "rooms and hotel policies",
        ),
        DomainProfile::new(
            "wellness",
            "the spa, gym, pool, and yoga classes",
            "wellness and fitness",
        ),
    ]
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    pipeline: Option<PipelineSettings>,
    provider: Option<ProviderSettings>,
    domains: Option<Vec<DomainProfile>>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            pipeline: PipelineSettings::default(),
            provider: ProviderSettings::default(),
            domains: default_domains(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `CONCIERGE_CONFIG`: path to a YAML config file
    /// - `CONCIERGE_ENDPOINT`: provider base URL
    /// - `CONCIERGE_MODEL`: completion model identifier
    /// - `RUST_LOG`: log level
    /// - `NO_COLOR`: disable colored output
    pub fn load() -> ConciergeResult<Self> {
        let mut config = Self::default();

        if let Ok(config_file) = std::env::var("CONCIERGE_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("concierge.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
            tracing::debug!("Merged configuration from {:?}", config_path);
        }

        // Environment variables override the YAML file
        if let Ok(endpoint) = std::env::var("CONCIERGE_ENDPOINT") {
            config.provider.endpoint = endpoint;
        }

        if let Ok(model) = std::env::var("CONCIERGE_MODEL") {
            config.provider.model = model;
        }

        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> ConciergeResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ConciergeError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            ConciergeError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(pipeline) = config_file.pipeline {
            result.pipeline = pipeline;
        }

        if let Some(provider) = config_file.provider {
            result.provider = provider;
        }

        if let Some(domains) = config_file.domains {
            result.domains = domains;
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides, giving precedence to flags over everything else.
    pub fn with_overrides(
        mut self,
        config_file: Option<PathBuf>,
        endpoint: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(endpoint) = endpoint {
            self.provider.endpoint = endpoint;
        }

        if let Some(model) = model {
            self.provider.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate pipeline and registry invariants.
    pub fn validate(&self) -> ConciergeResult<()> {
        if self.pipeline.chunk_size == 0 {
            return Err(ConciergeError::Config(
                "chunk_size must be a positive integer".to_string(),
            ));
        }

        if self.pipeline.overlap >= self.pipeline.chunk_size {
            return Err(ConciergeError::Config(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                self.pipeline.overlap, self.pipeline.chunk_size
            )));
        }

        if self.pipeline.top_k == 0 {
            return Err(ConciergeError::Config(
                "top_k must be a positive integer".to_string(),
            ));
        }

        if self.domains.is_empty() {
            return Err(ConciergeError::Config(
                "at least one domain must be registered".to_string(),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for domain in &self.domains {
            if domain.name == "default" {
                return Err(ConciergeError::Config(
                    "'default' is reserved for the fallback path and cannot name a domain"
                        .to_string(),
                ));
            }
            if !seen.insert(domain.name.as_str()) {
                return Err(ConciergeError::Config(format!(
                    "duplicate domain name '{}'",
                    domain.name
                )));
            }
        }

        Ok(())
    }

    /// Look up a domain profile by name.
    pub fn domain(&self, name: &str) -> Option<&DomainProfile> {
        self.domains.iter().find(|d| d.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.pipeline.chunk_size, 500);
        assert_eq!(config.pipeline.overlap, 100);
        assert_eq!(config.pipeline.top_k, 4);
        assert_eq!(config.pipeline.provider_timeout_secs, 30);
        assert!(config.pipeline.min_score.is_none());
        assert_eq!(config.domains.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_domain_lookup() {
        let config = AppConfig::default();
        assert!(config.domain("rooms").is_some());
        assert!(config.domain("casino").is_none());
    }

    #[test]
    fn test_validate_rejects_overlap_ge_chunk_size() {
        let mut config = AppConfig::default();
        config.pipeline.overlap = config.pipeline.chunk_size;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_top_k() {
        let mut config = AppConfig::default();
        config.pipeline.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_reserved_domain_name() {
        let mut config = AppConfig::default();
        config.domains.push(DomainProfile::new("default", "anything", "anything"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_domain() {
        let mut config = AppConfig::default();
        config
            .domains
            .push(DomainProfile::new("rooms", "again", "again"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_yaml() {
        let yaml = r#"
pipeline:
  chunk_size: 300
  overlap: 50
  top_k: 2
provider:
  endpoint: "http://127.0.0.1:9999"
  model: "llama3"
  embedding_provider: "trigram"
  embedding_model: "trigram-v1"
  embedding_dimensions: 384
domains:
  - name: dining
    scope: "restaurants and menus"
    specialty: "dining"
logging:
  level: debug
  color: false
"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let merged = AppConfig::default()
            .merge_yaml(&file.path().to_path_buf())
            .unwrap();

        assert_eq!(merged.pipeline.chunk_size, 300);
        assert_eq!(merged.pipeline.top_k, 2);
        assert_eq!(merged.provider.endpoint, "http://127.0.0.1:9999");
        assert_eq!(merged.provider.embedding_provider, "trigram");
        assert_eq!(merged.domains.len(), 1);
        assert_eq!(merged.log_level, Some("debug".to_string()));
        assert!(merged.no_color);
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default().with_overrides(
            None,
            Some("http://localhost:8080".to_string()),
            Some("llama3".to_string()),
            None,
            true,
            false,
        );

        assert_eq!(config.provider.endpoint, "http://localhost:8080");
        assert_eq!(config.provider.model, "llama3");
        assert!(config.verbose);
        assert_eq!(config.log_level, Some("debug".to_string()));
    }
}
