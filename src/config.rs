use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::TaskDeskResult;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub gmail: GmailConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,
    #[serde(default)]
    pub qdrant: QdrantConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_api_base")]
    pub api_base: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Optional API key stored in config.toml (falls back to env var GROQ_API_KEY).
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: default_llm_api_base(),
            model: default_llm_model(),
            temperature: default_temperature(),
            api_key: None,
        }
    }
}

fn default_llm_api_base() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_llm_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_temperature() -> f64 {
    0.2
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GmailConfig {
    /// Persistent Chrome profile that already holds a logged-in Gmail session.
    /// No embedded default: absence makes the Gmail service unavailable.
    #[serde(default)]
    pub profile_dir: Option<PathBuf>,
    /// Explicit Chrome binary; autodetected when absent.
    #[serde(default)]
    pub chrome_executable: Option<PathBuf>,
    #[serde(default)]
    pub headless: bool,
    #[serde(default = "default_mail_url")]
    pub mail_url: String,
    /// Directory for diagnostic page snapshots.
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,
}

impl Default for GmailConfig {
    fn default() -> Self {
        Self {
            profile_dir: None,
            chrome_executable: None,
            headless: false,
            mail_url: default_mail_url(),
            snapshot_dir: default_snapshot_dir(),
        }
    }
}

fn default_mail_url() -> String {
    "https://mail.google.com".to_string()
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("screens")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_api_base")]
    pub api_base: String,
    /// Falls back to env var SERPER_API_KEY.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_base: default_search_api_base(),
            api_key: None,
        }
    }
}

fn default_search_api_base() -> String {
    "https://google.serper.dev".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    /// OpenAI-compatible embeddings endpoint base.
    #[serde(default = "default_embeddings_api_base")]
    pub api_base: String,
    #[serde(default = "default_embeddings_model")]
    pub model: String,
    /// Falls back to env var EMBEDDINGS_API_KEY.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            api_base: default_embeddings_api_base(),
            model: default_embeddings_model(),
            api_key: None,
        }
    }
}

fn default_embeddings_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_embeddings_model() -> String {
    "text-embedding-3-small".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdrantConfig {
    #[serde(default = "default_qdrant_url")]
    pub url: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Falls back to env var QDRANT_API_KEY.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: default_qdrant_url(),
            collection: default_collection(),
            api_key: None,
        }
    }
}

fn default_qdrant_url() -> String {
    "http://localhost:6333".to_string()
}

fn default_collection() -> String {
    "my_documents".to_string()
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            let candidate = parent.join("config.toml");
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "config found next to executable");
                return Some(candidate);
            }
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        let candidate = cwd.join("config.toml");
        if candidate.exists() {
            tracing::debug!(path = %candidate.display(), "config found in working directory");
            return Some(candidate);
        }
    }

    None
}

/// Loads config.toml when present, otherwise starts from defaults, then lets
/// environment variables override secrets and deployment-specific paths.
pub fn load_config() -> TaskDeskResult<AppConfig> {
    let mut config = match resolve_config_path() {
        Some(path) => {
            let content = std::fs::read_to_string(&path)?;
            let config: AppConfig = toml::from_str(&content)?;
            tracing::info!(path = %path.display(), "config loaded");
            config
        }
        None => {
            tracing::info!("no config.toml found, using defaults");
            AppConfig::default()
        }
    };
    apply_env_overrides(&mut config);
    Ok(config)
}

fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(host) = std::env::var("TASKDESK_HOST") {
        config.server.host = host;
    }
    if let Ok(port) = std::env::var("TASKDESK_PORT") {
        match port.parse() {
            Ok(port) => config.server.port = port,
            Err(_) => tracing::warn!(value = %port, "ignoring unparsable TASKDESK_PORT"),
        }
    }
    if let Ok(key) = std::env::var("GROQ_API_KEY") {
        config.llm.api_key = Some(key);
    }
    if let Ok(key) = std::env::var("SERPER_API_KEY") {
        config.search.api_key = Some(key);
    }
    if let Ok(key) = std::env::var("EMBEDDINGS_API_KEY") {
        config.embeddings.api_key = Some(key);
    }
    if let Ok(key) = std::env::var("QDRANT_API_KEY") {
        config.qdrant.api_key = Some(key);
    }
    if let Ok(url) = std::env::var("QDRANT_URL") {
        config.qdrant.url = url;
    }
    if let Ok(dir) = std::env::var("GMAIL_PROFILE_DIR") {
        config.gmail.profile_dir = Some(PathBuf::from(dir));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: AppConfig = toml::from_str("").expect("empty config should parse");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.gmail.mail_url, "https://mail.google.com");
        assert!(config.gmail.profile_dir.is_none());
        assert_eq!(config.qdrant.collection, "my_documents");
    }

    #[test]
    fn partial_toml_overrides_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9000

            [gmail]
            profile_dir = "/tmp/profile"
            headless = true
            "#,
        )
        .expect("partial config should parse");
        assert_eq!(config.server.port, 9000);
        assert!(config.gmail.headless);
        assert_eq!(
            config.gmail.profile_dir.as_deref(),
            Some(std::path::Path::new("/tmp/profile"))
        );
        // Untouched sections keep defaults.
        assert_eq!(config.llm.model, "llama-3.3-70b-versatile");
    }
}
