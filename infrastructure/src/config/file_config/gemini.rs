//! Gemini configuration from TOML (`[gemini]` section)

use crate::gemini::{DEFAULT_GEMINI_MODEL, GEMINI_BASE_URL};
use naomi_domain::{CredentialPool, DomainError};
use serde::{Deserialize, Serialize};

/// Raw Gemini configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeminiConfig {
    /// Model identifier
    pub model: String,
    /// API root, without the `models/...` suffix
    pub base_url: String,
    /// Environment variables holding API keys, in rotation order
    pub api_key_envs: Vec<String>,
    /// Literal API keys, appended after the environment keys
    pub api_keys: Vec<String>,
}

impl Default for FileGeminiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
            api_key_envs: vec!["GOOGLE_API_KEY".to_string()],
            api_keys: Vec::new(),
        }
    }
}

impl FileGeminiConfig {
    /// Keys in rotation order: environment variables first, then literals.
    pub fn collect_keys(&self, env: impl Fn(&str) -> Option<String>) -> Vec<String> {
        self.api_key_envs
            .iter()
            .filter_map(|name| env(name))
            .chain(self.api_keys.iter().cloned())
            .collect()
    }

    pub fn credential_pool(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<CredentialPool, DomainError> {
        CredentialPool::new(self.collect_keys(env))
    }
}
