mod openai;

pub use openai::OpenAiEmbedder;

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::error::{RagsumError, Result};

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
    fn model(&self) -> &str;
}

#[derive(Debug, Clone)]
pub struct EmbedderConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl EmbedderConfig {
    pub fn from_app(config: &AppConfig, api_key: &str) -> Self {
        Self {
            endpoint: config.api_base.clone(),
            model: config.embedding_model.clone(),
            api_key: api_key.to_string(),
            timeout_secs: config.request_timeout_secs,
        }
    }
}

pub fn create_embedder(config: &EmbedderConfig) -> Result<Box<dyn Embedder>> {
    if config.api_key.trim().is_empty() {
        return Err(RagsumError::Unauthorized);
    }
    Ok(Box::new(OpenAiEmbedder::new(
        &config.endpoint,
        &config.model,
        &config.api_key,
        config.timeout_secs,
    )?))
}
