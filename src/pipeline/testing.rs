//! Deterministic stand-ins for the remote services.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::embedder::Embedder;
use super::generation::{ChatClient, Completion, GenerationParams, Usage};
use super::prompt::ChatMessage;
use crate::error::Result;

/// Embeds text as keyword occurrence counts, one dimension per keyword.
pub struct KeywordEmbedder {
    keywords: Vec<String>,
    batch_calls: AtomicUsize,
}

impl KeywordEmbedder {
    pub fn new(keywords: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            batch_calls: AtomicUsize::new(0),
        }
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        self.keywords
            .iter()
            .map(|k| lower.matches(k.as_str()).count() as f32)
            .collect()
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.vectorize(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }

    fn model(&self) -> &str {
        "keyword"
    }
}

/// Replies with a fixed text and records every request it receives.
pub struct ScriptedChatClient {
    reply: String,
    usage: Usage,
    requests: Mutex<Vec<(Vec<ChatMessage>, GenerationParams)>>,
}

impl ScriptedChatClient {
    pub fn new(reply: &str, usage: Usage) -> Self {
        Self {
            reply: reply.to_string(),
            usage,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(Vec<ChatMessage>, GenerationParams)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for ScriptedChatClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<Completion> {
        self.requests
            .lock()
            .unwrap()
            .push((messages.to_vec(), params.clone()));
        Ok(Completion {
            text: self.reply.clone(),
            usage: self.usage,
        })
    }
}
