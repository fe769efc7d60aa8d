use chrono::Local;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::info;

use super::chunker::Chunker;
use super::embedder::Embedder;
use super::generation::ChatClient;
use super::index::{VectorIndex, DEFAULT_BATCH_SIZE};
use super::prompt::build_messages;
use super::retriever::Retriever;
use crate::error::Result;
use crate::settings::{validate_save_name, Settings, SettingsStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Chunking,
    Embedding,
    Retrieving,
    Generating,
    Saving,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Stage::Chunking => "Splitting the data in chunks...",
            Stage::Embedding => "Embedding the chunks...",
            Stage::Retrieving => "Querying the embedding...",
            Stage::Generating => "Calling GPT...",
            Stage::Saving => "Saving settings...",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryOutcome {
    pub summary: String,
    pub total_tokens: u64,
    pub total_cost: f64,
    pub chunk_count: usize,
}

type ProgressFn = Box<dyn Fn(Stage) + Send + Sync>;

/// Runs chunk → embed → retrieve → generate, then stores the run's settings.
pub struct Summarizer {
    embedder: Arc<dyn Embedder>,
    chat: Arc<dyn ChatClient>,
    store: Arc<dyn SettingsStore>,
    batch_size: usize,
    progress: Option<ProgressFn>,
}

impl Summarizer {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        chat: Arc<dyn ChatClient>,
        store: Arc<dyn SettingsStore>,
    ) -> Self {
        Self {
            embedder,
            chat,
            store,
            batch_size: DEFAULT_BATCH_SIZE,
            progress: None,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_progress<F>(mut self, progress: F) -> Self
    where
        F: Fn(Stage) + Send + Sync + 'static,
    {
        self.progress = Some(Box::new(progress));
        self
    }

    fn report(&self, stage: Stage) {
        info!("{} - {}", Local::now().format("%H:%M:%S"), stage);
        if let Some(progress) = &self.progress {
            progress(stage);
        }
    }

    pub async fn run(&self, save_name: &str, settings: &Settings) -> Result<SummaryOutcome> {
        validate_save_name(save_name)?;
        settings.validate()?;
        let params = settings.generation_params()?;

        self.report(Stage::Chunking);
        let chunker = Chunker::new(settings.data_chunk_size, settings.data_chunk_overlap)?;
        let chunks = chunker.split(&settings.text_data)?;
        let chunk_count = chunks.len();

        self.report(Stage::Embedding);
        let index = VectorIndex::build(chunks, self.embedder.as_ref(), self.batch_size).await?;

        self.report(Stage::Retrieving);
        let retriever = Retriever::new(Arc::clone(&self.embedder));
        let summary_data = retriever
            .retrieve_text(&index, &settings.embedding_query, settings.number_of_docs)
            .await?;

        self.report(Stage::Generating);
        let messages = build_messages(
            &settings.system_role_prompt,
            &settings.user_prompt,
            &summary_data,
        )?;
        let completion = self.chat.complete(&messages, &params).await?;
        info!(
            "Calling GPT complete: {} tokens, ${:.5}",
            completion.usage.total_tokens, completion.usage.total_cost
        );

        self.report(Stage::Saving);
        self.store.save(save_name, settings).await?;

        Ok(SummaryOutcome {
            summary: completion.text,
            total_tokens: completion.usage.total_tokens,
            total_cost: completion.usage.total_cost,
            chunk_count,
        })
    }
}
