//! Retrieval-augmented summarization of pasted text.
//!
//! Text is split into overlapping chunks, embedded, searched with a query,
//! and the best matches are summarized by a chat model. The settings of the
//! last run are kept per save-name.

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod settings;

pub use config::AppConfig;
pub use error::{RagsumError, Result};
pub use pipeline::{
    ChatClient, ChatModel, Chunker, Embedder, Retriever, Summarizer, SummaryOutcome, Usage,
    VectorIndex,
};
pub use settings::{JsonSettingsStore, MemorySettingsStore, Settings, SettingsStore};
