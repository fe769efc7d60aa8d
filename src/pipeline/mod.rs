pub mod chunker;
pub mod embedder;
pub mod generation;
pub mod index;
pub mod pricing;
pub mod prompt;
pub mod retriever;
pub mod summarizer;

#[cfg(test)]
pub(crate) mod testing;

pub use chunker::{Chunk, Chunker};
pub use embedder::{create_embedder, Embedder, EmbedderConfig, OpenAiEmbedder};
pub use generation::{ChatClient, Completion, GenerationParams, OpenAiChatClient, Usage};
pub use index::{cosine_similarity, SearchResult, VectorIndex};
pub use pricing::ChatModel;
pub use prompt::{build_messages, render_template, ChatMessage, Role};
pub use retriever::{Retriever, MAX_DOCS, RETRIEVAL_SEPARATOR};
pub use summarizer::{Stage, Summarizer, SummaryOutcome};
