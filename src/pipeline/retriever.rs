use std::sync::Arc;

use super::embedder::Embedder;
use super::index::{SearchResult, VectorIndex};
use crate::error::{RagsumError, Result};

/// Retrieved chunks are joined with three line breaks.
pub const RETRIEVAL_SEPARATOR: &str = "\n\n\n";
pub const MAX_DOCS: usize = 10;

pub struct Retriever {
    embedder: Arc<dyn Embedder>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    /// Top `k` chunks for `query`, most similar first.
    pub async fn search(
        &self,
        index: &VectorIndex,
        query: &str,
        k: usize,
    ) -> Result<Vec<SearchResult>> {
        if !(1..=MAX_DOCS).contains(&k) {
            return Err(RagsumError::InvalidInput(format!(
                "number of docs must be between 1 and {}, got {}",
                MAX_DOCS, k
            )));
        }

        if index.is_empty() {
            return Err(RagsumError::NoDocs);
        }

        let query_vector = self.embedder.embed(query).await?;
        let results = index.search(&query_vector, k);

        if results.is_empty() {
            return Err(RagsumError::NoDocs);
        }

        Ok(results)
    }

    /// Like `search`, but returns the chunk texts joined for prompting.
    pub async fn retrieve_text(
        &self,
        index: &VectorIndex,
        query: &str,
        k: usize,
    ) -> Result<String> {
        let results = self.search(index, query, k).await?;
        Ok(join_results(&results))
    }
}

pub fn join_results(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| r.chunk.content.as_str())
        .collect::<Vec<_>>()
        .join(RETRIEVAL_SEPARATOR)
}
