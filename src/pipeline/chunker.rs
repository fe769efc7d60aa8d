use tracing::warn;

use crate::error::{RagsumError, Result};

pub const DEFAULT_SEPARATOR: &str = "\n";

/// A piece of the source text used as a retrieval unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub position: usize,
    pub content: String,
}

/// Splits text on a separator and packs the pieces into overlapping windows.
///
/// Sizes are measured in characters, not bytes. A chunk holds at most
/// `max_chars` characters (separators included) unless a single piece is
/// already longer than that, in which case it is emitted on its own.
pub struct Chunker {
    max_chars: usize,
    overlap_chars: usize,
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            max_chars: 2500,
            overlap_chars: 200,
        }
    }
}

impl Chunker {
    pub fn new(max_chars: usize, overlap_chars: usize) -> Result<Self> {
        if max_chars == 0 {
            return Err(RagsumError::InvalidInput(
                "chunk size must be at least 1".to_string(),
            ));
        }
        if overlap_chars > max_chars {
            return Err(RagsumError::InvalidInput(format!(
                "chunk overlap ({}) is larger than chunk size ({})",
                overlap_chars, max_chars
            )));
        }

        Ok(Self {
            max_chars,
            overlap_chars,
        })
    }

    /// Split `text` into chunks, failing with `NoChunks` when nothing is left.
    pub fn split(&self, text: &str) -> Result<Vec<Chunk>> {
        let chunks: Vec<Chunk> = self
            .split_text(text)
            .into_iter()
            .enumerate()
            .map(|(position, content)| Chunk { position, content })
            .collect();

        if chunks.is_empty() {
            return Err(RagsumError::NoChunks);
        }

        Ok(chunks)
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        let pieces: Vec<&str> = text
            .split(DEFAULT_SEPARATOR)
            .filter(|p| !p.is_empty())
            .collect();

        self.merge_pieces(&pieces)
    }

    fn merge_pieces(&self, pieces: &[&str]) -> Vec<String> {
        let sep_len = char_len(DEFAULT_SEPARATOR);
        let mut chunks = Vec::new();
        let mut window: Vec<&str> = Vec::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);
            let joiner = joiner_for(&window, sep_len);

            if total + len + joiner > self.max_chars {
                if total > self.max_chars {
                    warn!(
                        "Created a chunk of size {}, which is longer than the specified {}",
                        total, self.max_chars
                    );
                }

                if !window.is_empty() {
                    if let Some(chunk) = self.join(&window) {
                        chunks.push(chunk);
                    }

                    // Drop leading pieces until only the overlap remains and the next piece fits
                    while total > self.overlap_chars
                        || (total > 0
                            && total + len + joiner_for(&window, sep_len) > self.max_chars)
                    {
                        let first = window.remove(0);
                        total -= char_len(first) + joiner_for(&window, sep_len);
                    }
                }
            }

            let joiner = joiner_for(&window, sep_len);
            window.push(piece);
            total += len + joiner;
        }

        if let Some(chunk) = self.join(&window) {
            chunks.push(chunk);
        }

        chunks
    }

    fn join(&self, window: &[&str]) -> Option<String> {
        let joined = window.join(DEFAULT_SEPARATOR);
        let trimmed = joined.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Separator cost of appending one more piece to `window`.
fn joiner_for(window: &[&str], sep_len: usize) -> usize {
    if window.is_empty() {
        0
    } else {
        sep_len
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
