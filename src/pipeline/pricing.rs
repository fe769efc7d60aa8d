use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RagsumError;

/// The chat models the tool can call, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatModel {
    #[serde(rename = "gpt-4")]
    Gpt4,
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,
}

impl ChatModel {
    pub const ALL: [ChatModel; 2] = [ChatModel::Gpt4, ChatModel::Gpt35Turbo];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatModel::Gpt4 => "gpt-4",
            ChatModel::Gpt35Turbo => "gpt-3.5-turbo",
        }
    }

    /// Position in the model picker; persisted as `gpt_model_index`.
    pub fn index(&self) -> usize {
        match self {
            ChatModel::Gpt4 => 0,
            ChatModel::Gpt35Turbo => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// USD per 1K (prompt, completion) tokens.
    pub fn price_per_1k(&self) -> (f64, f64) {
        match self {
            ChatModel::Gpt4 => (0.03, 0.06),
            ChatModel::Gpt35Turbo => (0.0015, 0.002),
        }
    }

    pub fn cost(&self, prompt_tokens: u64, completion_tokens: u64) -> f64 {
        let (prompt, completion) = self.price_per_1k();
        prompt_tokens as f64 / 1000.0 * prompt + completion_tokens as f64 / 1000.0 * completion
    }
}

impl fmt::Display for ChatModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatModel {
    type Err = RagsumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                RagsumError::InvalidInput(format!(
                    "unknown model '{}' (expected gpt-4 or gpt-3.5-turbo)",
                    s
                ))
            })
    }
}
