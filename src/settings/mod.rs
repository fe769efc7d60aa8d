mod json;
mod memory;

pub use json::JsonSettingsStore;
pub use memory::MemorySettingsStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{RagsumError, Result};
use crate::pipeline::{ChatModel, GenerationParams, MAX_DOCS};

pub const DEFAULT_SAVE_NAME: &str = "summarize";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an assistant that writes clear, faithful summaries. \
Use only the information contained in the text you are given and keep the original terminology.";

pub const DEFAULT_USER_PROMPT: &str = "Summarize the following text:\n\n{summary_data}";

pub const MAX_TOKENS_LIMIT: u32 = 4000;
pub const MAX_CHUNK_SIZE: usize = 10_000;
pub const MAX_CHUNK_OVERLAP: usize = 2_000;
pub const MAX_TEXT_CHARS: usize = 20_000;
pub const MAX_PROMPT_CHARS: usize = 5_000;
pub const MAX_QUERY_CHARS: usize = 1_000;

/// Every knob of a summarization run, persisted wholesale per save-name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub gpt_model_index: usize,
    pub max_tokens: u32,
    pub temperature: f32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
    pub text_data: String,
    pub data_chunk_size: usize,
    pub data_chunk_overlap: usize,
    pub embedding_query: String,
    pub number_of_docs: usize,
    pub system_role_prompt: String,
    pub user_prompt: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gpt_model_index: ChatModel::Gpt35Turbo.index(),
            max_tokens: 500,
            temperature: 0.0,
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
            text_data: String::new(),
            data_chunk_size: 2500,
            data_chunk_overlap: 200,
            embedding_query: String::new(),
            number_of_docs: 2,
            system_role_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            user_prompt: DEFAULT_USER_PROMPT.to_string(),
        }
    }
}

impl Settings {
    pub fn model(&self) -> Result<ChatModel> {
        ChatModel::from_index(self.gpt_model_index).ok_or_else(|| {
            RagsumError::InvalidInput(format!("unknown model index {}", self.gpt_model_index))
        })
    }

    pub fn set_model(&mut self, model: ChatModel) {
        self.gpt_model_index = model.index();
    }

    pub fn generation_params(&self) -> Result<GenerationParams> {
        Ok(GenerationParams {
            model: self.model()?,
            temperature: self.temperature,
            presence_penalty: self.presence_penalty,
            frequency_penalty: self.frequency_penalty,
            max_tokens: self.max_tokens,
        })
    }

    /// Check every field against the ranges the form accepts.
    pub fn validate(&self) -> Result<()> {
        self.model()?;

        check_range("max tokens", self.max_tokens, 1, MAX_TOKENS_LIMIT)?;
        check_float("temperature", self.temperature, 0.0, 2.0)?;
        check_float("presence penalty", self.presence_penalty, -2.0, 2.0)?;
        check_float("frequency penalty", self.frequency_penalty, -2.0, 2.0)?;
        check_range("chunk size", self.data_chunk_size, 1, MAX_CHUNK_SIZE)?;
        check_range("chunk overlap", self.data_chunk_overlap, 1, MAX_CHUNK_OVERLAP)?;
        check_range("number of docs", self.number_of_docs, 1, MAX_DOCS)?;

        if self.data_chunk_overlap > self.data_chunk_size {
            return Err(RagsumError::InvalidInput(format!(
                "chunk overlap ({}) is larger than chunk size ({})",
                self.data_chunk_overlap, self.data_chunk_size
            )));
        }

        check_len("text", &self.text_data, MAX_TEXT_CHARS)?;
        check_len("embedding query", &self.embedding_query, MAX_QUERY_CHARS)?;
        check_len("system role prompt", &self.system_role_prompt, MAX_PROMPT_CHARS)?;
        check_len("user prompt", &self.user_prompt, MAX_PROMPT_CHARS)?;

        Ok(())
    }
}

fn check_range<T: PartialOrd + std::fmt::Display>(
    name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(RagsumError::InvalidInput(format!(
            "{} must be between {} and {}, got {}",
            name, min, max, value
        )));
    }
    Ok(())
}

fn check_float(name: &str, value: f32, min: f32, max: f32) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(RagsumError::InvalidInput(format!(
            "{} must be between {:.1} and {:.1}, got {}",
            name, min, max, value
        )));
    }
    Ok(())
}

fn check_len(name: &str, value: &str, max_chars: usize) -> Result<()> {
    let len = value.chars().count();
    if len > max_chars {
        return Err(RagsumError::InvalidInput(format!(
            "{} is {} characters long, the limit is {}",
            name, len, max_chars
        )));
    }
    Ok(())
}

/// Named snapshots of the last-used settings.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load(&self, name: &str) -> Result<Option<Settings>>;
    async fn save(&self, name: &str, settings: &Settings) -> Result<()>;
    async fn delete(&self, name: &str) -> Result<bool>;
    async fn list(&self) -> Result<Vec<String>>;

    /// The stored snapshot, or the first-run defaults.
    async fn load_or_default(&self, name: &str) -> Result<Settings> {
        Ok(self.load(name).await?.unwrap_or_default())
    }
}

/// Save-names become file names, so keep them to a safe alphabet.
pub fn validate_save_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(RagsumError::InvalidInput(format!(
            "invalid save name '{}': use letters, digits, '_' or '-'",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        settings.validate().unwrap();
        assert_eq!(settings.model().unwrap(), ChatModel::Gpt35Turbo);
        assert_eq!(settings.data_chunk_size, 2500);
        assert_eq!(settings.data_chunk_overlap, 200);
        assert_eq!(settings.number_of_docs, 2);
        assert!(settings.user_prompt.contains("{summary_data}"));
    }

    #[test]
    fn test_out_of_range_values() {
        let cases: Vec<Box<dyn Fn(&mut Settings)>> = vec![
            Box::new(|s: &mut Settings| s.gpt_model_index = 2),
            Box::new(|s: &mut Settings| s.max_tokens = 0),
            Box::new(|s: &mut Settings| s.max_tokens = 4001),
            Box::new(|s: &mut Settings| s.temperature = 2.1),
            Box::new(|s: &mut Settings| s.temperature = f32::NAN),
            Box::new(|s: &mut Settings| s.presence_penalty = -2.5),
            Box::new(|s: &mut Settings| s.frequency_penalty = 3.0),
            Box::new(|s: &mut Settings| s.data_chunk_size = 0),
            Box::new(|s: &mut Settings| s.data_chunk_size = 10_001),
            Box::new(|s: &mut Settings| s.data_chunk_overlap = 0),
            Box::new(|s: &mut Settings| s.number_of_docs = 0),
            Box::new(|s: &mut Settings| s.number_of_docs = 11),
            Box::new(|s: &mut Settings| s.text_data = "x".repeat(20_001)),
            Box::new(|s: &mut Settings| s.embedding_query = "q".repeat(1_001)),
            Box::new(|s: &mut Settings| s.user_prompt = "p".repeat(5_001)),
        ];

        for (i, mutate) in cases.iter().enumerate() {
            let mut settings = Settings::default();
            mutate(&mut settings);
            assert!(
                matches!(settings.validate(), Err(RagsumError::InvalidInput(_))),
                "case {} should be rejected",
                i
            );
        }
    }

    #[test]
    fn test_overlap_larger_than_size() {
        let settings = Settings {
            data_chunk_size: 100,
            data_chunk_overlap: 150,
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("larger than chunk size"));
    }

    #[test]
    fn test_generation_params() {
        let mut settings = Settings {
            temperature: 0.7,
            max_tokens: 42,
            ..Default::default()
        };
        settings.set_model(ChatModel::Gpt4);

        let params = settings.generation_params().unwrap();
        assert_eq!(params.model, ChatModel::Gpt4);
        assert_eq!(params.max_tokens, 42);
        assert_eq!(params.temperature, 0.7);
        assert_eq!(settings.gpt_model_index, 0);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"max_tokens": 900}"#).unwrap();
        assert_eq!(settings.max_tokens, 900);
        assert_eq!(settings.data_chunk_size, 2500);
    }

    #[test]
    fn test_save_names() {
        assert!(validate_save_name("summarize").is_ok());
        assert!(validate_save_name("meeting_notes-2").is_ok());
        assert!(validate_save_name("").is_err());
        assert!(validate_save_name("../etc/passwd").is_err());
        assert!(validate_save_name("a b").is_err());
    }
}
