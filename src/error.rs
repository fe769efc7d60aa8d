use thiserror::Error;

pub type Result<T> = std::result::Result<T, RagsumError>;

#[derive(Debug, Error)]
pub enum RagsumError {
    #[error("Can't split the data in chunks.")]
    NoChunks,

    #[error("Can't find any section in the embeddings.")]
    NoDocs,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Prompt template error: {0}")]
    Template(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Invalid API key. Set OPENAI_API_KEY or pass --api-key")]
    Unauthorized,

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RagsumError {
    /// Errors the user can fix by changing the form values.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::NoChunks | Self::NoDocs | Self::InvalidInput(_) | Self::Template(_)
        )
    }
}
