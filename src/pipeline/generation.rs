use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::pricing::ChatModel;
use super::prompt::ChatMessage;
use crate::error::{RagsumError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub model: ChatModel,
    pub temperature: f32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
    pub max_tokens: u32,
}

/// Token and cost totals for one generation call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub usage: Usage,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<Completion>;
}

pub struct OpenAiChatClient {
    endpoint: String,
    api_key: String,
    client: Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    presence_penalty: f32,
    frequency_penalty: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<ResponseUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ResponseUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
    #[serde(default)]
    total_tokens: u64,
}

impl OpenAiChatClient {
    pub fn new(endpoint: &str, api_key: &str, timeout_secs: u64) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(RagsumError::Unauthorized);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }
}

#[async_trait]
impl ChatClient for OpenAiChatClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<Completion> {
        let url = format!("{}/v1/chat/completions", self.endpoint);
        debug!("Chat completion with {} via {}", params.model, url);

        let request = ChatRequest {
            model: params.model.as_str(),
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            presence_penalty: params.presence_penalty,
            frequency_penalty: params.frequency_penalty,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 401 {
            return Err(RagsumError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RagsumError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| RagsumError::Parse(format!("chat completion response: {}", e)))?;

        let text = chat
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| RagsumError::Parse("missing choices[0]".to_string()))?
            .message
            .content
            .unwrap_or_default();

        let usage = match chat.usage {
            Some(u) => {
                let total_tokens = if u.total_tokens > 0 {
                    u.total_tokens
                } else {
                    u.prompt_tokens + u.completion_tokens
                };
                Usage {
                    prompt_tokens: u.prompt_tokens,
                    completion_tokens: u.completion_tokens,
                    total_tokens,
                    total_cost: params.model.cost(u.prompt_tokens, u.completion_tokens),
                }
            }
            None => Usage::default(),
        };

        Ok(Completion { text, usage })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn params() -> GenerationParams {
        GenerationParams {
            model: ChatModel::Gpt4,
            temperature: 0.5,
            presence_penalty: 0.25,
            frequency_penalty: -0.5,
            max_tokens: 200,
        }
    }

    fn messages() -> Vec<ChatMessage> {
        vec![
            ChatMessage::system("You summarize."),
            ChatMessage::user("Summarize: hello"),
        ]
    }

    #[tokio::test]
    async fn test_complete_sends_all_knobs_and_reads_usage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_json(json!({
                "model": "gpt-4",
                "messages": [
                    {"role": "system", "content": "You summarize."},
                    {"role": "user", "content": "Summarize: hello"}
                ],
                "temperature": 0.5,
                "max_tokens": 200,
                "presence_penalty": 0.25,
                "frequency_penalty": -0.5
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-1",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "A greeting."},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 1000, "completion_tokens": 500, "total_tokens": 1500}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiChatClient::new(&server.uri(), "sk-test", 5).unwrap();
        let completion = client.complete(&messages(), &params()).await.unwrap();

        assert_eq!(completion.text, "A greeting.");
        assert_eq!(completion.usage.total_tokens, 1500);
        assert!((completion.usage.total_cost - 0.06).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_missing_usage_counts_as_zero() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "ok"}}]
            })))
            .mount(&server)
            .await;

        let client = OpenAiChatClient::new(&server.uri(), "sk-test", 5).unwrap();
        let completion = client.complete(&messages(), &params()).await.unwrap();

        assert_eq!(completion.text, "ok");
        assert_eq!(completion.usage, Usage::default());
    }

    #[tokio::test]
    async fn test_no_choices_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = OpenAiChatClient::new(&server.uri(), "sk-test", 5).unwrap();
        let err = client.complete(&messages(), &params()).await.unwrap_err();
        assert!(matches!(err, RagsumError::Parse(_)));
    }

    #[tokio::test]
    async fn test_provider_error_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(429).set_body_string("{\"error\":\"rate limited\"}"),
            )
            .mount(&server)
            .await;

        let client = OpenAiChatClient::new(&server.uri(), "sk-test", 5).unwrap();
        let err = client.complete(&messages(), &params()).await.unwrap_err();
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("rate limited"));
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(
            OpenAiChatClient::new("http://localhost", "  ", 5),
            Err(RagsumError::Unauthorized)
        ));
    }
}
