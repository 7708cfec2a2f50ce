use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::config::ApiCredentials;
use crate::error::InsightError;
use crate::upstream::assert_ok_response;

/// Named JSON schema the model output must satisfy.
#[derive(Debug, Clone)]
pub struct OutputSchema {
    pub name: &'static str,
    pub schema: Value,
}

/// A language model that answers a prompt with schema-constrained JSON text.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, prompt: &str, schema: &OutputSchema) -> Result<String, InsightError>;
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Option<Vec<ChatChoice>>,
    error: Option<ChatError>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatError {
    message: Option<String>,
}

/// OpenAI-compatible `/v1/chat/completions` client.
#[derive(Clone, Debug)]
pub struct ChatCompletionClient {
    client: Client,
    credentials: ApiCredentials,
    model: String,
}

impl ChatCompletionClient {
    pub fn new(credentials: ApiCredentials, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            credentials,
            model: model.into(),
        }
    }
}

#[async_trait]
impl CompletionModel for ChatCompletionClient {
    async fn complete(&self, prompt: &str, schema: &OutputSchema) -> Result<String, InsightError> {
        let api_key = self
            .credentials
            .api_key
            .as_deref()
            .ok_or(InsightError::MissingApiKey)?;

        let response = self
            .client
            .post(self.credentials.endpoint("v1/chat/completions"))
            .bearer_auth(api_key)
            .json(&json!({
                "model": self.model,
                "messages": [
                    {"role": "user", "content": prompt}
                ],
                "response_format": {
                    "type": "json_schema",
                    "json_schema": {
                        "name": schema.name,
                        "strict": true,
                        "schema": schema.schema,
                    }
                }
            }))
            .send()
            .await?;

        let response = assert_ok_response(response).await?;
        let payload: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| InsightError::Schema(format!("unreadable completion envelope: {err}")))?;
        if let Some(message) = payload.error.and_then(|err| err.message) {
            return Err(InsightError::Schema(format!("completion returned an error: {message}")));
        }
        let content = payload
            .choices
            .and_then(|choices| choices.into_iter().next())
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(InsightError::EmptyContent)?;

        debug!(model = %self.model, schema = schema.name, bytes = content.len(), "completion received");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

    fn schema() -> OutputSchema {
        OutputSchema {
            name: "strategic_insight",
            schema: json!({"type": "object"}),
        }
    }

    fn client(server: &MockServer) -> ChatCompletionClient {
        ChatCompletionClient::new(
            ApiCredentials::new(server.uri(), Some("test-key".to_string())),
            "gemini-test",
        )
    }

    #[tokio::test]
    async fn sends_strict_schema_and_returns_content() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/v1/chat/completions"))
            .and(matchers::header("authorization", "Bearer test-key"))
            .and(matchers::body_partial_json(json!({
                "model": "gemini-test",
                "messages": [{"role": "user", "content": "hello"}],
                "response_format": {
                    "type": "json_schema",
                    "json_schema": {"name": "strategic_insight", "strict": true}
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "{\"title\": \"x\"}"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let content = client(&server).complete("hello", &schema()).await.unwrap();
        assert_eq!(content, "{\"title\": \"x\"}");
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {"message": "Rate limit exceeded"}
            })))
            .mount(&server)
            .await;

        let err = client(&server).complete("hello", &schema()).await.unwrap_err();
        match err {
            InsightError::Upstream(status) => {
                assert_eq!(status.status, 429);
                assert!(status.body.contains("Rate limit exceeded"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_choices_is_empty_content() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = client(&server).complete("hello", &schema()).await.unwrap_err();
        assert!(matches!(err, InsightError::EmptyContent));
        assert!(err.is_schema_violation());
    }
}
