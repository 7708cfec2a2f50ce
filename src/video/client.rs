use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tokio::time::sleep;
use tracing::{debug, info};
use url::Url;

use crate::config::{ApiCredentials, PollBudget, VideoOptions};
use crate::error::GenerationError;
use crate::upstream::assert_ok_response;

/// A finished generation job.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedVideo {
    pub video_url: String,
    pub operation: String,
}

/// Runs one text-to-video job to completion. Implementations do not cache.
#[async_trait]
pub trait VideoGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        options: &VideoOptions,
    ) -> Result<GeneratedVideo, GenerationError>;
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OperationStatus {
    #[serde(default)]
    done: bool,
    response: Option<OperationResult>,
    error: Option<OperationError>,
}

#[derive(Debug, Deserialize)]
struct OperationResult {
    generated_videos: Option<Vec<GeneratedVideoEntry>>,
}

#[derive(Debug, Deserialize)]
struct GeneratedVideoEntry {
    video: Option<VideoFile>,
}

#[derive(Debug, Deserialize)]
struct VideoFile {
    uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    code: Option<i64>,
    message: Option<String>,
}

impl OperationStatus {
    fn video_uri(self) -> Option<String> {
        self.response?
            .generated_videos?
            .into_iter()
            .next()?
            .video?
            .uri
    }
}

/// Client for the `generateVideos` long-running operation API.
#[derive(Clone, Debug)]
pub struct VideoGenerationClient {
    client: Client,
    credentials: ApiCredentials,
    model: String,
    budget: PollBudget,
}

impl VideoGenerationClient {
    pub fn new(credentials: ApiCredentials, model: impl Into<String>, budget: PollBudget) -> Self {
        Self {
            client: Client::new(),
            credentials,
            model: model.into(),
            budget,
        }
    }

    async fn submit(
        &self,
        api_key: &str,
        prompt: &str,
        options: &VideoOptions,
    ) -> Result<String, GenerationError> {
        let url = self
            .credentials
            .endpoint(&format!("v1/models/{}:generateVideos", self.model));
        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&json!({
                "prompt": prompt,
                "config": {
                    "aspect_ratio": options.aspect_ratio,
                    "resolution": options.resolution,
                }
            }))
            .send()
            .await?;

        let response = assert_ok_response(response).await?;
        let response_text = response.text().await?;
        let payload: SubmitResponse = serde_json::from_str(&response_text).map_err(|err| {
            GenerationError::Decode(format!("{err}, raw response: {response_text}"))
        })?;
        payload
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| GenerationError::Decode("submission returned no operation name".to_string()))
    }

    async fn poll_operation(
        &self,
        api_key: &str,
        operation: &str,
    ) -> Result<GeneratedVideo, GenerationError> {
        let url = self.credentials.endpoint(&format!("v1/{operation}"));
        let max_attempts = self.budget.max_attempts;

        for attempt in 1..=max_attempts {
            sleep(self.budget.interval).await;

            let response = self.client.get(&url).bearer_auth(api_key).send().await?;
            let response = assert_ok_response(response).await?;
            let response_text = response.text().await?;
            let status: OperationStatus = serde_json::from_str(&response_text).map_err(|err| {
                GenerationError::Decode(format!("{err}, raw response: {response_text}"))
            })?;

            if !status.done {
                debug!(operation, attempt, max_attempts, "video operation still running");
                continue;
            }

            if let Some(error) = status.error.as_ref() {
                return Err(GenerationError::OperationFailed {
                    operation: operation.to_string(),
                    message: format!(
                        "code={}, message={}",
                        error.code.unwrap_or_default(),
                        error.message.clone().unwrap_or_default()
                    ),
                });
            }

            let video_url = status
                .video_uri()
                .map(|uri| uri.trim().to_string())
                .filter(|uri| is_http_url(uri))
                .ok_or_else(|| GenerationError::MissingMedia {
                    operation: operation.to_string(),
                })?;
            info!(operation, attempt, "video operation finished");
            return Ok(GeneratedVideo {
                video_url,
                operation: operation.to_string(),
            });
        }

        Err(GenerationError::Timeout {
            operation: operation.to_string(),
            attempts: max_attempts,
        })
    }
}

#[async_trait]
impl VideoGenerator for VideoGenerationClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &VideoOptions,
    ) -> Result<GeneratedVideo, GenerationError> {
        let api_key = self
            .credentials
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingApiKey)?;
        let operation = self.submit(api_key, prompt, options).await?;
        debug!(%operation, "video operation submitted");
        self.poll_operation(api_key, &operation).await
    }
}

fn is_http_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|parsed| matches!(parsed.scheme(), "http" | "https"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

    const SUBMIT_PATH: &str = "/v1/models/veo-test:generateVideos";
    const POLL_PATH: &str = "/v1/operations/op-123";

    fn client(server: &MockServer, max_attempts: u32) -> VideoGenerationClient {
        VideoGenerationClient::new(
            ApiCredentials::new(server.uri(), Some("test-key".to_string())),
            "veo-test",
            PollBudget {
                interval: Duration::ZERO,
                max_attempts,
            },
        )
    }

    async fn mount_submit(server: &MockServer) {
        Mock::given(matchers::method("POST"))
            .and(matchers::path(SUBMIT_PATH))
            .and(matchers::header("authorization", "Bearer test-key"))
            .and(matchers::body_partial_json(json!({
                "prompt": "neon city in the rain",
                "config": {"aspect_ratio": "9:16", "resolution": "720p"}
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"name": "operations/op-123"})),
            )
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn polls_until_done_and_extracts_uri() {
        let server = MockServer::start().await;
        mount_submit(&server).await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path(POLL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"done": false})))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path(POLL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "done": true,
                "response": {"generated_videos": [{"video": {"uri": "https://cdn.example.com/v.mp4"}}]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let video = client(&server, 5)
            .generate("neon city in the rain", &VideoOptions::default())
            .await
            .unwrap();
        assert_eq!(video.video_url, "https://cdn.example.com/v.mp4");
        assert_eq!(video.operation, "operations/op-123");
    }

    #[tokio::test]
    async fn times_out_after_exactly_the_attempt_budget() {
        let server = MockServer::start().await;
        mount_submit(&server).await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path(POLL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"done": false})))
            .expect(4)
            .mount(&server)
            .await;

        let err = client(&server, 4)
            .generate("neon city in the rain", &VideoOptions::default())
            .await
            .unwrap_err();
        match err {
            GenerationError::Timeout { attempts, operation } => {
                assert_eq!(attempts, 4);
                assert_eq!(operation, "operations/op-123");
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn returned_uri_is_trimmed() {
        let server = MockServer::start().await;
        mount_submit(&server).await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path(POLL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "done": true,
                "response": {"generated_videos": [{"video": {"uri": "  https://cdn.example.com/v.mp4\n"}}]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let video = client(&server, 3)
            .generate("neon city in the rain", &VideoOptions::default())
            .await
            .unwrap();
        assert_eq!(video.video_url, "https://cdn.example.com/v.mp4");
    }

    #[tokio::test]
    async fn done_without_uri_is_a_hard_failure() {
        let server = MockServer::start().await;
        mount_submit(&server).await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path(POLL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "done": true,
                "response": {"generated_videos": []}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server, 10)
            .generate("neon city in the rain", &VideoOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::MissingMedia { .. }));
    }

    #[tokio::test]
    async fn done_with_error_payload_reports_upstream_message() {
        let server = MockServer::start().await;
        mount_submit(&server).await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path(POLL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "done": true,
                "error": {"code": 3, "message": "prompt rejected"}
            })))
            .mount(&server)
            .await;

        let err = client(&server, 10)
            .generate("neon city in the rain", &VideoOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("prompt rejected"));
    }

    #[tokio::test]
    async fn submission_status_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path(SUBMIT_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("quota exhausted"))
            .mount(&server)
            .await;

        let err = client(&server, 10)
            .generate("neon city in the rain", &VideoOptions::default())
            .await
            .unwrap_err();
        match err {
            GenerationError::Upstream(status) => {
                assert_eq!(status.status, 500);
                assert_eq!(status.body, "quota exhausted");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn poll_status_is_surfaced() {
        let server = MockServer::start().await;
        mount_submit(&server).await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path(POLL_PATH))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server, 10)
            .generate("neon city in the rain", &VideoOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Upstream(ref status) if status.status == 503));
    }

    #[tokio::test]
    async fn missing_api_key_fails_without_network() {
        let client = VideoGenerationClient::new(
            ApiCredentials::new("http://127.0.0.1:9", None),
            "veo-test",
            PollBudget::default(),
        );
        let err = client
            .generate("anything", &VideoOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::MissingApiKey));
    }

    #[test]
    fn only_http_uris_are_usable() {
        assert!(is_http_url("https://cdn.example.com/v.mp4"));
        assert!(!is_http_url("gs://bucket/v.mp4"));
        assert!(!is_http_url(""));
    }
}
