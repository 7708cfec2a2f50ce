//! Process configuration, read once from the environment at startup.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, anyhow};
use url::Url;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_API_ROOT: &str = "https://forge.manus.im";
const DEFAULT_INSIGHT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_VIDEO_MODEL: &str = "veo-3.1-generate-preview";
const DEFAULT_ASPECT_RATIO: &str = "9:16";
const DEFAULT_RESOLUTION: &str = "720p";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 30;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 6 * 60;

/// Endpoint and credentials of the generative API shared by the chat and video clients.
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl ApiCredentials {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.filter(|value| !value.trim().is_empty()),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Options sent with every video generation job.
#[derive(Debug, Clone)]
pub struct VideoOptions {
    pub aspect_ratio: String,
    pub resolution: String,
}

impl Default for VideoOptions {
    fn default() -> Self {
        Self {
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
            resolution: DEFAULT_RESOLUTION.to_string(),
        }
    }
}

/// Fixed-interval polling budget for one generation job.
#[derive(Debug, Clone, Copy)]
pub struct PollBudget {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollBudget {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_attempts: DEFAULT_POLL_MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub secret_key: Option<String>,
    pub credentials: ApiCredentials,
    pub insight_model: String,
    pub video_model: String,
    pub video_options: VideoOptions,
    pub poll_budget: PollBudget,
    pub request_timeout: Duration,
    pub cache_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let base_url = non_empty_var("GENAI_API_URL").unwrap_or_else(|| DEFAULT_API_ROOT.to_string());
        validate_base_url(&base_url)?;

        Ok(Self {
            port: parsed_var("PORT").unwrap_or(DEFAULT_PORT),
            secret_key: non_empty_var("SECRET_KEY"),
            credentials: ApiCredentials::new(base_url, non_empty_var("GENAI_API_KEY")),
            insight_model: non_empty_var("INSIGHT_MODEL")
                .unwrap_or_else(|| DEFAULT_INSIGHT_MODEL.to_string()),
            video_model: non_empty_var("VIDEO_MODEL")
                .unwrap_or_else(|| DEFAULT_VIDEO_MODEL.to_string()),
            video_options: VideoOptions {
                aspect_ratio: non_empty_var("VIDEO_ASPECT_RATIO")
                    .unwrap_or_else(|| DEFAULT_ASPECT_RATIO.to_string()),
                resolution: non_empty_var("VIDEO_RESOLUTION")
                    .unwrap_or_else(|| DEFAULT_RESOLUTION.to_string()),
            },
            poll_budget: PollBudget {
                interval: Duration::from_secs(
                    parsed_var("VIDEO_POLL_INTERVAL_SECS").unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
                ),
                max_attempts: parsed_var("VIDEO_POLL_MAX_ATTEMPTS")
                    .filter(|attempts| *attempts > 0)
                    .unwrap_or(DEFAULT_POLL_MAX_ATTEMPTS),
            },
            request_timeout: Duration::from_secs(
                parsed_var("REQUEST_TIMEOUT_SECS").unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            cache_dir: resolve_cache_dir(),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    pub fn mcp_path(&self) -> String {
        match self.secret_key.as_deref() {
            Some(value) => format!("/{}/mcp", value),
            None => "/mcp".to_string(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    non_empty_var(name).and_then(|value| value.parse::<T>().ok())
}

fn validate_base_url(raw: &str) -> Result<()> {
    let parsed = Url::parse(raw).map_err(|err| anyhow!("GENAI_API_URL is not a valid URL: {err}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(anyhow!("GENAI_API_URL must use http or https, got {scheme}")),
    }
}

fn resolve_cache_dir() -> PathBuf {
    if let Some(dir) = non_empty_var("CACHE_DIR") {
        return PathBuf::from(dir);
    }
    let mut base = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push("signal-insights");
    base
}
