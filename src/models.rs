//! Request and result shapes exchanged with the UI layer and the language model.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which insight shape the caller wants back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum InsightFormat {
    Narrative,
    Storyboard,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsightRequest {
    #[schemars(description = "Signal identifier, e.g. S01")]
    pub signal_id: String,
    #[schemars(description = "Signal title, e.g. Friction Index")]
    pub signal_title: String,
    #[schemars(description = "The core truth statement of the signal")]
    pub signal_truth: String,
    #[schemars(description = "Visitor role, e.g. CTO / VP Eng")]
    pub role: String,
    #[schemars(description = "Visitor industry, e.g. SaaS / Tech")]
    pub industry: String,
    #[schemars(description = "Optional free-text confession describing the problem")]
    #[serde(default)]
    pub raw_input: Option<String>,
    #[schemars(description = "narrative or storyboard; defaults to storyboard when rawInput is present")]
    #[serde(default)]
    pub format: Option<InsightFormat>,
}

impl InsightRequest {
    pub fn resolved_format(&self) -> InsightFormat {
        match self.format {
            Some(format) => format,
            None if self.confession().is_some() => InsightFormat::Storyboard,
            None => InsightFormat::Narrative,
        }
    }

    pub fn confession(&self) -> Option<&str> {
        self.raw_input
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Leading segment of the industry, e.g. `SaaS` for `SaaS / Tech`.
    pub fn industry_short(&self) -> &str {
        self.industry.split('/').next().unwrap_or("").trim()
    }

    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("signalId", &self.signal_id),
            ("signalTitle", &self.signal_title),
            ("signalTruth", &self.signal_truth),
            ("role", &self.role),
            ("industry", &self.industry),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Rejects a request with blank required fields, naming them.
    pub fn validate(&self) -> Result<(), String> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            return Ok(());
        }
        Err(format!("missing required fields: {}", missing.join(", ")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VideoStyle {
    Cinematic,
    Glitch,
    Abstract,
    Documentary,
}

impl VideoStyle {
    pub const ALL: [&'static str; 4] = ["cinematic", "glitch", "abstract", "documentary"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Dark,
    Bright,
    Urgent,
    Calm,
}

impl Mood {
    pub const ALL: [&'static str; 4] = ["dark", "bright", "urgent", "calm"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryboardScene {
    pub id: u32,
    pub visual_prompt: String,
    pub text_overlay: String,
    pub video_style: VideoStyle,
    pub mood: Mood,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Narrative {
    pub title: String,
    pub body: String,
    pub implication: String,
    pub metrics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Storyboard {
    pub title: String,
    pub storyboard: Vec<StoryboardScene>,
    pub final_cta: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Insight {
    Narrative(Narrative),
    Storyboard(Storyboard),
}

impl Insight {
    pub fn title(&self) -> &str {
        match self {
            Insight::Narrative(narrative) => &narrative.title,
            Insight::Storyboard(storyboard) => &storyboard.title,
        }
    }
}
