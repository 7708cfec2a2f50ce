//! Insight generation: model call, validation, fallback and scene video backfill.

pub mod client;
pub mod fallback;
pub mod prompt;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

pub use client::{ChatCompletionClient, CompletionModel, OutputSchema};

use crate::error::InsightError;
use crate::models::{Insight, InsightFormat, InsightRequest, Narrative, Storyboard};
use crate::video::StoryboardFanout;
use prompt::{METRIC_COUNT, SCENE_COUNT};

pub struct InsightService {
    model: Arc<dyn CompletionModel>,
    fanout: StoryboardFanout,
}

impl InsightService {
    pub fn new(model: Arc<dyn CompletionModel>, fanout: StoryboardFanout) -> Self {
        Self { model, fanout }
    }

    /// Always returns a well-formed insight; model failures select the fallback.
    pub async fn generate(&self, request: &InsightRequest) -> Insight {
        match request.resolved_format() {
            InsightFormat::Narrative => {
                let narrative = match self.request_narrative(request).await {
                    Ok(narrative) => narrative,
                    Err(err) => {
                        log_fallback(request, &err);
                        fallback::narrative(request)
                    }
                };
                Insight::Narrative(narrative)
            }
            InsightFormat::Storyboard => {
                let mut storyboard = match self.request_storyboard(request).await {
                    Ok(storyboard) => storyboard,
                    Err(err) => {
                        log_fallback(request, &err);
                        fallback::storyboard(request)
                    }
                };
                self.attach_videos(&mut storyboard).await;
                Insight::Storyboard(storyboard)
            }
        }
    }

    async fn request_narrative(&self, request: &InsightRequest) -> Result<Narrative, InsightError> {
        let content = self
            .model
            .complete(&prompt::narrative_prompt(request), &prompt::narrative_schema())
            .await?;
        let narrative: Narrative = parse_content(&content)?;
        validate_narrative(&narrative)?;
        info!(signal = %request.signal_id, "narrative generated by model");
        Ok(narrative)
    }

    async fn request_storyboard(&self, request: &InsightRequest) -> Result<Storyboard, InsightError> {
        let content = self
            .model
            .complete(&prompt::storyboard_prompt(request), &prompt::storyboard_schema())
            .await?;
        let mut storyboard: Storyboard = parse_content(&content)?;
        validate_storyboard(&storyboard)?;
        for (scene, id) in storyboard.storyboard.iter_mut().zip(1..) {
            scene.id = id;
            scene.video_url = None;
        }
        info!(signal = %request.signal_id, "storyboard generated by model");
        Ok(storyboard)
    }

    async fn attach_videos(&self, storyboard: &mut Storyboard) {
        let mut outcomes = self.fanout.resolve_all(&storyboard.storyboard).await;
        for scene in storyboard.storyboard.iter_mut() {
            scene.video_url = outcomes
                .remove(&scene.id)
                .and_then(|outcome| outcome.video_url);
        }
    }
}

fn log_fallback(request: &InsightRequest, err: &InsightError) {
    warn!(
        signal = %request.signal_id,
        schema_violation = err.is_schema_violation(),
        error = %err,
        "model call failed, using fallback insight"
    );
}

/// Parses model content, tolerating a surrounding markdown code fence.
fn parse_content<T: DeserializeOwned>(content: &str) -> Result<T, InsightError> {
    let text = content.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    serde_json::from_str(text.trim()).map_err(|err| InsightError::Schema(err.to_string()))
}

fn validate_narrative(narrative: &Narrative) -> Result<(), InsightError> {
    if narrative.title.trim().is_empty() {
        return Err(InsightError::Schema("title is empty".to_string()));
    }
    if narrative.metrics.len() != METRIC_COUNT {
        return Err(InsightError::Schema(format!(
            "expected {METRIC_COUNT} metrics, got {}",
            narrative.metrics.len()
        )));
    }
    Ok(())
}

fn validate_storyboard(storyboard: &Storyboard) -> Result<(), InsightError> {
    if storyboard.title.trim().is_empty() {
        return Err(InsightError::Schema("title is empty".to_string()));
    }
    if storyboard.final_cta.trim().is_empty() {
        return Err(InsightError::Schema("final_cta is empty".to_string()));
    }
    if storyboard.storyboard.len() != SCENE_COUNT {
        return Err(InsightError::Schema(format!(
            "expected {SCENE_COUNT} scenes, got {}",
            storyboard.storyboard.len()
        )));
    }
    if let Some(scene) = storyboard
        .storyboard
        .iter()
        .find(|scene| scene.visual_prompt.trim().is_empty())
    {
        return Err(InsightError::Schema(format!(
            "scene {} has an empty visual_prompt",
            scene.id
        )));
    }
    Ok(())
}
