//! Prompt text and output schemas for both insight variants.

use serde_json::json;

use crate::insight::client::OutputSchema;
use crate::models::{InsightRequest, Mood, VideoStyle};

pub const METRIC_COUNT: usize = 3;
pub const SCENE_COUNT: usize = 5;

pub fn narrative_prompt(request: &InsightRequest) -> String {
    format!(
        "You are a strategic AI consultant for Third Signal Labs. Generate a bespoke, \
executive-level strategic insight based on the following context:\n\n\
**Signal ID**: {signal_id}\n\
**Signal**: {signal_title}\n\
**Core Truth**: {signal_truth}\n\
**Client Role**: {role}\n\
**Industry**: {industry}\n\n\
The output must contain:\n\n\
1. **Title**: A punchy, paradox-style title (e.g. \"The {industry_short} {signal_title} Paradox\"). \
It must name the {industry_short} industry.\n\n\
2. **Body** (150-200 words): open with industry-specific context, connect the core truth to the \
client's role, reveal the hidden system dynamics, use concrete and vivid language.\n\n\
3. **Implication** (50-75 words): reframe the problem as an opportunity, suggest a \
counterintuitive approach, position AI and automation as the leverage point.\n\n\
4. **Metrics** (exactly {metric_count}): projected outcomes in the format \"Metric +/-XX%\", \
e.g. \"Velocity +40%\", \"Overhead -60%\", \"Signal Fidelity 99%\".\n\n\
Return ONLY valid JSON in this exact structure:\n\
{{\"title\": \"string\", \"body\": \"string\", \"implication\": \"string\", \
\"metrics\": [\"string\", \"string\", \"string\"]}}",
        signal_id = request.signal_id,
        signal_title = request.signal_title,
        signal_truth = request.signal_truth,
        role = request.role,
        industry = request.industry,
        industry_short = request.industry_short(),
        metric_count = METRIC_COUNT,
    )
}

pub fn storyboard_prompt(request: &InsightRequest) -> String {
    let confession = match request.confession() {
        Some(text) => format!("**Their confession, in their own words**: \"{text}\"\n"),
        None => String::new(),
    };
    format!(
        "You are the creative director of Third Signal Labs. Turn the following client context \
into a cinematic storyboard that plays as a short vertical film:\n\n\
**Signal ID**: {signal_id}\n\
**Signal**: {signal_title}\n\
**Core Truth**: {signal_truth}\n\
**Client Role**: {role}\n\
**Industry**: {industry}\n\
{confession}\n\
Produce exactly {scene_count} scenes that move from tension to resolution. For each scene:\n\
- id: its position, 1 to {scene_count}\n\
- visual_prompt: a self-contained text-to-video prompt (camera, subject, lighting, motion), \
no on-screen text\n\
- text_overlay: one short line shown over the video (max 12 words)\n\
- video_style: one of {styles}\n\
- mood: one of {moods}\n\n\
Also give the storyboard a paradox-style title naming the {industry_short} industry and a \
final_cta inviting the viewer to talk to Third Signal Labs.\n\n\
Return ONLY valid JSON matching the declared schema.",
        signal_id = request.signal_id,
        signal_title = request.signal_title,
        signal_truth = request.signal_truth,
        role = request.role,
        industry = request.industry,
        industry_short = request.industry_short(),
        scene_count = SCENE_COUNT,
        styles = VideoStyle::ALL.join(", "),
        moods = Mood::ALL.join(", "),
    )
}

pub fn narrative_schema() -> OutputSchema {
    OutputSchema {
        name: "strategic_insight",
        schema: json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "A punchy, paradox-style title for the insight"
                },
                "body": {
                    "type": "string",
                    "description": "The main narrative body of the insight (150-200 words)"
                },
                "implication": {
                    "type": "string",
                    "description": "The strategic recommendation (50-75 words)"
                },
                "metrics": {
                    "type": "array",
                    "items": {"type": "string"},
                    "minItems": METRIC_COUNT,
                    "maxItems": METRIC_COUNT,
                    "description": "Exactly 3 projected outcome metrics"
                }
            },
            "required": ["title", "body", "implication", "metrics"],
            "additionalProperties": false
        }),
    }
}

pub fn storyboard_schema() -> OutputSchema {
    OutputSchema {
        name: "cinematic_storyboard",
        schema: json!({
            "type": "object",
            "properties": {
                "title": {"type": "string"},
                "storyboard": {
                    "type": "array",
                    "minItems": SCENE_COUNT,
                    "maxItems": SCENE_COUNT,
                    "items": {
                        "type": "object",
                        "properties": {
                            "id": {"type": "integer"},
                            "visual_prompt": {"type": "string"},
                            "text_overlay": {"type": "string"},
                            "video_style": {"type": "string", "enum": VideoStyle::ALL},
                            "mood": {"type": "string", "enum": Mood::ALL}
                        },
                        "required": ["id", "visual_prompt", "text_overlay", "video_style", "mood"],
                        "additionalProperties": false
                    }
                },
                "final_cta": {"type": "string"}
            },
            "required": ["title", "storyboard", "final_cta"],
            "additionalProperties": false
        }),
    }
}
