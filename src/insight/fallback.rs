//! Hand-authored results used whenever the model call fails.

use crate::models::{InsightRequest, Mood, Narrative, Storyboard, StoryboardScene, VideoStyle};

fn paradox_title(request: &InsightRequest) -> String {
    format!(
        "The {} {} Paradox",
        request.industry_short(),
        request.signal_title.trim()
    )
}

pub fn narrative(request: &InsightRequest) -> Narrative {
    Narrative {
        title: paradox_title(request),
        body: format!(
            "In {industry}, {truth} As a {role}, you are uniquely positioned to see the system \
failures that others ignore. The current architecture is optimized to preserve the problem, not \
solve it. Every layer of complexity you've inherited is a tax on velocity, and the cost \
compounds daily.",
            industry = request.industry.trim(),
            truth = request.signal_truth.trim(),
            role = request.role.trim(),
        ),
        implication: format!(
            "The strategic move is to invert the model. By deploying autonomous agents to address \
{signal}, we don't just patch the leak, we redesign the plumbing. This shifts your team from \
'keeping the lights on' to 'lighting the fire'.",
            signal = request.signal_title.trim().to_lowercase(),
        ),
        metrics: vec![
            "Velocity +40%".to_string(),
            "Overhead -60%".to_string(),
            "Signal Fidelity 99%".to_string(),
        ],
    }
}

pub fn storyboard(request: &InsightRequest) -> Storyboard {
    let industry = request.industry_short();
    let signal = request.signal_title.trim();
    let scenes = [
        (
            format!("Slow push-in on a dim {industry} operations floor, monitors flickering with red alerts, no people moving"),
            format!("Every {industry} team knows this feeling."),
            VideoStyle::Cinematic,
            Mood::Dark,
        ),
        (
            "Macro shot of tangled fiber cables pulsing with light that stalls and stutters at each knot".to_string(),
            format!("{signal} hides in the handoffs."),
            VideoStyle::Glitch,
            Mood::Urgent,
        ),
        (
            "Abstract particles forming a network graph, one bright node slowly pulling the others into alignment".to_string(),
            "The system is working exactly as designed.".to_string(),
            VideoStyle::Abstract,
            Mood::Calm,
        ),
        (
            "Time-lapse of an empty office at dawn, screens switching on one by one as automated agents take over routine work".to_string(),
            format!("What if {signal} became your advantage?"),
            VideoStyle::Documentary,
            Mood::Bright,
        ),
        (
            "Aerial drone shot rising above a city skyline at sunrise, light sweeping across glass towers".to_string(),
            "Invert the model. Light the fire.".to_string(),
            VideoStyle::Cinematic,
            Mood::Bright,
        ),
    ];

    Storyboard {
        title: paradox_title(request),
        storyboard: scenes
            .into_iter()
            .zip(1..)
            .map(|((visual_prompt, text_overlay, video_style, mood), id)| StoryboardScene {
                id,
                visual_prompt,
                text_overlay,
                video_style,
                mood,
                video_url: None,
            })
            .collect(),
        final_cta: format!(
            "Ready to turn {} into leverage? Talk to Third Signal Labs.",
            signal.to_lowercase()
        ),
    }
}
