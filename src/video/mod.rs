pub mod client;
pub mod fanout;
pub mod orchestrator;

pub use client::{GeneratedVideo, VideoGenerationClient, VideoGenerator};
pub use fanout::StoryboardFanout;
pub use orchestrator::{SceneMetadata, VideoCache, VideoOutcome, VideoStatus};
