mod controller;
mod types;

pub use controller::{PipelineController, PipelineControllerBuilder};
pub use types::{
    DetectionOutcome, DetectionResult, IdentifyPhase, LanguagePair, PipelineEvent, PipelineState,
    TranslationResult,
};
