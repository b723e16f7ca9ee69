pub mod capture;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod services;

pub use capture::{
    AccessState, CaptureDevice, CaptureFormat, CapturedImage, Capturer, Facing, Illumination,
    PermissionGate, QualityParams, RawFrame,
};
pub use config::Configuration;
pub use error::{
    CaptureError, DetectionError, FailureReason, PipelineError, TranslationError,
};
pub use pipeline::{
    DetectionOutcome, DetectionResult, IdentifyPhase, LanguagePair, PipelineController,
    PipelineControllerBuilder, PipelineEvent, PipelineState, TranslationResult,
};
pub use services::{Detect, LabelDetector, Translate, Translator};
