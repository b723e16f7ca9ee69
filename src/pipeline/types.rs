use uuid::Uuid;

use crate::capture::CapturedImage;
use crate::error::{DetectionError, FailureReason, TranslationError};

/// Source/target language codes, supplied read-only by the language-selection
/// collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionResult {
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    pub text: String,
}

/// A successful detection call either names the top label or reports that the
/// service had nothing to say. The empty case is not a fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectionOutcome {
    Label(DetectionResult),
    Empty,
}

/// The two internal sub-steps of one identification. Callers see a single
/// Identifying state; keeping the phases apart keeps the two failure kinds
/// separately observable.
#[derive(Debug, Clone)]
pub enum IdentifyPhase {
    Detecting,
    Translating(DetectionResult),
}

/// The single mutable screen state, owned by the controller. Results are only
/// ever stored next to the captured image that produced them.
#[derive(Debug)]
pub enum PipelineState {
    Idle,
    Ready(CapturedImage),
    Identifying {
        image: CapturedImage,
        pair: LanguagePair,
        phase: IdentifyPhase,
    },
    Resolved {
        image: CapturedImage,
        detection: DetectionResult,
        translation: TranslationResult,
    },
    Failed {
        // None only when capture itself failed before producing an image.
        image: Option<CapturedImage>,
        reason: FailureReason,
    },
}

impl PipelineState {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineState::Idle => "Idle",
            PipelineState::Ready(_) => "Ready",
            PipelineState::Identifying { .. } => "Identifying",
            PipelineState::Resolved { .. } => "Resolved",
            PipelineState::Failed { .. } => "Failed",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, PipelineState::Idle)
    }
}

/// Completion of a spawned service call, tagged with the cycle that issued it
/// so stale responses from a superseded cycle can be dropped.
#[derive(Debug)]
pub enum PipelineEvent {
    Detected {
        cycle: Uuid,
        outcome: Result<DetectionOutcome, DetectionError>,
    },
    Translated {
        cycle: Uuid,
        outcome: Result<TranslationResult, TranslationError>,
    },
}

impl PipelineEvent {
    pub fn cycle(&self) -> Uuid {
        match self {
            PipelineEvent::Detected { cycle, .. } | PipelineEvent::Translated { cycle, .. } => {
                *cycle
            }
        }
    }
}
