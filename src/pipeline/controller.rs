use std::mem;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::types::{
    DetectionOutcome, IdentifyPhase, LanguagePair, PipelineEvent, PipelineState, TranslationResult,
};
use crate::capture::{
    AccessState, CaptureDevice, CapturedImage, Capturer, Facing, Illumination, PermissionGate,
};
use crate::config::Configuration;
use crate::error::{DetectionError, FailureReason, PipelineError, TranslationError};
use crate::services::{Detect, LabelDetector, Translate, Translator};

/// Coordinates capture, detection and translation into one user-facing flow.
///
/// The controller owns the single PipelineState; state transitions are the
/// only mutation path. Detection and translation run in spawned tasks that
/// report back as PipelineEvents tagged with the issuing cycle id, so a
/// response that arrives after reset is dropped instead of being applied to a
/// newer capture. Translation is only initiated from the Detected handler,
/// which keeps the detect-before-translate ordering a structural guarantee.
pub struct PipelineController {
    gate: PermissionGate,
    capturer: Capturer,
    detector: Arc<dyn Detect>,
    translator: Arc<dyn Translate>,
    state: PipelineState,
    cycle: Uuid,
    cancel: CancellationToken,
    event_tx: mpsc::Sender<PipelineEvent>,
}

impl PipelineController {
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn cycle(&self) -> Uuid {
        self.cycle
    }

    pub fn access(&self) -> AccessState {
        self.gate.access()
    }

    pub async fn request_access(&mut self) -> AccessState {
        self.gate.request_access().await
    }

    pub fn toggle_facing(&mut self) -> Facing {
        self.capturer.toggle_facing()
    }

    pub fn toggle_illumination(&mut self) -> Illumination {
        self.capturer.toggle_illumination()
    }

    /// Takes one picture and moves Idle -> Ready (or Failed on a device/codec
    /// error). Rejected without touching the device when access has not been
    /// granted or a previous capture is still on screen. Taking `&mut self`
    /// and awaiting inline means a second capture can never overlap the first.
    pub async fn capture(&mut self) -> Result<&PipelineState, PipelineError> {
        if self.gate.access() != AccessState::Granted {
            return Err(PipelineError::AccessDenied);
        }
        if !self.state.is_idle() {
            return Err(PipelineError::NotIdle);
        }
        self.begin_cycle();
        match self.capturer.capture().await {
            Ok(image) => {
                info!("Cycle {} captured an image", self.cycle);
                self.state = PipelineState::Ready(image);
            }
            Err(e) => {
                warn!("Cycle {} capture failed: {}", self.cycle, e);
                self.state = PipelineState::Failed {
                    image: None,
                    reason: e.into(),
                };
            }
        }
        Ok(&self.state)
    }

    /// Starts identification of the captured image. Moves Ready -> Identifying
    /// and spawns the detection call; translation follows from its result. A
    /// second call while Identifying is rejected, not queued.
    pub fn identify(&mut self, pair: LanguagePair) -> Result<(), PipelineError> {
        let image = match &self.state {
            PipelineState::Ready(image) => image.clone(),
            PipelineState::Identifying { .. } => return Err(PipelineError::IdentifyInFlight),
            _ => return Err(PipelineError::NotReady),
        };
        info!("Cycle {} identifying", self.cycle);
        self.spawn_detect(&image);
        self.state = PipelineState::Identifying {
            image,
            pair,
            phase: IdentifyPhase::Detecting,
        };
        Ok(())
    }

    /// Returns to Idle, discarding the captured image and any partial results.
    /// In-flight service tasks are cancelled; anything that still completes
    /// carries the old cycle id and is dropped in handle_event.
    pub fn reset(&mut self) {
        debug!("Cycle {} reset, returning to Idle", self.cycle);
        self.cancel.cancel();
        self.begin_cycle();
        self.state = PipelineState::Idle;
    }

    /// Applies one service completion to the state machine. The external
    /// display loop forwards events from the receiver returned by the builder.
    pub fn handle_event(&mut self, event: PipelineEvent) {
        if event.cycle() != self.cycle {
            debug!("Dropping stale event for superseded cycle {}", event.cycle());
            return;
        }
        match event {
            PipelineEvent::Detected { outcome, .. } => self.on_detected(outcome),
            PipelineEvent::Translated { outcome, .. } => self.on_translated(outcome),
        }
    }

    fn on_detected(&mut self, outcome: Result<DetectionOutcome, DetectionError>) {
        match mem::replace(&mut self.state, PipelineState::Idle) {
            PipelineState::Identifying {
                image,
                pair,
                phase: IdentifyPhase::Detecting,
            } => match outcome {
                Ok(DetectionOutcome::Label(detection)) => {
                    info!("Cycle {} detected label '{}'", self.cycle, detection.label);
                    self.spawn_translate(detection.label.clone(), pair.clone());
                    self.state = PipelineState::Identifying {
                        image,
                        pair,
                        phase: IdentifyPhase::Translating(detection),
                    };
                }
                Ok(DetectionOutcome::Empty) => {
                    info!("Cycle {} detection returned no label", self.cycle);
                    self.state = PipelineState::Failed {
                        image: Some(image),
                        reason: FailureReason::EmptyResult,
                    };
                }
                Err(e) => {
                    warn!("Cycle {} detection failed: {}", self.cycle, e);
                    self.state = PipelineState::Failed {
                        image: Some(image),
                        reason: FailureReason::Detection(e),
                    };
                }
            },
            other => {
                warn!(
                    "Detection result arrived in state {}, ignoring",
                    other.name()
                );
                self.state = other;
            }
        }
    }

    fn on_translated(&mut self, outcome: Result<TranslationResult, TranslationError>) {
        match mem::replace(&mut self.state, PipelineState::Idle) {
            PipelineState::Identifying {
                image,
                phase: IdentifyPhase::Translating(detection),
                ..
            } => match outcome {
                Ok(translation) => {
                    info!(
                        "Cycle {} resolved '{}' as '{}'",
                        self.cycle, detection.label, translation.text
                    );
                    self.state = PipelineState::Resolved {
                        image,
                        detection,
                        translation,
                    };
                }
                Err(e) => {
                    warn!("Cycle {} translation failed: {}", self.cycle, e);
                    self.state = PipelineState::Failed {
                        image: Some(image),
                        reason: FailureReason::Translation(e),
                    };
                }
            },
            other => {
                warn!(
                    "Translation result arrived in state {}, ignoring",
                    other.name()
                );
                self.state = other;
            }
        }
    }

    fn begin_cycle(&mut self) {
        self.cycle = Uuid::new_v4();
        self.cancel = CancellationToken::new();
    }

    fn spawn_detect(&self, image: &CapturedImage) {
        let detector = Arc::clone(&self.detector);
        let image = image.clone();
        let tx = self.event_tx.clone();
        let cycle = self.cycle;
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Detection task for cycle {} cancelled", cycle);
                }
                outcome = detector.detect(&image) => {
                    if tx.send(PipelineEvent::Detected { cycle, outcome }).await.is_err() {
                        warn!("Event channel closed, dropping detection result");
                    }
                }
            }
        });
    }

    fn spawn_translate(&self, label: String, pair: LanguagePair) {
        let translator = Arc::clone(&self.translator);
        let tx = self.event_tx.clone();
        let cycle = self.cycle;
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Translation task for cycle {} cancelled", cycle);
                }
                outcome = translator.translate(&label, &pair) => {
                    if tx.send(PipelineEvent::Translated { cycle, outcome }).await.is_err() {
                        warn!("Event channel closed, dropping translation result");
                    }
                }
            }
        });
    }
}

pub struct PipelineControllerBuilder {
    configuration: Configuration,
    device: Option<Arc<dyn CaptureDevice>>,
    detector: Option<Arc<dyn Detect>>,
    translator: Option<Arc<dyn Translate>>,
}

impl PipelineControllerBuilder {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            device: None,
            detector: None,
            translator: None,
        }
    }

    pub fn device(mut self, device: Arc<dyn CaptureDevice>) -> Self {
        self.device = Some(device);
        self
    }

    // Overrides the HTTP label detector, mainly for tests.
    pub fn detector(mut self, detector: Arc<dyn Detect>) -> Self {
        self.detector = Some(detector);
        self
    }

    // Overrides the HTTP translator, mainly for tests.
    pub fn translator(mut self, translator: Arc<dyn Translate>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Builds the controller and the event receiver the display loop drains.
    pub fn build(
        self,
    ) -> Result<(PipelineController, mpsc::Receiver<PipelineEvent>), PipelineError> {
        let device = self
            .device
            .ok_or(PipelineError::MissingComponent("capture device"))?;
        let detector: Arc<dyn Detect> = match self.detector {
            Some(detector) => detector,
            None => Arc::new(
                LabelDetector::new(&self.configuration)
                    .map_err(|e| PipelineError::ServiceInit(e.to_string()))?,
            ),
        };
        let translator: Arc<dyn Translate> = match self.translator {
            Some(translator) => translator,
            None => Arc::new(
                Translator::new(&self.configuration)
                    .map_err(|e| PipelineError::ServiceInit(e.to_string()))?,
            ),
        };
        let (event_tx, event_rx) = mpsc::channel(self.configuration.event_buffer_size);
        let controller = PipelineController {
            gate: PermissionGate::new(Arc::clone(&device)),
            capturer: Capturer::new(device),
            detector,
            translator,
            state: PipelineState::Idle,
            cycle: Uuid::new_v4(),
            cancel: CancellationToken::new(),
            event_tx,
        };
        Ok((controller, event_rx))
    }
}
