use thiserror::Error;

// Capture Error Type

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Capture device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("Capture device is busy")]
    DeviceBusy,
    #[error("Invalid frame buffer: {0}")]
    InvalidFrame(String),
    #[error("Failed to encode frame: {0}")]
    Encode(#[from] image::ImageError),
}

// Detection Error Type
#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("Detection request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Detection service returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("Malformed detection response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Detection response missing {0}")]
    MissingField(&'static str),
}

// Translation Error Type
#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("Translation request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Translation service returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("Malformed translation response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Translation response missing {0}")]
    MissingField(&'static str),
    #[error("Translation requested for an empty label")]
    EmptyLabel,
}

/// Why a pipeline cycle ended in the Failed state. An empty detection result
/// is a valid answer from the service, kept apart from transport faults.
#[derive(Error, Debug)]
pub enum FailureReason {
    /// Never stored by the controller itself (denied access is rejected at
    /// the guard before a cycle starts); display adapters use it to fold the
    /// gate's Denied state into this taxonomy when rendering one failure kind.
    #[error("Camera access denied")]
    AccessDenied,
    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),
    #[error("Label detection failed: {0}")]
    Detection(#[from] DetectionError),
    #[error("Detection service returned no label")]
    EmptyResult,
    #[error("Translation failed: {0}")]
    Translation(#[from] TranslationError),
}

/// Guard-level rejections. These are returned to the caller without mutating
/// pipeline state; operational failures are stored in the Failed state instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Camera access has not been granted")]
    AccessDenied,
    #[error("A capture or preview is already active")]
    NotIdle,
    #[error("No captured image to identify")]
    NotReady,
    #[error("An identification is already in flight")]
    IdentifyInFlight,
    #[error("{0} not set")]
    MissingComponent(&'static str),
    #[error("Service initialization failed: {0}")]
    ServiceInit(String),
}
