use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use image::{DynamicImage, RgbImage};
use uuid::Uuid;

use crate::error::CaptureError;

/// Whether the user has granted access to the capture device. Denied is a
/// sticky state; it is only re-evaluated by an explicit retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
    Unknown,
    Granted,
    Denied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Back,
    Front,
}

impl Facing {
    pub fn flipped(self) -> Self {
        match self {
            Facing::Back => Facing::Front,
            Facing::Front => Facing::Back,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Illumination {
    Off,
    On,
}

impl Illumination {
    pub fn flipped(self) -> Self {
        match self {
            Illumination::Off => Illumination::On,
            Illumination::On => Illumination::Off,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RawFrame {
    pub image: DynamicImage,
    pub captured_at: DateTime<Utc>,
    pub id: Uuid,
}

impl RawFrame {
    pub fn new(width: u32, height: u32, pixels: Bytes) -> Result<Self, CaptureError> {
        let rgb_image = RgbImage::from_raw(width, height, pixels.to_vec()).ok_or_else(|| {
            CaptureError::InvalidFrame(format!(
                "buffer does not match {}x{} RGB dimensions",
                width, height
            ))
        })?;
        Ok(Self::from_image(DynamicImage::ImageRgb8(rgb_image)))
    }

    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            image,
            captured_at: Utc::now(),
            id: Uuid::new_v4(),
        }
    }
}

/// Seam over the OS capture primitive: permission prompt plus one-frame reads.
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Triggers at most one OS-level permission prompt per call. Failure is
    /// represented as Denied, never as an error.
    async fn request_permission(&self) -> AccessState;

    /// Reads a single frame with the given settings.
    async fn capture_frame(
        &self,
        facing: Facing,
        illumination: Illumination,
    ) -> Result<RawFrame, CaptureError>;
}
