use std::sync::Arc;

use base64::engine::general_purpose;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use tracing::{debug, info};

use super::device::{AccessState, CaptureDevice, Facing, Illumination};
use super::frame::{CapturedImage, QualityParams};
use crate::error::CaptureError;

/// Owns the "device access granted" state. Re-prompts only on an explicit
/// request_access call; the caller decides whether to retry after Denied.
pub struct PermissionGate {
    device: Arc<dyn CaptureDevice>,
    state: AccessState,
}

impl PermissionGate {
    pub fn new(device: Arc<dyn CaptureDevice>) -> Self {
        Self {
            device,
            state: AccessState::Unknown,
        }
    }

    pub async fn request_access(&mut self) -> AccessState {
        let state = self.device.request_permission().await;
        info!("Camera permission request resolved to {:?}", state);
        self.state = state;
        state
    }

    pub fn access(&self) -> AccessState {
        self.state
    }
}

/// Drives the capture device and normalizes each raw frame into a compressed,
/// encoded still image. The facing and illumination settings are plain device
/// toggles that only affect the next capture.
pub struct Capturer {
    device: Arc<dyn CaptureDevice>,
    quality: QualityParams,
    facing: Facing,
    illumination: Illumination,
}

impl Capturer {
    pub fn new(device: Arc<dyn CaptureDevice>) -> Self {
        Self {
            device,
            quality: QualityParams::default(),
            facing: Facing::Back,
            illumination: Illumination::Off,
        }
    }

    pub fn toggle_facing(&mut self) -> Facing {
        self.facing = self.facing.flipped();
        debug!("Camera facing set to {:?}", self.facing);
        self.facing
    }

    pub fn toggle_illumination(&mut self) -> Illumination {
        self.illumination = self.illumination.flipped();
        debug!("Illumination set to {:?}", self.illumination);
        self.illumination
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn illumination(&self) -> Illumination {
        self.illumination
    }

    pub async fn capture(&self) -> Result<CapturedImage, CaptureError> {
        let frame = self
            .device
            .capture_frame(self.facing, self.illumination)
            .await?;
        let payload = encode_payload(&frame.image, self.quality)?;
        debug!(
            "Captured frame {} ({} base64 bytes)",
            frame.id,
            payload.len()
        );
        Ok(CapturedImage::new(frame.image, payload, self.quality))
    }
}

fn encode_payload(image: &DynamicImage, quality: QualityParams) -> Result<String, CaptureError> {
    let mut bytes = Vec::new();
    let jpeg_quality = (quality.compression_ratio * 100.0) as u8;
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, jpeg_quality);
    // JPEG has no alpha channel; flatten to RGB before encoding.
    encoder.encode_image(&image.to_rgb8())?;
    Ok(general_purpose::STANDARD.encode(&bytes))
}
