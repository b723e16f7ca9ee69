use image::DynamicImage;
use std::sync::Arc;

/// Fixed compression applied to every capture so the payload stays small
/// enough for the detection request.
pub const COMPRESSION_RATIO: f32 = 0.65;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureFormat {
    Jpeg,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityParams {
    pub format: CaptureFormat,
    pub compression_ratio: f32,
}

impl Default for QualityParams {
    fn default() -> Self {
        Self {
            format: CaptureFormat::Jpeg,
            compression_ratio: COMPRESSION_RATIO,
        }
    }
}

/// One normalized still image: a display-ready handle for the preview plus the
/// base64 payload sent to the detection service. Cloning shares both buffers.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    preview: Arc<DynamicImage>,
    payload: Arc<str>,
    quality: QualityParams,
}

impl CapturedImage {
    pub(crate) fn new(preview: DynamicImage, payload: String, quality: QualityParams) -> Self {
        Self {
            preview: Arc::new(preview),
            payload: Arc::from(payload),
            quality,
        }
    }

    pub fn preview(&self) -> &Arc<DynamicImage> {
        &self.preview
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn quality(&self) -> QualityParams {
        self.quality
    }
}
