mod capturer;
mod device;
mod frame;

pub use capturer::{Capturer, PermissionGate};
pub use device::{AccessState, CaptureDevice, Facing, Illumination, RawFrame};
pub use frame::{CaptureFormat, CapturedImage, QualityParams, COMPRESSION_RATIO};
