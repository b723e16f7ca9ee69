mod detection;
mod translation;

pub use detection::{Detect, LabelDetector};
pub use translation::{Translate, Translator};
