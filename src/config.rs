use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub detection_url: String,
    pub translation_url: String,
    pub api_key: String,
    pub request_timeout_secs: u64,
    pub event_buffer_size: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            detection_url: "https://vision.googleapis.com/v1/images:annotate".to_string(),
            translation_url: "https://translation.googleapis.com/language/translate/v2"
                .to_string(),
            api_key: String::new(),
            request_timeout_secs: 10,
            event_buffer_size: 16,
        }
    }
}
