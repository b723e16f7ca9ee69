use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::capture::CapturedImage;
use crate::config::Configuration;
use crate::error::DetectionError;
use crate::pipeline::{DetectionOutcome, DetectionResult};

/// Seam over the remote label-detection service.
#[async_trait]
pub trait Detect: Send + Sync {
    async fn detect(&self, image: &CapturedImage) -> Result<DetectionOutcome, DetectionError>;
}

/// HTTP client for the label-detection service. Performs exactly one remote
/// call per invocation and asks for the single top-scoring label; no retries,
/// no caching, no batching.
pub struct LabelDetector {
    http_client: reqwest::Client,
    url: String,
    api_key: String,
}

#[derive(Serialize)]
struct AnnotateRequest<'a> {
    requests: Vec<ImageRequest<'a>>,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    image: ImageContent<'a>,
    features: Vec<Feature>,
}

#[derive(Serialize)]
struct ImageContent<'a> {
    content: &'a str,
}

#[derive(Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(rename = "maxResults")]
    max_results: u32,
}

#[derive(Deserialize)]
struct AnnotateResponse {
    responses: Vec<ImageAnnotation>,
}

#[derive(Deserialize, Default)]
struct ImageAnnotation {
    #[serde(default, rename = "labelAnnotations")]
    label_annotations: Vec<LabelAnnotation>,
}

#[derive(Deserialize)]
struct LabelAnnotation {
    description: String,
}

impl LabelDetector {
    pub fn new(config: &Configuration) -> Result<Self, DetectionError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http_client,
            url: config.detection_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn request_body(image: &CapturedImage) -> AnnotateRequest<'_> {
        AnnotateRequest {
            requests: vec![ImageRequest {
                image: ImageContent {
                    content: image.payload(),
                },
                features: vec![Feature {
                    kind: "LABEL_DETECTION",
                    max_results: 1,
                }],
            }],
        }
    }

    fn parse_response(body: &str) -> Result<DetectionOutcome, DetectionError> {
        let response: AnnotateResponse = serde_json::from_str(body)?;
        let annotation = response
            .responses
            .into_iter()
            .next()
            .ok_or(DetectionError::MissingField("responses[0]"))?;
        match annotation.label_annotations.into_iter().next() {
            Some(label) => Ok(DetectionOutcome::Label(DetectionResult {
                label: label.description,
            })),
            None => Ok(DetectionOutcome::Empty),
        }
    }
}

#[async_trait]
impl Detect for LabelDetector {
    async fn detect(&self, image: &CapturedImage) -> Result<DetectionOutcome, DetectionError> {
        debug!(
            "Requesting label detection ({} base64 bytes)",
            image.payload().len()
        );
        let response = self
            .http_client
            .post(&self.url)
            .query(&[("key", self.api_key.as_str())])
            .json(&Self::request_body(image))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Detection service returned status {}", status);
            return Err(DetectionError::Status(status));
        }
        let body = response.text().await?;
        Self::parse_response(&body)
    }
}
