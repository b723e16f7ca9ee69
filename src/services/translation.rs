use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Configuration;
use crate::error::TranslationError;
use crate::pipeline::{LanguagePair, TranslationResult};

/// Seam over the remote translation service.
#[async_trait]
pub trait Translate: Send + Sync {
    async fn translate(
        &self,
        label: &str,
        pair: &LanguagePair,
    ) -> Result<TranslationResult, TranslationError>;
}

/// HTTP client for the translation service. Exactly one remote call per
/// invocation; rejects an empty label before touching the network.
pub struct Translator {
    http_client: reqwest::Client,
    url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct TranslateResponse {
    data: TranslationList,
}

#[derive(Deserialize)]
struct TranslationList {
    translations: Vec<TranslationEntry>,
}

#[derive(Deserialize)]
struct TranslationEntry {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

impl Translator {
    pub fn new(config: &Configuration) -> Result<Self, TranslationError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http_client,
            url: config.translation_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn parse_response(body: &str) -> Result<TranslationResult, TranslationError> {
        let response: TranslateResponse = serde_json::from_str(body)?;
        let entry = response
            .data
            .translations
            .into_iter()
            .next()
            .ok_or(TranslationError::MissingField("data.translations[0]"))?;
        Ok(TranslationResult {
            text: entry.translated_text,
        })
    }
}

#[async_trait]
impl Translate for Translator {
    async fn translate(
        &self,
        label: &str,
        pair: &LanguagePair,
    ) -> Result<TranslationResult, TranslationError> {
        if label.is_empty() {
            return Err(TranslationError::EmptyLabel);
        }
        debug!(
            "Requesting translation of '{}' from {} to {}",
            label, pair.source, pair.target
        );
        let response = self
            .http_client
            .post(&self.url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", label),
                ("target", pair.target.as_str()),
                ("source", pair.source.as_str()),
            ])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Translation service returned status {}", status);
            return Err(TranslationError::Status(status));
        }
        let body = response.text().await?;
        Self::parse_response(&body)
    }
}
