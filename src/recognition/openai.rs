use std::time::Duration;

use anyhow::{anyhow, Context};
use axum::async_trait;
use base64ct::{Base64, Encoding};
use bytes::Bytes;
use serde::Deserialize;

use super::{FoodRecognizer, FOOD_PROMPT};
use crate::config::OpenAiConfig;
use crate::error::MealError;

/// Vision recognizer backed by the OpenAI chat completions API. The image
/// travels inline as a base64 data URL, the way the upstream API expects.
pub struct OpenAiRecognizer {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiRecognizer {
    pub fn new(cfg: &OpenAiConfig, timeout_secs: u64) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("build openai http client")?;
        Ok(Self {
            http,
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            base_url: cfg.base_url.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl FoodRecognizer for OpenAiRecognizer {
    async fn describe_foods(
        &self,
        image: Bytes,
        content_type: &str,
    ) -> Result<String, MealError> {
        let encoded = Base64::encode_string(&image);
        let payload = serde_json::json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": FOOD_PROMPT },
                    {
                        "type": "image_url",
                        "image_url": {
                            "url": format!("data:{};base64,{}", content_type, encoded)
                        }
                    }
                ]
            }],
            "max_tokens": 300
        });

        let resp = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .context("openai request")
            .map_err(MealError::RecognitionFailed)?
            .error_for_status()
            .context("openai status")
            .map_err(MealError::RecognitionFailed)?;

        let body: ChatResponse = resp
            .json()
            .await
            .context("decode openai response")
            .map_err(MealError::RecognitionFailed)?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| MealError::RecognitionFailed(anyhow!("empty completion")))
    }
}
