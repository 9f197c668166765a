use super::catalog::Provider;
use super::error::ProviderError;
use super::provider::{api_error_message, missing_key_message, ProviderClient, ProviderOutcome, ProviderRequest};
use super::types::{ImageAttachment, Message, Role};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    #[serde(default)]
    pub role: String, // "user" or "model"
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Build Gemini `contents`; the image rides on the last user turn.
pub fn build_contents(history: &[Message], image: Option<&ImageAttachment>) -> Vec<Content> {
    let last_user = history.iter().rposition(|m| m.role == Role::User);

    history
        .iter()
        .enumerate()
        .map(|(idx, message)| {
            let role = match message.role {
                Role::User => "user",
                Role::Assistant => "model",
            };
            let mut parts = vec![Part::Text {
                text: message.content.clone(),
            }];
            if let (Some(image), Some(last)) = (image, last_user) {
                if idx == last {
                    parts.push(Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type.clone(),
                            data: image.data_base64.clone(),
                        },
                    });
                }
            }
            Content {
                role: role.to_string(),
                parts,
            }
        })
        .collect()
}

impl GenerateContentResponse {
    fn into_outcome(self) -> ProviderOutcome {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return ProviderOutcome::failure(format!("Blocked by Gemini: {}", reason));
        }

        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| match part {
                        Part::Text { text } => Some(text),
                        Part::InlineData { .. } => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            ProviderOutcome::failure("No response")
        } else {
            ProviderOutcome::Success { text }
        }
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
}

impl GeminiClient {
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| ProviderError::Client(e.to_string()))?;

        Ok(Self { client })
    }

    pub async fn generate_content(
        &self,
        api_key: &str,
        model: &str,
        contents: Vec<Content>,
    ) -> Result<ProviderOutcome, ProviderError> {
        let url = format!("{}/models/{}:generateContent", GEMINI_API_BASE, model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&GenerateContentRequest { contents })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            return Ok(ProviderOutcome::failure(format!(
                "Gemini error ({}): {}",
                status,
                api_error_message(error_text)
            )));
        }

        match response.json::<GenerateContentResponse>().await {
            Ok(generated) => Ok(generated.into_outcome()),
            Err(e) => Ok(ProviderOutcome::failure(format!(
                "Failed to parse response: {}",
                e
            ))),
        }
    }
}

#[async_trait]
impl ProviderClient for GeminiClient {
    async fn invoke(&self, request: ProviderRequest) -> Result<ProviderOutcome, ProviderError> {
        let Some(api_key) = request.api_key else {
            return Ok(ProviderOutcome::failure(missing_key_message(Provider::Gemini)));
        };

        let contents = build_contents(&request.history, request.image.as_ref());
        tracing::debug!(
            model = %request.model,
            turns = contents.len(),
            with_image = request.image.is_some(),
            "Gemini request"
        );
        self.generate_content(&api_key, &request.model, contents).await
    }
}
