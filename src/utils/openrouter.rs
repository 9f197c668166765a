use super::catalog::Provider;
use super::error::ProviderError;
use super::provider::{api_error_message, missing_key_message, ProviderClient, ProviderOutcome, ProviderRequest};
use super::types::{Message, Role};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// Constants
// ============================================================================

const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";
const APP_NAME: &str = "fiesta";
const APP_URL: &str = "https://github.com/chironjit/fiesta";

// ============================================================================
// API Types - Request
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String, // "user", "assistant"
    pub content: String,
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        let role = match message.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        Self {
            role: role.to_string(),
            content: message.content.clone(),
        }
    }
}

// ============================================================================
// API Types - Response
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub message: String,
}

impl ChatCompletionResponse {
    fn into_outcome(self) -> ProviderOutcome {
        if let Some(error) = self.error {
            return ProviderOutcome::failure(format!("API error: {}", error.message));
        }

        let text = self
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|t| !t.trim().is_empty());

        match text {
            Some(text) => ProviderOutcome::Success { text },
            None => ProviderOutcome::failure("No response"),
        }
    }
}

// ============================================================================
// OpenRouter Client
// ============================================================================

#[derive(Clone)]
pub struct OpenRouterClient {
    client: Client,
}

impl OpenRouterClient {
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10) // several models share the host
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| ProviderError::Client(e.to_string()))?;

        Ok(Self { client })
    }

    pub async fn chat_completion(
        &self,
        api_key: &str,
        model_id: String,
        messages: Vec<ChatMessage>,
    ) -> Result<ProviderOutcome, ProviderError> {
        let request = ChatCompletionRequest {
            model: model_id,
            messages,
            stream: Some(false),
        };

        let url = format!("{}/chat/completions", OPENROUTER_API_BASE);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("HTTP-Referer", APP_URL)
            .header("X-Title", APP_NAME)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            return Ok(ProviderOutcome::failure(format!(
                "OpenRouter error ({}): {}",
                status,
                api_error_message(error_text)
            )));
        }

        match response.json::<ChatCompletionResponse>().await {
            Ok(completion) => Ok(completion.into_outcome()),
            Err(e) => Ok(ProviderOutcome::failure(format!(
                "Failed to parse response: {}",
                e
            ))),
        }
    }
}

#[async_trait]
impl ProviderClient for OpenRouterClient {
    async fn invoke(&self, request: ProviderRequest) -> Result<ProviderOutcome, ProviderError> {
        let Some(api_key) = request.api_key else {
            return Ok(ProviderOutcome::failure(missing_key_message(Provider::OpenRouter)));
        };

        let messages = request.history.iter().map(ChatMessage::from).collect();
        tracing::debug!(model = %request.model, turns = request.history.len(), "OpenRouter request");
        self.chat_completion(&api_key, request.model, messages).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ProviderOutcome {
        serde_json::from_str::<ChatCompletionResponse>(json)
            .unwrap()
            .into_outcome()
    }

    #[test]
    fn test_chat_message_from_history() {
        let user = ChatMessage::from(&Message::user("Hello"));
        assert_eq!(user.role, "user");
        assert_eq!(user.content, "Hello");

        let assistant = ChatMessage::from(&Message::assistant("m", "Hi there"));
        assert_eq!(assistant.role, "assistant");
    }

    #[test]
    fn test_request_omits_unset_fields() {
        let request = ChatCompletionRequest {
            model: "m".to_string(),
            messages: vec![],
            stream: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("stream").is_none());
    }

    #[test]
    fn test_success_response() {
        let outcome = parse(
            r#"{"id":"gen-1","choices":[{"index":0,"message":{"role":"assistant","content":"hello"},"finish_reason":"stop"}],"created":1,"model":"m"}"#,
        );
        assert_eq!(outcome, ProviderOutcome::Success { text: "hello".to_string() });
    }

    #[test]
    fn test_error_in_body() {
        let outcome = parse(r#"{"error":{"code":429,"message":"Rate limit exceeded"}}"#);
        assert_eq!(outcome, ProviderOutcome::failure("API error: Rate limit exceeded"));
    }

    #[test]
    fn test_empty_choices() {
        assert_eq!(parse(r#"{"choices":[]}"#), ProviderOutcome::failure("No response"));
        assert_eq!(
            parse(r#"{"choices":[{"message":{"role":"assistant","content":"  "}}]}"#),
            ProviderOutcome::failure("No response")
        );
    }

    #[tokio::test]
    async fn test_missing_key_needs_no_network() {
        let client = OpenRouterClient::new(Duration::from_secs(1)).unwrap();
        let outcome = client
            .invoke(ProviderRequest {
                api_key: None,
                model: "m".to_string(),
                history: vec![Message::user("hi")],
                image: None,
            })
            .await
            .unwrap();
        match outcome {
            ProviderOutcome::Failure { message } => assert!(message.contains("Add your own OpenRouter API key")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
