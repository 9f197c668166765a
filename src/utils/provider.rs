use super::catalog::{Model, Provider};
use super::error::ProviderError;
use super::gemini::GeminiClient;
use super::openrouter::OpenRouterClient;
use super::settings::{ApiKeys, Settings};
use super::types::{ImageAttachment, Message};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    /// `None` means the client has no key to send
    pub api_key: Option<String>,
    pub model: String,
    pub history: Vec<Message>,
    /// Attached to the latest user turn
    pub image: Option<ImageAttachment>,
}

/// What a provider said, decided once at the client boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderOutcome {
    Success { text: String },
    Failure { message: String },
}

impl ProviderOutcome {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait ProviderClient: Send + Sync {
    async fn invoke(&self, request: ProviderRequest) -> Result<ProviderOutcome, ProviderError>;
}

/// Picks the client and the credential for a catalog model.
#[derive(Clone)]
pub struct ProviderRouter {
    clients: HashMap<Provider, Arc<dyn ProviderClient>>,
    settings: Arc<Settings>,
}

impl ProviderRouter {
    pub fn new(settings: Settings) -> Result<Self, ProviderError> {
        let timeout = Duration::from_secs(settings.request_timeout_secs);
        let mut router = Self::empty(settings);
        router.register(Provider::Gemini, Arc::new(GeminiClient::new(timeout)?));
        router.register(Provider::OpenRouter, Arc::new(OpenRouterClient::new(timeout)?));
        Ok(router)
    }

    pub fn empty(settings: Settings) -> Self {
        Self {
            clients: HashMap::new(),
            settings: Arc::new(settings),
        }
    }

    pub fn register(&mut self, provider: Provider, client: Arc<dyn ProviderClient>) {
        self.clients.insert(provider, client);
    }

    pub fn client_for(&self, provider: Provider) -> Option<Arc<dyn ProviderClient>> {
        self.clients.get(&provider).cloned()
    }

    /// User key first, then the deployment default
    pub fn resolve_key(&self, provider: Provider, keys: &ApiKeys) -> Option<String> {
        keys.get(provider)
            .or_else(|| self.settings.default_key(provider))
            .map(str::to_string)
    }

    pub async fn invoke(
        &self,
        model: &Model,
        keys: &ApiKeys,
        history: Vec<Message>,
        image: Option<ImageAttachment>,
    ) -> Result<ProviderOutcome, ProviderError> {
        let Some(client) = self.client_for(model.provider) else {
            return Ok(ProviderOutcome::failure(format!(
                "No client configured for {}",
                model.provider_name()
            )));
        };

        let request = ProviderRequest {
            api_key: self.resolve_key(model.provider, keys),
            model: model.model.to_string(),
            history,
            // Only Gemini accepts inline images here
            image: image.filter(|_| model.provider == Provider::Gemini),
        };
        client.invoke(request).await
    }
}

/// Pull `error.message` out of a JSON error body, else return the body.
pub(crate) fn api_error_message(body: String) -> String {
    serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or(body)
}

pub(crate) fn missing_key_message(provider: Provider) -> String {
    format!(
        "No API key available. Add your own {} API key in Settings.",
        provider.name()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::catalog::find_model;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<ProviderRequest>>,
    }

    #[async_trait]
    impl ProviderClient for Recorder {
        async fn invoke(&self, request: ProviderRequest) -> Result<ProviderOutcome, ProviderError> {
            self.seen.lock().await.push(request);
            Ok(ProviderOutcome::Success {
                text: "ok".to_string(),
            })
        }
    }

    fn settings_with_default() -> Settings {
        Settings {
            default_openrouter_key: Some("shared".to_string()),
            ..Settings::default()
        }
    }

    #[test]
    fn test_resolve_key_prefers_user_key() {
        let router = ProviderRouter::empty(settings_with_default());
        let keys = ApiKeys::new("", "mine");
        assert_eq!(router.resolve_key(Provider::OpenRouter, &keys).as_deref(), Some("mine"));
        assert_eq!(
            router.resolve_key(Provider::OpenRouter, &ApiKeys::default()).as_deref(),
            Some("shared")
        );
        assert_eq!(router.resolve_key(Provider::Gemini, &ApiKeys::default()), None);
    }

    #[tokio::test]
    async fn test_invoke_routes_by_provider() {
        let gemini = Arc::new(Recorder::default());
        let openrouter = Arc::new(Recorder::default());
        let mut router = ProviderRouter::empty(settings_with_default());
        router.register(Provider::Gemini, gemini.clone());
        router.register(Provider::OpenRouter, openrouter.clone());

        let image = ImageAttachment::from_bytes("a.png", &[0, 0, 0]);
        let r1 = find_model("deepseek-r1").unwrap();
        router
            .invoke(r1, &ApiKeys::default(), vec![Message::user("hi")], image.clone())
            .await
            .unwrap();
        let flash = find_model("gemini-2.5-flash").unwrap();
        router
            .invoke(flash, &ApiKeys::default(), vec![Message::user("hi")], image.clone())
            .await
            .unwrap();

        let seen = openrouter.seen.lock().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].model, "deepseek/deepseek-r1:free");
        assert_eq!(seen[0].api_key.as_deref(), Some("shared"));
        assert!(seen[0].image.is_none());

        let seen = gemini.seen.lock().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].image, image);
    }

    #[tokio::test]
    async fn test_invoke_without_client_is_failure() {
        let router = ProviderRouter::empty(Settings::default());
        let model = find_model("gpt-oss-20b").unwrap();
        let outcome = router
            .invoke(model, &ApiKeys::default(), Vec::new(), None)
            .await
            .unwrap();
        assert!(matches!(outcome, ProviderOutcome::Failure { .. }));
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error":{"code":429,"message":"Rate limit exceeded"}}"#.to_string();
        assert_eq!(api_error_message(body), "Rate limit exceeded");
        assert_eq!(api_error_message("Bad Gateway".to_string()), "Bad Gateway");
    }
}
