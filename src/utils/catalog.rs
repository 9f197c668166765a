use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    OpenRouter,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Gemini => "Google Gemini",
            Provider::OpenRouter => "OpenRouter",
        }
    }
}

/// A model the user can pick for comparison.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Model {
    pub id: &'static str,
    pub label: &'static str,
    pub provider: Provider,
    /// Identifier understood by the provider's API
    pub model: &'static str,
}

impl Model {
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Short glyph used in column headers
    pub fn badge(&self) -> &'static str {
        if self.id.contains("gemini") {
            "✦"
        } else if self.id.contains("deepseek") {
            "◆"
        } else if self.id.contains("llama") {
            "⚡"
        } else if self.id.contains("kimi") || self.id.contains("moonshot") {
            "★"
        } else if self.id.contains("qwen") {
            "▣"
        } else {
            "●"
        }
    }
}

const MODEL_CATALOG: &[Model] = &[
    Model {
        id: "gemini-2.5-flash",
        label: "Gemini 2.5 Flash",
        provider: Provider::Gemini,
        model: "gemini-2.5-flash",
    },
    Model {
        id: "gemini-2.5-pro",
        label: "Gemini 2.5 Pro",
        provider: Provider::Gemini,
        model: "gemini-2.5-pro",
    },
    Model {
        id: "deepseek-r1",
        label: "DeepSeek R1",
        provider: Provider::OpenRouter,
        model: "deepseek/deepseek-r1:free",
    },
    Model {
        id: "llama-3.3-70b-instruct",
        label: "Llama 3.3 70B Instruct",
        provider: Provider::OpenRouter,
        model: "meta-llama/llama-3.3-70b-instruct:free",
    },
    Model {
        id: "moonshot-kimi-k2",
        label: "Kimi K2",
        provider: Provider::OpenRouter,
        model: "moonshotai/kimi-k2:free",
    },
    Model {
        id: "qwen-2.5-72b-instruct",
        label: "Qwen 2.5 72B Instruct",
        provider: Provider::OpenRouter,
        model: "qwen/qwen-2.5-72b-instruct:free",
    },
    Model {
        id: "mistral-small-3.2",
        label: "Mistral Small 3.2",
        provider: Provider::OpenRouter,
        model: "mistralai/mistral-small-3.2-24b-instruct:free",
    },
    Model {
        id: "gpt-oss-20b",
        label: "GPT-OSS 20B",
        provider: Provider::OpenRouter,
        model: "openai/gpt-oss-20b:free",
    },
];

pub fn catalog() -> &'static [Model] {
    MODEL_CATALOG
}

pub fn find_model(id: &str) -> Option<&'static Model> {
    MODEL_CATALOG.iter().find(|m| m.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_are_unique() {
        let ids: HashSet<_> = catalog().iter().map(|m| m.id).collect();
        assert_eq!(ids.len(), catalog().len());
    }

    #[test]
    fn test_find_model() {
        let model = find_model("deepseek-r1").unwrap();
        assert_eq!(model.provider, Provider::OpenRouter);
        assert_eq!(model.provider_name(), "OpenRouter");
        assert!(find_model("does-not-exist").is_none());
    }

    #[test]
    fn test_provider_serializes_lowercase() {
        let json = serde_json::to_string(&Provider::OpenRouter).unwrap();
        assert_eq!(json, "\"openrouter\"");
    }
}
