//! Model identifiers and the model catalog

use super::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque gateway model identifier (Value Object)
///
/// The id is whatever the completion gateway understands, e.g.
/// `"openai/gpt-4o"` or `"anthropic/claude-3.5-sonnet"`. The only local
/// validation is that it is not blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(String);

impl ModelId {
    /// Create a new model id, rejecting blank input
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidModel(id));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Provider segment of a namespaced id
    ///
    /// `"openai/gpt-4o"` -> `Some("openai")`, `"gpt-4o"` -> `None`
    pub fn provider_prefix(&self) -> Option<&str> {
        self.0
            .split_once('/')
            .map(|(provider, _)| provider)
            .filter(|p| !p.is_empty())
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ModelId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ModelId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ModelId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ModelId::new(s).map_err(serde::de::Error::custom)
    }
}

/// Catalog entry describing a selectable model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: ModelId,
    /// Human-readable name
    pub name: String,
    /// Provider label used for provider-agreement insights
    pub provider: String,
}

impl ModelInfo {
    pub fn new(id: ModelId, name: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            provider: provider.into(),
        }
    }
}

/// Ordered catalog of known models
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCatalog {
    models: Vec<ModelInfo>,
}

/// (id, name, provider) triples for [`ModelCatalog::builtin`]
const BUILTIN_MODELS: &[(&str, &str, &str)] = &[
    ("openai/gpt-4o", "GPT-4o", "OpenAI"),
    ("openai/gpt-4o-mini", "GPT-4o mini", "OpenAI"),
    ("anthropic/claude-3.5-sonnet", "Claude 3.5 Sonnet", "Anthropic"),
    ("anthropic/claude-3-haiku", "Claude 3 Haiku", "Anthropic"),
    ("google/gemini-pro-1.5", "Gemini 1.5 Pro", "Google"),
    ("google/gemini-flash-1.5", "Gemini 1.5 Flash", "Google"),
    ("meta-llama/llama-3.1-70b-instruct", "Llama 3.1 70B", "Meta"),
    ("mistralai/mistral-large", "Mistral Large", "Mistral"),
    ("deepseek/deepseek-chat", "DeepSeek V3", "DeepSeek"),
    ("x-ai/grok-2", "Grok 2", "xAI"),
];

impl ModelCatalog {
    pub fn new(models: Vec<ModelInfo>) -> Self {
        Self { models }
    }

    /// Catalog of well-known gateway models
    pub fn builtin() -> Self {
        let models = BUILTIN_MODELS
            .iter()
            .filter_map(|(id, name, provider)| {
                ModelId::new(*id)
                    .ok()
                    .map(|id| ModelInfo::new(id, *name, *provider))
            })
            .collect();
        Self { models }
    }

    /// Default selection when the user does not pick models: one per provider
    pub fn default_selection(&self) -> Vec<ModelId> {
        let mut seen = Vec::new();
        let mut selection = Vec::new();
        for info in &self.models {
            if !seen.contains(&info.provider) {
                seen.push(info.provider.clone());
                selection.push(info.id.clone());
            }
        }
        selection
    }

    pub fn get(&self, id: &ModelId) -> Option<&ModelInfo> {
        self.models.iter().find(|m| &m.id == id)
    }

    /// Catalog name, falling back to the raw id
    pub fn display_name(&self, id: &ModelId) -> String {
        self.get(id)
            .map(|m| m.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Catalog provider, falling back to the id's namespace prefix
    pub fn provider_for(&self, id: &ModelId) -> Option<String> {
        self.get(id)
            .map(|m| m.provider.clone())
            .filter(|p| !p.is_empty())
            .or_else(|| id.provider_prefix().map(str::to_string))
    }

    pub fn models(&self) -> &[ModelInfo] {
        &self.models
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
