//! Model selection and catalog from TOML (`[models]` section)

use crate::config::validation::{ConfigIssue, ConfigIssueCode};
use consensus_domain::{ModelCatalog, ModelId, ModelInfo};
use serde::{Deserialize, Serialize};

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileModelEntry {
    pub id: String,
    pub name: Option<String>,
    pub provider: Option<String>,
}

/// Model configuration from TOML
///
/// # Example
///
/// ```toml
/// [models]
/// selected = ["openai/gpt-4o", "anthropic/claude-3.5-sonnet", "google/gemini-pro-1.5"]
///
/// [[models.catalog]]
/// id = "qwen/qwen-2.5-72b-instruct"
/// name = "Qwen 2.5 72B"
/// provider = "Qwen"
/// ```
///
/// A non-empty `catalog` replaces the built-in catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    /// Models queried when none are given on the command line
    pub selected: Vec<String>,
    /// Replacement model catalog
    pub catalog: Vec<FileModelEntry>,
}

impl FileModelsConfig {
    /// Parse `selected`, collecting issues for blank and duplicate ids.
    pub fn parse_selected(&self) -> (Vec<ModelId>, Vec<ConfigIssue>) {
        parse_model_list("models.selected", self.selected.iter().map(String::as_str))
    }

    /// Build the effective catalog, collecting issues for blank ids.
    pub fn parse_catalog(&self) -> (ModelCatalog, Vec<ConfigIssue>) {
        if self.catalog.is_empty() {
            return (ModelCatalog::builtin(), Vec::new());
        }

        let mut issues = Vec::new();
        let mut entries = Vec::with_capacity(self.catalog.len());
        for entry in &self.catalog {
            let Ok(id) = ModelId::new(&entry.id) else {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyModelName {
                        field: "models.catalog.id".to_string(),
                    },
                    "models.catalog: model id cannot be empty",
                ));
                continue;
            };
            let provider = entry
                .provider
                .clone()
                .or_else(|| id.provider_prefix().map(str::to_string))
                .unwrap_or_default();
            let name = entry.name.clone().unwrap_or_else(|| id.to_string());
            entries.push(ModelInfo::new(id, name, provider));
        }

        (ModelCatalog::new(entries), issues)
    }
}

/// Parse a list of model ids, dropping blanks and duplicates.
pub fn parse_model_list<'a>(
    field: &str,
    values: impl IntoIterator<Item = &'a str>,
) -> (Vec<ModelId>, Vec<ConfigIssue>) {
    let mut models: Vec<ModelId> = Vec::new();
    let mut issues = Vec::new();

    for value in values {
        let Ok(id) = ModelId::new(value) else {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyModelName {
                    field: field.to_string(),
                },
                format!("{field}: model id cannot be empty"),
            ));
            continue;
        };
        if models.contains(&id) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::DuplicateModel {
                    field: field.to_string(),
                    model: id.to_string(),
                },
                format!("{field}: '{id}' listed more than once, ignoring duplicate"),
            ));
            continue;
        }
        models.push(id);
    }

    (models, issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::validation::Severity;

    #[test]
    fn test_parse_selected_drops_blank_and_duplicates() {
        let config = FileModelsConfig {
            selected: vec![
                "openai/gpt-4o".to_string(),
                " ".to_string(),
                "openai/gpt-4o".to_string(),
                "google/gemini-pro-1.5".to_string(),
            ],
            ..Default::default()
        };

        let (models, issues) = config.parse_selected();
        assert_eq!(models.len(), 2);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues[1].severity, Severity::Warning);
    }

    #[test]
    fn test_empty_catalog_uses_builtin() {
        let (catalog, issues) = FileModelsConfig::default().parse_catalog();
        assert_eq!(catalog, ModelCatalog::builtin());
        assert!(issues.is_empty());
    }

    #[test]
    fn test_custom_catalog_fills_gaps() {
        let toml_str = r#"
[[catalog]]
id = "qwen/qwen-2.5-72b-instruct"
name = "Qwen 2.5 72B"
provider = "Qwen"

[[catalog]]
id = "local-llama"
"#;
        let config: FileModelsConfig = toml::from_str(toml_str).unwrap();
        let (catalog, issues) = config.parse_catalog();
        assert!(issues.is_empty());
        assert_eq!(catalog.models().len(), 2);

        let local = ModelId::new("local-llama").unwrap();
        assert_eq!(catalog.display_name(&local), "local-llama");
        assert_eq!(catalog.get(&local).unwrap().provider, "");
    }
}
