use crate::core::form::{FieldId, FormState};
use crate::core::rules::{Check, Rule, RuleTable};
use crate::core::value::Value;
use crate::runtime::navigation::Route;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_REDIRECT_DELAY_MS: u64 = 1000;
pub const DEFAULT_REDIRECT_ERROR: &str = "Error redirecting. Please try again.";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid screen config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("field `{field}` must match unknown field `{target}`")]
    UnknownMatchTarget { field: FieldId, target: FieldId },
    #[error("screen config declares no fields")]
    NoFields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Toggle,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldConfig {
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl FieldConfig {
    pub fn text(rules: Vec<Rule>) -> Self {
        Self {
            kind: FieldKind::Text,
            rules,
        }
    }

    pub fn toggle(rules: Vec<Rule>) -> Self {
        Self {
            kind: FieldKind::Toggle,
            rules,
        }
    }

    fn initial_value(&self) -> Value {
        match self.kind {
            FieldKind::Text => Value::Text(String::new()),
            FieldKind::Toggle => Value::Bool(false),
        }
    }
}

/// Everything a screen needs besides its action: fields and their rules,
/// where to go after success, and the banners it shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenConfig {
    pub destination: Route,
    #[serde(default = "default_redirect_delay_ms")]
    pub redirect_delay_ms: u64,
    pub success_message: String,
    /// Banner shown when validation blocks the submit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_message: Option<String>,
    /// Banner shown when the action fails; `{message}` is replaced by the failure text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
    #[serde(default = "default_redirect_error")]
    pub redirect_error_message: String,
    #[serde(default)]
    pub carousel: bool,
    pub fields: IndexMap<FieldId, FieldConfig>,
}

fn default_redirect_delay_ms() -> u64 {
    DEFAULT_REDIRECT_DELAY_MS
}

fn default_redirect_error() -> String {
    DEFAULT_REDIRECT_ERROR.to_string()
}

impl ScreenConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(source)?;
        config.check()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&source)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn check(&self) -> Result<(), ConfigError> {
        if self.fields.is_empty() {
            return Err(ConfigError::NoFields);
        }
        for (field, config) in &self.fields {
            for rule in &config.rules {
                if let Check::Matches { field: target } = &rule.check
                    && !self.fields.contains_key(target)
                {
                    return Err(ConfigError::UnknownMatchTarget {
                        field: field.clone(),
                        target: target.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn rules(&self) -> RuleTable {
        self.fields
            .iter()
            .fold(RuleTable::new(), |table, (id, config)| {
                table.field(id.clone(), config.rules.clone())
            })
    }

    pub fn initial_form(&self) -> FormState {
        self.fields
            .iter()
            .map(|(id, config)| (id.clone(), config.initial_value()))
            .collect()
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    pub fn failure_notice(&self, message: &str) -> Option<String> {
        self.failure_message
            .as_ref()
            .map(|template| template.replace("{message}", message))
    }
}
