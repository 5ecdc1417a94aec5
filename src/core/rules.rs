//! Declarative rule table: field -> ordered validator list.

use crate::core::form::{FieldId, FormState};
use crate::core::validators::{self, FieldError, FieldResult};
use crate::core::value::Value;
use crate::state::validation::ErrorState;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum Check {
    Required,
    Email,
    Phone,
    CountryCode,
    Password,
    MinLength { min: usize },
    /// Must equal the current value of another field.
    Matches { field: FieldId },
    VerificationCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(flatten)]
    pub check: Check,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Rule {
    pub fn new(check: Check) -> Self {
        Self {
            check,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn required(message: impl Into<String>) -> Self {
        Self::new(Check::Required).with_message(message)
    }

    pub fn email(message: impl Into<String>) -> Self {
        Self::new(Check::Email).with_message(message)
    }

    pub fn phone(message: impl Into<String>) -> Self {
        Self::new(Check::Phone).with_message(message)
    }

    pub fn country_code(message: impl Into<String>) -> Self {
        Self::new(Check::CountryCode).with_message(message)
    }

    pub fn password(message: impl Into<String>) -> Self {
        Self::new(Check::Password).with_message(message)
    }

    pub fn min_length(min: usize, message: impl Into<String>) -> Self {
        Self::new(Check::MinLength { min }).with_message(message)
    }

    pub fn matches(field: impl Into<FieldId>, message: impl Into<String>) -> Self {
        Self::new(Check::Matches {
            field: field.into(),
        })
        .with_message(message)
    }

    pub fn verification_code(message: impl Into<String>) -> Self {
        Self::new(Check::VerificationCode).with_message(message)
    }

    pub fn is_required(&self) -> bool {
        self.check == Check::Required
    }

    fn apply(&self, value: &Value, form: &FormState) -> FieldResult {
        if self.check == Check::Required {
            return validators::validate_required(value);
        }
        let Some(text) = value.as_text() else {
            return Err(FieldError::InvalidFormat);
        };
        match &self.check {
            Check::Required => Ok(()),
            Check::Email => validators::validate_email(text),
            Check::Phone => validators::validate_phone(text),
            Check::CountryCode => validators::validate_country_code(text),
            Check::Password => validators::validate_password(text),
            Check::MinLength { min } => validators::validate_min_length(text, *min),
            Check::Matches { field } => {
                validators::validate_confirmation(text, form.text(field).unwrap_or_default())
            }
            Check::VerificationCode => validators::validate_verification_code(text),
        }
    }

    fn message_for(&self, error: FieldError) -> String {
        self.message.clone().unwrap_or_else(|| error.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleTable {
    fields: IndexMap<FieldId, Vec<Rule>>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, id: impl Into<FieldId>, rules: Vec<Rule>) -> Self {
        self.fields.insert(id.into(), rules);
        self
    }

    pub fn rules_for(&self, id: &str) -> Option<&[Rule]> {
        self.fields.get(id).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Runs one field's rules in order and returns the first failure message.
///
/// Blank values only go through `required` rules, so an empty field is never
/// reported twice and optional fields may stay empty.
pub fn validate_field(form: &FormState, rules: &RuleTable, id: &str) -> Option<String> {
    let rules = rules.rules_for(id)?;
    let blank = Value::default();
    let value = form.get(id).unwrap_or(&blank);
    let skip_non_required = value.is_blank();

    rules
        .iter()
        .filter(|rule| !skip_non_required || rule.is_required())
        .find_map(|rule| rule.apply(value, form).err().map(|err| rule.message_for(err)))
}

/// Whole-form aggregation. An empty result means the form is valid.
pub fn validate_form(form: &FormState, rules: &RuleTable) -> ErrorState {
    let mut errors = ErrorState::new();
    for (id, _) in rules.iter() {
        if let Some(message) = validate_field(form, rules, id) {
            errors.set_error(id, message);
        }
    }
    errors
}
