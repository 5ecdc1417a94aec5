use crate::core::form::FieldId;
use indexmap::IndexMap;
use serde::Serialize;

/// Per-field messages plus the reserved `general` slot used for action failures.
///
/// A key is only present while its message is non-empty.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorState {
    fields: IndexMap<FieldId, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    general: Option<String>,
}

impl ErrorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_error(&mut self, id: impl Into<FieldId>, message: impl Into<String>) {
        let id = id.into();
        let message = message.into();
        if message.is_empty() {
            self.fields.shift_remove(&id);
        } else {
            self.fields.insert(id, message);
        }
    }

    pub fn clear_error(&mut self, id: &str) {
        self.fields.shift_remove(id);
    }

    pub fn error(&self, id: &str) -> Option<&str> {
        self.fields.get(id).map(String::as_str)
    }

    pub fn set_general(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.general = (!message.is_empty()).then_some(message);
    }

    pub fn general(&self) -> Option<&str> {
        self.general.as_deref()
    }

    /// The field the presentation layer should focus or scroll to.
    pub fn first_invalid_field(&self) -> Option<&str> {
        self.fields.keys().next().map(String::as_str)
    }

    pub fn field_errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn clear(&mut self) {
        self.fields.clear();
        self.general = None;
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.general.is_none()
    }

    pub fn len(&self) -> usize {
        self.fields.len() + usize::from(self.general.is_some())
    }
}
