use crate::core::value::Value;
use indexmap::IndexMap;
use serde::Serialize;

pub type FieldId = String;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormError {
    #[error("unknown field: {0}")]
    UnknownField(FieldId),
    #[error("field {0} holds a different kind of value")]
    KindMismatch(FieldId),
}

/// Current values of every input on a screen, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormState {
    values: IndexMap<FieldId, Value>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, id: impl Into<FieldId>, value: impl Into<Value>) -> Self {
        self.values.insert(id.into(), value.into());
        self
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.values.get(id)
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.get(id).and_then(Value::as_text)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }

    /// Replaces the value of a field that already exists. The key set and
    /// each field's kind (text or toggle) are fixed per screen.
    pub fn set(&mut self, id: &str, value: impl Into<Value>) -> Result<(), FormError> {
        let Some(slot) = self.values.get_mut(id) else {
            return Err(FormError::UnknownField(id.to_string()));
        };
        let value = value.into();
        if !slot.same_kind(&value) {
            return Err(FormError::KindMismatch(id.to_string()));
        }
        *slot = value;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<FieldId>, V: Into<Value>> FromIterator<(K, V)> for FormState {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
