pub mod form;
pub mod rules;
pub mod validators;
pub mod value;

pub use form::{FieldId, FormError, FormState};
pub use rules::{Check, Rule, RuleTable};
pub use value::Value;
