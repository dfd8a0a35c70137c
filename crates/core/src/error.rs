use std::fmt;

use serde::Serialize;

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a validation failure on a single field.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::default();
        errors.push(field, message);
        CoreError::Validation(errors)
    }
}

/// A single field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Ordered list of field-level validation messages, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Record a message for `field`. A field that already has a message keeps it.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        if self.0.iter().any(|e| e.field == field) {
            return;
        }
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Message recorded for `field`, if any.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    /// Keeps the first message of each failing field. Fields are sorted by
    /// name so the output does not depend on hash map iteration order.
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<(String, String)> = errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, errs)| {
                errs.first().map(|err| {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", err.code));
                    (field.to_string(), message)
                })
            })
            .collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let mut out = FieldErrors::default();
        for (field, message) in fields {
            out.push(field, message);
        }
        out
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CoreError::Validation(errors.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_first_message_per_field() {
        let mut errors = FieldErrors::default();
        errors.push("name", "too long");
        errors.push("name", "empty");
        errors.push("color", "bad hex");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.message_for("name"), Some("too long"));
        assert_eq!(errors.message_for("color"), Some("bad hex"));
    }

    #[test]
    fn converts_from_validator_errors_sorted_by_field() {
        let mut errors = validator::ValidationErrors::new();
        let mut color = validator::ValidationError::new("hex_color");
        color.message = Some("bad hex".into());
        errors.add("color", color);
        errors.add("name", validator::ValidationError::new("blank"));

        let fields = FieldErrors::from(errors);
        let names: Vec<&str> = fields.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(names, vec!["color", "name"]);
        assert_eq!(fields.message_for("color"), Some("bad hex"));
        assert_eq!(fields.message_for("name"), Some("Invalid value (blank)"));
    }

    #[test]
    fn display_joins_fields() {
        let mut errors = FieldErrors::default();
        errors.push("name", "required");
        errors.push("description", "too long");
        assert_eq!(errors.to_string(), "name: required; description: too long");
    }

    #[test]
    fn serializes_as_list_of_objects() {
        let err = CoreError::invalid_field("name", "required");
        let CoreError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "field": "name", "message": "required" }])
        );
    }
}
