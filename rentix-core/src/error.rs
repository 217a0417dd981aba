use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Field-namespace to message mapping collected by the validation engine.
///
/// Keys are dot-qualified paths such as `Items[2].EquipmentID`. An empty map
/// means the rent is valid; the engine never short-circuits, so every
/// violation is present before the error is surfaced.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationError {
    fields: BTreeMap<String, String>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.insert(field.into(), message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(&self.fields) {
            Ok(body) => f.write_str(&body),
            Err(_) => f.write_str("validation failed"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Error taxonomy of the rent workflow.
///
/// Reservation failures are deliberately absent: they are demoted to
/// asynchronous compensation messages and never reach the caller.
#[derive(Debug, thiserror::Error)]
pub enum RentError {
    /// Client error, maps to 422. Never retried automatically.
    #[error("{0}")]
    Validation(ValidationError),

    /// A directly referenced entity is absent, maps to 404.
    #[error("{0} not found")]
    NotFound(String),

    /// A required synchronous dependency failed, maps to 500 with a
    /// generic message that does not leak the upstream detail.
    #[error("{0}")]
    Upstream(String),

    /// Persistence or other internal failure, maps to 500.
    #[error("{0}")]
    Internal(String),
}

impl From<ValidationError> for RentError {
    fn from(err: ValidationError) -> Self {
        RentError::Validation(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_renders_field_map() {
        let mut err = ValidationError::new();
        err.add("CustomerID", "invalid customer");
        err.add("Items[0].Qty", "this field must be greater than zero");

        let rendered = err.to_string();
        assert!(rendered.contains("\"CustomerID\":\"invalid customer\""));
        assert!(rendered.contains("Items[0].Qty"));
    }

    #[test]
    fn not_found_names_the_entity() {
        let err = RentError::NotFound("rent".into());
        assert_eq!(err.to_string(), "rent not found");
    }
}
