use serde::Serialize;
use std::collections::BTreeMap;
use validator::ValidationErrors;

use crate::web::WebError;

/// Per-field validation messages, keyed by the input field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Error bag holding a single message
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[inline]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Total number of messages across all fields
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// Merges `other`, skipping fields that already carry errors
    pub fn merge_unreported(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_insert(messages);
        }
    }

    pub fn first_message(&self) -> Option<&str> {
        self.0
            .values()
            .flat_map(|messages| messages.iter())
            .map(String::as_str)
            .next()
    }

    /// Summary line in the form `"<first message> (and N more errors)"`.
    pub fn summary(&self) -> String {
        let first = self
            .first_message()
            .unwrap_or("The given data was invalid.")
            .to_string();
        match self.len().saturating_sub(1) {
            0 => first,
            1 => format!("{first} (and 1 more error)"),
            n => format!("{first} (and {n} more errors)"),
        }
    }

    /// `Ok(())` when empty, otherwise a 422 web error carrying the bag
    pub fn into_result(self) -> Result<(), WebError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(WebError::Validation(self))
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut bag = FieldErrors::new();
        for (field, field_errors) in errors.field_errors() {
            let field = field.to_string();
            for e in field_errors.iter() {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("The {} field is invalid.", field.replace('_', " ")));
                bag.add(field.clone(), message);
            }
        }
        bag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn test_summary_counts_remaining_messages() {
        let mut errors = FieldErrors::new();
        assert_eq!(errors.summary(), "The given data was invalid.");

        errors.add("name", "The name field is required.");
        assert_eq!(errors.summary(), "The name field is required.");

        errors.add("price", "The price field must be at least 0.");
        assert_eq!(
            errors.summary(),
            "The name field is required. (and 1 more error)"
        );

        errors.add("price", "The price field must be a number.");
        assert_eq!(
            errors.summary(),
            "The name field is required. (and 2 more errors)"
        );
    }

    #[test]
    fn test_merge_unreported_keeps_first_report() {
        let mut errors = FieldErrors::single("name", "The name field must be a string.");
        let mut rules = FieldErrors::single("name", "The name field is required.");
        rules.add("price", "The price field is required.");

        errors.merge_unreported(rules);
        assert_eq!(
            errors.get("name"),
            Some(&["The name field must be a string.".to_string()][..])
        );
        assert!(errors.contains("price"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_from_validation_errors_keeps_messages() {
        let mut errors = ValidationErrors::new();
        let mut e = ValidationError::new("range");
        e.message = Some("The stock field must be at least 0.".into());
        errors.add("stock", e);
        errors.add("name", ValidationError::new("length"));

        let bag = FieldErrors::from(errors);
        assert_eq!(
            bag.get("stock"),
            Some(&["The stock field must be at least 0.".to_string()][..])
        );
        assert_eq!(
            bag.get("name"),
            Some(&["The name field is invalid.".to_string()][..])
        );
    }

    #[test]
    fn test_into_result() {
        assert!(FieldErrors::new().into_result().is_ok());
        let err = FieldErrors::single("name", "required").into_result();
        assert!(matches!(err, Err(WebError::Validation(_))));
    }
}
