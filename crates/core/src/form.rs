//! Discriminated order-form validation.
//!
//! An order carries either a free-text `description` (volume type `single`)
//! or an uploaded `document` plus a `quantity` (volume type `multiple`).
//! This module owns the rule table deciding which fields are required and
//! which are forbidden for each discriminator value:
//!
//! | volume type | description | document | quantity |
//! |---|---|---|---|
//! | `single` | required | forbidden (form-level error) | forbidden (form-level error) |
//! | `multiple` | forbidden | required | required, >= 1 |
//!
//! The rules are authoritative: whatever the UI showed or hid, validation
//! applies the full table. All violations are collected in one pass.
//!
//! Both web binaries validate through this module - the site when creating
//! orders, the admin panel when editing them - so the rule table exists in
//! exactly one place.

use std::str::FromStr;

use crate::types::VolumeType;

/// Maximum length of an order name.
pub const MAX_NAME_LENGTH: usize = 255;

/// Raw order-form input, before validation.
///
/// String fields hold the submitted text verbatim (empty string when the
/// field was absent). `document` is the file name accompanying the
/// submission, or the already-stored file name when editing an existing
/// order.
#[derive(Debug, Clone, Default)]
pub struct OrderInput {
    pub name: String,
    pub volume_type: String,
    pub description: String,
    pub document: Option<String>,
    pub quantity: String,
}

/// A validated order payload.
///
/// Exactly one of `description` / `quantity` is populated, chosen by
/// `volume_type`. Storing the document itself is the caller's concern; a
/// `Multiple` payload is only produced when a document accompanied the
/// input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOrder {
    pub name: String,
    pub volume_type: VolumeType,
    pub description: Option<String>,
    pub quantity: Option<i32>,
}

/// Field- and form-level validation errors.
///
/// Field errors are keyed by field name so templates can render each message
/// next to its input. Form errors apply to the submission as a whole.
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
    field_errors: Vec<(&'static str, String)>,
    form_errors: Vec<String>,
}

impl ValidationErrors {
    /// Create an empty error set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            field_errors: Vec::new(),
            form_errors: Vec::new(),
        }
    }

    /// Attach an error to a specific field.
    pub fn add_field(&mut self, field: &'static str, message: impl Into<String>) {
        self.field_errors.push((field, message.into()));
    }

    /// Attach an error to the form as a whole.
    pub fn add_form(&mut self, message: impl Into<String>) {
        self.form_errors.push(message.into());
    }

    /// Whether no errors were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.field_errors.is_empty() && self.form_errors.is_empty()
    }

    /// Messages attached to the given field, in insertion order.
    #[must_use]
    pub fn field(&self, name: &str) -> Vec<&str> {
        self.field_errors
            .iter()
            .filter(|(field, _)| *field == name)
            .map(|(_, msg)| msg.as_str())
            .collect()
    }

    /// Whether the given field has at least one error.
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.field_errors.iter().any(|(field, _)| *field == name)
    }

    /// Form-level messages, in insertion order.
    #[must_use]
    pub fn form(&self) -> &[String] {
        &self.form_errors
    }

    /// Total number of recorded errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.field_errors.len() + self.form_errors.len()
    }
}

/// Resolve which volume type a form render should treat as current.
///
/// Priority: a non-empty submitted value, then the explicit initial value,
/// then the value on an existing record being edited. A submitted value that
/// does not parse stops resolution (no conditional fields are shown);
/// validation still reports it as a field error.
#[must_use]
pub fn resolve_volume_type(
    submitted: Option<&str>,
    initial: Option<VolumeType>,
    instance: Option<VolumeType>,
) -> Option<VolumeType> {
    match submitted {
        Some(raw) if !raw.is_empty() => VolumeType::from_str(raw).ok(),
        _ => initial.or(instance),
    }
}

/// Validate raw order input against the rule table.
///
/// All applicable violations are reported together; validation never stops
/// at the first error. Conditional rules only apply once the discriminator
/// parses - a missing or invalid `volume_type` is itself a field error.
///
/// # Errors
///
/// Returns the collected [`ValidationErrors`] when any rule is violated.
pub fn validate(input: &OrderInput) -> Result<ValidatedOrder, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = input.name.trim();
    if name.is_empty() {
        errors.add_field("name", "Name is required.");
    } else if name.len() > MAX_NAME_LENGTH {
        errors.add_field(
            "name",
            format!("Name must be at most {MAX_NAME_LENGTH} characters."),
        );
    }

    let volume_type = match input.volume_type.trim() {
        "" => {
            errors.add_field("volume_type", "Volume type is required.");
            None
        }
        raw => match VolumeType::from_str(raw) {
            Ok(vt) => Some(vt),
            Err(_) => {
                errors.add_field("volume_type", "Select a valid volume type.");
                None
            }
        },
    };

    let description = input.description.trim();
    let quantity_raw = input.quantity.trim();
    let quantity = parse_quantity(quantity_raw);

    match volume_type {
        Some(VolumeType::Single) => {
            if description.is_empty() {
                errors.add_field("description", "Description is required for a single order.");
            }
            // Deliberately a non-field error: the offending inputs are the
            // ones the form was not asking for.
            if input.document.is_some() || !quantity_raw.is_empty() {
                errors.add_form("A single order does not take a document or quantity.");
            }
        }
        Some(VolumeType::Multiple) => {
            if input.document.is_none() {
                errors.add_field("document", "A document is required for a multiple order.");
            }
            match quantity {
                Ok(Some(q)) if q >= 1 => {}
                Ok(_) => errors.add_field(
                    "quantity",
                    "Quantity is required and must be at least 1.",
                ),
                Err(()) => errors.add_field("quantity", "Quantity must be a whole number."),
            }
            if !description.is_empty() {
                errors.add_field(
                    "description",
                    "A multiple order does not take a description.",
                );
            }
        }
        None => {}
    }

    // A None discriminator always records an error above.
    let (Some(volume_type), true) = (volume_type, errors.is_empty()) else {
        return Err(errors);
    };

    Ok(match volume_type {
        VolumeType::Single => ValidatedOrder {
            name: name.to_owned(),
            volume_type,
            description: Some(description.to_owned()),
            quantity: None,
        },
        VolumeType::Multiple => ValidatedOrder {
            name: name.to_owned(),
            volume_type,
            description: None,
            quantity: quantity.unwrap_or(None),
        },
    })
}

/// Parse a submitted quantity. Empty input is "absent" (`Ok(None)`);
/// non-numeric input is `Err(())`.
fn parse_quantity(raw: &str) -> Result<Option<i32>, ()> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i32>().map(Some).map_err(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_input() -> OrderInput {
        OrderInput {
            name: "Report".to_owned(),
            volume_type: "single".to_owned(),
            description: "Q1 summary".to_owned(),
            document: None,
            quantity: String::new(),
        }
    }

    fn multiple_input() -> OrderInput {
        OrderInput {
            name: "Parts batch".to_owned(),
            volume_type: "multiple".to_owned(),
            description: String::new(),
            document: Some("parts.pdf".to_owned()),
            quantity: "5".to_owned(),
        }
    }

    #[test]
    fn test_valid_single() {
        let order = validate(&single_input()).unwrap();
        assert_eq!(order.volume_type, VolumeType::Single);
        assert_eq!(order.description.as_deref(), Some("Q1 summary"));
        assert_eq!(order.quantity, None);
    }

    #[test]
    fn test_valid_multiple() {
        let order = validate(&multiple_input()).unwrap();
        assert_eq!(order.volume_type, VolumeType::Multiple);
        assert_eq!(order.description, None);
        assert_eq!(order.quantity, Some(5));
    }

    #[test]
    fn test_name_required() {
        let mut input = single_input();
        input.name = "   ".to_owned();
        let errors = validate(&input).unwrap_err();
        assert!(errors.has_field("name"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_name_too_long() {
        let mut input = single_input();
        input.name = "x".repeat(MAX_NAME_LENGTH + 1);
        let errors = validate(&input).unwrap_err();
        assert!(errors.has_field("name"));
    }

    #[test]
    fn test_volume_type_required() {
        let mut input = single_input();
        input.volume_type = String::new();
        let errors = validate(&input).unwrap_err();
        assert!(errors.has_field("volume_type"));
    }

    #[test]
    fn test_volume_type_invalid() {
        let mut input = single_input();
        input.volume_type = "bulk".to_owned();
        let errors = validate(&input).unwrap_err();
        assert_eq!(errors.field("volume_type"), vec!["Select a valid volume type."]);
    }

    #[test]
    fn test_single_missing_description() {
        let mut input = single_input();
        input.description = String::new();
        let errors = validate(&input).unwrap_err();
        assert!(errors.has_field("description"));
    }

    #[test]
    fn test_single_with_document_is_form_error() {
        let mut input = single_input();
        input.document = Some("stray.pdf".to_owned());
        let errors = validate(&input).unwrap_err();
        assert!(!errors.has_field("document"));
        assert_eq!(errors.form().len(), 1);
    }

    #[test]
    fn test_single_with_quantity_is_form_error() {
        let mut input = single_input();
        input.quantity = "3".to_owned();
        let errors = validate(&input).unwrap_err();
        assert_eq!(errors.form().len(), 1);
        assert!(!errors.has_field("quantity"));
    }

    #[test]
    fn test_multiple_missing_document() {
        let mut input = multiple_input();
        input.document = None;
        let errors = validate(&input).unwrap_err();
        assert!(errors.has_field("document"));
    }

    #[test]
    fn test_multiple_missing_quantity() {
        let mut input = multiple_input();
        input.quantity = String::new();
        let errors = validate(&input).unwrap_err();
        assert!(errors.has_field("quantity"));
    }

    #[test]
    fn test_multiple_zero_quantity() {
        let mut input = multiple_input();
        input.quantity = "0".to_owned();
        let errors = validate(&input).unwrap_err();
        assert_eq!(
            errors.field("quantity"),
            vec!["Quantity is required and must be at least 1."]
        );
    }

    #[test]
    fn test_multiple_negative_quantity() {
        let mut input = multiple_input();
        input.quantity = "-2".to_owned();
        let errors = validate(&input).unwrap_err();
        assert!(errors.has_field("quantity"));
    }

    #[test]
    fn test_multiple_non_numeric_quantity() {
        let mut input = multiple_input();
        input.quantity = "lots".to_owned();
        let errors = validate(&input).unwrap_err();
        assert_eq!(errors.field("quantity"), vec!["Quantity must be a whole number."]);
    }

    #[test]
    fn test_multiple_with_description() {
        let mut input = multiple_input();
        input.description = "should not be here".to_owned();
        let errors = validate(&input).unwrap_err();
        assert!(errors.has_field("description"));
    }

    #[test]
    fn test_errors_collected_in_one_pass() {
        // Every multiple-order rule violated at once.
        let input = OrderInput {
            name: String::new(),
            volume_type: "multiple".to_owned(),
            description: "stray".to_owned(),
            document: None,
            quantity: "0".to_owned(),
        };
        let errors = validate(&input).unwrap_err();
        assert!(errors.has_field("name"));
        assert!(errors.has_field("document"));
        assert!(errors.has_field("quantity"));
        assert!(errors.has_field("description"));
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_invalid_discriminator_skips_conditional_rules() {
        let input = OrderInput {
            name: "Order".to_owned(),
            volume_type: "bulk".to_owned(),
            description: String::new(),
            document: None,
            quantity: String::new(),
        };
        let errors = validate(&input).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.has_field("volume_type"));
    }

    #[test]
    fn test_resolve_prefers_submitted_data() {
        let resolved = resolve_volume_type(
            Some("single"),
            Some(VolumeType::Multiple),
            Some(VolumeType::Multiple),
        );
        assert_eq!(resolved, Some(VolumeType::Single));
    }

    #[test]
    fn test_resolve_empty_submitted_falls_through() {
        let resolved = resolve_volume_type(Some(""), Some(VolumeType::Multiple), None);
        assert_eq!(resolved, Some(VolumeType::Multiple));
    }

    #[test]
    fn test_resolve_initial_over_instance() {
        let resolved =
            resolve_volume_type(None, Some(VolumeType::Single), Some(VolumeType::Multiple));
        assert_eq!(resolved, Some(VolumeType::Single));
    }

    #[test]
    fn test_resolve_instance_last() {
        let resolved = resolve_volume_type(None, None, Some(VolumeType::Multiple));
        assert_eq!(resolved, Some(VolumeType::Multiple));
    }

    #[test]
    fn test_resolve_unparseable_submitted_shows_nothing() {
        let resolved = resolve_volume_type(Some("bulk"), Some(VolumeType::Single), None);
        assert_eq!(resolved, None);
    }

    #[test]
    fn test_resolve_nothing() {
        assert_eq!(resolve_volume_type(None, None, None), None);
    }
}
