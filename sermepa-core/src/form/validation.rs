//! Form-driven validation of submitted values.
//!
//! The form description already carries every constraint (required flags,
//! maximum lengths, select options), so validation walks the form and checks
//! the value submitted for each element.

use sermepa_sdk::objects::form::{ConfigurationForm, FormElement, Widget, get_nested};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationErrorKind {
    #[error("field is required")]
    Required,
    #[error("value is longer than {max} characters")]
    TooLong { max: usize, actual: usize },
    #[error("value is not one of the available options")]
    NotAnOption,
    #[error("value must be a string")]
    NotAString,
}

/// A constraint violated by one submitted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{field}: {kind}")]
pub struct ValidationError {
    /// Dotted path of the field within the submitted value tree.
    pub field: String,
    #[serde(flatten)]
    pub kind: ValidationErrorKind,
}

/// Check `values` against every constraint declared in `form`.
///
/// Returns one error per offending field, in form order.
pub fn validate_configuration_form(form: &ConfigurationForm, values: &Value) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for element in &form.elements {
        validate_element(element, &form.parents, values, &mut errors);
    }
    errors
}

fn validate_element(
    element: &FormElement,
    container: &[String],
    values: &Value,
    errors: &mut Vec<ValidationError>,
) {
    let path = if element.parents.is_empty() {
        let mut path = container.to_vec();
        path.push(element.key.clone());
        path
    } else {
        element.parents.clone()
    };

    if let Widget::Fieldset { children } = &element.widget {
        for child in children {
            validate_element(child, &path, values, errors);
        }
        return;
    }

    let field = path.join(".");
    let submitted = match get_nested(values, &path) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => {
            errors.push(ValidationError {
                field,
                kind: ValidationErrorKind::NotAString,
            });
            return;
        }
    };

    if submitted.trim().is_empty() {
        if element.required {
            errors.push(ValidationError {
                field,
                kind: ValidationErrorKind::Required,
            });
        }
        return;
    }

    if let Some(max) = element.max_length() {
        let actual = submitted.chars().count();
        if actual > max {
            errors.push(ValidationError {
                field,
                kind: ValidationErrorKind::TooLong { max, actual },
            });
            return;
        }
    }

    if let Some(mut options) = element.option_values() {
        if !options.any(|option| option == submitted) {
            errors.push(ValidationError {
                field,
                kind: ValidationErrorKind::NotAnOption,
            });
        }
    }
}
