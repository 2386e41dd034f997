//! Option validation engine.

use serde::Serialize;
use serde_json::Value;

use crate::error::ValidationError;
use crate::options::schema::{Schema, ValueType};
use crate::transport::Payload;

/// Options that passed [`validate`] against a schema.
///
/// Holds exactly the caller's input; it cannot be modified after validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidatedPayload(Payload);

impl ValidatedPayload {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Payload {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_inner(self) -> Payload {
        self.0
    }
}

/// Validate `input` against `schema`.
///
/// Checks run in a fixed order and the first failure is returned:
/// undeclared options, then missing required options, then each supplied
/// option's type and value rule in schema order.
///
/// # Errors
///
/// Returns the [`ValidationError`] describing the first violation.
///
/// # Example
///
/// ```
/// use gitlabapi::options::{validate, OptionSchema, Schema};
/// use serde_json::json;
///
/// const SCHEMA: Schema = Schema::new(&[OptionSchema::defined("search")]);
///
/// let input = json!({"search": "sprint"}).as_object().cloned().unwrap();
/// let validated = validate(&SCHEMA, input).unwrap();
/// assert_eq!(validated.get("search"), Some(&json!("sprint")));
/// ```
pub fn validate(schema: &Schema, input: Payload) -> Result<ValidatedPayload, ValidationError> {
    if let Some(unknown) = input.keys().find(|key| !schema.contains(key)) {
        return Err(ValidationError::UnknownOption {
            option: unknown.clone(),
            defined: schema.names(),
        });
    }

    if let Some(missing) = schema
        .options()
        .iter()
        .find(|o| o.required && !input.contains_key(o.name))
    {
        return Err(ValidationError::MissingRequiredOption {
            option: missing.name,
        });
    }

    for option in schema.options() {
        let Some(value) = input.get(option.name) else {
            continue;
        };

        if let Some(types) = option.allowed_types {
            let actual = ValueType::of(value);
            if !types.contains(&actual) {
                return Err(ValidationError::TypeMismatch {
                    option: option.name.to_string(),
                    expected: types.to_vec(),
                    actual,
                });
            }
        }

        if let Some(rule) = option.allowed_values {
            if !rule.allows(value) {
                return Err(ValidationError::InvalidValue {
                    option: option.name.to_string(),
                    value: value.clone(),
                    reason: rule.describe(),
                });
            }
        }
    }

    Ok(ValidatedPayload(input))
}
