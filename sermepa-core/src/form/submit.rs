use crate::config::value_kind;
use sermepa_sdk::objects::form::get_nested;
use serde_json::{Map, Value};

/// Errors that can occur while applying submitted form values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("form has no `{0}` element")]
    MissingFieldset(String),
    #[error("no submitted values at `{0}`")]
    MissingValues(String),
    #[error("submitted value for `{field}` is {kind}, expected a string")]
    InvalidValue { field: String, kind: &'static str },
}

/// An object within the submitted value tree.
#[derive(Debug, Clone)]
pub struct SubmittedValues<'a> {
    path: Vec<String>,
    values: &'a Map<String, Value>,
}

impl<'a> SubmittedValues<'a> {
    /// Find the object at `path` within the full submitted value tree.
    pub fn locate(values: &'a Value, path: &[String]) -> Result<Self, SubmitError> {
        get_nested(values, path)
            .and_then(Value::as_object)
            .map(|values| Self {
                path: path.to_vec(),
                values,
            })
            .ok_or_else(|| SubmitError::MissingValues(path.join(".")))
    }

    /// The object under `key`.
    pub fn nested(&self, key: &str) -> Result<SubmittedValues<'a>, SubmitError> {
        let mut path = self.path.clone();
        path.push(key.to_owned());
        self.values
            .get(key)
            .and_then(Value::as_object)
            .map(|values| SubmittedValues {
                path: path.clone(),
                values,
            })
            .ok_or_else(|| SubmitError::MissingValues(path.join(".")))
    }

    /// The string submitted for `key`.
    ///
    /// A missing key or `null` reads as `""`, so a partially submitted form
    /// clears the fields it left out instead of keeping their previous
    /// values.
    pub fn string(&self, key: &str) -> Result<String, SubmitError> {
        match self.values.get(key) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            None | Some(Value::Null) => {
                tracing::debug!(field = %self.field_path(key), "field missing from submission");
                Ok(String::new())
            }
            Some(other) => Err(SubmitError::InvalidValue {
                field: self.field_path(key),
                kind: value_kind(other),
            }),
        }
    }

    fn field_path(&self, key: &str) -> String {
        self.path
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(key))
            .collect::<Vec<_>>()
            .join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_locate_and_read() {
        let tree = json!({
            "plugin_form": {
                "sermepa": {
                    "merchant_code": "123",
                    "merchant_currency": 978,
                    "merchant_name": null,
                    "bad": [1],
                },
            },
        });
        let root = SubmittedValues::locate(&tree, &["plugin_form".to_owned()]).unwrap();
        let sermepa = root.nested("sermepa").unwrap();

        assert_eq!(sermepa.string("merchant_code").unwrap(), "123");
        assert_eq!(sermepa.string("merchant_currency").unwrap(), "978");
        assert_eq!(sermepa.string("encryption_key").unwrap(), "");
        assert_eq!(sermepa.string("merchant_name").unwrap(), "");
        assert_eq!(
            sermepa.string("bad"),
            Err(SubmitError::InvalidValue {
                field: "plugin_form.sermepa.bad".to_owned(),
                kind: "array",
            })
        );
    }

    #[test]
    fn test_missing_containers() {
        let tree = json!({ "plugin_form": { "sermepa": "flat" } });
        assert_eq!(
            SubmittedValues::locate(&tree, &["other".to_owned()]).unwrap_err(),
            SubmitError::MissingValues("other".to_owned())
        );
        let root = SubmittedValues::locate(&tree, &["plugin_form".to_owned()]).unwrap();
        assert_eq!(
            root.nested("sermepa").unwrap_err(),
            SubmitError::MissingValues("plugin_form.sermepa".to_owned())
        );
    }
}
