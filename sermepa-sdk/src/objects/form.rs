//! Declarative form description.
//!
//! Forms are plain values: builders return a [`ConfigurationForm`] and the
//! host renders it however it likes. Submitted values come back as a JSON
//! tree whose shape follows the element keys, nested under each element's
//! recorded `parents`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of a select widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// The kind of control an element renders as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Widget {
    /// Single-line text input.
    Textfield {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
    },
    /// Multi-line text input.
    Textarea,
    /// Single-select drop-down. Options keep the order they were given in.
    Select { options: Vec<SelectOption> },
    /// Group of child elements. Children submit their values under the
    /// fieldset's key.
    Fieldset { children: Vec<FormElement> },
}

/// A single element of a form description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormElement {
    pub key: String,
    pub title: String,
    #[serde(flatten)]
    pub widget: Widget,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Position of this element's value within the submitted value tree.
    /// Only recorded on elements whose values are looked up on submission.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl FormElement {
    fn new(key: impl Into<String>, title: impl Into<String>, widget: Widget) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            widget,
            required: false,
            default_value: None,
            parents: Vec::new(),
        }
    }

    pub fn textfield(key: impl Into<String>, title: impl Into<String>, max_length: usize) -> Self {
        Self::new(
            key,
            title,
            Widget::Textfield {
                max_length: Some(max_length),
            },
        )
    }

    pub fn textarea(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(key, title, Widget::Textarea)
    }

    pub fn select(
        key: impl Into<String>,
        title: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self::new(key, title, Widget::Select { options })
    }

    pub fn fieldset(
        key: impl Into<String>,
        title: impl Into<String>,
        children: Vec<FormElement>,
    ) -> Self {
        Self::new(key, title, Widget::Fieldset { children })
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_parents(mut self, parents: Vec<String>) -> Self {
        self.parents = parents;
        self
    }

    /// Maximum length for text inputs, if one is declared.
    pub fn max_length(&self) -> Option<usize> {
        match &self.widget {
            Widget::Textfield { max_length } => *max_length,
            _ => None,
        }
    }

    /// Option values for selects, in declaration order.
    pub fn option_values(&self) -> Option<impl Iterator<Item = &str>> {
        match &self.widget {
            Widget::Select { options } => Some(options.iter().map(|o| o.value.as_str())),
            _ => None,
        }
    }

    pub fn children(&self) -> &[FormElement] {
        match &self.widget {
            Widget::Fieldset { children } => children,
            _ => &[],
        }
    }

    /// Depth-first search for an element by key, including `self`.
    pub fn find(&self, key: &str) -> Option<&FormElement> {
        if self.key == key {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find(key))
    }

    fn default_tree(&self) -> Value {
        match &self.widget {
            Widget::Fieldset { children } => Value::Object(
                children
                    .iter()
                    .map(|c| (c.key.clone(), c.default_tree()))
                    .collect(),
            ),
            _ => Value::String(self.default_value.clone().unwrap_or_default()),
        }
    }
}

/// A form description produced by a configuration plugin.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfigurationForm {
    /// Where the plugin's elements are mounted in the submitted value tree.
    #[serde(default)]
    pub parents: Vec<String>,
    pub elements: Vec<FormElement>,
}

impl ConfigurationForm {
    pub fn new(parents: Vec<String>) -> Self {
        Self {
            parents,
            elements: Vec::new(),
        }
    }

    pub fn push(&mut self, element: FormElement) {
        self.elements.push(element);
    }

    /// Depth-first search for an element by key.
    pub fn find(&self, key: &str) -> Option<&FormElement> {
        self.elements.iter().find_map(|e| e.find(key))
    }

    /// The value tree a browser would submit if every element was left at
    /// its default value.
    pub fn default_values(&self) -> Value {
        let container: Map<String, Value> = self
            .elements
            .iter()
            .map(|e| (e.key.clone(), e.default_tree()))
            .collect();
        let mut root = Value::Object(Map::new());
        insert_nested(&mut root, &self.parents, Value::Object(container));
        root
    }
}

/// Walk `path` from `root` through nested objects.
///
/// An empty path yields `root` itself.
pub fn get_nested<'a, S: AsRef<str>>(root: &'a Value, path: &[S]) -> Option<&'a Value> {
    path.iter()
        .try_fold(root, |value, segment| value.get(segment.as_ref()))
}

/// Put `value` at `path`, creating intermediate objects and replacing any
/// non-object value found on the way.
pub fn insert_nested<S: AsRef<str>>(root: &mut Value, path: &[S], value: Value) {
    let mut cursor = root;
    for segment in path {
        if !cursor.is_object() {
            *cursor = Value::Object(Map::new());
        }
        cursor = match cursor {
            Value::Object(map) => map.entry(segment.as_ref()).or_insert(Value::Null),
            _ => return,
        };
    }
    *cursor = value;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_form() -> ConfigurationForm {
        let mut form = ConfigurationForm::new(vec!["plugin_form".to_owned()]);
        form.push(FormElement::textfield("brand_label", "Brand label", 255).with_default("Card"));
        form.push(FormElement::fieldset(
            "gateway",
            "Gateway",
            vec![
                FormElement::select(
                    "environment",
                    "Environment",
                    vec![SelectOption::new("live", "Live"), SelectOption::new("test", "Test")],
                )
                .required()
                .with_default("test"),
                FormElement::textfield("code", "Code", 9).required(),
            ],
        ));
        form
    }

    #[test]
    fn test_widget_serialization_shape() {
        let element = FormElement::textfield("merchant_code", "Merchant Code", 9)
            .required()
            .with_default("123");
        let value = serde_json::to_value(&element).unwrap();
        assert_eq!(
            value,
            json!({
                "key": "merchant_code",
                "title": "Merchant Code",
                "type": "textfield",
                "max_length": 9,
                "required": true,
                "default_value": "123",
            })
        );
        let back: FormElement = serde_json::from_value(value).unwrap();
        assert_eq!(back, element);
    }

    #[test]
    fn test_find_descends_into_fieldsets() {
        let form = sample_form();
        assert_eq!(form.find("code").and_then(|e| e.max_length()), Some(9));
        assert_eq!(
            form.find("environment")
                .and_then(|e| e.option_values())
                .map(|v| v.collect::<Vec<_>>()),
            Some(vec!["live", "test"])
        );
        assert!(form.find("missing").is_none());
    }

    #[test]
    fn test_default_values_nests_under_parents() {
        let values = sample_form().default_values();
        assert_eq!(
            values,
            json!({
                "plugin_form": {
                    "brand_label": "Card",
                    "gateway": {
                        "environment": "test",
                        "code": "",
                    },
                },
            })
        );
    }

    #[test]
    fn test_nested_helpers() {
        let mut root = json!({ "a": "scalar" });
        insert_nested(&mut root, &["a", "b"], json!(1));
        assert_eq!(root, json!({ "a": { "b": 1 } }));
        assert_eq!(get_nested(&root, &["a", "b"]), Some(&json!(1)));
        assert_eq!(get_nested(&root, &["a", "c"]), None);
        assert_eq!(get_nested::<&str>(&root, &[]), Some(&root));
    }
}
