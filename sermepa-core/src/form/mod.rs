//! Form plumbing shared by configuration plugins: label translation,
//! reading submitted values, and form-driven validation.

mod submit;
mod translate;
mod validation;

pub use submit::{SubmitError, SubmittedValues};
pub use translate::{IdentityTranslator, Translate};
pub use validation::{ValidationError, ValidationErrorKind, validate_configuration_form};

use sermepa_sdk::gateway::GatewayCatalog;

/// Everything a plugin needs to describe its configuration form.
pub struct FormContext<'a> {
    /// Where the plugin's elements are mounted in the submitted value tree.
    pub parents: Vec<String>,
    pub catalog: &'a dyn GatewayCatalog,
    pub translator: &'a dyn Translate,
}

impl<'a> FormContext<'a> {
    pub fn new(catalog: &'a dyn GatewayCatalog) -> Self {
        Self {
            parents: Vec::new(),
            catalog,
            translator: &IdentityTranslator,
        }
    }

    pub fn mounted_at(mut self, parents: Vec<String>) -> Self {
        self.parents = parents;
        self
    }

    pub fn with_translator(mut self, translator: &'a dyn Translate) -> Self {
        self.translator = translator;
        self
    }

    pub(crate) fn t(&self, source: &str) -> String {
        self.translator.translate(source)
    }
}
