pub mod environment;
pub mod form;

pub use environment::{Environment, ParseEnvironmentError};
pub use form::{ConfigurationForm, FormElement, SelectOption, Widget};
