//! The Sermepa payment method configuration plugin.
//!
//! Combines the [`BasicConfiguration`] every payment method carries with the
//! Sermepa [`MerchantConfiguration`], and provides the two host hooks: build
//! the configuration form and apply its submitted values.

use crate::config::{
    BasicConfiguration, ConfigurationMapping, DerivativeConfiguration, EXECUTE_STATUSES,
    MerchantConfiguration,
};
use crate::form::{
    FormContext, SubmitError, SubmittedValues, ValidationError, validate_configuration_form,
};
use sermepa_sdk::objects::Environment;
use sermepa_sdk::objects::form::{ConfigurationForm, FormElement, SelectOption};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Static description of a configuration plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PluginDefinition {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

pub const PLUGIN_DEFINITION: PluginDefinition = PluginDefinition {
    id: "sermepa_payment",
    label: "Sermepa",
    description: "Sermepa payment method type.",
};

/// Key of the fieldset grouping the merchant settings.
pub const SERMEPA_FIELDSET: &str = "sermepa";

/// Configuration of one Sermepa payment method.
///
/// Serializes as the host's flat configuration mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ConfigurationMapping", into = "ConfigurationMapping")]
pub struct SermepaConfiguration {
    basic: BasicConfiguration,
    merchant: MerchantConfiguration,
    /// Keys of the host mapping this plugin does not own.
    other: ConfigurationMapping,
}

impl SermepaConfiguration {
    pub fn new(basic: BasicConfiguration, merchant: MerchantConfiguration) -> Self {
        Self {
            basic,
            merchant,
            other: ConfigurationMapping::new(),
        }
    }

    /// Build from the host's configuration mapping.
    pub fn from_mapping(mut mapping: ConfigurationMapping) -> Self {
        let basic = BasicConfiguration::take_from_mapping(&mut mapping);
        let merchant = MerchantConfiguration::take_from_mapping(&mut mapping);
        Self {
            basic,
            merchant,
            other: mapping,
        }
    }

    /// Convert back to the host's configuration mapping. Keys this plugin
    /// does not own come back exactly as they were loaded.
    pub fn to_mapping(&self) -> ConfigurationMapping {
        let mut mapping = self.other.clone();
        self.basic.write_to_mapping(&mut mapping);
        self.merchant.write_to_mapping(&mut mapping);
        mapping
    }

    pub fn basic(&self) -> &BasicConfiguration {
        &self.basic
    }

    pub fn merchant(&self) -> &MerchantConfiguration {
        &self.merchant
    }

    pub fn derivative_configuration(&self) -> DerivativeConfiguration {
        self.merchant.derivative_configuration()
    }

    /// Describe the configuration form.
    ///
    /// Produces the base elements at the mount point followed by a fieldset
    /// with one control per merchant setting. The fieldset records its
    /// position so [`submit_configuration_form`](Self::submit_configuration_form)
    /// can find its values.
    pub fn build_configuration_form(&self, ctx: &FormContext<'_>) -> ConfigurationForm {
        let mut form = ConfigurationForm::new(ctx.parents.clone());
        for element in self.basic_elements(ctx) {
            form.push(element);
        }

        let mut fieldset_parents = ctx.parents.clone();
        fieldset_parents.push(SERMEPA_FIELDSET.to_owned());
        form.push(
            FormElement::fieldset(
                SERMEPA_FIELDSET,
                ctx.t("SERMEPA configuration"),
                self.merchant_elements(ctx),
            )
            .with_parents(fieldset_parents),
        );
        form
    }

    fn basic_elements(&self, ctx: &FormContext<'_>) -> Vec<FormElement> {
        let basic = &self.basic;
        let statuses = EXECUTE_STATUSES
            .iter()
            .map(|(id, label)| SelectOption::new(*id, ctx.t(label)))
            .collect();
        vec![
            FormElement::textfield(
                BasicConfiguration::BRAND_LABEL,
                ctx.t("Brand label"),
                BasicConfiguration::BRAND_LABEL_MAX_LENGTH,
            )
            .with_default(basic.brand_label()),
            FormElement::textarea(BasicConfiguration::MESSAGE_TEXT, ctx.t("Payment form message"))
                .with_default(basic.message_text()),
            FormElement::select(
                BasicConfiguration::EXECUTE_STATUS_ID,
                ctx.t("Payment execution status"),
                statuses,
            )
            .required()
            .with_default(basic.execute_status_id()),
        ]
    }

    fn merchant_elements(&self, ctx: &FormContext<'_>) -> Vec<FormElement> {
        let merchant = &self.merchant;
        let catalog = ctx.catalog;
        let options = |pairs: Vec<(String, String)>| {
            pairs
                .into_iter()
                .map(|(code, label)| SelectOption::new(code, label))
                .collect::<Vec<_>>()
        };
        let environments = Environment::ALL
            .iter()
            .map(|env| SelectOption::new(env.as_str(), ctx.t(env.label())))
            .collect();

        vec![
            FormElement::select(MerchantConfiguration::ENVIRONMENT, ctx.t("Environment"), environments)
                .required()
                .with_default(merchant.environment()),
            FormElement::textfield(
                MerchantConfiguration::MERCHANT_NAME,
                ctx.t("Merchant Name"),
                catalog.merchant_name_max_length(),
            )
            .required()
            .with_default(merchant.merchant_name()),
            FormElement::textfield(
                MerchantConfiguration::MERCHANT_CODE,
                ctx.t("Merchant Code"),
                catalog.merchant_code_max_length(),
            )
            .required()
            .with_default(merchant.merchant_code()),
            FormElement::textfield(
                MerchantConfiguration::MERCHANT_TERMINAL,
                ctx.t("Merchant Terminal"),
                catalog.merchant_terminal_max_length(),
            )
            .required()
            .with_default(merchant.merchant_terminal()),
            FormElement::select(
                MerchantConfiguration::MERCHANT_CURRENCY,
                ctx.t("Merchant Currency"),
                options(catalog.available_currencies()),
            )
            .required()
            .with_default(merchant.merchant_currency()),
            FormElement::select(
                MerchantConfiguration::MERCHANT_PAYMENT_METHOD,
                ctx.t("Merchant Payment Method"),
                options(catalog.available_payment_methods()),
            )
            .required()
            .with_default(merchant.merchant_payment_method()),
            FormElement::textfield(
                MerchantConfiguration::ENCRYPTION_KEY,
                ctx.t("Encryption Key"),
                catalog.merchant_password_max_length(),
            )
            .required()
            .with_default(merchant.encryption_key()),
        ]
    }

    /// Check submitted values against the constraints declared by `form`.
    pub fn validate_configuration_form(
        &self,
        form: &ConfigurationForm,
        values: &Value,
    ) -> Vec<ValidationError> {
        validate_configuration_form(form, values)
    }

    /// Apply submitted values.
    ///
    /// Base settings are read at the form's mount point and merchant
    /// settings under the `sermepa` fieldset's recorded position. Every
    /// owned field is overwritten; fields missing from the submission become
    /// `""`. Nothing is changed when an error is returned.
    pub fn submit_configuration_form(
        &mut self,
        form: &ConfigurationForm,
        values: &Value,
    ) -> Result<(), SubmitError> {
        let container = SubmittedValues::locate(values, &form.parents)?;
        let mut basic = self.basic.clone();
        for key in BasicConfiguration::KEYS {
            basic.set(key, container.string(key)?);
        }

        let fieldset = form
            .find(SERMEPA_FIELDSET)
            .ok_or_else(|| SubmitError::MissingFieldset(SERMEPA_FIELDSET.to_owned()))?;
        let parents = match fieldset.parents.split_last() {
            Some((_, init)) => init,
            None => &form.parents[..],
        };
        let submitted = SubmittedValues::locate(values, parents)?.nested(SERMEPA_FIELDSET)?;
        let mut merchant = MerchantConfiguration::default();
        for key in MerchantConfiguration::KEYS {
            merchant.set(key, submitted.string(key)?);
        }

        self.basic = basic;
        self.merchant = merchant;
        tracing::debug!(
            environment = self.merchant.environment(),
            merchant_code = self.merchant.merchant_code(),
            "applied submitted Sermepa configuration"
        );
        Ok(())
    }
}

impl From<ConfigurationMapping> for SermepaConfiguration {
    fn from(mapping: ConfigurationMapping) -> Self {
        Self::from_mapping(mapping)
    }
}

impl From<SermepaConfiguration> for ConfigurationMapping {
    fn from(config: SermepaConfiguration) -> Self {
        config.to_mapping()
    }
}
