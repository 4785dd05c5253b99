//! Merchant credentials for the Sermepa gateway.

use super::{ConfigurationMapping, or_empty, put_string, take_string};
use sermepa_sdk::objects::{Environment, ParseEnvironmentError};
use std::collections::BTreeMap;
use std::fmt;

/// Snapshot of the merchant settings keyed by configuration key.
pub type DerivativeConfiguration = BTreeMap<&'static str, String>;

/// Merchant credentials and environment for one configured payment method.
///
/// Fields hold the raw stored strings. Accessors return `""` for values
/// that are not set (see [`super::is_set`]).
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MerchantConfiguration {
    pub environment: String,
    pub merchant_name: String,
    pub merchant_code: String,
    pub merchant_terminal: String,
    pub merchant_currency: String,
    pub merchant_payment_method: String,
    pub encryption_key: String,
}

impl MerchantConfiguration {
    pub const ENVIRONMENT: &'static str = "environment";
    pub const MERCHANT_NAME: &'static str = "merchant_name";
    pub const MERCHANT_CODE: &'static str = "merchant_code";
    pub const MERCHANT_TERMINAL: &'static str = "merchant_terminal";
    pub const MERCHANT_CURRENCY: &'static str = "merchant_currency";
    pub const MERCHANT_PAYMENT_METHOD: &'static str = "merchant_payment_method";
    pub const ENCRYPTION_KEY: &'static str = "encryption_key";

    /// Configuration keys owned by this record, in form order.
    pub const KEYS: [&'static str; 7] = [
        Self::ENVIRONMENT,
        Self::MERCHANT_NAME,
        Self::MERCHANT_CODE,
        Self::MERCHANT_TERMINAL,
        Self::MERCHANT_CURRENCY,
        Self::MERCHANT_PAYMENT_METHOD,
        Self::ENCRYPTION_KEY,
    ];

    /// Gets the setting for the production server.
    pub fn environment(&self) -> &str {
        or_empty(&self.environment)
    }

    pub fn merchant_name(&self) -> &str {
        or_empty(&self.merchant_name)
    }

    pub fn merchant_code(&self) -> &str {
        or_empty(&self.merchant_code)
    }

    pub fn merchant_terminal(&self) -> &str {
        or_empty(&self.merchant_terminal)
    }

    pub fn merchant_currency(&self) -> &str {
        or_empty(&self.merchant_currency)
    }

    pub fn merchant_payment_method(&self) -> &str {
        or_empty(&self.merchant_payment_method)
    }

    pub fn encryption_key(&self) -> &str {
        or_empty(&self.encryption_key)
    }

    /// Accessor value for a configuration key, `None` for keys this record
    /// does not own.
    pub fn get(&self, key: &str) -> Option<&str> {
        Some(match key {
            Self::ENVIRONMENT => self.environment(),
            Self::MERCHANT_NAME => self.merchant_name(),
            Self::MERCHANT_CODE => self.merchant_code(),
            Self::MERCHANT_TERMINAL => self.merchant_terminal(),
            Self::MERCHANT_CURRENCY => self.merchant_currency(),
            Self::MERCHANT_PAYMENT_METHOD => self.merchant_payment_method(),
            Self::ENCRYPTION_KEY => self.encryption_key(),
            _ => return None,
        })
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut String> {
        Some(match key {
            Self::ENVIRONMENT => &mut self.environment,
            Self::MERCHANT_NAME => &mut self.merchant_name,
            Self::MERCHANT_CODE => &mut self.merchant_code,
            Self::MERCHANT_TERMINAL => &mut self.merchant_terminal,
            Self::MERCHANT_CURRENCY => &mut self.merchant_currency,
            Self::MERCHANT_PAYMENT_METHOD => &mut self.merchant_payment_method,
            Self::ENCRYPTION_KEY => &mut self.encryption_key,
            _ => return None,
        })
    }

    /// Overwrite one field by configuration key. Unknown keys are ignored.
    pub fn set(&mut self, key: &str, value: String) {
        if let Some(slot) = self.slot_mut(key) {
            *slot = value;
        }
    }

    /// The stored environment as a typed value.
    pub fn parsed_environment(&self) -> Result<Environment, ParseEnvironmentError> {
        self.environment().parse()
    }

    /// Whether every setting needed to reach the gateway is present and the
    /// environment is one the gateway knows.
    pub fn is_complete(&self) -> bool {
        self.parsed_environment().is_ok()
            && Self::KEYS
                .iter()
                .all(|&key| self.get(key).is_some_and(|value| !value.is_empty()))
    }

    /// All seven settings as a plain mapping of accessor values.
    pub fn derivative_configuration(&self) -> DerivativeConfiguration {
        Self::KEYS
            .iter()
            .filter_map(|&key| self.get(key).map(|value| (key, value.to_owned())))
            .collect()
    }

    /// Move the merchant keys out of `mapping`, leaving every other key in
    /// place.
    pub fn take_from_mapping(mapping: &mut ConfigurationMapping) -> Self {
        let mut merchant = Self::default();
        for key in Self::KEYS {
            let value = take_string(mapping, key);
            merchant.set(key, value);
        }
        merchant
    }

    /// Write the merchant keys into `mapping`, overwriting only those keys.
    ///
    /// An unset field leaves a value it could not read in place.
    pub fn write_to_mapping(&self, mapping: &mut ConfigurationMapping) {
        for (key, value) in [
            (Self::ENVIRONMENT, &self.environment),
            (Self::MERCHANT_NAME, &self.merchant_name),
            (Self::MERCHANT_CODE, &self.merchant_code),
            (Self::MERCHANT_TERMINAL, &self.merchant_terminal),
            (Self::MERCHANT_CURRENCY, &self.merchant_currency),
            (Self::MERCHANT_PAYMENT_METHOD, &self.merchant_payment_method),
            (Self::ENCRYPTION_KEY, &self.encryption_key),
        ] {
            put_string(mapping, key, value);
        }
    }
}

impl fmt::Debug for MerchantConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerchantConfiguration")
            .field("environment", &self.environment)
            .field("merchant_name", &self.merchant_name)
            .field("merchant_code", &self.merchant_code)
            .field("merchant_terminal", &self.merchant_terminal)
            .field("merchant_currency", &self.merchant_currency)
            .field("merchant_payment_method", &self.merchant_payment_method)
            .field("encryption_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filled() -> MerchantConfiguration {
        MerchantConfiguration {
            environment: "test".into(),
            merchant_name: "ACME".into(),
            merchant_code: "123456".into(),
            merchant_terminal: "001".into(),
            merchant_currency: "978".into(),
            merchant_payment_method: "C".into(),
            encryption_key: "secret".into(),
        }
    }

    #[test]
    fn test_accessors_return_empty_for_unset_values() {
        for raw in ["", "0", "   "] {
            let mut merchant = MerchantConfiguration::default();
            for key in MerchantConfiguration::KEYS {
                merchant.set(key, raw.to_owned());
            }
            for key in MerchantConfiguration::KEYS {
                assert_eq!(merchant.get(key), Some(""), "key {key} raw {raw:?}");
            }
        }
    }

    #[test]
    fn test_accessors_return_stored_literal() {
        let merchant = filled();
        assert_eq!(merchant.environment(), "test");
        assert_eq!(merchant.merchant_name(), "ACME");
        assert_eq!(merchant.merchant_code(), "123456");
        assert_eq!(merchant.merchant_terminal(), "001");
        assert_eq!(merchant.merchant_currency(), "978");
        assert_eq!(merchant.merchant_payment_method(), "C");
        assert_eq!(merchant.encryption_key(), "secret");
        assert_eq!(merchant.get("brand_label"), None);
    }

    #[test]
    fn test_derivative_matches_accessors() {
        for merchant in [
            filled(),
            MerchantConfiguration::default(),
            MerchantConfiguration {
                merchant_code: "0".into(),
                ..filled()
            },
        ] {
            let snapshot = merchant.derivative_configuration();
            assert_eq!(snapshot.len(), 7);
            for key in MerchantConfiguration::KEYS {
                assert_eq!(snapshot.get(key).map(String::as_str), merchant.get(key));
            }
        }
    }

    #[test]
    fn test_is_complete() {
        assert!(filled().is_complete());
        assert!(!MerchantConfiguration::default().is_complete());
        let mut merchant = filled();
        merchant.set(MerchantConfiguration::MERCHANT_TERMINAL, "0".to_owned());
        assert!(!merchant.is_complete());

        let merchant = MerchantConfiguration {
            environment: "production".into(),
            ..filled()
        };
        assert!(merchant.parsed_environment().is_err());
        assert!(!merchant.is_complete());
        assert_eq!(filled().parsed_environment(), Ok(Environment::Test));
    }

    #[test]
    fn test_unreadable_stored_value_is_not_overwritten() {
        let mut mapping = json!({ "merchant_name": true, "merchant_code": "123" })
            .as_object()
            .cloned()
            .unwrap();

        let merchant = MerchantConfiguration::take_from_mapping(&mut mapping);
        assert_eq!(merchant.merchant_name(), "");
        assert_eq!(mapping["merchant_name"], true);

        merchant.write_to_mapping(&mut mapping);
        assert_eq!(mapping["merchant_name"], true);
        assert_eq!(mapping["merchant_code"], "123");

        let mut named = merchant.clone();
        named.set(MerchantConfiguration::MERCHANT_NAME, "ACME".to_owned());
        named.write_to_mapping(&mut mapping);
        assert_eq!(mapping["merchant_name"], "ACME");
    }

    #[test]
    fn test_mapping_leaves_foreign_keys_alone() {
        let mut mapping = json!({
            "environment": "live",
            "merchant_currency": 978,
            "brand_label": "Pay by card",
        })
        .as_object()
        .cloned()
        .unwrap();

        let merchant = MerchantConfiguration::take_from_mapping(&mut mapping);
        assert_eq!(merchant.environment(), "live");
        assert_eq!(merchant.merchant_currency(), "978");
        assert_eq!(merchant.merchant_name(), "");
        assert_eq!(mapping.len(), 1);

        merchant.write_to_mapping(&mut mapping);
        assert_eq!(mapping["brand_label"], "Pay by card");
        assert_eq!(mapping["merchant_currency"], "978");
        assert_eq!(mapping.len(), 8);
    }

    #[test]
    fn test_debug_redacts_encryption_key() {
        let rendered = format!("{:?}", filled());
        assert!(rendered.contains("ACME"));
        assert!(!rendered.contains("secret"));
    }
}
