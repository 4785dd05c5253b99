//! Settings shared by every payment method configuration.

use super::{ConfigurationMapping, or_empty, put_string, take_string};

/// Payment statuses a payment can be set to once it is executed.
pub const EXECUTE_STATUSES: [(&str, &str); 3] = [
    ("payment_pending", "Pending"),
    ("payment_success", "Completed"),
    ("payment_failed", "Failed"),
];

const DEFAULT_EXECUTE_STATUS: &str = "payment_pending";

/// Base configuration every payment method carries: the label payers see,
/// the message shown when the method is picked, and the status a payment
/// gets after execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicConfiguration {
    pub brand_label: String,
    pub message_text: String,
    pub execute_status_id: String,
}

impl Default for BasicConfiguration {
    fn default() -> Self {
        Self {
            brand_label: String::new(),
            message_text: String::new(),
            execute_status_id: DEFAULT_EXECUTE_STATUS.to_owned(),
        }
    }
}

impl BasicConfiguration {
    pub const BRAND_LABEL: &'static str = "brand_label";
    pub const MESSAGE_TEXT: &'static str = "message_text";
    pub const EXECUTE_STATUS_ID: &'static str = "execute_status_id";

    pub const KEYS: [&'static str; 3] = [
        Self::BRAND_LABEL,
        Self::MESSAGE_TEXT,
        Self::EXECUTE_STATUS_ID,
    ];

    pub const BRAND_LABEL_MAX_LENGTH: usize = 255;

    pub fn brand_label(&self) -> &str {
        or_empty(&self.brand_label)
    }

    pub fn message_text(&self) -> &str {
        or_empty(&self.message_text)
    }

    /// Falls back to `payment_pending` when unset.
    pub fn execute_status_id(&self) -> &str {
        match or_empty(&self.execute_status_id) {
            "" => DEFAULT_EXECUTE_STATUS,
            id => id,
        }
    }

    pub fn set(&mut self, key: &str, value: String) {
        match key {
            Self::BRAND_LABEL => self.brand_label = value,
            Self::MESSAGE_TEXT => self.message_text = value,
            Self::EXECUTE_STATUS_ID => self.execute_status_id = value,
            _ => {}
        }
    }

    pub fn take_from_mapping(mapping: &mut ConfigurationMapping) -> Self {
        let mut basic = Self::default();
        for key in Self::KEYS {
            let value = take_string(mapping, key);
            basic.set(key, value);
        }
        basic
    }

    pub fn write_to_mapping(&self, mapping: &mut ConfigurationMapping) {
        for (key, value) in [
            (Self::BRAND_LABEL, &self.brand_label),
            (Self::MESSAGE_TEXT, &self.message_text),
            (Self::EXECUTE_STATUS_ID, &self.execute_status_id),
        ] {
            put_string(mapping, key, value);
        }
    }
}
