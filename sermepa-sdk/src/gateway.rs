//! Gateway catalogue: field limits and option lists published by the
//! payment gateway for merchant settings.

/// Field limits and option lists a gateway client exposes for merchant
/// settings.
///
/// Option lists are ordered `(code, label)` pairs; the order is the one the
/// gateway documents and forms keep it.
pub trait GatewayCatalog {
    fn merchant_name_max_length(&self) -> usize;
    fn merchant_code_max_length(&self) -> usize;
    fn merchant_terminal_max_length(&self) -> usize;
    fn merchant_password_max_length(&self) -> usize;
    fn available_currencies(&self) -> Vec<(String, String)>;
    fn available_payment_methods(&self) -> Vec<(String, String)>;
}

/// Catalogue of the Sermepa/Redsys virtual POS.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sermepa;

impl Sermepa {
    const MERCHANT_NAME_MAX_LENGTH: usize = 25;
    const MERCHANT_CODE_MAX_LENGTH: usize = 9;
    const MERCHANT_TERMINAL_MAX_LENGTH: usize = 3;
    const MERCHANT_PASSWORD_MAX_LENGTH: usize = 32;

    /// ISO-4217 numeric codes accepted as `Ds_Merchant_Currency`.
    const CURRENCIES: &'static [(&'static str, &'static str)] = &[
        ("978", "Euro"),
        ("840", "U.S. Dollar"),
        ("826", "Pound Sterling"),
        ("392", "Yen"),
        ("32", "Argentine Peso"),
        ("124", "Canadian Dollar"),
        ("152", "Chilean Peso"),
        ("170", "Colombian Peso"),
        ("356", "Indian Rupee"),
        ("484", "Mexican Peso"),
        ("604", "Peruvian Sol"),
        ("756", "Swiss Franc"),
        ("986", "Brazilian Real"),
        ("937", "Venezuelan Bolivar"),
        ("949", "Turkish Lira"),
    ];

    /// Values accepted as `Ds_Merchant_PayMethods`.
    const PAYMENT_METHODS: &'static [(&'static str, &'static str)] = &[
        ("C", "Card"),
        ("T", "Card and Iupay"),
        ("R", "Bank transfer"),
        ("D", "Direct debit"),
        ("O", "Iupay"),
        ("z", "Bizum"),
        ("p", "PayPal"),
    ];

    fn owned(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(code, label)| ((*code).to_owned(), (*label).to_owned()))
            .collect()
    }
}

impl GatewayCatalog for Sermepa {
    fn merchant_name_max_length(&self) -> usize {
        Self::MERCHANT_NAME_MAX_LENGTH
    }

    fn merchant_code_max_length(&self) -> usize {
        Self::MERCHANT_CODE_MAX_LENGTH
    }

    fn merchant_terminal_max_length(&self) -> usize {
        Self::MERCHANT_TERMINAL_MAX_LENGTH
    }

    fn merchant_password_max_length(&self) -> usize {
        Self::MERCHANT_PASSWORD_MAX_LENGTH
    }

    fn available_currencies(&self) -> Vec<(String, String)> {
        Self::owned(Self::CURRENCIES)
    }

    fn available_payment_methods(&self) -> Vec<(String, String)> {
        Self::owned(Self::PAYMENT_METHODS)
    }
}
