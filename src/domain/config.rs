use crate::error::{CheckoutError, Result};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::collections::HashMap;

/// Message shown when the page did not provide the required data attributes.
pub const MISSING_CONFIG: &str = "Missing data-* config";
/// Message shown when the payment SDK is not available on the page.
pub const SDK_NOT_LOADED: &str = "Payment SDK not loaded";
/// Selector of the element the payment widget mounts into.
pub const PAYMENT_ELEMENT_TARGET: &str = "#payment-element";

pub const DATA_PUBLISHABLE_KEY: &str = "pk";
pub const DATA_CREATE_URL: &str = "createUrl";
pub const DATA_UPDATE_URL: &str = "updateUrl";
pub const DATA_SUCCESS_URL: &str = "successUrl";

/// Characters a URI component leaves unescaped besides ASCII alphanumerics.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Page-provided parameters of one checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    pub publishable_key: String,
    pub create_url: String,
    /// The update-intent endpoint is optional; without it the contact email
    /// is never attached after creation.
    pub update_url: Option<String>,
    pub success_url: String,
}

impl CheckoutConfig {
    /// Builds the configuration from the checkout root's data attributes.
    ///
    /// Blank values count as missing. `updateUrl` is the only optional key.
    pub fn from_dataset(dataset: &HashMap<String, String>) -> Result<Self> {
        let read = |key: &str| {
            dataset
                .get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        match (
            read(DATA_PUBLISHABLE_KEY),
            read(DATA_CREATE_URL),
            read(DATA_SUCCESS_URL),
        ) {
            (Some(publishable_key), Some(create_url), Some(success_url)) => Ok(Self {
                publishable_key,
                create_url,
                update_url: read(DATA_UPDATE_URL),
                success_url,
            }),
            _ => Err(CheckoutError::Config(MISSING_CONFIG.to_string())),
        }
    }

    /// Destination of the success redirect for the given intent.
    ///
    /// The id is percent-encoded as a URI component; `&` is used when the
    /// success URL already carries a query string.
    pub fn success_redirect(&self, payment_intent_id: &str) -> String {
        let separator = if self.success_url.contains('?') {
            '&'
        } else {
            '?'
        };
        let encoded = utf8_percent_encode(payment_intent_id, URI_COMPONENT);
        format!("{}{}pi={}", self.success_url, separator, encoded)
    }
}
