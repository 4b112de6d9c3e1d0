use serde::Serialize;
use std::collections::HashMap;

pub const GUEST_EMAIL: &str = "guest_email";
pub const SAVE_SHIPPING: &str = "save_shipping";
pub const SHIPPING_NAME: &str = "shipping_name";
pub const SHIPPING_LINE1: &str = "shipping_line1";
pub const SHIPPING_LINE2: &str = "shipping_line2";
pub const SHIPPING_CITY: &str = "shipping_city";
pub const SHIPPING_POSTCODE: &str = "shipping_postcode";
pub const SHIPPING_COUNTRY: &str = "shipping_country";
pub const SHIPPING_PHONE: &str = "shipping_phone";

/// Text fields read from the form when building the create-intent body.
pub const PAYLOAD_FIELDS: [&str; 8] = [
    GUEST_EMAIL,
    SHIPPING_NAME,
    SHIPPING_LINE1,
    SHIPPING_LINE2,
    SHIPPING_CITY,
    SHIPPING_POSTCODE,
    SHIPPING_COUNTRY,
    SHIPPING_PHONE,
];

/// Body of the create-intent request.
///
/// Every field is optional and omitted from the JSON when absent.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CreateIntentPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_shipping: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_postcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_phone: Option<String>,
}

impl CreateIntentPayload {
    /// Builds the payload from raw form values.
    ///
    /// Values are trimmed and dropped when empty. The country code is
    /// upper-cased and `save_shipping` is sent as `"1"` only when checked.
    pub fn from_form(values: &HashMap<String, String>, save_shipping: bool) -> Self {
        let field = |name: &str| non_empty(values.get(name).map(String::as_str));

        Self {
            guest_email: field(GUEST_EMAIL),
            save_shipping: save_shipping.then(|| "1".to_string()),
            shipping_name: field(SHIPPING_NAME),
            shipping_line1: field(SHIPPING_LINE1),
            shipping_line2: field(SHIPPING_LINE2),
            shipping_city: field(SHIPPING_CITY),
            shipping_postcode: field(SHIPPING_POSTCODE),
            shipping_country: field(SHIPPING_COUNTRY).map(|c| c.to_uppercase()),
            shipping_phone: field(SHIPPING_PHONE),
        }
    }
}

/// Body of the update-intent request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateIntentPayload {
    pub pi_id: String,
    pub guest_email: String,
}

/// Trims a raw form value, returning `None` when nothing is left.
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
