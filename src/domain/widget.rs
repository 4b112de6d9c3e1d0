use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Wallets {
    pub link: Visibility,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BillingDetailsFields {
    pub address: Visibility,
    pub name: Visibility,
    pub email: Visibility,
    pub phone: Visibility,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOptions {
    pub billing_details: BillingDetailsFields,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct DefaultBillingDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultValues {
    pub billing_details: DefaultBillingDetails,
}

/// Options for creating a widget session bound to one client secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOptions {
    pub client_secret: String,
    pub wallets: Wallets,
    pub fields: FieldOptions,
    pub default_values: DefaultValues,
}

impl SessionOptions {
    /// The form collects contact and address details itself, so every
    /// billing field of the widget is suppressed.
    pub fn new(client_secret: impl Into<String>, default_email: Option<String>) -> Self {
        Self {
            client_secret: client_secret.into(),
            wallets: Wallets {
                link: Visibility::Never,
            },
            fields: FieldOptions {
                billing_details: BillingDetailsFields {
                    address: Visibility::Never,
                    name: Visibility::Never,
                    email: Visibility::Never,
                    phone: Visibility::Never,
                },
            },
            default_values: DefaultValues {
                billing_details: DefaultBillingDetails {
                    email: default_email,
                },
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectPolicy {
    IfRequired,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_session_options_shape() {
        let options = SessionOptions::new("cs_1", Some("ada@example.com".to_string()));

        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({
                "clientSecret": "cs_1",
                "wallets": { "link": "never" },
                "fields": {
                    "billingDetails": {
                        "address": "never",
                        "name": "never",
                        "email": "never",
                        "phone": "never"
                    }
                },
                "defaultValues": { "billingDetails": { "email": "ada@example.com" } }
            })
        );
    }

    #[test]
    fn test_default_email_omitted_when_absent() {
        let options = SessionOptions::new("cs_1", None);
        let value = serde_json::to_value(&options).unwrap();
        assert_eq!(value["defaultValues"], json!({ "billingDetails": {} }));
    }

    #[test]
    fn test_redirect_policy_serialization() {
        assert_eq!(
            serde_json::to_string(&RedirectPolicy::IfRequired).unwrap(),
            "\"if_required\""
        );
    }
}
