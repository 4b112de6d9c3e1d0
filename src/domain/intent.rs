use serde::Deserialize;

/// Fallback shown when the create-intent endpoint fails without a body.
pub const CREATE_INTENT_FAILED: &str = "Error creating payment intent";
/// Fallback shown when a confirmation error carries no message.
pub const PAYMENT_FAILED: &str = "Payment failed";
/// Status the payment SDK reports for a completed payment.
pub const STATUS_SUCCEEDED: &str = "succeeded";

/// Response of the create-intent endpoint.
///
/// Both the snake_case and camelCase spellings of each key are accepted; the
/// snake_case value wins when both are present and non-empty.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateIntentResponse {
    #[serde(default)]
    client_secret: Option<String>,
    #[serde(default, rename = "clientSecret")]
    client_secret_camel: Option<String>,
    #[serde(default)]
    payment_intent_id: Option<String>,
    #[serde(default, rename = "paymentIntentId")]
    payment_intent_id_camel: Option<String>,
}

impl CreateIntentResponse {
    pub fn new(client_secret: Option<&str>, payment_intent_id: Option<&str>) -> Self {
        Self {
            client_secret: client_secret.map(str::to_string),
            payment_intent_id: payment_intent_id.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn client_secret(&self) -> Option<&str> {
        first_present(&self.client_secret, &self.client_secret_camel)
    }

    pub fn payment_intent_id(&self) -> Option<&str> {
        first_present(&self.payment_intent_id, &self.payment_intent_id_camel)
    }
}

fn first_present<'a>(
    primary: &'a Option<String>,
    secondary: &'a Option<String>,
) -> Option<&'a str> {
    primary
        .as_deref()
        .filter(|v| !v.is_empty())
        .or_else(|| secondary.as_deref().filter(|v| !v.is_empty()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SdkErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentIntent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// What the payment SDK returns from a confirm call: either an error or the
/// payment intent in its current status.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentResult {
    #[serde(default)]
    pub error: Option<SdkErrorBody>,
    #[serde(default)]
    pub payment_intent: Option<PaymentIntent>,
}

impl ConfirmPaymentResult {
    pub fn succeeded(payment_intent_id: &str) -> Self {
        Self::with_status(payment_intent_id, STATUS_SUCCEEDED)
    }

    pub fn with_status(payment_intent_id: &str, status: &str) -> Self {
        Self {
            error: None,
            payment_intent: Some(PaymentIntent {
                id: Some(payment_intent_id.to_string()),
                status: Some(status.to_string()),
            }),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            error: Some(SdkErrorBody {
                message: Some(message.to_string()),
            }),
            payment_intent: None,
        }
    }

    /// Classifies the result. An error always wins over an intent.
    pub fn into_outcome(self) -> ConfirmOutcome {
        if let Some(error) = self.error {
            let message = error
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| PAYMENT_FAILED.to_string());
            return ConfirmOutcome::Declined(message);
        }

        match self.payment_intent {
            Some(intent) if intent.status.as_deref() == Some(STATUS_SUCCEEDED) => {
                ConfirmOutcome::Succeeded(intent.id)
            }
            Some(intent) => ConfirmOutcome::Processing(intent.status),
            None => ConfirmOutcome::Processing(None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Terminal success, carrying the intent id when the SDK reported one.
    Succeeded(Option<String>),
    /// The payment was refused or the SDK call failed.
    Declined(String),
    /// Still pending on the payment network side.
    Processing(Option<String>),
}
