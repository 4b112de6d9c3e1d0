use crate::domain::intent::ConfirmPaymentResult;
use crate::domain::ports::{PaymentSdk, PaymentSdkBox, WidgetSession, WidgetSessionBox};
use crate::domain::widget::{RedirectPolicy, SessionOptions};
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Default)]
struct Shared {
    sessions: Vec<SessionOptions>,
    mounts: Vec<String>,
    confirm_calls: usize,
    results: VecDeque<ConfirmPaymentResult>,
    mount_failure: Option<String>,
}

/// A test-mode payment SDK that never touches the payment network.
///
/// Confirm calls answer with scripted results in order; once the script is
/// exhausted every confirmation succeeds for the intent the session's client
/// secret belongs to.
#[derive(Debug, Clone)]
pub struct SimulatedPaymentSdk {
    publishable_key: String,
    shared: Arc<Mutex<Shared>>,
}

impl SimulatedPaymentSdk {
    pub fn new(publishable_key: &str) -> Self {
        Self::with_results(publishable_key, Vec::<ConfirmPaymentResult>::new())
    }

    pub fn with_results<I>(publishable_key: &str, results: I) -> Self
    where
        I: IntoIterator<Item = ConfirmPaymentResult>,
    {
        let shared = Shared {
            results: results.into_iter().collect(),
            ..Shared::default()
        };
        Self {
            publishable_key: publishable_key.to_string(),
            shared: Arc::new(Mutex::new(shared)),
        }
    }

    pub fn boxed(&self) -> PaymentSdkBox {
        Box::new(self.clone())
    }

    pub async fn push_result(&self, result: ConfirmPaymentResult) {
        self.shared.lock().await.results.push_back(result);
    }

    /// Makes the next mount fail with `message`.
    pub async fn fail_next_mount(&self, message: &str) {
        self.shared.lock().await.mount_failure = Some(message.to_string());
    }

    pub async fn sessions(&self) -> Vec<SessionOptions> {
        self.shared.lock().await.sessions.clone()
    }

    pub async fn mounts(&self) -> Vec<String> {
        self.shared.lock().await.mounts.clone()
    }

    pub async fn confirm_calls(&self) -> usize {
        self.shared.lock().await.confirm_calls
    }
}

#[async_trait]
impl PaymentSdk for SimulatedPaymentSdk {
    async fn create_session(&self, options: SessionOptions) -> Result<WidgetSessionBox> {
        if options.client_secret.is_empty() {
            return Err(CheckoutError::Sdk("Invalid client secret".to_string()));
        }

        let client_secret = options.client_secret.clone();
        debug!(publishable_key = %self.publishable_key, "simulated session created");
        self.shared.lock().await.sessions.push(options);
        Ok(Box::new(SimulatedSession {
            client_secret,
            shared: Arc::clone(&self.shared),
        }))
    }
}

struct SimulatedSession {
    client_secret: String,
    shared: Arc<Mutex<Shared>>,
}

impl SimulatedSession {
    /// Client secrets have the form `<intent id>_secret_<nonce>`.
    fn payment_intent_id(&self) -> &str {
        self.client_secret
            .split_once("_secret_")
            .map_or(self.client_secret.as_str(), |(id, _)| id)
    }
}

#[async_trait]
impl WidgetSession for SimulatedSession {
    async fn mount(&self, target: &str) -> Result<()> {
        let mut shared = self.shared.lock().await;
        if let Some(message) = shared.mount_failure.take() {
            return Err(CheckoutError::Sdk(message));
        }
        shared.mounts.push(target.to_string());
        Ok(())
    }

    async fn confirm_payment(&self, redirect: RedirectPolicy) -> Result<ConfirmPaymentResult> {
        let mut shared = self.shared.lock().await;
        shared.confirm_calls += 1;
        debug!(?redirect, calls = shared.confirm_calls, "simulated confirm");
        Ok(shared
            .results
            .pop_front()
            .unwrap_or_else(|| ConfirmPaymentResult::succeeded(self.payment_intent_id())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intent::ConfirmOutcome;

    #[tokio::test]
    async fn test_default_confirmation_uses_secret_intent_id() {
        let sdk = SimulatedPaymentSdk::new("pk_test");
        let session = sdk
            .create_session(SessionOptions::new("pi_42_secret_xyz", None))
            .await
            .unwrap();
        session.mount("#payment-element").await.unwrap();

        let outcome = session
            .confirm_payment(RedirectPolicy::IfRequired)
            .await
            .unwrap()
            .into_outcome();
        assert_eq!(outcome, ConfirmOutcome::Succeeded(Some("pi_42".to_string())));
        assert_eq!(sdk.mounts().await, vec!["#payment-element".to_string()]);
        assert_eq!(sdk.confirm_calls().await, 1);
    }

    #[tokio::test]
    async fn test_scripted_results_come_first() {
        let sdk = SimulatedPaymentSdk::new("pk_test");
        sdk.push_result(ConfirmPaymentResult::error("Card declined")).await;
        let session = sdk
            .create_session(SessionOptions::new("cs_1", None))
            .await
            .unwrap();

        let first = session.confirm_payment(RedirectPolicy::IfRequired).await.unwrap();
        assert_eq!(
            first.into_outcome(),
            ConfirmOutcome::Declined("Card declined".to_string())
        );
        let second = session.confirm_payment(RedirectPolicy::IfRequired).await.unwrap();
        assert_eq!(
            second.into_outcome(),
            ConfirmOutcome::Succeeded(Some("cs_1".to_string()))
        );
    }

    #[tokio::test]
    async fn test_mount_failure_is_one_shot() {
        let sdk = SimulatedPaymentSdk::new("pk_test");
        sdk.fail_next_mount("element unavailable").await;
        let session = sdk
            .create_session(SessionOptions::new("cs_1", None))
            .await
            .unwrap();

        assert!(matches!(
            session.mount("#payment-element").await,
            Err(CheckoutError::Sdk(_))
        ));
        assert!(session.mount("#payment-element").await.is_ok());
    }
}
