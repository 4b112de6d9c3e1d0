use super::intent::{ConfirmPaymentResult, CreateIntentResponse};
use super::payload::{CreateIntentPayload, UpdateIntentPayload};
use super::widget::{RedirectPolicy, SessionOptions};
use crate::error::Result;
use async_trait::async_trait;

/// The browser form-validation surface.
#[async_trait]
pub trait CheckoutForm: Send + Sync {
    async fn check_validity(&self) -> bool;
    /// Shows the native validity message for the first invalid field.
    async fn report_validity(&self);
    async fn value(&self, field: &str) -> Option<String>;
    async fn is_checked(&self, field: &str) -> bool;
}

/// UI affordances toggled by the orchestrator.
#[async_trait]
pub trait CheckoutPage: Send + Sync {
    async fn set_submit_enabled(&self, enabled: bool);
    async fn set_busy(&self, busy: bool);
    /// The single inline error region.
    async fn show_error(&self, message: &str);
    async fn navigate(&self, url: &str);
}

/// The storefront's checkout endpoints. `endpoint` is the URL the page
/// configured for the call.
#[async_trait]
pub trait CheckoutBackend: Send + Sync {
    async fn create_intent(
        &self,
        endpoint: &str,
        payload: &CreateIntentPayload,
    ) -> Result<CreateIntentResponse>;
    async fn update_intent(&self, endpoint: &str, update: &UpdateIntentPayload) -> Result<()>;
}

/// A payment SDK client, already constructed with a publishable key.
#[async_trait]
pub trait PaymentSdk: Send + Sync {
    async fn create_session(&self, options: SessionOptions) -> Result<WidgetSessionBox>;
}

#[async_trait]
pub trait WidgetSession: Send + Sync {
    async fn mount(&self, target: &str) -> Result<()>;
    async fn confirm_payment(&self, redirect: RedirectPolicy) -> Result<ConfirmPaymentResult>;
}

pub type FormBox = Box<dyn CheckoutForm>;
pub type PageBox = Box<dyn CheckoutPage>;
pub type BackendBox = Box<dyn CheckoutBackend>;
pub type PaymentSdkBox = Box<dyn PaymentSdk>;
pub type WidgetSessionBox = Box<dyn WidgetSession>;
