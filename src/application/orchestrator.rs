use crate::domain::config::{CheckoutConfig, PAYMENT_ELEMENT_TARGET, SDK_NOT_LOADED};
use crate::domain::intent::{CREATE_INTENT_FAILED, ConfirmOutcome, PAYMENT_FAILED};
use crate::domain::machine::{CheckoutMachine, CheckoutState, Effect, Event, MountedIntent};
use crate::domain::payload::{
    CreateIntentPayload, GUEST_EMAIL, PAYLOAD_FIELDS, SAVE_SHIPPING, UpdateIntentPayload,
    non_empty,
};
use crate::domain::ports::{
    BackendBox, CheckoutPage, FormBox, PageBox, PaymentSdkBox, WidgetSessionBox,
};
use crate::domain::widget::{RedirectPolicy, SessionOptions};
use crate::error::{CheckoutError, Result};
use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Drives one checkout attempt.
///
/// All mutable state lives in a single `CheckoutMachine`. The lock around it
/// is only held while a transition is computed, never across a network call,
/// so events arriving while a request is in flight are judged against the
/// in-flight state and absorbed by it.
pub struct CheckoutOrchestrator {
    config: CheckoutConfig,
    form: FormBox,
    page: PageBox,
    backend: BackendBox,
    sdk: PaymentSdkBox,
    machine: Mutex<CheckoutMachine>,
    session: Mutex<Option<WidgetSessionBox>>,
}

impl CheckoutOrchestrator {
    /// Creates an orchestrator in the `Idle` state.
    ///
    /// # Arguments
    ///
    /// * `config` - The page-provided endpoints and keys.
    /// * `sdk` - A payment SDK client built from `config.publishable_key`.
    pub fn new(
        config: CheckoutConfig,
        sdk: PaymentSdkBox,
        form: FormBox,
        page: PageBox,
        backend: BackendBox,
    ) -> Self {
        let machine = CheckoutMachine::new(config.update_url.is_some());
        Self {
            config,
            form,
            page,
            backend,
            sdk,
            machine: Mutex::new(machine),
            session: Mutex::new(None),
        }
    }

    /// Reads the page configuration and loads the SDK.
    ///
    /// Configuration errors are fatal: they are shown once through the page's
    /// error region and returned; no orchestrator is built.
    pub async fn bootstrap<F>(
        dataset: &HashMap<String, String>,
        sdk_loader: Option<F>,
        form: FormBox,
        page: PageBox,
        backend: BackendBox,
    ) -> Result<Self>
    where
        F: FnOnce(&str) -> PaymentSdkBox,
    {
        let config = match CheckoutConfig::from_dataset(dataset) {
            Ok(config) => config,
            Err(err) => return Err(Self::halt(page.as_ref(), err).await),
        };
        let Some(load) = sdk_loader else {
            let err = CheckoutError::Config(SDK_NOT_LOADED.to_string());
            return Err(Self::halt(page.as_ref(), err).await);
        };

        let sdk = load(&config.publishable_key);
        Ok(Self::new(config, sdk, form, page, backend))
    }

    async fn halt(page: &dyn CheckoutPage, err: CheckoutError) -> CheckoutError {
        error!(error = %err, "checkout configuration error");
        page.show_error(&err.to_string()).await;
        err
    }

    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    pub async fn state(&self) -> CheckoutState {
        self.machine.lock().await.state().clone()
    }

    pub async fn submit_enabled(&self) -> bool {
        self.machine.lock().await.submit_enabled()
    }

    /// Initial evaluation on page load, so autofilled forms start creation
    /// without waiting for user input.
    pub async fn start(&self) {
        info!("starting inline checkout");
        self.on_form_event().await;
    }

    /// Handles an input or change event on the form.
    pub async fn on_form_event(&self) {
        let valid = self.form.check_validity().await;
        self.dispatch(Event::FormChanged { valid }).await;
    }

    /// Handles a submit event on the form.
    pub async fn on_submit(&self) {
        let valid = self.form.check_validity().await;
        let contact_email = self.contact_email().await;
        self.dispatch(Event::Submitted {
            valid,
            contact_email,
        })
        .await;
    }

    async fn dispatch(&self, event: Event) {
        let mut pending = VecDeque::from([event]);
        while let Some(event) = pending.pop_front() {
            let effects = self.machine.lock().await.handle(event);
            for effect in effects {
                if let Some(next) = self.perform(effect).await {
                    pending.push_back(next);
                }
            }
        }
    }

    async fn perform(&self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::SetSubmitEnabled(enabled) => {
                self.page.set_submit_enabled(enabled).await;
                None
            }
            Effect::SetBusy(busy) => {
                self.page.set_busy(busy).await;
                None
            }
            Effect::ReportValidity => {
                self.form.report_validity().await;
                None
            }
            Effect::ShowError(message) => {
                error!(%message, "checkout failure");
                self.page.show_error(&message).await;
                None
            }
            Effect::CreateIntent => Some(self.create_intent().await),
            Effect::MountWidget {
                client_secret,
                intent,
            } => Some(self.mount_widget(client_secret, intent).await),
            Effect::UpdateIntent {
                payment_intent_id,
                contact_email,
            } => {
                self.update_intent(payment_intent_id, contact_email).await;
                Some(Event::IntentUpdateSettled)
            }
            Effect::ConfirmPayment => Some(Event::ConfirmSettled(self.confirm_payment().await)),
            Effect::Navigate { payment_intent_id } => {
                let url = self.config.success_redirect(&payment_intent_id);
                info!(%payment_intent_id, %url, "payment succeeded, redirecting");
                self.page.navigate(&url).await;
                None
            }
        }
    }

    async fn create_intent(&self) -> Event {
        let payload = self.collect_payload().await;
        info!("creating payment intent");

        match self.backend.create_intent(&self.config.create_url, &payload).await {
            Ok(response) => Event::IntentCreated(response),
            Err(CheckoutError::Backend { status, body }) => {
                warn!(status, "create-intent rejected");
                if body.trim().is_empty() {
                    Event::IntentCreationFailed(CREATE_INTENT_FAILED.to_string())
                } else {
                    Event::IntentCreationFailed(body)
                }
            }
            Err(err) => Event::IntentCreationFailed(err.to_string()),
        }
    }

    async fn collect_payload(&self) -> CreateIntentPayload {
        let mut values = HashMap::new();
        for field in PAYLOAD_FIELDS {
            if let Some(value) = self.form.value(field).await {
                values.insert(field.to_string(), value);
            }
        }
        let save_shipping = self.form.is_checked(SAVE_SHIPPING).await;
        CreateIntentPayload::from_form(&values, save_shipping)
    }

    async fn mount_widget(&self, client_secret: String, intent: MountedIntent) -> Event {
        let mut slot = self.session.lock().await;
        if slot.is_some() {
            return Event::WidgetFailed("Payment widget already mounted".to_string());
        }

        let options = SessionOptions::new(client_secret, self.contact_email().await);
        let session = match self.sdk.create_session(options).await {
            Ok(session) => session,
            Err(err) => return Event::WidgetFailed(err.to_string()),
        };
        if let Err(err) = session.mount(PAYMENT_ELEMENT_TARGET).await {
            return Event::WidgetFailed(err.to_string());
        }

        *slot = Some(session);
        info!(payment_intent_id = ?intent.payment_intent_id, "payment widget mounted");
        Event::WidgetMounted(intent)
    }

    async fn update_intent(&self, payment_intent_id: String, contact_email: String) {
        // The machine only asks for an update when an endpoint is configured.
        let Some(endpoint) = self.config.update_url.as_deref() else {
            return;
        };
        let update = UpdateIntentPayload {
            pi_id: payment_intent_id,
            guest_email: contact_email,
        };
        if let Err(err) = self.backend.update_intent(endpoint, &update).await {
            warn!(error = %err, "update-intent failed");
        }
    }

    async fn confirm_payment(&self) -> ConfirmOutcome {
        let slot = self.session.lock().await;
        let Some(session) = slot.as_ref() else {
            return ConfirmOutcome::Declined(PAYMENT_FAILED.to_string());
        };

        match session.confirm_payment(RedirectPolicy::IfRequired).await {
            Ok(result) => result.into_outcome(),
            Err(err) => ConfirmOutcome::Declined(err.to_string()),
        }
    }

    async fn contact_email(&self) -> Option<String> {
        non_empty(self.form.value(GUEST_EMAIL).await.as_deref())
    }
}
