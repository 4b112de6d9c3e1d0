#![allow(dead_code)]

use async_trait::async_trait;
use inline_checkout::application::orchestrator::CheckoutOrchestrator;
use inline_checkout::domain::config::CheckoutConfig;
use inline_checkout::domain::intent::CreateIntentResponse;
use inline_checkout::domain::payload::{CreateIntentPayload, UpdateIntentPayload};
use inline_checkout::domain::ports::CheckoutBackend;
use inline_checkout::error::{CheckoutError, Result};
use inline_checkout::infrastructure::in_memory::{InMemoryForm, RecordingPage};
use inline_checkout::infrastructure::simulated_sdk::SimulatedPaymentSdk;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

pub const REQUIRED_FIELDS: [&str; 5] = [
    "shipping_name",
    "shipping_line1",
    "shipping_city",
    "shipping_postcode",
    "shipping_country",
];

pub enum CreateReply {
    Ok(CreateIntentResponse),
    Status(u16, String),
    Transport(String),
}

#[derive(Default)]
struct Script {
    create_replies: VecDeque<CreateReply>,
    create_payloads: Vec<CreateIntentPayload>,
    create_endpoints: Vec<String>,
    updates: Vec<UpdateIntentPayload>,
    fail_updates: bool,
}

/// A backend answering from a script. Calls can be held at a gate to
/// simulate a request that is still in flight.
#[derive(Clone, Default)]
pub struct ScriptedBackend {
    script: Arc<Mutex<Script>>,
    create_gate: Option<Arc<Notify>>,
    update_gate: Option<Arc<Notify>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_create_gate(mut self) -> Self {
        self.create_gate = Some(Arc::new(Notify::new()));
        self
    }

    pub fn with_update_gate(mut self) -> Self {
        self.update_gate = Some(Arc::new(Notify::new()));
        self
    }

    pub fn release_create(&self) {
        if let Some(gate) = &self.create_gate {
            gate.notify_one();
        }
    }

    pub fn release_update(&self) {
        if let Some(gate) = &self.update_gate {
            gate.notify_one();
        }
    }

    pub async fn reply(&self, reply: CreateReply) {
        self.script.lock().await.create_replies.push_back(reply);
    }

    pub async fn fail_updates(&self) {
        self.script.lock().await.fail_updates = true;
    }

    pub async fn create_calls(&self) -> usize {
        self.script.lock().await.create_payloads.len()
    }

    pub async fn create_payloads(&self) -> Vec<CreateIntentPayload> {
        self.script.lock().await.create_payloads.clone()
    }

    pub async fn create_endpoints(&self) -> Vec<String> {
        self.script.lock().await.create_endpoints.clone()
    }

    pub async fn updates(&self) -> Vec<UpdateIntentPayload> {
        self.script.lock().await.updates.clone()
    }
}

#[async_trait]
impl CheckoutBackend for ScriptedBackend {
    async fn create_intent(
        &self,
        endpoint: &str,
        payload: &CreateIntentPayload,
    ) -> Result<CreateIntentResponse> {
        {
            let mut script = self.script.lock().await;
            script.create_payloads.push(payload.clone());
            script.create_endpoints.push(endpoint.to_string());
        }
        if let Some(gate) = &self.create_gate {
            gate.notified().await;
        }

        let reply = self.script.lock().await.create_replies.pop_front();
        match reply {
            Some(CreateReply::Ok(response)) => Ok(response),
            Some(CreateReply::Status(status, body)) => Err(CheckoutError::Backend { status, body }),
            Some(CreateReply::Transport(message)) => Err(CheckoutError::Io(
                std::io::Error::new(std::io::ErrorKind::ConnectionReset, message),
            )),
            None => Ok(CreateIntentResponse::new(
                Some("pi_1_secret_abc"),
                Some("pi_1"),
            )),
        }
    }

    async fn update_intent(&self, _endpoint: &str, update: &UpdateIntentPayload) -> Result<()> {
        self.script.lock().await.updates.push(update.clone());
        if let Some(gate) = &self.update_gate {
            gate.notified().await;
        }

        if self.script.lock().await.fail_updates {
            return Err(CheckoutError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "network down",
            )));
        }
        Ok(())
    }
}

pub fn config(update: bool) -> CheckoutConfig {
    CheckoutConfig {
        publishable_key: "pk_test_123".to_string(),
        create_url: "/orders/payments/create-intent/".to_string(),
        update_url: update.then(|| "/orders/payments/update-intent/".to_string()),
        success_url: "success".to_string(),
    }
}

pub fn empty_form() -> InMemoryForm {
    InMemoryForm::new(REQUIRED_FIELDS)
}

pub async fn filled_form() -> InMemoryForm {
    let form = empty_form();
    form.set_value("guest_email", "ada@example.com").await;
    form.set_value("shipping_name", "Ada Lovelace").await;
    form.set_value("shipping_line1", "12 St James's Square").await;
    form.set_value("shipping_city", "London").await;
    form.set_value("shipping_postcode", "SW1Y 4JH").await;
    form.set_value("shipping_country", "gb").await;
    form
}

pub struct Harness {
    pub orchestrator: CheckoutOrchestrator,
    pub form: InMemoryForm,
    pub page: RecordingPage,
    pub backend: ScriptedBackend,
    pub sdk: SimulatedPaymentSdk,
}

pub fn harness(
    config: CheckoutConfig,
    form: InMemoryForm,
    backend: ScriptedBackend,
) -> Harness {
    let page = RecordingPage::new();
    let sdk = SimulatedPaymentSdk::new(&config.publishable_key);
    let orchestrator = CheckoutOrchestrator::new(
        config,
        sdk.boxed(),
        Box::new(form.clone()),
        Box::new(page.clone()),
        Box::new(backend.clone()),
    );

    Harness {
        orchestrator,
        form,
        page,
        backend,
        sdk,
    }
}
