use crate::domain::payload::GUEST_EMAIL;
use crate::domain::ports::{CheckoutForm, CheckoutPage};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

pub const VALUE_MISSING: &str = "Please fill out this field.";
pub const TYPE_MISMATCH_EMAIL: &str = "Please enter an email address.";

#[derive(Debug, Default)]
struct FormFields {
    values: HashMap<String, String>,
    checked: HashSet<String>,
    required: Vec<String>,
    reported: Vec<String>,
}

impl FormFields {
    /// First validation problem, in the order the required fields were declared.
    fn first_invalid(&self) -> Option<(String, &'static str)> {
        for field in &self.required {
            let filled = self
                .values
                .get(field)
                .is_some_and(|value| !value.trim().is_empty());
            if !filled {
                return Some((field.clone(), VALUE_MISSING));
            }
        }

        match self.values.get(GUEST_EMAIL).map(|v| v.trim()) {
            Some(email) if !email.is_empty() && !looks_like_email(email) => {
                Some((GUEST_EMAIL.to_string(), TYPE_MISMATCH_EMAIL))
            }
            _ => None,
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

/// A form held in memory, with required-field and email validation.
///
/// Clones share the same fields, so a test can keep a handle and type into
/// the form the orchestrator owns.
#[derive(Debug, Default, Clone)]
pub struct InMemoryForm {
    fields: Arc<RwLock<FormFields>>,
}

impl InMemoryForm {
    pub fn new<I, S>(required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_values(required, HashMap::new(), HashSet::new())
    }

    pub fn with_values<I, S>(
        required: I,
        values: HashMap<String, String>,
        checked: HashSet<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = FormFields {
            values,
            checked,
            required: required.into_iter().map(Into::into).collect(),
            reported: Vec::new(),
        };
        Self {
            fields: Arc::new(RwLock::new(fields)),
        }
    }

    pub async fn set_value(&self, field: &str, value: &str) {
        let mut fields = self.fields.write().await;
        fields.values.insert(field.to_string(), value.to_string());
    }

    pub async fn set_checked(&self, field: &str, checked: bool) {
        let mut fields = self.fields.write().await;
        if checked {
            fields.checked.insert(field.to_string());
        } else {
            fields.checked.remove(field);
        }
    }

    /// Validity messages shown so far, as `field: message`.
    pub async fn reported(&self) -> Vec<String> {
        self.fields.read().await.reported.clone()
    }
}

#[async_trait]
impl CheckoutForm for InMemoryForm {
    async fn check_validity(&self) -> bool {
        self.fields.read().await.first_invalid().is_none()
    }

    async fn report_validity(&self) {
        let mut fields = self.fields.write().await;
        if let Some((field, message)) = fields.first_invalid() {
            fields.reported.push(format!("{field}: {message}"));
        }
    }

    async fn value(&self, field: &str) -> Option<String> {
        self.fields.read().await.values.get(field).cloned()
    }

    async fn is_checked(&self, field: &str) -> bool {
        self.fields.read().await.checked.contains(field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    SubmitEnabled(bool),
    Busy(bool),
    Error(String),
    Navigated(String),
}

/// A page that records every affordance change in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingPage {
    events: Arc<RwLock<Vec<PageEvent>>>,
}

impl RecordingPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<PageEvent> {
        self.events.read().await.clone()
    }

    pub async fn errors(&self) -> Vec<String> {
        self.events
            .read()
            .await
            .iter()
            .filter_map(|event| match event {
                PageEvent::Error(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub async fn navigations(&self) -> Vec<String> {
        self.events
            .read()
            .await
            .iter()
            .filter_map(|event| match event {
                PageEvent::Navigated(url) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    /// Current state of the submit button; disabled until told otherwise.
    pub async fn submit_enabled(&self) -> bool {
        self.events
            .read()
            .await
            .iter()
            .rev()
            .find_map(|event| match event {
                PageEvent::SubmitEnabled(enabled) => Some(*enabled),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub async fn busy(&self) -> bool {
        self.events
            .read()
            .await
            .iter()
            .rev()
            .find_map(|event| match event {
                PageEvent::Busy(busy) => Some(*busy),
                _ => None,
            })
            .unwrap_or(false)
    }

    async fn record(&self, event: PageEvent) {
        self.events.write().await.push(event);
    }
}

#[async_trait]
impl CheckoutPage for RecordingPage {
    async fn set_submit_enabled(&self, enabled: bool) {
        self.record(PageEvent::SubmitEnabled(enabled)).await;
    }

    async fn set_busy(&self, busy: bool) {
        self.record(PageEvent::Busy(busy)).await;
    }

    async fn show_error(&self, message: &str) {
        self.record(PageEvent::Error(message.to_string())).await;
    }

    async fn navigate(&self, url: &str) {
        self.record(PageEvent::Navigated(url.to_string())).await;
    }
}
