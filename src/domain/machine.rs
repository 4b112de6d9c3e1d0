//! The checkout state machine.
//!
//! `CheckoutMachine::handle` is a pure function of the current state and one
//! event. It never performs I/O; it returns the effects the caller must run,
//! and the caller feeds completions back in as further events.

use super::intent::{ConfirmOutcome, CreateIntentResponse};
use tracing::debug;

pub const MISSING_CLIENT_SECRET: &str = "Missing client secret";
pub const PAYMENT_PROCESSING: &str =
    "Payment is processing. You’ll be redirected once it completes.";

/// An intent whose widget has been mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountedIntent {
    pub payment_intent_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Creation,
    Confirmation,
    Processing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CheckoutState {
    #[default]
    Idle,
    /// A create-intent request or the widget mount is in flight.
    Creating,
    Mounted(MountedIntent),
    /// Update-intent and confirm-payment are in flight.
    Confirming(MountedIntent),
    /// Terminal; the redirect has been issued for this intent id.
    Succeeded(String),
    /// Recoverable. Without an intent it behaves like `Idle`, with one it
    /// behaves like `Mounted`.
    Failed {
        failure: Failure,
        intent: Option<MountedIntent>,
    },
    /// Terminal until reload: bad page configuration or a broken widget.
    Halted(String),
}

impl CheckoutState {
    pub fn mounted_intent(&self) -> Option<&MountedIntent> {
        match self {
            Self::Mounted(intent) | Self::Confirming(intent) => Some(intent),
            Self::Failed {
                intent: Some(intent),
                ..
            } => Some(intent),
            _ => None,
        }
    }

    pub fn widget_ready(&self) -> bool {
        self.mounted_intent().is_some() || matches!(self, Self::Succeeded(_))
    }

    fn accepts_creation(&self) -> bool {
        matches!(self, Self::Idle | Self::Failed { intent: None, .. })
    }

    /// True while a confirmation is in flight or has already redirected.
    fn awaiting_payment(&self) -> bool {
        matches!(self, Self::Confirming(_) | Self::Succeeded(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// An input/change event or the initial load, with the form's validity.
    FormChanged { valid: bool },
    IntentCreated(CreateIntentResponse),
    IntentCreationFailed(String),
    WidgetMounted(MountedIntent),
    WidgetFailed(String),
    Submitted {
        valid: bool,
        contact_email: Option<String>,
    },
    /// The update-intent call finished, successfully or not.
    IntentUpdateSettled,
    ConfirmSettled(ConfirmOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SetSubmitEnabled(bool),
    SetBusy(bool),
    ReportValidity,
    CreateIntent,
    MountWidget {
        client_secret: String,
        intent: MountedIntent,
    },
    UpdateIntent {
        payment_intent_id: String,
        contact_email: String,
    },
    ConfirmPayment,
    Navigate {
        payment_intent_id: String,
    },
    ShowError(String),
}

#[derive(Debug, Clone, Default)]
pub struct CheckoutMachine {
    state: CheckoutState,
    form_valid: bool,
    update_enabled: bool,
}

impl CheckoutMachine {
    /// `update_enabled` tells whether an update-intent endpoint exists.
    pub fn new(update_enabled: bool) -> Self {
        Self {
            state: CheckoutState::Idle,
            form_valid: false,
            update_enabled,
        }
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    pub fn submit_enabled(&self) -> bool {
        submit_enabled(&self.state, self.form_valid)
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        let current = std::mem::take(&mut self.state);
        let (next, effects) = self.transition(current, event);
        debug!(state = ?next, effects = effects.len(), "checkout transition");
        self.state = next;
        effects
    }

    fn transition(&mut self, state: CheckoutState, event: Event) -> (CheckoutState, Vec<Effect>) {
        use CheckoutState as S;

        match (state, event) {
            (S::Halted(reason), _) => (S::Halted(reason), Vec::new()),

            (state, Event::FormChanged { valid }) => {
                self.form_valid = valid;
                if valid && state.accepts_creation() {
                    let next = S::Creating;
                    let effects = vec![self.submit_effect(&next), Effect::CreateIntent];
                    (next, effects)
                } else {
                    let effects = vec![self.submit_effect(&state)];
                    (state, effects)
                }
            }

            (S::Creating, Event::IntentCreated(response)) => match response.client_secret() {
                Some(secret) => {
                    let intent = MountedIntent {
                        payment_intent_id: response.payment_intent_id().map(str::to_string),
                    };
                    let effect = Effect::MountWidget {
                        client_secret: secret.to_string(),
                        intent,
                    };
                    (S::Creating, vec![effect])
                }
                None => self.fail_creation(MISSING_CLIENT_SECRET.to_string()),
            },
            (S::Creating, Event::IntentCreationFailed(message)) => self.fail_creation(message),
            (S::Creating, Event::WidgetMounted(intent)) => {
                let next = S::Mounted(intent);
                let effects = vec![self.submit_effect(&next)];
                (next, effects)
            }
            (S::Creating, Event::WidgetFailed(message)) => (
                S::Halted(message.clone()),
                vec![Effect::SetSubmitEnabled(false), Effect::ShowError(message)],
            ),

            (S::Confirming(intent), Event::Submitted { .. }) => (S::Confirming(intent), Vec::new()),
            (
                state,
                Event::Submitted {
                    valid,
                    contact_email,
                },
            ) => self.submit(state, valid, contact_email),

            (S::Confirming(intent), Event::IntentUpdateSettled) => {
                (S::Confirming(intent), vec![Effect::ConfirmPayment])
            }
            (S::Confirming(intent), Event::ConfirmSettled(outcome)) => self.settle(intent, outcome),

            (state, event) => {
                debug!(?state, ?event, "event ignored in current state");
                (state, Vec::new())
            }
        }
    }

    fn submit(
        &mut self,
        state: CheckoutState,
        valid: bool,
        contact_email: Option<String>,
    ) -> (CheckoutState, Vec<Effect>) {
        self.form_valid = valid;

        if !valid {
            let effects = vec![Effect::ReportValidity, self.submit_effect(&state)];
            return (state, effects);
        }

        // Nothing to confirm until the widget is mounted.
        let Some(intent) = state.mounted_intent().cloned() else {
            return (state, Vec::new());
        };

        let mut effects = vec![Effect::SetSubmitEnabled(false), Effect::SetBusy(true)];
        let contact_email = contact_email.filter(|email| !email.trim().is_empty());
        match (self.update_enabled, &intent.payment_intent_id, contact_email) {
            (true, Some(id), Some(email)) => effects.push(Effect::UpdateIntent {
                payment_intent_id: id.clone(),
                contact_email: email,
            }),
            _ => effects.push(Effect::ConfirmPayment),
        }

        (CheckoutState::Confirming(intent), effects)
    }

    fn settle(
        &mut self,
        intent: MountedIntent,
        outcome: ConfirmOutcome,
    ) -> (CheckoutState, Vec<Effect>) {
        match outcome {
            ConfirmOutcome::Succeeded(id) => {
                let id = id.or(intent.payment_intent_id).unwrap_or_default();
                let effects = vec![Effect::Navigate {
                    payment_intent_id: id.clone(),
                }];
                (CheckoutState::Succeeded(id), effects)
            }
            ConfirmOutcome::Declined(message) => {
                let next = CheckoutState::Failed {
                    failure: Failure {
                        kind: FailureKind::Confirmation,
                        message: message.clone(),
                    },
                    intent: Some(intent),
                };
                let effects = vec![
                    Effect::ShowError(message),
                    Effect::SetBusy(false),
                    self.submit_effect(&next),
                ];
                (next, effects)
            }
            ConfirmOutcome::Processing(_) => {
                let next = CheckoutState::Failed {
                    failure: Failure {
                        kind: FailureKind::Processing,
                        message: PAYMENT_PROCESSING.to_string(),
                    },
                    intent: Some(intent),
                };
                (next, vec![Effect::ShowError(PAYMENT_PROCESSING.to_string())])
            }
        }
    }

    fn fail_creation(&self, message: String) -> (CheckoutState, Vec<Effect>) {
        let next = CheckoutState::Failed {
            failure: Failure {
                kind: FailureKind::Creation,
                message: message.clone(),
            },
            intent: None,
        };
        let effects = vec![Effect::ShowError(message), self.submit_effect(&next)];
        (next, effects)
    }

    fn submit_effect(&self, state: &CheckoutState) -> Effect {
        Effect::SetSubmitEnabled(submit_enabled(state, self.form_valid))
    }
}

fn submit_enabled(state: &CheckoutState, form_valid: bool) -> bool {
    form_valid && state.widget_ready() && !state.awaiting_payment()
}
