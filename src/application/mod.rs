//! Application layer driving the checkout state machine.
//!
//! `CheckoutOrchestrator` turns form and submit events into transitions of
//! the pure `CheckoutMachine` and runs the resulting effects against the
//! backend, the payment SDK and the page.

pub mod orchestrator;
