//! Modal sequencing module
//!
//! Decides which of the shell's overlay dialogs (authentication, plan
//! purchase, profile completion) is visible, enforces at-most-one-open,
//! and chains purchase into profile completion after external payment
//! redirects.

mod redirect;
mod sequencer;
mod state;

#[cfg(test)]
mod tests;

pub use redirect::{CheckoutConsumption, CheckoutOutcome, CheckoutSignal};
pub use sequencer::ModalSequencer;
pub use state::{ModalState, PurchaseModal};
