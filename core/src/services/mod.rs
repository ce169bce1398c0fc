//! Orchestration services: the session lifecycle and the modal sequence.

pub mod modal;
pub mod session;

// Re-export commonly used types
pub use modal::{
    CheckoutConsumption, CheckoutOutcome, ModalSequencer, ModalState, PurchaseModal,
};
pub use session::{
    OAuthOutcome, RedirectConsumption, RefreshOutcome, SessionService, VerifyOutcome,
};
