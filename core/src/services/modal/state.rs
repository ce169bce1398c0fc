//! Modal state vocabulary

use crate::domain::entities::user::UserRole;
use crate::events::AuthMode;

/// Parameters of an open plan-purchase modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseModal {
    /// Which role's pricing tab is shown
    pub tab: UserRole,
    /// Whether a "skip for later" action is rendered
    pub skippable: bool,
    /// Whether closing this modal chains into profile completion
    pub chain_profile: bool,
    /// Whether the modal opens in post-checkout confirmation mode
    pub confirmation: bool,
}

impl PurchaseModal {
    /// The mandatory purchase framing for a candidate without a
    /// visibility grant: no skip action, no chaining yet
    pub fn required() -> Self {
        Self {
            tab: UserRole::Candidate,
            skippable: false,
            chain_profile: false,
            confirmation: false,
        }
    }

    /// The upgrade prompt shown to a vendor on the free tier
    pub fn upgrade_prompt() -> Self {
        Self {
            tab: UserRole::Vendor,
            skippable: true,
            chain_profile: false,
            confirmation: false,
        }
    }

    /// Post-checkout confirmation mode
    pub fn confirmation(tab: UserRole, chain_profile: bool) -> Self {
        Self {
            tab,
            skippable: false,
            chain_profile,
            confirmation: true,
        }
    }
}

/// Which overlay dialog is visible
///
/// At most one is open at a time. `Idle` is the resting state; any
/// state can be forced back to `AuthOpen` because a sign-in request
/// always wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    /// No modal open
    Idle,
    /// The authentication modal, on the given role's form
    AuthOpen { role: UserRole, mode: AuthMode },
    /// The plan-purchase modal with its display parameters
    PurchaseOpen(PurchaseModal),
    /// The profile completion flow
    ProfileOpen,
}

impl Default for ModalState {
    fn default() -> Self {
        ModalState::Idle
    }
}
