//! The fixed vocabulary of cross-module messages.

use serde::{Deserialize, Serialize};

use crate::domain::entities::user::UserRole;

/// Which authentication form the auth modal should open on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    Login,
    Register,
}

/// A single link inside a navigation group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    /// Link label
    pub label: String,
    /// Link target
    pub href: String,
}

/// An ordered group of navigation links contributed by the module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavGroup {
    /// Group heading
    pub label: String,
    /// Links in display order
    pub items: Vec<NavItem>,
}

/// A message on the shell event channel
///
/// Tagged variants give compile-time payload checking per message type;
/// the serialized form is `{ "type": ..., "detail": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail", rename_all = "kebab-case")]
pub enum ShellEvent {
    /// module to shell, and shell-internal: open the authentication modal
    OpenLogin { role: UserRole, mode: AuthMode },

    /// shell-internal, and module to shell: open the plan-purchase modal
    OpenPricing { tab: UserRole, chain_profile: bool },

    /// shell to module: the plan-purchase modal has closed
    PricingClosed,

    /// shell to module: open the profile completion flow
    OpenProfile,

    /// shell to module: the job-type filter changed
    JobTypeFilter { filter: String },

    /// shell to module: who just signed in
    LoginContext { role: UserRole },

    /// module to shell: replace the sub-navigation groups
    SubnavUpdate { groups: Vec<NavGroup> },

    /// module to shell: replace the breadcrumb trail
    BreadcrumbUpdate { segments: Vec<String> },
}

/// Fieldless tags for subscription keying, one per catalogued message type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    OpenLogin,
    OpenPricing,
    PricingClosed,
    OpenProfile,
    JobTypeFilter,
    LoginContext,
    SubnavUpdate,
    BreadcrumbUpdate,
}

impl ShellEvent {
    /// The subscription key for this message
    pub fn kind(&self) -> EventKind {
        match self {
            ShellEvent::OpenLogin { .. } => EventKind::OpenLogin,
            ShellEvent::OpenPricing { .. } => EventKind::OpenPricing,
            ShellEvent::PricingClosed => EventKind::PricingClosed,
            ShellEvent::OpenProfile => EventKind::OpenProfile,
            ShellEvent::JobTypeFilter { .. } => EventKind::JobTypeFilter,
            ShellEvent::LoginContext { .. } => EventKind::LoginContext,
            ShellEvent::SubnavUpdate { .. } => EventKind::SubnavUpdate,
            ShellEvent::BreadcrumbUpdate { .. } => EventKind::BreadcrumbUpdate,
        }
    }
}
