//! Window-scoped publish/subscribe channel between the shell and the
//! hosted module.
//!
//! Delivery is synchronous, at-most-once, to currently registered
//! subscribers only: no queuing, no persistence, no cross-instance
//! delivery. The catalogue of message types is fixed; see
//! [`message::ShellEvent`].

mod channel;
mod message;


pub use channel::{EventChannel, Subscription};
pub use message::{AuthMode, EventKind, NavGroup, NavItem, ShellEvent};
