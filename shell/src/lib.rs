//! # TalentHub Shell
//!
//! Top-level wiring: one [`AppShell`] owns the session service, the
//! modal sequencer, the event channel, and the module host, and runs
//! the boot sequence that stitches them together.

mod app;

pub use app::{AppShell, BootReport};
