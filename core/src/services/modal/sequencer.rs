//! The modal sequencer and its transition policy

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info};

use th_shared::config::ModalConfig;
use th_shared::utils::url_sanitize;

use crate::domain::entities::user::{UserRecord, UserRole};
use crate::errors::DomainResult;
use crate::events::{AuthMode, EventChannel, EventKind, ShellEvent, Subscription};

use super::redirect::{CheckoutConsumption, CheckoutOutcome, CheckoutSignal};
use super::state::{ModalState, PurchaseModal};

struct SequencerInner {
    channel: EventChannel,
    state: Mutex<ModalState>,
    chain_delay: Duration,
}

/// Decides which overlay dialog is visible and chains them
///
/// The policy is state-driven: transitions happen on session events
/// (authentication resolving, checkout returning) rather than on raw
/// user input, so the same rules hold no matter which surface triggered
/// the sign-in. Clones share state, like [`EventChannel`].
#[derive(Clone)]
pub struct ModalSequencer {
    inner: Arc<SequencerInner>,
}

impl ModalSequencer {
    pub fn new(channel: EventChannel, config: &ModalConfig) -> Self {
        Self {
            inner: Arc::new(SequencerInner {
                channel,
                state: Mutex::new(ModalState::Idle),
                chain_delay: config.chain_delay(),
            }),
        }
    }

    /// Register the channel subscriptions that let the hosted module
    /// drive the sequencer
    ///
    /// The returned guards must be kept alive by the owning shell;
    /// dropping them detaches the sequencer from the channel.
    pub fn attach(&self) -> Vec<Subscription> {
        let sequencer = self.clone();
        let open_login = self
            .inner
            .channel
            .subscribe(EventKind::OpenLogin, move |event| {
                if let ShellEvent::OpenLogin { role, mode } = event {
                    sequencer.open_auth(*role, *mode);
                }
            });

        let sequencer = self.clone();
        let open_pricing = self
            .inner
            .channel
            .subscribe(EventKind::OpenPricing, move |event| {
                if let ShellEvent::OpenPricing { tab, chain_profile } = event {
                    // Module-requested pricing is always dismissable
                    sequencer.open_purchase(PurchaseModal {
                        tab: *tab,
                        skippable: true,
                        chain_profile: *chain_profile,
                        confirmation: false,
                    });
                }
            });

        vec![open_login, open_pricing]
    }

    /// Open the authentication modal; a sign-in request wins from any
    /// state
    pub fn open_auth(&self, role: UserRole, mode: AuthMode) {
        let mut state = self.inner.state.lock().expect("modal state poisoned");
        debug!(%role, ?mode, "opening authentication modal");
        *state = ModalState::AuthOpen { role, mode };
    }

    /// Open the plan-purchase modal with explicit parameters
    pub fn open_purchase(&self, modal: PurchaseModal) {
        let mut state = self.inner.state.lock().expect("modal state poisoned");
        *state = ModalState::PurchaseOpen(modal);
    }

    /// Apply the post-authentication policy for the signed-in user
    ///
    /// A candidate without a visibility grant must pass through the
    /// purchase framing with no skip action, every time. A vendor still
    /// on the free tier gets a skippable upgrade prompt. Everyone else
    /// just sees the authentication modal close.
    pub fn resolve_authentication(&self, user: &UserRecord) {
        self.inner
            .channel
            .publish(ShellEvent::LoginContext { role: user.role });

        let next = if user.is_candidate() && !user.has_visibility() {
            ModalState::PurchaseOpen(PurchaseModal::required())
        } else if user.is_vendor() && user.is_free_plan() {
            ModalState::PurchaseOpen(PurchaseModal::upgrade_prompt())
        } else {
            ModalState::Idle
        };

        info!(role = %user.role, next = ?next, "authentication resolved");
        *self.inner.state.lock().expect("modal state poisoned") = next;
    }

    /// Close the plan-purchase modal
    ///
    /// Always announces the close on the channel. If the modal carried
    /// the chain flag, exactly one profile-completion open is scheduled
    /// after the configured delay so the closing modal can unmount
    /// first.
    pub fn close_purchase(&self) {
        let chain = {
            let mut state = self.inner.state.lock().expect("modal state poisoned");
            let ModalState::PurchaseOpen(modal) = *state else {
                return;
            };
            *state = ModalState::Idle;
            modal.chain_profile
        };

        self.inner.channel.publish(ShellEvent::PricingClosed);

        if chain {
            self.schedule_profile_open();
        }
    }

    /// Dismiss a skippable purchase modal, leaving the session alone
    ///
    /// A no-op on the mandatory variant. A skip is still a close: it is
    /// announced on the channel and honors the chain flag.
    pub fn skip_purchase(&self) {
        let chain = {
            let mut state = self.inner.state.lock().expect("modal state poisoned");
            let ModalState::PurchaseOpen(modal) = *state else {
                return;
            };
            if !modal.skippable {
                return;
            }
            *state = ModalState::Idle;
            modal.chain_profile
        };

        self.inner.channel.publish(ShellEvent::PricingClosed);

        if chain {
            self.schedule_profile_open();
        }
    }

    /// Publish exactly one profile-completion open after the configured
    /// delay, so the closing modal can unmount first
    fn schedule_profile_open(&self) {
        let sequencer = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(sequencer.inner.chain_delay).await;
            sequencer.inner.channel.publish(ShellEvent::OpenProfile);
            let mut state = sequencer.inner.state.lock().expect("modal state poisoned");
            // A modal opened in the meantime keeps priority
            if *state == ModalState::Idle {
                *state = ModalState::ProfileOpen;
            }
        });
    }

    /// Close the authentication modal without signing in
    pub fn close_auth(&self) {
        let mut state = self.inner.state.lock().expect("modal state poisoned");
        if matches!(*state, ModalState::AuthOpen { .. }) {
            *state = ModalState::Idle;
        }
    }

    /// Close the profile completion flow
    pub fn close_profile(&self) {
        let mut state = self.inner.state.lock().expect("modal state poisoned");
        if *state == ModalState::ProfileOpen {
            *state = ModalState::Idle;
        }
    }

    /// Inspect the current URL once for checkout markers
    ///
    /// A candidate success runs `refresh_user` exactly once before the
    /// confirmation modal opens, because the purchase changed
    /// server-held entitlement state, and sets the chain flag so
    /// profile completion follows. The returned sanitized URL must
    /// replace the current one so the markers cannot replay.
    pub async fn consume_checkout_redirect<F, Fut>(
        &self,
        current_url: &str,
        refresh_user: F,
    ) -> DomainResult<CheckoutConsumption>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = DomainResult<UserRecord>>,
    {
        let params = url_sanitize::query_params(current_url);
        let sanitized_url = url_sanitize::path_only(current_url);

        let outcome = match CheckoutSignal::from_params(&params) {
            None => CheckoutOutcome::Absent,
            Some(CheckoutSignal::Cancelled) => {
                debug!("checkout cancelled, no modal to open");
                CheckoutOutcome::Cancelled
            }
            Some(CheckoutSignal::Success { role }) => {
                let chained = role == UserRole::Candidate;
                if chained {
                    refresh_user().await?;
                }
                info!(%role, chained, "checkout confirmed");
                *self.inner.state.lock().expect("modal state poisoned") =
                    ModalState::PurchaseOpen(PurchaseModal::confirmation(role, chained));
                CheckoutOutcome::Confirmed { role, chained }
            }
        };

        Ok(CheckoutConsumption {
            outcome,
            sanitized_url,
        })
    }

    /// The currently visible modal
    pub fn state(&self) -> ModalState {
        *self.inner.state.lock().expect("modal state poisoned")
    }
}

impl std::fmt::Debug for ModalSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalSequencer")
            .field("state", &self.state())
            .field("chain_delay", &self.inner.chain_delay)
            .finish()
    }
}
