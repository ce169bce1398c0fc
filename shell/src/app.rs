//! The application shell: composition root and boot sequence

use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use th_core::domain::entities::session::LifecycleState;
use th_core::domain::entities::user::{UserRecord, UserRole};
use th_core::domain::value_objects::registration::NewRegistration;
use th_core::errors::{AuthError, DomainResult};
use th_core::events::{EventChannel, EventKind, NavGroup, ShellEvent, Subscription};
use th_core::gateway::IdentityGateway;
use th_core::module::{HostState, ModuleHost, ModuleLoader};
use th_core::services::modal::{ModalSequencer, ModalState};
use th_core::services::session::{OAuthOutcome, SessionService, VerifyOutcome};
use th_core::store::SessionStore;
use th_shared::config::ShellConfig;

/// What the boot sequence decided
#[derive(Debug, Clone, PartialEq)]
pub struct BootReport {
    /// Path-only URL to install in place of the one booted with, so
    /// consumed redirect parameters cannot replay
    pub sanitized_url: String,
    /// Entry point to navigate to when the stored session turned out to
    /// be terminally expired
    pub redirect_to: Option<String>,
    /// Sign-in error carried by the booting URL, surfaced on the
    /// authentication modal
    pub auth_error: Option<AuthError>,
    /// Where the hosted module ended up
    pub host: HostState,
    /// Session lifecycle after boot
    pub lifecycle: LifecycleState,
}

/// Composition root owning every shell collaborator
///
/// The shell is the only place that holds the session service, the
/// sequencer, and the host together; the hosted module sees nothing but
/// props snapshots and the event channel.
pub struct AppShell<I: IdentityGateway, S: SessionStore, L: ModuleLoader> {
    channel: EventChannel,
    session: Arc<SessionService<I, S>>,
    sequencer: ModalSequencer,
    host: ModuleHost<L>,
    subnav: Arc<Mutex<Vec<NavGroup>>>,
    breadcrumbs: Arc<Mutex<Vec<String>>>,
    subscriptions: Mutex<Vec<Subscription>>,
}

impl<I: IdentityGateway, S: SessionStore, L: ModuleLoader> AppShell<I, S, L> {
    pub fn new(
        identity: Arc<I>,
        store: Arc<S>,
        loader: L,
        config: &ShellConfig,
    ) -> DomainResult<Self> {
        let channel = EventChannel::new();
        let session = Arc::new(SessionService::new(identity, store)?);
        let sequencer = ModalSequencer::new(channel.clone(), &config.modal);
        let host = ModuleHost::new(loader, channel.clone());

        Ok(Self {
            channel,
            session,
            sequencer,
            host,
            subnav: Arc::new(Mutex::new(Vec::new())),
            breadcrumbs: Arc::new(Mutex::new(Vec::new())),
            subscriptions: Mutex::new(Vec::new()),
        })
    }

    /// Run the boot sequence for the URL the shell was opened on
    ///
    /// Order matters: redirect payloads are consumed before
    /// verification so a fresh OAuth sign-in is never immediately
    /// re-verified as a stale stored session, and the module mounts
    /// last so its first props snapshot already reflects everything
    /// boot decided.
    pub async fn boot(&self, current_url: &str) -> DomainResult<BootReport> {
        let mut auth_error = None;
        let mut redirect_to = None;

        let oauth = self.session.hydrate_from_oauth_redirect(current_url)?;
        match &oauth.outcome {
            OAuthOutcome::Completed => {
                if let Some(user) = self.session.snapshot().user {
                    self.sequencer.resolve_authentication(&user);
                }
            }
            OAuthOutcome::Rejected(error) => {
                warn!(%error, "sign-in redirect rejected");
                auth_error = Some(error.clone());
            }
            OAuthOutcome::Absent => {}
        }

        // Both consumers inspect the original URL; they strip to the
        // same path-only form
        let session = Arc::clone(&self.session);
        let checkout = self
            .sequencer
            .consume_checkout_redirect(current_url, move || async move {
                session.refresh_user_record().await
            })
            .await?;

        match self.session.verify_on_mount().await? {
            VerifyOutcome::Expired { .. } => {
                let prior_role = self.session.acknowledge_expiry();
                redirect_to = Some(Self::entry_point_for(prior_role).to_string());
            }
            outcome => {
                info!(?outcome, "session verified at boot");
            }
        }

        let host = self.host.boot(&self.session.module_props()).await;
        self.register_subscriptions();

        Ok(BootReport {
            sanitized_url: checkout.sanitized_url,
            redirect_to,
            auth_error,
            host,
            lifecycle: self.session.lifecycle(),
        })
    }

    /// Sign in and apply the post-authentication modal policy
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<UserRecord> {
        let user = self.session.login(email, password).await?;
        self.sequencer.resolve_authentication(&user);
        self.host.update(&self.session.module_props());
        Ok(user)
    }

    /// Register a new account and apply the same policy as login
    pub async fn register(&self, registration: &NewRegistration) -> DomainResult<UserRecord> {
        let user = self.session.register(registration).await?;
        self.sequencer.resolve_authentication(&user);
        self.host.update(&self.session.module_props());
        Ok(user)
    }

    /// Sign out and hand the module an anonymous snapshot
    pub fn sign_out(&self) -> DomainResult<()> {
        self.session.sign_out()?;
        self.host.update(&self.session.module_props());
        Ok(())
    }

    /// Announce a job-type filter change to the hosted module
    pub fn set_job_type_filter(&self, filter: &str) {
        self.channel.publish(ShellEvent::JobTypeFilter {
            filter: filter.to_string(),
        });
    }

    /// Role-matched re-entry path after a session expires
    pub fn entry_point_for(prior_role: Option<UserRole>) -> &'static str {
        match prior_role {
            Some(UserRole::Candidate) => "/candidate/login",
            Some(UserRole::Vendor) => "/vendor/login",
            None => "/login",
        }
    }

    pub fn session(&self) -> &Arc<SessionService<I, S>> {
        &self.session
    }

    pub fn sequencer(&self) -> &ModalSequencer {
        &self.sequencer
    }

    pub fn host(&self) -> &ModuleHost<L> {
        &self.host
    }

    pub fn channel(&self) -> &EventChannel {
        &self.channel
    }

    /// The currently visible modal
    pub fn modal_state(&self) -> ModalState {
        self.sequencer.state()
    }

    /// Sub-navigation groups last contributed by the module
    pub fn subnav(&self) -> Vec<NavGroup> {
        self.subnav.lock().expect("subnav poisoned").clone()
    }

    /// Breadcrumb trail last contributed by the module
    pub fn breadcrumbs(&self) -> Vec<String> {
        self.breadcrumbs.lock().expect("breadcrumbs poisoned").clone()
    }

    /// Wire the sequencer and the chrome state into the channel
    ///
    /// The guards live as long as the shell; dropping the shell
    /// unregisters everything.
    fn register_subscriptions(&self) {
        let mut subscriptions = self.sequencer.attach();

        let subnav = Arc::clone(&self.subnav);
        subscriptions.push(self.channel.subscribe(EventKind::SubnavUpdate, move |event| {
            if let ShellEvent::SubnavUpdate { groups } = event {
                *subnav.lock().expect("subnav poisoned") = groups.clone();
            }
        }));

        let breadcrumbs = Arc::clone(&self.breadcrumbs);
        subscriptions.push(
            self.channel
                .subscribe(EventKind::BreadcrumbUpdate, move |event| {
                    if let ShellEvent::BreadcrumbUpdate { segments } = event {
                        *breadcrumbs.lock().expect("breadcrumbs poisoned") = segments.clone();
                    }
                }),
        );

        *self.subscriptions.lock().expect("subscriptions poisoned") = subscriptions;
    }
}
