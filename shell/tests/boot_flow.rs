//! End-to-end boot and modal flows against in-memory collaborators.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use th_core::domain::entities::session::LifecycleState;
use th_core::domain::entities::user::{Plan, UserRecord, UserRole};
use th_core::domain::value_objects::auth_payload::PersistedSession;
use th_core::domain::value_objects::registration::NewRegistration;
use th_core::events::{NavGroup, NavItem, ShellEvent};
use th_core::gateway::MockIdentityGateway;
use th_core::module::{HostState, StubModule, StubModuleLoader};
use th_core::services::modal::{ModalState, PurchaseModal};
use th_core::store::{MemoryStore, SessionStore};
use th_shared::config::ShellConfig;
use th_shell::AppShell;

type TestShell = AppShell<MockIdentityGateway, MemoryStore, StubModuleLoader>;

fn candidate() -> UserRecord {
    UserRecord::new(
        "casey@example.com".to_string(),
        "Casey".to_string(),
        "Reed".to_string(),
        UserRole::Candidate,
    )
}

fn vendor() -> UserRecord {
    UserRecord::new(
        "vera@example.com".to_string(),
        "Vera".to_string(),
        "Lang".to_string(),
        UserRole::Vendor,
    )
}

fn anonymous_shell() -> (Arc<MockIdentityGateway>, StubModule, TestShell) {
    let identity = Arc::new(MockIdentityGateway::new());
    let store = Arc::new(MemoryStore::new());
    let stub = StubModule::new();
    let shell = AppShell::new(
        Arc::clone(&identity),
        store,
        StubModuleLoader::succeeding(stub.clone()),
        &ShellConfig::default(),
    )
    .unwrap();
    (identity, stub, shell)
}

fn stored_shell(user: UserRecord) -> (Arc<MockIdentityGateway>, StubModule, TestShell) {
    let identity = Arc::new(MockIdentityGateway::new());
    let (access, refresh) = identity.seed_session(&user);
    let store = Arc::new(MemoryStore::seeded(PersistedSession {
        access_token: Some(access),
        refresh_token: Some(refresh),
        user: Some(user),
    }));
    let stub = StubModule::new();
    let shell = AppShell::new(
        Arc::clone(&identity),
        store,
        StubModuleLoader::succeeding(stub.clone()),
        &ShellConfig::default(),
    )
    .unwrap();
    (identity, stub, shell)
}

#[tokio::test]
async fn test_anonymous_boot_mounts_module_without_identity() {
    let (_identity, stub, shell) = anonymous_shell();

    let report = shell.boot("https://app.talenthub.test/").await.unwrap();

    assert_eq!(report.host, HostState::Ready);
    assert_eq!(report.lifecycle, LifecycleState::Anonymous);
    assert!(report.redirect_to.is_none());
    assert!(!stub.mounted_props().unwrap().is_authenticated());
}

#[tokio::test]
async fn test_stored_session_boot_verifies_and_mounts_authenticated() {
    let (identity, stub, shell) = stored_shell(candidate());

    let report = shell.boot("https://app.talenthub.test/jobs").await.unwrap();

    assert_eq!(report.lifecycle, LifecycleState::Authenticated);
    assert_eq!(identity.verify_calls.load(Ordering::SeqCst), 1);
    let props = stub.mounted_props().unwrap();
    assert!(props.is_authenticated());
    assert_eq!(props.email.as_deref(), Some("casey@example.com"));
}

#[tokio::test]
async fn test_expired_session_boot_redirects_to_role_entry_point() {
    let (identity, _stub, shell) = stored_shell(vendor());
    let stored = shell.session().snapshot();
    identity.reject_access_token(stored.access_token.as_deref().unwrap());
    identity.revoke_refresh_token(stored.refresh_token.as_deref().unwrap());

    let report = shell.boot("https://app.talenthub.test/").await.unwrap();

    assert_eq!(report.redirect_to.as_deref(), Some("/vendor/login"));
    assert_eq!(report.lifecycle, LifecycleState::Anonymous);
    // The module still mounts, anonymously
    assert_eq!(report.host, HostState::Ready);
}

#[tokio::test]
async fn test_new_candidate_registration_opens_mandatory_purchase() {
    let (_identity, stub, shell) = anonymous_shell();
    shell.boot("https://app.talenthub.test/").await.unwrap();

    let user = shell
        .register(&NewRegistration {
            email: "new@example.com".to_string(),
            password: "longenough".to_string(),
            first_name: "New".to_string(),
            last_name: "Candidate".to_string(),
            role: UserRole::Candidate,
        })
        .await
        .unwrap();

    assert!(user.is_candidate());
    assert_eq!(
        shell.modal_state(),
        ModalState::PurchaseOpen(PurchaseModal::required())
    );
    // The module got a fresh authenticated snapshot
    assert!(stub.last_update().unwrap().is_authenticated());
}

#[tokio::test]
async fn test_free_vendor_login_gets_skippable_prompt() {
    let (identity, _stub, shell) = anonymous_shell();
    identity.seed_account("correct horse", vendor());
    shell.boot("https://app.talenthub.test/").await.unwrap();

    shell.login("vera@example.com", "correct horse").await.unwrap();
    assert_eq!(
        shell.modal_state(),
        ModalState::PurchaseOpen(PurchaseModal::upgrade_prompt())
    );

    shell.sequencer().skip_purchase();
    assert_eq!(shell.modal_state(), ModalState::Idle);
    assert_eq!(shell.session().lifecycle(), LifecycleState::Authenticated);
}

#[tokio::test]
async fn test_paying_candidate_login_opens_nothing() {
    let (identity, _stub, shell) = anonymous_shell();
    let mut user = candidate();
    user.plan = Plan::Standard;
    user.visibility = Some(th_core::domain::entities::user::VisibilityGrant {
        categories: [("engineering".to_string(), vec!["backend".to_string()])]
            .into_iter()
            .collect(),
    });
    identity.seed_account("correct horse", user);
    shell.boot("https://app.talenthub.test/").await.unwrap();

    shell.login("casey@example.com", "correct horse").await.unwrap();
    assert_eq!(shell.modal_state(), ModalState::Idle);
}

#[tokio::test]
async fn test_candidate_checkout_return_refreshes_once_and_chains() {
    let (identity, _stub, shell) = stored_shell(candidate());

    let report = shell
        .boot("https://app.talenthub.test/candidate/plans?checkout=success&role=candidate")
        .await
        .unwrap();

    assert_eq!(
        report.sanitized_url,
        "https://app.talenthub.test/candidate/plans"
    );
    assert_eq!(identity.fetch_user_calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        shell.modal_state(),
        ModalState::PurchaseOpen(PurchaseModal::confirmation(UserRole::Candidate, true))
    );
}

#[tokio::test]
async fn test_module_driven_chrome_updates() {
    let (_identity, stub, shell) = anonymous_shell();
    shell.boot("https://app.talenthub.test/").await.unwrap();

    let channel = stub.channel().unwrap();
    channel.publish(ShellEvent::SubnavUpdate {
        groups: vec![NavGroup {
            label: "Jobs".to_string(),
            items: vec![NavItem {
                label: "Browse".to_string(),
                href: "/jobs".to_string(),
            }],
        }],
    });
    channel.publish(ShellEvent::BreadcrumbUpdate {
        segments: vec!["Home".to_string(), "Jobs".to_string()],
    });

    assert_eq!(shell.subnav().len(), 1);
    assert_eq!(shell.subnav()[0].label, "Jobs");
    assert_eq!(shell.breadcrumbs(), vec!["Home".to_string(), "Jobs".to_string()]);
}

#[tokio::test]
async fn test_job_type_filter_reaches_module_subscribers() {
    let (_identity, stub, shell) = anonymous_shell();
    shell.boot("https://app.talenthub.test/").await.unwrap();

    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _sub = stub.channel().unwrap().subscribe(
        th_core::events::EventKind::JobTypeFilter,
        move |event| {
            if let ShellEvent::JobTypeFilter { filter } = event {
                sink.lock().unwrap().push(filter.clone());
            }
        },
    );

    shell.set_job_type_filter("contract");
    assert_eq!(*seen.lock().unwrap(), vec!["contract".to_string()]);
}

#[tokio::test]
async fn test_sign_out_hands_module_anonymous_snapshot() {
    let (_identity, stub, shell) = stored_shell(candidate());
    shell.boot("https://app.talenthub.test/").await.unwrap();

    shell.sign_out().unwrap();
    assert_eq!(shell.session().lifecycle(), LifecycleState::Anonymous);
    assert!(!stub.last_update().unwrap().is_authenticated());
}

#[tokio::test]
async fn test_failed_oauth_redirect_surfaces_on_auth_modal() {
    let (_identity, _stub, shell) = anonymous_shell();

    let report = shell
        .boot("https://app.talenthub.test/login?error=access_denied")
        .await
        .unwrap();

    assert!(report.auth_error.is_some());
    assert_eq!(report.lifecycle, LifecycleState::Anonymous);
    assert_eq!(report.sanitized_url, "https://app.talenthub.test/login");
}

#[tokio::test]
async fn test_load_failure_keeps_shell_alive() {
    let identity = Arc::new(MockIdentityGateway::new());
    let store = Arc::new(MemoryStore::new());
    let shell: TestShell = AppShell::new(
        identity,
        Arc::clone(&store),
        StubModuleLoader::failing("bundle unreachable"),
        &ShellConfig::default(),
    )
    .unwrap();

    let report = shell.boot("https://app.talenthub.test/").await.unwrap();
    assert!(matches!(report.host, HostState::Failed { .. }));
    // Session machinery is unaffected by the module failure
    assert!(store.load().unwrap().is_empty());
    assert_eq!(report.lifecycle, LifecycleState::Anonymous);
}
