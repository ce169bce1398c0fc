//! Tests for consuming OAuth-style sign-in redirects

use std::sync::Arc;

use crate::domain::entities::session::LifecycleState;
use crate::domain::entities::user::{UserRecord, UserRole};
use crate::errors::AuthError;
use crate::gateway::MockIdentityGateway;
use crate::services::session::{OAuthOutcome, SessionService};
use crate::store::{MemoryStore, SessionStore};

fn service() -> (
    Arc<MemoryStore>,
    SessionService<MockIdentityGateway, MemoryStore>,
) {
    let identity = Arc::new(MockIdentityGateway::new());
    let store = Arc::new(MemoryStore::new());
    let service = SessionService::new(identity, Arc::clone(&store)).expect("hydration");
    (store, service)
}

/// Minimal percent-encoding for embedding JSON in a query value
fn encode(raw: &str) -> String {
    raw.replace('%', "%25")
        .replace('&', "%26")
        .replace('=', "%3D")
        .replace('+', "%2B")
        .replace('#', "%23")
        .replace(' ', "%20")
}

fn redirect_url(user: &UserRecord) -> String {
    let user_json = serde_json::to_string(user).unwrap();
    format!(
        "https://app.talenthub.test/candidate/dashboard?token=acc-1&refresh=ref-1&user={}",
        encode(&user_json)
    )
}

#[test]
fn test_well_formed_redirect_authenticates_and_persists() {
    let (store, service) = service();
    let user = UserRecord::new(
        "casey@example.com".to_string(),
        "Casey".to_string(),
        "Reed".to_string(),
        UserRole::Candidate,
    );

    let consumed = service
        .hydrate_from_oauth_redirect(&redirect_url(&user))
        .unwrap();

    assert_eq!(consumed.outcome, OAuthOutcome::Completed);
    assert_eq!(
        consumed.sanitized_url,
        "https://app.talenthub.test/candidate/dashboard"
    );
    assert_eq!(service.lifecycle(), LifecycleState::Authenticated);

    let persisted = store.load().unwrap();
    assert_eq!(persisted.access_token.as_deref(), Some("acc-1"));
    assert_eq!(persisted.refresh_token.as_deref(), Some("ref-1"));
    assert_eq!(persisted.user.unwrap().id, user.id);
}

#[test]
fn test_error_parameter_rejects_and_resets() {
    let (store, service) = service();

    let consumed = service
        .hydrate_from_oauth_redirect(
            "https://app.talenthub.test/vendor/login?error=access_denied",
        )
        .unwrap();

    assert_eq!(
        consumed.outcome,
        OAuthOutcome::Rejected(AuthError::ProviderRejected {
            message: "access_denied".to_string()
        })
    );
    assert_eq!(service.lifecycle(), LifecycleState::Anonymous);
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn test_partial_payload_is_malformed() {
    let (store, service) = service();

    // Token without refresh and user
    let consumed = service
        .hydrate_from_oauth_redirect("https://app.talenthub.test/?token=acc-1")
        .unwrap();

    assert_eq!(
        consumed.outcome,
        OAuthOutcome::Rejected(AuthError::MalformedRedirect)
    );
    assert_eq!(service.lifecycle(), LifecycleState::Anonymous);
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn test_undecodable_user_record_is_malformed() {
    let (_store, service) = service();

    let consumed = service
        .hydrate_from_oauth_redirect(
            "https://app.talenthub.test/?token=acc-1&refresh=ref-1&user=not-json",
        )
        .unwrap();

    assert_eq!(
        consumed.outcome,
        OAuthOutcome::Rejected(AuthError::MalformedRedirect)
    );
    assert_eq!(service.lifecycle(), LifecycleState::Anonymous);
}

#[test]
fn test_absent_payload_leaves_session_alone() {
    let (_store, service) = service();

    // An unrelated query string must not disturb the session
    let consumed = service
        .hydrate_from_oauth_redirect("https://app.talenthub.test/jobs?sort=newest")
        .unwrap();

    assert_eq!(consumed.outcome, OAuthOutcome::Absent);
    assert_eq!(consumed.sanitized_url, "https://app.talenthub.test/jobs");
    assert_eq!(service.lifecycle(), LifecycleState::Anonymous);
}

#[test]
fn test_sanitized_url_drops_fragment_too() {
    let (_store, service) = service();
    let consumed = service
        .hydrate_from_oauth_redirect("https://app.talenthub.test/a/b?x=1#frag")
        .unwrap();
    assert_eq!(consumed.sanitized_url, "https://app.talenthub.test/a/b");
}
