//! Unit tests for the session service state machine

use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::domain::entities::session::LifecycleState;
use crate::domain::entities::user::{Plan, UserRecord, UserRole};
use crate::domain::value_objects::auth_payload::PersistedSession;
use crate::domain::value_objects::registration::NewRegistration;
use crate::errors::{AuthError, DomainError, GatewayError};
use crate::gateway::{IdentityGateway, MockIdentityGateway};
use crate::services::session::{RefreshOutcome, SessionService, VerifyOutcome};
use crate::store::{MemoryStore, SessionStore};

fn sample_user(role: UserRole) -> UserRecord {
    UserRecord::new(
        "casey@example.com".to_string(),
        "Casey".to_string(),
        "Reed".to_string(),
        role,
    )
}

fn fresh_service() -> (
    Arc<MockIdentityGateway>,
    Arc<MemoryStore>,
    SessionService<MockIdentityGateway, MemoryStore>,
) {
    let identity = Arc::new(MockIdentityGateway::new());
    let store = Arc::new(MemoryStore::new());
    let service =
        SessionService::new(Arc::clone(&identity), Arc::clone(&store)).expect("hydration");
    (identity, store, service)
}

/// Service hydrated from a store that already holds a live session
fn stored_service(
    user: UserRecord,
) -> (
    Arc<MockIdentityGateway>,
    Arc<MemoryStore>,
    SessionService<MockIdentityGateway, MemoryStore>,
    (String, String),
) {
    let identity = Arc::new(MockIdentityGateway::new());
    let (access, refresh) = identity.seed_session(&user);
    let store = Arc::new(MemoryStore::seeded(PersistedSession {
        access_token: Some(access.clone()),
        refresh_token: Some(refresh.clone()),
        user: Some(user),
    }));
    let service =
        SessionService::new(Arc::clone(&identity), Arc::clone(&store)).expect("hydration");
    (identity, store, service, (access, refresh))
}

#[tokio::test]
async fn test_login_then_sign_out_round_trips_to_empty() {
    let (identity, store, service) = fresh_service();
    identity.seed_account("correct horse", sample_user(UserRole::Candidate));

    service.login("casey@example.com", "correct horse").await.unwrap();
    assert_eq!(service.lifecycle(), LifecycleState::Authenticated);
    assert!(!store.load().unwrap().is_empty());

    service.sign_out().unwrap();
    assert_eq!(service.lifecycle(), LifecycleState::Anonymous);
    assert!(store.load().unwrap().is_empty());
}

#[tokio::test]
async fn test_login_persists_trio_atomically() {
    let (identity, store, service) = fresh_service();
    identity.seed_account("correct horse", sample_user(UserRole::Vendor));

    service.login("casey@example.com", "correct horse").await.unwrap();

    let persisted = store.load().unwrap();
    assert!(persisted.access_token.is_some());
    assert!(persisted.refresh_token.is_some());
    assert_eq!(persisted.user.unwrap().email, "casey@example.com");
}

#[tokio::test]
async fn test_invalid_credentials_leave_store_untouched() {
    let (identity, store, service) = fresh_service();
    identity.seed_account("correct horse", sample_user(UserRole::Candidate));

    let err = service.login("casey@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::InvalidCredentials)));
    assert_eq!(service.lifecycle(), LifecycleState::Anonymous);
    assert!(store.load().unwrap().is_empty());
}

#[tokio::test]
async fn test_register_starts_on_free_tier_without_grant() {
    let (_identity, _store, service) = fresh_service();

    let user = service
        .register(&NewRegistration {
            email: "new@example.com".to_string(),
            password: "longenough".to_string(),
            first_name: "New".to_string(),
            last_name: "User".to_string(),
            role: UserRole::Candidate,
        })
        .await
        .unwrap();

    assert_eq!(user.plan, Plan::Free);
    assert!(user.visibility.is_none());
    assert_eq!(service.lifecycle(), LifecycleState::Authenticated);
}

#[tokio::test]
async fn test_register_conflict_surfaces_as_email_taken() {
    let (identity, _store, service) = fresh_service();
    identity.seed_account("pw", sample_user(UserRole::Candidate));

    let err = service
        .register(&NewRegistration {
            email: "casey@example.com".to_string(),
            password: "longenough".to_string(),
            first_name: "Casey".to_string(),
            last_name: "Reed".to_string(),
            role: UserRole::Candidate,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Auth(AuthError::EmailAlreadyRegistered)));
}

#[tokio::test]
async fn test_double_verify_performs_one_round_trip() {
    let (identity, _store, service, _) = stored_service(sample_user(UserRole::Candidate));
    assert_eq!(service.lifecycle(), LifecycleState::Verifying);

    let first = service.verify_on_mount().await.unwrap();
    let second = service.verify_on_mount().await.unwrap();

    assert_eq!(first, VerifyOutcome::Confirmed);
    assert_eq!(second, VerifyOutcome::AlreadyChecked);
    assert_eq!(identity.verify_calls.load(Ordering::SeqCst), 1);
    assert_eq!(service.lifecycle(), LifecycleState::Authenticated);
}

#[tokio::test]
async fn test_rejected_access_token_is_silently_renewed() {
    let user = sample_user(UserRole::Candidate);
    let (identity, store, service, (access, refresh)) = stored_service(user.clone());
    identity.reject_access_token(&access);

    let outcome = service.verify_on_mount().await.unwrap();
    assert_eq!(outcome, VerifyOutcome::Refreshed);
    assert_eq!(service.lifecycle(), LifecycleState::Authenticated);

    // New access token, same refresh token and user record
    let persisted = store.load().unwrap();
    assert_ne!(persisted.access_token.as_deref(), Some(access.as_str()));
    assert_eq!(persisted.refresh_token.as_deref(), Some(refresh.as_str()));
    assert_eq!(persisted.user.unwrap().id, user.id);
    assert_eq!(identity.refresh_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_both_tokens_invalid_expires_with_role_for_redirect() {
    let (identity, store, service, (access, refresh)) =
        stored_service(sample_user(UserRole::Vendor));
    identity.reject_access_token(&access);
    identity.revoke_refresh_token(&refresh);

    let outcome = service.verify_on_mount().await.unwrap();
    assert_eq!(
        outcome,
        VerifyOutcome::Expired {
            prior_role: Some(UserRole::Vendor)
        }
    );
    assert_eq!(
        service.lifecycle(),
        LifecycleState::Expired {
            prior_role: Some(UserRole::Vendor)
        }
    );
    assert!(store.load().unwrap().is_empty());

    // Cleanup finishes the transition and hands back the role
    assert_eq!(service.acknowledge_expiry(), Some(UserRole::Vendor));
    assert_eq!(service.lifecycle(), LifecycleState::Anonymous);
}

#[tokio::test]
async fn test_availability_failure_leaves_session_untouched() {
    let (identity, store, service, _) = stored_service(sample_user(UserRole::Candidate));
    let session_before = service.snapshot();
    let stored_before = store.load().unwrap();

    identity.force_error(GatewayError::Unavailable { status: 503 });
    let outcome = service.verify_on_mount().await.unwrap();

    assert_eq!(outcome, VerifyOutcome::Unavailable);
    assert_eq!(service.snapshot(), session_before);
    assert_eq!(store.load().unwrap(), stored_before);
    assert_eq!(identity.refresh_calls.load(Ordering::SeqCst), 0);

    // The guard re-arms so the next natural trigger retries
    identity.clear_error();
    let retried = service.verify_on_mount().await.unwrap();
    assert_eq!(retried, VerifyOutcome::Confirmed);
}

#[tokio::test]
async fn test_timeout_is_availability_not_expiry() {
    let (identity, _store, service, _) = stored_service(sample_user(UserRole::Vendor));
    identity.force_error(GatewayError::Timeout);

    let outcome = service.verify_on_mount().await.unwrap();
    assert_eq!(outcome, VerifyOutcome::Unavailable);
    assert_eq!(service.lifecycle(), LifecycleState::Verifying);
}

#[tokio::test]
async fn test_refresh_without_token_expires() {
    let (_identity, _store, service) = fresh_service();
    let outcome = service.refresh().await.unwrap();
    assert_eq!(outcome, RefreshOutcome::Expired { prior_role: None });
}

#[tokio::test]
async fn test_refresh_user_record_replaces_wholesale() {
    let mut user = sample_user(UserRole::Candidate);
    let (identity, store, service, _) = stored_service(user.clone());

    // Out-of-band change server-side (a completed purchase)
    user.has_purchased_visibility = true;
    user.plan = Plan::Standard;
    identity.set_user(user.clone());

    let refreshed = service.refresh_user_record().await.unwrap();
    assert!(refreshed.has_purchased_visibility);
    assert_eq!(refreshed.plan, Plan::Standard);
    assert_eq!(identity.fetch_user_calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.load().unwrap().user.unwrap().plan, Plan::Standard);
}

#[tokio::test]
async fn test_update_plan_is_confined_and_persisted() {
    let (_identity, store, service, _) = stored_service(sample_user(UserRole::Vendor));
    let before = service.snapshot().user.unwrap();

    service.update_plan(Plan::Premium).unwrap();

    let after = service.snapshot().user.unwrap();
    assert_eq!(after.plan, Plan::Premium);
    assert_eq!(after.id, before.id);
    assert_eq!(after.email, before.email);
    assert_eq!(store.load().unwrap().user.unwrap().plan, Plan::Premium);
}

#[tokio::test]
async fn test_update_plan_requires_user() {
    let (_identity, _store, service) = fresh_service();
    assert!(matches!(
        service.update_plan(Plan::Standard),
        Err(DomainError::Unauthorized)
    ));
}

#[tokio::test]
async fn test_delete_account_clears_local_state() {
    let (identity, store, service, _) = stored_service(sample_user(UserRole::Candidate));

    service.delete_account().await.unwrap();
    assert_eq!(service.lifecycle(), LifecycleState::Anonymous);
    assert!(store.load().unwrap().is_empty());

    // The account is gone server-side too
    let err = identity.login("casey@example.com", "password").await.unwrap_err();
    assert_eq!(err, GatewayError::AuthInvalid);
}

#[tokio::test]
async fn test_sign_out_rearms_verification() {
    let (identity, _store, service, _) = stored_service(sample_user(UserRole::Candidate));
    service.verify_on_mount().await.unwrap();
    service.sign_out().unwrap();

    // A new login and mount verifies again
    identity.seed_account("pw", sample_user(UserRole::Candidate));
    service.login("casey@example.com", "pw").await.unwrap();
    let outcome = service.verify_on_mount().await.unwrap();
    assert_eq!(outcome, VerifyOutcome::Confirmed);
    assert_eq!(identity.verify_calls.load(Ordering::SeqCst), 2);
}
