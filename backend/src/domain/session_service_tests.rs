//! Tests for the session context.

use std::sync::Arc;

use super::*;
use crate::domain::ports::MockIdentityProvider;
use crate::domain::{ErrorCode, Role, UserId};
use rstest::{fixture, rstest};

#[fixture]
fn landlord_session() -> AuthSession {
    AuthSession {
        identity: Identity {
            id: UserId::random(),
            email: "lena@rentify.test".to_owned(),
            full_name: "Lena Landlord".to_owned(),
            role: Role::Landlord,
        },
        access_token: AccessToken::new("token-lena"),
    }
}

fn service(provider: MockIdentityProvider) -> SessionService {
    SessionService::new(Arc::new(provider))
}

#[rstest]
#[tokio::test]
async fn sign_in_publishes_the_identity(landlord_session: AuthSession) {
    let expected = landlord_session.identity.clone();
    let mut provider = MockIdentityProvider::new();
    provider
        .expect_sign_in()
        .withf(|creds| creds.email() == "lena@rentify.test" && creds.password() == "hunter22")
        .times(1)
        .return_once(move |_| Ok(landlord_session));

    let service = service(provider);
    let mut observer = service.subscribe();
    let session = service
        .sign_in(" lena@rentify.test ", "hunter22")
        .await
        .expect("sign in succeeds");

    assert_eq!(session.identity, expected);
    assert!(observer.has_changed().expect("sender alive"));
    let seen = observer.borrow_and_update().clone();
    assert_eq!(seen.map(|s| s.identity), Some(expected));
}

#[rstest]
#[tokio::test]
async fn sign_in_with_blank_fields_never_reaches_the_provider() {
    let mut provider = MockIdentityProvider::new();
    provider.expect_sign_in().never();

    let err = service(provider)
        .sign_in("", "")
        .await
        .expect_err("blank fields fail");
    assert_eq!(err, AuthError::validation("Please fill in all fields"));
}

#[rstest]
#[tokio::test]
async fn failed_sign_in_leaves_state_empty() {
    let mut provider = MockIdentityProvider::new();
    provider
        .expect_sign_in()
        .times(1)
        .return_once(|_| Err(AuthError::invalid_credentials()));

    let service = service(provider);
    let err = service
        .sign_in("nobody@rentify.test", "wrong-password")
        .await
        .expect_err("invalid credentials");
    assert_eq!(err, AuthError::InvalidCredentials);
    assert!(service.current_identity().is_none());
}

#[rstest]
#[tokio::test]
async fn sign_up_passes_the_requested_role(landlord_session: AuthSession) {
    let mut provider = MockIdentityProvider::new();
    provider
        .expect_sign_up()
        .withf(|registration| registration.role() == Role::Landlord)
        .times(1)
        .return_once(move |_| Ok(SignUpOutcome::SignedIn(landlord_session)));

    let service = service(provider);
    let outcome = service
        .sign_up(RegistrationForm {
            full_name: "Lena Landlord",
            email: "lena@rentify.test",
            password: "hunter22",
            confirm_password: "hunter22",
            role: Some(Role::Landlord),
        })
        .await
        .expect("sign up succeeds");
    assert_eq!(outcome.identity().role, Role::Landlord);
    assert_eq!(outcome.identity().landing_path(), "/landlord/dashboard");
    assert_eq!(service.current_identity().map(|i| i.role), Some(Role::Landlord));
}

#[rstest]
#[tokio::test]
async fn unconfirmed_sign_up_succeeds_without_signing_in(landlord_session: AuthSession) {
    let identity = landlord_session.identity;
    let expected = identity.clone();
    let mut provider = MockIdentityProvider::new();
    provider
        .expect_sign_up()
        .times(1)
        .return_once(move |_| Ok(SignUpOutcome::PendingConfirmation(identity)));
    provider.expect_sign_in().never();

    let service = service(provider);
    let observer = service.subscribe();
    let outcome = service
        .sign_up(RegistrationForm {
            full_name: "Lena Landlord",
            email: "lena@rentify.test",
            password: "hunter22",
            confirm_password: "hunter22",
            role: Some(Role::Landlord),
        })
        .await
        .expect("account created");
    assert_eq!(outcome, SignUpOutcome::PendingConfirmation(expected));
    assert!(outcome.session().is_none());
    assert!(service.current_identity().is_none());
    assert!(!observer.has_changed().expect("sender alive"));
}

#[rstest]
#[tokio::test]
async fn sign_up_validation_failures_are_auth_errors() {
    let mut provider = MockIdentityProvider::new();
    provider.expect_sign_up().never();

    let err = service(provider)
        .sign_up(RegistrationForm {
            full_name: "Tom",
            email: "tom@rentify.test",
            password: "abc",
            confirm_password: "abc",
            role: None,
        })
        .await
        .expect_err("short password");
    assert_eq!(
        err,
        AuthError::validation("Password must be at least 6 characters")
    );
}

#[rstest]
#[tokio::test]
async fn sign_out_is_idempotent(landlord_session: AuthSession) {
    let mut provider = MockIdentityProvider::new();
    provider.expect_sign_out().times(1).return_once(|_| Ok(()));

    let service = SessionService::restore(Arc::new(provider), landlord_session);
    service.sign_out().await;
    assert!(service.current_identity().is_none());
    service.sign_out().await;
    assert!(service.current_identity().is_none());
}

#[rstest]
#[tokio::test]
async fn sign_out_clears_state_even_when_revocation_fails(landlord_session: AuthSession) {
    let mut provider = MockIdentityProvider::new();
    provider
        .expect_sign_out()
        .times(1)
        .return_once(|_| Err(AuthError::transport("connection refused")));

    let service = SessionService::restore(Arc::new(provider), landlord_session);
    let observer = service.subscribe();
    service.sign_out().await;
    assert!(observer.borrow().is_none());
}

#[rstest]
#[tokio::test]
async fn refresh_failure_clears_the_session(landlord_session: AuthSession) {
    let mut provider = MockIdentityProvider::new();
    provider
        .expect_identity()
        .times(1)
        .return_once(|_| Err(AuthError::session_expired()));

    let service = SessionService::restore(Arc::new(provider), landlord_session);
    let err = service.refresh().await.expect_err("expired");
    assert_eq!(err, AuthError::SessionExpired);
    assert!(service.current_identity().is_none());
    assert!(service.access_token().is_none());
}

#[rstest]
#[tokio::test]
async fn refresh_without_a_session_reports_expiry() {
    let mut provider = MockIdentityProvider::new();
    provider.expect_identity().never();
    let err = service(provider).refresh().await.expect_err("no session");
    assert_eq!(err, AuthError::SessionExpired);
}

#[rstest]
#[case(AuthError::invalid_credentials(), ErrorCode::Unauthorized)]
#[case(AuthError::duplicate_account("a@b.co"), ErrorCode::Conflict)]
#[case(AuthError::weak_password("too weak"), ErrorCode::InvalidRequest)]
#[case(AuthError::invalid_email("bad"), ErrorCode::InvalidRequest)]
#[case(AuthError::validation("Passwords do not match"), ErrorCode::InvalidRequest)]
#[case(AuthError::timeout("10s"), ErrorCode::ServiceUnavailable)]
fn auth_errors_map_to_domain_codes(#[case] error: AuthError, #[case] expected: ErrorCode) {
    assert_eq!(Error::from(error).code(), expected);
}
