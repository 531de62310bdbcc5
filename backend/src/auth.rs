//! Sign-in action and the credential-verification seam.
//!
//! The verifier itself is an external collaborator; this layer only
//! classifies its failures into fixed user-facing text. Anything outside
//! the authentication error family is unexpected and propagates unchanged.

use anyhow::Result;
use shared::LoginForm;
use thiserror::Error;
use tracing::{info, warn};

const CREDENTIALS_SIGNIN_MESSAGE: &str = "Invalid Credentials";
const ACCESS_DENIED_MESSAGE: &str = "Access Denied";
const FALLBACK_MESSAGE: &str = "Something went wrong.";

/// Closed classification of authentication failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// The credential pair did not match a known user
    CredentialsSignin,
    /// The user exists but may not sign in here
    AccessDenied,
    /// Any other failure the provider classifies as authentication-related
    Other,
}

/// Authentication failure raised by a credential verifier.
#[derive(Debug, Clone, Error)]
#[error("authentication failed: {kind:?}")]
pub struct AuthError {
    pub kind: AuthErrorKind,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind) -> Self {
        Self { kind }
    }

    /// The fixed user-facing text for this failure kind.
    pub fn user_message(&self) -> &'static str {
        match self.kind {
            AuthErrorKind::CredentialsSignin => CREDENTIALS_SIGNIN_MESSAGE,
            AuthErrorKind::AccessDenied => ACCESS_DENIED_MESSAGE,
            AuthErrorKind::Other => FALLBACK_MESSAGE,
        }
    }
}

/// Failure surface of a credential verifier: either a classified
/// authentication error or an unexpected fault from the provider's
/// infrastructure.
#[derive(Debug, Error)]
pub enum VerifierError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// External collaborator that checks a credential pair. Session
/// establishment on success is the host framework's job, not this layer's.
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, credentials: &LoginForm) -> Result<(), VerifierError>;
}

/// Sign-in action.
///
/// `_prev_state` is the previous attempt's message; the form contract
/// passes it back in but nothing here reads it. Returns `Ok(None)` on
/// success, `Ok(Some(message))` for a classified authentication failure,
/// and re-raises anything unexpected.
pub async fn authenticate<V: CredentialVerifier>(
    _prev_state: Option<String>,
    form: &LoginForm,
    verifier: &V,
) -> Result<Option<String>> {
    info!("Authenticating {}", form.email);

    match verifier.verify(form).await {
        Ok(()) => Ok(None),
        Err(VerifierError::Auth(e)) => {
            warn!("Authentication failed for {}: {}", form.email, e);
            Ok(Some(e.user_message().to_string()))
        }
        Err(VerifierError::Unexpected(e)) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct AcceptingVerifier;

    impl CredentialVerifier for AcceptingVerifier {
        async fn verify(&self, _credentials: &LoginForm) -> Result<(), VerifierError> {
            Ok(())
        }
    }

    struct RejectingVerifier {
        kind: AuthErrorKind,
    }

    impl CredentialVerifier for RejectingVerifier {
        async fn verify(&self, _credentials: &LoginForm) -> Result<(), VerifierError> {
            Err(AuthError::new(self.kind).into())
        }
    }

    struct BrokenVerifier;

    impl CredentialVerifier for BrokenVerifier {
        async fn verify(&self, _credentials: &LoginForm) -> Result<(), VerifierError> {
            Err(VerifierError::Unexpected(anyhow!("connection reset by provider")))
        }
    }

    fn login_form() -> LoginForm {
        LoginForm {
            email: "user@example.com".to_string(),
            password: "hunter2".to_string(),
        }
    }

    #[tokio::test]
    async fn test_successful_sign_in_returns_nothing() {
        let result = authenticate(None, &login_form(), &AcceptingVerifier)
            .await
            .expect("should not raise");

        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_classified_failures_map_to_fixed_text() {
        let cases = [
            (AuthErrorKind::CredentialsSignin, "Invalid Credentials"),
            (AuthErrorKind::AccessDenied, "Access Denied"),
            (AuthErrorKind::Other, "Something went wrong."),
        ];

        for (kind, expected) in cases {
            let verifier = RejectingVerifier { kind };
            let result = authenticate(None, &login_form(), &verifier)
                .await
                .expect("classified failures should not raise");

            assert_eq!(result.as_deref(), Some(expected), "kind {:?}", kind);
        }
    }

    #[tokio::test]
    async fn test_previous_state_is_ignored() {
        let result = authenticate(
            Some("Invalid Credentials".to_string()),
            &login_form(),
            &AcceptingVerifier,
        )
        .await
        .expect("should not raise");

        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_unexpected_failure_propagates_unchanged() {
        let err = authenticate(None, &login_form(), &BrokenVerifier)
            .await
            .expect_err("infrastructure faults must re-raise");

        assert_eq!(err.to_string(), "connection reset by provider");
    }
}
