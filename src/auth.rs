//! Sign-in state for the session.
//!
//! Credentials go through a [`CredentialVerifier`] so a real check can be
//! dropped in later; the default [`AcceptAnyCredentials`] admits any
//! non-empty username/password pair. The signed-in identity is kept in the
//! blob store so it survives restarts.

use tracing::{info, warn};

use crate::db::{BlobStore, AUTH_USER_KEY};
use crate::error::AuthError;
use crate::models::{Role, UserIdentity};

/// Decides whether a username/password pair is acceptable.
pub trait CredentialVerifier {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Accepts every pair. Provides no security whatsoever.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAnyCredentials;

impl CredentialVerifier for AcceptAnyCredentials {
    fn verify(&self, _username: &str, _password: &str) -> bool {
        true
    }
}

pub struct AuthService<B: BlobStore, V: CredentialVerifier = AcceptAnyCredentials> {
    store: B,
    verifier: V,
    current: Option<UserIdentity>,
}

impl<B: BlobStore> AuthService<B, AcceptAnyCredentials> {
    /// Restore the stored identity, if any, using the accept-all verifier.
    pub fn load(store: B) -> Result<Self, AuthError> {
        Self::with_verifier(store, AcceptAnyCredentials)
    }
}

impl<B: BlobStore, V: CredentialVerifier> AuthService<B, V> {
    pub fn with_verifier(store: B, verifier: V) -> Result<Self, AuthError> {
        let current = match store.get(AUTH_USER_KEY)? {
            Some(raw) => match serde_json::from_str::<UserIdentity>(&raw) {
                Ok(identity) => Some(identity),
                Err(err) => {
                    warn!("Ignoring unreadable stored identity: {err}");
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            store,
            verifier,
            current,
        })
    }

    /// Sign in. Both fields must be non-blank; the username is stored trimmed
    /// and every successful login is granted the admin role.
    pub fn login(&mut self, username: &str, password: &str) -> Result<UserIdentity, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.trim().is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        if !self.verifier.verify(username, password) {
            warn!(username, "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let identity = UserIdentity {
            name: username.to_string(),
            role: Role::Admin,
        };
        let raw = serde_json::to_string(&identity)?;
        self.store.set(AUTH_USER_KEY, &raw)?;
        self.current = Some(identity.clone());

        info!(username, "User logged in");
        Ok(identity)
    }

    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.store.remove(AUTH_USER_KEY)?;
        if let Some(identity) = self.current.take() {
            info!(username = %identity.name, "User logged out");
        }
        Ok(())
    }

    pub fn current_identity(&self) -> Option<&UserIdentity> {
        self.current.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|identity| identity.role == Role::Admin)
    }

    /// Name of the signed-in user, or an empty string for visitors.
    pub fn username(&self) -> &str {
        self.current
            .as_ref()
            .map(|identity| identity.name.as_str())
            .unwrap_or("")
    }
}
