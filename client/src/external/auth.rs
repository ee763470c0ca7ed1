//! Credential collaborator for the remote history API
//!
//! Sign-in and token refresh live outside this crate. The remote client only
//! asks for a bearer token and reports a rejected one.

use std::sync::RwLock;

/// Supplies bearer credentials and owns the re-authentication flow
pub trait CredentialProvider: Send + Sync {
    /// Current bearer token, `None` when the user is not signed in
    fn bearer_token(&self) -> Option<String>;

    /// Identifier of the signed-in user, used to scope cached listings
    fn user_id(&self) -> String;

    /// Called when the remote answered 401
    fn on_unauthorized(&self);
}

/// Token taken from configuration
///
/// A 401 drops the token, so later saves go local-only until a new token is
/// supplied with [`StaticCredentials::set_token`].
#[derive(Debug)]
pub struct StaticCredentials {
    token: RwLock<Option<String>>,
    user_id: String,
}

impl StaticCredentials {
    pub fn new(token: Option<String>, user_id: impl Into<String>) -> Self {
        let token = token.filter(|t| !t.trim().is_empty());
        Self {
            token: RwLock::new(token),
            user_id: user_id.into(),
        }
    }

    pub fn set_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token;
        }
    }
}

impl CredentialProvider for StaticCredentials {
    fn bearer_token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    fn user_id(&self) -> String {
        self.user_id.clone()
    }

    fn on_unauthorized(&self) {
        tracing::warn!(user_id = %self.user_id, "Remote rejected the access token, signing out");
        self.set_token(None);
    }
}
