//! Explicit session context.
//!
//! The bearer token and username are passed into each cart operation rather
//! than read from ambient storage.

use secrecy::{ExposeSecret, SecretString};

/// Authentication context for cart operations.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone, Default)]
pub struct Session {
    token: Option<SecretString>,
    username: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("username", &self.username)
            .finish()
    }
}

impl Session {
    /// A session with no logged-in user.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session for a logged-in user.
    ///
    /// A blank token is treated as no token.
    #[must_use]
    pub fn authenticated(token: impl Into<String>, username: Option<String>) -> Self {
        Self::from_parts(Some(SecretString::from(token.into())), username)
    }

    pub(crate) fn from_parts(token: Option<SecretString>, username: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.expose_secret().trim().is_empty()),
            username,
        }
    }

    /// Whether a token is present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Token for the `Authorization: Bearer` header.
    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        self.token.as_ref().map(ExposeSecret::expose_secret)
    }

    /// Display name of the logged-in user.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous() {
        let session = Session::anonymous();
        assert!(!session.is_authenticated());
        assert!(session.bearer().is_none());
    }

    #[test]
    fn test_blank_token_is_anonymous() {
        assert!(!Session::authenticated("", None).is_authenticated());
        assert!(!Session::authenticated("   ", None).is_authenticated());
    }

    #[test]
    fn test_authenticated() {
        let session = Session::authenticated("tok", Some("crio".to_string()));
        assert_eq!(session.bearer(), Some("tok"));
        assert_eq!(session.username(), Some("crio"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::authenticated("very-secret-token", None);
        let debug_output = format!("{session:?}");
        assert!(!debug_output.contains("very-secret-token"));
        assert!(debug_output.contains("[REDACTED]"));
    }
}
