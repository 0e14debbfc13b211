// SPDX-FileCopyrightText: 2026 Barter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer credential source.

use secrecy::SecretString;

/// Supplies the bearer token attached to backend requests.
///
/// `None` means "send without authorization"; the backend is the authority
/// on whether that is acceptable.
pub trait TokenSource: Send + Sync + 'static {
    fn bearer_token(&self) -> Option<SecretString>;
}

/// A token fixed at startup (from config or environment).
#[derive(Clone, Default)]
pub struct StaticToken(Option<SecretString>);

impl StaticToken {
    pub fn new(token: Option<String>) -> Self {
        Self(
            token
                .filter(|t| !t.trim().is_empty())
                .map(SecretString::from),
        )
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StaticToken")
            .field(&self.0.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl TokenSource for StaticToken {
    fn bearer_token(&self) -> Option<SecretString> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn blank_token_counts_as_anonymous() {
        assert!(StaticToken::new(Some("   ".into())).bearer_token().is_none());
        assert!(StaticToken::new(None).bearer_token().is_none());
        assert!(StaticToken::anonymous().bearer_token().is_none());
    }

    #[test]
    fn token_is_exposed_only_on_request() {
        let source = StaticToken::new(Some("tok-123".into()));
        let token = source.bearer_token().unwrap();
        assert_eq!(token.expose_secret(), "tok-123");
        assert_eq!(format!("{source:?}"), "StaticToken(Some(\"[REDACTED]\"))");
    }
}
