//! Identity bootstrap
//!
//! Some host environments expect a signed-in user before the page is used.
//! The label never depends on the identity: [`bootstrap`] runs once before the
//! first render, logs any failure and always lets rendering proceed.

use std::collections::HashMap;

use serde::Deserialize;

use crate::{Error, Result};

/// Environment variable holding the JSON identity configuration
pub const AUTH_CONFIG_ENV: &str = "MEAL_LABEL_AUTH_CONFIG";
/// Environment variable holding an initial sign-in token
pub const AUTH_TOKEN_ENV: &str = "MEAL_LABEL_AUTH_TOKEN";

/// Identity provider configuration, as injected by the host
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    pub api_key: Option<String>,
    pub auth_domain: Option<String>,
    pub project_id: Option<String>,
    /// Provider-specific keys we pass through untouched
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl AuthConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::ConfigError(format!("auth config: {}", e)))
    }
}

/// A signed-in user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub anonymous: bool,
}

/// Sign-in surface of an identity service
pub trait IdentityProvider {
    /// User already signed in, if any
    fn current_user(&self) -> Option<Identity>;

    fn sign_in_with_token(&mut self, token: &str) -> Result<Identity>;

    fn sign_in_anonymously(&mut self) -> Result<Identity>;
}

/// What [`bootstrap`] ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// No configuration supplied; nothing attempted
    Skipped,
    AlreadySignedIn(Identity),
    SignedIn(Identity),
    /// Sign-in failed; the error was logged
    Failed,
}

/// Sign in before the first render, if the host asked for it
///
/// Without a configuration this does nothing. Otherwise an existing user is
/// kept; failing that the token is used when present, else an anonymous
/// sign-in. Errors never propagate.
pub fn bootstrap(
    config: Option<&AuthConfig>,
    token: Option<&str>,
    provider: &mut dyn IdentityProvider,
) -> BootstrapOutcome {
    if config.is_none() {
        return BootstrapOutcome::Skipped;
    }
    if let Some(user) = provider.current_user() {
        log::debug!("identity already established for {}", user.uid);
        return BootstrapOutcome::AlreadySignedIn(user);
    }
    let attempt = match token {
        Some(t) => provider.sign_in_with_token(t),
        None => provider.sign_in_anonymously(),
    };
    match attempt {
        Ok(user) => {
            log::debug!("signed in as {} (anonymous: {})", user.uid, user.anonymous);
            BootstrapOutcome::SignedIn(user)
        }
        Err(e) => {
            log::error!("identity bootstrap failed: {}", e);
            BootstrapOutcome::Failed
        }
    }
}

/// Read the configuration and token from the environment and bootstrap
pub fn bootstrap_from_env(provider: &mut dyn IdentityProvider) -> BootstrapOutcome {
    let config = match std::env::var(AUTH_CONFIG_ENV) {
        Ok(raw) => match AuthConfig::from_json_str(&raw) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                log::error!("ignoring {}: {}", AUTH_CONFIG_ENV, e);
                None
            }
        },
        Err(_) => None,
    };
    let token = std::env::var(AUTH_TOKEN_ENV).ok().filter(|t| !t.is_empty());
    bootstrap(config.as_ref(), token.as_deref(), provider)
}

/// In-process provider that accepts any non-empty token
#[derive(Debug, Default)]
pub struct NoopIdentityProvider {
    user: Option<Identity>,
}

impl NoopIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityProvider for NoopIdentityProvider {
    fn current_user(&self) -> Option<Identity> {
        self.user.clone()
    }

    fn sign_in_with_token(&mut self, token: &str) -> Result<Identity> {
        if token.trim().is_empty() {
            return Err(Error::AuthError("empty token".into()));
        }
        let user = Identity {
            uid: format!("token-{}", token.chars().take(8).collect::<String>()),
            anonymous: false,
        };
        self.user = Some(user.clone());
        Ok(user)
    }

    fn sign_in_anonymously(&mut self) -> Result<Identity> {
        let user = Identity {
            uid: "anonymous".to_string(),
            anonymous: true,
        };
        self.user = Some(user.clone());
        Ok(user)
    }
}
