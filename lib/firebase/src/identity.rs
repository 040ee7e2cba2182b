//! Identity Toolkit client.
//!
//! Sign-up and sign-in are REST calls; sign-out is local. The client keeps the
//! last account and its id token in memory. Sign-in and sign-out are announced
//! on its own identity stream; a freshly created account is not.

use async_trait::async_trait;
use ciris_core::IdentityId;
use ciris_session::{
    Identity, IdentityBroadcaster, IdentityEvents, IdentityProvider, ProviderError, Secret,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info, instrument, warn};

use crate::config::FirebaseConfig;

const SIGN_UP: &str = "accounts:signUp";
const SIGN_IN: &str = "accounts:signInWithPassword";

/// Supplies the bearer token for requests made on behalf of an identity.
pub trait IdTokenSource: Send + Sync {
    /// Returns the id token held for `id`, if the client holds one for it.
    fn id_token_for(&self, id: &IdentityId) -> Option<String>;
}

/// Password authentication against the Identity Toolkit API.
pub struct IdentityToolkitClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    session: RwLock<Option<SignedIn>>,
    broadcaster: IdentityBroadcaster,
}

struct SignedIn {
    identity: Identity,
    id_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    email: Option<String>,
    id_token: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl IdentityToolkitClient {
    /// Creates a client using an existing HTTP client.
    #[must_use]
    pub fn with_http(http: reqwest::Client, config: &FirebaseConfig) -> Self {
        Self {
            http,
            base_url: config.auth_base_url().to_string(),
            api_key: config.api_key().to_string(),
            session: RwLock::new(None),
            broadcaster: IdentityBroadcaster::new(),
        }
    }

    /// Returns the signed-in identity, if any.
    #[must_use]
    pub fn current_identity(&self) -> Option<Identity> {
        self.broadcaster.current()
    }

    /// Number of live identity subscribers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.broadcaster.observer_count()
    }

    async fn password_call(
        &self,
        endpoint: &str,
        email: &str,
        secret: &Secret,
    ) -> Result<AccountResponse, ProviderError> {
        let response = self
            .http
            .post(format!("{}/{endpoint}", self.base_url))
            .query(&[("key", self.api_key.as_str())])
            .json(&PasswordRequest {
                email,
                password: secret.expose(),
                return_secure_token: true,
            })
            .send()
            .await
            .map_err(|e| ProviderError::Unreachable {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<AccountResponse>()
                .await
                .map_err(|e| ProviderError::Rejected {
                    code: format!("MALFORMED_RESPONSE: {e}"),
                });
        }

        if status.is_server_error() {
            return Err(ProviderError::Unreachable {
                reason: format!("{endpoint} returned {status}"),
            });
        }

        let code = match response.json::<ErrorEnvelope>().await {
            Ok(envelope) => error_code(&envelope.error.message).to_string(),
            Err(_) => format!("HTTP_{}", status.as_u16()),
        };
        debug!(%endpoint, %status, %code, "identity toolkit refused request");
        Err(map_error_code(&code))
    }

    fn remember(&self, account: AccountResponse) -> Identity {
        let identity = Identity::new(IdentityId::new(account.local_id), account.email);
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(SignedIn {
            identity: identity.clone(),
            id_token: account.id_token,
        });
        identity
    }
}

#[async_trait]
impl IdentityProvider for IdentityToolkitClient {
    #[instrument(skip(self, email, secret), fields(email = %email))]
    async fn create_identity(
        &self,
        email: &str,
        secret: &Secret,
    ) -> Result<Identity, ProviderError> {
        let account = self.password_call(SIGN_UP, email, secret).await?;
        // Held only so the profile write can authenticate; never announced.
        let identity = self.remember(account);
        info!(identity = %identity.id(), "account created");
        Ok(identity)
    }

    #[instrument(skip(self, email, secret), fields(email = %email))]
    async fn sign_in(&self, email: &str, secret: &Secret) -> Result<(), ProviderError> {
        let account = self.password_call(SIGN_IN, email, secret).await?;
        // The token must be in place before subscribers react to the event.
        let identity = self.remember(account);
        self.broadcaster.publish(Some(identity.clone()));
        debug!(identity = %identity.id(), "signed in");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn sign_out(&self) {
        let previous = self
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(previous) = previous {
            debug!(identity = %previous.identity.id(), "signed out");
        }
        self.broadcaster.publish(None);
    }

    fn observe_identity(&self) -> IdentityEvents {
        self.broadcaster.subscribe()
    }
}

impl IdTokenSource for IdentityToolkitClient {
    fn id_token_for(&self, id: &IdentityId) -> Option<String> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|held| held.identity.id() == id)
            .map(|held| held.id_token.clone())
    }
}

impl fmt::Debug for IdentityToolkitClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityToolkitClient")
            .field("base_url", &self.base_url)
            .field("signed_in", &self.current_identity().map(|i| i.id().clone()))
            .finish_non_exhaustive()
    }
}

/// Extracts the code from messages like `"WEAK_PASSWORD : Password should be
/// at least 6 characters"`.
fn error_code(message: &str) -> &str {
    message.split(':').next().map_or(message, str::trim)
}

/// Maps an Identity Toolkit error code onto the provider taxonomy.
fn map_error_code(code: &str) -> ProviderError {
    match code {
        "EMAIL_EXISTS" => ProviderError::EmailAlreadyInUse,
        "WEAK_PASSWORD" => ProviderError::WeakSecret,
        "INVALID_EMAIL" | "MISSING_EMAIL" => ProviderError::InvalidEmail,
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            ProviderError::InvalidCredential
        }
        "USER_DISABLED" => ProviderError::AccountDisabled,
        other => {
            warn!(code = other, "unmapped identity toolkit error");
            ProviderError::Rejected {
                code: other.to_string(),
            }
        }
    }
}
