//! Error types for the session crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `ProviderError`: failures reported by an identity provider
//! - `ProfileError`: failures reported by a profile store
//! - `AuthError`: what callers of the session store match on; provider and
//!   profile causes stay attached beneath it

use std::fmt;

/// Errors surfaced to callers of session store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The provider rejected the address/secret pair.
    InvalidCredential,
    /// An account already exists for the address.
    EmailAlreadyInUse,
    /// The provider refused the secret as too weak.
    WeakSecret,
    /// The provider refused the address as malformed.
    InvalidEmail,
    /// The account exists but has been disabled at the provider.
    AccountDisabled,
    /// The provider or profile store could not be reached.
    NetworkUnavailable,
    /// A profile lookup failed. Tolerated; only ever logged.
    ProfileUnreachable,
    /// The provider answered with an error this crate does not model.
    ProviderRejected { code: String },
}

impl AuthError {
    /// Stable snake_case code for wire formats and logs.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCredential => "invalid_credential",
            Self::EmailAlreadyInUse => "email_already_in_use",
            Self::WeakSecret => "weak_secret",
            Self::InvalidEmail => "invalid_email",
            Self::AccountDisabled => "account_disabled",
            Self::NetworkUnavailable => "network_unavailable",
            Self::ProfileUnreachable => "profile_unreachable",
            Self::ProviderRejected { .. } => "provider_rejected",
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredential => write!(f, "invalid email address or secret"),
            Self::EmailAlreadyInUse => write!(f, "email address is already in use"),
            Self::WeakSecret => write!(f, "secret is too weak"),
            Self::InvalidEmail => write!(f, "email address is malformed"),
            Self::AccountDisabled => write!(f, "account has been disabled"),
            Self::NetworkUnavailable => write!(f, "identity service is unreachable"),
            Self::ProfileUnreachable => write!(f, "profile store is unreachable"),
            Self::ProviderRejected { code } => {
                write!(f, "identity provider rejected the request: {code}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

impl From<&ProviderError> for AuthError {
    fn from(err: &ProviderError) -> Self {
        match err {
            ProviderError::InvalidCredential => Self::InvalidCredential,
            ProviderError::EmailAlreadyInUse => Self::EmailAlreadyInUse,
            ProviderError::WeakSecret => Self::WeakSecret,
            ProviderError::InvalidEmail => Self::InvalidEmail,
            ProviderError::AccountDisabled => Self::AccountDisabled,
            ProviderError::Unreachable { .. } => Self::NetworkUnavailable,
            ProviderError::Rejected { code } => Self::ProviderRejected { code: code.clone() },
        }
    }
}

/// Errors from identity provider operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Unknown address or wrong secret.
    InvalidCredential,
    /// An account already exists for the address.
    EmailAlreadyInUse,
    /// Secret does not meet the provider's strength rule.
    WeakSecret,
    /// Address is not syntactically valid.
    InvalidEmail,
    /// Account is disabled.
    AccountDisabled,
    /// Transport failure talking to the provider.
    Unreachable { reason: String },
    /// Any other provider error code.
    Rejected { code: String },
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredential => write!(f, "provider rejected the credential"),
            Self::EmailAlreadyInUse => write!(f, "provider reports the address in use"),
            Self::WeakSecret => write!(f, "provider rejected a weak secret"),
            Self::InvalidEmail => write!(f, "provider rejected the address"),
            Self::AccountDisabled => write!(f, "provider reports the account disabled"),
            Self::Unreachable { reason } => write!(f, "provider unreachable: {reason}"),
            Self::Rejected { code } => write!(f, "provider error: {code}"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Errors from profile store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// The store could not be reached or refused the request.
    Unreachable { reason: String },
    /// A stored record could not be decoded.
    Malformed { reason: String },
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable { reason } => write!(f, "profile store unreachable: {reason}"),
            Self::Malformed { reason } => write!(f, "malformed profile record: {reason}"),
        }
    }
}

impl std::error::Error for ProfileError {}
