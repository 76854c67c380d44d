//! Identity provider boundary.
//!
//! Credential verification happens outside the engine. A provider turns an opaque
//! credential into a raw role and subject id; the gate normalizes the role.

use std::collections::BTreeMap;
use thiserror::Error;

/// What a provider vouches for. The role is not yet normalized.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawIdentity {
    pub role: Option<String>,
    pub subject_id: Option<String>,
}

impl RawIdentity {
    pub fn new(role: impl Into<String>, subject_id: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            subject_id: Some(subject_id.into()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("credential is invalid")]
    Invalid,
    #[error("credential has expired")]
    Expired,
    #[error("identity resolution timed out")]
    TimedOut,
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

pub trait IdentityProvider: Send + Sync {
    /// `Ok(None)` means the provider knows of no identity for this credential.
    fn resolve(&self, credential: &str) -> Result<Option<RawIdentity>, IdentityError>;
}

impl<F> IdentityProvider for F
where
    F: Fn(&str) -> Result<Option<RawIdentity>, IdentityError> + Send + Sync,
{
    fn resolve(&self, credential: &str) -> Result<Option<RawIdentity>, IdentityError> {
        self(credential)
    }
}

/// Fixed credential table. Unknown credentials are invalid.
#[derive(Clone, Debug, Default)]
pub struct StaticIdentities {
    tokens: BTreeMap<String, RawIdentity>,
}

impl StaticIdentities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, credential: impl Into<String>, identity: RawIdentity) -> Self {
        self.tokens.insert(credential.into(), identity);
        self
    }
}

impl IdentityProvider for StaticIdentities {
    fn resolve(&self, credential: &str) -> Result<Option<RawIdentity>, IdentityError> {
        self.tokens
            .get(credential)
            .cloned()
            .map(Some)
            .ok_or(IdentityError::Invalid)
    }
}
