//! The boundary to the external identity layer.
//!
//! Session handling, tokens and sign-in live outside this crate. All the core
//! needs is a way to turn "whoever is calling" into the id the identity
//! provider assigned to them.

use std::fmt::Display;

use crate::Error;

/// The id assigned to a user by the external identity provider.
///
/// Opaque to this crate; it is only ever compared against the `external_id`
/// column of the user table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalUserId(String);

impl ExternalUserId {
    /// Wrap an id string issued by the identity provider.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// View the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ExternalUserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Maps an opaque caller to the id the identity provider knows them by.
///
/// Implemented by the session layer that wraps this crate. Implementations
/// must return [Error::Unauthorized] when there is no authenticated caller.
pub trait IdentityResolver {
    /// Resolve the current caller to their external user id.
    ///
    /// # Errors
    /// Returns [Error::Unauthorized] if the caller is not authenticated.
    fn resolve_caller(&self) -> Result<ExternalUserId, Error>;
}

/// A resolver that always answers with a fixed external user id.
///
/// Useful for command line tools and tests where the caller is known up
/// front.
#[derive(Debug, Clone)]
pub struct StaticResolver {
    external_id: ExternalUserId,
}

impl StaticResolver {
    /// Create a resolver that resolves every caller to `external_id`.
    pub fn new(external_id: impl Into<String>) -> Self {
        Self {
            external_id: ExternalUserId::new(external_id),
        }
    }
}

impl IdentityResolver for StaticResolver {
    fn resolve_caller(&self) -> Result<ExternalUserId, Error> {
        Ok(self.external_id.clone())
    }
}
