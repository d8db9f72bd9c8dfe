use std::collections::HashMap;

use schoolhub_auth::{AuthenticatedUser, Session, SessionProvider};
use schoolhub_core::DomainResult;

/// Credential→user table standing in for the managed identity provider.
///
/// Real deployments put a verifying provider behind the same seam; this one
/// exists for local runs and tests. Unknown credentials resolve to
/// `Anonymous`, matching the provider contract (invalid is not an error).
#[derive(Debug, Default, Clone)]
pub struct StaticSessionProvider {
    users: HashMap<String, AuthenticatedUser>,
}

impl StaticSessionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, credential: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.users.insert(credential.into(), user);
        self
    }
}

impl SessionProvider for StaticSessionProvider {
    fn resolve(&self, credential: &str) -> DomainResult<Session> {
        Ok(self
            .users
            .get(credential)
            .cloned()
            .map(Session::Authenticated)
            .unwrap_or(Session::Anonymous))
    }
}
