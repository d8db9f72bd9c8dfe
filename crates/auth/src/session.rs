use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use schoolhub_core::{DomainResult, TenantId, UserId};

use crate::Role;

/// An authenticated user as issued by the identity provider.
///
/// Read-only to this layer: created and destroyed by the provider. A user
/// holds exactly one role and belongs to exactly one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub tenant_id: TenantId,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    /// Domain-specific cross-reference (e.g. a student admission number).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_ref: Option<String>,
    /// When the provider last refreshed this session.
    pub issued_at: DateTime<Utc>,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_teacher(&self) -> bool {
        self.role == Role::Teacher
    }

    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }

    pub fn is_parent(&self) -> bool {
        self.role == Role::Parent
    }
}

/// The identity provider's answer to "who is calling?".
///
/// `Loading` models an outstanding provider round-trip; the guard renders a
/// loading state for its duration and does no other work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Loading,
    Anonymous,
    Authenticated(AuthenticatedUser),
}

impl Session {
    pub fn user(&self) -> Option<&AuthenticatedUser> {
        match self {
            Session::Authenticated(user) => Some(user),
            Session::Loading | Session::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Session::Loading)
    }
}

/// Identity-provider seam.
///
/// Resolution of an opaque credential into a session. Credential
/// verification (signatures, expiry) is the provider's business, not this
/// layer's; implementations must return `Anonymous` rather than erroring
/// for merely-invalid credentials. Errors are reserved for provider
/// malfunction.
pub trait SessionProvider: Send + Sync {
    fn resolve(&self, credential: &str) -> DomainResult<Session>;
}
