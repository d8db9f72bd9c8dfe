use schoolhub_auth::{AuthenticatedUser, Session};

/// Resolved session for a request.
///
/// Inserted by the auth middleware on every request, anonymous ones
/// included; handlers read it instead of touching credentials themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    session: Session,
}

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn user(&self) -> Option<&AuthenticatedUser> {
        self.session.user()
    }
}
