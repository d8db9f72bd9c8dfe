//! Bounded session resolution.
//!
//! The identity check is the guard's only suspension point. An unbounded
//! wait would leave the view on its spinner forever if the provider never
//! answered, so the wait is explicitly bounded and an elapsed bound
//! resolves to `Anonymous`: treated as unauthenticated, never as
//! authorized.

use std::time::Duration;

use tracing::warn;

use schoolhub_auth::Session;

/// Await the identity provider, at most `timeout`.
///
/// Cancellation is by drop: if the route is unmounted while the check is
/// outstanding, dropping this future discards the provider's eventual
/// answer, so a stale result can never authorize or redirect a dead view.
pub async fn resolve_session<F>(check: F, timeout: Duration) -> Session
where
    F: Future<Output = Session>,
{
    match tokio::time::timeout(timeout, check).await {
        Ok(session) => session,
        Err(_) => {
            warn!(timeout_ms = timeout.as_millis() as u64, "identity check timed out");
            Session::Anonymous
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use schoolhub_auth::{AuthenticatedUser, Role};
    use schoolhub_core::{TenantId, UserId};

    use super::*;

    fn some_user() -> AuthenticatedUser {
        AuthenticatedUser {
            id: UserId::new(),
            tenant_id: TenantId::new(),
            email: "head@riverdale.example".to_string(),
            display_name: "Riverdale Head".to_string(),
            role: Role::Admin,
            person_ref: None,
            issued_at: Utc::now(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn prompt_provider_answer_is_passed_through() {
        let session = resolve_session(
            async { Session::Authenticated(some_user()) },
            Duration::from_secs(10),
        )
        .await;
        assert!(session.is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn a_hung_identity_check_resolves_to_anonymous() {
        let session = resolve_session(std::future::pending(), Duration::from_secs(10)).await;
        assert_eq!(session, Session::Anonymous);
    }

    #[tokio::test(start_paused = true)]
    async fn unmounting_discards_the_outstanding_check() {
        let (tx, rx) = tokio::sync::oneshot::channel::<Session>();

        let view = tokio::spawn(resolve_session(
            async move { rx.await.unwrap_or(Session::Anonymous) },
            Duration::from_secs(10),
        ));
        // The route goes away before the provider answers.
        view.abort();
        assert!(view.await.unwrap_err().is_cancelled());

        // The provider's late answer has nowhere to land.
        assert!(tx.send(Session::Authenticated(some_user())).is_err());
    }
}
