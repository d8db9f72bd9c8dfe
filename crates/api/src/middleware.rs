use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use schoolhub_auth::{Session, SessionProvider};
use schoolhub_guard::resolve_session;

use crate::app::AppState;
use crate::context::SessionContext;

/// Bound on the identity-provider round-trip; elapse resolves to anonymous.
const IDENTITY_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolve the caller's session and attach it to the request.
///
/// Never rejects: anonymous callers pass through with an anonymous context,
/// and the guard in front of each protected route decides what that means.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let session = match extract_bearer(req.headers()) {
        Some(credential) => {
            let provider = Arc::clone(&state.provider);
            let credential = credential.to_string();
            resolve_session(
                async move { provider.resolve(&credential).unwrap_or(Session::Anonymous) },
                IDENTITY_CHECK_TIMEOUT,
            )
            .await
        }
        None => Session::Anonymous,
    };

    req.extensions_mut().insert(SessionContext::new(session));
    next.run(req).await
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let token = header.to_str().ok()?.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_extraction_trims_and_rejects_empty_tokens() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(axum::http::header::AUTHORIZATION, "Bearer  tok-1 ".parse().unwrap());
        assert_eq!(extract_bearer(&headers), Some("tok-1"));

        headers.insert(axum::http::header::AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(axum::http::header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(extract_bearer(&headers), None);
    }
}
