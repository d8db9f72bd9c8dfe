use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router, middleware};
use serde_json::json;
use tokio::sync::RwLock;

use schoolhub_auth::{
    AuthorizationEvaluator, Feature, Module, SessionProvider,
};
use schoolhub_core::{DomainError, TenantId};
use schoolhub_guard::{GuardRequirements, GuardState, RedirectTarget, RouteGuard};
use schoolhub_tenant::{TenantFeatureRegistry, TenantFeatureSet};

use crate::context::SessionContext;
use crate::errors::ApiError;
use crate::middleware::session_middleware;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RwLock<TenantFeatureRegistry>>,
    pub provider: Arc<dyn SessionProvider>,
}

impl AppState {
    pub fn new(registry: TenantFeatureRegistry, provider: Arc<dyn SessionProvider>) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
            provider,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing))
        .route("/dashboard", get(dashboard))
        .route("/modules/:name", get(module_view))
        .route("/tenants/:tenant_id", post(provision_tenant))
        .route("/tenants/:tenant_id/features", get(list_features))
        .route(
            "/tenants/:tenant_id/features/:feature/toggle",
            post(toggle_feature),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .with_state(state)
}

/// Public landing page; the "not authenticated at all" redirect target.
async fn landing() -> Json<serde_json::Value> {
    Json(json!({ "page": "landing" }))
}

/// Generic authenticated dashboard; the "insufficient rights" redirect target.
async fn dashboard(Extension(ctx): Extension<SessionContext>) -> Response {
    match ctx.session() {
        s if s.is_authenticated() => Json(json!({ "page": "dashboard" })).into_response(),
        s if s.is_loading() => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        _ => Redirect::to(RedirectTarget::PublicLanding.path()).into_response(),
    }
}

/// Entry point for a protected module view.
///
/// The path segment is the dynamic edge for module names: an unknown name
/// fails closed exactly like an insufficient permission (authenticated
/// callers land on the dashboard, anonymous ones on the landing page).
async fn module_view(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(name): Path<String>,
) -> Response {
    let module = name.parse::<Module>().ok();
    let requirements = match module {
        Some(module) => GuardRequirements::module(module),
        None => GuardRequirements::authenticated(),
    };
    let guard = RouteGuard::new(requirements);

    let registry = state.registry.read().await;
    let fallback = TenantFeatureSet::all_disabled();
    // Unprovisioned tenants read as all-disabled rather than erroring.
    let flags = match ctx.user() {
        Some(user) => registry.flags(user.tenant_id).unwrap_or(&fallback),
        None => &fallback,
    };
    let evaluator = AuthorizationEvaluator::new(registry.table(), flags);

    let mut decision = guard.evaluate(ctx.session(), &evaluator);
    if decision == GuardState::Authorized && module.is_none() {
        decision = GuardState::Unauthorized(RedirectTarget::Dashboard);
    }

    match decision {
        GuardState::Loading => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        GuardState::Unauthorized(target) => Redirect::to(target.path()).into_response(),
        GuardState::Authorized => Json(json!({ "module": name })).into_response(),
    }
}

/// Operator surface: provision a tenant with the default flag set.
async fn provision_tenant(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
) -> Result<Response, ApiError> {
    let tenant_id: TenantId = tenant_id.parse()?;
    let mut registry = state.registry.write().await;
    let flags = registry.create_tenant(tenant_id)?.clone();
    Ok((StatusCode::CREATED, Json(flags)).into_response())
}

/// Current flag snapshot, readable by any authenticated member of the tenant.
async fn list_features(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(tenant_id): Path<String>,
) -> Result<Json<TenantFeatureSet>, ApiError> {
    let tenant_id: TenantId = tenant_id.parse()?;
    let user = ctx.user().ok_or(DomainError::Unauthorized)?;
    if user.tenant_id != tenant_id {
        return Err(DomainError::Unauthorized.into());
    }

    let registry = state.registry.read().await;
    Ok(Json(registry.flags(tenant_id)?.clone()))
}

/// Flip a tenant feature. Admin-of-that-tenant only; unknown feature keys
/// are rejected, never created.
async fn toggle_feature(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path((tenant_id, feature)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let tenant_id: TenantId = tenant_id.parse()?;
    let feature: Feature = feature
        .parse()
        .map_err(|e| DomainError::validation(format!("{e}")))?;
    let actor = ctx.user().ok_or(DomainError::Unauthorized)?;

    let mut registry = state.registry.write().await;
    let enabled = registry.toggle_feature(actor, tenant_id, feature)?;
    Ok(Json(json!({ "feature": feature, "enabled": enabled })))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, header};
    use chrono::Utc;
    use tower::ServiceExt;

    use schoolhub_auth::{AuthenticatedUser, Role, RolePermissionTable};
    use schoolhub_core::UserId;

    use super::*;
    use crate::session::StaticSessionProvider;

    fn member_of(tenant_id: TenantId, role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            id: UserId::new(),
            tenant_id,
            email: format!("{role}@oakwood.example"),
            display_name: format!("Oakwood {role}"),
            role,
            person_ref: None,
            issued_at: Utc::now(),
        }
    }

    fn test_app() -> (Router, TenantId) {
        let tenant = TenantId::new();
        let mut registry = TenantFeatureRegistry::new(RolePermissionTable::new());
        registry.create_tenant(tenant).unwrap();

        let provider = StaticSessionProvider::new()
            .with_user("admin-token", member_of(tenant, Role::Admin))
            .with_user("teacher-token", member_of(tenant, Role::Teacher))
            .with_user("student-token", member_of(tenant, Role::Student));

        let state = AppState::new(registry, Arc::new(provider));
        (router(state), tenant)
    }

    fn get_as(token: Option<&str>, uri: &str) -> Request<Body> {
        let mut req = Request::builder().uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        req.body(Body::empty()).unwrap()
    }

    fn post_as(token: Option<&str>, uri: &str) -> Request<Body> {
        let mut req = Request::builder().method("POST").uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        req.body(Body::empty()).unwrap()
    }

    fn location(res: &Response) -> Option<&str> {
        res.headers().get(header::LOCATION)?.to_str().ok()
    }

    #[tokio::test]
    async fn anonymous_module_request_redirects_to_the_landing_page() {
        let (app, _) = test_app();
        let res = app.oneshot(get_as(None, "/modules/students")).await.unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), Some("/"));
    }

    #[tokio::test]
    async fn teacher_enters_attendance_with_the_default_flags() {
        let (app, _) = test_app();
        let res = app
            .oneshot(get_as(Some("teacher-token"), "/modules/attendance"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn student_is_turned_away_from_fees_toward_the_dashboard() {
        let (app, _) = test_app();
        let res = app
            .oneshot(get_as(Some("student-token"), "/modules/fees"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), Some("/dashboard"));
    }

    #[tokio::test]
    async fn unknown_module_name_fails_closed_for_authenticated_callers() {
        let (app, _) = test_app();
        let res = app
            .oneshot(get_as(Some("admin-token"), "/modules/cafeteria"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), Some("/dashboard"));
    }

    #[tokio::test]
    async fn admin_toggle_is_visible_to_the_next_module_request() {
        let (app, tenant) = test_app();

        let res = app
            .clone()
            .oneshot(get_as(Some("teacher-token"), "/modules/attendance"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = app
            .clone()
            .oneshot(post_as(
                Some("admin-token"),
                &format!("/tenants/{tenant}/features/attendanceManagement/toggle"),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = app
            .oneshot(get_as(Some("teacher-token"), "/modules/attendance"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), Some("/dashboard"));
    }

    #[tokio::test]
    async fn non_admin_toggle_is_forbidden() {
        let (app, tenant) = test_app();
        let res = app
            .oneshot(post_as(
                Some("teacher-token"),
                &format!("/tenants/{tenant}/features/onlineExams/toggle"),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unknown_feature_key_is_rejected_not_created() {
        let (app, tenant) = test_app();
        let res = app
            .oneshot(post_as(
                Some("admin-token"),
                &format!("/tenants/{tenant}/features/swimmingPool/toggle"),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn provisioning_the_same_tenant_twice_conflicts() {
        let (app, _) = test_app();
        let fresh = TenantId::new();

        let res = app
            .clone()
            .oneshot(post_as(None, &format!("/tenants/{fresh}")))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);

        let res = app
            .oneshot(post_as(None, &format!("/tenants/{fresh}")))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn feature_listing_requires_a_member_of_that_tenant() {
        let (app, tenant) = test_app();

        let res = app
            .clone()
            .oneshot(get_as(Some("student-token"), &format!("/tenants/{tenant}/features")))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = app
            .clone()
            .oneshot(get_as(None, &format!("/tenants/{tenant}/features")))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let foreign = TenantId::new();
        let res = app
            .oneshot(get_as(Some("admin-token"), &format!("/tenants/{foreign}/features")))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }
}
