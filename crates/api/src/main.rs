use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use tracing::info;

use schoolhub_api::{AppState, StaticSessionProvider, router};
use schoolhub_auth::{AuthenticatedUser, Role, RolePermissionTable};
use schoolhub_core::{TenantId, UserId};
use schoolhub_tenant::TenantFeatureRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    schoolhub_observability::init();

    // Demo wiring: one provisioned tenant and a fixed credential per role.
    // A real deployment swaps the provider for the managed identity service.
    let tenant_id = TenantId::new();
    let mut registry = TenantFeatureRegistry::new(RolePermissionTable::new());
    registry
        .create_tenant(tenant_id)
        .context("provisioning the demo tenant")?;

    let mut provider = StaticSessionProvider::new();
    for role in Role::ALL {
        provider = provider.with_user(
            format!("{role}-token"),
            AuthenticatedUser {
                id: UserId::new(),
                tenant_id,
                email: format!("{role}@demo.schoolhub.example"),
                display_name: format!("Demo {role}"),
                role,
                person_ref: None,
                issued_at: Utc::now(),
            },
        );
    }

    let state = AppState::new(registry, Arc::new(provider));
    let app = router(state);

    let addr = std::env::var("SCHOOLHUB_LISTEN").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, %tenant_id, "schoolhub-api listening");

    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}
