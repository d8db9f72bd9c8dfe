use std::collections::HashMap;

use tracing::info;

use schoolhub_auth::{
    AuthenticatedUser, AuthorizationEvaluator, Feature, Module, RolePermissionTable,
};
use schoolhub_core::{DomainError, DomainResult, TenantId};

use crate::TenantFeatureSet;

/// In-memory per-tenant flag store.
///
/// Mutation is admin-gated through the same settings-module check the UI
/// uses, so a flag can never be flipped by a caller the settings screen
/// would not admit. The store is the single writer of flag state; readers
/// always see a fully-formed snapshot.
#[derive(Debug)]
pub struct TenantFeatureRegistry {
    table: RolePermissionTable,
    tenants: HashMap<TenantId, TenantFeatureSet>,
}

impl TenantFeatureRegistry {
    pub fn new(table: RolePermissionTable) -> Self {
        Self {
            table,
            tenants: HashMap::new(),
        }
    }

    /// Provision a tenant with the documented default flag set.
    pub fn create_tenant(&mut self, tenant_id: TenantId) -> DomainResult<&TenantFeatureSet> {
        if self.tenants.contains_key(&tenant_id) {
            return Err(DomainError::conflict(format!(
                "tenant {tenant_id} already provisioned"
            )));
        }
        info!(%tenant_id, "provisioning tenant with default feature set");
        Ok(self.tenants.entry(tenant_id).or_default())
    }

    pub fn flags(&self, tenant_id: TenantId) -> DomainResult<&TenantFeatureSet> {
        self.tenants.get(&tenant_id).ok_or(DomainError::NotFound)
    }

    /// Toggle a tenant feature on behalf of `actor`.
    ///
    /// Only an authenticated admin of that same tenant may mutate flags;
    /// everyone else gets `Unauthorized`. Returns the feature's new state.
    pub fn toggle_feature(
        &mut self,
        actor: &AuthenticatedUser,
        tenant_id: TenantId,
        feature: Feature,
    ) -> DomainResult<bool> {
        if actor.tenant_id != tenant_id {
            return Err(DomainError::Unauthorized);
        }

        let flags = self.tenants.get(&tenant_id).ok_or(DomainError::NotFound)?;
        let evaluator = AuthorizationEvaluator::new(&self.table, flags);
        if !evaluator.can_access_module(Some(actor), Module::Settings) {
            return Err(DomainError::Unauthorized);
        }

        // Re-borrow mutably now that the decision is made.
        let flags = self.tenants.get_mut(&tenant_id).ok_or(DomainError::NotFound)?;
        let enabled = flags.toggle(feature);
        info!(%tenant_id, actor = %actor.id, %feature, enabled, "tenant feature toggled");
        Ok(enabled)
    }

    pub fn table(&self) -> &RolePermissionTable {
        &self.table
    }
}
