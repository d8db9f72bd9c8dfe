//! The authorization decision itself.
//!
//! Combines the authenticated user's role, the static role→permission table,
//! and the tenant's current feature flags. Decisions are computed fresh on
//! every call from the inputs handed in; nothing is cached, so a flag
//! mutation is visible to the very next check.

use crate::{AuthenticatedUser, Feature, Module, ModuleGate, RolePermissionTable};

/// Read access to the tenant's current feature-flag snapshot.
///
/// The evaluator only ever reads a fully-formed flag set; mutation is owned
/// by the tenant registry.
pub trait FeatureFlagReader {
    fn is_enabled(&self, feature: Feature) -> bool;
}

impl<T: FeatureFlagReader + ?Sized> FeatureFlagReader for &T {
    fn is_enabled(&self, feature: Feature) -> bool {
        (**self).is_enabled(feature)
    }
}

/// Fail-closed authorization evaluator.
///
/// Constructor-injected with the role table and a flag reader so it is unit
/// testable without any runtime around it. Both operations are pure
/// projections over their inputs:
///
/// - No IO
/// - No panics
/// - Never an error: every ambiguity resolves to `false`
#[derive(Debug, Clone, Copy)]
pub struct AuthorizationEvaluator<'a, F> {
    table: &'a RolePermissionTable,
    flags: F,
}

impl<'a, F: FeatureFlagReader> AuthorizationEvaluator<'a, F> {
    pub fn new(table: &'a RolePermissionTable, flags: F) -> Self {
        Self { table, flags }
    }

    /// May this user use the named capability?
    ///
    /// Conjunction of two independent conditions: the role's grant must
    /// allow the feature (wildcard or member), AND the tenant must have the
    /// feature enabled. A role permission does not override a disabled
    /// tenant feature (not even the admin wildcard), and an enabled tenant
    /// feature does not override a missing role permission.
    pub fn has_permission(&self, user: Option<&AuthenticatedUser>, feature: Feature) -> bool {
        let Some(user) = user else {
            return false;
        };

        self.table.permissions_for(user.role).allows(feature) && self.flags.is_enabled(feature)
    }

    /// May this user enter the named module?
    ///
    /// Settings is role-gated only (an identity property, not a feature);
    /// authenticated-only modules admit any non-null user; everything else
    /// delegates to [`Self::has_permission`] on the module's mapped feature.
    pub fn can_access_module(&self, user: Option<&AuthenticatedUser>, module: Module) -> bool {
        let Some(user) = user else {
            return false;
        };

        match module.gate() {
            ModuleGate::RoleOnly(role) => user.role == role,
            ModuleGate::AnyAuthenticated => true,
            ModuleGate::Feature(feature) => self.has_permission(Some(user), feature),
        }
    }
}
