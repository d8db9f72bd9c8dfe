use serde::{Deserialize, Serialize};
use tracing::debug;

use schoolhub_auth::{AuthorizationEvaluator, Feature, FeatureFlagReader, Module, Role, Session};

/// Where to send a caller the guard turned away.
///
/// The two targets are deliberately distinct: an unauthenticated caller goes
/// to the public landing page, while a valid session with insufficient
/// rights goes to the dashboard. Redirecting the latter to the landing page
/// would force a pointless re-login and can loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RedirectTarget {
    PublicLanding,
    Dashboard,
}

impl RedirectTarget {
    pub fn path(&self) -> &'static str {
        match self {
            RedirectTarget::PublicLanding => "/",
            RedirectTarget::Dashboard => "/dashboard",
        }
    }
}

/// The guard's three-state render contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// The identity check is still outstanding; render a spinner only.
    Loading,
    /// Render the protected content unchanged.
    Authorized,
    /// Deny and redirect.
    Unauthorized(RedirectTarget),
}

/// What a protected route demands of its caller.
///
/// All constraints are optional; omitting all of them means
/// "authenticated-only". Specifying several means all must pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuardRequirements {
    pub required_role: Option<Role>,
    pub required_permission: Option<Feature>,
    pub required_module: Option<Module>,
}

impl GuardRequirements {
    /// Authenticated-only: no role, permission, or module constraint.
    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn role(role: Role) -> Self {
        Self {
            required_role: Some(role),
            ..Self::default()
        }
    }

    pub fn permission(feature: Feature) -> Self {
        Self {
            required_permission: Some(feature),
            ..Self::default()
        }
    }

    pub fn module(module: Module) -> Self {
        Self {
            required_module: Some(module),
            ..Self::default()
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.required_role = Some(role);
        self
    }

    pub fn with_permission(mut self, feature: Feature) -> Self {
        self.required_permission = Some(feature);
        self
    }

    pub fn with_module(mut self, module: Module) -> Self {
        self.required_module = Some(module);
        self
    }
}

/// The route guard.
///
/// Checks run in a fixed order (authentication, role, permission, module)
/// and the first failure wins; later checks are not evaluated.
#[derive(Debug, Clone, Copy)]
pub struct RouteGuard {
    requirements: GuardRequirements,
}

impl RouteGuard {
    pub fn new(requirements: GuardRequirements) -> Self {
        Self { requirements }
    }

    pub fn requirements(&self) -> &GuardRequirements {
        &self.requirements
    }

    pub fn evaluate<F: FeatureFlagReader>(
        &self,
        session: &Session,
        evaluator: &AuthorizationEvaluator<'_, F>,
    ) -> GuardState {
        let user = match session {
            Session::Loading => return GuardState::Loading,
            Session::Anonymous => {
                debug!("guard denied: no authenticated session");
                return GuardState::Unauthorized(RedirectTarget::PublicLanding);
            }
            Session::Authenticated(user) => user,
        };

        if let Some(required) = self.requirements.required_role
            && user.role != required
        {
            debug!(role = %user.role, required = %required, "guard denied: role mismatch");
            return GuardState::Unauthorized(RedirectTarget::Dashboard);
        }

        if let Some(feature) = self.requirements.required_permission
            && !evaluator.has_permission(Some(user), feature)
        {
            debug!(%feature, "guard denied: missing permission or disabled feature");
            return GuardState::Unauthorized(RedirectTarget::Dashboard);
        }

        if let Some(module) = self.requirements.required_module
            && !evaluator.can_access_module(Some(user), module)
        {
            debug!(%module, "guard denied: module not accessible");
            return GuardState::Unauthorized(RedirectTarget::Dashboard);
        }

        GuardState::Authorized
    }
}
