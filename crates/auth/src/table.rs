use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Feature, Role};

/// What a role is entitled to use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Grant {
    /// The wildcard ("all"): every feature, unconditionally at the role
    /// level. Still subject to each feature's tenant enabled/disabled state.
    All,
    /// An explicit set of features.
    Features(HashSet<Feature>),
}

impl Grant {
    pub fn allows(&self, feature: Feature) -> bool {
        match self {
            Grant::All => true,
            Grant::Features(set) => set.contains(&feature),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Grant::All)
    }
}

/// Static role→grant configuration.
///
/// Process-wide, read-only, identical across tenants; fixed at deploy time.
/// The closed [`Role`] enum makes "unrecognized role" unrepresentable, so
/// the fail-closed empty-set fallback of the string-keyed design has no
/// runtime counterpart here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePermissionTable {
    admin: Grant,
    teacher: Grant,
    student: Grant,
    parent: Grant,
}

impl RolePermissionTable {
    /// The platform's shipped table.
    pub fn new() -> Self {
        Self {
            admin: Grant::All,
            teacher: Grant::Features(HashSet::from([
                Feature::AttendanceManagement,
                Feature::OnlineExams,
                Feature::StudentPortal,
                Feature::TeacherPortal,
                Feature::MessagingSystem,
                Feature::ReportCards,
            ])),
            student: Grant::Features(HashSet::from([
                Feature::StudentPortal,
                Feature::OnlineExams,
                Feature::MessagingSystem,
            ])),
            parent: Grant::Features(HashSet::from([
                Feature::ParentPortal,
                Feature::MessagingSystem,
                Feature::ReportCards,
            ])),
        }
    }

    pub fn permissions_for(&self, role: Role) -> &Grant {
        match role {
            Role::Admin => &self.admin,
            Role::Teacher => &self.teacher,
            Role::Student => &self.student,
            Role::Parent => &self.parent,
        }
    }

    /// Replace a role's grant. Test/bed-in hook; the production table is
    /// not user-editable at runtime.
    pub fn with_grant(mut self, role: Role, grant: Grant) -> Self {
        match role {
            Role::Admin => self.admin = grant,
            Role::Teacher => self.teacher = grant,
            Role::Student => self.student = grant,
            Role::Parent => self.parent = grant,
        }
        self
    }
}

impl Default for RolePermissionTable {
    fn default() -> Self {
        Self::new()
    }
}
