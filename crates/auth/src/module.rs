use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Feature, Role};

/// A user-facing functional area of the platform.
///
/// Each module maps to exactly one gate (see [`Module::gate`]). Route params
/// are the dynamic edge here: parsing an unknown module name fails, and the
/// guard treats that as a denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Module {
    Students,
    Teachers,
    Attendance,
    Examinations,
    Fees,
    Communications,
    Classes,
    Blog,
    Settings,
}

/// How entry into a module is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleGate {
    /// Gated by a single tenant feature flag plus the role table.
    Feature(Feature),
    /// Open to every authenticated user regardless of role or flags
    /// (the "all" mapping in the module table).
    AnyAuthenticated,
    /// Gated purely by role; feature flags are not consulted.
    RoleOnly(Role),
}

impl Module {
    pub const ALL: [Module; 9] = [
        Module::Students,
        Module::Teachers,
        Module::Attendance,
        Module::Examinations,
        Module::Fees,
        Module::Communications,
        Module::Classes,
        Module::Blog,
        Module::Settings,
    ];

    /// The single gate controlling entry into this module.
    ///
    /// Settings is an identity property (admin only), not a toggle-able
    /// feature. Blog and classes are open to every authenticated role.
    pub fn gate(&self) -> ModuleGate {
        match self {
            Module::Students => ModuleGate::Feature(Feature::StudentPortal),
            Module::Teachers => ModuleGate::Feature(Feature::TeacherPortal),
            Module::Attendance => ModuleGate::Feature(Feature::AttendanceManagement),
            Module::Examinations => ModuleGate::Feature(Feature::OnlineExams),
            Module::Fees => ModuleGate::Feature(Feature::FeeManagement),
            Module::Communications => ModuleGate::Feature(Feature::MessagingSystem),
            Module::Classes => ModuleGate::AnyAuthenticated,
            Module::Blog => ModuleGate::AnyAuthenticated,
            Module::Settings => ModuleGate::RoleOnly(Role::Admin),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Students => "students",
            Module::Teachers => "teachers",
            Module::Attendance => "attendance",
            Module::Examinations => "examinations",
            Module::Fees => "fees",
            Module::Communications => "communications",
            Module::Classes => "classes",
            Module::Blog => "blog",
            Module::Settings => "settings",
        }
    }
}

impl core::fmt::Display for Module {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a route links to a module name outside the table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown module: {0}")]
pub struct UnknownModule(pub String);

impl FromStr for Module {
    type Err = UnknownModule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Module::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownModule(s.to_string()))
    }
}
