use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named capability a tenant can toggle, drawn from the closed, versioned
/// feature vocabulary.
///
/// The serde/string names are the wire vocabulary (camelCase) used by stored
/// tenant configuration; [`FromStr`] is the fail-closed edge for those
/// dynamic keys. Adding a variant is a vocabulary version bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    AttendanceManagement,
    OnlineExams,
    LibraryManagement,
    TransportManagement,
    HostelManagement,
    FeeManagement,
    ParentPortal,
    StudentPortal,
    TeacherPortal,
    MessagingSystem,
    EventManagement,
    ReportCards,
    DisciplineTracking,
    HealthRecords,
}

impl Feature {
    pub const ALL: [Feature; 14] = [
        Feature::AttendanceManagement,
        Feature::OnlineExams,
        Feature::LibraryManagement,
        Feature::TransportManagement,
        Feature::HostelManagement,
        Feature::FeeManagement,
        Feature::ParentPortal,
        Feature::StudentPortal,
        Feature::TeacherPortal,
        Feature::MessagingSystem,
        Feature::EventManagement,
        Feature::ReportCards,
        Feature::DisciplineTracking,
        Feature::HealthRecords,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::AttendanceManagement => "attendanceManagement",
            Feature::OnlineExams => "onlineExams",
            Feature::LibraryManagement => "libraryManagement",
            Feature::TransportManagement => "transportManagement",
            Feature::HostelManagement => "hostelManagement",
            Feature::FeeManagement => "feeManagement",
            Feature::ParentPortal => "parentPortal",
            Feature::StudentPortal => "studentPortal",
            Feature::TeacherPortal => "teacherPortal",
            Feature::MessagingSystem => "messagingSystem",
            Feature::EventManagement => "eventManagement",
            Feature::ReportCards => "reportCards",
            Feature::DisciplineTracking => "disciplineTracking",
            Feature::HealthRecords => "healthRecords",
        }
    }
}

impl core::fmt::Display for Feature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored/transported feature key is outside the vocabulary.
///
/// Unknown keys are never silently created; callers either reject the input
/// or fail closed to "deny".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown feature key: {0}")]
pub struct UnknownFeature(pub String);

impl FromStr for Feature {
    type Err = UnknownFeature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownFeature(s.to_string()))
    }
}
