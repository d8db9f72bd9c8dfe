use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use schoolhub_auth::{Feature, FeatureFlagReader};
use schoolhub_core::{DomainError, DomainResult};

/// A tenant's current feature-flag snapshot.
///
/// Every vocabulary feature always has an explicit state; there is no
/// "absent" key. The closed [`Feature`] enum keeps unknown keys out of the
/// typed API entirely; [`TenantFeatureSet::from_named_flags`] is the
/// fail-closed edge for string-keyed flag maps loaded from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantFeatureSet {
    flags: BTreeMap<Feature, bool>,
}

impl TenantFeatureSet {
    /// The default set applied at tenant creation: core academics enabled
    /// (attendance, online exams, library, fees, the three portals,
    /// messaging, events, report cards), opt-in operational extras disabled
    /// (transport, hostel, discipline tracking, health records).
    pub fn new() -> Self {
        let mut flags = BTreeMap::new();
        for feature in Feature::ALL {
            let enabled = !matches!(
                feature,
                Feature::TransportManagement
                    | Feature::HostelManagement
                    | Feature::DisciplineTracking
                    | Feature::HealthRecords
            );
            flags.insert(feature, enabled);
        }
        Self { flags }
    }

    /// Every feature disabled. Test/bed-in starting point.
    pub fn all_disabled() -> Self {
        Self {
            flags: Feature::ALL.into_iter().map(|f| (f, false)).collect(),
        }
    }

    /// Load from a string-keyed flag map (stored tenant configuration).
    ///
    /// Unknown feature keys are never silently created: any key outside the
    /// vocabulary rejects the whole map. Features absent from the map keep
    /// their default state.
    pub fn from_named_flags<'a, I>(named: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let mut set = Self::new();
        for (key, enabled) in named {
            let feature: Feature = key
                .parse()
                .map_err(|e| DomainError::validation(format!("{e}")))?;
            set.flags.insert(feature, enabled);
        }
        Ok(set)
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.flags.get(&feature).copied().unwrap_or(false)
    }

    pub fn set(&mut self, feature: Feature, enabled: bool) {
        self.flags.insert(feature, enabled);
    }

    /// Flip a feature, returning its new state.
    pub fn toggle(&mut self, feature: Feature) -> bool {
        let next = !self.is_enabled(feature);
        self.flags.insert(feature, next);
        next
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, bool)> + '_ {
        self.flags.iter().map(|(f, e)| (*f, *e))
    }
}

impl Default for TenantFeatureSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureFlagReader for TenantFeatureSet {
    fn is_enabled(&self, feature: Feature) -> bool {
        TenantFeatureSet::is_enabled(self, feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_core_academics_and_disable_extras() {
        let set = TenantFeatureSet::new();
        assert!(set.is_enabled(Feature::AttendanceManagement));
        assert!(set.is_enabled(Feature::FeeManagement));
        assert!(set.is_enabled(Feature::ParentPortal));
        assert!(!set.is_enabled(Feature::TransportManagement));
        assert!(!set.is_enabled(Feature::HealthRecords));
        // Every vocabulary feature has an explicit state from day one.
        assert_eq!(set.iter().count(), Feature::ALL.len());
    }

    #[test]
    fn toggle_flips_and_reports_the_new_state() {
        let mut set = TenantFeatureSet::new();
        assert!(!set.toggle(Feature::FeeManagement));
        assert!(!set.is_enabled(Feature::FeeManagement));
        assert!(set.toggle(Feature::FeeManagement));
        assert!(set.is_enabled(Feature::FeeManagement));
    }

    #[test]
    fn loading_rejects_unknown_keys_outright() {
        let err = TenantFeatureSet::from_named_flags([
            ("attendanceManagement", false),
            ("swimmingPool", true),
        ])
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn loading_overlays_named_flags_on_the_defaults() {
        let set = TenantFeatureSet::from_named_flags([
            ("attendanceManagement", false),
            ("hostelManagement", true),
        ])
        .unwrap();
        assert!(!set.is_enabled(Feature::AttendanceManagement));
        assert!(set.is_enabled(Feature::HostelManagement));
        // Untouched keys keep their defaults.
        assert!(set.is_enabled(Feature::OnlineExams));
    }

    #[test]
    fn snapshot_round_trips_through_serde() {
        let mut set = TenantFeatureSet::new();
        set.set(Feature::HealthRecords, true);
        let json = serde_json::to_string(&set).unwrap();
        assert!(json.contains("\"healthRecords\":true"));
        let back: TenantFeatureSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
