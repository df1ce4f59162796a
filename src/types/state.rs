//! Alert flags and the state carried between cycles

use serde::{Deserialize, Serialize};

use crate::types::PatternFlag;

/// Hysteresis state of an alert episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AlertFlag {
    /// No episode
    #[default]
    None,
    /// Episode active and escalating (or young)
    Firing,
    /// Episode has lasted a while but few detections remain
    Fading,
    /// Long episode with few detections
    Chronic,
    /// Episode ended this cycle
    Resolved,
}

impl AlertFlag {
    /// Firing, fading or chronic: an episode is in progress
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Firing | Self::Fading | Self::Chronic)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Firing => "firing",
            Self::Fading => "fading",
            Self::Chronic => "chronic",
            Self::Resolved => "resolved",
        }
    }
}

impl std::fmt::Display for AlertFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AlertFlag::None => "NONE",
            AlertFlag::Firing => "FIRING",
            AlertFlag::Fading => "FADING",
            AlertFlag::Chronic => "CHRONIC",
            AlertFlag::Resolved => "RESOLVED",
        };
        write!(f, "{}", name)
    }
}

/// Summary of the previous cycle, as persisted by the caller
///
/// Every field is optional. The first cycle of an environment passes
/// `PriorCycleState::default()` (or nothing at all).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PriorCycleState {
    pub cycle_number: Option<u64>,
    pub event_count: Option<u64>,
    pub chaos_count: Option<u64>,
    pub sentiment: Option<f64>,
    pub economic_mood: Option<f64>,
    pub pattern_flag: Option<PatternFlag>,
    pub alert_flag: Option<AlertFlag>,
    pub alert_start_cycle: Option<u64>,
}

impl PriorCycleState {
    pub fn alert_flag(&self) -> AlertFlag {
        self.alert_flag.unwrap_or_default()
    }

    pub fn alert_start_cycle(&self) -> u64 {
        self.alert_start_cycle.unwrap_or(0)
    }

    pub fn pattern_flag(&self) -> PatternFlag {
        self.pattern_flag.unwrap_or_default()
    }
}

/// Compact projection of this cycle; next invocation's `PriorCycleState`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextCycleState {
    pub cycle_number: u64,
    pub event_count: u64,
    pub chaos_count: u64,
    pub sentiment: f64,
    pub economic_mood: f64,
    pub pattern_flag: PatternFlag,
    pub alert_flag: AlertFlag,
    pub alert_start_cycle: u64,
}

impl From<NextCycleState> for PriorCycleState {
    fn from(next: NextCycleState) -> Self {
        Self {
            cycle_number: Some(next.cycle_number),
            event_count: Some(next.event_count),
            chaos_count: Some(next.chaos_count),
            sentiment: Some(next.sentiment),
            economic_mood: Some(next.economic_mood),
            pattern_flag: Some(next.pattern_flag),
            alert_flag: Some(next.alert_flag),
            alert_start_cycle: Some(next.alert_start_cycle),
        }
    }
}

impl From<&NextCycleState> for PriorCycleState {
    fn from(next: &NextCycleState) -> Self {
        next.clone().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_flags() {
        assert!(AlertFlag::Firing.is_active());
        assert!(AlertFlag::Fading.is_active());
        assert!(AlertFlag::Chronic.is_active());
        assert!(!AlertFlag::Resolved.is_active());
        assert!(!AlertFlag::None.is_active());
    }

    #[test]
    fn test_prior_defaults() {
        let prior: PriorCycleState = serde_json::from_str("{}").unwrap();
        assert_eq!(prior.alert_flag(), AlertFlag::None);
        assert_eq!(prior.alert_start_cycle(), 0);
        assert_eq!(prior.pattern_flag(), PatternFlag::None);
    }

    #[test]
    fn test_next_state_reads_back_as_prior() {
        let next = NextCycleState {
            cycle_number: 7,
            event_count: 12,
            chaos_count: 3,
            sentiment: -0.1,
            economic_mood: 44.0,
            pattern_flag: PatternFlag::StrainTrend,
            alert_flag: AlertFlag::Firing,
            alert_start_cycle: 5,
        };
        let json = serde_json::to_string(&next).unwrap();
        let prior: PriorCycleState = serde_json::from_str(&json).unwrap();
        assert_eq!(prior, PriorCycleState::from(&next));
    }
}
