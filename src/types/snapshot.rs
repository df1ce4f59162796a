//! Signal snapshot: one cycle of environment metrics from the signal producer
//!
//! Every field is optional on the wire. Absent fields take neutral defaults
//! so that missing data can never trigger a detector on its own.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_ECONOMIC_MOOD, DEFAULT_EMPLOYMENT_RATE, DEFAULT_WEATHER_IMPACT};

/// One cycle of metrics for one environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignalSnapshot {
    /// Current cycle; defaults to prior cycle + 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_number: Option<u64>,
    pub event_count: u64,
    pub world_events: Vec<WorldEvent>,
    /// Roughly -1..1
    pub sentiment: f64,
    pub civic_load: CivicLoad,
    pub civic_load_score: f64,
    pub weather: Weather,
    /// 0..100
    pub economic_mood: f64,
    pub demographic_drift: DemographicDrift,
    pub arcs: Vec<NarrativeArc>,
    pub media_effects: MediaEffects,
    pub pattern_flag: PatternFlag,
    /// 0..1, absent means unknown (composites stay silent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community_engagement: Option<f64>,
    /// Calendar facts live at the top level of the snapshot
    #[serde(flatten)]
    pub calendar: CalendarFacts,
}

impl Default for SignalSnapshot {
    fn default() -> Self {
        Self {
            cycle_number: None,
            event_count: 0,
            world_events: Vec::new(),
            sentiment: 0.0,
            civic_load: CivicLoad::Stable,
            civic_load_score: 0.0,
            weather: Weather::default(),
            economic_mood: DEFAULT_ECONOMIC_MOOD,
            demographic_drift: DemographicDrift::default(),
            arcs: Vec::new(),
            media_effects: MediaEffects::default(),
            pattern_flag: PatternFlag::None,
            community_engagement: None,
            calendar: CalendarFacts::default(),
        }
    }
}

impl SignalSnapshot {
    /// Number of world events this cycle (the "chaos count")
    pub fn chaos_count(&self) -> u64 {
        self.world_events.len() as u64
    }

    /// Count world events whose domain matches, case-insensitively
    pub fn events_in_domain(&self, domain: &str) -> usize {
        self.world_events
            .iter()
            .filter(|e| e.domain.eq_ignore_ascii_case(domain))
            .count()
    }
}

/// A single world event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WorldEvent {
    pub severity: Severity,
    pub domain: String,
}

impl WorldEvent {
    pub fn new(severity: Severity, domain: impl Into<String>) -> Self {
        Self {
            severity,
            domain: domain.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// High or critical
    pub fn is_severe(&self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CivicLoad {
    #[default]
    Stable,
    Elevated,
    LoadStrain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PatternFlag {
    #[default]
    None,
    StabilityStreak,
    StrainTrend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Weather {
    pub impact_factor: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood_conflict: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood_comfort: Option<f64>,
}

impl Default for Weather {
    fn default() -> Self {
        Self {
            impact_factor: DEFAULT_WEATHER_IMPACT,
            mood_conflict: None,
            mood_comfort: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DemographicDrift {
    /// Net migration this cycle, signed
    pub migration: i64,
    /// 0..1
    pub employment_rate: f64,
}

impl Default for DemographicDrift {
    fn default() -> Self {
        Self {
            migration: 0,
            employment_rate: DEFAULT_EMPLOYMENT_RATE,
        }
    }
}

/// A narrative arc in progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NarrativeArc {
    pub phase: ArcPhase,
    pub tension: f64,
}

impl NarrativeArc {
    pub fn new(phase: ArcPhase, tension: f64) -> Self {
        Self { phase, tension }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArcPhase {
    #[default]
    Setup,
    Rising,
    Peak,
    Falling,
    Resolved,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaEffects {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crisis_saturation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage_intensity: Option<CoverageIntensity>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageIntensity {
    Quiet,
    Normal,
    Heavy,
    Saturated,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HolidayPriority {
    #[default]
    None,
    Major,
    Minor,
}

/// Raw calendar facts for the cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarFacts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holiday_name: Option<String>,
    pub holiday_priority: HolidayPriority,
    pub is_recurring_community_night: bool,
    pub is_quiet_anniversary_day: bool,
    /// Authoritative when `seasonal_override_active`, advisory otherwise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasonal_activity_phase: Option<String>,
    pub seasonal_override_active: bool,
    /// 1..12
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_neutral() {
        let snap: SignalSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snap, SignalSnapshot::default());
        assert_eq!(snap.economic_mood, DEFAULT_ECONOMIC_MOOD);
        assert_eq!(snap.demographic_drift.employment_rate, DEFAULT_EMPLOYMENT_RATE);
        assert_eq!(snap.civic_load, CivicLoad::Stable);
    }

    #[test]
    fn test_calendar_facts_are_flat() {
        let snap: SignalSnapshot = serde_json::from_str(
            r#"{"holidayName": "Thanksgiving", "holidayPriority": "major", "month": 11}"#,
        )
        .unwrap();
        assert_eq!(snap.calendar.holiday_name.as_deref(), Some("Thanksgiving"));
        assert_eq!(snap.calendar.holiday_priority, HolidayPriority::Major);
        assert_eq!(snap.calendar.month, Some(11));
    }

    #[test]
    fn test_nested_calendar_object_is_not_read() {
        let snap: SignalSnapshot = serde_json::from_str(
            r#"{"calendar": {"holidayName": "Thanksgiving", "holidayPriority": "major"}, "eventCount": 1}"#,
        )
        .unwrap();
        assert_eq!(snap.calendar, CalendarFacts::default());
        assert_eq!(snap.event_count, 1);

        let value = serde_json::to_value(SignalSnapshot {
            calendar: CalendarFacts {
                holiday_name: Some("Thanksgiving".into()),
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap();
        assert_eq!(value["holidayName"], "Thanksgiving");
        assert!(value.get("calendar").is_none());
    }

    #[test]
    fn test_wire_enum_names() {
        let snap: SignalSnapshot = serde_json::from_str(
            r#"{
                "civicLoad": "load-strain",
                "patternFlag": "stability-streak",
                "worldEvents": [{"severity": "critical", "domain": "Safety"}],
                "arcs": [{"phase": "epilogue", "tension": 2.0}],
                "mediaEffects": {"coverageIntensity": "saturated"}
            }"#,
        )
        .unwrap();
        assert_eq!(snap.civic_load, CivicLoad::LoadStrain);
        assert_eq!(snap.pattern_flag, PatternFlag::StabilityStreak);
        assert!(snap.world_events[0].severity.is_severe());
        assert_eq!(snap.arcs[0].phase, ArcPhase::Other);
        assert_eq!(snap.media_effects.coverage_intensity, Some(CoverageIntensity::Saturated));
        assert_eq!(snap.events_in_domain("safety"), 1);
    }
}
