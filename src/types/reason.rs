//! Reason codes for detections and hysteresis notes
//!
//! S1xx: per-metric detectors
//! S2xx: calendar composites
//! S9xx: hysteresis notes (appended by the state machine, not by detectors)

use serde::{Deserialize, Serialize};

/// Closed set of reasons an alert record can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ReasonCode {
    // =========================================================================
    // S10x: Activity
    // =========================================================================
    /// Event count jumped past the spike threshold
    S101_EVENT_SPIKE,
    /// Two or more high/critical events
    S102_SEVERITY_SPIKE,
    /// Four or more medium events
    S103_MEDIUM_SEVERITY_CLUSTER,
    /// World-event count jumped past the chaos threshold
    S104_CHAOS_SPIKE,
    /// World-event count above saturation
    S105_CHAOS_SATURATION,

    // =========================================================================
    // S10x-S11x: Environment
    // =========================================================================
    S106_WEATHER_IMPACT,
    S107_WEATHER_CONFLICT,
    S108_WEATHER_DISCOMFORT,
    S109_SENTIMENT_DROP,
    S110_SENTIMENT_FLOOR,
    S111_ECONOMIC_DROP,
    S112_ECONOMIC_FLOOR,
    S113_MIGRATION_SURGE,
    S114_EMPLOYMENT_CRISIS,
    S115_CIVIC_STRAIN,
    S116_CIVIC_OVERLOAD,

    // =========================================================================
    // S11x-S12x: Narrative
    // =========================================================================
    /// A stability streak ended in a busy cycle
    S117_STREAK_BROKEN,
    S118_STRAIN_TREND,
    S119_ARC_PEAK_CLUSTER,
    S120_ARC_TENSION_CLUSTER,
    S121_MEDIA_SATURATION,
    S122_COVERAGE_SATURATED,

    // =========================================================================
    // S2xx: Calendar composites
    // =========================================================================
    /// Major holiday with almost nothing happening
    S201_HOLIDAY_DEAD_ZONE,
    S202_PEAK_SEASON_GLOOM,
    S203_FIREWORKS_SAFETY,
    S204_CULTURAL_DISENGAGEMENT,
    S205_DISENGAGED_GLOOM,
    S206_TRAVEL_INFRASTRUCTURE,

    // =========================================================================
    // S9xx: Hysteresis notes
    // =========================================================================
    S901_NOTE_CHRONIC,
    S902_NOTE_FADING,
    S903_NOTE_RESOLVED,
}

impl ReasonCode {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::S101_EVENT_SPIKE => "S101_EVENT_SPIKE",
            Self::S102_SEVERITY_SPIKE => "S102_SEVERITY_SPIKE",
            Self::S103_MEDIUM_SEVERITY_CLUSTER => "S103_MEDIUM_SEVERITY_CLUSTER",
            Self::S104_CHAOS_SPIKE => "S104_CHAOS_SPIKE",
            Self::S105_CHAOS_SATURATION => "S105_CHAOS_SATURATION",
            Self::S106_WEATHER_IMPACT => "S106_WEATHER_IMPACT",
            Self::S107_WEATHER_CONFLICT => "S107_WEATHER_CONFLICT",
            Self::S108_WEATHER_DISCOMFORT => "S108_WEATHER_DISCOMFORT",
            Self::S109_SENTIMENT_DROP => "S109_SENTIMENT_DROP",
            Self::S110_SENTIMENT_FLOOR => "S110_SENTIMENT_FLOOR",
            Self::S111_ECONOMIC_DROP => "S111_ECONOMIC_DROP",
            Self::S112_ECONOMIC_FLOOR => "S112_ECONOMIC_FLOOR",
            Self::S113_MIGRATION_SURGE => "S113_MIGRATION_SURGE",
            Self::S114_EMPLOYMENT_CRISIS => "S114_EMPLOYMENT_CRISIS",
            Self::S115_CIVIC_STRAIN => "S115_CIVIC_STRAIN",
            Self::S116_CIVIC_OVERLOAD => "S116_CIVIC_OVERLOAD",
            Self::S117_STREAK_BROKEN => "S117_STREAK_BROKEN",
            Self::S118_STRAIN_TREND => "S118_STRAIN_TREND",
            Self::S119_ARC_PEAK_CLUSTER => "S119_ARC_PEAK_CLUSTER",
            Self::S120_ARC_TENSION_CLUSTER => "S120_ARC_TENSION_CLUSTER",
            Self::S121_MEDIA_SATURATION => "S121_MEDIA_SATURATION",
            Self::S122_COVERAGE_SATURATED => "S122_COVERAGE_SATURATED",
            Self::S201_HOLIDAY_DEAD_ZONE => "S201_HOLIDAY_DEAD_ZONE",
            Self::S202_PEAK_SEASON_GLOOM => "S202_PEAK_SEASON_GLOOM",
            Self::S203_FIREWORKS_SAFETY => "S203_FIREWORKS_SAFETY",
            Self::S204_CULTURAL_DISENGAGEMENT => "S204_CULTURAL_DISENGAGEMENT",
            Self::S205_DISENGAGED_GLOOM => "S205_DISENGAGED_GLOOM",
            Self::S206_TRAVEL_INFRASTRUCTURE => "S206_TRAVEL_INFRASTRUCTURE",
            Self::S901_NOTE_CHRONIC => "S901_NOTE_CHRONIC",
            Self::S902_NOTE_FADING => "S902_NOTE_FADING",
            Self::S903_NOTE_RESOLVED => "S903_NOTE_RESOLVED",
        }
    }

    /// Short human tag, as alert consumers print it
    pub fn label(&self) -> &'static str {
        match self {
            Self::S101_EVENT_SPIKE => "event spike",
            Self::S102_SEVERITY_SPIKE => "severity spike",
            Self::S103_MEDIUM_SEVERITY_CLUSTER => "medium severity cluster",
            Self::S104_CHAOS_SPIKE => "chaos spike",
            Self::S105_CHAOS_SATURATION => "chaos saturation",
            Self::S106_WEATHER_IMPACT => "weather volatility",
            Self::S107_WEATHER_CONFLICT => "weather mood conflict",
            Self::S108_WEATHER_DISCOMFORT => "weather discomfort",
            Self::S109_SENTIMENT_DROP => "sentiment collapse",
            Self::S110_SENTIMENT_FLOOR => "sentiment floor",
            Self::S111_ECONOMIC_DROP => "economic crash",
            Self::S112_ECONOMIC_FLOOR => "economic floor",
            Self::S113_MIGRATION_SURGE => "migration surge",
            Self::S114_EMPLOYMENT_CRISIS => "employment crisis",
            Self::S115_CIVIC_STRAIN => "civic strain",
            Self::S116_CIVIC_OVERLOAD => "civic overload",
            Self::S117_STREAK_BROKEN => "pattern break",
            Self::S118_STRAIN_TREND => "strain trend",
            Self::S119_ARC_PEAK_CLUSTER => "arc cluster",
            Self::S120_ARC_TENSION_CLUSTER => "arc tension cluster",
            Self::S121_MEDIA_SATURATION => "media saturation",
            Self::S122_COVERAGE_SATURATED => "coverage saturated",
            Self::S201_HOLIDAY_DEAD_ZONE => "holiday dead zone",
            Self::S202_PEAK_SEASON_GLOOM => "peak season gloom",
            Self::S203_FIREWORKS_SAFETY => "fireworks safety",
            Self::S204_CULTURAL_DISENGAGEMENT => "cultural disengagement",
            Self::S205_DISENGAGED_GLOOM => "disengaged gloom",
            Self::S206_TRAVEL_INFRASTRUCTURE => "travel infrastructure",
            Self::S901_NOTE_CHRONIC => "chronic",
            Self::S902_NOTE_FADING => "fading",
            Self::S903_NOTE_RESOLVED => "resolved",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::S101_EVENT_SPIKE => "Event count rose faster than the spike threshold",
            Self::S102_SEVERITY_SPIKE => "Multiple high or critical events",
            Self::S103_MEDIUM_SEVERITY_CLUSTER => "Cluster of medium-severity events",
            Self::S104_CHAOS_SPIKE => "World events rose faster than the chaos threshold",
            Self::S105_CHAOS_SATURATION => "World events at saturation",
            Self::S106_WEATHER_IMPACT => "Weather impact factor is extreme",
            Self::S107_WEATHER_CONFLICT => "Weather is driving conflict",
            Self::S108_WEATHER_DISCOMFORT => "Weather comfort is very low",
            Self::S109_SENTIMENT_DROP => "Sentiment fell sharply since last cycle",
            Self::S110_SENTIMENT_FLOOR => "Sentiment is deeply negative",
            Self::S111_ECONOMIC_DROP => "Economic mood fell sharply since last cycle",
            Self::S112_ECONOMIC_FLOOR => "Economic mood is very low",
            Self::S113_MIGRATION_SURGE => "Migration beyond threshold",
            Self::S114_EMPLOYMENT_CRISIS => "Employment rate below floor",
            Self::S115_CIVIC_STRAIN => "Civic load is under strain",
            Self::S116_CIVIC_OVERLOAD => "Civic load score is very high",
            Self::S117_STREAK_BROKEN => "A stability streak ended in a busy cycle",
            Self::S118_STRAIN_TREND => "Pattern detector reports a strain trend",
            Self::S119_ARC_PEAK_CLUSTER => "Several narrative arcs peaking together",
            Self::S120_ARC_TENSION_CLUSTER => "Several narrative arcs at high tension",
            Self::S121_MEDIA_SATURATION => "Media crisis saturation is high",
            Self::S122_COVERAGE_SATURATED => "Media coverage is saturated",
            Self::S201_HOLIDAY_DEAD_ZONE => "Major holiday with near-zero activity",
            Self::S202_PEAK_SEASON_GLOOM => "Peak season with deeply negative sentiment",
            Self::S203_FIREWORKS_SAFETY => "Safety incidents on a fireworks holiday",
            Self::S204_CULTURAL_DISENGAGEMENT => "Cultural holiday with low community engagement",
            Self::S205_DISENGAGED_GLOOM => "Low community engagement with negative sentiment",
            Self::S206_TRAVEL_INFRASTRUCTURE => "Infrastructure incidents on a travel holiday",
            Self::S901_NOTE_CHRONIC => "Long-running episode with few active detections",
            Self::S902_NOTE_FADING => "Episode winding down",
            Self::S903_NOTE_RESOLVED => "Episode ended this cycle",
        }
    }

    /// Appended by the hysteresis state machine rather than a detector
    pub fn is_hysteresis_note(&self) -> bool {
        matches!(
            self,
            Self::S901_NOTE_CHRONIC | Self::S902_NOTE_FADING | Self::S903_NOTE_RESOLVED
        )
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}

/// One entry in an alert's reason list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
    pub code: ReasonCode,
    /// Measured values behind the detection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Reason {
    pub fn new(code: ReasonCode) -> Self {
        Self { code, detail: None }
    }

    pub fn with_detail(code: ReasonCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: Some(detail.into()),
        }
    }

    pub fn label(&self) -> &'static str {
        self.code.label()
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{} ({})", self.code.label(), detail),
            None => write!(f, "{}", self.code.label()),
        }
    }
}
