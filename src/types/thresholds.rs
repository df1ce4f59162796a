//! Calendar modifiers and the effective thresholds derived from them

use serde::{Deserialize, Serialize};

/// Additive threshold modifiers resolved from calendar facts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CalendarModifiers {
    pub event_threshold_mod: i64,
    pub chaos_threshold_mod: i64,
    pub migration_threshold_mod: i64,
    pub resolved_seasonal_phase: String,
}

/// Effective trigger levels for one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdSet {
    #[serde(rename = "eventSpikeThreshold")]
    pub event_spike: i64,
    #[serde(rename = "chaosSpikeThreshold")]
    pub chaos_spike: i64,
    #[serde(rename = "chaosSaturationThreshold")]
    pub chaos_saturation: i64,
    #[serde(rename = "migrationThreshold")]
    pub migration: i64,
}
