//! Threshold Engine: base levels + calendar modifiers

use crate::types::{CalendarModifiers, ThresholdSet};
use crate::{BASE_CHAOS_SATURATION, BASE_CHAOS_SPIKE, BASE_EVENT_SPIKE, BASE_MIGRATION};

impl ThresholdSet {
    /// Thresholds with no calendar influence
    pub fn base() -> Self {
        Self {
            event_spike: BASE_EVENT_SPIKE,
            chaos_spike: BASE_CHAOS_SPIKE,
            chaos_saturation: BASE_CHAOS_SATURATION,
            migration: BASE_MIGRATION,
        }
    }

    /// Apply calendar modifiers to the base levels
    pub fn from_modifiers(mods: &CalendarModifiers) -> Self {
        let base = Self::base();
        Self {
            event_spike: base.event_spike + mods.event_threshold_mod,
            chaos_spike: base.chaos_spike + mods.chaos_threshold_mod,
            chaos_saturation: base.chaos_saturation + mods.chaos_threshold_mod,
            migration: base.migration + mods.migration_threshold_mod,
        }
    }
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self::base()
    }
}
