//! Calendar Context Resolver: calendar facts → threshold modifiers
//!
//! All modifiers are additive and order-independent:
//! - high-activity holiday: +3 event / +2 chaos
//! - travel holiday: +50 migration
//! - crowd holiday: +2 chaos
//! - recurring community night: +2 event / +1 chaos
//! - seasonal override "peak": +4 / +3 / +60, "secondary-peak": +2 / +2 / +40
//! - derived (non-override) "active" phase: +1 / +1 only
//! - quiet anniversary day: -2 event / -1 chaos

use std::collections::HashSet;

use chrono::Datelike;
use lazy_static::lazy_static;

use crate::types::{CalendarFacts, CalendarModifiers};

pub const PHASE_EARLY: &str = "early";
pub const PHASE_ACTIVE: &str = "active";
pub const PHASE_OFF: &str = "off";
pub const PHASE_PEAK: &str = "peak";
pub const PHASE_SECONDARY_PEAK: &str = "secondary-peak";
/// Override active but no label supplied
pub const PHASE_UNSPECIFIED: &str = "unspecified";

lazy_static! {
    // Names are stored normalized: lowercase, no punctuation, single spaces
    static ref HIGH_ACTIVITY_HOLIDAYS: HashSet<&'static str> = [
        "new years eve", "independence day", "fourth of july", "4th of july",
        "halloween", "st patricks day", "mardi gras", "cinco de mayo",
        "super bowl sunday",
    ].into_iter().collect();

    static ref TRAVEL_HOLIDAYS: HashSet<&'static str> = [
        "thanksgiving", "christmas", "christmas eve", "new years day",
        "memorial day", "labor day", "independence day", "fourth of july",
        "4th of july",
    ].into_iter().collect();

    static ref CROWD_HOLIDAYS: HashSet<&'static str> = [
        "new years eve", "independence day", "fourth of july", "4th of july",
        "st patricks day", "mardi gras", "pride", "opening day",
    ].into_iter().collect();

    static ref FIREWORKS_HOLIDAYS: HashSet<&'static str> = [
        "new years eve", "independence day", "fourth of july", "4th of july",
        "diwali", "lunar new year", "guy fawkes night",
    ].into_iter().collect();

    static ref CULTURAL_HOLIDAYS: HashSet<&'static str> = [
        "juneteenth", "diwali", "lunar new year", "cinco de mayo",
        "dia de los muertos", "day of the dead", "hanukkah", "kwanzaa",
        "eid al fitr", "indigenous peoples day",
    ].into_iter().collect();
}

/// Which holiday tables a holiday name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HolidayClasses {
    pub high_activity: bool,
    pub travel: bool,
    pub crowd: bool,
    pub fireworks: bool,
    pub cultural: bool,
}

impl HolidayClasses {
    pub fn of(holiday_name: Option<&str>) -> Self {
        let Some(name) = holiday_name else {
            return Self::default();
        };
        let key = normalize_holiday(name);
        let key = key.as_str();
        Self {
            high_activity: HIGH_ACTIVITY_HOLIDAYS.contains(key),
            travel: TRAVEL_HOLIDAYS.contains(key),
            crowd: CROWD_HOLIDAYS.contains(key),
            fireworks: FIREWORKS_HOLIDAYS.contains(key),
            cultural: CULTURAL_HOLIDAYS.contains(key),
        }
    }
}

/// "St. Patrick's  Day" → "st patricks day"
pub fn normalize_holiday(name: &str) -> String {
    let cleaned: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .map(|c| if c == '-' { ' ' } else { c })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fixed month → phase mapping for derived seasons
pub fn derive_phase(month: u32) -> &'static str {
    match month {
        2 | 3 => PHASE_EARLY,
        4..=9 => PHASE_ACTIVE,
        _ => PHASE_OFF,
    }
}

/// Calendar context resolver
#[derive(Debug, Default, Clone, Copy)]
pub struct CalendarResolver;

impl CalendarResolver {
    /// Create new resolver
    pub fn new() -> Self {
        Self
    }

    /// Resolve the seasonal phase label for this cycle
    ///
    /// An override is used verbatim. Otherwise the month decides; a supplied
    /// phase is only consulted when no month is known.
    pub fn resolve_phase(&self, facts: &CalendarFacts) -> String {
        if facts.seasonal_override_active {
            return facts
                .seasonal_activity_phase
                .clone()
                .unwrap_or_else(|| PHASE_UNSPECIFIED.to_string());
        }

        let month = facts.month.or_else(|| facts.date.map(|d| d.month()));
        match (month, &facts.seasonal_activity_phase) {
            (Some(m), _) => derive_phase(m).to_string(),
            (None, Some(supplied)) => supplied.clone(),
            (None, None) => PHASE_OFF.to_string(),
        }
    }

    /// Compute threshold modifiers from calendar facts
    pub fn resolve(&self, facts: &CalendarFacts) -> CalendarModifiers {
        let classes = HolidayClasses::of(facts.holiday_name.as_deref());
        let phase = self.resolve_phase(facts);

        let mut event = 0i64;
        let mut chaos = 0i64;
        let mut migration = 0i64;

        if classes.high_activity {
            event += 3;
            chaos += 2;
        }
        if classes.travel {
            migration += 50;
        }
        if classes.crowd {
            chaos += 2;
        }
        if facts.is_recurring_community_night {
            event += 2;
            chaos += 1;
        }

        // Only an authored override may move thresholds by crisis-scale amounts
        if facts.seasonal_override_active {
            match phase.trim().to_lowercase().as_str() {
                PHASE_PEAK => {
                    event += 4;
                    chaos += 3;
                    migration += 60;
                }
                PHASE_SECONDARY_PEAK => {
                    event += 2;
                    chaos += 2;
                    migration += 40;
                }
                _ => {}
            }
        } else if phase == PHASE_ACTIVE {
            event += 1;
            chaos += 1;
        }

        if facts.is_quiet_anniversary_day {
            event -= 2;
            chaos -= 1;
        }

        tracing::debug!(
            holiday = ?facts.holiday_name,
            phase = %phase,
            event,
            chaos,
            migration,
            "calendar modifiers resolved"
        );

        CalendarModifiers {
            event_threshold_mod: event,
            chaos_threshold_mod: chaos,
            migration_threshold_mod: migration,
            resolved_seasonal_phase: phase,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
