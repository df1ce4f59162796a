//! Detector Bank: a static table of independent rules
//!
//! Every row is evaluated every cycle, in table order. A row contributes at
//! most one reason; no row suppresses another. Adding a detection is adding
//! a row.

use serde::{Deserialize, Serialize};

use crate::core::calendar::{HolidayClasses, PHASE_PEAK};
use crate::types::{
    ArcPhase, CivicLoad, CoverageIntensity, HolidayPriority, PatternFlag, Reason, ReasonCode,
    Severity, SignalSnapshot, ThresholdSet,
};
use crate::{
    ARC_TENSION_HIGH, CIVIC_SCORE_MAX, DEAD_ZONE_MAX_EVENTS, DISENGAGED_SENTIMENT, ECONOMY_DROP,
    ECONOMY_FLOOR, EMPLOYMENT_FLOOR, ENGAGEMENT_LOW, FIREWORKS_SAFETY_MIN, MEDIA_SATURATION_MAX,
    MEDIUM_EVENT_MIN, PEAK_ARC_MIN, PEAK_GLOOM_SENTIMENT, SENTIMENT_DROP, SENTIMENT_FLOOR,
    SEVERE_EVENT_MIN, STREAK_BREAK_EVENTS, TENSE_ARC_MIN, TRAVEL_INFRASTRUCTURE_MIN,
    WEATHER_COMFORT_MIN, WEATHER_CONFLICT_MAX, WEATHER_IMPACT_MAX,
};

/// Everything a rule may look at
#[derive(Debug, Clone)]
pub struct DetectionInput<'a> {
    pub snapshot: &'a SignalSnapshot,
    pub prior_event_count: u64,
    pub prior_chaos_count: u64,
    pub prior_sentiment: f64,
    pub prior_economic_mood: f64,
    pub prior_pattern_flag: PatternFlag,
    pub thresholds: ThresholdSet,
    pub holidays: HolidayClasses,
    pub seasonal_phase: &'a str,
}

/// Aggregate verdict of the bank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionOutcome {
    pub triggered: bool,
    /// Table order, never deduplicated
    pub reasons: Vec<Reason>,
}

impl DetectionOutcome {
    pub fn from_reasons(reasons: Vec<Reason>) -> Self {
        Self {
            triggered: !reasons.is_empty(),
            reasons,
        }
    }
}

/// A rule returns the measured detail when it fires
pub type Check = fn(&DetectionInput) -> Option<String>;

/// One row of the rule table
#[derive(Debug, Clone, Copy)]
pub struct Detector {
    pub code: ReasonCode,
    pub check: Check,
}

/// The rule table
pub static DETECTORS: &[Detector] = &[
    Detector { code: ReasonCode::S101_EVENT_SPIKE, check: event_spike },
    Detector { code: ReasonCode::S102_SEVERITY_SPIKE, check: severity_spike },
    Detector { code: ReasonCode::S103_MEDIUM_SEVERITY_CLUSTER, check: medium_cluster },
    Detector { code: ReasonCode::S104_CHAOS_SPIKE, check: chaos_spike },
    Detector { code: ReasonCode::S105_CHAOS_SATURATION, check: chaos_saturation },
    Detector { code: ReasonCode::S106_WEATHER_IMPACT, check: weather_impact },
    Detector { code: ReasonCode::S107_WEATHER_CONFLICT, check: weather_conflict },
    Detector { code: ReasonCode::S108_WEATHER_DISCOMFORT, check: weather_discomfort },
    Detector { code: ReasonCode::S109_SENTIMENT_DROP, check: sentiment_drop },
    Detector { code: ReasonCode::S110_SENTIMENT_FLOOR, check: sentiment_floor },
    Detector { code: ReasonCode::S111_ECONOMIC_DROP, check: economic_drop },
    Detector { code: ReasonCode::S112_ECONOMIC_FLOOR, check: economic_floor },
    Detector { code: ReasonCode::S113_MIGRATION_SURGE, check: migration_surge },
    Detector { code: ReasonCode::S114_EMPLOYMENT_CRISIS, check: employment_crisis },
    Detector { code: ReasonCode::S115_CIVIC_STRAIN, check: civic_strain },
    Detector { code: ReasonCode::S116_CIVIC_OVERLOAD, check: civic_overload },
    Detector { code: ReasonCode::S117_STREAK_BROKEN, check: streak_broken },
    Detector { code: ReasonCode::S118_STRAIN_TREND, check: strain_trend },
    Detector { code: ReasonCode::S119_ARC_PEAK_CLUSTER, check: arc_peak_cluster },
    Detector { code: ReasonCode::S120_ARC_TENSION_CLUSTER, check: arc_tension_cluster },
    Detector { code: ReasonCode::S121_MEDIA_SATURATION, check: media_saturation },
    Detector { code: ReasonCode::S122_COVERAGE_SATURATED, check: coverage_saturated },
    Detector { code: ReasonCode::S201_HOLIDAY_DEAD_ZONE, check: holiday_dead_zone },
    Detector { code: ReasonCode::S202_PEAK_SEASON_GLOOM, check: peak_season_gloom },
    Detector { code: ReasonCode::S203_FIREWORKS_SAFETY, check: fireworks_safety },
    Detector { code: ReasonCode::S204_CULTURAL_DISENGAGEMENT, check: cultural_disengagement },
    Detector { code: ReasonCode::S205_DISENGAGED_GLOOM, check: disengaged_gloom },
    Detector { code: ReasonCode::S206_TRAVEL_INFRASTRUCTURE, check: travel_infrastructure },
];

/// Runs the rule table
#[derive(Debug, Clone, Copy)]
pub struct DetectorBank {
    rules: &'static [Detector],
}

impl Default for DetectorBank {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorBank {
    /// Bank over the standard table
    pub fn new() -> Self {
        Self { rules: DETECTORS }
    }

    pub fn rules(&self) -> &'static [Detector] {
        self.rules
    }

    /// Evaluate every rule, unconditionally
    pub fn evaluate(&self, input: &DetectionInput) -> DetectionOutcome {
        let mut reasons = Vec::new();
        for rule in self.rules {
            if let Some(detail) = (rule.check)(input) {
                tracing::debug!(code = rule.code.code(), %detail, "detector fired");
                reasons.push(Reason::with_detail(rule.code, detail));
            }
        }
        DetectionOutcome::from_reasons(reasons)
    }
}

// =============================================================================
// Activity
// =============================================================================

fn event_spike(input: &DetectionInput) -> Option<String> {
    let delta = input.snapshot.event_count as i128 - input.prior_event_count as i128;
    (delta >= input.thresholds.event_spike as i128)
        .then(|| format!("delta={} threshold={}", delta, input.thresholds.event_spike))
}

fn severity_spike(input: &DetectionInput) -> Option<String> {
    let severe = input
        .snapshot
        .world_events
        .iter()
        .filter(|e| e.severity.is_severe())
        .count();
    (severe >= SEVERE_EVENT_MIN).then(|| format!("high_or_critical={}", severe))
}

fn medium_cluster(input: &DetectionInput) -> Option<String> {
    let medium = input
        .snapshot
        .world_events
        .iter()
        .filter(|e| e.severity == Severity::Medium)
        .count();
    (medium >= MEDIUM_EVENT_MIN).then(|| format!("medium={}", medium))
}

fn chaos_spike(input: &DetectionInput) -> Option<String> {
    let delta = input.snapshot.chaos_count() as i128 - input.prior_chaos_count as i128;
    (delta >= input.thresholds.chaos_spike as i128)
        .then(|| format!("delta={} threshold={}", delta, input.thresholds.chaos_spike))
}

fn chaos_saturation(input: &DetectionInput) -> Option<String> {
    let count = input.snapshot.chaos_count() as i128;
    (count >= input.thresholds.chaos_saturation as i128)
        .then(|| format!("world_events={} threshold={}", count, input.thresholds.chaos_saturation))
}

// =============================================================================
// Environment
// =============================================================================

fn weather_impact(input: &DetectionInput) -> Option<String> {
    let impact = input.snapshot.weather.impact_factor;
    (impact >= WEATHER_IMPACT_MAX).then(|| format!("impact_factor={:.2}", impact))
}

fn weather_conflict(input: &DetectionInput) -> Option<String> {
    let conflict = input.snapshot.weather.mood_conflict?;
    (conflict >= WEATHER_CONFLICT_MAX).then(|| format!("mood_conflict={:.2}", conflict))
}

fn weather_discomfort(input: &DetectionInput) -> Option<String> {
    let comfort = input.snapshot.weather.mood_comfort?;
    (comfort < WEATHER_COMFORT_MIN).then(|| format!("mood_comfort={:.2}", comfort))
}

fn sentiment_drop(input: &DetectionInput) -> Option<String> {
    let drop = input.prior_sentiment - input.snapshot.sentiment;
    (drop >= SENTIMENT_DROP).then(|| format!("drop={:.2}", drop))
}

fn sentiment_floor(input: &DetectionInput) -> Option<String> {
    let sentiment = input.snapshot.sentiment;
    (sentiment <= SENTIMENT_FLOOR).then(|| format!("sentiment={:.2}", sentiment))
}

fn economic_drop(input: &DetectionInput) -> Option<String> {
    let drop = input.prior_economic_mood - input.snapshot.economic_mood;
    (drop >= ECONOMY_DROP).then(|| format!("drop={:.1}", drop))
}

fn economic_floor(input: &DetectionInput) -> Option<String> {
    let mood = input.snapshot.economic_mood;
    (mood <= ECONOMY_FLOOR).then(|| format!("economic_mood={:.1}", mood))
}

fn migration_surge(input: &DetectionInput) -> Option<String> {
    let migration = input.snapshot.demographic_drift.migration;
    (migration.unsigned_abs() as i128 >= input.thresholds.migration as i128)
        .then(|| format!("migration={} threshold={}", migration, input.thresholds.migration))
}

fn employment_crisis(input: &DetectionInput) -> Option<String> {
    let rate = input.snapshot.demographic_drift.employment_rate;
    (rate < EMPLOYMENT_FLOOR).then(|| format!("employment_rate={:.3}", rate))
}

fn civic_strain(input: &DetectionInput) -> Option<String> {
    (input.snapshot.civic_load == CivicLoad::LoadStrain).then(|| "civic_load=load-strain".to_string())
}

fn civic_overload(input: &DetectionInput) -> Option<String> {
    let score = input.snapshot.civic_load_score;
    (score >= CIVIC_SCORE_MAX).then(|| format!("civic_load_score={:.1}", score))
}

// =============================================================================
// Narrative
// =============================================================================

fn streak_broken(input: &DetectionInput) -> Option<String> {
    (input.prior_pattern_flag == PatternFlag::StabilityStreak
        && input.snapshot.event_count >= STREAK_BREAK_EVENTS)
        .then(|| format!("event_count={} after stability streak", input.snapshot.event_count))
}

fn strain_trend(input: &DetectionInput) -> Option<String> {
    (input.snapshot.pattern_flag == PatternFlag::StrainTrend).then(|| "pattern=strain-trend".to_string())
}

fn arc_peak_cluster(input: &DetectionInput) -> Option<String> {
    let peaking = input
        .snapshot
        .arcs
        .iter()
        .filter(|a| a.phase == ArcPhase::Peak)
        .count();
    (peaking >= PEAK_ARC_MIN).then(|| format!("peak_arcs={}", peaking))
}

fn arc_tension_cluster(input: &DetectionInput) -> Option<String> {
    let tense = input
        .snapshot
        .arcs
        .iter()
        .filter(|a| a.tension >= ARC_TENSION_HIGH)
        .count();
    (tense >= TENSE_ARC_MIN).then(|| format!("tense_arcs={}", tense))
}

fn media_saturation(input: &DetectionInput) -> Option<String> {
    let saturation = input.snapshot.media_effects.crisis_saturation?;
    (saturation >= MEDIA_SATURATION_MAX).then(|| format!("crisis_saturation={:.2}", saturation))
}

fn coverage_saturated(input: &DetectionInput) -> Option<String> {
    (input.snapshot.media_effects.coverage_intensity == Some(CoverageIntensity::Saturated))
        .then(|| "coverage_intensity=saturated".to_string())
}

// =============================================================================
// Calendar composites
// =============================================================================

fn holiday_dead_zone(input: &DetectionInput) -> Option<String> {
    let calendar = &input.snapshot.calendar;
    (calendar.holiday_priority == HolidayPriority::Major
        && input.snapshot.event_count <= DEAD_ZONE_MAX_EVENTS)
        .then(|| {
            format!(
                "holiday={} event_count={}",
                calendar.holiday_name.as_deref().unwrap_or("unnamed"),
                input.snapshot.event_count
            )
        })
}

fn peak_season_gloom(input: &DetectionInput) -> Option<String> {
    let peak = input.snapshot.calendar.seasonal_override_active
        && input.seasonal_phase.trim().eq_ignore_ascii_case(PHASE_PEAK);
    (peak && input.snapshot.sentiment <= PEAK_GLOOM_SENTIMENT)
        .then(|| format!("sentiment={:.2} during peak override", input.snapshot.sentiment))
}

fn fireworks_safety(input: &DetectionInput) -> Option<String> {
    if !input.holidays.fireworks {
        return None;
    }
    let safety = input.snapshot.events_in_domain("safety");
    (safety >= FIREWORKS_SAFETY_MIN).then(|| format!("safety_events={}", safety))
}

fn cultural_disengagement(input: &DetectionInput) -> Option<String> {
    if !input.holidays.cultural {
        return None;
    }
    let engagement = input.snapshot.community_engagement?;
    (engagement < ENGAGEMENT_LOW).then(|| format!("community_engagement={:.2}", engagement))
}

fn disengaged_gloom(input: &DetectionInput) -> Option<String> {
    let engagement = input.snapshot.community_engagement?;
    let sentiment = input.snapshot.sentiment;
    (engagement < ENGAGEMENT_LOW && sentiment < DISENGAGED_SENTIMENT).then(|| {
        format!("community_engagement={:.2} sentiment={:.2}", engagement, sentiment)
    })
}

fn travel_infrastructure(input: &DetectionInput) -> Option<String> {
    if !input.holidays.travel {
        return None;
    }
    let infrastructure = input.snapshot.events_in_domain("infrastructure");
    (infrastructure >= TRAVEL_INFRASTRUCTURE_MIN)
        .then(|| format!("infrastructure_events={}", infrastructure))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CalendarFacts, NarrativeArc, WorldEvent};

    fn input_for(snapshot: &SignalSnapshot) -> DetectionInput<'_> {
        DetectionInput {
            snapshot,
            prior_event_count: snapshot.event_count,
            prior_chaos_count: snapshot.chaos_count(),
            prior_sentiment: snapshot.sentiment,
            prior_economic_mood: snapshot.economic_mood,
            prior_pattern_flag: PatternFlag::None,
            thresholds: ThresholdSet::base(),
            holidays: HolidayClasses::of(snapshot.calendar.holiday_name.as_deref()),
            seasonal_phase: "off",
        }
    }

    fn codes(outcome: &DetectionOutcome) -> Vec<ReasonCode> {
        outcome.reasons.iter().map(|r| r.code).collect()
    }

    #[test]
    fn test_quiet_snapshot_triggers_nothing() {
        let snap = SignalSnapshot::default();
        let outcome = DetectorBank::new().evaluate(&input_for(&snap));
        assert!(!outcome.triggered);
        assert!(outcome.reasons.is_empty());
    }

    #[test]
    fn test_event_spike_boundary() {
        let snap = SignalSnapshot { event_count: 20, ..Default::default() };
        let mut input = input_for(&snap);

        input.prior_event_count = 10;
        assert!(codes(&DetectorBank::new().evaluate(&input)).contains(&ReasonCode::S101_EVENT_SPIKE));

        input.prior_event_count = 11;
        assert!(!codes(&DetectorBank::new().evaluate(&input)).contains(&ReasonCode::S101_EVENT_SPIKE));
    }

    #[test]
    fn test_severity_tags_are_independent() {
        let mut events = vec![
            WorldEvent::new(Severity::High, "civic"),
            WorldEvent::new(Severity::Critical, "safety"),
        ];
        events.extend((0..4).map(|_| WorldEvent::new(Severity::Medium, "culture")));
        let snap = SignalSnapshot { world_events: events, ..Default::default() };
        let outcome = DetectorBank::new().evaluate(&input_for(&snap));
        let got = codes(&outcome);
        assert!(got.contains(&ReasonCode::S102_SEVERITY_SPIKE));
        assert!(got.contains(&ReasonCode::S103_MEDIUM_SEVERITY_CLUSTER));
    }

    #[test]
    fn test_chaos_spike_and_saturation() {
        let events: Vec<_> = (0..8).map(|_| WorldEvent::new(Severity::Low, "misc")).collect();
        let snap = SignalSnapshot { world_events: events, ..Default::default() };
        let mut input = input_for(&snap);
        input.prior_chaos_count = 4;
        let got = codes(&DetectorBank::new().evaluate(&input));
        assert!(got.contains(&ReasonCode::S104_CHAOS_SPIKE));
        assert!(got.contains(&ReasonCode::S105_CHAOS_SATURATION));
    }

    #[test]
    fn test_weather_moods_only_when_present() {
        let mut snap = SignalSnapshot::default();
        assert!(DetectorBank::new().evaluate(&input_for(&snap)).reasons.is_empty());

        snap.weather.impact_factor = 1.5;
        snap.weather.mood_conflict = Some(0.5);
        snap.weather.mood_comfort = Some(0.19);
        let got = codes(&DetectorBank::new().evaluate(&input_for(&snap)));
        assert_eq!(
            got,
            vec![
                ReasonCode::S106_WEATHER_IMPACT,
                ReasonCode::S107_WEATHER_CONFLICT,
                ReasonCode::S108_WEATHER_DISCOMFORT,
            ]
        );
    }

    #[test]
    fn test_sentiment_and_economy() {
        let snap = SignalSnapshot { sentiment: -0.5, economic_mood: 25.0, ..Default::default() };
        let mut input = input_for(&snap);
        input.prior_sentiment = 0.0;
        input.prior_economic_mood = 45.0;
        let got = codes(&DetectorBank::new().evaluate(&input));
        assert_eq!(
            got,
            vec![
                ReasonCode::S109_SENTIMENT_DROP,
                ReasonCode::S110_SENTIMENT_FLOOR,
                ReasonCode::S111_ECONOMIC_DROP,
                ReasonCode::S112_ECONOMIC_FLOOR,
            ]
        );
    }

    #[test]
    fn test_migration_is_absolute() {
        let mut snap = SignalSnapshot::default();
        snap.demographic_drift.migration = -150;
        let got = codes(&DetectorBank::new().evaluate(&input_for(&snap)));
        assert_eq!(got, vec![ReasonCode::S113_MIGRATION_SURGE]);

        snap.demographic_drift.migration = 149;
        assert!(DetectorBank::new().evaluate(&input_for(&snap)).reasons.is_empty());
    }

    #[test]
    fn test_employment_and_civic() {
        let mut snap = SignalSnapshot {
            civic_load: CivicLoad::LoadStrain,
            civic_load_score: 15.0,
            ..Default::default()
        };
        snap.demographic_drift.employment_rate = 0.84;
        let got = codes(&DetectorBank::new().evaluate(&input_for(&snap)));
        assert_eq!(
            got,
            vec![
                ReasonCode::S114_EMPLOYMENT_CRISIS,
                ReasonCode::S115_CIVIC_STRAIN,
                ReasonCode::S116_CIVIC_OVERLOAD,
            ]
        );
    }

    #[test]
    fn test_pattern_break_needs_prior_streak() {
        let snap = SignalSnapshot { event_count: 10, ..Default::default() };
        let mut input = input_for(&snap);
        assert!(DetectorBank::new().evaluate(&input).reasons.is_empty());

        input.prior_pattern_flag = PatternFlag::StabilityStreak;
        let got = codes(&DetectorBank::new().evaluate(&input));
        assert_eq!(got, vec![ReasonCode::S117_STREAK_BROKEN]);
    }

    #[test]
    fn test_arc_clusters() {
        let snap = SignalSnapshot {
            arcs: vec![
                NarrativeArc::new(ArcPhase::Peak, 8.0),
                NarrativeArc::new(ArcPhase::Peak, 9.5),
                NarrativeArc::new(ArcPhase::Rising, 3.0),
            ],
            ..Default::default()
        };
        let got = codes(&DetectorBank::new().evaluate(&input_for(&snap)));
        assert_eq!(got, vec![ReasonCode::S119_ARC_PEAK_CLUSTER, ReasonCode::S120_ARC_TENSION_CLUSTER]);
    }

    #[test]
    fn test_dead_zone_on_major_holiday() {
        let snap = SignalSnapshot {
            event_count: 1,
            calendar: CalendarFacts {
                holiday_name: Some("Christmas".to_string()),
                holiday_priority: HolidayPriority::Major,
                ..Default::default()
            },
            ..Default::default()
        };
        let got = codes(&DetectorBank::new().evaluate(&input_for(&snap)));
        assert_eq!(got, vec![ReasonCode::S201_HOLIDAY_DEAD_ZONE]);
    }

    #[test]
    fn test_fireworks_safety_requires_fireworks_holiday() {
        let events: Vec<_> = (0..3).map(|_| WorldEvent::new(Severity::Low, "Safety")).collect();
        let mut snap = SignalSnapshot { world_events: events, ..Default::default() };
        assert!(DetectorBank::new().evaluate(&input_for(&snap)).reasons.is_empty());

        snap.calendar.holiday_name = Some("New Year's Eve".to_string());
        let got = codes(&DetectorBank::new().evaluate(&input_for(&snap)));
        assert_eq!(got, vec![ReasonCode::S203_FIREWORKS_SAFETY]);
    }

    #[test]
    fn test_engagement_composites() {
        let snap = SignalSnapshot {
            sentiment: -0.25,
            community_engagement: Some(0.1),
            calendar: CalendarFacts {
                holiday_name: Some("Juneteenth".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let got = codes(&DetectorBank::new().evaluate(&input_for(&snap)));
        assert_eq!(
            got,
            vec![ReasonCode::S204_CULTURAL_DISENGAGEMENT, ReasonCode::S205_DISENGAGED_GLOOM]
        );
    }

    #[test]
    fn test_peak_gloom_needs_override() {
        let mut snap = SignalSnapshot { sentiment: -0.4, ..Default::default() };
        snap.calendar.seasonal_activity_phase = Some("peak".to_string());
        let mut input = input_for(&snap);
        input.seasonal_phase = "peak";
        assert!(!codes(&DetectorBank::new().evaluate(&input)).contains(&ReasonCode::S202_PEAK_SEASON_GLOOM));

        snap.calendar.seasonal_override_active = true;
        let mut input = input_for(&snap);
        input.seasonal_phase = "peak";
        assert!(codes(&DetectorBank::new().evaluate(&input)).contains(&ReasonCode::S202_PEAK_SEASON_GLOOM));
    }

    #[test]
    fn test_media_saturation_boundary() {
        let mut snap = SignalSnapshot::default();
        snap.media_effects.crisis_saturation = Some(0.79);
        assert!(DetectorBank::new().evaluate(&input_for(&snap)).reasons.is_empty());

        snap.media_effects.crisis_saturation = Some(0.8);
        let got = codes(&DetectorBank::new().evaluate(&input_for(&snap)));
        assert_eq!(got, vec![ReasonCode::S121_MEDIA_SATURATION]);
    }

    #[test]
    fn test_travel_infrastructure_on_travel_holiday() {
        let mut snap = SignalSnapshot {
            world_events: vec![WorldEvent::new(Severity::Low, "infrastructure")],
            calendar: CalendarFacts {
                holiday_name: Some("Thanksgiving".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(DetectorBank::new().evaluate(&input_for(&snap)).reasons.is_empty());

        snap.world_events.push(WorldEvent::new(Severity::Low, "Infrastructure"));
        let got = codes(&DetectorBank::new().evaluate(&input_for(&snap)));
        assert_eq!(got, vec![ReasonCode::S206_TRAVEL_INFRASTRUCTURE]);

        // Same events off a travel holiday
        snap.calendar.holiday_name = Some("Halloween".to_string());
        assert!(DetectorBank::new().evaluate(&input_for(&snap)).reasons.is_empty());
    }

    #[test]
    fn test_counts_beyond_i64_range() {
        let snap = SignalSnapshot { event_count: 1 << 63, ..Default::default() };
        let mut input = input_for(&snap);

        input.prior_event_count = 1;
        assert!(codes(&DetectorBank::new().evaluate(&input)).contains(&ReasonCode::S101_EVENT_SPIKE));

        input.prior_event_count = u64::MAX;
        assert!(!codes(&DetectorBank::new().evaluate(&input)).contains(&ReasonCode::S101_EVENT_SPIKE));
    }

    #[test]
    fn test_rule_table_codes() {
        let rules = DetectorBank::new().rules();
        assert_eq!(rules.len(), 28);
        for (i, rule) in rules.iter().enumerate() {
            assert!(!rule.code.is_hysteresis_note(), "{} is a note", rule.code.code());
            assert!(
                rules[i + 1..].iter().all(|other| other.code != rule.code),
                "{} appears twice",
                rule.code.code()
            );
        }
    }
}
