//! Evaluation pipeline and state carry
//!
//! snapshot + prior → calendar → thresholds → detectors → hysteresis → (alert, next)
//!
//! Pure: no I/O, no shared state. The caller persists `next` and passes it
//! back as the prior on the following cycle.

use sha2::{Digest, Sha256};

use crate::core::calendar::{CalendarResolver, HolidayClasses};
use crate::core::detectors::{DetectionInput, DetectorBank};
use crate::core::hysteresis::{HysteresisMachine, PriorAlert};
use crate::types::{
    AlertFlag, AlertRecord, CalendarContext, Evaluation, NextCycleState, PriorCycleState, Reason,
    SignalSnapshot, ThresholdSet,
};

/// The full detector: resolver, rule bank and hysteresis engine
#[derive(Debug, Default, Clone, Copy)]
pub struct ShockDetector {
    resolver: CalendarResolver,
    bank: DetectorBank,
    machine: HysteresisMachine,
}

impl ShockDetector {
    /// Detector over the standard rule table
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate one cycle. `prior = None` is an environment's first cycle.
    pub fn evaluate(&self, snapshot: &SignalSnapshot, prior: Option<&PriorCycleState>) -> Evaluation {
        let default_prior = PriorCycleState::default();
        let prior = prior.unwrap_or(&default_prior);

        let cycle_number = snapshot
            .cycle_number
            .unwrap_or_else(|| prior.cycle_number.unwrap_or(0).saturating_add(1));

        // Calendar → thresholds
        let modifiers = self.resolver.resolve(&snapshot.calendar);
        let thresholds = ThresholdSet::from_modifiers(&modifiers);

        // Detectors; absent prior metrics compare equal to this cycle's
        let input = DetectionInput {
            snapshot,
            prior_event_count: prior.event_count.unwrap_or(snapshot.event_count),
            prior_chaos_count: prior.chaos_count.unwrap_or_else(|| snapshot.chaos_count()),
            prior_sentiment: prior.sentiment.unwrap_or(snapshot.sentiment),
            prior_economic_mood: prior.economic_mood.unwrap_or(snapshot.economic_mood),
            prior_pattern_flag: prior.pattern_flag(),
            thresholds,
            holidays: HolidayClasses::of(snapshot.calendar.holiday_name.as_deref()),
            seasonal_phase: &modifiers.resolved_seasonal_phase,
        };
        let outcome = self.bank.evaluate(&input);
        let detection_count = outcome.reasons.len();

        // Hysteresis
        let transition = self.machine.transition(
            detection_count,
            cycle_number,
            PriorAlert {
                flag: prior.alert_flag(),
                start_cycle: prior.alert_start_cycle(),
            },
        );

        let mut reasons = outcome.reasons;
        reasons.extend(transition.note);

        // Score is read after the note is appended
        let score = reasons.len();

        let calendar = &snapshot.calendar;
        let calendar_context = CalendarContext {
            holiday_name: calendar.holiday_name.clone(),
            holiday_priority: calendar.holiday_priority,
            is_recurring_community_night: calendar.is_recurring_community_night,
            is_quiet_anniversary_day: calendar.is_quiet_anniversary_day,
            seasonal_phase: modifiers.resolved_seasonal_phase.clone(),
            seasonal_override_active: calendar.seasonal_override_active,
            thresholds,
        };

        let fingerprint = fingerprint(transition.flag, transition.start_cycle, &reasons);

        tracing::debug!(
            cycle = cycle_number,
            flag = %transition.flag,
            score,
            detection_count,
            "cycle evaluated"
        );

        let alert = AlertRecord {
            cycle_number,
            flag: transition.flag,
            reasons,
            score,
            detection_count,
            start_cycle: transition.start_cycle,
            duration: transition.duration,
            calendar_context,
            fingerprint,
        };

        let next = NextCycleState {
            cycle_number,
            event_count: snapshot.event_count,
            chaos_count: snapshot.chaos_count(),
            sentiment: snapshot.sentiment,
            economic_mood: snapshot.economic_mood,
            pattern_flag: snapshot.pattern_flag,
            alert_flag: transition.flag,
            alert_start_cycle: transition.start_cycle,
        };

        Evaluation { alert, next }
    }
}

/// Evaluate one cycle with the standard detector
pub fn evaluate(snapshot: &SignalSnapshot, prior: Option<&PriorCycleState>) -> Evaluation {
    ShockDetector::new().evaluate(snapshot, prior)
}

/// Hex SHA-256 over flag, start cycle and reason codes (details excluded)
pub fn fingerprint(flag: AlertFlag, start_cycle: u64, reasons: &[Reason]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(flag.as_str().as_bytes());
    hasher.update(start_cycle.to_be_bytes());
    for reason in reasons {
        hasher.update(b"|");
        hasher.update(reason.code.code().as_bytes());
    }
    hasher.finalize().iter().map(|b| format!("{:02x}", b)).collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PatternFlag, ReasonCode, WorldEvent, Severity};

    #[test]
    fn test_first_cycle_defaults() {
        let eval = evaluate(&SignalSnapshot::default(), None);
        assert_eq!(eval.alert.cycle_number, 1);
        assert_eq!(eval.alert.flag, AlertFlag::None);
        assert_eq!(eval.alert.score, 0);
        assert_eq!(eval.next.alert_flag, AlertFlag::None);
        assert_eq!(eval.next.alert_start_cycle, 0);
    }

    #[test]
    fn test_cycle_number_follows_prior() {
        let prior = PriorCycleState {
            cycle_number: Some(41),
            ..Default::default()
        };
        let eval = evaluate(&SignalSnapshot::default(), Some(&prior));
        assert_eq!(eval.alert.cycle_number, 42);
    }

    #[test]
    fn test_cycle_number_saturates() {
        let prior = PriorCycleState {
            cycle_number: Some(u64::MAX),
            ..Default::default()
        };
        let eval = evaluate(&SignalSnapshot::default(), Some(&prior));
        assert_eq!(eval.alert.cycle_number, u64::MAX);
    }

    #[test]
    fn test_absent_prior_metrics_do_not_spike() {
        // 40 events on a first cycle is not a spike: there is nothing to compare against
        let snap = SignalSnapshot {
            event_count: 40,
            sentiment: -0.3,
            economic_mood: 30.0,
            ..Default::default()
        };
        let eval = evaluate(&snap, None);
        assert_eq!(eval.alert.flag, AlertFlag::None);
    }

    #[test]
    fn test_next_state_projection() {
        let snap = SignalSnapshot {
            cycle_number: Some(9),
            event_count: 3,
            world_events: vec![WorldEvent::new(Severity::Low, "misc"); 2],
            sentiment: 0.2,
            economic_mood: 61.0,
            pattern_flag: PatternFlag::StabilityStreak,
            ..Default::default()
        };
        let eval = evaluate(&snap, None);
        assert_eq!(eval.next.cycle_number, 9);
        assert_eq!(eval.next.event_count, 3);
        assert_eq!(eval.next.chaos_count, 2);
        assert_eq!(eval.next.sentiment, 0.2);
        assert_eq!(eval.next.economic_mood, 61.0);
        assert_eq!(eval.next.pattern_flag, PatternFlag::StabilityStreak);
    }

    #[test]
    fn test_resolved_note_counts_toward_score() {
        let prior = PriorCycleState {
            cycle_number: Some(10),
            alert_flag: Some(AlertFlag::Firing),
            alert_start_cycle: Some(8),
            ..Default::default()
        };
        let eval = evaluate(&SignalSnapshot::default(), Some(&prior));
        assert_eq!(eval.alert.flag, AlertFlag::Resolved);
        assert_eq!(eval.alert.detection_count, 0);
        assert_eq!(eval.alert.score, 1);
        assert!(eval.alert.has_reason(ReasonCode::S903_NOTE_RESOLVED));
    }

    #[test]
    fn test_fingerprint_ignores_detail() {
        let a = vec![Reason::with_detail(ReasonCode::S101_EVENT_SPIKE, "delta=11")];
        let b = vec![Reason::with_detail(ReasonCode::S101_EVENT_SPIKE, "delta=30")];
        assert_eq!(fingerprint(AlertFlag::Firing, 5, &a), fingerprint(AlertFlag::Firing, 5, &b));
        assert_ne!(fingerprint(AlertFlag::Firing, 5, &a), fingerprint(AlertFlag::Firing, 6, &a));
        assert_eq!(fingerprint(AlertFlag::None, 0, &[]).len(), 64);
    }
}
