//! Integration tests for the detector bank under calendar context
//!
//! Snapshots go in as JSON, the way producers send them.

use serde_json::{json, Value};
use shockwatch::core::evaluate_json;
use shockwatch::types::{AlertFlag, Evaluation, ReasonCode};

fn eval(snapshot: Value, prior: Value) -> Evaluation {
    evaluate_json(&snapshot, Some(&prior)).unwrap()
}

fn codes(eval: &Evaluation) -> Vec<ReasonCode> {
    eval.alert.reasons.iter().map(|r| r.code).collect()
}

#[test]
fn test_event_spike_without_modifiers() {
    let eval = eval(
        json!({"cycleNumber": 12, "eventCount": 25}),
        json!({"cycleNumber": 11, "eventCount": 10}),
    );
    assert!(eval.alert.labels().contains(&"event spike"));
    assert_eq!(eval.alert.flag, AlertFlag::Firing);
    assert_eq!(eval.alert.calendar_context.thresholds.event_spike, 10);
}

#[test]
fn test_event_delta_below_threshold() {
    let eval = eval(json!({"eventCount": 19}), json!({"eventCount": 10}));
    assert!(codes(&eval).is_empty());
    assert_eq!(eval.alert.flag, AlertFlag::None);
}

#[test]
fn test_high_activity_holiday_raises_thresholds() {
    // Fourth of July: high-activity + crowd + travel
    let eval = eval(
        json!({"eventCount": 22, "holidayName": "Fourth of July"}),
        json!({"eventCount": 10}),
    );
    let t = eval.alert.calendar_context.thresholds;
    assert_eq!(t.event_spike, 13);
    assert_eq!(t.chaos_spike, 8);
    assert_eq!(t.migration, 200);
    assert!(!codes(&eval).contains(&ReasonCode::S101_EVENT_SPIKE));
}

#[test]
fn test_quiet_anniversary_lowers_threshold() {
    let eval = eval(
        json!({"eventCount": 18, "isQuietAnniversaryDay": true}),
        json!({"eventCount": 10}),
    );
    assert_eq!(eval.alert.calendar_context.thresholds.event_spike, 8);
    assert_eq!(codes(&eval), vec![ReasonCode::S101_EVENT_SPIKE]);
}

#[test]
fn test_derived_active_phase_from_month() {
    let june = eval(json!({"eventCount": 20, "month": 6}), json!({"eventCount": 10}));
    assert_eq!(june.alert.calendar_context.seasonal_phase, "active");
    assert_eq!(june.alert.calendar_context.thresholds.event_spike, 11);
    assert!(codes(&june).is_empty());

    let january = eval(json!({"eventCount": 20, "month": 1}), json!({"eventCount": 10}));
    assert_eq!(january.alert.calendar_context.seasonal_phase, "off");
    assert_eq!(codes(&january), vec![ReasonCode::S101_EVENT_SPIKE]);
}

#[test]
fn test_month_taken_from_date() {
    let eval = eval(json!({"date": "2026-03-14"}), json!({}));
    assert_eq!(eval.alert.calendar_context.seasonal_phase, "early");
}

#[test]
fn test_peak_override_and_gloom() {
    let eval = eval(
        json!({
            "eventCount": 23,
            "sentiment": -0.45,
            "seasonalOverrideActive": true,
            "seasonalActivityPhase": "peak"
        }),
        json!({"eventCount": 10, "sentiment": -0.45}),
    );
    let ctx = &eval.alert.calendar_context;
    assert!(ctx.seasonal_override_active);
    assert_eq!(ctx.seasonal_phase, "peak");
    assert_eq!(ctx.thresholds.event_spike, 14);
    assert_eq!(codes(&eval), vec![ReasonCode::S202_PEAK_SEASON_GLOOM]);
}

#[test]
fn test_supplied_peak_without_override_is_ignored() {
    let eval = eval(
        json!({"eventCount": 21, "month": 1, "seasonalActivityPhase": "peak", "sentiment": -0.45}),
        json!({"eventCount": 10, "sentiment": -0.45}),
    );
    assert_eq!(eval.alert.calendar_context.thresholds.event_spike, 10);
    assert_eq!(codes(&eval), vec![ReasonCode::S101_EVENT_SPIKE]);
}

#[test]
fn test_fireworks_safety_composite() {
    let eval = eval(
        json!({
            "eventCount": 3,
            "holidayName": "New Year's Eve",
            "worldEvents": [
                {"severity": "low", "domain": "safety"},
                {"severity": "low", "domain": "Safety"},
                {"severity": "low", "domain": "safety"}
            ]
        }),
        json!({}),
    );
    assert_eq!(codes(&eval), vec![ReasonCode::S203_FIREWORKS_SAFETY]);
}

#[test]
fn test_holiday_dead_zone() {
    let eval = eval(
        json!({"eventCount": 1, "holidayName": "Thanksgiving", "holidayPriority": "major"}),
        json!({"eventCount": 1}),
    );
    assert_eq!(codes(&eval), vec![ReasonCode::S201_HOLIDAY_DEAD_ZONE]);
}

#[test]
fn test_calendar_facts_read_from_top_level_only() {
    let flat = eval(
        json!({"eventCount": 1, "holidayName": "Thanksgiving", "holidayPriority": "major"}),
        json!({"eventCount": 1}),
    );
    assert_eq!(flat.alert.calendar_context.thresholds.migration, 200);
    assert_eq!(flat.alert.calendar_context.holiday_name.as_deref(), Some("Thanksgiving"));

    let nested = eval(
        json!({"calendar": {"holidayName": "Thanksgiving", "holidayPriority": "major"}, "eventCount": 1}),
        json!({"eventCount": 1}),
    );
    assert_eq!(nested.alert.calendar_context.thresholds.migration, 150);
    assert_eq!(nested.alert.calendar_context.holiday_name, None);
    assert!(codes(&nested).is_empty());
}

#[test]
fn test_detector_order_follows_table() {
    let eval = eval(
        json!({
            "eventCount": 40,
            "worldEvents": [
                {"severity": "high", "domain": "civic"},
                {"severity": "critical", "domain": "civic"}
            ],
            "civicLoad": "load-strain",
            "patternFlag": "strain-trend"
        }),
        json!({"eventCount": 10, "chaosCount": 2}),
    );
    assert_eq!(
        codes(&eval),
        vec![
            ReasonCode::S101_EVENT_SPIKE,
            ReasonCode::S102_SEVERITY_SPIKE,
            ReasonCode::S115_CIVIC_STRAIN,
            ReasonCode::S118_STRAIN_TREND,
        ]
    );
    assert_eq!(eval.alert.score, 4);
    assert_eq!(eval.alert.detection_count, 4);
}

#[test]
fn test_unknown_holiday_has_no_modifiers() {
    let eval = eval(json!({"holidayName": "Founders Picnic"}), json!({}));
    let t = eval.alert.calendar_context.thresholds;
    assert_eq!((t.event_spike, t.chaos_spike, t.chaos_saturation, t.migration), (10, 4, 8, 150));
}
