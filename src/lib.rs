//! Shockwatch: narrative shock detection for simulated environments
//!
//! One invocation evaluates one environment's one cycle:
//! snapshot + prior state → calendar → thresholds → detectors → hysteresis → alert + next state

pub mod core;
pub mod error;
pub mod types;

pub use error::ShockError;

// =============================================================================
// BASE THRESHOLDS - calendar modifiers are added on top
// =============================================================================

/// Event-count delta that counts as a spike
pub const BASE_EVENT_SPIKE: i64 = 10;

/// World-event delta that counts as a chaos spike
pub const BASE_CHAOS_SPIKE: i64 = 4;

/// Absolute world-event count that counts as saturation
pub const BASE_CHAOS_SATURATION: i64 = 8;

/// Absolute migration that counts as a surge
pub const BASE_MIGRATION: i64 = 150;

// =============================================================================
// DETECTOR LIMITS - fixed, never calendar-adjusted
// =============================================================================

pub const SEVERE_EVENT_MIN: usize = 2;
pub const MEDIUM_EVENT_MIN: usize = 4;

pub const WEATHER_IMPACT_MAX: f64 = 1.5;
pub const WEATHER_CONFLICT_MAX: f64 = 0.5;
pub const WEATHER_COMFORT_MIN: f64 = 0.2;

pub const SENTIMENT_DROP: f64 = 0.3;
pub const SENTIMENT_FLOOR: f64 = -0.5;

pub const ECONOMY_DROP: f64 = 15.0;
pub const ECONOMY_FLOOR: f64 = 25.0;

pub const EMPLOYMENT_FLOOR: f64 = 0.85;

pub const CIVIC_SCORE_MAX: f64 = 15.0;

/// Event count that breaks a stability streak
pub const STREAK_BREAK_EVENTS: u64 = 10;

pub const PEAK_ARC_MIN: usize = 2;
pub const ARC_TENSION_HIGH: f64 = 8.0;
pub const TENSE_ARC_MIN: usize = 2;

pub const MEDIA_SATURATION_MAX: f64 = 0.8;

// Calendar composites
pub const DEAD_ZONE_MAX_EVENTS: u64 = 1;
pub const PEAK_GLOOM_SENTIMENT: f64 = -0.4;
pub const FIREWORKS_SAFETY_MIN: usize = 3;
pub const TRAVEL_INFRASTRUCTURE_MIN: usize = 2;
pub const ENGAGEMENT_LOW: f64 = 0.3;
pub const DISENGAGED_SENTIMENT: f64 = -0.2;

// =============================================================================
// HYSTERESIS
// =============================================================================

/// Episode length (cycles) after which a calm episode is labelled chronic
pub const CHRONIC_AFTER_CYCLES: u64 = 5;

/// Episode length (cycles) after which a calm episode is labelled fading
pub const FADING_AFTER_CYCLES: u64 = 3;

/// Chronic only while fewer than this many detections are active
pub const CHRONIC_MAX_REASONS: usize = 3;

/// Fading only while fewer than this many detections are active
pub const FADING_MAX_REASONS: usize = 2;

// =============================================================================
// NEUTRAL DEFAULTS for absent snapshot fields
// =============================================================================

pub const DEFAULT_ECONOMIC_MOOD: f64 = 50.0;
pub const DEFAULT_EMPLOYMENT_RATE: f64 = 1.0;
pub const DEFAULT_WEATHER_IMPACT: f64 = 1.0;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
