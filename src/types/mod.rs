//! Core types for Shockwatch

mod output;
mod reason;
mod snapshot;
mod state;
mod thresholds;

pub use output::{AlertRecord, CalendarContext, Evaluation};
pub use reason::{Reason, ReasonCode};
pub use snapshot::{
    ArcPhase, CalendarFacts, CivicLoad, CoverageIntensity, DemographicDrift, HolidayPriority,
    MediaEffects, NarrativeArc, PatternFlag, Severity, SignalSnapshot, Weather, WorldEvent,
};
pub use state::{AlertFlag, NextCycleState, PriorCycleState};
pub use thresholds::{CalendarModifiers, ThresholdSet};
