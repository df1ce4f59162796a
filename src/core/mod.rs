//! Core modules for Shockwatch

pub mod calendar;
pub mod thresholds;
pub mod detectors;
pub mod hysteresis;
pub mod evaluate;
pub mod input;
pub mod store;
pub mod api;

pub use calendar::{CalendarResolver, HolidayClasses};
pub use detectors::{DetectionInput, DetectionOutcome, Detector, DetectorBank, DETECTORS};
pub use hysteresis::{HysteresisMachine, PriorAlert, Transition};
pub use evaluate::{evaluate, fingerprint, ShockDetector};
pub use input::{evaluate_json, parse_prior, parse_snapshot};
pub use store::{is_valid_env_id, load_state, save_state, StateFile};
pub use api::{create_router, run_server};
