//! Hysteresis State Machine: verdict + prior alert state → flag
//!
//! State transitions:
//! - NONE/RESOLVED → FIRING: any detection (new episode, start = current cycle)
//! - FIRING → FADING: duration ≥ 3 AND < 2 detections
//! - FIRING → CHRONIC: duration ≥ 5 AND < 3 detections
//! - FADING/CHRONIC → FIRING: detections climb back up
//! - FIRING/FADING/CHRONIC → RESOLVED: no detections
//! - RESOLVED → NONE: no detections
//!
//! Episodes are tracked by start cycle, so duration is recomputed every
//! cycle and cannot drift.

use serde::{Deserialize, Serialize};

use crate::types::{AlertFlag, Reason, ReasonCode};
use crate::{CHRONIC_AFTER_CYCLES, CHRONIC_MAX_REASONS, FADING_AFTER_CYCLES, FADING_MAX_REASONS};

/// Episode position for one cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub flag: AlertFlag,
    pub start_cycle: u64,
    pub duration: u64,
    /// Note to append after the detection reasons
    pub note: Option<Reason>,
}

/// Previous cycle's alert position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PriorAlert {
    pub flag: AlertFlag,
    pub start_cycle: u64,
}

/// Alert hysteresis engine (stateless; the prior position is passed in)
#[derive(Debug, Default, Clone, Copy)]
pub struct HysteresisMachine;

impl HysteresisMachine {
    /// Create new engine
    pub fn new() -> Self {
        Self
    }

    /// Compute this cycle's flag from the detection count and prior position
    pub fn transition(&self, detections: usize, current_cycle: u64, prior: PriorAlert) -> Transition {
        if detections > 0 {
            self.while_triggered(detections, current_cycle, prior)
        } else {
            self.while_quiet(prior)
        }
    }

    fn while_triggered(&self, detections: usize, current_cycle: u64, prior: PriorAlert) -> Transition {
        let continuing = prior.flag.is_active() && prior.start_cycle > 0;
        let (start_cycle, duration) = if continuing {
            (prior.start_cycle, current_cycle.saturating_sub(prior.start_cycle))
        } else {
            (current_cycle, 0)
        };

        let (flag, note) = if duration >= CHRONIC_AFTER_CYCLES {
            if detections < CHRONIC_MAX_REASONS {
                let note = Reason::with_detail(
                    ReasonCode::S901_NOTE_CHRONIC,
                    format!("ongoing for {} cycles since cycle {}", duration, start_cycle),
                );
                (AlertFlag::Chronic, Some(note))
            } else {
                // Still escalating: a long episode with many detections stays FIRING
                (AlertFlag::Firing, None)
            }
        } else if duration >= FADING_AFTER_CYCLES {
            if detections < FADING_MAX_REASONS {
                let note = Reason::with_detail(
                    ReasonCode::S902_NOTE_FADING,
                    format!("{} detection(s) left after {} cycles", detections, duration),
                );
                (AlertFlag::Fading, Some(note))
            } else {
                (AlertFlag::Firing, None)
            }
        } else {
            (AlertFlag::Firing, None)
        };

        if flag != prior.flag {
            tracing::info!(from = %prior.flag, to = %flag, start_cycle, duration, "alert flag changed");
        }

        Transition {
            flag,
            start_cycle,
            duration,
            note,
        }
    }

    fn while_quiet(&self, prior: PriorAlert) -> Transition {
        if prior.flag.is_active() {
            tracing::info!(from = %prior.flag, start_cycle = prior.start_cycle, "alert resolved");
            let note = Reason::with_detail(
                ReasonCode::S903_NOTE_RESOLVED,
                format!("episode from cycle {} ended", prior.start_cycle),
            );
            return Transition {
                flag: AlertFlag::Resolved,
                start_cycle: 0,
                duration: 0,
                note: Some(note),
            };
        }

        // RESOLVED and NONE both settle to NONE
        Transition {
            flag: AlertFlag::None,
            start_cycle: 0,
            duration: 0,
            note: None,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
