//! Alert record: the durable artifact of one cycle

use serde::{Deserialize, Serialize};

use crate::types::{
    AlertFlag, HolidayPriority, NextCycleState, Reason, ReasonCode, ThresholdSet,
};

/// Resolved calendar facts and thresholds used this cycle (audit trail)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarContext {
    pub holiday_name: Option<String>,
    pub holiday_priority: HolidayPriority,
    pub is_recurring_community_night: bool,
    pub is_quiet_anniversary_day: bool,
    pub seasonal_phase: String,
    pub seasonal_override_active: bool,
    pub thresholds: ThresholdSet,
}

/// Alert output for one cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    pub cycle_number: u64,
    pub flag: AlertFlag,
    /// Detection reasons in rule-table order, then at most one hysteresis note
    pub reasons: Vec<Reason>,
    /// Always `reasons.len()`, so it counts the hysteresis note too
    pub score: usize,
    /// Detection reasons only
    pub detection_count: usize,
    pub start_cycle: u64,
    pub duration: u64,
    pub calendar_context: CalendarContext,
    /// Hex SHA-256 over flag, start cycle and reason codes
    pub fingerprint: String,
}

impl AlertRecord {
    pub fn has_reason(&self, code: ReasonCode) -> bool {
        self.reasons.iter().any(|r| r.code == code)
    }

    /// Reason labels in order
    pub fn labels(&self) -> Vec<&'static str> {
        self.reasons.iter().map(Reason::label).collect()
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        let codes: Vec<&str> = self.reasons.iter().map(|r| r.code.code()).collect();
        format!(
            "cycle={} | flag={} | score={} | start={} | duration={} | reasons={}",
            self.cycle_number,
            self.flag.as_str(),
            self.score,
            self.start_cycle,
            self.duration,
            codes.join(",")
        )
    }
}

/// Result of one evaluation: the alert plus the state to persist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub alert: AlertRecord,
    pub next: NextCycleState,
}
