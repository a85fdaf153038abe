//! Work cycles and their cooldown periods, shown as a background overlay.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::date_format;
use crate::error::{CalError, CalResult};

/// A work cycle followed by a cooldown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "startDate", with = "date_format")]
    pub start: NaiveDate,
    #[serde(rename = "endDate", with = "date_format")]
    pub end: NaiveDate,
    #[serde(with = "date_format")]
    pub cooldown_start: NaiveDate,
    #[serde(with = "date_format")]
    pub cooldown_end: NaiveDate,
}

/// Which part of a cycle a date falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclePhase {
    Work,
    Cooldown,
}

impl Cycle {
    /// Phase of `date` within this cycle. Work wins over cooldown if the two
    /// ranges ever overlap.
    pub fn phase_of(&self, date: NaiveDate) -> Option<CyclePhase> {
        if self.start <= date && date <= self.end {
            Some(CyclePhase::Work)
        } else if self.cooldown_start <= date && date <= self.cooldown_end {
            Some(CyclePhase::Cooldown)
        } else {
            None
        }
    }

    /// Check that both phases are well-formed ranges.
    ///
    /// A cooldown that doesn't follow the work phase is tolerated.
    pub fn validate(&self) -> CalResult<()> {
        let label = self.name.as_deref().unwrap_or("(unnamed)");

        if self.end < self.start {
            return Err(CalError::InvalidCycle(format!(
                "{label}: work phase ends ({}) before it starts ({})",
                self.end, self.start
            )));
        }
        if self.cooldown_end < self.cooldown_start {
            return Err(CalError::InvalidCycle(format!(
                "{label}: cooldown ends ({}) before it starts ({})",
                self.cooldown_end, self.cooldown_start
            )));
        }
        Ok(())
    }
}

/// Phase of `date` across all cycles. The first cycle that matches wins.
pub fn cycle_phase(cycles: &[Cycle], date: NaiveDate) -> Option<CyclePhase> {
    cycles.iter().find_map(|cycle| cycle.phase_of(date))
}
