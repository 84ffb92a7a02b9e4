use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::super::domain::{InterviewSlot, Recruiter, RecruiterId};
use super::super::repository::{RepositoryError, SlotRepository};
use super::super::windows::{day_window, month_window, week_window, TimeWindow};
use super::{AdmissionError, RuleFailure};

/// Calendar period a workload cap applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadPeriod {
    Day,
    Week,
    Month,
}

impl WorkloadPeriod {
    pub fn window_containing(&self, instant: NaiveDateTime) -> TimeWindow {
        let date = instant.date();
        match self {
            WorkloadPeriod::Day => day_window(date),
            WorkloadPeriod::Week => week_window(date),
            WorkloadPeriod::Month => month_window(date),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkloadPeriod::Day => "Daily",
            WorkloadPeriod::Week => "Weekly",
            WorkloadPeriod::Month => "Monthly",
        }
    }
}

impl fmt::Display for WorkloadPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Counts committed slots per recruiter within calendar windows.
pub struct WorkloadCounter {
    slots: Arc<dyn SlotRepository>,
}

impl WorkloadCounter {
    pub fn new(slots: Arc<dyn SlotRepository>) -> Self {
        Self { slots }
    }

    pub fn count(
        &self,
        recruiter_id: &RecruiterId,
        window: TimeWindow,
    ) -> Result<u64, RepositoryError> {
        self.slots
            .count_by_recruiter_and_start_between(recruiter_id, window.start, window.end)
    }

    /// Rejects when the recruiter already holds `cap` slots in the period containing
    /// the slot start. `previous` is the stored version of a slot being moved and is
    /// not counted against itself.
    pub fn check_cap(
        &self,
        recruiter: &Recruiter,
        slot: &InterviewSlot,
        previous: Option<&InterviewSlot>,
        period: WorkloadPeriod,
    ) -> Result<(), RuleFailure> {
        let Some(cap) = recruiter.cap_for(period) else {
            return Ok(());
        };

        let window = period.window_containing(slot.start_time);
        let mut count = self.count(&recruiter.id, window)?;
        if previous.is_some_and(|stored| window.contains(stored.start_time)) {
            count = count.saturating_sub(1);
        }

        if count >= u64::from(cap) {
            return Err(RuleFailure::Rejected(AdmissionError::LimitExceeded {
                period,
                recruiter_id: recruiter.id.clone(),
                cap,
                count,
            }));
        }
        Ok(())
    }
}
