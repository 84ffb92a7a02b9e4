//! Slot admission rules.
//!
//! Admission runs a fixed, ordered list of rules and surfaces the first
//! failure: workload caps (day, week, month), then vacation overlap, then slot
//! overlap. Each rule reads storage independently; there is no shared snapshot.

mod conflict;
mod workload;

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::domain::{InterviewSlot, Recruiter, RecruiterId, SlotId, VacationId};
use super::error::SchedulingError;
use super::repository::{RepositoryError, SlotRepository, VacationRepository};

pub use conflict::ConflictDetector;
pub use workload::{WorkloadCounter, WorkloadPeriod};

/// User-facing admission rejection. Retrying the same input fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdmissionError {
    #[error("{period} limit reached for recruiter: {recruiter_id} ({count} of {cap} slots booked)")]
    LimitExceeded {
        period: WorkloadPeriod,
        recruiter_id: RecruiterId,
        cap: u32,
        count: u64,
    },
    #[error("recruiter is on vacation during this slot (vacation {vacation_id})")]
    VacationOverlap { vacation_id: VacationId },
    #[error("slot conflict with ID {slot_id}")]
    SlotOverlap { slot_id: SlotId },
    #[error("slot {slot_id} is already reserved (multi_capacity=false)")]
    ReservationCapacity { slot_id: SlotId },
}

impl AdmissionError {
    pub fn is_limit(&self) -> bool {
        matches!(self, AdmissionError::LimitExceeded { .. })
    }

    pub fn is_overlap(&self) -> bool {
        !self.is_limit()
    }
}

/// Outcome of a single admission rule that did not pass.
#[derive(Debug, thiserror::Error)]
pub enum RuleFailure {
    #[error(transparent)]
    Rejected(AdmissionError),
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<RuleFailure> for SchedulingError {
    fn from(value: RuleFailure) -> Self {
        match value {
            RuleFailure::Rejected(error) => SchedulingError::Admission(error),
            RuleFailure::Invalid(message) => SchedulingError::InvalidInput(message),
            RuleFailure::Repository(error) => SchedulingError::Repository(error),
        }
    }
}

/// Named admission rules in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionRule {
    DailyLimit,
    WeeklyLimit,
    MonthlyLimit,
    VacationOverlap,
    SlotOverlap,
}

impl AdmissionRule {
    pub const ORDER: [AdmissionRule; 5] = [
        AdmissionRule::DailyLimit,
        AdmissionRule::WeeklyLimit,
        AdmissionRule::MonthlyLimit,
        AdmissionRule::VacationOverlap,
        AdmissionRule::SlotOverlap,
    ];

    pub fn period(&self) -> Option<WorkloadPeriod> {
        match self {
            AdmissionRule::DailyLimit => Some(WorkloadPeriod::Day),
            AdmissionRule::WeeklyLimit => Some(WorkloadPeriod::Week),
            AdmissionRule::MonthlyLimit => Some(WorkloadPeriod::Month),
            AdmissionRule::VacationOverlap | AdmissionRule::SlotOverlap => None,
        }
    }
}

/// Composes the workload counter and conflict detector into one admission decision.
pub struct SlotValidator {
    workload: WorkloadCounter,
    conflicts: ConflictDetector,
}

impl SlotValidator {
    pub fn new(slots: Arc<dyn SlotRepository>, vacations: Arc<dyn VacationRepository>) -> Self {
        Self {
            workload: WorkloadCounter::new(slots.clone()),
            conflicts: ConflictDetector::new(slots, vacations),
        }
    }

    /// Admit `slot` for `recruiter`. `previous` is the stored version when an existing
    /// slot is being moved.
    pub fn validate(
        &self,
        recruiter: &Recruiter,
        slot: &InterviewSlot,
        previous: Option<&InterviewSlot>,
    ) -> Result<(), SchedulingError> {
        check_references(recruiter, slot)?;

        for rule in AdmissionRule::ORDER {
            debug!(?rule, slot_id = %slot.id, recruiter_id = %recruiter.id, "evaluating admission rule");
            self.check(rule, recruiter, slot, previous)?;
        }
        Ok(())
    }

    pub fn check(
        &self,
        rule: AdmissionRule,
        recruiter: &Recruiter,
        slot: &InterviewSlot,
        previous: Option<&InterviewSlot>,
    ) -> Result<(), RuleFailure> {
        match rule.period() {
            Some(period) => self.workload.check_cap(recruiter, slot, previous, period),
            None if rule == AdmissionRule::VacationOverlap => {
                self.conflicts.check_vacations(recruiter, slot)
            }
            None => self.conflicts.check_slots(recruiter, slot),
        }
    }
}

fn check_references(recruiter: &Recruiter, slot: &InterviewSlot) -> Result<(), SchedulingError> {
    if recruiter.id.as_str().trim().is_empty() {
        return Err(SchedulingError::invalid("recruiter reference is missing"));
    }
    if slot.recruiter_id != recruiter.id {
        return Err(SchedulingError::invalid(format!(
            "slot {} belongs to recruiter {}, not {}",
            slot.id, slot.recruiter_id, recruiter.id
        )));
    }
    if slot.start_time >= slot.end_time {
        return Err(SchedulingError::invalid(
            "slot start_time must be before end_time",
        ));
    }
    if slot.buffered_bounds().is_none() {
        return Err(SchedulingError::invalid(conflict::out_of_range(slot)));
    }
    Ok(())
}
