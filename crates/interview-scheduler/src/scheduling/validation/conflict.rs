//! Vacation and slot conflict checks for a recruiter.
//!
//! Vacations block the nominal slot interval. Other slots block the interval
//! widened by the candidate's buffer, unless both sides are multi-capacity.

use std::sync::Arc;

use tracing::debug;

use super::super::domain::{InterviewSlot, Recruiter};
use super::super::repository::{SlotRepository, VacationRepository};
use super::super::windows::overlaps;
use super::{AdmissionError, RuleFailure};

pub struct ConflictDetector {
    slots: Arc<dyn SlotRepository>,
    vacations: Arc<dyn VacationRepository>,
}

impl ConflictDetector {
    pub fn new(slots: Arc<dyn SlotRepository>, vacations: Arc<dyn VacationRepository>) -> Self {
        Self { slots, vacations }
    }

    /// Any vacation overlapping `[start, end)` rejects, approved or not.
    pub fn check_vacations(
        &self,
        recruiter: &Recruiter,
        slot: &InterviewSlot,
    ) -> Result<(), RuleFailure> {
        let matches =
            self.vacations
                .find_overlapping(&recruiter.id, slot.start_time, slot.end_time)?;

        let conflict = matches.into_iter().find(|vacation| {
            overlaps(
                vacation.start_date,
                vacation.end_date,
                slot.start_time,
                slot.end_time,
            )
        });

        match conflict {
            Some(vacation) => {
                debug!(
                    recruiter_id = %recruiter.id,
                    vacation_id = %vacation.id,
                    approved = vacation.approved,
                    "slot falls inside recruiter vacation"
                );
                Err(RuleFailure::Rejected(AdmissionError::VacationOverlap {
                    vacation_id: vacation.id,
                }))
            }
            None => Ok(()),
        }
    }

    /// Every other slot inside the buffered window must be compatible with `slot`.
    pub fn check_slots(
        &self,
        recruiter: &Recruiter,
        slot: &InterviewSlot,
    ) -> Result<(), RuleFailure> {
        let Some((buffered_start, buffered_end)) = slot.buffered_bounds() else {
            return Err(RuleFailure::Invalid(out_of_range(slot)));
        };
        let matches =
            self.slots
                .find_by_recruiter_overlapping(&recruiter.id, buffered_start, buffered_end)?;

        for existing in matches {
            if existing.id == slot.id {
                continue;
            }
            if !overlaps(
                existing.start_time,
                existing.end_time,
                buffered_start,
                buffered_end,
            ) {
                continue;
            }
            if !(existing.multi_capacity && slot.multi_capacity) {
                debug!(
                    recruiter_id = %recruiter.id,
                    slot_id = %slot.id,
                    conflicting_slot_id = %existing.id,
                    buffer_minutes = slot.buffer_minutes,
                    "slot conflicts with committed slot"
                );
                return Err(RuleFailure::Rejected(AdmissionError::SlotOverlap {
                    slot_id: existing.id,
                }));
            }
        }
        Ok(())
    }
}

pub(super) fn out_of_range(slot: &InterviewSlot) -> String {
    format!(
        "slot {} with a {} minute buffer extends past the supported time range",
        slot.id, slot.buffer_minutes
    )
}
