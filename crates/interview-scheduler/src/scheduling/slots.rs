use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{InterviewSlot, Recruiter, RecruiterId, Seniority, SlotDraft, SlotId};
use super::error::SchedulingError;
use super::locks::KeyedLocks;
use super::repository::{
    CalendarMirror, MirrorError, RecruiterRepository, SlotRepository, VacationRepository,
};
use super::validation::SlotValidator;

static SLOT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_slot_id() -> SlotId {
    let id = SLOT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SlotId(format!("slot-{id:06}"))
}

/// Result of a best-effort calendar mirror call. Never surfaced to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MirrorOutcome {
    Skipped(&'static str),
    Synced { event_id: Option<String> },
    Failed { cause: String },
}

impl MirrorOutcome {
    fn from_result<T>(result: Result<T, MirrorError>, event_id: impl FnOnce(T) -> Option<String>) -> Self {
        match result {
            Ok(value) => MirrorOutcome::Synced {
                event_id: event_id(value),
            },
            Err(err) => MirrorOutcome::Failed {
                cause: err.to_string(),
            },
        }
    }

    fn record(&self, operation: &'static str, recruiter_id: &RecruiterId, slot_id: &SlotId) {
        match self {
            MirrorOutcome::Failed { cause } => warn!(
                %recruiter_id,
                %slot_id,
                operation,
                %cause,
                "calendar mirror failed; slot state kept"
            ),
            MirrorOutcome::Skipped(reason) => {
                tracing::debug!(%recruiter_id, %slot_id, operation, reason, "calendar mirror skipped")
            }
            MirrorOutcome::Synced { .. } => {
                tracing::debug!(%recruiter_id, %slot_id, operation, "calendar mirror synced")
            }
        }
    }
}

/// Create/update/delete orchestration for interview slots.
pub struct SlotLifecycleService {
    recruiters: Arc<dyn RecruiterRepository>,
    slots: Arc<dyn SlotRepository>,
    validator: SlotValidator,
    calendar: Arc<dyn CalendarMirror>,
    /// Per-recruiter locks held across validate and persist.
    admissions: KeyedLocks<RecruiterId>,
}

impl SlotLifecycleService {
    pub fn new(
        recruiters: Arc<dyn RecruiterRepository>,
        slots: Arc<dyn SlotRepository>,
        vacations: Arc<dyn VacationRepository>,
        calendar: Arc<dyn CalendarMirror>,
    ) -> Self {
        let validator = SlotValidator::new(slots.clone(), vacations);
        Self {
            recruiters,
            slots,
            validator,
            calendar,
            admissions: KeyedLocks::default(),
        }
    }

    /// Validate and persist a new slot, then mirror it to the recruiter's calendar.
    pub fn create(
        &self,
        recruiter_id: &RecruiterId,
        draft: SlotDraft,
    ) -> Result<InterviewSlot, SchedulingError> {
        let recruiter = self.require_recruiter(recruiter_id)?;
        let slot = InterviewSlot {
            id: next_slot_id(),
            recruiter_id: recruiter.id.clone(),
            category: draft.category,
            seniority: draft.seniority,
            start_time: draft.start_time,
            end_time: draft.end_time,
            multi_capacity: draft.multi_capacity,
            buffer_minutes: buffer_minutes(draft.buffer_minutes)?,
            calendar_event_id: None,
        };

        let saved = self
            .admissions
            .with(&recruiter.id, || -> Result<InterviewSlot, SchedulingError> {
                self.validator.validate(&recruiter, &slot, None)?;
                Ok(self.slots.save(slot)?)
            })?;
        info!(slot_id = %saved.id, recruiter_id = %recruiter.id, start = %saved.start_time, "interview slot created");

        let outcome = match recruiter.calendar_id.as_deref() {
            Some(calendar_id) => MirrorOutcome::from_result(
                self.calendar.create_event(calendar_id, &saved),
                Some,
            ),
            None => MirrorOutcome::Skipped("recruiter has no calendar"),
        };
        outcome.record("create", &recruiter.id, &saved.id);

        match outcome {
            MirrorOutcome::Synced {
                event_id: Some(event_id),
            } => {
                let mut linked = saved.clone();
                linked.calendar_event_id = Some(event_id);
                match self.slots.save(linked) {
                    Ok(stored) => Ok(stored),
                    Err(err) => {
                        warn!(slot_id = %saved.id, recruiter_id = %recruiter.id, error = %err, "failed to store calendar event id");
                        Ok(saved)
                    }
                }
            }
            _ => Ok(saved),
        }
    }

    /// Apply new attributes. Limits and conflicts are re-checked only when the time window moved.
    pub fn update(
        &self,
        slot_id: &SlotId,
        draft: SlotDraft,
    ) -> Result<InterviewSlot, SchedulingError> {
        let existing = self.get(slot_id)?;
        let updated = InterviewSlot {
            category: draft.category,
            seniority: draft.seniority,
            start_time: draft.start_time,
            end_time: draft.end_time,
            multi_capacity: draft.multi_capacity,
            buffer_minutes: buffer_minutes(draft.buffer_minutes)?,
            ..existing.clone()
        };

        let (saved, recruiter) = if existing.same_time_as(&updated) {
            (self.slots.save(updated)?, None)
        } else {
            let recruiter = self.require_recruiter(&existing.recruiter_id)?;
            let saved = self
                .admissions
                .with(&recruiter.id, || -> Result<InterviewSlot, SchedulingError> {
                    self.validator.validate(&recruiter, &updated, Some(&existing))?;
                    Ok(self.slots.save(updated)?)
                })?;
            (saved, Some(recruiter))
        };
        info!(slot_id = %saved.id, recruiter_id = %saved.recruiter_id, "interview slot updated");

        let recruiter = recruiter.or_else(|| self.mirror_recruiter(&saved));
        let outcome = match (
            recruiter.as_ref().and_then(|r| r.calendar_id.as_deref()),
            saved.calendar_event_id.as_deref(),
        ) {
            (Some(calendar_id), Some(_)) => MirrorOutcome::from_result(
                self.calendar.update_event(calendar_id, &saved),
                |_| None,
            ),
            (None, _) => MirrorOutcome::Skipped("recruiter has no calendar"),
            (Some(_), None) => MirrorOutcome::Skipped("slot has no calendar event"),
        };
        outcome.record("update", &saved.recruiter_id, &saved.id);

        Ok(saved)
    }

    /// Remove a slot. The calendar event is removed first, best effort.
    pub fn delete(&self, slot_id: &SlotId) -> Result<(), SchedulingError> {
        let slot = self.get(slot_id)?;

        let recruiter = self.mirror_recruiter(&slot);
        let outcome = match (
            recruiter.as_ref().and_then(|r| r.calendar_id.as_deref()),
            slot.calendar_event_id.as_deref(),
        ) {
            (Some(calendar_id), Some(event_id)) => MirrorOutcome::from_result(
                self.calendar.delete_event(calendar_id, event_id),
                |_| None,
            ),
            (None, _) => MirrorOutcome::Skipped("recruiter has no calendar"),
            (Some(_), None) => MirrorOutcome::Skipped("slot has no calendar event"),
        };
        outcome.record("delete", &slot.recruiter_id, &slot.id);

        self.slots
            .delete_by_id(&slot.id)
            .map_err(|err| SchedulingError::from_repository("Slot", &slot.id, err))?;
        info!(slot_id = %slot.id, recruiter_id = %slot.recruiter_id, "interview slot deleted");
        Ok(())
    }

    pub fn get(&self, slot_id: &SlotId) -> Result<InterviewSlot, SchedulingError> {
        self.slots
            .find_by_id(slot_id)?
            .ok_or_else(|| SchedulingError::not_found("Slot", slot_id))
    }

    pub fn list(&self) -> Result<Vec<InterviewSlot>, SchedulingError> {
        Ok(self.slots.find_all()?)
    }

    pub fn search(
        &self,
        category: &str,
        seniority: Seniority,
    ) -> Result<Vec<InterviewSlot>, SchedulingError> {
        Ok(self.slots.find_by_category_and_seniority(category, seniority)?)
    }

    fn require_recruiter(&self, recruiter_id: &RecruiterId) -> Result<Recruiter, SchedulingError> {
        self.recruiters
            .find_by_id(recruiter_id)?
            .ok_or_else(|| SchedulingError::not_found("Recruiter", recruiter_id))
    }

    /// Recruiter lookup for mirroring only; failures downgrade to a skipped mirror.
    fn mirror_recruiter(&self, slot: &InterviewSlot) -> Option<Recruiter> {
        match self.recruiters.find_by_id(&slot.recruiter_id) {
            Ok(recruiter) => recruiter,
            Err(err) => {
                warn!(slot_id = %slot.id, recruiter_id = %slot.recruiter_id, error = %err, "recruiter lookup failed; skipping calendar mirror");
                None
            }
        }
    }
}

fn buffer_minutes(raw: Option<i32>) -> Result<u32, SchedulingError> {
    match raw {
        None => Ok(0),
        Some(minutes) if minutes >= 0 => Ok(minutes as u32),
        Some(minutes) => Err(SchedulingError::invalid(format!(
            "buffer_minutes must not be negative (found {minutes})"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_outcome_keeps_event_id_on_success() {
        let outcome = MirrorOutcome::from_result(Ok::<_, MirrorError>("evt-1".to_string()), Some);
        assert_eq!(
            outcome,
            MirrorOutcome::Synced {
                event_id: Some("evt-1".to_string())
            }
        );
    }

    #[test]
    fn mirror_outcome_captures_failure_cause() {
        let outcome = MirrorOutcome::from_result(
            Err::<(), _>(MirrorError::Transport("timeout".to_string())),
            |_| None,
        );
        match outcome {
            MirrorOutcome::Failed { cause } => assert!(cause.contains("timeout")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn buffer_defaults_to_zero_and_rejects_negative_values() {
        assert_eq!(buffer_minutes(None).expect("default"), 0);
        assert_eq!(buffer_minutes(Some(15)).expect("positive"), 15);
        assert!(matches!(
            buffer_minutes(Some(-5)),
            Err(SchedulingError::InvalidInput(_))
        ));
    }
}
