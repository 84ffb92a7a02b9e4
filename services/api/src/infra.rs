use chrono::{NaiveDate, NaiveDateTime};
use interview_scheduler::scheduling::{
    CalendarMirror, Candidate, CandidateId, CandidateRepository, CandidateReservation,
    EventPublisher, InterviewSlot, MirrorError, PublishError, Recruiter, RecruiterId,
    RecruiterRepository, RepositoryError, ReservationId, ReservationRepository, SchedulingPorts,
    Seniority, SlotId, SlotRepository, Vacation, VacationId, VacationRepository,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryRecruiterRepository {
    records: Arc<Mutex<HashMap<RecruiterId, Recruiter>>>,
}

impl RecruiterRepository for InMemoryRecruiterRepository {
    fn save(&self, recruiter: Recruiter) -> Result<Recruiter, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(recruiter.id.clone(), recruiter.clone());
        Ok(recruiter)
    }

    fn find_by_id(&self, id: &RecruiterId) -> Result<Option<Recruiter>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_all(&self) -> Result<Vec<Recruiter>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut recruiters: Vec<_> = guard.values().cloned().collect();
        recruiters.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(recruiters)
    }

    fn delete_by_id(&self, id: &RecruiterId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySlotRepository {
    records: Arc<Mutex<HashMap<SlotId, InterviewSlot>>>,
}

impl InMemorySlotRepository {
    fn matching<F>(&self, predicate: F) -> Vec<InterviewSlot>
    where
        F: Fn(&InterviewSlot) -> bool,
    {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut slots: Vec<_> = guard.values().filter(|slot| predicate(slot)).cloned().collect();
        slots.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.id.cmp(&b.id)));
        slots
    }
}

impl SlotRepository for InMemorySlotRepository {
    fn save(&self, slot: InterviewSlot) -> Result<InterviewSlot, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(slot.id.clone(), slot.clone());
        Ok(slot)
    }

    fn find_by_id(&self, id: &SlotId) -> Result<Option<InterviewSlot>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_all(&self) -> Result<Vec<InterviewSlot>, RepositoryError> {
        Ok(self.matching(|_| true))
    }

    fn delete_by_id(&self, id: &SlotId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn count_by_recruiter_and_start_between(
        &self,
        recruiter_id: &RecruiterId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<u64, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|slot| {
                &slot.recruiter_id == recruiter_id
                    && slot.start_time >= start
                    && slot.start_time <= end
            })
            .count() as u64)
    }

    fn find_by_recruiter_overlapping(
        &self,
        recruiter_id: &RecruiterId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<InterviewSlot>, RepositoryError> {
        Ok(self.matching(|slot| {
            &slot.recruiter_id == recruiter_id && slot.start_time < end && slot.end_time > start
        }))
    }

    fn find_by_category_and_seniority(
        &self,
        category: &str,
        seniority: Seniority,
    ) -> Result<Vec<InterviewSlot>, RepositoryError> {
        Ok(self.matching(|slot| slot.category == category && slot.seniority == seniority))
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryVacationRepository {
    records: Arc<Mutex<HashMap<VacationId, Vacation>>>,
}

impl InMemoryVacationRepository {
    fn matching<F>(&self, predicate: F) -> Vec<Vacation>
    where
        F: Fn(&Vacation) -> bool,
    {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut vacations: Vec<_> = guard
            .values()
            .filter(|vacation| predicate(vacation))
            .cloned()
            .collect();
        vacations.sort_by(|a, b| a.start_date.cmp(&b.start_date));
        vacations
    }
}

impl VacationRepository for InMemoryVacationRepository {
    fn save(&self, vacation: Vacation) -> Result<Vacation, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(vacation.id.clone(), vacation.clone());
        Ok(vacation)
    }

    fn find_by_id(&self, id: &VacationId) -> Result<Option<Vacation>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_all(&self) -> Result<Vec<Vacation>, RepositoryError> {
        Ok(self.matching(|_| true))
    }

    fn find_by_recruiter(
        &self,
        recruiter_id: &RecruiterId,
    ) -> Result<Vec<Vacation>, RepositoryError> {
        Ok(self.matching(|vacation| &vacation.recruiter_id == recruiter_id))
    }

    fn find_overlapping(
        &self,
        recruiter_id: &RecruiterId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Vacation>, RepositoryError> {
        Ok(self.matching(|vacation| {
            &vacation.recruiter_id == recruiter_id
                && vacation.start_date < end
                && vacation.end_date > start
        }))
    }

    fn delete_by_id(&self, id: &VacationId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCandidateRepository {
    records: Arc<Mutex<HashMap<CandidateId, Candidate>>>,
}

impl CandidateRepository for InMemoryCandidateRepository {
    fn save(&self, candidate: Candidate) -> Result<Candidate, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(candidate.id.clone(), candidate.clone());
        Ok(candidate)
    }

    fn find_by_id(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_all(&self) -> Result<Vec<Candidate>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut candidates: Vec<_> = guard.values().cloned().collect();
        candidates.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(candidates)
    }

    fn delete_by_id(&self, id: &CandidateId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn exists(&self, id: &CandidateId) -> Result<bool, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.contains_key(id))
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryReservationRepository {
    records: Arc<Mutex<HashMap<ReservationId, CandidateReservation>>>,
}

impl ReservationRepository for InMemoryReservationRepository {
    fn save(
        &self,
        reservation: CandidateReservation,
    ) -> Result<CandidateReservation, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(reservation.id.clone(), reservation.clone());
        Ok(reservation)
    }

    fn find_by_id(
        &self,
        id: &ReservationId,
    ) -> Result<Option<CandidateReservation>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_all(&self) -> Result<Vec<CandidateReservation>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut reservations: Vec<_> = guard.values().cloned().collect();
        reservations.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(reservations)
    }

    fn delete_by_id(&self, id: &ReservationId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn exists_active_for_slot(&self, slot_id: &SlotId) -> Result<bool, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .any(|reservation| &reservation.slot_id == slot_id && reservation.status.is_active()))
    }
}

/// Calendar adapter for local runs: logs each mirror call and mints event ids.
#[derive(Default)]
pub(crate) struct LoggingCalendarMirror {
    sequence: AtomicU64,
}

impl CalendarMirror for LoggingCalendarMirror {
    fn create_event(
        &self,
        calendar_id: &str,
        slot: &InterviewSlot,
    ) -> Result<String, MirrorError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let event_id = format!("evt-{id:06}");
        info!(
            calendar_id,
            slot_id = %slot.id,
            %event_id,
            start = %slot.start_time,
            end = %slot.end_time,
            "calendar event created"
        );
        Ok(event_id)
    }

    fn update_event(&self, calendar_id: &str, slot: &InterviewSlot) -> Result<(), MirrorError> {
        let event_id = slot
            .calendar_event_id
            .as_deref()
            .ok_or_else(|| MirrorError::Rejected(format!("slot {} has no event", slot.id)))?;
        info!(calendar_id, slot_id = %slot.id, event_id, "calendar event updated");
        Ok(())
    }

    fn delete_event(&self, calendar_id: &str, event_id: &str) -> Result<(), MirrorError> {
        info!(calendar_id, event_id, "calendar event deleted");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct PublishedEvent {
    pub(crate) topic: String,
    pub(crate) key: String,
    pub(crate) payload: String,
}

/// Message bus adapter for local runs: logs and retains every published event.
#[derive(Default, Clone)]
pub(crate) struct LoggingEventPublisher {
    events: Arc<Mutex<Vec<PublishedEvent>>>,
}

impl LoggingEventPublisher {
    pub(crate) fn events(&self) -> Vec<PublishedEvent> {
        self.events.lock().expect("publisher mutex poisoned").clone()
    }
}

impl EventPublisher for LoggingEventPublisher {
    fn publish(&self, topic: &str, key: &str, payload: &str) -> Result<(), PublishError> {
        info!(topic, key, payload, "event published");
        let mut guard = self.events.lock().expect("publisher mutex poisoned");
        guard.push(PublishedEvent {
            topic: topic.to_string(),
            key: key.to_string(),
            payload: payload.to_string(),
        });
        Ok(())
    }
}

/// Wire every scheduling port to the in-memory adapters.
pub(crate) fn in_memory_ports() -> (SchedulingPorts, LoggingEventPublisher) {
    let publisher = LoggingEventPublisher::default();
    let ports = SchedulingPorts {
        recruiters: Arc::new(InMemoryRecruiterRepository::default()),
        slots: Arc::new(InMemorySlotRepository::default()),
        vacations: Arc::new(InMemoryVacationRepository::default()),
        candidates: Arc::new(InMemoryCandidateRepository::default()),
        reservations: Arc::new(InMemoryReservationRepository::default()),
        calendar: Arc::new(LoggingCalendarMirror::default()),
        publisher: Arc::new(publisher.clone()),
    };
    (ports, publisher)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
