use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::scheduling::domain::{
    Candidate, CandidateId, CandidateReservation, InterviewSlot, Recruiter, RecruiterId,
    ReservationId, Seniority, SlotDraft, SlotId, Vacation, VacationId,
};
use crate::scheduling::repository::{
    CalendarMirror, CandidateRepository, EventPublisher, MirrorError, PublishError,
    RecruiterRepository, RepositoryError, ReservationRepository, SlotRepository,
    VacationRepository,
};
use crate::scheduling::{
    ReservationService, SchedulingPorts, SchedulingState, SlotLifecycleService, SlotValidator,
};

/// 2025-03-03 is a Monday.
pub(super) fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, day)
        .expect("valid date")
        .and_hms_opt(hour, minute, 0)
        .expect("valid time")
}

pub(super) fn draft(start: NaiveDateTime, end: NaiveDateTime) -> SlotDraft {
    SlotDraft {
        category: "backend".to_string(),
        seniority: Seniority::Mid,
        start_time: start,
        end_time: end,
        multi_capacity: false,
        buffer_minutes: None,
    }
}

pub(super) fn slot_for(
    recruiter: &Recruiter,
    id: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> InterviewSlot {
    InterviewSlot {
        id: SlotId::from(id),
        recruiter_id: recruiter.id.clone(),
        category: "backend".to_string(),
        seniority: Seniority::Mid,
        start_time: start,
        end_time: end,
        multi_capacity: false,
        buffer_minutes: 0,
        calendar_event_id: None,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRecruiters {
    records: Arc<Mutex<BTreeMap<RecruiterId, Recruiter>>>,
}

impl RecruiterRepository for MemoryRecruiters {
    fn save(&self, recruiter: Recruiter) -> Result<Recruiter, RepositoryError> {
        let mut guard = self.records.lock().expect("recruiter mutex poisoned");
        guard.insert(recruiter.id.clone(), recruiter.clone());
        Ok(recruiter)
    }

    fn find_by_id(&self, id: &RecruiterId) -> Result<Option<Recruiter>, RepositoryError> {
        let guard = self.records.lock().expect("recruiter mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_all(&self) -> Result<Vec<Recruiter>, RepositoryError> {
        let guard = self.records.lock().expect("recruiter mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn delete_by_id(&self, id: &RecruiterId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("recruiter mutex poisoned");
        guard.remove(id);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemorySlots {
    records: Arc<Mutex<BTreeMap<SlotId, InterviewSlot>>>,
}

impl MemorySlots {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("slot mutex poisoned").len()
    }
}

impl SlotRepository for MemorySlots {
    fn save(&self, slot: InterviewSlot) -> Result<InterviewSlot, RepositoryError> {
        let mut guard = self.records.lock().expect("slot mutex poisoned");
        guard.insert(slot.id.clone(), slot.clone());
        Ok(slot)
    }

    fn find_by_id(&self, id: &SlotId) -> Result<Option<InterviewSlot>, RepositoryError> {
        let guard = self.records.lock().expect("slot mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_all(&self) -> Result<Vec<InterviewSlot>, RepositoryError> {
        let guard = self.records.lock().expect("slot mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn delete_by_id(&self, id: &SlotId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("slot mutex poisoned");
        guard.remove(id);
        Ok(())
    }

    fn count_by_recruiter_and_start_between(
        &self,
        recruiter_id: &RecruiterId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<u64, RepositoryError> {
        let guard = self.records.lock().expect("slot mutex poisoned");
        Ok(guard
            .values()
            .filter(|slot| &slot.recruiter_id == recruiter_id)
            .filter(|slot| start <= slot.start_time && slot.start_time <= end)
            .count() as u64)
    }

    fn find_by_recruiter_overlapping(
        &self,
        recruiter_id: &RecruiterId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<InterviewSlot>, RepositoryError> {
        let guard = self.records.lock().expect("slot mutex poisoned");
        Ok(guard
            .values()
            .filter(|slot| &slot.recruiter_id == recruiter_id)
            .filter(|slot| slot.start_time < end && slot.end_time > start)
            .cloned()
            .collect())
    }

    fn find_by_category_and_seniority(
        &self,
        category: &str,
        seniority: Seniority,
    ) -> Result<Vec<InterviewSlot>, RepositoryError> {
        let guard = self.records.lock().expect("slot mutex poisoned");
        Ok(guard
            .values()
            .filter(|slot| slot.category == category && slot.seniority == seniority)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryVacations {
    records: Arc<Mutex<BTreeMap<VacationId, Vacation>>>,
}

impl VacationRepository for MemoryVacations {
    fn save(&self, vacation: Vacation) -> Result<Vacation, RepositoryError> {
        let mut guard = self.records.lock().expect("vacation mutex poisoned");
        guard.insert(vacation.id.clone(), vacation.clone());
        Ok(vacation)
    }

    fn find_by_id(&self, id: &VacationId) -> Result<Option<Vacation>, RepositoryError> {
        let guard = self.records.lock().expect("vacation mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_all(&self) -> Result<Vec<Vacation>, RepositoryError> {
        let guard = self.records.lock().expect("vacation mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn find_by_recruiter(
        &self,
        recruiter_id: &RecruiterId,
    ) -> Result<Vec<Vacation>, RepositoryError> {
        let guard = self.records.lock().expect("vacation mutex poisoned");
        Ok(guard
            .values()
            .filter(|vacation| &vacation.recruiter_id == recruiter_id)
            .cloned()
            .collect())
    }

    fn find_overlapping(
        &self,
        recruiter_id: &RecruiterId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Vacation>, RepositoryError> {
        let guard = self.records.lock().expect("vacation mutex poisoned");
        Ok(guard
            .values()
            .filter(|vacation| &vacation.recruiter_id == recruiter_id)
            .filter(|vacation| vacation.start_date < end && vacation.end_date > start)
            .cloned()
            .collect())
    }

    fn delete_by_id(&self, id: &VacationId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("vacation mutex poisoned");
        guard.remove(id);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryCandidates {
    records: Arc<Mutex<BTreeMap<CandidateId, Candidate>>>,
}

impl CandidateRepository for MemoryCandidates {
    fn save(&self, candidate: Candidate) -> Result<Candidate, RepositoryError> {
        let mut guard = self.records.lock().expect("candidate mutex poisoned");
        guard.insert(candidate.id.clone(), candidate.clone());
        Ok(candidate)
    }

    fn find_by_id(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        let guard = self.records.lock().expect("candidate mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_all(&self) -> Result<Vec<Candidate>, RepositoryError> {
        let guard = self.records.lock().expect("candidate mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn delete_by_id(&self, id: &CandidateId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("candidate mutex poisoned");
        guard.remove(id);
        Ok(())
    }

    fn exists(&self, id: &CandidateId) -> Result<bool, RepositoryError> {
        let guard = self.records.lock().expect("candidate mutex poisoned");
        Ok(guard.contains_key(id))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryReservations {
    records: Arc<Mutex<BTreeMap<ReservationId, CandidateReservation>>>,
}

impl ReservationRepository for MemoryReservations {
    fn save(
        &self,
        reservation: CandidateReservation,
    ) -> Result<CandidateReservation, RepositoryError> {
        let mut guard = self.records.lock().expect("reservation mutex poisoned");
        guard.insert(reservation.id.clone(), reservation.clone());
        Ok(reservation)
    }

    fn find_by_id(
        &self,
        id: &ReservationId,
    ) -> Result<Option<CandidateReservation>, RepositoryError> {
        let guard = self.records.lock().expect("reservation mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_all(&self) -> Result<Vec<CandidateReservation>, RepositoryError> {
        let guard = self.records.lock().expect("reservation mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn delete_by_id(&self, id: &ReservationId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("reservation mutex poisoned");
        guard.remove(id);
        Ok(())
    }

    fn exists_active_for_slot(&self, slot_id: &SlotId) -> Result<bool, RepositoryError> {
        let guard = self.records.lock().expect("reservation mutex poisoned");
        Ok(guard
            .values()
            .any(|reservation| &reservation.slot_id == slot_id && reservation.status.is_active()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum CalendarCall {
    Created { calendar_id: String, slot_id: SlotId },
    Updated { calendar_id: String, slot_id: SlotId },
    Deleted { calendar_id: String, event_id: String },
}

#[derive(Default)]
pub(super) struct MemoryCalendar {
    calls: Mutex<Vec<CalendarCall>>,
    sequence: AtomicUsize,
    failing: bool,
}

impl MemoryCalendar {
    pub(super) fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub(super) fn calls(&self) -> Vec<CalendarCall> {
        self.calls.lock().expect("calendar mutex poisoned").clone()
    }

    fn record(&self, call: CalendarCall) -> Result<(), MirrorError> {
        self.calls
            .lock()
            .expect("calendar mutex poisoned")
            .push(call);
        if self.failing {
            return Err(MirrorError::Transport("calendar offline".to_string()));
        }
        Ok(())
    }
}

impl CalendarMirror for MemoryCalendar {
    fn create_event(
        &self,
        calendar_id: &str,
        slot: &InterviewSlot,
    ) -> Result<String, MirrorError> {
        self.record(CalendarCall::Created {
            calendar_id: calendar_id.to_string(),
            slot_id: slot.id.clone(),
        })?;
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(format!("evt-{id}"))
    }

    fn update_event(&self, calendar_id: &str, slot: &InterviewSlot) -> Result<(), MirrorError> {
        self.record(CalendarCall::Updated {
            calendar_id: calendar_id.to_string(),
            slot_id: slot.id.clone(),
        })
    }

    fn delete_event(&self, calendar_id: &str, event_id: &str) -> Result<(), MirrorError> {
        self.record(CalendarCall::Deleted {
            calendar_id: calendar_id.to_string(),
            event_id: event_id.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct PublishedEvent {
    pub(super) topic: String,
    pub(super) key: String,
    pub(super) payload: String,
}

#[derive(Default)]
pub(super) struct MemoryPublisher {
    events: Mutex<Vec<PublishedEvent>>,
    failing: bool,
}

impl MemoryPublisher {
    pub(super) fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub(super) fn events(&self) -> Vec<PublishedEvent> {
        self.events.lock().expect("publisher mutex poisoned").clone()
    }
}

impl EventPublisher for MemoryPublisher {
    fn publish(&self, topic: &str, key: &str, payload: &str) -> Result<(), PublishError> {
        if self.failing {
            return Err(PublishError::Transport("broker unreachable".to_string()));
        }
        self.events
            .lock()
            .expect("publisher mutex poisoned")
            .push(PublishedEvent {
                topic: topic.to_string(),
                key: key.to_string(),
                payload: payload.to_string(),
            });
        Ok(())
    }
}

pub(super) struct UnavailableSlots;

impl SlotRepository for UnavailableSlots {
    fn save(&self, _slot: InterviewSlot) -> Result<InterviewSlot, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_id(&self, _id: &SlotId) -> Result<Option<InterviewSlot>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_all(&self) -> Result<Vec<InterviewSlot>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete_by_id(&self, _id: &SlotId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn count_by_recruiter_and_start_between(
        &self,
        _recruiter_id: &RecruiterId,
        _start: NaiveDateTime,
        _end: NaiveDateTime,
    ) -> Result<u64, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_recruiter_overlapping(
        &self,
        _recruiter_id: &RecruiterId,
        _start: NaiveDateTime,
        _end: NaiveDateTime,
    ) -> Result<Vec<InterviewSlot>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_category_and_seniority(
        &self,
        _category: &str,
        _seniority: Seniority,
    ) -> Result<Vec<InterviewSlot>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Slot storage where another writer removed the record between lookup and delete.
pub(super) struct AlreadyDeletedSlots(pub(super) MemorySlots);

impl SlotRepository for AlreadyDeletedSlots {
    fn save(&self, slot: InterviewSlot) -> Result<InterviewSlot, RepositoryError> {
        self.0.save(slot)
    }

    fn find_by_id(&self, id: &SlotId) -> Result<Option<InterviewSlot>, RepositoryError> {
        self.0.find_by_id(id)
    }

    fn find_all(&self) -> Result<Vec<InterviewSlot>, RepositoryError> {
        self.0.find_all()
    }

    fn delete_by_id(&self, _id: &SlotId) -> Result<(), RepositoryError> {
        Err(RepositoryError::NotFound)
    }

    fn count_by_recruiter_and_start_between(
        &self,
        recruiter_id: &RecruiterId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<u64, RepositoryError> {
        self.0
            .count_by_recruiter_and_start_between(recruiter_id, start, end)
    }

    fn find_by_recruiter_overlapping(
        &self,
        recruiter_id: &RecruiterId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<InterviewSlot>, RepositoryError> {
        self.0.find_by_recruiter_overlapping(recruiter_id, start, end)
    }

    fn find_by_category_and_seniority(
        &self,
        category: &str,
        seniority: Seniority,
    ) -> Result<Vec<InterviewSlot>, RepositoryError> {
        self.0.find_by_category_and_seniority(category, seniority)
    }
}

/// In-memory wiring of every port plus helpers to seed records directly.
pub(super) struct Harness {
    pub(super) recruiters: Arc<MemoryRecruiters>,
    pub(super) slots: Arc<MemorySlots>,
    pub(super) vacations: Arc<MemoryVacations>,
    pub(super) candidates: Arc<MemoryCandidates>,
    pub(super) reservations: Arc<MemoryReservations>,
    pub(super) calendar: Arc<MemoryCalendar>,
    pub(super) publisher: Arc<MemoryPublisher>,
}

impl Harness {
    pub(super) fn new() -> Self {
        Self::with_adapters(MemoryCalendar::default(), MemoryPublisher::default())
    }

    pub(super) fn with_adapters(calendar: MemoryCalendar, publisher: MemoryPublisher) -> Self {
        Self {
            recruiters: Arc::new(MemoryRecruiters::default()),
            slots: Arc::new(MemorySlots::default()),
            vacations: Arc::new(MemoryVacations::default()),
            candidates: Arc::new(MemoryCandidates::default()),
            reservations: Arc::new(MemoryReservations::default()),
            calendar: Arc::new(calendar),
            publisher: Arc::new(publisher),
        }
    }

    pub(super) fn ports(&self) -> SchedulingPorts {
        SchedulingPorts {
            recruiters: self.recruiters.clone(),
            slots: self.slots.clone(),
            vacations: self.vacations.clone(),
            candidates: self.candidates.clone(),
            reservations: self.reservations.clone(),
            calendar: self.calendar.clone(),
            publisher: self.publisher.clone(),
        }
    }

    pub(super) fn state(&self) -> SchedulingState {
        SchedulingState::new(self.ports(), "reservations")
    }

    pub(super) fn slot_service(&self) -> SlotLifecycleService {
        SlotLifecycleService::new(
            self.recruiters.clone(),
            self.slots.clone(),
            self.vacations.clone(),
            self.calendar.clone(),
        )
    }

    pub(super) fn reservation_service(&self) -> ReservationService {
        ReservationService::new(
            self.slots.clone(),
            self.candidates.clone(),
            self.reservations.clone(),
            self.publisher.clone(),
        )
    }

    pub(super) fn validator(&self) -> SlotValidator {
        SlotValidator::new(self.slots.clone(), self.vacations.clone())
    }

    pub(super) fn recruiter(&self, id: &str) -> Recruiter {
        self.recruiter_with(id, |_| {})
    }

    pub(super) fn recruiter_with(&self, id: &str, configure: impl FnOnce(&mut Recruiter)) -> Recruiter {
        let mut recruiter = Recruiter {
            id: RecruiterId::from(id),
            first_name: "Dana".to_string(),
            last_name: "Reyes".to_string(),
            max_daily_interviews: None,
            max_weekly_interviews: None,
            max_monthly_interviews: None,
            calendar_id: None,
        };
        configure(&mut recruiter);
        self.recruiters.save(recruiter).expect("seed recruiter")
    }

    pub(super) fn stored_slot(&self, slot: InterviewSlot) -> InterviewSlot {
        self.slots.save(slot).expect("seed slot")
    }

    pub(super) fn vacation(
        &self,
        recruiter: &Recruiter,
        start: NaiveDateTime,
        end: NaiveDateTime,
        approved: bool,
    ) -> Vacation {
        self.vacations
            .save(Vacation {
                id: VacationId(format!("vac-{}-{}", recruiter.id, start)),
                recruiter_id: recruiter.id.clone(),
                start_date: start,
                end_date: end,
                reason: Some("conference".to_string()),
                approved,
            })
            .expect("seed vacation")
    }

    pub(super) fn candidate(&self, id: &str) -> Candidate {
        self.candidates
            .save(Candidate {
                id: CandidateId::from(id),
                first_name: "Sam".to_string(),
                last_name: "Okafor".to_string(),
                user_id: None,
            })
            .expect("seed candidate")
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
