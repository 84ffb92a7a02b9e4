use chrono::NaiveDateTime;

use super::domain::{
    Candidate, CandidateId, CandidateReservation, InterviewSlot, Recruiter, RecruiterId,
    ReservationId, Seniority, SlotId, Vacation, VacationId,
};

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

pub trait RecruiterRepository: Send + Sync {
    fn save(&self, recruiter: Recruiter) -> Result<Recruiter, RepositoryError>;
    fn find_by_id(&self, id: &RecruiterId) -> Result<Option<Recruiter>, RepositoryError>;
    fn find_all(&self) -> Result<Vec<Recruiter>, RepositoryError>;
    fn delete_by_id(&self, id: &RecruiterId) -> Result<(), RepositoryError>;
}

/// Slot storage. Window queries take the caller's bounds verbatim.
pub trait SlotRepository: Send + Sync {
    fn save(&self, slot: InterviewSlot) -> Result<InterviewSlot, RepositoryError>;
    fn find_by_id(&self, id: &SlotId) -> Result<Option<InterviewSlot>, RepositoryError>;
    fn find_all(&self) -> Result<Vec<InterviewSlot>, RepositoryError>;
    fn delete_by_id(&self, id: &SlotId) -> Result<(), RepositoryError>;

    /// Slots whose `start_time` lies in `[start, end]`.
    fn count_by_recruiter_and_start_between(
        &self,
        recruiter_id: &RecruiterId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<u64, RepositoryError>;

    /// Slots with `start_time < end && end_time > start`.
    fn find_by_recruiter_overlapping(
        &self,
        recruiter_id: &RecruiterId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<InterviewSlot>, RepositoryError>;

    fn find_by_category_and_seniority(
        &self,
        category: &str,
        seniority: Seniority,
    ) -> Result<Vec<InterviewSlot>, RepositoryError>;
}

pub trait VacationRepository: Send + Sync {
    fn save(&self, vacation: Vacation) -> Result<Vacation, RepositoryError>;
    fn find_by_id(&self, id: &VacationId) -> Result<Option<Vacation>, RepositoryError>;
    fn find_all(&self) -> Result<Vec<Vacation>, RepositoryError>;
    fn find_by_recruiter(&self, recruiter_id: &RecruiterId)
        -> Result<Vec<Vacation>, RepositoryError>;

    /// Vacations with `start_date < end && end_date > start`.
    fn find_overlapping(
        &self,
        recruiter_id: &RecruiterId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Vacation>, RepositoryError>;

    fn delete_by_id(&self, id: &VacationId) -> Result<(), RepositoryError>;
}

pub trait CandidateRepository: Send + Sync {
    fn save(&self, candidate: Candidate) -> Result<Candidate, RepositoryError>;
    fn find_by_id(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError>;
    fn find_all(&self) -> Result<Vec<Candidate>, RepositoryError>;
    fn delete_by_id(&self, id: &CandidateId) -> Result<(), RepositoryError>;
    fn exists(&self, id: &CandidateId) -> Result<bool, RepositoryError>;
}

pub trait ReservationRepository: Send + Sync {
    fn save(&self, reservation: CandidateReservation)
        -> Result<CandidateReservation, RepositoryError>;
    fn find_by_id(
        &self,
        id: &ReservationId,
    ) -> Result<Option<CandidateReservation>, RepositoryError>;
    fn find_all(&self) -> Result<Vec<CandidateReservation>, RepositoryError>;
    fn delete_by_id(&self, id: &ReservationId) -> Result<(), RepositoryError>;
    fn exists_active_for_slot(&self, slot_id: &SlotId) -> Result<bool, RepositoryError>;
}

/// External calendar that mirrors slot lifecycle changes.
pub trait CalendarMirror: Send + Sync {
    /// Returns the external event id.
    fn create_event(&self, calendar_id: &str, slot: &InterviewSlot)
        -> Result<String, MirrorError>;
    fn update_event(&self, calendar_id: &str, slot: &InterviewSlot) -> Result<(), MirrorError>;
    fn delete_event(&self, calendar_id: &str, event_id: &str) -> Result<(), MirrorError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    #[error("calendar transport unavailable: {0}")]
    Transport(String),
    #[error("calendar rejected request: {0}")]
    Rejected(String),
}

/// Fire-and-forget message bus for lifecycle notifications.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, topic: &str, key: &str, payload: &str) -> Result<(), PublishError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("event transport unavailable: {0}")]
    Transport(String),
}
