//! Interview slot scheduling: admission rules, slot lifecycle, reservations
//! and the supporting recruiter, vacation and candidate records.

pub mod domain;
pub mod error;
mod locks;
pub mod records;
pub mod repository;
pub mod reservations;
pub mod router;
pub mod slots;
pub mod validation;
pub mod windows;

#[cfg(test)]
mod tests;

pub use domain::{
    Candidate, CandidateDraft, CandidateId, CandidateReservation, InterviewSlot, Recruiter,
    RecruiterDraft, RecruiterId, ReservationId, ReservationRequest, ReservationStatus,
    ReservationUpdate, Seniority, SlotDraft, SlotId, UnknownSeniority, Vacation, VacationDraft,
    VacationId,
};
pub use error::SchedulingError;
pub use records::{CandidateService, RecruiterService, VacationService};
pub use repository::{
    CalendarMirror, CandidateRepository, EventPublisher, MirrorError, PublishError,
    RecruiterRepository, RepositoryError, ReservationRepository, SlotRepository,
    VacationRepository,
};
pub use reservations::{ReservationService, DEFAULT_RESERVATION_TOPIC};
pub use router::{scheduling_router, SchedulingPorts, SchedulingState};
pub use slots::SlotLifecycleService;
pub use validation::{AdmissionError, AdmissionRule, RuleFailure, SlotValidator, WorkloadPeriod};
pub use windows::TimeWindow;
