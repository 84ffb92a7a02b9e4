use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Local;
use tracing::{info, warn};

use super::domain::{
    CandidateReservation, ReservationId, ReservationRequest, ReservationStatus,
    ReservationUpdate, SlotId,
};
use super::error::SchedulingError;
use super::locks::KeyedLocks;
use super::repository::{
    CandidateRepository, EventPublisher, ReservationRepository, SlotRepository,
};
use super::validation::AdmissionError;

pub const DEFAULT_RESERVATION_TOPIC: &str = "reservations";

static RESERVATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_reservation_id() -> ReservationId {
    let id = RESERVATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReservationId(format!("res-{id:06}"))
}

/// Candidate reservations against committed slots.
pub struct ReservationService {
    slots: Arc<dyn SlotRepository>,
    candidates: Arc<dyn CandidateRepository>,
    reservations: Arc<dyn ReservationRepository>,
    publisher: Arc<dyn EventPublisher>,
    topic: String,
    /// Per-slot locks held across the capacity check and save.
    admissions: KeyedLocks<SlotId>,
}

impl ReservationService {
    pub fn new(
        slots: Arc<dyn SlotRepository>,
        candidates: Arc<dyn CandidateRepository>,
        reservations: Arc<dyn ReservationRepository>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            slots,
            candidates,
            reservations,
            publisher,
            topic: DEFAULT_RESERVATION_TOPIC.to_string(),
            admissions: KeyedLocks::default(),
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Admit a candidate onto a slot. Single-capacity slots accept one active reservation.
    pub fn create(
        &self,
        request: ReservationRequest,
    ) -> Result<CandidateReservation, SchedulingError> {
        let slot = self
            .slots
            .find_by_id(&request.slot_id)?
            .ok_or_else(|| SchedulingError::not_found("Slot", &request.slot_id))?;

        if !self.candidates.exists(&request.candidate_id)? {
            return Err(SchedulingError::not_found(
                "Candidate",
                &request.candidate_id,
            ));
        }

        let stored = self
            .admissions
            .with(&slot.id, || -> Result<CandidateReservation, SchedulingError> {
                if !slot.multi_capacity && self.reservations.exists_active_for_slot(&slot.id)? {
                    return Err(AdmissionError::ReservationCapacity {
                        slot_id: slot.id.clone(),
                    }
                    .into());
                }

                let reservation = CandidateReservation {
                    id: next_reservation_id(),
                    slot_id: slot.id.clone(),
                    candidate_id: request.candidate_id,
                    status: ReservationStatus::Active,
                    reservation_time: Local::now().naive_local(),
                };
                Ok(self.reservations.save(reservation)?)
            })?;
        info!(
            reservation_id = %stored.id,
            slot_id = %stored.slot_id,
            candidate_id = %stored.candidate_id,
            "reservation created"
        );

        self.announce(&stored);
        Ok(stored)
    }

    /// Overwrite an existing reservation without re-running admission.
    pub fn update(
        &self,
        reservation_id: &ReservationId,
        update: ReservationUpdate,
    ) -> Result<CandidateReservation, SchedulingError> {
        let mut reservation = self.get(reservation_id)?;
        reservation.slot_id = update.slot_id;
        reservation.candidate_id = update.candidate_id;
        reservation.status = update.status;
        reservation.reservation_time = update.reservation_time;
        Ok(self.reservations.save(reservation)?)
    }

    pub fn cancel(
        &self,
        reservation_id: &ReservationId,
    ) -> Result<CandidateReservation, SchedulingError> {
        let mut reservation = self.get(reservation_id)?;
        reservation.status = ReservationStatus::Cancelled;
        let stored = self.reservations.save(reservation)?;
        info!(reservation_id = %stored.id, slot_id = %stored.slot_id, "reservation cancelled");
        Ok(stored)
    }

    pub fn delete(&self, reservation_id: &ReservationId) -> Result<(), SchedulingError> {
        let reservation = self.get(reservation_id)?;
        self.reservations
            .delete_by_id(&reservation.id)
            .map_err(|err| SchedulingError::from_repository("Reservation", &reservation.id, err))?;
        Ok(())
    }

    pub fn get(
        &self,
        reservation_id: &ReservationId,
    ) -> Result<CandidateReservation, SchedulingError> {
        self.reservations
            .find_by_id(reservation_id)?
            .ok_or_else(|| SchedulingError::not_found("Reservation", reservation_id))
    }

    pub fn list(&self) -> Result<Vec<CandidateReservation>, SchedulingError> {
        Ok(self.reservations.find_all()?)
    }

    fn announce(&self, reservation: &CandidateReservation) {
        let payload = creation_message(reservation);
        if let Err(err) = self
            .publisher
            .publish(&self.topic, reservation.id.as_str(), &payload)
        {
            warn!(
                reservation_id = %reservation.id,
                topic = %self.topic,
                error = %err,
                "failed to publish reservation event"
            );
        }
    }
}

pub(crate) fn creation_message(reservation: &CandidateReservation) -> String {
    format!(
        "Reservation created: id={} slot={} candidate={}",
        reservation.id, reservation.slot_id, reservation.candidate_id
    )
}
