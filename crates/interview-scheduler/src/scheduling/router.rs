use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::domain::{
    CandidateDraft, CandidateId, RecruiterDraft, RecruiterId, ReservationId, ReservationRequest,
    ReservationUpdate, Seniority, SlotDraft, SlotId, VacationDraft, VacationId,
};
use super::error::SchedulingError;
use super::records::{CandidateService, RecruiterService, VacationService};
use super::repository::{
    CalendarMirror, CandidateRepository, EventPublisher, RecruiterRepository,
    ReservationRepository, SlotRepository, VacationRepository,
};
use super::reservations::ReservationService;
use super::slots::SlotLifecycleService;

/// Storage and outbound adapters the scheduling services are wired from.
#[derive(Clone)]
pub struct SchedulingPorts {
    pub recruiters: Arc<dyn RecruiterRepository>,
    pub slots: Arc<dyn SlotRepository>,
    pub vacations: Arc<dyn VacationRepository>,
    pub candidates: Arc<dyn CandidateRepository>,
    pub reservations: Arc<dyn ReservationRepository>,
    pub calendar: Arc<dyn CalendarMirror>,
    pub publisher: Arc<dyn EventPublisher>,
}

/// Shared router state.
#[derive(Clone)]
pub struct SchedulingState {
    pub slots: Arc<SlotLifecycleService>,
    pub reservations: Arc<ReservationService>,
    pub recruiters: Arc<RecruiterService>,
    pub vacations: Arc<VacationService>,
    pub candidates: Arc<CandidateService>,
}

impl SchedulingState {
    pub fn new(ports: SchedulingPorts, reservation_topic: impl Into<String>) -> Self {
        let slots = SlotLifecycleService::new(
            ports.recruiters.clone(),
            ports.slots.clone(),
            ports.vacations.clone(),
            ports.calendar,
        );
        let reservations = ReservationService::new(
            ports.slots,
            ports.candidates.clone(),
            ports.reservations,
            ports.publisher,
        )
        .with_topic(reservation_topic);

        Self {
            slots: Arc::new(slots),
            reservations: Arc::new(reservations),
            recruiters: Arc::new(RecruiterService::new(ports.recruiters)),
            vacations: Arc::new(VacationService::new(ports.vacations)),
            candidates: Arc::new(CandidateService::new(ports.candidates)),
        }
    }
}

/// Router builder exposing the slot, reservation and record endpoints.
pub fn scheduling_router(state: SchedulingState) -> Router {
    Router::new()
        .route(
            "/api/v1/interview-slots",
            get(list_slots_handler).post(create_slot_handler),
        )
        .route("/api/v1/interview-slots/search", get(search_slots_handler))
        .route(
            "/api/v1/interview-slots/:slot_id",
            get(get_slot_handler)
                .put(update_slot_handler)
                .delete(delete_slot_handler),
        )
        .route(
            "/api/v1/reservations",
            get(list_reservations_handler).post(create_reservation_handler),
        )
        .route(
            "/api/v1/reservations/:reservation_id",
            get(get_reservation_handler)
                .put(update_reservation_handler)
                .delete(delete_reservation_handler),
        )
        .route(
            "/api/v1/reservations/:reservation_id/cancel",
            post(cancel_reservation_handler),
        )
        .route(
            "/api/v1/recruiters",
            get(list_recruiters_handler).post(create_recruiter_handler),
        )
        .route(
            "/api/v1/recruiters/:recruiter_id",
            get(get_recruiter_handler)
                .put(update_recruiter_handler)
                .delete(delete_recruiter_handler),
        )
        .route(
            "/api/v1/vacations",
            get(list_vacations_handler).post(create_vacation_handler),
        )
        .route(
            "/api/v1/vacations/:vacation_id",
            get(get_vacation_handler)
                .put(update_vacation_handler)
                .delete(delete_vacation_handler),
        )
        .route(
            "/api/v1/candidates",
            get(list_candidates_handler).post(create_candidate_handler),
        )
        .route(
            "/api/v1/candidates/:candidate_id",
            get(get_candidate_handler)
                .put(update_candidate_handler)
                .delete(delete_candidate_handler),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecruiterQuery {
    pub(crate) recruiter_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SlotSearchQuery {
    pub(crate) category: String,
    pub(crate) seniority: String,
}

pub(crate) fn status_for(error: &SchedulingError) -> StatusCode {
    match error {
        SchedulingError::NotFound { .. } => StatusCode::NOT_FOUND,
        SchedulingError::Admission(_) => StatusCode::CONFLICT,
        SchedulingError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        SchedulingError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn error_response(error: SchedulingError) -> Response {
    let status = status_for(&error);
    if status.is_server_error() {
        warn!(error = %error, "scheduling request failed");
    }
    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}

fn respond<T: Serialize>(status: StatusCode, result: Result<T, SchedulingError>) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

fn respond_empty(result: Result<(), SchedulingError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

fn bad_request(message: impl Into<String>) -> Response {
    error_response(SchedulingError::InvalidInput(message.into()))
}

pub(crate) async fn list_slots_handler(State(state): State<SchedulingState>) -> Response {
    respond(StatusCode::OK, state.slots.list())
}

pub(crate) async fn create_slot_handler(
    State(state): State<SchedulingState>,
    Query(query): Query<RecruiterQuery>,
    Json(draft): Json<SlotDraft>,
) -> Response {
    let Some(recruiter_id) = query.recruiter_id.filter(|id| !id.trim().is_empty()) else {
        return bad_request("recruiter_id query parameter is required");
    };
    respond(
        StatusCode::CREATED,
        state.slots.create(&RecruiterId(recruiter_id), draft),
    )
}

pub(crate) async fn search_slots_handler(
    State(state): State<SchedulingState>,
    Query(query): Query<SlotSearchQuery>,
) -> Response {
    let seniority = match query.seniority.parse::<Seniority>() {
        Ok(seniority) => seniority,
        Err(error) => return bad_request(error.to_string()),
    };
    respond(StatusCode::OK, state.slots.search(&query.category, seniority))
}

pub(crate) async fn get_slot_handler(
    State(state): State<SchedulingState>,
    Path(slot_id): Path<String>,
) -> Response {
    respond(StatusCode::OK, state.slots.get(&SlotId(slot_id)))
}

pub(crate) async fn update_slot_handler(
    State(state): State<SchedulingState>,
    Path(slot_id): Path<String>,
    Json(draft): Json<SlotDraft>,
) -> Response {
    respond(StatusCode::OK, state.slots.update(&SlotId(slot_id), draft))
}

pub(crate) async fn delete_slot_handler(
    State(state): State<SchedulingState>,
    Path(slot_id): Path<String>,
) -> Response {
    respond_empty(state.slots.delete(&SlotId(slot_id)))
}

pub(crate) async fn list_reservations_handler(State(state): State<SchedulingState>) -> Response {
    respond(StatusCode::OK, state.reservations.list())
}

pub(crate) async fn create_reservation_handler(
    State(state): State<SchedulingState>,
    Json(request): Json<ReservationRequest>,
) -> Response {
    respond(StatusCode::CREATED, state.reservations.create(request))
}

pub(crate) async fn get_reservation_handler(
    State(state): State<SchedulingState>,
    Path(reservation_id): Path<String>,
) -> Response {
    respond(
        StatusCode::OK,
        state.reservations.get(&ReservationId(reservation_id)),
    )
}

pub(crate) async fn update_reservation_handler(
    State(state): State<SchedulingState>,
    Path(reservation_id): Path<String>,
    Json(update): Json<ReservationUpdate>,
) -> Response {
    respond(
        StatusCode::OK,
        state
            .reservations
            .update(&ReservationId(reservation_id), update),
    )
}

pub(crate) async fn cancel_reservation_handler(
    State(state): State<SchedulingState>,
    Path(reservation_id): Path<String>,
) -> Response {
    respond(
        StatusCode::OK,
        state.reservations.cancel(&ReservationId(reservation_id)),
    )
}

pub(crate) async fn delete_reservation_handler(
    State(state): State<SchedulingState>,
    Path(reservation_id): Path<String>,
) -> Response {
    respond_empty(state.reservations.delete(&ReservationId(reservation_id)))
}

pub(crate) async fn list_recruiters_handler(State(state): State<SchedulingState>) -> Response {
    respond(StatusCode::OK, state.recruiters.list())
}

pub(crate) async fn create_recruiter_handler(
    State(state): State<SchedulingState>,
    Json(draft): Json<RecruiterDraft>,
) -> Response {
    respond(StatusCode::CREATED, state.recruiters.create(draft))
}

pub(crate) async fn get_recruiter_handler(
    State(state): State<SchedulingState>,
    Path(recruiter_id): Path<String>,
) -> Response {
    respond(StatusCode::OK, state.recruiters.get(&RecruiterId(recruiter_id)))
}

pub(crate) async fn update_recruiter_handler(
    State(state): State<SchedulingState>,
    Path(recruiter_id): Path<String>,
    Json(draft): Json<RecruiterDraft>,
) -> Response {
    respond(
        StatusCode::OK,
        state.recruiters.update(&RecruiterId(recruiter_id), draft),
    )
}

pub(crate) async fn delete_recruiter_handler(
    State(state): State<SchedulingState>,
    Path(recruiter_id): Path<String>,
) -> Response {
    respond_empty(state.recruiters.delete(&RecruiterId(recruiter_id)))
}

pub(crate) async fn list_vacations_handler(
    State(state): State<SchedulingState>,
    Query(query): Query<RecruiterQuery>,
) -> Response {
    match query.recruiter_id {
        Some(recruiter_id) => respond(
            StatusCode::OK,
            state
                .vacations
                .list_by_recruiter(&RecruiterId(recruiter_id)),
        ),
        None => respond(StatusCode::OK, state.vacations.list()),
    }
}

pub(crate) async fn create_vacation_handler(
    State(state): State<SchedulingState>,
    Json(draft): Json<VacationDraft>,
) -> Response {
    respond(StatusCode::CREATED, state.vacations.create(draft))
}

pub(crate) async fn get_vacation_handler(
    State(state): State<SchedulingState>,
    Path(vacation_id): Path<String>,
) -> Response {
    respond(StatusCode::OK, state.vacations.get(&VacationId(vacation_id)))
}

pub(crate) async fn update_vacation_handler(
    State(state): State<SchedulingState>,
    Path(vacation_id): Path<String>,
    Json(draft): Json<VacationDraft>,
) -> Response {
    respond(
        StatusCode::OK,
        state.vacations.update(&VacationId(vacation_id), draft),
    )
}

pub(crate) async fn delete_vacation_handler(
    State(state): State<SchedulingState>,
    Path(vacation_id): Path<String>,
) -> Response {
    respond_empty(state.vacations.delete(&VacationId(vacation_id)))
}

pub(crate) async fn list_candidates_handler(State(state): State<SchedulingState>) -> Response {
    respond(StatusCode::OK, state.candidates.list())
}

pub(crate) async fn create_candidate_handler(
    State(state): State<SchedulingState>,
    Json(draft): Json<CandidateDraft>,
) -> Response {
    respond(StatusCode::CREATED, state.candidates.create(draft))
}

pub(crate) async fn get_candidate_handler(
    State(state): State<SchedulingState>,
    Path(candidate_id): Path<String>,
) -> Response {
    respond(StatusCode::OK, state.candidates.get(&CandidateId(candidate_id)))
}

pub(crate) async fn update_candidate_handler(
    State(state): State<SchedulingState>,
    Path(candidate_id): Path<String>,
    Json(draft): Json<CandidateDraft>,
) -> Response {
    respond(
        StatusCode::OK,
        state.candidates.update(&CandidateId(candidate_id), draft),
    )
}

pub(crate) async fn delete_candidate_handler(
    State(state): State<SchedulingState>,
    Path(candidate_id): Path<String>,
) -> Response {
    respond_empty(state.candidates.delete(&CandidateId(candidate_id)))
}
