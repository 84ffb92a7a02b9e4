//! Plain CRUD over recruiters, vacations and candidates.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::info;

use super::domain::{
    Candidate, CandidateDraft, CandidateId, Recruiter, RecruiterDraft, RecruiterId, Vacation,
    VacationDraft, VacationId,
};
use super::error::SchedulingError;
use super::repository::{CandidateRepository, RecruiterRepository, VacationRepository};

static RECRUITER_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static VACATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static CANDIDATE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_id(sequence: &AtomicU64, prefix: &str) -> String {
    let id = sequence.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id:06}")
}

pub struct RecruiterService {
    recruiters: Arc<dyn RecruiterRepository>,
}

impl RecruiterService {
    pub fn new(recruiters: Arc<dyn RecruiterRepository>) -> Self {
        Self { recruiters }
    }

    pub fn create(&self, draft: RecruiterDraft) -> Result<Recruiter, SchedulingError> {
        let recruiter = Recruiter {
            id: RecruiterId(next_id(&RECRUITER_SEQUENCE, "rec")),
            first_name: draft.first_name,
            last_name: draft.last_name,
            max_daily_interviews: draft.max_daily_interviews,
            max_weekly_interviews: draft.max_weekly_interviews,
            max_monthly_interviews: draft.max_monthly_interviews,
            calendar_id: draft.calendar_id,
        };
        let stored = self.recruiters.save(recruiter)?;
        info!(recruiter_id = %stored.id, "recruiter created");
        Ok(stored)
    }

    /// Replace names and caps. The calendar id is only set here when none is linked yet.
    pub fn update(
        &self,
        recruiter_id: &RecruiterId,
        draft: RecruiterDraft,
    ) -> Result<Recruiter, SchedulingError> {
        let mut recruiter = self.get(recruiter_id)?;
        recruiter.first_name = draft.first_name;
        recruiter.last_name = draft.last_name;
        recruiter.max_daily_interviews = draft.max_daily_interviews;
        recruiter.max_weekly_interviews = draft.max_weekly_interviews;
        recruiter.max_monthly_interviews = draft.max_monthly_interviews;
        if recruiter.calendar_id.is_none() {
            recruiter.calendar_id = draft.calendar_id;
        }
        Ok(self.recruiters.save(recruiter)?)
    }

    pub fn get(&self, recruiter_id: &RecruiterId) -> Result<Recruiter, SchedulingError> {
        self.recruiters
            .find_by_id(recruiter_id)?
            .ok_or_else(|| SchedulingError::not_found("Recruiter", recruiter_id))
    }

    pub fn list(&self) -> Result<Vec<Recruiter>, SchedulingError> {
        Ok(self.recruiters.find_all()?)
    }

    pub fn delete(&self, recruiter_id: &RecruiterId) -> Result<(), SchedulingError> {
        let recruiter = self.get(recruiter_id)?;
        self.recruiters
            .delete_by_id(&recruiter.id)
            .map_err(|err| SchedulingError::from_repository("Recruiter", &recruiter.id, err))?;
        Ok(())
    }
}

pub struct VacationService {
    vacations: Arc<dyn VacationRepository>,
}

impl VacationService {
    pub fn new(vacations: Arc<dyn VacationRepository>) -> Self {
        Self { vacations }
    }

    pub fn create(&self, draft: VacationDraft) -> Result<Vacation, SchedulingError> {
        check_vacation_bounds(&draft)?;
        let vacation = Vacation {
            id: VacationId(next_id(&VACATION_SEQUENCE, "vac")),
            recruiter_id: draft.recruiter_id,
            start_date: draft.start_date,
            end_date: draft.end_date,
            reason: draft.reason,
            approved: draft.approved,
        };
        let stored = self.vacations.save(vacation)?;
        info!(
            vacation_id = %stored.id,
            recruiter_id = %stored.recruiter_id,
            start = %stored.start_date,
            end = %stored.end_date,
            "vacation recorded"
        );
        Ok(stored)
    }

    pub fn update(
        &self,
        vacation_id: &VacationId,
        draft: VacationDraft,
    ) -> Result<Vacation, SchedulingError> {
        let existing = self.get(vacation_id)?;
        check_vacation_bounds(&draft)?;
        let vacation = Vacation {
            id: existing.id,
            recruiter_id: draft.recruiter_id,
            start_date: draft.start_date,
            end_date: draft.end_date,
            reason: draft.reason,
            approved: draft.approved,
        };
        Ok(self.vacations.save(vacation)?)
    }

    pub fn get(&self, vacation_id: &VacationId) -> Result<Vacation, SchedulingError> {
        self.vacations
            .find_by_id(vacation_id)?
            .ok_or_else(|| SchedulingError::not_found("Vacation", vacation_id))
    }

    pub fn list(&self) -> Result<Vec<Vacation>, SchedulingError> {
        Ok(self.vacations.find_all()?)
    }

    pub fn list_by_recruiter(
        &self,
        recruiter_id: &RecruiterId,
    ) -> Result<Vec<Vacation>, SchedulingError> {
        Ok(self.vacations.find_by_recruiter(recruiter_id)?)
    }

    pub fn delete(&self, vacation_id: &VacationId) -> Result<(), SchedulingError> {
        let vacation = self.get(vacation_id)?;
        self.vacations
            .delete_by_id(&vacation.id)
            .map_err(|err| SchedulingError::from_repository("Vacation", &vacation.id, err))?;
        Ok(())
    }
}

fn check_vacation_bounds(draft: &VacationDraft) -> Result<(), SchedulingError> {
    if draft.recruiter_id.as_str().trim().is_empty() {
        return Err(SchedulingError::invalid("vacation recruiter_id is required"));
    }
    if draft.start_date >= draft.end_date {
        return Err(SchedulingError::invalid(
            "vacation start_date must be before end_date",
        ));
    }
    Ok(())
}

pub struct CandidateService {
    candidates: Arc<dyn CandidateRepository>,
}

impl CandidateService {
    pub fn new(candidates: Arc<dyn CandidateRepository>) -> Self {
        Self { candidates }
    }

    pub fn create(&self, draft: CandidateDraft) -> Result<Candidate, SchedulingError> {
        let candidate = Candidate {
            id: CandidateId(next_id(&CANDIDATE_SEQUENCE, "cand")),
            first_name: draft.first_name,
            last_name: draft.last_name,
            user_id: draft.user_id,
        };
        Ok(self.candidates.save(candidate)?)
    }

    pub fn update(
        &self,
        candidate_id: &CandidateId,
        draft: CandidateDraft,
    ) -> Result<Candidate, SchedulingError> {
        let mut candidate = self.get(candidate_id)?;
        candidate.first_name = draft.first_name;
        candidate.last_name = draft.last_name;
        candidate.user_id = draft.user_id;
        Ok(self.candidates.save(candidate)?)
    }

    pub fn get(&self, candidate_id: &CandidateId) -> Result<Candidate, SchedulingError> {
        self.candidates
            .find_by_id(candidate_id)?
            .ok_or_else(|| SchedulingError::not_found("Candidate", candidate_id))
    }

    pub fn list(&self) -> Result<Vec<Candidate>, SchedulingError> {
        Ok(self.candidates.find_all()?)
    }

    pub fn exists(&self, candidate_id: &CandidateId) -> Result<bool, SchedulingError> {
        Ok(self.candidates.exists(candidate_id)?)
    }

    pub fn delete(&self, candidate_id: &CandidateId) -> Result<(), SchedulingError> {
        let candidate = self.get(candidate_id)?;
        self.candidates
            .delete_by_id(&candidate.id)
            .map_err(|err| SchedulingError::from_repository("Candidate", &candidate.id, err))?;
        Ok(())
    }
}
