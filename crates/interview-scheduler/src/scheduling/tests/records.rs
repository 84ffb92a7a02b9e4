use super::common::*;
use crate::scheduling::domain::{
    CandidateDraft, CandidateId, RecruiterDraft, RecruiterId, VacationDraft,
};
use crate::scheduling::{CandidateService, RecruiterService, SchedulingError, VacationService};

fn recruiter_draft(calendar_id: Option<&str>) -> RecruiterDraft {
    RecruiterDraft {
        first_name: "Priya".to_string(),
        last_name: "Natarajan".to_string(),
        max_daily_interviews: Some(4),
        max_weekly_interviews: Some(12),
        max_monthly_interviews: None,
        calendar_id: calendar_id.map(str::to_string),
    }
}

fn vacation_draft(recruiter: &str, start_day: u32, end_day: u32) -> VacationDraft {
    VacationDraft {
        recruiter_id: RecruiterId::from(recruiter),
        start_date: at(start_day, 0, 0),
        end_date: at(end_day, 0, 0),
        reason: None,
        approved: true,
    }
}

#[test]
fn recruiter_update_keeps_linked_calendar() {
    let harness = Harness::new();
    let service = RecruiterService::new(harness.recruiters.clone());

    let created = service
        .create(recruiter_draft(Some("cal-original")))
        .expect("created");
    assert!(created.id.as_str().starts_with("rec-"));

    let mut changes = recruiter_draft(Some("cal-other"));
    changes.max_daily_interviews = Some(2);
    let updated = service.update(&created.id, changes).expect("updated");

    assert_eq!(updated.max_daily_interviews, Some(2));
    assert_eq!(updated.calendar_id.as_deref(), Some("cal-original"));
}

#[test]
fn recruiter_delete_requires_existing_record() {
    let harness = Harness::new();
    let service = RecruiterService::new(harness.recruiters.clone());

    assert!(matches!(
        service.delete(&RecruiterId::from("nobody")),
        Err(SchedulingError::NotFound {
            entity: "Recruiter",
            ..
        })
    ));

    let created = service.create(recruiter_draft(None)).expect("created");
    service.delete(&created.id).expect("deleted");
    assert!(service.list().expect("list").is_empty());
}

#[test]
fn vacation_requires_start_before_end() {
    let harness = Harness::new();
    let service = VacationService::new(harness.vacations.clone());

    assert!(matches!(
        service.create(vacation_draft("rec-1", 5, 5)),
        Err(SchedulingError::InvalidInput(_))
    ));
    assert!(matches!(
        service.create(vacation_draft("rec-1", 6, 5)),
        Err(SchedulingError::InvalidInput(_))
    ));
}

#[test]
fn vacations_list_by_recruiter() {
    let harness = Harness::new();
    let service = VacationService::new(harness.vacations.clone());

    let own = service
        .create(vacation_draft("rec-1", 3, 5))
        .expect("created");
    service
        .create(vacation_draft("rec-2", 10, 12))
        .expect("created");

    let listed = service
        .list_by_recruiter(&RecruiterId::from("rec-1"))
        .expect("listed");
    assert_eq!(listed, vec![own.clone()]);
    assert_eq!(service.list().expect("list").len(), 2);

    let moved = service
        .update(&own.id, vacation_draft("rec-1", 17, 19))
        .expect("updated");
    assert_eq!(moved.id, own.id);
    assert_eq!(moved.start_date, at(17, 0, 0));
}

#[test]
fn candidate_exists_tracks_lifecycle() {
    let harness = Harness::new();
    let service = CandidateService::new(harness.candidates.clone());

    let candidate = service
        .create(CandidateDraft {
            first_name: "Lee".to_string(),
            last_name: "Morgan".to_string(),
            user_id: Some("user-77".to_string()),
        })
        .expect("created");
    assert!(service.exists(&candidate.id).expect("exists"));

    service.delete(&candidate.id).expect("deleted");
    assert!(!service.exists(&candidate.id).expect("exists"));
    assert!(matches!(
        service.get(&CandidateId::from("cand-unknown")),
        Err(SchedulingError::NotFound { .. })
    ));
}
