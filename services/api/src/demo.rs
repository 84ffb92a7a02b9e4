use crate::infra::{in_memory_ports, parse_date};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::Args;
use interview_scheduler::error::AppError;
use interview_scheduler::scheduling::windows::week_window;
use interview_scheduler::scheduling::{
    CandidateDraft, InterviewSlot, RecruiterDraft, RecruiterId, ReservationRequest,
    SchedulingError, SchedulingState, Seniority, SlotDraft, VacationDraft,
};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Any date inside the demo week (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) week_of: Option<NaiveDate>,
    /// Daily interview cap for the demo recruiter.
    #[arg(long, default_value_t = 2)]
    pub(crate) daily_cap: i32,
    /// Buffer in minutes applied to every demo slot.
    #[arg(long, default_value_t = 15)]
    pub(crate) buffer_minutes: i32,
    /// Reservation topic used for published events.
    #[arg(long, default_value = "reservations")]
    pub(crate) topic: String,
}

struct DemoWeek {
    monday: NaiveDate,
}

impl DemoWeek {
    fn at(&self, day_offset: i64, hour: u32, minute: u32) -> NaiveDateTime {
        let date = self.monday + Duration::days(day_offset);
        let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
        date.and_time(time)
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let anchor = args.week_of.unwrap_or_else(|| Local::now().date_naive());
    let week = DemoWeek {
        monday: week_window(anchor).start.date(),
    };

    let (ports, publisher) = in_memory_ports();
    let state = SchedulingState::new(ports, args.topic.clone());

    println!("Interview scheduling demo");
    println!(
        "Week of {} (daily cap {}, buffer {} min)",
        week.monday, args.daily_cap, args.buffer_minutes
    );

    let recruiter = state.recruiters.create(RecruiterDraft {
        first_name: "Jordan".to_string(),
        last_name: "Blake".to_string(),
        max_daily_interviews: Some(args.daily_cap),
        max_weekly_interviews: None,
        max_monthly_interviews: None,
        calendar_id: Some("jordan.blake@calendar".to_string()),
    })?;
    println!(
        "Recruiter {} {} ({})",
        recruiter.first_name, recruiter.last_name, recruiter.id
    );

    let vacation = state.vacations.create(VacationDraft {
        recruiter_id: recruiter.id.clone(),
        start_date: week.at(2, 0, 0),
        end_date: week.at(3, 0, 0),
        reason: Some("team offsite".to_string()),
        approved: true,
    })?;
    println!(
        "Vacation {} from {} to {}",
        vacation.id, vacation.start_date, vacation.end_date
    );

    println!("\nSlot admission");
    let attempts = [
        ("Monday morning", week.at(0, 9, 0), week.at(0, 10, 0)),
        ("Inside the buffer", week.at(0, 10, 5), week.at(0, 11, 0)),
        ("After the buffer", week.at(0, 10, 30), week.at(0, 11, 30)),
        ("Monday afternoon", week.at(0, 14, 0), week.at(0, 15, 0)),
        ("During vacation", week.at(2, 10, 0), week.at(2, 11, 0)),
        ("Thursday morning", week.at(3, 10, 0), week.at(3, 11, 0)),
    ];

    let mut admitted = Vec::new();
    for (label, start, end) in attempts {
        let outcome = state
            .slots
            .create(&recruiter.id, slot_draft(start, end, args.buffer_minutes));
        if let Some(slot) = report_slot(label, outcome)? {
            admitted.push(slot);
        }
    }

    let Some(first) = admitted.first() else {
        println!("\nNo slots admitted; skipping reservations");
        return Ok(());
    };

    println!("\nReservations on {}", first.id);
    let ada = state.candidates.create(CandidateDraft {
        first_name: "Ada".to_string(),
        last_name: "Moreno".to_string(),
        user_id: None,
    })?;
    let ben = state.candidates.create(CandidateDraft {
        first_name: "Ben".to_string(),
        last_name: "Osei".to_string(),
        user_id: None,
    })?;

    let reservation = state.reservations.create(ReservationRequest {
        slot_id: first.id.clone(),
        candidate_id: ada.id.clone(),
    })?;
    println!("  [reserved] {} for {}", reservation.id, ada.id);

    match state.reservations.create(ReservationRequest {
        slot_id: first.id.clone(),
        candidate_id: ben.id.clone(),
    }) {
        Ok(second) => println!("  [reserved] {} for {}", second.id, ben.id),
        Err(SchedulingError::Admission(reason)) => {
            println!("  [rejected] {}: {}", ben.id, reason)
        }
        Err(other) => return Err(other.into()),
    }

    let cancelled = state.reservations.cancel(&reservation.id)?;
    println!("  [cancelled] {} -> {}", cancelled.id, cancelled.status.label());

    let retry = state.reservations.create(ReservationRequest {
        slot_id: first.id.clone(),
        candidate_id: ben.id.clone(),
    })?;
    println!("  [reserved] {} for {}", retry.id, ben.id);

    print_schedule(&state, &recruiter.id)?;

    let events = publisher.events();
    println!("\nPublished events ({})", events.len());
    for event in events {
        match serde_json::to_string(&event) {
            Ok(json) => println!("- {json}"),
            Err(err) => println!("- unavailable: {err}"),
        }
    }

    Ok(())
}

fn slot_draft(start: NaiveDateTime, end: NaiveDateTime, buffer_minutes: i32) -> SlotDraft {
    SlotDraft {
        category: "backend".to_string(),
        seniority: Seniority::Senior,
        start_time: start,
        end_time: end,
        multi_capacity: false,
        buffer_minutes: Some(buffer_minutes),
    }
}

fn report_slot(
    label: &str,
    outcome: Result<InterviewSlot, SchedulingError>,
) -> Result<Option<InterviewSlot>, AppError> {
    match outcome {
        Ok(slot) => {
            println!(
                "  [admitted] {label}: {} {} - {} (event {})",
                slot.id,
                slot.start_time,
                slot.end_time.time(),
                slot.calendar_event_id.as_deref().unwrap_or("none")
            );
            Ok(Some(slot))
        }
        Err(SchedulingError::Admission(reason)) => {
            println!("  [rejected] {label}: {reason}");
            Ok(None)
        }
        Err(SchedulingError::InvalidInput(reason)) => {
            println!("  [invalid] {label}: {reason}");
            Ok(None)
        }
        Err(other) => Err(other.into()),
    }
}

fn print_schedule(state: &SchedulingState, recruiter_id: &RecruiterId) -> Result<(), AppError> {
    let slots: Vec<_> = state
        .slots
        .list()?
        .into_iter()
        .filter(|slot| &slot.recruiter_id == recruiter_id)
        .collect();

    println!("\nCommitted schedule ({} slots)", slots.len());
    for slot in slots {
        println!(
            "- {} {} {} [{} - {}) buffer {}m",
            slot.id,
            slot.category,
            slot.seniority,
            slot.start_time,
            slot.end_time.time(),
            slot.buffer_minutes
        );
    }
    Ok(())
}
