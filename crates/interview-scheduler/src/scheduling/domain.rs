use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::validation::WorkloadPeriod;

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

identifier!(
    /// Identifier wrapper for recruiters.
    RecruiterId
);
identifier!(
    /// Identifier wrapper for interview slots.
    SlotId
);
identifier!(
    /// Identifier wrapper for recruiter vacations.
    VacationId
);
identifier!(
    /// Identifier wrapper for candidates.
    CandidateId
);
identifier!(
    /// Identifier wrapper for candidate reservations.
    ReservationId
);

/// Recruiter profile with optional interview caps. Caps that are absent or not positive are unlimited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recruiter {
    pub id: RecruiterId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub max_daily_interviews: Option<i32>,
    #[serde(default)]
    pub max_weekly_interviews: Option<i32>,
    #[serde(default)]
    pub max_monthly_interviews: Option<i32>,
    #[serde(default)]
    pub calendar_id: Option<String>,
}

impl Recruiter {
    /// Positive cap configured for the period, if any.
    pub fn cap_for(&self, period: WorkloadPeriod) -> Option<u32> {
        let raw = match period {
            WorkloadPeriod::Day => self.max_daily_interviews,
            WorkloadPeriod::Week => self.max_weekly_interviews,
            WorkloadPeriod::Month => self.max_monthly_interviews,
        };
        raw.filter(|cap| *cap > 0).map(|cap| cap as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Seniority {
    Junior,
    Mid,
    Senior,
    Lead,
}

impl Seniority {
    pub fn label(&self) -> &'static str {
        match self {
            Seniority::Junior => "JUNIOR",
            Seniority::Mid => "MID",
            Seniority::Senior => "SENIOR",
            Seniority::Lead => "LEAD",
        }
    }
}

impl fmt::Display for Seniority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown seniority '{0}' (expected JUNIOR, MID, SENIOR or LEAD)")]
pub struct UnknownSeniority(pub String);

impl FromStr for Seniority {
    type Err = UnknownSeniority;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "JUNIOR" => Ok(Seniority::Junior),
            "MID" => Ok(Seniority::Mid),
            "SENIOR" => Ok(Seniority::Senior),
            "LEAD" => Ok(Seniority::Lead),
            _ => Err(UnknownSeniority(value.to_string())),
        }
    }
}

/// Committed interview slot. `start_time..end_time` is half-open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewSlot {
    pub id: SlotId,
    pub recruiter_id: RecruiterId,
    pub category: String,
    pub seniority: Seniority,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub multi_capacity: bool,
    pub buffer_minutes: u32,
    #[serde(default)]
    pub calendar_event_id: Option<String>,
}

impl InterviewSlot {
    pub fn buffer(&self) -> Duration {
        Duration::minutes(i64::from(self.buffer_minutes))
    }

    /// Conflict window widened by the buffer on both ends. `None` when the
    /// widened window leaves the representable date range.
    pub fn buffered_bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let buffer = self.buffer();
        let start = self.start_time.checked_sub_signed(buffer)?;
        let end = self.end_time.checked_add_signed(buffer)?;
        Some((start, end))
    }

    pub fn same_time_as(&self, other: &InterviewSlot) -> bool {
        self.start_time == other.start_time && self.end_time == other.end_time
    }
}

/// Caller-supplied slot attributes for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDraft {
    pub category: String,
    pub seniority: Seniority,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    #[serde(default)]
    pub multi_capacity: bool,
    #[serde(default)]
    pub buffer_minutes: Option<i32>,
}

/// Approved or requested time off. Blocks slot placement regardless of approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vacation {
    pub id: VacationId,
    pub recruiter_id: RecruiterId,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub approved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationDraft {
    pub recruiter_id: RecruiterId,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub approved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruiterDraft {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub max_daily_interviews: Option<i32>,
    #[serde(default)]
    pub max_weekly_interviews: Option<i32>,
    #[serde(default)]
    pub max_monthly_interviews: Option<i32>,
    #[serde(default)]
    pub calendar_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDraft {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Reservation status. Unknown values are carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReservationStatus {
    Active,
    Cancelled,
    Other(String),
}

impl ReservationStatus {
    pub fn label(&self) -> &str {
        match self {
            ReservationStatus::Active => "ACTIVE",
            ReservationStatus::Cancelled => "CANCELLED",
            ReservationStatus::Other(value) => value,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ReservationStatus::Active)
    }
}

impl From<String> for ReservationStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ACTIVE" => ReservationStatus::Active,
            "CANCELLED" => ReservationStatus::Cancelled,
            _ => ReservationStatus::Other(value),
        }
    }
}

impl From<ReservationStatus> for String {
    fn from(value: ReservationStatus) -> Self {
        value.label().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateReservation {
    pub id: ReservationId,
    pub slot_id: SlotId,
    pub candidate_id: CandidateId,
    pub status: ReservationStatus,
    pub reservation_time: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequest {
    pub slot_id: SlotId,
    pub candidate_id: CandidateId,
}

/// Full overwrite used by the reservation update path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationUpdate {
    pub slot_id: SlotId,
    pub candidate_id: CandidateId,
    pub status: ReservationStatus,
    pub reservation_time: NaiveDateTime,
}
