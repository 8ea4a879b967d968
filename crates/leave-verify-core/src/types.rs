use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// LeaveStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    /// Anything else the backend reports (e.g. a cancellation state).
    #[serde(other)]
    Unrecognized,
}

impl LeaveStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LeaveStatus::Pending => "PENDING",
            LeaveStatus::Approved => "APPROVED",
            LeaveStatus::Rejected => "REJECTED",
            LeaveStatus::Unrecognized => "UNRECOGNIZED",
        }
    }

    /// APPROVED and REJECTED are the only states a review can end in.
    pub fn is_terminal(self) -> bool {
        matches!(self, LeaveStatus::Approved | LeaveStatus::Rejected)
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LeaveStatus {
    type Err = crate::error::VerifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(LeaveStatus::Pending),
            "APPROVED" => Ok(LeaveStatus::Approved),
            "REJECTED" => Ok(LeaveStatus::Rejected),
            _ => Err(crate::error::VerifyError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// A reviewer's verdict. Only the two terminal statuses can be requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub fn target_status(self) -> LeaveStatus {
        match self {
            Decision::Approved => LeaveStatus::Approved,
            Decision::Rejected => LeaveStatus::Rejected,
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            Decision::Approved => "approve",
            Decision::Rejected => "reject",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.target_status().as_str())
    }
}

// ---------------------------------------------------------------------------
// LeaveId
// ---------------------------------------------------------------------------

/// Server-assigned identifier of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeaveId(pub i64);

impl fmt::Display for LeaveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// LeaveApplication (request body)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveApplication {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

impl LeaveApplication {
    /// Tomorrow through the day after tomorrow.
    pub fn upcoming(today: NaiveDate, reason: impl Into<String>) -> Self {
        Self {
            start_date: offset_forward(today, 1),
            end_date: offset_forward(today, 2),
            reason: reason.into(),
        }
    }

    /// A single day two days in the past.
    pub fn backdated(today: NaiveDate, reason: impl Into<String>) -> Self {
        let day = today.checked_sub_days(Days::new(2)).unwrap_or(NaiveDate::MIN);
        Self {
            start_date: day,
            end_date: day,
            reason: reason.into(),
        }
    }

    /// Future range whose start falls after its end.
    pub fn inverted(today: NaiveDate, reason: impl Into<String>) -> Self {
        Self {
            start_date: offset_forward(today, 3),
            end_date: offset_forward(today, 1),
            reason: reason.into(),
        }
    }
}

fn offset_forward(day: NaiveDate, n: u64) -> NaiveDate {
    day.checked_add_days(Days::new(n)).unwrap_or(NaiveDate::MAX)
}

// ---------------------------------------------------------------------------
// LeaveRecord (wire shape returned by the backend)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveOwner {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRecord {
    pub id: LeaveId,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub reason: Option<String>,
    pub status: LeaveStatus,
    #[serde(default)]
    pub user: Option<LeaveOwner>,
}

// ---------------------------------------------------------------------------
// LeaveRequest (tracked locally)
// ---------------------------------------------------------------------------

/// A leave request this run submitted, tied to the actor who submitted it.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveRequest {
    pub id: LeaveId,
    pub actor: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: LeaveStatus,
}

impl LeaveRequest {
    /// Combine what was sent with what the backend echoed back. The sent
    /// values win where the backend omits a field.
    pub fn from_record(actor: &str, sent: &LeaveApplication, record: LeaveRecord) -> Self {
        Self {
            id: record.id,
            actor: actor.to_string(),
            start_date: record.start_date.unwrap_or(sent.start_date),
            end_date: record.end_date.unwrap_or(sent.end_date),
            reason: record.reason.unwrap_or_else(|| sent.reason.clone()),
            status: record.status,
        }
    }
}

// ---------------------------------------------------------------------------
// ReviewCandidate
// ---------------------------------------------------------------------------

/// A pending request as the reviewer sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewCandidate {
    pub id: LeaveId,
    pub reason: Option<String>,
    pub status: LeaveStatus,
    pub employee: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl From<LeaveRecord> for ReviewCandidate {
    fn from(record: LeaveRecord) -> Self {
        let employee = record
            .user
            .and_then(|u| u.name.or(u.email));
        Self {
            id: record.id,
            reason: record.reason,
            status: record.status,
            employee,
            start_date: record.start_date,
            end_date: record.end_date,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
