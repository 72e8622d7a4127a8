use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString, IntoStaticStr};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl LeaveStatus {
    /// Lower-case wording used in messages.
    pub fn label(self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
            LeaveStatus::Cancelled => "cancelled",
        }
    }

    /// Pending and approved applications hold their dates; overlap checks
    /// only look at these.
    pub fn holds_dates(self) -> bool {
        matches!(self, LeaveStatus::Pending | LeaveStatus::Approved)
    }
}

/// Inclusive day count of `[start, end]`. Zero or negative when the range is
/// inverted.
pub fn requested_days(start: NaiveDate, end: NaiveDate) -> i32 {
    let days = (end - start).num_days() + 1;
    i32::try_from(days).unwrap_or(if days < 0 { i32::MIN } else { i32::MAX })
}

/// A leave request and its approval trail.
///
/// `days_requested` and `year` are derived from the dates rather than stored
/// on the struct, so every write persists values consistent with the range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveApplication {
    pub id: u64,
    pub employee_id: u64,
    pub leave_type_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: LeaveStatus,
    pub applied_on: DateTime<Utc>,
    pub validated_on: Option<DateTime<Utc>>,
    pub comments: Option<String>,
    pub rejection_reason: Option<String>,
}

impl LeaveApplication {
    pub fn days_requested(&self) -> i32 {
        requested_days(self.start_date, self.end_date)
    }

    /// Ledger year the application draws from.
    pub fn year(&self) -> i32 {
        self.start_date.year()
    }

    /// Inclusive on both ends.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && self.end_date >= start
    }

    pub fn can_be_cancelled(&self, today: NaiveDate) -> bool {
        match self.status {
            LeaveStatus::Pending => true,
            LeaveStatus::Approved => self.start_date > today,
            LeaveStatus::Rejected | LeaveStatus::Cancelled => false,
        }
    }

    /// True while the employee is actually away.
    pub fn is_ongoing(&self, today: NaiveDate) -> bool {
        self.status == LeaveStatus::Approved && self.start_date <= today && today <= self.end_date
    }
}

#[derive(Debug, Clone)]
pub struct NewLeaveApplication {
    pub employee_id: u64,
    pub leave_type_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub applied_on: DateTime<Utc>,
}

impl NewLeaveApplication {
    pub fn days_requested(&self) -> i32 {
        requested_days(self.start_date, self.end_date)
    }

    pub fn year(&self) -> i32 {
        self.start_date.year()
    }

    pub fn into_application(self, id: u64) -> LeaveApplication {
        LeaveApplication {
            id,
            employee_id: self.employee_id,
            leave_type_id: self.leave_type_id,
            start_date: self.start_date,
            end_date: self.end_date,
            reason: self.reason,
            status: LeaveStatus::Pending,
            applied_on: self.applied_on,
            validated_on: None,
            comments: None,
            rejection_reason: None,
        }
    }
}
