//! Admission rules for a leave request.

use chrono::NaiveDate;
use derive_more::Display;
use serde::Serialize;

use super::error::{HrError, HrResult};
use crate::model::{
    employee::Employee,
    leave_application::{LeaveApplication, requested_days},
    leave_type::LeaveType,
};

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Violation {
    #[display(fmt = "Inactive employee cannot apply for leave")]
    InactiveEmployee,
    #[display(fmt = "Cannot apply for leave before joining date")]
    BeforeHireDate,
    #[display(fmt = "Cannot apply for leave after resignation date")]
    AfterResignation,
    #[display(fmt = "End date cannot be before start date")]
    EndBeforeStart,
    #[display(fmt = "Cannot apply for leave for past dates")]
    PastDate,
    #[display(fmt = "This leave type is not active")]
    InactiveLeaveType,
    #[display(fmt = "Cannot apply for more than {} consecutive days for {}", max, leave_type)]
    TooManyConsecutiveDays { max: i32, leave_type: String },
    #[display(fmt = "Minimum {} days notice required for {}", days, leave_type)]
    InsufficientNotice { days: i32, leave_type: String },
    #[display(fmt = "Insufficient leave balance. Available: {}, Requested: {}", available, requested)]
    InsufficientBalance { available: i32, requested: i32 },
    #[display(fmt = "Leave dates overlap with existing {} leave ({} to {})", status, start, end)]
    Overlap {
        status: &'static str,
        start: NaiveDate,
        end: NaiveDate,
    },
}

/// Everything `evaluate` looks at besides the requested dates.
pub struct EligibilityContext<'a> {
    pub employee: &'a Employee,
    pub leave_type: &'a LeaveType,
    pub today: NaiveDate,
    /// Remaining ledger balance for the leave type in the start date's year.
    pub available: i32,
    /// Pending or approved applications of the employee that intersect the
    /// requested range, earliest first.
    pub overlapping: &'a [LeaveApplication],
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Eligibility {
    pub violations: Vec<Violation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EligibilityReport {
    pub admissible: bool,
    pub violations: Vec<String>,
}

impl Eligibility {
    pub fn is_admissible(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }

    pub fn report(&self) -> EligibilityReport {
        EligibilityReport {
            admissible: self.is_admissible(),
            violations: self.messages(),
        }
    }

    pub fn into_result(self) -> HrResult<()> {
        if self.is_admissible() {
            Ok(())
        } else {
            Err(HrError::Validation(self.messages()))
        }
    }
}

pub fn evaluate(start: NaiveDate, end: NaiveDate, ctx: &EligibilityContext<'_>) -> Eligibility {
    let EligibilityContext {
        employee,
        leave_type,
        today,
        available,
        overlapping,
    } = *ctx;
    let mut violations = Vec::new();

    if !employee.is_active {
        violations.push(Violation::InactiveEmployee);
    }

    if start < employee.hire_date {
        violations.push(Violation::BeforeHireDate);
    }
    if employee.resignation_date.is_some_and(|resigned| start > resigned) {
        violations.push(Violation::AfterResignation);
    }

    if end < start {
        violations.push(Violation::EndBeforeStart);
    }

    if start < today {
        violations.push(Violation::PastDate);
    }

    if !leave_type.is_active {
        violations.push(Violation::InactiveLeaveType);
    }

    let requested = requested_days(start, end);
    if requested > leave_type.max_consecutive_days {
        violations.push(Violation::TooManyConsecutiveDays {
            max: leave_type.max_consecutive_days,
            leave_type: leave_type.name.clone(),
        });
    }

    let notice = (start - today).num_days();
    if notice < i64::from(leave_type.min_notice_days) {
        violations.push(Violation::InsufficientNotice {
            days: leave_type.min_notice_days,
            leave_type: leave_type.name.clone(),
        });
    }

    if requested > available {
        violations.push(Violation::InsufficientBalance {
            available,
            requested,
        });
    }

    if let Some(clash) = overlapping.first() {
        violations.push(Violation::Overlap {
            status: clash.status.label(),
            start: clash.start_date,
            end: clash.end_date,
        });
    }

    Eligibility { violations }
}
