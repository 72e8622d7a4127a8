use chrono::NaiveDate;
use tracing::info;

use super::{
    HrService,
    eligibility::{self, Eligibility, EligibilityContext},
    error::{HrError, HrResult, ensure_valid},
    ledger,
};
use crate::{
    model::{
        employee::Employee,
        leave_application::{LeaveApplication, LeaveStatus, NewLeaveApplication},
        leave_type::LeaveType,
    },
    store::{LeaveFilter, StoreTx},
};

#[derive(Debug, Clone)]
pub struct LeaveRequest {
    pub employee_id: u64,
    pub leave_type_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

impl HrService {
    /// Runs the admission rules without recording anything.
    pub async fn check_eligibility(
        &self,
        employee_id: u64,
        leave_type_id: u64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> HrResult<Eligibility> {
        let mut tx = self.store.begin().await?;
        let employee = find_employee(tx.as_mut(), employee_id, false).await?;
        let leave_type = find_leave_type(tx.as_mut(), leave_type_id).await?;
        self.evaluate_in(tx.as_mut(), &employee, &leave_type, start_date, end_date, None)
            .await
    }

    pub async fn submit_leave(&self, request: LeaveRequest) -> HrResult<LeaveApplication> {
        let mut tx = self.store.begin().await?;
        // Locking the employee serializes submissions, so two overlapping
        // requests cannot both pass the overlap check.
        let employee = find_employee(tx.as_mut(), request.employee_id, true).await?;
        let leave_type = find_leave_type(tx.as_mut(), request.leave_type_id).await?;

        self.evaluate_in(
            tx.as_mut(),
            &employee,
            &leave_type,
            request.start_date,
            request.end_date,
            None,
        )
        .await?
        .into_result()?;

        let leave = tx
            .insert_leave(&NewLeaveApplication {
                employee_id: request.employee_id,
                leave_type_id: request.leave_type_id,
                start_date: request.start_date,
                end_date: request.end_date,
                reason: request.reason,
                applied_on: self.clock.now(),
            })
            .await?;
        tx.commit().await?;

        info!(
            leave_id = leave.id,
            employee_id = leave.employee_id,
            leave_type_id = leave.leave_type_id,
            days = leave.days_requested(),
            "Leave application submitted"
        );
        Ok(leave)
    }

    pub async fn approve_leave(
        &self,
        leave_id: u64,
        comment: Option<String>,
    ) -> HrResult<LeaveApplication> {
        let mut tx = self.store.begin().await?;
        let mut leave = lock_leave(tx.as_mut(), leave_id).await?;
        if leave.status != LeaveStatus::Pending {
            return Err(HrError::invalid("Only pending leaves can be approved"));
        }

        let leave_type = find_leave_type(tx.as_mut(), leave.leave_type_id).await?;
        let days = leave.days_requested();
        let year = leave.year();

        // The balance may have moved since submission; check again under the
        // row lock.
        let balance = ledger::lock(tx.as_mut(), leave.employee_id, &leave_type, year).await?;
        let mut violations = Vec::new();
        if leave.start_date < self.today() {
            violations.push(eligibility::Violation::PastDate);
        }
        if days > balance.balance {
            violations.push(eligibility::Violation::InsufficientBalance {
                available: balance.balance,
                requested: days,
            });
        }
        ensure_valid(
            violations
                .iter()
                .map(|v| format!("Cannot approve: {}", v))
                .collect(),
        )?;

        leave.status = LeaveStatus::Approved;
        leave.validated_on = Some(self.clock.now());
        if let Some(comment) = comment.filter(|c| !c.trim().is_empty()) {
            leave.comments = Some(comment);
        }
        tx.update_leave(&leave).await?;
        let remaining = ledger::debit(tx.as_mut(), leave.employee_id, &leave_type, year, days).await?;
        tx.commit().await?;

        info!(
            leave_id,
            employee_id = leave.employee_id,
            days,
            remaining = remaining.balance,
            "Leave application approved"
        );
        Ok(leave)
    }

    pub async fn reject_leave(
        &self,
        leave_id: u64,
        rejection_reason: &str,
    ) -> HrResult<LeaveApplication> {
        let mut tx = self.store.begin().await?;
        let mut leave = lock_leave(tx.as_mut(), leave_id).await?;

        let mut errors = Vec::new();
        if leave.status != LeaveStatus::Pending {
            errors.push("Only pending leaves can be rejected".to_string());
        }
        if rejection_reason.trim().is_empty() {
            errors.push("Rejection reason is required".to_string());
        }
        ensure_valid(errors)?;

        leave.status = LeaveStatus::Rejected;
        leave.validated_on = Some(self.clock.now());
        leave.rejection_reason = Some(rejection_reason.trim().to_string());
        tx.update_leave(&leave).await?;
        tx.commit().await?;

        info!(leave_id, employee_id = leave.employee_id, "Leave application rejected");
        Ok(leave)
    }

    pub async fn cancel_leave(
        &self,
        leave_id: u64,
        cancelled_by: Option<&str>,
    ) -> HrResult<LeaveApplication> {
        let today = self.today();
        let mut tx = self.store.begin().await?;
        let mut leave = lock_leave(tx.as_mut(), leave_id).await?;

        let previous = leave.status;
        if !previous.holds_dates() {
            return Err(HrError::invalid(
                "Only pending or approved leaves can be cancelled",
            ));
        }
        if !leave.can_be_cancelled(today) {
            return Err(HrError::invalid("Cannot cancel leave that has already started"));
        }

        leave.status = LeaveStatus::Cancelled;
        if let Some(actor) = cancelled_by.map(str::trim).filter(|a| !a.is_empty()) {
            leave.comments = Some(format!("Cancelled by {} on {}", actor, today));
        }
        tx.update_leave(&leave).await?;

        if previous == LeaveStatus::Approved {
            let leave_type = find_leave_type(tx.as_mut(), leave.leave_type_id).await?;
            ledger::credit(
                tx.as_mut(),
                leave.employee_id,
                &leave_type,
                leave.year(),
                leave.days_requested(),
            )
            .await?;
        }
        tx.commit().await?;

        info!(
            leave_id,
            employee_id = leave.employee_id,
            was = previous.label(),
            "Leave application cancelled"
        );
        Ok(leave)
    }

    /// Moves a pending application to new dates. The application is checked
    /// again as if newly submitted, ignoring its own old dates.
    pub async fn reschedule_leave(
        &self,
        leave_id: u64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: Option<String>,
    ) -> HrResult<LeaveApplication> {
        let mut tx = self.store.begin().await?;
        let mut leave = lock_leave(tx.as_mut(), leave_id).await?;
        if leave.status != LeaveStatus::Pending {
            return Err(HrError::invalid("Only pending leaves can be rescheduled"));
        }

        let employee = find_employee(tx.as_mut(), leave.employee_id, true).await?;
        let leave_type = find_leave_type(tx.as_mut(), leave.leave_type_id).await?;
        self.evaluate_in(
            tx.as_mut(),
            &employee,
            &leave_type,
            start_date,
            end_date,
            Some(leave.id),
        )
        .await?
        .into_result()?;

        leave.start_date = start_date;
        leave.end_date = end_date;
        if let Some(reason) = reason {
            leave.reason = reason;
        }
        tx.update_leave(&leave).await?;
        tx.commit().await?;

        info!(
            leave_id,
            employee_id = leave.employee_id,
            days = leave.days_requested(),
            "Leave application rescheduled"
        );
        Ok(leave)
    }

    pub async fn get_leave(&self, leave_id: u64) -> HrResult<LeaveApplication> {
        let mut tx = self.store.begin().await?;
        tx.find_leave(leave_id)
            .await?
            .ok_or_else(|| HrError::not_found("leave application", leave_id))
    }

    pub async fn list_leaves(&self, filter: LeaveFilter) -> HrResult<Vec<LeaveApplication>> {
        let mut tx = self.store.begin().await?;
        Ok(tx.list_leaves(&filter).await?)
    }

    async fn evaluate_in(
        &self,
        tx: &mut dyn StoreTx,
        employee: &Employee,
        leave_type: &LeaveType,
        start_date: NaiveDate,
        end_date: NaiveDate,
        exclude: Option<u64>,
    ) -> HrResult<Eligibility> {
        let year = chrono::Datelike::year(&start_date);
        let available = ledger::current_balance(tx, employee.id, leave_type, year).await?;
        let overlapping = tx
            .overlapping_leaves(employee.id, start_date, end_date, exclude)
            .await?;

        Ok(eligibility::evaluate(
            start_date,
            end_date,
            &EligibilityContext {
                employee,
                leave_type,
                today: self.today(),
                available,
                overlapping: &overlapping,
            },
        ))
    }
}

async fn find_employee(tx: &mut dyn StoreTx, id: u64, for_update: bool) -> HrResult<Employee> {
    let employee = if for_update {
        tx.lock_employee(id).await?
    } else {
        tx.find_employee(id).await?
    };
    employee.ok_or_else(|| HrError::not_found("employee", id))
}

async fn find_leave_type(tx: &mut dyn StoreTx, id: u64) -> HrResult<LeaveType> {
    tx.find_leave_type(id)
        .await?
        .ok_or_else(|| HrError::not_found("leave type", id))
}

async fn lock_leave(tx: &mut dyn StoreTx, id: u64) -> HrResult<LeaveApplication> {
    tx.lock_leave(id)
        .await?
        .ok_or_else(|| HrError::not_found("leave application", id))
}
