use chrono::Datelike;
use serde::Serialize;
use tracing::debug;

use super::{
    HrService,
    error::{HrError, HrResult},
};
use crate::{
    model::{leave_balance::LeaveBalance, leave_type::LeaveType},
    store::StoreTx,
};

/// Remaining days without creating the row. A missing row means nothing has
/// been consumed yet.
pub async fn current_balance(
    tx: &mut dyn StoreTx,
    employee_id: u64,
    leave_type: &LeaveType,
    year: i32,
) -> HrResult<i32> {
    let stored = tx.find_balance(employee_id, leave_type.id, year).await?;
    Ok(stored.map_or(leave_type.annual_allocation, |b| b.balance))
}

/// Materializes and row-locks the balance for the rest of the transaction.
pub async fn lock(
    tx: &mut dyn StoreTx,
    employee_id: u64,
    leave_type: &LeaveType,
    year: i32,
) -> HrResult<LeaveBalance> {
    Ok(tx
        .lock_balance(employee_id, leave_type.id, year, leave_type.annual_allocation)
        .await?)
}

pub async fn debit(
    tx: &mut dyn StoreTx,
    employee_id: u64,
    leave_type: &LeaveType,
    year: i32,
    days: i32,
) -> HrResult<LeaveBalance> {
    apply(tx, employee_id, leave_type, year, -days).await
}

pub async fn credit(
    tx: &mut dyn StoreTx,
    employee_id: u64,
    leave_type: &LeaveType,
    year: i32,
    days: i32,
) -> HrResult<LeaveBalance> {
    apply(tx, employee_id, leave_type, year, days).await
}

async fn apply(
    tx: &mut dyn StoreTx,
    employee_id: u64,
    leave_type: &LeaveType,
    year: i32,
    delta: i32,
) -> HrResult<LeaveBalance> {
    lock(tx, employee_id, leave_type, year).await?;
    let balance = tx
        .adjust_balance(employee_id, leave_type.id, year, delta)
        .await?;
    debug!(
        employee_id,
        leave_type_id = leave_type.id,
        year,
        delta,
        balance = balance.balance,
        "Leave balance adjusted"
    );
    Ok(balance)
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceLine {
    pub leave_type_id: u64,
    pub leave_type: String,
    pub allocation: i32,
    pub remaining: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceSummary {
    pub employee_id: u64,
    pub year: i32,
    pub balances: Vec<BalanceLine>,
}

impl HrService {
    /// Allocation and remaining days of every active leave type.
    pub async fn balance_summary(
        &self,
        employee_id: u64,
        year: Option<i32>,
    ) -> HrResult<BalanceSummary> {
        let year = year.unwrap_or_else(|| self.today().year());
        let mut tx = self.store.begin().await?;

        tx.find_employee(employee_id)
            .await?
            .ok_or_else(|| HrError::not_found("employee", employee_id))?;

        let mut balances = Vec::new();
        for leave_type in tx.list_leave_types(true).await? {
            let remaining = current_balance(tx.as_mut(), employee_id, &leave_type, year).await?;
            balances.push(BalanceLine {
                leave_type_id: leave_type.id,
                allocation: leave_type.annual_allocation,
                leave_type: leave_type.name,
                remaining,
            });
        }

        Ok(BalanceSummary {
            employee_id,
            year,
            balances,
        })
    }
}
