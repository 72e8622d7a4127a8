use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of an employee's job/salary history.
///
/// At most one row per employee has `is_current = true`, and a current row
/// never carries an `end_date`. The schema backs this with a unique index on a
/// generated column, so a racing second writer fails with a conflict.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobAssignment {
    pub id: u64,
    pub employee_id: u64,
    pub job_id: u64,
    pub manager_id: Option<u64>,
    pub salary: f64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_current: bool,
}

#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub employee_id: u64,
    pub job_id: u64,
    pub manager_id: Option<u64>,
    pub salary: f64,
    pub start_date: NaiveDate,
}
