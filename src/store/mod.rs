use async_trait::async_trait;
use chrono::NaiveDate;

use crate::model::{
    assignment::{JobAssignment, NewAssignment},
    department::{Department, NewDepartment},
    employee::{Employee, NewEmployee},
    job::{Job, NewJob},
    leave_application::{LeaveApplication, LeaveStatus, NewLeaveApplication},
    leave_balance::LeaveBalance,
    leave_type::{LeaveType, NewLeaveType},
};

#[cfg(test)]
pub mod memory;
mod mysql;

pub use mysql::MySqlStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness or referential constraint rejected the write.
    #[error("constraint violated: {0}")]
    Conflict(String),
    #[error("unexpected stored value: {0}")]
    Corrupt(String),
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            // MySQL reports duplicate keys and FK failures as SQLSTATE 23000
            if db_err.code().as_deref() == Some("23000") {
                return StoreError::Conflict(db_err.message().to_string());
            }
        }
        StoreError::Database(e)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LeaveFilter {
    pub employee_id: Option<u64>,
    pub status: Option<LeaveStatus>,
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, StoreError>;
}

/// One unit of work against the HR tables.
///
/// `lock_*` reads hold a row lock until the transaction ends; plain `find_*`
/// reads do not.
#[async_trait]
pub trait StoreTx: Send {
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    async fn insert_department(&mut self, new: &NewDepartment) -> Result<Department, StoreError>;
    async fn find_department(&mut self, id: u64) -> Result<Option<Department>, StoreError>;
    async fn list_departments(&mut self) -> Result<Vec<Department>, StoreError>;

    async fn insert_job(&mut self, new: &NewJob) -> Result<Job, StoreError>;
    async fn find_job(&mut self, id: u64) -> Result<Option<Job>, StoreError>;
    async fn list_jobs(&mut self, active_only: bool) -> Result<Vec<Job>, StoreError>;
    async fn set_job_active(&mut self, id: u64, is_active: bool) -> Result<(), StoreError>;

    async fn insert_employee(&mut self, new: &NewEmployee) -> Result<Employee, StoreError>;
    async fn find_employee(&mut self, id: u64) -> Result<Option<Employee>, StoreError>;
    async fn lock_employee(&mut self, id: u64) -> Result<Option<Employee>, StoreError>;
    async fn list_employees(&mut self) -> Result<Vec<Employee>, StoreError>;
    async fn update_employee(&mut self, employee: &Employee) -> Result<(), StoreError>;

    async fn current_assignment(
        &mut self,
        employee_id: u64,
    ) -> Result<Option<JobAssignment>, StoreError>;
    /// Inserts a current assignment. Fails with [`StoreError::Conflict`] when
    /// the employee already has one.
    async fn insert_assignment(&mut self, new: &NewAssignment)
    -> Result<JobAssignment, StoreError>;
    async fn close_assignment(&mut self, id: u64, end_date: NaiveDate) -> Result<(), StoreError>;
    /// Newest start date first.
    async fn assignment_history(
        &mut self,
        employee_id: u64,
    ) -> Result<Vec<JobAssignment>, StoreError>;
    /// Every assignment to `job_id`, newest start date first.
    async fn job_assignments(&mut self, job_id: u64) -> Result<Vec<JobAssignment>, StoreError>;

    async fn insert_leave_type(&mut self, new: &NewLeaveType) -> Result<LeaveType, StoreError>;
    async fn find_leave_type(&mut self, id: u64) -> Result<Option<LeaveType>, StoreError>;
    async fn list_leave_types(&mut self, active_only: bool) -> Result<Vec<LeaveType>, StoreError>;
    async fn set_leave_type_active(&mut self, id: u64, is_active: bool)
    -> Result<(), StoreError>;

    async fn insert_leave(
        &mut self,
        new: &NewLeaveApplication,
    ) -> Result<LeaveApplication, StoreError>;
    async fn find_leave(&mut self, id: u64) -> Result<Option<LeaveApplication>, StoreError>;
    async fn lock_leave(&mut self, id: u64) -> Result<Option<LeaveApplication>, StoreError>;
    /// Newest application first.
    async fn list_leaves(&mut self, filter: &LeaveFilter)
    -> Result<Vec<LeaveApplication>, StoreError>;
    /// Pending or approved applications of `employee_id` intersecting
    /// `[start, end]`, earliest first.
    async fn overlapping_leaves(
        &mut self,
        employee_id: u64,
        start: NaiveDate,
        end: NaiveDate,
        exclude: Option<u64>,
    ) -> Result<Vec<LeaveApplication>, StoreError>;
    async fn update_leave(&mut self, leave: &LeaveApplication) -> Result<(), StoreError>;

    async fn find_balance(
        &mut self,
        employee_id: u64,
        leave_type_id: u64,
        year: i32,
    ) -> Result<Option<LeaveBalance>, StoreError>;
    /// Creates the balance row seeded with `seed` if it is missing, then
    /// locks it.
    async fn lock_balance(
        &mut self,
        employee_id: u64,
        leave_type_id: u64,
        year: i32,
        seed: i32,
    ) -> Result<LeaveBalance, StoreError>;
    /// Applies `delta` to an existing balance row inside the store.
    async fn adjust_balance(
        &mut self,
        employee_id: u64,
        leave_type_id: u64,
        year: i32,
        delta: i32,
    ) -> Result<LeaveBalance, StoreError>;
}
