use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{LeaveFilter, Store, StoreError, StoreTx};
use crate::model::{
    assignment::{JobAssignment, NewAssignment},
    department::{Department, NewDepartment},
    employee::{Employee, NewEmployee},
    job::{Job, NewJob},
    leave_application::{LeaveApplication, NewLeaveApplication},
    leave_balance::LeaveBalance,
    leave_type::{LeaveType, NewLeaveType},
};

#[derive(Debug, Clone, Default)]
pub struct State {
    next_id: u64,
    pub departments: BTreeMap<u64, Department>,
    pub jobs: BTreeMap<u64, Job>,
    pub employees: BTreeMap<u64, Employee>,
    pub assignments: BTreeMap<u64, JobAssignment>,
    pub leave_types: BTreeMap<u64, LeaveType>,
    pub leaves: BTreeMap<u64, LeaveApplication>,
    pub balances: BTreeMap<(u64, u64, i32), LeaveBalance>,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed state, for assertions.
    pub async fn snapshot(&self) -> State {
        self.state.lock().await.clone()
    }

    pub async fn balance(&self, employee_id: u64, leave_type_id: u64, year: i32) -> Option<i32> {
        self.state
            .lock()
            .await
            .balances
            .get(&(employee_id, leave_type_id, year))
            .map(|b| b.balance)
    }

    pub async fn current_assignments(&self, employee_id: u64) -> usize {
        self.state
            .lock()
            .await
            .assignments
            .values()
            .filter(|a| a.employee_id == employee_id && a.is_current)
            .count()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, StoreError> {
        let guard = self.state.clone().lock_owned().await;
        let work = guard.clone();
        Ok(Box::new(MemoryTx { guard, work }))
    }
}

struct MemoryTx {
    guard: OwnedMutexGuard<State>,
    work: State,
}

fn missing(what: &str, id: u64) -> StoreError {
    StoreError::Corrupt(format!("{} {} does not exist", what, id))
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryTx { mut guard, work } = *self;
        *guard = work;
        Ok(())
    }

    async fn insert_department(&mut self, new: &NewDepartment) -> Result<Department, StoreError> {
        if self.work.departments.values().any(|d| d.name == new.name) {
            return Err(StoreError::Conflict(format!("duplicate department '{}'", new.name)));
        }
        let department = Department {
            id: self.work.next_id(),
            name: new.name.clone(),
        };
        self.work.departments.insert(department.id, department.clone());
        Ok(department)
    }

    async fn find_department(&mut self, id: u64) -> Result<Option<Department>, StoreError> {
        Ok(self.work.departments.get(&id).cloned())
    }

    async fn list_departments(&mut self) -> Result<Vec<Department>, StoreError> {
        let mut departments: Vec<_> = self.work.departments.values().cloned().collect();
        departments.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(departments)
    }

    async fn insert_job(&mut self, new: &NewJob) -> Result<Job, StoreError> {
        if self.work.jobs.values().any(|j| j.title == new.title) {
            return Err(StoreError::Conflict(format!("duplicate job '{}'", new.title)));
        }
        let job = Job {
            id: self.work.next_id(),
            title: new.title.clone(),
            department_id: new.department_id,
            description: new.description.clone(),
            is_active: new.is_active,
        };
        self.work.jobs.insert(job.id, job.clone());
        Ok(job)
    }

    async fn find_job(&mut self, id: u64) -> Result<Option<Job>, StoreError> {
        Ok(self.work.jobs.get(&id).cloned())
    }

    async fn list_jobs(&mut self, active_only: bool) -> Result<Vec<Job>, StoreError> {
        let mut jobs: Vec<_> = self
            .work
            .jobs
            .values()
            .filter(|j| !active_only || j.is_active)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(jobs)
    }

    async fn set_job_active(&mut self, id: u64, is_active: bool) -> Result<(), StoreError> {
        let job = self.work.jobs.get_mut(&id).ok_or_else(|| missing("job", id))?;
        job.is_active = is_active;
        Ok(())
    }

    async fn insert_employee(&mut self, new: &NewEmployee) -> Result<Employee, StoreError> {
        if self.work.employees.values().any(|e| e.email == new.email) {
            return Err(StoreError::Conflict(format!("duplicate email '{}'", new.email)));
        }
        let employee = Employee {
            id: self.work.next_id(),
            name: new.name.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            education: new.education.clone(),
            hire_date: new.hire_date,
            resignation_date: new.resignation_date,
            is_active: true,
        };
        self.work.employees.insert(employee.id, employee.clone());
        Ok(employee)
    }

    async fn find_employee(&mut self, id: u64) -> Result<Option<Employee>, StoreError> {
        Ok(self.work.employees.get(&id).cloned())
    }

    async fn lock_employee(&mut self, id: u64) -> Result<Option<Employee>, StoreError> {
        self.find_employee(id).await
    }

    async fn list_employees(&mut self) -> Result<Vec<Employee>, StoreError> {
        let mut employees: Vec<_> = self.work.employees.values().cloned().collect();
        employees.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(employees)
    }

    async fn update_employee(&mut self, employee: &Employee) -> Result<(), StoreError> {
        if self
            .work
            .employees
            .values()
            .any(|e| e.id != employee.id && e.email == employee.email)
        {
            return Err(StoreError::Conflict(format!("duplicate email '{}'", employee.email)));
        }
        let stored = self
            .work
            .employees
            .get_mut(&employee.id)
            .ok_or_else(|| missing("employee", employee.id))?;
        *stored = employee.clone();
        Ok(())
    }

    async fn current_assignment(
        &mut self,
        employee_id: u64,
    ) -> Result<Option<JobAssignment>, StoreError> {
        Ok(self
            .work
            .assignments
            .values()
            .find(|a| a.employee_id == employee_id && a.is_current)
            .cloned())
    }

    async fn insert_assignment(
        &mut self,
        new: &NewAssignment,
    ) -> Result<JobAssignment, StoreError> {
        if self
            .work
            .assignments
            .values()
            .any(|a| a.employee_id == new.employee_id && a.is_current)
        {
            return Err(StoreError::Conflict(format!(
                "employee {} already has a current assignment",
                new.employee_id
            )));
        }
        let assignment = JobAssignment {
            id: self.work.next_id(),
            employee_id: new.employee_id,
            job_id: new.job_id,
            manager_id: new.manager_id,
            salary: new.salary,
            start_date: new.start_date,
            end_date: None,
            is_current: true,
        };
        self.work.assignments.insert(assignment.id, assignment.clone());
        Ok(assignment)
    }

    async fn close_assignment(&mut self, id: u64, end_date: NaiveDate) -> Result<(), StoreError> {
        let assignment = self
            .work
            .assignments
            .get_mut(&id)
            .ok_or_else(|| missing("assignment", id))?;
        assignment.is_current = false;
        assignment.end_date = Some(end_date);
        Ok(())
    }

    async fn assignment_history(
        &mut self,
        employee_id: u64,
    ) -> Result<Vec<JobAssignment>, StoreError> {
        let mut history: Vec<_> = self
            .work
            .assignments
            .values()
            .filter(|a| a.employee_id == employee_id)
            .cloned()
            .collect();
        history.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(b.id.cmp(&a.id)));
        Ok(history)
    }

    async fn job_assignments(&mut self, job_id: u64) -> Result<Vec<JobAssignment>, StoreError> {
        let mut assignments: Vec<_> = self
            .work
            .assignments
            .values()
            .filter(|a| a.job_id == job_id)
            .cloned()
            .collect();
        assignments.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(b.id.cmp(&a.id)));
        Ok(assignments)
    }

    async fn insert_leave_type(&mut self, new: &NewLeaveType) -> Result<LeaveType, StoreError> {
        if self.work.leave_types.values().any(|t| t.name == new.name) {
            return Err(StoreError::Conflict(format!("duplicate leave type '{}'", new.name)));
        }
        let leave_type = LeaveType {
            id: self.work.next_id(),
            name: new.name.clone(),
            annual_allocation: new.annual_allocation,
            max_consecutive_days: new.max_consecutive_days,
            min_notice_days: new.min_notice_days,
            carry_forward: new.carry_forward,
            is_active: new.is_active,
        };
        self.work.leave_types.insert(leave_type.id, leave_type.clone());
        Ok(leave_type)
    }

    async fn find_leave_type(&mut self, id: u64) -> Result<Option<LeaveType>, StoreError> {
        Ok(self.work.leave_types.get(&id).cloned())
    }

    async fn list_leave_types(&mut self, active_only: bool) -> Result<Vec<LeaveType>, StoreError> {
        let mut leave_types: Vec<_> = self
            .work
            .leave_types
            .values()
            .filter(|t| !active_only || t.is_active)
            .cloned()
            .collect();
        leave_types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(leave_types)
    }

    async fn set_leave_type_active(
        &mut self,
        id: u64,
        is_active: bool,
    ) -> Result<(), StoreError> {
        let leave_type = self
            .work
            .leave_types
            .get_mut(&id)
            .ok_or_else(|| missing("leave type", id))?;
        leave_type.is_active = is_active;
        Ok(())
    }

    async fn insert_leave(
        &mut self,
        new: &NewLeaveApplication,
    ) -> Result<LeaveApplication, StoreError> {
        let leave = new.clone().into_application(self.work.next_id());
        self.work.leaves.insert(leave.id, leave.clone());
        Ok(leave)
    }

    async fn find_leave(&mut self, id: u64) -> Result<Option<LeaveApplication>, StoreError> {
        Ok(self.work.leaves.get(&id).cloned())
    }

    async fn lock_leave(&mut self, id: u64) -> Result<Option<LeaveApplication>, StoreError> {
        self.find_leave(id).await
    }

    async fn list_leaves(
        &mut self,
        filter: &LeaveFilter,
    ) -> Result<Vec<LeaveApplication>, StoreError> {
        let mut leaves: Vec<_> = self
            .work
            .leaves
            .values()
            .filter(|l| filter.employee_id.is_none_or(|id| l.employee_id == id))
            .filter(|l| filter.status.is_none_or(|s| l.status == s))
            .cloned()
            .collect();
        leaves.sort_by(|a, b| b.applied_on.cmp(&a.applied_on).then(b.id.cmp(&a.id)));
        Ok(leaves)
    }

    async fn overlapping_leaves(
        &mut self,
        employee_id: u64,
        start: NaiveDate,
        end: NaiveDate,
        exclude: Option<u64>,
    ) -> Result<Vec<LeaveApplication>, StoreError> {
        let mut leaves: Vec<_> = self
            .work
            .leaves
            .values()
            .filter(|l| l.employee_id == employee_id && Some(l.id) != exclude)
            .filter(|l| l.status.holds_dates() && l.overlaps(start, end))
            .cloned()
            .collect();
        leaves.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.id.cmp(&b.id)));
        Ok(leaves)
    }

    async fn update_leave(&mut self, leave: &LeaveApplication) -> Result<(), StoreError> {
        let stored = self
            .work
            .leaves
            .get_mut(&leave.id)
            .ok_or_else(|| missing("leave", leave.id))?;
        *stored = leave.clone();
        Ok(())
    }

    async fn find_balance(
        &mut self,
        employee_id: u64,
        leave_type_id: u64,
        year: i32,
    ) -> Result<Option<LeaveBalance>, StoreError> {
        Ok(self
            .work
            .balances
            .get(&(employee_id, leave_type_id, year))
            .cloned())
    }

    async fn lock_balance(
        &mut self,
        employee_id: u64,
        leave_type_id: u64,
        year: i32,
        seed: i32,
    ) -> Result<LeaveBalance, StoreError> {
        Ok(self
            .work
            .balances
            .entry((employee_id, leave_type_id, year))
            .or_insert_with(|| LeaveBalance {
                employee_id,
                leave_type_id,
                year,
                balance: seed,
            })
            .clone())
    }

    async fn adjust_balance(
        &mut self,
        employee_id: u64,
        leave_type_id: u64,
        year: i32,
        delta: i32,
    ) -> Result<LeaveBalance, StoreError> {
        let balance = self
            .work
            .balances
            .get_mut(&(employee_id, leave_type_id, year))
            .ok_or_else(|| {
                StoreError::Corrupt(format!(
                    "no balance row for employee {} / leave type {} / {}",
                    employee_id, leave_type_id, year
                ))
            })?;
        balance.balance += delta;
        Ok(balance.clone())
    }
}
