use serde::Serialize;
use tracing::info;

use super::{
    HrService,
    error::{HrError, HrResult, ensure_valid},
};
use crate::model::{
    assignment::JobAssignment,
    department::{Department, NewDepartment},
    employee::{Employee, NewEmployee, ProfileUpdate},
    job::{Job, NewJob},
    leave_type::{LeaveType, NewLeaveType},
};

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeDetail {
    #[serde(flatten)]
    pub employee: Employee,
    pub current_assignment: Option<JobAssignment>,
}

fn require_text(errors: &mut Vec<String>, value: &str, field: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{} is required", field));
    }
}

fn check_email(errors: &mut Vec<String>, email: &str) {
    if email.trim().is_empty() {
        errors.push("Email is required".to_string());
    } else if !email.contains('@') {
        errors.push("Email is not valid".to_string());
    }
}

impl HrService {
    pub async fn create_department(&self, new: NewDepartment) -> HrResult<Department> {
        let mut errors = Vec::new();
        require_text(&mut errors, &new.name, "Department name");
        ensure_valid(errors)?;

        let new = NewDepartment {
            name: new.name.trim().to_string(),
        };
        let mut tx = self.store.begin().await?;
        let department = tx.insert_department(&new).await?;
        tx.commit().await?;
        info!(department_id = department.id, "Department created");
        Ok(department)
    }

    pub async fn list_departments(&self) -> HrResult<Vec<Department>> {
        let mut tx = self.store.begin().await?;
        Ok(tx.list_departments().await?)
    }

    pub async fn create_job(&self, mut new: NewJob) -> HrResult<Job> {
        let mut errors = Vec::new();
        require_text(&mut errors, &new.title, "Job title");
        ensure_valid(errors)?;
        new.title = new.title.trim().to_string();

        let mut tx = self.store.begin().await?;
        if let Some(department_id) = new.department_id {
            tx.find_department(department_id)
                .await?
                .ok_or_else(|| HrError::not_found("department", department_id))?;
        }
        let job = tx.insert_job(&new).await?;
        tx.commit().await?;
        info!(job_id = job.id, "Job created");
        Ok(job)
    }

    pub async fn get_job(&self, id: u64) -> HrResult<Job> {
        let mut tx = self.store.begin().await?;
        tx.find_job(id)
            .await?
            .ok_or_else(|| HrError::not_found("job", id))
    }

    pub async fn list_jobs(&self, active_only: bool) -> HrResult<Vec<Job>> {
        let mut tx = self.store.begin().await?;
        Ok(tx.list_jobs(active_only).await?)
    }

    pub async fn set_job_active(&self, id: u64, is_active: bool) -> HrResult<Job> {
        let mut tx = self.store.begin().await?;
        let mut job = tx
            .find_job(id)
            .await?
            .ok_or_else(|| HrError::not_found("job", id))?;
        tx.set_job_active(id, is_active).await?;
        tx.commit().await?;
        job.is_active = is_active;
        info!(job_id = id, is_active, "Job active flag changed");
        Ok(job)
    }

    pub async fn create_employee(&self, mut new: NewEmployee) -> HrResult<Employee> {
        let mut errors = Vec::new();
        require_text(&mut errors, &new.name, "Name");
        check_email(&mut errors, &new.email);
        if new.hire_date > self.today() {
            errors.push("Hire date cannot be in the future".to_string());
        }
        if new.resignation_date.is_some_and(|r| r < new.hire_date) {
            errors.push("Resignation date cannot be before hire date".to_string());
        }
        ensure_valid(errors)?;
        new.name = new.name.trim().to_string();
        new.email = new.email.trim().to_string();

        let mut tx = self.store.begin().await?;
        let employee = tx.insert_employee(&new).await?;
        tx.commit().await?;
        info!(employee_id = employee.id, "Employee created");
        Ok(employee)
    }

    pub async fn get_employee(&self, id: u64) -> HrResult<EmployeeDetail> {
        let mut tx = self.store.begin().await?;
        let employee = tx
            .find_employee(id)
            .await?
            .ok_or_else(|| HrError::not_found("employee", id))?;
        let current_assignment = tx.current_assignment(id).await?;
        Ok(EmployeeDetail {
            employee,
            current_assignment,
        })
    }

    pub async fn list_employees(&self) -> HrResult<Vec<Employee>> {
        let mut tx = self.store.begin().await?;
        Ok(tx.list_employees().await?)
    }

    /// Edits profile fields only; activity and resignation change through
    /// termination.
    pub async fn update_employee(&self, id: u64, update: ProfileUpdate) -> HrResult<Employee> {
        let mut tx = self.store.begin().await?;
        let mut employee = tx
            .lock_employee(id)
            .await?
            .ok_or_else(|| HrError::not_found("employee", id))?;
        employee.apply_profile(update);

        let mut errors = Vec::new();
        require_text(&mut errors, &employee.name, "Name");
        check_email(&mut errors, &employee.email);
        ensure_valid(errors)?;

        tx.update_employee(&employee).await?;
        tx.commit().await?;
        info!(employee_id = id, "Employee profile updated");
        Ok(employee)
    }

    pub async fn create_leave_type(&self, mut new: NewLeaveType) -> HrResult<LeaveType> {
        let mut errors = Vec::new();
        require_text(&mut errors, &new.name, "Leave type name");
        if new.annual_allocation < 0 {
            errors.push("Annual allocation cannot be negative".to_string());
        }
        if new.max_consecutive_days < 1 {
            errors.push("Maximum consecutive days must be at least 1".to_string());
        }
        if new.min_notice_days < 0 {
            errors.push("Minimum notice days cannot be negative".to_string());
        }
        ensure_valid(errors)?;
        new.name = new.name.trim().to_string();

        let mut tx = self.store.begin().await?;
        let leave_type = tx.insert_leave_type(&new).await?;
        tx.commit().await?;
        info!(leave_type_id = leave_type.id, "Leave type created");
        Ok(leave_type)
    }

    pub async fn get_leave_type(&self, id: u64) -> HrResult<LeaveType> {
        let mut tx = self.store.begin().await?;
        tx.find_leave_type(id)
            .await?
            .ok_or_else(|| HrError::not_found("leave type", id))
    }

    pub async fn list_leave_types(&self, active_only: bool) -> HrResult<Vec<LeaveType>> {
        let mut tx = self.store.begin().await?;
        Ok(tx.list_leave_types(active_only).await?)
    }

    pub async fn set_leave_type_active(&self, id: u64, is_active: bool) -> HrResult<LeaveType> {
        let mut tx = self.store.begin().await?;
        let mut leave_type = tx
            .find_leave_type(id)
            .await?
            .ok_or_else(|| HrError::not_found("leave type", id))?;
        tx.set_leave_type_active(id, is_active).await?;
        tx.commit().await?;
        leave_type.is_active = is_active;
        info!(leave_type_id = id, is_active, "Leave type active flag changed");
        Ok(leave_type)
    }
}
