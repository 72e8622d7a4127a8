use chrono::NaiveDate;
use tracing::info;

use super::{
    HrService,
    error::{HrError, HrResult, ensure_valid},
};
use crate::{
    model::{
        assignment::{JobAssignment, NewAssignment},
        employee::Employee,
        job::Job,
    },
    store::StoreTx,
};

#[derive(Debug, Clone)]
pub struct AssignRequest {
    pub employee_id: u64,
    pub job_id: u64,
    pub manager_id: Option<u64>,
    pub salary: f64,
    /// Defaults to today.
    pub start_date: Option<NaiveDate>,
}

/// Omitted fields carry over from the current assignment.
#[derive(Debug, Clone, Default)]
pub struct TransferRequest {
    pub job_id: Option<u64>,
    pub salary: Option<f64>,
    pub manager_id: Option<u64>,
    pub effective_date: Option<NaiveDate>,
}

impl HrService {
    pub async fn assign(&self, request: AssignRequest) -> HrResult<JobAssignment> {
        let today = self.today();
        let start_date = request.start_date.unwrap_or(today);
        let mut tx = self.store.begin().await?;

        let employee = lock_employee(tx.as_mut(), request.employee_id).await?;
        let job = find_job(tx.as_mut(), request.job_id).await?;

        let mut errors = Vec::new();
        if !employee.is_active {
            errors.push("Cannot assign a job to an inactive employee".to_string());
        }
        if !job.is_active {
            errors.push(format!("Job '{}' is not active", job.title));
        }
        if tx.current_assignment(employee.id).await?.is_some() {
            errors.push(
                "Employee already has a current assignment; use transfer to change it".to_string(),
            );
        }
        if request.salary <= 0.0 {
            errors.push("Salary must be greater than zero".to_string());
        }
        if start_date < employee.hire_date {
            errors.push("Assignment cannot start before the hire date".to_string());
        }
        if start_date > today {
            errors.push("Assignment cannot start in the future".to_string());
        }
        if let Some(manager_id) = request.manager_id {
            check_manager(tx.as_mut(), &employee, manager_id, &mut errors).await?;
        }
        ensure_valid(errors)?;

        let assignment = tx
            .insert_assignment(&NewAssignment {
                employee_id: employee.id,
                job_id: job.id,
                manager_id: request.manager_id,
                salary: request.salary,
                start_date,
            })
            .await?;
        tx.commit().await?;

        info!(
            employee_id = employee.id,
            job_id = job.id,
            assignment_id = assignment.id,
            "Job assigned"
        );
        Ok(assignment)
    }

    pub async fn transfer(
        &self,
        employee_id: u64,
        request: TransferRequest,
    ) -> HrResult<JobAssignment> {
        let effective_date = request.effective_date.unwrap_or_else(|| self.today());
        let mut tx = self.store.begin().await?;

        let employee = lock_employee(tx.as_mut(), employee_id).await?;
        let current = tx
            .current_assignment(employee_id)
            .await?
            .ok_or_else(|| HrError::invalid("Employee has no current assignment"))?;

        let mut errors = Vec::new();
        if !employee.is_active {
            errors.push("Cannot transfer an inactive employee".to_string());
        }
        let job_id = match request.job_id {
            Some(job_id) => {
                let job = find_job(tx.as_mut(), job_id).await?;
                if !job.is_active {
                    errors.push(format!("Job '{}' is not active", job.title));
                }
                job_id
            }
            None => current.job_id,
        };
        let salary = request.salary.unwrap_or(current.salary);
        if salary <= 0.0 {
            errors.push("Salary must be greater than zero".to_string());
        }
        let manager_id = match request.manager_id {
            Some(manager_id) => {
                check_manager(tx.as_mut(), &employee, manager_id, &mut errors).await?;
                Some(manager_id)
            }
            None => current.manager_id,
        };
        if effective_date < current.start_date {
            errors.push(format!(
                "Transfer date cannot be before the current assignment start date ({})",
                current.start_date
            ));
        }
        ensure_valid(errors)?;

        tx.close_assignment(current.id, effective_date).await?;
        let assignment = tx
            .insert_assignment(&NewAssignment {
                employee_id,
                job_id,
                manager_id,
                salary,
                start_date: effective_date,
            })
            .await?;
        tx.commit().await?;

        info!(
            employee_id,
            from_job = current.job_id,
            to_job = job_id,
            assignment_id = assignment.id,
            %effective_date,
            "Employee transferred"
        );
        Ok(assignment)
    }

    /// Closes the current assignment. With `deactivate`, the employee is
    /// also marked inactive with `end_date` as the resignation date.
    pub async fn terminate(
        &self,
        employee_id: u64,
        end_date: Option<NaiveDate>,
        deactivate: bool,
    ) -> HrResult<JobAssignment> {
        let end_date = end_date.unwrap_or_else(|| self.today());
        let mut tx = self.store.begin().await?;

        let mut employee = lock_employee(tx.as_mut(), employee_id).await?;
        let mut current = tx
            .current_assignment(employee_id)
            .await?
            .ok_or_else(|| HrError::invalid("Employee has no current assignment"))?;
        if end_date < current.start_date {
            return Err(HrError::invalid(format!(
                "Termination date cannot be before the current assignment start date ({})",
                current.start_date
            )));
        }

        tx.close_assignment(current.id, end_date).await?;
        if deactivate {
            employee.is_active = false;
            employee.resignation_date = Some(end_date);
            tx.update_employee(&employee).await?;
        }
        tx.commit().await?;

        current.is_current = false;
        current.end_date = Some(end_date);
        info!(employee_id, %end_date, deactivate, "Employment terminated");
        Ok(current)
    }

    /// Every assignment of the employee, newest first.
    pub async fn job_history(&self, employee_id: u64) -> HrResult<Vec<JobAssignment>> {
        let mut tx = self.store.begin().await?;
        tx.find_employee(employee_id)
            .await?
            .ok_or_else(|| HrError::not_found("employee", employee_id))?;
        Ok(tx.assignment_history(employee_id).await?)
    }

    pub async fn current_assignment(&self, employee_id: u64) -> HrResult<Option<JobAssignment>> {
        let mut tx = self.store.begin().await?;
        tx.find_employee(employee_id)
            .await?
            .ok_or_else(|| HrError::not_found("employee", employee_id))?;
        Ok(tx.current_assignment(employee_id).await?)
    }

    pub async fn job_assignment_history(&self, job_id: u64) -> HrResult<Vec<JobAssignment>> {
        let mut tx = self.store.begin().await?;
        find_job(tx.as_mut(), job_id).await?;
        Ok(tx.job_assignments(job_id).await?)
    }

    /// Employees whose current assignment is `job_id`.
    pub async fn job_current_employees(&self, job_id: u64) -> HrResult<Vec<Employee>> {
        let mut tx = self.store.begin().await?;
        find_job(tx.as_mut(), job_id).await?;

        let mut employees = Vec::new();
        for assignment in tx.job_assignments(job_id).await? {
            if !assignment.is_current {
                continue;
            }
            if let Some(employee) = tx.find_employee(assignment.employee_id).await? {
                employees.push(employee);
            }
        }
        employees.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(employees)
    }
}

async fn lock_employee(tx: &mut dyn StoreTx, id: u64) -> HrResult<Employee> {
    tx.lock_employee(id)
        .await?
        .ok_or_else(|| HrError::not_found("employee", id))
}

async fn find_job(tx: &mut dyn StoreTx, id: u64) -> HrResult<Job> {
    tx.find_job(id)
        .await?
        .ok_or_else(|| HrError::not_found("job", id))
}

async fn check_manager(
    tx: &mut dyn StoreTx,
    employee: &Employee,
    manager_id: u64,
    errors: &mut Vec<String>,
) -> HrResult<()> {
    if manager_id == employee.id {
        errors.push("An employee cannot be their own manager".to_string());
        return Ok(());
    }
    match tx.find_employee(manager_id).await? {
        Some(manager) if manager.is_active => {}
        Some(_) => errors.push("Manager must be an active employee".to_string()),
        None => return Err(HrError::not_found("manager", manager_id)),
    }
    Ok(())
}
