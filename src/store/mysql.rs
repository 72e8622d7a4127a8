use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{MySql, MySqlPool, Transaction};

use super::{LeaveFilter, Store, StoreError, StoreTx};
use crate::model::{
    assignment::{JobAssignment, NewAssignment},
    department::{Department, NewDepartment},
    employee::{Employee, NewEmployee},
    job::{Job, NewJob},
    leave_application::{LeaveApplication, LeaveStatus, NewLeaveApplication},
    leave_balance::LeaveBalance,
    leave_type::{LeaveType, NewLeaveType},
};

const EMPLOYEE_COLUMNS: &str =
    "id, name, email, phone, education, hire_date, resignation_date, is_active";
const JOB_COLUMNS: &str = "id, title, department_id, description, is_active";
const ASSIGNMENT_COLUMNS: &str =
    "id, employee_id, job_id, manager_id, salary, start_date, end_date, is_current";
const LEAVE_TYPE_COLUMNS: &str = "id, name, annual_allocation, max_consecutive_days, \
     min_notice_days, carry_forward, is_active";
const LEAVE_COLUMNS: &str = "id, employee_id, leave_type_id, start_date, end_date, reason, \
     status, applied_on, validated_on, comments, rejection_reason";
const BALANCE_COLUMNS: &str = "employee_id, leave_type_id, year, balance";

/// MySQL-backed store.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for MySqlStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(MySqlTx { tx }))
    }
}

struct MySqlTx {
    tx: Transaction<'static, MySql>,
}

// Status is stored as text; parsed on the way out.
#[derive(sqlx::FromRow)]
struct LeaveRow {
    id: u64,
    employee_id: u64,
    leave_type_id: u64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    reason: String,
    status: String,
    applied_on: DateTime<Utc>,
    validated_on: Option<DateTime<Utc>>,
    comments: Option<String>,
    rejection_reason: Option<String>,
}

impl TryFrom<LeaveRow> for LeaveApplication {
    type Error = StoreError;

    fn try_from(row: LeaveRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<LeaveStatus>().map_err(|_| {
            StoreError::Corrupt(format!("leave {} has status '{}'", row.id, row.status))
        })?;

        Ok(LeaveApplication {
            id: row.id,
            employee_id: row.employee_id,
            leave_type_id: row.leave_type_id,
            start_date: row.start_date,
            end_date: row.end_date,
            reason: row.reason,
            status,
            applied_on: row.applied_on,
            validated_on: row.validated_on,
            comments: row.comments,
            rejection_reason: row.rejection_reason,
        })
    }
}

fn into_leaves(rows: Vec<LeaveRow>) -> Result<Vec<LeaveApplication>, StoreError> {
    rows.into_iter().map(LeaveApplication::try_from).collect()
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Str(&'static str),
}

impl MySqlTx {
    async fn employee_by_id(
        &mut self,
        id: u64,
        for_update: bool,
    ) -> Result<Option<Employee>, StoreError> {
        let sql = format!(
            "SELECT {} FROM employees WHERE id = ?{}",
            EMPLOYEE_COLUMNS,
            if for_update { " FOR UPDATE" } else { "" }
        );
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(employee)
    }

    async fn leave_by_id(
        &mut self,
        id: u64,
        for_update: bool,
    ) -> Result<Option<LeaveApplication>, StoreError> {
        let sql = format!(
            "SELECT {} FROM leave_applications WHERE id = ?{}",
            LEAVE_COLUMNS,
            if for_update { " FOR UPDATE" } else { "" }
        );
        sqlx::query_as::<_, LeaveRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?
            .map(LeaveApplication::try_from)
            .transpose()
    }

    async fn balance_row(
        &mut self,
        employee_id: u64,
        leave_type_id: u64,
        year: i32,
        for_update: bool,
    ) -> Result<Option<LeaveBalance>, StoreError> {
        let sql = format!(
            "SELECT {} FROM leave_balances \
             WHERE employee_id = ? AND leave_type_id = ? AND year = ?{}",
            BALANCE_COLUMNS,
            if for_update { " FOR UPDATE" } else { "" }
        );
        let balance = sqlx::query_as::<_, LeaveBalance>(&sql)
            .bind(employee_id)
            .bind(leave_type_id)
            .bind(year)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(balance)
    }
}

#[async_trait]
impl StoreTx for MySqlTx {
    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MySqlTx { tx } = *self;
        tx.commit().await?;
        Ok(())
    }

    async fn insert_department(&mut self, new: &NewDepartment) -> Result<Department, StoreError> {
        let result = sqlx::query("INSERT INTO departments (name) VALUES (?)")
            .bind(&new.name)
            .execute(&mut *self.tx)
            .await?;

        Ok(Department {
            id: result.last_insert_id(),
            name: new.name.clone(),
        })
    }

    async fn find_department(&mut self, id: u64) -> Result<Option<Department>, StoreError> {
        let department =
            sqlx::query_as::<_, Department>("SELECT id, name FROM departments WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *self.tx)
                .await?;
        Ok(department)
    }

    async fn list_departments(&mut self) -> Result<Vec<Department>, StoreError> {
        let departments =
            sqlx::query_as::<_, Department>("SELECT id, name FROM departments ORDER BY name")
                .fetch_all(&mut *self.tx)
                .await?;
        Ok(departments)
    }

    async fn insert_job(&mut self, new: &NewJob) -> Result<Job, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO jobs (title, department_id, description, is_active)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&new.title)
        .bind(new.department_id)
        .bind(&new.description)
        .bind(new.is_active)
        .execute(&mut *self.tx)
        .await?;

        Ok(Job {
            id: result.last_insert_id(),
            title: new.title.clone(),
            department_id: new.department_id,
            description: new.description.clone(),
            is_active: new.is_active,
        })
    }

    async fn find_job(&mut self, id: u64) -> Result<Option<Job>, StoreError> {
        let sql = format!("SELECT {} FROM jobs WHERE id = ?", JOB_COLUMNS);
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(job)
    }

    async fn list_jobs(&mut self, active_only: bool) -> Result<Vec<Job>, StoreError> {
        let sql = format!(
            "SELECT {} FROM jobs{} ORDER BY title",
            JOB_COLUMNS,
            if active_only { " WHERE is_active" } else { "" }
        );
        let jobs = sqlx::query_as::<_, Job>(&sql)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(jobs)
    }

    async fn set_job_active(&mut self, id: u64, is_active: bool) -> Result<(), StoreError> {
        sqlx::query("UPDATE jobs SET is_active = ? WHERE id = ?")
            .bind(is_active)
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn insert_employee(&mut self, new: &NewEmployee) -> Result<Employee, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO employees
            (name, email, phone, education, hire_date, resignation_date, is_active)
            VALUES (?, ?, ?, ?, ?, ?, TRUE)
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.education)
        .bind(new.hire_date)
        .bind(new.resignation_date)
        .execute(&mut *self.tx)
        .await?;

        Ok(Employee {
            id: result.last_insert_id(),
            name: new.name.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            education: new.education.clone(),
            hire_date: new.hire_date,
            resignation_date: new.resignation_date,
            is_active: true,
        })
    }

    async fn find_employee(&mut self, id: u64) -> Result<Option<Employee>, StoreError> {
        self.employee_by_id(id, false).await
    }

    async fn lock_employee(&mut self, id: u64) -> Result<Option<Employee>, StoreError> {
        self.employee_by_id(id, true).await
    }

    async fn list_employees(&mut self) -> Result<Vec<Employee>, StoreError> {
        let sql = format!("SELECT {} FROM employees ORDER BY name", EMPLOYEE_COLUMNS);
        let employees = sqlx::query_as::<_, Employee>(&sql)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(employees)
    }

    async fn update_employee(&mut self, employee: &Employee) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE employees
            SET name = ?, email = ?, phone = ?, education = ?,
                resignation_date = ?, is_active = ?
            WHERE id = ?
            "#,
        )
        .bind(&employee.name)
        .bind(&employee.email)
        .bind(&employee.phone)
        .bind(&employee.education)
        .bind(employee.resignation_date)
        .bind(employee.is_active)
        .bind(employee.id)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn current_assignment(
        &mut self,
        employee_id: u64,
    ) -> Result<Option<JobAssignment>, StoreError> {
        let sql = format!(
            "SELECT {} FROM job_assignments WHERE employee_id = ? AND is_current",
            ASSIGNMENT_COLUMNS
        );
        let assignment = sqlx::query_as::<_, JobAssignment>(&sql)
            .bind(employee_id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(assignment)
    }

    async fn insert_assignment(
        &mut self,
        new: &NewAssignment,
    ) -> Result<JobAssignment, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO job_assignments
            (employee_id, job_id, manager_id, salary, start_date, is_current)
            VALUES (?, ?, ?, ?, ?, TRUE)
            "#,
        )
        .bind(new.employee_id)
        .bind(new.job_id)
        .bind(new.manager_id)
        .bind(new.salary)
        .bind(new.start_date)
        .execute(&mut *self.tx)
        .await?;

        Ok(JobAssignment {
            id: result.last_insert_id(),
            employee_id: new.employee_id,
            job_id: new.job_id,
            manager_id: new.manager_id,
            salary: new.salary,
            start_date: new.start_date,
            end_date: None,
            is_current: true,
        })
    }

    async fn close_assignment(&mut self, id: u64, end_date: NaiveDate) -> Result<(), StoreError> {
        sqlx::query("UPDATE job_assignments SET is_current = FALSE, end_date = ? WHERE id = ?")
            .bind(end_date)
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn assignment_history(
        &mut self,
        employee_id: u64,
    ) -> Result<Vec<JobAssignment>, StoreError> {
        let sql = format!(
            "SELECT {} FROM job_assignments WHERE employee_id = ? ORDER BY start_date DESC, id DESC",
            ASSIGNMENT_COLUMNS
        );
        let history = sqlx::query_as::<_, JobAssignment>(&sql)
            .bind(employee_id)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(history)
    }

    async fn job_assignments(&mut self, job_id: u64) -> Result<Vec<JobAssignment>, StoreError> {
        let sql = format!(
            "SELECT {} FROM job_assignments WHERE job_id = ? ORDER BY start_date DESC, id DESC",
            ASSIGNMENT_COLUMNS
        );
        let assignments = sqlx::query_as::<_, JobAssignment>(&sql)
            .bind(job_id)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(assignments)
    }

    async fn insert_leave_type(&mut self, new: &NewLeaveType) -> Result<LeaveType, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO leave_types
            (name, annual_allocation, max_consecutive_days, min_notice_days, carry_forward, is_active)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.name)
        .bind(new.annual_allocation)
        .bind(new.max_consecutive_days)
        .bind(new.min_notice_days)
        .bind(new.carry_forward)
        .bind(new.is_active)
        .execute(&mut *self.tx)
        .await?;

        Ok(LeaveType {
            id: result.last_insert_id(),
            name: new.name.clone(),
            annual_allocation: new.annual_allocation,
            max_consecutive_days: new.max_consecutive_days,
            min_notice_days: new.min_notice_days,
            carry_forward: new.carry_forward,
            is_active: new.is_active,
        })
    }

    async fn find_leave_type(&mut self, id: u64) -> Result<Option<LeaveType>, StoreError> {
        let sql = format!("SELECT {} FROM leave_types WHERE id = ?", LEAVE_TYPE_COLUMNS);
        let leave_type = sqlx::query_as::<_, LeaveType>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(leave_type)
    }

    async fn list_leave_types(&mut self, active_only: bool) -> Result<Vec<LeaveType>, StoreError> {
        let sql = format!(
            "SELECT {} FROM leave_types{} ORDER BY name",
            LEAVE_TYPE_COLUMNS,
            if active_only { " WHERE is_active" } else { "" }
        );
        let leave_types = sqlx::query_as::<_, LeaveType>(&sql)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(leave_types)
    }

    async fn set_leave_type_active(
        &mut self,
        id: u64,
        is_active: bool,
    ) -> Result<(), StoreError> {
        sqlx::query("UPDATE leave_types SET is_active = ? WHERE id = ?")
            .bind(is_active)
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn insert_leave(
        &mut self,
        new: &NewLeaveApplication,
    ) -> Result<LeaveApplication, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO leave_applications
            (employee_id, leave_type_id, start_date, end_date, days_requested, year,
             reason, status, applied_on)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.employee_id)
        .bind(new.leave_type_id)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(new.days_requested())
        .bind(new.year())
        .bind(&new.reason)
        .bind(LeaveStatus::Pending.as_ref())
        .bind(new.applied_on)
        .execute(&mut *self.tx)
        .await?;

        Ok(new.clone().into_application(result.last_insert_id()))
    }

    async fn find_leave(&mut self, id: u64) -> Result<Option<LeaveApplication>, StoreError> {
        self.leave_by_id(id, false).await
    }

    async fn lock_leave(&mut self, id: u64) -> Result<Option<LeaveApplication>, StoreError> {
        self.leave_by_id(id, true).await
    }

    async fn list_leaves(
        &mut self,
        filter: &LeaveFilter,
    ) -> Result<Vec<LeaveApplication>, StoreError> {
        let mut where_sql = String::from(" WHERE 1=1");
        let mut args: Vec<FilterValue> = Vec::new();

        if let Some(employee_id) = filter.employee_id {
            where_sql.push_str(" AND employee_id = ?");
            args.push(FilterValue::U64(employee_id));
        }

        if let Some(status) = filter.status {
            where_sql.push_str(" AND status = ?");
            args.push(FilterValue::Str(status.into()));
        }

        let sql = format!(
            "SELECT {} FROM leave_applications{} ORDER BY applied_on DESC, id DESC",
            LEAVE_COLUMNS, where_sql
        );

        let mut query = sqlx::query_as::<_, LeaveRow>(&sql);
        for arg in args {
            query = match arg {
                FilterValue::U64(v) => query.bind(v),
                FilterValue::Str(s) => query.bind(s),
            };
        }

        into_leaves(query.fetch_all(&mut *self.tx).await?)
    }

    async fn overlapping_leaves(
        &mut self,
        employee_id: u64,
        start: NaiveDate,
        end: NaiveDate,
        exclude: Option<u64>,
    ) -> Result<Vec<LeaveApplication>, StoreError> {
        let sql = format!(
            r#"
            SELECT {} FROM leave_applications
            WHERE employee_id = ?
            AND status IN ('PENDING', 'APPROVED')
            AND start_date <= ?
            AND end_date >= ?
            AND id <> ?
            ORDER BY start_date, id
            "#,
            LEAVE_COLUMNS
        );
        let rows = sqlx::query_as::<_, LeaveRow>(&sql)
            .bind(employee_id)
            .bind(end)
            .bind(start)
            // ids start at 1
            .bind(exclude.unwrap_or(0))
            .fetch_all(&mut *self.tx)
            .await?;

        into_leaves(rows)
    }

    async fn update_leave(&mut self, leave: &LeaveApplication) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE leave_applications
            SET start_date = ?, end_date = ?, days_requested = ?, year = ?, reason = ?,
                status = ?, validated_on = ?, comments = ?, rejection_reason = ?
            WHERE id = ?
            "#,
        )
        .bind(leave.start_date)
        .bind(leave.end_date)
        .bind(leave.days_requested())
        .bind(leave.year())
        .bind(&leave.reason)
        .bind(leave.status.as_ref())
        .bind(leave.validated_on)
        .bind(&leave.comments)
        .bind(&leave.rejection_reason)
        .bind(leave.id)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn find_balance(
        &mut self,
        employee_id: u64,
        leave_type_id: u64,
        year: i32,
    ) -> Result<Option<LeaveBalance>, StoreError> {
        self.balance_row(employee_id, leave_type_id, year, false)
            .await
    }

    async fn lock_balance(
        &mut self,
        employee_id: u64,
        leave_type_id: u64,
        year: i32,
        seed: i32,
    ) -> Result<LeaveBalance, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO leave_balances (employee_id, leave_type_id, year, balance)
            VALUES (?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE balance = balance
            "#,
        )
        .bind(employee_id)
        .bind(leave_type_id)
        .bind(year)
        .bind(seed)
        .execute(&mut *self.tx)
        .await?;

        self.balance_row(employee_id, leave_type_id, year, true)
            .await?
            .ok_or_else(|| {
                StoreError::Corrupt(format!(
                    "balance for employee {} / leave type {} / {} vanished after upsert",
                    employee_id, leave_type_id, year
                ))
            })
    }

    async fn adjust_balance(
        &mut self,
        employee_id: u64,
        leave_type_id: u64,
        year: i32,
        delta: i32,
    ) -> Result<LeaveBalance, StoreError> {
        sqlx::query(
            r#"
            UPDATE leave_balances
            SET balance = balance + ?
            WHERE employee_id = ? AND leave_type_id = ? AND year = ?
            "#,
        )
        .bind(delta)
        .bind(employee_id)
        .bind(leave_type_id)
        .bind(year)
        .execute(&mut *self.tx)
        .await?;

        self.balance_row(employee_id, leave_type_id, year, false)
            .await?
            .ok_or_else(|| {
                StoreError::Corrupt(format!(
                    "no balance row for employee {} / leave type {} / {}",
                    employee_id, leave_type_id, year
                ))
            })
    }
}
