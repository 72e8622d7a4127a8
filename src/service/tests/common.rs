use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    model::{
        employee::{Employee, NewEmployee},
        job::{Job, NewJob},
        leave_application::LeaveApplication,
        leave_type::{LeaveType, NewLeaveType},
    },
    service::{HrResult, HrService, clock::FixedClock, leave::LeaveRequest},
    store::memory::MemoryStore,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A Monday.
pub fn today() -> NaiveDate {
    date(2025, 5, 26)
}

pub struct Fixture {
    pub service: HrService,
    pub store: MemoryStore,
    pub clock: Arc<FixedClock>,
}

pub fn fixture() -> Fixture {
    let store = MemoryStore::new();
    let clock = Arc::new(FixedClock::on(today()));
    let service = HrService::new(Arc::new(store.clone()), clock.clone());
    Fixture {
        service,
        store,
        clock,
    }
}

impl Fixture {
    pub async fn employee(&self, name: &str) -> Employee {
        self.service
            .create_employee(NewEmployee {
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                phone: None,
                education: None,
                hire_date: date(2020, 3, 1),
                resignation_date: None,
            })
            .await
            .unwrap()
    }

    /// Annual leave: 20 days, at most 10 in a row, 3 days notice.
    pub async fn annual_leave(&self) -> LeaveType {
        self.leave_type("Annual Leave", 20, 10, 3).await
    }

    pub async fn leave_type(
        &self,
        name: &str,
        annual_allocation: i32,
        max_consecutive_days: i32,
        min_notice_days: i32,
    ) -> LeaveType {
        self.service
            .create_leave_type(NewLeaveType {
                name: name.to_string(),
                annual_allocation,
                max_consecutive_days,
                min_notice_days,
                carry_forward: false,
                is_active: true,
            })
            .await
            .unwrap()
    }

    pub async fn job(&self, title: &str) -> Job {
        self.service
            .create_job(NewJob {
                title: title.to_string(),
                department_id: None,
                description: None,
                is_active: true,
            })
            .await
            .unwrap()
    }

    pub async fn submit(
        &self,
        employee: &Employee,
        leave_type: &LeaveType,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> HrResult<LeaveApplication> {
        self.service
            .submit_leave(LeaveRequest {
                employee_id: employee.id,
                leave_type_id: leave_type.id,
                start_date,
                end_date,
                reason: "visiting family back home".to_string(),
            })
            .await
    }
}
