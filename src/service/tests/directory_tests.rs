use super::common::*;
use crate::{
    model::{
        department::NewDepartment,
        employee::{NewEmployee, ProfileUpdate},
        job::NewJob,
        leave_type::NewLeaveType,
    },
    service::HrError,
};

#[actix_web::test]
async fn duplicate_email_is_a_conflict() {
    let fx = fixture();
    let rina = fx.employee("Rina Akter").await;

    let err = fx
        .service
        .create_employee(NewEmployee {
            name: "Another Rina".into(),
            email: rina.email.clone(),
            phone: None,
            education: None,
            hire_date: date(2024, 1, 1),
            resignation_date: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, HrError::Conflict(_)));
}

#[actix_web::test]
async fn employee_dates_are_validated() {
    let fx = fixture();
    let err = fx
        .service
        .create_employee(NewEmployee {
            name: " ".into(),
            email: "nobody".into(),
            phone: None,
            education: None,
            hire_date: date(2025, 6, 1),
            resignation_date: Some(date(2025, 5, 1)),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err.violations(),
        [
            "Name is required",
            "Email is not valid",
            "Hire date cannot be in the future",
            "Resignation date cannot be before hire date",
        ]
    );
}

#[actix_web::test]
async fn profile_update_leaves_employment_state_alone() {
    let fx = fixture();
    let rina = fx.employee("Rina Akter").await;

    let updated = fx
        .service
        .update_employee(
            rina.id,
            ProfileUpdate {
                phone: Some("+8801712345678".into()),
                education: Some("MBA".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, rina.name);
    assert_eq!(updated.phone.as_deref(), Some("+8801712345678"));
    assert!(updated.is_active);

    let err = fx
        .service
        .update_employee(
            rina.id,
            ProfileUpdate {
                email: Some("".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.violations(), ["Email is required"]);
    let stored = fx.service.get_employee(rina.id).await.unwrap();
    assert_eq!(stored.employee.email, rina.email);
}

#[actix_web::test]
async fn leave_type_policy_is_validated() {
    let fx = fixture();
    let err = fx
        .service
        .create_leave_type(NewLeaveType {
            name: "".into(),
            annual_allocation: -1,
            max_consecutive_days: 0,
            min_notice_days: -2,
            carry_forward: false,
            is_active: true,
        })
        .await
        .unwrap_err();
    assert_eq!(
        err.violations(),
        [
            "Leave type name is required",
            "Annual allocation cannot be negative",
            "Maximum consecutive days must be at least 1",
            "Minimum notice days cannot be negative",
        ]
    );

    fx.annual_leave().await;
    let duplicate = fx
        .service
        .create_leave_type(NewLeaveType {
            name: "Annual Leave".into(),
            annual_allocation: 10,
            max_consecutive_days: 5,
            min_notice_days: 0,
            carry_forward: true,
            is_active: true,
        })
        .await
        .unwrap_err();
    assert!(matches!(duplicate, HrError::Conflict(_)));
}

#[actix_web::test]
async fn inactive_leave_type_is_refused_and_hidden_from_active_lists() {
    let fx = fixture();
    let rina = fx.employee("Rina Akter").await;
    let annual = fx.annual_leave().await;
    fx.leave_type("Sick Leave", 14, 14, 0).await;

    fx.service
        .set_leave_type_active(annual.id, false)
        .await
        .unwrap();
    let active = fx.service.list_leave_types(true).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "Sick Leave");
    assert_eq!(fx.service.list_leave_types(false).await.unwrap().len(), 2);

    let err = fx
        .submit(&rina, &annual, date(2025, 6, 2), date(2025, 6, 3))
        .await
        .unwrap_err();
    assert_eq!(err.violations(), ["This leave type is not active"]);
}

#[actix_web::test]
async fn job_department_must_exist() {
    let fx = fixture();
    let err = fx
        .service
        .create_job(NewJob {
            title: "Accountant".into(),
            department_id: Some(42),
            description: None,
            is_active: true,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, HrError::NotFound { entity: "department", id: 42 }));

    let finance = fx
        .service
        .create_department(NewDepartment {
            name: "Finance".into(),
        })
        .await
        .unwrap();
    let job = fx
        .service
        .create_job(NewJob {
            title: "Accountant".into(),
            department_id: Some(finance.id),
            description: Some("Books and ledgers".into()),
            is_active: true,
        })
        .await
        .unwrap();
    assert_eq!(fx.service.get_job(job.id).await.unwrap().department_id, Some(finance.id));

    let dup = fx
        .service
        .create_department(NewDepartment {
            name: "Finance".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(dup, HrError::Conflict(_)));
}

#[actix_web::test]
async fn balance_summary_reads_without_creating_rows() {
    let fx = fixture();
    let rina = fx.employee("Rina Akter").await;
    let annual = fx.annual_leave().await;
    let sick = fx.leave_type("Sick Leave", 14, 14, 0).await;

    let summary = fx.service.balance_summary(rina.id, None).await.unwrap();
    assert_eq!(summary.year, 2025);
    assert_eq!(summary.balances.len(), 2);
    assert!(summary.balances.iter().all(|b| b.remaining == b.allocation));
    assert!(fx.store.snapshot().await.balances.is_empty());

    let leave = fx
        .submit(&rina, &annual, date(2025, 6, 2), date(2025, 6, 6))
        .await
        .unwrap();
    fx.service.approve_leave(leave.id, None).await.unwrap();

    let summary = fx.service.balance_summary(rina.id, Some(2025)).await.unwrap();
    let line = |id| {
        summary
            .balances
            .iter()
            .find(|b| b.leave_type_id == id)
            .unwrap()
            .clone()
    };
    assert_eq!(line(annual.id).remaining, 15);
    assert_eq!(line(annual.id).allocation, 20);
    assert_eq!(line(sick.id).remaining, 14);

    let next_year = fx.service.balance_summary(rina.id, Some(2026)).await.unwrap();
    assert!(next_year.balances.iter().all(|b| b.remaining == b.allocation));

    let err = fx.service.balance_summary(999, None).await.unwrap_err();
    assert!(matches!(err, HrError::NotFound { entity: "employee", .. }));
}
