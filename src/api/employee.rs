use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    model::employee::{NewEmployee, ProfileUpdate},
    service::{
        HrService,
        assignment::{AssignRequest, TransferRequest},
    },
};

#[derive(Deserialize)]
pub struct CreateEmployee {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub education: Option<String>,
    pub hire_date: NaiveDate,
    pub resignation_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct AssignJob {
    pub job_id: u64,
    pub manager_id: Option<u64>,
    pub salary: f64,
    pub start_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct TransferEmployee {
    pub job_id: Option<u64>,
    pub salary: Option<f64>,
    pub manager_id: Option<u64>,
    pub effective_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct TerminateEmployee {
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub deactivate: bool,
}

#[derive(Deserialize)]
pub struct BalanceQuery {
    pub year: Option<i32>,
}

pub async fn create_employee(
    service: web::Data<HrService>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();
    let employee = service
        .create_employee(NewEmployee {
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            education: payload.education,
            hire_date: payload.hire_date,
            resignation_date: payload.resignation_date,
        })
        .await?;
    Ok(HttpResponse::Created().json(employee))
}

pub async fn list_employees(service: web::Data<HrService>) -> actix_web::Result<impl Responder> {
    let employees = service.list_employees().await?;
    Ok(HttpResponse::Ok().json(employees))
}

pub async fn get_employee(
    service: web::Data<HrService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let detail = service.get_employee(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

pub async fn update_employee(
    service: web::Data<HrService>,
    path: web::Path<u64>,
    payload: web::Json<ProfileUpdate>,
) -> actix_web::Result<impl Responder> {
    let employee = service
        .update_employee(path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(employee))
}

pub async fn assign_job(
    service: web::Data<HrService>,
    path: web::Path<u64>,
    payload: web::Json<AssignJob>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();
    let assignment = service
        .assign(AssignRequest {
            employee_id: path.into_inner(),
            job_id: payload.job_id,
            manager_id: payload.manager_id,
            salary: payload.salary,
            start_date: payload.start_date,
        })
        .await?;
    Ok(HttpResponse::Created().json(assignment))
}

pub async fn transfer_employee(
    service: web::Data<HrService>,
    path: web::Path<u64>,
    payload: web::Json<TransferEmployee>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();
    let assignment = service
        .transfer(
            path.into_inner(),
            TransferRequest {
                job_id: payload.job_id,
                salary: payload.salary,
                manager_id: payload.manager_id,
                effective_date: payload.effective_date,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(assignment))
}

pub async fn terminate_employee(
    service: web::Data<HrService>,
    path: web::Path<u64>,
    payload: web::Json<TerminateEmployee>,
) -> actix_web::Result<impl Responder> {
    let closed = service
        .terminate(path.into_inner(), payload.end_date, payload.deactivate)
        .await?;
    Ok(HttpResponse::Ok().json(closed))
}

pub async fn job_history(
    service: web::Data<HrService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let history = service.job_history(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(history))
}

pub async fn current_assignment(
    service: web::Data<HrService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let assignment = service.current_assignment(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(assignment))
}

pub async fn leave_balance(
    service: web::Data<HrService>,
    path: web::Path<u64>,
    query: web::Query<BalanceQuery>,
) -> actix_web::Result<impl Responder> {
    let summary = service
        .balance_summary(path.into_inner(), query.year)
        .await?;
    Ok(HttpResponse::Ok().json(summary))
}
