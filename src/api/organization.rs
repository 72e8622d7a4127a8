use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;

use super::leave_type::{ActiveQuery, SetActive};
use crate::{
    model::{department::NewDepartment, job::NewJob},
    service::HrService,
};

#[derive(Deserialize)]
pub struct CreateJob {
    pub title: String,
    pub department_id: Option<u64>,
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

pub async fn create_department(
    service: web::Data<HrService>,
    payload: web::Json<NewDepartment>,
) -> actix_web::Result<impl Responder> {
    let department = service.create_department(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(department))
}

pub async fn list_departments(service: web::Data<HrService>) -> actix_web::Result<impl Responder> {
    let departments = service.list_departments().await?;
    Ok(HttpResponse::Ok().json(departments))
}

pub async fn create_job(
    service: web::Data<HrService>,
    payload: web::Json<CreateJob>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();
    let job = service
        .create_job(NewJob {
            title: payload.title,
            department_id: payload.department_id,
            description: payload.description,
            is_active: payload.is_active,
        })
        .await?;
    Ok(HttpResponse::Created().json(job))
}

pub async fn list_jobs(
    service: web::Data<HrService>,
    query: web::Query<ActiveQuery>,
) -> actix_web::Result<impl Responder> {
    let jobs = service.list_jobs(query.active_only).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

pub async fn get_job(
    service: web::Data<HrService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let job = service.get_job(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(job))
}

pub async fn set_job_active(
    service: web::Data<HrService>,
    path: web::Path<u64>,
    payload: web::Json<SetActive>,
) -> actix_web::Result<impl Responder> {
    let job = service
        .set_job_active(path.into_inner(), payload.is_active)
        .await?;
    Ok(HttpResponse::Ok().json(job))
}

pub async fn job_current_employees(
    service: web::Data<HrService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employees = service.job_current_employees(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(employees))
}

pub async fn job_assignment_history(
    service: web::Data<HrService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let history = service.job_assignment_history(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(history))
}
