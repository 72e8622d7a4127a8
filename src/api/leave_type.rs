use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;

use crate::{
    model::leave_type::{
        DEFAULT_ANNUAL_ALLOCATION, DEFAULT_MAX_CONSECUTIVE_DAYS, DEFAULT_MIN_NOTICE_DAYS,
        NewLeaveType,
    },
    service::HrService,
};

#[derive(Deserialize)]
pub struct CreateLeaveType {
    pub name: String,
    #[serde(default = "default_allocation")]
    pub annual_allocation: i32,
    #[serde(default = "default_max_consecutive")]
    pub max_consecutive_days: i32,
    #[serde(default = "default_min_notice")]
    pub min_notice_days: i32,
    #[serde(default)]
    pub carry_forward: bool,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_allocation() -> i32 {
    DEFAULT_ANNUAL_ALLOCATION
}

fn default_max_consecutive() -> i32 {
    DEFAULT_MAX_CONSECUTIVE_DAYS
}

fn default_min_notice() -> i32 {
    DEFAULT_MIN_NOTICE_DAYS
}

fn default_active() -> bool {
    true
}

#[derive(Deserialize)]
pub struct ActiveQuery {
    #[serde(default)]
    pub active_only: bool,
}

#[derive(Deserialize)]
pub struct SetActive {
    pub is_active: bool,
}

pub async fn create_leave_type(
    service: web::Data<HrService>,
    payload: web::Json<CreateLeaveType>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();
    let leave_type = service
        .create_leave_type(NewLeaveType {
            name: payload.name,
            annual_allocation: payload.annual_allocation,
            max_consecutive_days: payload.max_consecutive_days,
            min_notice_days: payload.min_notice_days,
            carry_forward: payload.carry_forward,
            is_active: payload.is_active,
        })
        .await?;
    Ok(HttpResponse::Created().json(leave_type))
}

pub async fn list_leave_types(
    service: web::Data<HrService>,
    query: web::Query<ActiveQuery>,
) -> actix_web::Result<impl Responder> {
    let leave_types = service.list_leave_types(query.active_only).await?;
    Ok(HttpResponse::Ok().json(leave_types))
}

pub async fn get_leave_type(
    service: web::Data<HrService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_type = service.get_leave_type(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(leave_type))
}

pub async fn set_leave_type_active(
    service: web::Data<HrService>,
    path: web::Path<u64>,
    payload: web::Json<SetActive>,
) -> actix_web::Result<impl Responder> {
    let leave_type = service
        .set_leave_type_active(path.into_inner(), payload.is_active)
        .await?;
    Ok(HttpResponse::Ok().json(leave_type))
}
