use std::str::FromStr;

use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::bad_request;
use crate::{
    model::leave_application::{LeaveApplication, LeaveStatus},
    service::{HrError, HrService, leave::LeaveRequest},
    store::LeaveFilter,
};

const MIN_REASON_CHARS: usize = 10;

#[derive(Deserialize)]
pub struct CreateLeave {
    pub employee_id: u64,
    pub leave_type_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

#[derive(Deserialize)]
pub struct CheckLeave {
    pub employee_id: u64,
    pub leave_type_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Deserialize)]
pub struct RescheduleLeave {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct ApproveLeave {
    pub comments: Option<String>,
}

#[derive(Deserialize)]
pub struct RejectLeave {
    pub rejection_reason: String,
}

#[derive(Deserialize)]
pub struct CancelLeave {
    pub cancelled_by: Option<String>,
}

#[derive(Deserialize)]
pub struct LeaveQuery {
    /// Filter by employee ID
    pub employee_id: Option<u64>,
    /// Filter by leave status
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct LeaveResponse {
    #[serde(flatten)]
    pub leave: LeaveApplication,
    pub days_requested: i32,
    pub year: i32,
    pub can_cancel: bool,
    pub is_ongoing: bool,
}

impl LeaveResponse {
    fn new(leave: LeaveApplication, today: NaiveDate) -> Self {
        Self {
            days_requested: leave.days_requested(),
            year: leave.year(),
            can_cancel: leave.can_be_cancelled(today),
            is_ongoing: leave.is_ongoing(today),
            leave,
        }
    }
}

fn validate_reason(reason: &str) -> Result<(), HrError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(bad_request("Reason is required"));
    }
    if reason.chars().count() < MIN_REASON_CHARS {
        return Err(bad_request(format!(
            "Reason must be at least {} characters",
            MIN_REASON_CHARS
        )));
    }
    Ok(())
}

fn parse_status(raw: &str) -> Result<LeaveStatus, HrError> {
    LeaveStatus::from_str(&raw.trim().to_uppercase()).map_err(|_| {
        bad_request(format!(
            "Invalid status '{}'. Allowed: PENDING, APPROVED, REJECTED, CANCELLED",
            raw
        ))
    })
}

/* =========================
Submit leave application
========================= */
pub async fn create_leave(
    service: web::Data<HrService>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();
    validate_reason(&payload.reason)?;

    let leave = service
        .submit_leave(LeaveRequest {
            employee_id: payload.employee_id,
            leave_type_id: payload.leave_type_id,
            start_date: payload.start_date,
            end_date: payload.end_date,
            reason: payload.reason.trim().to_string(),
        })
        .await?;

    Ok(HttpResponse::Created().json(LeaveResponse::new(leave, service.today())))
}

/// Dry run of the admission rules.
pub async fn check_leave(
    service: web::Data<HrService>,
    payload: web::Json<CheckLeave>,
) -> actix_web::Result<impl Responder> {
    let eligibility = service
        .check_eligibility(
            payload.employee_id,
            payload.leave_type_id,
            payload.start_date,
            payload.end_date,
        )
        .await?;

    Ok(HttpResponse::Ok().json(eligibility.report()))
}

pub async fn leave_list(
    service: web::Data<HrService>,
    query: web::Query<LeaveQuery>,
) -> actix_web::Result<impl Responder> {
    let status = query.status.as_deref().map(parse_status).transpose()?;

    let leaves = service
        .list_leaves(LeaveFilter {
            employee_id: query.employee_id,
            status,
        })
        .await?;

    let today = service.today();
    let data: Vec<LeaveResponse> = leaves
        .into_iter()
        .map(|leave| LeaveResponse::new(leave, today))
        .collect();
    Ok(HttpResponse::Ok().json(data))
}

pub async fn get_leave(
    service: web::Data<HrService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave = service.get_leave(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(LeaveResponse::new(leave, service.today())))
}

pub async fn reschedule_leave(
    service: web::Data<HrService>,
    path: web::Path<u64>,
    payload: web::Json<RescheduleLeave>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();
    if let Some(reason) = payload.reason.as_deref() {
        validate_reason(reason)?;
    }

    let leave = service
        .reschedule_leave(
            path.into_inner(),
            payload.start_date,
            payload.end_date,
            payload.reason.map(|r| r.trim().to_string()),
        )
        .await?;
    Ok(HttpResponse::Ok().json(LeaveResponse::new(leave, service.today())))
}

/* =========================
Approve leave (HR/Admin)
========================= */
pub async fn approve_leave(
    service: web::Data<HrService>,
    path: web::Path<u64>,
    payload: Option<web::Json<ApproveLeave>>,
) -> actix_web::Result<impl Responder> {
    let comments = payload.and_then(|p| p.into_inner().comments);
    let leave = service.approve_leave(path.into_inner(), comments).await?;
    Ok(HttpResponse::Ok().json(LeaveResponse::new(leave, service.today())))
}

/* =========================
Reject leave (HR/Admin)
========================= */
pub async fn reject_leave(
    service: web::Data<HrService>,
    path: web::Path<u64>,
    payload: web::Json<RejectLeave>,
) -> actix_web::Result<impl Responder> {
    let leave = service
        .reject_leave(path.into_inner(), &payload.rejection_reason)
        .await?;
    Ok(HttpResponse::Ok().json(LeaveResponse::new(leave, service.today())))
}

pub async fn cancel_leave(
    service: web::Data<HrService>,
    path: web::Path<u64>,
    payload: Option<web::Json<CancelLeave>>,
) -> actix_web::Result<impl Responder> {
    let cancelled_by = payload.and_then(|p| p.into_inner().cancelled_by);
    let leave = service
        .cancel_leave(path.into_inner(), cancelled_by.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(LeaveResponse::new(leave, service.today())))
}
