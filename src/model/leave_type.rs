use serde::{Deserialize, Serialize};

pub const DEFAULT_ANNUAL_ALLOCATION: i32 = 20;
pub const DEFAULT_MAX_CONSECUTIVE_DAYS: i32 = 7;
pub const DEFAULT_MIN_NOTICE_DAYS: i32 = 1;

/// Policy template for a kind of leave. Applications reference it by id.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeaveType {
    pub id: u64,
    pub name: String,
    pub annual_allocation: i32,
    pub max_consecutive_days: i32,
    pub min_notice_days: i32,
    pub carry_forward: bool,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewLeaveType {
    pub name: String,
    pub annual_allocation: i32,
    pub max_consecutive_days: i32,
    pub min_notice_days: i32,
    pub carry_forward: bool,
    pub is_active: bool,
}
