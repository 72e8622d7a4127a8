use serde::{Deserialize, Serialize};

/// Remaining entitlement for one (employee, leave type, year). This row is the
/// single source of truth for the balance; it is seeded with the leave type's
/// annual allocation the first time it is touched.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeaveBalance {
    pub employee_id: u64,
    pub leave_type_id: u64,
    pub year: i32,
    pub balance: i32,
}
