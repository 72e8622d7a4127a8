use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: u64,
    pub title: String,
    pub department_id: Option<u64>,
    pub description: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub department_id: Option<u64>,
    pub description: Option<String>,
    pub is_active: bool,
}
