use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A person on the payroll. Employees are never deleted: termination clears
/// `is_active` and stamps `resignation_date`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub education: Option<String>,
    pub hire_date: NaiveDate,
    pub resignation_date: Option<NaiveDate>,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub education: Option<String>,
    pub hire_date: NaiveDate,
    pub resignation_date: Option<NaiveDate>,
}

/// Profile fields that may be edited freely. Employment state
/// (`is_active`, `resignation_date`) only changes through termination.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub education: Option<String>,
}

impl Employee {
    pub fn apply_profile(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if update.phone.is_some() {
            self.phone = update.phone;
        }
        if update.education.is_some() {
            self.education = update.education;
        }
    }
}
