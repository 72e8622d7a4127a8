pub mod employee;
pub mod error;
pub mod leave_request;
pub mod leave_type;
pub mod organization;
