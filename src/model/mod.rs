pub mod assignment;
pub mod department;
pub mod employee;
pub mod job;
pub mod leave_application;
pub mod leave_balance;
pub mod leave_type;
