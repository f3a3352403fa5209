pub mod admins;
pub mod attendance;
pub mod dashboard;
pub mod devices;
pub mod employees;
pub mod leaves;
pub mod reports;
pub mod sync;
pub mod system;
