pub mod admin_user;
pub mod attendance_record;
pub mod department;
pub mod device;
pub mod employee;
pub mod leave;
pub mod organization;
pub mod role;
