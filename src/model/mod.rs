pub mod attendance;
pub mod employee;
pub mod holiday;
pub mod leave;
pub mod leave_group;
pub mod role;
