pub mod prelude;

pub mod attendance;
pub mod attendance_period;
pub mod overtime;
pub mod payroll;
pub mod payroll_summary;
pub mod payslip;
pub mod reimbursement;
pub mod sea_orm_active_enums;
pub mod user;
