pub use super::attendance::Entity as Attendance;
pub use super::attendance_period::Entity as AttendancePeriod;
pub use super::overtime::Entity as Overtime;
pub use super::payroll::Entity as Payroll;
pub use super::payroll_summary::Entity as PayrollSummary;
pub use super::payslip::Entity as Payslip;
pub use super::reimbursement::Entity as Reimbursement;
pub use super::user::Entity as User;
