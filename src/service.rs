//! Business operations
//!
//! Every service owns a clone of the pool. Writes go through
//! [`with_audit_context`](crate::database::with_audit_context), reads use the
//! pool directly.

pub mod attendance;
pub mod overtime;
pub mod payroll;
pub mod payslip;
pub mod reimbursement;

pub use attendance::AttendanceService;
pub use overtime::OvertimeService;
pub use payroll::PayrollService;
pub use payslip::PayslipService;
pub use reimbursement::ReimbursementService;
