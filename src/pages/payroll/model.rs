use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{consts::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT}, service::payslip::PayslipView};

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct GeneratePayroll {
    pub(super) period_id: Uuid,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(super) struct Pagination {
    pub(super) page: Option<u64>,
    pub(super) limit: Option<u64>,
}

impl Pagination {
    /// 1-based page and a limit within `1..=MAX_PAGE_LIMIT`
    pub(super) fn resolve(&self) -> (u64, u64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);

        (page, limit)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct PayslipPage {
    pub(super) payslips: Vec<PayslipView>,
    /// Over the whole payroll, not only this page
    pub(super) total_take_home_pay: i64,
    pub(super) page: u64,
    pub(super) limit: u64,
    pub(super) total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination() {
        assert_eq!(Pagination::default().resolve(), (1, 10));
        assert_eq!(Pagination { page: Some(0), limit: Some(0) }.resolve(), (1, 1));
        assert_eq!(Pagination { page: Some(3), limit: Some(1_000) }.resolve(), (3, 100));
    }
}
