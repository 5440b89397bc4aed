use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{error::Issue, pages::parse_date};

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct SubmitReimbursement {
    pub(super) amount: i64,
    /// `YYYY-MM-DD`
    pub(super) date: String,
    #[serde(default)]
    pub(super) description: Option<String>,
}

impl SubmitReimbursement {
    pub(super) fn validate(&self) -> Result<NaiveDate, Issue> {
        if self.amount < 1 {
            return Err(Issue::Validation("`amount` must be at least 1".to_owned()));
        }

        parse_date("date", &self.date)
    }
}
