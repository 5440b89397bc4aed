use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{error::Issue, pages::parse_date};

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct CreatePeriod {
    pub(super) start_date: String,
    pub(super) end_date: String,
}

impl CreatePeriod {
    pub(super) fn dates(&self) -> Result<(NaiveDate, NaiveDate), Issue> {
        Ok((
            parse_date("start_date", &self.start_date)?,
            parse_date("end_date", &self.end_date)?,
        ))
    }
}
