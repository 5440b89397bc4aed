use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct SubmitOvertime {
    /// `YYYY-MM-DD`
    pub(super) date: String,
    /// ISO-8601 duration, e.g. `PT2H30M`
    pub(super) overtime: String,
}
