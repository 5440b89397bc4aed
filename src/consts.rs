/// Standard working hours as `(start, end)`, both inclusive
pub const WORKING_HOUR: (u32, u32) = (9, 17);

/// Maximum hours of overtime an employee can file for a single day
pub const OVERTIME_DAILY_CAP_HOURS: i64 = 3;

/// Overtime pay multiplier in percent, 100 means 1.0x the daily rate
pub const OVERTIME_MULTIPLIER_PERCENT: i64 = 100;

pub const SECONDS_PER_HOUR: i64 = 3600;

/// Format of every date accepted over HTTP
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const DEFAULT_PAGE_LIMIT: u64 = 10;
pub const MAX_PAGE_LIMIT: u64 = 100;
