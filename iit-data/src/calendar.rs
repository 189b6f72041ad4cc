use chrono::{Datelike, Local};

/// Number of years offered when none is requested.
pub const DEFAULT_YEAR_OPTIONS: usize = 5;

/// The current calendar year in local time.
pub fn current_year() -> i32 {
    Local::now().year()
}

/// The `count` most recent years ending at `current`, newest first.
pub fn year_options(
    current: i32,
    count: usize,
) -> Vec<i32> {
    (0..count as i32).map(|offset| current - offset).collect()
}
