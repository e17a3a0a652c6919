use chrono::{Datelike, NaiveDate};

pub const LAST_REGULAR_WEEK: u32 = 18;

// The regular season kicks off around ISO week 36/37.
const SEASON_START_ISO_WEEK: i64 = 36;
// The first ISO weeks of a year belong to the previous season's tail end.
const SEASON_TAIL_LAST_ISO_WEEK: u32 = 9;

/// Best-effort NFL week from the calendar, used when the state endpoint is unavailable.
pub fn calendar_week(today: NaiveDate) -> u32 {
    let iso_week = today.iso_week().week();
    if iso_week <= SEASON_TAIL_LAST_ISO_WEEK {
        return LAST_REGULAR_WEEK;
    }
    (iso_week as i64 - SEASON_START_ISO_WEEK).clamp(1, LAST_REGULAR_WEEK as i64) as u32
}

/// Season year a date belongs to; early-year dates count toward last year's season.
pub fn calendar_season(today: NaiveDate) -> String {
    let year = if today.month() <= 2 {
        today.year() - 1
    } else {
        today.year()
    };
    year.to_string()
}
