use chrono::{Datelike, Local, NaiveDate};

/// Season label (`YYYY-YY`) for a calendar date. Seasons roll over in October.
pub fn season_for(date: NaiveDate) -> String {
    let start = if date.month() >= 10 {
        date.year()
    } else {
        date.year() - 1
    };
    format!("{start}-{:02}", (start + 1).rem_euclid(100))
}

pub fn current_season() -> String {
    season_for(Local::now().date_naive())
}

/// Returns the requested season, or the current one when none was given.
pub fn resolve(season: Option<&str>) -> Result<String, String> {
    let Some(raw) = season.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(current_season());
    };
    let invalid = || format!("invalid season '{raw}', expected YYYY-YY (e.g. '2024-25')");

    let (start, end) = raw.split_once('-').ok_or_else(invalid)?;
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if start.len() != 4 || end.len() != 2 || !digits(start) || !digits(end) {
        return Err(invalid());
    }
    let start: i32 = start.parse().map_err(|_| invalid())?;
    let end: i32 = end.parse().map_err(|_| invalid())?;
    if (start + 1).rem_euclid(100) != end {
        return Err(invalid());
    }
    Ok(raw.to_owned())
}
