/*!
 * Date key utilities.
 *
 * The content endpoint keys items by local calendar date in `YYYY-MM-DD`
 * form; the archive starts on 1995-06-16.
 */

use anyhow::{anyhow, Result};
use chrono::{Duration, Local, NaiveDate};

/// Date key format used by the content endpoint
const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// First date with content available
pub const ARCHIVE_START: &str = "1995-06-16";

/// Today's date key in local time
pub fn today_key() -> String {
    Local::now().date_naive().format(DATE_KEY_FORMAT).to_string()
}

/// Parse a date key
pub fn parse_key(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, DATE_KEY_FORMAT)
        .map_err(|e| anyhow!("Invalid date '{}': {}", date, e))
}

/// Whether a string is a well-formed date key inside the archive range
pub fn is_valid_key(date: &str) -> bool {
    match parse_key(date) {
        Ok(parsed) => {
            let start = parse_key(ARCHIVE_START).expect("archive start date is valid");
            parsed >= start && parsed <= Local::now().date_naive()
        }
        Err(_) => false,
    }
}

/// The date key `days` days before the given key
pub fn days_before(date: &str, days: i64) -> Result<String> {
    let parsed = parse_key(date)?;
    Ok((parsed - Duration::days(days)).format(DATE_KEY_FORMAT).to_string())
}
