//! Input sanitizing for free-form text arguments.
//!
//! Each function trims its input and either returns the trimmed value or
//! the specific [`AppError`] describing why it was refused.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use validator::ValidateEmail;

use crate::errors::AppError;

pub const MIN_TITLE_LENGTH: usize = 2;

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

pub fn title(raw: &str) -> Result<String, AppError> {
    let title = raw.trim();
    if title.chars().count() < MIN_TITLE_LENGTH {
        return Err(AppError::InvalidTitle);
    }
    Ok(title.to_string())
}

/// Accepts calendar dates and ISO-8601 timestamps. The trimmed input is
/// returned as given, not reformatted.
pub fn date(raw: &str) -> Result<String, AppError> {
    let date = raw.trim();
    if is_calendar_date(date) {
        Ok(date.to_string())
    } else {
        Err(AppError::InvalidDate)
    }
}

fn is_calendar_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(value).is_ok()
        || DATE_TIME_FORMATS
            .iter()
            .any(|format| NaiveDateTime::parse_from_str(value, format).is_ok())
}

pub fn email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_string();
    if email.is_empty() || !email.validate_email() {
        return Err(AppError::InvalidEmail);
    }
    Ok(email)
}

pub fn name(raw: &str) -> Result<String, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::InvalidName);
    }
    Ok(name.to_string())
}

pub fn description(raw: &str) -> String {
    raw.trim().to_string()
}
