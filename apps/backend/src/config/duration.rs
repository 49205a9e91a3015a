//! Parsing for human-friendly durations such as `JWT_EXPIRY_PERIOD=1h`.
//!
//! Accepted forms: a bare number of seconds (`3600`) or a number followed by
//! one of `ms`, `s`, `m`, `h`, `d`, `w` (`90s`, `15m`, `1h`, `7d`).
//! Token timestamps have whole-second resolution, so the total must be a
//! whole number of seconds (`2000ms` is fine, `1500ms` is not).

use std::time::Duration;

use crate::error::AppError;

pub fn parse_duration(raw: &str) -> Result<Duration, AppError> {
    let value = raw.trim();
    let split_at = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (digits, unit) = value.split_at(split_at);

    if digits.is_empty() {
        return Err(invalid(raw));
    }

    let amount: u64 = digits.parse().map_err(|_| invalid(raw))?;
    if amount == 0 {
        return Err(AppError::config(format!(
            "duration '{raw}' must be greater than zero"
        )));
    }

    let multiplier_ms: u64 = match unit.trim() {
        "ms" => 1,
        "" | "s" => 1_000,
        "m" => 60 * 1_000,
        "h" => 60 * 60 * 1_000,
        "d" => 24 * 60 * 60 * 1_000,
        "w" => 7 * 24 * 60 * 60 * 1_000,
        _ => return Err(invalid(raw)),
    };

    let total_ms = amount.checked_mul(multiplier_ms).ok_or_else(|| invalid(raw))?;
    if total_ms % 1_000 != 0 {
        return Err(AppError::config(format!(
            "duration '{raw}' must be a whole number of seconds"
        )));
    }
    Ok(Duration::from_secs(total_ms / 1_000))
}

fn invalid(raw: &str) -> AppError {
    AppError::config(format!(
        "invalid duration '{raw}' (expected e.g. 3600, 90s, 15m, 1h, 7d)"
    ))
}
