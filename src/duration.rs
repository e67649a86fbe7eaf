//! ISO-8601 interchange durations (`PT1H2M3.5S`).
//!
//! Only the day/hour/minute/second subset is understood. Year, month and week designators are
//! rejected because they have no fixed length in seconds.

use std::fmt::Write as _;

use crate::foundation::error::{ReelcutError, ReelcutResult};

const MICROS_PER_SEC: u64 = 1_000_000;
const MICROS_PER_MIN: u64 = 60 * MICROS_PER_SEC;
const MICROS_PER_HOUR: u64 = 60 * MICROS_PER_MIN;

/// Parse an ISO-8601 duration, falling back to `0.0` on malformed text.
pub fn to_seconds(text: &str) -> f64 {
    parse_seconds(text).unwrap_or_else(|err| {
        tracing::debug!(%err, "duration text did not parse; using 0s");
        0.0
    })
}

/// Parse an ISO-8601 duration, rejecting malformed text.
pub fn parse_seconds(text: &str) -> ReelcutResult<f64> {
    let invalid = || ReelcutError::validation(format!("invalid ISO-8601 duration '{text}'"));

    let body = text
        .trim()
        .strip_prefix(['P', 'p'])
        .ok_or_else(invalid)?;
    let (date, time) = match body.find(['T', 't']) {
        Some(i) => (&body[..i], Some(&body[i + 1..])),
        None => (body, None),
    };

    let date_parts = components(date).ok_or_else(invalid)?;
    let time_parts = match time {
        Some(t) => {
            let parts = components(t).ok_or_else(invalid)?;
            if parts.is_empty() {
                return Err(invalid());
            }
            parts
        }
        None => Vec::new(),
    };
    if date_parts.is_empty() && time_parts.is_empty() {
        return Err(invalid());
    }

    let mut total = 0.0;
    for (value, unit) in date_parts {
        match unit {
            'D' => total += value * 86_400.0,
            _ => return Err(invalid()),
        }
    }

    // Time designators must appear at most once each, in H, M, S order.
    let mut last_rank = 0u8;
    for (value, unit) in time_parts {
        let (rank, scale) = match unit {
            'H' => (1, 3_600.0),
            'M' => (2, 60.0),
            'S' => (3, 1.0),
            _ => return Err(invalid()),
        };
        if rank <= last_rank {
            return Err(invalid());
        }
        last_rank = rank;
        total += value * scale;
    }

    if !total.is_finite() {
        return Err(invalid());
    }
    Ok(total)
}

/// Format seconds as `PT[hH][mM][sS]` with microsecond precision.
///
/// Negative and non-finite input formats as `PT0S`.
pub fn from_seconds(secs: f64) -> String {
    if !secs.is_finite() || secs <= 0.0 {
        return "PT0S".to_owned();
    }
    let micros = (secs * MICROS_PER_SEC as f64).round() as u64;
    let hours = micros / MICROS_PER_HOUR;
    let minutes = (micros % MICROS_PER_HOUR) / MICROS_PER_MIN;
    let sec_micros = micros % MICROS_PER_MIN;

    let mut out = String::from("PT");
    if hours > 0 {
        let _ = write!(out, "{hours}H");
    }
    if minutes > 0 {
        let _ = write!(out, "{minutes}M");
    }
    if sec_micros > 0 || (hours == 0 && minutes == 0) {
        let whole = sec_micros / MICROS_PER_SEC;
        let frac = sec_micros % MICROS_PER_SEC;
        if frac == 0 {
            let _ = write!(out, "{whole}S");
        } else {
            let digits = format!("{frac:06}");
            let _ = write!(out, "{whole}.{}S", digits.trim_end_matches('0'));
        }
    }
    out
}

/// Split `12H3.5M` into `[(12.0, 'H'), (3.5, 'M')]`. `None` on any malformed piece.
fn components(part: &str) -> Option<Vec<(f64, char)>> {
    let mut out = Vec::new();
    let mut number = String::new();
    for c in part.chars() {
        match c {
            '0'..='9' => number.push(c),
            '.' | ',' => number.push('.'),
            c if c.is_ascii_alphabetic() => {
                if number.is_empty() || number.starts_with('.') || number.ends_with('.') {
                    return None;
                }
                let value: f64 = number.parse().ok()?;
                out.push((value, c.to_ascii_uppercase()));
                number.clear();
            }
            _ => return None,
        }
    }
    if !number.is_empty() {
        return None;
    }
    Some(out)
}

#[cfg(test)]
#[path = "../tests/unit/duration.rs"]
mod tests;
