//! Day-first fuzzy date/time parsing for reminder input.
//!
//! `/remind Call mom 27.09.2025 18:00` is scanned token by token: the first
//! date-looking token and the first time-looking token are consumed, the
//! rest of the tokens become the reminder body. Dates are day-first.
//! Naive values are interpreted as UTC.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::BotError;

pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%d.%m.%Y %H:%M").to_string()
}

/// Split `/remind` arguments into (body text, fire time).
///
/// Recognizes `dd.mm.yyyy`, `dd/mm/yyyy`, `dd.mm`, `hh:mm` and the words
/// "today"/"tomorrow". A time with no date means today, bumped to tomorrow
/// when that moment already passed. Fails with `TimeParse` when no date or
/// time is found, and with `InvalidInput` when the body would be empty.
pub fn parse_remind_args(
    input: &str,
    now: DateTime<Utc>,
) -> Result<(String, DateTime<Utc>), BotError> {
    let (when, rest) = scan_tokens(input, now).ok_or_else(|| {
        BotError::TimeParse(input.to_string())
    })?;

    let text = rest.join(" ");
    if text.trim().is_empty() {
        return Err(BotError::InvalidInput(
            "reminder text is missing".to_string(),
        ));
    }

    Ok((text, when))
}

/// Parse a bare date/time string, as produced by the classifier
/// (`YYYY-MM-DD HH:MM` by contract, but models improvise).
pub fn parse_fuzzy_datetime(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, BotError> {
    let s = input.trim();

    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%d.%m.%Y %H:%M",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d.%m.%Y"];
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN)));
        }
    }

    // Last resort: the same token scan used for /remind, e.g. "tomorrow 18:00".
    scan_tokens(s, now)
        .map(|(when, _)| when)
        .ok_or_else(|| BotError::TimeParse(input.to_string()))
}

/// Consume the first date token and first time token; everything else is
/// returned as leftover tokens in order. `None` when neither was found.
fn scan_tokens(input: &str, now: DateTime<Utc>) -> Option<(DateTime<Utc>, Vec<&str>)> {
    let mut date: Option<NaiveDate> = None;
    let mut time: Option<NaiveTime> = None;
    let mut rest: Vec<&str> = Vec::new();

    for token in input.split_whitespace() {
        if date.is_none() {
            if let Some(d) = parse_date_token(token, now) {
                date = Some(d);
                continue;
            }
            match token.to_lowercase().as_str() {
                "today" => {
                    date = Some(now.date_naive());
                    continue;
                }
                "tomorrow" => {
                    date = Some(now.date_naive() + Duration::days(1));
                    continue;
                }
                _ => {}
            }
        }
        if time.is_none() {
            if let Some(t) = parse_time_token(token) {
                time = Some(t);
                continue;
            }
        }
        rest.push(token);
    }

    if date.is_none() && time.is_none() {
        return None;
    }

    let t = time.unwrap_or(NaiveTime::MIN);
    let when = match date {
        Some(d) => Utc.from_utc_datetime(&d.and_time(t)),
        None => {
            // Time only: today, or tomorrow if that moment already passed.
            let candidate = Utc.from_utc_datetime(&now.date_naive().and_time(t));
            if candidate <= now {
                candidate + Duration::days(1)
            } else {
                candidate
            }
        }
    };

    Some((when, rest))
}

/// Day-first numeric date: `dd.mm.yyyy`, `dd/mm/yyyy`, `dd.mm`.
/// Two-digit years are 2000-based; a missing year means the current one.
fn parse_date_token(token: &str, now: DateTime<Utc>) -> Option<NaiveDate> {
    let sep = if token.contains('.') {
        '.'
    } else if token.contains('/') {
        '/'
    } else {
        return None;
    };

    let parts: Vec<&str> = token.split(sep).collect();
    if parts.len() != 2 && parts.len() != 3 {
        return None;
    }

    let day: u32 = parts[0].parse().ok()?;
    let month: u32 = parts[1].parse().ok()?;
    let year: i32 = match parts.get(2) {
        Some(y) => {
            let y: i32 = y.parse().ok()?;
            if y < 100 {
                2000 + y
            } else {
                y
            }
        }
        None => now.year(),
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_time_token(token: &str) -> Option<NaiveTime> {
    let (h, m) = token.split_once(':')?;
    let h: u32 = h.parse().ok()?;
    let m: u32 = m.parse().ok()?;
    NaiveTime::from_hms_opt(h, m, 0)
}
