//! Display formatting for dates, mileage and prices.
//!
//! Output follows Spanish (es-ES) conventions: `.` groups thousands, `,`
//! separates decimals, and grouping only starts at five integer digits.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

/// Placeholder shown for missing or unparseable dates.
pub const NO_DATE: &str = "—";

/// Minimum and maximum year accepted when salvaging a `YYYY-MM-DD` prefix.
const MIN_PREFIX_YEAR: i32 = 1900;
const MAX_PREFIX_YEAR: i32 = 2100;

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Parse the date shapes the backend produces.
///
/// Accepts RFC 3339 timestamps (converted to local time), naive ISO
/// date-times and plain dates. As a last resort a leading `YYYY-MM-DD` is
/// used if it names a real calendar day between 1900 and 2100.
pub fn parse_date(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    parse_date_prefix(input)
}

fn parse_date_prefix(input: &str) -> Option<NaiveDateTime> {
    let prefix = input.get(..10)?;
    let bytes = prefix.as_bytes();
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| if i == 4 || i == 7 { *b == b'-' } else { b.is_ascii_digit() });
    if !digits_ok {
        return None;
    }

    let year: i32 = prefix[0..4].parse().ok()?;
    let month: u32 = prefix[5..7].parse().ok()?;
    let day: u32 = prefix[8..10].parse().ok()?;
    if !(MIN_PREFIX_YEAR..=MAX_PREFIX_YEAR).contains(&year) {
        return None;
    }
    // from_ymd_opt rejects impossible days such as February 30th
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)
}

/// Insert `.` every three digits, but only for five or more digits.
fn group_thousands(digits: &str) -> String {
    if digits.len() < 5 {
        return digits.to_string();
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// Format a mileage, e.g. `150000` -> `"150.000"`. Missing values show `"0"`.
pub fn format_kilometers(km: Option<i64>) -> String {
    match km {
        None => "0".to_string(),
        Some(km) => {
            let grouped = group_thousands(&km.unsigned_abs().to_string());
            if km < 0 {
                format!("-{}", grouped)
            } else {
                grouped
            }
        }
    }
}

/// Format a euro amount, e.g. `150.5` -> `"150,50 €"`.
///
/// A non-breaking space separates the amount from the currency sign.
pub fn format_price(price: f64) -> String {
    let fixed = format!("{:.2}", price.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if price < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{},{}\u{a0}€", sign, group_thousands(int_part), frac_part)
}

/// Format a date as `DD/MM/YYYY`, or `"—"` when it cannot be parsed.
pub fn format_date(input: Option<&str>) -> String {
    input
        .and_then(parse_date)
        .map(|dt| dt.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| NO_DATE.to_string())
}

/// Relative Spanish description of how long ago `input` was.
pub fn time_ago(input: Option<&str>) -> String {
    time_ago_at(input, Local::now().naive_local())
}

pub fn time_ago_at(input: Option<&str>, now: NaiveDateTime) -> String {
    match input.and_then(parse_date) {
        Some(date) => describe_elapsed((now - date).num_milliseconds()),
        None => NO_DATE.to_string(),
    }
}

fn describe_elapsed(diff_ms: i64) -> String {
    let days = diff_ms.div_euclid(86_400_000);

    if days < 1 {
        let hours = diff_ms.div_euclid(3_600_000);
        if hours < 1 {
            let minutes = diff_ms.div_euclid(60_000);
            return if minutes <= 1 {
                "Hace menos de un minuto".to_string()
            } else {
                format!("Hace {} minutos", minutes)
            };
        }
        return if hours == 1 {
            "Hace 1 hora".to_string()
        } else {
            format!("Hace {} horas", hours)
        };
    }

    if days < 30 {
        return if days == 1 {
            "Hace 1 día".to_string()
        } else {
            format!("Hace {} días", days)
        };
    }

    // Months are counted as 30-day blocks
    let months = days / 30;
    if months < 12 {
        return if months == 1 {
            "Hace 1 mes".to_string()
        } else {
            format!("Hace {} meses", months)
        };
    }

    let years = months / 12;
    if years == 1 {
        "Hace 1 año".to_string()
    } else {
        format!("Hace {} años", years)
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
