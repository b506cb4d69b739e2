//! Number format classification and serial date conversion

use chrono::{Duration, NaiveDate};

/// Built-in number format ids and whether each one displays a date.
///
/// Ids missing from this table are treated as non-date.
pub const BUILTIN_DATE_FORMATS: &[(u32, bool)] = &[
    (0, false),
    (1, false),
    (2, false),
    (3, false),
    (4, false),
    (9, false),
    (10, false),
    (11, false),
    (12, false),
    (13, false),
    (14, true),
    (15, true),
    (16, true),
    (17, true),
    (18, false),
    (19, false),
    (20, false),
    (21, false),
    (22, true),
    (27, true),
    (30, true),
    (36, true),
    (37, false),
    (38, false),
    (39, false),
    (40, false),
    (44, false),
    (45, true),
    (46, true),
    (47, true),
    (48, false),
    (49, false),
    (50, true),
    (57, true),
    (59, false),
    (60, false),
    (61, false),
    (62, false),
    (67, false),
    (68, false),
    (69, false),
    (70, false),
];

/// First id available to workbook-defined (custom) formats
pub const FIRST_CUSTOM_FORMAT_ID: u32 = 164;

/// Whether a built-in format id displays a date
pub fn is_builtin_date_format(id: u32) -> bool {
    BUILTIN_DATE_FORMATS
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, is_date)| *is_date)
        .unwrap_or(false)
}

/// Heuristic date check for a custom format code such as `m/d/yyyy`.
///
/// `y` and `d` are date tokens. An `m` run is minutes when the previous code
/// letter is `h` or the next one is `s`, and a month otherwise. Quoted
/// literals, escapes, `AM/PM` markers and bracketed sections are skipped,
/// except elapsed-time brackets (`[h]`, `[mm]`) which count as time tokens.
pub fn is_date_format_code(code: &str) -> bool {
    let mut stripped = String::with_capacity(code.len());
    let mut bracket: Option<String> = None;
    let mut in_quote = false;
    let mut escaped = false;
    for c in code.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match (c, bracket.as_mut()) {
            (']', Some(inner)) => {
                let inner = inner.to_ascii_lowercase();
                if !inner.is_empty() && inner.chars().all(|c| matches!(c, 'h' | 'm' | 's')) {
                    stripped.push_str(&inner);
                }
                bracket = None;
            }
            (_, Some(inner)) => inner.push(c),
            ('"', None) => in_quote = !in_quote,
            (_, None) if in_quote => {}
            ('\\', None) => escaped = true,
            ('[', None) => bracket = Some(String::new()),
            (_, None) => stripped.push(c.to_ascii_lowercase()),
        }
    }
    let stripped = stripped.replace("am/pm", "").replace("a/p", "");

    let mut runs: Vec<char> = stripped.chars().filter(char::is_ascii_alphabetic).collect();
    runs.dedup();
    runs.iter().enumerate().any(|(i, c)| match c {
        'y' | 'd' => true,
        'm' => {
            let after_hour = i > 0 && runs[i - 1] == 'h';
            let before_second = runs.get(i + 1) == Some(&'s');
            !(after_hour || before_second)
        }
        _ => false,
    })
}

/// Convert a spreadsheet serial number to a calendar date.
///
/// The fractional (time of day) part is discarded.
pub fn serial_to_date(serial: f64, date_1904: bool) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let base = if date_1904 {
        NaiveDate::from_ymd_opt(1904, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    let days = serial.floor();
    if days.abs() > 3_000_000.0 {
        return None;
    }
    base.checked_add_signed(Duration::days(days as i64))
}

/// Render a date as `M/D/YYYY`
pub fn format_short_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// Parse text produced by [`format_short_date`] (or ISO `YYYY-MM-DD`)
pub fn parse_short_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let parts: Vec<&str> = text.split('/').collect();
    if let [m, d, y] = parts.as_slice() {
        if y.len() == 4 {
            let m: u32 = m.parse().ok()?;
            let d: u32 = d.parse().ok()?;
            let y: i32 = y.parse().ok()?;
            return NaiveDate::from_ymd_opt(y, m, d);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%m/%d/%y"))
        .ok()
}
