//! iCalendar (RFC 5545) serialization

use std::fmt::Write;

use chrono::{Duration, NaiveDateTime};

use super::{Calendar, CalendarEvent};

pub const PRODID: &str = "-//rostercal//rostercal//EN";

/// Longest content line, in octets, before folding
const MAX_LINE_OCTETS: usize = 75;

const CRLF: &str = "\r\n";

/// Render a calendar. Event times are floating; `stamp` is written as UTC.
pub fn render(calendar: &Calendar, stamp: NaiveDateTime) -> String {
    let mut out = String::new();
    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, &format!("PRODID:{}", PRODID));
    push_line(&mut out, "CALSCALE:GREGORIAN");
    for event in calendar.events() {
        write_event(&mut out, event, stamp);
    }
    push_line(&mut out, "END:VCALENDAR");
    out
}

fn write_event(out: &mut String, event: &CalendarEvent, stamp: NaiveDateTime) {
    push_line(out, "BEGIN:VEVENT");
    push_line(out, &format!("UID:{}", escape_text(&event.uid)));
    push_line(out, &format!("DTSTAMP:{}", stamp.format("%Y%m%dT%H%M%SZ")));
    push_line(out, &format!("DTSTART:{}", event.start.format("%Y%m%dT%H%M%S")));
    push_line(out, &format!("DURATION:{}", format_duration(event.duration)));
    push_line(out, &format!("SUMMARY:{}", escape_text(&event.summary)));
    push_line(
        out,
        &format!(
            "ATTENDEE;CN={}:mailto:{}",
            param_value(&event.attendee_name),
            event.attendee_email
        ),
    );
    if !event.resources.is_empty() {
        let resources: Vec<String> = event.resources.iter().map(|r| escape_text(r)).collect();
        push_line(out, &format!("RESOURCES:{}", resources.join(",")));
    }
    if let Some(location) = &event.location {
        push_line(out, &format!("LOCATION:{}", escape_text(location)));
    }
    push_line(out, "END:VEVENT");
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(&fold(line));
    out.push_str(CRLF);
}

/// Escape a TEXT value
fn escape_text(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace("\r\n", "\\n")
        .replace('\n', "\\n")
        .replace('\r', "")
}

/// Quote a parameter value when it holds a separator. DQUOTE itself is not
/// allowed inside a parameter and is dropped.
fn param_value(s: &str) -> String {
    let clean: String = s.chars().filter(|c| *c != '"' && !c.is_control()).collect();
    if clean.contains(&[':', ';', ','][..]) {
        format!("\"{}\"", clean)
    } else {
        clean
    }
}

/// Fold a content line at 75 octets without splitting a UTF-8 sequence.
/// Continuation lines start with a single space.
fn fold(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut width = 0;
    for ch in line.chars() {
        let len = ch.len_utf8();
        if width + len > MAX_LINE_OCTETS {
            out.push_str(CRLF);
            out.push(' ');
            width = 1;
        }
        out.push(ch);
        width += len;
    }
    out
}

/// `PT4H`, `PT30M`, `PT1H30M`; sub-second parts are dropped
fn format_duration(d: Duration) -> String {
    let mut secs = d.num_seconds();
    let mut out = String::new();
    if secs < 0 {
        out.push('-');
        secs = -secs;
    }
    out.push_str("PT");
    if secs == 0 {
        out.push_str("0S");
        return out;
    }

    let (hours, minutes, seconds) = (secs / 3600, secs % 3600 / 60, secs % 60);
    if hours > 0 {
        let _ = write!(out, "{}H", hours);
    }
    if minutes > 0 {
        let _ = write!(out, "{}M", minutes);
    }
    if seconds > 0 {
        let _ = write!(out, "{}S", seconds);
    }
    out
}
