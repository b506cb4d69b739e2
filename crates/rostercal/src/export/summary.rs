//! Plain-text per-day digest of a calendar

use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::{NaiveDate, Timelike};
use rostercal_core::style::number_format::format_short_date;

use super::{Calendar, CalendarEvent};

const RULE: &str = "---------------------------";

/// One section per date, oldest first.
///
/// Within a day, events are listed by descending start hour and then
/// descending attendee name. The first resource is shown as the room.
pub fn summarize(calendar: &Calendar) -> String {
    let mut days: BTreeMap<NaiveDate, Vec<&CalendarEvent>> = BTreeMap::new();
    for event in calendar.events() {
        days.entry(event.start.date()).or_default().push(event);
    }

    let mut out = String::new();
    for (date, mut events) in days {
        events.sort_by(|a, b| {
            (b.start.hour(), &b.attendee_name).cmp(&(a.start.hour(), &a.attendee_name))
        });

        let _ = writeln!(out, "{}", format_short_date(date));
        let _ = writeln!(out, "{}", RULE);
        for event in events {
            let _ = write!(out, " * {:02}:00 - {}", event.start.hour(), event.summary);
            if let Some(room) = event.resources.first() {
                let _ = write!(out, " ( Room: {})", room);
            }
            out.push('\n');
        }
        out.push_str("\n\n");
    }
    out
}
