//! Projection of schedule blocks into named calendars.
//!
//! An [`Exporter`] turns every person of a [`ScheduleBlock`] into one
//! [`CalendarEvent`] and files it under a calendar key: the lowercased name
//! in per-person mode, [`COMBINED_KEY`] otherwise. Calendars are rendered
//! to iCalendar bytes with [`Exporter::render`] or to a plain-text digest
//! with [`Exporter::summarize`].
//!
//! ```rust
//! use rostercal::export::{ExportOptions, Exporter};
//!
//! let exporter = Exporter::new(ExportOptions::default());
//! assert_eq!(exporter.keys().count(), 0);
//! assert_eq!(Exporter::file_name("dr. o'brien"), "preceptor-dr.obrien.ics");
//! ```

pub mod ics;
pub mod summary;

use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use lazy_regex::regex;
use rostercal_core::style::number_format::parse_short_date;
use rostercal_core::{ScheduleBlock, ScheduleBlockPerson, ScheduleBlockShift};

use crate::error::{ConvertError, Result};

/// Address used when a name has no entry in the email map
pub const DEFAULT_EMAIL: &str = "example@abc.com";

/// Key of the single calendar in combined mode
pub const COMBINED_KEY: &str = "ALL";

/// Resource and summary tag for administrative time
pub const ADMIN_TIME: &str = "Admin Time";

/// Stem of every output file name
pub const FILE_STEM: &str = "preceptor";

const DEFAULT_SHIFT_HOURS: i64 = 4;

/// Export settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// First date to export, inclusive
    pub start_date: Option<NaiveDate>,
    /// Last date to export, inclusive
    pub end_date: Option<NaiveDate>,
    /// One calendar per person instead of one combined calendar
    pub file_per_person: bool,
    /// Export admin lists as well as attendees
    pub include_admin_time: bool,
    /// Attending name to email address, matched exactly
    pub email_map: HashMap<String, String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            file_per_person: true,
            include_admin_time: false,
            email_map: HashMap::new(),
        }
    }
}

impl ExportOptions {
    /// Whether `date` falls inside the export window
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date.map_or(true, |start| date >= start)
            && self.end_date.map_or(true, |end| date <= end)
    }
}

/// One time-boxed calendar entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub uid: String,
    /// Floating local start
    pub start: NaiveDateTime,
    pub duration: Duration,
    pub attendee_name: String,
    pub attendee_email: String,
    pub summary: String,
    /// Room first, then the team or admin tag
    pub resources: Vec<String>,
    pub location: Option<String>,
}

/// The events filed under one key, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Calendar {
    events: Vec<CalendarEvent>,
}

impl Calendar {
    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Collects events from blocks into named calendars
#[derive(Debug, Clone)]
pub struct Exporter {
    options: ExportOptions,
    calendars: BTreeMap<String, Calendar>,
    timestamp: NaiveDateTime,
    sequence: usize,
}

impl Exporter {
    /// Create an exporter stamped with the current UTC time
    pub fn new(options: ExportOptions) -> Self {
        Self {
            options,
            calendars: BTreeMap::new(),
            timestamp: Utc::now().naive_utc(),
            sequence: 0,
        }
    }

    /// Replace the DTSTAMP written into every event
    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Add the people of one block. Returns the number of events created.
    ///
    /// A block whose date cell does not parse as a date is an error; a block
    /// outside the export window adds nothing.
    pub fn add_block(&mut self, block: &ScheduleBlock) -> Result<usize> {
        let date = parse_short_date(&block.date.text).ok_or_else(|| ConvertError::InvalidDate {
            cell: block.date.reference.to_string(),
            value: block.date.text.clone(),
        })?;

        if !self.options.contains(date) {
            tracing::debug!(%date, "block outside export window");
            return Ok(0);
        }

        let mut added = 0;
        for shift in block.shifts() {
            for person in &shift.attendees {
                self.push_event(date, shift, person, false);
                added += 1;
            }
            if self.options.include_admin_time {
                for person in &shift.admins {
                    self.push_event(date, shift, person, true);
                    added += 1;
                }
            }
        }

        tracing::debug!(%date, events = added, "exported block");
        Ok(added)
    }

    /// Add every block, stopping at the first one whose date is invalid
    pub fn add_blocks<'b, I>(&mut self, blocks: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'b ScheduleBlock>,
    {
        let mut total = 0;
        for block in blocks {
            total += self.add_block(block)?;
        }
        Ok(total)
    }

    /// Calendar keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.calendars.keys().map(String::as_str)
    }

    pub fn calendar(&self, key: &str) -> Option<&Calendar> {
        self.calendars.get(key)
    }

    /// Serialize one calendar to iCalendar bytes
    pub fn render(&self, key: &str) -> Result<Vec<u8>> {
        let calendar = self.lookup(key)?;
        Ok(ics::render(calendar, self.timestamp).into_bytes())
    }

    /// Plain-text per-day digest of one calendar
    pub fn summarize(&self, key: &str) -> Result<String> {
        self.lookup(key).map(summary::summarize)
    }

    /// Output file name for a calendar key.
    ///
    /// Characters other than word characters and `.` are dropped from the
    /// key; the combined calendar is written to `preceptor.ics`.
    pub fn file_name(key: &str) -> String {
        if key == COMBINED_KEY {
            return format!("{}.ics", FILE_STEM);
        }
        let clean = regex!(r"[^\w.]").replace_all(key, "");
        format!("{}-{}.ics", FILE_STEM, clean)
    }

    fn lookup(&self, key: &str) -> Result<&Calendar> {
        self.calendars
            .get(key)
            .ok_or_else(|| ConvertError::UnknownCalendar(key.to_string()))
    }

    fn push_event(
        &mut self,
        date: NaiveDate,
        shift: &ScheduleBlockShift,
        person: &ScheduleBlockPerson,
        admin: bool,
    ) {
        let name = person.attending_name.clone();
        let start_time = person
            .start_time
            .unwrap_or_else(|| shift.period.default_start());
        let start = date.and_time(start_time);
        let room = person.room.clone().filter(|r| !r.is_empty());

        let mut resources = Vec::new();
        let mut summary = name.clone();
        if admin {
            resources.push(ADMIN_TIME.to_string());
            summary.push_str(&format!(" [{}]", ADMIN_TIME));
        } else {
            if let Some(room) = &room {
                resources.push(room.clone());
            }
            if let Some(color) = person.attending_color {
                resources.push(format!("{} Team", color));
                summary.push_str(&format!(" [{}Team]", color));
            }
        }
        if let Some(label) = &person.event_label {
            summary = label.clone();
        }

        let key = if self.options.file_per_person {
            name.to_lowercase()
        } else {
            COMBINED_KEY.to_string()
        };

        self.sequence += 1;
        let uid = format!(
            "{}-{:04}-{}@rostercal",
            start.format("%Y%m%dT%H%M%S"),
            self.sequence,
            regex!(r"[^A-Za-z0-9]+").replace_all(&key, "-"),
        );

        let event = CalendarEvent {
            uid,
            start,
            duration: person
                .duration
                .unwrap_or_else(|| Duration::hours(DEFAULT_SHIFT_HOURS)),
            attendee_email: self
                .options
                .email_map
                .get(&name)
                .cloned()
                .unwrap_or_else(|| DEFAULT_EMAIL.to_string()),
            attendee_name: name,
            summary,
            resources,
            location: room,
        };

        self.calendars.entry(key).or_default().events.push(event);
    }
}
