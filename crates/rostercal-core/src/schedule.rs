//! Recovered schedule records

use crate::cell::CellValue;
use crate::style::NamedColor;
use chrono::{Duration, NaiveTime};
use std::fmt;

/// Shift period of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ShiftPeriod {
    Morning,
    Afternoon,
}

impl ShiftPeriod {
    /// Start time used when a person carries none
    pub fn default_start(&self) -> NaiveTime {
        match self {
            ShiftPeriod::Morning => NaiveTime::from_hms_opt(8, 0, 0),
            ShiftPeriod::Afternoon => NaiveTime::from_hms_opt(13, 0, 0),
        }
        .unwrap_or(NaiveTime::MIN)
    }

    /// Short label, `AM` or `PM`
    pub fn label(&self) -> &'static str {
        match self {
            ShiftPeriod::Morning => "AM",
            ShiftPeriod::Afternoon => "PM",
        }
    }
}

/// One shift assignment
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScheduleBlockPerson {
    /// Attending name, taken verbatim from the sheet
    pub attending_name: String,
    /// Team color tag
    pub attending_color: Option<NamedColor>,
    /// Room, when the layout pairs one with the name
    pub room: Option<String>,
    /// Start time; the shift default applies when `None`
    pub start_time: Option<NaiveTime>,
    /// Length; four hours when `None`
    #[cfg_attr(feature = "serde", serde(serialize_with = "minutes::serialize"))]
    pub duration: Option<Duration>,
    /// Replaces the event summary when set
    pub event_label: Option<String>,
}

impl ScheduleBlockPerson {
    /// Create a person with only a name
    pub fn new<S: Into<String>>(attending_name: S) -> Self {
        Self {
            attending_name: attending_name.into(),
            ..Default::default()
        }
    }
}

impl fmt::Display for ScheduleBlockPerson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.event_label.as_deref().unwrap_or(&self.attending_name);
        match (&self.room, self.attending_color) {
            (Some(room), Some(color)) => write!(f, "{}|{}({})", room, name, color),
            (Some(room), None) => write!(f, "{}|{}", room, name),
            (None, _) => f.write_str(name),
        }
    }
}

/// A shift and the people on it
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScheduleBlockShift {
    /// Which half of the day
    pub period: ShiftPeriod,
    /// People on duty, in sheet order
    pub attendees: Vec<ScheduleBlockPerson>,
    /// People on administrative time, in sheet order
    pub admins: Vec<ScheduleBlockPerson>,
}

impl ScheduleBlockShift {
    /// Create an empty shift
    pub fn new(period: ShiftPeriod) -> Self {
        Self {
            period,
            attendees: Vec::new(),
            admins: Vec::new(),
        }
    }
}

/// One calendar date's schedule
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScheduleBlock {
    /// The anchor cell holding the date
    pub date: CellValue,
    pub morning_shift: ScheduleBlockShift,
    pub afternoon_shift: ScheduleBlockShift,
}

impl ScheduleBlock {
    /// Create a block with empty shifts
    pub fn new(date: CellValue) -> Self {
        Self {
            date,
            morning_shift: ScheduleBlockShift::new(ShiftPeriod::Morning),
            afternoon_shift: ScheduleBlockShift::new(ShiftPeriod::Afternoon),
        }
    }

    /// Mutable access to a shift by period
    pub fn shift_mut(&mut self, period: ShiftPeriod) -> &mut ScheduleBlockShift {
        match period {
            ShiftPeriod::Morning => &mut self.morning_shift,
            ShiftPeriod::Afternoon => &mut self.afternoon_shift,
        }
    }

    /// Both shifts, morning first
    pub fn shifts(&self) -> [&ScheduleBlockShift; 2] {
        [&self.morning_shift, &self.afternoon_shift]
    }

    /// True when at least one shift has an attendee
    pub fn has_attendees(&self) -> bool {
        self.shifts().iter().any(|s| !s.attendees.is_empty())
    }
}

fn join(people: &[ScheduleBlockPerson]) -> String {
    people
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for ScheduleBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Schedule: {}", self.date.text)?;
        for shift in self.shifts() {
            writeln!(
                f,
                "{}: [{}] / [{}]",
                shift.period.label(),
                join(&shift.attendees),
                join(&shift.admins)
            )?;
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
mod minutes {
    use chrono::Duration;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => s.serialize_some(&d.num_minutes()),
            None => s.serialize_none(),
        }
    }
}
