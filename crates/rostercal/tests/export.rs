//! Projecting parsed rosters into calendars

mod common;

use std::io::Cursor;

use chrono::{NaiveDate, NaiveDateTime};
use common::*;
use pretty_assertions::assert_eq;
use rostercal::export::COMBINED_KEY;
use rostercal::prelude::*;

/// Three consecutive days, two people each
fn three_days() -> Vec<ScheduleBlock> {
    let mut cells = vec![blank("A1", PLAIN)];
    let mut merges = Vec::new();
    for (i, col) in ["B", "E", "H"].iter().enumerate() {
        let next = (col.as_bytes()[0] + 1) as char;
        cells.push(date(&format!("{col}1"), JAN_8_2024 + i as u32));
        merges.push(format!("{col}1:{next}1"));
    }
    for (col, name) in [("B", "Dr. Smith"), ("E", "Dr. Smith"), ("H", "Dr. Jones")] {
        let next = (col.as_bytes()[0] + 1) as char;
        cells.push(number(&format!("{col}2"), 101, YELLOW));
        cells.push(text(&format!("{next}2"), name, PLAIN));
    }
    for (col, name) in [("B", "Dr. Jones"), ("E", "Dr. Lee"), ("H", "Dr. Lee")] {
        let next = (col.as_bytes()[0] + 1) as char;
        cells.push(blank(&format!("{col}3"), PLAIN));
        cells.push(text(&format!("{next}3"), name, PLAIN));
    }
    let merges: Vec<&str> = merges.iter().map(String::as_str).collect();
    let bytes = workbook(&[Sheet::new("Sheet1", cells, &merges)]);
    rostercal::parse_reader(Cursor::new(bytes), Layout::Preceptor, None).unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn stamp() -> NaiveDateTime {
    day(1).and_hms_opt(0, 0, 0).unwrap()
}

#[test]
fn fixture_has_three_blocks() {
    let blocks = three_days();
    let dates: Vec<&str> = blocks.iter().map(|b| b.date.text.as_str()).collect();
    assert_eq!(dates, vec!["1/8/2024", "1/9/2024", "1/10/2024"]);
    for block in &blocks {
        assert_eq!(block.morning_shift.attendees.len(), 2);
    }
}

#[test]
fn date_window_is_inclusive() {
    let blocks = three_days();
    let mut exporter = Exporter::new(ExportOptions {
        start_date: Some(day(9)),
        end_date: Some(day(10)),
        ..Default::default()
    });
    assert_eq!(exporter.add_blocks(&blocks).unwrap(), 4);

    let keys: Vec<&str> = exporter.keys().collect();
    assert_eq!(keys, vec!["dr. jones", "dr. lee", "dr. smith"]);
    assert_eq!(exporter.calendar("dr. lee").unwrap().len(), 2);
    assert_eq!(exporter.calendar("dr. smith").unwrap().len(), 1);
    assert_eq!(
        exporter.calendar("dr. smith").unwrap().events()[0].start.date(),
        day(9)
    );
}

#[test]
fn per_person_calendars_never_mix_names() {
    let mut exporter = Exporter::new(ExportOptions::default());
    exporter.add_blocks(&three_days()).unwrap();

    for key in exporter.keys() {
        let calendar = exporter.calendar(key).unwrap();
        assert!(calendar
            .events()
            .iter()
            .all(|e| e.attendee_name.to_lowercase() == key));
    }
}

#[test]
fn combined_mode_has_one_calendar() {
    let mut exporter = Exporter::new(ExportOptions {
        file_per_person: false,
        ..Default::default()
    });
    exporter.add_blocks(&three_days()).unwrap();

    assert_eq!(exporter.keys().collect::<Vec<_>>(), vec![COMBINED_KEY]);
    assert_eq!(exporter.calendar(COMBINED_KEY).unwrap().len(), 6);
    assert_eq!(Exporter::file_name(COMBINED_KEY), "preceptor.ics");
}

#[test]
fn rendered_calendar_is_crlf_icalendar() {
    let mut options = ExportOptions::default();
    options
        .email_map
        .insert("Dr. Lee".into(), "lee@example.org".into());
    let mut exporter = Exporter::new(options).with_timestamp(stamp());
    exporter.add_blocks(&three_days()).unwrap();

    let bytes = exporter.render("dr. lee").unwrap();
    let text = String::from_utf8(bytes).unwrap();

    assert!(text.starts_with("BEGIN:VCALENDAR\r\n"));
    assert_eq!(text.matches("BEGIN:VEVENT").count(), 2);
    assert!(text.contains("DTSTART:20240109T080000\r\n"));
    assert!(text.contains("DTSTART:20240110T080000\r\n"));
    assert!(text.contains("DTSTAMP:20240101T000000Z\r\n"));
    assert!(text.contains("ATTENDEE;CN=Dr. Lee:mailto:lee@example.org\r\n"));
    assert!(!text.replace("\r\n", "").contains('\n'));
}

#[test]
fn digest_lists_days_in_order() {
    let mut exporter = Exporter::new(ExportOptions {
        file_per_person: false,
        ..Default::default()
    });
    exporter.add_blocks(&three_days()).unwrap();

    let digest = exporter.summarize(COMBINED_KEY).unwrap();
    let headings: Vec<&str> = digest
        .lines()
        .filter(|l| l.contains('/'))
        .collect();
    assert_eq!(headings, vec!["1/8/2024", "1/9/2024", "1/10/2024"]);
    assert!(digest.contains(" * 08:00 - Dr. Smith ( Room: 101)\n"));
}
