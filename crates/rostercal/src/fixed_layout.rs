//! Fixed-column extractor for the lecture and presenter list

use chrono::{Duration, NaiveTime};
use rostercal_core::{CellAddress, CellValue, ScheduleBlock, ScheduleBlockPerson, NO_DATA};

use crate::grid::CellGrid;

/// First data row: the date column below the header
const FIRST_ROW: CellAddress = CellAddress::new(1, 0);

/// Column offsets from the date column
const CYCLE_OFFSET: i64 = 1;
const GROUP_OFFSET: i64 = 2;

/// (lecture column offset, start hour, start minute); the presenter sits one
/// column right of the lecture
const LECTURE_SLOTS: [(i64, u32, u32); 4] = [(3, 8, 30), (5, 9, 30), (7, 10, 30), (9, 11, 30)];

const LECTURE_MINUTES: i64 = 30;

/// Extract one block per data row, starting at `A2` and stopping at the first
/// blank or missing date cell.
///
/// Rows whose first lecture cell continues a merge from the row above are
/// skipped.
pub fn extract(grid: &CellGrid<'_>) -> Vec<ScheduleBlock> {
    let mut blocks = Vec::new();
    let mut current = grid.get(&FIRST_ROW);

    while let Some(cell) = current {
        if cell.text == NO_DATA {
            break;
        }

        let first_lecture = cell.reference.offset(0, LECTURE_SLOTS[0].0);
        if first_lecture.is_some_and(|addr| grid.merges().is_continuation(&addr)) {
            tracing::debug!(row = %cell, "skipping continuation row");
        } else {
            let block = extract_row(grid, cell.clone());
            if block.has_attendees() {
                blocks.push(block);
            }
        }

        current = grid.relative(&cell.reference, 1, 0);
    }

    tracing::info!(
        sheet = grid.sheet_name(),
        blocks = blocks.len(),
        "extracted lecture list"
    );
    blocks
}

fn extract_row(grid: &CellGrid<'_>, date: CellValue) -> ScheduleBlock {
    let at = |offset: i64| -> CellValue {
        let addr = date.reference.offset(0, offset).unwrap_or(date.reference);
        grid.get(&addr)
            .unwrap_or_else(|| CellValue::empty(addr, None))
    };

    let cycle = {
        let cell = at(CYCLE_OFFSET);
        match grid.anchor_of(&cell.reference) {
            Some(anchor) if anchor != cell.reference => grid
                .get(&anchor)
                .map(|a| a.text)
                .unwrap_or_else(|| NO_DATA.to_string()),
            _ => cell.text,
        }
    };
    let group = at(GROUP_OFFSET).text;

    let mut block = ScheduleBlock::new(date.clone());
    for (offset, hour, minute) in LECTURE_SLOTS {
        let lecture = at(offset);
        let presenter = at(offset + 1);
        block.morning_shift.attendees.push(ScheduleBlockPerson {
            attending_name: presenter.text,
            attending_color: presenter.color,
            start_time: NaiveTime::from_hms_opt(hour, minute, 0),
            duration: Some(Duration::minutes(LECTURE_MINUTES)),
            event_label: Some(format!("{} - {}, Group {}", lecture.text, cycle, group)),
            room: None,
        });
    }

    tracing::debug!(date = %date, cycle = %cycle, group = %group, "lecture row");
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::AHashMap;
    use pretty_assertions::assert_eq;
    use rostercal_core::{DocumentParts, RawCell, SheetData, StyleTables};

    fn text(r: &str, value: &str) -> RawCell {
        RawCell::new(r.parse().unwrap())
            .with_type("str")
            .with_value(value)
    }

    fn run(cells: Vec<RawCell>, merges: &[&str]) -> Vec<ScheduleBlock> {
        let parts = DocumentParts {
            shared_strings: Vec::new(),
            styles: StyleTables::default(),
            date_1904: false,
        };
        let sheet = SheetData {
            name: "Lecture & Presenter List".into(),
            cells,
            merge_ranges: merges.iter().map(|s| s.to_string()).collect(),
        };
        let grid = CellGrid::new(&sheet, &parts);
        extract(&grid)
    }

    fn row(r: u32, date: &str, cycle: Option<&str>, group: &str) -> Vec<RawCell> {
        let mut cells = vec![text(&format!("A{r}"), date)];
        if let Some(cycle) = cycle {
            cells.push(text(&format!("B{r}"), cycle));
        }
        cells.push(text(&format!("C{r}"), group));
        for (i, col) in ["D", "F", "H", "J"].iter().enumerate() {
            cells.push(text(&format!("{col}{r}"), &format!("Lecture {}", i + 1)));
        }
        for (i, col) in ["E", "G", "I", "K"].iter().enumerate() {
            cells.push(text(&format!("{col}{r}"), &format!("Dr. {}", i + 1)));
        }
        cells
    }

    #[test]
    fn test_extract_rows() {
        let mut cells = vec![text("A1", "Date")];
        cells.extend(row(2, "1/8/2024", Some("Cycle 1"), "3"));
        cells.extend(row(3, "1/9/2024", None, "4"));

        let blocks = run(cells, &["B2:B3"]);
        assert_eq!(blocks.len(), 2);

        let people = &blocks[0].morning_shift.attendees;
        assert_eq!(people.len(), 4);
        assert_eq!(people[0].attending_name, "Dr. 1");
        assert_eq!(
            people[0].event_label.as_deref(),
            Some("Lecture 1 - Cycle 1, Group 3")
        );
        assert_eq!(people[0].start_time, NaiveTime::from_hms_opt(8, 30, 0));
        assert_eq!(people[3].start_time, NaiveTime::from_hms_opt(11, 30, 0));
        assert_eq!(people[3].duration, Some(Duration::minutes(30)));
        assert!(blocks[0].afternoon_shift.attendees.is_empty());

        // Cycle comes from the merge anchor on the second row
        assert_eq!(
            blocks[1].morning_shift.attendees[1].event_label.as_deref(),
            Some("Lecture 2 - Cycle 1, Group 4")
        );
    }

    #[test]
    fn test_stops_at_blank_date() {
        let mut cells = row(2, "1/8/2024", Some("C"), "1");
        cells.push(RawCell::new("A3".parse().unwrap()));
        cells.extend(row(4, "1/10/2024", Some("C"), "1"));

        assert_eq!(run(cells, &[]).len(), 1);
    }

    #[test]
    fn test_skips_continuation_rows() {
        let mut cells = row(2, "1/8/2024", Some("C"), "1");
        cells.push(text("A3", "1/8/2024"));
        cells.extend(row(4, "1/10/2024", Some("C"), "2"));

        let blocks = run(cells, &["D2:D3"]);
        let dates: Vec<&str> = blocks.iter().map(|b| b.date.text.as_str()).collect();
        assert_eq!(dates, vec!["1/8/2024", "1/10/2024"]);
    }

    #[test]
    fn test_missing_first_row() {
        assert!(run(vec![text("A1", "Date")], &[]).is_empty());
    }

    #[test]
    fn test_missing_cells_read_as_placeholder() {
        let blocks = run(vec![text("A2", "1/8/2024")], &[]);
        let first = &blocks[0].morning_shift.attendees[0];
        assert_eq!(first.attending_name, NO_DATA);
        assert_eq!(
            first.event_label.as_deref(),
            Some("NO_DATA - NO_DATA, Group NO_DATA")
        );
    }
}
