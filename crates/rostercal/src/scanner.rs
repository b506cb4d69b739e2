//! Heuristic block scanner for the color-banded preceptor roster.
//!
//! A roster day starts at a merged, shaded date cell. Below it, each row pairs
//! a room (or nothing) in the date's column with a name in the next column.
//! The day ends at the first row painted in the sheet's baseline color.

use chrono::Duration;
use rostercal_core::{
    CellKind, CellValue, NamedColor, ScheduleBlock, ScheduleBlockPerson, ShiftPeriod,
};

use crate::grid::CellGrid;

/// Summary used for the two-row acute clinic entry
pub const ACUTE_CLINIC_LABEL: &str = "Acute Clinic";

/// Neighbour text that marks the acute clinic row
const ACUTE_MARKER: &str = "ACUTE";

/// Length of a duty shift
const SHIFT_HOURS: i64 = 4;

/// How a (cell, right neighbour) pair is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowPattern {
    /// The afternoon marker
    Afternoon,
    /// Blank/blank: ends the attendee list once it has entries
    Separator,
    /// Blank/name
    NameOnly,
    /// Room/name
    RoomAndName,
    /// Room/"ACUTE": the name sits one row below the marker
    Acute,
    /// Room/blank
    RoomOnly,
    /// Anything involving a date or a stray time marker
    Ignored,
}

impl RowPattern {
    fn classify(cell: &CellValue, neighbour: &CellValue) -> Self {
        if cell.is_pm() {
            return RowPattern::Afternoon;
        }
        match (cell.kind, neighbour.kind) {
            (CellKind::Empty, CellKind::Empty) => RowPattern::Separator,
            (CellKind::Empty, _) => RowPattern::NameOnly,
            (c, n) if c.is_textual() && n.is_textual() => {
                if neighbour.text.trim().eq_ignore_ascii_case(ACUTE_MARKER) {
                    RowPattern::Acute
                } else {
                    RowPattern::RoomAndName
                }
            }
            (c, CellKind::Empty) if c.is_textual() => RowPattern::RoomOnly,
            _ => RowPattern::Ignored,
        }
    }
}

/// Which list of the current shift receives people
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Attendees,
    Admins,
}

/// Recover one block per shaded, merged date cell.
///
/// Anchors are visited in row-major order. Blocks without attendees in either
/// shift are dropped.
pub fn scan(grid: &CellGrid<'_>) -> Vec<ScheduleBlock> {
    let Some(baseline) = grid.baseline() else {
        tracing::debug!(sheet = grid.sheet_name(), "sheet has no cells");
        return Vec::new();
    };
    let baseline_color = baseline.color;

    let mut blocks = Vec::new();
    for anchor in grid.merges().anchors() {
        let Some(cell) = grid.get(anchor) else {
            continue;
        };
        if cell.kind != CellKind::Date || cell.color == baseline_color {
            continue;
        }

        let block = scan_block(grid, cell, baseline_color);
        if block.has_attendees() {
            blocks.push(block);
        } else {
            tracing::debug!(date = %block.date, "dropping block without attendees");
        }
    }

    tracing::info!(
        sheet = grid.sheet_name(),
        blocks = blocks.len(),
        "scanned roster"
    );
    blocks
}

/// Walk down from a date anchor, collecting people until the baseline color
fn scan_block(grid: &CellGrid<'_>, date: CellValue, baseline: Option<NamedColor>) -> ScheduleBlock {
    let mut block = ScheduleBlock::new(date);
    let mut period = ShiftPeriod::Morning;
    let mut target = Target::Attendees;
    let mut current = block.date.reference;

    loop {
        let Some(cell) = grid.relative(&current, 1, 0) else {
            break;
        };
        current = cell.reference;
        // The row whose color decides termination; the acute case moves it
        let mut last_color = cell.color;

        let neighbour = grid
            .relative(&cell.reference, 0, 1)
            .unwrap_or_else(|| {
                CellValue::empty(cell.reference.offset(0, 1).unwrap_or(cell.reference), None)
            });

        let pattern = RowPattern::classify(&cell, &neighbour);
        tracing::debug!(cell = %cell, neighbour = %neighbour, ?pattern, ?period, "row");

        let start = period.default_start();
        let person = |name: &CellValue| ScheduleBlockPerson {
            attending_name: name.text.clone(),
            attending_color: name.color,
            start_time: Some(start),
            duration: Some(Duration::hours(SHIFT_HOURS)),
            ..Default::default()
        };

        let shift = block.shift_mut(period);
        let list = match target {
            Target::Attendees => &mut shift.attendees,
            Target::Admins => &mut shift.admins,
        };

        match pattern {
            RowPattern::Afternoon => {
                period = ShiftPeriod::Afternoon;
                target = Target::Attendees;
            }
            RowPattern::Separator => {
                if !shift.attendees.is_empty() {
                    target = Target::Admins;
                }
            }
            RowPattern::NameOnly => list.push(person(&neighbour)),
            RowPattern::RoomAndName | RowPattern::RoomOnly => list.push(ScheduleBlockPerson {
                room: Some(cell.text.clone()),
                ..person(&neighbour)
            }),
            RowPattern::Acute => {
                match grid.relative(&neighbour.reference, 1, 0) {
                    Some(below) if below.is_textual() => list.push(ScheduleBlockPerson {
                        room: Some(cell.text.clone()),
                        event_label: Some(ACUTE_CLINIC_LABEL.to_string()),
                        ..person(&below)
                    }),
                    _ => tracing::debug!(cell = %cell, "acute row without a name below"),
                }

                // Both rows are consumed; the second one decides termination
                match current.offset(1, 0).and_then(|next| grid.get(&next)) {
                    Some(skipped) => {
                        current = skipped.reference;
                        last_color = skipped.color;
                    }
                    None => break,
                }
            }
            RowPattern::Ignored => {}
        }

        if last_color == baseline {
            break;
        }
    }

    block
}
