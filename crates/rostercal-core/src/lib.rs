//! # rostercal-core
//!
//! Core data structures for the rostercal schedule converter.
//!
//! This crate provides the fundamental types used throughout rostercal:
//! - [`CellAddress`] and [`CellRange`] - Cell addressing and ranges
//! - [`CellValue`] - A classified cell (text, kind, canonical color)
//! - [`StyleTables`] - Per-document style index lookups (fill color, is-date)
//! - [`MergeGroups`] - Anchor/member lookup for merged ranges
//! - [`ScheduleBlock`] - One recovered schedule day
//!
//! ## Example
//!
//! ```rust
//! use rostercal_core::{CellRange, MergeGroups};
//!
//! let mut merges = MergeGroups::new();
//! merges.insert(CellRange::parse("C2:E4").unwrap());
//!
//! let anchor = merges.anchor_of(&"D3".parse().unwrap()).unwrap();
//! assert_eq!(anchor.to_string(), "C2");
//! ```

pub mod cell;
pub mod error;
pub mod merge;
pub mod schedule;
pub mod sheet;
pub mod style;

// Re-exports for convenience
pub use cell::{CellAddress, CellKind, CellRange, CellValue, RawCell, NO_DATA};
pub use error::{Error, Result};
pub use merge::MergeGroups;
pub use schedule::{ScheduleBlock, ScheduleBlockPerson, ScheduleBlockShift, ShiftPeriod};
pub use sheet::{DocumentParts, SheetData};
pub use style::{CellFormatDef, ColorRef, FillDef, NamedColor, StyleTables, ThemePalette};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;
