//! Prelude module - common imports for rostercal users
//!
//! ```rust
//! use rostercal::prelude::*;
//! ```

pub use crate::{
    // Export
    CalendarEvent,
    // Cells
    CellAddress,
    CellGrid,
    CellKind,
    CellValue,
    // Errors
    ConvertError,
    ExportOptions,
    Exporter,
    Layout,
    NamedColor,
    Result,
    // Schedule records
    ScheduleBlock,
    ScheduleBlockPerson,
    ScheduleBlockShift,
    ShiftPeriod,
    XlsxDocument,
};
