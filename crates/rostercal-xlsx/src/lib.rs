//! # rostercal-xlsx
//!
//! Reads the parts of an XLSX workbook the schedule converter needs: the sheet
//! list, shared strings, styles, the theme color scheme and raw worksheet
//! cells with their merge ranges.
//!
//! ```no_run
//! use rostercal_xlsx::XlsxDocument;
//!
//! let mut doc = XlsxDocument::open("roster.xlsx")?;
//! for name in doc.sheet_names() {
//!     println!("{}", name);
//! }
//! let sheet = doc.read_sheet("Sheet1")?;
//! println!("{} cells, {} merges", sheet.cells.len(), sheet.merge_ranges.len());
//! # Ok::<(), rostercal_xlsx::XlsxError>(())
//! ```

pub mod error;
pub mod reader;

mod styles;
mod theme;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxDocument;
