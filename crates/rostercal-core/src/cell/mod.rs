//! Cell-related types

mod address;
mod value;

pub use address::{CellAddress, CellRange};
pub use value::{CellKind, CellValue, RawCell, NO_DATA};
