//! Error types for the conversion pipeline

use thiserror::Error;

/// Result type alias using [`ConvertError`]
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Errors that stop a document, a block or a render
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Container-level failure
    #[error(transparent)]
    Xlsx(#[from] rostercal_xlsx::XlsxError),

    /// The requested sheet is not in the workbook
    #[error("Can't find sheet '{0}'")]
    SheetNotFound(String),

    /// The merge-driven layout found nothing to anchor on
    #[error("Sheet '{0}' declares no merged cells")]
    NoMergeRanges(String),

    /// A block's date cell does not hold a date
    #[error("Can't convert '{value}' in cell {cell} to a date")]
    InvalidDate { cell: String, value: String },

    /// No calendar under that key
    #[error("No calendar named '{0}'")]
    UnknownCalendar(String),
}
