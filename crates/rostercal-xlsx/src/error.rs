//! XLSX error types

use thiserror::Error;

pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

#[derive(Debug, Error)]
pub enum XlsxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a readable ZIP container
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid XLSX format: {0}")]
    InvalidFormat(String),

    /// A part the workbook cannot be read without
    #[error("Missing required part: {0}")]
    MissingPart(String),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// A `<c r="...">` attribute that is not an A1 reference
    #[error("bad cell reference '{reference}'")]
    BadReference {
        reference: String,
        #[source]
        source: rostercal_core::Error,
    },
}
