//! Cell value types

use super::address::CellAddress;
use crate::style::NamedColor;
use std::fmt;

/// Text given to a cell that has no resolvable content
pub const NO_DATA: &str = "NO_DATA";

/// A cell as declared in the worksheet XML, before any classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCell {
    /// Cell position
    pub reference: CellAddress,
    /// The `t` attribute (`s`, `n`, `str`, `inlineStr`, `b`, `e`), if present
    pub cell_type: Option<String>,
    /// Raw `<v>` (or inline `<is><t>`) text
    pub value: Option<String>,
    /// The `s` attribute, an index into the cell formats table
    pub style_index: u32,
}

impl RawCell {
    /// Create a raw cell with no type and the default style
    pub fn new(reference: CellAddress) -> Self {
        Self {
            reference,
            cell_type: None,
            value: None,
            style_index: 0,
        }
    }

    /// Builder: set the type attribute
    pub fn with_type(mut self, cell_type: impl Into<String>) -> Self {
        self.cell_type = Some(cell_type.into());
        self
    }

    /// Builder: set the raw value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Builder: set the style index
    pub fn with_style(mut self, style_index: u32) -> Self {
        self.style_index = style_index;
        self
    }
}

/// Classification of a cell's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CellKind {
    /// Free text
    String,
    /// A number that is not formatted as a date
    Number,
    /// A serial date rendered as `M/D/YYYY`
    Date,
    /// The literal "AM" or "PM"
    TimeShift,
    /// Blank, or content that could not be resolved
    Empty,
}

impl CellKind {
    /// Whether the scanner treats this kind as textual content
    pub fn is_textual(&self) -> bool {
        matches!(self, CellKind::String | CellKind::Number)
    }
}

/// Classified content of one cell
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CellValue {
    /// Cell position
    pub reference: CellAddress,
    /// Resolved display text, [`NO_DATA`] when blank
    pub text: String,
    /// Content classification
    pub kind: CellKind,
    /// Canonical background color, `None` when nothing resolved
    pub color: Option<NamedColor>,
}

impl CellValue {
    /// Create a classified cell
    pub fn new(
        reference: CellAddress,
        text: impl Into<String>,
        kind: CellKind,
        color: Option<NamedColor>,
    ) -> Self {
        Self {
            reference,
            text: text.into(),
            kind,
            color,
        }
    }

    /// An empty cell carrying only a color
    pub fn empty(reference: CellAddress, color: Option<NamedColor>) -> Self {
        Self::new(reference, NO_DATA, CellKind::Empty, color)
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        self.kind == CellKind::Empty
    }

    /// Check if the cell is a String or Number
    pub fn is_textual(&self) -> bool {
        self.kind.is_textual()
    }

    /// True for the afternoon marker
    pub fn is_pm(&self) -> bool {
        self.kind == CellKind::TimeShift && self.text == "PM"
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.reference, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textual_kinds() {
        assert!(CellKind::String.is_textual());
        assert!(CellKind::Number.is_textual());
        assert!(!CellKind::Date.is_textual());
        assert!(!CellKind::TimeShift.is_textual());
        assert!(!CellKind::Empty.is_textual());
    }

    #[test]
    fn test_is_pm_is_exact() {
        let at = CellAddress::new(3, 0);
        assert!(CellValue::new(at, "PM", CellKind::TimeShift, None).is_pm());
        assert!(!CellValue::new(at, "pm", CellKind::TimeShift, None).is_pm());
        assert!(!CellValue::new(at, "AM", CellKind::TimeShift, None).is_pm());
        assert!(!CellValue::new(at, "PM", CellKind::String, None).is_pm());
    }

    #[test]
    fn test_empty_cell() {
        let cell = CellValue::empty(CellAddress::new(0, 0), Some(NamedColor::Yellow));
        assert!(cell.is_empty());
        assert_eq!(cell.text, NO_DATA);
        assert_eq!(cell.to_string(), "A1=NO_DATA");
    }
}
