//! Style resolution
//!
//! This module turns the raw style tables of a document into the two lookups
//! the rest of the pipeline needs:
//! - style index to canonical background color ([`NamedColor`])
//! - style index to "displays a date"
//!
//! Tables are built once per document with [`StyleTables::build`] and are
//! read-only afterwards.

mod color;
mod fill;
pub mod number_format;

pub use color::{indexed_hex, ColorRef, NamedColor, ThemePalette, BRIGHT_THRESHOLD};
pub use fill::FillDef;

use ahash::AHashMap;
use number_format::{is_builtin_date_format, is_date_format_code, FIRST_CUSTOM_FORMAT_ID};

/// One `<xf>` entry from the `cellXfs` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellFormatDef {
    /// Index into the fills table
    pub fill_id: u32,
    /// Built-in or custom number format id
    pub num_fmt_id: u32,
}

impl CellFormatDef {
    /// Create a cell format
    pub fn new(fill_id: u32, num_fmt_id: u32) -> Self {
        Self {
            fill_id,
            num_fmt_id,
        }
    }
}

/// Per-document style lookups, keyed by cell style index
#[derive(Debug, Clone, Default)]
pub struct StyleTables {
    colors: AHashMap<u32, NamedColor>,
    dates: AHashMap<u32, bool>,
}

impl StyleTables {
    /// Build the lookups from the styles part.
    ///
    /// `custom_formats` maps workbook-defined number format ids to their
    /// format codes. A fill id past the end of `fills` gives no color.
    pub fn build(
        fills: &[FillDef],
        formats: &[CellFormatDef],
        custom_formats: &AHashMap<u32, String>,
        theme: &ThemePalette,
    ) -> Self {
        let mut colors = AHashMap::with_capacity(formats.len());
        let mut dates = AHashMap::with_capacity(formats.len());

        for (index, format) in formats.iter().enumerate() {
            let index = index as u32;

            match fills.get(format.fill_id as usize) {
                Some(fill) => {
                    if let Some(hex) = fill.foreground().and_then(|c| c.resolve(theme)) {
                        colors.insert(index, NamedColor::from_hex(&hex));
                    }
                }
                None => {
                    tracing::debug!(
                        style = index,
                        fill_id = format.fill_id,
                        "fill id out of range"
                    );
                }
            }

            let is_date = if format.num_fmt_id < FIRST_CUSTOM_FORMAT_ID {
                is_builtin_date_format(format.num_fmt_id)
            } else {
                custom_formats
                    .get(&format.num_fmt_id)
                    .is_some_and(|code| is_date_format_code(code))
            };
            dates.insert(index, is_date);
        }

        Self { colors, dates }
    }

    /// Canonical background color for a style index
    pub fn color(&self, style_index: u32) -> Option<NamedColor> {
        self.colors.get(&style_index).copied()
    }

    /// Whether a style index formats numbers as dates
    pub fn is_date(&self, style_index: u32) -> bool {
        self.dates.get(&style_index).copied().unwrap_or(false)
    }

    /// Number of cell formats the tables were built from
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if the document declared no cell formats
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
