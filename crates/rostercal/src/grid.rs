//! Cell grid access: classification, relative lookup and merge anchors

use ahash::AHashMap;
use rostercal_core::style::number_format::{format_short_date, serial_to_date};
use rostercal_core::{
    CellAddress, CellKind, CellValue, DocumentParts, MergeGroups, RawCell, SheetData,
};

/// Read-only view of one sheet's cells, classified on demand.
///
/// Built once per sheet; borrows the sheet and the document-wide parts.
pub struct CellGrid<'a> {
    sheet: &'a SheetData,
    parts: &'a DocumentParts,
    index: AHashMap<CellAddress, usize>,
    merges: MergeGroups,
}

impl<'a> CellGrid<'a> {
    /// Index a sheet's cells and expand its merge ranges
    pub fn new(sheet: &'a SheetData, parts: &'a DocumentParts) -> Self {
        let mut index = AHashMap::with_capacity(sheet.cells.len());
        for (i, cell) in sheet.cells.iter().enumerate() {
            // First declaration wins when a reference repeats
            index.entry(cell.reference).or_insert(i);
        }
        let merges = MergeGroups::from_refs(&sheet.merge_ranges);

        tracing::debug!(
            sheet = %sheet.name,
            cells = index.len(),
            merge_groups = merges.len(),
            "built cell grid"
        );

        Self {
            sheet,
            parts,
            index,
            merges,
        }
    }

    /// Name of the underlying sheet
    pub fn sheet_name(&self) -> &str {
        &self.sheet.name
    }

    /// Merge groups of the sheet
    pub fn merges(&self) -> &MergeGroups {
        &self.merges
    }

    /// The sheet's first cell in document order, classified
    pub fn baseline(&self) -> Option<CellValue> {
        self.sheet.baseline().map(|raw| self.classify(raw))
    }

    /// The classified cell at `addr`, if the sheet declares one
    pub fn get(&self, addr: &CellAddress) -> Option<CellValue> {
        self.index
            .get(addr)
            .map(|&i| self.classify(&self.sheet.cells[i]))
    }

    /// The cell `rows` down and `cols` right of `addr`
    pub fn relative(&self, addr: &CellAddress, rows: i64, cols: i64) -> Option<CellValue> {
        addr.offset(rows, cols).and_then(|target| self.get(&target))
    }

    /// The anchor of the merge group containing `addr`
    pub fn anchor_of(&self, addr: &CellAddress) -> Option<CellAddress> {
        self.merges.anchor_of(addr)
    }

    /// Classify a raw cell.
    ///
    /// Shared strings are resolved, serial numbers under a date style become
    /// `M/D/YYYY` text, and the words "AM"/"PM" in any case become
    /// [`CellKind::TimeShift`].
    pub fn classify(&self, raw: &RawCell) -> CellValue {
        let styles = &self.parts.styles;
        let color = styles.color(raw.style_index);

        let value = match raw.value.as_deref() {
            Some(v) if !v.is_empty() => v,
            _ => return CellValue::empty(raw.reference, color),
        };

        let text = match raw.cell_type.as_deref() {
            Some("s") => {
                let resolved = value
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| self.parts.shared_string(i));
                match resolved {
                    Some(s) if !s.is_empty() => s.to_string(),
                    Some(_) => return CellValue::empty(raw.reference, color),
                    None => {
                        tracing::warn!(
                            cell = %raw.reference,
                            index = value,
                            "bad shared string index"
                        );
                        return CellValue::empty(raw.reference, color);
                    }
                }
            }
            _ => value.to_string(),
        };

        let numeric = matches!(raw.cell_type.as_deref(), None | Some("n"));
        let mut kind = CellKind::String;
        let mut text = text;

        if styles.is_date(raw.style_index) {
            let serial = text.trim().parse::<f64>().ok();
            match serial.and_then(|n| serial_to_date(n, self.parts.date_1904)) {
                Some(date) => {
                    kind = CellKind::Date;
                    text = format_short_date(date);
                }
                None => {
                    tracing::debug!(
                        cell = %raw.reference,
                        value = %text,
                        "date-styled cell is not a serial date"
                    );
                }
            }
        } else if numeric && text.trim().parse::<f64>().is_ok() {
            kind = CellKind::Number;
        }

        if text.eq_ignore_ascii_case("AM") || text.eq_ignore_ascii_case("PM") {
            kind = CellKind::TimeShift;
        }

        CellValue::new(raw.reference, text, kind, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::AHashMap;
    use pretty_assertions::assert_eq;
    use rostercal_core::{
        CellFormatDef, ColorRef, FillDef, NamedColor, StyleTables, ThemePalette, NO_DATA,
    };

    fn parts() -> DocumentParts {
        let fills = vec![
            FillDef::None,
            FillDef::None,
            FillDef::solid(ColorRef::Rgb("FFFFFF00".into())),
        ];
        let formats = vec![
            CellFormatDef::new(0, 0),
            CellFormatDef::new(2, 14),
            CellFormatDef::new(2, 0),
        ];
        DocumentParts {
            shared_strings: vec!["Dr. Smith".into(), "pm".into(), String::new()],
            styles: StyleTables::build(
                &fills,
                &formats,
                &AHashMap::new(),
                &ThemePalette::default(),
            ),
            date_1904: false,
        }
    }

    fn raw(r: &str) -> RawCell {
        RawCell::new(r.parse().unwrap())
    }

    fn sheet(cells: Vec<RawCell>) -> SheetData {
        SheetData {
            name: "Sheet1".into(),
            cells,
            merge_ranges: vec!["A1:B1".into()],
        }
    }

    #[test]
    fn test_classify_kinds() {
        let parts = parts();
        let sheet = sheet(vec![]);
        let grid = CellGrid::new(&sheet, &parts);

        let c = grid.classify(&raw("A1").with_type("s").with_value("0"));
        assert_eq!((c.kind, c.text.as_str()), (CellKind::String, "Dr. Smith"));

        let c = grid.classify(&raw("A1").with_value("45299").with_style(1));
        assert_eq!((c.kind, c.text.as_str()), (CellKind::Date, "1/8/2024"));
        assert_eq!(c.color, Some(NamedColor::Yellow));

        let c = grid.classify(&raw("A1").with_value("101"));
        assert_eq!(c.kind, CellKind::Number);

        let c = grid.classify(&raw("A1").with_type("str").with_value("101"));
        assert_eq!(c.kind, CellKind::String);

        let c = grid.classify(&raw("A1").with_type("s").with_value("1"));
        assert_eq!((c.kind, c.text.as_str()), (CellKind::TimeShift, "pm"));
        assert!(!c.is_pm());

        let c = grid.classify(&raw("A1").with_type("inlineStr").with_value("PM"));
        assert!(c.is_pm());

        let c = grid.classify(&raw("A1").with_type("b").with_value("1"));
        assert_eq!(c.kind, CellKind::String);
    }

    #[test]
    fn test_classify_gaps() {
        let parts = parts();
        let sheet = sheet(vec![]);
        let grid = CellGrid::new(&sheet, &parts);

        let c = grid.classify(&raw("C3").with_style(2));
        assert_eq!(c, CellValue::empty("C3".parse().unwrap(), Some(NamedColor::Yellow)));

        let c = grid.classify(&raw("C3").with_type("s").with_value("99"));
        assert_eq!((c.kind, c.text.as_str()), (CellKind::Empty, NO_DATA));

        let c = grid.classify(&raw("C3").with_type("s").with_value("2"));
        assert!(c.is_empty());

        // Unknown style index: no color, not a date
        let c = grid.classify(&raw("C3").with_value("45299").with_style(40));
        assert_eq!((c.kind, c.color), (CellKind::Number, None));

        // Date style on text that is not a number stays text
        let c = grid.classify(&raw("C3").with_type("str").with_value("TBD").with_style(1));
        assert_eq!((c.kind, c.text.as_str()), (CellKind::String, "TBD"));
    }

    #[test]
    fn test_relative_lookup() {
        let parts = parts();
        let sheet = sheet(vec![
            raw("A1").with_value("1"),
            raw("B1").with_value("2"),
            raw("A2").with_value("3"),
        ]);
        let grid = CellGrid::new(&sheet, &parts);
        let a1: CellAddress = "A1".parse().unwrap();

        assert_eq!(grid.relative(&a1, 0, 1).unwrap().text, "2");
        assert_eq!(grid.relative(&a1, 1, 0).unwrap().text, "3");
        assert!(grid.relative(&a1, 1, 1).is_none());
        assert!(grid.relative(&a1, -1, 0).is_none());
        assert_eq!(grid.baseline().unwrap().text, "1");
        assert_eq!(grid.anchor_of(&"B1".parse().unwrap()), Some(a1));
    }
}
