//! XLSX reader

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use ahash::AHashMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use zip::ZipArchive;

use crate::error::{XlsxError, XlsxResult};
use crate::styles::read_styles_xml;
use crate::theme::read_theme_xml;
use rostercal_core::{CellAddress, DocumentParts, RawCell, SheetData, StyleTables, ThemePalette};

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const STYLES_PART: &str = "xl/styles.xml";
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
const DEFAULT_THEME_PART: &str = "xl/theme/theme1.xml";

/// Replace Excel's `_xHHHH_` escapes with the characters they encode.
///
/// `_x000D_` is a carriage return, `_x005F_` a literal underscore.
fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find("_x") {
        out.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        let decoded = candidate
            .get(2..6)
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .filter(|_| candidate.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &candidate[7..];
            }
            None => {
                out.push_str("_x");
                rest = &candidate[2..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn attr_string(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|s| s.to_string()))
}

fn is_truthy(value: Option<String>) -> bool {
    matches!(value.as_deref(), Some("1") | Some("true"))
}

/// An open XLSX workbook.
///
/// Document-wide parts (shared strings, styles, theme, the `date1904` flag)
/// are read when the document is opened. Worksheets are read on demand with
/// [`XlsxDocument::read_sheet`].
pub struct XlsxDocument<R: Read + Seek> {
    archive: ZipArchive<R>,
    parts: DocumentParts,
    /// (sheet name, part path) in workbook order
    sheets: Vec<(String, String)>,
}

impl XlsxDocument<BufReader<File>> {
    /// Open a workbook from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read + Seek> XlsxDocument<R> {
    /// Open a workbook from a reader
    pub fn from_reader(reader: R) -> XlsxResult<Self> {
        let mut archive = ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let (sheet_ids, date_1904) = Self::read_workbook_xml(&mut archive)?;
        let rels = Self::read_workbook_rels(&mut archive)?;

        let mut sheets = Vec::with_capacity(sheet_ids.len());
        for (name, r_id) in sheet_ids {
            match rels.worksheets.get(&r_id) {
                Some(path) => sheets.push((name, path.clone())),
                None => {
                    tracing::warn!(sheet = %name, r_id = %r_id, "sheet has no worksheet relationship")
                }
            }
        }

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let theme = Self::read_theme(&mut archive, rels.theme.as_deref())?;
        let styles = Self::read_styles(&mut archive, &theme)?;

        tracing::info!(
            sheets = sheets.len(),
            shared_strings = shared_strings.len(),
            date_1904,
            "opened workbook"
        );

        Ok(Self {
            archive,
            parts: DocumentParts {
                shared_strings,
                styles,
                date_1904,
            },
            sheets,
        })
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Document-wide parts
    pub fn parts(&self) -> &DocumentParts {
        &self.parts
    }

    /// Read a worksheet by name
    pub fn read_sheet(&mut self, name: &str) -> XlsxResult<SheetData> {
        let path = self
            .sheets
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p.clone())
            .ok_or_else(|| XlsxError::SheetNotFound(name.to_string()))?;

        let mut sheet = SheetData::new(name);
        Self::read_worksheet(&mut self.archive, &path, &mut sheet)?;

        tracing::debug!(
            sheet = name,
            cells = sheet.cells.len(),
            merges = sheet.merge_ranges.len(),
            "read worksheet"
        );
        Ok(sheet)
    }

    /// Read the shared strings table
    fn read_shared_strings(archive: &mut ZipArchive<R>) -> XlsxResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name(SHARED_STRINGS_PART) {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        // Rich text runs carry meaningful leading and trailing spaces
        xml_reader.trim_text(false);

        let mut buf = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;
        // Phonetic runs repeat the text as a reading guide
        let mut in_rph = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"rPh" => in_rph = true,
                    b"t" if in_si && !in_rph => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.name().as_ref() == b"si" => {
                    strings.push(String::new());
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current_string));
                        current_string.clear();
                        in_si = false;
                    }
                    b"rPh" => in_rph = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    if let Ok(text) = e.unescape() {
                        current_string.push_str(&text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    fn read_theme(archive: &mut ZipArchive<R>, path: Option<&str>) -> XlsxResult<ThemePalette> {
        let path = path.unwrap_or(DEFAULT_THEME_PART);
        match archive.by_name(path) {
            Ok(file) => read_theme_xml(file),
            Err(_) => {
                tracing::debug!(part = path, "no theme part; theme colors will not resolve");
                Ok(ThemePalette::default())
            }
        }
    }

    fn read_styles(archive: &mut ZipArchive<R>, theme: &ThemePalette) -> XlsxResult<StyleTables> {
        let file = archive
            .by_name(STYLES_PART)
            .map_err(|_| XlsxError::MissingPart(STYLES_PART.into()))?;
        let parsed = read_styles_xml(file)?;
        Ok(StyleTables::build(
            &parsed.fills,
            &parsed.cell_formats,
            &parsed.custom_formats,
            theme,
        ))
    }

    /// Read workbook.xml to get sheet names, rIds and the date system
    fn read_workbook_xml(archive: &mut ZipArchive<R>) -> XlsxResult<(Vec<(String, String)>, bool)> {
        let file = archive
            .by_name(WORKBOOK_PART)
            .map_err(|_| XlsxError::MissingPart(WORKBOOK_PART.into()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();
        let mut date_1904 = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"sheet" => {
                        let name = attr_string(&e, b"name");
                        let r_id = attr_string(&e, b"r:id");
                        if let (Some(name), Some(r_id)) = (name, r_id) {
                            sheets.push((name, r_id));
                        }
                    }
                    b"workbookPr" => {
                        date_1904 = is_truthy(attr_string(&e, b"date1904"));
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok((sheets, date_1904))
    }

    /// Read workbook.xml.rels to get worksheet and theme paths
    fn read_workbook_rels(archive: &mut ZipArchive<R>) -> XlsxResult<WorkbookRels> {
        let file = archive
            .by_name(WORKBOOK_RELS_PART)
            .map_err(|_| XlsxError::MissingPart(WORKBOOK_RELS_PART.into()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = WorkbookRels::default();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let id = attr_string(&e, b"Id");
                    let target = attr_string(&e, b"Target");
                    let rel_type = attr_string(&e, b"Type");

                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        // Target is relative to xl/ folder
                        let full_path = match target.strip_prefix('/') {
                            Some(absolute) => absolute.to_string(),
                            None => format!("xl/{}", target),
                        };
                        if rel_type.ends_with("/worksheet") {
                            rels.worksheets.insert(id, full_path);
                        } else if rel_type.ends_with("/theme") {
                            rels.theme = Some(full_path);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Read a worksheet's cells and merge ranges
    fn read_worksheet(
        archive: &mut ZipArchive<R>,
        path: &str,
        sheet: &mut SheetData,
    ) -> XlsxResult<()> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();

        // Position used when a cell omits its `r` attribute
        let mut next_pos = CellAddress::new(0, 0);

        let mut current: Option<RawCell> = None;
        let mut in_value = false;
        let mut in_inline_str = false;
        let mut in_inline_text = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"row" => {
                        next_pos = Self::row_start(&e, next_pos);
                    }
                    b"c" => {
                        current = Some(Self::start_cell(&e, &mut next_pos)?);
                    }
                    b"v" if current.is_some() => in_value = true,
                    b"is" if current.is_some() => in_inline_str = true,
                    b"t" if in_inline_str => in_inline_text = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"row" => {
                        let row = Self::row_start(&e, next_pos).row;
                        next_pos = CellAddress::new(row + 1, 0);
                    }
                    b"c" => {
                        let cell = Self::start_cell(&e, &mut next_pos)?;
                        sheet.cells.push(cell);
                    }
                    b"mergeCell" => {
                        if let Some(r) = attr_string(&e, b"ref") {
                            sheet.merge_ranges.push(r);
                        }
                    }
                    _ => {}
                },
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"c" => {
                        if let Some(cell) = current.take() {
                            sheet.cells.push(cell);
                        }
                    }
                    b"row" => {
                        next_pos = CellAddress::new(next_pos.row + 1, 0);
                    }
                    b"v" => in_value = false,
                    b"is" => in_inline_str = false,
                    b"t" => in_inline_text = false,
                    _ => {}
                },
                Ok(Event::Text(e)) => {
                    if let Some(cell) = current.as_mut() {
                        if in_value || in_inline_text {
                            if let Ok(text) = e.unescape() {
                                let text = decode_excel_escapes(&text);
                                if in_inline_text {
                                    cell.value.get_or_insert_with(String::new).push_str(&text);
                                    cell.cell_type = Some("inlineStr".to_string());
                                } else {
                                    cell.value = Some(text);
                                }
                            }
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }

    fn row_start(e: &BytesStart<'_>, fallback: CellAddress) -> CellAddress {
        let row = attr_string(e, b"r")
            .and_then(|s| s.parse::<u32>().ok())
            .map(|r| r.saturating_sub(1)) // 1-based to 0-based
            .unwrap_or(fallback.row);
        CellAddress::new(row, 0)
    }

    fn start_cell(e: &BytesStart<'_>, next_pos: &mut CellAddress) -> XlsxResult<RawCell> {
        let mut cell_ref: Option<String> = None;
        let mut cell_type: Option<String> = None;
        let mut style_index = 0u32;

        for attr in e.attributes().flatten() {
            match attr.key.as_ref() {
                b"r" => {
                    cell_ref = attr.unescape_value().ok().map(|s| s.to_string());
                }
                b"t" => {
                    cell_type = attr.unescape_value().ok().map(|s| s.to_string());
                }
                b"s" => {
                    style_index = attr
                        .unescape_value()
                        .ok()
                        .and_then(|s| s.parse::<u32>().ok())
                        .unwrap_or(0);
                }
                _ => {}
            }
        }

        let reference = match cell_ref {
            Some(r) => CellAddress::parse(&r)
                .map_err(|source| XlsxError::BadReference { reference: r, source })?,
            None => *next_pos,
        };
        *next_pos = CellAddress::new(reference.row, reference.col.saturating_add(1));

        Ok(RawCell {
            reference,
            cell_type,
            value: None,
            style_index,
        })
    }
}

#[derive(Debug, Default)]
struct WorkbookRels {
    worksheets: AHashMap<String, String>,
    theme: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::{Cursor, Write};

    #[test]
    fn test_decode_excel_escapes() {
        assert_eq!(decode_excel_escapes("Line1_x000D_Line2"), "Line1\rLine2");
        assert_eq!(decode_excel_escapes("a_x000a_b"), "a\nb");
        assert_eq!(decode_excel_escapes("tab_x0009_here"), "tab\there");
        assert_eq!(decode_excel_escapes("under_x005F_score"), "under_score");
        assert_eq!(decode_excel_escapes("Room 101"), "Room 101");
        assert_eq!(decode_excel_escapes("_x00"), "_x00");
        assert_eq!(decode_excel_escapes("_x00ZZ_"), "_x00ZZ_");
        assert_eq!(decode_excel_escapes("end_x"), "end_x");
    }

    fn minimal(sheet_xml: &str, with_styles: bool) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let cursor = Cursor::new(&mut buf);
            let mut zip = zip::ZipWriter::new(cursor);
            let options = zip::write::SimpleFileOptions::default();

            zip.start_file("[Content_Types].xml", options).unwrap();
            zip.write_all(br#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#).unwrap();

            zip.start_file("xl/workbook.xml", options).unwrap();
            zip.write_all(br#"<?xml version="1.0"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><workbookPr date1904="1"/><sheets><sheet name="Roster" sheetId="1" r:id="rId1"/></sheets></workbook>"#).unwrap();

            zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
            zip.write_all(br#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#).unwrap();

            if with_styles {
                zip.start_file("xl/styles.xml", options).unwrap();
                zip.write_all(br#"<?xml version="1.0"?><styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><cellXfs count="1"><xf numFmtId="0" fillId="0"/></cellXfs></styleSheet>"#).unwrap();
            }

            zip.start_file("xl/worksheets/sheet1.xml", options).unwrap();
            zip.write_all(sheet_xml.as_bytes()).unwrap();

            zip.finish().unwrap();
        }
        buf
    }

    #[test]
    fn test_cells_without_references() {
        let xml = r#"<worksheet><sheetData><row r="3"><c t="inlineStr"><is><t>AM</t></is></c><c s="0"/><c><v>7</v></c></row><row><c><v>8</v></c></row></sheetData></worksheet>"#;
        let mut doc = XlsxDocument::from_reader(Cursor::new(minimal(xml, true))).unwrap();
        assert!(doc.parts().date_1904);

        let sheet = doc.read_sheet("Roster").unwrap();
        let refs: Vec<String> = sheet.cells.iter().map(|c| c.reference.to_string()).collect();
        assert_eq!(refs, vec!["A3", "B3", "C3", "A4"]);
        assert_eq!(sheet.cells[0].value.as_deref(), Some("AM"));
        assert_eq!(sheet.cells[0].cell_type.as_deref(), Some("inlineStr"));
        assert_eq!(sheet.cells[1].value, None);
        assert_eq!(sheet.cells[2].value.as_deref(), Some("7"));
    }

    #[test]
    fn test_missing_styles_is_fatal() {
        let xml = r#"<worksheet><sheetData/></worksheet>"#;
        match XlsxDocument::from_reader(Cursor::new(minimal(xml, false))) {
            Err(XlsxError::MissingPart(part)) => assert_eq!(part, "xl/styles.xml"),
            Err(other) => panic!("unexpected error {}", other),
            Ok(_) => panic!("expected MissingPart"),
        }
    }

    #[test]
    fn test_unknown_sheet() {
        let xml = r#"<worksheet><sheetData/></worksheet>"#;
        let mut doc = XlsxDocument::from_reader(Cursor::new(minimal(xml, true))).unwrap();
        assert!(matches!(
            doc.read_sheet("Sheet9"),
            Err(XlsxError::SheetNotFound(name)) if name == "Sheet9"
        ));
    }
}
