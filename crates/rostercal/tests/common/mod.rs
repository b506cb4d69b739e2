//! In-memory XLSX fixtures

#![allow(dead_code)]

use std::io::{Cursor, Write};

/// Style indices of the fixture stylesheet
pub const PLAIN: u32 = 0;
pub const DATE_YELLOW: u32 = 1;
pub const YELLOW: u32 = 2;
pub const BLUE: u32 = 3;
pub const TIME_YELLOW: u32 = 4;

/// Serial number of 2024-01-08 in the 1900 date system
pub const JAN_8_2024: u32 = 45299;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <numFmts count="1">
    <numFmt numFmtId="164" formatCode="[$-409]h:mm\ AM/PM;@"/>
  </numFmts>
  <fills count="4">
    <fill><patternFill patternType="none"/></fill>
    <fill><patternFill patternType="gray125"/></fill>
    <fill><patternFill patternType="solid"><fgColor rgb="FFFFFF00"/><bgColor indexed="64"/></patternFill></fill>
    <fill><patternFill patternType="solid"><fgColor rgb="FF0000FF"/><bgColor indexed="64"/></patternFill></fill>
  </fills>
  <cellXfs count="5">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
    <xf numFmtId="14" fontId="0" fillId="2" borderId="0" xfId="0" applyNumberFormat="1" applyFill="1"/>
    <xf numFmtId="0" fontId="0" fillId="2" borderId="0" xfId="0" applyFill="1"/>
    <xf numFmtId="0" fontId="0" fillId="3" borderId="0" xfId="0" applyFill="1"/>
    <xf numFmtId="164" fontId="0" fillId="2" borderId="0" xfId="0" applyNumberFormat="1" applyFill="1"/>
  </cellXfs>
</styleSheet>"#;

/// Content of one fixture cell
#[derive(Debug, Clone)]
pub enum Content {
    Blank,
    Text(String),
    Number(String),
}

#[derive(Debug, Clone)]
pub struct Cell {
    pub reference: String,
    pub content: Content,
    pub style: u32,
}

pub fn text(r: &str, value: &str, style: u32) -> Cell {
    Cell {
        reference: r.into(),
        content: Content::Text(value.into()),
        style,
    }
}

pub fn number(r: &str, value: impl ToString, style: u32) -> Cell {
    Cell {
        reference: r.into(),
        content: Content::Number(value.to_string()),
        style,
    }
}

pub fn blank(r: &str, style: u32) -> Cell {
    Cell {
        reference: r.into(),
        content: Content::Blank,
        style,
    }
}

/// A date cell with the shaded date style
pub fn date(r: &str, serial: u32) -> Cell {
    number(r, serial, DATE_YELLOW)
}

#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub cells: Vec<Cell>,
    pub merges: Vec<String>,
}

impl Sheet {
    pub fn new(name: &str, cells: Vec<Cell>, merges: &[&str]) -> Self {
        Self {
            name: name.into(),
            cells,
            merges: merges.iter().map(|m| m.to_string()).collect(),
        }
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn row_of(reference: &str) -> u32 {
    reference
        .trim_start_matches(|c: char| c.is_ascii_alphabetic())
        .parse()
        .unwrap()
}

fn worksheet_xml(sheet: &Sheet) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );

    // Cells are written in the order given, grouped into rows as they come
    let mut open_row: Option<u32> = None;
    for cell in &sheet.cells {
        let row = row_of(&cell.reference);
        if open_row != Some(row) {
            if open_row.is_some() {
                xml.push_str("</row>");
            }
            xml.push_str(&format!(r#"<row r="{}">"#, row));
            open_row = Some(row);
        }
        match &cell.content {
            Content::Blank => {
                xml.push_str(&format!(r#"<c r="{}" s="{}"/>"#, cell.reference, cell.style))
            }
            Content::Text(t) => xml.push_str(&format!(
                r#"<c r="{}" s="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                cell.reference,
                cell.style,
                escape(t)
            )),
            Content::Number(n) => xml.push_str(&format!(
                r#"<c r="{}" s="{}"><v>{}</v></c>"#,
                cell.reference, cell.style, n
            )),
        }
    }
    if open_row.is_some() {
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData>");

    if !sheet.merges.is_empty() {
        xml.push_str(&format!(r#"<mergeCells count="{}">"#, sheet.merges.len()));
        for m in &sheet.merges {
            xml.push_str(&format!(r#"<mergeCell ref="{}"/>"#, m));
        }
        xml.push_str("</mergeCells>");
    }
    xml.push_str("</worksheet>");
    xml
}

/// Build a complete workbook
pub fn workbook(sheets: &[Sheet]) -> Vec<u8> {
    let mut workbook = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
    );
    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (i, sheet) in sheets.iter().enumerate() {
        workbook.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape(&sheet.name),
            i + 1,
            i + 1
        ));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            i + 1,
            i + 1
        ));
    }
    workbook.push_str("</sheets></workbook>");
    rels.push_str("</Relationships>");

    let mut buf = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
        let options = zip::write::SimpleFileOptions::default();
        let mut add = |name: &str, body: &str| {
            zip.start_file(name, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        };
        add("[Content_Types].xml", CONTENT_TYPES);
        add("xl/workbook.xml", &workbook);
        add("xl/_rels/workbook.xml.rels", &rels);
        add("xl/styles.xml", STYLES);
        for (i, sheet) in sheets.iter().enumerate() {
            add(&format!("xl/worksheets/sheet{}.xml", i + 1), &worksheet_xml(sheet));
        }
        zip.finish().unwrap();
    }
    buf
}

/// The smallest roster: one shaded date over one room/name row
pub fn single_attending() -> Vec<u8> {
    workbook(&[Sheet::new(
        "Sheet1",
        vec![
            blank("A1", PLAIN),
            date("B1", JAN_8_2024),
            blank("C1", DATE_YELLOW),
            number("B2", 101, PLAIN),
            text("C2", "Dr. Smith", PLAIN),
        ],
        &["B1:C1"],
    )])
}
