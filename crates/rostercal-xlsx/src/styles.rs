//! Styles part (`xl/styles.xml`) reading

use std::io::{BufReader, Read};

use ahash::AHashMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use rostercal_core::{CellFormatDef, ColorRef, FillDef};

/// The raw tables from `styles.xml` that color and date resolution need
#[derive(Debug, Default)]
pub(crate) struct ParsedStyles {
    pub fills: Vec<FillDef>,
    pub cell_formats: Vec<CellFormatDef>,
    pub custom_formats: AHashMap<u32, String>,
}

pub(crate) fn read_styles_xml<R: Read>(reader: R) -> XlsxResult<ParsedStyles> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut parsed = ParsedStyles::default();

    // Fills inside <dxfs> describe conditional formats, not cell fills
    let mut in_dxfs = false;
    let mut in_fills = false;
    let mut in_cell_xfs = false;

    let mut in_fill = false;
    let mut fill_pattern: Option<String> = None;
    let mut fill_fg: Option<ColorRef> = None;
    let mut in_gradient = false;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"dxfs" => in_dxfs = true,
                b"fills" if !in_dxfs => in_fills = true,
                b"cellXfs" => in_cell_xfs = true,
                b"fill" if in_fills => {
                    in_fill = true;
                    fill_pattern = None;
                    fill_fg = None;
                    in_gradient = false;
                }
                b"patternFill" if in_fill => {
                    fill_pattern = pattern_type(&e);
                }
                b"gradientFill" if in_fill => in_gradient = true,
                b"xf" if in_cell_xfs => parsed.cell_formats.push(parse_xf(&e)),
                _ => {}
            },

            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"numFmt" => {
                    let mut id = None;
                    let mut code = None;
                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"numFmtId" => {
                                id = attr.unescape_value().ok().and_then(|s| s.parse().ok())
                            }
                            b"formatCode" => {
                                code = attr.unescape_value().ok().map(|s| s.to_string())
                            }
                            _ => {}
                        }
                    }
                    if let (Some(id), Some(code)) = (id, code) {
                        parsed.custom_formats.insert(id, code);
                    }
                }
                b"fill" if in_fills => parsed.fills.push(FillDef::None),
                b"patternFill" if in_fill => {
                    fill_pattern = pattern_type(&e);
                }
                b"fgColor" if in_fill && !in_gradient => {
                    fill_fg = Some(parse_color_attrs(&e));
                }
                b"xf" if in_cell_xfs => parsed.cell_formats.push(parse_xf(&e)),
                _ => {}
            },

            Ok(Event::End(e)) => match e.name().as_ref() {
                b"dxfs" => in_dxfs = false,
                b"fills" => in_fills = false,
                b"cellXfs" => in_cell_xfs = false,
                b"fill" if in_fill => {
                    parsed
                        .fills
                        .push(finalize_fill(fill_pattern.take(), fill_fg.take(), in_gradient));
                    in_fill = false;
                }
                _ => {}
            },

            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }

        buf.clear();
    }

    tracing::debug!(
        fills = parsed.fills.len(),
        cell_formats = parsed.cell_formats.len(),
        custom_formats = parsed.custom_formats.len(),
        "read styles"
    );

    Ok(parsed)
}

fn pattern_type(e: &BytesStart<'_>) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == b"patternType")
        .and_then(|a| a.unescape_value().ok().map(|s| s.to_string()))
}

fn parse_xf(e: &BytesStart<'_>) -> CellFormatDef {
    let mut format = CellFormatDef::default();
    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"numFmtId" => {
                format.num_fmt_id = attr
                    .unescape_value()
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0);
            }
            b"fillId" => {
                format.fill_id = attr
                    .unescape_value()
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0);
            }
            _ => {}
        }
    }
    format
}

fn finalize_fill(pattern: Option<String>, fg: Option<ColorRef>, gradient: bool) -> FillDef {
    if gradient {
        return FillDef::Gradient;
    }
    match pattern {
        None => FillDef::None,
        Some(p) if p == "none" => FillDef::None,
        Some(pattern) => FillDef::Pattern {
            pattern,
            foreground: fg,
        },
    }
}

fn parse_color_attrs(e: &BytesStart<'_>) -> ColorRef {
    // Priority: rgb > theme > indexed > auto
    let mut rgb: Option<String> = None;
    let mut theme: Option<u32> = None;
    let mut indexed: Option<u8> = None;

    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"rgb" => {
                rgb = attr.unescape_value().ok().map(|s| s.to_string());
            }
            b"theme" => {
                theme = attr
                    .unescape_value()
                    .ok()
                    .and_then(|s| s.parse::<u32>().ok());
            }
            b"indexed" => {
                indexed = attr
                    .unescape_value()
                    .ok()
                    .and_then(|s| s.parse::<u8>().ok());
            }
            _ => {}
        }
    }

    if let Some(rgb) = rgb {
        return ColorRef::Rgb(rgb);
    }
    if let Some(index) = theme {
        return ColorRef::Theme(index);
    }
    if let Some(i) = indexed {
        return ColorRef::Indexed(i);
    }
    ColorRef::Auto
}
