//! Theme part color scheme reading

use std::io::{BufReader, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use rostercal_core::ThemePalette;

/// Read the `a:clrScheme` of a theme part.
///
/// Each child of the scheme (`dk1`, `lt1`, `dk2`, ..., `folHlink`) becomes one
/// palette slot, in document order. A slot whose color is neither `srgbClr`
/// nor `sysClr` with `lastClr` stays empty.
pub(crate) fn read_theme_xml<R: Read>(reader: R) -> XlsxResult<ThemePalette> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut colors: Vec<String> = Vec::new();
    let mut in_scheme = false;
    let mut depth = 0usize;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.local_name();
                if !in_scheme {
                    if name.as_ref() == b"clrScheme" {
                        in_scheme = true;
                        depth = 0;
                    }
                } else {
                    depth += 1;
                    if depth == 1 {
                        colors.push(String::new());
                    }
                }
            }
            Ok(Event::Empty(e)) if in_scheme => {
                if depth == 0 {
                    // A slot with no color element at all
                    colors.push(String::new());
                } else if let Some(hex) = scheme_color(&e) {
                    if let Some(slot) = colors.last_mut() {
                        if slot.is_empty() {
                            *slot = hex;
                        }
                    }
                }
            }
            Ok(Event::End(e)) if in_scheme => {
                if depth == 0 {
                    if e.local_name().as_ref() == b"clrScheme" {
                        break;
                    }
                } else {
                    depth -= 1;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    tracing::debug!(colors = colors.len(), "read theme color scheme");
    Ok(ThemePalette::new(colors))
}

fn scheme_color(e: &BytesStart<'_>) -> Option<String> {
    let wanted: &[u8] = match e.local_name().as_ref() {
        b"srgbClr" => &b"val"[..],
        b"sysClr" => &b"lastClr"[..],
        _ => return None,
    };
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == wanted)
        .and_then(|a| a.unescape_value().ok().map(|s| s.to_string()))
}
