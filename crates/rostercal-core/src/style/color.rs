//! Color references and canonical color bucketing

use std::fmt;

/// A channel value at or above this counts as "bright" when bucketing.
pub const BRIGHT_THRESHOLD: u8 = 200;

/// Color reference as it appears on a fill's `fgColor` element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ColorRef {
    /// Automatic/default color
    #[default]
    Auto,

    /// Explicit `rgb` attribute, kept as written (6 or 8 hex digits)
    Rgb(String),

    /// Indexed color (legacy Excel palette)
    Indexed(u8),

    /// Theme color, an index into the document's color scheme
    Theme(u32),
}

impl ColorRef {
    /// Resolve to a hex string (6 or 8 digits, no `#`).
    ///
    /// Returns `None` for automatic colors, out-of-range palette indices and
    /// theme slots the document does not define.
    pub fn resolve(&self, theme: &ThemePalette) -> Option<String> {
        match self {
            ColorRef::Auto => None,
            ColorRef::Rgb(hex) => Some(hex.clone()),
            ColorRef::Indexed(i) => indexed_hex(*i).map(str::to_string),
            ColorRef::Theme(i) => theme.get(*i as usize).map(str::to_string),
        }
    }
}

/// The document theme's color scheme, in `clrScheme` child order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemePalette {
    colors: Vec<String>,
}

impl ThemePalette {
    /// Create a palette from hex strings
    pub fn new(colors: Vec<String>) -> Self {
        Self { colors }
    }

    /// Hex string at a scheme position; empty slots count as missing
    pub fn get(&self, index: usize) -> Option<&str> {
        self.colors
            .get(index)
            .map(String::as_str)
            .filter(|c| !c.is_empty())
    }

    /// Number of scheme entries
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Check if the document had no theme colors
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Hex value for a legacy palette index
pub fn indexed_hex(index: u8) -> Option<&'static str> {
    // Standard Excel color palette (first 56 colors)
    const PALETTE: [&str; 56] = [
        "000000", // 0: Black
        "FFFFFF", // 1: White
        "FF0000", // 2: Red
        "00FF00", // 3: Bright Green
        "0000FF", // 4: Blue
        "FFFF00", // 5: Yellow
        "FF00FF", // 6: Pink
        "00FFFF", // 7: Turquoise
        "000000", // 8: Black
        "FFFFFF", // 9: White
        "FF0000", // 10: Red
        "00FF00", // 11: Bright Green
        "0000FF", // 12: Blue
        "FFFF00", // 13: Yellow
        "FF00FF", // 14: Pink
        "00FFFF", // 15: Turquoise
        "800000", // 16: Dark Red
        "008000", // 17: Green
        "000080", // 18: Dark Blue
        "808000", // 19: Dark Yellow
        "800080", // 20: Violet
        "008080", // 21: Teal
        "C0C0C0", // 22: 25% Gray
        "808080", // 23: 50% Gray
        "9999FF", // 24: Periwinkle
        "993366", // 25: Plum
        "FFFFCC", // 26: Ivory
        "CCFFFF", // 27: Light Turquoise
        "660066", // 28: Dark Purple
        "FF8080", // 29: Coral
        "0066CC", // 30: Ocean Blue
        "CCCCFF", // 31: Ice Blue
        "000080", // 32: Dark Blue
        "FF00FF", // 33: Pink
        "FFFF00", // 34: Yellow
        "00FFFF", // 35: Turquoise
        "800080", // 36: Violet
        "800000", // 37: Dark Red
        "008080", // 38: Teal
        "0000FF", // 39: Blue
        "00CCFF", // 40: Sky Blue
        "CCFFFF", // 41: Light Turquoise
        "CCFFCC", // 42: Light Green
        "FFFF99", // 43: Light Yellow
        "99CCFF", // 44: Pale Blue
        "FF99CC", // 45: Rose
        "CC99FF", // 46: Lavender
        "FFCC99", // 47: Tan
        "3366FF", // 48: Light Blue
        "33CCCC", // 49: Aqua
        "99CC00", // 50: Lime
        "FFCC00", // 51: Gold
        "FF9900", // 52: Light Orange
        "FF6600", // 53: Orange
        "666699", // 54: Blue-Gray
        "969696", // 55: 40% Gray
    ];

    PALETTE.get(index as usize).copied()
}

/// Canonical color a fill is bucketed into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum NamedColor {
    Black,
    Blue,
    Green,
    Red,
    Cyan,
    Yellow,
    White,
    Unknown,
}

/// Exact hex values that name a color without bucketing
const NAMED_COLORS: [(&str, NamedColor); 7] = [
    ("000000", NamedColor::Black),
    ("0000FF", NamedColor::Blue),
    ("00FF00", NamedColor::Green),
    ("FF0000", NamedColor::Red),
    ("00FFFF", NamedColor::Cyan),
    ("FFFF00", NamedColor::Yellow),
    ("FFFFFF", NamedColor::White),
];

impl NamedColor {
    /// Bucket a hex string (with or without `#`, 6 or 8 digits)
    ///
    /// ```
    /// use rostercal_core::NamedColor;
    ///
    /// assert_eq!(NamedColor::from_hex("FFFFFF00"), NamedColor::Yellow);
    /// assert_eq!(NamedColor::from_hex("#1F4E79"), NamedColor::Black);
    /// assert_eq!(NamedColor::from_hex("zzzzzz"), NamedColor::Unknown);
    /// ```
    pub fn from_hex(hex: &str) -> NamedColor {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return NamedColor::Unknown;
        }
        let rgb = match hex.len() {
            6 => hex,
            8 => &hex[2..],
            _ => return NamedColor::Unknown,
        };

        if let Some((_, named)) = NAMED_COLORS
            .iter()
            .find(|(h, _)| h.eq_ignore_ascii_case(rgb))
        {
            return *named;
        }

        let channel = |i: usize| u8::from_str_radix(&rgb[i..i + 2], 16).unwrap_or(0);
        Self::from_channels(channel(0), channel(2), channel(4))
    }

    /// Bucket by channel brightness
    pub fn from_channels(r: u8, g: u8, b: u8) -> NamedColor {
        let bright = |c: u8| c >= BRIGHT_THRESHOLD;
        match (bright(r), bright(g), bright(b)) {
            (false, false, false) => NamedColor::Black,
            (false, false, true) => NamedColor::Blue,
            (false, true, false) => NamedColor::Green,
            (true, false, false) => NamedColor::Red,
            (false, true, true) => NamedColor::Cyan,
            (true, true, false) => NamedColor::Yellow,
            (true, true, true) => NamedColor::White,
            (true, false, true) => NamedColor::Unknown,
        }
    }

    /// Display name
    pub fn as_str(&self) -> &'static str {
        match self {
            NamedColor::Black => "Black",
            NamedColor::Blue => "Blue",
            NamedColor::Green => "Green",
            NamedColor::Red => "Red",
            NamedColor::Cyan => "Cyan",
            NamedColor::Yellow => "Yellow",
            NamedColor::White => "White",
            NamedColor::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for NamedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
