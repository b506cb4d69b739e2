//! Fill definitions as declared in the styles part

use super::ColorRef;

/// One `<fill>` entry from `styles.xml`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FillDef {
    /// No fill, or a pattern of `none`
    #[default]
    None,

    /// Pattern fill (`solid`, `gray125`, ...)
    Pattern {
        /// `patternType` attribute
        pattern: String,
        /// `fgColor` element, if present
        foreground: Option<ColorRef>,
    },

    /// Gradient fill; gradients carry no single background color
    Gradient,
}

impl FillDef {
    /// Create a solid fill with the given foreground
    pub fn solid(color: ColorRef) -> Self {
        FillDef::Pattern {
            pattern: "solid".into(),
            foreground: Some(color),
        }
    }

    /// The color this fill paints the cell with, if any
    pub fn foreground(&self) -> Option<&ColorRef> {
        match self {
            FillDef::Pattern { foreground, .. } => foreground.as_ref(),
            FillDef::None | FillDef::Gradient => None,
        }
    }
}
