//! Table lengths.
//!
//! [§ 17.5.2 Table width algorithms](https://www.w3.org/TR/CSS2/tables.html#width-layout)
//!
//! Widths and heights of tables, columns, rows and cells resolve to one of
//! four kinds. Pixel values are integral: the column distribution passes
//! must hand out every pixel of the table width exactly, which floating
//! point accumulation cannot promise.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LengthParseError;

/// Integer CSS pixels, the unit of every computed position and size.
pub type LayoutUnit = i32;

/// Largest value a declared cell width may take.
///
/// Browsers inherited a 16-bit width limit from KHTML; widths above it are
/// clamped rather than rejected.
pub const CELL_MAX_WIDTH: LayoutUnit = 32760;

/// A declared `width` or `height` on a table part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TableLength {
    /// `auto`: sized from content.
    #[default]
    Auto,
    /// A pixel length.
    Fixed(LayoutUnit),
    /// A percentage of the table (for columns) or of the containing block.
    Percent(f32),
    /// A relative weight (`2*`), sharing leftover width proportionally.
    Relative(LayoutUnit),
}

impl TableLength {
    /// `true` for `auto`.
    #[must_use]
    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }

    /// `true` for pixel lengths.
    #[must_use]
    pub const fn is_fixed(self) -> bool {
        matches!(self, Self::Fixed(_))
    }

    /// `true` for percentages.
    #[must_use]
    pub const fn is_percent(self) -> bool {
        matches!(self, Self::Percent(_))
    }

    /// `true` for relative weights.
    #[must_use]
    pub const fn is_relative(self) -> bool {
        matches!(self, Self::Relative(_))
    }

    /// The pixel value of a fixed length.
    #[must_use]
    pub const fn fixed(self) -> Option<LayoutUnit> {
        match self {
            Self::Fixed(px) => Some(px),
            _ => None,
        }
    }

    /// The percentage of a percent length.
    #[must_use]
    pub const fn percent(self) -> Option<f32> {
        match self {
            Self::Percent(p) => Some(p),
            _ => None,
        }
    }

    /// `true` when the length is non-auto with a value above zero.
    #[must_use]
    pub fn is_positive(self) -> bool {
        match self {
            Self::Auto => false,
            Self::Fixed(v) | Self::Relative(v) => v > 0,
            Self::Percent(p) => p > 0.0,
        }
    }

    /// `true` when the length is non-auto with a zero value.
    #[must_use]
    pub fn is_zero(self) -> bool {
        match self {
            Self::Auto => false,
            Self::Fixed(v) | Self::Relative(v) => v == 0,
            Self::Percent(p) => p == 0.0,
        }
    }

    /// Resolve against `base`, treating `auto` and relative weights as zero.
    ///
    /// Percentages round down so that resolved widths never add up to more
    /// than the space they were taken from.
    #[must_use]
    pub fn resolve_or_zero(self, base: LayoutUnit) -> LayoutUnit {
        match self {
            Self::Fixed(v) => v,
            Self::Percent(p) => (base as f32 * p / 100.0) as LayoutUnit,
            Self::Auto | Self::Relative(_) => 0,
        }
    }

    /// Multiply the value (not the kind) by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        match self {
            Self::Auto => Self::Auto,
            Self::Fixed(v) => Self::Fixed((v as f32 * factor) as LayoutUnit),
            Self::Percent(p) => Self::Percent(p * factor),
            Self::Relative(v) => Self::Relative((v as f32 * factor) as LayoutUnit),
        }
    }

    /// Clamp the value into `[0, max]`, keeping the kind.
    #[must_use]
    pub fn clamped(self, max: LayoutUnit) -> Self {
        match self {
            Self::Fixed(v) => Self::Fixed(v.clamp(0, max)),
            Self::Relative(v) => Self::Relative(v.clamp(0, max)),
            Self::Percent(p) => Self::Percent(p.clamp(0.0, max as f32)),
            Self::Auto => Self::Auto,
        }
    }

    /// Fixed and percent lengths of zero read as `auto`.
    ///
    /// `width: 0` on a column or spanning cell carries no sizing intent.
    #[must_use]
    pub fn zero_as_auto(self) -> Self {
        match self {
            Self::Fixed(0) => Self::Auto,
            Self::Percent(p) if p == 0.0 => Self::Auto,
            other => other,
        }
    }
}

impl FromStr for TableLength {
    type Err = LengthParseError;

    /// Parse `auto`, `120px`, `120` (HTML attribute pixels), `50%`, `2*` or `*`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let err = || LengthParseError(text.to_string());

        if text.eq_ignore_ascii_case("auto") || text.is_empty() {
            return Ok(Self::Auto);
        }
        if let Some(number) = text.strip_suffix('%') {
            let p: f32 = number.trim().parse().map_err(|_| err())?;
            if !p.is_finite() || p < 0.0 {
                return Err(err());
            }
            return Ok(Self::Percent(p));
        }
        if let Some(number) = text.strip_suffix('*') {
            let number = number.trim();
            if number.is_empty() {
                return Ok(Self::Relative(1));
            }
            let weight: LayoutUnit = number.parse().map_err(|_| err())?;
            return Ok(Self::Relative(weight.max(0)));
        }
        let number = text
            .strip_suffix("px")
            .or_else(|| text.strip_suffix("PX"))
            .unwrap_or(text)
            .trim();
        let px: f32 = number.parse().map_err(|_| err())?;
        if !px.is_finite() {
            return Err(err());
        }
        Ok(Self::Fixed(px.round() as LayoutUnit))
    }
}

impl TryFrom<String> for TableLength {
    type Error = LengthParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TableLength> for String {
    fn from(length: TableLength) -> Self {
        length.to_string()
    }
}

impl fmt::Display for TableLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Fixed(px) => write!(f, "{px}px"),
            Self::Percent(p) => write!(f, "{p}%"),
            Self::Relative(w) => write!(f, "{w}*"),
        }
    }
}
