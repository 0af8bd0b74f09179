//! Border values.
//!
//! [CSS Backgrounds and Borders Level 3 § 4](https://www.w3.org/TR/css-backgrounds-3/#borders)
//!
//! Edges are logical (`start`/`end` along a row, `before`/`after` across
//! rows) so the same resolution code serves both directions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use super::color::Color;
use super::length::LayoutUnit;
use crate::error::BorderParseError;

/// [§ 4.2 'border-style'](https://www.w3.org/TR/css-backgrounds-3/#border-style)
///
/// Variants are declared in ascending conflict-resolution strength, so the
/// derived ordering is the § 17.6.2.1 style ranking: "If border styles
/// differ, 'double' beats 'solid', which beats 'dashed', which beats
/// 'dotted', which beats 'ridge', which beats 'outset', which beats
/// 'groove', which beats 'inset'." `none` and `hidden` are special-cased by
/// the resolver and never compared by rank.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    /// No border; loses to every other style.
    #[default]
    None,
    /// No border, and suppresses every border it conflicts with.
    Hidden,
    /// Looks embedded.
    Inset,
    /// Looks carved.
    Groove,
    /// Looks raised.
    Outset,
    /// Looks extruded.
    Ridge,
    /// Series of dots.
    Dotted,
    /// Series of dashes.
    Dashed,
    /// Single line.
    Solid,
    /// Two parallel lines.
    Double,
}

impl BorderStyle {
    /// `none` and `hidden` draw nothing and have a used width of zero.
    #[must_use]
    pub const fn is_visible(self) -> bool {
        !matches!(self, Self::None | Self::Hidden)
    }
}

/// A logical edge of a table part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BorderEdge {
    /// Inline-start (left in a left-to-right table).
    Start,
    /// Inline-end.
    End,
    /// Block-start (top).
    Before,
    /// Block-end (bottom).
    After,
}

/// One edge's `border-style`, `border-width` and `border-color`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BorderSpec {
    /// [§ 4.2 'border-style'](https://www.w3.org/TR/css-backgrounds-3/#border-style)
    pub style: BorderStyle,
    /// [§ 4.3 'border-width'](https://www.w3.org/TR/css-backgrounds-3/#border-width)
    pub width: LayoutUnit,
    /// [§ 4.1 'border-color'](https://www.w3.org/TR/css-backgrounds-3/#border-color)
    pub color: Color,
}

impl BorderSpec {
    /// A solid border of `width` pixels.
    #[must_use]
    pub const fn solid(width: LayoutUnit, color: Color) -> Self {
        Self {
            style: BorderStyle::Solid,
            width,
            color,
        }
    }

    /// `border-style: hidden`.
    #[must_use]
    pub const fn hidden() -> Self {
        Self {
            style: BorderStyle::Hidden,
            width: 0,
            color: Color::BLACK,
        }
    }

    /// [§ 4.3](https://www.w3.org/TR/css-backgrounds-3/#border-width)
    ///
    /// "Computed value: absolute length, snapped as a border width; zero if
    /// the border style is none or hidden"
    #[must_use]
    pub fn used_width(&self) -> LayoutUnit {
        if self.style.is_visible() {
            self.width.max(0)
        } else {
            0
        }
    }
}

/// `thin`, `medium` and `thick` in pixels.
fn keyword_width(token: &str) -> Option<LayoutUnit> {
    match token.to_ascii_lowercase().as_str() {
        "thin" => Some(1),
        "medium" => Some(3),
        "thick" => Some(5),
        _ => None,
    }
}

impl FromStr for BorderSpec {
    type Err = BorderParseError;

    /// Parse the `border` shorthand: width, style and color in any order.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut spec = Self::default();
        let mut width_seen = false;
        for token in s.split_whitespace() {
            if let Ok(style) = token.parse::<BorderStyle>() {
                spec.style = style;
            } else if let Some(width) = keyword_width(token) {
                spec.width = width;
                width_seen = true;
            } else if let Some(px) = token
                .strip_suffix("px")
                .unwrap_or(token)
                .parse::<f32>()
                .ok()
                .filter(|px| px.is_finite() && *px >= 0.0)
            {
                spec.width = px.round() as LayoutUnit;
                width_seen = true;
            } else if let Ok(color) = token.parse::<Color>() {
                spec.color = color;
            } else {
                return Err(BorderParseError(token.to_string()));
            }
        }
        // "Initial: medium"
        if !width_seen && spec.style.is_visible() {
            spec.width = 3;
        }
        Ok(spec)
    }
}

impl TryFrom<String> for BorderSpec {
    type Error = BorderParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BorderSpec> for String {
    fn from(spec: BorderSpec) -> Self {
        spec.to_string()
    }
}

impl fmt::Display for BorderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px {} {}", self.width, self.style, self.color)
    }
}

/// The four logical borders of a table part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BorderEdgesRepr")]
pub struct BorderEdges {
    /// Inline-start border.
    pub start: BorderSpec,
    /// Inline-end border.
    pub end: BorderSpec,
    /// Block-start border.
    pub before: BorderSpec,
    /// Block-end border.
    pub after: BorderSpec,
}

impl BorderEdges {
    /// The same border on every edge.
    #[must_use]
    pub const fn all(spec: BorderSpec) -> Self {
        Self {
            start: spec,
            end: spec,
            before: spec,
            after: spec,
        }
    }

    /// The border on `edge`.
    #[must_use]
    pub const fn get(&self, edge: BorderEdge) -> BorderSpec {
        match edge {
            BorderEdge::Start => self.start,
            BorderEdge::End => self.end,
            BorderEdge::Before => self.before,
            BorderEdge::After => self.after,
        }
    }

    /// Replace the border on `edge`.
    pub const fn set(&mut self, edge: BorderEdge, spec: BorderSpec) {
        match edge {
            BorderEdge::Start => self.start = spec,
            BorderEdge::End => self.end = spec,
            BorderEdge::Before => self.before = spec,
            BorderEdge::After => self.after = spec,
        }
    }

    /// Used widths of the start and end borders.
    #[must_use]
    pub fn inline_sum(&self) -> LayoutUnit {
        self.start.used_width() + self.end.used_width()
    }

    /// Used widths of the before and after borders.
    #[must_use]
    pub fn block_sum(&self) -> LayoutUnit {
        self.before.used_width() + self.after.used_width()
    }

    /// `true` if any edge draws something.
    #[must_use]
    pub fn any_visible(&self) -> bool {
        [self.start, self.end, self.before, self.after]
            .iter()
            .any(|b| b.used_width() > 0)
    }
}

/// Borders are written either as one shorthand for all edges or per edge.
#[derive(Deserialize)]
#[serde(untagged)]
enum BorderEdgesRepr {
    All(BorderSpec),
    Sides {
        #[serde(default)]
        start: Option<BorderSpec>,
        #[serde(default)]
        end: Option<BorderSpec>,
        #[serde(default)]
        before: Option<BorderSpec>,
        #[serde(default)]
        after: Option<BorderSpec>,
    },
}

impl From<BorderEdgesRepr> for BorderEdges {
    fn from(repr: BorderEdgesRepr) -> Self {
        match repr {
            BorderEdgesRepr::All(spec) => Self::all(spec),
            BorderEdgesRepr::Sides {
                start,
                end,
                before,
                after,
            } => Self {
                start: start.unwrap_or_default(),
                end: end.unwrap_or_default(),
                before: before.unwrap_or_default(),
                after: after.unwrap_or_default(),
            },
        }
    }
}
