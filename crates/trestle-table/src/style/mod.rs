//! Computed style of table parts.
//!
//! [§ 17 Tables](https://www.w3.org/TR/CSS2/tables.html)
//!
//! The engine does not run a cascade: the host hands over the computed
//! values of the handful of properties table layout reads. Every struct
//! deserializes from the table description format with CSS initial values
//! for omitted fields.

pub mod border;
pub mod color;
pub mod length;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

pub use border::{BorderEdge, BorderEdges, BorderSpec, BorderStyle};
pub use color::Color;
pub use length::{CELL_MAX_WIDTH, LayoutUnit, TableLength};

/// [§ 17.5.2 'table-layout'](https://www.w3.org/TR/CSS2/tables.html#width-layout)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum TableLayoutMode {
    /// "Use any automatic table layout algorithm"
    #[default]
    Auto,
    /// "Use the fixed table layout algorithm"
    Fixed,
}

/// [§ 17.6 'border-collapse'](https://www.w3.org/TR/CSS2/tables.html#borders)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum BorderCollapse {
    /// [§ 17.6.1 The separated borders model](https://www.w3.org/TR/CSS2/tables.html#separated-borders)
    #[default]
    Separate,
    /// [§ 17.6.2 The collapsing border model](https://www.w3.org/TR/CSS2/tables.html#collapsing-borders)
    Collapse,
}

/// [§ 9.10 'direction'](https://www.w3.org/TR/CSS2/visuren.html#direction)
///
/// "the direction of table column layout"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Columns run left to right.
    #[default]
    Ltr,
    /// Columns run right to left.
    Rtl,
}

/// [§ 17.5.3 'vertical-align' in table cells](https://www.w3.org/TR/CSS2/tables.html#height-layout)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    /// "The baseline of the cell is put at the same height as the baseline
    /// of the first of the rows it spans"
    #[default]
    Baseline,
    /// "The top of the cell box is aligned with the top of the first row it spans."
    Top,
    /// "The center of the cell is aligned with the center of the rows it spans."
    Middle,
    /// "The bottom of the cell box is aligned with the bottom of the last row it spans."
    Bottom,
}

/// [§ 17.6.1 'border-spacing'](https://www.w3.org/TR/CSS2/tables.html#separated-borders)
///
/// "The lengths specify the distance that separates adjoining cell borders.
/// If one length is specified, it gives both the horizontal and vertical
/// spacing."
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SpacingRepr")]
pub struct BorderSpacing {
    /// Space between columns.
    pub horizontal: LayoutUnit,
    /// Space between rows.
    pub vertical: LayoutUnit,
}

impl BorderSpacing {
    /// The same spacing in both directions.
    #[must_use]
    pub const fn uniform(spacing: LayoutUnit) -> Self {
        Self {
            horizontal: spacing,
            vertical: spacing,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SpacingRepr {
    Uniform(LayoutUnit),
    Pair([LayoutUnit; 2]),
    Axes {
        horizontal: LayoutUnit,
        vertical: LayoutUnit,
    },
}

impl From<SpacingRepr> for BorderSpacing {
    fn from(repr: SpacingRepr) -> Self {
        match repr {
            SpacingRepr::Uniform(s) => Self::uniform(s),
            SpacingRepr::Pair([horizontal, vertical]) | SpacingRepr::Axes { horizontal, vertical } => {
                Self {
                    horizontal,
                    vertical,
                }
            }
        }
    }
}

/// Logical padding, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PaddingRepr")]
pub struct Padding {
    /// Inline-start padding.
    pub start: LayoutUnit,
    /// Inline-end padding.
    pub end: LayoutUnit,
    /// Block-start padding.
    pub before: LayoutUnit,
    /// Block-end padding.
    pub after: LayoutUnit,
}

impl Padding {
    /// The same padding on every side.
    #[must_use]
    pub const fn all(p: LayoutUnit) -> Self {
        Self {
            start: p,
            end: p,
            before: p,
            after: p,
        }
    }

    /// Start plus end padding.
    #[must_use]
    pub const fn inline_sum(&self) -> LayoutUnit {
        self.start + self.end
    }

    /// Before plus after padding.
    #[must_use]
    pub const fn block_sum(&self) -> LayoutUnit {
        self.before + self.after
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PaddingRepr {
    All(LayoutUnit),
    Sides {
        #[serde(default)]
        start: LayoutUnit,
        #[serde(default)]
        end: LayoutUnit,
        #[serde(default)]
        before: LayoutUnit,
        #[serde(default)]
        after: LayoutUnit,
    },
}

impl From<PaddingRepr> for Padding {
    fn from(repr: PaddingRepr) -> Self {
        match repr {
            PaddingRepr::All(p) => Self::all(p.max(0)),
            PaddingRepr::Sides {
                start,
                end,
                before,
                after,
            } => Self {
                start: start.max(0),
                end: end.max(0),
                before: before.max(0),
                after: after.max(0),
            },
        }
    }
}

/// The table cell a nested table sits in, as far as column scaling cares.
///
/// Only the innermost cell is described directly; cells further out are
/// reached through `outer`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnclosingCell {
    /// The enclosing cell's declared width.
    pub width: TableLength,
    /// The enclosing cell's column span.
    pub colspan: u32,
    /// The declared width of the table the enclosing cell belongs to.
    pub table_width: TableLength,
    /// The cell enclosing that outer table, if any.
    pub outer: Option<Box<EnclosingCell>>,
}

/// Computed style of the table box.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableStyle {
    /// Declared width (border box).
    pub width: TableLength,
    /// Declared height (border box).
    pub height: TableLength,
    /// `table-layout`.
    pub layout: TableLayoutMode,
    /// `border-collapse`.
    pub border_collapse: BorderCollapse,
    /// `border-spacing`; ignored when borders collapse.
    pub border_spacing: BorderSpacing,
    /// The table's own borders.
    pub borders: BorderEdges,
    /// The table's padding; ignored when borders collapse.
    pub padding: Padding,
    /// `direction`.
    pub direction: Direction,
    /// Set when this table is laid out inside another table's cell.
    pub enclosing_cell: Option<EnclosingCell>,
}

impl TableStyle {
    /// `true` in the collapsing border model.
    #[must_use]
    pub fn collapses_borders(&self) -> bool {
        self.border_collapse == BorderCollapse::Collapse
    }
}

/// Computed style of a `table-column` or `table-column-group` box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnStyle {
    /// Number of columns the element represents. Zero is treated as one.
    pub span: u32,
    /// Declared width, applied to every column the element spans.
    pub width: TableLength,
    /// Borders, used only when borders collapse.
    pub borders: BorderEdges,
}

impl Default for ColumnStyle {
    fn default() -> Self {
        Self {
            span: 1,
            width: TableLength::Auto,
            borders: BorderEdges::default(),
        }
    }
}

/// Computed style of a row group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionStyle {
    /// Borders, used only when borders collapse.
    pub borders: BorderEdges,
}

/// Computed style of a row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowStyle {
    /// Declared height.
    pub height: TableLength,
    /// Borders, used only when borders collapse.
    pub borders: BorderEdges,
}

/// Computed style of a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellStyle {
    /// Columns spanned. Zero is treated as one.
    pub colspan: u32,
    /// Rows spanned. Zero is treated as one.
    pub rowspan: u32,
    /// Declared width (content box).
    pub width: TableLength,
    /// Declared height (content box in standards mode).
    pub height: TableLength,
    /// Cell padding.
    pub padding: Padding,
    /// Cell borders.
    pub borders: BorderEdges,
    /// The HTML `nowrap` attribute.
    pub nowrap: bool,
    /// `vertical-align`.
    pub vertical_align: VerticalAlign,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            colspan: 1,
            rowspan: 1,
            width: TableLength::Auto,
            height: TableLength::Auto,
            padding: Padding::default(),
            borders: BorderEdges::default(),
            nowrap: false,
            vertical_align: VerticalAlign::default(),
        }
    }
}
