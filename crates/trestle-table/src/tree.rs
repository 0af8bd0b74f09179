//! The table box tree.
//!
//! [§ 17.2 The CSS table model](https://www.w3.org/TR/CSS2/tables.html#table-display)
//!
//! "The CSS table model is based on the HTML4 table model, in which the
//! structure of a table closely parallels the visual layout of the table."
//!
//! A [`crate::Table`] owns every part of itself in flat arenas. Parts refer
//! to each other through the typed indices defined here, so a cell can name
//! its row and a row its section without shared ownership.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::grid::GridRow;
use crate::layout::borders::BorderCache;
use crate::style::{CellStyle, ColumnStyle, LayoutUnit, Padding, RowStyle, SectionStyle};

/// Largest `colspan` a cell may have; larger values are clamped.
pub const MAX_COLSPAN: u32 = 1000;

/// Largest `rowspan` a cell may have; larger values are clamped.
pub const MAX_ROWSPAN: u32 = 65534;

/// Largest `span` a `col` or `colgroup` may have; larger values are clamped.
pub const MAX_COLUMN_SPAN: u32 = 1000;

/// Index of a row group in its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SectionId(pub usize);

/// Index of a row in its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RowId(pub usize);

/// Index of a cell in its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CellId(pub usize);

/// Index of a `col` or `colgroup` in its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ColumnElementId(pub usize);

/// [§ 17.2](https://www.w3.org/TR/CSS2/tables.html#table-display)
///
/// Which `display` value a row group has.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    /// `table-header-group`: "this row group is always displayed before all
    /// other rows and row groups"
    Head,
    /// `table-row-group`
    #[default]
    Body,
    /// `table-footer-group`: "this row group is always displayed after all
    /// other rows and row groups"
    Foot,
}

/// Whether a column element is a `col` or a `colgroup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
pub enum ColumnKind {
    /// `table-column`
    Column,
    /// `table-column-group`
    Group,
}

/// A `col` or `colgroup`.
#[derive(Debug, Clone)]
pub struct ColumnElement {
    /// Column or group.
    pub kind: ColumnKind,
    /// Computed style.
    pub style: ColumnStyle,
    /// The enclosing group, for a `col` inside a `colgroup`.
    pub parent: Option<ColumnElementId>,
    /// Child columns of a group.
    pub children: Vec<ColumnElementId>,
}

impl ColumnElement {
    /// Number of absolute columns this element covers.
    ///
    /// A group with children covers nothing itself; its children do.
    #[must_use]
    pub fn span(&self) -> usize {
        self.style.span.clamp(1, MAX_COLUMN_SPAN) as usize
    }

    /// `true` for a `colgroup` whose columns are given by child `col`s.
    #[must_use]
    pub fn is_group_with_children(&self) -> bool {
        self.kind == ColumnKind::Group && !self.children.is_empty()
    }
}

/// Intrinsic measurements of a cell's content box.
///
/// Text shaping and line breaking happen elsewhere; the host measures each
/// cell's contents and hands the results over here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellContent {
    /// Narrowest width the content can take without overflowing.
    pub min_width: LayoutUnit,
    /// Width the content takes without any line breaks.
    pub max_width: LayoutUnit,
    /// Height of the content at its laid-out width.
    pub height: LayoutUnit,
    /// Offset of the first line's baseline from the content top, if any.
    pub baseline: Option<LayoutUnit>,
}

impl CellContent {
    /// Content that measures `min` by `max` wide and `height` tall.
    #[must_use]
    pub const fn new(min_width: LayoutUnit, max_width: LayoutUnit, height: LayoutUnit) -> Self {
        Self {
            min_width,
            max_width,
            height,
            baseline: None,
        }
    }

    /// Fixed-size content (an image, say): min and max width agree.
    #[must_use]
    pub const fn fixed(width: LayoutUnit, height: LayoutUnit) -> Self {
        Self::new(width, width, height)
    }

    /// Set the first baseline.
    #[must_use]
    pub const fn with_baseline(mut self, baseline: LayoutUnit) -> Self {
        self.baseline = Some(baseline);
        self
    }

    /// `true` when there is nothing inside the cell.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.min_width <= 0 && self.max_width <= 0 && self.height <= 0
    }
}

/// A row group.
#[derive(Debug, Clone)]
pub struct Section {
    /// Head, body or foot.
    pub kind: SectionKind,
    /// Computed style.
    pub style: SectionStyle,
    /// Attached rows in source order.
    pub rows: Vec<RowId>,
    /// One entry per grid row, including rows that exist only because a
    /// cell's rowspan reaches past the last row element.
    pub(crate) grid: Vec<GridRow>,
    /// Insertion column for the next cell of the current row.
    pub(crate) c_col: usize,
    /// Number of row elements placed so far.
    pub(crate) c_row: usize,
    /// Set when `grid` no longer reflects `rows`.
    pub(crate) needs_cell_recalc: bool,
    /// Cumulative row offsets from the section top, one more than rows.
    pub(crate) row_pos: Vec<LayoutUnit>,
    /// Offset of the section from the table's border-box top.
    pub(crate) logical_top: LayoutUnit,
    /// Collapsed borders of cells in this section.
    pub(crate) border_cache: BorderCache,
}

impl Section {
    pub(crate) fn new(kind: SectionKind, style: SectionStyle) -> Self {
        Self {
            kind,
            style,
            rows: Vec::new(),
            grid: Vec::new(),
            c_col: 0,
            c_row: 0,
            needs_cell_recalc: false,
            row_pos: vec![0],
            logical_top: 0,
            border_cache: BorderCache::default(),
        }
    }

    /// Number of grid rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.grid.len()
    }

    /// Height of the section after layout.
    #[must_use]
    pub fn logical_height(&self) -> LayoutUnit {
        self.row_pos.last().copied().unwrap_or(0) - self.row_pos.first().copied().unwrap_or(0)
    }
}

/// A table row.
#[derive(Debug, Clone)]
pub struct Row {
    /// Computed style.
    pub style: RowStyle,
    /// The row group this row belongs to.
    pub section: SectionId,
    /// Attached cells in source order.
    pub cells: Vec<CellId>,
    /// Index of this row's grid row within its section.
    pub(crate) grid_index: usize,
    /// Cleared when the row is removed from its section.
    pub(crate) attached: bool,
}

/// A table cell.
#[derive(Debug, Clone)]
pub struct Cell {
    /// Computed style.
    pub style: CellStyle,
    /// Measured content.
    pub content: CellContent,
    /// The row this cell is declared in.
    pub row: RowId,
    /// Grid row of the cell's origin within its section.
    pub(crate) grid_row: usize,
    /// Absolute column of the cell's origin.
    pub(crate) col: usize,
    /// Minimum border-box width, refreshed every layout.
    pub(crate) min_width: LayoutUnit,
    /// Maximum border-box width, refreshed every layout.
    pub(crate) max_width: LayoutUnit,
    /// Cleared when the cell is removed from its row.
    pub(crate) attached: bool,
}

impl Cell {
    /// Number of columns spanned, between one and [`MAX_COLSPAN`].
    #[must_use]
    pub fn colspan(&self) -> usize {
        self.style.colspan.clamp(1, MAX_COLSPAN) as usize
    }

    /// Number of rows spanned, between one and [`MAX_ROWSPAN`].
    #[must_use]
    pub fn rowspan(&self) -> usize {
        self.style.rowspan.clamp(1, MAX_ROWSPAN) as usize
    }

    /// Absolute column index of the cell's first column.
    #[must_use]
    pub const fn col(&self) -> usize {
        self.col
    }

    /// Row index of the cell's first row within its section.
    #[must_use]
    pub const fn row_index(&self) -> usize {
        self.grid_row
    }

    /// Minimum preferred border-box width from the last layout.
    #[must_use]
    pub const fn min_preferred_width(&self) -> LayoutUnit {
        self.min_width
    }

    /// Maximum preferred border-box width from the last layout.
    #[must_use]
    pub const fn max_preferred_width(&self) -> LayoutUnit {
        self.max_width
    }

    /// A cell with padding or visible borders counts as non-empty even
    /// without content.
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
            || self.style.borders.any_visible()
            || self.style.padding != Padding::default()
    }
}
