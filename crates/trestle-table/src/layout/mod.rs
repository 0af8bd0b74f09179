//! Table layout.
//!
//! [§ 17.5 Visual layout of table contents](https://www.w3.org/TR/CSS2/tables.html#table-layout)
//!
//! A layout pass runs in a fixed order:
//!
//! 1. Rebuild the grid if its structure changed.
//! 2. Compute the table's intrinsic widths with the automatic or fixed
//!    algorithm, then apply the document mode's adjustments.
//! 3. Resolve the table's used width against the containing block.
//! 4. Distribute that width over the columns.
//! 5. Size rows and give any extra table height to the first body.
//! 6. Turn column and row offsets into cell boxes.
//!
//! Collapsed borders are resolved on demand along the way and cached until
//! something that can affect them changes.

pub mod auto;
pub mod borders;
pub mod fixed;
pub mod position;
mod preferred;
pub mod rows;

use serde::{Deserialize, Serialize};

use crate::style::{LayoutUnit, TableLayoutMode, TableLength, TableStyle};
use crate::table::Table;

pub use auto::{AutoTableLayout, ColumnLayout};
pub use fixed::FixedTableLayout;
pub use position::{CellGeometry, SectionGeometry, TableGeometry};
pub use rows::{CellMeasurer, DeclaredContent};

/// The containing block and document mode a table is laid out in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutInput {
    /// Width of the containing block.
    pub available_width: LayoutUnit,
    /// Height of the containing block, when it is definite.
    pub available_height: Option<LayoutUnit>,
    /// Lay out with legacy quirks.
    pub quirks_mode: bool,
}

impl LayoutInput {
    /// Standards-mode layout in a containing block `available_width` wide.
    #[must_use]
    pub const fn new(available_width: LayoutUnit) -> Self {
        Self {
            available_width,
            available_height: None,
            quirks_mode: false,
        }
    }

    /// Give the containing block a definite height.
    #[must_use]
    pub const fn with_height(mut self, available_height: LayoutUnit) -> Self {
        self.available_height = Some(available_height);
        self
    }

    /// Switch to quirks mode.
    #[must_use]
    pub const fn with_quirks(mut self, quirks_mode: bool) -> Self {
        self.quirks_mode = quirks_mode;
        self
    }
}

/// [§ 17.5.2 Table width algorithms](https://www.w3.org/TR/CSS2/tables.html#width-layout)
///
/// The column width algorithm a table uses.
#[derive(Debug, Clone)]
pub enum TableLayoutStrategy {
    /// Widths from cell content.
    Auto(AutoTableLayout),
    /// Widths from column elements and the first row only.
    Fixed(FixedTableLayout),
}

impl TableLayoutStrategy {
    /// "The table's width may be specified explicitly with the 'width'
    /// property. A value of 'auto' (for both 'display: table' and 'display:
    /// inline-table') means use the automatic table layout algorithm."
    #[must_use]
    pub fn for_table(style: &TableStyle) -> Self {
        if style.layout == TableLayoutMode::Fixed && !style.width.is_auto() {
            Self::Fixed(FixedTableLayout::new())
        } else {
            Self::Auto(AutoTableLayout::new())
        }
    }

    /// Compute the table's minimum and maximum widths.
    pub fn compute_intrinsic_widths(&mut self, table: &mut Table) {
        match self {
            Self::Auto(layout) => layout.compute_intrinsic_widths(table),
            Self::Fixed(layout) => layout.compute_intrinsic_widths(table),
        }
    }

    /// Adjust the intrinsic widths for the document mode and a fixed table
    /// width.
    pub fn apply_quirks(&mut self, table: &mut Table, quirks_mode: bool) {
        match self {
            Self::Auto(layout) => layout.apply_quirks(table, quirks_mode),
            Self::Fixed(layout) => layout.apply_quirks(table, quirks_mode),
        }
    }

    /// Distribute the table's used width over its columns.
    pub fn layout(&mut self, table: &mut Table) {
        match self {
            Self::Auto(layout) => layout.layout(table),
            Self::Fixed(layout) => layout.layout(table),
        }
    }
}

impl Table {
    /// Bring the grid, the table's border widths and every cell's preferred
    /// widths up to date.
    pub(crate) fn prepare_intrinsic_pass(&mut self) {
        self.build_grid();
        self.update_outer_borders();
        self.compute_cell_preferred_widths();
    }

    /// [§ 17.5.2](https://www.w3.org/TR/CSS2/tables.html#width-layout)
    ///
    /// The used width is the declared width, or the containing block width
    /// capped at the maximum for `auto`, but never below the minimum.
    fn compute_logical_width(&mut self, available_width: LayoutUnit) {
        let available = available_width.max(0);
        let min = self.min_preferred_width;
        let width = match self.style.width {
            TableLength::Fixed(w) if w > 0 => w,
            TableLength::Percent(p) if p > 0.0 => TableLength::Percent(p).resolve_or_zero(available),
            _ => available.min(self.max_preferred_width),
        };
        self.logical_width = width.max(min);
    }

    /// Minimum and maximum border-box widths, without laying out.
    pub fn compute_preferred_widths(&mut self, quirks_mode: bool) -> (LayoutUnit, LayoutUnit) {
        let mut strategy = TableLayoutStrategy::for_table(&self.style);
        strategy.compute_intrinsic_widths(self);
        strategy.apply_quirks(self, quirks_mode);
        self.preferred_widths()
    }

    /// Lay the table out in `input`'s containing block, measuring cell
    /// content with `measurer`.
    pub fn layout(&mut self, input: &LayoutInput, measurer: &dyn CellMeasurer) -> TableGeometry {
        self.build_grid();

        let mut strategy = TableLayoutStrategy::for_table(&self.style);
        strategy.compute_intrinsic_widths(self);
        strategy.apply_quirks(self, input.quirks_mode);
        self.compute_logical_width(input.available_width);
        tracing::debug!(
            min = self.min_preferred_width,
            max = self.max_preferred_width,
            width = self.logical_width,
            fixed = matches!(strategy, TableLayoutStrategy::Fixed(_)),
            "resolved table width"
        );
        strategy.layout(self);

        let measured = self.layout_sections(input, measurer);
        tracing::debug!(height = self.logical_height, "sized table rows");
        self.geometry(&measured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_layout_needs_a_width() {
        let style = TableStyle {
            layout: TableLayoutMode::Fixed,
            ..TableStyle::default()
        };
        assert!(matches!(TableLayoutStrategy::for_table(&style), TableLayoutStrategy::Auto(_)));

        let style = TableStyle {
            layout: TableLayoutMode::Fixed,
            width: TableLength::Percent(100.0),
            ..TableStyle::default()
        };
        assert!(matches!(TableLayoutStrategy::for_table(&style), TableLayoutStrategy::Fixed(_)));
    }

    #[test]
    fn test_auto_width_is_capped_by_container_and_floored_by_min() {
        let mut table = Table::new(TableStyle::default());
        table.min_preferred_width = 120;
        table.max_preferred_width = 900;
        table.compute_logical_width(500);
        assert_eq!(table.logical_width, 500);
        table.compute_logical_width(80);
        assert_eq!(table.logical_width, 120);
    }

    #[test]
    fn test_percent_width_resolves_against_container() {
        let mut table = Table::new(TableStyle {
            width: TableLength::Percent(50.0),
            ..TableStyle::default()
        });
        table.min_preferred_width = 10;
        table.compute_logical_width(640);
        assert_eq!(table.logical_width, 320);
    }
}
