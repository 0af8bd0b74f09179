//! Cell and row positions.
//!
//! Column offsets and row offsets are both cumulative, so a cell's box is
//! the difference of two offsets in each direction, less the spacing that
//! follows the last column or row it covers.

use serde::Serialize;

use crate::style::{Direction, LayoutUnit, VerticalAlign};
use crate::table::Table;
use crate::tree::{CellId, SectionId, SectionKind};

use super::rows::MeasuredCell;

/// Where a cell ended up, relative to the table's border box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellGeometry {
    /// The cell.
    pub cell: CellId,
    /// Its row group.
    pub section: SectionId,
    /// First grid row, within the section.
    pub row: usize,
    /// First effective column.
    pub col: usize,
    /// Effective columns covered.
    pub colspan: usize,
    /// Grid rows covered.
    pub rowspan: usize,
    /// Border-box left edge.
    pub x: LayoutUnit,
    /// Border-box top edge.
    pub y: LayoutUnit,
    /// Border-box width.
    pub width: LayoutUnit,
    /// Border-box height.
    pub height: LayoutUnit,
    /// Offset of the content box from the top of the cell box, after
    /// vertical alignment.
    pub content_offset: LayoutUnit,
}

/// Where a row group ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionGeometry {
    /// The section.
    pub section: SectionId,
    /// Head, body or foot.
    pub kind: SectionKind,
    /// Top edge, relative to the table's border box.
    pub y: LayoutUnit,
    /// Height including the spacing after each row.
    pub height: LayoutUnit,
}

/// The result of laying out a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableGeometry {
    /// Border-box width.
    pub width: LayoutUnit,
    /// Border-box height.
    pub height: LayoutUnit,
    /// Column start offsets, one more than columns; the last entry is the
    /// end of the last column plus spacing.
    pub column_positions: Vec<LayoutUnit>,
    /// Top of every grid row in display order, then the bottom of the last.
    pub row_positions: Vec<LayoutUnit>,
    /// Sections in display order.
    pub sections: Vec<SectionGeometry>,
    /// Cells in display order.
    pub cells: Vec<CellGeometry>,
}

impl TableGeometry {
    /// The geometry of `cell`, if it was laid out.
    #[must_use]
    pub fn cell(&self, cell: CellId) -> Option<&CellGeometry> {
        self.cells.iter().find(|g| g.cell == cell)
    }

    /// Width of each effective column.
    #[must_use]
    pub fn column_widths(&self, spacing: LayoutUnit) -> Vec<LayoutUnit> {
        self.column_positions
            .windows(2)
            .map(|w| w[1] - w[0] - spacing)
            .collect()
    }
}

impl Table {
    /// Effective columns `[first, end)` covered by `cell`.
    pub(crate) fn cell_eff_cols(&self, cell: CellId) -> (usize, usize) {
        let c = &self.cells[cell.0];
        let first = self.col_to_eff_col(c.col);
        let end = (self.col_to_eff_col(c.col + c.colspan() - 1) + 1).min(self.num_eff_cols());
        (first, end.max(first))
    }

    /// Border-box width of `cell` from the current column positions.
    pub(crate) fn cell_box_width(&self, cell: CellId) -> LayoutUnit {
        let (first, end) = self.cell_eff_cols(cell);
        match (self.column_positions.get(first), self.column_positions.get(end)) {
            (Some(&start), Some(&stop)) if end > first => (stop - start - self.h_spacing()).max(0),
            _ => 0,
        }
    }

    fn content_offset(&self, section: SectionId, cell: CellId, height: LayoutUnit, m: &MeasuredCell) -> LayoutUnit {
        let c = &self.cells[cell.0];
        let free = height - m.border_padding_before - m.border_padding_after - m.content_height;
        let offset = match c.style.vertical_align {
            VerticalAlign::Top => m.border_padding_before,
            VerticalAlign::Middle => m.border_padding_before + free / 2,
            VerticalAlign::Bottom => m.border_padding_before + free,
            VerticalAlign::Baseline => {
                let baseline = m.baseline_position();
                if baseline > m.border_padding_before {
                    let row_baseline = self.sections[section.0].grid[c.grid_row].baseline;
                    m.border_padding_before + row_baseline - baseline
                } else {
                    m.border_padding_before
                }
            }
        };
        offset.max(0)
    }

    /// Turn column and row offsets into boxes.
    pub(crate) fn geometry(&self, measured: &[Option<MeasuredCell>]) -> TableGeometry {
        let h_spacing = self.h_spacing();
        let v_spacing = self.v_spacing();
        let padding = if self.style.collapses_borders() {
            0
        } else {
            self.style.padding.start
        };
        let x_origin = self.outer_borders.start + padding + h_spacing;
        let rtl = self.style.direction == Direction::Rtl;

        let mut geometry = TableGeometry {
            width: self.logical_width,
            height: self.logical_height,
            column_positions: self.column_positions.clone(),
            ..TableGeometry::default()
        };

        for section in self.display_sections() {
            let s = &self.sections[section.0];
            geometry.sections.push(SectionGeometry {
                section,
                kind: s.kind,
                y: s.logical_top,
                height: s.logical_height(),
            });
            let n_rows = s.num_rows();
            geometry
                .row_positions
                .extend(s.row_pos.iter().take(n_rows).map(|&p| s.logical_top + p));

            for &row in &s.rows {
                for &cell in &self.rows[row.0].cells {
                    let c = &self.cells[cell.0];
                    if n_rows == 0 || c.grid_row >= n_rows {
                        continue;
                    }
                    let (first, end) = self.cell_eff_cols(cell);
                    let last_row = (c.grid_row + c.rowspan()).min(n_rows);
                    let mut height = s.row_pos[last_row] - s.row_pos[c.grid_row];
                    if s.grid[last_row - 1].row.is_some() {
                        height -= v_spacing;
                    }
                    let width = self.cell_box_width(cell);
                    let mut x = x_origin + self.column_positions.get(first).copied().unwrap_or(0);
                    if rtl {
                        x = self.logical_width - x - width;
                    }
                    let height = height.max(0);
                    let content_offset = measured
                        .get(cell.0)
                        .copied()
                        .flatten()
                        .map_or(0, |m| self.content_offset(section, cell, height, &m));

                    geometry.cells.push(CellGeometry {
                        cell,
                        section,
                        row: c.grid_row,
                        col: first,
                        colspan: end - first,
                        rowspan: last_row - c.grid_row,
                        x,
                        y: s.logical_top + s.row_pos[c.grid_row],
                        width,
                        height,
                        content_offset,
                    });
                }
            }
        }

        if let Some(bottom) = self.bottom_non_empty_section() {
            let s = &self.sections[bottom.0];
            geometry.row_positions.push(s.logical_top + s.logical_height());
        }
        geometry
    }
}
