//! Cell preferred widths.
//!
//! [§ 17.5.2.2 Automatic table layout](https://www.w3.org/TR/CSS2/tables.html#auto-table-layout)
//!
//! "Calculate the minimum content width (MCW) of each cell: the formatted
//! content may span any number of lines but may not overflow the cell box.
//! [...] Also, calculate the 'maximum' cell width of each cell: formatting
//! the content without breaking lines other than where explicit line breaks
//! occur."
//!
//! Content widths come from the host. This module adds the cell's padding
//! and border, and folds in declared widths.

use crate::style::{CELL_MAX_WIDTH, LayoutUnit, TableLength};
use crate::table::{Table, TableBorderWidths};
use crate::tree::CellId;

impl Table {
    /// Border widths the cell's box includes: its own in the separated model,
    /// its inner half of each collapsed border otherwise.
    pub(crate) fn cell_border_widths(&mut self, cell: CellId) -> TableBorderWidths {
        if self.style.collapses_borders() {
            self.collapsed_half_borders(cell)
        } else {
            let b = &self.cells[cell.0].style.borders;
            TableBorderWidths {
                start: b.start.used_width(),
                end: b.end.used_width(),
                before: b.before.used_width(),
                after: b.after.used_width(),
            }
        }
    }

    /// Horizontal padding plus border of a cell.
    pub(crate) fn cell_border_and_padding_inline(&mut self, cell: CellId) -> LayoutUnit {
        let borders = self.cell_border_widths(cell);
        borders.start + borders.end + self.cells[cell.0].style.padding.inline_sum()
    }

    /// Vertical padding plus border of a cell.
    pub(crate) fn cell_border_and_padding_block(&mut self, cell: CellId) -> LayoutUnit {
        let borders = self.cell_border_widths(cell);
        borders.before + borders.after + self.cells[cell.0].style.padding.block_sum()
    }

    /// The cell's declared width, or the width of the `col` elements over it
    /// when the cell says `auto`.
    ///
    /// Column widths describe the cell's border box, so a fixed column width
    /// comes back with the cell's border and padding taken off. A spanning
    /// cell only inherits column widths when every column it covers is fixed.
    pub(crate) fn style_or_col_width(&mut self, cell: CellId) -> TableLength {
        let c = &self.cells[cell.0];
        let declared = c.style.width;
        if !declared.is_auto() {
            return declared;
        }
        let (first, span) = (c.col, c.colspan());
        if self.col_element(first).is_none() {
            return declared;
        }

        let mut sum = 0;
        for col in first..first + span {
            let Some(hit) = self.col_element(col) else {
                break;
            };
            match self.column_element_width(hit.element) {
                TableLength::Fixed(w) => sum = w.saturating_add(sum),
                _ if span > 1 => return declared,
                other => return other,
            }
        }
        if sum > 0 {
            let bp = self.cell_border_and_padding_inline(cell);
            TableLength::Fixed((sum - bp).max(0))
        } else {
            TableLength::Fixed(0)
        }
    }

    /// Turn a fixed content-box width into a border-box width.
    pub(crate) fn adjust_border_box_width(&mut self, cell: CellId, width: LayoutUnit) -> LayoutUnit {
        width + self.cell_border_and_padding_inline(cell)
    }

    /// Refresh the min and max preferred border-box widths of every
    /// attached cell.
    pub(crate) fn compute_cell_preferred_widths(&mut self) {
        for cell in self.attached_cells() {
            let bp = self.cell_border_and_padding_inline(cell);
            let content = self.cells[cell.0].content;
            let mut min = content.min_width.max(0) + bp;
            let mut max = content.max_width.max(0).max(content.min_width.max(0)) + bp;

            match self.style_or_col_width(cell) {
                TableLength::Fixed(w) if w > 0 => {
                    let border_box = w.min(CELL_MAX_WIDTH) + bp;
                    max = min.max(border_box);
                    if self.cells[cell.0].style.nowrap {
                        min = min.max(border_box);
                        max = max.max(min);
                    }
                }
                _ => {}
            }

            let c = &mut self.cells[cell.0];
            c.min_width = min;
            c.max_width = max;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::style::{
        BorderEdges, BorderSpec, CellStyle, Color, ColumnStyle, Padding, RowStyle, SectionStyle,
        TableLength, TableStyle,
    };
    use crate::table::Table;
    use crate::tree::{CellContent, CellId, SectionKind};

    fn single_cell(style: CellStyle, content: CellContent) -> (Table, CellId) {
        let mut table = Table::new(TableStyle::default());
        let body = table.add_section(SectionKind::Body, SectionStyle::default());
        let row = table.add_row(body, RowStyle::default());
        let cell = table.add_cell(row, style, content);
        table.build_grid();
        (table, cell)
    }

    #[test]
    fn test_padding_and_border_are_added() {
        let style = CellStyle {
            padding: Padding::all(2),
            borders: BorderEdges::all(BorderSpec::solid(1, Color::BLACK)),
            ..CellStyle::default()
        };
        let (mut table, cell) = single_cell(style, CellContent::new(10, 40, 12));
        table.compute_cell_preferred_widths();
        let c = table.cell(cell).unwrap();
        assert_eq!(c.min_preferred_width(), 16);
        assert_eq!(c.max_preferred_width(), 46);
    }

    #[test]
    fn test_fixed_width_replaces_content_max() {
        let style = CellStyle {
            width: TableLength::Fixed(100),
            ..CellStyle::default()
        };
        let (mut table, cell) = single_cell(style, CellContent::new(10, 300, 12));
        table.compute_cell_preferred_widths();
        let c = table.cell(cell).unwrap();
        assert_eq!(c.min_preferred_width(), 10);
        assert_eq!(c.max_preferred_width(), 100);
    }

    #[test]
    fn test_nowrap_with_fixed_width_raises_min() {
        let style = CellStyle {
            width: TableLength::Fixed(80),
            nowrap: true,
            ..CellStyle::default()
        };
        let (mut table, cell) = single_cell(style, CellContent::new(10, 20, 12));
        table.compute_cell_preferred_widths();
        assert_eq!(table.cell(cell).unwrap().min_preferred_width(), 80);
    }

    #[test]
    fn test_auto_cell_takes_fixed_col_width_as_border_box() {
        let mut table = Table::new(TableStyle::default());
        let _ = table.add_column(ColumnStyle {
            width: TableLength::Fixed(60),
            ..ColumnStyle::default()
        });
        let body = table.add_section(SectionKind::Body, SectionStyle::default());
        let row = table.add_row(body, RowStyle::default());
        let style = CellStyle {
            padding: Padding::all(5),
            ..CellStyle::default()
        };
        let cell = table.add_cell(row, style, CellContent::default());
        table.build_grid();
        assert_eq!(table.style_or_col_width(cell), TableLength::Fixed(50));
    }
}
