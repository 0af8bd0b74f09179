//! Row heights.
//!
//! [§ 17.5.3 Table height algorithms](https://www.w3.org/TR/CSS2/tables.html#height-layout)
//!
//! "The height of a 'table-row' element's box is calculated once the user
//! agent has all the cells in the row available: it is the maximum of the
//! row's computed 'height', the computed 'height' of each cell in the row,
//! and the minimum height (MIN) required by the cells."
//!
//! Rows are sized once column widths are final, since a cell's content
//! height depends on the width it was given. Extra table height is then
//! handed to percentage rows, auto rows and finally every row.

use crate::style::{LayoutUnit, TableLength, VerticalAlign};
use crate::table::Table;
use crate::tree::{CellContent, CellId, SectionId};

use super::LayoutInput;

/// Measures cell content once its width is known.
///
/// Hosts that lay out real content implement this to re-flow each cell at
/// its final inline size.
pub trait CellMeasurer {
    /// Height of the cell's content box contents at `inline_size`.
    fn measure_height(&self, cell: CellId, content: &CellContent, inline_size: LayoutUnit) -> LayoutUnit;

    /// Offset of the first baseline from the top of the content box.
    fn baseline(&self, cell: CellId, content: &CellContent) -> Option<LayoutUnit>;
}

/// Uses the height and baseline stored with each cell, whatever its width.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredContent;

impl CellMeasurer for DeclaredContent {
    fn measure_height(&self, _cell: CellId, content: &CellContent, _inline_size: LayoutUnit) -> LayoutUnit {
        content.height
    }

    fn baseline(&self, _cell: CellId, content: &CellContent) -> Option<LayoutUnit> {
        content.baseline
    }
}

/// What row sizing learned about a cell, kept for positioning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct MeasuredCell {
    pub content_height: LayoutUnit,
    pub content_baseline: Option<LayoutUnit>,
    pub border_padding_before: LayoutUnit,
    pub border_padding_after: LayoutUnit,
    /// Border-box height the cell asks for.
    pub box_height: LayoutUnit,
}

impl MeasuredCell {
    /// Baseline offset from the top of the cell box: the first line's
    /// baseline, or the bottom of the content box when there is no line.
    pub(crate) fn baseline_position(&self) -> LayoutUnit {
        self.border_padding_before + self.content_baseline.unwrap_or(self.content_height)
    }
}

impl Table {
    fn measure_cell(&mut self, cell: CellId, measurer: &dyn CellMeasurer, quirks_mode: bool) -> MeasuredCell {
        let borders = self.cell_border_widths(cell);
        let padding = self.cells[cell.0].style.padding;
        let before = borders.before + padding.before;
        let after = borders.after + padding.after;
        let inline_size = (self.cell_box_width(cell) - self.cell_border_and_padding_inline(cell)).max(0);

        let c = &self.cells[cell.0];
        let content_height = measurer.measure_height(cell, &c.content, inline_size).max(0);
        let content_baseline = measurer.baseline(cell, &c.content);
        // Quirks mode reads a cell's height as its border box.
        let declared = match c.style.height {
            TableLength::Fixed(h) if h > 0 && quirks_mode => h,
            TableLength::Fixed(h) if h > 0 => h + before + after,
            _ => 0,
        };

        MeasuredCell {
            content_height,
            content_baseline,
            border_padding_before: before,
            border_padding_after: after,
            box_height: declared.max(content_height + before + after),
        }
    }

    /// Size every row of `section` from its declared height and its cells.
    ///
    /// A cell spanning rows is measured from the top of its first row and
    /// pushes down the last row it covers.
    pub(crate) fn calc_row_heights(
        &mut self,
        section: SectionId,
        measurer: &dyn CellMeasurer,
        quirks_mode: bool,
        measured: &mut [Option<MeasuredCell>],
    ) {
        let spacing = self.v_spacing();
        let n_rows = self.sections[section.0].num_rows();
        let n_cols = self.num_eff_cols();
        let mut row_pos: Vec<LayoutUnit> = vec![0; n_rows + 1];

        for r in 0..n_rows {
            let mut baseline_descent = 0;
            let declared = {
                let grid_row = &mut self.sections[section.0].grid[r];
                grid_row.baseline = 0;
                match grid_row.logical_height {
                    TableLength::Fixed(h) => h,
                    _ => 0,
                }
            };
            row_pos[r + 1] = (row_pos[r] + declared).max(0);

            for c in 0..n_cols {
                let Some(cell) = self.primary_cell_at(section, r, c) else {
                    continue;
                };
                let (start, rowspan, col) = {
                    let cell = &self.cells[cell.0];
                    (cell.grid_row, cell.rowspan(), cell.col)
                };
                if self.col_to_eff_col(col) != c || (start + rowspan - 1).min(n_rows - 1) != r {
                    continue;
                }

                let m = self.measure_cell(cell, measurer, quirks_mode);
                measured[cell.0] = Some(m);
                row_pos[r + 1] = row_pos[r + 1].max(row_pos[start] + m.box_height);

                if self.cells[cell.0].style.vertical_align != VerticalAlign::Baseline {
                    continue;
                }
                let baseline = m.baseline_position();
                if baseline > m.border_padding_before {
                    let grid_row = &mut self.sections[section.0].grid[start];
                    grid_row.baseline = grid_row.baseline.max(baseline);
                    // Only single-row cells push their descent onto the row.
                    let mut start_row_descent = 0;
                    if rowspan == 1 {
                        baseline_descent = baseline_descent.max(m.box_height - baseline);
                        start_row_descent = baseline_descent;
                    }
                    row_pos[start + 1] =
                        row_pos[start + 1].max(row_pos[start] + grid_row.baseline + start_row_descent);
                }
            }

            if self.sections[section.0].grid[r].row.is_some() {
                row_pos[r + 1] += spacing;
            }
            row_pos[r + 1] = row_pos[r + 1].max(row_pos[r]);
        }

        self.sections[section.0].row_pos = row_pos;
    }

    /// Grow the rows of `section` by up to `extra` and return how much was
    /// used.
    ///
    /// Percentage rows go first, up to their share of the final height; auto
    /// rows then split what is left evenly; anything still left is spread
    /// over every row by its current height.
    pub fn distribute_extra_height(&mut self, section: SectionId, extra: LayoutUnit) -> LayoutUnit {
        let Some(s) = self.sections.get(section.0) else {
            return 0;
        };
        let total_rows = s.num_rows();
        if extra <= 0 || total_rows == 0 || s.row_pos.len() != total_rows + 1 {
            return 0;
        }

        let mut auto_rows = 0;
        let mut total_percent: f32 = 0.0;
        for grid_row in &s.grid {
            match grid_row.logical_height {
                TableLength::Auto => auto_rows += 1,
                TableLength::Percent(p) => total_percent += p,
                _ => {}
            }
        }

        let mut remaining = extra;
        self.distribute_to_percent_rows(section, &mut remaining, total_percent);
        self.distribute_to_auto_rows(section, &mut remaining, auto_rows);
        self.distribute_remaining_height(section, &mut remaining);
        tracing::debug!(section = section.0, extra, used = extra - remaining, "distributed extra row height");
        extra - remaining
    }

    fn distribute_to_percent_rows(&mut self, section: SectionId, extra: &mut LayoutUnit, total_percent: f32) {
        if total_percent <= 0.0 {
            return;
        }
        let s = &mut self.sections[section.0];
        let total_rows = s.grid.len();
        let total_height = s.row_pos[total_rows] + *extra;
        let mut total_percent = total_percent.min(100.0);
        let mut added = 0;
        let mut row_height = s.row_pos[1] - s.row_pos[0];
        for r in 0..total_rows {
            if let TableLength::Percent(p) = s.grid[r].logical_height {
                if total_percent > 0.0 {
                    let wanted = (total_height as f32 * p / 100.0) as LayoutUnit - row_height;
                    // Rows never shrink.
                    let to_add = (*extra).min(wanted).max(0);
                    added += to_add;
                    *extra -= to_add;
                    total_percent -= p;
                }
            }
            if r + 1 < total_rows {
                row_height = s.row_pos[r + 2] - s.row_pos[r + 1];
            }
            s.row_pos[r + 1] += added;
        }
    }

    fn distribute_to_auto_rows(&mut self, section: SectionId, extra: &mut LayoutUnit, auto_rows: usize) {
        if auto_rows == 0 {
            return;
        }
        let s = &mut self.sections[section.0];
        let mut auto_rows = auto_rows as LayoutUnit;
        let mut added = 0;
        for r in 0..s.grid.len() {
            if auto_rows > 0 && s.grid[r].logical_height.is_auto() {
                // Recomputed each time so rounding leftovers are not lost.
                let share = *extra / auto_rows;
                added += share;
                *extra -= share;
                auto_rows -= 1;
            }
            s.row_pos[r + 1] += added;
        }
    }

    fn distribute_remaining_height(&mut self, section: SectionId, extra: &mut LayoutUnit) {
        let s = &mut self.sections[section.0];
        let total_rows = s.grid.len();
        let total_size = s.row_pos[total_rows] - s.row_pos[0];
        if *extra <= 0 || total_size <= 0 {
            return;
        }
        let mut added = 0;
        let mut previous = s.row_pos[0];
        for r in 0..total_rows {
            let height = s.row_pos[r + 1] - previous;
            added += (i64::from(*extra) * i64::from(height) / i64::from(total_size)) as LayoutUnit;
            previous = s.row_pos[r + 1];
            s.row_pos[r + 1] += added;
        }
        *extra -= added;
    }

    /// The content height the table's declared height asks for, if any.
    fn declared_content_height(&self, input: &LayoutInput) -> Option<LayoutUnit> {
        let border_box = match self.style.height {
            TableLength::Fixed(h) if h > 0 => h,
            TableLength::Percent(p) if p > 0.0 => {
                let available = input.available_height?;
                (available as f32 * p / 100.0) as LayoutUnit
            }
            _ => return None,
        };
        Some((border_box - self.borders_and_padding_block()).max(0))
    }

    /// Size every section's rows, give extra table height to the first body
    /// and stack the sections. Sets the table height.
    pub(crate) fn layout_sections(
        &mut self,
        input: &LayoutInput,
        measurer: &dyn CellMeasurer,
    ) -> Vec<Option<MeasuredCell>> {
        let mut measured = vec![None; self.cells.len()];
        let sections = self.display_sections();
        for &section in &sections {
            self.calc_row_heights(section, measurer, input.quirks_mode, &mut measured);
        }

        let has_rows = self.top_non_empty_section().is_some();
        let leading_spacing = if has_rows { self.v_spacing() } else { 0 };
        let sections_height: LayoutUnit = leading_spacing
            + sections
                .iter()
                .map(|s| self.sections[s.0].logical_height())
                .sum::<LayoutUnit>();

        let mut unused = 0;
        if let Some(declared) = self.declared_content_height(input) {
            let extra = declared - sections_height;
            if extra > 0 {
                // The first body takes it; a table without body rows gives it
                // to its last non-empty section.
                let target = self
                    .first_body
                    .filter(|b| self.sections[b.0].num_rows() > 0)
                    .or_else(|| self.bottom_non_empty_section());
                let used = target.map_or(0, |section| self.distribute_extra_height(section, extra));
                if has_rows {
                    unused = extra - used;
                } else if !input.quirks_mode {
                    // An empty table still takes its declared height.
                    unused = extra;
                }
            }
        }

        let padding_before = if self.style.collapses_borders() {
            0
        } else {
            self.style.padding.before
        };
        let mut y = self.outer_borders.before + padding_before + leading_spacing;
        for &section in &sections {
            let s = &mut self.sections[section.0];
            s.logical_top = y;
            y += s.logical_height();
        }
        self.logical_height = y - self.outer_borders.before - padding_before
            + self.borders_and_padding_block()
            + unused;
        measured
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{RowStyle, SectionStyle, TableStyle};
    use crate::tree::SectionKind;

    fn rows_with_heights(heights: &[TableLength]) -> (Table, SectionId) {
        let mut table = Table::new(TableStyle::default());
        let body = table.add_section(SectionKind::Body, SectionStyle::default());
        for &height in heights {
            let row = table.add_row(body, RowStyle { height, ..RowStyle::default() });
            let _ = table.add_cell(row, crate::style::CellStyle::default(), CellContent::new(10, 10, 20));
        }
        table.build_grid();
        let mut measured = vec![None; table.cells.len()];
        table.calc_row_heights(body, &DeclaredContent, false, &mut measured);
        (table, body)
    }

    #[test]
    fn test_declared_height_beats_content() {
        let (table, body) = rows_with_heights(&[TableLength::Fixed(50), TableLength::Auto]);
        assert_eq!(table.sections[body.0].row_pos, vec![0, 50, 70]);
    }

    #[test]
    fn test_auto_rows_split_extra_evenly() {
        let (mut table, body) = rows_with_heights(&[TableLength::Auto, TableLength::Auto]);
        assert_eq!(table.distribute_extra_height(body, 11), 11);
        assert_eq!(table.sections[body.0].row_pos, vec![0, 25, 51]);
    }

    #[test]
    fn test_percent_row_takes_its_share_first() {
        let (mut table, body) = rows_with_heights(&[TableLength::Percent(50.0), TableLength::Auto]);
        // Final height 100: the percent row wants 50 and takes 30 of the 60,
        // the auto row gets the other 30.
        let used = table.distribute_extra_height(body, 60);
        assert_eq!(used, 60);
        let row_pos = &table.sections[body.0].row_pos;
        assert_eq!(row_pos[1] - row_pos[0], 50);
        assert_eq!(row_pos[2], 100);
    }

    #[test]
    fn test_nothing_to_distribute() {
        let (mut table, body) = rows_with_heights(&[TableLength::Auto]);
        assert_eq!(table.distribute_extra_height(body, 0), 0);
        assert_eq!(table.distribute_extra_height(body, -5), 0);
    }
}
