//! Fixed table layout.
//!
//! [§ 17.5.2.1 Fixed table layout](https://www.w3.org/TR/CSS2/tables.html#fixed-table-layout)
//!
//! "With this (fast) algorithm, the horizontal layout of the table does not
//! depend on the contents of the cells; it only depends on the table's
//! width, the width of the columns, and borders or cell spacing."
//!
//! "1. A column element with a value other than 'auto' for the 'width'
//! property sets the width for that column.
//! 2. Otherwise, a cell in the first row with a value other than 'auto' for
//! the 'width' property determines the width for that column. If the cell
//! spans more than one column, the width is divided over the columns.
//! 3. Any remaining columns equally divide the remaining horizontal table
//! space (minus borders or cell spacing)."

use crate::style::{LayoutUnit, TableLength};
use crate::table::{TABLE_MAX_WIDTH, Table};

/// `width` scaled by `part / whole`; pixel widths divide exactly.
fn span_share(width: TableLength, part: usize, whole: usize) -> TableLength {
    match width {
        TableLength::Fixed(w) => {
            let scaled = i64::from(w) * part as i64 / whole.max(1) as i64;
            TableLength::Fixed(scaled.min(i64::from(LayoutUnit::MAX)) as LayoutUnit)
        }
        other => other.scaled(part as f32 / whole.max(1) as f32),
    }
}

/// State of the fixed algorithm: one declared width per effective column.
#[derive(Debug, Clone, Default)]
pub struct FixedTableLayout {
    widths: Vec<TableLength>,
}

impl FixedTableLayout {
    /// A fresh layout with no column widths.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declared width of each effective column from the last pass.
    #[must_use]
    pub fn widths(&self) -> &[TableLength] {
        &self.widths
    }

    /// Collect column widths from column elements and the first row.
    ///
    /// Returns the total of the fixed widths found. Column elements may
    /// append or split effective columns so their spans line up.
    fn calc_width_array(&mut self, table: &mut Table) -> LayoutUnit {
        let mut used_width: LayoutUnit = 0;
        let mut n = table.num_eff_cols();
        self.widths = vec![TableLength::Auto; n];

        let mut current = 0;
        for element in table.leaf_column_elements() {
            let width = table.column_element_width(element);
            let effective_width = match width {
                TableLength::Fixed(w) if w > 0 => w,
                _ => 0,
            };
            let mut span = table.column_elements[element.0].span();
            while span > 0 {
                let span_in_current = if current >= n {
                    table.append_column(span);
                    self.widths.push(TableLength::Auto);
                    n += 1;
                    span
                } else {
                    if span < table.span_of_eff_col(current) {
                        table.split_column(current, span);
                        self.widths.insert(current, TableLength::Auto);
                        n += 1;
                    }
                    table.span_of_eff_col(current)
                };

                if (width.is_fixed() || width.is_percent()) && width.is_positive() {
                    self.widths[current] = span_share(width, span_in_current, 1);
                    used_width = used_width
                        .saturating_add(effective_width.saturating_mul(span_in_current as LayoutUnit));
                }
                span -= span_in_current.min(span);
                current += 1;
            }
        }

        // Columns no element sized take their width from the first row.
        let Some(section) = table.top_non_empty_section() else {
            return used_width;
        };
        let Some(row) = table.sections[section.0].grid.first().and_then(|g| g.row) else {
            return used_width;
        };
        let mut c_col = 0;
        for cell in table.rows[row.0].cells.clone() {
            let mut width = table.style_or_col_width(cell);
            let span = table.cells[cell.0].colspan();
            let mut effective_width = 0;
            if let TableLength::Fixed(w) = width {
                if w > 0 {
                    effective_width = table.adjust_border_box_width(cell, w);
                    width = TableLength::Fixed(effective_width);
                }
            }

            let mut used_span = 0;
            let mut i = 0;
            while used_span < span && c_col + i < n {
                let e_span = table.span_of_eff_col(c_col + i);
                if self.widths[c_col + i].is_auto() && !width.is_auto() {
                    self.widths[c_col + i] = span_share(width, e_span, span);
                    let share = i64::from(effective_width) * e_span as i64 / span as i64;
                    let share = share.min(i64::from(LayoutUnit::MAX)) as LayoutUnit;
                    used_width = used_width.saturating_add(share);
                }
                used_span += e_span;
                i += 1;
            }
            c_col += i;
        }

        used_width
    }

    /// Collect column widths and set the table's preferred widths.
    ///
    /// Both preferred widths are the larger of the declared table width and
    /// what the fixed columns add up to.
    pub fn compute_intrinsic_widths(&mut self, table: &mut Table) {
        table.prepare_intrinsic_pass();
        let used = self.calc_width_array(table);
        let bps = table.borders_padding_and_spacing_inline();
        let declared = match table.style.width {
            TableLength::Fixed(w) => w.max(0),
            _ => 0,
        };
        let width = used.saturating_add(bps).max(declared);
        table.min_preferred_width = width;
        table.max_preferred_width = width;
        tracing::debug!(columns = self.widths.len(), used, width, "fixed layout intrinsic widths");
    }

    /// Apply the compatibility adjustments to the intrinsic widths.
    pub fn apply_quirks(&mut self, table: &mut Table, quirks_mode: bool) {
        // A percentage width fixed table inside a fixed table has to be able
        // to expand to its container.
        if quirks_mode && table.style.width.is_percent() {
            table.max_preferred_width = table.max_preferred_width.max(TABLE_MAX_WIDTH);
        }
        if let TableLength::Fixed(w) = table.style.width {
            if w > 0 {
                table.min_preferred_width = table.min_preferred_width.max(w);
                table.max_preferred_width = table.min_preferred_width;
            }
        }
    }

    /// Size the columns to the table width and set the column positions.
    pub fn layout(&mut self, table: &mut Table) {
        let table_width = (table.logical_width - table.borders_padding_and_spacing_inline()).max(0);
        if self.widths.len() != table.num_eff_cols() {
            let _ = self.calc_width_array(table);
        }
        let n = self.widths.len();
        let spacing = table.h_spacing();

        let mut widths: Vec<LayoutUnit> = vec![0; n];
        let mut num_auto = 0;
        let mut auto_span = 0;
        let mut total_fixed: LayoutUnit = 0;
        let mut total_percent_width: LayoutUnit = 0;
        let mut total_percent: f32 = 0.0;

        // Percentages are of the table width here. With columns (40px, 10%)
        // in a 100px table the 10% is 10px now and scales to 20px below.
        for (i, declared) in self.widths.iter().enumerate() {
            match *declared {
                TableLength::Fixed(w) => {
                    widths[i] = w;
                    total_fixed = total_fixed.saturating_add(w);
                }
                TableLength::Percent(p) => {
                    widths[i] = declared.resolve_or_zero(table_width);
                    total_percent_width = total_percent_width.saturating_add(widths[i]);
                    total_percent += p;
                }
                TableLength::Auto => {
                    num_auto += 1;
                    auto_span += table.span_of_eff_col(i);
                }
                TableLength::Relative(_) => {}
            }
        }

        let mut total_width = total_fixed.saturating_add(total_percent_width);
        if num_auto == 0 || total_width > table_width {
            if total_width != table_width {
                // Fixed widths only ever scale up.
                if total_fixed > 0 && total_width < table_width {
                    total_fixed = 0;
                    for (i, declared) in self.widths.iter().enumerate() {
                        if declared.is_fixed() {
                            widths[i] = (i64::from(widths[i]) * i64::from(table_width)
                                / i64::from(total_width)) as LayoutUnit;
                            total_fixed += widths[i];
                        }
                    }
                }
                if total_percent > 0.0 {
                    total_percent_width = 0;
                    let remaining = (table_width - total_fixed).max(0);
                    for (i, declared) in self.widths.iter().enumerate() {
                        if let TableLength::Percent(p) = *declared {
                            widths[i] = (p * remaining as f32 / total_percent) as LayoutUnit;
                            total_percent_width += widths[i];
                        }
                    }
                }
                total_width = total_fixed + total_percent_width;
            }
        } else {
            // Auto columns share what is left, by span.
            let mut remaining = table_width
                - total_fixed
                - total_percent_width
                - spacing * (auto_span - num_auto) as LayoutUnit;
            // The last auto column's share is whatever is left.
            for (i, declared) in self.widths.iter().enumerate() {
                if !declared.is_auto() {
                    continue;
                }
                let span = table.span_of_eff_col(i);
                let w = remaining * span as LayoutUnit / auto_span as LayoutUnit;
                widths[i] = w + spacing * (span as LayoutUnit - 1);
                remaining -= w;
                auto_span -= span;
            }
            total_width = table_width;
        }

        if total_width < table_width && n > 0 {
            // Spread the rest over every column, last column first.
            let mut remaining = table_width - total_width;
            for total in (1..=n).rev() {
                let w = remaining / total as LayoutUnit;
                remaining -= w;
                widths[total - 1] += w;
            }
            widths[n - 1] += remaining;
        }

        table.column_positions.clear();
        table.column_positions.reserve(n + 1);
        let mut position = 0;
        for w in &widths {
            table.column_positions.push(position);
            position = position.saturating_add(w.saturating_add(spacing));
        }
        table.column_positions.push(position);

        tracing::debug!(width = table_width, columns = n, "fixed layout distributed column widths");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{CellStyle, ColumnStyle, RowStyle, SectionStyle, TableLayoutMode, TableStyle};
    use crate::tree::{CellContent, SectionKind};

    fn fixed_table(width: LayoutUnit) -> Table {
        Table::new(TableStyle {
            width: TableLength::Fixed(width),
            layout: TableLayoutMode::Fixed,
            ..TableStyle::default()
        })
    }

    #[test]
    fn test_column_element_span_splits_effective_column() {
        let mut table = fixed_table(300);
        let _ = table.add_column(ColumnStyle {
            width: TableLength::Fixed(40),
            ..ColumnStyle::default()
        });
        let body = table.add_section(SectionKind::Body, SectionStyle::default());
        let row = table.add_row(body, RowStyle::default());
        let _ = table.add_cell(
            row,
            CellStyle {
                colspan: 3,
                ..CellStyle::default()
            },
            CellContent::default(),
        );

        let mut layout = FixedTableLayout::new();
        layout.compute_intrinsic_widths(&mut table);
        assert_eq!(table.num_eff_cols(), 2);
        assert_eq!(layout.widths()[0], TableLength::Fixed(40));
        assert_eq!(table.span_of_eff_col(1), 2);
    }

    #[test]
    fn test_first_row_width_is_divided_over_span() {
        let mut table = fixed_table(300);
        for _ in 0..2 {
            let _ = table.add_column(ColumnStyle::default());
        }
        let body = table.add_section(SectionKind::Body, SectionStyle::default());
        let row = table.add_row(body, RowStyle::default());
        let _ = table.add_cell(
            row,
            CellStyle {
                colspan: 2,
                width: TableLength::Fixed(100),
                ..CellStyle::default()
            },
            CellContent::default(),
        );

        let mut layout = FixedTableLayout::new();
        layout.compute_intrinsic_widths(&mut table);
        assert_eq!(layout.widths(), &[TableLength::Fixed(50), TableLength::Fixed(50)]);
    }

    #[test]
    fn test_percent_table_expands_in_quirks_mode() {
        let mut table = Table::new(TableStyle {
            width: TableLength::Percent(50.0),
            layout: TableLayoutMode::Fixed,
            ..TableStyle::default()
        });
        let mut layout = FixedTableLayout::new();
        layout.compute_intrinsic_widths(&mut table);
        layout.apply_quirks(&mut table, true);
        assert_eq!(table.preferred_widths().1, TABLE_MAX_WIDTH);
    }
}
