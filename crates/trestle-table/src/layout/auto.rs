//! Automatic table layout.
//!
//! [§ 17.5.2.2 Automatic table layout](https://www.w3.org/TR/CSS2/tables.html#auto-table-layout)
//!
//! "In this algorithm (which generally requires no more than two passes),
//! the table's width is given by the width of its columns (and intervening
//! borders)."
//!
//! CSS 2.1 leaves the algorithm non-normative. This one follows what
//! browsers converged on:
//!
//! 1. Aggregate each column's min/max width and declared width from the
//!    `col` elements and the single-column cells starting in it.
//! 2. Fold spanning cells into the columns they cover, narrowest span first.
//! 3. Sum the columns into the table's min/max width, scaling for
//!    percentages.
//! 4. Once the table width is known, hand it out: minimums, then percent,
//!    fixed, relative and auto columns, and claw back any overshoot in the
//!    opposite order.

use trestle_common::warning::warn_once;

use crate::style::{CELL_MAX_WIDTH, EnclosingCell, LayoutUnit, TableLength, TableStyle};
use crate::table::{TABLE_MAX_WIDTH, Table};
use crate::tree::CellId;

/// Percentages of zero are replaced with this to keep divisions finite.
const PERCENT_EPSILON: f32 = 1.0 / 128.0;

/// Per-column working state of the automatic algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    /// Width declared by `col` elements and single-column cells.
    pub logical_width: TableLength,
    /// Declared width after spanning cells are folded in.
    pub effective_logical_width: TableLength,
    /// Widest minimum of the single-column cells.
    pub min_width: LayoutUnit,
    /// Widest maximum of the single-column cells.
    pub max_width: LayoutUnit,
    /// Minimum after spanning cells are folded in.
    pub effective_min_width: LayoutUnit,
    /// Maximum after spanning cells are folded in.
    pub effective_max_width: LayoutUnit,
    /// Final width.
    pub computed_width: LayoutUnit,
    /// `true` while every cell starting in the column is empty.
    pub empty_cells_only: bool,
    /// The cell whose fixed width set `logical_width`.
    pub fixed_contributor: Option<CellId>,
    /// The cell whose maximum set `max_width`.
    pub max_contributor: Option<CellId>,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            logical_width: TableLength::Auto,
            effective_logical_width: TableLength::Auto,
            min_width: 0,
            max_width: 0,
            effective_min_width: 0,
            effective_max_width: 0,
            computed_width: 0,
            empty_cells_only: true,
            fixed_contributor: None,
            max_contributor: None,
        }
    }
}

/// State of the automatic algorithm between the intrinsic and layout passes.
#[derive(Debug, Clone, Default)]
pub struct AutoTableLayout {
    columns: Vec<ColumnLayout>,
    /// Cells spanning several effective columns, narrowest span first.
    span_cells: Vec<CellId>,
    has_percent: bool,
}

/// The value of a length with its unit dropped, as the relative-width rule
/// compares them.
fn raw_value(length: TableLength) -> f32 {
    match length {
        TableLength::Auto => 0.0,
        TableLength::Fixed(v) | TableLength::Relative(v) => v as f32,
        TableLength::Percent(p) => p,
    }
}

/// Whether percentage columns may widen the table's maximum width.
///
/// An `auto` or percentage width table sitting in an `auto` or percentage
/// width cell does not grow its maximum for percentages when that cell spans
/// columns or belongs to an `auto` width table. Otherwise the same question
/// is asked of the table around that cell.
fn should_scale_columns(style: &TableStyle) -> bool {
    let mut width = style.width;
    let mut enclosing: Option<&EnclosingCell> = style.enclosing_cell.as_ref();
    while let Some(cell) = enclosing {
        if !(width.is_auto() || width.is_percent()) {
            return true;
        }
        if !(cell.width.is_auto() || cell.width.is_percent()) {
            return true;
        }
        if cell.colspan > 1 || cell.table_width.is_auto() {
            return false;
        }
        width = cell.table_width;
        enclosing = cell.outer.as_deref();
    }
    true
}

impl AutoTableLayout {
    /// A fresh layout with no column state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-column state from the last pass.
    #[must_use]
    pub fn columns(&self) -> &[ColumnLayout] {
        &self.columns
    }

    /// Spanning cells in the order they are folded in.
    #[must_use]
    pub fn span_cells(&self) -> &[CellId] {
        &self.span_cells
    }

    /// Rebuild every column's aggregate from scratch.
    fn full_recalc(&mut self, table: &mut Table) {
        self.has_percent = false;
        self.span_cells.clear();
        let n = table.num_eff_cols();
        self.columns = vec![ColumnLayout::default(); n];

        let mut current_column = 0;
        for element in table.leaf_column_elements() {
            let span = table.column_elements[element.0].span();
            let width = table.column_element_width(element).zero_as_auto();
            let eff_col = table.col_to_eff_col(current_column);
            if !width.is_auto() && span == 1 && eff_col < n && table.span_of_eff_col(eff_col) == 1 {
                let column = &mut self.columns[eff_col];
                column.logical_width = width;
                if let TableLength::Fixed(w) = width {
                    column.max_width = column.max_width.max(w);
                }
            }
            current_column += span;
        }

        for eff_col in 0..n {
            self.recalc_column(table, eff_col);
        }
    }

    /// Aggregate the cells starting in `eff_col`.
    fn recalc_column(&mut self, table: &mut Table, eff_col: usize) {
        let mut fixed_contributor = None;
        let mut max_contributor = None;

        for section in table.section_order.clone() {
            for r in 0..table.sections[section.0].num_rows() {
                let Some(slot) = table.cell_at(section, r, eff_col) else {
                    continue;
                };
                if slot.in_col_span {
                    continue;
                }
                let Some(cell) = slot.primary_cell() else {
                    continue;
                };
                let c = &table.cells[cell.0];
                let (has_content, colspan, first_row) = (c.has_content(), c.colspan(), c.grid_row == r);
                let (min_pref, max_pref) = (c.min_width, c.max_width);

                let column = &mut self.columns[eff_col];
                if has_content {
                    column.empty_cells_only = false;
                }
                // Any cell starting here makes the column at least 1px wide.
                column.min_width = column.min_width.max(1);
                column.max_width = column.max_width.max(1);

                if colspan == 1 {
                    column.min_width = column.min_width.max(min_pref);
                    if max_pref > column.max_width {
                        column.max_width = max_pref;
                        max_contributor = Some(cell);
                    }

                    let width = table.style_or_col_width(cell).clamped(CELL_MAX_WIDTH);
                    match width {
                        TableLength::Fixed(w) if w > 0 && !column.logical_width.is_percent() => {
                            let w = table.adjust_border_box_width(cell, w);
                            let replace = match column.logical_width {
                                // Nav/IE weirdness
                                TableLength::Fixed(current) => {
                                    w > current || (w == current && max_contributor == Some(cell))
                                }
                                _ => true,
                            };
                            if replace {
                                column.logical_width = TableLength::Fixed(w);
                                fixed_contributor = Some(cell);
                            }
                        }
                        TableLength::Percent(p) => {
                            self.has_percent = true;
                            let larger = column.logical_width.percent().is_none_or(|current| p > current);
                            if p > 0.0 && larger {
                                column.logical_width = width;
                            }
                        }
                        TableLength::Relative(_) => {
                            if raw_value(width) > raw_value(column.logical_width) {
                                column.logical_width = width;
                            }
                        }
                        _ => {}
                    }
                } else if first_row && (eff_col == 0 || table.primary_cell_at(section, r, eff_col - 1) != Some(cell)) {
                    // A row-spanning cell is listed once, from its first row.
                    self.insert_span_cell(table, cell);
                }
            }
        }

        let column = &mut self.columns[eff_col];
        column.fixed_contributor = fixed_contributor;
        column.max_contributor = max_contributor;
        column.max_width = column.max_width.max(column.min_width);
    }

    /// Keep `span_cells` sorted by span; a cell goes before others of the
    /// same span.
    fn insert_span_cell(&mut self, table: &Table, cell: CellId) {
        let span = table.cells[cell.0].colspan();
        if span <= 1 {
            return;
        }
        let position = self
            .span_cells
            .iter()
            .position(|&other| span <= table.cells[other.0].colspan())
            .unwrap_or(self.span_cells.len());
        self.span_cells.insert(position, cell);
    }

    /// Fold spanning cells into the columns they cover.
    ///
    /// Returns the widest table a percentage-width spanning cell asks for.
    pub fn calc_effective_logical_width(&mut self, table: &mut Table) -> LayoutUnit {
        let mut max_logical_width: f32 = 0.0;
        let n = self.columns.len();
        let spacing = table.h_spacing();

        for column in &mut self.columns {
            column.effective_logical_width = column.logical_width;
            column.effective_min_width = column.min_width;
            column.effective_max_width = column.max_width;
        }

        for index in 0..self.span_cells.len() {
            let cell = self.span_cells[index];
            let mut cell_width = table.style_or_col_width(cell);
            if !cell_width.is_relative() && cell_width.is_zero() {
                cell_width = TableLength::Auto;
            }

            let c = &table.cells[cell.0];
            let mut span = c.colspan();
            let eff_col = table.col_to_eff_col(c.col);
            let mut cell_min = c.min_width + spacing;
            let mut cell_max = c.max_width + spacing;

            let mut last_col = eff_col;
            let mut total_percent: f32 = 0.0;
            let mut span_min: LayoutUnit = 0;
            let mut span_max: LayoutUnit = 0;
            let mut all_cols_are_percent = true;
            let mut all_cols_are_fixed = true;
            let mut have_auto = false;
            let mut span_has_empty_cells_only = true;
            let mut fixed_width: LayoutUnit = 0;

            while last_col < n && span > 0 {
                let column = &mut self.columns[last_col];
                match column.logical_width {
                    TableLength::Percent(p) => {
                        total_percent += p;
                        all_cols_are_fixed = false;
                    }
                    TableLength::Fixed(w) if w > 0 => {
                        fixed_width += w;
                        all_cols_are_percent = false;
                    }
                    other => {
                        if other.is_auto() || other.is_fixed() {
                            have_auto = true;
                        }
                        // A spanning cell never overrides a percentage column.
                        if let TableLength::Percent(p) = column.effective_logical_width {
                            total_percent += p;
                        } else {
                            column.effective_logical_width = TableLength::Auto;
                            all_cols_are_percent = false;
                        }
                        all_cols_are_fixed = false;
                    }
                }
                if !column.empty_cells_only {
                    span_has_empty_cells_only = false;
                }
                span = span.saturating_sub(table.span_of_eff_col(last_col));
                span_min += column.effective_min_width;
                span_max += column.effective_max_width;
                last_col += 1;
                cell_min -= spacing;
                cell_max -= spacing;
            }

            if let TableLength::Percent(cell_percent) = cell_width {
                if total_percent > cell_percent || all_cols_are_percent {
                    // Cannot be satisfied; treat the cell as auto.
                    cell_width = TableLength::Auto;
                } else {
                    let wanted = span_max.max(cell_max) as f32 * 100.0 / cell_percent;
                    max_logical_width = max_logical_width.max(wanted);

                    // Non-percent columns in the span share the missing
                    // percentage by their maximum widths.
                    let mut percent_missing = cell_percent - total_percent;
                    let mut total_width: LayoutUnit = self.columns[eff_col..last_col]
                        .iter()
                        .filter(|c| !c.effective_logical_width.is_percent())
                        .map(|c| c.effective_max_width)
                        .sum();
                    for column in &mut self.columns[eff_col..last_col] {
                        if total_width <= 0 {
                            break;
                        }
                        if !column.effective_logical_width.is_percent() {
                            let percent =
                                percent_missing * column.effective_max_width as f32 / total_width as f32;
                            total_width -= column.effective_max_width;
                            percent_missing -= percent;
                            column.effective_logical_width = if percent > 0.0 {
                                TableLength::Percent(percent)
                            } else {
                                TableLength::Auto
                            };
                        }
                    }
                }
            }

            // Make sure the spanning cell's minimum is honoured.
            if cell_min > span_min {
                let covered = &mut self.columns[eff_col..last_col];
                if all_cols_are_fixed {
                    for column in covered.iter_mut() {
                        if fixed_width <= 0 {
                            break;
                        }
                        let declared = column.logical_width.fixed().unwrap_or(0);
                        let share = (i64::from(cell_min) * i64::from(declared) / i64::from(fixed_width))
                            as LayoutUnit;
                        let width = column.effective_min_width.max(share);
                        fixed_width -= declared;
                        cell_min -= width;
                        column.effective_min_width = width;
                    }
                } else if all_cols_are_percent {
                    // Split the cell's widths by the columns' percentages.
                    let mut allocated_max = 0;
                    for column in covered.iter_mut() {
                        let percent = column
                            .logical_width
                            .percent()
                            .or_else(|| column.effective_logical_width.percent())
                            .unwrap_or(0.0);
                        let total = total_percent.max(PERCENT_EPSILON);
                        let column_min = (percent * cell_min as f32 / total) as LayoutUnit;
                        let column_max = (percent * cell_max as f32 / total) as LayoutUnit;
                        column.effective_min_width = column.effective_min_width.max(column_min);
                        column.effective_max_width = column_max;
                        allocated_max += column_max;
                    }
                    cell_max -= allocated_max;
                } else {
                    let mut remaining_max = span_max;
                    let mut remaining_min = span_min;

                    // Fixed columns first take their declared width, when
                    // that fits in the cell's minimum and auto columns can
                    // take the rest.
                    for column in covered.iter_mut() {
                        if remaining_max < 0 {
                            break;
                        }
                        if let TableLength::Fixed(declared) = column.logical_width {
                            if have_auto && fixed_width <= cell_min {
                                let width = column.effective_min_width.max(declared);
                                fixed_width -= declared;
                                remaining_min -= column.effective_min_width;
                                remaining_max -= column.effective_max_width;
                                cell_min -= width;
                                column.effective_min_width = width;
                            }
                        }
                    }

                    // Everything else shares what is left by maximum width,
                    // never growing more than the unmet minimum.
                    for column in covered.iter_mut() {
                        if remaining_max < 0 || remaining_min >= cell_min {
                            break;
                        }
                        let pinned =
                            column.logical_width.is_fixed() && have_auto && fixed_width <= cell_min;
                        if pinned {
                            continue;
                        }
                        let share = if remaining_max == 0 {
                            cell_min
                        } else {
                            (cell_min as f32 * column.effective_max_width as f32 / remaining_max as f32)
                                as LayoutUnit
                        };
                        let width = column
                            .effective_min_width
                            .max(share)
                            .min(column.effective_min_width + (cell_min - remaining_min));
                        remaining_max -= column.effective_max_width;
                        remaining_min -= column.effective_min_width;
                        cell_min -= width;
                        column.effective_min_width = width;
                    }
                }
            }

            let covered = &mut self.columns[eff_col..last_col];
            if cell_width.is_percent() {
                for column in covered.iter_mut() {
                    column.max_width = column.max_width.max(column.min_width);
                }
            } else if cell_max > span_max {
                let mut span_max = span_max;
                for column in covered.iter_mut() {
                    if span_max < 0 {
                        break;
                    }
                    let share = if span_max == 0 {
                        cell_max
                    } else {
                        (cell_max as f32 * column.effective_max_width as f32 / span_max as f32)
                            as LayoutUnit
                    };
                    let width = column.effective_max_width.max(share);
                    span_max -= column.effective_max_width;
                    cell_max -= width;
                    column.effective_max_width = width;
                }
            }

            for column in covered.iter_mut() {
                // A span of empty cells counts as content.
                if span_has_empty_cells_only {
                    column.empty_cells_only = false;
                }
                column.effective_max_width = column.effective_max_width.max(column.effective_min_width);
            }
        }

        max_logical_width.min((LayoutUnit::MAX / 2) as f32) as LayoutUnit
    }

    /// Sum the columns into the table's preferred widths.
    fn update_preferred_widths(&mut self, table: &mut Table) {
        let span_max_width = self.calc_effective_logical_width(table);
        let scale_columns = should_scale_columns(&table.style);

        let mut min_width: LayoutUnit = 0;
        let mut max_width: LayoutUnit = 0;
        let mut max_percent: f32 = 0.0;
        let mut max_non_percent: f32 = 0.0;
        let mut remaining_percent: f32 = 100.0;

        for column in &self.columns {
            min_width += column.effective_min_width;
            max_width += column.effective_max_width;
            if scale_columns {
                if let TableLength::Percent(p) = column.effective_logical_width {
                    let percent = p.min(remaining_percent);
                    let width = column.effective_max_width as f32 * 100.0 / percent.max(PERCENT_EPSILON);
                    max_percent = max_percent.max(width);
                    remaining_percent -= percent;
                } else {
                    max_non_percent += column.effective_max_width as f32;
                }
            }
        }

        if scale_columns {
            max_non_percent = max_non_percent * 100.0 / remaining_percent.max(PERCENT_EPSILON);
            max_width = max_width.max(max_non_percent.min(TABLE_MAX_WIDTH as f32) as LayoutUnit);
            max_width = max_width.max(max_percent.min(TABLE_MAX_WIDTH as f32) as LayoutUnit);
        }
        max_width = max_width.max(span_max_width);

        let bps = table.borders_padding_and_spacing_inline();
        min_width += bps;
        max_width += bps;

        let fixed_width = matches!(table.style.width, TableLength::Fixed(w) if w > 0);
        if !fixed_width && remaining_percent <= 0.0 && max_non_percent > 0.0 {
            // Percentages used up the whole table: the maximum is unbounded.
            max_width = TABLE_MAX_WIDTH;
        }

        table.min_preferred_width = min_width;
        table.max_preferred_width = max_width;
    }

    /// Aggregate column widths and the table's preferred widths.
    pub fn compute_intrinsic_widths(&mut self, table: &mut Table) {
        table.prepare_intrinsic_pass();
        self.full_recalc(table);
        self.update_preferred_widths(table);
        tracing::debug!(
            columns = self.columns.len(),
            spanning = self.span_cells.len(),
            min = table.min_preferred_width,
            max = table.max_preferred_width,
            "auto layout intrinsic widths"
        );
    }

    /// Apply the compatibility adjustments to the intrinsic widths.
    ///
    /// In quirks mode a column whose fixed width is narrower than its
    /// content reverts to `auto`, unless the cell that set the width is also
    /// the widest cell. A table with a fixed width never reports preferred
    /// widths below it.
    pub fn apply_quirks(&mut self, table: &mut Table, quirks_mode: bool) {
        if quirks_mode {
            let mut changed = false;
            for column in &mut self.columns {
                if let TableLength::Fixed(w) = column.logical_width {
                    if column.max_width > w && column.fixed_contributor != column.max_contributor {
                        column.logical_width = TableLength::Auto;
                        column.fixed_contributor = None;
                        changed = true;
                    }
                }
            }
            if changed {
                self.update_preferred_widths(table);
            }
        }

        if let TableLength::Fixed(w) = table.style.width {
            if w > 0 {
                table.min_preferred_width = table.min_preferred_width.max(w);
                table.max_preferred_width = table.min_preferred_width;
            }
        }
    }

    /// Reduce columns of `kind` towards their minimums until `available`
    /// is no longer negative.
    fn shrink_columns(&mut self, kind: fn(TableLength) -> bool, available: &mut LayoutUnit) {
        let beyond_min: LayoutUnit = self
            .columns
            .iter()
            .filter(|c| kind(c.effective_logical_width))
            .map(|c| c.computed_width - c.effective_min_width)
            .sum();
        let mut beyond_min = beyond_min;
        for column in self.columns.iter_mut().rev() {
            if beyond_min <= 0 {
                break;
            }
            if !kind(column.effective_logical_width) {
                continue;
            }
            let slack = column.computed_width - column.effective_min_width;
            let reduce = (i64::from(*available) * i64::from(slack) / i64::from(beyond_min)) as LayoutUnit;
            let reduce = reduce.max(-slack);
            column.computed_width += reduce;
            *available -= reduce;
            beyond_min -= slack;
            if *available >= 0 {
                break;
            }
        }
    }

    /// Distribute the table's width over its columns and set the column
    /// positions.
    pub fn layout(&mut self, table: &mut Table) {
        let table_width = (table.logical_width - table.borders_padding_and_spacing_inline()).max(0);
        let mut available = table_width;

        if self.columns.len() != table.num_eff_cols() {
            self.full_recalc(table);
            let _ = self.calc_effective_logical_width(table);
        }
        let n = self.columns.len();

        let mut have_percent = false;
        let mut total_relative: LayoutUnit = 0;
        let mut num_auto = 0;
        let mut num_fixed = 0;
        let mut total_auto: f32 = 0.0;
        let mut total_fixed: f32 = 0.0;
        let mut total_percent: f32 = 0.0;
        let mut alloc_auto: LayoutUnit = 0;
        let mut num_auto_empty_cells_only = 0;

        // Every column gets at least its minimum.
        for column in &mut self.columns {
            let width = column.effective_min_width;
            column.computed_width = width;
            available -= width;
            match column.effective_logical_width {
                TableLength::Percent(p) => {
                    have_percent = true;
                    total_percent += p;
                }
                TableLength::Relative(v) => total_relative += v,
                TableLength::Fixed(_) => {
                    num_fixed += 1;
                    total_fixed += column.effective_max_width as f32;
                }
                TableLength::Auto => {
                    if column.empty_cells_only {
                        num_auto_empty_cells_only += 1;
                    } else {
                        num_auto += 1;
                        total_auto += column.effective_max_width as f32;
                        alloc_auto += width;
                    }
                }
            }
        }

        // Percentage columns.
        if available > 0 && have_percent {
            for column in &mut self.columns {
                if let TableLength::Percent(_) = column.effective_logical_width {
                    let width = column
                        .effective_min_width
                        .max(column.effective_logical_width.resolve_or_zero(table_width));
                    available += column.computed_width - width;
                    column.computed_width = width;
                }
            }
            if total_percent > 100.0 {
                let _ = warn_once("auto-layout", "column percentages add up to more than 100%");
                // Take the excess off the last percentage columns.
                let mut excess = (table_width as f32 * (total_percent - 100.0) / 100.0) as LayoutUnit;
                for column in self.columns.iter_mut().rev() {
                    if column.effective_logical_width.is_percent() {
                        let width = column.computed_width;
                        let reduce = width.min(excess);
                        excess -= reduce;
                        let new_width = column.effective_min_width.max(width - reduce);
                        available += width - new_width;
                        column.computed_width = new_width;
                    }
                }
            }
        }

        // Fixed columns.
        if available > 0 {
            for column in &mut self.columns {
                if let TableLength::Fixed(w) = column.effective_logical_width {
                    if w > column.computed_width {
                        available += column.computed_width - w;
                        column.computed_width = w;
                    }
                }
            }
        }

        // Relative columns; a weight of zero keeps the minimum.
        if available > 0 && total_relative > 0 {
            for column in &mut self.columns {
                if let TableLength::Relative(v) = column.effective_logical_width {
                    if v != 0 {
                        let width = (i64::from(v) * i64::from(table_width) / i64::from(total_relative))
                            as LayoutUnit;
                        let width = width.max(column.effective_min_width);
                        available += column.computed_width - width;
                        column.computed_width = width;
                    }
                }
            }
        }

        // Auto columns, by maximum width.
        if available > 0 && num_auto > 0 {
            available += alloc_auto;
            for column in &mut self.columns {
                if column.effective_logical_width.is_auto() && total_auto > 0.0 && !column.empty_cells_only {
                    let share = (available as f32 * column.effective_max_width as f32 / total_auto) as LayoutUnit;
                    let width = column.computed_width.max(share);
                    available -= width;
                    total_auto -= column.effective_max_width as f32;
                    column.computed_width = width;
                }
            }
        }

        // Leftover goes to fixed columns,
        if available > 0 && num_fixed > 0 {
            for column in &mut self.columns {
                if column.effective_logical_width.is_fixed() {
                    let share = if total_fixed > 0.0 {
                        (available as f32 * column.effective_max_width as f32 / total_fixed) as LayoutUnit
                    } else {
                        0
                    };
                    available -= share;
                    total_fixed -= column.effective_max_width as f32;
                    column.computed_width += share;
                }
            }
        }

        // then to percentage columns,
        if available > 0 && self.has_percent && total_percent > 0.0 && total_percent < 100.0 {
            for column in &mut self.columns {
                if let TableLength::Percent(p) = column.effective_logical_width {
                    let share = (available as f32 * p / total_percent) as LayoutUnit;
                    available -= share;
                    total_percent -= p;
                    column.computed_width += share;
                    if available == 0 || total_percent <= 0.0 {
                        break;
                    }
                }
            }
        }

        // then to every column that has something in it.
        if available > 0 && n > num_auto_empty_cells_only {
            let mut total = n - num_auto_empty_cells_only;
            for column in self.columns.iter_mut().rev() {
                if column.effective_logical_width.is_auto() && column.empty_cells_only {
                    continue;
                }
                let share = available / total as LayoutUnit;
                available -= share;
                total -= 1;
                column.computed_width += share;
            }
        }

        // A table of nothing but empty auto columns still fills its width.
        if available > 0 && n > 0 {
            let mut total = n;
            for column in self.columns.iter_mut().rev() {
                let share = available / total as LayoutUnit;
                available -= share;
                total -= 1;
                column.computed_width += share;
            }
        }

        // Overallocated: shrink in the reverse of the order columns grew.
        if available < 0 {
            self.shrink_columns(TableLength::is_auto, &mut available);
        }
        if available < 0 {
            self.shrink_columns(TableLength::is_relative, &mut available);
        }
        if available < 0 {
            self.shrink_columns(TableLength::is_fixed, &mut available);
        }
        if available < 0 {
            self.shrink_columns(TableLength::is_percent, &mut available);
        }

        let spacing = table.h_spacing();
        table.column_positions.clear();
        table.column_positions.reserve(n + 1);
        let mut position = 0;
        for column in &self.columns {
            table.column_positions.push(position);
            position += column.computed_width + spacing;
        }
        table.column_positions.push(position);

        tracing::debug!(
            width = table_width,
            columns = n,
            "auto layout distributed column widths"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_table_scales_columns() {
        let style = TableStyle {
            width: TableLength::Fixed(400),
            ..TableStyle::default()
        };
        assert!(should_scale_columns(&style));
    }

    #[test]
    fn test_auto_table_in_spanning_auto_cell_does_not_scale() {
        let style = TableStyle {
            enclosing_cell: Some(EnclosingCell {
                width: TableLength::Auto,
                colspan: 2,
                table_width: TableLength::Fixed(500),
                outer: None,
            }),
            ..TableStyle::default()
        };
        assert!(!should_scale_columns(&style));
    }

    #[test]
    fn test_nested_question_is_asked_of_outer_table() {
        let outer = EnclosingCell {
            width: TableLength::Percent(50.0),
            colspan: 1,
            table_width: TableLength::Auto,
            outer: None,
        };
        let style = TableStyle {
            width: TableLength::Percent(100.0),
            enclosing_cell: Some(EnclosingCell {
                width: TableLength::Auto,
                colspan: 1,
                table_width: TableLength::Percent(100.0),
                outer: Some(Box::new(outer)),
            }),
            ..TableStyle::default()
        };
        assert!(!should_scale_columns(&style));
    }

    #[test]
    fn test_raw_value_ignores_units() {
        assert!((raw_value(TableLength::Percent(30.0)) - 30.0).abs() < f32::EPSILON);
        assert!(raw_value(TableLength::Auto).abs() < f32::EPSILON);
        assert!((raw_value(TableLength::Relative(3)) - 3.0).abs() < f32::EPSILON);
    }
}
