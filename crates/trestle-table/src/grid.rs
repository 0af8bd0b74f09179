//! The table grid.
//!
//! [§ 17.5 Visual layout of table contents](https://www.w3.org/TR/CSS2/tables.html#table-layout)
//!
//! "Each cell is thus a rectangular box, one or more grid cells wide and
//! high."
//!
//! Each section keeps a sparse grid of slots indexed by (row, effective
//! column). The table keeps the list of *effective* columns: a run of
//! absolute columns that no cell edge ever divides is stored once with a
//! span. When a cell edge lands inside such a run the run is split, and the
//! split is pushed into every section grid so all rows stay aligned.
//!
//! Cell placement follows the HTML table model: a cell goes into the first
//! slot of its row not already taken by a row-spanning cell from above.

use trestle_common::warning::warn_once;

use crate::style::{LayoutUnit, TableLength};
use crate::table::Table;
use crate::tree::{CellId, ColumnElementId, ColumnKind, RowId, SectionId, SectionKind};

/// An effective column: `span` adjacent absolute columns that are never
/// separated by a cell boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnStruct {
    /// Number of absolute columns in this effective column.
    pub span: usize,
}

impl ColumnStruct {
    /// An effective column covering `span` absolute columns.
    #[must_use]
    pub const fn new(span: usize) -> Self {
        Self { span }
    }
}

/// One (row, effective column) position of a section grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridSlot {
    /// Cells covering this slot. More than one only when spans overlap; the
    /// last one is painted on top and counts as the slot's cell.
    pub cells: Vec<CellId>,
    /// `true` when the slot is covered by a colspan but is not the first
    /// column of the covering cell.
    pub in_col_span: bool,
}

impl GridSlot {
    /// The cell that owns this slot, if any.
    #[must_use]
    pub fn primary_cell(&self) -> Option<CellId> {
        self.cells.last().copied()
    }

    /// `true` if any cell covers the slot.
    #[must_use]
    pub fn has_cells(&self) -> bool {
        !self.cells.is_empty()
    }
}

/// One row of a section grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridRow {
    /// The row element placed here. `None` for rows that exist only because
    /// a rowspan extends past the section's last row element.
    pub row: Option<RowId>,
    /// Slots, one per effective column.
    pub slots: Vec<GridSlot>,
    /// Declared height: the row's own, raised by single-row cells.
    pub logical_height: TableLength,
    /// Baseline offset from the row top, found during row sizing.
    pub baseline: LayoutUnit,
}

/// Whether neighbour lookups pass over sections without rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipEmptySections {
    /// Only return sections that have at least one grid row.
    Skip,
    /// Return the adjacent section even if it is empty.
    DoNotSkip,
}

/// Where an absolute column falls inside its column element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnElementHit {
    /// The `col`, or the childless `colgroup`, covering the column.
    pub element: ColumnElementId,
    /// The column is the element's first.
    pub start_edge: bool,
    /// The column is the element's last.
    pub end_edge: bool,
}

impl Table {
    /// Number of effective columns.
    #[must_use]
    pub fn num_eff_cols(&self) -> usize {
        self.columns.len()
    }

    /// The effective column list.
    #[must_use]
    pub fn columns(&self) -> &[ColumnStruct] {
        &self.columns
    }

    /// Absolute columns in effective column `eff_col`.
    #[must_use]
    pub fn span_of_eff_col(&self, eff_col: usize) -> usize {
        self.columns.get(eff_col).map_or(1, |c| c.span)
    }

    /// Map an absolute column to the effective column containing it.
    #[must_use]
    pub fn col_to_eff_col(&self, column: usize) -> usize {
        let mut eff_col = 0;
        let mut c = 0;
        while eff_col < self.columns.len() && c + self.columns[eff_col].span - 1 < column {
            c += self.columns[eff_col].span;
            eff_col += 1;
        }
        eff_col
    }

    /// Map an effective column to its first absolute column.
    #[must_use]
    pub fn eff_col_to_col(&self, eff_col: usize) -> usize {
        self.columns.iter().take(eff_col).map(|c| c.span).sum()
    }

    /// Add an effective column of `span` absolute columns at the end.
    pub(crate) fn append_column(&mut self, span: usize) {
        let new_index = self.columns.len();
        self.columns.push(ColumnStruct::new(span));
        for section in &mut self.sections {
            if section.needs_cell_recalc {
                continue;
            }
            for grid_row in &mut section.grid {
                if grid_row.slots.len() < new_index + 1 {
                    grid_row.slots.resize_with(new_index + 1, GridSlot::default);
                }
            }
        }
        self.column_positions.resize(self.columns.len() + 1, 0);
    }

    /// Split effective column `position` so its first `first_span` absolute
    /// columns become a column of their own.
    pub(crate) fn split_column(&mut self, position: usize, first_span: usize) {
        let Some(old) = self.columns.get(position).copied() else {
            return;
        };
        if first_span == 0 || first_span >= old.span {
            return;
        }
        self.columns.insert(position, ColumnStruct::new(first_span));
        self.columns[position + 1].span -= first_span;

        for section in &mut self.sections {
            if section.needs_cell_recalc {
                continue;
            }
            if section.c_col > position {
                section.c_col += 1;
            }
            for grid_row in &mut section.grid {
                if grid_row.slots.len() <= position {
                    grid_row.slots.resize_with(position + 1, GridSlot::default);
                }
                // The new slot continues whatever covered the old one.
                let continued = GridSlot {
                    cells: grid_row.slots[position].cells.clone(),
                    in_col_span: grid_row.slots[position].has_cells(),
                };
                grid_row.slots.insert(position + 1, continued);
            }
        }
        self.column_positions.resize(self.columns.len() + 1, 0);
    }

    /// Grow `section`'s grid to at least `num_rows` rows.
    fn ensure_rows(&mut self, section: SectionId, num_rows: usize) {
        let width = self.columns.len().max(1);
        let grid = &mut self.sections[section.0].grid;
        if num_rows > grid.len() {
            grid.resize_with(num_rows, GridRow::default);
            for grid_row in grid.iter_mut() {
                if grid_row.slots.len() < width {
                    grid_row.slots.resize_with(width, GridSlot::default);
                }
            }
        }
    }

    fn slot_is_taken(&self, section: SectionId, row: usize, col: usize) -> bool {
        self.sections[section.0]
            .grid
            .get(row)
            .and_then(|r| r.slots.get(col))
            .is_some_and(|slot| slot.has_cells() || slot.in_col_span)
    }

    /// Place a row element at the next grid row of its section.
    pub(crate) fn place_row(&mut self, row: RowId) {
        let section = self.rows[row.0].section;
        let insertion_row = self.sections[section.0].c_row;
        {
            let s = &mut self.sections[section.0];
            s.c_row += 1;
            s.c_col = 0;
        }
        self.ensure_rows(section, insertion_row + 1);
        let row_height = match self.rows[row.0].style.height {
            // Relative heights mean nothing for rows.
            TableLength::Relative(_) => TableLength::Auto,
            other => other,
        };
        let grid_row = &mut self.sections[section.0].grid[insertion_row];
        grid_row.row = Some(row);
        grid_row.logical_height = row_height;
        self.rows[row.0].grid_index = insertion_row;
    }

    /// [§ 17.5](https://www.w3.org/TR/CSS2/tables.html#table-layout)
    ///
    /// Place `cell` in the grid of its row's section.
    ///
    /// "Cells are placed in the row's first grid cell not already occupied by
    /// a cell spanning from a previous row." Columns are appended when the
    /// cell runs past the last one and split when the cell ends inside one.
    pub(crate) fn place_cell(&mut self, cell: CellId) {
        let row = self.cells[cell.0].row;
        let section = self.rows[row.0].section;
        if self.sections[section.0].needs_cell_recalc {
            return;
        }

        let (colspan, rowspan) = {
            let style = &self.cells[cell.0].style;
            if style.colspan == 0 {
                let _ = warn_once("grid", "colspan=0 clamped to 1");
            }
            if style.rowspan == 0 {
                let _ = warn_once("grid", "rowspan=0 clamped to 1");
            }
            (self.cells[cell.0].colspan(), self.cells[cell.0].rowspan())
        };
        let insertion_row = self.rows[row.0].grid_index;

        let mut c_col = self.sections[section.0].c_col;
        while c_col < self.columns.len() && self.slot_is_taken(section, insertion_row, c_col) {
            c_col += 1;
        }
        self.sections[section.0].c_col = c_col;

        self.update_row_height_for_cell(section, insertion_row, cell);
        self.ensure_rows(section, insertion_row + rowspan);
        self.sections[section.0].grid[insertion_row].row = Some(row);

        let origin = c_col;
        let mut remaining = colspan;
        let mut in_col_span = false;
        while remaining > 0 {
            let c_col = self.sections[section.0].c_col;
            let current_span = if c_col >= self.columns.len() {
                self.append_column(remaining);
                remaining
            } else {
                if remaining < self.columns[c_col].span {
                    self.split_column(c_col, remaining);
                }
                self.columns[c_col].span
            };
            let s = &mut self.sections[section.0];
            for r in insertion_row..insertion_row + rowspan {
                let slots = &mut s.grid[r].slots;
                if slots.len() <= c_col {
                    slots.resize_with(c_col + 1, GridSlot::default);
                }
                slots[c_col].cells.push(cell);
                if in_col_span {
                    slots[c_col].in_col_span = true;
                }
            }
            s.c_col += 1;
            remaining = remaining.saturating_sub(current_span);
            in_col_span = true;
        }

        let col = self.eff_col_to_col(origin);
        let c = &mut self.cells[cell.0];
        c.grid_row = insertion_row;
        c.col = col;
    }

    /// A single-row cell with a declared height raises its row's height:
    /// percentages beat pixel heights, and the larger value of the same kind
    /// wins.
    fn update_row_height_for_cell(&mut self, section: SectionId, row: usize, cell: CellId) {
        let c = &self.cells[cell.0];
        if c.rowspan() != 1 {
            return;
        }
        let height = c.style.height;
        if !height.is_positive() {
            return;
        }
        let grid_row = &mut self.sections[section.0].grid[row];
        match (height, grid_row.logical_height) {
            (TableLength::Percent(p), TableLength::Percent(current)) if current < p => {
                grid_row.logical_height = height;
            }
            (TableLength::Percent(_), current) if !current.is_percent() => {
                grid_row.logical_height = height;
            }
            (TableLength::Fixed(v), TableLength::Fixed(current)) if current < v => {
                grid_row.logical_height = height;
            }
            (TableLength::Fixed(_), TableLength::Auto | TableLength::Relative(_)) => {
                grid_row.logical_height = height;
            }
            _ => {}
        }
    }

    /// Rebuild `section`'s grid from its rows and cells.
    fn recalc_cells(&mut self, section: SectionId) {
        {
            let s = &mut self.sections[section.0];
            s.c_col = 0;
            s.c_row = 0;
            s.grid.clear();
            s.needs_cell_recalc = false;
        }
        let rows = self.sections[section.0].rows.clone();
        for row in rows {
            self.place_row(row);
            let cells = self.rows[row.0].cells.clone();
            for cell in cells {
                self.place_cell(cell);
            }
        }
    }

    /// Effective columns actually used by `section`: one past the last slot
    /// any cell covers.
    fn section_num_columns(&self, section: SectionId) -> usize {
        let mut used = 0;
        for grid_row in &self.sections[section.0].grid {
            for c in used..self.columns.len() {
                if grid_row
                    .slots
                    .get(c)
                    .is_some_and(|slot| slot.has_cells() || slot.in_col_span)
                {
                    used = c + 1;
                }
            }
        }
        used
    }

    /// Rebuild the grid of every section if the structure changed.
    ///
    /// The effective column list is recreated from scratch, so columns
    /// split by since-removed cells merge back together.
    pub fn build_grid(&mut self) {
        if !self.needs_section_recalc {
            return;
        }
        self.columns.clear();
        for section in &mut self.sections {
            section.needs_cell_recalc = true;
        }

        self.head = None;
        self.foot = None;
        self.first_body = None;
        let order = self.section_order.clone();
        for &section in &order {
            match self.sections[section.0].kind {
                SectionKind::Head if self.head.is_none() => self.head = Some(section),
                SectionKind::Foot if self.foot.is_none() => self.foot = Some(section),
                _ => {
                    if self.first_body.is_none() {
                        self.first_body = Some(section);
                    }
                }
            }
            self.recalc_cells(section);
        }

        let max_cols = order
            .iter()
            .map(|&s| self.section_num_columns(s))
            .max()
            .unwrap_or(0);
        self.columns.resize(max_cols, ColumnStruct::new(1));
        self.column_positions.clear();
        self.column_positions.resize(max_cols + 1, 0);
        self.needs_section_recalc = false;
        self.invalidate_borders();

        tracing::debug!(
            sections = order.len(),
            columns = max_cols,
            "rebuilt table grid"
        );
    }

    /// [§ 17.2](https://www.w3.org/TR/CSS2/tables.html#table-display)
    ///
    /// Sections in display order: the first header group, then every body
    /// (extra header and footer groups are displayed as bodies), then the
    /// first footer group.
    #[must_use]
    pub fn display_sections(&self) -> Vec<SectionId> {
        let mut order = Vec::with_capacity(self.section_order.len());
        order.extend(self.head);
        order.extend(
            self.section_order
                .iter()
                .copied()
                .filter(|&s| Some(s) != self.head && Some(s) != self.foot),
        );
        order.extend(self.foot);
        order
    }

    /// The grid slot at (`row`, `eff_col`) of `section`.
    #[must_use]
    pub fn cell_at(&self, section: SectionId, row: usize, eff_col: usize) -> Option<&GridSlot> {
        self.sections
            .get(section.0)?
            .grid
            .get(row)?
            .slots
            .get(eff_col)
    }

    /// The cell owning (`row`, `eff_col`) of `section`.
    #[must_use]
    pub fn primary_cell_at(&self, section: SectionId, row: usize, eff_col: usize) -> Option<CellId> {
        self.cell_at(section, row, eff_col)?.primary_cell()
    }

    fn has_rows(&self, section: SectionId) -> bool {
        !self.sections[section.0].grid.is_empty()
    }

    /// The section displayed before `section`.
    #[must_use]
    pub fn section_above(&self, section: SectionId, skip: SkipEmptySections) -> Option<SectionId> {
        let order = self.display_sections();
        let index = order.iter().position(|&s| s == section)?;
        order[..index]
            .iter()
            .rev()
            .copied()
            .find(|&s| skip == SkipEmptySections::DoNotSkip || self.has_rows(s))
    }

    /// The section displayed after `section`.
    #[must_use]
    pub fn section_below(&self, section: SectionId, skip: SkipEmptySections) -> Option<SectionId> {
        let order = self.display_sections();
        let index = order.iter().position(|&s| s == section)?;
        order[index + 1..]
            .iter()
            .copied()
            .find(|&s| skip == SkipEmptySections::DoNotSkip || self.has_rows(s))
    }

    /// The first section, in display order, that has rows.
    #[must_use]
    pub fn top_non_empty_section(&self) -> Option<SectionId> {
        self.display_sections().into_iter().find(|&s| self.has_rows(s))
    }

    /// The last section, in display order, that has rows.
    #[must_use]
    pub fn bottom_non_empty_section(&self) -> Option<SectionId> {
        self.display_sections()
            .into_iter()
            .rev()
            .find(|&s| self.has_rows(s))
    }

    fn section_of(&self, cell: CellId) -> SectionId {
        self.rows[self.cells[cell.0].row.0].section
    }

    /// The cell above `cell`'s first row, in the same column.
    #[must_use]
    pub fn cell_above(&self, cell: CellId) -> Option<CellId> {
        let c = &self.cells[cell.0];
        let own = self.section_of(cell);
        let (section, row) = if c.grid_row > 0 {
            (own, c.grid_row - 1)
        } else {
            let above = self.section_above(own, SkipEmptySections::Skip)?;
            (above, self.sections[above.0].num_rows().checked_sub(1)?)
        };
        self.primary_cell_at(section, row, self.col_to_eff_col(c.col))
    }

    /// The cell below `cell`'s last row, in the same column.
    #[must_use]
    pub fn cell_below(&self, cell: CellId) -> Option<CellId> {
        let c = &self.cells[cell.0];
        let own = self.section_of(cell);
        let last_row = c.grid_row + c.rowspan() - 1;
        let (section, row) = if last_row + 1 < self.sections[own.0].num_rows() {
            (own, last_row + 1)
        } else {
            (self.section_below(own, SkipEmptySections::Skip)?, 0)
        };
        self.primary_cell_at(section, row, self.col_to_eff_col(c.col))
    }

    /// The cell before `cell` in its first row.
    #[must_use]
    pub fn cell_before(&self, cell: CellId) -> Option<CellId> {
        let c = &self.cells[cell.0];
        let eff_col = self.col_to_eff_col(c.col);
        if eff_col == 0 {
            return None;
        }
        self.primary_cell_at(self.section_of(cell), c.grid_row, eff_col - 1)
    }

    /// The cell after `cell` in its first row.
    #[must_use]
    pub fn cell_after(&self, cell: CellId) -> Option<CellId> {
        let c = &self.cells[cell.0];
        let eff_col = self.col_to_eff_col(c.col + c.colspan());
        if eff_col >= self.num_eff_cols() {
            return None;
        }
        self.primary_cell_at(self.section_of(cell), c.grid_row, eff_col)
    }

    /// Column elements that stand for columns, in document order: every
    /// `col`, and every `colgroup` without child `col`s.
    pub(crate) fn leaf_column_elements(&self) -> Vec<ColumnElementId> {
        let mut leaves = Vec::new();
        for &top in &self.top_columns {
            let element = &self.column_elements[top.0];
            if element.is_group_with_children() {
                leaves.extend(element.children.iter().copied());
            } else {
                leaves.push(top);
            }
        }
        leaves
    }

    /// The `col` or childless `colgroup` covering absolute column `col`.
    #[must_use]
    pub fn col_element(&self, col: usize) -> Option<ColumnElementHit> {
        let mut column_count = 0;
        for element in self.leaf_column_elements() {
            let span = self.column_elements[element.0].span();
            let start = column_count;
            column_count += span;
            if column_count > col {
                return Some(ColumnElementHit {
                    element,
                    start_edge: start == col,
                    end_edge: column_count - 1 == col,
                });
            }
        }
        None
    }

    /// The declared width of a leaf column element. A `col` with an `auto`
    /// width inherits its group's width.
    pub(crate) fn column_element_width(&self, element: ColumnElementId) -> TableLength {
        let e = &self.column_elements[element.0];
        match (e.style.width, e.parent) {
            (TableLength::Auto, Some(group)) => self.column_elements[group.0].style.width,
            (width, _) => width,
        }
    }

    /// The group around `element`, when `element` is a `col` inside one.
    pub(crate) fn enclosing_column_group(&self, element: ColumnElementId) -> Option<ColumnElementId> {
        let e = &self.column_elements[element.0];
        if e.kind == ColumnKind::Column {
            e.parent
        } else {
            None
        }
    }

    /// The enclosing group when `element` is its first child.
    pub(crate) fn enclosing_column_group_if_adjacent_before(
        &self,
        element: ColumnElementId,
    ) -> Option<ColumnElementId> {
        let group = self.enclosing_column_group(element)?;
        (self.column_elements[group.0].children.first() == Some(&element)).then_some(group)
    }

    /// The enclosing group when `element` is its last child.
    pub(crate) fn enclosing_column_group_if_adjacent_after(
        &self,
        element: ColumnElementId,
    ) -> Option<ColumnElementId> {
        let group = self.enclosing_column_group(element)?;
        (self.column_elements[group.0].children.last() == Some(&element)).then_some(group)
    }
}
