//! The table box and its builder API.
//!
//! [§ 17.4 Tables in the visual formatting model](https://www.w3.org/TR/CSS2/tables.html#model)
//!
//! A [`Table`] is assembled bottom-up the way a box tree builder would emit
//! it: column elements, then sections, rows and cells in source order.
//! Appending to the last row or section patches the grid in place; any other
//! structural edit marks the table for a full grid rebuild on the next
//! [`Table::build_grid`] or [`Table::layout`].

use trestle_common::warning::warn_once;

use crate::grid::ColumnStruct;
use crate::style::{
    CELL_MAX_WIDTH, CellStyle, ColumnStyle, LayoutUnit, RowStyle, SectionStyle, TableLength,
    TableStyle,
};
use crate::tree::{
    Cell, CellContent, CellId, ColumnElement, ColumnElementId, ColumnKind, MAX_COLSPAN,
    MAX_COLUMN_SPAN, MAX_ROWSPAN, Row, RowId, Section, SectionId, SectionKind,
};

/// Widest a table is ever taken to be when percentages ask for more.
pub const TABLE_MAX_WIDTH: LayoutUnit = 15000;

/// Used border widths of the table box itself.
///
/// In the separated model these are the table's declared borders. In the
/// collapsing model they are the outer halves of the collapsed borders along
/// the table's edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableBorderWidths {
    /// Inline-start border width.
    pub start: LayoutUnit,
    /// Inline-end border width.
    pub end: LayoutUnit,
    /// Block-start border width.
    pub before: LayoutUnit,
    /// Block-end border width.
    pub after: LayoutUnit,
}

/// A table and everything inside it.
#[derive(Debug, Clone)]
pub struct Table {
    pub(crate) style: TableStyle,
    pub(crate) sections: Vec<Section>,
    pub(crate) rows: Vec<Row>,
    pub(crate) cells: Vec<Cell>,
    pub(crate) column_elements: Vec<ColumnElement>,
    /// Column elements that are direct children of the table.
    pub(crate) top_columns: Vec<ColumnElementId>,
    /// Attached sections in source order.
    pub(crate) section_order: Vec<SectionId>,
    pub(crate) columns: Vec<ColumnStruct>,
    pub(crate) column_positions: Vec<LayoutUnit>,
    pub(crate) head: Option<SectionId>,
    pub(crate) foot: Option<SectionId>,
    pub(crate) first_body: Option<SectionId>,
    pub(crate) needs_section_recalc: bool,
    /// Bumped whenever collapsed borders may have changed.
    pub(crate) border_generation: u64,
    pub(crate) outer_borders: TableBorderWidths,
    pub(crate) min_preferred_width: LayoutUnit,
    pub(crate) max_preferred_width: LayoutUnit,
    pub(crate) logical_width: LayoutUnit,
    pub(crate) logical_height: LayoutUnit,
}

impl Table {
    /// An empty table.
    #[must_use]
    pub fn new(style: TableStyle) -> Self {
        Self {
            style,
            sections: Vec::new(),
            rows: Vec::new(),
            cells: Vec::new(),
            column_elements: Vec::new(),
            top_columns: Vec::new(),
            section_order: Vec::new(),
            columns: Vec::new(),
            column_positions: vec![0],
            head: None,
            foot: None,
            first_body: None,
            needs_section_recalc: false,
            border_generation: 0,
            outer_borders: TableBorderWidths::default(),
            min_preferred_width: 0,
            max_preferred_width: 0,
            logical_width: 0,
            logical_height: 0,
        }
    }

    /// The table's computed style.
    #[must_use]
    pub const fn style(&self) -> &TableStyle {
        &self.style
    }

    /// Replace the table's style.
    pub fn set_style(&mut self, style: TableStyle) {
        self.style = style;
        self.invalidate_borders();
    }

    fn push_column_element(
        &mut self,
        kind: ColumnKind,
        style: ColumnStyle,
        parent: Option<ColumnElementId>,
    ) -> ColumnElementId {
        let id = ColumnElementId(self.column_elements.len());
        self.column_elements.push(ColumnElement {
            kind,
            style: clamp_column_style(style),
            parent,
            children: Vec::new(),
        });
        self.invalidate_borders();
        id
    }

    /// Append a `col` directly under the table.
    pub fn add_column(&mut self, style: ColumnStyle) -> ColumnElementId {
        let id = self.push_column_element(ColumnKind::Column, style, None);
        self.top_columns.push(id);
        id
    }

    /// Append a `colgroup` directly under the table.
    pub fn add_column_group(&mut self, style: ColumnStyle) -> ColumnElementId {
        let id = self.push_column_element(ColumnKind::Group, style, None);
        self.top_columns.push(id);
        id
    }

    /// Append a `col` to `group`.
    ///
    /// Returns `None` if `group` is not a column group of this table.
    pub fn add_column_to_group(
        &mut self,
        group: ColumnElementId,
        style: ColumnStyle,
    ) -> Option<ColumnElementId> {
        if self.column_elements.get(group.0)?.kind != ColumnKind::Group {
            return None;
        }
        let id = self.push_column_element(ColumnKind::Column, style, Some(group));
        self.column_elements[group.0].children.push(id);
        Some(id)
    }

    /// Replace a column element's style.
    pub fn set_column_style(&mut self, element: ColumnElementId, style: ColumnStyle) {
        if let Some(e) = self.column_elements.get_mut(element.0) {
            e.style = clamp_column_style(style);
            self.invalidate_borders();
        }
    }

    /// Append a row group.
    pub fn add_section(&mut self, kind: SectionKind, style: SectionStyle) -> SectionId {
        let id = SectionId(self.sections.len());
        self.sections.push(Section::new(kind, style));
        self.section_order.push(id);
        self.set_needs_section_recalc();
        id
    }

    /// Replace a section's style.
    pub fn set_section_style(&mut self, section: SectionId, style: SectionStyle) {
        if let Some(s) = self.sections.get_mut(section.0) {
            s.style = style;
            self.invalidate_borders();
        }
    }

    /// Append a row to `section`.
    ///
    /// # Panics
    ///
    /// Panics if `section` does not belong to this table.
    pub fn add_row(&mut self, section: SectionId, style: RowStyle) -> RowId {
        let id = RowId(self.rows.len());
        self.rows.push(Row {
            style,
            section,
            cells: Vec::new(),
            grid_index: 0,
            attached: true,
        });
        self.sections[section.0].rows.push(id);
        if self.can_patch_grid(section) {
            self.place_row(id);
            self.invalidate_borders();
        } else {
            self.set_needs_section_recalc();
        }
        id
    }

    /// Insert a row into `section` before the row currently at `index`.
    ///
    /// An `index` past the end appends.
    ///
    /// # Panics
    ///
    /// Panics if `section` does not belong to this table.
    pub fn insert_row(&mut self, section: SectionId, index: usize, style: RowStyle) -> RowId {
        let id = RowId(self.rows.len());
        self.rows.push(Row {
            style,
            section,
            cells: Vec::new(),
            grid_index: 0,
            attached: true,
        });
        let rows = &mut self.sections[section.0].rows;
        let index = index.min(rows.len());
        rows.insert(index, id);
        self.set_needs_section_recalc();
        id
    }

    /// Detach `row` and its cells from the table.
    pub fn remove_row(&mut self, row: RowId) {
        let Some(r) = self.rows.get_mut(row.0) else {
            return;
        };
        if !r.attached {
            return;
        }
        r.attached = false;
        let section = r.section;
        for &cell in &r.cells {
            self.cells[cell.0].attached = false;
        }
        self.sections[section.0].rows.retain(|&id| id != row);
        self.set_needs_section_recalc();
    }

    /// Replace a row's style.
    pub fn set_row_style(&mut self, row: RowId, style: RowStyle) {
        if let Some(r) = self.rows.get_mut(row.0) {
            r.style = style;
            self.set_needs_section_recalc();
        }
    }

    /// Append a cell to `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row` does not belong to this table.
    pub fn add_cell(&mut self, row: RowId, style: CellStyle, content: CellContent) -> CellId {
        let id = CellId(self.cells.len());
        self.cells.push(Cell {
            style: clamp_cell_style(style),
            content,
            row,
            grid_row: 0,
            col: 0,
            min_width: 0,
            max_width: 0,
            attached: true,
        });
        self.rows[row.0].cells.push(id);
        let section = self.rows[row.0].section;
        let is_last_row = self.sections[section.0].rows.last() == Some(&row);
        if is_last_row && self.can_patch_grid(section) {
            self.place_cell(id);
            self.invalidate_borders();
        } else {
            self.set_needs_section_recalc();
        }
        id
    }

    /// Detach `cell` from its row.
    pub fn remove_cell(&mut self, cell: CellId) {
        let Some(c) = self.cells.get_mut(cell.0) else {
            return;
        };
        if !c.attached {
            return;
        }
        c.attached = false;
        let row = c.row;
        self.rows[row.0].cells.retain(|&id| id != cell);
        self.set_needs_section_recalc();
    }

    /// Change a cell's spans.
    pub fn set_cell_span(&mut self, cell: CellId, colspan: u32, rowspan: u32) {
        if let Some(c) = self.cells.get_mut(cell.0) {
            c.style.colspan = clamp_colspan(colspan);
            c.style.rowspan = clamp_rowspan(rowspan);
            self.set_needs_section_recalc();
        }
    }

    /// Replace a cell's style.
    pub fn set_cell_style(&mut self, cell: CellId, style: CellStyle) {
        if let Some(c) = self.cells.get_mut(cell.0) {
            c.style = clamp_cell_style(style);
            self.set_needs_section_recalc();
        }
    }

    /// Replace a cell's measured content.
    pub fn set_cell_content(&mut self, cell: CellId, content: CellContent) {
        if let Some(c) = self.cells.get_mut(cell.0) {
            c.content = content;
        }
    }

    fn can_patch_grid(&self, section: SectionId) -> bool {
        !self.needs_section_recalc && !self.sections[section.0].needs_cell_recalc
    }

    pub(crate) fn set_needs_section_recalc(&mut self) {
        self.needs_section_recalc = true;
        self.invalidate_borders();
    }

    /// Drop every cached collapsed border.
    pub(crate) fn invalidate_borders(&mut self) {
        self.border_generation = self.border_generation.wrapping_add(1);
    }

    /// `true` when a structural edit is waiting for [`Table::build_grid`].
    #[must_use]
    pub const fn needs_grid_rebuild(&self) -> bool {
        self.needs_section_recalc
    }

    /// A section by id.
    #[must_use]
    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(id.0)
    }

    /// A row by id.
    #[must_use]
    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.get(id.0)
    }

    /// A cell by id.
    #[must_use]
    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.0)
    }

    /// A column element by id.
    #[must_use]
    pub fn column_element(&self, id: ColumnElementId) -> Option<&ColumnElement> {
        self.column_elements.get(id.0)
    }

    /// Attached sections in source order.
    #[must_use]
    pub fn sections_in_source_order(&self) -> &[SectionId] {
        &self.section_order
    }

    /// Every attached cell, section by section in display order.
    #[must_use]
    pub fn attached_cells(&self) -> Vec<CellId> {
        self.display_sections()
            .into_iter()
            .flat_map(|s| self.sections[s.0].rows.iter())
            .flat_map(|r| self.rows[r.0].cells.iter().copied())
            .collect()
    }

    /// Number of absolute columns: the sum of effective column spans.
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.iter().map(|c| c.span).sum()
    }

    /// The first header group, if any.
    #[must_use]
    pub const fn head(&self) -> Option<SectionId> {
        self.head
    }

    /// The first footer group, if any.
    #[must_use]
    pub const fn foot(&self) -> Option<SectionId> {
        self.foot
    }

    /// The first section displayed as a body.
    #[must_use]
    pub const fn first_body(&self) -> Option<SectionId> {
        self.first_body
    }

    /// Column start offsets from the last layout, one more than columns.
    #[must_use]
    pub fn column_positions(&self) -> &[LayoutUnit] {
        &self.column_positions
    }

    /// Border-box width from the last layout.
    #[must_use]
    pub const fn logical_width(&self) -> LayoutUnit {
        self.logical_width
    }

    /// Border-box height from the last layout.
    #[must_use]
    pub const fn logical_height(&self) -> LayoutUnit {
        self.logical_height
    }

    /// Minimum and maximum border-box widths from the last intrinsic pass.
    #[must_use]
    pub const fn preferred_widths(&self) -> (LayoutUnit, LayoutUnit) {
        (self.min_preferred_width, self.max_preferred_width)
    }

    /// Used widths of the table's own borders.
    #[must_use]
    pub const fn border_widths(&self) -> TableBorderWidths {
        self.outer_borders
    }

    /// Space between columns. Zero when borders collapse.
    #[must_use]
    pub fn h_spacing(&self) -> LayoutUnit {
        if self.style.collapses_borders() {
            0
        } else {
            self.style.border_spacing.horizontal.max(0)
        }
    }

    /// Space between rows. Zero when borders collapse.
    #[must_use]
    pub fn v_spacing(&self) -> LayoutUnit {
        if self.style.collapses_borders() {
            0
        } else {
            self.style.border_spacing.vertical.max(0)
        }
    }

    /// Start plus end padding. Tables have no padding when borders collapse.
    #[must_use]
    pub fn padding_inline_sum(&self) -> LayoutUnit {
        if self.style.collapses_borders() {
            0
        } else {
            self.style.padding.inline_sum()
        }
    }

    /// Borders, padding and inter-column spacing across the table.
    #[must_use]
    pub fn borders_padding_and_spacing_inline(&self) -> LayoutUnit {
        let borders = self.outer_borders.start + self.outer_borders.end;
        if self.style.collapses_borders() {
            borders
        } else {
            let gaps = LayoutUnit::try_from(self.columns.len() + 1).unwrap_or(LayoutUnit::MAX);
            borders
                + self.style.padding.inline_sum()
                + gaps.saturating_mul(self.h_spacing())
        }
    }

    /// Borders and padding above and below the rows.
    #[must_use]
    pub fn borders_and_padding_block(&self) -> LayoutUnit {
        let borders = self.outer_borders.before + self.outer_borders.after;
        if self.style.collapses_borders() {
            borders
        } else {
            borders + self.style.padding.block_sum()
        }
    }
}

fn clamp_colspan(colspan: u32) -> u32 {
    if colspan > MAX_COLSPAN {
        let _ = warn_once("grid", "colspan above 1000 clamped to 1000");
    }
    colspan.min(MAX_COLSPAN)
}

fn clamp_rowspan(rowspan: u32) -> u32 {
    if rowspan > MAX_ROWSPAN {
        let _ = warn_once("grid", "rowspan above 65534 clamped to 65534");
    }
    rowspan.min(MAX_ROWSPAN)
}

/// Spans are limited the way HTML limits them, and declared pixel widths to
/// [`CELL_MAX_WIDTH`].
fn clamp_column_style(mut style: ColumnStyle) -> ColumnStyle {
    if style.span == 0 {
        let _ = warn_once("grid", "column span=0 clamped to 1");
    }
    if style.span > MAX_COLUMN_SPAN {
        let _ = warn_once("grid", "column span above 1000 clamped to 1000");
    }
    style.span = style.span.clamp(1, MAX_COLUMN_SPAN);
    if let TableLength::Fixed(_) = style.width {
        style.width = style.width.clamped(CELL_MAX_WIDTH);
    }
    style
}

/// Declared cell widths are limited to [`CELL_MAX_WIDTH`], spans to
/// [`MAX_COLSPAN`] and [`MAX_ROWSPAN`].
fn clamp_cell_style(mut style: CellStyle) -> CellStyle {
    style.colspan = clamp_colspan(style.colspan);
    style.rowspan = clamp_rowspan(style.rowspan);
    if let TableLength::Fixed(_) | TableLength::Relative(_) = style.width {
        style.width = style.width.clamped(CELL_MAX_WIDTH);
    }
    if let TableLength::Fixed(v) = style.height {
        style.height = TableLength::Fixed(v.max(0));
    }
    style
}
