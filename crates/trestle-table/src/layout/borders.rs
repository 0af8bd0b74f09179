//! Collapsed border resolution.
//!
//! [§ 17.6.2 The collapsing border model](https://www.w3.org/TR/CSS2/tables.html#collapsing-borders)
//!
//! Every edge of every cell is shared with whatever touches it: the
//! neighbouring cell, the row, the row group, the column, the column group
//! or the table. One border wins each edge.
//!
//! [§ 17.6.2.1 Border conflict resolution](https://www.w3.org/TR/CSS2/tables.html#border-conflict-resolution)
//!
//! 1. "Borders with the 'border-style' of 'hidden' take precedence over all
//!    other conflicting borders. Any border with this value suppresses all
//!    borders at this location."
//! 2. "Borders with a style of 'none' have the lowest priority."
//! 3. "If none of the styles are 'hidden' and at least one of them is not
//!    'none', then narrow borders are discarded in favor of wider ones. If
//!    several have the same 'border-width' then styles are preferred in this
//!    order: 'double', 'solid', 'dashed', 'dotted', 'ridge', 'outset',
//!    'groove', and the lowest: 'inset'."
//! 4. "If border styles differ only in color, then a style set on a cell
//!    wins over one on a row, which wins over a row group, column, column
//!    group and, lastly, table. When two elements of the same type conflict,
//!    then the one further to the left (if the table's 'direction' is 'ltr';
//!    right, if it is 'rtl') and further to the top wins."
//!
//! Rules 1 to 4 define a total order over candidates, so the winner does not
//! depend on the order candidates are visited in.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::ops::ControlFlow;

use serde::Serialize;

use crate::grid::SkipEmptySections;
use crate::style::{BorderEdge, BorderSpec, BorderStyle, Color, LayoutUnit};
use crate::table::{Table, TableBorderWidths};
use crate::tree::{CellId, ColumnElementId, ColumnKind, RowId, SectionId};

/// Which kind of box a border came from, weakest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BorderPrecedence {
    /// No border was found.
    #[default]
    Off,
    /// The table box.
    Table,
    /// A `colgroup`.
    ColumnGroup,
    /// A `col`.
    Column,
    /// A row group.
    RowGroup,
    /// A row.
    Row,
    /// A cell.
    Cell,
}

/// Where a candidate sits in the document, earliest first.
///
/// The table comes first, then column elements, then sections with their
/// rows and cells in source order. Cells of the same row order by their
/// position in the row, which in a left-to-right table is also left to right.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceOrder(pub u8, pub usize, pub usize, pub usize);

/// One border competing for an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BorderCandidate {
    /// The declared border.
    pub spec: BorderSpec,
    /// The kind of box it came from.
    pub precedence: BorderPrecedence,
    /// Where that box sits in the document.
    pub order: SourceOrder,
}

impl BorderCandidate {
    fn style_rank(&self) -> u8 {
        match self.spec.style {
            BorderStyle::None => 0,
            BorderStyle::Hidden => u8::MAX,
            style => style as u8,
        }
    }

    /// Strength under rules 1 to 4. `Greater` wins.
    #[must_use]
    pub fn strength_cmp(&self, other: &Self) -> Ordering {
        let hidden = |c: &Self| c.spec.style == BorderStyle::Hidden;
        let none = |c: &Self| c.spec.style == BorderStyle::None;
        hidden(self)
            .cmp(&hidden(other))
            .then_with(|| none(other).cmp(&none(self)))
            .then_with(|| self.spec.used_width().cmp(&other.spec.used_width()))
            .then_with(|| self.style_rank().cmp(&other.style_rank()))
            .then_with(|| self.precedence.cmp(&other.precedence))
            // Earlier in the document wins.
            .then_with(|| other.order.cmp(&self.order))
    }
}

/// The stronger of two candidates.
#[must_use]
pub fn choose_border(a: BorderCandidate, b: BorderCandidate) -> BorderCandidate {
    if b.strength_cmp(&a) == Ordering::Greater {
        b
    } else {
        a
    }
}

/// The border that won an edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ResolvedBorder {
    /// Winning style. `hidden` means the edge was suppressed.
    pub style: BorderStyle,
    /// Used width; zero for `none` and `hidden`.
    pub width: LayoutUnit,
    /// Winning color.
    pub color: Color,
    /// The kind of box the winner came from.
    pub precedence: BorderPrecedence,
}

impl ResolvedBorder {
    /// The value of an edge a `hidden` border suppressed.
    pub const SUPPRESSED: Self = Self {
        style: BorderStyle::Hidden,
        width: 0,
        color: Color::TRANSPARENT,
        precedence: BorderPrecedence::Off,
    };

    /// `true` when the edge draws something.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.style.is_visible() && self.width > 0
    }

    fn from_candidate(candidate: BorderCandidate) -> Self {
        if candidate.spec.style == BorderStyle::Hidden {
            return Self::SUPPRESSED;
        }
        Self {
            style: candidate.spec.style,
            width: candidate.spec.used_width(),
            color: candidate.spec.color,
            precedence: candidate.precedence,
        }
    }
}

/// Pick the winner among `candidates`.
///
/// A `hidden` candidate ends the search: nothing can beat it.
pub fn resolve_candidates<I>(candidates: I) -> ResolvedBorder
where
    I: IntoIterator<Item = BorderCandidate>,
{
    let folded = candidates
        .into_iter()
        .try_fold(None::<BorderCandidate>, |best, candidate| {
            if candidate.spec.style == BorderStyle::Hidden {
                return ControlFlow::Break(candidate);
            }
            ControlFlow::Continue(Some(match best {
                Some(best) => choose_border(best, candidate),
                None => candidate,
            }))
        });
    match folded {
        ControlFlow::Break(hidden) => ResolvedBorder::from_candidate(hidden),
        ControlFlow::Continue(Some(winner)) => ResolvedBorder::from_candidate(winner),
        ControlFlow::Continue(None) => ResolvedBorder::default(),
    }
}

/// Resolved borders of one section's cells, tagged with the table
/// generation they were computed in.
#[derive(Debug, Clone, Default)]
pub struct BorderCache {
    entries: HashMap<(CellId, BorderEdge), (u64, ResolvedBorder)>,
}

impl BorderCache {
    fn get(&self, cell: CellId, edge: BorderEdge, generation: u64) -> Option<ResolvedBorder> {
        self.entries
            .get(&(cell, edge))
            .filter(|(g, _)| *g == generation)
            .map(|&(_, border)| border)
    }

    fn insert(&mut self, cell: CellId, edge: BorderEdge, generation: u64, border: ResolvedBorder) {
        let _ = self.entries.insert((cell, edge), (generation, border));
    }

    /// Number of cached entries, stale ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing has been cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Table {
    fn section_source_index(&self, section: SectionId) -> usize {
        self.section_order
            .iter()
            .position(|&s| s == section)
            .unwrap_or(usize::MAX)
    }

    fn table_candidate(&self, edge: BorderEdge) -> BorderCandidate {
        BorderCandidate {
            spec: self.style.borders.get(edge),
            precedence: BorderPrecedence::Table,
            order: SourceOrder(0, 0, 0, 0),
        }
    }

    fn column_candidate(&self, element: ColumnElementId, edge: BorderEdge) -> BorderCandidate {
        let e = &self.column_elements[element.0];
        BorderCandidate {
            spec: e.style.borders.get(edge),
            precedence: match e.kind {
                ColumnKind::Column => BorderPrecedence::Column,
                ColumnKind::Group => BorderPrecedence::ColumnGroup,
            },
            order: SourceOrder(1, element.0, 0, 0),
        }
    }

    fn section_candidate(&self, section: SectionId, edge: BorderEdge) -> BorderCandidate {
        BorderCandidate {
            spec: self.sections[section.0].style.borders.get(edge),
            precedence: BorderPrecedence::RowGroup,
            order: SourceOrder(2, self.section_source_index(section), 0, 0),
        }
    }

    fn row_candidate(&self, row: RowId, edge: BorderEdge) -> BorderCandidate {
        let r = &self.rows[row.0];
        let index = self.sections[r.section.0]
            .rows
            .iter()
            .position(|&id| id == row)
            .unwrap_or(usize::MAX - 1);
        BorderCandidate {
            spec: r.style.borders.get(edge),
            precedence: BorderPrecedence::Row,
            order: SourceOrder(2, self.section_source_index(r.section), index + 1, 0),
        }
    }

    fn cell_candidate(&self, cell: CellId, edge: BorderEdge) -> BorderCandidate {
        let c = &self.cells[cell.0];
        let row = self.row_candidate(c.row, edge);
        let index = self.rows[c.row.0]
            .cells
            .iter()
            .position(|&id| id == cell)
            .unwrap_or(usize::MAX - 1);
        BorderCandidate {
            spec: c.style.borders.get(edge),
            precedence: BorderPrecedence::Cell,
            order: SourceOrder(2, row.order.1, row.order.2, index + 1),
        }
    }

    /// Column and column-group candidates for the inline edge of a cell
    /// touching absolute column `col`. `toward` is the edge of the column
    /// element that faces the cell.
    fn inline_column_candidates(
        &self,
        col: usize,
        toward: BorderEdge,
        out: &mut Vec<BorderCandidate>,
    ) {
        let Some(hit) = self.col_element(col) else {
            return;
        };
        let at_edge = match toward {
            BorderEdge::Start => hit.start_edge,
            _ => hit.end_edge,
        };
        match self.column_elements[hit.element.0].kind {
            ColumnKind::Group => {
                if at_edge {
                    out.push(self.column_candidate(hit.element, toward));
                }
            }
            ColumnKind::Column => {
                out.push(self.column_candidate(hit.element, toward));
                let group = match toward {
                    BorderEdge::Start => self.enclosing_column_group_if_adjacent_before(hit.element),
                    _ => self.enclosing_column_group_if_adjacent_after(hit.element),
                };
                if let Some(group) = group {
                    out.push(self.column_candidate(group, toward));
                }
            }
        }
    }

    fn block_column_candidates(&self, col: usize, edge: BorderEdge, out: &mut Vec<BorderCandidate>) {
        if let Some(hit) = self.col_element(col) {
            out.push(self.column_candidate(hit.element, edge));
            if let Some(group) = self.enclosing_column_group(hit.element) {
                out.push(self.column_candidate(group, edge));
            }
        }
    }

    fn row_at(&self, section: SectionId, grid_row: usize) -> Option<RowId> {
        self.sections[section.0].grid.get(grid_row)?.row
    }

    /// Every border that competes for `edge` of `cell`.
    ///
    /// The grid must be current.
    #[must_use]
    pub fn border_candidates(&self, cell: CellId, edge: BorderEdge) -> Vec<BorderCandidate> {
        let c = &self.cells[cell.0];
        let section = self.rows[c.row.0].section;
        let mut out = vec![self.cell_candidate(cell, edge)];

        match edge {
            BorderEdge::Start => {
                if let Some(before) = self.cell_before(cell) {
                    out.push(self.cell_candidate(before, BorderEdge::End));
                } else {
                    out.push(self.row_candidate(c.row, BorderEdge::Start));
                    out.push(self.section_candidate(section, BorderEdge::Start));
                }
                self.inline_column_candidates(c.col, BorderEdge::Start, &mut out);
                if c.col > 0 {
                    self.inline_column_candidates(c.col - 1, BorderEdge::End, &mut out);
                } else {
                    out.push(self.table_candidate(BorderEdge::Start));
                }
            }
            BorderEdge::End => {
                if let Some(after) = self.cell_after(cell) {
                    out.push(self.cell_candidate(after, BorderEdge::Start));
                } else {
                    out.push(self.row_candidate(c.row, BorderEdge::End));
                    out.push(self.section_candidate(section, BorderEdge::End));
                }
                let last_col = c.col + c.colspan() - 1;
                self.inline_column_candidates(last_col, BorderEdge::End, &mut out);
                let is_end_column =
                    self.col_to_eff_col(last_col) + 1 >= self.num_eff_cols();
                if is_end_column {
                    out.push(self.table_candidate(BorderEdge::End));
                } else {
                    self.inline_column_candidates(last_col + 1, BorderEdge::Start, &mut out);
                }
            }
            BorderEdge::Before => {
                let above = self.cell_above(cell);
                if let Some(above) = above {
                    out.push(self.cell_candidate(above, BorderEdge::After));
                }
                out.push(self.row_candidate(c.row, BorderEdge::Before));
                if let Some(above) = above {
                    let above_section = self.rows[self.cells[above.0].row.0].section;
                    let previous_row = if above_section == section {
                        c.grid_row.checked_sub(1).and_then(|r| self.row_at(section, r))
                    } else {
                        self.sections[above_section.0]
                            .num_rows()
                            .checked_sub(1)
                            .and_then(|r| self.row_at(above_section, r))
                    };
                    if let Some(previous_row) = previous_row {
                        out.push(self.row_candidate(previous_row, BorderEdge::After));
                    }
                }
                let mut neighbour = Some(section);
                if c.grid_row == 0 {
                    out.push(self.section_candidate(section, BorderEdge::Before));
                    neighbour = self.section_above(section, SkipEmptySections::Skip);
                    if let Some(previous) = neighbour {
                        out.push(self.section_candidate(previous, BorderEdge::After));
                    }
                }
                if neighbour.is_none() {
                    self.block_column_candidates(c.col, BorderEdge::Before, &mut out);
                    out.push(self.table_candidate(BorderEdge::Before));
                }
            }
            BorderEdge::After => {
                let below = self.cell_below(cell);
                if let Some(below) = below {
                    out.push(self.cell_candidate(below, BorderEdge::Before));
                }
                out.push(self.row_candidate(c.row, BorderEdge::After));
                if let Some(below) = below {
                    out.push(self.row_candidate(self.cells[below.0].row, BorderEdge::Before));
                }
                let mut neighbour = Some(section);
                if c.grid_row + c.rowspan() >= self.sections[section.0].num_rows() {
                    out.push(self.section_candidate(section, BorderEdge::After));
                    neighbour = self.section_below(section, SkipEmptySections::Skip);
                    if let Some(next) = neighbour {
                        out.push(self.section_candidate(next, BorderEdge::Before));
                    }
                }
                if neighbour.is_none() {
                    self.block_column_candidates(c.col, BorderEdge::After, &mut out);
                    out.push(self.table_candidate(BorderEdge::After));
                }
            }
        }
        out
    }

    /// Resolve `edge` of `cell` without touching the cache.
    #[must_use]
    pub fn resolve_collapsed_border(&self, cell: CellId, edge: BorderEdge) -> ResolvedBorder {
        resolve_candidates(self.border_candidates(cell, edge))
    }

    /// The winning border on `edge` of `cell`, cached per section until the
    /// next border-affecting change.
    ///
    /// Returns the default (no border) for a detached or unknown cell.
    pub fn collapsed_border(&mut self, cell: CellId, edge: BorderEdge) -> ResolvedBorder {
        self.build_grid();
        let Some(c) = self.cells.get(cell.0) else {
            return ResolvedBorder::default();
        };
        if !c.attached {
            return ResolvedBorder::default();
        }
        let section = self.rows[c.row.0].section;
        let generation = self.border_generation;
        if let Some(hit) = self.sections[section.0].border_cache.get(cell, edge, generation) {
            return hit;
        }
        let resolved = self.resolve_collapsed_border(cell, edge);
        self.sections[section.0]
            .border_cache
            .insert(cell, edge, generation, resolved);
        resolved
    }

    /// Cached entries held for `section`, stale ones included.
    #[must_use]
    pub fn border_cache_len(&self, section: SectionId) -> usize {
        self.sections.get(section.0).map_or(0, |s| s.border_cache.len())
    }

    /// The cell's own share of its collapsed borders: start and before get
    /// the larger half of an odd width, end and after the smaller one.
    pub(crate) fn collapsed_half_borders(&mut self, cell: CellId) -> TableBorderWidths {
        let width = |table: &mut Self, edge| table.collapsed_border(cell, edge).width;
        TableBorderWidths {
            start: (width(self, BorderEdge::Start) + 1) / 2,
            end: width(self, BorderEdge::End) / 2,
            before: (width(self, BorderEdge::Before) + 1) / 2,
            after: width(self, BorderEdge::After) / 2,
        }
    }

    /// Recompute the table's own used border widths.
    ///
    /// When borders collapse the table has no borders of its own; it gets
    /// the outer halves of the widest collapsed borders along each side.
    pub(crate) fn update_outer_borders(&mut self) {
        if !self.style.collapses_borders() {
            let b = &self.style.borders;
            self.outer_borders = TableBorderWidths {
                start: b.start.used_width(),
                end: b.end.used_width(),
                before: b.before.used_width(),
                after: b.after.used_width(),
            };
            return;
        }

        let mut start = 0;
        let mut end = 0;
        let last_col = self.num_eff_cols().checked_sub(1);
        for section in self.display_sections() {
            for r in 0..self.sections[section.0].num_rows() {
                if let Some(cell) = self.primary_cell_at(section, r, 0) {
                    start = start.max(self.collapsed_border(cell, BorderEdge::Start).width);
                }
                if let Some(cell) = last_col.and_then(|c| self.primary_cell_at(section, r, c)) {
                    end = end.max(self.collapsed_border(cell, BorderEdge::End).width);
                }
            }
        }

        let mut before = 0;
        if let Some(top) = self.top_non_empty_section() {
            for c in 0..self.num_eff_cols() {
                if let Some(cell) = self.primary_cell_at(top, 0, c) {
                    before = before.max(self.collapsed_border(cell, BorderEdge::Before).width);
                }
            }
        }
        let mut after = 0;
        if let Some(bottom) = self.bottom_non_empty_section() {
            let last_row = self.sections[bottom.0].num_rows() - 1;
            for c in 0..self.num_eff_cols() {
                if let Some(cell) = self.primary_cell_at(bottom, last_row, c) {
                    after = after.max(self.collapsed_border(cell, BorderEdge::After).width);
                }
            }
        }

        self.outer_borders = TableBorderWidths {
            start: start / 2,
            end: (end + 1) / 2,
            before: before / 2,
            after: (after + 1) / 2,
        };
    }

    /// Every distinct visible collapsed border, weakest first.
    ///
    /// Painting in this order leaves the stronger border on top where two
    /// meet at a corner.
    pub fn paint_order(&mut self) -> Vec<ResolvedBorder> {
        self.build_grid();
        let mut borders = Vec::new();
        for cell in self.attached_cells() {
            for edge in [
                BorderEdge::Start,
                BorderEdge::End,
                BorderEdge::Before,
                BorderEdge::After,
            ] {
                let border = self.collapsed_border(cell, edge);
                if border.is_visible() {
                    borders.push(border);
                }
            }
        }
        borders.sort_by(|a, b| {
            a.width
                .cmp(&b.width)
                .then_with(|| a.style.cmp(&b.style))
                .then_with(|| a.precedence.cmp(&b.precedence))
        });
        let mut seen = HashSet::new();
        borders.retain(|b| seen.insert((b.style, b.width, b.color)));
        borders
    }
}
