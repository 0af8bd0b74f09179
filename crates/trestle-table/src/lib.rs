//! CSS 2.1 table layout for the Trestle engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Table model** ([§ 17.2 The CSS table model](https://www.w3.org/TR/CSS2/tables.html#table-display))
//!   - Column elements, row groups, rows and cells in flat arenas
//!   - Header and footer group display order
//!
//! - **Grid** ([§ 17.5 Visual layout of table contents](https://www.w3.org/TR/CSS2/tables.html#table-layout))
//!   - Cell placement around row-spanning cells
//!   - Effective columns, split and appended as spans require
//!   - Neighbour lookups across rows, columns and sections
//!
//! - **Column widths** ([§ 17.5.2 Table width algorithms](https://www.w3.org/TR/CSS2/tables.html#width-layout))
//!   - Automatic layout from cell content, with spanning cells
//!   - Fixed layout from column elements and the first row
//!   - Percentage, fixed, relative and auto column distribution
//!
//! - **Row heights** ([§ 17.5.3 Table height algorithms](https://www.w3.org/TR/CSS2/tables.html#height-layout))
//!   - Row-spanning cells and baseline alignment
//!   - Extra table height given to percentage, auto, then all rows
//!
//! - **Collapsed borders** ([§ 17.6.2 The collapsing border model](https://www.w3.org/TR/CSS2/tables.html#collapsing-borders))
//!   - Conflict resolution across cells, rows, groups, columns and the table
//!   - Per-section caching
//!
//! - **Table descriptions**: JSON files describing a table to lay out
//!
//! # Not Implemented
//!
//! - Text layout: cell content arrives pre-measured
//! - Vertical writing modes; right-to-left is a mirror applied after layout
//! - Painting

/// Loading tables from JSON.
pub mod description;
/// Errors for parsing and loading.
pub mod error;
/// The cell grid and column bookkeeping.
pub mod grid;
/// Width, height and border algorithms.
pub mod layout;
/// Computed style values.
pub mod style;
/// The table box and its builder.
pub mod table;
/// Box tree parts and their ids.
pub mod tree;

pub use description::TableDescription;
pub use error::{BorderParseError, ColorParseError, DescriptionError, LengthParseError};
pub use grid::{ColumnStruct, GridRow, GridSlot, SkipEmptySections};
pub use layout::borders::{
    BorderCandidate, BorderPrecedence, ResolvedBorder, SourceOrder, choose_border, resolve_candidates,
};
pub use layout::{
    AutoTableLayout, CellGeometry, CellMeasurer, ColumnLayout, DeclaredContent, FixedTableLayout,
    LayoutInput, SectionGeometry, TableGeometry, TableLayoutStrategy,
};
pub use style::{
    BorderCollapse, BorderEdge, BorderEdges, BorderSpacing, BorderSpec, BorderStyle, CellStyle,
    Color, ColumnStyle, Direction, EnclosingCell, LayoutUnit, Padding, RowStyle, SectionStyle,
    TableLayoutMode, TableLength, TableStyle, VerticalAlign,
};
pub use table::{TABLE_MAX_WIDTH, Table, TableBorderWidths};
pub use tree::{CellContent, CellId, ColumnElementId, ColumnKind, RowId, SectionId, SectionKind};
