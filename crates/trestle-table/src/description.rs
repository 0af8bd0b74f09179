//! JSON table descriptions.
//!
//! A description is a table written down as data: the table's style, its
//! column elements, and its sections, rows and cells in source order. Style
//! values use CSS syntax:
//!
//! ```json
//! {
//!   "width": "400px",
//!   "border_collapse": "collapse",
//!   "columns": [{ "width": "100px" }, { "span": 2 }],
//!   "rows": [
//!     { "cells": [
//!       { "colspan": 2, "content": { "min_width": 40, "max_width": 180, "height": 18 } },
//!       { "borders": "2px solid red", "content": { "min_width": 10, "max_width": 10 } }
//!     ] }
//!   ]
//! }
//! ```
//!
//! A top-level `rows` list is a single body section. Use `sections` for
//! header and footer groups.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use trestle_common::warning::warn_once;

use crate::error::DescriptionError;
use crate::style::{CellStyle, ColumnStyle, RowStyle, SectionStyle, TableStyle};
use crate::table::Table;
use crate::tree::{CellContent, ColumnElementId, SectionKind};

/// A whole table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableDescription {
    /// The table box's style.
    #[serde(flatten)]
    pub style: TableStyle,
    /// `col` and `colgroup` elements.
    pub columns: Vec<ColumnDescription>,
    /// Row groups.
    pub sections: Vec<SectionDescription>,
    /// Rows of an implicit body, when there are no explicit sections.
    pub rows: Vec<RowDescription>,
}

/// A `col`, or a `colgroup` when it lists `columns`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnDescription {
    /// Span, width and borders.
    #[serde(flatten)]
    pub style: ColumnStyle,
    /// Child `col` elements of a column group.
    pub columns: Vec<ColumnDescription>,
}

/// A row group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionDescription {
    /// `head`, `body` or `foot`.
    pub kind: SectionKind,
    /// Borders.
    #[serde(flatten)]
    pub style: SectionStyle,
    /// Rows in source order.
    pub rows: Vec<RowDescription>,
}

/// A row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowDescription {
    /// Height and borders.
    #[serde(flatten)]
    pub style: RowStyle,
    /// Cells in source order.
    pub cells: Vec<CellDescription>,
}

/// A cell and what it contains.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellDescription {
    /// Spans, sizes, padding, borders and alignment.
    #[serde(flatten)]
    pub style: CellStyle,
    /// Measured content.
    pub content: CellContent,
}

impl TableDescription {
    /// Parse a description from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptionError::Json`] when the text is not a valid
    /// description, including when a length, color or border fails to parse.
    pub fn from_json_str(json: &str) -> Result<Self, DescriptionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a description file.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptionError::Io`] when the file cannot be read, and
    /// the errors of [`TableDescription::from_json_str`].
    pub fn from_path(path: &Path) -> Result<Self, DescriptionError> {
        let json = fs::read_to_string(path).map_err(|source| DescriptionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Build the table.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptionError::RowsAndSections`] when both `rows` and
    /// `sections` are given.
    pub fn into_table(self) -> Result<Table, DescriptionError> {
        if !self.rows.is_empty() && !self.sections.is_empty() {
            return Err(DescriptionError::RowsAndSections);
        }

        let mut table = Table::new(self.style);
        for column in self.columns {
            add_column(&mut table, column);
        }

        let sections = if self.rows.is_empty() {
            self.sections
        } else {
            vec![SectionDescription {
                kind: SectionKind::Body,
                style: SectionStyle::default(),
                rows: self.rows,
            }]
        };
        for section in sections {
            let id = table.add_section(section.kind, section.style);
            for row in section.rows {
                let row_id = table.add_row(id, row.style);
                for cell in row.cells {
                    let _ = table.add_cell(row_id, cell.style, cell.content);
                }
            }
        }
        Ok(table)
    }
}

fn add_column(table: &mut Table, column: ColumnDescription) {
    if column.columns.is_empty() {
        let _ = table.add_column(column.style);
        return;
    }
    let group = table.add_column_group(column.style);
    for child in column.columns {
        add_group_child(table, group, child);
    }
}

fn add_group_child(table: &mut Table, group: ColumnElementId, child: ColumnDescription) {
    if !child.columns.is_empty() {
        let _ = warn_once("description", "column groups cannot nest; inner columns ignored");
    }
    let _ = table.add_column_to_group(group, child.style);
}
