//! Random tables for property tests.

#![allow(dead_code)]

use quickcheck::{Arbitrary, Gen};
use trestle_table::{
    BorderCollapse, BorderEdges, BorderSpacing, BorderSpec, CellContent, CellStyle, Color,
    ColumnStyle, LayoutInput, Padding, RowStyle, SectionKind, SectionStyle, Table,
    TableLayoutMode, TableLength, TableStyle,
};

fn small(g: &mut Gen, below: u8) -> i32 {
    i32::from(u8::arbitrary(g) % below)
}

fn column_length(g: &mut Gen) -> TableLength {
    match u8::arbitrary(g) % 6 {
        0 => TableLength::Fixed(small(g, 200)),
        1 => TableLength::Percent(f32::from(u8::arbitrary(g) % 60)),
        2 => TableLength::Relative(small(g, 3) + 1),
        _ => TableLength::Auto,
    }
}

fn row_height(g: &mut Gen) -> TableLength {
    match u8::arbitrary(g) % 4 {
        0 => TableLength::Fixed(small(g, 50)),
        1 => TableLength::Percent(f32::from(u8::arbitrary(g) % 80)),
        _ => TableLength::Auto,
    }
}

/// A body of up to four rows with random spans, widths and content.
#[derive(Debug, Clone)]
pub struct RandomTable {
    pub style: TableStyle,
    pub columns: Vec<ColumnStyle>,
    pub rows: Vec<(RowStyle, Vec<(CellStyle, CellContent)>)>,
    pub available_width: i32,
}

impl Arbitrary for RandomTable {
    fn arbitrary(g: &mut Gen) -> Self {
        let collapse = bool::arbitrary(g);
        let width = match u8::arbitrary(g) % 3 {
            0 => TableLength::Fixed(small(g, 200) * 3 + 20),
            1 => TableLength::Percent(f32::from(u8::arbitrary(g) % 100) + 1.0),
            _ => TableLength::Auto,
        };
        let style = TableStyle {
            width,
            layout: if bool::arbitrary(g) {
                TableLayoutMode::Fixed
            } else {
                TableLayoutMode::Auto
            },
            border_collapse: if collapse {
                BorderCollapse::Collapse
            } else {
                BorderCollapse::Separate
            },
            border_spacing: BorderSpacing::uniform(small(g, 5)),
            borders: BorderEdges::all(BorderSpec::solid(small(g, 4), Color::BLACK)),
            padding: Padding::all(small(g, 4)),
            ..TableStyle::default()
        };

        let columns = (0..u8::arbitrary(g) % 3)
            .map(|_| ColumnStyle {
                span: u32::from(u8::arbitrary(g) % 2) + 1,
                width: column_length(g),
                ..ColumnStyle::default()
            })
            .collect();

        let rows = (0..u8::arbitrary(g) % 4 + 1)
            .map(|_| {
                let row = RowStyle {
                    height: row_height(g),
                    ..RowStyle::default()
                };
                let cells = (0..u8::arbitrary(g) % 4 + 1)
                    .map(|_| {
                        let min = small(g, 60);
                        let style = CellStyle {
                            colspan: u32::from(u8::arbitrary(g) % 3) + 1,
                            rowspan: u32::from(u8::arbitrary(g) % 2) + 1,
                            width: column_length(g),
                            padding: Padding::all(small(g, 3)),
                            borders: BorderEdges::all(BorderSpec::solid(small(g, 3), Color::BLACK)),
                            nowrap: u8::arbitrary(g) % 5 == 0,
                            ..CellStyle::default()
                        };
                        let content = CellContent::new(min, min + small(g, 100), small(g, 40));
                        (style, content)
                    })
                    .collect();
                (row, cells)
            })
            .collect();

        Self {
            style,
            columns,
            rows,
            available_width: small(g, 250) * 4,
        }
    }
}

impl RandomTable {
    /// Assemble the table.
    pub fn build(&self) -> Table {
        let mut table = Table::new(self.style.clone());
        for column in &self.columns {
            let _ = table.add_column(column.clone());
        }
        let body = table.add_section(SectionKind::Body, SectionStyle::default());
        for (row_style, cells) in &self.rows {
            let row = table.add_row(body, row_style.clone());
            for (style, content) in cells {
                let _ = table.add_cell(row, style.clone(), *content);
            }
        }
        table
    }

    pub fn input(&self) -> LayoutInput {
        LayoutInput::new(self.available_width)
    }
}

/// Width between the table's borders and padding, after layout.
pub fn content_width(table: &Table) -> i32 {
    let borders = table.border_widths();
    table.logical_width() - borders.start - borders.end - table.padding_inline_sum()
}
