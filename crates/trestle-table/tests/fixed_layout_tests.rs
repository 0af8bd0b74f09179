//! Integration tests for the fixed table layout algorithm.
//!
//! [§ 17.5.2.1 Fixed table layout](https://www.w3.org/TR/CSS2/tables.html#fixed-table-layout)

mod common;

use common::{RandomTable, content_width};
use quickcheck_macros::quickcheck;
use trestle_table::{
    BorderSpacing, CellContent, CellStyle, ColumnStyle, DeclaredContent, LayoutInput, RowStyle,
    SectionKind, SectionStyle, Table, TableLayoutMode, TableLength, TableStyle,
};

fn fixed_table(width: TableLength) -> Table {
    Table::new(TableStyle {
        width,
        layout: TableLayoutMode::Fixed,
        ..TableStyle::default()
    })
}

fn add_columns(table: &mut Table, widths: &[TableLength]) {
    for &width in widths {
        let _ = table.add_column(ColumnStyle {
            width,
            ..ColumnStyle::default()
        });
    }
}

fn add_row(table: &mut Table, cells: &[CellStyle]) {
    let body = match table.sections_in_source_order().first() {
        Some(&body) => body,
        None => table.add_section(SectionKind::Body, SectionStyle::default()),
    };
    let row = table.add_row(body, RowStyle::default());
    for style in cells {
        let _ = table.add_cell(row, style.clone(), CellContent::new(5, 400, 10));
    }
}

fn widths_after_layout(table: &mut Table, available_width: i32) -> Vec<i32> {
    let geometry = table.layout(&LayoutInput::new(available_width), &DeclaredContent);
    geometry.column_widths(table.h_spacing())
}

#[test]
fn test_auto_column_takes_what_fixed_columns_leave() {
    let mut table = fixed_table(TableLength::Fixed(300));
    add_columns(
        &mut table,
        &[TableLength::Fixed(100), TableLength::Auto, TableLength::Fixed(50)],
    );
    add_row(&mut table, &[CellStyle::default(), CellStyle::default(), CellStyle::default()]);
    assert_eq!(widths_after_layout(&mut table, 800), vec![100, 150, 50]);
}

#[test]
fn test_content_does_not_affect_widths() {
    let mut table = fixed_table(TableLength::Fixed(200));
    add_row(&mut table, &[CellStyle::default(), CellStyle::default()]);
    // Each cell's content would like 400px.
    assert_eq!(widths_after_layout(&mut table, 800), vec![100, 100]);
    assert_eq!(table.logical_width(), 200);
}

#[test]
fn test_first_row_sets_widths_later_rows_do_not() {
    let mut table = fixed_table(TableLength::Fixed(300));
    add_row(
        &mut table,
        &[
            CellStyle {
                width: TableLength::Fixed(60),
                ..CellStyle::default()
            },
            CellStyle::default(),
        ],
    );
    add_row(
        &mut table,
        &[
            CellStyle::default(),
            CellStyle {
                width: TableLength::Fixed(250),
                ..CellStyle::default()
            },
        ],
    );
    assert_eq!(widths_after_layout(&mut table, 800), vec![60, 240]);
}

#[test]
fn test_fixed_columns_scale_up_to_the_table() {
    let mut table = fixed_table(TableLength::Fixed(400));
    add_columns(&mut table, &[TableLength::Fixed(100), TableLength::Fixed(100)]);
    add_row(&mut table, &[CellStyle::default(), CellStyle::default()]);
    assert_eq!(widths_after_layout(&mut table, 800), vec![200, 200]);
}

#[test]
fn test_columns_wider_than_the_table_widen_it() {
    let mut table = fixed_table(TableLength::Fixed(100));
    add_columns(&mut table, &[TableLength::Fixed(120), TableLength::Fixed(80)]);
    add_row(&mut table, &[CellStyle::default(), CellStyle::default()]);
    assert_eq!(widths_after_layout(&mut table, 800), vec![120, 80]);
    assert_eq!(table.logical_width(), 200);
}

#[test]
fn test_percent_columns_rescale_when_over_allocated() {
    let mut table = fixed_table(TableLength::Fixed(100));
    add_columns(
        &mut table,
        &[
            TableLength::Percent(50.0),
            TableLength::Percent(40.0),
            TableLength::Percent(30.0),
        ],
    );
    add_row(&mut table, &[CellStyle::default(), CellStyle::default(), CellStyle::default()]);
    let widths = widths_after_layout(&mut table, 800);
    assert_eq!(widths, vec![42, 33, 25]);
}

#[test]
fn test_percent_table_width_resolves_against_container() {
    let mut table = fixed_table(TableLength::Percent(50.0));
    add_row(&mut table, &[CellStyle::default(), CellStyle::default()]);
    assert_eq!(widths_after_layout(&mut table, 600), vec![150, 150]);
}

#[test]
fn test_spacing_is_kept_between_columns() {
    let mut table = Table::new(TableStyle {
        width: TableLength::Fixed(310),
        layout: TableLayoutMode::Fixed,
        border_spacing: BorderSpacing::uniform(10),
        ..TableStyle::default()
    });
    add_columns(&mut table, &[TableLength::Fixed(80)]);
    add_row(&mut table, &[CellStyle::default(), CellStyle::default()]);
    let geometry = table.layout(&LayoutInput::new(800), &DeclaredContent);
    // 310 less three gaps leaves 280: 80 fixed and 200 auto.
    assert_eq!(geometry.column_widths(10), vec![80, 200]);
    assert_eq!(geometry.column_positions, vec![0, 90, 300]);
    assert_eq!(geometry.cells[1].x, 100);
}

#[test]
fn test_fixed_layout_needs_a_declared_width() {
    let mut table = fixed_table(TableLength::Auto);
    add_row(&mut table, &[CellStyle::default(), CellStyle::default()]);
    // Falls back to the automatic algorithm, which reads the content.
    assert_eq!(widths_after_layout(&mut table, 2000), vec![400, 400]);
}

#[test]
fn test_huge_column_span_is_clamped() {
    let mut table = fixed_table(TableLength::Fixed(300));
    let _ = table.add_column(ColumnStyle {
        span: 30_000_000,
        width: TableLength::Fixed(100),
        ..ColumnStyle::default()
    });
    add_row(&mut table, &[CellStyle::default()]);
    let geometry = table.layout(&LayoutInput::new(800), &DeclaredContent);

    // A thousand 100px columns: the first holds the cell, the rest are one
    // effective column.
    assert_eq!(geometry.column_widths(0), vec![100, 99_900]);
    assert_eq!(geometry.width, 100_000);
}

#[test]
fn test_huge_cell_spans_are_clamped() {
    let mut table = fixed_table(TableLength::Fixed(300));
    add_row(
        &mut table,
        &[CellStyle {
            colspan: u32::MAX,
            rowspan: u32::MAX,
            width: TableLength::Fixed(200),
            ..CellStyle::default()
        }],
    );
    let geometry = table.layout(&LayoutInput::new(800), &DeclaredContent);
    // One effective column covering all thousand, and grid rows up to the
    // rowspan limit.
    assert_eq!(geometry.cells[0].colspan, 1);
    assert_eq!(geometry.cells[0].rowspan, 65_534);
    assert_eq!(geometry.width, 300);
}

#[quickcheck]
fn prop_fixed_columns_fill_the_table(random: RandomTable) -> bool {
    let mut table = random.build();
    let mut style = random.style.clone();
    style.layout = TableLayoutMode::Fixed;
    if style.width.is_auto() {
        style.width = TableLength::Fixed(300);
    }
    table.set_style(style);
    let _ = table.layout(&random.input(), &DeclaredContent);
    let positions = table.column_positions();
    positions.last().map_or(true, |&end| end + table.h_spacing() == content_width(&table))
}

#[quickcheck]
fn prop_fixed_intrinsic_widths_agree(random: RandomTable) -> bool {
    let mut table = random.build();
    let mut style = random.style.clone();
    style.layout = TableLayoutMode::Fixed;
    style.width = TableLength::Fixed(250);
    table.set_style(style);
    let (min, max) = table.compute_preferred_widths(false);
    min == max && min >= 250
}
