//! Integration tests for the automatic table layout algorithm.
//!
//! [§ 17.5.2.2 Automatic table layout](https://www.w3.org/TR/CSS2/tables.html#auto-table-layout)

mod common;

use common::{RandomTable, content_width};
use quickcheck_macros::quickcheck;
use trestle_table::{
    AutoTableLayout, CellContent, CellId, CellStyle, DeclaredContent, EnclosingCell, LayoutInput,
    RowStyle, SectionKind, SectionStyle, TABLE_MAX_WIDTH, Table, TableLayoutMode, TableLength,
    TableStyle,
};

fn sized(width: TableLength) -> CellStyle {
    CellStyle {
        width,
        ..CellStyle::default()
    }
}

fn with_rows(style: TableStyle, rows: &[&[(CellStyle, CellContent)]]) -> (Table, Vec<Vec<CellId>>) {
    let mut table = Table::new(style);
    let body = table.add_section(SectionKind::Body, SectionStyle::default());
    let mut ids = Vec::new();
    for cells in rows {
        let row = table.add_row(body, RowStyle::default());
        ids.push(
            cells
                .iter()
                .map(|(style, content)| table.add_cell(row, style.clone(), *content))
                .collect(),
        );
    }
    (table, ids)
}

fn column_widths(table: &Table) -> Vec<i32> {
    table
        .column_positions()
        .windows(2)
        .map(|w| w[1] - w[0] - table.h_spacing())
        .collect()
}

fn lay_out(table: &mut Table, available_width: i32) -> Vec<i32> {
    let _ = table.layout(&LayoutInput::new(available_width), &DeclaredContent);
    column_widths(table)
}

#[test]
fn test_columns_get_their_maximum_when_it_fits() {
    let (mut table, _) = with_rows(
        TableStyle::default(),
        &[&[
            (CellStyle::default(), CellContent::new(10, 100, 10)),
            (CellStyle::default(), CellContent::new(10, 300, 10)),
        ]],
    );
    assert_eq!(lay_out(&mut table, 800), vec![100, 300]);
    assert_eq!(table.logical_width(), 400);
    assert_eq!(table.column_positions(), &[0, 100, 400]);
}

#[test]
fn test_narrow_container_splits_by_maximum() {
    let (mut table, _) = with_rows(
        TableStyle::default(),
        &[&[
            (CellStyle::default(), CellContent::new(10, 100, 10)),
            (CellStyle::default(), CellContent::new(10, 300, 10)),
        ]],
    );
    assert_eq!(lay_out(&mut table, 200), vec![50, 150]);
}

#[test]
fn test_table_never_narrower_than_its_minimum() {
    let (mut table, _) = with_rows(
        TableStyle::default(),
        &[&[
            (CellStyle::default(), CellContent::new(60, 100, 10)),
            (CellStyle::default(), CellContent::new(40, 300, 10)),
        ]],
    );
    assert_eq!(lay_out(&mut table, 50), vec![60, 40]);
    assert_eq!(table.logical_width(), 100);
}

#[test]
fn test_fixed_column_then_auto_takes_the_rest() {
    let style = TableStyle {
        width: TableLength::Fixed(500),
        ..TableStyle::default()
    };
    let (mut table, _) = with_rows(
        style,
        &[&[
            (sized(TableLength::Fixed(100)), CellContent::new(10, 20, 10)),
            (CellStyle::default(), CellContent::new(10, 50, 10)),
        ]],
    );
    assert_eq!(lay_out(&mut table, 800), vec![100, 400]);
}

#[test]
fn test_percentages_over_100_are_trimmed_from_the_last_column() {
    let style = TableStyle {
        width: TableLength::Fixed(100),
        ..TableStyle::default()
    };
    let (mut table, _) = with_rows(
        style,
        &[&[
            (sized(TableLength::Percent(50.0)), CellContent::default()),
            (sized(TableLength::Percent(40.0)), CellContent::default()),
            (sized(TableLength::Percent(30.0)), CellContent::default()),
        ]],
    );
    assert_eq!(lay_out(&mut table, 800), vec![50, 40, 10]);
}

#[test]
fn test_relative_columns_share_by_weight() {
    let style = TableStyle {
        width: TableLength::Fixed(300),
        ..TableStyle::default()
    };
    let (mut table, _) = with_rows(
        style,
        &[&[
            (sized(TableLength::Relative(1)), CellContent::new(10, 10, 10)),
            (sized(TableLength::Relative(2)), CellContent::new(10, 10, 10)),
        ]],
    );
    assert_eq!(lay_out(&mut table, 800), vec![100, 200]);
}

#[test]
fn test_spanning_fixed_cell_spreads_its_maximum() {
    let (mut table, _) = with_rows(
        TableStyle::default(),
        &[&[(
            CellStyle {
                colspan: 2,
                width: TableLength::Fixed(200),
                ..CellStyle::default()
            },
            CellContent::new(10, 20, 10),
        )]],
    );
    let mut layout = AutoTableLayout::new();
    layout.compute_intrinsic_widths(&mut table);
    let total: i32 = layout.columns().iter().map(|c| c.effective_max_width).sum();
    assert_eq!(layout.columns().len(), 1);
    assert_eq!(total, 200);
    assert_eq!(table.preferred_widths().1, 200);
}

#[test]
fn test_spanning_cell_over_two_columns_splits_evenly() {
    let (mut table, ids) = with_rows(
        TableStyle::default(),
        &[
            &[(
                CellStyle {
                    colspan: 2,
                    width: TableLength::Fixed(200),
                    ..CellStyle::default()
                },
                CellContent::new(10, 20, 10),
            )],
            &[
                (CellStyle::default(), CellContent::default()),
                (CellStyle::default(), CellContent::default()),
            ],
        ],
    );
    let mut layout = AutoTableLayout::new();
    layout.compute_intrinsic_widths(&mut table);
    assert_eq!(layout.span_cells(), &[ids[0][0]]);
    let maxima: Vec<i32> = layout.columns().iter().map(|c| c.effective_max_width).collect();
    assert_eq!(maxima, vec![100, 100]);
}

#[test]
fn test_row_spanning_cell_is_listed_once() {
    let (mut table, ids) = with_rows(
        TableStyle::default(),
        &[
            &[
                (
                    CellStyle {
                        colspan: 2,
                        rowspan: 2,
                        ..CellStyle::default()
                    },
                    CellContent::new(10, 80, 10),
                ),
                (CellStyle::default(), CellContent::new(10, 20, 10)),
            ],
            &[(CellStyle::default(), CellContent::new(10, 20, 10))],
            &[
                (CellStyle::default(), CellContent::new(10, 20, 10)),
                (CellStyle::default(), CellContent::new(10, 20, 10)),
            ],
        ],
    );
    let mut layout = AutoTableLayout::new();
    layout.compute_intrinsic_widths(&mut table);
    assert_eq!(layout.span_cells(), &[ids[0][0]]);
    let maxima: Vec<i32> = layout.columns().iter().map(|c| c.effective_max_width).collect();
    assert_eq!(maxima, vec![40, 40, 20]);
}

fn nav_ie_table() -> Table {
    with_rows(
        TableStyle::default(),
        &[
            &[
                (sized(TableLength::Fixed(50)), CellContent::new(10, 20, 10)),
                (CellStyle::default(), CellContent::new(10, 100, 10)),
            ],
            &[(CellStyle::default(), CellContent::new(10, 200, 10))],
        ],
    )
    .0
}

#[test]
fn test_narrow_fixed_column_reverts_to_auto_in_quirks_mode() {
    let mut table = nav_ie_table();
    let mut layout = AutoTableLayout::new();
    layout.compute_intrinsic_widths(&mut table);
    layout.apply_quirks(&mut table, true);
    assert_eq!(layout.columns()[0].logical_width, TableLength::Auto);

    let mut table = nav_ie_table();
    let mut layout = AutoTableLayout::new();
    layout.compute_intrinsic_widths(&mut table);
    layout.apply_quirks(&mut table, false);
    assert_eq!(layout.columns()[0].logical_width, TableLength::Fixed(50));
}

#[test]
fn test_quirks_mode_changes_the_distribution() {
    let mut table = nav_ie_table();
    assert_eq!(lay_out(&mut table, 200), vec![50, 150]);

    let mut table = nav_ie_table();
    let _ = table.layout(&LayoutInput::new(200).with_quirks(true), &DeclaredContent);
    assert_eq!(column_widths(&table), vec![133, 67]);
}

#[test]
fn test_percent_column_scales_the_maximum() {
    let cells = [(sized(TableLength::Percent(50.0)), CellContent::new(20, 100, 10))];
    let (mut table, _) = with_rows(TableStyle::default(), &[&cells]);
    assert_eq!(table.compute_preferred_widths(false), (20, 200));

    // Inside a spanning auto cell the table does not try to grow.
    let style = TableStyle {
        enclosing_cell: Some(EnclosingCell {
            width: TableLength::Auto,
            colspan: 2,
            table_width: TableLength::Fixed(600),
            outer: None,
        }),
        ..TableStyle::default()
    };
    let (mut table, _) = with_rows(style, &[&cells]);
    assert_eq!(table.compute_preferred_widths(false), (20, 100));
}

#[test]
fn test_full_percentage_with_auto_column_is_unbounded() {
    let (mut table, _) = with_rows(
        TableStyle::default(),
        &[&[
            (sized(TableLength::Percent(100.0)), CellContent::new(10, 50, 10)),
            (CellStyle::default(), CellContent::new(10, 80, 10)),
        ]],
    );
    assert_eq!(table.compute_preferred_widths(false).1, TABLE_MAX_WIDTH);
}

#[test]
fn test_empty_columns_still_fill_the_table() {
    let style = TableStyle {
        width: TableLength::Fixed(90),
        ..TableStyle::default()
    };
    let (mut table, _) = with_rows(
        style,
        &[&[
            (CellStyle::default(), CellContent::default()),
            (CellStyle::default(), CellContent::default()),
            (CellStyle::default(), CellContent::default()),
        ]],
    );
    let widths = lay_out(&mut table, 800);
    assert_eq!(widths.iter().sum::<i32>(), 90);
    assert!(widths.iter().all(|&w| w >= 1));
}

#[test]
fn test_relayout_after_content_change() {
    let (mut table, ids) = with_rows(
        TableStyle::default(),
        &[&[
            (CellStyle::default(), CellContent::new(10, 100, 10)),
            (CellStyle::default(), CellContent::new(10, 100, 10)),
        ]],
    );
    assert_eq!(lay_out(&mut table, 800), vec![100, 100]);
    table.set_cell_content(ids[0][1], CellContent::new(10, 300, 10));
    assert_eq!(lay_out(&mut table, 800), vec![100, 300]);
}

#[quickcheck]
fn prop_columns_fill_the_table(random: RandomTable) -> bool {
    let mut table = random.build();
    let _ = table.layout(&random.input(), &DeclaredContent);
    let positions = table.column_positions();
    positions.last().map_or(true, |&end| end + table.h_spacing() == content_width(&table))
}

#[quickcheck]
fn prop_no_column_below_its_minimum(random: RandomTable) -> bool {
    let mut table = random.build();
    table.set_style(TableStyle {
        layout: TableLayoutMode::Auto,
        ..random.style.clone()
    });
    let _ = table.layout(&random.input(), &DeclaredContent);
    let mut layout = AutoTableLayout::new();
    layout.compute_intrinsic_widths(&mut table);
    let widths = column_widths(&table);
    widths.len() == layout.columns().len()
        && widths
            .iter()
            .zip(layout.columns())
            .all(|(&w, column)| w >= column.effective_min_width)
}

#[quickcheck]
fn prop_preferred_minimum_within_maximum(random: RandomTable) -> bool {
    let mut table = random.build();
    let (min, max) = table.compute_preferred_widths(false);
    let _ = table.layout(&random.input(), &DeclaredContent);
    min <= max && table.logical_width() >= min
}

#[quickcheck]
fn prop_every_column_minimum_within_maximum(random: RandomTable, quirks_mode: bool) -> bool {
    let mut table = random.build();
    table.set_style(TableStyle {
        layout: TableLayoutMode::Auto,
        ..random.style.clone()
    });
    let mut layout = AutoTableLayout::new();
    layout.compute_intrinsic_widths(&mut table);
    layout.apply_quirks(&mut table, quirks_mode);
    layout
        .columns()
        .iter()
        .all(|column| column.effective_min_width <= column.effective_max_width)
}
