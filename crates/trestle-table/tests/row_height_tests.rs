//! Integration tests for row heights, table height and cell positions.
//!
//! [§ 17.5.3 Table height algorithms](https://www.w3.org/TR/CSS2/tables.html#height-layout)

mod common;

use common::RandomTable;
use quickcheck_macros::quickcheck;
use trestle_table::{
    BorderSpacing, CellContent, CellId, CellMeasurer, CellStyle, DeclaredContent, Direction,
    LayoutInput, Padding, RowStyle, SectionKind, SectionStyle, Table, TableLength, TableStyle,
    VerticalAlign,
};

fn aligned(vertical_align: VerticalAlign) -> CellStyle {
    CellStyle {
        vertical_align,
        ..CellStyle::default()
    }
}

#[test]
fn test_rowspan_cell_pushes_its_last_row() {
    let mut table = Table::new(TableStyle::default());
    let body = table.add_section(SectionKind::Body, SectionStyle::default());
    let r0 = table.add_row(body, RowStyle::default());
    let tall = table.add_cell(
        r0,
        CellStyle {
            rowspan: 2,
            vertical_align: VerticalAlign::Top,
            ..CellStyle::default()
        },
        CellContent::new(10, 10, 100),
    );
    let _ = table.add_cell(r0, CellStyle::default(), CellContent::new(10, 10, 20));
    let r1 = table.add_row(body, RowStyle::default());
    let below = table.add_cell(r1, CellStyle::default(), CellContent::new(10, 10, 20));

    let geometry = table.layout(&LayoutInput::new(800), &DeclaredContent);
    assert_eq!(geometry.row_positions, vec![0, 20, 100]);
    assert_eq!(geometry.cell(tall).unwrap().height, 100);
    assert_eq!(geometry.cell(tall).unwrap().rowspan, 2);
    let below = geometry.cell(below).unwrap();
    assert_eq!((below.x, below.y, below.height), (10, 20, 80));
}

#[test]
fn test_baselines_line_up() {
    let mut table = Table::new(TableStyle::default());
    let body = table.add_section(SectionKind::Body, SectionStyle::default());
    let row = table.add_row(body, RowStyle::default());
    let a = table.add_cell(row, CellStyle::default(), CellContent::new(10, 10, 30).with_baseline(10));
    let b = table.add_cell(row, CellStyle::default(), CellContent::new(10, 10, 20).with_baseline(15));

    let geometry = table.layout(&LayoutInput::new(800), &DeclaredContent);
    // Ascent 15 from b, descent 20 from a.
    assert_eq!(table.logical_height(), 35);
    assert_eq!(geometry.cell(a).unwrap().content_offset, 5);
    assert_eq!(geometry.cell(b).unwrap().content_offset, 0);
}

#[test]
fn test_vertical_align_offsets() {
    let mut table = Table::new(TableStyle::default());
    let body = table.add_section(SectionKind::Body, SectionStyle::default());
    let row = table.add_row(
        body,
        RowStyle {
            height: TableLength::Fixed(100),
            ..RowStyle::default()
        },
    );
    let content = CellContent::new(10, 10, 20);
    let top = table.add_cell(row, aligned(VerticalAlign::Top), content);
    let middle = table.add_cell(row, aligned(VerticalAlign::Middle), content);
    let bottom = table.add_cell(row, aligned(VerticalAlign::Bottom), content);

    let geometry = table.layout(&LayoutInput::new(800), &DeclaredContent);
    let offsets: Vec<i32> = [top, middle, bottom]
        .iter()
        .map(|&cell| geometry.cell(cell).unwrap().content_offset)
        .collect();
    assert_eq!(offsets, vec![0, 40, 80]);
}

#[test]
fn test_extra_table_height_goes_to_the_first_body() {
    let mut table = Table::new(TableStyle {
        height: TableLength::Fixed(200),
        ..TableStyle::default()
    });
    let head = table.add_section(SectionKind::Head, SectionStyle::default());
    let row = table.add_row(head, RowStyle::default());
    let _ = table.add_cell(row, CellStyle::default(), CellContent::new(10, 10, 20));
    let body = table.add_section(SectionKind::Body, SectionStyle::default());
    for _ in 0..2 {
        let row = table.add_row(body, RowStyle::default());
        let _ = table.add_cell(row, CellStyle::default(), CellContent::new(10, 10, 20));
    }

    let geometry = table.layout(&LayoutInput::new(800), &DeclaredContent);
    assert_eq!(table.logical_height(), 200);
    // The header keeps its content height; the body's two rows split 140.
    assert_eq!(geometry.row_positions, vec![0, 20, 110, 200]);
    assert_eq!(table.section(head).unwrap().logical_height(), 20);
}

#[test]
fn test_table_without_body_rows_keeps_declared_height() {
    for empty_body in [false, true] {
        let mut table = Table::new(TableStyle {
            height: TableLength::Fixed(200),
            ..TableStyle::default()
        });
        let head = table.add_section(SectionKind::Head, SectionStyle::default());
        let row = table.add_row(head, RowStyle::default());
        let _ = table.add_cell(row, CellStyle::default(), CellContent::new(10, 10, 20));
        if empty_body {
            let _ = table.add_section(SectionKind::Body, SectionStyle::default());
        }

        let geometry = table.layout(&LayoutInput::new(800), &DeclaredContent);
        assert_eq!(table.logical_height(), 200);
        assert_eq!(table.section(head).unwrap().logical_height(), 200);
        assert_eq!(geometry.row_positions, vec![0, 200]);
    }
}

#[test]
fn test_percent_table_height_needs_a_definite_container() {
    let style = TableStyle {
        height: TableLength::Percent(50.0),
        ..TableStyle::default()
    };
    let build = || {
        let mut table = Table::new(style.clone());
        let body = table.add_section(SectionKind::Body, SectionStyle::default());
        let row = table.add_row(body, RowStyle::default());
        let _ = table.add_cell(row, CellStyle::default(), CellContent::new(10, 10, 20));
        table
    };

    let mut table = build();
    let _ = table.layout(&LayoutInput::new(800), &DeclaredContent);
    assert_eq!(table.logical_height(), 20);

    let mut table = build();
    let _ = table.layout(&LayoutInput::new(800).with_height(300), &DeclaredContent);
    assert_eq!(table.logical_height(), 150);
}

#[test]
fn test_empty_table_keeps_declared_height_in_standards_mode() {
    let style = TableStyle {
        height: TableLength::Fixed(80),
        ..TableStyle::default()
    };
    let mut table = Table::new(style.clone());
    let _ = table.add_section(SectionKind::Body, SectionStyle::default());
    let _ = table.layout(&LayoutInput::new(800), &DeclaredContent);
    assert_eq!(table.logical_height(), 80);

    let mut table = Table::new(style);
    let _ = table.add_section(SectionKind::Body, SectionStyle::default());
    let _ = table.layout(&LayoutInput::new(800).with_quirks(true), &DeclaredContent);
    assert_eq!(table.logical_height(), 0);
}

#[test]
fn test_cell_height_is_a_border_box_in_quirks_mode() {
    let build = || {
        let mut table = Table::new(TableStyle::default());
        let body = table.add_section(SectionKind::Body, SectionStyle::default());
        let row = table.add_row(body, RowStyle::default());
        let style = CellStyle {
            height: TableLength::Fixed(50),
            padding: Padding::all(5),
            ..CellStyle::default()
        };
        let _ = table.add_cell(row, style, CellContent::new(10, 10, 20));
        table
    };

    let mut table = build();
    let _ = table.layout(&LayoutInput::new(800), &DeclaredContent);
    assert_eq!(table.logical_height(), 60);

    let mut table = build();
    let _ = table.layout(&LayoutInput::new(800).with_quirks(true), &DeclaredContent);
    assert_eq!(table.logical_height(), 50);
}

#[test]
fn test_spacing_surrounds_rows_and_columns() {
    let mut table = Table::new(TableStyle {
        border_spacing: BorderSpacing::uniform(5),
        ..TableStyle::default()
    });
    let body = table.add_section(SectionKind::Body, SectionStyle::default());
    let row = table.add_row(body, RowStyle::default());
    let cell = table.add_cell(row, CellStyle::default(), CellContent::new(10, 10, 20));

    let geometry = table.layout(&LayoutInput::new(800), &DeclaredContent);
    let g = geometry.cell(cell).unwrap();
    assert_eq!((g.x, g.y, g.width, g.height), (5, 5, 10, 20));
    assert_eq!((geometry.width, geometry.height), (20, 30));
}

#[test]
fn test_right_to_left_mirrors_columns() {
    let mut table = Table::new(TableStyle {
        direction: Direction::Rtl,
        ..TableStyle::default()
    });
    let body = table.add_section(SectionKind::Body, SectionStyle::default());
    let row = table.add_row(body, RowStyle::default());
    let first = table.add_cell(row, CellStyle::default(), CellContent::fixed(100, 10));
    let second = table.add_cell(row, CellStyle::default(), CellContent::fixed(300, 10));

    let geometry = table.layout(&LayoutInput::new(800), &DeclaredContent);
    assert_eq!(geometry.cell(first).unwrap().x, 300);
    assert_eq!(geometry.cell(second).unwrap().x, 0);
}

/// Content that wraps: a fixed area spread over whatever width it gets.
struct Wrapping;

impl CellMeasurer for Wrapping {
    fn measure_height(&self, _cell: CellId, content: &CellContent, inline_size: i32) -> i32 {
        let area = content.max_width * content.height;
        if inline_size <= 0 {
            return content.height;
        }
        (area + inline_size - 1) / inline_size
    }

    fn baseline(&self, _cell: CellId, _content: &CellContent) -> Option<i32> {
        None
    }
}

#[test]
fn test_measurer_sees_the_final_width() {
    let mut table = Table::new(TableStyle::default());
    let body = table.add_section(SectionKind::Body, SectionStyle::default());
    let row = table.add_row(body, RowStyle::default());
    let _ = table.add_cell(row, CellStyle::default(), CellContent::new(20, 200, 10));

    let _ = table.layout(&LayoutInput::new(800), &Wrapping);
    assert_eq!(table.logical_height(), 10);
    let _ = table.layout(&LayoutInput::new(50), &Wrapping);
    assert_eq!(table.logical_height(), 40);
}

#[quickcheck]
fn prop_extra_height_is_accounted_for(random: RandomTable, extra: u8) -> bool {
    let mut table = random.build();
    let _ = table.layout(&random.input(), &DeclaredContent);
    let Some(body) = table.first_body() else {
        return true;
    };
    let before = table.section(body).map_or(0, |s| s.logical_height());
    let extra = i32::from(extra);
    let used = table.distribute_extra_height(body, extra);
    let after = table.section(body).map_or(0, |s| s.logical_height());
    (0..=extra).contains(&used) && after - before == used
}

#[quickcheck]
fn prop_rows_never_overlap(random: RandomTable) -> bool {
    let mut table = random.build();
    let geometry = table.layout(&random.input(), &DeclaredContent);
    geometry.row_positions.windows(2).all(|w| w[0] <= w[1])
        && geometry.cells.iter().all(|c| c.height >= 0 && c.width >= 0)
}
