//! Trestle command-line table layout tool.
//!
//! Reads a JSON table description, lays it out, and prints the column
//! widths, row offsets and cell boxes.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use trestle_common::warning::warning_count;
use trestle_table::{
    BorderCollapse, BorderEdge, CellId, DeclaredContent, Direction, LayoutInput, ResolvedBorder,
    Table, TableDescription, TableGeometry,
};

#[derive(Parser, Debug)]
#[command(name = "trestle")]
#[command(author, version, about = "Lay out a CSS table and print its geometry", long_about = None)]
#[command(after_help = r#"EXAMPLES:
    trestle table.json                  Lay out in an 800px container
    trestle table.json --width 320      Lay out in a narrow container
    trestle table.json --quirks         Use legacy quirks-mode rules
    trestle table.json --borders        Also print resolved collapsed borders
    trestle table.json --json           Print the geometry as JSON
    RUST_LOG=trestle_table=trace trestle table.json
"#)]
struct Cli {
    /// JSON table description
    file: PathBuf,

    /// Width of the containing block
    #[arg(long, default_value = "800")]
    width: i32,

    /// Height of the containing block, for percentage table heights
    #[arg(long)]
    height: Option<i32>,

    /// Lay out in quirks mode
    #[arg(long)]
    quirks: bool,

    /// Lay columns out right to left
    #[arg(long)]
    rtl: bool,

    /// Print the resolved collapsed border on every cell edge
    #[arg(long)]
    borders: bool,

    /// Print JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// The four resolved edges of one cell.
#[derive(Debug, Serialize)]
struct CellBorders {
    cell: CellId,
    edges: Vec<(BorderEdge, ResolvedBorder)>,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    geometry: &'a TableGeometry,
    #[serde(skip_serializing_if = "Option::is_none")]
    borders: Option<Vec<CellBorders>>,
    warnings: usize,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn collapsed_borders(table: &mut Table, geometry: &TableGeometry) -> Vec<CellBorders> {
    geometry
        .cells
        .iter()
        .map(|g| CellBorders {
            cell: g.cell,
            edges: BorderEdge::iter()
                .map(|edge| (edge, table.collapsed_border(g.cell, edge)))
                .collect(),
        })
        .collect()
}

fn print_report(geometry: &TableGeometry, spacing: i32, borders: Option<&[CellBorders]>) {
    println!(
        "{} {}x{}",
        "table".bold(),
        geometry.width.cyan(),
        geometry.height.cyan()
    );

    let widths = geometry.column_widths(spacing);
    println!("{}", "columns".bold());
    for (index, (x, width)) in geometry.column_positions.iter().zip(&widths).enumerate() {
        println!("  {index:>3}  x={x:<6} width={}", width.cyan());
    }

    println!("{}", "sections".bold());
    for section in &geometry.sections {
        println!(
            "  {:<5} y={:<6} height={}",
            section.kind,
            section.y,
            section.height.cyan()
        );
    }

    println!("{}", "rows".bold());
    for (index, pair) in geometry.row_positions.windows(2).enumerate() {
        println!("  {index:>3}  y={:<6} height={}", pair[0], (pair[1] - pair[0]).cyan());
    }

    println!("{}", "cells".bold());
    for cell in &geometry.cells {
        println!(
            "  #{:<3} row {} col {} span {}x{}  {}",
            cell.cell.0,
            cell.row,
            cell.col,
            cell.colspan,
            cell.rowspan,
            format!(
                "({}, {}) {}x{} content+{}",
                cell.x, cell.y, cell.width, cell.height, cell.content_offset
            )
            .dimmed()
        );
        let Some(borders) = borders else { continue };
        let Some(entry) = borders.iter().find(|b| b.cell == cell.cell) else {
            continue;
        };
        for (edge, border) in &entry.edges {
            if border.width == 0 {
                continue;
            }
            println!(
                "        {edge:<6} {} {} {} ({:?})",
                border.width,
                border.style,
                border.color,
                border.precedence
            );
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut description = TableDescription::from_path(&cli.file)
        .with_context(|| format!("failed to load {}", cli.file.display()))?;
    if cli.rtl {
        description.style.direction = Direction::Rtl;
    }
    let mut table = description
        .into_table()
        .with_context(|| format!("failed to build a table from {}", cli.file.display()))?;

    let mut input = LayoutInput::new(cli.width).with_quirks(cli.quirks);
    if let Some(height) = cli.height {
        input = input.with_height(height);
    }
    info!(width = cli.width, quirks = cli.quirks, "laying out {}", cli.file.display());
    let geometry = table.layout(&input, &DeclaredContent);
    debug!(
        columns = geometry.column_positions.len().saturating_sub(1),
        cells = geometry.cells.len(),
        "layout done"
    );

    let borders = if cli.borders {
        if table.style().border_collapse == BorderCollapse::Collapse {
            Some(collapsed_borders(&mut table, &geometry))
        } else {
            eprintln!("{}", "--borders only applies to border-collapse: collapse".dimmed());
            None
        }
    } else {
        None
    };

    if cli.json {
        let report = Report {
            geometry: &geometry,
            borders,
            warnings: warning_count(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&geometry, table.h_spacing(), borders.as_deref());
    let warnings = warning_count();
    if warnings > 0 {
        eprintln!("{}", format!("{warnings} authoring warning(s)").dimmed());
    }
    Ok(())
}
