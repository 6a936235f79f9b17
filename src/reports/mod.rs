use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use dimuforge::category::{CategoryMap, TreeCategorizer};
use dimuforge::driver::{CategoryTotals, SampleHistograms};
use dimuforge::error::DfResult;
use dimuforge::sample::SampleKind;
use std::path::Path;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn align_right(table: &mut Table, columns: std::ops::RangeInclusive<usize>) {
    for i in columns {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

pub fn print_registry(categories: &CategoryMap) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Key").add_attribute(Attribute::Bold),
        Cell::new("Name").add_attribute(Attribute::Bold),
        Cell::new("Terminal"),
        Cell::new("Hidden"),
        Cell::new("In"),
    ]);

    for (i, c) in categories.iter().enumerate() {
        let key_cell = if c.hide {
            Cell::new(&c.key).fg(Color::DarkGrey)
        } else {
            Cell::new(&c.key).fg(Color::Cyan)
        };
        table.add_row(vec![
            Cell::new(i),
            key_cell,
            Cell::new(&c.name),
            Cell::new(if c.is_terminal { "yes" } else { "" }),
            Cell::new(if c.hide { "yes" } else { "" }),
            if c.in_category {
                Cell::new("1").fg(Color::Green).add_attribute(Attribute::Bold)
            } else {
                Cell::new("0")
            },
        ]);
    }
    println!("\n{}", table);
    println!(
        "{} categories, {} visible",
        categories.len(),
        categories.visible().count()
    );
}

pub fn print_tree_summary(tree: &TreeCategorizer) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Nodes").add_attribute(Attribute::Bold),
        Cell::new("Leaves").add_attribute(Attribute::Bold),
        Cell::new("Depth").add_attribute(Attribute::Bold),
        Cell::new("Split variables"),
    ]);
    table.add_row(vec![
        Cell::new(tree.tree.len()),
        Cell::new(tree.tree.terminal_count()),
        Cell::new(tree.tree.depth()),
        Cell::new(tree.tree.split_variables().join(", ")),
    ]);
    align_right(&mut table, 0..=2);
    println!("\n{}", table);
}

pub fn print_sample_summary(results: &[SampleHistograms]) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Sample").add_attribute(Attribute::Bold),
        Cell::new("Kind"),
        Cell::new("Events"),
        Cell::new("Yield (first category)"),
    ]);
    align_right(&mut table, 2..=3);

    for r in results {
        let first = r.histograms.first().map_or(0.0, |(_, h)| h.integral());
        table.add_row(vec![
            Cell::new(&r.sample).add_attribute(Attribute::Bold),
            Cell::new(r.kind),
            Cell::new(r.events_processed),
            Cell::new(format!("{:.2}", first)),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_yields(totals: &[(String, CategoryTotals)]) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Category").add_attribute(Attribute::Bold),
        Cell::new("Signal").fg(Color::Green),
        Cell::new("Background").fg(Color::Red),
        Cell::new("Data"),
        Cell::new("S/sqrt(B)").add_attribute(Attribute::Bold),
    ]);
    align_right(&mut table, 1..=4);

    for (key, t) in totals {
        let s = t.yield_of(SampleKind::Signal);
        let b = t.yield_of(SampleKind::Background);
        let d = t.yield_of(SampleKind::Data);
        let significance = if b > 0.0 { s / b.sqrt() } else { 0.0 };
        table.add_row(vec![
            Cell::new(key).add_attribute(Attribute::Bold),
            Cell::new(format!("{:.3}", s)),
            Cell::new(format!("{:.1}", b)),
            Cell::new(format!("{:.0}", d)),
            Cell::new(format!("{:.4}", significance)),
        ]);
    }
    println!("\n{}", table);
}

pub fn write_yields_csv<P: AsRef<Path>>(path: P, totals: &[(String, CategoryTotals)]) -> DfResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["category", "signal", "background", "data"])?;
    for (key, t) in totals {
        writer.write_record([
            key.clone(),
            t.yield_of(SampleKind::Signal).to_string(),
            t.yield_of(SampleKind::Background).to_string(),
            t.yield_of(SampleKind::Data).to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
