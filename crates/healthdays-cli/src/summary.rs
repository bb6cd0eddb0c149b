use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use healthdays_common::format_numeric;
use healthdays_model::RecodeError;
use healthdays_report::{FactorReport, GroupStats, OneWayAnova, RowCounts};

use crate::types::RunResult;

/// Significance level used to highlight p-values.
const ALPHA: f64 = 0.05;

pub fn print_summary(result: &RunResult) {
    println!(
        "Input: {} ({}, {})",
        result.input.display(),
        result.source_format,
        result.mode.as_str()
    );
    if result.dry_run {
        println!("Output: dry run, nothing written");
    } else {
        match &result.outputs.table {
            Some(path) => println!("Output: {} ({})", path.display(), result.output_format),
            None => println!("Output: no clean table written"),
        }
        if let Some(path) = &result.outputs.report_json {
            println!("Report: {}", path.display());
        }
    }

    print_row_table(&result.report.rows);
    print_group_table(result);
    print_anova_table(&result.report.factors);
    print_violations(&result.violations);
}

fn print_row_table(rows: &RowCounts) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rows"),
        header_cell("Field"),
        header_cell("Count"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);

    table.add_row(vec![Cell::new("Read"), dim_cell("-"), Cell::new(rows.read)]);
    table.add_row(vec![
        Cell::new("Rejected").add_attribute(Attribute::Bold),
        dim_cell("-"),
        count_cell(rows.rejected, Color::Yellow),
    ]);
    for rejection in &rows.rejections {
        table.add_row(vec![
            Cell::new(format!("  -> {}", rejection.reason)).fg(Color::DarkGrey),
            dim_cell(&rejection.field),
            dim_cell(rejection.count),
        ]);
    }
    table.add_row(vec![
        Cell::new("Recoded")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(rows.recoded).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("Days drank code kept as is"),
        Cell::new("days_drank_last_30"),
        count_cell(rows.days_passthrough, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Invariant violations"),
        dim_cell("-"),
        count_cell(rows.invariant_violations, Color::Red),
    ]);
    println!("{table}");
}

fn print_group_table(result: &RunResult) {
    let Some(overall) = result.report.overall.as_ref() else {
        return;
    };
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Factor"),
        header_cell("Level"),
        header_cell("N"),
        header_cell("Mean"),
        header_cell("SD"),
        header_cell("Min"),
        header_cell("Max"),
    ]);
    apply_table_style(&mut table);
    for index in 2..7 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    for factor in &result.report.factors {
        for group in &factor.groups {
            table.add_row(group_row(
                Cell::new(factor.factor.as_str())
                    .fg(Color::Blue)
                    .add_attribute(Attribute::Bold),
                group,
            ));
        }
    }
    table.add_row(
        group_row(
            Cell::new("TOTAL")
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
            overall,
        )
        .into_iter()
        .map(|cell| cell.add_attribute(Attribute::Bold))
        .collect::<Vec<_>>(),
    );
    println!();
    println!("Healthy days by group:");
    println!("{table}");
}

fn group_row(factor: Cell, group: &GroupStats) -> Vec<Cell> {
    vec![
        factor,
        Cell::new(&group.level),
        Cell::new(group.count),
        Cell::new(format!("{:.2}", group.mean)),
        group
            .std_dev
            .map_or_else(|| dim_cell("-"), |sd| Cell::new(format!("{sd:.2}"))),
        Cell::new(format_numeric(group.min)),
        Cell::new(format_numeric(group.max)),
    ]
}

fn print_anova_table(factors: &[FactorReport]) {
    if factors.iter().all(|factor| factor.groups.is_empty()) {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Factor"),
        header_cell("Levels"),
        header_cell("df"),
        header_cell("F"),
        header_cell("p"),
        header_cell("eta²"),
    ]);
    apply_table_style(&mut table);
    for index in 1..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for factor in factors {
        let name = Cell::new(factor.factor.as_str())
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold);
        match &factor.anova {
            Some(anova) => table.add_row(anova_row(name, anova)),
            None => table.add_row(vec![
                name,
                Cell::new(factor.groups.len()),
                dim_cell("-"),
                dim_cell("no test"),
                dim_cell("-"),
                dim_cell("-"),
            ]),
        };
    }
    println!();
    println!("One-way ANOVA of healthy days:");
    println!("{table}");
}

fn anova_row(name: Cell, anova: &OneWayAnova) -> Vec<Cell> {
    let p_value = format_p_value(anova.p_value);
    let p_cell = if anova.is_significant(ALPHA) {
        Cell::new(p_value)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new(p_value)
    };
    vec![
        name,
        Cell::new(anova.levels),
        Cell::new(format!("{}, {}", anova.df_between, anova.df_within)),
        Cell::new(format!("{:.3}", anova.f_statistic)),
        p_cell,
        Cell::new(format!("{:.3}", anova.eta_squared)),
    ]
}

fn format_p_value(p: f64) -> String {
    if p < 1e-4 {
        "<0.0001".to_string()
    } else {
        format!("{p:.4}")
    }
}

fn print_violations(violations: &[RecodeError]) {
    if violations.is_empty() {
        return;
    }
    eprintln!("Errors:");
    for violation in violations {
        eprintln!("- {violation}");
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
