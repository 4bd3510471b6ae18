/// Terminal output for command summaries
use crate::core::ingestion::OutcomeTally;
use colored::*;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color as TableColor, ContentArrangement, Table};

/// Print a warning message
pub fn print_warning(message: &str) {
    println!(
        "\n{} {}",
        "⚠".yellow(),
        format!("Warning: {}", message).yellow()
    );
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("\n{} {}", "✓".green().bold(), message);
}

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{} {}", "▶".cyan(), title.bold());
    println!("{}", "─".repeat(60).dimmed());
}

fn styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Print a statistics table using comfy_table
pub fn print_stats_table(title: &str, stats: Vec<(&str, String)>) {
    let mut table = styled_table();
    table.set_header(vec![
        Cell::new(title)
            .add_attribute(Attribute::Bold)
            .fg(TableColor::Cyan),
        Cell::new("").add_attribute(Attribute::Bold),
    ]);

    for (label, value) in stats {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(value).fg(TableColor::Green),
        ]);
    }

    println!("\n{}", table);
}

/// One row per ingestion outcome; failures in red
pub fn print_outcome_table(tally: &OutcomeTally) {
    let mut table = styled_table();
    table.set_header(vec![
        Cell::new("Outcome").add_attribute(Attribute::Bold),
        Cell::new("Files").add_attribute(Attribute::Bold),
    ]);

    for (outcome, count) in tally.iter() {
        let color = if outcome.contains("exceptions") {
            TableColor::Red
        } else if outcome.starts_with("sequences too short") {
            TableColor::Yellow
        } else {
            TableColor::Green
        };
        table.add_row(vec![
            Cell::new(outcome),
            Cell::new(format_number(count)).fg(color),
        ]);
    }

    println!("\n{}", table);
}

/// Print formatted number with thousands separator
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Check if colors should be disabled
pub fn colors_enabled() -> bool {
    std::env::var("NO_COLOR").is_err()
        && std::env::var("CLICOLOR").unwrap_or_else(|_| "1".to_string()) != "0"
}

/// Initialize the formatter (sets up colored output)
pub fn init() {
    if !colors_enabled() {
        colored::control::set_override(false);
    }
}
