//! Output formatting for CLI

use crate::pipeline::WinFractions;

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// One line of a match table: a label then each identifier's win fraction
pub fn fractions_line(label: &str, fractions: &WinFractions, ids: &[&str]) -> String {
    let columns: Vec<String> = ids
        .iter()
        .map(|id| format!("{:.2}", fractions.fraction(id)))
        .collect();
    format!("{label:15} {}", columns.join(" "))
}
