//! Terminal rendering of a breakdown: headline cards, allocation table,
//! bar chart and line items.

use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Color, Table};
use spendcat_core::{Breakdown, CategorySummary, Transaction};

const BAR_WIDTH: usize = 32;

/// Two decimals, thousands separators, symbol after the sign: -₹1,234.50
pub fn format_currency(val: f64, symbol: &str) -> String {
    let negative = val < 0.0;
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    // -0.00 after rounding is just zero
    if negative && cents != "0.00" {
        format!("-{symbol}{grouped}.{dec_part}")
    } else {
        format!("{symbol}{grouped}.{dec_part}")
    }
}

pub fn format_totals(b: &Breakdown, symbol: &str) -> String {
    let mut s = String::new();
    s.push_str(&format!(
        "{:<22}{}\n",
        "Salary (Income)".green().bold(),
        format_currency(b.totals.salary, symbol)
    ));
    s.push_str(&format!(
        "{:<22}{}\n",
        "Investments + EMI".blue().bold(),
        format_currency(b.totals.investments, symbol)
    ));
    s.push_str(&format!(
        "{:<22}{}\n",
        "Total Expenses".red().bold(),
        format_currency(b.totals.expenses, symbol)
    ));
    s.push('\n');
    s.push_str(&format!("Categories tracked: {}\n", b.categories_tracked()));
    s.push_str(&format!("Total transactions: {}\n", b.transaction_count));
    s
}

pub fn summary_table(categories: &[CategorySummary], symbol: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Category", "Amount", "% Total", "Count"]);

    for c in categories {
        let amount = Cell::new(format_currency(c.total_amount, symbol)).set_alignment(CellAlignment::Right);
        let amount = if c.total_amount < 0.0 { amount.fg(Color::Green) } else { amount };
        table.add_row(vec![
            Cell::new(&c.category),
            amount,
            Cell::new(format!("{:.1}%", c.percentage)).set_alignment(CellAlignment::Right),
            Cell::new(c.transaction_count).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Horizontal bars over the positive-net categories. Labels show each bar's
/// share of the drawn total, the way a pie chart would.
pub fn format_chart(b: &Breakdown) -> String {
    let slices = b.chart_slices();
    if slices.is_empty() {
        return "No net expenses to display\n".to_string();
    }

    let drawn: f64 = slices.iter().map(|s| s.total_amount).sum();
    let max = slices.iter().map(|s| s.total_amount).fold(0.0_f64, f64::max);
    let label_width = slices.iter().map(|s| s.category.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for s in slices {
        let len = ((s.total_amount / max) * BAR_WIDTH as f64).round().max(1.0) as usize;
        out.push_str(&format!(
            "{:<width$}  {:<bar$}  {:.0}%\n",
            s.category,
            "█".repeat(len),
            s.total_amount / drawn * 100.0,
            width = label_width,
            bar = BAR_WIDTH,
        ));
    }
    out
}

pub fn line_items_table(txns: &[Transaction], symbol: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Date", "Description", "Category", "Source", "Amount"]);

    for t in txns {
        let amount = Cell::new(format_currency(t.amount, symbol)).set_alignment(CellAlignment::Right);
        // Offsets stand out from spend
        let amount = if t.is_offset() { amount.fg(Color::Green) } else { amount };
        table.add_row(vec![
            Cell::new(t.date.as_deref().unwrap_or("")),
            Cell::new(&t.description),
            Cell::new(&t.category),
            Cell::new(&t.original_source),
            amount,
        ]);
    }
    table
}

/// Full report as printed by `analyze` and `summarize`.
pub fn render(b: &Breakdown, txns: &[Transaction], symbol: &str, details: bool) -> String {
    let mut out = String::new();
    out.push_str(&format_totals(b, symbol));

    out.push_str(&format!("\n{}\n", "Spend & Investment Breakdown".bold()));
    out.push_str(&format_chart(b));

    out.push_str(&format!("\n{}\n", "Category Details (Excl. Salary)".bold()));
    out.push_str(&format!("{}\n", summary_table(&b.categories, symbol)));

    if details {
        out.push_str(&format!("\n{}\n", "Line Items".bold()));
        out.push_str(&format!("{}\n", line_items_table(txns, symbol)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Transaction> {
        vec![
            Transaction::new("Javis technologies", 50000.0, "Salary"),
            Transaction::new("SIP", 2000.0, "Investments + EMI"),
            Transaction::new("BigBasket", 500.0, "Food & Groceries").with_date("2026-09-03"),
            Transaction::new("BigBasket refund", -100.0, "Food & Groceries").with_source("Image"),
            Transaction::new("Decathlon refund", -50.0, "Miscellaneous"),
        ]
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234.56, "₹"), "₹1,234.56");
        assert_eq!(format_currency(-500.0, "₹"), "-₹500.00");
        assert_eq!(format_currency(0.0, "$"), "$0.00");
        assert_eq!(format_currency(-0.001, "$"), "$0.00");
        assert_eq!(format_currency(1000000.99, "$"), "$1,000,000.99");
        assert_eq!(format_currency(42.1, ""), "42.10");
    }

    #[test]
    fn test_totals_block() {
        let b = Breakdown::from_transactions(&sample());
        let s = format_totals(&b, "₹");
        assert!(s.contains("₹50,000.00"));
        assert!(s.contains("₹2,000.00"));
        assert!(s.contains("₹350.00"));
        assert!(s.contains("Categories tracked: 3"));
        assert!(s.contains("Total transactions: 5"));
    }

    #[test]
    fn test_chart_skips_non_positive_categories() {
        let b = Breakdown::from_transactions(&sample());
        let chart = format_chart(&b);
        assert_eq!(chart.lines().count(), 2);
        assert!(chart.lines().next().unwrap().starts_with("Investments + EMI"));
        assert!(chart.contains("83%"));
        assert!(chart.contains("17%"));
        assert!(!chart.contains("Miscellaneous"));
    }

    #[test]
    fn test_chart_empty() {
        let b = Breakdown::from_transactions(&[Transaction::new("Refund", -10.0, "Utilities")]);
        assert_eq!(format_chart(&b), "No net expenses to display\n");
    }

    #[test]
    fn test_summary_table_lists_every_category() {
        let b = Breakdown::from_transactions(&sample());
        let rendered = summary_table(&b.categories, "₹").to_string();
        assert!(rendered.contains("Investments + EMI"));
        assert!(rendered.contains("Food & Groceries"));
        assert!(rendered.contains("Miscellaneous"));
        assert!(rendered.contains("-₹50.00"));
        assert!(!rendered.contains("Salary"));
    }

    #[test]
    fn test_render_details_toggle() {
        let txns = sample();
        let b = Breakdown::from_transactions(&txns);
        assert!(!render(&b, &txns, "₹", false).contains("BigBasket refund"));
        let full = render(&b, &txns, "₹", true);
        assert!(full.contains("BigBasket refund"));
        assert!(full.contains("2026-09-03"));
    }
}
