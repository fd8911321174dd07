//! Aggregation engine: turns a flat transaction list into the headline
//! totals and the per-category breakdown.
//!
//! Everything here is a pure function of its input. Callers recompute from
//! scratch whenever the transaction list changes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::transaction::{Transaction, INVESTMENTS, SALARY};

/// Headline figures: salary, investments and everything else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TopLineTotals {
    pub salary: f64,
    pub investments: f64,
    pub expenses: f64,
}

/// Net figures for one non-Salary category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub category: String,
    /// Algebraic sum; refunds reduce it
    pub total_amount: f64,
    pub transaction_count: usize,
    /// Share of the net non-Salary total. Negative when the category is net
    /// negative; zero everywhere when the net total is not positive.
    pub percentage: f64,
}

/// Sum amounts into the three headline partitions.
///
/// Any category that is not exactly `Salary` or `Investments + EMI` counts
/// as an expense, including unknown labels.
pub fn compute_top_line_totals(transactions: &[Transaction]) -> TopLineTotals {
    let mut totals = TopLineTotals::default();

    for txn in transactions {
        match txn.category.as_str() {
            SALARY => totals.salary += txn.amount,
            INVESTMENTS => totals.investments += txn.amount,
            _ => totals.expenses += txn.amount,
        }
    }

    totals
}

#[derive(Default)]
struct Accumulator {
    total: f64,
    count: usize,
}

/// Build the per-category breakdown, largest net spend first.
pub fn compute_category_summary(transactions: &[Transaction]) -> Vec<CategorySummary> {
    // BTreeMap keeps tie order (and float summation order) deterministic
    let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();

    for txn in transactions.iter().filter(|t| !t.is_salary()) {
        let acc = groups.entry(txn.category.as_str()).or_default();
        acc.total += txn.amount;
        acc.count += 1;
    }

    let net_total: f64 = groups.values().map(|acc| acc.total).sum();

    let mut summary: Vec<CategorySummary> = groups
        .into_iter()
        .map(|(category, acc)| CategorySummary {
            category: category.to_string(),
            total_amount: acc.total,
            transaction_count: acc.count,
            percentage: if net_total > 0.0 {
                (acc.total / net_total) * 100.0
            } else {
                0.0
            },
        })
        .collect();

    summary.sort_by(|a, b| b.total_amount.total_cmp(&a.total_amount));
    summary
}

/// Entries that can be drawn as a proportional slice (net total > 0).
///
/// Percentages are carried over unchanged from the full summary.
pub fn chart_eligible(summary: &[CategorySummary]) -> Vec<CategorySummary> {
    summary
        .iter()
        .filter(|s| s.total_amount > 0.0)
        .cloned()
        .collect()
}

/// Everything the results view needs, derived in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub totals: TopLineTotals,
    pub categories: Vec<CategorySummary>,
    /// Positive-net subset of `categories`, same order and percentages
    #[serde(default)]
    pub chart: Vec<CategorySummary>,
    /// Raw list length, Salary included
    pub transaction_count: usize,
}

impl Breakdown {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let categories = compute_category_summary(transactions);
        Self {
            totals: compute_top_line_totals(transactions),
            chart: chart_eligible(&categories),
            categories,
            transaction_count: transactions.len(),
        }
    }

    pub fn categories_tracked(&self) -> usize {
        self.categories.len()
    }

    pub fn chart_slices(&self) -> &[CategorySummary] {
        &self.chart
    }

    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }
}
