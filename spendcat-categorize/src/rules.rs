//! Deterministic rules layered around the model.
//!
//! The same rule set is rendered into the prompt and then enforced locally
//! on the rows the model returns.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use spendcat_core::{Transaction, INVESTMENTS, SALARY};

/// Description contains `pattern` (case-insensitive) → force `category`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingRule {
    pub pattern: String,
    pub category: String,
}

/// Description contains `pattern` → `category` when the transaction falls
/// on day 1..=`max_day` of the month, otherwise the row is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarlyMonthRule {
    pub pattern: String,
    pub category: String,
    pub max_day: u32,
}

/// Prompt-only guidance on what belongs in a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    pub category: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub mappings: Vec<MappingRule>,
    #[serde(default)]
    pub early_month: Vec<EarlyMonthRule>,
    /// Regular expressions matched case-insensitively against the description
    #[serde(default)]
    pub exclusions: Vec<String>,
    #[serde(default)]
    pub definitions: Vec<CategoryDefinition>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            mappings: vec![
                mapping("Javis technologies", SALARY),
                mapping("Monthly Savings Interest", SALARY),
                mapping("Vidhya Viswanathan", "Rent & Maintenance"),
                mapping("Cash withdrawal", "Utilities"),
            ],
            early_month: vec![EarlyMonthRule {
                pattern: "Vaarsheniee".to_string(),
                category: INVESTMENTS.to_string(),
                max_day: 5,
            }],
            exclusions: vec![
                r"Axis Bank Limited".to_string(),
                r"Ift/\d+".to_string(),
                r"MB[/-]IB Payment".to_string(),
                r"Payment Received".to_string(),
                r"Thank You".to_string(),
                r"Auto Debit".to_string(),
            ],
            definitions: vec![
                definition(
                    "Food & Groceries",
                    "All supermarkets, vegetable vendors and general grocery shopping.",
                ),
                definition(
                    "Utilities",
                    "Broad bucket: shopping (Amazon, Flipkart), transportation (Uber, Ola, fuel), \
                     health and wellness (pharmacy, doctors), cash withdrawals and standard \
                     utility bills (electricity, internet).",
                ),
                definition("Rent & Maintenance", "Housing costs."),
                definition(
                    "Miscellaneous",
                    "Anything that does not fit Salary, Investments + EMI, Rent, Food or Utilities.",
                ),
            ],
        }
    }
}

fn mapping(pattern: &str, category: &str) -> MappingRule {
    MappingRule {
        pattern: pattern.to_string(),
        category: category.to_string(),
    }
}

fn definition(category: &str, description: &str) -> CategoryDefinition {
    CategoryDefinition {
        category: category.to_string(),
        description: description.to_string(),
    }
}

/// Why a returned row was dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum Dropped {
    Excluded { pattern: String },
    OutsideEarlyWindow { pattern: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    Keep(Transaction),
    Drop(Dropped),
}

/// Rule set with its patterns compiled.
#[derive(Debug, Clone)]
pub struct CompiledRules {
    mappings: Vec<(String, String)>,
    early_month: Vec<(String, EarlyMonthRule)>,
    exclusions: Vec<Regex>,
}

impl RuleSet {
    pub fn compile(&self) -> Result<CompiledRules> {
        let exclusions = self
            .exclusions
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .with_context(|| format!("invalid exclusion pattern: {p}"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CompiledRules {
            mappings: self
                .mappings
                .iter()
                .map(|m| (m.pattern.to_lowercase(), m.category.clone()))
                .collect(),
            early_month: self
                .early_month
                .iter()
                .map(|r| (r.pattern.to_lowercase(), r.clone()))
                .collect(),
            exclusions,
        })
    }
}

/// Accepts the schema's `YYYY-MM-DD` plus the day-first forms Indian banks print.
pub fn parse_statement_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d-%b-%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

impl CompiledRules {
    /// Exclusions win, then early-month windows, then plain mappings.
    pub fn apply(&self, mut txn: Transaction) -> RuleOutcome {
        if let Some(re) = self.exclusions.iter().find(|re| re.is_match(&txn.description)) {
            return RuleOutcome::Drop(Dropped::Excluded {
                pattern: re.as_str().to_string(),
            });
        }

        let desc = txn.description.to_lowercase();

        if let Some((_, rule)) = self.early_month.iter().find(|(p, _)| desc.contains(p)) {
            let day = txn.date.as_deref().and_then(parse_statement_date).map(|d| d.day());
            return match day {
                Some(d) if (1..=rule.max_day).contains(&d) => {
                    txn.category = rule.category.clone();
                    RuleOutcome::Keep(txn)
                }
                _ => RuleOutcome::Drop(Dropped::OutsideEarlyWindow {
                    pattern: rule.pattern.clone(),
                }),
            };
        }

        if let Some((_, category)) = self.mappings.iter().find(|(p, _)| desc.contains(p)) {
            txn.category = category.clone();
        }

        RuleOutcome::Keep(txn)
    }

    /// Apply to a whole batch, logging every drop.
    pub fn apply_all(&self, txns: Vec<Transaction>) -> Vec<Transaction> {
        txns.into_iter()
            .filter_map(|t| {
                let description = t.description.clone();
                match self.apply(t) {
                    RuleOutcome::Keep(t) => Some(t),
                    RuleOutcome::Drop(reason) => {
                        tracing::debug!(%description, ?reason, "dropped by rule");
                        None
                    }
                }
            })
            .collect()
    }
}
