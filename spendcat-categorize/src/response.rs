//! Validation of the model's JSON answer before it reaches the aggregation
//! engine.
//!
//! The model is asked for a schema-conforming array but the engine never
//! trusts that: amounts may come back as strings, fields may be blank.
//! Rows that cannot be repaired are rejected and counted.

use serde::Deserialize;
use serde_json::Value;
use spendcat_core::Transaction;

use crate::CategorizeError;

/// One element of the returned array, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amount: Value,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub original_source: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validated {
    pub transactions: Vec<Transaction>,
    pub rejected: usize,
}

/// Drop a surrounding ```json fence if the model added one.
pub fn strip_fences(text: &str) -> &str {
    let t = text.trim();
    let Some(inner) = t.strip_prefix("```") else {
        return t;
    };
    let inner = match inner.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &inner[4..],
        _ => inner,
    };
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

pub fn parse_records(text: &str) -> Result<Vec<RawTransaction>, CategorizeError> {
    let records: Vec<RawTransaction> = serde_json::from_str(strip_fences(text))?;
    Ok(records)
}

// Longest first so "rs." wins over "rs"
const CURRENCY_PREFIXES: [&str; 6] = ["rs.", "rs", "inr", "usd", "₹", "$"];

fn strip_currency(s: &str) -> &str {
    let lower = s.to_ascii_lowercase();
    CURRENCY_PREFIXES
        .iter()
        .find(|p| lower.starts_with(*p))
        .map(|p| s[p.len()..].trim_start())
        .unwrap_or(s)
}

/// Numbers pass through; numeric strings lose currency markers and separators.
pub fn coerce_amount(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            let (negative, s) = match s.strip_prefix('-') {
                Some(rest) => (true, rest.trim_start()),
                None => (false, s),
            };
            let cleaned = strip_currency(s).replace([',', ' '], "");
            let n: f64 = cleaned.parse().ok()?;
            if !n.is_finite() {
                return None;
            }
            Some(if negative { -n } else { n })
        }
        _ => None,
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

pub fn validate(records: Vec<RawTransaction>) -> Validated {
    let mut out = Validated::default();

    for raw in records {
        let description = non_blank(raw.description);
        let category = non_blank(raw.category);
        let amount = coerce_amount(&raw.amount);

        let (Some(description), Some(category), Some(amount)) = (description, category, amount) else {
            tracing::warn!(amount = %raw.amount, "rejected malformed transaction from model");
            out.rejected += 1;
            continue;
        };

        out.transactions.push(Transaction {
            description,
            amount,
            category,
            date: non_blank(raw.date),
            original_source: raw.original_source.unwrap_or_default().trim().to_string(),
        });
    }

    out
}
