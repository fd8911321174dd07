//! Transaction record types as returned by the categorization service

use serde::{Deserialize, Serialize};

/// Income category. Excluded from the per-category breakdown.
pub const SALARY: &str = "Salary";

/// Investment/loan category. Reported on its own top-line card but still
/// part of the per-category breakdown.
pub const INVESTMENTS: &str = "Investments + EMI";

/// Label set offered to the model when the user has not configured one.
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    SALARY,
    INVESTMENTS,
    "Rent & Maintenance",
    "Food & Groceries",
    "Utilities",
    "Miscellaneous",
];

pub fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

/// A single categorized line item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub description: String,
    /// Positive = money out (or salary credit); negative = refund/offset
    pub amount: f64,
    /// Open string key; not restricted to the default label set
    pub category: String,
    /// Display-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Filename or medium the row was extracted from. Display-only.
    #[serde(default)]
    pub original_source: String,
}

impl Transaction {
    pub fn new(description: impl Into<String>, amount: f64, category: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            amount,
            category: category.into(),
            date: None,
            original_source: String::new(),
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.original_source = source.into();
        self
    }

    pub fn is_salary(&self) -> bool {
        self.category == SALARY
    }

    pub fn is_investment(&self) -> bool {
        self.category == INVESTMENTS
    }

    /// Negative amounts offset spend in their category
    pub fn is_offset(&self) -> bool {
        self.amount < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_model_output_with_missing_optionals() {
        let json = r#"[
            {"description": "Swiggy", "amount": 450.5, "category": "Food & Groceries"},
            {"description": "Javis technologies", "amount": 90000, "category": "Salary",
             "date": "2026-09-01", "originalSource": "statement.xlsx"}
        ]"#;
        let txns: Vec<Transaction> = serde_json::from_str(json).unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].date, None);
        assert_eq!(txns[0].original_source, "");
        assert!(txns[1].is_salary());
        assert_eq!(txns[1].original_source, "statement.xlsx");
    }

    #[test]
    fn test_serialize_uses_camel_case() {
        let t = Transaction::new("Rent", 25000.0, "Rent & Maintenance").with_source("Image");
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["originalSource"], "Image");
        assert!(v.get("date").is_none());
    }

    #[test]
    fn test_category_predicates() {
        assert!(Transaction::new("SIP", 5000.0, INVESTMENTS).is_investment());
        assert!(Transaction::new("Refund", -100.0, "Utilities").is_offset());
        // Matching is exact; casing variants are ordinary categories
        assert!(!Transaction::new("Pay", 1.0, "salary").is_salary());
    }

    #[test]
    fn test_default_categories() {
        let cats = default_categories();
        assert_eq!(cats.len(), 6);
        assert_eq!(cats[0], "Salary");
        assert_eq!(cats[5], "Miscellaneous");
    }
}
