//! Instruction text sent alongside the statement data.

use spendcat_ingest::ProcessedFile;

use crate::period::TargetPeriod;
use crate::rules::RuleSet;

const PROMPT: &str = r#"
You are an expert financial assistant and accountant.

OBJECTIVE:
Analyze the provided spreadsheet text and statement images and extract the
individual transactions.

DATE FILTER (CRITICAL):
Today's date: {TODAY}
Target period: {PERIOD} (the previous month)
1. Read the date of every transaction.
2. Only include transactions that occurred in {PERIOD}.
3. Drop transactions from {CURRENT_MONTH} (the current month) and from months before {TARGET_MONTH}.
4. If a statement spans several months, filter strictly for {PERIOD}.

CATEGORIES:
Assign every transaction exactly one of these categories:
{CATEGORIES_JSON}

SPECIAL MAPPINGS (highest priority):
{MAPPINGS}

DATE-WINDOW RULES:
{EARLY_MONTH}

EXCLUSIONS (drop these transactions entirely):
{EXCLUSIONS}

CATEGORY DEFINITIONS:
{DEFINITIONS}

AMOUNTS AND SIGNS (CRITICAL):
Step 1 - effective amount.
- Separate 'Debit' and 'Credit' columns: effective amount = Credit - Debit
  (Debit 300, Credit 0 -> -300; Debit 0, Credit 300 -> +300).
- A single 'Amount' column: effective amount = that value.
Step 2 - output amount.
- Negative effective amount: an expense or investment. Return it as a POSITIVE number.
- Positive effective amount:
  - Salary or interest credit matching the salary mappings above: income, return POSITIVE, category Salary.
  - Card bill payment or anything matching the exclusions: drop the row.
  - Refund or reversal of a purchase: an offset, return it as a NEGATIVE number.

OUTPUT:
1. For each transaction return 'description', 'amount', 'category' and 'date' (YYYY-MM-DD when known).
2. 'originalSource' is the file name, or 'Image' / 'Excel'.
3. Return a clean JSON array only.

DATA SOURCES:
{DATA}
"#;

fn bullet_list(items: impl IntoIterator<Item = String>) -> String {
    let lines: Vec<String> = items
        .into_iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {}", i + 1, s))
        .collect();
    if lines.is_empty() {
        "(none)".to_string()
    } else {
        lines.join("\n")
    }
}

fn data_section(files: &[ProcessedFile]) -> String {
    let mut text =
        String::from("Here is the raw text extracted from the uploaded Excel/CSV files:\n\n");
    for f in files.iter().filter(|f| f.is_spreadsheet()) {
        if let Some(parsed) = &f.parsed_text {
            text.push_str(parsed);
            text.push_str("\n\n");
        }
    }
    text
}

pub fn build_prompt(
    files: &[ProcessedFile],
    categories: &[String],
    rules: &RuleSet,
    period: &TargetPeriod,
) -> String {
    let categories_json =
        serde_json::to_string(categories).unwrap_or_else(|_| categories.join(", "));

    let mappings = bullet_list(
        rules
            .mappings
            .iter()
            .map(|m| format!("\"{}\" -> \"{}\"", m.pattern, m.category)),
    );
    let early_month = bullet_list(rules.early_month.iter().map(|r| {
        format!(
            "\"{}\": if the transaction date is between the 1st and the {} of {}, category \"{}\"; otherwise exclude it completely.",
            r.pattern,
            ordinal(r.max_day),
            period.label(),
            r.category
        )
    }));
    let exclusions = bullet_list(
        rules
            .exclusions
            .iter()
            .map(|p| format!("Description matches /{p}/ (case-insensitive)")),
    );
    let definitions = bullet_list(
        rules
            .definitions
            .iter()
            .map(|d| format!("\"{}\": {}", d.category, d.description)),
    );

    PROMPT
        .replace("{TODAY}", &period.today_label())
        .replace("{PERIOD}", &period.label())
        .replace("{CURRENT_MONTH}", &period.current_month_name())
        .replace("{TARGET_MONTH}", &period.month_name())
        .replace("{CATEGORIES_JSON}", &categories_json)
        .replace("{MAPPINGS}", &mappings)
        .replace("{EARLY_MONTH}", &early_month)
        .replace("{EXCLUSIONS}", &exclusions)
        .replace("{DEFINITIONS}", &definitions)
        // Last, so statement text containing braces is left alone
        .replace("{DATA}", &data_section(files))
}

fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
