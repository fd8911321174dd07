//! spendcat-categorize: prompt construction, the Gemini client, response
//! validation and the deterministic rule set applied to model output.

pub mod gemini;
pub mod period;
pub mod prompt;
pub mod response;
pub mod rules;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use spendcat_core::Transaction;
use spendcat_ingest::{read_image_payload, ProcessedFile};

pub use gemini::GeminiClient;
pub use period::TargetPeriod;
pub use prompt::build_prompt;
pub use rules::{CompiledRules, RuleSet};

#[derive(Debug, thiserror::Error)]
pub enum CategorizeError {
    #[error("API key is missing; set {var} or GEMINI_API_KEY")]
    MissingApiKey { var: String },

    #[error("API key contains characters not allowed in a request header")]
    InvalidApiKey,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("gemini error: {status} {body}")]
    Http { status: u16, body: String },

    #[error("no response from model")]
    EmptyResponse,

    #[error("malformed model output: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

/// Turn the model's raw text answer into rule-checked transactions.
///
/// Rows whose date parses to a month other than `period` are dropped.
/// Undated rows are kept.
pub fn interpret_response(
    text: &str,
    rules: &CompiledRules,
    period: &TargetPeriod,
) -> Result<Vec<Transaction>> {
    let records = response::parse_records(text)?;
    let returned = records.len();

    let validated = response::validate(records);
    let (in_period, out_of_period): (Vec<_>, Vec<_>) = validated
        .transactions
        .into_iter()
        .partition(|t| in_target_period(t, period));
    for t in &out_of_period {
        tracing::debug!(description = %t.description, date = ?t.date, "dropped: outside target period");
    }

    let kept = rules.apply_all(in_period);

    tracing::info!(
        returned,
        rejected = validated.rejected,
        out_of_period = out_of_period.len(),
        kept = kept.len(),
        "interpreted model response"
    );
    Ok(kept)
}

fn in_target_period(txn: &Transaction, period: &TargetPeriod) -> bool {
    txn.date
        .as_deref()
        .and_then(rules::parse_statement_date)
        .is_none_or(|d| period.contains(d))
}

/// Send processed files to the model and return the categorized transactions
/// for the month before `today`.
pub async fn analyze_transactions(
    client: &GeminiClient,
    files: &[ProcessedFile],
    categories: &[String],
    rules: &RuleSet,
    today: NaiveDate,
) -> Result<Vec<Transaction>> {
    let compiled = rules.compile()?;
    let period = TargetPeriod::previous_month(today);

    let images = files
        .iter()
        .filter(|f| f.is_image())
        .map(|f| read_image_payload(f).with_context(|| format!("encoding {}", f.name)))
        .collect::<Result<Vec<_>>>()?;

    let prompt = build_prompt(files, categories, rules, &period);
    tracing::debug!(period = %period.label(), images = images.len(), prompt_bytes = prompt.len(), "built request");

    let request = gemini::build_request(&prompt, &images);
    let text = client.generate(&request).await?;

    interpret_response(&text, &compiled, &period)
}
