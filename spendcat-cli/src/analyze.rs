use anyhow::Result;
use chrono::NaiveDate;
use spendcat_categorize::{analyze_transactions, GeminiClient};

use crate::config::Config;
use crate::session::Session;

/// Categorize the session's files with Gemini.
///
/// The client is built inside the analysis step, so a missing or bad API key
/// lands in the session as an analysis failure like any other.
pub async fn run_analysis(session: &mut Session, cfg: &Config, today: NaiveDate) -> Result<()> {
    let llm = &cfg.llm;
    let categories = &cfg.categories.labels;
    let rules = &cfg.rules;

    session
        .categorize(|files| async move {
            let client = GeminiClient::from_env(&llm.base_url, &llm.model, &llm.api_key_env)?;
            tracing::info!(files = files.len(), model = client.model(), "analyzing");
            analyze_transactions(&client, &files, categories, rules, today).await
        })
        .await
}
