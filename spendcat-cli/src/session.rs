//! One analysis run: the files handed in, the model's answer and the status
//! tying them together.

use anyhow::Result;
use spendcat_core::{AppStatus, Breakdown, StatusEvent, Transaction};
use spendcat_ingest::{process_files, ProcessedFile};
use std::future::Future;
use std::path::PathBuf;

pub const FILES_FAILED_MESSAGE: &str = "Failed to process some files. Please check format.";
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "AI Processing Failed. Please check your API key and file contents.";

#[derive(Debug, Default)]
pub struct Session {
    status: AppStatus,
    files: Vec<ProcessedFile>,
    transactions: Vec<Transaction>,
    error_message: Option<String>,
    next_file_id: usize,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> AppStatus {
        self.status
    }

    pub fn files(&self) -> &[ProcessedFile] {
        &self.files
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    fn apply(&mut self, event: StatusEvent) -> Result<()> {
        let next = self.status.apply(event)?;
        tracing::debug!(from = %self.status, to = %next, ?event, "status change");
        self.status = next;
        Ok(())
    }

    /// Convert and append files. A conversion failure is recorded on the
    /// session (generic message) rather than returned.
    pub fn add_files(&mut self, paths: &[PathBuf]) -> Result<()> {
        self.apply(StatusEvent::FilesAdded)?;
        self.error_message = None;

        match process_files(paths, self.next_file_id) {
            Ok(processed) => {
                self.next_file_id += processed.len();
                self.files.extend(processed);
            }
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "file processing failed");
                self.error_message = Some(FILES_FAILED_MESSAGE.to_string());
            }
        }

        self.apply(StatusEvent::FilesProcessed)
    }

    pub fn remove_file(&mut self, id: &str) -> bool {
        let before = self.files.len();
        self.files.retain(|f| f.id != id);
        self.files.len() != before
    }

    /// Run `analyze` over the current files. Does nothing without files.
    pub async fn categorize<F, Fut>(&mut self, analyze: F) -> Result<()>
    where
        F: FnOnce(Vec<ProcessedFile>) -> Fut,
        Fut: Future<Output = Result<Vec<Transaction>>>,
    {
        if self.files.is_empty() {
            return Ok(());
        }

        self.apply(StatusEvent::AnalysisStarted)?;
        self.error_message = None;

        match analyze(self.files.clone()).await {
            Ok(txns) => {
                self.transactions = txns;
                self.apply(StatusEvent::AnalysisSucceeded)
            }
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "analysis failed");
                self.error_message = Some(ANALYSIS_FAILED_MESSAGE.to_string());
                self.apply(StatusEvent::AnalysisFailed)
            }
        }
    }

    pub fn reset(&mut self) -> Result<()> {
        self.apply(StatusEvent::Reset)?;
        self.files.clear();
        self.transactions.clear();
        self.error_message = None;
        Ok(())
    }

    /// Results view; only available once an analysis has completed.
    pub fn breakdown(&self) -> Option<Breakdown> {
        (self.status == AppStatus::Completed).then(|| Breakdown::from_transactions(&self.transactions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn csv_file(dir: &tempfile::TempDir, name: &str) -> PathBuf {
        let p = dir.path().join(name);
        fs::write(&p, "Date,Description,Amount\n02/09/2026,Zepto,380\n").unwrap();
        p
    }

    #[tokio::test]
    async fn test_full_flow() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = Session::new();

        s.add_files(&[csv_file(&dir, "a.csv")]).unwrap();
        s.add_files(&[csv_file(&dir, "b.csv")]).unwrap();
        assert_eq!(s.status(), AppStatus::Idle);
        let ids: Vec<_> = s.files().iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["file-0", "file-1"]);

        s.categorize(|files| async move {
            assert_eq!(files.len(), 2);
            Ok(vec![
                Transaction::new("Pay", 1000.0, "Salary"),
                Transaction::new("Zepto", 380.0, "Food & Groceries"),
            ])
        })
        .await
        .unwrap();

        assert_eq!(s.status(), AppStatus::Completed);
        let b = s.breakdown().unwrap();
        assert_eq!(b.totals.salary, 1000.0);
        assert_eq!(b.categories_tracked(), 1);

        // Results must be reset before more files come in
        assert!(s.add_files(&[csv_file(&dir, "c.csv")]).is_err());
        s.reset().unwrap();
        assert_eq!(s.status(), AppStatus::Idle);
        assert!(s.files().is_empty());
        assert!(s.breakdown().is_none());
    }

    #[tokio::test]
    async fn test_analysis_failure_sets_generic_message() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = Session::new();
        s.add_files(&[csv_file(&dir, "a.csv")]).unwrap();

        s.categorize(|_| async { Err(anyhow::anyhow!("gemini error: 401 Unauthorized")) })
            .await
            .unwrap();

        assert_eq!(s.status(), AppStatus::Error);
        assert_eq!(s.error_message(), Some(ANALYSIS_FAILED_MESSAGE));
        assert!(s.breakdown().is_none());

        // Retry straight from the error state
        s.categorize(|_| async { Ok(vec![]) }).await.unwrap();
        assert_eq!(s.status(), AppStatus::Completed);
        assert_eq!(s.error_message(), None);
        assert!(s.breakdown().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_categorize_without_files_is_a_no_op() {
        let mut s = Session::new();
        s.categorize(|_| async { Err(anyhow::anyhow!("should not be called")) })
            .await
            .unwrap();
        assert_eq!(s.status(), AppStatus::Idle);
        assert_eq!(s.error_message(), None);
    }

    #[test]
    fn test_missing_file_reports_generic_message() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = Session::new();
        s.add_files(&[dir.path().join("missing.csv")]).unwrap();

        assert_eq!(s.status(), AppStatus::Idle);
        assert_eq!(s.error_message(), Some(FILES_FAILED_MESSAGE));
        assert!(s.files().is_empty());
    }

    #[tokio::test]
    async fn test_reset_from_error_clears_everything() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = Session::new();
        s.add_files(&[csv_file(&dir, "a.csv")]).unwrap();
        s.categorize(|_| async { Err(anyhow::anyhow!("timeout")) })
            .await
            .unwrap();
        assert_eq!(s.status(), AppStatus::Error);

        s.reset().unwrap();
        assert_eq!(s.status(), AppStatus::Idle);
        assert_eq!(s.error_message(), None);
        assert!(s.files().is_empty());
    }

    #[test]
    fn test_reset_while_analyzing() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = Session::new();
        s.add_files(&[csv_file(&dir, "a.csv")]).unwrap();
        s.apply(StatusEvent::AnalysisStarted).unwrap();
        assert_eq!(s.status(), AppStatus::Analyzing);

        s.reset().unwrap();
        assert_eq!(s.status(), AppStatus::Idle);
        assert!(s.files().is_empty());

        // Ids keep counting across a reset
        s.add_files(&[csv_file(&dir, "b.csv")]).unwrap();
        assert_eq!(s.files()[0].id, "file-1");
    }

    #[test]
    fn test_remove_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = Session::new();
        s.add_files(&[csv_file(&dir, "a.csv"), csv_file(&dir, "b.csv")]).unwrap();

        assert!(s.remove_file("file-0"));
        assert!(!s.remove_file("file-0"));
        assert_eq!(s.files().len(), 1);
        assert_eq!(s.files()[0].name, "b.csv");
    }
}
