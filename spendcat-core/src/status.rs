//! Status of an analysis session and the transitions allowed between states.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppStatus {
    #[default]
    Idle,
    ProcessingFiles,
    Analyzing,
    Completed,
    Error,
}

/// Things that move a session between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEvent {
    /// New files were handed in for conversion
    FilesAdded,
    /// File conversion finished (successfully or not)
    FilesProcessed,
    /// Categorization request sent
    AnalysisStarted,
    AnalysisSucceeded,
    AnalysisFailed,
    /// Drop files, transactions and errors
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot apply {event:?} while {from}")]
pub struct TransitionError {
    pub from: AppStatus,
    pub event: StatusEvent,
}

impl AppStatus {
    /// Apply an event, returning the next status.
    ///
    /// Reset is accepted from every state. Completed results must be reset
    /// before new files can be added.
    pub fn apply(self, event: StatusEvent) -> Result<AppStatus, TransitionError> {
        use AppStatus::*;
        use StatusEvent::*;

        let next = match (self, event) {
            (_, Reset) => Idle,
            (Idle | Error, FilesAdded) => ProcessingFiles,
            (ProcessingFiles, FilesProcessed) => Idle,
            (Idle | Error, AnalysisStarted) => Analyzing,
            (Analyzing, AnalysisSucceeded) => Completed,
            (Analyzing, AnalysisFailed) => Error,
            (from, event) => return Err(TransitionError { from, event }),
        };
        Ok(next)
    }

    /// Whether the user may hand in more files or start an analysis.
    pub fn accepts_input(&self) -> bool {
        matches!(self, AppStatus::Idle | AppStatus::Error)
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, AppStatus::ProcessingFiles | AppStatus::Analyzing)
    }
}

impl fmt::Display for AppStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppStatus::Idle => "idle",
            AppStatus::ProcessingFiles => "processing files",
            AppStatus::Analyzing => "analyzing",
            AppStatus::Completed => "completed",
            AppStatus::Error => "error",
        };
        f.write_str(s)
    }
}
