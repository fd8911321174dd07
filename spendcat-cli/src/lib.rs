//! spendcat-cli: configuration, the analysis session and terminal report
//! behind the `spendcat` binary.

pub mod analyze;
pub mod config;
pub mod report;
pub mod session;
pub mod state;
