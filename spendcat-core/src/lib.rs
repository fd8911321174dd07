//! spendcat-core: transaction types, the aggregation engine and session status

pub mod aggregate;
pub mod status;
pub mod transaction;

pub use aggregate::{
    chart_eligible, compute_category_summary, compute_top_line_totals, Breakdown,
    CategorySummary, TopLineTotals,
};
pub use status::{AppStatus, StatusEvent, TransitionError};
pub use transaction::{default_categories, Transaction, DEFAULT_CATEGORIES, INVESTMENTS, SALARY};
