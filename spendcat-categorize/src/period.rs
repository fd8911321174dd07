//! The billing period a run targets: the calendar month before "today".

use chrono::{Datelike, Months, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetPeriod {
    pub today: NaiveDate,
    /// First day of the target month
    pub start: NaiveDate,
}

impl TargetPeriod {
    pub fn previous_month(today: NaiveDate) -> Self {
        let start = today
            .with_day(1)
            .and_then(|d| d.checked_sub_months(Months::new(1)))
            .unwrap_or(today);
        Self { today, start }
    }

    /// e.g. "September 2026"
    pub fn label(&self) -> String {
        self.start.format("%B %Y").to_string()
    }

    pub fn month_name(&self) -> String {
        self.start.format("%B").to_string()
    }

    pub fn current_month_name(&self) -> String {
        self.today.format("%B").to_string()
    }

    /// e.g. "Sat Oct 17 2026"
    pub fn today_label(&self) -> String {
        self.today.format("%a %b %d %Y").to_string()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.start.year() && date.month() == self.start.month()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_previous_month() {
        let p = TargetPeriod::previous_month(ymd(2026, 10, 17));
        assert_eq!(p.start, ymd(2026, 9, 1));
        assert_eq!(p.label(), "September 2026");
        assert_eq!(p.month_name(), "September");
        assert_eq!(p.current_month_name(), "October");
        assert_eq!(p.today_label(), "Sat Oct 17 2026");
    }

    #[test]
    fn test_january_rolls_back_a_year() {
        let p = TargetPeriod::previous_month(ymd(2027, 1, 31));
        assert_eq!(p.start, ymd(2026, 12, 1));
        assert_eq!(p.label(), "December 2026");
    }

    #[test]
    fn test_end_of_month_does_not_skip() {
        // March 31 → February, not a clamped/skipped month
        let p = TargetPeriod::previous_month(ymd(2026, 3, 31));
        assert_eq!(p.start, ymd(2026, 2, 1));
    }

    #[test]
    fn test_contains() {
        let p = TargetPeriod::previous_month(ymd(2026, 10, 1));
        assert!(p.contains(ymd(2026, 9, 30)));
        assert!(!p.contains(ymd(2026, 10, 1)));
        assert!(!p.contains(ymd(2025, 9, 15)));
    }
}
