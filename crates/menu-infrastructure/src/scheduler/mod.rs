//! Scheduled jobs

pub mod daily_report;

pub use daily_report::DailyReportScheduler;
