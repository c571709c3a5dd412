//! Background task firing the daily report on a cron schedule.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use menu_core::error::DomainError;
use menu_core::services::ReportService;

pub struct DailyReportScheduler {
    service: Arc<ReportService>,
    schedule: Schedule,
    time_zone: Tz,
    cancel_token: CancellationToken,
}

/// Parses a cron expression; five-field expressions get a leading seconds field.
pub fn parse_schedule(expression: &str) -> Result<Schedule, DomainError> {
    let full = if expression.split_whitespace().count() == 5 {
        format!("0 {}", expression)
    } else {
        expression.to_string()
    };
    Schedule::from_str(&full).map_err(|e| {
        DomainError::InternalError(format!("invalid report schedule \"{}\": {}", expression, e))
    })
}

impl DailyReportScheduler {
    pub fn new(
        service: Arc<ReportService>,
        expression: &str,
        time_zone: Tz,
        cancel_token: CancellationToken,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            service,
            schedule: parse_schedule(expression)?,
            time_zone,
            cancel_token,
        })
    }

    /// Next firing strictly after `now`, evaluated in the configured zone.
    pub fn next_run_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule
            .after(&now.with_timezone(&self.time_zone))
            .next()
            .map(|at| at.with_timezone(&Utc))
    }

    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let Some(next) = self.next_run_after(Utc::now()) else {
                    warn!("Report schedule has no upcoming run; scheduler stopped");
                    break;
                };
                let wait = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);
                info!("Next daily report at {}", next.with_timezone(&self.time_zone));

                tokio::select! {
                    _ = self.cancel_token.cancelled() => break,
                    _ = tokio::time::sleep(wait) => self.run_once().await,
                }
            }
            info!("Daily report scheduler stopped");
        })
    }

    async fn run_once(&self) {
        match self.service.send_daily_report(Utc::now()).await {
            Ok(sent) => info!("Daily report delivered to {} recipients", sent),
            Err(e) => error!("Daily report failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Europe::Warsaw;
    use menu_core::ports::MockMailer;
    use menu_core::repositories::{MockDishRepository, MockUserRepository};

    fn scheduler(expression: &str, token: CancellationToken) -> DailyReportScheduler {
        let service = ReportService::new(
            Arc::new(MockDishRepository::new()),
            Arc::new(MockUserRepository::new()),
            Arc::new(MockMailer::new()),
            Warsaw,
        );
        DailyReportScheduler::new(Arc::new(service), expression, Warsaw, token).unwrap()
    }

    #[test]
    fn test_parse_schedule() {
        assert!(parse_schedule("0 0 10 * * *").is_ok());
        assert!(parse_schedule("0 10 * * *").is_ok());
        assert!(parse_schedule("invalid cron").is_err());
    }

    #[test]
    fn test_next_run_is_ten_local_time() {
        let scheduler = scheduler("0 0 10 * * *", CancellationToken::new());
        // 12:00 CEST, so the next run is tomorrow 10:00 CEST
        let now = Utc.with_ymd_and_hms(2024, 6, 14, 10, 0, 0).unwrap();
        let next = scheduler.next_run_after(now).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 6, 15, 8, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_cancel_stops_loop() {
        let token = CancellationToken::new();
        let handle = scheduler("0 0 10 * * *", token.clone()).start();
        token.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
