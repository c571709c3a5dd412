//! Daily report of new and modified dishes, mailed to every registered user.

use std::sync::Arc;

use chrono::{DateTime, Days, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{info, warn};

use menu_shared::constants::{REPORT_SUBJECT, REPORT_WINDOW_OFFSET_HOURS};
use menu_shared::utils::mask_email;

use crate::error::DomainError;
use crate::ports::Mailer;
use crate::repositories::{DishRepository, UserRepository};

/// Inclusive time range covered by one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportWindow {
    /// Previous local day 10:00 through 09:59:59.999999 of the day after it.
    pub fn previous_day(now: DateTime<Utc>, tz: Tz) -> Result<Self, DomainError> {
        let today = now.with_timezone(&tz).date_naive();
        let yesterday = today
            .checked_sub_days(Days::new(1))
            .ok_or_else(|| DomainError::InternalError("report date out of range".to_string()))?;

        let offset = NaiveTime::from_hms_opt(REPORT_WINDOW_OFFSET_HOURS as u32, 0, 0)
            .ok_or_else(|| DomainError::InternalError("invalid report offset".to_string()))?;
        let start = tz
            .from_local_datetime(&yesterday.and_time(offset))
            .earliest()
            .ok_or_else(|| DomainError::InternalError("report start falls in a DST gap".to_string()))?
            .with_timezone(&Utc);
        let end = tz
            .from_local_datetime(&today.and_time(offset))
            .earliest()
            .ok_or_else(|| DomainError::InternalError("report end falls in a DST gap".to_string()))?
            .with_timezone(&Utc)
            - TimeDelta::microseconds(1);

        Ok(Self { start, end })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyReport {
    pub new_dishes: Vec<String>,
    pub modified_dishes: Vec<String>,
}

impl DailyReport {
    pub fn subject(&self) -> &'static str {
        REPORT_SUBJECT
    }

    pub fn body(&self) -> String {
        format!(
            "New Dishes:\n{}\n\nModified Dishes:\n{}",
            self.new_dishes.join(", "),
            self.modified_dishes.join(", ")
        )
    }
}

pub struct ReportService {
    dishes: Arc<dyn DishRepository>,
    users: Arc<dyn UserRepository>,
    mailer: Arc<dyn Mailer>,
    time_zone: Tz,
}

impl ReportService {
    pub fn new(
        dishes: Arc<dyn DishRepository>,
        users: Arc<dyn UserRepository>,
        mailer: Arc<dyn Mailer>,
        time_zone: Tz,
    ) -> Self {
        Self {
            dishes,
            users,
            mailer,
            time_zone,
        }
    }

    pub async fn build(&self, window: ReportWindow) -> Result<DailyReport, DomainError> {
        let created = self.dishes.created_between(window.start, window.end).await?;
        let updated = self.dishes.updated_between(window.start, window.end).await?;
        Ok(DailyReport {
            new_dishes: created.into_iter().map(|d| d.name).collect(),
            modified_dishes: updated.into_iter().map(|d| d.name).collect(),
        })
    }

    /// Builds the report for the window preceding `now` and mails it.
    ///
    /// Returns the number of messages sent. Stops at the first transport failure.
    pub async fn send_daily_report(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let window = ReportWindow::previous_day(now, self.time_zone)?;
        let report = self.build(window).await?;
        let body = report.body();
        info!(
            "Daily report for {} - {}: {} new, {} modified",
            window.start,
            window.end,
            report.new_dishes.len(),
            report.modified_dishes.len()
        );

        let mut sent = 0;
        for user in self.users.list_all().await? {
            if user.email.trim().is_empty() {
                warn!("Skipping daily report for user {}: no email address", user.id);
                continue;
            }
            self.mailer.send(&user.email, report.subject(), &body).await?;
            info!("Daily report sent to {}", mask_email(&user.email));
            sent += 1;
        }
        Ok(sent)
    }
}
