//! Application-wide constants

/// Upper bound for a single dish attachment, in bytes.
pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 20_048_576;
pub const DEFAULT_TIME_ZONE: &str = "Europe/Warsaw";
pub const DEFAULT_REPORT_SCHEDULE: &str = "0 0 10 * * *";
pub const DEFAULT_MEDIA_ROOT: &str = "media";
pub const ATTACHMENT_DIR: &str = "dish_attachments";

/// Format used for timestamps in responses and public filter parameters.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub const MAX_NAME_LENGTH: u64 = 255;
pub const PRICE_MAX_DIGITS: u32 = 8;
pub const PRICE_DECIMAL_PLACES: u32 = 2;

pub const REPORT_SUBJECT: &str = "Daily Report - New and Modified Dishes";
/// Hour offset applied to the previous calendar day when building the report window.
pub const REPORT_WINDOW_OFFSET_HOURS: i64 = 10;
