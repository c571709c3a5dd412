//! # Menu Infrastructure
//!
//! Adapters behind the core ports: PostgreSQL repositories, file storage,
//! mail transports and the report scheduler.

pub mod database;
pub mod storage;
pub mod mail;
pub mod scheduler;

pub use database::{
    create_pool, run_migrations, PgAttachmentRepository, PgDishRepository, PgMenuRepository,
    PgUserRepository,
};
pub use mail::{build_mailer, ConsoleMailer, SmtpMailer};
pub use scheduler::DailyReportScheduler;
pub use storage::LocalFileStorage;
