use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::info;

use menu_api::{build_router, AppState};
use menu_core::ports::FileStorage;
use menu_core::repositories::{AttachmentRepository, DishRepository, MenuRepository, UserRepository};
use menu_core::services::{
    AttachmentService, DishService, ListingService, MenuService, ReportService,
};
use menu_infrastructure::{
    build_mailer, create_pool, run_migrations, DailyReportScheduler, LocalFileStorage,
    PgAttachmentRepository, PgDishRepository, PgMenuRepository, PgUserRepository,
};
use menu_security::JwtService;
use menu_shared::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    let _log_guard = menu_shared::telemetry::init_telemetry(config.app.log_dir.as_deref());
    let time_zone = config.time_zone()?;

    info!("{} starting ({})", config.app.name, config.app.env);

    let pool = create_pool(&config.database)
        .await
        .context("failed to connect to database")?;
    info!("Database connection established.");
    if config.database.run_migrations {
        run_migrations(&pool).await?;
    }

    // Adapters
    let menus: Arc<dyn MenuRepository> = Arc::new(PgMenuRepository::new(pool.clone()));
    let dishes: Arc<dyn DishRepository> = Arc::new(PgDishRepository::new(pool.clone()));
    let attachments: Arc<dyn AttachmentRepository> =
        Arc::new(PgAttachmentRepository::new(pool.clone()));
    let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool));
    let storage: Arc<dyn FileStorage> = Arc::new(LocalFileStorage::new(config.media_root()));
    let mailer = build_mailer(&config.email)?;

    let shutdown = CancellationToken::new();
    let scheduler = if config.report.enabled {
        let reports = Arc::new(ReportService::new(dishes.clone(), users, mailer, time_zone));
        let scheduler = DailyReportScheduler::new(
            reports,
            &config.report.schedule,
            time_zone,
            shutdown.clone(),
        )?;
        Some(scheduler.start())
    } else {
        info!("Daily report disabled");
        None
    };

    let state = AppState {
        menus: Arc::new(MenuService::new(menus.clone(), dishes.clone())),
        dishes: Arc::new(DishService::new(dishes.clone(), menus.clone())),
        attachments: Arc::new(AttachmentService::new(
            dishes.clone(),
            attachments,
            storage,
            config.media.max_upload_size,
            time_zone,
        )),
        listing: Arc::new(ListingService::new(menus, dishes)),
        jwt: Arc::new(JwtService::new(&config.jwt.secret)),
        time_zone,
    };
    let app = build_router(state);

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let token = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
            token.cancel();
        })
        .await?;

    shutdown.cancel();
    if let Some(handle) = scheduler {
        handle.await?;
    }
    info!("Server stopped");
    Ok(())
}
