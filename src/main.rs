//! eBike Rental Service
//!
//! Reads configuration from a TOML file (~/.config/ebike-rental/config.toml).

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use ebike_rental::application::RentalService;
use ebike_rental::domain::RepositoryProvider;
use ebike_rental::infrastructure::database::migrator::Migrator;
use ebike_rental::infrastructure::database::seed::seed_if_empty;
use ebike_rental::support::shutdown::ShutdownCoordinator;
use ebike_rental::{
    create_api_router, default_config_path, init_database, AppConfig, SeaOrmRepositoryProvider,
};

#[derive(Debug, Parser)]
#[command(name = "ebike-rental", version, about = "Shared eBike reservation service")]
struct Args {
    /// Config file; falls back to $EBIKE_CONFIG, then the default location
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn init_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = args
        .config
        .or_else(|| std::env::var("EBIKE_CONFIG").ok().map(PathBuf::from))
        .unwrap_or_else(default_config_path);
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            init_logging(&cfg.logging.level, cfg.logging.json);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            init_logging("info", false);
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting eBike rental service...");

    // ── Prometheus metrics recorder (before any metrics call) ──
    let prometheus_handle =
        metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;
    info!("Prometheus metrics recorder installed");

    // ── Database ───────────────────────────────────────────────
    let db_config = app_cfg.database.to_database_config();
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    if app_cfg.database.auto_migrate {
        info!("Running database migrations...");
        if let Err(e) = Migrator::up(&db, None).await {
            error!("Failed to run migrations: {}", e);
            return Err(e.into());
        }
        info!("Migrations completed");
    }

    if let Err(e) = seed_if_empty(&db, &app_cfg.seed).await {
        warn!("Seeding demo data failed: {}", e);
    }

    // ── Services ───────────────────────────────────────────────
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    let rental = Arc::new(RentalService::new(repos, app_cfg.rental.write_mode));
    info!("Reservation write mode: {:?}", rental.write_mode());

    let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
    let shutdown_signal = shutdown.signal();
    shutdown.start_signal_listener();

    // ── REST API ───────────────────────────────────────────────
    let api_router = create_api_router(rental, prometheus_handle);
    let api_addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    let api_shutdown = shutdown_signal.clone();
    let served = axum::serve(listener, api_router)
        .with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        })
        .await;
    if let Err(e) = served {
        error!("REST API server error: {}", e);
    }

    // Covers the server stopping on its own
    shutdown_signal.trigger();
    shutdown
        .shutdown_with_cleanup(move || async move {
            match db.close().await {
                Ok(()) => info!("Database connection closed"),
                Err(e) => warn!("Error closing database connection: {}", e),
            }
        })
        .await;

    info!("eBike rental service shutdown complete");
    Ok(())
}
