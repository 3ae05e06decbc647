//! Sales Dashboard Service
//!
//! Main entry point for the dashboard reporting backend.
//! This service provides:
//! - WebSocket feed serving page datasets and demand predictions
//! - Price/demand regression fitted once per dataset load

use anyhow::Context;
use sales_dashboard::config::{AppConfig, LogFormat};
use sales_dashboard::database::{create_pool, run_migrations};
use sales_dashboard::websocket::DashboardFeed;
use sales_dashboard::DashboardState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("sales_dashboard={},sqlx=warn", config.log_level).into()
    });

    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables first
    dotenv::dotenv().ok();

    let config = AppConfig::from_env()
        .map_err(anyhow::Error::msg)
        .context("Failed to load configuration")?;

    init_tracing(&config);

    info!("Sales dashboard service starting");
    info!("Environment: {}", config.environment);
    info!("Log level: {}", config.log_level);

    // =========================================================================
    // DATABASE SETUP
    // =========================================================================
    info!("Connecting to database...");

    let pool = create_pool(&config.database).await.map_err(|e| {
        error!("Failed to create database pool: {}", e);
        e
    })?;
    info!(
        "Database connection pool created (max connections: {})",
        config.database.max_connections
    );

    if config.run_migrations {
        info!("Running database migrations...");
        run_migrations(&pool, None).await.map_err(|e| {
            error!("Database migration failed: {}", e);
            e
        })?;
        info!("Database migrations completed successfully");
    } else {
        warn!("RUN_MIGRATIONS disabled - assuming schema is up to date");
    }

    // =========================================================================
    // MODEL
    // =========================================================================
    let state = Arc::new(DashboardState::new(pool, config.report_top_n));

    match state.regression.ensure_fitted().await {
        Ok(fitted) => info!(
            "✓ Demand model ready: units = {:.6} * price + {:.4}",
            fitted.model.slope, fitted.model.intercept
        ),
        Err(e) => warn!("Demand model unavailable until refresh: {}", e),
    }

    // =========================================================================
    // DASHBOARD FEED
    // =========================================================================
    let feed = DashboardFeed::new(state.reports.clone());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port)
        .parse()
        .context("Invalid listen address")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind dashboard feed on {}", addr))?;

    info!("✓ Dashboard feed listening on ws://{}", addr);

    let feed_handle = tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    info!("New connection from {}", peer);
                    let feed = feed.clone();
                    tokio::spawn(async move {
                        if let Err(e) = feed.handle_connection(stream).await {
                            error!("Dashboard connection error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    error!("Accept error: {}", e);
                }
            }
        }
    });

    info!("Press Ctrl+C to shutdown gracefully");

    // =========================================================================
    // SHUTDOWN HANDLING
    // =========================================================================
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, shutting down gracefully...");
        }
        _ = feed_handle => {
            error!("Dashboard feed exited unexpectedly");
        }
    }

    state.database.pool().close().await;
    info!("Sales dashboard service shutdown complete");
    Ok(())
}
