//! Sales Dashboard Library
//!
//! Reporting backend for the sales, warranty and price/demand dashboard.
//! This module exposes the components for use by the binary and by tests.

pub mod analytics;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod repositories;
pub mod services;
pub mod websocket;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};

use database::Database;
use repositories::*;
use services::{RegressionService, ReportService};
use std::sync::Arc;

/// Application state containing all repositories and services
pub struct DashboardState {
    pub database: Database,
    pub demand_repo: Arc<DemandRepository>,
    pub report_repo: Arc<ReportRepository>,
    pub regression: Arc<RegressionService>,
    pub reports: Arc<ReportService>,
}

impl DashboardState {
    /// Create a new DashboardState with initialized repositories.
    ///
    /// The regression model starts unfit; call `regression.ensure_fitted()`
    /// once the schema is in place.
    pub fn new(pool: sqlx::PgPool, report_top_n: i64) -> Self {
        let database = Database::new(pool.clone());
        let demand_repo = Arc::new(DemandRepository::new(pool.clone()));
        let report_repo = Arc::new(ReportRepository::new(pool));
        let regression = Arc::new(RegressionService::new(demand_repo.clone()));
        let reports = Arc::new(ReportService::new(
            report_repo.clone(),
            regression.clone(),
            report_top_n,
        ));

        Self {
            database,
            demand_repo,
            report_repo,
            regression,
            reports,
        }
    }
}
