use crate::analytics::{
    fit_model, regression_table, PredictionResult, RegressionModel, RegressionRow,
};
use crate::error::{AppError, AppResult};
use crate::models::ProductDemandPoint;
use crate::repositories::DemandRepository;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Price used by the prediction tool when the caller gives none
pub const DEFAULT_PREDICTION_PRICE: f64 = 500.0;

/// Model fitted from one dataset snapshot, with the table it produced
#[derive(Debug, Clone)]
pub struct FittedModel {
    pub model: RegressionModel,
    pub rows: Vec<RegressionRow>,
    pub point_count: usize,
    pub fitted_at: DateTime<Utc>,
}

/// Lifecycle of the regression model
#[derive(Debug, Clone, Default)]
pub enum ModelState {
    /// No successful fit yet; predictions fail
    #[default]
    Unfit,
    Fit(Arc<FittedModel>),
}

impl ModelState {
    pub fn is_fit(&self) -> bool {
        matches!(self, ModelState::Fit(_))
    }
}

/// Holds the current model and answers predictions from it.
///
/// Readers share the fitted model; only `install`/`clear` write.
#[derive(Debug, Default)]
pub struct ModelCache {
    state: RwLock<ModelState>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit `points` and make the result current.
    ///
    /// On failure the cache is left `Unfit` so a stale model is never served.
    pub async fn install(&self, points: &[ProductDemandPoint]) -> AppResult<Arc<FittedModel>> {
        let mut state = self.state.write().await;

        let built = fit_model(points).and_then(|model| {
            let rows = regression_table(&model, points)?;
            Ok((model, rows))
        });
        let (model, rows) = match built {
            Ok(built) => built,
            Err(e) => {
                *state = ModelState::Unfit;
                return Err(e.into());
            }
        };

        let fitted = Arc::new(FittedModel {
            model,
            rows,
            point_count: points.len(),
            fitted_at: Utc::now(),
        });
        *state = ModelState::Fit(fitted.clone());

        Ok(fitted)
    }

    /// Drop the current model
    pub async fn clear(&self) {
        *self.state.write().await = ModelState::Unfit;
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> ModelState {
        self.state.read().await.clone()
    }

    /// The fitted model, or `ModelNotFitted`
    pub async fn current(&self) -> AppResult<Arc<FittedModel>> {
        match &*self.state.read().await {
            ModelState::Fit(fitted) => Ok(fitted.clone()),
            ModelState::Unfit => Err(AppError::ModelNotFitted),
        }
    }

    /// Predicted units at `price`; extrapolates outside the observed range
    pub async fn predict(&self, price: f64) -> AppResult<PredictionResult> {
        Ok(self.current().await?.model.prediction(price))
    }
}

/// Loads the demand dataset and keeps the model fitted from it
pub struct RegressionService {
    demand_repo: Arc<DemandRepository>,
    cache: ModelCache,
}

impl RegressionService {
    pub fn new(demand_repo: Arc<DemandRepository>) -> Self {
        Self {
            demand_repo,
            cache: ModelCache::new(),
        }
    }

    /// Fit from the database unless a model is already current
    pub async fn ensure_fitted(&self) -> AppResult<Arc<FittedModel>> {
        if let ModelState::Fit(fitted) = self.cache.state().await {
            return Ok(fitted);
        }
        self.refresh().await
    }

    /// Reload the dataset snapshot and refit
    pub async fn refresh(&self) -> AppResult<Arc<FittedModel>> {
        let points = match self.demand_repo.product_demand_points().await {
            Ok(points) => points,
            Err(e) => {
                self.cache.clear().await;
                return Err(e.into());
            }
        };

        match self.cache.install(&points).await {
            Ok(fitted) => {
                info!(
                    "Regression model fitted from {} products: slope={:.6}, intercept={:.4}",
                    fitted.point_count, fitted.model.slope, fitted.model.intercept
                );
                Ok(fitted)
            }
            Err(e) => {
                warn!("Regression fit failed on {} products: {}", points.len(), e);
                Err(e)
            }
        }
    }

    /// Predicted units at `price` from the current model
    pub async fn predict(&self, price: f64) -> AppResult<PredictionResult> {
        self.cache.predict(price).await
    }
}
