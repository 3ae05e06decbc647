use crate::analytics::RegressionError;
use crate::error::{option_to_result, AppResult};
use crate::models::{
    ProductDetailsReport, ProductInfo, RegressionReport, SalesOverviewReport, Store,
    StorePerformanceReport, TimeTrendsReport, WarrantyReport,
};
use crate::repositories::ReportRepository;
use crate::services::regression_service::{RegressionService, DEFAULT_PREDICTION_PRICE};
use rust_decimal::prelude::ToPrimitive;
use std::sync::Arc;
use tracing::{debug, info};

/// Assembles the dataset behind each dashboard page
pub struct ReportService {
    report_repo: Arc<ReportRepository>,
    regression: Arc<RegressionService>,
    top_n: i64,
}

impl ReportService {
    pub fn new(
        report_repo: Arc<ReportRepository>,
        regression: Arc<RegressionService>,
        top_n: i64,
    ) -> Self {
        Self {
            report_repo,
            regression,
            top_n,
        }
    }

    pub fn regression(&self) -> &Arc<RegressionService> {
        &self.regression
    }

    /// Units by category and the best selling stores
    pub async fn sales_overview(&self) -> AppResult<SalesOverviewReport> {
        let units_by_category = self.report_repo.units_by_category().await?;
        let top_stores = self.report_repo.top_stores(self.top_n).await?;

        debug!(
            "Sales overview: {} categories, {} stores",
            units_by_category.len(),
            top_stores.len()
        );
        Ok(SalesOverviewReport {
            units_by_category,
            top_stores,
        })
    }

    pub async fn warranty_analysis(&self) -> AppResult<WarrantyReport> {
        Ok(WarrantyReport {
            claims_by_product: self.report_repo.claims_by_product().await?,
        })
    }

    pub async fn time_trends(&self) -> AppResult<TimeTrendsReport> {
        Ok(TimeTrendsReport {
            monthly_units: self.report_repo.monthly_units().await?,
        })
    }

    /// Regression table, coefficients and a prediction at `price`
    pub async fn regression_analysis(&self, price: Option<f64>) -> AppResult<RegressionReport> {
        let fitted = self.regression.ensure_fitted().await?;
        let price = price.unwrap_or(DEFAULT_PREDICTION_PRICE);

        Ok(RegressionReport {
            model: fitted.model,
            rows: fitted.rows.clone(),
            prediction: fitted.model.prediction(price),
        })
    }

    pub async fn store_list(&self) -> AppResult<Vec<Store>> {
        Ok(self.report_repo.list_stores().await?)
    }

    /// Totals, top products and warranty claims for one store
    pub async fn store_performance(&self, store_name: &str) -> AppResult<StorePerformanceReport> {
        let store = option_to_result(
            self.report_repo.find_store_by_name(store_name).await?,
            &format!("Store '{}' not found", store_name),
        )?;

        let total_units = self.report_repo.store_total_units(&store.store_name).await?;
        let top_products = self
            .report_repo
            .store_top_products(&store.store_name, self.top_n)
            .await?;
        let warranty_claims = self.report_repo.store_warranty_claims(&store.store_name).await?;

        info!(
            "Store performance for {}: {} units, {} claims",
            store.store_name, total_units, warranty_claims
        );
        Ok(StorePerformanceReport {
            store_name: store.store_name,
            total_units,
            top_products,
            warranty_claims,
        })
    }

    pub async fn product_list(&self) -> AppResult<Vec<ProductInfo>> {
        Ok(self.report_repo.list_products().await?)
    }

    /// Price, sales, claims, monthly trend and predicted demand for one product
    pub async fn product_details(&self, product_name: &str) -> AppResult<ProductDetailsReport> {
        let product = option_to_result(
            self.report_repo.find_product_by_name(product_name).await?,
            &format!("Product '{}' not found", product_name),
        )?;

        let total_units_sold = self.report_repo.product_total_units(&product.product_id).await?;
        let warranty_claims = self
            .report_repo
            .product_warranty_claims(&product.product_id)
            .await?;
        let monthly_units = self
            .report_repo
            .product_monthly_units(&product.product_id)
            .await?;

        let fitted = self.regression.ensure_fitted().await?;
        let prediction = fitted.model.prediction(product.price.to_f64().ok_or_else(|| {
            RegressionError::InvalidPrice(product.product_id.clone())
        })?);

        Ok(ProductDetailsReport {
            product,
            total_units_sold,
            warranty_claims,
            monthly_units,
            prediction,
        })
    }
}
