use crate::analytics::{PredictionResult, RegressionModel, RegressionRow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::ProductInfo;

/// Dashboard page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportPage {
    SalesOverview,
    WarrantyAnalysis,
    TimeTrends,
    RegressionAnalysis,
    StorePerformance,
    ProductDetails,
}

impl ReportPage {
    pub const ALL: [ReportPage; 6] = [
        ReportPage::SalesOverview,
        ReportPage::WarrantyAnalysis,
        ReportPage::TimeTrends,
        ReportPage::RegressionAnalysis,
        ReportPage::StorePerformance,
        ReportPage::ProductDetails,
    ];

    /// Parse a page identifier
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "sales_overview" => Ok(ReportPage::SalesOverview),
            "warranty_analysis" => Ok(ReportPage::WarrantyAnalysis),
            "time_trends" => Ok(ReportPage::TimeTrends),
            "regression_analysis" => Ok(ReportPage::RegressionAnalysis),
            "store_performance" => Ok(ReportPage::StorePerformance),
            "product_details" => Ok(ReportPage::ProductDetails),
            _ => Err(format!("Invalid page: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPage::SalesOverview => "sales_overview",
            ReportPage::WarrantyAnalysis => "warranty_analysis",
            ReportPage::TimeTrends => "time_trends",
            ReportPage::RegressionAnalysis => "regression_analysis",
            ReportPage::StorePerformance => "store_performance",
            ReportPage::ProductDetails => "product_details",
        }
    }

    /// Heading shown above the page
    pub fn title(&self) -> &'static str {
        match self {
            ReportPage::SalesOverview => "Sales Overview",
            ReportPage::WarrantyAnalysis => "Warranty Analysis",
            ReportPage::TimeTrends => "Time-Based Trends",
            ReportPage::RegressionAnalysis => "Regression: Price vs Units Sold",
            ReportPage::StorePerformance => "Store Performance Dashboard",
            ReportPage::ProductDetails => "Product Details Page",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CategoryUnits {
    pub category_name: String,
    pub total_units: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StoreUnits {
    pub store_name: String,
    pub total_units: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProductUnits {
    pub product_name: String,
    pub units_sold: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProductClaims {
    pub product_name: String,
    pub claim_count: i64,
}

/// Units sold in one calendar month (`month` is the first day of the month)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MonthlyUnits {
    pub month: NaiveDate,
    pub total_units: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOverviewReport {
    pub units_by_category: Vec<CategoryUnits>,
    pub top_stores: Vec<StoreUnits>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarrantyReport {
    pub claims_by_product: Vec<ProductClaims>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeTrendsReport {
    pub monthly_units: Vec<MonthlyUnits>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionReport {
    pub model: RegressionModel,
    pub rows: Vec<RegressionRow>,
    pub prediction: PredictionResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorePerformanceReport {
    pub store_name: String,
    pub total_units: i64,
    pub top_products: Vec<ProductUnits>,
    pub warranty_claims: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetailsReport {
    pub product: ProductInfo,
    pub total_units_sold: i64,
    pub warranty_claims: i64,
    pub monthly_units: Vec<MonthlyUnits>,
    /// Model prediction at the product's own catalog price
    pub prediction: PredictionResult,
}
