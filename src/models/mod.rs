//! Domain models for the sales dashboard.
//!
//! Catalog and ledger rows read from the database, plus the report
//! datasets returned for each dashboard page.

pub mod product;
pub mod report;
pub mod store;

// Re-export all models for convenient access
pub use product::{Product, ProductDemandPoint, ProductInfo, SaleQuantity};
pub use report::{
    CategoryUnits, MonthlyUnits, ProductClaims, ProductDetailsReport, ProductUnits,
    RegressionReport, ReportPage, SalesOverviewReport, StorePerformanceReport, StoreUnits,
    TimeTrendsReport, WarrantyReport,
};
pub use store::Store;
