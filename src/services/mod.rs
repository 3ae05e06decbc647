pub mod regression_service;
pub mod report_service;

pub use regression_service::{
    FittedModel, ModelCache, ModelState, RegressionService, DEFAULT_PREDICTION_PRICE,
};
pub use report_service::ReportService;
