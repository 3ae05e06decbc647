//! Price/demand analytics: dataset aggregation and the OLS estimator.

pub mod aggregation;
pub mod regression;

pub use aggregation::build_demand_points;
pub use regression::{
    fit_model, fit_pairs, price_as_f64, regression_table, round2, PredictionResult, RegressionError,
    RegressionModel, RegressionResult, RegressionRow,
};
