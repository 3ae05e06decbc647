use crate::models::ProductDemandPoint;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;
use thiserror::Error;

/// Error types for regression fitting
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegressionError {
    #[error("No sales recorded: cannot fit a model on an empty dataset")]
    EmptyDataset,

    #[error("Insufficient price variance: need at least 2 distinct prices, found {distinct_prices}")]
    InsufficientVariance { distinct_prices: usize },

    #[error("Price of product {0} is not representable as a real number")]
    InvalidPrice(String),
}

/// Result type for regression operations
pub type RegressionResult<T> = Result<T, RegressionError>;

/// Fitted line `units = slope * price + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionModel {
    pub slope: f64,
    pub intercept: f64,
}

/// Predicted demand for a single input price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub input_price: f64,
    pub predicted_units: f64,
}

/// One row of the regression table: observed demand next to the fitted value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionRow {
    pub product_id: String,
    pub price: Decimal,
    pub total_units_sold: i64,
    /// Fitted value rounded to 2 decimal places
    pub predicted_units_sold: f64,
}

impl RegressionModel {
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    /// Predicted units sold at `price`.
    ///
    /// Any real price is accepted. Prices outside the observed range are
    /// extrapolated along the fitted line with no accuracy guarantee, and the
    /// result may be negative.
    pub fn predict(&self, price: f64) -> f64 {
        self.slope * price + self.intercept
    }

    /// Same as [`predict`](Self::predict), paired with its input
    pub fn prediction(&self, price: f64) -> PredictionResult {
        PredictionResult {
            input_price: price,
            predicted_units: self.predict(price),
        }
    }
}

/// Magnitude from which every `f64` is an integer
const F64_INTEGRAL_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Round half away from zero to 2 decimal places, as `ROUND(numeric, 2)` does.
///
/// The value is rounded in its shortest decimal form, so `1.005` becomes
/// `1.01` even though the nearest `f64` lies just below the midpoint.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= F64_INTEGRAL_LIMIT {
        return value;
    }

    match Decimal::from_str(&value.to_string()) {
        Ok(decimal) => decimal
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
            .unwrap_or(value),
        // Below Decimal's resolution; rounds to zero
        Err(_) => 0.0,
    }
}

/// Price of a demand point as a real number
pub fn price_as_f64(point: &ProductDemandPoint) -> RegressionResult<f64> {
    point
        .price
        .to_f64()
        .ok_or_else(|| RegressionError::InvalidPrice(point.product_id.clone()))
}

/// Fit ordinary least squares of units sold on price over every point.
///
/// ```text
/// slope     = (n*Sxy - Sx*Sy) / (n*Sxx - Sx*Sx)
/// intercept = (Sy - slope*Sx) / n
/// ```
///
/// The sums are accumulated exactly in `Decimal`; only the coefficients are
/// converted to `f64`. Datasets whose sums leave `Decimal`'s range are fitted
/// by [`fit_pairs`] instead.
pub fn fit_model(points: &[ProductDemandPoint]) -> RegressionResult<RegressionModel> {
    let first_price = match points.first() {
        Some(first) => first.price,
        None => return Err(RegressionError::EmptyDataset),
    };

    if points.iter().all(|p| p.price == first_price) {
        return Err(RegressionError::InsufficientVariance { distinct_prices: 1 });
    }

    if let Some(fit) = fit_exact(points) {
        return fit;
    }

    let pairs = points
        .iter()
        .map(|p| price_as_f64(p).map(|x| (x, p.total_units_sold as f64)))
        .collect::<RegressionResult<Vec<_>>>()?;

    fit_pairs(&pairs)
}

/// Closed-form fit in `Decimal`; `None` if any intermediate overflows
fn fit_exact(points: &[ProductDemandPoint]) -> Option<RegressionResult<RegressionModel>> {
    let n = Decimal::from(points.len() as i64);
    let (mut sx, mut sy, mut sxy, mut sxx) = (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
    for p in points {
        let y = Decimal::from(p.total_units_sold);
        sx = sx.checked_add(p.price)?;
        sy = sy.checked_add(y)?;
        sxy = sxy.checked_add(p.price.checked_mul(y)?)?;
        sxx = sxx.checked_add(p.price.checked_mul(p.price)?)?;
    }

    let denominator = n.checked_mul(sxx)?.checked_sub(sx.checked_mul(sx)?)?;
    if denominator.is_zero() {
        let distinct_prices = points.iter().map(|p| p.price).collect::<BTreeSet<_>>().len();
        return Some(Err(RegressionError::InsufficientVariance { distinct_prices }));
    }

    let numerator = n.checked_mul(sxy)?.checked_sub(sx.checked_mul(sy)?)?;
    let slope = numerator.checked_div(denominator)?;
    let intercept = sy.checked_sub(slope.checked_mul(sx)?)?.checked_div(n)?;

    Some(Ok(RegressionModel {
        slope: slope.to_f64()?,
        intercept: intercept.to_f64()?,
    }))
}

/// Fit OLS over raw `(x, y)` pairs.
///
/// Works on deviations from the means, which gives the same line as the
/// raw-sum formula without cancelling away the spread of large, close prices.
pub fn fit_pairs(pairs: &[(f64, f64)]) -> RegressionResult<RegressionModel> {
    let (first_x, _) = match pairs.first() {
        Some(first) => *first,
        None => return Err(RegressionError::EmptyDataset),
    };

    if pairs.iter().all(|(x, _)| *x == first_x) {
        return Err(RegressionError::InsufficientVariance { distinct_prices: 1 });
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut sxy, mut sxx) = (0.0_f64, 0.0_f64);
    for (x, y) in pairs {
        let dx = x - mean_x;
        sxy += dx * (y - mean_y);
        sxx += dx * dx;
    }

    if sxx == 0.0 || !sxx.is_finite() {
        return Err(RegressionError::InsufficientVariance {
            distinct_prices: count_distinct(pairs),
        });
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    if !slope.is_finite() || !intercept.is_finite() {
        return Err(RegressionError::InsufficientVariance {
            distinct_prices: count_distinct(pairs),
        });
    }

    Ok(RegressionModel { slope, intercept })
}

fn count_distinct(pairs: &[(f64, f64)]) -> usize {
    let mut xs: Vec<f64> = pairs.iter().map(|(x, _)| *x).collect();
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    xs.dedup();
    xs.len()
}

/// Per-product fitted values, highest prediction first (ties by product id)
pub fn regression_table(
    model: &RegressionModel,
    points: &[ProductDemandPoint],
) -> RegressionResult<Vec<RegressionRow>> {
    let mut rows = points
        .iter()
        .map(|p| {
            price_as_f64(p).map(|price| RegressionRow {
                product_id: p.product_id.clone(),
                price: p.price,
                total_units_sold: p.total_units_sold,
                predicted_units_sold: round2(model.predict(price)),
            })
        })
        .collect::<RegressionResult<Vec<_>>>()?;

    rows.sort_by(|a, b| {
        b.predicted_units_sold
            .partial_cmp(&a.predicted_units_sold)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    Ok(rows)
}
