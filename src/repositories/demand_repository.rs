use crate::error::RepositoryError;
use crate::models::ProductDemandPoint;
use sqlx::PgPool;

/// Read access to the data behind the price/demand regression
pub struct DemandRepository {
    pool: PgPool,
}

impl DemandRepository {
    /// Create a new DemandRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One demand point per product with at least one sale, aggregated in SQL
    pub async fn product_demand_points(&self) -> Result<Vec<ProductDemandPoint>, RepositoryError> {
        let points = sqlx::query_as::<_, ProductDemandPoint>(
            r#"
            SELECT
                p.product_id,
                p.price,
                SUM(s.quantity)::BIGINT AS total_units_sold
            FROM products p
            JOIN sales s ON s.product_id = p.product_id
            GROUP BY p.product_id, p.price
            ORDER BY p.product_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(points)
    }
}
