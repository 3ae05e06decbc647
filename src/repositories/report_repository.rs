use crate::error::RepositoryError;
use crate::models::{
    CategoryUnits, MonthlyUnits, ProductClaims, ProductInfo, ProductUnits, Store, StoreUnits,
};
use sqlx::PgPool;

/// Read-only queries behind the dashboard pages.
///
/// Every user-selected value is passed as a bound parameter.
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    /// Create a new ReportRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Units sold per product category, largest first
    pub async fn units_by_category(&self) -> Result<Vec<CategoryUnits>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryUnits>(
            r#"
            SELECT c.category_name, SUM(s.quantity)::BIGINT AS total_units
            FROM products p
            JOIN category c ON p.category_id = c.category_id
            JOIN sales s ON s.product_id = p.product_id
            GROUP BY c.category_name
            ORDER BY total_units DESC, c.category_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Best selling stores by units sold
    pub async fn top_stores(&self, limit: i64) -> Result<Vec<StoreUnits>, RepositoryError> {
        let rows = sqlx::query_as::<_, StoreUnits>(
            r#"
            SELECT st.store_name, SUM(s.quantity)::BIGINT AS total_units
            FROM sales s
            JOIN stores st ON s.store_id = st.store_id
            GROUP BY st.store_name
            ORDER BY total_units DESC, st.store_name
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Warranty claims per product, products without claims included
    pub async fn claims_by_product(&self) -> Result<Vec<ProductClaims>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductClaims>(
            r#"
            SELECT p.product_name, COUNT(w.claim_id) AS claim_count
            FROM products p
            LEFT JOIN sales s ON s.product_id = p.product_id
            LEFT JOIN warranty w ON w.sale_id = s.sale_id
            GROUP BY p.product_name
            ORDER BY claim_count DESC, p.product_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Units sold per calendar month across all stores
    pub async fn monthly_units(&self) -> Result<Vec<MonthlyUnits>, RepositoryError> {
        let rows = sqlx::query_as::<_, MonthlyUnits>(
            r#"
            SELECT
                DATE_TRUNC('month', sale_date)::DATE AS month,
                SUM(quantity)::BIGINT AS total_units
            FROM sales
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// All stores ordered by name
    pub async fn list_stores(&self) -> Result<Vec<Store>, RepositoryError> {
        let rows = sqlx::query_as::<_, Store>(
            r#"
            SELECT store_id, store_name
            FROM stores
            ORDER BY store_name, store_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Find a store by its display name
    pub async fn find_store_by_name(&self, store_name: &str) -> Result<Option<Store>, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(
            r#"
            SELECT store_id, store_name
            FROM stores
            WHERE store_name = $1
            ORDER BY store_id
            LIMIT 1
            "#,
        )
        .bind(store_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(store)
    }

    /// Units sold by every store carrying this name (0 when it has no sales)
    pub async fn store_total_units(&self, store_name: &str) -> Result<i64, RepositoryError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(s.quantity), 0)::BIGINT
            FROM sales s
            JOIN stores st ON st.store_id = s.store_id
            WHERE st.store_name = $1
            "#,
        )
        .bind(store_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// Best selling products within one store
    pub async fn store_top_products(
        &self,
        store_name: &str,
        limit: i64,
    ) -> Result<Vec<ProductUnits>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductUnits>(
            r#"
            SELECT p.product_name, SUM(s.quantity)::BIGINT AS units_sold
            FROM sales s
            JOIN products p ON p.product_id = s.product_id
            JOIN stores st ON st.store_id = s.store_id
            WHERE st.store_name = $1
            GROUP BY p.product_name
            ORDER BY units_sold DESC, p.product_name
            LIMIT $2
            "#,
        )
        .bind(store_name)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Warranty claims filed against sales made in a store
    pub async fn store_warranty_claims(&self, store_name: &str) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM warranty w
            JOIN sales s ON s.sale_id = w.sale_id
            JOIN stores st ON st.store_id = s.store_id
            WHERE st.store_name = $1
            "#,
        )
        .bind(store_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// All products ordered by name
    pub async fn list_products(&self) -> Result<Vec<ProductInfo>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductInfo>(
            r#"
            SELECT product_id, product_name, price
            FROM products
            ORDER BY product_name, product_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Find a product by its display name
    pub async fn find_product_by_name(
        &self,
        product_name: &str,
    ) -> Result<Option<ProductInfo>, RepositoryError> {
        let product = sqlx::query_as::<_, ProductInfo>(
            r#"
            SELECT product_id, product_name, price
            FROM products
            WHERE product_name = $1
            ORDER BY product_id
            LIMIT 1
            "#,
        )
        .bind(product_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Units sold of one product (0 when it has no sales)
    pub async fn product_total_units(&self, product_id: &str) -> Result<i64, RepositoryError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(quantity), 0)::BIGINT
            FROM sales
            WHERE product_id = $1
            "#,
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// Warranty claims filed against sales of one product
    pub async fn product_warranty_claims(&self, product_id: &str) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM warranty w
            JOIN sales s ON s.sale_id = w.sale_id
            WHERE s.product_id = $1
            "#,
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Monthly units sold of one product
    pub async fn product_monthly_units(
        &self,
        product_id: &str,
    ) -> Result<Vec<MonthlyUnits>, RepositoryError> {
        let rows = sqlx::query_as::<_, MonthlyUnits>(
            r#"
            SELECT
                DATE_TRUNC('month', sale_date)::DATE AS month,
                SUM(quantity)::BIGINT AS total_units
            FROM sales
            WHERE product_id = $1
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
