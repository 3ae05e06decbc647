#![allow(dead_code)]

use sales_dashboard::models::{Product, SaleQuantity};
use sales_dashboard::DashboardState;
use sqlx::PgPool;

/// Test database configuration
pub struct TestDatabase {
    pub pool: PgPool,
    pub state: DashboardState,
}

impl TestDatabase {
    /// Create TestDatabase from an existing pool (useful with sqlx::test)
    pub async fn from_pool(pool: PgPool) -> Self {
        Self {
            pool: pool.clone(),
            state: DashboardState::new(pool, 10),
        }
    }

    /// Clean up all test data
    pub async fn cleanup(&self) {
        sqlx::query("TRUNCATE TABLE warranty, sales, stores, products, category CASCADE")
            .execute(&self.pool)
            .await
            .expect("Failed to cleanup test data");
    }
}

pub async fn insert_category(db: &TestDatabase, category_id: &str, name: &str) {
    sqlx::query("INSERT INTO category (category_id, category_name) VALUES ($1, $2)")
        .bind(category_id)
        .bind(name)
        .execute(&db.pool)
        .await
        .expect("Failed to insert category");
}

pub async fn insert_product(
    db: &TestDatabase,
    product_id: &str,
    name: &str,
    category_id: &str,
    price: i64,
) {
    sqlx::query(
        "INSERT INTO products (product_id, product_name, category_id, price) VALUES ($1, $2, $3, $4)",
    )
    .bind(product_id)
    .bind(name)
    .bind(category_id)
    .bind(rust_decimal::Decimal::new(price, 0))
    .execute(&db.pool)
    .await
    .expect("Failed to insert product");
}

pub async fn insert_store(db: &TestDatabase, store_id: &str, name: &str) {
    sqlx::query("INSERT INTO stores (store_id, store_name) VALUES ($1, $2)")
        .bind(store_id)
        .bind(name)
        .execute(&db.pool)
        .await
        .expect("Failed to insert store");
}

pub async fn insert_sale(
    db: &TestDatabase,
    sale_id: &str,
    sale_date: &str,
    store_id: &str,
    product_id: &str,
    quantity: i32,
) {
    let date = chrono::NaiveDate::parse_from_str(sale_date, "%Y-%m-%d").expect("bad date");
    sqlx::query(
        "INSERT INTO sales (sale_id, sale_date, store_id, product_id, quantity) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(sale_id)
    .bind(date)
    .bind(store_id)
    .bind(product_id)
    .bind(quantity)
    .execute(&db.pool)
    .await
    .expect("Failed to insert sale");
}

pub async fn insert_claim(db: &TestDatabase, claim_id: &str, sale_id: &str) {
    sqlx::query("INSERT INTO warranty (claim_id, sale_id, repair_status) VALUES ($1, $2, 'Pending')")
        .bind(claim_id)
        .bind(sale_id)
        .execute(&db.pool)
        .await
        .expect("Failed to insert warranty claim");
}

/// Seed a small ledger whose demand follows `units = -0.2 * price + 70`.
///
/// | product | price | units | claims |
/// |---------|-------|-------|--------|
/// | P-1     | 100   | 50    | 1      |
/// | P-2     | 200   | 30    | 2      |
/// | P-3     | 300   | 10    | 0      |
/// | P-4     | 150   | -     | 0      |
pub async fn seed_sales(db: &TestDatabase) {
    insert_category(db, "CAT-1", "Smartphone").await;
    insert_category(db, "CAT-2", "Audio").await;
    insert_category(db, "CAT-3", "Accessories").await;

    insert_product(db, "P-1", "iPhone 15", "CAT-1", 100).await;
    insert_product(db, "P-2", "AirPods Pro", "CAT-2", 200).await;
    insert_product(db, "P-3", "MagSafe Charger", "CAT-3", 300).await;
    insert_product(db, "P-4", "Apple Pencil", "CAT-3", 150).await;

    insert_store(db, "ST-1", "Apple Fifth Avenue").await;
    insert_store(db, "ST-2", "Apple Regent Street").await;
    insert_store(db, "ST-3", "Apple O'Connell St").await;

    insert_sale(db, "S-1", "2024-01-05", "ST-1", "P-1", 20).await;
    insert_sale(db, "S-2", "2024-01-20", "ST-2", "P-1", 30).await;
    insert_sale(db, "S-3", "2024-02-03", "ST-1", "P-2", 25).await;
    insert_sale(db, "S-4", "2024-02-14", "ST-2", "P-2", 5).await;
    insert_sale(db, "S-5", "2024-03-09", "ST-1", "P-3", 10).await;

    insert_claim(db, "W-1", "S-1").await;
    insert_claim(db, "W-2", "S-3").await;
    insert_claim(db, "W-3", "S-4").await;
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {} but got {}",
        expected,
        actual
    );
}

/// Full product catalog, for checking the SQL aggregation against the in-memory one
pub async fn load_catalog(db: &TestDatabase) -> Vec<Product> {
    sqlx::query_as::<_, Product>(
        "SELECT product_id, product_name, category_id, price FROM products ORDER BY product_id",
    )
    .fetch_all(&db.pool)
    .await
    .expect("Failed to load catalog")
}

/// Quantity of every sales row
pub async fn load_sale_quantities(db: &TestDatabase) -> Vec<SaleQuantity> {
    sqlx::query_as::<_, SaleQuantity>("SELECT product_id, quantity FROM sales")
        .fetch_all(&db.pool)
        .await
        .expect("Failed to load sales")
}
