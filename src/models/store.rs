use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Retail store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Store {
    pub store_id: String,
    pub store_name: String,
}
