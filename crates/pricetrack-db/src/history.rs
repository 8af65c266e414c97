//! Operations on the `price_history` table.

use chrono::{DateTime, Duration, Utc};
use pricetrack_core::NormalizedRecord;
use sqlx::SqlitePool;

use crate::DbError;

/// A history row shaped for the external control surface: one observation
/// with the comparable price (unit price when known, shelf price otherwise).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HistoryRow {
    pub product_id: String,
    pub product_name: Option<String>,
    pub store: String,
    pub price: f64,
    pub standard_unit: Option<String>,
    pub captured_at: DateTime<Utc>,
}

/// Inserts one normalized price observation. Returns the new row id.
///
/// Not idempotent: callers must not save the same successful extraction
/// twice.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn save_price(pool: &SqlitePool, record: &NormalizedRecord) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO price_history (
            product_id, store, product_name, price, currency, stock,
            unit, quantity, unit_price, standard_unit, url, captured_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id",
    )
    .bind(&record.product_id)
    .bind(record.store.to_string())
    .bind(&record.product_name)
    .bind(record.price)
    .bind(&record.currency)
    .bind(record.stock.to_string())
    .bind(record.unit.as_deref())
    .bind(record.quantity)
    .bind(record.unit_price)
    .bind(record.standard_unit.to_string())
    .bind(&record.url)
    .bind(record.captured_at)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Most recent stored shelf price for a product, used for change detection.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_last_price(
    pool: &SqlitePool,
    product_id: &str,
) -> Result<Option<f64>, DbError> {
    let price = sqlx::query_scalar::<_, f64>(
        "SELECT price FROM price_history
         WHERE product_id = ?
         ORDER BY captured_at DESC, id DESC
         LIMIT 1",
    )
    .bind(product_id)
    .fetch_optional(pool)
    .await?;

    Ok(price)
}

/// History rows from the last `days` days (all history when `None`), newest
/// first per product. Read-only; consumed by the control surface.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn recent_history(
    pool: &SqlitePool,
    days: Option<i64>,
) -> Result<Vec<HistoryRow>, DbError> {
    let cutoff = days.map(|d| Utc::now() - Duration::days(d));

    let rows = match cutoff {
        Some(cutoff) => {
            sqlx::query_as::<_, HistoryRow>(
                "SELECT product_id, product_name, store,
                        COALESCE(unit_price, price) AS price,
                        standard_unit, captured_at
                 FROM price_history
                 WHERE captured_at >= ?
                 ORDER BY product_id, captured_at DESC",
            )
            .bind(cutoff)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, HistoryRow>(
                "SELECT product_id, product_name, store,
                        COALESCE(unit_price, price) AS price,
                        standard_unit, captured_at
                 FROM price_history
                 ORDER BY product_id, captured_at DESC",
            )
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows)
}
