//! Order repository for admin database operations.
//!
//! Every query joins the owner so listings can show who an order belongs
//! to without a second lookup.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use orderdesk_core::{OrderNumber, OrderStatus, UserId, VolumeType};

use super::RepositoryError;
use crate::models::order::{AdminOrder, OrderUpdate};

/// Filters applied to the order listing.
///
/// `status` and `volume_type` are exact stored-value matches, so an unknown
/// value matches nothing rather than erroring. `search` matches the order
/// name or the owner's username, case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct OrderFilters {
    pub status: Option<String>,
    pub volume_type: Option<String>,
    pub created_from: Option<NaiveDate>,
    pub created_to: Option<NaiveDate>,
    pub search: Option<String>,
}

impl OrderFilters {
    fn status(&self) -> Option<&str> {
        self.status.as_deref().filter(|s| !s.is_empty())
    }

    fn volume_type(&self) -> Option<&str> {
        self.volume_type.as_deref().filter(|s| !s.is_empty())
    }

    fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|term| format!("%{}%", escape_like(term)))
    }
}

/// Escape LIKE metacharacters in a user-supplied search term.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[derive(Debug, sqlx::FromRow)]
struct AdminOrderRow {
    order_number: i32,
    owner_id: i32,
    owner_username: String,
    created_at: DateTime<Utc>,
    status: String,
    name: String,
    volume_type: String,
    description: Option<String>,
    document: Option<String>,
    quantity: Option<i32>,
    ready_at: Option<DateTime<Utc>>,
}

impl TryFrom<AdminOrderRow> for AdminOrder {
    type Error = RepositoryError;

    fn try_from(row: AdminOrderRow) -> Result<Self, Self::Error> {
        let status = OrderStatus::from_str(&row.status).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid status in database: {e}"))
        })?;
        let volume_type = VolumeType::from_str(&row.volume_type).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid volume type in database: {e}"))
        })?;

        Ok(Self {
            order_number: OrderNumber::new(row.order_number),
            owner_id: UserId::new(row.owner_id),
            owner_username: row.owner_username,
            created_at: row.created_at,
            status,
            name: row.name,
            volume_type,
            description: row.description,
            document: row.document,
            quantity: row.quantity,
            ready_at: row.ready_at,
        })
    }
}

const ORDER_COLUMNS: &str = "o.order_number, o.owner_id, u.username AS owner_username, \
     o.created_at, o.status, o.name, o.volume_type, o.description, o.document, \
     o.quantity, o.ready_at";

const FILTER_CLAUSE: &str = "($1::text IS NULL OR o.status = $1)
       AND ($2::text IS NULL OR o.volume_type = $2)
       AND ($3::date IS NULL OR o.created_at >= $3)
       AND ($4::date IS NULL OR o.created_at < $4 + 1)
       AND ($5::text IS NULL OR o.name ILIKE $5 OR u.username ILIKE $5)";

/// The `ready_at` column is written by the statement itself: the first
/// update to `ready` stamps it, and it is never overwritten afterwards.
fn update_sql() -> String {
    format!(
        "UPDATE orders o
         SET name = $2, status = $3, description = $4, quantity = $5,
             ready_at = CASE WHEN $3 = 'ready' THEN COALESCE(o.ready_at, now())
                             ELSE o.ready_at END
         FROM users u
         WHERE o.order_number = $1 AND u.id = o.owner_id
         RETURNING {ORDER_COLUMNS}"
    )
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a page of orders matching the filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored enum value is invalid.
    pub async fn list_page(
        &self,
        filters: &OrderFilters,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AdminOrder>, RepositoryError> {
        let rows = sqlx::query_as::<_, AdminOrderRow>(&format!(
            "SELECT {ORDER_COLUMNS}
             FROM orders o JOIN users u ON u.id = o.owner_id
             WHERE {FILTER_CLAUSE}
             ORDER BY o.created_at DESC, o.order_number DESC
             LIMIT $6 OFFSET $7"
        ))
        .bind(filters.status())
        .bind(filters.volume_type())
        .bind(filters.created_from)
        .bind(filters.created_to)
        .bind(filters.search_pattern())
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(AdminOrder::try_from).collect()
    }

    /// Count the orders the filters would return.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, filters: &OrderFilters) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*)
             FROM orders o JOIN users u ON u.id = o.owner_id
             WHERE {FILTER_CLAUSE}"
        ))
        .bind(filters.status())
        .bind(filters.volume_type())
        .bind(filters.created_from)
        .bind(filters.created_to)
        .bind(filters.search_pattern())
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Get one order by number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored enum value is invalid.
    pub async fn get_by_number(
        &self,
        order_number: OrderNumber,
    ) -> Result<Option<AdminOrder>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminOrderRow>(&format!(
            "SELECT {ORDER_COLUMNS}
             FROM orders o JOIN users u ON u.id = o.owner_id
             WHERE o.order_number = $1"
        ))
        .bind(order_number.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(AdminOrder::try_from).transpose()
    }

    /// Apply an edit to an order.
    ///
    /// Writing `ready` stamps `ready_at` once; the stamp survives the status
    /// moving away from and back to `ready`. Done in the update statement
    /// itself, so there is no read-modify-write race.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    /// Returns `RepositoryError::DataCorruption` if a stored enum value is invalid.
    pub async fn update(
        &self,
        order_number: OrderNumber,
        update: &OrderUpdate,
    ) -> Result<AdminOrder, RepositoryError> {
        let row = sqlx::query_as::<_, AdminOrderRow>(&update_sql())
            .bind(order_number.as_i32())
            .bind(&update.name)
            .bind(update.status.as_str())
            .bind(update.description.as_deref())
            .bind(update.quantity)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        AdminOrder::try_from(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50% off_now\\"), "50\\% off\\_now\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_search_pattern_trims_and_wraps() {
        let filters = OrderFilters {
            search: Some("  report  ".to_owned()),
            ..OrderFilters::default()
        };
        assert_eq!(filters.search_pattern().as_deref(), Some("%report%"));

        let blank = OrderFilters {
            search: Some("   ".to_owned()),
            ..OrderFilters::default()
        };
        assert!(blank.search_pattern().is_none());
    }

    #[test]
    fn test_empty_filter_values_count_as_absent() {
        let filters = OrderFilters {
            status: Some(String::new()),
            volume_type: Some(String::new()),
            ..OrderFilters::default()
        };
        assert!(filters.status().is_none());
        assert!(filters.volume_type().is_none());
    }

    // ready_at must be stamped exactly once; the guard lives in the SQL.
    #[test]
    fn test_update_sql_latches_ready_at() {
        let sql = update_sql();
        assert!(sql.contains("COALESCE(o.ready_at, now())"));
        assert!(sql.contains("ELSE o.ready_at"));
    }

    #[test]
    fn test_row_with_bad_status_is_data_corruption() {
        let row = AdminOrderRow {
            order_number: 1,
            owner_id: 1,
            owner_username: "alice".to_owned(),
            created_at: Utc::now(),
            status: "shipped".to_owned(),
            name: "x".to_owned(),
            volume_type: "single".to_owned(),
            description: Some("d".to_owned()),
            document: None,
            quantity: None,
            ready_at: None,
        };
        assert!(matches!(
            AdminOrder::try_from(row),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
