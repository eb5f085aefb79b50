//! Order repository for database operations.
//!
//! List and detail lookups are scoped through [`OrderScope`]: a non-superuser
//! viewer only ever queries their own rows, so a foreign order number behaves
//! exactly like a missing one. The download path deliberately bypasses the
//! scope (see `routes::download`).

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use orderdesk_core::{OrderNumber, OrderStatus, UserId, VolumeType};

use super::RepositoryError;
use crate::models::order::{NewOrder, Order};
use crate::models::session::CurrentUser;

/// Visibility scope for order queries.
///
/// Built from the requesting user, never from submitted data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    /// All orders (superusers).
    All,
    /// Orders owned by one user.
    Owner(UserId),
}

impl OrderScope {
    /// The scope a given viewer is allowed to query.
    #[must_use]
    pub const fn for_viewer(viewer: &CurrentUser) -> Self {
        if viewer.is_superuser {
            Self::All
        } else {
            Self::Owner(viewer.id)
        }
    }

    /// The owner filter to bind, if any.
    const fn owner_filter(self) -> Option<i32> {
        match self {
            Self::All => None,
            Self::Owner(id) => Some(id.as_i32()),
        }
    }
}

/// Database row for an order.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    order_number: i32,
    owner_id: i32,
    created_at: DateTime<Utc>,
    status: String,
    name: String,
    volume_type: String,
    description: Option<String>,
    document: Option<String>,
    quantity: Option<i32>,
    ready_at: Option<DateTime<Utc>>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status: OrderStatus = row.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid status in database: {e}"))
        })?;
        let volume_type: VolumeType = row.volume_type.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid volume type in database: {e}"))
        })?;

        Ok(Self {
            order_number: OrderNumber::new(row.order_number),
            owner_id: UserId::new(row.owner_id),
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

const ORDER_COLUMNS: &str = "order_number, owner_id, created_at, status, name, \
     volume_type, description, document, quantity, ready_at";

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

    /// List a page of orders, newest first.
    ///
    /// `status` is an exact stored-value match; a value outside the status
    /// vocabulary matches nothing (mirroring an exact-filter semantics rather
    /// than erroring).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored enum value is invalid.
    pub async fn list_page(
        &self,
        scope: OrderScope,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE ($1::int4 IS NULL OR owner_id = $1)
               AND ($2::text IS NULL OR status = $2)
             ORDER BY created_at DESC, order_number DESC
             LIMIT $3 OFFSET $4"
        ))
        .bind(scope.owner_filter())
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    /// Count the orders the scope and status filter would return.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(
        &self,
        scope: OrderScope,
        status: Option<&str>,
    ) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM orders
             WHERE ($1::int4 IS NULL OR owner_id = $1)
               AND ($2::text IS NULL OR status = $2)",
        )
        .bind(scope.owner_filter())
        .bind(status)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Get one order within the viewer's scope.
    ///
    /// A foreign order number returns `None` for a scoped viewer - the same
    /// answer as a nonexistent one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored enum value is invalid.
    pub async fn get_scoped(
        &self,
        scope: OrderScope,
        order_number: OrderNumber,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE order_number = $1
               AND ($2::int4 IS NULL OR owner_id = $2)"
        ))
        .bind(order_number.as_i32())
        .bind(scope.owner_filter())
        .fetch_optional(self.pool)
        .await?;

        row.map(Order::try_from).transpose()
    }

    /// Get one order by number, without ownership scoping.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored enum value is invalid.
    pub async fn get_by_number(
        &self,
        order_number: OrderNumber,
    ) -> Result<Option<Order>, RepositoryError> {
        self.get_scoped(OrderScope::All, order_number).await
    }

    /// Create a new order with the default `created` status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new_order: &NewOrder) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO orders (owner_id, name, volume_type, description, document, quantity)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(new_order.owner_id.as_i32())
        .bind(&new_order.name)
        .bind(new_order.volume_type.as_str())
        .bind(new_order.description.as_deref())
        .bind(new_order.document.as_deref())
        .bind(new_order.quantity)
        .fetch_one(self.pool)
        .await?;

        Order::try_from(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewer(id: i32, is_superuser: bool) -> CurrentUser {
        CurrentUser {
            id: UserId::new(id),
            username: "alice".to_owned(),
            is_superuser,
        }
    }

    #[test]
    fn test_scope_for_regular_user_is_owner() {
        let scope = OrderScope::for_viewer(&viewer(3, false));
        assert_eq!(scope, OrderScope::Owner(UserId::new(3)));
        assert_eq!(scope.owner_filter(), Some(3));
    }

    #[test]
    fn test_scope_for_superuser_is_all() {
        let scope = OrderScope::for_viewer(&viewer(3, true));
        assert_eq!(scope, OrderScope::All);
        assert_eq!(scope.owner_filter(), None);
    }

    #[test]
    fn test_row_conversion_rejects_bad_status() {
        let row = OrderRow {
            order_number: 1,
            owner_id: 1,
            created_at: Utc::now(),
            status: "shipped".to_owned(),
            name: "Order".to_owned(),
            volume_type: "single".to_owned(),
            description: Some("text".to_owned()),
            document: None,
            quantity: None,
            ready_at: None,
        };
        assert!(matches!(
            Order::try_from(row),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
