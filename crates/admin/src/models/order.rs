//! Order model as seen by operators.

use chrono::{DateTime, Utc};
use orderdesk_core::{OrderNumber, OrderStatus, UserId, VolumeType};

/// An order joined with its owner's username.
///
/// Operators always see who an order belongs to, so the owner's username
/// rides along with every row instead of requiring a second lookup.
#[derive(Debug, Clone)]
pub struct AdminOrder {
    pub order_number: OrderNumber,
    pub owner_id: UserId,
    pub owner_username: String,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub name: String,
    pub volume_type: VolumeType,
    pub description: Option<String>,
    pub document: Option<String>,
    pub quantity: Option<i32>,
    pub ready_at: Option<DateTime<Utc>>,
}

/// The editable subset of an order.
///
/// The order number, owner, volume type and document are immutable through
/// the edit surface; `ready_at` is maintained by the update statement itself.
#[derive(Debug, Clone)]
pub struct OrderUpdate {
    pub name: String,
    pub status: OrderStatus,
    pub description: Option<String>,
    pub quantity: Option<i32>,
}
