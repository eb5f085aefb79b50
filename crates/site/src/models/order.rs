//! Order domain types.

use chrono::{DateTime, Utc};

use orderdesk_core::{OrderNumber, OrderStatus, UserId, VolumeType};

/// An order (domain type).
///
/// Exactly one of `description` / `document`+`quantity` is populated,
/// decided by `volume_type`. `document` is a path relative to the upload
/// root.
#[derive(Debug, Clone)]
pub struct Order {
    /// Auto-assigned order number, the external identifier.
    pub order_number: OrderNumber,
    /// The user who created the order; never reassigned.
    pub owner_id: UserId,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Display title.
    pub name: String,
    /// Discriminator deciding the conditional fields.
    pub volume_type: VolumeType,
    /// Free-text description (single orders only).
    pub description: Option<String>,
    /// Stored document path relative to the upload root (multiple orders only).
    pub document: Option<String>,
    /// Item count (multiple orders only).
    pub quantity: Option<i32>,
    /// When the order first became ready; set once, never overwritten.
    pub ready_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Base name of the stored document, for download headers and display.
    #[must_use]
    pub fn document_file_name(&self) -> Option<&str> {
        self.document
            .as_deref()
            .map(|path| path.rsplit('/').next().unwrap_or(path))
    }
}

/// Payload for creating an order.
///
/// The owner always comes from the authenticated requester; submitted form
/// data has no way to set it.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub owner_id: UserId,
    pub name: String,
    pub volume_type: VolumeType,
    pub description: Option<String>,
    pub document: Option<String>,
    pub quantity: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_with_document(document: Option<&str>) -> Order {
        Order {
            order_number: OrderNumber::new(1),
            owner_id: UserId::new(1),
            created_at: Utc::now(),
            status: OrderStatus::Created,
            name: "Parts".to_owned(),
            volume_type: VolumeType::Multiple,
            description: None,
            document: document.map(str::to_owned),
            quantity: Some(2),
            ready_at: None,
        }
    }

    #[test]
    fn test_document_file_name_strips_directories() {
        let order = order_with_document(Some("documents/7/parts_1724900000000.pdf"));
        assert_eq!(order.document_file_name(), Some("parts_1724900000000.pdf"));
    }

    #[test]
    fn test_document_file_name_none() {
        assert_eq!(order_with_document(None).document_file_name(), None);
    }
}
