//! Order listing and editing handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use orderdesk_core::{
    OrderNumber, OrderStatus, VolumeType,
    form::{self, OrderInput, ValidationErrors},
};

use crate::{
    db::orders::{OrderFilters, OrderRepository},
    error::{AppError, Result},
    middleware::RequireOperator,
    models::{AdminOrder, CurrentOperator, OrderUpdate},
    state::AppState,
};

/// Orders shown per list page.
const PAGE_SIZE: i64 = 25;

/// One `<option>` in a select control.
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// One row of the order list.
pub struct OrderRowView {
    pub number: i32,
    pub owner_username: String,
    pub name: String,
    pub status: &'static str,
    pub volume_type: &'static str,
    pub created_at: String,
    pub ready_at: String,
}

impl From<AdminOrder> for OrderRowView {
    fn from(order: AdminOrder) -> Self {
        Self {
            number: order.order_number.as_i32(),
            owner_username: order.owner_username,
            name: order.name,
            status: order.status.label(),
            volume_type: order.volume_type.label(),
            created_at: format_timestamp(order.created_at),
            ready_at: order
                .ready_at
                .map_or_else(|| "-".to_owned(), format_timestamp),
        }
    }
}

/// Order list template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub operator: CurrentOperator,
    pub orders: Vec<OrderRowView>,
    pub status_options: Vec<SelectOption>,
    pub volume_options: Vec<SelectOption>,
    pub created_from: String,
    pub created_to: String,
    pub search: String,
    pub page: i64,
    pub total_pages: i64,
    pub total: i64,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev_page: i64,
    pub next_page: i64,
    pub preserve_params: String,
}

/// Raw field values echoed back by the edit form.
#[derive(Debug, Default, Clone)]
pub struct EditFormValues {
    pub name: String,
    pub status: String,
    pub description: String,
    pub quantity: String,
}

/// Order edit template.
///
/// The order number, owner, creation time, volume type and document are
/// shown read-only; only name, status and the volume-dependent field are
/// writable.
#[derive(Template, WebTemplate)]
#[template(path = "orders/edit.html")]
pub struct OrderEditTemplate {
    pub operator: CurrentOperator,
    pub number: i32,
    pub owner_username: String,
    pub created_at: String,
    pub ready_at: String,
    pub volume_type: &'static str,
    pub document_name: Option<String>,
    pub is_single: bool,
    pub values: EditFormValues,
    pub errors: ValidationErrors,
    pub status_options: Vec<SelectOption>,
}

#[derive(Deserialize)]
pub struct OrdersQuery {
    pub status: Option<String>,
    pub volume_type: Option<String>,
    pub created_from: Option<String>,
    pub created_to: Option<String>,
    pub q: Option<String>,
    pub page: Option<i64>,
}

#[derive(Deserialize)]
pub struct EditForm {
    name: String,
    status: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    quantity: String,
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

/// Number of pages needed for `total` rows; an empty set still has one page.
fn page_count(total: i64) -> i64 {
    if total <= 0 { 1 } else { (total - 1) / PAGE_SIZE + 1 }
}

/// Parse a date filter field; junk input counts as no filter.
fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

fn status_options(selected: &str) -> Vec<SelectOption> {
    OrderStatus::ALL
        .iter()
        .map(|status| SelectOption {
            value: status.as_str(),
            label: status.label(),
            selected: status.as_str() == selected,
        })
        .collect()
}

fn volume_options(selected: &str) -> Vec<SelectOption> {
    VolumeType::ALL
        .iter()
        .map(|volume| SelectOption {
            value: volume.as_str(),
            label: volume.label(),
            selected: volume.as_str() == selected,
        })
        .collect()
}

/// Query-string fragment that keeps the active filters across page links.
fn preserve_params(query: &OrdersQuery) -> String {
    let mut params = String::new();
    for (key, value) in [
        ("status", query.status.as_deref()),
        ("volume_type", query.volume_type.as_deref()),
        ("created_from", query.created_from.as_deref()),
        ("created_to", query.created_to.as_deref()),
        ("q", query.q.as_deref()),
    ] {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            params.push_str("&amp;");
            params.push_str(key);
            params.push('=');
            // Filters are exact values or search text; escape the few
            // characters that would break the query string.
            for c in value.chars() {
                match c {
                    '&' => params.push_str("%26"),
                    '=' => params.push_str("%3D"),
                    '+' => params.push_str("%2B"),
                    '#' => params.push_str("%23"),
                    ' ' => params.push_str("%20"),
                    _ => params.push(c),
                }
            }
        }
    }
    params
}

fn edit_page_template(
    operator: CurrentOperator,
    order: &AdminOrder,
    values: EditFormValues,
    errors: ValidationErrors,
) -> OrderEditTemplate {
    OrderEditTemplate {
        operator,
        number: order.order_number.as_i32(),
        owner_username: order.owner_username.clone(),
        created_at: format_timestamp(order.created_at),
        ready_at: order
            .ready_at
            .map_or_else(|| "-".to_owned(), format_timestamp),
        volume_type: order.volume_type.label(),
        document_name: order
            .document
            .as_deref()
            .and_then(|path| path.rsplit('/').next())
            .map(str::to_owned),
        is_single: order.volume_type == VolumeType::Single,
        status_options: status_options(&values.status),
        values,
        errors,
    }
}

/// `GET /orders` - every order in the system, filterable.
pub async fn index(
    RequireOperator(operator): RequireOperator,
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Result<OrdersIndexTemplate> {
    let repo = OrderRepository::new(state.pool());

    let filters = OrderFilters {
        status: query.status.clone(),
        volume_type: query.volume_type.clone(),
        created_from: parse_date(query.created_from.as_deref()),
        created_to: parse_date(query.created_to.as_deref()),
        search: query.q.clone(),
    };

    let page = query.page.unwrap_or(1).max(1);
    let total = repo.count(&filters).await?;
    let total_pages = page_count(total);
    let offset = (page - 1) * PAGE_SIZE;

    let orders = repo
        .list_page(&filters, PAGE_SIZE, offset)
        .await?
        .into_iter()
        .map(OrderRowView::from)
        .collect();

    Ok(OrdersIndexTemplate {
        operator,
        orders,
        status_options: status_options(query.status.as_deref().unwrap_or_default()),
        volume_options: volume_options(query.volume_type.as_deref().unwrap_or_default()),
        created_from: query.created_from.clone().unwrap_or_default(),
        created_to: query.created_to.clone().unwrap_or_default(),
        search: query.q.clone().unwrap_or_default(),
        page,
        total_pages,
        total,
        has_prev: page > 1,
        has_next: page < total_pages,
        prev_page: page - 1,
        next_page: page + 1,
        preserve_params: preserve_params(&query),
    })
}

/// `GET /orders/{order_number}/edit` - the edit form, prefilled from the order.
pub async fn edit_page(
    RequireOperator(operator): RequireOperator,
    State(state): State<AppState>,
    Path(order_number): Path<i32>,
) -> Result<OrderEditTemplate> {
    let order = OrderRepository::new(state.pool())
        .get_by_number(OrderNumber::new(order_number))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {order_number}")))?;

    let values = EditFormValues {
        name: order.name.clone(),
        status: order.status.as_str().to_owned(),
        description: order.description.clone().unwrap_or_default(),
        quantity: order.quantity.map(|q| q.to_string()).unwrap_or_default(),
    };

    Ok(edit_page_template(
        operator,
        &order,
        values,
        ValidationErrors::new(),
    ))
}

/// `POST /orders/{order_number}/edit` - validate and apply an edit.
///
/// The volume type comes from the stored order, not the submission, so the
/// single/multiple rules stay anchored to what the order is. An invalid
/// submission re-renders the form with all violations reported at once.
pub async fn edit(
    RequireOperator(operator): RequireOperator,
    State(state): State<AppState>,
    Path(order_number): Path<i32>,
    Form(form): Form<EditForm>,
) -> Result<Response> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get_by_number(OrderNumber::new(order_number))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {order_number}")))?;

    let input = OrderInput {
        name: form.name.clone(),
        volume_type: order.volume_type.as_str().to_owned(),
        description: form.description.clone(),
        // The stored document stands in for the (non-editable) upload.
        document: order.document.clone(),
        quantity: form.quantity.clone(),
    };

    let (validated, mut errors) = match form::validate(&input) {
        Ok(valid) => (Some(valid), ValidationErrors::new()),
        Err(errors) => (None, errors),
    };

    let status = match form.status.parse::<OrderStatus>() {
        Ok(status) => Some(status),
        Err(_) => {
            errors.add_field("status", "Select a valid status.");
            None
        }
    };

    if let (Some(valid), Some(status), true) = (validated, status, errors.is_empty()) {
        let updated = repo
            .update(
                order.order_number,
                &OrderUpdate {
                    name: valid.name,
                    status,
                    description: valid.description,
                    quantity: valid.quantity,
                },
            )
            .await?;

        tracing::info!(
            order_number = %updated.order_number,
            status = %updated.status,
            "order updated"
        );
        return Ok(Redirect::to("/orders").into_response());
    }

    let values = EditFormValues {
        name: form.name,
        status: form.status,
        description: form.description,
        quantity: form.quantity,
    };
    Ok(edit_page_template(operator, &order, values, errors).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderdesk_core::UserId;

    fn operator() -> CurrentOperator {
        CurrentOperator {
            id: UserId::new(1),
            username: "ops".to_owned(),
        }
    }

    fn single_order() -> AdminOrder {
        AdminOrder {
            order_number: OrderNumber::new(7),
            owner_id: UserId::new(3),
            owner_username: "alice".to_owned(),
            created_at: "2026-08-01T09:30:00Z".parse().unwrap(),
            status: OrderStatus::Created,
            name: "Thesis print".to_owned(),
            volume_type: VolumeType::Single,
            description: Some("Hardcover, A4".to_owned()),
            document: None,
            quantity: None,
            ready_at: None,
        }
    }

    #[test]
    fn test_parse_date_ignores_junk() {
        assert_eq!(
            parse_date(Some("2026-08-01")),
            Some(NaiveDate::from_ymd_opt(2026, 8, 1).unwrap())
        );
        assert!(parse_date(Some("not-a-date")).is_none());
        assert!(parse_date(Some("")).is_none());
        assert!(parse_date(None).is_none());
    }

    #[test]
    fn test_page_count_rounds_up() {
        assert_eq!(page_count(0), 1);
        assert_eq!(page_count(PAGE_SIZE), 1);
        assert_eq!(page_count(PAGE_SIZE + 1), 2);
    }

    #[test]
    fn test_preserve_params_keeps_active_filters() {
        let query = OrdersQuery {
            status: Some("ready".to_owned()),
            volume_type: None,
            created_from: Some("2026-08-01".to_owned()),
            created_to: None,
            q: Some("annual report".to_owned()),
            page: Some(2),
        };
        let params = preserve_params(&query);
        assert_eq!(
            params,
            "&amp;status=ready&amp;created_from=2026-08-01&amp;q=annual%20report"
        );
    }

    #[test]
    fn test_edit_template_shows_readonly_fields() {
        let order = single_order();
        let values = EditFormValues {
            name: order.name.clone(),
            status: order.status.as_str().to_owned(),
            description: order.description.clone().unwrap_or_default(),
            quantity: String::new(),
        };
        let html = edit_page_template(operator(), &order, values, ValidationErrors::new())
            .render()
            .unwrap();

        assert!(html.contains("Order 7"));
        assert!(html.contains("alice"));
        assert!(html.contains("Hardcover, A4"));
        // Single orders edit the description, not the quantity.
        assert!(html.contains("name=\"description\""));
        assert!(!html.contains("name=\"quantity\""));
    }

    #[test]
    fn test_edit_template_shows_errors() {
        let order = single_order();
        let mut errors = ValidationErrors::new();
        errors.add_field("name", "Name is required.");
        errors.add_field("status", "Select a valid status.");

        let html = edit_page_template(
            operator(),
            &order,
            EditFormValues::default(),
            errors,
        )
        .render()
        .unwrap();

        assert!(html.contains("Name is required."));
        assert!(html.contains("Select a valid status."));
    }
}
