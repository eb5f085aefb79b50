//! Order list, creation and detail handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, Query, State, multipart::MultipartError},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use orderdesk_core::{
    OrderNumber, OrderStatus, VolumeType,
    form::{self, OrderInput, ValidationErrors},
};

use crate::{
    db::orders::{OrderRepository, OrderScope},
    error::{AppError, Result},
    middleware::RequireAuth,
    models::{CurrentUser, NewOrder, Order},
    state::AppState,
};

/// Orders shown per list page.
const PAGE_SIZE: i64 = 10;

/// One `<option>` in a select control.
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// One row of the order list.
pub struct OrderView {
    pub number: i32,
    pub name: String,
    pub status: &'static str,
    pub volume_type: &'static str,
    pub created_at: String,
    pub ready_at: String,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        Self {
            number: order.order_number.as_i32(),
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
#[template(path = "orders/list.html")]
pub struct OrderListTemplate {
    pub current_user: CurrentUser,
    pub orders: Vec<OrderView>,
    pub statuses: Vec<SelectOption>,
    pub status_filter: String,
    pub page: i64,
    pub total_pages: i64,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev_page: i64,
    pub next_page: i64,
}

/// Raw field values echoed back by the order form.
#[derive(Debug, Default, Clone)]
pub struct OrderFormValues {
    pub name: String,
    pub volume_type: String,
    pub description: String,
    pub quantity: String,
}

/// Order form template, used for both the blank form and re-renders
/// after a failed submission.
#[derive(Template, WebTemplate)]
#[template(path = "orders/form.html")]
pub struct OrderFormTemplate {
    pub current_user: CurrentUser,
    pub values: OrderFormValues,
    pub errors: ValidationErrors,
    pub volume_options: Vec<SelectOption>,
    pub show_description: bool,
    pub show_document: bool,
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/detail.html")]
pub struct OrderDetailTemplate {
    pub current_user: CurrentUser,
    pub order: OrderDetail,
}

/// Detail view of a single order.
pub struct OrderDetail {
    pub number: i32,
    pub name: String,
    pub status: &'static str,
    pub volume_type: &'static str,
    pub description: Option<String>,
    pub document_name: Option<String>,
    pub quantity: Option<i32>,
    pub created_at: String,
    pub ready_at: Option<String>,
}

impl From<Order> for OrderDetail {
    fn from(order: Order) -> Self {
        Self {
            number: order.order_number.as_i32(),
            document_name: order.document_file_name().map(str::to_owned),
            name: order.name,
            status: order.status.label(),
            volume_type: order.volume_type.label(),
            description: order.description,
            quantity: order.quantity,
            created_at: format_timestamp(order.created_at),
            ready_at: order.ready_at.map(format_timestamp),
        }
    }
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub page: Option<i64>,
}

#[derive(Deserialize)]
pub struct NewQuery {
    pub volume_type: Option<String>,
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

/// Number of pages needed for `total` rows; an empty set still has one page.
fn page_count(total: i64) -> i64 {
    if total <= 0 { 1 } else { (total - 1) / PAGE_SIZE + 1 }
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

fn form_page(
    current_user: CurrentUser,
    values: OrderFormValues,
    errors: ValidationErrors,
    resolved: Option<VolumeType>,
) -> OrderFormTemplate {
    let volume_options = VolumeType::ALL
        .iter()
        .map(|volume| SelectOption {
            value: volume.as_str(),
            label: volume.label(),
            selected: volume.as_str() == values.volume_type,
        })
        .collect();

    OrderFormTemplate {
        current_user,
        show_description: resolved == Some(VolumeType::Single),
        show_document: resolved == Some(VolumeType::Multiple),
        values,
        errors,
        volume_options,
    }
}

fn multipart_err(err: MultipartError) -> AppError {
    AppError::BadRequest(err.to_string())
}

/// `GET /orders/` - the viewer's orders, newest first, ten per page.
///
/// Regular users see only their own orders; superusers see everyone's.
/// `?status=` filters by exact stored value, so an unknown value simply
/// matches nothing.
pub async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<OrderListTemplate> {
    let repo = OrderRepository::new(state.pool());
    let scope = OrderScope::for_viewer(&user);

    let status_filter = query.status.unwrap_or_default();
    let status = Some(status_filter.as_str()).filter(|s| !s.is_empty());

    let page = query.page.unwrap_or(1).max(1);
    let total = repo.count(scope, status).await?;
    let total_pages = page_count(total);
    let offset = (page - 1) * PAGE_SIZE;

    let orders = repo
        .list_page(scope, status, PAGE_SIZE, offset)
        .await?
        .into_iter()
        .map(OrderView::from)
        .collect();

    Ok(OrderListTemplate {
        current_user: user,
        orders,
        statuses: status_options(&status_filter),
        status_filter,
        page,
        total_pages,
        has_prev: page > 1,
        has_next: page < total_pages,
        prev_page: page - 1,
        next_page: page + 1,
    })
}

/// `GET /orders/new/` - the blank order form.
///
/// `?volume_type=` preselects the order type, which controls whether the
/// description or the document and quantity fields are shown.
pub async fn new(
    RequireAuth(user): RequireAuth,
    Query(query): Query<NewQuery>,
) -> OrderFormTemplate {
    let initial: Option<VolumeType> = query.volume_type.as_deref().and_then(|v| v.parse().ok());
    let resolved = form::resolve_volume_type(None, initial, None);

    let values = OrderFormValues {
        volume_type: initial.map(|v| v.as_str().to_owned()).unwrap_or_default(),
        ..OrderFormValues::default()
    };

    form_page(user, values, ValidationErrors::new(), resolved)
}

/// `POST /orders/new/` - validate a multipart submission and create the order.
///
/// A valid submission stores the document (multiple-volume orders only) and
/// redirects to the list. An invalid one re-renders the form with every
/// violated rule reported at once and the typed values preserved; a file
/// selection is not preserved across the re-render.
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response> {
    let mut values = OrderFormValues::default();
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_err)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        match name.as_str() {
            "name" => values.name = field.text().await.map_err(multipart_err)?,
            "volume_type" => values.volume_type = field.text().await.map_err(multipart_err)?,
            "description" => values.description = field.text().await.map_err(multipart_err)?,
            "quantity" => values.quantity = field.text().await.map_err(multipart_err)?,
            "document" => {
                let file_name = field.file_name().map(str::to_owned);
                let bytes = field.bytes().await.map_err(multipart_err)?;
                if let Some(file_name) = file_name {
                    // Browsers send an empty part when no file is chosen.
                    if !file_name.is_empty() && !bytes.is_empty() {
                        upload = Some((file_name, bytes.to_vec()));
                    }
                }
            }
            _ => {}
        }
    }

    let input = OrderInput {
        name: values.name.clone(),
        volume_type: values.volume_type.clone(),
        description: values.description.clone(),
        document: upload.as_ref().map(|(file_name, _)| file_name.clone()),
        quantity: values.quantity.clone(),
    };

    match form::validate(&input) {
        Ok(valid) => {
            let document = match (valid.volume_type, upload) {
                (VolumeType::Multiple, Some((file_name, bytes))) => Some(
                    state
                        .documents()
                        .save(user.id, &file_name, &bytes)
                        .await?,
                ),
                _ => None,
            };

            let order = OrderRepository::new(state.pool())
                .create(&NewOrder {
                    owner_id: user.id,
                    name: valid.name,
                    volume_type: valid.volume_type,
                    description: valid.description,
                    document,
                    quantity: valid.quantity,
                })
                .await?;

            tracing::info!(order_number = %order.order_number, "order created");
            Ok(Redirect::to("/orders/").into_response())
        }
        Err(errors) => {
            let resolved = form::resolve_volume_type(Some(&values.volume_type), None, None);
            Ok(form_page(user, values, errors, resolved).into_response())
        }
    }
}

/// `GET /orders/{order_number}/` - one order, scoped to the viewer.
///
/// Another user's order number answers 404, the same as a nonexistent one.
pub async fn detail(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(order_number): Path<i32>,
) -> Result<OrderDetailTemplate> {
    let order = OrderRepository::new(state.pool())
        .get_scoped(OrderScope::for_viewer(&user), OrderNumber::new(order_number))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {order_number}")))?;

    Ok(OrderDetailTemplate {
        current_user: user,
        order: OrderDetail::from(order),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderdesk_core::UserId;

    fn viewer() -> CurrentUser {
        CurrentUser {
            id: UserId::new(1),
            username: "alice".to_owned(),
            is_superuser: false,
        }
    }

    fn sample_order() -> Order {
        Order {
            order_number: OrderNumber::new(42),
            owner_id: UserId::new(1),
            created_at: "2026-08-01T09:30:00Z".parse().unwrap(),
            status: OrderStatus::Processing,
            name: "Annual report".to_owned(),
            volume_type: VolumeType::Multiple,
            description: None,
            document: Some("documents/1/report_1724900000000.pdf".to_owned()),
            quantity: Some(25),
            ready_at: None,
        }
    }

    #[test]
    fn test_order_view_formats_timestamps() {
        let view = OrderView::from(sample_order());
        assert_eq!(view.created_at, "2026-08-01 09:30");
        assert_eq!(view.ready_at, "-");
        assert_eq!(view.status, "Processing");
    }

    #[test]
    fn test_detail_view_exposes_file_name_only() {
        let detail = OrderDetail::from(sample_order());
        assert_eq!(detail.document_name.as_deref(), Some("report_1724900000000.pdf"));
        assert_eq!(detail.quantity, Some(25));
        assert!(detail.description.is_none());
    }

    #[test]
    fn test_page_count_rounds_up() {
        assert_eq!(page_count(0), 1);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(PAGE_SIZE), 1);
        assert_eq!(page_count(PAGE_SIZE + 1), 2);
        assert_eq!(page_count(3 * PAGE_SIZE), 3);
    }

    #[test]
    fn test_status_options_mark_selection() {
        let options = status_options("ready");
        assert_eq!(options.len(), 5);
        let selected: Vec<_> = options.iter().filter(|o| o.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].value, "ready");

        let none_selected = status_options("bogus");
        assert!(none_selected.iter().all(|o| !o.selected));
    }

    #[test]
    fn test_list_template_renders_rows() {
        let page = OrderListTemplate {
            current_user: viewer(),
            orders: vec![OrderView::from(sample_order())],
            statuses: status_options(""),
            status_filter: String::new(),
            page: 1,
            total_pages: 1,
            has_prev: false,
            has_next: false,
            prev_page: 0,
            next_page: 2,
        };
        let html = page.render().unwrap();

        assert!(html.contains("Annual report"));
        assert!(html.contains("/orders/42/"));
        assert!(html.contains("Processing"));
        assert!(!html.contains("Previous"));
    }

    #[test]
    fn test_list_template_empty_state() {
        let page = OrderListTemplate {
            current_user: viewer(),
            orders: Vec::new(),
            statuses: status_options(""),
            status_filter: String::new(),
            page: 1,
            total_pages: 1,
            has_prev: false,
            has_next: false,
            prev_page: 0,
            next_page: 2,
        };
        let html = page.render().unwrap();
        assert!(html.contains("No orders yet"));
    }

    #[test]
    fn test_form_template_shows_field_errors() {
        let mut errors = ValidationErrors::new();
        errors.add_field("name", "Name is required.");
        errors.add_form("A single order does not take a document or quantity.");

        let values = OrderFormValues {
            volume_type: "single".to_owned(),
            ..OrderFormValues::default()
        };
        let resolved = form::resolve_volume_type(Some("single"), None, None);
        let html = form_page(viewer(), values, errors, resolved).render().unwrap();

        assert!(html.contains("Name is required."));
        assert!(html.contains("A single order does not take a document or quantity."));
        // Single shows the description field, not the document fields.
        assert!(html.contains("name=\"description\""));
        assert!(!html.contains("name=\"quantity\""));
    }

    #[test]
    fn test_form_template_multiple_shows_document_fields() {
        let values = OrderFormValues {
            volume_type: "multiple".to_owned(),
            ..OrderFormValues::default()
        };
        let resolved = form::resolve_volume_type(Some("multiple"), None, None);
        let html = form_page(viewer(), values, ValidationErrors::new(), resolved)
            .render()
            .unwrap();

        assert!(html.contains("name=\"document\""));
        assert!(html.contains("name=\"quantity\""));
        assert!(!html.contains("name=\"description\""));
    }

    #[test]
    fn test_form_template_unresolved_hides_conditional_fields() {
        let html = form_page(
            viewer(),
            OrderFormValues::default(),
            ValidationErrors::new(),
            form::resolve_volume_type(None, None, None),
        )
        .render()
        .unwrap();

        assert!(!html.contains("name=\"description\""));
        assert!(!html.contains("name=\"document\""));
    }

    #[test]
    fn test_detail_template_links_download() {
        let page = OrderDetailTemplate {
            current_user: viewer(),
            order: OrderDetail::from(sample_order()),
        };
        let html = page.render().unwrap();

        assert!(html.contains("/download/42/"));
        assert!(html.contains("report_1724900000000.pdf"));
    }
}
