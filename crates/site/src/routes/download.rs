//! Document download handler.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use tokio_util::io::ReaderStream;

use orderdesk_core::OrderNumber;

use crate::{
    db::orders::OrderRepository,
    error::{AppError, Result},
    middleware::RequireAuth,
    state::AppState,
};

/// `GET /download/{order_number}/` - stream an order's document as an
/// attachment.
///
/// The lookup is NOT ownership-scoped: any authenticated user who knows an
/// order number can fetch its document, unlike the detail page. Orders
/// without a document answer 404; a dangling file reference is a 500.
pub async fn download(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(order_number): Path<i32>,
) -> Result<Response> {
    let order = OrderRepository::new(state.pool())
        .get_by_number(OrderNumber::new(order_number))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {order_number}")))?;

    let Some(rel_path) = order.document.as_deref() else {
        return Err(AppError::NotFound(format!(
            "order {order_number} has no document"
        )));
    };
    let file_name = order
        .document_file_name()
        .ok_or_else(|| AppError::Internal("stored document path has no file name".to_owned()))?;

    let file = state.documents().open(rel_path).await?;
    let body = Body::from_stream(ReaderStream::new(file));

    let disposition = format!("attachment; filename=\"{}\"", file_name.replace('"', "_"));
    let disposition = HeaderValue::from_str(&disposition)
        .map_err(|_| AppError::Internal("document file name is not a valid header".to_owned()))?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
