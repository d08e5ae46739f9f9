use askama::Template;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Router,
};

use crate::api::middleware::session::{AppState, SessionContext};
use crate::api::nav::NavView;
use crate::error::Result;
use crate::models::schema::{opt, opt_num};
use crate::models::{ReviewBatch, TransferRow};

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub struct TransferRowView {
    pub css_class: &'static str,
    pub status: &'static str,
    pub student_code: String,
    pub student_name: String,
    pub source_course_code: String,
    pub source_course_name: String,
    pub source_credits: String,
    pub target_course_code: String,
    pub target_course_name: String,
    pub target_credits: String,
    pub grade: String,
    pub error: Option<String>,
}

impl From<&TransferRow> for TransferRowView {
    fn from(row: &TransferRow) -> Self {
        let status = row.status();
        Self {
            css_class: status.css_class(),
            status: status.label(),
            student_code: opt(&row.student_code),
            student_name: opt(&row.student_name),
            source_course_code: opt(&row.source_course_code),
            source_course_name: opt(&row.source_course_name),
            source_credits: opt_num(&row.source_credits),
            target_course_code: opt(&row.target_course_code),
            target_course_name: opt(&row.target_course_name),
            target_credits: opt_num(&row.target_credits),
            grade: opt_num(&row.transferred_grade),
            error: row
                .error_message
                .clone()
                .filter(|m| !m.trim().is_empty()),
        }
    }
}

#[derive(Template)]
#[template(path = "review/batches.html")]
struct BatchPickerTemplate {
    nav: NavView,
    batches: Vec<ReviewBatch>,
}

#[derive(Template)]
#[template(path = "review/detail.html")]
struct DetailTemplate {
    nav: NavView,
    batch_id: i64,
    batch_name: String,
    rows: Vec<TransferRowView>,
    alert: Option<String>,
}

/// Lets the user pick the review batch to inspect
async fn pick_batch(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> Result<BatchPickerTemplate> {
    let batches = state.list::<ReviewBatch>(&ctx).await?;

    Ok(BatchPickerTemplate {
        nav: NavView::new(&ctx, "/transfer-review"),
        batches,
    })
}

async fn detail(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(batch_id): Path<i64>,
) -> Result<Response> {
    render_detail(&state, &ctx, batch_id, None).await
}

/// Proxies the backend spreadsheet export as a download
async fn export(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(batch_id): Path<i64>,
) -> Result<Response> {
    let path = format!("/export/transfer-rows/batch/{}", batch_id);

    match state.client.download(&path, Some(ctx.token())).await {
        Ok(bytes) => {
            tracing::info!(batch_id = batch_id, size = bytes.len(), "Exported transfer rows");
            let disposition = format!(
                "attachment; filename=\"transfer_rows_batch_{}.xlsx\"",
                batch_id
            );
            Ok((
                [
                    (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response())
        }
        Err(e) => {
            let alert = format!("Lỗi khi export: {}", e);
            render_detail(&state, &ctx, batch_id, Some(alert)).await
        }
    }
}

async fn render_detail(
    state: &AppState,
    ctx: &SessionContext,
    batch_id: i64,
    alert: Option<String>,
) -> Result<Response> {
    let batch_path = format!("/review-batches/{}", batch_id);
    let rows_key = format!("transfer-rows/{}", batch_id);
    let rows_path = format!("/transfer-rows/batch/{}", batch_id);

    let (batch, rows) = tokio::join!(
        state
            .client
            .get::<ReviewBatch>(&batch_path, Some(ctx.token())),
        state.query::<Vec<TransferRow>>(ctx, &rows_key, &rows_path),
    );

    let batch_name = match batch {
        Ok(batch) => batch.name,
        Err(e) => {
            tracing::warn!(batch_id = batch_id, error = %e, "Could not load review batch");
            format!("Đợt xét #{}", batch_id)
        }
    };
    let rows = rows?;

    let status = if alert.is_some() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };

    let template = DetailTemplate {
        nav: NavView::new(ctx, "/transfer-review"),
        batch_id,
        batch_name,
        rows: rows.iter().map(TransferRowView::from).collect(),
        alert,
    };

    Ok((status, template).into_response())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/transfer-review", get(pick_batch))
        .route("/transfer-review/:batch_id", get(detail))
        .route("/transfer-review/:batch_id/export", get(export))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_view_shows_status_and_ok_marker() {
        let row: TransferRow = serde_json::from_value(json!({
            "student_code": "SV01",
            "source_credits": 3,
            "transferred_grade": 8.5,
            "course_verified": true,
            "error_message": ""
        }))
        .unwrap();

        let view = TransferRowView::from(&row);
        assert_eq!(view.status, "Hợp lệ");
        assert_eq!(view.css_class, "row-valid");
        assert_eq!(view.source_credits, "3");
        assert_eq!(view.grade, "8.5");
        assert!(view.error.is_none());
    }

    #[test]
    fn test_row_view_keeps_error_message() {
        let row: TransferRow = serde_json::from_value(json!({
            "course_verified": true,
            "credit_mismatch": true,
            "error_message": "Sai số tín chỉ"
        }))
        .unwrap();

        let view = TransferRowView::from(&row);
        assert_eq!(view.status, "Có lỗi");
        assert_eq!(view.error.as_deref(), Some("Sai số tín chỉ"));
    }
}
