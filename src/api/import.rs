use askama::Template;
use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Router,
};
use reqwest::multipart;

use crate::api::middleware::session::{AppState, SessionContext};
use crate::api::nav::NavView;
use crate::error::Result;
use crate::models::{ImportKind, ImportReport, ReviewBatch};

pub struct KindOption {
    pub value: &'static str,
    pub label: &'static str,
    pub hint: &'static str,
    pub selected: bool,
}

pub struct ReportView {
    pub summary: String,
    pub error_count: usize,
    pub error_lines: Vec<String>,
}

impl From<&ImportReport> for ReportView {
    fn from(report: &ImportReport) -> Self {
        Self {
            summary: report.summary(),
            error_count: report.errors.len(),
            error_lines: report.error_lines(),
        }
    }
}

#[derive(Template)]
#[template(path = "import.html")]
struct ImportTemplate {
    nav: NavView,
    kinds: Vec<KindOption>,
    batches: Vec<ReviewBatch>,
    selected_batch: String,
    error: Option<String>,
    report: Option<ReportView>,
}

/// What the user submitted on the import form
#[derive(Debug, Default)]
struct ImportSubmission {
    kind: ImportKind,
    batch_id: Option<i64>,
    file_name: Option<String>,
    file: Vec<u8>,
}

impl ImportSubmission {
    async fn read(mut multipart: Multipart) -> std::result::Result<Self, MultipartError> {
        let mut submission = ImportSubmission::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "kind" => {
                    let value = field.text().await?;
                    submission.kind = ImportKind::parse(&value).unwrap_or_default();
                }
                "batch_id" => {
                    let value = field.text().await?;
                    submission.batch_id = value.trim().parse().ok();
                }
                "file" => {
                    submission.file_name = field
                        .file_name()
                        .map(str::to_string)
                        .filter(|n| !n.is_empty());
                    submission.file = field.bytes().await?.to_vec();
                }
                _ => {}
            }
        }

        Ok(submission)
    }

    /// Client-side checks made before anything is uploaded
    fn validate(&self) -> std::result::Result<(), &'static str> {
        if self.file_name.is_none() || self.file.is_empty() {
            return Err("Vui lòng chọn file");
        }
        if self.kind.needs_batch() && self.batch_id.is_none() {
            return Err("Vui lòng chọn đợt xét");
        }
        Ok(())
    }

    fn into_form(self) -> multipart::Form {
        let part = multipart::Part::bytes(self.file)
            .file_name(self.file_name.unwrap_or_else(|| "import.xlsx".to_string()));

        let mut form = multipart::Form::new().part("file", part);
        if let (true, Some(batch_id)) = (self.kind.needs_batch(), self.batch_id) {
            form = form.text("batch_id", batch_id.to_string());
        }
        form
    }
}

async fn import_page(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> Result<Response> {
    render(&state, &ctx, ImportKind::default(), None, None, None).await
}

async fn import_upload(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    multipart: Multipart,
) -> Result<Response> {
    let submission = match ImportSubmission::read(multipart).await {
        Ok(submission) => submission,
        Err(e) => {
            tracing::warn!(status = %e.status(), error = %e, "Could not read import upload");
            let message = unreadable_upload_message(&e, state.config.import_max_bytes);
            return render(&state, &ctx, ImportKind::default(), None, Some(message), None).await;
        }
    };
    let kind = submission.kind;
    let batch_id = submission.batch_id;

    if let Err(message) = submission.validate() {
        return render(&state, &ctx, kind, batch_id, Some(message.to_string()), None).await;
    }

    let report = match state
        .client
        .upload::<ImportReport>(&kind.endpoint(), submission.into_form(), Some(ctx.token()))
        .await
    {
        Ok(report) => {
            tracing::info!(
                kind = %kind.as_str(),
                success = report.success,
                errors = report.errors.len(),
                "Import finished"
            );
            let query_key = match (kind, batch_id) {
                (ImportKind::TransferRows, Some(id)) => format!("transfer-rows/{}", id),
                _ => kind.as_str().to_string(),
            };
            state.invalidate(&ctx, &query_key).await;
            report
        }
        Err(e) => ImportReport::failed(e.to_string()),
    };

    render(&state, &ctx, kind, batch_id, None, Some(report)).await
}

fn unreadable_upload_message(error: &MultipartError, limit: usize) -> String {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        format!("File vượt quá dung lượng cho phép ({})", size_label(limit))
    } else {
        format!("Không đọc được file tải lên: {}", error.body_text())
    }
}

fn size_label(bytes: usize) -> String {
    const MIB: usize = 1024 * 1024;
    if bytes >= MIB {
        format!("{} MB", bytes / MIB)
    } else {
        format!("{} KB", (bytes / 1024).max(1))
    }
}

async fn render(
    state: &AppState,
    ctx: &SessionContext,
    kind: ImportKind,
    batch_id: Option<i64>,
    error: Option<String>,
    report: Option<ImportReport>,
) -> Result<Response> {
    let batches = state.list::<ReviewBatch>(ctx).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Could not load review batches for import");
        Vec::new()
    });

    let kinds = ImportKind::ALL
        .iter()
        .map(|k| KindOption {
            value: k.as_str(),
            label: k.label(),
            hint: k.format_hint(),
            selected: *k == kind,
        })
        .collect();

    let status = if error.is_some() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::OK
    };

    let template = ImportTemplate {
        nav: NavView::new(ctx, "/import"),
        kinds,
        batches,
        selected_batch: batch_id.map(|id| id.to_string()).unwrap_or_default(),
        error,
        report: report.as_ref().map(ReportView::from),
    };

    Ok((status, template).into_response())
}

/// `max_bytes` replaces axum's default request body limit for uploads
pub fn router(max_bytes: usize) -> Router<AppState> {
    Router::new().route(
        "/import",
        get(import_page)
            .post(import_upload)
            .layer(DefaultBodyLimit::max(max_bytes)),
    )
}
