//! Generic list / editor / delete pages shared by every managed entity.

pub mod form;
pub mod state;

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Extension, Form, Router,
};
use serde::Deserialize;

use crate::api::middleware::session::{AppState, SessionContext};
use crate::api::nav::NavView;
use crate::error::{AppError, Result};
use crate::models::schema::{FieldKind, FieldSpec, OptionSource, Requirement};
use crate::models::{Class, Faculty, Program, Resource};

pub use form::FormState;
pub use state::{CrudState, EditorMode, Outcome};

pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    /// `text`, `email`, `number`, `date`, `password`, `textarea`, `checkbox` or `select`
    pub input: &'static str,
    pub value: String,
    pub required: bool,
    pub readonly: bool,
    pub checked: bool,
    pub min: Option<i64>,
    pub hint: Option<&'static str>,
    pub placeholder: bool,
    pub options: Vec<OptionView>,
}

pub struct EditorView {
    pub title: String,
    pub action: String,
    pub submit_label: &'static str,
    pub error: Option<String>,
    pub fields: Vec<FieldView>,
}

pub struct RowView {
    pub id: i64,
    pub cells: Vec<String>,
    /// Lowercased cell text matched by the in-page search box
    pub search_text: String,
    pub link: Option<String>,
}

#[derive(Template)]
#[template(path = "crud/list.html")]
pub struct CrudPageTemplate {
    pub nav: NavView,
    pub title: &'static str,
    pub list_title: &'static str,
    pub route: &'static str,
    pub headers: Vec<&'static str>,
    pub link_header: Option<&'static str>,
    pub link_text: &'static str,
    /// Data columns, the optional link column and the actions column
    pub column_count: usize,
    pub rows: Vec<RowView>,
    pub query: String,
    pub alert: Option<String>,
    pub editor: Option<EditorView>,
}

#[derive(Template)]
#[template(path = "crud/confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub nav: NavView,
    pub title: &'static str,
    pub route: &'static str,
    pub noun: &'static str,
    pub id: i64,
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    new: Option<String>,
}

/// Routes for one entity: list, editor overlay, save and delete
pub fn router<R: Resource>() -> Router<AppState> {
    let route = R::schema().route;

    Router::new()
        .route(route, get(list_page::<R>).post(create::<R>))
        .route(&format!("{}/:id", route), post(update::<R>))
        .route(&format!("{}/:id/edit", route), get(edit_page::<R>))
        .route(
            &format!("{}/:id/delete", route),
            get(confirm_delete::<R>).post(delete::<R>),
        )
}

async fn list_page<R: Resource>(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Query(params): Query<ListParams>,
) -> Result<Response> {
    let page = if params.new.is_some() {
        CrudState::Listing.open_new(R::schema().fields)
    } else {
        CrudState::Listing
    };

    render_page::<R>(&state, &ctx, page, params.q.unwrap_or_default(), None).await
}

async fn edit_page<R: Resource>(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i64>,
) -> Result<Response> {
    let schema = R::schema();
    let rows = state.list::<R>(&ctx).await?;
    let record = rows
        .iter()
        .find(|r| r.id() == id)
        .ok_or_else(|| AppError::NotFound(format!("{} #{}", schema.noun, id)))?;

    let page = CrudState::Listing.open_edit(id, FormState::from_record(schema.fields, record));
    render_page::<R>(&state, &ctx, page, String::new(), None).await
}

async fn create<R: Resource>(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let form = FormState::from_submission(R::schema().fields, pairs);
    let page = CrudState::Creating { form, error: None }.submit();
    save::<R>(&state, &ctx, page).await
}

async fn update<R: Resource>(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i64>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let form = FormState::from_submission(R::schema().fields, pairs);
    let page = CrudState::Editing {
        id,
        form,
        error: None,
    }
    .submit();
    save::<R>(&state, &ctx, page).await
}

/// Validates a submission and sends exactly one create or update call.
/// Validation failures never reach the backend.
async fn save<R: Resource>(state: &AppState, ctx: &SessionContext, page: CrudState) -> Result<Response> {
    let schema = R::schema();

    let CrudState::Submitting { mode, form } = &page else {
        return render_page::<R>(state, ctx, page, String::new(), None).await;
    };

    let outcome = match build_input::<R>(schema.fields, form, mode) {
        Err(message) => Outcome::Failed(message),
        Ok(input) => {
            let result = match mode {
                EditorMode::Create => {
                    state
                        .client
                        .post::<_, serde_json::Value>(schema.endpoint, &input, Some(ctx.token()))
                        .await
                }
                EditorMode::Edit(id) => {
                    state
                        .client
                        .put::<_, serde_json::Value>(
                            &format!("{}/{}", schema.endpoint, id),
                            &input,
                            Some(ctx.token()),
                        )
                        .await
                }
            };

            match result {
                Ok(_) => {
                    tracing::info!(entity = %schema.query_key, mode = ?mode, "Saved record");
                    Outcome::Saved
                }
                Err(e) => Outcome::Failed(e.to_string()),
            }
        }
    };

    match page.finish(outcome) {
        CrudState::Listing => {
            state.invalidate(ctx, schema.query_key).await;
            Ok(Redirect::to(schema.route).into_response())
        }
        reopened => render_page::<R>(state, ctx, reopened, String::new(), None).await,
    }
}

fn build_input<R: Resource>(
    fields: &[FieldSpec],
    form: &FormState,
    mode: &EditorMode,
) -> std::result::Result<R::Input, String> {
    let payload = form.to_payload(fields, mode)?;
    serde_json::from_value::<R::Input>(payload)
        .map_err(|e| format!("Dữ liệu không hợp lệ: {}", e))
}

async fn confirm_delete<R: Resource>(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i64>,
) -> Result<ConfirmDeleteTemplate> {
    let schema = R::schema();
    let rows = state.list::<R>(&ctx).await?;
    let record = rows
        .iter()
        .find(|r| r.id() == id)
        .ok_or_else(|| AppError::NotFound(format!("{} #{}", schema.noun, id)))?;

    Ok(ConfirmDeleteTemplate {
        nav: NavView::new(&ctx, schema.route),
        title: schema.title,
        route: schema.route,
        noun: schema.noun,
        id,
        label: record.label(),
    })
}

async fn delete<R: Resource>(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i64>,
) -> Result<Response> {
    let schema = R::schema();

    match state
        .client
        .delete(&format!("{}/{}", schema.endpoint, id), Some(ctx.token()))
        .await
    {
        Ok(()) => {
            tracing::info!(entity = %schema.query_key, id = id, "Deleted record");
            state.invalidate(&ctx, schema.query_key).await;
            Ok(Redirect::to(schema.route).into_response())
        }
        Err(e) => {
            render_page::<R>(&state, &ctx, CrudState::Listing, String::new(), Some(e.to_string()))
                .await
        }
    }
}

/// Renders the list, with the editor overlay when the state has one open
async fn render_page<R: Resource>(
    state: &AppState,
    ctx: &SessionContext,
    page: CrudState,
    query: String,
    alert: Option<String>,
) -> Result<Response> {
    let schema = R::schema();
    let failed = page.error().is_some() || alert.is_some();

    // A failed save or delete must still come back with its message and the
    // submitted values, even when the list itself cannot be loaded.
    let rows = match state.list::<R>(ctx).await {
        Ok(rows) => rows,
        Err(e) if failed => {
            tracing::warn!(entity = %schema.query_key, error = %e, "Could not reload list after failed mutation");
            Vec::new()
        }
        Err(e) => return Err(e.into()),
    };

    let editor = match &page {
        CrudState::Creating { form, error } => Some(
            editor_view(
                state,
                ctx,
                schema.fields,
                form,
                error.clone(),
                &EditorMode::Create,
                format!("Thêm {} mới", schema.noun),
                schema.route.to_string(),
            )
            .await,
        ),
        CrudState::Editing { id, form, error } => Some(
            editor_view(
                state,
                ctx,
                schema.fields,
                form,
                error.clone(),
                &EditorMode::Edit(*id),
                format!("Chỉnh sửa {}", schema.noun),
                format!("{}/{}", schema.route, id),
            )
            .await,
        ),
        CrudState::Listing | CrudState::Submitting { .. } => None,
    };

    let rows: Vec<RowView> = schema
        .filter(&rows, &query)
        .into_iter()
        .map(|row| {
            let cells: Vec<String> = schema.columns.iter().map(|c| (c.value)(row)).collect();
            RowView {
                id: row.id(),
                search_text: search_text(&cells),
                cells,
                link: schema.row_link.as_ref().map(|l| (l.href)(row)),
            }
        })
        .collect();

    let status = if failed {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::OK
    };

    let link_header = schema.row_link.as_ref().map(|l| l.header);

    let template = CrudPageTemplate {
        nav: NavView::new(ctx, schema.route),
        title: schema.title,
        list_title: schema.list_title,
        route: schema.route,
        headers: schema.columns.iter().map(|c| c.header).collect(),
        column_count: schema.columns.len() + usize::from(link_header.is_some()) + 1,
        link_header,
        link_text: schema.row_link.as_ref().map(|l| l.text).unwrap_or(""),
        rows,
        query,
        alert,
        editor,
    };

    Ok((status, template).into_response())
}

#[allow(clippy::too_many_arguments)]
async fn editor_view(
    state: &AppState,
    ctx: &SessionContext,
    fields: &'static [FieldSpec],
    form: &FormState,
    error: Option<String>,
    mode: &EditorMode,
    title: String,
    action: String,
) -> EditorView {
    let editing = matches!(mode, EditorMode::Edit(_));
    let mut views = Vec::with_capacity(fields.len());

    for field in fields {
        let value = form.get(field.name).to_string();
        let options = match field.kind {
            FieldKind::Select(source) => select_options(state, ctx, source)
                .await
                .into_iter()
                .map(|(v, label)| OptionView {
                    selected: v == value,
                    value: v,
                    label,
                })
                .collect(),
            _ => Vec::new(),
        };

        views.push(FieldView {
            name: field.name,
            label: field.label,
            input: input_type(field.kind),
            required: match field.required {
                Requirement::Always => field.kind != FieldKind::Checkbox,
                Requirement::OnCreate => !editing,
                Requirement::Optional => false,
            },
            readonly: editing && field.locked_on_edit,
            checked: form.is_checked(field.name),
            min: field.min,
            hint: if editing { field.hint } else { None },
            placeholder: field.default.is_empty(),
            options,
            value,
        });
    }

    EditorView {
        title,
        action,
        submit_label: if editing { "Cập nhật" } else { "Thêm mới" },
        error,
        fields: views,
    }
}

/// Same normalization as `EntitySchema::filter`, so the browser-side filter
/// agrees with `?q=`
fn search_text(cells: &[String]) -> String {
    cells
        .iter()
        .map(|cell| cell.to_lowercase())
        .collect::<Vec<_>>()
        .join("\n")
}

fn input_type(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Text => "text",
        FieldKind::Email => "email",
        FieldKind::Number => "number",
        FieldKind::Date => "date",
        FieldKind::TextArea => "textarea",
        FieldKind::Password => "password",
        FieldKind::Checkbox => "checkbox",
        FieldKind::Select(_) => "select",
    }
}

/// `(value, label)` choices of a select. Lookup lists come from the query
/// cache; a failed lookup leaves the select empty.
async fn select_options(
    state: &AppState,
    ctx: &SessionContext,
    source: OptionSource,
) -> Vec<(String, String)> {
    let result: std::result::Result<Vec<(String, String)>, _> = match source {
        OptionSource::Static(choices) => {
            return choices
                .iter()
                .map(|(v, l)| (v.to_string(), l.to_string()))
                .collect()
        }
        OptionSource::Faculties => state
            .list::<Faculty>(ctx)
            .await
            .map(|rows| rows.iter().map(|f| (f.id.to_string(), f.name.clone())).collect()),
        OptionSource::Programs => state
            .list::<Program>(ctx)
            .await
            .map(|rows| rows.iter().map(|p| (p.id.to_string(), p.name.clone())).collect()),
        OptionSource::Classes => state.list::<Class>(ctx).await.map(|rows| {
            rows.iter()
                .map(|c| (c.id.to_string(), format!("{} - {}", c.code, c.name)))
                .collect()
        }),
    };

    result.unwrap_or_else(|e| {
        tracing::warn!(source = ?source, error = %e, "Could not load select options");
        Vec::new()
    })
}
