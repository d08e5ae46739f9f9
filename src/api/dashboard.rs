use askama::Template;
use axum::{routing::get, Extension, Router};

use crate::api::middleware::session::{AppState, SessionContext};
use crate::api::nav::{visible_menu, MenuItem, NavView};

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    nav: NavView,
    items: Vec<&'static MenuItem>,
}

/// Menu of management pages available to the signed-in role
async fn dashboard(Extension(ctx): Extension<SessionContext>) -> DashboardTemplate {
    DashboardTemplate {
        nav: NavView::new(&ctx, "/dashboard"),
        items: visible_menu(ctx.role()),
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}
