//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use chrono::Utc;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireSession;
use crate::models::{CurrentUser, Dashboard};
use crate::services::ReportService;
use crate::state::AppState;

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub current_user: Option<CurrentUser>,
    pub dashboard: Dashboard,
}

/// Display sales totals, best sellers and low stock.
#[instrument(skip_all)]
pub async fn page(
    RequireSession(user): RequireSession,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let dashboard = ReportService::new(state.pool())
        .dashboard(Utc::now())
        .await?;

    Ok(DashboardTemplate {
        current_user: Some(user),
        dashboard,
    })
}
