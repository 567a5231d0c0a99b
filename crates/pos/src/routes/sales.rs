//! Sales history route handlers (admin only).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;

use tally_core::{Price, SaleId};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::{CurrentUser, Sale, SaleDetail};
use crate::services::ReportService;
use crate::services::reports::ReportWindow;
use crate::state::AppState;

/// Sale listing template, shared by all listings.
#[derive(Template, WebTemplate)]
#[template(path = "sales/index.html")]
pub struct SalesTemplate {
    pub current_user: Option<CurrentUser>,
    pub title: &'static str,
    pub sales: Vec<Sale>,
    pub total: Price,
}

impl SalesTemplate {
    fn new(user: CurrentUser, title: &'static str, sales: Vec<Sale>) -> Self {
        let total = sales.iter().map(|s| s.amount).sum();
        Self {
            current_user: Some(user),
            title,
            sales,
            total,
        }
    }
}

/// Sale detail template.
#[derive(Template, WebTemplate)]
#[template(path = "sales/detail.html")]
pub struct SaleDetailTemplate {
    pub current_user: Option<CurrentUser>,
    pub detail: SaleDetail,
}

/// List all sales.
pub async fn index(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let sales = ReportService::new(state.pool()).list_sales().await?;
    Ok(SalesTemplate::new(user, "Sales", sales))
}

/// Show one sale with its line items.
pub async fn show(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let detail = ReportService::new(state.pool())
        .sale_detail(SaleId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Sale {id}")))?;

    Ok(SaleDetailTemplate {
        current_user: Some(user),
        detail,
    })
}

async fn window_listing(
    user: CurrentUser,
    state: &AppState,
    window: ReportWindow,
) -> Result<SalesTemplate> {
    let sales = ReportService::new(state.pool())
        .sales_in(window, Utc::now())
        .await?;
    Ok(SalesTemplate::new(user, window.title(), sales))
}

/// Sales since midnight today.
pub async fn today(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    window_listing(user, &state, ReportWindow::Daily).await
}

/// Sales over the last seven days.
pub async fn week(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    window_listing(user, &state, ReportWindow::Weekly).await
}

/// Sales over the last thirty days.
pub async fn month(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    window_listing(user, &state, ReportWindow::Monthly).await
}
