//! Billing route handlers.
//!
//! The billing form posts repeated `item[]` and `quantity[]` fields, one pair
//! per cart row, plus the `total` the page computed. A single row may arrive
//! as plain `item` / `quantity`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use tally_core::{Price, ProductId};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireSession;
use crate::models::{CurrentUser, LineItem, Product};
use crate::services::{BillingService, InventoryService};
use crate::state::AppState;

// =============================================================================
// Form Parsing
// =============================================================================

/// A parsed billing submission.
#[derive(Debug, PartialEq, Eq)]
pub struct BillingForm {
    pub items: Vec<LineItem>,
    pub total: Option<Price>,
}

impl BillingForm {
    /// Build the submission from raw form pairs.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if ids and quantities do not pair up,
    /// are not whole numbers, or the total is not a valid price.
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self> {
        let mut ids = Vec::new();
        let mut quantities = Vec::new();
        let mut total = None;

        for (key, value) in pairs {
            match key.as_str() {
                "item[]" | "item" => ids.push(value.as_str()),
                "quantity[]" | "quantity" => quantities.push(value.as_str()),
                "total" if !value.trim().is_empty() => {
                    let price = Price::parse(value)
                        .map_err(|e| AppError::BadRequest(format!("total: {e}")))?;
                    total = Some(price);
                }
                _ => {}
            }
        }

        if ids.len() != quantities.len() {
            return Err(AppError::BadRequest(
                "every item needs a quantity".to_owned(),
            ));
        }

        let items = ids
            .into_iter()
            .zip(quantities)
            .map(|(id, quantity)| -> Result<LineItem> {
                let id = id
                    .trim()
                    .parse()
                    .map_err(|_| AppError::BadRequest(format!("invalid item id {id:?}")))?;
                let quantity = quantity.trim().parse().map_err(|_| {
                    AppError::BadRequest(format!("invalid quantity {quantity:?}"))
                })?;
                Ok(LineItem::new(ProductId::new(id), quantity))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { items, total })
    }
}

/// Query parameters for the billing page.
#[derive(Debug, Deserialize)]
pub struct BillingQuery {
    /// Sale just recorded, shown as a confirmation.
    pub sale: Option<i32>,
}

// =============================================================================
// Templates
// =============================================================================

/// Billing page template.
#[derive(Template, WebTemplate)]
#[template(path = "billing.html")]
pub struct BillingTemplate {
    pub current_user: Option<CurrentUser>,
    pub products: Vec<Product>,
    pub recorded_sale: Option<i32>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the billing form.
pub async fn page(
    RequireSession(user): RequireSession,
    State(state): State<AppState>,
    Query(query): Query<BillingQuery>,
) -> Result<impl IntoResponse> {
    let products = InventoryService::new(state.pool()).list_products().await?;

    Ok(BillingTemplate {
        current_user: Some(user),
        products,
        recorded_sale: query.sale,
    })
}

/// Record a sale from the billing form.
#[instrument(skip_all)]
pub async fn add(
    RequireSession(user): RequireSession,
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Redirect> {
    let form = BillingForm::from_pairs(&pairs)?;

    let sale = BillingService::new(state.pool())
        .record_sale(&form.items, form.total)
        .await?;

    tracing::info!(sale_id = %sale.id, cashier = %user.username, "Billing completed");
    Ok(Redirect::to(&format!("/billing?sale={}", sale.id)))
}
