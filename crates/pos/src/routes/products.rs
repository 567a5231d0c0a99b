//! Inventory route handlers (admin only).
//!
//! HTML forms cannot send PUT or DELETE, so `POST /product/{id}` dispatches
//! on a hidden `_method` field.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::{CurrentUser, Product};
use crate::services::InventoryService;
use crate::services::inventory::ProductInput;
use crate::state::AppState;

const PRODUCT_LIST_PATH: &str = "/product/view";

// =============================================================================
// Form Types
// =============================================================================

/// New product form data.
#[derive(Debug, Deserialize)]
pub struct AddProductForm {
    pub id: String,
    pub name: String,
    pub price: String,
    pub quantity: String,
}

/// Restock form data.
#[derive(Debug, Deserialize)]
pub struct AddQuantityForm {
    pub id: String,
    #[serde(rename = "addedQuantity")]
    pub added_quantity: String,
}

/// Product overwrite form data.
#[derive(Debug, Deserialize)]
pub struct UpdateProductForm {
    pub name: String,
    pub price: String,
    pub quantity: String,
}

/// Form posted to `POST /product/{id}` with a method override.
#[derive(Debug, Deserialize)]
pub struct MethodOverrideForm {
    #[serde(rename = "_method")]
    pub method: String,
    pub name: Option<String>,
    pub price: Option<String>,
    pub quantity: Option<String>,
}

/// Parse an integer form field.
fn parse_int(field: &str, value: &str) -> Result<i32> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("{field} must be a whole number")))
}

// =============================================================================
// Templates
// =============================================================================

/// Inventory page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsTemplate {
    pub current_user: Option<CurrentUser>,
    pub products: Vec<Product>,
}

// =============================================================================
// Handlers
// =============================================================================

/// List all products sorted by name.
pub async fn index(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let products = InventoryService::new(state.pool()).list_products().await?;

    Ok(ProductsTemplate {
        current_user: Some(user),
        products,
    })
}

/// Add a product.
pub async fn add(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<AddProductForm>,
) -> Result<Redirect> {
    let input = ProductInput {
        id: parse_int("id", &form.id)?,
        name: &form.name,
        price: &form.price,
        quantity: parse_int("quantity", &form.quantity)?,
    };

    InventoryService::new(state.pool()).add_product(&input).await?;

    Ok(Redirect::to(PRODUCT_LIST_PATH))
}

/// Add stock to a product.
pub async fn add_quantity(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<AddQuantityForm>,
) -> Result<Redirect> {
    let id = parse_int("id", &form.id)?;
    let delta = parse_int("addedQuantity", &form.added_quantity)?;

    InventoryService::new(state.pool())
        .add_quantity(id, delta)
        .await?;

    Ok(Redirect::to(PRODUCT_LIST_PATH))
}

/// Overwrite a product.
pub async fn update(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<UpdateProductForm>,
) -> Result<Redirect> {
    apply_update(&state, id, &form.name, &form.price, &form.quantity).await
}

/// Retire a product.
pub async fn retire(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    apply_retire(&state, id).await
}

/// Dispatch a form POST to update or retire based on `_method`.
pub async fn method_override(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<MethodOverrideForm>,
) -> Result<Redirect> {
    match form.method.to_ascii_uppercase().as_str() {
        "PUT" => {
            let (Some(name), Some(price), Some(quantity)) =
                (&form.name, &form.price, &form.quantity)
            else {
                return Err(AppError::BadRequest(
                    "name, price and quantity are required".to_owned(),
                ));
            };
            apply_update(&state, id, name, price, quantity).await
        }
        "DELETE" => apply_retire(&state, id).await,
        other => Err(AppError::BadRequest(format!("unsupported method {other}"))),
    }
}

async fn apply_update(
    state: &AppState,
    id: i32,
    name: &str,
    price: &str,
    quantity: &str,
) -> Result<Redirect> {
    let input = ProductInput {
        id,
        name,
        price,
        quantity: parse_int("quantity", quantity)?,
    };

    let updated = InventoryService::new(state.pool())
        .update_product(&input)
        .await?;
    if !updated {
        tracing::warn!(product_id = id, "Update matched no product");
    }

    Ok(Redirect::to(PRODUCT_LIST_PATH))
}

async fn apply_retire(state: &AppState, id: i32) -> Result<Redirect> {
    let retired = InventoryService::new(state.pool())
        .retire_product(id)
        .await?;
    if !retired {
        tracing::warn!(product_id = id, "Retire matched no product");
    }

    Ok(Redirect::to(PRODUCT_LIST_PATH))
}
