use crate::dtos::{CreateProductRequest, MessageResponse, ProductResponse, UpdateProductRequest};
use crate::error::AppError;
use crate::models::Product;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::WithRejection;

fn sample_product() -> Product {
    Product {
        id: 1,
        name: "Laptop".to_string(),
        price: 999.0,
    }
}

/// Seed the database with one well-known product. Calling this repeatedly is
/// a no-op once the product exists.
pub async fn init_sample_product(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    if state.db.find_product(1).await?.is_none() {
        let created = state.db.seed_product(&sample_product()).await?;
        if created {
            tracing::info!("Sample product created");
        }
    }

    Ok("Sample product initialized")
}

pub async fn list_products(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let products = state.db.list_products().await?;

    let products: Vec<ProductResponse> = products.into_iter().map(ProductResponse::from).collect();

    Ok(Json(products))
}

pub async fn create_product(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateProductRequest>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let product = Product {
        id: payload.id,
        name: payload.name,
        price: payload.price,
    };

    state.db.insert_product(&product).await?;

    tracing::info!(id = product.id, "Product created");

    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

pub async fn update_product(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateProductRequest>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state
        .db
        .update_product(id, &payload.name, payload.price)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Product not found")))?;

    tracing::info!(id, "Product updated");

    Ok(Json(ProductResponse::from(updated)))
}

pub async fn delete_product(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    state
        .db
        .delete_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Product not found")))?;

    tracing::info!(id, "Product deleted");

    Ok(Json(MessageResponse {
        message: "Product deleted".to_string(),
    }))
}
