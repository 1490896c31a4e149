use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    brands::{
        dto::{CreateBrandRequest, UpdateBrandRequest},
        repo::Brand,
    },
    error::ApiError,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/brands", get(list_brands).post(create_brand))
        .route(
            "/brands/:id",
            get(get_brand).put(update_brand).delete(delete_brand),
        )
}

#[instrument(skip(state, _caller, payload))]
pub async fn create_brand(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Json(payload): Json<CreateBrandRequest>,
) -> Result<(StatusCode, Json<Brand>), ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title is required".into()));
    }
    let brand = Brand::create(
        &state.db,
        payload.title.trim(),
        payload.description.as_deref(),
        payload.logo.as_deref(),
        &payload.categories,
    )
    .await?;
    info!(brand_id = %brand.id, "brand created");
    Ok((StatusCode::CREATED, Json(brand)))
}

#[instrument(skip(state, _caller))]
pub async fn list_brands(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
) -> Result<Json<Vec<Brand>>, ApiError> {
    let brands = Brand::list(&state.db).await?;
    Ok(Json(brands))
}

#[instrument(skip(state, _caller))]
pub async fn get_brand(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Brand>, ApiError> {
    let brand = Brand::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Brand with id {id} not found")))?;
    Ok(Json(brand))
}

#[instrument(skip(state, _caller, payload))]
pub async fn update_brand(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBrandRequest>,
) -> Result<Json<Brand>, ApiError> {
    let brand = Brand::update(
        &state.db,
        id,
        payload.title.as_deref(),
        payload.description.as_deref(),
        payload.logo.as_deref(),
        payload.categories.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("Brand with id {id} not found")))?;
    Ok(Json(brand))
}

#[instrument(skip(state, _caller))]
pub async fn delete_brand(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Brand>, ApiError> {
    let brand = Brand::delete(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Brand with id {id} not found")))?;
    info!(brand_id = %brand.id, "brand deleted");
    Ok(Json(brand))
}
