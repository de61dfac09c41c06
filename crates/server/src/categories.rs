//! Categories API endpoints.

use api_types::category::{CategoryCreate, CategoryListResponse, CategoryUpdate, CategoryView};
use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{Owner, ServerError, server::ServerState};

fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
    }
}

pub async fn list(
    Extension(owner): Extension<Owner>,
    State(state): State<ServerState>,
) -> Result<Json<CategoryListResponse>, ServerError> {
    let categories = state
        .engine
        .list_categories(&owner.id)
        .await?
        .into_iter()
        .map(map_category)
        .collect();

    Ok(Json(CategoryListResponse { categories }))
}

pub async fn create(
    Extension(owner): Extension<Owner>,
    State(state): State<ServerState>,
    payload: Result<Json<CategoryCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let Json(payload) = payload?;
    let category = state
        .engine
        .create_category(&owner.id, &payload.name)
        .await?;
    Ok((StatusCode::CREATED, Json(map_category(category))))
}

pub async fn update(
    Extension(owner): Extension<Owner>,
    State(state): State<ServerState>,
    Path(category_id): Path<Uuid>,
    payload: Result<Json<CategoryUpdate>, JsonRejection>,
) -> Result<Json<CategoryView>, ServerError> {
    let Json(payload) = payload?;
    let category = state
        .engine
        .rename_category(&owner.id, category_id, &payload.name)
        .await?;
    Ok(Json(map_category(category)))
}

/// Transactions of the deleted category stay, uncategorized.
pub async fn delete(
    Extension(owner): Extension<Owner>,
    State(state): State<ServerState>,
    Path(category_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_category(&owner.id, category_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
