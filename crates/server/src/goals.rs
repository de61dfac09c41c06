//! Savings goals API endpoints.

use api_types::goal::{GoalListResponse, GoalNew, GoalUpdate, GoalView};
use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{Owner, ServerError, server::ServerState};

fn map_goal(goal: engine::Goal) -> GoalView {
    GoalView {
        id: goal.id,
        remaining_minor: goal.remaining_minor(),
        progress: goal.progress(),
        name: goal.name,
        target_minor: goal.target_minor,
        saved_minor: goal.saved_minor,
        deadline: goal.deadline,
        created_at: goal.created_at.fixed_offset(),
    }
}

pub async fn list(
    Extension(owner): Extension<Owner>,
    State(state): State<ServerState>,
) -> Result<Json<GoalListResponse>, ServerError> {
    let goals = state
        .engine
        .list_goals(&owner.id)
        .await?
        .into_iter()
        .map(map_goal)
        .collect();
    Ok(Json(GoalListResponse { goals }))
}

pub async fn create(
    Extension(owner): Extension<Owner>,
    State(state): State<ServerState>,
    payload: Result<Json<GoalNew>, JsonRejection>,
) -> Result<(StatusCode, Json<GoalView>), ServerError> {
    let Json(payload) = payload?;
    let goal = state
        .engine
        .create_goal(
            &owner.id,
            engine::GoalNew {
                name: payload.name,
                target_minor: payload.target_minor,
                saved_minor: payload.saved_minor,
                deadline: payload.deadline,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(map_goal(goal))))
}

pub async fn get(
    Extension(owner): Extension<Owner>,
    State(state): State<ServerState>,
    Path(goal_id): Path<Uuid>,
) -> Result<Json<GoalView>, ServerError> {
    let goal = state.engine.goal(&owner.id, goal_id).await?;
    Ok(Json(map_goal(goal)))
}

pub async fn update(
    Extension(owner): Extension<Owner>,
    State(state): State<ServerState>,
    Path(goal_id): Path<Uuid>,
    payload: Result<Json<GoalUpdate>, JsonRejection>,
) -> Result<Json<GoalView>, ServerError> {
    let Json(payload) = payload?;
    let goal = state
        .engine
        .update_goal(
            &owner.id,
            goal_id,
            engine::GoalChanges {
                name: payload.name,
                target_minor: payload.target_minor,
                saved_minor: payload.saved_minor,
                deadline: payload.deadline,
            },
        )
        .await?;
    Ok(Json(map_goal(goal)))
}

pub async fn delete(
    Extension(owner): Extension<Owner>,
    State(state): State<ServerState>,
    Path(goal_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_goal(&owner.id, goal_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
