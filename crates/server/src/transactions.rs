//! Transactions API endpoints

use api_types::{
    TransactionKind as ApiKind,
    transaction::{
        TransactionListQuery, TransactionListResponse, TransactionNew, TransactionUpdate,
        TransactionView,
    },
};
use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use engine::{parse_date, today_in};
use uuid::Uuid;

use crate::{Owner, ServerError, server::ServerState};

pub(crate) fn engine_kind(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Income => engine::TransactionKind::Income,
        ApiKind::Expense => engine::TransactionKind::Expense,
    }
}

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
    }
}

fn map_transaction(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        kind: map_kind(tx.kind),
        amount_minor: tx.amount_minor,
        category_id: tx.category_id,
        description: tx.description,
        occurred_on: tx.occurred_on,
    }
}

pub async fn list(
    Extension(owner): Extension<Owner>,
    State(state): State<ServerState>,
    query: Result<Query<TransactionListQuery>, QueryRejection>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let Query(query) = query?;
    let from = query.from.as_deref().map(parse_date).transpose()?;
    let to = query.to.as_deref().map(parse_date).transpose()?;
    let filter = engine::TransactionListFilter {
        from,
        to,
        kind: query.kind.map(engine_kind),
        category_id: query.category_id,
        limit: query.limit,
    };

    let transactions = state
        .engine
        .list_transactions(&owner.id, &filter)
        .await?
        .into_iter()
        .map(map_transaction)
        .collect();
    Ok(Json(TransactionListResponse { transactions }))
}

pub async fn create(
    Extension(owner): Extension<Owner>,
    State(state): State<ServerState>,
    payload: Result<Json<TransactionNew>, JsonRejection>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let Json(payload) = payload?;
    let new = engine::TransactionNew {
        kind: engine_kind(payload.kind),
        amount_minor: payload.amount_minor,
        category_id: payload.category_id,
        description: payload.description,
        occurred_on: payload
            .occurred_on
            .unwrap_or_else(|| today_in(state.timezone)),
    };

    let tx = state.engine.create_transaction(&owner.id, new).await?;
    Ok((StatusCode::CREATED, Json(map_transaction(tx))))
}

pub async fn get(
    Extension(owner): Extension<Owner>,
    State(state): State<ServerState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state.engine.transaction(&owner.id, transaction_id).await?;
    Ok(Json(map_transaction(tx)))
}

pub async fn update(
    Extension(owner): Extension<Owner>,
    State(state): State<ServerState>,
    Path(transaction_id): Path<Uuid>,
    payload: Result<Json<TransactionUpdate>, JsonRejection>,
) -> Result<Json<TransactionView>, ServerError> {
    let Json(payload) = payload?;
    let changes = engine::TransactionChanges {
        kind: payload.kind.map(engine_kind),
        amount_minor: payload.amount_minor,
        category_id: payload.category_id,
        description: payload.description,
        occurred_on: payload.occurred_on,
    };

    let tx = state
        .engine
        .update_transaction(&owner.id, transaction_id, changes)
        .await?;
    Ok(Json(map_transaction(tx)))
}

pub async fn delete(
    Extension(owner): Extension<Owner>,
    State(state): State<ServerState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_transaction(&owner.id, transaction_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
