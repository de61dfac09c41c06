//! Period summary endpoint.

use api_types::summary::{CategoryTotal, SummaryQuery, SummaryResponse};
use axum::{
    Extension, Json,
    extract::{Query, State, rejection::QueryRejection},
};
use engine::{Period, Summary, today_in};

use crate::{Owner, ServerError, server::ServerState, transactions::engine_kind};

fn map_summary(summary: Summary) -> SummaryResponse {
    SummaryResponse {
        month: summary.period.month().map(str::to_string),
        from: summary.period.from_iso(),
        to: summary.period.to_iso(),
        inc: summary.income_minor,
        exp: summary.expense_minor,
        net: summary.net_minor,
        by_category: summary
            .by_category
            .into_iter()
            .map(|t| CategoryTotal {
                category_id: t.category_id,
                total: t.total_minor,
            })
            .collect(),
    }
}

/// `GET /summary?month=YYYY-MM` or `?from=YYYY-MM-DD&to=YYYY-MM-DD`.
pub async fn get(
    Extension(owner): Extension<Owner>,
    State(state): State<ServerState>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<Json<SummaryResponse>, ServerError> {
    let Query(query) = query?;
    let period = Period::resolve(
        query.month.as_deref(),
        query.from.as_deref(),
        query.to.as_deref(),
        today_in(state.timezone),
    )?;
    let kind = query.kind.map(engine_kind);

    let summary = state.engine.summary(&owner.id, period, kind).await?;
    Ok(Json(map_summary(summary)))
}
