use sea_orm::{QueryFilter, prelude::*};

use crate::{
    Period, ResultEngine, Summary, SummaryRow, TransactionKind, TransactionSource, summarize,
    transactions,
};

use super::Engine;

impl TransactionSource for Engine {
    async fn fetch_for_period(
        &self,
        owner_id: &str,
        period: &Period,
        kind: Option<TransactionKind>,
    ) -> ResultEngine<Vec<SummaryRow>> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::OwnerId.eq(owner_id))
            .filter(transactions::Column::OccurredOn.between(period.from(), period.to()));
        if let Some(kind) = kind {
            query = query.filter(transactions::Column::Kind.eq(kind.as_str()));
        }

        query
            .all(&self.database)
            .await?
            .into_iter()
            .map(SummaryRow::try_from)
            .collect()
    }
}

impl Engine {
    /// Income, expense, net and category totals of `owner_id` over `period`.
    pub async fn summary(
        &self,
        owner_id: &str,
        period: Period,
        kind: Option<TransactionKind>,
    ) -> ResultEngine<Summary> {
        summarize(self, owner_id, period, kind).await
    }
}
