use chrono::NaiveDate;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Transaction, TransactionKind, categories, transactions,
    transactions::validate_amount, util::normalize_optional_text,
};

use super::{Engine, with_tx};

const DEFAULT_LIST_LIMIT: u64 = 100;
const MAX_LIST_LIMIT: u64 = 500;

/// Filters for listing transactions. Both date bounds are inclusive.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub kind: Option<TransactionKind>,
    pub category_id: Option<Uuid>,
    /// Defaults to 100, capped at 500.
    pub limit: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct TransactionNew {
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub category_id: Option<Uuid>,
    pub description: Option<String>,
    pub occurred_on: NaiveDate,
}

/// Partial update. `Some(None)` clears a nullable field.
#[derive(Clone, Debug, Default)]
pub struct TransactionChanges {
    pub kind: Option<TransactionKind>,
    pub amount_minor: Option<i64>,
    pub category_id: Option<Option<Uuid>>,
    pub description: Option<Option<String>>,
    pub occurred_on: Option<NaiveDate>,
}

impl TransactionChanges {
    fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.amount_minor.is_none()
            && self.category_id.is_none()
            && self.description.is_none()
            && self.occurred_on.is_none()
    }
}

impl Engine {
    pub(super) async fn require_category(
        &self,
        db: &DatabaseTransaction,
        owner_id: &str,
        category_id: Uuid,
    ) -> ResultEngine<()> {
        categories::Entity::find_by_id(category_id)
            .filter(categories::Column::OwnerId.eq(owner_id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))?;
        Ok(())
    }

    async fn owned_transaction(
        &self,
        db: &DatabaseTransaction,
        owner_id: &str,
        transaction_id: Uuid,
    ) -> ResultEngine<transactions::Model> {
        transactions::Entity::find_by_id(transaction_id)
            .filter(transactions::Column::OwnerId.eq(owner_id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))
    }

    /// Records a new income or expense.
    pub async fn create_transaction(
        &self,
        owner_id: &str,
        new: TransactionNew,
    ) -> ResultEngine<Transaction> {
        let description = normalize_optional_text(new.description.as_deref())?;
        let tx = Transaction::new(
            owner_id.to_string(),
            new.kind,
            new.amount_minor,
            new.category_id,
            description,
            new.occurred_on,
        )?;

        with_tx!(self, |db_tx| {
            if let Some(category_id) = tx.category_id {
                self.require_category(&db_tx, owner_id, category_id).await?;
            }
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            tracing::debug!(owner_id, transaction_id = %tx.id, kind = tx.kind.as_str(), "transaction created");
            Ok(tx)
        })
    }

    pub async fn transaction(&self, owner_id: &str, transaction_id: Uuid) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let model = self.owned_transaction(&db_tx, owner_id, transaction_id).await?;
            Transaction::try_from(model)
        })
    }

    /// Lists the owner's transactions, newest first
    /// (`occurred_on DESC, created_at DESC`).
    pub async fn list_transactions(
        &self,
        owner_id: &str,
        filter: &TransactionListFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        if let (Some(from), Some(to)) = (filter.from, filter.to)
            && from > to
        {
            return Err(EngineError::InvalidPeriod(
                "invalid range: from must be <= to".to_string(),
            ));
        }
        let limit = filter
            .limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT);

        let mut query = transactions::Entity::find()
            .filter(transactions::Column::OwnerId.eq(owner_id));
        if let Some(from) = filter.from {
            query = query.filter(transactions::Column::OccurredOn.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(transactions::Column::OccurredOn.lte(to));
        }
        if let Some(kind) = filter.kind {
            query = query.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(transactions::Column::CategoryId.eq(category_id));
        }

        query
            .order_by_desc(transactions::Column::OccurredOn)
            .order_by_desc(transactions::Column::CreatedAt)
            .limit(limit)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    /// Applies a partial update; at least one field must change.
    pub async fn update_transaction(
        &self,
        owner_id: &str,
        transaction_id: Uuid,
        changes: TransactionChanges,
    ) -> ResultEngine<Transaction> {
        if changes.is_empty() {
            return Err(EngineError::InvalidRequest(
                "provide at least one field to update".to_string(),
            ));
        }
        if let Some(amount_minor) = changes.amount_minor {
            validate_amount(amount_minor)?;
        }
        let description = changes
            .description
            .map(|d| normalize_optional_text(d.as_deref()))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let model = self.owned_transaction(&db_tx, owner_id, transaction_id).await?;
            if let Some(Some(category_id)) = changes.category_id {
                self.require_category(&db_tx, owner_id, category_id).await?;
            }

            let mut active: transactions::ActiveModel = model.into();
            if let Some(kind) = changes.kind {
                active.kind = ActiveValue::Set(kind.as_str().to_string());
            }
            if let Some(amount_minor) = changes.amount_minor {
                active.amount_minor = ActiveValue::Set(amount_minor);
            }
            if let Some(category_id) = changes.category_id {
                active.category_id = ActiveValue::Set(category_id);
            }
            if let Some(description) = description {
                active.description = ActiveValue::Set(description);
            }
            if let Some(occurred_on) = changes.occurred_on {
                active.occurred_on = ActiveValue::Set(occurred_on);
            }

            let updated = active.update(&db_tx).await?;
            Transaction::try_from(updated)
        })
    }

    pub async fn delete_transaction(&self, owner_id: &str, transaction_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.owned_transaction(&db_tx, owner_id, transaction_id).await?;
            model.delete(&db_tx).await?;
            tracing::debug!(owner_id, %transaction_id, "transaction deleted");
            Ok(())
        })
    }
}
