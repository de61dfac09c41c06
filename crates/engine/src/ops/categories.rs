use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    Category, EngineError, ResultEngine, categories, transactions,
    util::{normalize_display_name, normalize_name_key},
};

use super::{Engine, with_tx};

impl Engine {
    async fn owned_category(
        &self,
        db: &DatabaseTransaction,
        owner_id: &str,
        category_id: Uuid,
    ) -> ResultEngine<categories::Model> {
        categories::Entity::find_by_id(category_id)
            .filter(categories::Column::OwnerId.eq(owner_id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))
    }

    /// Rejects a name whose key is already used by another category of the
    /// same owner.
    async fn ensure_category_name_free(
        &self,
        db: &DatabaseTransaction,
        owner_id: &str,
        name_norm: &str,
        except: Option<Uuid>,
    ) -> ResultEngine<()> {
        let mut query = categories::Entity::find()
            .filter(categories::Column::OwnerId.eq(owner_id))
            .filter(categories::Column::NameNorm.eq(name_norm));
        if let Some(id) = except {
            query = query.filter(categories::Column::Id.ne(id));
        }
        if let Some(existing) = query.one(db).await? {
            return Err(EngineError::ExistingKey(format!(
                "category '{}'",
                existing.name
            )));
        }
        Ok(())
    }

    pub async fn list_categories(&self, owner_id: &str) -> ResultEngine<Vec<Category>> {
        Ok(categories::Entity::find()
            .filter(categories::Column::OwnerId.eq(owner_id))
            .order_by_asc(categories::Column::NameNorm)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Category::from)
            .collect())
    }

    pub async fn create_category(&self, owner_id: &str, name: &str) -> ResultEngine<Category> {
        let display = normalize_display_name(name, "category")?;
        let name_norm = normalize_name_key(&display)?;

        with_tx!(self, |db_tx| {
            self.ensure_category_name_free(&db_tx, owner_id, &name_norm, None)
                .await?;
            let model = categories::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                owner_id: ActiveValue::Set(owner_id.to_string()),
                name: ActiveValue::Set(display),
                name_norm: ActiveValue::Set(name_norm),
            }
            .insert(&db_tx)
            .await?;
            Ok(Category::from(model))
        })
    }

    pub async fn rename_category(
        &self,
        owner_id: &str,
        category_id: Uuid,
        name: &str,
    ) -> ResultEngine<Category> {
        let display = normalize_display_name(name, "category")?;
        let name_norm = normalize_name_key(&display)?;

        with_tx!(self, |db_tx| {
            let model = self.owned_category(&db_tx, owner_id, category_id).await?;
            self.ensure_category_name_free(&db_tx, owner_id, &name_norm, Some(category_id))
                .await?;
            let mut active: categories::ActiveModel = model.into();
            active.name = ActiveValue::Set(display);
            active.name_norm = ActiveValue::Set(name_norm);
            Ok(Category::from(active.update(&db_tx).await?))
        })
    }

    /// Deletes a category. Its transactions stay, uncategorized.
    pub async fn delete_category(&self, owner_id: &str, category_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.owned_category(&db_tx, owner_id, category_id).await?;
            let detached = transactions::Entity::update_many()
                .col_expr(
                    transactions::Column::CategoryId,
                    Expr::value(Option::<Uuid>::None),
                )
                .filter(transactions::Column::OwnerId.eq(owner_id))
                .filter(transactions::Column::CategoryId.eq(category_id))
                .exec(&db_tx)
                .await?;
            model.delete(&db_tx).await?;
            tracing::debug!(
                owner_id,
                %category_id,
                detached = detached.rows_affected,
                "category deleted"
            );
            Ok(())
        })
    }
}
