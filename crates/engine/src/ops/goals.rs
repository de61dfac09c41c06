use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{EngineError, Goal, ResultEngine, goals, util::normalize_display_name};

use super::{Engine, with_tx};

#[derive(Clone, Debug)]
pub struct GoalNew {
    pub name: String,
    pub target_minor: i64,
    pub saved_minor: Option<i64>,
    pub deadline: Option<NaiveDate>,
}

/// Partial update. `deadline: Some(None)` clears the deadline.
#[derive(Clone, Debug, Default)]
pub struct GoalChanges {
    pub name: Option<String>,
    pub target_minor: Option<i64>,
    pub saved_minor: Option<i64>,
    pub deadline: Option<Option<NaiveDate>>,
}

fn validate_target(target_minor: i64) -> ResultEngine<()> {
    if target_minor <= 0 {
        return Err(EngineError::InvalidAmount(
            "target_minor must be > 0".to_string(),
        ));
    }
    Ok(())
}

fn validate_saved(saved_minor: i64) -> ResultEngine<()> {
    if saved_minor < 0 {
        return Err(EngineError::InvalidAmount(
            "saved_minor must be >= 0".to_string(),
        ));
    }
    Ok(())
}

impl Engine {
    async fn owned_goal(
        &self,
        db: &DatabaseTransaction,
        owner_id: &str,
        goal_id: Uuid,
    ) -> ResultEngine<goals::Model> {
        goals::Entity::find_by_id(goal_id)
            .filter(goals::Column::OwnerId.eq(owner_id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("goal not exists".to_string()))
    }

    /// Lists goals, oldest first.
    pub async fn list_goals(&self, owner_id: &str) -> ResultEngine<Vec<Goal>> {
        Ok(goals::Entity::find()
            .filter(goals::Column::OwnerId.eq(owner_id))
            .order_by_asc(goals::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Goal::from)
            .collect())
    }

    pub async fn goal(&self, owner_id: &str, goal_id: Uuid) -> ResultEngine<Goal> {
        with_tx!(self, |db_tx| {
            self.owned_goal(&db_tx, owner_id, goal_id)
                .await
                .map(Goal::from)
        })
    }

    pub async fn create_goal(&self, owner_id: &str, new: GoalNew) -> ResultEngine<Goal> {
        let name = normalize_display_name(&new.name, "goal")?;
        validate_target(new.target_minor)?;
        let saved_minor = new.saved_minor.unwrap_or(0);
        validate_saved(saved_minor)?;

        let model = goals::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            owner_id: ActiveValue::Set(owner_id.to_string()),
            name: ActiveValue::Set(name),
            target_minor: ActiveValue::Set(new.target_minor),
            saved_minor: ActiveValue::Set(saved_minor),
            deadline: ActiveValue::Set(new.deadline),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(&self.database)
        .await?;

        Ok(Goal::from(model))
    }

    pub async fn update_goal(
        &self,
        owner_id: &str,
        goal_id: Uuid,
        changes: GoalChanges,
    ) -> ResultEngine<Goal> {
        if changes.name.is_none()
            && changes.target_minor.is_none()
            && changes.saved_minor.is_none()
            && changes.deadline.is_none()
        {
            return Err(EngineError::InvalidRequest(
                "provide at least one field to update".to_string(),
            ));
        }
        let name = changes
            .name
            .as_deref()
            .map(|n| normalize_display_name(n, "goal"))
            .transpose()?;
        if let Some(target_minor) = changes.target_minor {
            validate_target(target_minor)?;
        }
        if let Some(saved_minor) = changes.saved_minor {
            validate_saved(saved_minor)?;
        }

        with_tx!(self, |db_tx| {
            let model = self.owned_goal(&db_tx, owner_id, goal_id).await?;
            let mut active: goals::ActiveModel = model.into();
            if let Some(name) = name {
                active.name = ActiveValue::Set(name);
            }
            if let Some(target_minor) = changes.target_minor {
                active.target_minor = ActiveValue::Set(target_minor);
            }
            if let Some(saved_minor) = changes.saved_minor {
                active.saved_minor = ActiveValue::Set(saved_minor);
            }
            if let Some(deadline) = changes.deadline {
                active.deadline = ActiveValue::Set(deadline);
            }
            Ok(Goal::from(active.update(&db_tx).await?))
        })
    }

    pub async fn delete_goal(&self, owner_id: &str, goal_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.owned_goal(&db_tx, owner_id, goal_id).await?;
            model.delete(&db_tx).await?;
            Ok(())
        })
    }
}
