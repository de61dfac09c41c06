//! Savings goals.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Goal {
    pub id: Uuid,
    pub name: String,
    pub target_minor: i64,
    pub saved_minor: i64,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// What is still missing to reach the target, never negative.
    pub fn remaining_minor(&self) -> i64 {
        self.target_minor.saturating_sub(self.saved_minor).max(0)
    }

    /// `saved / target`, capped at `1.0`.
    pub fn progress(&self) -> f64 {
        if self.target_minor <= 0 {
            return 0.0;
        }
        (self.saved_minor as f64 / self.target_minor as f64).clamp(0.0, 1.0)
    }

    pub fn is_reached(&self) -> bool {
        self.saved_minor >= self.target_minor
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "goals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub target_minor: i64,
    pub saved_minor: i64,
    pub deadline: Option<Date>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Goal {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            target_minor: model.target_minor,
            saved_minor: model.saved_minor,
            deadline: model.deadline,
            created_at: model.created_at,
        }
    }
}
