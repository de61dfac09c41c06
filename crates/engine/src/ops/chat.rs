use chrono::{Duration, Utc};
use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{ChatMessage, ChatRole, EngineError, ResultEngine, chat_messages};

use super::{Engine, with_tx};

impl Engine {
    /// The owner's most recent `limit` messages (all when `None`), oldest
    /// first.
    pub async fn chat_history(
        &self,
        owner_id: &str,
        limit: Option<u64>,
    ) -> ResultEngine<Vec<ChatMessage>> {
        let mut query = chat_messages::Entity::find()
            .filter(chat_messages::Column::OwnerId.eq(owner_id))
            .order_by_desc(chat_messages::Column::CreatedAt);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let mut messages = query
            .all(&self.database)
            .await?
            .into_iter()
            .map(ChatMessage::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        messages.reverse();
        Ok(messages)
    }

    pub async fn append_chat_message(
        &self,
        owner_id: &str,
        role: ChatRole,
        content: &str,
    ) -> ResultEngine<ChatMessage> {
        let content = content.trim();
        if content.is_empty() {
            return Err(EngineError::InvalidName(
                "message must not be empty".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let last = chat_messages::Entity::find()
                .filter(chat_messages::Column::OwnerId.eq(owner_id))
                .order_by_desc(chat_messages::Column::CreatedAt)
                .one(&db_tx)
                .await?;
            // History is ordered by timestamp; keep it strictly increasing.
            let mut created_at = Utc::now();
            if let Some(last) = last
                && created_at <= last.created_at
            {
                created_at = last.created_at + Duration::microseconds(1);
            }

            let model = chat_messages::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                owner_id: ActiveValue::Set(owner_id.to_string()),
                role: ActiveValue::Set(role.as_str().to_string()),
                content: ActiveValue::Set(content.to_string()),
                created_at: ActiveValue::Set(created_at),
            }
            .insert(&db_tx)
            .await?;
            ChatMessage::try_from(model)
        })
    }

    /// Deletes the whole history, returning how many messages were removed.
    pub async fn clear_chat_history(&self, owner_id: &str) -> ResultEngine<u64> {
        let result = chat_messages::Entity::delete_many()
            .filter(chat_messages::Column::OwnerId.eq(owner_id))
            .exec(&self.database)
            .await?;
        Ok(result.rows_affected)
    }
}
