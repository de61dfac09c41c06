use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Deserializes a field that distinguishes "absent" from "explicit null".
///
/// Use together with `#[serde(default)]`: a missing key yields `None`, a
/// `null` yields `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

pub mod summary {
    use super::*;

    /// Query string of `GET /summary`.
    ///
    /// Tokens are kept raw so the engine can report format errors itself.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SummaryQuery {
        /// `YYYY-MM`.
        pub month: Option<String>,
        /// `YYYY-MM-DD`, inclusive.
        pub from: Option<String>,
        /// `YYYY-MM-DD`, inclusive.
        pub to: Option<String>,
        #[serde(rename = "type")]
        pub kind: Option<TransactionKind>,
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
    pub struct CategoryTotal {
        pub category_id: Uuid,
        pub total: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryResponse {
        /// Month token the period was derived from, `null` for explicit ranges.
        pub month: Option<String>,
        pub from: String,
        pub to: String,
        pub inc: i64,
        pub exp: i64,
        pub net: i64,
        #[serde(rename = "byCategory")]
        pub by_category: Vec<CategoryTotal>,
    }
}

pub mod transaction {
    use super::*;

    /// Query string of `GET /transactions`. Dates are kept raw, like
    /// [`SummaryQuery`](super::summary::SummaryQuery).
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionListQuery {
        /// `YYYY-MM-DD`, inclusive.
        pub from: Option<String>,
        /// `YYYY-MM-DD`, inclusive.
        pub to: Option<String>,
        #[serde(rename = "type")]
        pub kind: Option<TransactionKind>,
        pub category_id: Option<Uuid>,
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        /// Unsigned magnitude in minor units; direction is given by `type`.
        pub amount_minor: i64,
        pub category_id: Option<Uuid>,
        pub description: Option<String>,
        pub occurred_on: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub amount_minor: i64,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub category_id: Option<Uuid>,
        pub description: Option<String>,
        /// Defaults to today when absent.
        pub occurred_on: Option<NaiveDate>,
    }

    /// Partial update. `category_id` and `description` accept `null` to clear.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub amount_minor: Option<i64>,
        #[serde(rename = "type")]
        pub kind: Option<TransactionKind>,
        #[serde(default, deserialize_with = "nullable")]
        pub category_id: Option<Option<Uuid>>,
        #[serde(default, deserialize_with = "nullable")]
        pub description: Option<Option<String>>,
        pub occurred_on: Option<NaiveDate>,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryListResponse {
        pub categories: Vec<CategoryView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryCreate {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: String,
    }
}

pub mod goal {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalView {
        pub id: Uuid,
        pub name: String,
        pub target_minor: i64,
        pub saved_minor: i64,
        pub remaining_minor: i64,
        /// Saved over target, capped at 1.0.
        pub progress: f64,
        pub deadline: Option<NaiveDate>,
        pub created_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalListResponse {
        pub goals: Vec<GoalView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalNew {
        pub name: String,
        pub target_minor: i64,
        pub saved_minor: Option<i64>,
        pub deadline: Option<NaiveDate>,
    }

    /// Partial update. `deadline` accepts `null` to clear.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct GoalUpdate {
        pub name: Option<String>,
        pub target_minor: Option<i64>,
        pub saved_minor: Option<i64>,
        #[serde(default, deserialize_with = "nullable")]
        pub deadline: Option<Option<NaiveDate>>,
    }
}

pub mod chat {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ChatRole {
        User,
        Assistant,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ChatSend {
        pub message: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ChatMessageView {
        pub id: Uuid,
        pub role: ChatRole,
        pub content: String,
        pub created_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ChatReply {
        pub reply: ChatMessageView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ChatHistoryResponse {
        pub messages: Vec<ChatMessageView>,
    }
}

pub mod health {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Health {
        pub status: String,
    }
}
