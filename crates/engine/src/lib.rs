//! Domain core of the finance backend.
//!
//! [`Engine`] owns the database handle and exposes owner-scoped operations on
//! transactions, categories, goals and the advisor history. Period summaries
//! live in [`summary`] and only need a [`TransactionSource`].

pub use categories::Category;
pub use chat_messages::{ChatMessage, ChatRole};
pub use error::EngineError;
pub use goals::Goal;
pub use ops::{
    Engine, EngineBuilder, GoalChanges, GoalNew, TransactionChanges, TransactionListFilter,
    TransactionNew,
};
pub use period::{Period, parse_date, today_in};
pub use summary::{
    CategoryTotal, Summary, SummaryRow, TransactionSource, summarize, summarize_rows,
};
pub use transactions::{Transaction, TransactionKind};

mod categories;
mod chat_messages;
mod error;
mod goals;
mod ops;
mod period;
pub mod summary;
mod transactions;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
