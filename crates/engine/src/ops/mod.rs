use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};

use crate::ResultEngine;

mod categories;
mod chat;
mod goals;
mod summary;
mod transactions;

pub use goals::{GoalChanges, GoalNew};
pub use transactions::{TransactionChanges, TransactionListFilter, TransactionNew};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Owner-scoped access to the store.
///
/// Every operation takes the owner id resolved by the auth layer; rows of
/// other owners are reported as not found.
#[derive(Debug, Clone)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Round-trips a trivial statement to check the store is reachable.
    pub async fn ping(&self) -> ResultEngine<()> {
        let backend = self.database.get_database_backend();
        self.database
            .execute(Statement::from_string(backend, "SELECT 1"))
            .await?;
        Ok(())
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
