use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::dao::storage::StorageError;

pub type RelationalResult<T> = std::result::Result<T, RelationalDaoError>;

#[derive(Debug, Error)]
pub enum RelationalDaoError {
    #[error("failed to connect to the relational database")]
    Connect {
        #[source]
        source: DbErr,
    },
    #[error("failed to create table `{table}`")]
    CreateTable {
        table: &'static str,
        #[source]
        source: DbErr,
    },
    #[error("relational database ping failed")]
    HealthPing {
        #[source]
        source: DbErr,
    },
    #[error("failed to load `{table}` row `{id}`")]
    Load {
        table: &'static str,
        id: i32,
        #[source]
        source: DbErr,
    },
    #[error("failed to list `{table}` rows")]
    List {
        table: &'static str,
        #[source]
        source: DbErr,
    },
    #[error("failed to insert into `{table}`")]
    Insert {
        table: &'static str,
        #[source]
        source: DbErr,
    },
    #[error("failed to update `{table}` row `{id}`")]
    Replace {
        table: &'static str,
        id: i32,
        #[source]
        source: DbErr,
    },
    #[error("failed to delete `{table}` row `{id}`")]
    Delete {
        table: &'static str,
        id: i32,
        #[source]
        source: DbErr,
    },
}

impl RelationalDaoError {
    fn db_err(&self) -> &DbErr {
        match self {
            RelationalDaoError::Connect { source }
            | RelationalDaoError::CreateTable { source, .. }
            | RelationalDaoError::HealthPing { source }
            | RelationalDaoError::Load { source, .. }
            | RelationalDaoError::List { source, .. }
            | RelationalDaoError::Insert { source, .. }
            | RelationalDaoError::Replace { source, .. }
            | RelationalDaoError::Delete { source, .. } => source,
        }
    }
}

impl From<RelationalDaoError> for StorageError {
    fn from(err: RelationalDaoError) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.db_err().sql_err() {
            return StorageError::conflict(format!("{err}: {detail}"));
        }
        let message = err.to_string();
        StorageError::unavailable(message, err)
    }
}
