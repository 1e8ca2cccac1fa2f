//! Relational record families backed by SeaORM (PostgreSQL or SQLite).

pub mod entity;
mod error;

pub use error::{RelationalDaoError, RelationalResult};

use std::marker::PhantomData;

use futures::future::BoxFuture;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, Database, DatabaseConnection,
    EntityName, EntityTrait, IntoActiveModel, PrimaryKeyTrait, QueryFilter, QueryOrder, QuerySelect,
    Schema,
};
use tracing::info;

use crate::dao::{
    patch::Patchable,
    storage::{FilterValue, Query, Record, StorageError, StorageHandle, StorageResult},
};

/// SeaORM entity exposed as a record family with an `i32` primary key.
pub trait RelationalEntity: EntityTrait {
    type Fields: Patchable;

    /// Primary key column, used for ordering.
    fn id_column() -> Self::Column;

    /// Column storing the schema field `field`.
    fn column(field: &str) -> Option<Self::Column>;

    fn into_record(model: Self::Model) -> Record<i32, Self::Fields>;

    /// Active model writing every schema field; `id` decides insert vs update.
    fn active_model(id: ActiveValue<i32>, fields: Self::Fields) -> Self::ActiveModel;
}

/// Open a connection pool for `url` (`postgres://…` or `sqlite:…`).
pub async fn connect(url: &str) -> RelationalResult<DatabaseConnection> {
    let db = Database::connect(url)
        .await
        .map_err(|source| RelationalDaoError::Connect { source })?;
    info!(backend = ?db.get_database_backend(), "relational database connected");
    Ok(db)
}

/// Create the user and item tables when missing.
pub async fn ensure_schema(db: &DatabaseConnection) -> RelationalResult<()> {
    let schema = Schema::new(db.get_database_backend());
    let tables = [
        (
            entity::user::Entity.table_name(),
            schema.create_table_from_entity(entity::user::Entity),
        ),
        (
            entity::item::Entity.table_name(),
            schema.create_table_from_entity(entity::item::Entity),
        ),
    ];
    for (table, mut statement) in tables {
        statement.if_not_exists();
        db.execute(&statement)
            .await
            .map_err(|source| RelationalDaoError::CreateTable { table, source })?;
    }
    Ok(())
}

/// Storage handle over one SeaORM entity.
pub struct RelationalCollection<E> {
    db: DatabaseConnection,
    entity: PhantomData<fn() -> E>,
}

impl<E> Clone for RelationalCollection<E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            entity: PhantomData,
        }
    }
}

impl<E: RelationalEntity> RelationalCollection<E> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            entity: PhantomData,
        }
    }

    fn table() -> &'static str {
        E::default().table_name()
    }
}

impl<E> StorageHandle for RelationalCollection<E>
where
    E: RelationalEntity,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: Send + Sync,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    type Id = i32;
    type Fields = E::Fields;

    fn find_by_id(&self, id: i32) -> BoxFuture<'static, StorageResult<Option<Record<i32, E::Fields>>>> {
        let db = self.db.clone();
        Box::pin(async move {
            let model = E::find_by_id(id)
                .one(&db)
                .await
                .map_err(|source| RelationalDaoError::Load {
                    table: Self::table(),
                    id,
                    source,
                })?;
            Ok(model.map(E::into_record))
        })
    }

    fn find_many(&self, query: Query) -> BoxFuture<'static, StorageResult<Vec<Record<i32, E::Fields>>>> {
        let db = self.db.clone();
        Box::pin(async move {
            let mut select = E::find();
            if let Some(filter) = query.filter {
                let column = E::column(filter.field).ok_or_else(|| {
                    StorageError::corrupt(format!(
                        "table `{}` has no column `{}`",
                        Self::table(),
                        filter.field
                    ))
                })?;
                select = match filter.value {
                    FilterValue::Int(value) => select.filter(column.eq(value)),
                    FilterValue::Text(value) => select.filter(column.eq(value)),
                };
            }
            let models = select
                .order_by_asc(E::id_column())
                .offset(query.skip)
                .limit(query.limit)
                .all(&db)
                .await
                .map_err(|source| RelationalDaoError::List {
                    table: Self::table(),
                    source,
                })?;
            Ok(models.into_iter().map(E::into_record).collect())
        })
    }

    fn insert(&self, fields: E::Fields) -> BoxFuture<'static, StorageResult<Record<i32, E::Fields>>> {
        let db = self.db.clone();
        Box::pin(async move {
            let model = E::active_model(ActiveValue::NotSet, fields)
                .insert(&db)
                .await
                .map_err(|source| RelationalDaoError::Insert {
                    table: Self::table(),
                    source,
                })?;
            Ok(E::into_record(model))
        })
    }

    fn replace(&self, id: i32, fields: E::Fields) -> BoxFuture<'static, StorageResult<bool>> {
        let db = self.db.clone();
        Box::pin(async move {
            let result = E::update_many()
                .set(E::active_model(ActiveValue::NotSet, fields))
                .filter(E::id_column().eq(id))
                .exec(&db)
                .await
                .map_err(|source| RelationalDaoError::Replace {
                    table: Self::table(),
                    id,
                    source,
                })?;
            Ok(result.rows_affected > 0)
        })
    }

    fn delete(&self, id: i32) -> BoxFuture<'static, StorageResult<bool>> {
        let db = self.db.clone();
        Box::pin(async move {
            let result = E::delete_by_id(id)
                .exec(&db)
                .await
                .map_err(|source| RelationalDaoError::Delete {
                    table: Self::table(),
                    id,
                    source,
                })?;
            Ok(result.rows_affected > 0)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let db = self.db.clone();
        Box::pin(async move {
            db.ping()
                .await
                .map_err(|source| RelationalDaoError::HealthPing { source })?;
            Ok(())
        })
    }
}

/// User accounts table.
pub type UserCollection = RelationalCollection<entity::user::Entity>;
/// Owned items table.
pub type ItemCollection = RelationalCollection<entity::item::Entity>;
