use std::marker::PhantomData;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc},
    options::IndexOptions,
};

use super::{
    error::{MongoDaoError, MongoResult},
    models::{MongoDocument, doc_id, filter_value},
};
use crate::dao::{
    id::DocumentId,
    patch::Patchable,
    storage::{Query, Record, StorageHandle, StorageResult},
};

/// Storage handle over one MongoDB collection.
pub struct MongoCollection<F> {
    database: Database,
    name: &'static str,
    fields: PhantomData<fn() -> F>,
}

impl<F> Clone for MongoCollection<F> {
    fn clone(&self) -> Self {
        Self {
            database: self.database.clone(),
            name: self.name,
            fields: PhantomData,
        }
    }
}

impl<F: Patchable + Unpin> MongoCollection<F> {
    pub fn new(database: Database, name: &'static str) -> Self {
        Self {
            database,
            name,
            fields: PhantomData,
        }
    }

    fn collection(&self) -> Collection<MongoDocument<F>> {
        self.database.collection::<MongoDocument<F>>(self.name)
    }

    /// Create a non-unique ascending index on `field`.
    pub async fn ensure_index(&self, field: &'static str, index_name: &'static str) -> MongoResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { field: 1 })
            .options(IndexOptions::builder().name(Some(index_name.to_owned())).build())
            .build();

        self.database
            .collection::<Document>(self.name)
            .create_index(index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: self.name,
                index: field,
                source,
            })?;
        Ok(())
    }
}

impl<F: Patchable + Unpin> StorageHandle for MongoCollection<F> {
    type Id = DocumentId;
    type Fields = F;

    fn find_by_id(&self, id: DocumentId) -> BoxFuture<'static, StorageResult<Option<Record<DocumentId, F>>>> {
        let collection = self.collection();
        let name = self.name;
        Box::pin(async move {
            let document = collection
                .find_one(doc_id(id.object_id()))
                .await
                .map_err(|source| MongoDaoError::Load {
                    collection: name,
                    id: id.to_string(),
                    source,
                })?;
            Ok(document.map(|document| Record::new(document.id.into(), document.fields)))
        })
    }

    fn find_many(&self, query: Query) -> BoxFuture<'static, StorageResult<Vec<Record<DocumentId, F>>>> {
        let collection = self.collection();
        let name = self.name;
        Box::pin(async move {
            let mut filter = Document::new();
            if let Some(condition) = query.filter {
                filter.insert(condition.field, filter_value(condition.value));
            }
            let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
            let documents: Vec<MongoDocument<F>> = collection
                .find(filter)
                .sort(doc! { "_id": 1 })
                .skip(query.skip)
                .limit(limit)
                .await
                .map_err(|source| MongoDaoError::List {
                    collection: name,
                    source,
                })?
                .try_collect()
                .await
                .map_err(|source| MongoDaoError::List {
                    collection: name,
                    source,
                })?;
            Ok(documents
                .into_iter()
                .map(|document| Record::new(document.id.into(), document.fields))
                .collect())
        })
    }

    fn insert(&self, fields: F) -> BoxFuture<'static, StorageResult<Record<DocumentId, F>>> {
        let collection = self.collection();
        let name = self.name;
        Box::pin(async move {
            let document = MongoDocument {
                id: DocumentId::generate().object_id(),
                fields,
            };
            collection
                .insert_one(&document)
                .await
                .map_err(|source| MongoDaoError::Insert {
                    collection: name,
                    source,
                })?;
            Ok(Record::new(document.id.into(), document.fields))
        })
    }

    fn replace(&self, id: DocumentId, fields: F) -> BoxFuture<'static, StorageResult<bool>> {
        let collection = self.collection();
        let name = self.name;
        Box::pin(async move {
            let document = MongoDocument {
                id: id.object_id(),
                fields,
            };
            let result = collection
                .replace_one(doc_id(document.id), &document)
                .await
                .map_err(|source| MongoDaoError::Replace {
                    collection: name,
                    id: id.to_string(),
                    source,
                })?;
            Ok(result.matched_count > 0)
        })
    }

    fn delete(&self, id: DocumentId) -> BoxFuture<'static, StorageResult<bool>> {
        let collection = self.collection();
        let name = self.name;
        Box::pin(async move {
            let result = collection
                .delete_one(doc_id(id.object_id()))
                .await
                .map_err(|source| MongoDaoError::Delete {
                    collection: name,
                    id: id.to_string(),
                    source,
                })?;
            Ok(result.deleted_count > 0)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let database = self.database.clone();
        Box::pin(async move {
            database
                .run_command(doc! { "ping": 1 })
                .await
                .map_err(|source| MongoDaoError::HealthPing { source })?;
            Ok(())
        })
    }
}
