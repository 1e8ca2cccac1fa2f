use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tracing::info;

use super::{
    config::CouchConfig,
    error::{CouchDaoError, CouchResult},
    models::{AllDocsResponse, CouchEntry, END_SUFFIX},
};
use crate::dao::{kv::KvStore, storage::StorageResult};

/// Key-value store persisting each entry as a CouchDB document.
#[derive(Clone)]
pub struct CouchKvStore {
    client: Client,
    base_url: Arc<str>,
    database: Arc<str>,
    auth: Option<(Arc<str>, Arc<str>)>,
}

impl CouchKvStore {
    /// Establish a connection to CouchDB and ensure the database exists.
    pub async fn connect(config: CouchConfig) -> CouchResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| CouchDaoError::ClientBuilder { source })?;

        let base_url = Arc::<str>::from(config.base_url.trim_end_matches('/'));
        let database = Arc::<str>::from(config.database);
        let auth = config
            .username
            .zip(config.password)
            .map(|(u, p)| (Arc::<str>::from(u), Arc::<str>::from(p)));

        let store = Self {
            client,
            base_url,
            database,
            auth,
        };

        store.ensure_database().await?;
        info!(database = %store.database, "CouchDB key-value store ready");
        Ok(store)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth {
            Some((ref user, ref pass)) => builder.basic_auth(user.as_ref(), Some(pass.as_ref())),
            None => builder,
        }
    }

    fn database_url(&self) -> String {
        format!("{}/{}", self.base_url, self.database)
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.database_url(), path);
        self.authorized(self.client.request(method, url))
    }

    async fn ensure_database(&self) -> CouchResult<()> {
        let database = self.database.to_string();
        let url = self.database_url();

        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(|source| CouchDaoError::DatabaseQuery {
                database: database.clone(),
                source,
            })?;

        match response.status() {
            StatusCode::OK => Ok(()),
            StatusCode::NOT_FOUND => {
                let create = self
                    .authorized(self.client.put(&url))
                    .send()
                    .await
                    .map_err(|source| CouchDaoError::DatabaseCreate {
                        database: database.clone(),
                        source,
                    })?;
                if create.status().is_success() {
                    Ok(())
                } else {
                    Err(CouchDaoError::DatabaseStatus {
                        database,
                        status: create.status(),
                    })
                }
            }
            other => Err(CouchDaoError::DatabaseStatus {
                database,
                status: other,
            }),
        }
    }

    async fn get_entry(&self, key: &str) -> CouchResult<Option<CouchEntry>> {
        let response = self
            .request(Method::GET, key)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: key.to_string(),
                source,
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => response
                .json::<CouchEntry>()
                .await
                .map(Some)
                .map_err(|source| CouchDaoError::DecodeResponse {
                    path: key.to_string(),
                    source,
                }),
            other => Err(CouchDaoError::RequestStatus {
                path: key.to_string(),
                status: other,
            }),
        }
    }

    async fn put_entry(&self, key: &str, value: Value) -> CouchResult<()> {
        let rev = self.get_entry(key).await?.and_then(|existing| existing.rev);
        let entry = CouchEntry {
            id: key.to_string(),
            rev,
            value,
        };
        let response = self
            .request(Method::PUT, key)
            .json(&entry)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: key.to_string(),
                source,
            })?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::CONFLICT => Err(CouchDaoError::RevisionConflict {
                path: key.to_string(),
            }),
            other => Err(CouchDaoError::RequestStatus {
                path: key.to_string(),
                status: other,
            }),
        }
    }

    async fn delete_entry(&self, key: &str) -> CouchResult<bool> {
        let Some(rev) = self.get_entry(key).await?.and_then(|existing| existing.rev) else {
            return Ok(false);
        };
        let response = self
            .request(Method::DELETE, key)
            .query(&[("rev", rev)])
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: key.to_string(),
                source,
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            StatusCode::CONFLICT => Err(CouchDaoError::RevisionConflict {
                path: key.to_string(),
            }),
            other => Err(CouchDaoError::RequestStatus {
                path: key.to_string(),
                status: other,
            }),
        }
    }

    async fn list_entries(&self, prefix: &str) -> CouchResult<Vec<(String, Value)>> {
        const ALL_DOCS: &str = "_all_docs";
        let query = [
            ("include_docs", "true".to_string()),
            ("startkey", format!("\"{prefix}\"")),
            ("endkey", format!("\"{prefix}{END_SUFFIX}\"")),
        ];

        let response = self
            .request(Method::GET, ALL_DOCS)
            .query(&query)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: ALL_DOCS.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(CouchDaoError::RequestStatus {
                path: ALL_DOCS.to_string(),
                status: response.status(),
            });
        }

        let payload = response
            .json::<AllDocsResponse>()
            .await
            .map_err(|source| CouchDaoError::DecodeResponse {
                path: ALL_DOCS.to_string(),
                source,
            })?;

        // `_all_docs` already returns rows sorted by id.
        Ok(payload
            .rows
            .into_iter()
            .filter_map(|row| row.doc.map(|doc| (row.id, doc.value)))
            .collect())
    }
}

impl KvStore for CouchKvStore {
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<Value>>> {
        let store = self.clone();
        let key = key.to_owned();
        Box::pin(async move {
            let entry = store.get_entry(&key).await?;
            Ok(entry.map(|entry| entry.value))
        })
    }

    fn put(&self, key: &str, value: Value) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        let key = key.to_owned();
        Box::pin(async move { store.put_entry(&key, value).await.map_err(Into::into) })
    }

    fn delete(&self, key: &str) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        let key = key.to_owned();
        Box::pin(async move { store.delete_entry(&key).await.map_err(Into::into) })
    }

    fn scan(&self, prefix: &str) -> BoxFuture<'static, StorageResult<Vec<(String, Value)>>> {
        let store = self.clone();
        let prefix = prefix.to_owned();
        Box::pin(async move { store.list_entries(&prefix).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let url = store.database_url();
            let response = store
                .authorized(store.client.get(&url))
                .send()
                .await
                .map_err(|source| CouchDaoError::RequestSend {
                    path: url.clone(),
                    source,
                })?;

            if response.status().is_success() {
                Ok(())
            } else {
                Err(CouchDaoError::RequestStatus {
                    path: url,
                    status: response.status(),
                }
                .into())
            }
        })
    }
}
