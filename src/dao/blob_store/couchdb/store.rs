use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{
    Client, Method, StatusCode, Url,
    header::{ETAG, HeaderValue},
};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{debug, info};

use crate::dao::{blob_store::BlobStore, storage::StorageResult};

use super::{
    config::CouchConfig,
    error::{CouchDaoError, CouchResult},
    models::CouchBlobDocument,
};

/// Blob store keeping each key as one CouchDB document.
#[derive(Clone)]
pub struct CouchBlobStore {
    client: Client,
    base_url: Arc<str>,
    database: Arc<str>,
    auth: Option<(Arc<str>, Arc<str>)>,
}

impl CouchBlobStore {
    /// Build the HTTP client and make sure the database exists.
    pub async fn connect(config: CouchConfig) -> CouchResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| CouchDaoError::ClientBuilder { source })?;

        let store = Self {
            client,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
            database: Arc::from(config.database),
            auth: config
                .credentials
                .map(|(user, pass)| (Arc::<str>::from(user), Arc::<str>::from(pass))),
        };

        store.ensure_database().await?;
        info!(database = %store.database, "CouchDB blob store ready");
        Ok(store)
    }

    fn database_url(&self) -> String {
        format!("{}/{}", self.base_url, self.database)
    }

    /// URL of a document, with the key percent-encoded as a single path segment.
    fn document_url(&self, key: &str) -> CouchResult<Url> {
        let database_url = self.database_url();
        let invalid = || CouchDaoError::InvalidUrl {
            url: database_url.clone(),
        };
        let mut url = Url::parse(&database_url).map_err(|_| invalid())?;
        url.path_segments_mut().map_err(|_| invalid())?.push(key);
        Ok(url)
    }

    fn request(&self, method: Method, url: impl reqwest::IntoUrl) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, url);
        match self.auth {
            Some((ref user, ref pass)) => builder.basic_auth(user.as_ref(), Some(pass.as_ref())),
            None => builder,
        }
    }

    async fn ensure_database(&self) -> CouchResult<()> {
        let database = self.database.to_string();
        let response = self
            .request(Method::GET, self.database_url())
            .send()
            .await
            .map_err(|source| CouchDaoError::Database {
                database: database.clone(),
                source,
            })?;

        match response.status() {
            StatusCode::OK => Ok(()),
            StatusCode::NOT_FOUND => {
                info!(%database, "creating missing CouchDB database");
                let create = self
                    .request(Method::PUT, self.database_url())
                    .send()
                    .await
                    .map_err(|source| CouchDaoError::Database {
                        database: database.clone(),
                        source,
                    })?;
                // 412 means another writer created it in the meantime.
                if create.status().is_success() || create.status() == StatusCode::PRECONDITION_FAILED
                {
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

    async fn fetch_document(&self, key: &str) -> CouchResult<Option<CouchBlobDocument>> {
        let response = self
            .request(Method::GET, self.document_url(key)?)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: key.to_owned(),
                source,
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => response
                .json::<CouchBlobDocument>()
                .await
                .map(Some)
                .map_err(|source| CouchDaoError::DecodeResponse {
                    path: key.to_owned(),
                    source,
                }),
            other => Err(CouchDaoError::RequestStatus {
                path: key.to_owned(),
                status: other,
            }),
        }
    }

    /// Current `_rev` of a document, read from the `ETag` of a `HEAD` request.
    async fn current_revision(&self, key: &str) -> CouchResult<Option<String>> {
        let response = self
            .request(Method::HEAD, self.document_url(key)?)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: key.to_owned(),
                source,
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => response
                .headers()
                .get(ETAG)
                .and_then(revision_from_etag)
                .map(Some)
                .ok_or_else(|| CouchDaoError::MissingRevision {
                    path: key.to_owned(),
                }),
            other => Err(CouchDaoError::RequestStatus {
                path: key.to_owned(),
                status: other,
            }),
        }
    }

    async fn put_document(&self, key: &str, content: String) -> CouchResult<()> {
        // Last writer wins: always overwrite whatever revision is current.
        let rev = self.current_revision(key).await?;
        let document = CouchBlobDocument {
            id: key.to_owned(),
            rev,
            content,
            updated_at: OffsetDateTime::now_utc()
                .format(&Rfc3339)
                .unwrap_or_default(),
        };

        let response = self
            .request(Method::PUT, self.document_url(key)?)
            .json(&document)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: key.to_owned(),
                source,
            })?;

        if response.status().is_success() {
            debug!(key, "CouchDB document written");
            Ok(())
        } else {
            Err(CouchDaoError::RequestStatus {
                path: key.to_owned(),
                status: response.status(),
            })
        }
    }
}

impl BlobStore for CouchBlobStore {
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<String>>> {
        let store = self.clone();
        let key = key.to_owned();
        Box::pin(async move {
            let document = store.fetch_document(&key).await?;
            Ok(document.map(|doc| doc.content))
        })
    }

    fn set(&self, key: &str, value: String) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        let key = key.to_owned();
        Box::pin(async move { store.put_document(&key, value).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let url = store.database_url();
            let response = store
                .request(Method::GET, &url)
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

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_database().await.map_err(Into::into) })
    }
}

/// CouchDB sends the revision as a quoted entity tag, e.g. `"3-9c1f..."`.
fn revision_from_etag(value: &HeaderValue) -> Option<String> {
    let rev = value.to_str().ok()?.trim().trim_matches('"');
    (!rev.is_empty()).then(|| rev.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revision_is_unquoted_from_etag() {
        let etag = HeaderValue::from_static("\"3-9c1f0a\"");
        assert_eq!(revision_from_etag(&etag).as_deref(), Some("3-9c1f0a"));
        assert_eq!(
            revision_from_etag(&HeaderValue::from_static("1-abc")).as_deref(),
            Some("1-abc")
        );
        assert_eq!(revision_from_etag(&HeaderValue::from_static("\"\"")), None);
    }
}
