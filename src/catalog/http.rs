use futures::future::BoxFuture;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::{
    catalog::{
        Collection,
        error::{CatalogError, CatalogResult},
        repository::CatalogRepository,
    },
    dto::games::SaveAck,
};

/// Talks to the `/games` endpoint over HTTP.
#[derive(Clone)]
pub struct HttpCatalogRepository {
    client: Client,
    url: String,
}

#[derive(Deserialize)]
struct ErrorPayload {
    error: String,
}

impl HttpCatalogRepository {
    /// `url` is the full address of the collection resource, e.g. `http://host:8080/games`.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), url)
    }

    /// Reuse an existing client, e.g. one with custom timeouts or TLS roots.
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    async fn fetch(&self) -> CatalogResult<Collection> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|err| CatalogError::Transport(format!("GET {}: {err}", self.url)))?;
        let response = check_status(response, "GET").await?;
        let games = response
            .json::<Collection>()
            .await
            .map_err(|err| CatalogError::Transport(format!("GET {}: {err}", self.url)))?;
        debug!(count = games.len(), "collection fetched");
        Ok(games)
    }

    async fn store(&self, games: Collection) -> CatalogResult<SaveAck> {
        let response = self
            .client
            .post(&self.url)
            .json(&games)
            .send()
            .await
            .map_err(|err| CatalogError::Transport(format!("POST {}: {err}", self.url)))?;
        let response = check_status(response, "POST").await?;
        response
            .json::<SaveAck>()
            .await
            .map_err(|err| CatalogError::Transport(format!("POST {}: {err}", self.url)))
    }
}

/// Map non-2xx answers to the client error taxonomy using the `{error}` payload when present.
async fn check_status(response: Response, verb: &str) -> CatalogResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ErrorPayload>().await {
        Ok(payload) => payload.error,
        Err(_) => format!("{verb} failed with status {status}"),
    };
    Err(match status {
        StatusCode::BAD_REQUEST => CatalogError::Validation(message),
        status if status.is_server_error() => CatalogError::Storage(message),
        _ => CatalogError::Transport(message),
    })
}

impl CatalogRepository for HttpCatalogRepository {
    fn load(&self) -> BoxFuture<'static, CatalogResult<Collection>> {
        let repository = self.clone();
        Box::pin(async move { repository.fetch().await })
    }

    fn save(&self, games: Collection) -> BoxFuture<'static, CatalogResult<SaveAck>> {
        let repository = self.clone();
        Box::pin(async move { repository.store(games).await })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::net::TcpListener;

    use super::*;
    use crate::{
        catalog::{CatalogSession, Game, Gate},
        config::AppConfig,
        dao::blob_store::InMemoryBlobStore,
        routes,
        state::AppState,
    };

    async fn serve(state: crate::state::SharedState) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, routes::app(state).into_make_service())
                .await
                .unwrap();
        });
        format!("http://{addr}/games")
    }

    async fn running_server() -> String {
        let state =
            AppState::with_store(AppConfig::default(), Arc::new(InMemoryBlobStore::new())).await;
        serve(state).await
    }

    fn game(id: &str, nom: &str) -> Game {
        Game {
            id: id.into(),
            nom: nom.into(),
            ..Game::default()
        }
    }

    #[tokio::test]
    async fn session_round_trip_over_http() {
        let url = running_server().await;
        let mut session = CatalogSession::new(HttpCatalogRepository::new(&url));
        assert!(session.load().await.unwrap().is_empty());

        session.upsert(game("a1", "Catan")).await.unwrap();
        session.upsert(game("a2", "Carcassonne")).await.unwrap();

        let mut other = CatalogSession::new(HttpCatalogRepository::new(&url));
        let ids: Vec<_> = other
            .load()
            .await
            .unwrap()
            .iter()
            .map(|g| g.id.clone())
            .collect();
        assert_eq!(ids, ["a2", "a1"]);

        let gate = Gate::new("1664");
        other.delete(&gate, "1664", "a1", |_| true).await.unwrap();
        session.load().await.unwrap();
        assert_eq!(session.games(), [game("a2", "Carcassonne")]);
    }

    #[tokio::test]
    async fn last_writer_wins_between_sessions() {
        let url = running_server().await;
        let mut first = CatalogSession::new(HttpCatalogRepository::new(&url));
        let mut second = CatalogSession::new(HttpCatalogRepository::new(&url));
        first.load().await.unwrap();
        second.load().await.unwrap();

        first.upsert(game("a1", "Catan")).await.unwrap();
        second.upsert(game("b1", "Azul")).await.unwrap();

        first.load().await.unwrap();
        assert_eq!(first.games(), [game("b1", "Azul")]);
    }

    #[tokio::test]
    async fn server_rejection_maps_to_validation_error() {
        let url = running_server().await;
        let repository = HttpCatalogRepository::new(&url);
        let err = repository
            .save(vec![game("a1", "Catan"), game("a1", "Catan")])
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(message) if message.contains("duplicate")));
    }

    #[tokio::test]
    async fn degraded_server_maps_to_storage_error() {
        let url = serve(AppState::new(AppConfig::default())).await;
        let err = HttpCatalogRepository::new(&url).load().await.unwrap_err();
        assert!(matches!(err, CatalogError::Storage(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = HttpCatalogRepository::new(format!("http://{addr}/games"))
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Transport(_)));
    }
}
