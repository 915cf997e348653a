use serde_json::Value;
use tracing::{info, warn};

use crate::{
    catalog::{
        Collection, Game,
        editor::RecordEditor,
        error::{CatalogError, CatalogResult},
        filter::{FilterCriteria, filtered, known_tags},
        gate::Gate,
        render::{GameRow, render_rows},
        repository::CatalogRepository,
        tags::normalize_tags,
    },
    dto::games::SaveAck,
};

/// One user's working copy of the collection.
///
/// Every mutation writes the full collection back through the repository; the
/// local copy only changes once that write succeeded.
pub struct CatalogSession<R> {
    repository: R,
    games: Collection,
}

impl<R: CatalogRepository> CatalogSession<R> {
    /// Empty session; call [`CatalogSession::load`] first.
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            games: Vec::new(),
        }
    }

    /// Replace the local copy with the repository's current collection.
    pub async fn load(&mut self) -> CatalogResult<&[Game]> {
        self.games = self.repository.load().await?;
        Ok(&self.games)
    }

    /// Local copy, in display order.
    pub fn games(&self) -> &[Game] {
        &self.games
    }

    /// Record with `id`, if present.
    pub fn find(&self, id: &str) -> Option<&Game> {
        self.games.iter().find(|game| game.id == id)
    }

    /// Records passing `criteria`.
    pub fn view(&self, criteria: &FilterCriteria) -> Vec<&Game> {
        filtered(&self.games, criteria)
    }

    /// Display rows for the filtered view.
    pub fn rows(&self, criteria: &FilterCriteria) -> Vec<GameRow> {
        render_rows(&self.view(criteria))
    }

    /// Distinct tags across the local copy.
    pub fn known_tags(&self) -> Vec<String> {
        known_tags(&self.games)
    }

    /// Editor on an existing record, read-only until unlocked.
    pub fn open(&self, id: &str) -> Option<RecordEditor> {
        self.find(id)
            .map(|game| RecordEditor::open(game, self.known_tags()))
    }

    /// Replace the record with the same id, or put a new one at the front.
    pub async fn upsert(&mut self, game: Game) -> CatalogResult<SaveAck> {
        let mut next = self.games.clone();
        match next.iter_mut().find(|existing| existing.id == game.id) {
            Some(existing) => *existing = game,
            None => next.insert(0, game),
        }
        self.commit(next).await
    }

    /// Validate the editor's record, then upsert it.
    pub async fn submit(&mut self, editor: &mut RecordEditor) -> CatalogResult<Game> {
        let game = editor.submit().await?;
        self.upsert(game.clone()).await?;
        info!(id = %game.id, "record saved");
        Ok(game)
    }

    /// Remove a record after the gate and a confirmation step.
    ///
    /// Returns `None` when the user declined the confirmation or the id is unknown.
    pub async fn delete<F>(
        &mut self,
        gate: &Gate,
        secret: &str,
        id: &str,
        confirm: F,
    ) -> CatalogResult<Option<Game>>
    where
        F: FnOnce(&Game) -> bool,
    {
        gate.check(secret)?;

        let Some(position) = self.games.iter().position(|game| game.id == id) else {
            warn!(id, "delete requested for unknown record");
            return Ok(None);
        };
        if !confirm(&self.games[position]) {
            return Ok(None);
        }

        let mut next = self.games.clone();
        let removed = next.remove(position);
        self.commit(next).await?;
        info!(id, "record deleted");
        Ok(Some(removed))
    }

    /// Pretty-printed JSON of the local copy. No network involved.
    pub fn export(&self) -> CatalogResult<String> {
        serde_json::to_string_pretty(&self.games)
            .map_err(|err| CatalogError::Validation(format!("cannot serialize collection: {err}")))
    }

    /// Replace the remote collection with the contents of an exported file, then reload.
    pub async fn import(&mut self, text: &str) -> CatalogResult<usize> {
        let value: Value = serde_json::from_str(text)
            .map_err(|err| CatalogError::Validation(format!("invalid JSON: {err}")))?;
        if !value.is_array() {
            return Err(CatalogError::Validation(
                "the file must contain an array of games".into(),
            ));
        }
        let mut games: Collection = serde_json::from_value(value)
            .map_err(|err| CatalogError::Validation(format!("invalid game record: {err}")))?;
        for game in &mut games {
            game.types = normalize_tags(&game.types);
        }

        self.repository.save(games).await?;
        let count = self.load().await?.len();
        info!(count, "collection imported");
        Ok(count)
    }

    async fn commit(&mut self, next: Collection) -> CatalogResult<SaveAck> {
        let ack = self.repository.save(next.clone()).await?;
        self.games = next;
        Ok(ack)
    }
}
