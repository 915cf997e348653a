use crate::catalog::Game;

/// Shown instead of rows when the collection is empty.
pub const EMPTY_MESSAGE: &str = "No games yet. Use `add` to create one.";

/// Display projection of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRow {
    /// Record id, used to open the editor.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Photo data URL when the record has one.
    pub thumbnail: Option<String>,
    /// e.g. `2–4 players • 8+ • 45 min`, with `?` for unknown values.
    pub summary: String,
    /// Tags as stored.
    pub tags: Vec<String>,
    /// External link, omitted when blank.
    pub link: Option<String>,
}

impl From<&Game> for GameRow {
    fn from(game: &Game) -> Self {
        let show = |value: Option<u32>| value.map_or_else(|| "?".to_owned(), |v| v.to_string());
        Self {
            id: game.id.clone(),
            name: game.nom.clone(),
            thumbnail: (!game.photo.is_empty()).then(|| game.photo.clone()),
            summary: format!(
                "{}–{} players • {}+ • {} min",
                show(game.nb_joueur_min),
                show(game.nb_joueur_max),
                show(game.age),
                show(game.duree)
            ),
            tags: game.types.clone(),
            link: game.link().map(str::to_owned),
        }
    }
}

/// One row per record, in view order.
pub fn render_rows(view: &[&Game]) -> Vec<GameRow> {
    view.iter().map(|game| GameRow::from(*game)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_numbers_render_as_question_marks() {
        let game = Game {
            id: "a1".into(),
            nom: "Catan".into(),
            nb_joueur_min: Some(3),
            duree: Some(90),
            lien: Some(" ".into()),
            ..Game::default()
        };
        let row = GameRow::from(&game);
        assert_eq!(row.summary, "3–? players • ?+ • 90 min");
        assert_eq!(row.thumbnail, None);
        assert_eq!(row.link, None);
    }

    #[test]
    fn rows_keep_view_order() {
        let a = Game {
            id: "a".into(),
            nom: "A".into(),
            photo: "data:image/png;base64,AA==".into(),
            ..Game::default()
        };
        let b = Game {
            id: "b".into(),
            nom: "B".into(),
            ..Game::default()
        };
        let rows = render_rows(&[&b, &a]);
        assert_eq!(rows[0].id, "b");
        assert_eq!(rows[1].thumbnail.as_deref(), Some("data:image/png;base64,AA=="));
    }
}
