//! Pure filtering over an in-memory collection.
//!
//! Missing numeric fields count as `0` in every predicate: a record without an
//! age fails any age threshold, a record without a duration passes any
//! duration ceiling, and a record without player bounds never brackets a
//! requested player count. A threshold of `None` or `Some(0)` disables its
//! predicate.

use std::collections::HashSet;

use crate::catalog::Game;

/// Fields the free-text query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    /// Name only.
    #[default]
    Name,
    /// Name, description, remarks and tags.
    Everything,
}

/// Current filter inputs. All criteria combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Free text, trimmed and matched case-insensitively.
    pub query: String,
    /// Fields `query` is matched against.
    pub scope: SearchScope,
    /// A record passes when it carries any of these tags.
    pub tags: Vec<String>,
    /// Keep records whose recommended age is at least this.
    pub min_age: Option<u32>,
    /// Keep records playable within this many minutes.
    pub max_duration: Option<u32>,
    /// Player count the record's range must accommodate.
    pub min_players: Option<u32>,
    /// Player count the record's range must accommodate.
    pub max_players: Option<u32>,
}

impl FilterCriteria {
    /// True when no predicate is active and every record passes.
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty()
            && self.tags.is_empty()
            && active(self.min_age).is_none()
            && active(self.max_duration).is_none()
            && active(self.min_players).is_none()
            && active(self.max_players).is_none()
    }

    fn matches(&self, game: &Game, query: &str, tags: &[String]) -> bool {
        matches_query(game, query, self.scope)
            && matches_tags(game, tags)
            && active(self.min_age).is_none_or(|min| game.age.unwrap_or(0) >= min)
            && active(self.max_duration).is_none_or(|max| game.duree.unwrap_or(0) <= max)
            && active(self.min_players).is_none_or(|players| brackets(game, players))
            && active(self.max_players).is_none_or(|players| brackets(game, players))
    }
}

/// Records matching `criteria`, in their original order.
pub fn filtered<'a>(games: &'a [Game], criteria: &FilterCriteria) -> Vec<&'a Game> {
    let query = criteria.query.trim().to_lowercase();
    let tags = criteria
        .tags
        .iter()
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect::<Vec<_>>();

    games
        .iter()
        .filter(|game| criteria.matches(game, &query, &tags))
        .collect()
}

/// Distinct tags across the collection, sorted case-insensitively.
///
/// Tags differing only by case collapse onto the first spelling seen.
pub fn known_tags(games: &[Game]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags = games
        .iter()
        .flat_map(|game| game.types.iter())
        .filter(|tag| !tag.trim().is_empty())
        .filter(|tag| seen.insert(tag.to_lowercase()))
        .cloned()
        .collect::<Vec<_>>();
    tags.sort_by_key(|tag| tag.to_lowercase());
    tags
}

fn active(threshold: Option<u32>) -> Option<u32> {
    threshold.filter(|value| *value > 0)
}

fn matches_query(game: &Game, query: &str, scope: SearchScope) -> bool {
    if query.is_empty() {
        return true;
    }
    match scope {
        SearchScope::Name => game.nom.to_lowercase().contains(query),
        SearchScope::Everything => [
            game.nom.as_str(),
            game.description.as_str(),
            game.remarque.as_str(),
            game.types.join(" ").as_str(),
        ]
        .join(" ")
        .to_lowercase()
        .contains(query),
    }
}

fn matches_tags(game: &Game, wanted: &[String]) -> bool {
    wanted.is_empty()
        || game
            .types
            .iter()
            .any(|tag| wanted.contains(&tag.to_lowercase()))
}

fn brackets(game: &Game, players: u32) -> bool {
    game.nb_joueur_min.unwrap_or(0) <= players && game.nb_joueur_max.unwrap_or(0) >= players
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(id: &str, nom: &str) -> Game {
        Game {
            id: id.into(),
            nom: nom.into(),
            ..Game::default()
        }
    }

    fn sample() -> Vec<Game> {
        vec![
            Game {
                nb_joueur_min: Some(3),
                nb_joueur_max: Some(4),
                age: Some(10),
                duree: Some(90),
                types: vec!["Stratégie".into(), "Commerce".into()],
                description: "Colonisez une île".into(),
                ..game("catan", "Catan")
            },
            Game {
                nb_joueur_min: Some(2),
                nb_joueur_max: Some(5),
                age: Some(7),
                duree: Some(35),
                types: vec!["Tuiles".into()],
                remarque: "Extension rivière incluse".into(),
                ..game("carca", "Carcassonne")
            },
            Game {
                nb_joueur_min: Some(3),
                nb_joueur_max: Some(8),
                age: Some(8),
                duree: Some(30),
                types: vec!["Ambiance".into(), "Coopératif".into()],
                ..game("dixit", "Dixit")
            },
            game("bare", "Jeu sans fiche"),
        ]
    }

    fn ids(games: Vec<&Game>) -> Vec<&str> {
        games.into_iter().map(|g| g.id.as_str()).collect()
    }

    #[test]
    fn empty_criteria_keep_everything_in_order() {
        let games = sample();
        let criteria = FilterCriteria::default();
        assert!(criteria.is_empty());
        assert_eq!(
            ids(filtered(&games, &criteria)),
            ["catan", "carca", "dixit", "bare"]
        );
    }

    #[test]
    fn name_query_is_case_insensitive_substring() {
        let games = sample();
        let criteria = FilterCriteria {
            query: "  CA ".into(),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(filtered(&games, &criteria)), ["catan", "carca"]);
    }

    #[test]
    fn everything_scope_searches_text_fields_and_tags() {
        let games = sample();
        let by_remark = FilterCriteria {
            query: "rivière".into(),
            scope: SearchScope::Everything,
            ..FilterCriteria::default()
        };
        assert_eq!(ids(filtered(&games, &by_remark)), ["carca"]);

        let by_tag = FilterCriteria {
            query: "coopé".into(),
            scope: SearchScope::Everything,
            ..FilterCriteria::default()
        };
        assert_eq!(ids(filtered(&games, &by_tag)), ["dixit"]);

        let name_only = FilterCriteria {
            query: "rivière".into(),
            ..FilterCriteria::default()
        };
        assert!(filtered(&games, &name_only).is_empty());
    }

    #[test]
    fn tag_filter_is_an_or_across_selected_tags() {
        let games = sample();
        let criteria = FilterCriteria {
            tags: vec!["tuiles".into(), "Ambiance".into()],
            ..FilterCriteria::default()
        };
        assert_eq!(ids(filtered(&games, &criteria)), ["carca", "dixit"]);
    }

    #[test]
    fn every_record_is_found_by_each_of_its_tags() {
        let games = sample();
        for game in &games {
            for tag in &game.types {
                let criteria = FilterCriteria {
                    tags: vec![tag.clone()],
                    ..FilterCriteria::default()
                };
                assert!(filtered(&games, &criteria).contains(&game));
            }
        }
    }

    #[test]
    fn unknown_tag_matches_nothing() {
        let games = sample();
        let criteria = FilterCriteria {
            tags: vec!["Wargame".into()],
            ..FilterCriteria::default()
        };
        assert!(filtered(&games, &criteria).is_empty());
    }

    #[test]
    fn tags_combine_with_other_criteria() {
        let games = sample();
        let criteria = FilterCriteria {
            tags: vec!["Tuiles".into(), "Stratégie".into()],
            min_age: Some(9),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(filtered(&games, &criteria)), ["catan"]);
    }

    #[test]
    fn min_age_treats_missing_age_as_zero() {
        let games = sample();
        let criteria = FilterCriteria {
            min_age: Some(8),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(filtered(&games, &criteria)), ["catan", "dixit"]);
    }

    #[test]
    fn duration_ceiling_lets_missing_duration_through() {
        let games = sample();
        let criteria = FilterCriteria {
            max_duration: Some(35),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(filtered(&games, &criteria)), ["carca", "dixit", "bare"]);
    }

    #[test]
    fn player_count_must_fall_within_record_bounds() {
        let games = sample();
        let two = FilterCriteria {
            min_players: Some(2),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(filtered(&games, &two)), ["carca"]);

        let six = FilterCriteria {
            max_players: Some(6),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(filtered(&games, &six)), ["dixit"]);

        let both = FilterCriteria {
            min_players: Some(3),
            max_players: Some(4),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(filtered(&games, &both)), ["catan", "carca", "dixit"]);
    }

    #[test]
    fn zero_thresholds_are_ignored() {
        let games = sample();
        let criteria = FilterCriteria {
            min_age: Some(0),
            max_duration: Some(0),
            min_players: Some(0),
            max_players: Some(0),
            ..FilterCriteria::default()
        };
        assert!(criteria.is_empty());
        assert_eq!(filtered(&games, &criteria).len(), games.len());
    }

    #[test]
    fn known_tags_are_sorted_and_deduplicated() {
        let mut games = sample();
        games.push(Game {
            types: vec!["stratégie".into(), "Abstrait".into(), " ".into()],
            ..game("x", "X")
        });
        assert_eq!(
            known_tags(&games),
            [
                "Abstrait",
                "Ambiance",
                "Commerce",
                "Coopératif",
                "Stratégie",
                "Tuiles"
            ]
        );
    }
}
