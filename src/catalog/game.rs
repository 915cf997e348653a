use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, serde_as};
use utoipa::ToSchema;

/// Ordered list of records; always persisted as a whole.
pub type Collection = Vec<Game>;

/// One catalog entry describing a board game.
///
/// Text and tag fields accept `null` as well as a missing key, both meaning empty.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// Stable identity, unique within the collection.
    pub id: String,
    /// Display name.
    pub nom: String,
    /// Fewest players.
    #[serde(default)]
    pub nb_joueur_min: Option<u32>,
    /// Most players.
    #[serde(default)]
    pub nb_joueur_max: Option<u32>,
    /// Minimum recommended age.
    #[serde(default)]
    pub age: Option<u32>,
    /// Duration in minutes.
    #[serde(default)]
    pub duree: Option<u32>,
    /// Tags, serialized as `type`.
    #[serde(rename = "type", default)]
    #[serde_as(as = "DefaultOnNull")]
    pub types: Vec<String>,
    /// Free-form remarks.
    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub remarque: String,
    /// External link.
    #[serde(default)]
    pub lien: Option<String>,
    /// Free-form description.
    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub description: String,
    /// Embedded image as a data URL, or empty.
    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub photo: String,
}

impl Game {
    /// True when the record carries `tag`, ignoring case.
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.to_lowercase();
        self.types.iter().any(|t| t.to_lowercase() == wanted)
    }

    /// External link when one is set and not blank.
    pub fn link(&self) -> Option<&str> {
        self.lien.as_deref().map(str::trim).filter(|l| !l.is_empty())
    }
}
