use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::{
    catalog::Game,
    dto::validation::{validate_link, validate_non_blank},
};

/// Acknowledgement returned after the collection has been replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SaveAck {
    pub ok: bool,
    /// Number of records now stored.
    pub count: usize,
}

impl SaveAck {
    pub fn stored(count: usize) -> Self {
        Self { ok: true, count }
    }
}

/// Required fields only. A link is checked by [`validate_record_link`] because
/// stored collections may carry free-form values.
impl Validate for Game {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_non_blank(&self.id) {
            errors.add("id", e);
        }
        if let Err(e) = validate_non_blank(&self.nom) {
            errors.add("nom", e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Checks the optional link of a record being edited.
pub fn validate_record_link(game: &Game) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if let Some(link) = game.link() {
        if let Err(e) = validate_link(link) {
            errors.add("lien", e);
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
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

    #[test]
    fn record_with_id_and_name_is_valid() {
        assert!(game("a1", "Catan").validate().is_ok());
    }

    #[test]
    fn blank_fields_are_reported_by_name() {
        let errors = game(" ", "").validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("id"));
        assert!(fields.contains_key("nom"));
    }

    #[test]
    fn link_is_only_checked_when_present() {
        let mut record = game("a1", "Catan");
        assert!(validate_record_link(&record).is_ok());
        record.lien = Some("  ".into());
        assert!(validate_record_link(&record).is_ok());
        record.lien = Some("catan".into());
        assert!(validate_record_link(&record).is_err());
    }
}
