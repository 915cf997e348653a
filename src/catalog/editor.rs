//! Modal record editor: read-only view, gated edit mode, validated submit.

use std::path::{Path, PathBuf};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::{
    catalog::{
        Game,
        error::{CatalogError, CatalogResult},
        gate::Gate,
        tags::TagSet,
    },
    dto::games::validate_record_link,
};

/// Whether form controls accept changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    /// Viewing an existing record.
    ReadOnly,
    /// Gate passed; controls are writable.
    Editing,
}

/// Raw form control values, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameForm {
    /// Name; must not be blank on submit.
    pub nom: String,
    /// Whole number, blank or `0` for none.
    pub nb_joueur_min: String,
    /// Whole number, blank or `0` for none.
    pub nb_joueur_max: String,
    /// Whole number, blank or `0` for none.
    pub age: String,
    /// Minutes, blank or `0` for none.
    pub duree: String,
    /// Free-form remarks.
    pub remarque: String,
    /// Blank, or an http(s) URL.
    pub lien: String,
    /// Free-form description.
    pub description: String,
}

impl GameForm {
    fn from_game(game: &Game) -> Self {
        let number = |value: Option<u32>| value.map(|v| v.to_string()).unwrap_or_default();
        Self {
            nom: game.nom.clone(),
            nb_joueur_min: number(game.nb_joueur_min),
            nb_joueur_max: number(game.nb_joueur_max),
            age: number(game.age),
            duree: number(game.duree),
            remarque: game.remarque.clone(),
            lien: game.lien.clone().unwrap_or_default(),
            description: game.description.clone(),
        }
    }
}

/// Image file contents ready to be embedded in a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    /// Content type written into the data URL.
    pub mime: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl PhotoUpload {
    /// The MIME type is guessed from the file extension.
    pub fn new(file_name: &str, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime_for(file_name).to_owned(),
            bytes,
        }
    }

    /// Read an image file from disk.
    pub async fn from_path(path: &Path) -> CatalogResult<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| CatalogError::Photo {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self::new(&path.to_string_lossy(), bytes))
    }

    /// `data:<mime>;base64,<payload>`.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        Some("avif") => "image/avif",
        _ => "application/octet-stream",
    }
}

/// Editor bound to one record, new or existing.
#[derive(Debug)]
pub struct RecordEditor {
    editing_id: Option<String>,
    mode: EditorMode,
    form: GameForm,
    tags: TagSet,
    photo: String,
    selected_photo: Option<PathBuf>,
}

impl RecordEditor {
    /// Show an existing record; edits require [`RecordEditor::unlock`].
    pub fn open(game: &Game, known_tags: Vec<String>) -> Self {
        let mut tags = TagSet::new(known_tags);
        tags.set_values(&game.types);
        Self {
            editing_id: Some(game.id.clone()),
            mode: EditorMode::ReadOnly,
            form: GameForm::from_game(game),
            tags,
            photo: game.photo.clone(),
            selected_photo: None,
        }
    }

    /// Start a blank record, directly in edit mode once the gate passes.
    pub fn create(gate: &Gate, secret: &str, known_tags: Vec<String>) -> CatalogResult<Self> {
        gate.check(secret)?;
        Ok(Self {
            editing_id: None,
            mode: EditorMode::Editing,
            form: GameForm::default(),
            tags: TagSet::new(known_tags),
            photo: String::new(),
            selected_photo: None,
        })
    }

    /// Switch an opened record to edit mode once the gate passes.
    pub fn unlock(&mut self, gate: &Gate, secret: &str) -> CatalogResult<()> {
        gate.check(secret)?;
        self.mode = EditorMode::Editing;
        Ok(())
    }

    /// Current edit mode.
    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Whether submitting creates a record rather than replacing one.
    pub fn is_new(&self) -> bool {
        self.editing_id.is_none()
    }

    /// Field values as currently typed.
    pub fn form(&self) -> &GameForm {
        &self.form
    }

    /// Mutable field values; fails while read-only.
    pub fn form_mut(&mut self) -> CatalogResult<&mut GameForm> {
        self.ensure_editing()?;
        Ok(&mut self.form)
    }

    /// Tag selection for the record.
    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Mutable tag selection; fails while read-only.
    pub fn tags_mut(&mut self) -> CatalogResult<&mut TagSet> {
        self.ensure_editing()?;
        Ok(&mut self.tags)
    }

    /// Pick a new image file; it is read and embedded on submit.
    pub fn select_photo(&mut self, path: impl Into<PathBuf>) -> CatalogResult<()> {
        self.ensure_editing()?;
        self.selected_photo = Some(path.into());
        Ok(())
    }

    /// Drop both the stored and the selected photo.
    pub fn clear_photo(&mut self) -> CatalogResult<()> {
        self.ensure_editing()?;
        self.selected_photo = None;
        self.photo.clear();
        Ok(())
    }

    /// Build the validated record. Existing records keep their id; new ones get a fresh UUID.
    ///
    /// Takes `&mut self` so the editor cannot be submitted twice while the photo is being read.
    pub async fn submit(&mut self) -> CatalogResult<Game> {
        self.ensure_editing()?;

        let form = &self.form;
        let nom = form.nom.trim();
        if nom.is_empty() {
            return Err(CatalogError::Validation("name is required".into()));
        }

        let lien = form.lien.trim();
        let mut game = Game {
            id: self
                .editing_id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            nom: nom.to_owned(),
            nb_joueur_min: parse_count("nbJoueurMin", &form.nb_joueur_min)?,
            nb_joueur_max: parse_count("nbJoueurMax", &form.nb_joueur_max)?,
            age: parse_count("age", &form.age)?,
            duree: parse_count("duree", &form.duree)?,
            types: self.tags.get_values().to_vec(),
            remarque: form.remarque.trim().to_owned(),
            lien: (!lien.is_empty()).then(|| lien.to_owned()),
            description: form.description.trim().to_owned(),
            photo: self.photo.clone(),
        };
        game.validate()?;
        validate_record_link(&game)?;

        if let Some(path) = &self.selected_photo {
            let upload = PhotoUpload::from_path(path).await?;
            debug!(path = %path.display(), bytes = upload.bytes.len(), "photo embedded");
            game.photo = upload.to_data_url();
        }

        Ok(game)
    }

    fn ensure_editing(&self) -> CatalogResult<()> {
        match self.mode {
            EditorMode::Editing => Ok(()),
            EditorMode::ReadOnly => Err(CatalogError::ReadOnly),
        }
    }
}

/// Blank and `0` mean "not set".
fn parse_count(field: &str, raw: &str) -> CatalogResult<Option<u32>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<u32>()
        .map(|value| (value > 0).then_some(value))
        .map_err(|_| {
            CatalogError::Validation(format!(
                "`{field}` must be a whole number, got `{raw}`"
            ))
        })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const PASS: &str = "1664";

    fn gate() -> Gate {
        Gate::new(PASS)
    }

    fn catan() -> Game {
        Game {
            id: "a1".into(),
            nom: "Catan".into(),
            nb_joueur_min: Some(3),
            nb_joueur_max: Some(4),
            age: Some(10),
            duree: Some(90),
            types: vec!["Stratégie".into()],
            lien: Some("https://example.org/catan".into()),
            photo: "data:image/png;base64,AAAA".into(),
            ..Game::default()
        }
    }

    #[test]
    fn existing_record_opens_read_only() {
        let mut editor = RecordEditor::open(&catan(), vec![]);
        assert_eq!(editor.mode(), EditorMode::ReadOnly);
        assert!(!editor.is_new());
        assert_eq!(editor.form().age, "10");
        assert!(matches!(editor.form_mut(), Err(CatalogError::ReadOnly)));
        assert!(matches!(editor.tags_mut(), Err(CatalogError::ReadOnly)));
    }

    #[tokio::test]
    async fn read_only_editor_cannot_submit() {
        let mut editor = RecordEditor::open(&catan(), vec![]);
        assert!(matches!(editor.submit().await, Err(CatalogError::ReadOnly)));
    }

    #[test]
    fn wrong_passphrase_keeps_read_only() {
        let mut editor = RecordEditor::open(&catan(), vec![]);
        assert!(matches!(
            editor.unlock(&gate(), "nope"),
            Err(CatalogError::Unauthorized)
        ));
        assert_eq!(editor.mode(), EditorMode::ReadOnly);
        editor.unlock(&gate(), PASS).unwrap();
        assert_eq!(editor.mode(), EditorMode::Editing);
    }

    #[test]
    fn create_requires_passphrase() {
        assert!(matches!(
            RecordEditor::create(&gate(), "", vec![]),
            Err(CatalogError::Unauthorized)
        ));
        let editor = RecordEditor::create(&gate(), PASS, vec![]).unwrap();
        assert_eq!(editor.mode(), EditorMode::Editing);
        assert!(editor.is_new());
    }

    #[tokio::test]
    async fn edit_keeps_identity_and_unchanged_fields() {
        let original = catan();
        let mut editor = RecordEditor::open(&original, vec![]);
        editor.unlock(&gate(), PASS).unwrap();
        editor.form_mut().unwrap().remarque = "  manque un dé ".into();

        let game = editor.submit().await.unwrap();
        assert_eq!(game.id, "a1");
        assert_eq!(game.remarque, "manque un dé");
        assert_eq!(game.photo, original.photo);
        assert_eq!(game.types, original.types);
        assert_eq!(game.duree, Some(90));
    }

    #[tokio::test]
    async fn new_record_gets_fresh_id_and_normalized_fields() {
        let mut editor = RecordEditor::create(&gate(), PASS, vec![]).unwrap();
        {
            let form = editor.form_mut().unwrap();
            form.nom = "  Dixit ".into();
            form.nb_joueur_min = "3".into();
            form.nb_joueur_max = " 8 ".into();
            form.age = "0".into();
            form.lien = "   ".into();
        }
        editor.tags_mut().unwrap().set_values(["ambiance", "AMBIANCE", "cartes"]);

        let game = editor.submit().await.unwrap();
        assert!(Uuid::parse_str(&game.id).is_ok());
        assert_eq!(game.nom, "Dixit");
        assert_eq!(game.nb_joueur_min, Some(3));
        assert_eq!(game.nb_joueur_max, Some(8));
        assert_eq!(game.age, None);
        assert_eq!(game.duree, None);
        assert_eq!(game.lien, None);
        assert_eq!(game.types, ["Ambiance", "Cartes"]);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let mut editor = RecordEditor::create(&gate(), PASS, vec![]).unwrap();
        editor.form_mut().unwrap().nom = "   ".into();
        assert!(matches!(
            editor.submit().await,
            Err(CatalogError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn bad_numbers_and_links_are_rejected() {
        let mut editor = RecordEditor::create(&gate(), PASS, vec![]).unwrap();
        editor.form_mut().unwrap().nom = "Azul".into();
        editor.form_mut().unwrap().duree = "-5".into();
        assert!(matches!(
            editor.submit().await,
            Err(CatalogError::Validation(_))
        ));

        editor.form_mut().unwrap().duree = "45".into();
        editor.form_mut().unwrap().lien = "azul".into();
        assert!(matches!(
            editor.submit().await,
            Err(CatalogError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn selected_photo_is_embedded_as_data_url() {
        let mut file = tempfile::Builder::new()
            .suffix(".PNG")
            .tempfile()
            .unwrap();
        file.write_all(b"hello").unwrap();

        let mut editor = RecordEditor::create(&gate(), PASS, vec![]).unwrap();
        editor.form_mut().unwrap().nom = "Azul".into();
        editor.select_photo(file.path()).unwrap();

        let game = editor.submit().await.unwrap();
        assert_eq!(game.photo, "data:image/png;base64,aGVsbG8=");
    }

    #[tokio::test]
    async fn cleared_photo_is_removed_from_record() {
        let mut editor = RecordEditor::open(&catan(), vec![]);
        assert!(matches!(editor.clear_photo(), Err(CatalogError::ReadOnly)));

        editor.unlock(&gate(), PASS).unwrap();
        editor.select_photo("/never/read.png").unwrap();
        editor.clear_photo().unwrap();

        let game = editor.submit().await.unwrap();
        assert_eq!(game.photo, "");
        assert_eq!(game.id, "a1");
    }

    #[tokio::test]
    async fn unreadable_photo_aborts_submit() {
        let mut editor = RecordEditor::create(&gate(), PASS, vec![]).unwrap();
        editor.form_mut().unwrap().nom = "Azul".into();
        editor
            .select_photo("/definitely/not/here.jpg")
            .unwrap();
        assert!(matches!(
            editor.submit().await,
            Err(CatalogError::Photo { .. })
        ));
    }

    #[test]
    fn unknown_extension_falls_back_to_octet_stream() {
        let upload = PhotoUpload::new("scan.tiff", vec![1, 2, 3]);
        assert_eq!(upload.mime, "application/octet-stream");
        assert_eq!(PhotoUpload::new("a.JPG", vec![]).mime, "image/jpeg");
    }
}
