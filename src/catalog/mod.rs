//! Client-side catalog logic: data access, filtering, gated editing and
//! import/export over a session-owned copy of the collection.

/// Gated record editor and photo embedding.
pub mod editor;
/// Client-side error type.
pub mod error;
/// Search and filter predicates.
pub mod filter;
/// Shared-secret check for mutations.
pub mod gate;
/// The catalog record.
pub mod game;
/// HTTP-backed repository.
pub mod http;
/// Display rows for the list view.
pub mod render;
/// Storage seam for sessions.
pub mod repository;
/// Working copy with save-through mutations.
pub mod session;
/// Tag selection with normalization.
pub mod tags;

pub use editor::{EditorMode, GameForm, PhotoUpload, RecordEditor};
pub use error::{CatalogError, CatalogResult};
pub use filter::{FilterCriteria, SearchScope, filtered, known_tags};
pub use gate::Gate;
pub use game::{Collection, Game};
pub use http::HttpCatalogRepository;
pub use render::{GameRow, render_rows};
pub use repository::CatalogRepository;
pub use session::CatalogSession;
pub use tags::{TagSet, normalize_tag, normalize_tags};
