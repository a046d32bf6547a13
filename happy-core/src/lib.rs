pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod images;
pub mod map;
pub mod payload;

pub use api::{HttpOrphanageApi, OrphanageApi};
pub use config::HappyConfig;
pub use controller::{FormController, PageHost, PageSettings, Phase, SubmitOutcome};
pub use error::{HappyError, Result};
pub use form::{FormEvent, OrphanageForm, ABOUT_MAX_CHARS};
pub use images::{ImageFile, ImageSelection, PreviewUrl, SelectedImage};
pub use map::{MapView, Position, TileCoord, Viewport};
pub use payload::{FormPart, OrphanagePayload, PartValue};
