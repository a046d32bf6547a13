//! The orphanage form state record and its transitions
//!
//! Every user interaction is a [`FormEvent`]; [`OrphanageForm::apply`] takes
//! the current record and returns the next one.

use std::path::PathBuf;

use tracing::debug;

use crate::images::ImageSelection;
use crate::map::Position;

/// Maximum length of the `about` field, in characters
pub const ABOUT_MAX_CHARS: usize = 300;

/// Everything the user has entered so far
#[derive(Debug, Clone, PartialEq)]
pub struct OrphanageForm {
    pub name: String,
    pub about: String,
    pub instructions: String,
    pub opening_hours: String,
    pub open_on_weekends: bool,
    /// `None` until the user clicks the map
    pub position: Option<Position>,
    pub images: ImageSelection,
}

impl Default for OrphanageForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            about: String::new(),
            instructions: String::new(),
            opening_hours: String::new(),
            open_on_weekends: true,
            position: None,
            images: ImageSelection::default(),
        }
    }
}

/// A single user interaction with the form
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    NameChanged(String),
    AboutChanged(String),
    InstructionsChanged(String),
    OpeningHoursChanged(String),
    OpenOnWeekendsChanged(bool),
    /// Map widget click
    MapClicked(Position),
    /// File picker result; `None` means the picker produced no file list
    ImagesSelected(Option<Vec<PathBuf>>),
}

impl OrphanageForm {
    /// Apply one event and return the next state
    pub fn apply(self, event: FormEvent) -> Self {
        match event {
            FormEvent::NameChanged(name) => Self { name, ..self },
            FormEvent::AboutChanged(about) => Self {
                about: cap_chars(about, ABOUT_MAX_CHARS),
                ..self
            },
            FormEvent::InstructionsChanged(instructions) => Self {
                instructions,
                ..self
            },
            FormEvent::OpeningHoursChanged(opening_hours) => Self {
                opening_hours,
                ..self
            },
            FormEvent::OpenOnWeekendsChanged(open_on_weekends) => Self {
                open_on_weekends,
                ..self
            },
            FormEvent::MapClicked(position) => {
                debug!(%position, "map position recorded");
                Self {
                    position: Some(position),
                    ..self
                }
            }
            FormEvent::ImagesSelected(None) => self,
            FormEvent::ImagesSelected(Some(paths)) => {
                let images = ImageSelection::from_paths(paths);
                debug!(count = images.len(), "images selected");
                Self { images, ..self }
            }
        }
    }

    /// Whether the map should render the marker
    pub fn shows_marker(&self) -> bool {
        self.position.is_some()
    }
}

fn cap_chars(mut value: String, max: usize) -> String {
    if let Some((idx, _)) = value.char_indices().nth(max) {
        value.truncate(idx);
    }
    value
}
