//! Serialization of the form into multipart parts
//!
//! The payload is built before any I/O happens so the exact field list can be
//! inspected (and printed by `happy submit --dry-run`).

use serde::Serialize;

use crate::error::{HappyError, Result};
use crate::form::OrphanageForm;
use crate::images::ImageFile;

/// Resource path the payload is posted to, relative to the API base URL
pub const ORPHANAGES_PATH: &str = "orphanages";

/// Name shared by every image part
pub const IMAGES_FIELD: &str = "images";

/// Value of a multipart part
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PartValue {
    Text { value: String },
    File { file: ImageFile },
}

/// One named part of the multipart body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormPart {
    pub name: &'static str,
    #[serde(flatten)]
    pub value: PartValue,
}

impl FormPart {
    fn text(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: PartValue::Text {
                value: value.into(),
            },
        }
    }
}

/// Ordered multipart payload for `POST orphanages`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrphanagePayload {
    parts: Vec<FormPart>,
}

impl OrphanagePayload {
    /// Serialize the form. Fails only when no map position was recorded.
    pub fn from_form(form: &OrphanageForm) -> Result<Self> {
        let position = form.position.ok_or(HappyError::MissingPosition)?;

        let mut parts = vec![
            FormPart::text("name", form.name.as_str()),
            FormPart::text("latitude", position.latitude.to_string()),
            FormPart::text("longitude", position.longitude.to_string()),
            FormPart::text("about", form.about.as_str()),
            FormPart::text("instructions", form.instructions.as_str()),
            FormPart::text("opening_hours", form.opening_hours.as_str()),
            FormPart::text("open_on_weekends", form.open_on_weekends.to_string()),
        ];

        parts.extend(form.images.images().map(|file| FormPart {
            name: IMAGES_FIELD,
            value: PartValue::File { file: file.clone() },
        }));

        Ok(Self { parts })
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// Value of the text part called `name`
    pub fn text(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match &part.value {
            PartValue::Text { value } if part.name == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn files(&self) -> impl Iterator<Item = &ImageFile> {
        self.parts.iter().filter_map(|part| match &part.value {
            PartValue::File { file } => Some(file),
            PartValue::Text { .. } => None,
        })
    }
}
