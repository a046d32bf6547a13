//! Image selection and preview URLs
//!
//! A selection pairs each chosen file with a transient preview URL. The pair
//! is created together and replaced together, so previews can never outlive
//! or drift from the files they describe.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use uuid::Uuid;

/// Handle to a user-selected file. Nothing is read from disk until submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageFile {
    pub path: PathBuf,
    pub file_name: String,
    pub mime: String,
}

impl ImageFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Self {
            path,
            file_name,
            mime,
        }
    }
}

/// Transient local reference to a selected file, for display only
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PreviewUrl(String);

impl PreviewUrl {
    fn create() -> Self {
        Self(format!("blob:happy/{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PreviewUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One selected image and its preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    pub file: ImageFile,
    pub preview: PreviewUrl,
}

/// Ordered set of selected images
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSelection {
    entries: Vec<SelectedImage>,
}

impl ImageSelection {
    /// Build a fresh selection, one new preview per file, in selection order
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let entries = paths
            .into_iter()
            .map(|path| SelectedImage {
                file: ImageFile::from_path(path.as_ref()),
                preview: PreviewUrl::create(),
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SelectedImage] {
        &self.entries
    }

    pub fn images(&self) -> impl Iterator<Item = &ImageFile> {
        self.entries.iter().map(|entry| &entry.file)
    }

    pub fn previews(&self) -> impl Iterator<Item = &PreviewUrl> {
        self.entries.iter().map(|entry| &entry.preview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_file_from_path() {
        let file = ImageFile::from_path("/photos/f1.png");
        assert_eq!(file.file_name, "f1.png");
        assert_eq!(file.mime, "image/png");

        let file = ImageFile::from_path("notes/visit.unknownext");
        assert_eq!(file.mime, "application/octet-stream");
    }

    #[test]
    fn test_selection_keeps_order() {
        let selection = ImageSelection::from_paths(["b.jpg", "a.jpg", "c.jpg"]);
        let names: Vec<_> = selection.images().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, ["b.jpg", "a.jpg", "c.jpg"]);
        assert_eq!(selection.previews().count(), 3);
    }

    #[test]
    fn test_previews_are_unique_per_selection() {
        let first = ImageSelection::from_paths(["f1.png"]);
        let second = ImageSelection::from_paths(["f1.png"]);
        let a = first.previews().next().unwrap();
        let b = second.previews().next().unwrap();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("blob:happy/"));
    }

    #[test]
    fn test_empty_selection() {
        let selection = ImageSelection::from_paths(Vec::<PathBuf>::new());
        assert!(selection.is_empty());
        assert_eq!(selection.len(), 0);
    }
}
