//! Terminal rendition of the "create orphanage" page
//!
//! - Form fields on the left and right columns, map widget on top left
//! - Normal/Edit mode switching (vim-style)
//! - Mouse clicks (or the crosshair + Enter) pick the map position
//! - Notices are modal and must be dismissed, like browser alerts

pub mod app;
pub mod event;
pub mod terminal;
pub mod ui;

pub use app::{App, Field, Mode, TuiHost};
pub use terminal::run;
