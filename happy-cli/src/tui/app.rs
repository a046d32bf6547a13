//! Page state for the terminal form

use std::collections::VecDeque;
use std::path::PathBuf;

use happy_core::{
    FormController, FormEvent, MapView, OrphanageApi, OrphanageForm, PageHost, SubmitOutcome,
    Viewport,
};
use ratatui::layout::{Position as CellPosition, Rect};
use ratatui::style::Color;

/// Input mode (vim-inspired)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Move between fields, click the map, toggle buttons
    #[default]
    Normal,
    /// Typing into the focused text field
    Edit,
    /// Typing image paths (the file picker)
    Prompt,
    /// A notice is on screen and must be dismissed
    Notice,
}

impl Mode {
    /// Get display name for status bar
    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Edit => "INSERT",
            Mode::Prompt => "FOTOS",
            Mode::Notice => "AVISO",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Mode::Normal => Color::Cyan,
            Mode::Edit => Color::Green,
            Mode::Prompt => Color::Yellow,
            Mode::Notice => Color::Magenta,
        }
    }
}

/// Focusable parts of the page, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    Map,
    #[default]
    Name,
    About,
    Images,
    Instructions,
    OpeningHours,
    OpenOnWeekends,
    Confirm,
}

impl Field {
    pub const ORDER: [Field; 8] = [
        Field::Map,
        Field::Name,
        Field::About,
        Field::Images,
        Field::Instructions,
        Field::OpeningHours,
        Field::OpenOnWeekends,
        Field::Confirm,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Map => "Mapa",
            Field::Name => "Nome",
            Field::About => "Sobre",
            Field::Images => "Fotos",
            Field::Instructions => "Instruções",
            Field::OpeningHours => "Horário de funcionamento",
            Field::OpenOnWeekends => "Atende fim de semana",
            Field::Confirm => "Confirmar",
        }
    }

    pub fn is_text(self) -> bool {
        matches!(
            self,
            Field::Name | Field::About | Field::Instructions | Field::OpeningHours
        )
    }

    /// Enter inserts a newline instead of leaving the field
    pub fn is_multiline(self) -> bool {
        matches!(self, Field::About | Field::Instructions)
    }
}

/// Host side of the terminal page: queued notices and the navigation target
#[derive(Debug, Default)]
pub struct TuiHost {
    pub notices: VecDeque<String>,
    pub navigated_to: Option<String>,
}

impl PageHost for TuiHost {
    fn alert(&mut self, message: &str) {
        self.notices.push_back(message.to_string());
    }

    fn navigate(&mut self, route: &str) {
        self.navigated_to = Some(route.to_string());
    }
}

/// Main application state
pub struct App<A> {
    pub controller: FormController<A, TuiHost>,
    pub map: MapView,
    pub mode: Mode,
    pub focused: Field,
    /// Image prompt buffer
    pub prompt_input: String,
    /// Inner map area from the last render, for mouse clicks
    pub map_area: Rect,
    /// Crosshair cell inside the map area
    pub map_cursor: Option<(u16, u16)>,
    /// Last cell under a held left button, and whether it moved since press
    pub drag_from: Option<(u16, u16)>,
    pub dragged: bool,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl<A: OrphanageApi> App<A> {
    pub fn new(controller: FormController<A, TuiHost>, map: MapView) -> Self {
        Self {
            controller,
            map,
            mode: Mode::Normal,
            focused: Field::default(),
            prompt_input: String::new(),
            map_area: Rect::default(),
            map_cursor: None,
            drag_from: None,
            dragged: false,
            status_message: None,
            should_quit: false,
        }
    }

    pub fn form(&self) -> &OrphanageForm {
        self.controller.form()
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(&self.map, self.map_area.width, self.map_area.height)
    }

    pub fn navigated_to(&self) -> Option<&str> {
        self.controller.host().navigated_to.as_deref()
    }

    pub fn current_notice(&self) -> Option<&str> {
        self.controller.host().notices.front().map(String::as_str)
    }

    /// Current text of a text field
    pub fn text_value(&self, field: Field) -> Option<&str> {
        let form = self.form();
        match field {
            Field::Name => Some(&form.name),
            Field::About => Some(&form.about),
            Field::Instructions => Some(&form.instructions),
            Field::OpeningHours => Some(&form.opening_hours),
            _ => None,
        }
    }

    pub fn focus_next(&mut self) {
        self.focused = self.focused.next();
    }

    pub fn focus_prev(&mut self) {
        self.focused = self.focused.prev();
    }

    pub fn start_editing(&mut self) {
        if self.focused.is_text() {
            self.mode = Mode::Edit;
            self.status_message = Some("-- INSERT --".to_string());
        }
    }

    pub fn stop_editing(&mut self) {
        self.mode = Mode::Normal;
        self.status_message = None;
    }

    /// Change the focused text field through a form event
    pub fn edit_text(&mut self, edit: impl FnOnce(&mut String)) {
        let field = self.focused;
        let Some(current) = self.text_value(field) else {
            return;
        };
        let mut value = current.to_string();
        edit(&mut value);

        let event = match field {
            Field::Name => FormEvent::NameChanged(value),
            Field::About => FormEvent::AboutChanged(value),
            Field::Instructions => FormEvent::InstructionsChanged(value),
            Field::OpeningHours => FormEvent::OpeningHoursChanged(value),
            _ => return,
        };
        self.controller.dispatch(event);
    }

    pub fn set_open_on_weekends(&mut self, open: bool) {
        self.controller
            .dispatch(FormEvent::OpenOnWeekendsChanged(open));
    }

    pub fn toggle_open_on_weekends(&mut self) {
        let open = self.form().open_on_weekends;
        self.set_open_on_weekends(!open);
    }

    pub fn open_image_prompt(&mut self) {
        self.mode = Mode::Prompt;
        self.prompt_input.clear();
        self.status_message =
            Some("Caminhos das fotos, separados por espaço (use aspas para espaços)".to_string());
    }

    pub fn cancel_prompt(&mut self) {
        self.mode = Mode::Normal;
        self.prompt_input.clear();
        self.status_message = None;
    }

    /// Turn the prompt into a file selection. An empty prompt selects nothing.
    pub fn confirm_image_prompt(&mut self) {
        let input = self.prompt_input.trim();
        let selection: Option<Vec<PathBuf>> = if input.is_empty() {
            None
        } else {
            match shlex::split(input) {
                Some(paths) => Some(paths.into_iter().map(Into::into).collect()),
                None => {
                    self.status_message = Some("Caminho inválido (aspas sem fechar)".to_string());
                    return;
                }
            }
        };

        self.controller
            .dispatch(FormEvent::ImagesSelected(selection));
        self.mode = Mode::Normal;
        self.prompt_input.clear();
        self.status_message = Some(format!("{} foto(s) selecionada(s)", self.form().images.len()));
    }

    /// Crosshair cell, defaulting to the middle of the map
    pub fn cursor(&self) -> (u16, u16) {
        let max_col = self.map_area.width.saturating_sub(1);
        let max_row = self.map_area.height.saturating_sub(1);
        match self.map_cursor {
            Some((col, row)) => (col.min(max_col), row.min(max_row)),
            None => (self.map_area.width / 2, self.map_area.height / 2),
        }
    }

    pub fn move_cursor(&mut self, d_col: i32, d_row: i32) {
        let (col, row) = self.cursor();
        let max_col = i32::from(self.map_area.width.saturating_sub(1));
        let max_row = i32::from(self.map_area.height.saturating_sub(1));
        let col = (i32::from(col) + d_col).clamp(0, max_col) as u16;
        let row = (i32::from(row) + d_row).clamp(0, max_row) as u16;
        self.map_cursor = Some((col, row));
    }

    /// Click the map at a cell relative to the map area
    pub fn click_map_cell(&mut self, col: u16, row: u16) {
        if let Some(position) = self.viewport().position_at(col, row) {
            self.controller.dispatch(FormEvent::MapClicked(position));
            self.map_cursor = Some((col, row));
            self.status_message = Some(format!("Posição: {}", position));
        }
    }

    pub fn click_at_cursor(&mut self) {
        let (col, row) = self.cursor();
        self.click_map_cell(col, row);
    }

    /// Map cell under absolute terminal coordinates
    fn map_cell(&self, column: u16, row: u16) -> Option<(u16, u16)> {
        self.map_area
            .contains(CellPosition::new(column, row))
            .then(|| (column - self.map_area.x, row - self.map_area.y))
    }

    pub fn is_over_map(&self, column: u16, row: u16) -> bool {
        self.map_cell(column, row).is_some()
    }

    /// Mouse click at absolute terminal coordinates; returns whether it hit the map
    pub fn click_at(&mut self, column: u16, row: u16) -> bool {
        let Some((col, row)) = self.map_cell(column, row) else {
            return false;
        };
        self.focused = Field::Map;
        self.click_map_cell(col, row);
        true
    }

    /// Shift the view so the map content moves by `(d_col, d_row)` cells
    /// in the opposite direction
    pub fn pan_cells(&mut self, d_col: i32, d_row: i32) {
        let (d_lat, d_lon) = self.viewport().cell_offset(d_col, d_row);
        self.map.pan(d_lat, d_lon);
        self.status_message = Some(format!("Centro: {}", self.map.center));
    }

    /// Pan a quarter of the view per step
    pub fn pan_step(&mut self, steps_col: i32, steps_row: i32) {
        let col_step = i32::from((self.map_area.width / 4).max(1));
        let row_step = i32::from((self.map_area.height / 4).max(1));
        self.pan_cells(steps_col * col_step, steps_row * row_step);
    }

    /// Left button pressed; returns whether it landed on the map
    pub fn press_map(&mut self, column: u16, row: u16) -> bool {
        let cell = self.map_cell(column, row);
        self.drag_from = cell;
        self.dragged = false;
        if cell.is_some() {
            self.focused = Field::Map;
        }
        cell.is_some()
    }

    /// Left button dragged: the map follows the pointer
    pub fn drag_map(&mut self, column: u16, row: u16) {
        let Some((from_col, from_row)) = self.drag_from else {
            return;
        };
        let max_col = self.map_area.width.saturating_sub(1);
        let max_row = self.map_area.height.saturating_sub(1);
        let col = column.saturating_sub(self.map_area.x).min(max_col);
        let row = row.saturating_sub(self.map_area.y).min(max_row);
        if (col, row) == (from_col, from_row) {
            return;
        }

        self.pan_cells(
            i32::from(from_col) - i32::from(col),
            i32::from(from_row) - i32::from(row),
        );
        self.drag_from = Some((col, row));
        self.dragged = true;
    }

    /// Left button released: a press without a drag is a click
    pub fn release_map(&mut self, column: u16, row: u16) {
        let pressed = self.drag_from.take().is_some();
        if pressed && !self.dragged {
            self.click_at(column, row);
        }
        self.dragged = false;
    }

    pub fn zoom_in(&mut self) {
        self.map.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.map.zoom_out();
    }

    pub fn begin_submit(&mut self) {
        self.status_message = Some("Enviando cadastro...".to_string());
    }

    pub async fn submit(&mut self) {
        let outcome = self.controller.submit().await;
        self.status_message = Some(match &outcome {
            SubmitOutcome::Created { route } => format!("Cadastro enviado → {}", route),
            SubmitOutcome::Rejected(err) => err.to_string(),
        });

        if self.current_notice().is_some() {
            self.mode = Mode::Notice;
        }
    }

    /// Close the front notice; leave the page once the last one is closed
    /// after a successful submission
    pub fn dismiss_notice(&mut self) {
        let host = self.controller.host_mut();
        host.notices.pop_front();
        if !host.notices.is_empty() {
            return;
        }

        self.mode = Mode::Normal;
        if self.navigated_to().is_some() {
            self.should_quit = true;
        }
    }
}
