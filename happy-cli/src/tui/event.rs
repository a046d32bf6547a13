//! Event handling for the TUI

use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use happy_core::OrphanageApi;

use super::app::{App, Field, Mode};

/// Poll for events with timeout
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Result of handling an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleResult {
    /// Continue running
    Continue,
    /// Quit the application
    Quit,
    /// Send the form
    Submit,
}

/// Handle a key event
pub fn handle_key<A: OrphanageApi>(app: &mut App<A>, key: KeyEvent) -> HandleResult {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return HandleResult::Quit,
            KeyCode::Char('s') if app.mode == Mode::Normal || app.mode == Mode::Edit => {
                app.stop_editing();
                return HandleResult::Submit;
            }
            _ => {}
        }
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, key),
        Mode::Edit => handle_edit_mode(app, key),
        Mode::Prompt => handle_prompt_mode(app, key),
        Mode::Notice => {
            app.dismiss_notice();
            HandleResult::Continue
        }
    }
}

/// Handle a mouse event on the map: click marks the position, drag pans,
/// the wheel zooms
pub fn handle_mouse<A: OrphanageApi>(app: &mut App<A>, mouse: MouseEvent) -> HandleResult {
    if app.mode != Mode::Normal {
        return HandleResult::Continue;
    }

    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            app.press_map(column, row);
        }
        MouseEventKind::Drag(MouseButton::Left) => app.drag_map(column, row),
        MouseEventKind::Up(MouseButton::Left) => app.release_map(column, row),
        MouseEventKind::ScrollUp if app.is_over_map(column, row) => app.zoom_in(),
        MouseEventKind::ScrollDown if app.is_over_map(column, row) => app.zoom_out(),
        _ => {}
    }
    HandleResult::Continue
}

fn handle_normal_mode<A: OrphanageApi>(app: &mut App<A>, key: KeyEvent) -> HandleResult {
    match key.code {
        KeyCode::Char('q') => return HandleResult::Quit,
        KeyCode::Tab => {
            app.focus_next();
            return HandleResult::Continue;
        }
        KeyCode::BackTab => {
            app.focus_prev();
            return HandleResult::Continue;
        }
        _ => {}
    }

    match app.focused {
        Field::Map => handle_map_keys(app, key),
        Field::OpenOnWeekends => handle_weekend_keys(app, key),
        field => {
            match key.code {
                KeyCode::Char('j') | KeyCode::Down => app.focus_next(),
                KeyCode::Char('k') | KeyCode::Up => app.focus_prev(),
                KeyCode::Enter | KeyCode::Char('i') if field.is_text() => app.start_editing(),
                KeyCode::Enter | KeyCode::Char(' ') if field == Field::Images => {
                    app.open_image_prompt()
                }
                KeyCode::Enter | KeyCode::Char(' ') if field == Field::Confirm => {
                    return HandleResult::Submit;
                }
                _ => {}
            }
            HandleResult::Continue
        }
    }
}

/// Plain or shifted key; Ctrl/Alt chords are not text
fn is_text_input(key: &KeyEvent) -> bool {
    key.modifiers.difference(KeyModifiers::SHIFT).is_empty()
}

fn handle_map_keys<A: OrphanageApi>(app: &mut App<A>, key: KeyEvent) -> HandleResult {
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        // Pan the view: Shift+arrows or H/J/K/L
        KeyCode::Left if shift => app.pan_step(-1, 0),
        KeyCode::Right if shift => app.pan_step(1, 0),
        KeyCode::Up if shift => app.pan_step(0, -1),
        KeyCode::Down if shift => app.pan_step(0, 1),
        KeyCode::Char('H') => app.pan_step(-1, 0),
        KeyCode::Char('L') => app.pan_step(1, 0),
        KeyCode::Char('K') => app.pan_step(0, -1),
        KeyCode::Char('J') => app.pan_step(0, 1),

        KeyCode::Left | KeyCode::Char('h') => app.move_cursor(-1, 0),
        KeyCode::Right | KeyCode::Char('l') => app.move_cursor(1, 0),
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(0, -1),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(0, 1),
        KeyCode::Enter | KeyCode::Char(' ') => app.click_at_cursor(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
        KeyCode::Char('-') => app.zoom_out(),
        _ => {}
    }
    HandleResult::Continue
}

fn handle_weekend_keys<A: OrphanageApi>(app: &mut App<A>, key: KeyEvent) -> HandleResult {
    match key.code {
        KeyCode::Char('s') | KeyCode::Char('y') => app.set_open_on_weekends(true),
        KeyCode::Char('n') => app.set_open_on_weekends(false),
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') | KeyCode::Enter => {
            app.toggle_open_on_weekends()
        }
        KeyCode::Char('j') | KeyCode::Down => app.focus_next(),
        KeyCode::Char('k') | KeyCode::Up => app.focus_prev(),
        _ => {}
    }
    HandleResult::Continue
}

fn handle_edit_mode<A: OrphanageApi>(app: &mut App<A>, key: KeyEvent) -> HandleResult {
    match key.code {
        KeyCode::Esc => app.stop_editing(),
        KeyCode::Enter if app.focused.is_multiline() => app.edit_text(|v| v.push('\n')),
        KeyCode::Enter => app.stop_editing(),
        KeyCode::Backspace => app.edit_text(|v| {
            v.pop();
        }),
        KeyCode::Char(c) if is_text_input(&key) => app.edit_text(|v| v.push(c)),
        _ => {}
    }
    HandleResult::Continue
}

fn handle_prompt_mode<A: OrphanageApi>(app: &mut App<A>, key: KeyEvent) -> HandleResult {
    match key.code {
        KeyCode::Esc => app.cancel_prompt(),
        KeyCode::Enter => app.confirm_image_prompt(),
        KeyCode::Backspace => {
            app.prompt_input.pop();
        }
        KeyCode::Char(c) if is_text_input(&key) => app.prompt_input.push(c),
        _ => {}
    }
    HandleResult::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::tests::app;
    use crossterm::event::KeyEventState;

    fn press(app: &mut App<crate::tui::app::tests::StubApi>, code: KeyCode) -> HandleResult {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(app: &mut App<crate::tui::app::tests::StubApi>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_typing_into_name() {
        let mut app = app(true);
        assert_eq!(app.focused, Field::Name);

        press(&mut app, KeyCode::Char('i'));
        assert_eq!(app.mode, Mode::Edit);
        type_str(&mut app, "Lar q");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.form().name, "Lar ");
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn test_q_while_editing_is_text() {
        let mut app = app(true);
        press(&mut app, KeyCode::Enter);
        assert_eq!(press(&mut app, KeyCode::Char('q')), HandleResult::Continue);
        assert_eq!(app.form().name, "q");

        press(&mut app, KeyCode::Esc);
        assert_eq!(press(&mut app, KeyCode::Char('q')), HandleResult::Quit);
    }

    #[test]
    fn test_enter_in_about_adds_newline() {
        let mut app = app(true);
        app.focused = Field::About;
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "a");
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "b");

        assert_eq!(app.form().about, "a\nb");
        assert_eq!(app.mode, Mode::Edit);
    }

    #[test]
    fn test_about_stops_at_limit() {
        let mut app = app(true);
        app.focused = Field::About;
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, &"x".repeat(310));

        assert_eq!(app.form().about.chars().count(), happy_core::ABOUT_MAX_CHARS);
    }

    #[test]
    fn test_weekend_buttons() {
        let mut app = app(true);
        app.focused = Field::OpenOnWeekends;
        assert!(app.form().open_on_weekends);

        press(&mut app, KeyCode::Char('n'));
        assert!(!app.form().open_on_weekends);
        press(&mut app, KeyCode::Char('s'));
        assert!(app.form().open_on_weekends);
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.form().open_on_weekends);
    }

    #[test]
    fn test_map_crosshair_click() {
        let mut app = app(true);
        app.focused = Field::Map;
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        let expected = app.viewport().position_at(21, 7);
        assert_eq!(app.form().position, expected);
    }

    #[test]
    fn test_confirm_and_ctrl_s_submit() {
        let mut app = app(true);
        app.focused = Field::Confirm;
        assert_eq!(press(&mut app, KeyCode::Enter), HandleResult::Submit);

        app.focused = Field::Name;
        press(&mut app, KeyCode::Enter);
        let ctrl_s = KeyEvent {
            code: KeyCode::Char('s'),
            modifiers: KeyModifiers::CONTROL,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        };
        assert_eq!(handle_key(&mut app, ctrl_s), HandleResult::Submit);
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.form().name, "");
    }

    #[test]
    fn test_image_prompt_keys() {
        let mut app = app(true);
        app.focused = Field::Images;
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Prompt);

        type_str(&mut app, "a.png b.jpg");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.form().images.len(), 2);
        assert_eq!(app.mode, Mode::Normal);
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_left_click_on_map() {
        let mut app = app(true);
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 5, 4));
        assert_eq!(app.form().position, None);
        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 5, 4));
        assert_eq!(app.form().position, app.viewport().position_at(3, 1));
    }

    #[test]
    fn test_drag_pans_then_click_marks_new_area() {
        let mut app = app(true);
        let start = app.viewport();
        let ([_, start_max_lon], _) = start.bounds();

        for _ in 0..3 {
            handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 40, 8));
            handle_mouse(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), 5, 8));
            handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 5, 8));
        }
        assert_eq!(app.form().position, None);

        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 2, 8));
        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 2, 8));
        let clicked = app.form().position.unwrap();
        assert!(start.cell_of(clicked).is_none());
        assert!(clicked.longitude > start_max_lon);
    }

    #[test]
    fn test_scroll_zooms_over_map_only() {
        let mut app = app(true);
        let zoom = app.map.zoom;
        handle_mouse(&mut app, mouse(MouseEventKind::ScrollDown, 5, 4));
        assert_eq!(app.map.zoom, zoom - 1);
        handle_mouse(&mut app, mouse(MouseEventKind::ScrollUp, 0, 0));
        assert_eq!(app.map.zoom, zoom - 1);
    }

    #[test]
    fn test_shifted_keys_pan_the_map() {
        let mut app = app(true);
        app.focused = Field::Map;
        let start = app.map.center;

        handle_key(&mut app, KeyEvent::new(KeyCode::Char('L'), KeyModifiers::SHIFT));
        assert!(app.map.center.longitude > start.longitude);

        handle_key(&mut app, KeyEvent::new(KeyCode::Down, KeyModifiers::SHIFT));
        assert!(app.map.center.latitude < start.latitude);
        assert_eq!(app.map_cursor, None);
    }

    #[test]
    fn test_control_chords_are_not_typed() {
        let mut app = app(true);
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "ab");
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT));
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('C'), KeyModifiers::SHIFT));
        assert_eq!(app.form().name, "abC");

        press(&mut app, KeyCode::Esc);
        app.focused = Field::Images;
        press(&mut app, KeyCode::Enter);
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(app.prompt_input, "");
    }

    #[test]
    fn test_any_key_dismisses_notice() {
        let mut app = app(true);
        app.controller.host_mut().notices.push_back("ok".to_string());
        app.mode = Mode::Notice;

        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.mode, Mode::Normal);
        assert!(app.current_notice().is_none());
    }
}
