//! UI rendering using ratatui

use happy_core::{OrphanageApi, ABOUT_MAX_CHARS};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as GridLine, Map as WorldMap, MapResolution},
        Block, Borders, Clear, List, ListItem, Paragraph, Wrap,
    },
    Frame,
};

use super::app::{App, Field, Mode};

/// Primary accent color
const ACCENT: Color = Color::Cyan;
/// Secondary color for less important elements
const SECONDARY: Color = Color::DarkGray;
/// Highlight color for selected items
const HIGHLIGHT: Color = Color::Yellow;
/// Success color
const SUCCESS: Color = Color::Green;
/// Dim text color
const DIM: Color = Color::Rgb(100, 100, 100);

const MARKER_SYMBOL: &str = "●";
const CROSSHAIR_SYMBOL: &str = "+";

/// Render the entire UI
pub fn render<A: OrphanageApi>(frame: &mut Frame, app: &mut App<A>) {
    let area = frame.area();

    // Header + content + status
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),    // Map
            Constraint::Length(3), // Name
            Constraint::Length(6), // About
            Constraint::Length(5), // Images
        ])
        .split(columns[0]);

    render_map(frame, app, left[0]);
    render_text_field(frame, app, Field::Name, left[1]);
    render_text_field(frame, app, Field::About, left[2]);
    render_images(frame, app, left[3]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Instructions
            Constraint::Length(3), // Opening hours
            Constraint::Length(3), // Weekends
            Constraint::Length(3), // Confirm
            Constraint::Min(0),
        ])
        .split(columns[1]);

    render_text_field(frame, app, Field::Instructions, right[0]);
    render_text_field(frame, app, Field::OpeningHours, right[1]);
    render_weekends(frame, app, right[2]);
    render_confirm(frame, app, right[3]);

    render_status_bar(frame, app, rows[2]);

    match app.mode {
        Mode::Prompt => render_image_prompt(frame, app),
        Mode::Notice => render_notice(frame, app),
        Mode::Normal | Mode::Edit => {}
    }
}

fn render_header(frame: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            " Cadastro de orfanato ",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled("Tab: próximo campo", Style::default().fg(DIM)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Bordered block for a field, colored by focus and mode
fn field_block<A: OrphanageApi>(app: &App<A>, field: Field, title: String) -> Block<'static> {
    let focused = app.focused == field;
    let border_color = match (focused, app.mode) {
        (true, Mode::Edit) => SUCCESS,
        (true, _) => ACCENT,
        (false, _) => SECONDARY,
    };
    let title_style = if focused {
        Style::default().fg(border_color).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    Block::default()
        .title(title)
        .title_style(title_style)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
}

fn render_map<A: OrphanageApi>(frame: &mut Frame, app: &mut App<A>, area: Rect) {
    let title = format!(" {} · zoom {} ", Field::Map.label(), app.map.zoom);
    let block = field_block(app, Field::Map, title)
        .title_bottom(Line::from(format!(" {} ", app.map.center_tile_url())).style(Style::default().fg(DIM)));

    app.map_area = block.inner(area);
    let viewport = app.viewport();
    let (x_bounds, y_bounds) = viewport.bounds();

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(move |ctx| {
            ctx.draw(&WorldMap {
                color: SECONDARY,
                resolution: MapResolution::High,
            });
            // Quarter grid so the view reads as a map at street zoom
            for i in 1..4 {
                let x = x_bounds[0] + (x_bounds[1] - x_bounds[0]) * f64::from(i) / 4.0;
                let y = y_bounds[0] + (y_bounds[1] - y_bounds[0]) * f64::from(i) / 4.0;
                ctx.draw(&GridLine::new(x, y_bounds[0], x, y_bounds[1], DIM));
                ctx.draw(&GridLine::new(x_bounds[0], y, x_bounds[1], y, DIM));
            }
        });
    frame.render_widget(canvas, area);

    let map_area = app.map_area;
    let buffer = frame.buffer_mut();

    if app.focused == Field::Map && app.mode == Mode::Normal && !map_area.is_empty() {
        let (col, row) = app.cursor();
        if let Some(cell) = buffer.cell_mut((map_area.x + col, map_area.y + row)) {
            cell.set_symbol(CROSSHAIR_SYMBOL).set_fg(HIGHLIGHT);
        }
    }

    if let Some((col, row)) = app.form().position.and_then(|p| viewport.cell_of(p)) {
        if let Some(cell) = buffer.cell_mut((map_area.x + col, map_area.y + row)) {
            cell.set_symbol(MARKER_SYMBOL).set_fg(Color::Red);
        }
    }
}

fn render_text_field<A: OrphanageApi>(frame: &mut Frame, app: &App<A>, field: Field, area: Rect) {
    let value = app.text_value(field).unwrap_or_default();
    let title = if field == Field::About {
        format!(
            " {} ({}/{}) ",
            field.label(),
            value.chars().count(),
            ABOUT_MAX_CHARS
        )
    } else {
        format!(" {} ", field.label())
    };

    let editing = app.mode == Mode::Edit && app.focused == field;
    let content = if editing {
        format!("{}_", value)
    } else {
        value.to_string()
    };

    let paragraph = Paragraph::new(content)
        .block(field_block(app, field, title))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_images<A: OrphanageApi>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let images = &app.form().images;
    let title = format!(" {} ({}) ", Field::Images.label(), images.len());

    let items: Vec<ListItem> = if images.is_empty() {
        vec![ListItem::new(Span::styled(
            "+ Enter para selecionar fotos",
            Style::default().fg(DIM),
        ))]
    } else {
        images
            .entries()
            .iter()
            .map(|entry| {
                ListItem::new(Line::from(vec![
                    Span::styled(entry.file.file_name.clone(), Style::default().fg(Color::White)),
                    Span::raw("  "),
                    Span::styled(entry.preview.to_string(), Style::default().fg(DIM)),
                ]))
            })
            .collect()
    };

    let list = List::new(items).block(field_block(app, Field::Images, title));
    frame.render_widget(list, area);
}

fn render_weekends<A: OrphanageApi>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let open = app.form().open_on_weekends;
    let button = |label: &'static str, active: bool, color: Color| {
        if active {
            Span::styled(
                label,
                Style::default()
                    .bg(color)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(label, Style::default().fg(DIM))
        }
    };

    let line = Line::from(vec![
        button("[ Sim ]", open, SUCCESS),
        Span::raw("  "),
        button("[ Não ]", !open, Color::Red),
    ]);

    let title = format!(" {} ", Field::OpenOnWeekends.label());
    let paragraph = Paragraph::new(line).block(field_block(app, Field::OpenOnWeekends, title));
    frame.render_widget(paragraph, area);
}

fn render_confirm<A: OrphanageApi>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let style = if app.focused == Field::Confirm {
        Style::default()
            .bg(SUCCESS)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(SUCCESS)
    };

    let paragraph = Paragraph::new(Span::styled(" Confirmar ", style))
        .alignment(Alignment::Center)
        .block(field_block(app, Field::Confirm, String::new()));
    frame.render_widget(paragraph, area);
}

fn render_status_bar<A: OrphanageApi>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let mode = app.mode;
    let mode_indicator = Span::styled(
        format!(" {} ", mode.display_name()),
        Style::default().bg(mode.color()).fg(Color::Black),
    );

    let help_text = match (mode, app.focused) {
        (Mode::Normal, Field::Map) => {
            "setas:mover  Shift+setas/arrastar:deslocar  Enter/clique:marcar  +/-:zoom  Tab:campo"
        }
        (Mode::Normal, Field::OpenOnWeekends) => "s:sim  n:não  Espaço:alternar  Tab:campo  q:sair",
        (Mode::Normal, _) => "Tab/j/k:campo  Enter:editar  Ctrl+S:enviar  q:sair",
        (Mode::Edit, _) => "Esc:sair  Ctrl+S:enviar",
        (Mode::Prompt, _) => "Enter:selecionar  Esc:cancelar",
        (Mode::Notice, _) => "qualquer tecla:fechar",
    };

    let position = app
        .form()
        .position
        .map(|p| format!(" [{}]", p))
        .unwrap_or_else(|| " [sem posição]".to_string());

    let status = app.status_message.as_deref().unwrap_or("");

    let line = Line::from(vec![
        mode_indicator,
        Span::raw(" "),
        Span::styled(help_text, Style::default().fg(DIM)),
        Span::styled(position, Style::default().fg(ACCENT)),
        Span::raw(" "),
        Span::styled(status, Style::default().fg(HIGHLIGHT)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_image_prompt<A: OrphanageApi>(frame: &mut Frame, app: &App<A>) {
    let area = frame.area();

    let width = 70.min(area.width.saturating_sub(4));
    let popup_area = Rect {
        x: (area.width.saturating_sub(width)) / 2,
        y: (area.height.saturating_sub(3)) / 2,
        width,
        height: 3.min(area.height),
    };

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Selecionar fotos ")
        .title_style(Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(HIGHLIGHT));

    let paragraph = Paragraph::new(format!("{}|", app.prompt_input)).block(block);
    frame.render_widget(paragraph, popup_area);
}

fn render_notice<A: OrphanageApi>(frame: &mut Frame, app: &App<A>) {
    let Some(notice) = app.current_notice() else {
        return;
    };
    let area = frame.area();

    let width = 60.min(area.width.saturating_sub(4));
    let height = 5.min(area.height);
    let popup_area = Rect {
        x: (area.width.saturating_sub(width)) / 2,
        y: (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Aviso (qualquer tecla para fechar) ")
        .title_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let paragraph = Paragraph::new(notice.to_string())
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::tests::app;
    use happy_core::{FormEvent, Position};
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    fn screen_text(buffer: &Buffer) -> String {
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_render_shows_form() {
        let mut app = app(true);
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| render(frame, &mut app)).unwrap();

        let text = screen_text(terminal.backend().buffer());
        assert!(text.contains("Confirmar"));
        assert!(text.contains("Sim"));
        assert!(text.contains("sem posição"));
        assert!(app.map_area.width > 0);
    }

    #[test]
    fn test_marker_drawn_where_clicked() {
        let mut app = app(true);
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| render(frame, &mut app)).unwrap();

        app.click_map_cell(4, 2);
        app.focused = Field::Name;
        terminal.draw(|frame| render(frame, &mut app)).unwrap();

        let area = app.map_area;
        let cell = terminal
            .backend()
            .buffer()
            .cell((area.x + 4, area.y + 2))
            .map(|c| c.symbol().to_string());
        assert_eq!(cell.as_deref(), Some(MARKER_SYMBOL));
    }

    #[test]
    fn test_marker_hidden_outside_view() {
        let mut app = app(true);
        app.controller
            .dispatch(FormEvent::MapClicked(Position::new(51.5, -0.12)));
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| render(frame, &mut app)).unwrap();

        let text = screen_text(terminal.backend().buffer());
        assert!(!text.contains(MARKER_SYMBOL));
    }

    #[test]
    fn test_notice_popup() {
        let mut app = app(true);
        app.controller
            .host_mut()
            .notices
            .push_back("Cadastro realizado com Sucesso!".to_string());
        app.mode = Mode::Notice;

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| render(frame, &mut app)).unwrap();

        let text = screen_text(terminal.backend().buffer());
        assert!(text.contains("Cadastro realizado com Sucesso!"));
    }
}
