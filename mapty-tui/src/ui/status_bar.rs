// mapty-tui/src/ui/status_bar.rs
use crate::app::{ActiveModal, App, Focus};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

pub fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let form_open = app.service.form().is_visible();
    let status_text = match app.active_modal {
        ActiveModal::None => match app.focus {
            Focus::Form if form_open => {
                " [Tab/↑↓] Field | [←→] Type | [Enter] Save | [Esc] Discard "
            }
            Focus::Map | Focus::Form => {
                " [Click/Enter] Log workout | [hjkl] Crosshair | [+/-] Zoom | [Tab] Focus | [?] Help | [q]uit "
            }
            Focus::List => {
                " [↑↓/jk] Nav | [Click/Enter] Show on map | [Tab] Focus | [?] Help | [q]uit "
            }
        },
        ActiveModal::Help => " [Esc/Enter/?] Close Help ",
        ActiveModal::Alert { .. } => " [Enter/Esc] Dismiss ",
    };

    let error_text = app.last_error.as_deref().unwrap_or("");

    let status_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let status_paragraph =
        Paragraph::new(status_text).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(status_paragraph, status_chunks[0]);

    let error_paragraph = Paragraph::new(error_text)
        .style(Style::default().bg(Color::DarkGray).fg(Color::Red))
        .alignment(ratatui::layout::Alignment::Right);
    f.render_widget(error_paragraph, status_chunks[1]);
}
