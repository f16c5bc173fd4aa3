// mapty-tui/src/ui/modals.rs
use crate::{
    app::{ActiveModal, App},
    ui::layout::centered_rect,
};
use ratatui::{
    layout::Margin,
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render_modal(f: &mut Frame, app: &App) {
    match &app.active_modal {
        ActiveModal::Help => render_help_modal(f),
        ActiveModal::Alert { title, message } => render_alert_modal(f, title, message),
        ActiveModal::None => {}
    }
}

fn render_help_modal(f: &mut Frame) {
    let block = Block::default()
        .title("Help (?)")
        .borders(Borders::ALL)
        .title_style(Style::new().bold())
        .border_style(Style::new().yellow());
    let area = centered_rect(60, 70, f.size());
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let help_text = vec![
        Line::from("--- Global ---").style(Style::new().bold().underlined()),
        Line::from(" q / Ctrl-C: Quit"),
        Line::from(" ?: Show/Hide This Help"),
        Line::from(" Tab: Cycle Focus (Map > Workouts > Form)"),
        Line::from(" + / -: Zoom In / Out"),
        Line::from(""),
        Line::from("--- Map ---").style(Style::new().bold().underlined()),
        Line::from(" Mouse click: Log a workout at that point"),
        Line::from(" h/j/k/l / Arrows: Move the crosshair"),
        Line::from(" Enter / Space: Log a workout at the crosshair"),
        Line::from(" c: Centre the crosshair"),
        Line::from(""),
        Line::from("--- New Workout Form ---").style(Style::new().bold().underlined()),
        Line::from(" Tab / ↓, Shift-Tab / ↑: Next / Previous Field"),
        Line::from(" ← / → / Space on Type: Switch Running <=> Cycling"),
        Line::from(" Enter: Save Workout"),
        Line::from(" Esc: Discard"),
        Line::from(""),
        Line::from("--- Workouts ---").style(Style::new().bold().underlined()),
        Line::from(" Mouse click / Enter: Move the map to the workout"),
        Line::from(" k/j / ↑/↓: Navigate"),
        Line::from(""),
        Line::from(Span::styled(
            " Press Esc, ?, or Enter to close ",
            Style::new().italic().yellow(),
        )),
    ];

    let paragraph = Paragraph::new(help_text).wrap(Wrap { trim: false });
    f.render_widget(
        paragraph,
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}

fn render_alert_modal(f: &mut Frame, title: &str, message: &str) {
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .title_style(Style::new().bold())
        .border_style(Style::new().red());
    let area = centered_rect(50, 25, f.size());
    f.render_widget(Clear, area);

    let text = vec![
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(" [Enter] OK ", Style::new().italic().yellow())),
    ];
    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(ratatui::layout::Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
