// mapty-tui/src/ui/sidebar.rs
use crate::{
    app::{App, Focus},
    ui::workout_color,
};
use mapty_lib::{FormField, FormVisibility, Workout, WorkoutForm};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Rows used by the form, borders included.
const FORM_HEIGHT: u16 = 4;
const LABEL_WIDTH: usize = 9;
const VALUE_WIDTH: usize = 11;

pub fn render_sidebar(f: &mut Frame, app: &mut App, area: Rect) {
    // A hidden form still holds its rows until the collapse finishes.
    let form_height = match app.service.form().visibility() {
        FormVisibility::Hidden => 0,
        FormVisibility::Visible | FormVisibility::Collapsing { .. } => FORM_HEIGHT,
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(form_height),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let logo = Paragraph::new(Line::from(vec![
        Span::styled("◉ ", Style::default().fg(workout_color(mapty_lib::WorkoutType::Running))),
        Span::styled("mapty", Style::default().add_modifier(Modifier::BOLD)),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(logo, chunks[0]);

    if app.service.form().is_visible() {
        render_form(f, app.service.form(), app.focus == Focus::Form, chunks[1]);
    }
    render_workout_list(f, app, chunks[2]);

    let footer = Paragraph::new("Click the map to log a workout")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, chunks[3]);
}

fn field_spans(form: &WorkoutForm, field: FormField, focused: bool) -> Vec<Span<'static>> {
    let value = form.input(field);
    let invalid = form.invalid_fields().contains(&field);
    let is_focused = focused && form.focused() == field;

    let (text, mut style) = if field == FormField::Type {
        (format!("◂ {value} ▸"), Style::default().fg(Color::White))
    } else if value.is_empty() {
        (field.placeholder().to_string(), Style::default().fg(Color::DarkGray))
    } else {
        (value.to_string(), Style::default().fg(Color::White))
    };
    if invalid {
        style = style.fg(Color::Red);
    }
    if is_focused {
        style = style.add_modifier(Modifier::REVERSED);
    }
    vec![
        Span::styled(
            format!("{:<LABEL_WIDTH$}", field.label()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{text:<VALUE_WIDTH$}"), style),
        Span::raw(" "),
    ]
}

fn render_form(f: &mut Frame, form: &WorkoutForm, focused: bool, area: Rect) {
    let [type_field, distance, duration, type_specific] = form.visible_fields();
    let mut first = field_spans(form, type_field, focused);
    first.extend(field_spans(form, distance, focused));
    let mut second = field_spans(form, duration, focused);
    second.extend(field_spans(form, type_specific, focused));

    let border = if focused { Color::Yellow } else { Color::Gray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title("New workout");
    let paragraph = Paragraph::new(vec![Line::from(first), Line::from(second)]).block(block);
    f.render_widget(paragraph, area);
}

fn workout_item(workout: &Workout) -> ListItem<'static> {
    let workout_type = workout.workout_type();
    let color = workout_color(workout_type);
    let (metric, metric_unit) = workout.derived_metric();
    let (extra, extra_unit) = workout.type_metric();
    let extra_icon = match workout_type {
        mapty_lib::WorkoutType::Running => "🦶🏼",
        mapty_lib::WorkoutType::Cycling => "⛰",
    };
    let title = Line::from(vec![
        Span::styled("▌", Style::default().fg(color)),
        Span::styled(
            workout.description().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]);
    let details = Line::from(vec![
        Span::styled("▌", Style::default().fg(color)),
        Span::raw(format!(
            "{} {} km  ⏱ {} min  ⚡️ {metric:.1} {metric_unit}  {extra_icon} {extra} {extra_unit}",
            workout_type.icon(),
            workout.distance(),
            workout.duration(),
        )),
    ]);
    ListItem::new(vec![title, details])
}

fn render_workout_list(f: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.focus == Focus::List;
    let block = Block::default()
        .title(format!("Workouts ({})", app.service.workouts().len()))
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });
    app.list_area = block.inner(area);

    if app.service.workouts().is_empty() {
        let hint = Paragraph::new("No workouts yet.")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(hint, area);
        return;
    }

    let items: Vec<ListItem> = app.service.workouts_newest_first().map(workout_item).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(if focused {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        })
        .highlight_symbol(">");
    f.render_stateful_widget(list, area, &mut app.list_state);
}
