// mapty-tui/src/ui/map_view.rs
use crate::{
    app::{App, Focus},
    ui::workout_color,
};
use mapty_lib::{map::Marker, MapView, Viewport};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols,
    text::{Line, Span},
    widgets::{
        block::{Position, Title},
        canvas::{Canvas, Context, Map, MapResolution},
        Block, Borders, Paragraph, Wrap,
    },
    Frame,
};

pub fn render_map(f: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.focus == Focus::Map;
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let Some(map) = app.service.map() else {
        let block = Block::default()
            .title("Map")
            .borders(Borders::ALL)
            .border_style(border_style);
        app.map_area = block.inner(area);
        let reason = app
            .service
            .location_error()
            .map(ToString::to_string)
            .unwrap_or_default();
        let text = vec![
            Line::from("Error Getting Location".bold().red()),
            Line::from(""),
            Line::from(reason),
        ];
        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
        return;
    };

    let block = Block::default()
        .title(format!(" Map · zoom {} ", map.zoom()))
        .title(
            Title::from(format!(" {} ", map.tile_layer().attribution))
                .position(Position::Bottom)
                .alignment(Alignment::Right),
        )
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    let viewport = Viewport {
        width: inner.width,
        height: inner.height,
    };
    let bounds = map.bounds(viewport);
    // Height of one terminal row in degrees of latitude.
    let row_height = (bounds.north - bounds.south) / f64::from(inner.height.max(1));
    let cursor = focused.then(|| {
        let (column, row) = app.map_cursor;
        map.coords_at(viewport, column, row)
    });

    let canvas = Canvas::default()
        .block(block)
        .marker(symbols::Marker::Braille)
        .x_bounds([bounds.west, bounds.east])
        .y_bounds([bounds.south, bounds.north])
        .paint(|ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::High,
                color: Color::DarkGray,
            });
            ctx.layer();
            for marker in map.markers() {
                draw_marker(ctx, marker, row_height);
            }
            if let Some(point) = cursor {
                ctx.print(point.lng, point.lat, "╋".yellow());
            }
        });
    f.render_widget(canvas, area);
    render_center_hint(f, map, inner);
    app.map_area = inner;
}

fn draw_marker(ctx: &mut Context, marker: &Marker, row_height: f64) {
    let color = workout_color(marker.workout_type);
    ctx.print(marker.coords.lng, marker.coords.lat, "●".fg(color));
    if !marker.popup.open {
        return;
    }
    let (min_width, max_width) = marker.popup.width_cells();
    let mut label: String = marker
        .popup
        .content
        .chars()
        .take(usize::from(max_width))
        .collect();
    let padding = usize::from(min_width).saturating_sub(label.chars().count());
    label.push_str(&" ".repeat(padding));
    // Popup sits on the row above its marker, with a bar in the type colour.
    ctx.print(
        marker.coords.lng,
        marker.coords.lat + row_height,
        Line::from(vec![
            Span::styled("▌", Style::default().fg(color)),
            Span::styled(
                label,
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Rgb(45, 52, 57))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
    );
}

/// Shows the centre coordinates in the top right corner of the map.
fn render_center_hint(f: &mut Frame, map: &MapView, inner: Rect) {
    let text = format!(" {} ", map.center());
    let width = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
    if inner.width <= width || inner.height == 0 {
        return;
    }
    let area = Rect::new(inner.x + inner.width - width, inner.y, width, 1);
    f.render_widget(Paragraph::new(text).style(Style::default().fg(Color::Gray)), area);
}
