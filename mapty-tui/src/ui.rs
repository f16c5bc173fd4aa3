// mapty-tui/src/ui.rs
mod layout;
mod map_view;
mod modals;
mod sidebar;
mod status_bar;

pub use layout::render_ui;

use mapty_lib::WorkoutType;
use ratatui::style::Color;

/// Accent colour of a workout type, used for markers, popups and list entries.
pub const fn workout_color(workout_type: WorkoutType) -> Color {
    match workout_type {
        WorkoutType::Running => Color::Rgb(0, 196, 106),
        WorkoutType::Cycling => Color::Rgb(255, 181, 69),
    }
}
