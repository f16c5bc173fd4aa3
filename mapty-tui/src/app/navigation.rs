// mapty-tui/src/app/navigation.rs
use ratatui::widgets::ListState;

pub fn list_next(state: &mut ListState, list_len: usize) {
    if list_len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(i) if i + 1 >= list_len => 0,
        Some(i) => i + 1,
        None => 0,
    };
    state.select(Some(i));
}

pub fn list_previous(state: &mut ListState, list_len: usize) {
    if list_len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(0) | None => list_len - 1,
        Some(i) => i - 1,
    };
    state.select(Some(i));
}

/// Moves the map crosshair by (`dx`, `dy`), kept inside a `width` x `height` area.
pub fn move_cursor(cursor: (u16, u16), dx: i32, dy: i32, width: u16, height: u16) -> (u16, u16) {
    let clamp = |value: u16, delta: i32, size: u16| -> u16 {
        let max = i32::from(size.saturating_sub(1));
        // Bounded by `max`, which came from a u16.
        (i32::from(value) + delta).clamp(0, max) as u16
    };
    (clamp(cursor.0, dx, width), clamp(cursor.1, dy, height))
}
