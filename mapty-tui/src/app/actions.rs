// mapty-tui/src/app/actions.rs
use super::state::{App, Focus};
use chrono::Utc;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use mapty_lib::{AppError, Workout};

/// Rows taken by one entry of the workout list.
pub const LIST_ITEM_HEIGHT: u16 = 2;

impl App {
    /// Treats the map cell at (`column`, `row`) as a click on the map.
    pub fn click_map_cell(&mut self, column: u16, row: u16) {
        let viewport = self.map_viewport();
        let Some(coords) = self
            .service
            .map()
            .map(|map| map.coords_at(viewport, column, row))
        else {
            self.set_error(AppError::MapNotReady.to_string());
            return;
        };
        self.map_cursor = (column, row);
        match self.service.click_map(coords) {
            Ok(()) => self.focus = Focus::Form,
            Err(e) => self.set_error(e.to_string()),
        }
    }

    pub fn submit_form(&mut self) {
        let submitted = self
            .service
            .submit_workout(Utc::now())
            .map(|_| ());
        match submitted {
            Ok(()) => {
                self.list_state.select(Some(0));
                self.focus = Focus::Map;
            }
            Err(e @ (AppError::InvalidInput(_) | AppError::Workout(_))) => {
                self.alert("Invalid input".into(), e.to_string());
            }
            // The workout is kept in memory even when the write fails.
            Err(e @ AppError::Persist(_)) => {
                self.list_state.select(Some(0));
                self.focus = Focus::Map;
                self.alert("Could not save".into(), e.to_string());
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    pub fn cancel_form(&mut self) {
        self.service.cancel_form();
        self.focus = Focus::Map;
    }

    /// Id of the list entry at `index`, counting from the top (newest first).
    pub fn workout_id_at(&self, index: usize) -> Option<String> {
        self.service
            .workouts_newest_first()
            .nth(index)
            .map(|w: &Workout| w.id().to_string())
    }

    /// Pans the map to the selected list entry.
    pub fn open_selected_workout(&mut self) {
        let id = self.list_state.selected().and_then(|i| self.workout_id_at(i));
        self.service.move_to_workout(id.as_deref());
    }

    /// Index of the list entry drawn on terminal row `y`, if any.
    fn list_index_at(&self, x: u16, y: u16) -> Option<usize> {
        let area = self.list_area;
        if !contains(area, x, y) {
            return None;
        }
        let index = self.list_state.offset() + usize::from((y - area.y) / LIST_ITEM_HEIGHT);
        (index < self.service.workouts().len()).then_some(index)
    }

    pub fn handle_mouse_event(&mut self, event: MouseEvent) {
        if !matches!(event.kind, MouseEventKind::Down(MouseButton::Left)) {
            return;
        }
        if self.active_modal != super::ActiveModal::None {
            return;
        }
        let (x, y) = (event.column, event.row);
        if contains(self.map_area, x, y) {
            self.click_map_cell(x - self.map_area.x, y - self.map_area.y);
        } else if contains(self.list_area, x, y) {
            // Clicks between or below entries do nothing.
            let index = self.list_index_at(x, y);
            if let Some(index) = index {
                self.list_state.select(Some(index));
                self.focus = Focus::List;
            }
            let id = index.and_then(|i| self.workout_id_at(i));
            self.service.move_to_workout(id.as_deref());
        }
    }
}

const fn contains(area: ratatui::layout::Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}
