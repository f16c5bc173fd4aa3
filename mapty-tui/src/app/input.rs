// mapty-tui/src/app/input.rs
use super::{
    navigation::{list_next, list_previous, move_cursor},
    state::{ActiveModal, App, Focus},
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use mapty_lib::FormField;

// Main key event handler method on App
impl App {
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        // Handle based on active modal first
        if self.active_modal != ActiveModal::None {
            self.handle_modal_input(key);
            return Ok(());
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }

        // The form swallows typing while it has focus.
        if self.focus == Focus::Form && self.service.form().is_visible() {
            self.handle_form_input(key);
            return Ok(());
        }

        // Global keys
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.active_modal = ActiveModal::Help,
            KeyCode::Char('+' | '=') => self.service.zoom_in(),
            KeyCode::Char('-') => self.service.zoom_out(),
            KeyCode::Tab => self.cycle_focus(),
            _ => match self.focus {
                Focus::Map => self.handle_map_input(key),
                Focus::List => self.handle_list_input(key),
                Focus::Form => {}
            },
        }
        Ok(())
    }

    fn handle_modal_input(&mut self, key: KeyEvent) {
        match self.active_modal {
            ActiveModal::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('q' | '?') | KeyCode::Enter) {
                    self.active_modal = ActiveModal::None;
                }
            }
            ActiveModal::Alert { .. } => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ')) {
                    self.active_modal = ActiveModal::None;
                }
            }
            ActiveModal::None => {}
        }
    }

    fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Map => Focus::List,
            Focus::List if self.service.form().is_visible() => Focus::Form,
            Focus::List | Focus::Form => Focus::Map,
        };
    }

    fn handle_form_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => return self.cancel_form(),
            KeyCode::Enter => return self.submit_form(),
            _ => {}
        }
        let on_type = self.service.form().focused() == FormField::Type;
        let form = self.service.form_mut();
        match key.code {
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if on_type => form.toggle_type(),
            KeyCode::Backspace => form.pop_char(),
            KeyCode::Char(c) => form.push_char(c),
            _ => {}
        }
    }

    fn handle_map_input(&mut self, key: KeyEvent) {
        let (dx, dy) = match key.code {
            KeyCode::Left | KeyCode::Char('h') => (-1, 0),
            KeyCode::Right | KeyCode::Char('l') => (1, 0),
            KeyCode::Up | KeyCode::Char('k') => (0, -1),
            KeyCode::Down | KeyCode::Char('j') => (0, 1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let (column, row) = self.map_cursor;
                self.click_map_cell(column, row);
                return;
            }
            KeyCode::Char('c') => {
                self.center_cursor();
                return;
            }
            _ => return,
        };
        self.map_cursor = move_cursor(
            self.map_cursor,
            dx,
            dy,
            self.map_area.width,
            self.map_area.height,
        );
    }

    fn handle_list_input(&mut self, key: KeyEvent) {
        let len = self.service.workouts().len();
        match key.code {
            KeyCode::Char('k') | KeyCode::Up => list_previous(&mut self.list_state, len),
            KeyCode::Char('j') | KeyCode::Down => list_next(&mut self.list_state, len),
            KeyCode::Enter => self.open_selected_workout(),
            _ => {}
        }
    }
}
