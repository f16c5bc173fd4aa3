// mapty-tui/src/app/state.rs
use mapty_lib::{AppError, AppService, Geolocation, Viewport};
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use std::time::{Duration, Instant};

/// How long a status bar message stays up.
const ERROR_DISPLAY: Duration = Duration::from_secs(5);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActiveModal {
    None,
    Help,
    /// Blocking message, dismissed with Enter or Esc.
    Alert { title: String, message: String },
}

// Which pane receives key presses
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Map,
    Form,
    List,
}

// Holds the application state
pub struct App {
    pub service: AppService,
    pub should_quit: bool,
    pub active_modal: ActiveModal,
    pub focus: Focus,
    pub last_error: Option<String>, // For status bar errors
    pub error_clear_time: Option<Instant>,

    pub list_state: ListState,
    /// Keyboard crosshair on the map, in cells relative to `map_area`.
    pub map_cursor: (u16, u16),

    // Areas from the last draw, used to hit-test mouse clicks
    pub map_area: Rect,
    pub list_area: Rect,
}

impl App {
    pub fn new(service: AppService) -> Self {
        Self {
            service,
            should_quit: false,
            active_modal: ActiveModal::None,
            focus: Focus::Map,
            last_error: None,
            error_clear_time: None,
            list_state: ListState::default(),
            map_cursor: (0, 0),
            map_area: Rect::default(),
            list_area: Rect::default(),
        }
    }

    /// Locates the user, builds the map and loads the stored workouts.
    /// A failed lookup leaves the list usable and raises an alert.
    pub fn start(&mut self, geolocation: &dyn Geolocation) {
        match self.service.start(geolocation) {
            Ok(()) => {}
            Err(e @ AppError::LocationUnavailable(_)) => {
                let detail = std::error::Error::source(&e)
                    .map(ToString::to_string)
                    .unwrap_or_default();
                self.alert(e.to_string(), detail);
            }
            Err(e) => self.alert("Error".into(), e.to_string()),
        }
        if !self.service.workouts().is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn alert(&mut self, title: String, message: String) {
        tracing::info!(%title, %message, "Showing alert");
        self.active_modal = ActiveModal::Alert { title, message };
    }

    // Method to set status bar errors
    pub fn set_error(&mut self, msg: String) {
        tracing::warn!(error = %msg, "Status bar error");
        self.last_error = Some(msg);
        self.error_clear_time = Some(Instant::now() + ERROR_DISPLAY);
    }

    pub(crate) fn clear_expired_error(&mut self) {
        if let Some(clear_time) = self.error_clear_time {
            if Instant::now() >= clear_time {
                self.last_error = None;
                self.error_clear_time = None;
            }
        }
    }

    pub const fn map_viewport(&self) -> Viewport {
        Viewport {
            width: self.map_area.width,
            height: self.map_area.height,
        }
    }

    /// Puts the crosshair in the middle of the map.
    pub fn center_cursor(&mut self) {
        self.map_cursor = (self.map_area.width / 2, self.map_area.height / 2);
    }
}
