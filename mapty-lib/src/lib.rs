// mapty-lib/src/lib.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

// --- Declare modules ---
mod config;
pub mod coords;
pub mod db;
pub mod form;
pub mod geolocation;
pub mod logging;
pub mod map;
pub mod persistence;
pub mod workout;

// --- Expose public types ---
pub use config::{
    get_config_path as get_config_path_util, load as load_config_util, parse_color,
    save as save_config_util, Config, ConfigError, MapConfig, PopupConfig, StandardColor, Theme,
};
pub use coords::{Coords, CoordsError};
pub use db::{get_data_dir as get_data_dir_util, get_db_path as get_db_path_util, DbError, SqliteStore};
pub use form::{FormError, FormField, FormVisibility, WorkoutForm, WorkoutInput};
pub use geolocation::{ConfiguredGeolocation, FixedGeolocation, Geolocation, GeolocationError};
pub use map::{Bounds, MapView, Marker, PanOptions, TileLayer, Viewport};
pub use persistence::{KeyValueStore, MemoryStore, StorageError, WorkoutStore};
pub use workout::{Workout, WorkoutError, WorkoutKind, WorkoutType};

/// Every failure the controller reports to a user-facing surface.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Error Getting Location")]
    LocationUnavailable(#[source] GeolocationError),
    #[error(transparent)]
    InvalidInput(#[from] FormError),
    #[error("Click on the map to choose where the workout happened.")]
    NoLocationSelected,
    #[error("The map is not ready; the current location could not be determined.")]
    MapNotReady,
    #[error("Invalid workout: {0}")]
    Workout(#[from] WorkoutError),
    #[error("Failed to save workouts: {0}")]
    Persist(#[from] StorageError),
}

pub struct AppService {
    pub config: Config,
    pub config_path: PathBuf,
    pub db_path: PathBuf,
    store: WorkoutStore<Box<dyn KeyValueStore>>,
    workouts: Vec<Workout>,
    map: Option<MapView>,
    pending_click: Option<Coords>,
    form: WorkoutForm,
    location_error: Option<GeolocationError>,
}

impl AppService {
    /// Initializes the application service.
    /// # Errors
    /// Returns `anyhow::Error` if config/db path determination, loading, or initialization fails.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"))?;

        let db_path = db::get_db_path().context("Failed to determine database path")?;
        let store = SqliteStore::open(&db_path)
            .with_context(|| format!("Failed to open database at {db_path:?}"))?;

        Ok(Self::with_store(config, config_path, db_path, Box::new(store)))
    }

    pub fn with_store(
        config: Config,
        config_path: PathBuf,
        db_path: PathBuf,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        Self {
            config,
            config_path,
            db_path,
            store: WorkoutStore::new(store),
            workouts: Vec::new(),
            map: None,
            pending_click: None,
            form: WorkoutForm::new(),
            location_error: None,
        }
    }

    /// Service backed by a throwaway in-memory store.
    pub fn in_memory(config: Config) -> Self {
        Self::with_store(
            config,
            "config.toml".into(),
            ":memory:".into(),
            Box::new(MemoryStore::new()),
        )
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    /// Saves the current configuration state.
    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn save_config(&self) -> Result<(), ConfigError> {
        config::save(&self.config_path, &self.config)
    }

    /// Sets the position reported to the map at startup.
    /// # Errors
    /// - `ConfigError::InvalidHomeLocation` if the coordinates are out of range.
    /// - `ConfigError` variants if saving fails.
    pub fn set_home_location(&mut self, coords: Coords) -> Result<(), ConfigError> {
        if !coords.is_valid() {
            return Err(ConfigError::InvalidHomeLocation(coords.to_string()));
        }
        self.config.home_location = Some(coords);
        self.save_config()
    }

    /// # Errors
    /// - `ConfigError::InvalidZoomLevel` outside 1..=18.
    /// - `ConfigError` variants if saving fails.
    pub fn set_zoom_level(&mut self, zoom: u8) -> Result<(), ConfigError> {
        if !(map::MIN_ZOOM..=map::MAX_ZOOM).contains(&zoom) {
            return Err(ConfigError::InvalidZoomLevel(zoom));
        }
        self.config.map.zoom_level = zoom;
        self.save_config()
    }

    /// Startup: locate the user and build the map, then load stored workouts
    /// into the list and onto the map. The workouts are loaded even when the
    /// location is unavailable.
    /// # Errors
    /// `AppError::LocationUnavailable` when no map could be created.
    pub fn start(&mut self, geolocation: &dyn Geolocation) -> Result<(), AppError> {
        self.map = None;
        self.pending_click = None;
        let located = geolocation.current_position();
        match &located {
            Ok(position) => self.load_map(*position),
            Err(e) => warn!(error = %e, "Could not get the current position; map disabled"),
        }
        self.location_error = located.as_ref().err().cloned();

        self.load_workouts();

        located.map(|_| ()).map_err(AppError::LocationUnavailable)
    }

    fn load_map(&mut self, position: Coords) {
        info!(%position, zoom = self.config.map.zoom_level, "Loading map");
        self.map = Some(MapView::new(
            position,
            self.config.map.zoom_level,
            TileLayer {
                url: self.config.map.tile_url.clone(),
                attribution: self.config.map.attribution.clone(),
            },
        ));
    }

    fn load_workouts(&mut self) {
        self.workouts = self.store.load();
        info!(count = self.workouts.len(), "Loaded stored workouts");
        if let Some(map) = self.map.as_mut() {
            for workout in &self.workouts {
                map.add_marker(workout, self.config.popup);
            }
        }
    }

    /// A click on the map picks the workout location and opens the form.
    /// Clicking again before submitting replaces the location.
    /// # Errors
    /// - `AppError::MapNotReady` without a map.
    /// - `AppError::Workout` for coordinates outside the globe.
    pub fn click_map(&mut self, coords: Coords) -> Result<(), AppError> {
        let map = self.map.as_mut().ok_or(AppError::MapNotReady)?;
        if !coords.is_valid() {
            return Err(WorkoutError::InvalidCoords(coords).into());
        }
        map.close_popups_on_click();
        debug!(%coords, "Map clicked");
        self.pending_click = Some(coords);
        self.form.show();
        Ok(())
    }

    pub fn toggle_workout_type(&mut self) {
        self.form.toggle_type();
    }

    /// Turns the form into a workout: validate, build, add to the list and the
    /// map, hide the form, then persist the whole list.
    /// # Errors
    /// - `AppError::NoLocationSelected` unless a map click opened the form.
    /// - `AppError::InvalidInput` on bad numbers; nothing is changed and the form stays open.
    /// - `AppError::Persist` if the store write fails; the workout is kept in memory.
    pub fn submit_workout(&mut self, now: DateTime<Utc>) -> Result<&Workout, AppError> {
        let coords = match self.pending_click {
            Some(coords) if self.form.is_visible() => coords,
            _ => return Err(AppError::NoLocationSelected),
        };
        let input = self.form.validate().map_err(|e| {
            warn!(error = %e, "Rejected workout form");
            e
        })?;

        let id = self.unique_id(now);
        let workout = match input {
            WorkoutInput::Running {
                distance,
                duration,
                cadence,
            } => Workout::running(id, now, coords, distance, duration, cadence)?,
            WorkoutInput::Cycling {
                distance,
                duration,
                elevation_gain,
            } => Workout::cycling(id, now, coords, distance, duration, elevation_gain)?,
        };
        info!(id = workout.id(), description = workout.description(), "Created workout");

        if let Some(map) = self.map.as_mut() {
            map.add_marker(&workout, self.config.popup);
        }
        self.workouts.push(workout);
        self.form.hide(Instant::now());
        self.pending_click = None;

        self.store.save(&self.workouts)?;
        Ok(&self.workouts[self.workouts.len() - 1])
    }

    /// Hides the form without creating anything.
    pub fn cancel_form(&mut self) {
        self.form.hide(Instant::now());
        self.pending_click = None;
    }

    /// Pans the map to the workout with `id`. Returns false when there is
    /// nothing to do (no id, unknown id, or no map).
    pub fn move_to_workout(&mut self, id: Option<&str>) -> bool {
        let Some(id) = id else {
            return false;
        };
        let Some(coords) = self.find_workout(id).map(Workout::coords) else {
            debug!(id, "No workout with this id");
            return false;
        };
        let Some(map) = self.map.as_mut() else {
            return false;
        };
        let pan = PanOptions::animated(Duration::from_millis(self.config.map.pan_duration_ms));
        map.set_view(coords, self.config.map.zoom_level, pan, Instant::now());
        true
    }

    /// Advances animations. Returns true while something is still moving.
    pub fn tick(&mut self, now: Instant) -> bool {
        let panning = self.map.as_mut().is_some_and(|map| map.tick(now));
        let collapsing = self.form.tick(now);
        panning || collapsing
    }

    pub fn zoom_in(&mut self) {
        if let Some(map) = self.map.as_mut() {
            map.zoom_in();
        }
    }

    pub fn zoom_out(&mut self) {
        if let Some(map) = self.map.as_mut() {
            map.zoom_out();
        }
    }

    /// Workouts in creation order.
    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    /// Workouts as the list shows them: latest first.
    pub fn workouts_newest_first(&self) -> impl Iterator<Item = &Workout> {
        self.workouts.iter().rev()
    }

    pub fn find_workout(&self, id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    pub const fn map(&self) -> Option<&MapView> {
        self.map.as_ref()
    }

    pub const fn form(&self) -> &WorkoutForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut WorkoutForm {
        &mut self.form
    }

    pub const fn pending_click(&self) -> Option<Coords> {
        self.pending_click
    }

    pub const fn location_error(&self) -> Option<&GeolocationError> {
        self.location_error.as_ref()
    }

    /// Derives an id from `now`, stepping forward a millisecond at a time
    /// until it does not clash with an existing workout.
    fn unique_id(&self, now: DateTime<Utc>) -> String {
        let mut stamp = now;
        loop {
            let id = workout::id_from_timestamp(stamp);
            if self.find_workout(&id).is_none() {
                return id;
            }
            stamp += ChronoDuration::milliseconds(1);
        }
    }
}
