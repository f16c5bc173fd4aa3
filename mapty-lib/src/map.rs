// mapty-lib/src/map.rs
//! Map surface state: centre, zoom, markers with popups, pan animation and
//! the projection between terminal cells and geographic coordinates.
use std::time::{Duration, Instant};

use crate::config::PopupConfig;
use crate::coords::Coords;
use crate::workout::{Workout, WorkoutType};

pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 18;

/// Slippy-map tile edge in pixels.
const TILE_SIZE: f64 = 256.0;
/// Nominal pixel size of one terminal cell.
pub const CELL_WIDTH_PX: f64 = 8.0;
pub const CELL_HEIGHT_PX: f64 = 16.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayer {
    pub url: String,
    pub attribution: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub content: String,
    pub class_name: &'static str,
    pub options: PopupConfig,
    pub open: bool,
}

impl Popup {
    /// Minimum and maximum popup width in terminal cells.
    pub fn width_cells(&self) -> (u16, u16) {
        let to_cells = |px: u16| (f64::from(px) / CELL_WIDTH_PX).round() as u16;
        let min = to_cells(self.options.min_width);
        (min, to_cells(self.options.max_width).max(min))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub workout_id: String,
    pub workout_type: WorkoutType,
    pub coords: Coords,
    pub popup: Popup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanOptions {
    pub animate: bool,
    pub duration: Duration,
}

impl PanOptions {
    pub const fn animated(duration: Duration) -> Self {
        Self {
            animate: true,
            duration,
        }
    }

    pub const fn instant() -> Self {
        Self {
            animate: false,
            duration: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PanAnimation {
    from: Coords,
    to: Coords,
    started: Instant,
    duration: Duration,
}

/// Size of the drawing area in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

/// Visible window in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl Bounds {
    pub fn contains(&self, coords: Coords) -> bool {
        (self.west..=self.east).contains(&coords.lng) && (self.south..=self.north).contains(&coords.lat)
    }
}

#[derive(Debug, Clone)]
pub struct MapView {
    center: Coords,
    zoom: u8,
    tile_layer: TileLayer,
    markers: Vec<Marker>,
    animation: Option<PanAnimation>,
}

impl MapView {
    pub fn new(center: Coords, zoom: u8, tile_layer: TileLayer) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            tile_layer,
            markers: Vec::new(),
            animation: None,
        }
    }

    pub const fn center(&self) -> Coords {
        self.center
    }

    pub const fn zoom(&self) -> u8 {
        self.zoom
    }

    pub const fn tile_layer(&self) -> &TileLayer {
        &self.tile_layer
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub const fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Target of the running pan, or the centre when idle.
    pub fn destination(&self) -> Coords {
        self.animation.map_or(self.center, |a| a.to)
    }

    /// Adds a marker with an opened popup for `workout`.
    pub fn add_marker(&mut self, workout: &Workout, options: PopupConfig) -> &Marker {
        if options.auto_close {
            for marker in &mut self.markers {
                marker.popup.open = false;
            }
        }
        let workout_type = workout.workout_type();
        self.markers.push(Marker {
            workout_id: workout.id().to_string(),
            workout_type,
            coords: workout.coords(),
            popup: Popup {
                content: format!("{} {}", workout_type.icon(), workout.description()),
                class_name: workout_type.popup_class(),
                options,
                open: true,
            },
        });
        &self.markers[self.markers.len() - 1]
    }

    /// Closes the popups that ask to be closed by a map click.
    pub fn close_popups_on_click(&mut self) {
        for marker in &mut self.markers {
            if marker.popup.options.close_on_click {
                marker.popup.open = false;
            }
        }
    }

    /// Re-centres on `target`, either at once or by a pan over `options.duration`.
    pub fn set_view(&mut self, target: Coords, zoom: u8, options: PanOptions, now: Instant) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        if options.animate && !options.duration.is_zero() {
            self.animation = Some(PanAnimation {
                from: self.center,
                to: target,
                started: now,
                duration: options.duration,
            });
        } else {
            self.animation = None;
            self.center = target;
        }
    }

    /// Advances the pan. Returns true while it is still running.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(anim) = self.animation else {
            return false;
        };
        let elapsed = now.saturating_duration_since(anim.started);
        let t = elapsed.as_secs_f64() / anim.duration.as_secs_f64();
        if t >= 1.0 {
            self.center = anim.to;
            self.animation = None;
            false
        } else {
            // Ease-out cubic.
            let eased = 1.0 - (1.0 - t).powi(3);
            self.center = anim.from.lerp(&anim.to, eased);
            true
        }
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + 1).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1).max(MIN_ZOOM);
    }

    pub fn degrees_per_pixel(&self) -> f64 {
        360.0 / (TILE_SIZE * 2f64.powi(i32::from(self.zoom)))
    }

    pub fn bounds(&self, viewport: Viewport) -> Bounds {
        let dpp = self.degrees_per_pixel();
        let half_lng = f64::from(viewport.width) * CELL_WIDTH_PX * dpp / 2.0;
        // Web-mercator shrinks latitude degrees per pixel away from the equator.
        let lat_scale = self.center.lat.to_radians().cos().max(0.01);
        let half_lat = f64::from(viewport.height) * CELL_HEIGHT_PX * dpp * lat_scale / 2.0;
        Bounds {
            west: self.center.lng - half_lng,
            east: self.center.lng + half_lng,
            south: (self.center.lat - half_lat).max(-90.0),
            north: (self.center.lat + half_lat).min(90.0),
        }
    }

    /// Geographic point under the cell at (`column`, `row`) of the viewport.
    pub fn coords_at(&self, viewport: Viewport, column: u16, row: u16) -> Coords {
        let bounds = self.bounds(viewport);
        let width = f64::from(viewport.width.max(1));
        let height = f64::from(viewport.height.max(1));
        let fx = (f64::from(column) + 0.5) / width;
        let fy = (f64::from(row) + 0.5) / height;
        let lng = bounds.west + fx * (bounds.east - bounds.west);
        let lat = bounds.north - fy * (bounds.north - bounds.south);
        Coords::new(lat.clamp(-90.0, 90.0), wrap_longitude(lng))
    }
}

fn wrap_longitude(lng: f64) -> f64 {
    if (-180.0..=180.0).contains(&lng) {
        lng
    } else {
        (lng + 180.0).rem_euclid(360.0) - 180.0
    }
}
