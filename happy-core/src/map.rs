//! Map widget model: positions, tile source and the click/marker projection
//!
//! The widget only has two jobs: turn a click into a coordinate and place a
//! marker at the stored coordinate. Everything here is plain math so the
//! terminal front end stays a thin renderer.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Default map center (Campinas region)
pub const DEFAULT_CENTER: Position = Position {
    latitude: -22.8506061,
    longitude: -47.2046423,
};

/// Default zoom level of the map widget
pub const DEFAULT_ZOOM: u8 = 15;

/// OpenStreetMap tile template
pub const DEFAULT_TILE_URL: &str = "https://a.tile.openstreetmap.org/{z}/{x}/{y}.png";

pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 18;

/// Web Mercator latitude limit
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<(f64, f64)> for Position {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Slippy-map tile coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

/// What the map widget is showing: center, zoom and tile source
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub center: Position,
    pub zoom: u8,
    pub tile_url: String,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            tile_url: DEFAULT_TILE_URL.to_string(),
        }
    }
}

impl MapView {
    pub fn new(center: Position, zoom: u8, tile_url: impl Into<String>) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            tile_url: tile_url.into(),
        }
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + 1).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1).max(MIN_ZOOM);
    }

    /// Move the center by `(d_lat, d_lon)` degrees. Latitude stops at the
    /// projection limit, longitude wraps around the antimeridian.
    pub fn pan(&mut self, d_lat: f64, d_lon: f64) {
        let latitude = (self.center.latitude + d_lat).clamp(-MAX_LATITUDE, MAX_LATITUDE);
        let longitude = (self.center.longitude + d_lon + 180.0).rem_euclid(360.0) - 180.0;
        self.center = Position::new(latitude, longitude);
    }

    /// Tile containing `position` at the current zoom
    pub fn tile_for(&self, position: Position) -> TileCoord {
        let n = 2f64.powi(i32::from(self.zoom));
        let max = n as u32 - 1;

        let x = ((position.longitude + 180.0) / 360.0 * n).floor();
        let lat_rad = position.latitude.to_radians();
        let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n).floor();

        TileCoord {
            z: self.zoom,
            x: (x.max(0.0) as u32).min(max),
            y: (y.max(0.0) as u32).min(max),
        }
    }

    /// Tile URL for `position`, filled from the template
    pub fn tile_url_for(&self, position: Position) -> String {
        let tile = self.tile_for(position);
        self.tile_url
            .replace("{z}", &tile.z.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }

    /// Tile URL at the view center
    pub fn center_tile_url(&self) -> String {
        self.tile_url_for(self.center)
    }
}

/// Projection of a [`MapView`] onto a grid of terminal cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: Position,
    pub zoom: u8,
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(view: &MapView, width: u16, height: u16) -> Self {
        Self {
            center: view.center,
            zoom: view.zoom,
            width,
            height,
        }
    }

    /// Degrees of longitude across the grid (one tile's worth)
    pub fn lon_span(&self) -> f64 {
        360.0 / 2f64.powi(i32::from(self.zoom))
    }

    /// Degrees of latitude down the grid
    pub fn lat_span(&self) -> f64 {
        self.lon_span() * self.center.latitude.to_radians().cos().abs()
    }

    /// `([min_lon, max_lon], [min_lat, max_lat])`, the order canvas bounds use
    pub fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        let half_lon = self.lon_span() / 2.0;
        let half_lat = self.lat_span() / 2.0;
        (
            [
                self.center.longitude - half_lon,
                self.center.longitude + half_lon,
            ],
            [
                self.center.latitude - half_lat,
                self.center.latitude + half_lat,
            ],
        )
    }

    /// Coordinate under the center of cell `(col, row)`
    pub fn position_at(&self, col: u16, row: u16) -> Option<Position> {
        if col >= self.width || row >= self.height {
            return None;
        }
        let ([min_lon, _], [_, max_lat]) = self.bounds();
        let fx = (f64::from(col) + 0.5) / f64::from(self.width);
        let fy = (f64::from(row) + 0.5) / f64::from(self.height);

        Some(Position::new(
            max_lat - fy * self.lat_span(),
            min_lon + fx * self.lon_span(),
        ))
    }

    /// Degrees `(d_lat, d_lon)` covered by moving `d_col` columns right and
    /// `d_row` rows down
    pub fn cell_offset(&self, d_col: i32, d_row: i32) -> (f64, f64) {
        if self.width == 0 || self.height == 0 {
            return (0.0, 0.0);
        }
        (
            -f64::from(d_row) * self.lat_span() / f64::from(self.height),
            f64::from(d_col) * self.lon_span() / f64::from(self.width),
        )
    }

    /// Cell holding `position`, or `None` when it is outside the view
    pub fn cell_of(&self, position: Position) -> Option<(u16, u16)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let ([min_lon, _], [_, max_lat]) = self.bounds();
        let fx = (position.longitude - min_lon) / self.lon_span();
        let fy = (max_lat - position.latitude) / self.lat_span();

        if !(0.0..1.0).contains(&fx) || !(0.0..1.0).contains(&fy) {
            return None;
        }

        Some((
            (fx * f64::from(self.width)).floor() as u16,
            (fy * f64::from(self.height)).floor() as u16,
        ))
    }
}
