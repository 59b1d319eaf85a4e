//! Web-Mercator quadkey tiles for discovery locations.

use crate::error::Result;
use crate::error::TileError;
use serde::Deserialize;
use serde::Serialize;
use std::f64::consts::PI;

pub const MAX_ZOOM: usize = 30;
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// Geographic bounding box in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BBox {
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    pub fn contains_point(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}

/// Quadkey of the tile at `zoom` containing the given point.
pub fn encode_point(lat: f64, lon: f64, zoom: usize) -> Result<String> {
    if zoom > MAX_ZOOM {
        return Err(TileError::OutOfRange(format!(
            "zoom {zoom} exceeds {MAX_ZOOM}"
        )));
    }
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(TileError::OutOfRange(format!(
            "({lat}, {lon}) is not a valid coordinate"
        )));
    }
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let x = (lon + 180.0) / 360.0;
    let sin_lat = lat.to_radians().sin();
    let y = 0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * PI);

    let map_size = 1_u64 << zoom;
    let tile_x = to_tile(x, map_size);
    let tile_y = to_tile(y, map_size);

    let mut quadkey = String::with_capacity(zoom);
    for level in (1..=zoom).rev() {
        let mask = 1_u64 << (level - 1);
        let mut digit = b'0';
        if tile_x & mask != 0 {
            digit += 1;
        }
        if tile_y & mask != 0 {
            digit += 2;
        }
        quadkey.push(char::from(digit));
    }
    Ok(quadkey)
}

fn to_tile(fraction: f64, map_size: u64) -> u64 {
    let max = map_size.saturating_sub(1) as f64;
    (fraction * map_size as f64).floor().clamp(0.0, max) as u64
}

/// Bounding box covered by a quadkey.
pub fn decode(quadkey: &str) -> Result<BBox> {
    let quadkey = quadkey.trim();
    if quadkey.len() > MAX_ZOOM {
        return Err(TileError::InvalidPath(format!(
            "'{quadkey}' is deeper than zoom {MAX_ZOOM}"
        )));
    }
    let mut tile_x = 0_u64;
    let mut tile_y = 0_u64;
    for ch in quadkey.chars() {
        let bits = match ch {
            '0' => 0,
            '1' => 1,
            '2' => 2,
            '3' => 3,
            other => {
                return Err(TileError::InvalidPath(format!(
                    "'{quadkey}' contains '{other}'"
                )));
            }
        };
        tile_x = (tile_x << 1) | (bits & 1);
        tile_y = (tile_y << 1) | (bits >> 1);
    }
    let n = (1_u64 << quadkey.len()) as f64;
    Ok(BBox {
        min_lat: tile_lat(tile_y as f64 + 1.0, n),
        max_lat: tile_lat(tile_y as f64, n),
        min_lon: tile_x as f64 / n * 360.0 - 180.0,
        max_lon: (tile_x as f64 + 1.0) / n * 360.0 - 180.0,
    })
}

fn tile_lat(y: f64, n: f64) -> f64 {
    (PI * (1.0 - 2.0 * y / n)).sinh().atan().to_degrees()
}
