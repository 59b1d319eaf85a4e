//! # Strata Tiles
//!
//! Fixed-alphabet hierarchical tile paths used both as query terms and as
//! facet aggregation keys.
//!
//! - [`chrono`]: bounded before-present intervals encoded by recursive
//!   bisection, with an optional magnitude prefix (`10m-0123...`).
//! - [`geo`]: Web-Mercator quadkeys for discovery locations.
//! - [`aggregate`]: truncation helpers that turn raw tile counts into
//!   coarser buckets.
//!
//! ```
//! let path = strata_tiles::chrono::encode(5_000, 4_000, "").unwrap();
//! let bounds = strata_tiles::chrono::decode(&path).unwrap();
//! assert_eq!((bounds.earliest, bounds.latest), (5_000, 4_000));
//! ```

pub mod aggregate;
pub mod chrono;
mod error;
pub mod geo;

pub use chrono::TileBounds;
pub use error::Result;
pub use error::TileError;
pub use geo::BBox;
