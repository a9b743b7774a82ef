//! IO adapters at the host boundary.
//!
//! - `geojson` - GeoJSON FeatureCollection import/export for patch sets
//! - `wkt` - WKT encoding for the persistence contract
//! - `color` - stable display colours for patches

mod color;
mod geojson;
mod wkt;

pub use color::{patch_color, Rgb};
pub use geojson::{read_patches_from_geojson_bytes, write_patches_to_geojson_bytes};
pub use wkt::multipolygon_to_wkt;
