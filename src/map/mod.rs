mod geometry;
mod projection;
mod renderer;
mod spatial;

pub use projection::{Viewport, CONUS_LOWER_LEFT, CONUS_UPPER_RIGHT};
pub use renderer::{DisplaySettings, LineString, Lod, LodLayer, MapLayers, MapRenderer, Marker};
pub use spatial::SpatialGrid;
