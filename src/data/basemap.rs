use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use geojson::{GeoJson, Geometry, Value};
use tracing::{debug, warn};

use crate::map::{LineString, Lod, MapRenderer};

const COASTLINE_FILES: [(&str, Lod); 3] = [
    ("ne_110m_coastline.json", Lod::Low),
    ("ne_50m_coastline.json", Lod::Medium),
    ("ne_10m_coastline.json", Lod::High),
];

const BORDER_FILES: [(&str, Lod); 3] = [
    ("ne_110m_borders.json", Lod::Low),
    ("ne_50m_borders.json", Lod::Medium),
    ("ne_10m_borders.json", Lod::High),
];

const STATE_FILES: [(&str, Lod); 3] = [
    ("ne_110m_states.json", Lod::Low),
    ("ne_50m_states.json", Lod::Medium),
    ("ne_10m_states.json", Lod::High),
];

/// Load all available Natural Earth GeoJSON outlines into the map renderer
pub fn load_basemap(renderer: &mut MapRenderer, data_dir: &Path) {
    for (filename, lod) in COASTLINE_FILES {
        load_layer(data_dir, filename, |line| renderer.add_coastline(line, lod));
    }
    for (filename, lod) in BORDER_FILES {
        load_layer(data_dir, filename, |line| renderer.add_border(line, lod));
    }
    for (filename, lod) in STATE_FILES {
        load_layer(data_dir, filename, |line| renderer.add_state(line, lod));
    }
}

fn load_layer<F>(data_dir: &Path, filename: &str, add_line: F)
where
    F: FnMut(LineString),
{
    let path = data_dir.join(filename);
    if !path.exists() {
        debug!(file = filename, "Basemap file not present");
        return;
    }
    if let Err(e) = read_geojson(&path).map(|geojson| process_geojson_lines(&geojson, add_line)) {
        warn!(file = filename, error = %e, "Failed to load basemap layer");
    }
}

fn read_geojson(path: &Path) -> Result<GeoJson> {
    let mut bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    simd_json::serde::from_slice(&mut bytes).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Walk GeoJSON and hand every line or polygon ring to `add_line`
fn process_geojson_lines<F>(geojson: &GeoJson, mut add_line: F)
where
    F: FnMut(LineString),
{
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                if let Some(ref geometry) = feature.geometry {
                    process_geometry_lines(geometry, &mut add_line);
                }
            }
        }
        GeoJson::Feature(f) => {
            if let Some(ref geometry) = f.geometry {
                process_geometry_lines(geometry, &mut add_line);
            }
        }
        GeoJson::Geometry(geometry) => {
            process_geometry_lines(geometry, &mut add_line);
        }
    }
}

fn to_line(coords: &[Vec<f64>]) -> LineString {
    coords.iter().filter(|c| c.len() >= 2).map(|c| (c[0], c[1])).collect()
}

fn process_geometry_lines<F>(geometry: &Geometry, add_line: &mut F)
where
    F: FnMut(LineString),
{
    match &geometry.value {
        Value::LineString(coords) => add_line(to_line(coords)),
        Value::MultiLineString(lines) => {
            for coords in lines {
                add_line(to_line(coords));
            }
        }
        // State polygons contribute every ring so lakes and islands keep their outline
        Value::Polygon(rings) => {
            for ring in rings {
                add_line(to_line(ring));
            }
        }
        Value::MultiPolygon(polygons) => {
            for ring in polygons.iter().flatten() {
                add_line(to_line(ring));
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                process_geometry_lines(g, add_line);
            }
        }
        _ => {}
    }
}

/// Crude outline of the contiguous US, used when no GeoJSON is available
pub fn generate_simple_us(renderer: &mut MapRenderer) {
    // Pacific coast, Gulf, Atlantic coast
    renderer.add_coastline(
        vec![
            (-124.7, 48.4), (-124.1, 46.2), (-124.0, 43.0), (-124.4, 40.4),
            (-122.5, 37.8), (-120.6, 34.6), (-118.4, 34.0), (-117.1, 32.5),
        ],
        Lod::Low,
    );
    renderer.add_coastline(
        vec![
            (-97.1, 25.9), (-97.4, 27.8), (-94.8, 29.3), (-93.8, 29.7),
            (-91.0, 29.2), (-89.4, 29.0), (-89.6, 30.2), (-88.0, 30.7),
            (-85.0, 29.7), (-84.0, 30.0), (-82.8, 27.9), (-81.8, 26.1),
            (-80.9, 25.2), (-80.1, 25.8), (-80.0, 26.7), (-81.2, 29.5),
            (-81.4, 30.7), (-80.9, 32.0), (-79.0, 33.6), (-77.0, 34.6),
            (-75.5, 35.2), (-75.9, 36.9), (-75.1, 38.8), (-74.0, 40.5),
            (-72.0, 41.1), (-70.0, 41.7), (-70.6, 42.6), (-70.2, 43.7),
            (-67.0, 44.8),
        ],
        Lod::Low,
    );

    // Canadian and Mexican borders
    renderer.add_border(
        vec![
            (-123.3, 49.0), (-95.2, 49.0), (-94.8, 49.3), (-89.6, 48.0),
            (-84.4, 46.5), (-82.4, 43.0), (-79.0, 43.3), (-76.8, 43.6),
            (-74.7, 45.0), (-71.5, 45.0), (-70.0, 46.7), (-67.8, 47.1),
            (-67.0, 44.8),
        ],
        Lod::Low,
    );
    renderer.add_border(
        vec![
            (-117.1, 32.5), (-114.7, 32.7), (-111.1, 31.3), (-108.2, 31.3),
            (-106.5, 31.8), (-104.5, 29.6), (-103.1, 29.0), (-101.4, 29.8),
            (-99.5, 27.5), (-97.1, 25.9),
        ],
        Lod::Low,
    );
}
