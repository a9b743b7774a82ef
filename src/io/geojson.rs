use anyhow::{anyhow, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{json, Map, Value};

use crate::types::{Patch, PatchSet};

/// Read patches from a GeoJSON FeatureCollection.
///
/// `Polygon` features are normalised to MultiPolygon at ingress. The patch
/// id comes from the feature `id` (or an `id` property); `code` and `name`
/// come from the properties, with the id standing in for a missing code.
pub fn read_patches_from_geojson_bytes(bytes: &[u8]) -> Result<PatchSet> {
    let value: Value = serde_json::from_slice(bytes).context("Failed to parse GeoJSON bytes")?;
    let features = value["features"]
        .as_array()
        .ok_or_else(|| anyhow!("GeoJSON has no features array"))?;

    let mut patches = Vec::new();
    for (idx, feature) in features.iter().enumerate() {
        let geometry = &feature["geometry"];
        let coords = geometry["coordinates"]
            .as_array()
            .ok_or_else(|| anyhow!("Feature {idx} has no coordinates"))?;
        let multipolygon = match geometry["type"].as_str() {
            Some("MultiPolygon") => parse_multipolygon_coords(coords)
                .with_context(|| format!("Feature {idx}"))?,
            Some("Polygon") => {
                MultiPolygon(vec![parse_polygon_coords(coords).with_context(|| format!("Feature {idx}"))?])
            }
            other => {
                return Err(anyhow!("Feature {idx} has unsupported geometry type {other:?}"));
            }
        };

        let properties = &feature["properties"];
        let id = feature["id"]
            .as_str()
            .or_else(|| properties["id"].as_str())
            .map(str::to_string)
            .unwrap_or_else(|| idx.to_string());
        let code = properties["code"].as_str().unwrap_or(&id).to_string();

        let mut patch = Patch::new(id, code, multipolygon);
        if let Some(name) = properties["name"].as_str() {
            patch = patch.with_name(name);
        }
        patches.push(patch);
    }
    Ok(PatchSet::from_patches(patches))
}

/// Write patches as a GeoJSON FeatureCollection, rings in closed form.
pub fn write_patches_to_geojson_bytes(patches: &PatchSet) -> Result<Vec<u8>> {
    let features: Vec<Value> = patches
        .iter()
        .map(|patch| {
            let mut properties = Map::new();
            properties.insert("code".to_string(), json!(patch.code));
            if let Some(name) = &patch.name {
                properties.insert("name".to_string(), json!(name));
            }
            json!({
                "type": "Feature",
                "id": patch.id,
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": multipolygon_coords(&patch.geometry),
                },
                "properties": properties,
            })
        })
        .collect();

    let collection = json!({
        "type": "FeatureCollection",
        "features": features,
    });
    serde_json::to_vec(&collection).context("Failed to serialize GeoJSON")
}

fn multipolygon_coords(geom: &MultiPolygon<f64>) -> Vec<Vec<Vec<Vec<f64>>>> {
    geom.0
        .iter()
        .map(|poly| {
            std::iter::once(poly.exterior())
                .chain(poly.interiors().iter())
                .map(|ring| {
                    crate::ring::ensure_closed(&ring.0)
                        .iter()
                        .map(|c| vec![c.x, c.y])
                        .collect()
                })
                .collect()
        })
        .collect()
}

fn parse_multipolygon_coords(coords: &[Value]) -> Result<MultiPolygon<f64>> {
    let mut polygons = Vec::new();
    for polygon in coords {
        let rings = polygon
            .as_array()
            .ok_or_else(|| anyhow!("Invalid MultiPolygon: polygon is not an array"))?;
        polygons.push(parse_polygon_coords(rings)?);
    }
    Ok(MultiPolygon(polygons))
}

fn parse_polygon_coords(rings: &[Value]) -> Result<Polygon<f64>> {
    let mut iter = rings.iter();
    let exterior = iter
        .next()
        .and_then(|v| v.as_array())
        .ok_or_else(|| anyhow!("Invalid Polygon: missing exterior ring"))?;
    let exterior = parse_ring_coords(exterior)?;
    let interiors = iter
        .map(|ring| {
            ring.as_array()
                .ok_or_else(|| anyhow!("Invalid Polygon: interior ring is not an array"))
                .and_then(|r| parse_ring_coords(r))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn parse_ring_coords(coords: &[Value]) -> Result<LineString<f64>> {
    let mut points = Vec::with_capacity(coords.len());
    for pair in coords {
        let pair = pair
            .as_array()
            .ok_or_else(|| anyhow!("Invalid coordinate: not an array"))?;
        let x = pair
            .first()
            .and_then(Value::as_f64)
            .ok_or_else(|| anyhow!("Invalid coordinate: lon must be a number"))?;
        let y = pair
            .get(1)
            .and_then(Value::as_f64)
            .ok_or_else(|| anyhow!("Invalid coordinate: lat must be a number"))?;
        points.push(Coord { x, y });
    }
    // ensure closed
    if !points.is_empty() && points[0] != points[points.len() - 1] {
        points.push(points[0]);
    }
    Ok(LineString(points))
}
