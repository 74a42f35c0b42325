//! Trip map rendering
//!
//! A map is two markers joined by one straight polyline, centered on the
//! pickup. It renders either to GeoJSON or to a standalone Leaflet page.

use serde::Serialize;
use serde_json::{Value, json};

use crate::models::GeoPoint;

pub const DEFAULT_ZOOM: u8 = 12;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub point: GeoPoint,
    pub tooltip: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPolyline {
    pub points: Vec<GeoPoint>,
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
}

/// Everything needed to draw the trip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: GeoPoint,
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
    pub polyline: MapPolyline,
    /// Straight-line distance between the two markers
    pub distance_km: f64,
}

impl MapView {
    #[must_use]
    pub fn for_trip(pickup: GeoPoint, dropoff: GeoPoint, zoom: u8) -> Self {
        Self {
            center: pickup,
            zoom,
            markers: vec![
                MapMarker {
                    point: pickup,
                    tooltip: "Pickup Location".to_string(),
                    color: "green".to_string(),
                },
                MapMarker {
                    point: dropoff,
                    tooltip: "Dropoff Location".to_string(),
                    color: "red".to_string(),
                },
            ],
            polyline: MapPolyline {
                points: vec![pickup, dropoff],
                color: "blue".to_string(),
                weight: 2.5,
                opacity: 1.0,
            },
            distance_km: pickup.distance_km(&dropoff),
        }
    }

    /// GeoJSON `FeatureCollection`; note GeoJSON orders positions `[lon, lat]`
    #[must_use]
    pub fn to_geojson(&self) -> Value {
        let position = |p: &GeoPoint| json!([p.longitude, p.latitude]);

        let mut features: Vec<Value> = self
            .markers
            .iter()
            .map(|marker| {
                json!({
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": position(&marker.point)},
                    "properties": {"tooltip": marker.tooltip, "marker-color": marker.color},
                })
            })
            .collect();

        features.push(json!({
            "type": "Feature",
            "geometry": {
                "type": "LineString",
                "coordinates": self.polyline.points.iter().map(position).collect::<Vec<_>>(),
            },
            "properties": {
                "stroke": self.polyline.color,
                "stroke-width": self.polyline.weight,
                "stroke-opacity": self.polyline.opacity,
                "distance_km": self.distance_km,
            },
        }));

        json!({"type": "FeatureCollection", "features": features})
    }

    /// Self-contained HTML page drawing the map with Leaflet
    #[must_use]
    pub fn to_html(&self) -> String {
        let markers: String = self
            .markers
            .iter()
            .map(|m| {
                format!(
                    "L.circleMarker([{}, {}], {{radius: 9, color: '{}', fillOpacity: 0.9}}).bindTooltip('{}').addTo(map);\n",
                    m.point.latitude, m.point.longitude, m.color, m.tooltip
                )
            })
            .collect();
        let line: Vec<String> = self
            .polyline
            .points
            .iter()
            .map(|p| format!("[{}, {}]", p.latitude, p.longitude))
            .collect();

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Trip map ({distance:.2} km)</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map('map').setView([{lat}, {lon}], {zoom});
L.tileLayer('https://tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{attribution: '&copy; OpenStreetMap contributors'}}).addTo(map);
{markers}L.polyline([{line}], {{color: '{color}', weight: {weight}, opacity: {opacity}}}).addTo(map);
</script>
</body>
</html>
"#,
            distance = self.distance_km,
            lat = self.center.latitude,
            lon = self.center.longitude,
            zoom = self.zoom,
            markers = markers,
            line = line.join(", "),
            color = self.polyline.color,
            weight = self.polyline.weight,
            opacity = self.polyline.opacity,
        )
    }
}
