use crate::{LatLon, RouteGeometry, Sample};
use geojson::{Feature, FeatureCollection, Geometry, Value};
use std::error::Error;
use std::io::Write;
use time::format_description::well_known::Rfc3339;

const OUTBOUND_COLOR: &str = "blue";
const RETURN_COLOR: &str = "red";
const DIRECTION_MARKER: &str = ">";

/// GeoJSON positions are `[longitude, latitude]`.
fn position((lat, lon): LatLon) -> Vec<f64> {
    vec![lon, lat]
}

fn leg(role: &str, color: &str, points: &[LatLon]) -> Option<Feature> {
    // A LineString needs two or more positions.
    if points.len() < 2 {
        return None;
    }

    let coordinates = points.iter().copied().map(position).collect();
    let mut feature = Feature::from(Geometry::new(Value::LineString(coordinates)));
    feature.set_property("role", role);
    feature.set_property("color", color);
    feature.set_property("direction_marker", DIRECTION_MARKER);
    Some(feature)
}

fn marker(role: &str, popup: &str, color: &str, point: LatLon) -> Feature {
    let mut feature = Feature::from(Geometry::new(Value::Point(position(point))));
    feature.set_property("role", role);
    feature.set_property("popup", popup);
    feature.set_property("color", color);
    feature
}

/// Builds the map layer for a route: the outbound and return legs as
/// LineStrings (omitted when shorter than two points) followed by start,
/// midpoint and end markers.
pub fn map_feature_collection(geometry: &RouteGeometry) -> FeatureCollection {
    let legs = [
        leg("outbound", OUTBOUND_COLOR, geometry.outbound()),
        leg("return", RETURN_COLOR, geometry.return_leg()),
    ];
    let markers = [
        marker("start", "Start/End", "green", geometry.start()),
        marker("midpoint", "Midpoint", "orange", geometry.midpoint()),
        marker("end", "End", "red", geometry.end()),
    ];

    legs.into_iter().flatten().chain(markers).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartSeries {
    HeartRateElevation,
    Position,
}

fn cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Writes one CSV row per sample: the time followed by the two series
/// columns. Unrecorded values are left empty.
pub fn write_chart_csv<W: Write>(
    samples: &[Sample],
    series: ChartSeries,
    output: W,
) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_writer(output);

    match series {
        ChartSeries::HeartRateElevation => {
            writer.write_record(["time", "heart_rate", "elevation"])?
        }
        ChartSeries::Position => writer.write_record(["time", "latitude", "longitude"])?,
    }

    for sample in samples {
        let time = sample.time.format(&Rfc3339)?;
        let (first, second) = match series {
            ChartSeries::HeartRateElevation => (cell(sample.heart_rate), cell(sample.elevation)),
            ChartSeries::Position => (cell(sample.latitude), cell(sample.longitude)),
        };
        writer.write_record([time, first, second])?;
    }

    writer.flush()?;
    Ok(())
}
