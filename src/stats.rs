use crate::Sample;
use serde::Serialize;
use time::OffsetDateTime;

/// Great circle distance in meters between two coordinates, using the
/// haversine formula on a spherical Earth.
///
/// References:
/// - https://en.wikipedia.org/wiki/Haversine_formula
/// - https://www.movable-type.co.uk/scripts/latlong.html
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS: f64 = 6371000.0; // Mean Earth radius in meters

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    // a = sin²(Δφ/2) + cos φ1 ⋅ cos φ2 ⋅ sin²(Δλ/2)
    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS * c
}

/// Summary figures for an extracted sample sequence.
///
/// Times come from the first and last samples in document order. Heart rate
/// and elevation aggregates only look at samples that record them and are
/// `None` when none do.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStats {
    pub sample_count: usize,
    pub positioned_count: usize,
    #[serde(with = "time::serde::rfc3339::option")]
    pub start_time: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub end_time: Option<OffsetDateTime>,
    pub duration_seconds: Option<f64>,
    pub distance_meters: f64,
    pub avg_heart_rate: Option<f64>,
    pub max_heart_rate: Option<u16>,
    pub min_elevation: Option<f64>,
    pub max_elevation: Option<f64>,
    pub elevation_gain: Option<f64>,
}

impl RouteStats {
    pub fn from_samples(samples: &[Sample]) -> Self {
        let positions: Vec<_> = samples.iter().filter_map(Sample::position).collect();
        let distance_meters: f64 = positions
            .windows(2)
            .map(|pair| haversine_distance(pair[0].0, pair[0].1, pair[1].0, pair[1].1))
            .sum();

        let start_time = samples.first().map(|s| s.time);
        let end_time = samples.last().map(|s| s.time);
        let duration_seconds = start_time
            .zip(end_time)
            .map(|(start, end)| (end - start).as_seconds_f64());

        let heart_rates: Vec<u16> = samples.iter().filter_map(|s| s.heart_rate).collect();
        let avg_heart_rate = (!heart_rates.is_empty()).then(|| {
            heart_rates.iter().map(|&hr| f64::from(hr)).sum::<f64>() / heart_rates.len() as f64
        });

        let elevations: Vec<f64> = samples.iter().filter_map(|s| s.elevation).collect();
        let elevation_gain = (!elevations.is_empty()).then(|| {
            elevations
                .windows(2)
                .map(|pair| (pair[1] - pair[0]).max(0.0))
                .sum::<f64>()
        });

        RouteStats {
            sample_count: samples.len(),
            positioned_count: positions.len(),
            start_time,
            end_time,
            duration_seconds,
            distance_meters,
            avg_heart_rate,
            max_heart_rate: heart_rates.iter().copied().max(),
            min_elevation: elevations.iter().copied().reduce(f64::min),
            max_elevation: elevations.iter().copied().reduce(f64::max),
            elevation_gain,
        }
    }
}
