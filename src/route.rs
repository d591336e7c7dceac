use crate::{Sample, TcxError};

/// A `(latitude, longitude)` pair in degrees.
pub type LatLon = (f64, f64);

/// The coordinate-bearing part of a track, split in two at its midpoint.
///
/// The split is by point count, not by time or distance: the outbound leg
/// holds the first `floor(n / 2)` points and the return leg the rest. A
/// geometry always has at least one point.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteGeometry {
    points: Vec<LatLon>,
    midpoint_index: usize,
}

impl RouteGeometry {
    pub fn from_samples(samples: &[Sample]) -> Result<Self, TcxError> {
        Self::from_points(samples.iter().filter_map(Sample::position).collect())
    }

    pub fn from_points(points: Vec<LatLon>) -> Result<Self, TcxError> {
        if points.is_empty() {
            return Err(TcxError::NoGeometry);
        }

        let midpoint_index = points.len() / 2;
        Ok(RouteGeometry {
            points,
            midpoint_index,
        })
    }

    pub fn points(&self) -> &[LatLon] {
        &self.points
    }

    pub fn midpoint_index(&self) -> usize {
        self.midpoint_index
    }

    pub fn outbound(&self) -> &[LatLon] {
        &self.points[..self.midpoint_index]
    }

    pub fn return_leg(&self) -> &[LatLon] {
        &self.points[self.midpoint_index..]
    }

    pub fn start(&self) -> LatLon {
        self.points[0]
    }

    pub fn midpoint(&self) -> LatLon {
        self.points[self.midpoint_index]
    }

    pub fn end(&self) -> LatLon {
        self.points[self.points.len() - 1]
    }
}
