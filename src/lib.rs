pub mod error;
pub mod export;
pub mod fields;
pub mod payload;
pub mod pipeline;
pub mod route;
pub mod stats;
pub mod tcx;
pub mod xmltree;

use serde::Serialize;
use time::OffsetDateTime;

pub use error::TcxError;
pub use pipeline::{
    Processed, ProcessingResult, Session, SessionState, Stage, process, process_with,
};
pub use route::{LatLon, RouteGeometry};
pub use stats::RouteStats;
pub use tcx::{ActivityInfo, ActivitySummary, ExtractOptions, PositionPolicy};

/// Namespace of the Training Center Database v2 schema. Elements in any
/// other namespace are not recognised.
pub const TCX_NAMESPACE: &str = "http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2";

/// One recorded instant along an activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub heart_rate: Option<u16>,
    pub elevation: Option<f64>,
}

impl Sample {
    /// Returns the `(latitude, longitude)` pair when both are recorded.
    pub fn position(&self) -> Option<LatLon> {
        Some((self.latitude?, self.longitude?))
    }
}
