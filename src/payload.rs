//! The JSON shape handed to presentation layers.
//!
//! ```json
//! {"status": "success", "file_info": "...", "activity_info": "...",
//!  "map": {"status": "success", "outbound": [[lat, lon]], "return": [], ...},
//!  "stats": {...}, "samples": [...]}
//! {"status": "error", "message": "..."}
//! ```

use crate::pipeline::ProcessingResult;
use crate::stats::RouteStats;
use crate::{LatLon, RouteGeometry, Sample, TcxError};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Payload<'a> {
    Success {
        file_info: &'a str,
        activity_info: &'a str,
        map: MapPayload<'a>,
        stats: &'a RouteStats,
        samples: &'a [Sample],
    },
    Error {
        message: &'a str,
    },
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MapPayload<'a> {
    Success {
        outbound: &'a [LatLon],
        #[serde(rename = "return")]
        return_leg: &'a [LatLon],
        start: LatLon,
        midpoint: LatLon,
        end: LatLon,
    },
    Error {
        message: String,
    },
}

impl<'a> From<&'a Result<RouteGeometry, TcxError>> for MapPayload<'a> {
    fn from(geometry: &'a Result<RouteGeometry, TcxError>) -> Self {
        match geometry {
            Ok(geometry) => MapPayload::Success {
                outbound: geometry.outbound(),
                return_leg: geometry.return_leg(),
                start: geometry.start(),
                midpoint: geometry.midpoint(),
                end: geometry.end(),
            },
            Err(e) => MapPayload::Error {
                message: e.to_string(),
            },
        }
    }
}

impl<'a> From<&'a ProcessingResult> for Payload<'a> {
    fn from(result: &'a ProcessingResult) -> Self {
        match result {
            ProcessingResult::Success(processed) => Payload::Success {
                file_info: &processed.file_info,
                activity_info: &processed.activity_text,
                map: MapPayload::from(&processed.geometry),
                stats: &processed.stats,
                samples: &processed.samples,
            },
            ProcessingResult::Failure { message, .. } => Payload::Error { message },
        }
    }
}
