//! Bytes in, [`ProcessingResult`] out.
//!
//! Parsing and trackpoint extraction are hard failure points that end the
//! run with a stage-tagged [`ProcessingResult::Failure`]. Route
//! segmentation and the activity summary run independently of each other
//! afterwards; a document without coordinates still succeeds, with the
//! geometry outcome carrying [`TcxError::NoGeometry`].

use crate::stats::RouteStats;
use crate::tcx::{self, ActivityInfo, ExtractOptions};
use crate::xmltree::Document;
use crate::{RouteGeometry, Sample, TcxError};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Parse,
    Trackpoints,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Processed {
    pub file_info: String,
    pub activity: ActivityInfo,
    pub activity_text: String,
    pub geometry: Result<RouteGeometry, TcxError>,
    pub stats: RouteStats,
    pub samples: Vec<Sample>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingResult {
    Success(Processed),
    Failure { stage: Stage, message: String },
}

impl ProcessingResult {
    fn failure(stage: Stage, message: String) -> Self {
        warn!(?stage, %message, "processing failed");
        ProcessingResult::Failure { stage, message }
    }
}

pub fn process(content: &[u8]) -> ProcessingResult {
    process_with(content, &ExtractOptions::default())
}

pub fn process_with(content: &[u8], options: &ExtractOptions) -> ProcessingResult {
    debug!(bytes = content.len(), "processing upload");

    let document = match Document::parse(content) {
        Ok(document) => document,
        Err(e) => {
            return ProcessingResult::failure(Stage::Parse, format!("Error parsing file: {e}"));
        }
    };

    let samples = match tcx::extract_samples(&document, options) {
        Ok(samples) => samples,
        Err(e) => {
            return ProcessingResult::failure(
                Stage::Trackpoints,
                format!("Error processing trackpoints: {e}"),
            );
        }
    };

    let geometry = RouteGeometry::from_samples(&samples);
    if let Err(e) = &geometry {
        warn!(error = %e, "route geometry unavailable");
    }
    let activity = tcx::extract_activity(&document);
    let stats = RouteStats::from_samples(&samples);

    info!(
        samples = samples.len(),
        positioned = stats.positioned_count,
        "processed document"
    );

    ProcessingResult::Success(Processed {
        file_info: format!("Processed {} trackpoints.", samples.len()),
        activity_text: activity.display_text(),
        activity,
        geometry,
        stats,
        samples,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    ParseFailed,
    ExtractFailed,
    Extracted,
}

/// Holds the result of the latest upload.
///
/// Every upload runs the full pipeline and swaps in the new result as a
/// whole. Snapshots handed out earlier stay valid and unchanged.
#[derive(Debug, Default)]
pub struct Session {
    options: ExtractOptions,
    current: Option<Arc<ProcessingResult>>,
}

impl Session {
    pub fn new(options: ExtractOptions) -> Self {
        Session {
            options,
            current: None,
        }
    }

    pub fn upload(&mut self, content: &[u8]) -> Arc<ProcessingResult> {
        let result = Arc::new(process_with(content, &self.options));
        self.current = Some(Arc::clone(&result));
        result
    }

    pub fn current(&self) -> Option<Arc<ProcessingResult>> {
        self.current.clone()
    }

    pub fn state(&self) -> SessionState {
        match self.current.as_deref() {
            None => SessionState::Empty,
            Some(ProcessingResult::Failure {
                stage: Stage::Parse,
                ..
            }) => SessionState::ParseFailed,
            Some(ProcessingResult::Failure {
                stage: Stage::Trackpoints,
                ..
            }) => SessionState::ExtractFailed,
            Some(ProcessingResult::Success(_)) => SessionState::Extracted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TCX_NAMESPACE;

    fn tcx_with_points(points: &[(f64, f64)]) -> String {
        let trackpoints: String = points
            .iter()
            .enumerate()
            .map(|(i, (lat, lon))| {
                format!(
                    "<Trackpoint><Time>2023-01-01T10:00:{i:02}Z</Time>\
                     <Position><LatitudeDegrees>{lat}</LatitudeDegrees>\
                     <LongitudeDegrees>{lon}</LongitudeDegrees></Position></Trackpoint>"
                )
            })
            .collect();
        format!(
            r#"<TrainingCenterDatabase xmlns="{TCX_NAMESPACE}"><Activities><Activity Sport="Running"><Id>run-1</Id><Lap><Track>{trackpoints}</Track></Lap></Activity></Activities></TrainingCenterDatabase>"#
        )
    }

    fn success(result: ProcessingResult) -> Processed {
        match result {
            ProcessingResult::Success(processed) => processed,
            other => panic!("Expected success, got {other:?}"),
        }
    }

    #[test]
    fn test_square_route_end_to_end() {
        let xml = tcx_with_points(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        let processed = success(process(xml.as_bytes()));

        assert_eq!(processed.samples.len(), 4);
        assert_eq!(processed.file_info, "Processed 4 trackpoints.");
        assert_eq!(processed.activity_text, "Sport: Running, Activity ID: run-1");

        let geometry = processed.geometry.unwrap();
        assert_eq!(geometry.midpoint_index(), 2);
        assert_eq!(geometry.outbound(), &[(0.0, 0.0), (0.0, 1.0)]);
        assert_eq!(geometry.return_leg(), &[(1.0, 1.0), (1.0, 0.0)]);
        assert_eq!(geometry.start(), (0.0, 0.0));
        assert_eq!(geometry.midpoint(), (1.0, 1.0));
        assert_eq!(geometry.end(), (1.0, 0.0));
    }

    #[test]
    fn test_plain_text_fails_at_parse_stage() {
        match process(b"hello, this is not a training file") {
            ProcessingResult::Failure { stage, message } => {
                assert_eq!(stage, Stage::Parse);
                assert!(message.starts_with("Error parsing file: "), "{message}");
            }
            other => panic!("Expected parse failure, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_time_fails_at_trackpoint_stage() {
        let xml = tcx_with_points(&[(0.0, 0.0), (1.0, 1.0)])
            .replace("2023-01-01T10:00:01Z", "not-a-date");

        match process(xml.as_bytes()) {
            ProcessingResult::Failure { stage, message } => {
                assert_eq!(stage, Stage::Trackpoints);
                assert!(message.starts_with("Error processing trackpoints: "));
                assert!(message.contains("not-a-date"));
            }
            other => panic!("Expected trackpoint failure, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_activity_still_succeeds() {
        let xml = format!(
            r#"<TrainingCenterDatabase xmlns="{TCX_NAMESPACE}"><Courses><Course><Track>
<Trackpoint><Time>2023-01-01T10:00:00Z</Time><Position><LatitudeDegrees>1</LatitudeDegrees><LongitudeDegrees>2</LongitudeDegrees></Position></Trackpoint>
</Track></Course></Courses></TrainingCenterDatabase>"#
        );

        let processed = success(process(xml.as_bytes()));
        assert_eq!(processed.samples.len(), 1);
        assert_eq!(processed.activity, ActivityInfo::Missing);
        assert_eq!(processed.activity_text, "No activity found.");
        assert!(processed.geometry.is_ok());
    }

    #[test]
    fn test_no_coordinates_only_fails_the_map() {
        let xml = format!(
            r#"<TrainingCenterDatabase xmlns="{TCX_NAMESPACE}"><Activities><Activity Sport="Other"><Lap><Track>
<Trackpoint><Time>2023-01-01T10:00:00Z</Time><Position/><HeartRateBpm><Value>90</Value></HeartRateBpm></Trackpoint>
</Track></Lap></Activity></Activities></TrainingCenterDatabase>"#
        );

        let processed = success(process(xml.as_bytes()));
        assert_eq!(processed.samples.len(), 1);
        assert_eq!(processed.geometry, Err(TcxError::NoGeometry));
        assert_eq!(processed.activity_text, "Sport: Other, Activity ID: Unknown");
        assert_eq!(processed.stats.max_heart_rate, Some(90));
    }

    #[test]
    fn test_foreign_namespace_is_an_empty_success() {
        let xml = tcx_with_points(&[(0.0, 0.0)]).replace("/v2", "/v1");

        let processed = success(process(xml.as_bytes()));
        assert!(processed.samples.is_empty());
        assert_eq!(processed.file_info, "Processed 0 trackpoints.");
        assert_eq!(processed.geometry, Err(TcxError::NoGeometry));
    }

    #[test]
    fn test_deeply_nested_upload_fails_at_parse_stage() {
        let depth = 200_000;
        let xml = format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth));

        match process(xml.as_bytes()) {
            ProcessingResult::Failure { stage, message } => {
                assert_eq!(stage, Stage::Parse);
                assert!(message.contains("nested too deeply"), "{message}");
            }
            other => panic!("Expected parse failure, got {other:?}"),
        }
    }

    #[test]
    fn test_processing_is_deterministic() {
        let xml = tcx_with_points(&[(0.5, 0.5), (0.6, 0.4), (0.7, 0.3)]);
        assert_eq!(process(xml.as_bytes()), process(xml.as_bytes()));
        assert_eq!(process(b"<broken"), process(b"<broken"));
    }

    #[test]
    fn test_session_replaces_results() {
        let mut session = Session::default();
        assert_eq!(session.state(), SessionState::Empty);
        assert!(session.current().is_none());

        let first = session.upload(tcx_with_points(&[(0.0, 0.0)]).as_bytes());
        assert_eq!(session.state(), SessionState::Extracted);

        session.upload(b"not xml");
        assert_eq!(session.state(), SessionState::ParseFailed);
        assert!(
            matches!(first.as_ref(), ProcessingResult::Success(_)),
            "earlier snapshots are unaffected"
        );

        let bad_time = tcx_with_points(&[(0.0, 0.0)]).replace("2023-01-01T10:00:00Z", "soon");
        let latest = session.upload(bad_time.as_bytes());
        assert_eq!(session.state(), SessionState::ExtractFailed);
        assert!(Arc::ptr_eq(&latest, &session.current().unwrap()));
    }

    #[test]
    fn test_session_applies_options() {
        let xml = format!(
            r#"<TrainingCenterDatabase xmlns="{TCX_NAMESPACE}"><Activities><Activity><Lap><Track>
<Trackpoint><Time>2023-01-01T10:00:00Z</Time></Trackpoint>
</Track></Lap></Activity></Activities></TrainingCenterDatabase>"#
        );

        let mut session = Session::new(ExtractOptions {
            position_policy: tcx::PositionPolicy::KeepUnpositioned,
        });
        match session.upload(xml.as_bytes()).as_ref() {
            ProcessingResult::Success(processed) => assert_eq!(processed.samples.len(), 1),
            other => panic!("Expected success, got {other:?}"),
        }
        assert_eq!(success(process(xml.as_bytes())).samples.len(), 0);
    }
}
