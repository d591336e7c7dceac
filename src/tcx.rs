//! Typed accessors over the Training Center Database schema, and the
//! extractors that turn a parsed document into samples and activity metadata.

use crate::xmltree::{Document, Element};
use crate::{Sample, TCX_NAMESPACE, TcxError, fields};
use serde::Serialize;
use tracing::debug;

/// What to do with a `Trackpoint` that has a `Time` but no `Position`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PositionPolicy {
    /// Skip it.
    #[default]
    RequirePosition,
    /// Keep it with null coordinates.
    KeepUnpositioned,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    pub position_policy: PositionPolicy,
}

#[derive(Debug, Clone, Copy)]
pub struct TrackpointNode<'a>(&'a Element);

impl<'a> TrackpointNode<'a> {
    pub fn time(&self) -> Option<&'a Element> {
        self.0.child(TCX_NAMESPACE, "Time")
    }

    pub fn position(&self) -> Option<PositionNode<'a>> {
        self.0.child(TCX_NAMESPACE, "Position").map(PositionNode)
    }

    pub fn heart_rate(&self) -> Option<&'a Element> {
        self.0
            .child(TCX_NAMESPACE, "HeartRateBpm")?
            .child(TCX_NAMESPACE, "Value")
    }

    pub fn altitude(&self) -> Option<&'a Element> {
        self.0.child(TCX_NAMESPACE, "AltitudeMeters")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PositionNode<'a>(&'a Element);

impl<'a> PositionNode<'a> {
    pub fn latitude(&self) -> Option<&'a Element> {
        self.0.child(TCX_NAMESPACE, "LatitudeDegrees")
    }

    pub fn longitude(&self) -> Option<&'a Element> {
        self.0.child(TCX_NAMESPACE, "LongitudeDegrees")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ActivityNode<'a>(&'a Element);

impl<'a> ActivityNode<'a> {
    pub fn sport(&self) -> Option<&'a str> {
        self.0.attribute("Sport")
    }

    pub fn id(&self) -> Option<&'a str> {
        self.0.child(TCX_NAMESPACE, "Id").map(Element::text)
    }
}

pub fn trackpoints(document: &Document) -> impl Iterator<Item = TrackpointNode<'_>> {
    document
        .descendants(TCX_NAMESPACE, "Trackpoint")
        .map(TrackpointNode)
}

/// Extracts one [`Sample`] per usable `Trackpoint`, in document order.
///
/// Trackpoints without a `Time` are skipped, and so are those without a
/// `Position` unless the policy keeps them. A malformed value in any field
/// fails the whole document.
pub fn extract_samples(
    document: &Document,
    options: &ExtractOptions,
) -> Result<Vec<Sample>, TcxError> {
    let mut samples = Vec::new();
    let mut skipped = 0usize;

    for node in trackpoints(document) {
        let position = node.position();
        if position.is_none() && options.position_policy == PositionPolicy::RequirePosition {
            skipped += 1;
            continue;
        }

        let Some(time) = fields::timestamp("Time", node.time())? else {
            skipped += 1;
            continue;
        };

        samples.push(Sample {
            time,
            latitude: fields::float("LatitudeDegrees", position.and_then(|p| p.latitude()))?,
            longitude: fields::float("LongitudeDegrees", position.and_then(|p| p.longitude()))?,
            heart_rate: fields::integer("HeartRateBpm", node.heart_rate())?,
            elevation: fields::float("AltitudeMeters", node.altitude())?,
        });
    }

    debug!(samples = samples.len(), skipped, "extracted trackpoints");
    Ok(samples)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivitySummary {
    pub sport: Option<String>,
    pub activity_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityInfo {
    Found(ActivitySummary),
    Missing,
}

impl ActivityInfo {
    pub fn display_text(&self) -> String {
        match self {
            ActivityInfo::Found(summary) => format!(
                "Sport: {}, Activity ID: {}",
                summary.sport.as_deref().unwrap_or("Unknown"),
                summary.activity_id.as_deref().unwrap_or("Unknown"),
            ),
            ActivityInfo::Missing => "No activity found.".to_string(),
        }
    }
}

/// Reads sport and identifier from the first `Activity` in the document.
pub fn extract_activity(document: &Document) -> ActivityInfo {
    let Some(activity) = document
        .descendants(TCX_NAMESPACE, "Activity")
        .next()
        .map(ActivityNode)
    else {
        debug!("document has no Activity node");
        return ActivityInfo::Missing;
    };

    let non_empty = |value: Option<&str>| value.filter(|v| !v.trim().is_empty()).map(str::to_owned);
    ActivityInfo::Found(ActivitySummary {
        sport: non_empty(activity.sport()),
        activity_id: non_empty(activity.id()),
    })
}
