use thiserror::Error;

/// Failures raised while turning TCX bytes into route data.
///
/// Absent optional fields, a missing `Activity` node and documents in a
/// foreign namespace are not errors; they show up as `None`,
/// [`ActivityInfo::Missing`](crate::ActivityInfo::Missing) and an empty
/// sample list respectively.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TcxError {
    /// The input is not well-formed XML.
    #[error("{message} (at byte {position})")]
    Parse { position: u64, message: String },

    /// A field node is present but its text cannot be read as the expected type.
    #[error("malformed {field} value {value:?}: {reason}")]
    MalformedField {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// None of the samples carry both coordinates.
    #[error("No data available for map.")]
    NoGeometry,
}

impl TcxError {
    pub(crate) fn parse(position: u64, message: impl Into<String>) -> Self {
        TcxError::Parse {
            position,
            message: message.into(),
        }
    }
}
