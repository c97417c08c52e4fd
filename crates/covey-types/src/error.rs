//! Error types for parsing shared Covey types.

/// Errors produced when parsing a [`Locality`](crate::Locality) from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocalityError {
    /// The string did not have exactly three `/`-separated segments.
    #[error("locality must be name/region/unit, got {0:?}")]
    SegmentCount(String),

    /// One of the three segments was empty.
    #[error("locality has an empty segment: {0:?}")]
    EmptySegment(String),
}
