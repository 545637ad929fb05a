//! Error taxonomy for partongrid.
//!
//! Three groups, all sharing one closed enum so a single result code
//! crosses every boundary: validation errors (raised before any partial
//! mutation commits), I/O and container errors (always surfaced, never
//! swallowed), and per-query errors (which leave the handle valid).

use thiserror::Error;

use crate::types::AxisKind;

/// partongrid error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Value buffer length incompatible with the subgrid shape.
    #[error("value buffer of length {actual} does not fit the subgrid shape (expected {expected})")]
    ShapeMismatch {
        /// Expected buffer length, or the knot-point product the buffer
        /// must be a multiple of when the flavor count is not yet known.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// An axis was given no coordinates.
    #[error("axis {axis} has no coordinates")]
    EmptyAxis {
        /// Offending axis.
        axis: AxisKind,
    },

    /// Axis coordinates are not strictly ascending.
    #[error("axis {axis} coordinates must be strictly ascending and duplicate-free")]
    NonMonotonicAxis {
        /// Offending axis.
        axis: AxisKind,
    },

    /// A flavor id appears more than once.
    #[error("duplicate flavor id {pid}")]
    DuplicateFlavor {
        /// Repeated PDG id.
        pid: i32,
    },

    /// The flavor list is empty.
    #[error("flavor list must not be empty")]
    EmptyFlavors,

    /// A member was finalized without any subgrids.
    #[error("member has no subgrids")]
    EmptyMember,

    /// A collection was compressed without any members.
    #[error("collection has no members")]
    EmptyCollection,

    /// An operation was called in the wrong builder state.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// Metadata member count disagrees with the collection being written.
    #[error("metadata declares {declared} members but the collection holds {actual}")]
    MemberCountMismatch {
        /// `num_members` from the metadata header.
        declared: u32,
        /// Members actually accumulated.
        actual: usize,
    },

    /// A coordinate vector of the wrong dimensionality was supplied.
    #[error("expected {expected} coordinates, got {actual}")]
    CoordinateDimension {
        /// Required number of coordinates.
        expected: usize,
        /// Number supplied.
        actual: usize,
    },

    /// A member or subgrid index addressed past the end.
    #[error("index {index} out of bounds (size {count})")]
    IndexOutOfBounds {
        /// Requested index.
        index: usize,
        /// Number of addressable elements.
        count: usize,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata JSON error.
    #[error("metadata error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file is not a recognized container, or its payload is
    /// truncated or malformed.
    #[error("corrupt container: {0}")]
    Corrupt(String),

    /// The requested pid is not tabulated in this member.
    #[error("unknown pid {pid}")]
    UnknownPid {
        /// Requested PDG id.
        pid: i32,
    },

    /// A query coordinate falls outside every subgrid's coverage.
    #[error("{axis} = {value} outside tabulated range [{min}, {max}]")]
    OutOfRange {
        /// Axis the coordinate belongs to.
        axis: AxisKind,
        /// Offending coordinate.
        value: f64,
        /// Smallest tabulated coordinate.
        min: f64,
        /// Largest tabulated coordinate.
        max: f64,
    },
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
