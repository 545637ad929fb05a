//! # pg-core
//!
//! Shared foundation for the partongrid workspace: the error taxonomy,
//! the set metadata schema, and the small cross-boundary value types
//! (axis kinds, parameter ranges, clipping policies).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod metadata;
pub mod types;

pub use error::{Error, Result};
pub use metadata::{InterpolatorType, MetaData, PhysicsParameters, SetType};
pub use types::{AxisKind, ForcePositive, ParamRange};
