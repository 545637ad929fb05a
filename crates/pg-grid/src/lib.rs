//! # pg-grid
//!
//! Multi-dimensional parton distribution grids: build subgrids over up
//! to five axes (A, alpha_s, kT, x, Q²), seal them into members and
//! collections, persist everything as one compressed container, and
//! query interpolated values back out, eagerly or through a
//! bounded-memory lazy iterator.
//!
//! ## Example
//!
//! ```no_run
//! use pg_grid::{GridCollection, GridMemberBuilder, PdfMember};
//! use pg_core::MetaData;
//!
//! let mut member = GridMemberBuilder::new();
//! member.add_subgrid_collinear(
//!     vec![1.0],
//!     vec![0.118],
//!     vec![0.01, 0.1, 0.5],
//!     vec![2.0, 10.0],
//!     (1..=18).map(|i| i as f64 / 10.0).collect(),
//! ).unwrap();
//! member.set_flavors(&[21, 1, 2]).unwrap();
//!
//! let mut collection = GridCollection::new();
//! collection.push(member.finish().unwrap());
//!
//! let meta = MetaData { num_members: 1, ..MetaData::default() };
//! collection.compress(&meta, "set.pgrid").unwrap();
//!
//! let pdf = PdfMember::load("set.pgrid", 0).unwrap();
//! let xf = pdf.xfx_q2(1, 0.1, 10.0).unwrap();
//! assert_eq!(xf, 1.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod alphas;
mod axes;
pub mod collection;
mod format;
mod interp;
pub mod member;
pub mod query;
pub mod rbuffer;
pub mod reader;
pub mod subgrid;
pub mod wbuffer;
mod writer;

pub use collection::GridCollection;
pub use member::{GridMember, GridMemberBuilder};
pub use query::{set_force_positive_all, PdfMember};
pub use reader::{read_metadata, LazyMemberIter};
pub use subgrid::SubGrid;

pub use pg_core::{
    AxisKind, Error, ForcePositive, InterpolatorType, MetaData, ParamRange, PhysicsParameters,
    Result, SetType,
};
