//! Implied volatility surface pipeline
//!
//! - builder: moneyness/day-count derivation, filtering, grid assembly
//! - interp: scattered linear interpolation (Delaunay barycentric)

pub mod builder;
pub mod interp;

pub use builder::*;
pub use interp::*;
