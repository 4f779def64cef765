//! Composable type descriptors.
//!
//! A descriptor is a small tree of primitive, array and object rules that knows
//! how to check a runtime value and how to describe itself for diagnostics.

mod builder;
mod descriptor;

pub use builder::*;
pub use descriptor::*;
