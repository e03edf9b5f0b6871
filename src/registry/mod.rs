//! Static experiment catalog
//!
//! The [`TaskRegistry`] and [`GroupCatalog`] are built once during the
//! registration phase at process start and never mutated afterwards.
//! Registration errors indicate a configuration bug and are fatal.

mod groups;
mod tasks;

pub use groups::GroupCatalog;
pub use tasks::TaskRegistry;
