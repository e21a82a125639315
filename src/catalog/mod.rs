//! Component descriptors, the live registry, the built-in catalog and persistence.

pub mod builtin;
pub mod lint;
pub mod model;
pub mod registry;
pub mod store;
