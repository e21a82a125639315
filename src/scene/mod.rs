//! Scene documents.

pub mod model;
