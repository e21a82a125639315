//! Scene composition into SVG.

pub mod blocks;
pub mod gauge;
pub mod layout;
pub mod object;
pub mod scene;
