//! Interactive editing of one scene against a mutable catalog.

pub mod editor;

pub use editor::{ChatOutcome, EditorSession};
