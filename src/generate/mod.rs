//! Text generation seam: request building, response extraction, job tracking and auto-heal.

pub mod extract;
pub mod heal;
pub mod queue;
pub mod service;
