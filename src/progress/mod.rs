//! Memorization progress tracking and statistics

pub mod engine;
pub mod models;
pub mod stats;

pub use engine::ProgressEngine;
pub use models::*;
