//! Remote chapter/verse/reciter content

mod client;
pub mod models;

pub use client::{ContentError, QuranClient, DEFAULT_BASE_URL, DEFAULT_PER_PAGE};
pub use models::*;
