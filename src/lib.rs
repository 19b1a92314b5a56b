//! Quran memorization tracker.
//!
//! The state document lives in a [`storage::StateStore`]; the
//! [`progress::ProgressEngine`] marks and unmarks ayahs and derives
//! statistics from it. [`content::QuranClient`] reads chapters and verses
//! from the remote content API, and [`sync::SyncAdapter`] mirrors local
//! changes to the signed-in user's remote document.

pub mod auth;
pub mod config;
pub mod content;
pub mod progress;
pub mod storage;
pub mod sync;

pub use config::AppConfig;
pub use progress::ProgressEngine;
