pub mod account;
pub mod ayah;
pub mod page;
pub mod read;
pub mod reciters;
pub mod reset;
pub mod settings;
pub mod stats;
pub mod surahs;

/// Appended to content fetch failures
pub const RETRY_HINT: &str = "Check your connection and run the command again to retry";
