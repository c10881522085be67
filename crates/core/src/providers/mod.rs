pub mod registry;
pub mod traits;

// Collaborator implementations
pub mod exchange_rate;
pub mod gemini;
pub mod kite;
pub mod spreadsheet;
