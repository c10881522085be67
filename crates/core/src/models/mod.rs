pub mod analysis;
pub mod analytics;
pub mod classification;
pub mod fx;
pub mod holding;
pub mod insight;
pub mod raw;
pub mod sector_table;
pub mod settings;
pub mod snapshot;
