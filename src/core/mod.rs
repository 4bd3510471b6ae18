pub mod atoms;
pub mod config;
pub mod dataset;
pub mod ingestion;
pub mod paths;
pub mod residue_groups;
pub mod search;

pub use config::Config;
