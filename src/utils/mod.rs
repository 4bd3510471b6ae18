pub mod files;
pub mod parallel;
pub mod progress;
