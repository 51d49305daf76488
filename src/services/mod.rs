pub mod entries;
pub mod stats;
pub mod streak;
