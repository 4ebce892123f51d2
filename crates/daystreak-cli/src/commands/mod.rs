pub mod checkin;
pub mod config;
pub mod stats;
pub mod streak;
