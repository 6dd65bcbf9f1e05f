pub mod config;
pub mod history;
pub mod punch;
pub mod review;
