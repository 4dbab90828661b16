//! Application service layer - pipeline, config, scanning, reports, export

pub mod app;
pub mod config;
pub mod constants;
pub mod export;
pub mod logging;
pub mod report;
pub mod scanner;
