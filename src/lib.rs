//! taraq: Taraxa account balance lookup with a terminal UI and a small CLI

pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod export;
pub mod infrastructure;
pub mod store;
pub mod ui;
