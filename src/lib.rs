pub mod api;
pub mod app;
pub mod controller;
pub mod utils;

#[cfg(feature = "gui")]
pub mod ui;
