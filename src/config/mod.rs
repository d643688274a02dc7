pub mod catalog;
pub mod config_model;
pub mod loader;
