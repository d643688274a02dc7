pub mod collector;
pub mod snapshot_model;
