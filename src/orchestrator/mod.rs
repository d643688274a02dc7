pub mod engine;
pub mod presenter;
pub mod timer;
