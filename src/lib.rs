pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod flow;
pub mod matcher;
pub mod orchestrator;
pub mod snapshot;
pub mod stage;
pub mod trace;

pub use config::catalog::Catalog;
pub use config::loader::EngineSettings;
pub use error::EngineError;
pub use orchestrator::engine::{ContextOrchestrator, DetectionMode, HostEvent};
pub use orchestrator::presenter::Presenter;
