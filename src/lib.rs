// Library surface for the binary and for headless integration tests.
pub mod app_dirs;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod history;
pub mod mission;
pub mod report;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod time_series;
pub mod timer;
pub mod ui;
pub mod word_generator;

pub use engine::{EngineEvent, Outcome, SessionEngine, SessionSummary};
pub use error::{Error, Result};
pub use session::{Mode, SessionConfig, Status};
