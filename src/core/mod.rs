//! Core module - process-level infrastructure
//!
//! - [`settings`] - `SessionSettings` persisted as JSON in the user's config dir
//! - [`logging`] - `tracing` subscriber setup
//! - [`error`] - `CoreError` / `CoreResult`

pub mod error;
pub mod logging;
pub mod settings;

pub use error::{CoreError, CoreResult};
pub use logging::init_tracing;
pub use settings::SessionSettings;
