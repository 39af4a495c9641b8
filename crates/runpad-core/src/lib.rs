//! # Runpad Core
//!
//! Editor session state and its persistence.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                    SessionController                       │
//! │  ┌───────────┐ ┌───────────┐ ┌──────────┐ ┌─────────────┐ │
//! │  │  Catalog  │ │   Theme   │ │ EventBus │ │  RunPolicy  │ │
//! │  └───────────┘ └───────────┘ └──────────┘ └─────────────┘ │
//! │         │                                        │         │
//! │  ┌──────┴────────────┐              ┌────────────┴──────┐ │
//! │  │  KeyValueStore    │              │  dyn Executor     │ │
//! │  │  editor-theme     │              │  (runpad-piston)  │ │
//! │  │  editor-code-{id} │              └───────────────────┘ │
//! │  └───────────────────┘                                     │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! The UI layer drives the controller and observes it through
//! [`SessionController::subscribe`]; nothing else mutates session state.

pub mod catalog;
pub mod config;
pub mod event;
pub mod session;
pub mod store;
pub mod theme;

pub use catalog::{Catalog, LanguageId, LanguageProfile};
pub use config::{Config, RunPolicy};
pub use event::{EventBus, EventHandler, SessionEvent};
pub use runpad_piston::{ExecutionOutcome, Executor, Runtime};
pub use session::{SessionController, SessionState};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use theme::Theme;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Config error: {0}")]
    Config(String),
}
