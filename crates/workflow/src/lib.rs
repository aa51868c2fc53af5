//! Closed-loop driver for the event-sourcing kernel.
//!
//! A [`Coordinator`] dispatches a command, hands every event it publishes to
//! each registered policy, and dispatches the commands the policies emit, until
//! nothing is left to do:
//!
//! ```text
//! command ──► router ──► events ──► policies ──► commands ─┐
//!    ▲                                                     │
//!    └─────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod coordinator;
pub mod error;

pub use config::CoordinatorConfig;
pub use coordinator::Coordinator;
pub use error::{Result, WorkflowError};
