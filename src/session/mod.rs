//! Experiment session state machine
//!
//! A [`Session`] tracks one participant's progression through one resolved
//! group; the [`SessionManager`] owns at most one active session together
//! with its sandbox container.

mod manager;
mod state;

pub use manager::SessionManager;
pub use state::{Session, SessionState};
