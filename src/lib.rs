//! expctr - interactive controller for guided user-study experiments
//!
//! expctr walks an operator through an ordered list of containerized tasks:
//! it presents each task, waits for confirmation between steps, and shells
//! out to docker to start/stop/commit the per-participant sandbox. The core
//! is the session state machine (group resolution, linear advance, task-id
//! addressing, remaining-time reporting); everything around it is thin
//! process-invocation glue.
//!
//! # Example
//!
//! ```no_run
//! use expctr::catalog::builtin;
//! use expctr::{Docker, SessionManager};
//!
//! let (registry, groups) = builtin::catalog().build().unwrap();
//! let mut manager = SessionManager::new(Box::new(Docker::new(false)), false);
//! let session = manager.start_session(&registry, &groups, "g1", "alice").unwrap();
//! println!("{} tasks queued", session.len());
//! ```

pub mod catalog;
pub mod cli;
pub mod error;
pub mod registry;
pub mod repl;
pub mod sandbox;
pub mod session;
pub mod task;

pub use error::{ExpctrError, Result};
pub use registry::{GroupCatalog, TaskRegistry};
pub use repl::{run_repl, App};
pub use sandbox::{ContainerId, ContainerRuntime, Docker, LaunchSpec};
pub use session::{Session, SessionManager, SessionState};
pub use task::{Progress, Task, TaskKind};
