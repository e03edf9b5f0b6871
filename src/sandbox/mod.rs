//! Sandbox abstraction over the container runtime
//!
//! The core never talks to docker directly; it goes through the
//! [`ContainerRuntime`] trait so the session machinery can be exercised
//! without a container runtime on the box. [`Docker`] is the real
//! implementation, shelling out to the docker CLI.

pub mod docker;
pub mod images;

#[cfg(test)]
pub mod mock;

pub use docker::Docker;

use std::fmt;
use std::path::PathBuf;

use crate::error::Result;

/// Opaque container identifier returned by the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerId(pub String);

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything needed to bring up a long-lived sandbox container
#[derive(Debug, Clone, Default)]
pub struct LaunchSpec {
    /// Image reference
    pub image: String,
    /// Container name
    pub name: String,
    /// Host path -> container path bind mounts
    pub binds: Vec<(PathBuf, String)>,
    /// Anonymous volumes
    pub volumes: Vec<String>,
    /// Environment variables
    pub env: Vec<(String, String)>,
    /// Use the host network (X11 over ssh-forwarded displays)
    pub network_host: bool,
    /// Host files copied into the container between create and start
    pub copy_in: Vec<(PathBuf, String)>,
}

/// A foregrounded, interactive per-task container run
#[derive(Debug, Clone)]
pub struct RunSpec {
    /// Image reference
    pub image: String,
    /// Sandbox container whose volumes are shared
    pub volumes_from: ContainerId,
    /// Environment variables
    pub env: Vec<(String, String)>,
    /// Container hostname label
    pub hostname: String,
    /// Command run inside the container
    pub command: String,
}

/// Captured output of a non-interactive exec
#[derive(Debug, Clone)]
pub struct ExecOutput {
    pub stdout: String,
    pub exit_code: i32,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Operations the controller needs from the container runtime.
///
/// Exit codes are surfaced to the caller, never interpreted beyond
/// zero/non-zero.
pub trait ContainerRuntime {
    /// Create and start a sandbox container, returning its id
    fn launch(&self, spec: &LaunchSpec) -> Result<ContainerId>;

    /// Run a command inside a container with captured output
    fn exec_captured(&self, id: &ContainerId, argv: &[String]) -> Result<ExecOutput>;

    /// Run a task container in the foreground, inheriting the terminal;
    /// returns the exit code
    fn run_interactive(&self, spec: &RunSpec) -> Result<i32>;

    /// Kill a container
    fn stop(&self, id: &ContainerId) -> Result<()>;

    /// Collect a container's timestamped logs
    fn logs(&self, id: &ContainerId) -> Result<String>;

    /// Copy a host file into a container
    fn copy_to(&self, host: &std::path::Path, id: &ContainerId, dest: &str) -> Result<()>;

    /// Copy a container file to the host
    fn copy_from(&self, id: &ContainerId, src: &str, host: &std::path::Path) -> Result<()>;

    /// Commit a container to an image, returning the runtime's output
    fn commit(&self, id: &ContainerId, tag: &str) -> Result<String>;

    /// Pull an image, streaming progress to the terminal
    fn pull(&self, image: &str) -> Result<()>;

    /// Tag an image under a new name
    fn tag(&self, src: &str, dst: &str) -> Result<()>;
}
