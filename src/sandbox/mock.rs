//! Recording mock runtime for tests

use std::cell::RefCell;
use std::path::Path;

use super::{ContainerId, ContainerRuntime, ExecOutput, LaunchSpec, RunSpec};
use crate::error::{ExpctrError, Result};

/// In-memory runtime that records every call and never touches docker
#[derive(Debug, Default)]
pub struct MockRuntime {
    calls: RefCell<Vec<String>>,
    launched: RefCell<usize>,
    fail_launch: bool,
    fail_stop: bool,
    fail_pull: bool,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_launch(mut self) -> Self {
        self.fail_launch = true;
        self
    }

    pub fn fail_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    pub fn fail_pull(mut self) -> Self {
        self.fail_pull = true;
        self
    }

    /// All recorded calls, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl ContainerRuntime for MockRuntime {
    fn launch(&self, spec: &LaunchSpec) -> Result<ContainerId> {
        self.record(format!("launch {} {}", spec.image, spec.name));
        if self.fail_launch {
            return Err(ExpctrError::Launch("mock launch failure".to_string()));
        }
        let mut launched = self.launched.borrow_mut();
        *launched += 1;
        Ok(ContainerId(format!("cnt-{}", launched)))
    }

    fn exec_captured(&self, id: &ContainerId, argv: &[String]) -> Result<ExecOutput> {
        self.record(format!("exec {} {}", id, argv.join(" ")));
        Ok(ExecOutput {
            stdout: String::new(),
            exit_code: 0,
        })
    }

    fn run_interactive(&self, spec: &RunSpec) -> Result<i32> {
        self.record(format!("run {} from {}", spec.image, spec.volumes_from));
        Ok(0)
    }

    fn stop(&self, id: &ContainerId) -> Result<()> {
        self.record(format!("stop {}", id));
        if self.fail_stop {
            return Err(ExpctrError::Runtime("mock stop failure".to_string()));
        }
        Ok(())
    }

    fn logs(&self, id: &ContainerId) -> Result<String> {
        self.record(format!("logs {}", id));
        Ok("mock logs\n".to_string())
    }

    fn copy_to(&self, host: &Path, id: &ContainerId, dest: &str) -> Result<()> {
        self.record(format!("copy_to {} {}:{}", host.display(), id, dest));
        Ok(())
    }

    fn copy_from(&self, id: &ContainerId, src: &str, host: &Path) -> Result<()> {
        self.record(format!("copy_from {}:{} {}", id, src, host.display()));
        Ok(())
    }

    fn commit(&self, id: &ContainerId, tag: &str) -> Result<String> {
        self.record(format!("commit {} {}", id, tag));
        Ok(format!("sha256:mock-{}\n", tag))
    }

    fn pull(&self, image: &str) -> Result<()> {
        self.record(format!("pull {}", image));
        if self.fail_pull {
            return Err(ExpctrError::Runtime("mock pull failure".to_string()));
        }
        Ok(())
    }

    fn tag(&self, src: &str, dst: &str) -> Result<()> {
        self.record(format!("tag {} {}", src, dst));
        Ok(())
    }
}
