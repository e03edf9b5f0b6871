//! Docker implementation of the container runtime
//!
//! Thin process-invocation glue around the docker CLI. Every invocation is
//! logged at debug level and echoed to the terminal in dev mode.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, error};

use super::{ContainerId, ContainerRuntime, ExecOutput, LaunchSpec, RunSpec};
use crate::error::{ExpctrError, Result};

/// Container runtime backed by the local docker CLI
#[derive(Debug, Clone)]
pub struct Docker {
    /// Echo every docker command line to the terminal
    dev: bool,
}

impl Docker {
    pub fn new(dev: bool) -> Self {
        Self { dev }
    }

    /// Run `docker <args>` with captured output
    fn capture(&self, args: &[String]) -> Result<ExecOutput> {
        debug!(cmd = %format!("docker {}", args.join(" ")), "running docker command");
        if self.dev {
            println!("running command: docker {}", args.join(" "));
        }

        let output = Command::new("docker").args(args).output()?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let exit_code = output.status.code().unwrap_or(-1);
        debug!(exit_code, %stdout, %stderr, "docker command exited");

        if exit_code != 0 {
            error!(exit_code, %stderr, "docker command failed");
        }

        Ok(ExecOutput { stdout, exit_code })
    }

    /// Run `docker <args>` in the foreground with inherited stdio
    fn foreground(&self, args: &[String]) -> Result<i32> {
        debug!(cmd = %format!("docker {}", args.join(" ")), "running interactive docker command");
        if self.dev {
            println!("running command: docker {}", args.join(" "));
        }

        let status = Command::new("docker")
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        Ok(status.code().unwrap_or(-1))
    }
}

impl ContainerRuntime for Docker {
    fn launch(&self, spec: &LaunchSpec) -> Result<ContainerId> {
        let mut args = vec!["create".to_string(), "--name".to_string(), spec.name.clone()];
        for (host, container) in &spec.binds {
            args.push("-v".to_string());
            args.push(format!("{}:{}", host.display(), container));
        }
        for volume in &spec.volumes {
            args.push("-v".to_string());
            args.push(volume.clone());
        }
        for (key, value) in &spec.env {
            args.push("-e".to_string());
            args.push(format!("{}={}", key, value));
        }
        if spec.network_host {
            args.push("--net=host".to_string());
        }
        args.push(spec.image.clone());

        let out = self.capture(&args)?;
        if !out.success() {
            return Err(ExpctrError::Launch(format!(
                "docker create exited with {}",
                out.exit_code
            )));
        }
        let id = ContainerId(out.stdout.trim().to_string());
        debug!(container = %id, "created sandbox container");

        // best-effort: selinux labels can make bind-mounted xauth files
        // unreadable, so the files are copied in as well
        for (host, dest) in &spec.copy_in {
            let _ = self.capture(&[
                "cp".to_string(),
                host.display().to_string(),
                format!("{}:{}", id, dest),
            ]);
        }

        let out = self.capture(&["start".to_string(), id.0.clone()])?;
        if !out.success() {
            return Err(ExpctrError::Launch(format!(
                "docker start exited with {}",
                out.exit_code
            )));
        }

        Ok(id)
    }

    fn exec_captured(&self, id: &ContainerId, argv: &[String]) -> Result<ExecOutput> {
        let mut args = vec!["exec".to_string(), "-ti".to_string(), id.0.clone()];
        args.extend(argv.iter().cloned());
        self.capture(&args)
    }

    fn run_interactive(&self, spec: &RunSpec) -> Result<i32> {
        let mut args = vec![
            "run".to_string(),
            "-ti".to_string(),
            "--volumes-from".to_string(),
            spec.volumes_from.0.clone(),
        ];
        for (key, value) in &spec.env {
            args.push("-e".to_string());
            args.push(format!("{}={}", key, value));
        }
        args.push("-h".to_string());
        args.push(spec.hostname.clone());
        args.push(spec.image.clone());
        args.push(spec.command.clone());

        self.foreground(&args)
    }

    fn stop(&self, id: &ContainerId) -> Result<()> {
        let out = self.capture(&["kill".to_string(), id.0.clone()])?;
        if !out.success() {
            return Err(ExpctrError::Runtime(format!(
                "docker kill exited with {}",
                out.exit_code
            )));
        }
        Ok(())
    }

    fn logs(&self, id: &ContainerId) -> Result<String> {
        let out = self.capture(&["logs".to_string(), "-t".to_string(), id.0.clone()])?;
        if !out.success() {
            return Err(ExpctrError::Runtime(format!(
                "docker logs exited with {}",
                out.exit_code
            )));
        }
        Ok(out.stdout)
    }

    fn copy_to(&self, host: &Path, id: &ContainerId, dest: &str) -> Result<()> {
        let out = self.capture(&[
            "cp".to_string(),
            host.display().to_string(),
            format!("{}:{}", id, dest),
        ])?;
        if !out.success() {
            return Err(ExpctrError::Runtime(format!(
                "docker cp exited with {}",
                out.exit_code
            )));
        }
        Ok(())
    }

    fn copy_from(&self, id: &ContainerId, src: &str, host: &Path) -> Result<()> {
        let out = self.capture(&[
            "cp".to_string(),
            format!("{}:{}", id, src),
            host.display().to_string(),
        ])?;
        if !out.success() {
            return Err(ExpctrError::Runtime(format!(
                "docker cp exited with {}",
                out.exit_code
            )));
        }
        Ok(())
    }

    fn commit(&self, id: &ContainerId, tag: &str) -> Result<String> {
        let out = self.capture(&["commit".to_string(), id.0.clone(), tag.to_string()])?;
        if !out.success() {
            return Err(ExpctrError::Runtime(format!(
                "docker commit exited with {}",
                out.exit_code
            )));
        }
        Ok(out.stdout)
    }

    fn pull(&self, image: &str) -> Result<()> {
        let code = self.foreground(&["pull".to_string(), image.to_string()])?;
        if code != 0 {
            return Err(ExpctrError::Runtime(format!(
                "docker pull exited with {}",
                code
            )));
        }
        Ok(())
    }

    fn tag(&self, src: &str, dst: &str) -> Result<()> {
        let out = self.capture(&["tag".to_string(), src.to_string(), dst.to_string()])?;
        if !out.success() {
            return Err(ExpctrError::Runtime(format!(
                "docker tag exited with {}",
                out.exit_code
            )));
        }
        Ok(())
    }
}
