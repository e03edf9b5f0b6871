//! Session manager
//!
//! Owns at most one active [`Session`] plus the editor sandbox container it
//! runs against. Starting a session is atomic: if the sandbox launch fails,
//! no session is retained. Teardown is best-effort; a human operator is in
//! the loop to clean up manually.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::{ExpctrError, Result};
use crate::registry::{GroupCatalog, TaskRegistry};
use crate::sandbox::images::EDITOR_IMAGE;
use crate::sandbox::{ContainerId, ContainerRuntime, LaunchSpec};
use crate::session::Session;

/// Source mount point inside the editor container
const SRC_VOLUME: &str = "/home/user/src";

struct ActiveSession {
    session: Session,
    sandbox: ContainerId,
}

/// Lifecycle owner for the single active experiment
pub struct SessionManager {
    runtime: Box<dyn ContainerRuntime>,
    dev: bool,
    active: Option<ActiveSession>,
}

impl SessionManager {
    pub fn new(runtime: Box<dyn ContainerRuntime>, dev: bool) -> Self {
        Self {
            runtime,
            dev,
            active: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_session(&self) -> Option<&Session> {
        self.active.as_ref().map(|a| &a.session)
    }

    pub fn active_session_mut(&mut self) -> Option<&mut Session> {
        self.active.as_mut().map(|a| &mut a.session)
    }

    /// Sandbox container of the active session
    pub fn sandbox_id(&self) -> Option<&ContainerId> {
        self.active.as_ref().map(|a| &a.sandbox)
    }

    pub fn runtime(&self) -> &dyn ContainerRuntime {
        self.runtime.as_ref()
    }

    /// Resolve the group, launch the editor sandbox, and activate a fresh
    /// session. Create-or-nothing: a launch failure leaves no session
    /// behind.
    pub fn start_session(
        &mut self,
        registry: &TaskRegistry,
        catalog: &GroupCatalog,
        group: &str,
        participant: &str,
    ) -> Result<&Session> {
        if self.active.is_some() {
            return Err(ExpctrError::AlreadyRunning);
        }

        let tasks = catalog.resolve(group, registry)?;
        let spec = self.editor_launch_spec(group, participant);
        let sandbox = self.runtime.launch(&spec)?;

        info!(group, participant, sandbox = %sandbox, "start experiment");
        self.active = Some(ActiveSession {
            session: Session::new(group, participant, tasks),
            sandbox,
        });
        Ok(&self.active.as_ref().expect("just set").session)
    }

    /// Stop the sandbox and discard the session. Stop failures are logged
    /// and swallowed; after this returns there is no active session.
    pub fn end_session(&mut self) -> Result<()> {
        let active = self.active.take().ok_or(ExpctrError::NoActiveSession)?;

        info!(
            group = active.session.group_name(),
            participant = active.session.participant(),
            "stop experiment"
        );
        if let Err(e) = self.runtime.stop(&active.sandbox) {
            warn!(sandbox = %active.sandbox, error = %e, "failed stopping sandbox container");
        }
        Ok(())
    }

    /// Launch spec for the long-lived editor container: X11 access via the
    /// socket bind and (for ssh-forwarded displays) the xauth file, plus
    /// the participant's source volume.
    fn editor_launch_spec(&self, group: &str, participant: &str) -> LaunchSpec {
        let mut spec = LaunchSpec {
            image: EDITOR_IMAGE.to_string(),
            name: format!("exp_{}_{}", group, participant),
            binds: vec![(PathBuf::from("/tmp/.X11-unix"), "/tmp/.X11-unix".to_string())],
            env: vec![(
                "DISPLAY".to_string(),
                std::env::var("DISPLAY").unwrap_or_default(),
            )],
            network_host: true,
            ..LaunchSpec::default()
        };

        if let Ok(home) = std::env::var("HOME") {
            let xauth = PathBuf::from(home).join(".Xauthority");
            if xauth.is_file() {
                spec.binds.push((xauth.clone(), "/tmp/.xauth".to_string()));
                spec.copy_in
                    .push((xauth, "/home/user/.Xauthority".to_string()));
            }
        }

        if self.dev {
            let experiments = std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join("experiments");
            spec.binds.push((experiments, SRC_VOLUME.to_string()));
        } else {
            spec.volumes.push(SRC_VOLUME.to_string());
        }

        spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::mock::MockRuntime;
    use crate::session::SessionState;
    use crate::task::Task;

    fn fixtures() -> (TaskRegistry, GroupCatalog) {
        let mut registry = TaskRegistry::new();
        registry
            .register(Task::work("t1", "t1", "d", "img", "m", "s", Some(10)))
            .unwrap();
        registry
            .register(Task::work("t2", "t2", "d", "img", "m", "s", Some(20)))
            .unwrap();
        let mut catalog = GroupCatalog::new();
        catalog
            .register("g", vec!["t1".to_string(), "t2".to_string()], &registry)
            .unwrap();
        (registry, catalog)
    }

    fn manager(runtime: MockRuntime) -> SessionManager {
        SessionManager::new(Box::new(runtime), false)
    }

    #[test]
    fn test_start_session_launches_sandbox() {
        let (registry, catalog) = fixtures();
        let mut mgr = manager(MockRuntime::new());
        let session = mgr.start_session(&registry, &catalog, "g", "alice").unwrap();
        assert_eq!(session.state(), SessionState::NotStarted);
        assert_eq!(session.group_name(), "g");
        assert_eq!(session.participant(), "alice");
        assert!(mgr.is_running());
        assert!(mgr.sandbox_id().is_some());
    }

    #[test]
    fn test_start_session_while_running() {
        let (registry, catalog) = fixtures();
        let mut mgr = manager(MockRuntime::new());
        mgr.start_session(&registry, &catalog, "g", "alice").unwrap();
        mgr.active_session_mut().unwrap().advance();

        let result = mgr.start_session(&registry, &catalog, "g", "bob");
        assert!(matches!(result, Err(ExpctrError::AlreadyRunning)));
        // the existing session is untouched
        let session = mgr.active_session().unwrap();
        assert_eq!(session.participant(), "alice");
        assert_eq!(session.state(), SessionState::InProgress(0));
    }

    #[test]
    fn test_start_session_unknown_group() {
        let (registry, catalog) = fixtures();
        let mut mgr = manager(MockRuntime::new());
        let result = mgr.start_session(&registry, &catalog, "missing", "alice");
        assert!(matches!(result, Err(ExpctrError::UnknownGroup(name)) if name == "missing"));
        assert!(!mgr.is_running());
    }

    #[test]
    fn test_start_session_launch_failure_retains_nothing() {
        let (registry, catalog) = fixtures();
        let mut mgr = manager(MockRuntime::new().fail_launch());
        let result = mgr.start_session(&registry, &catalog, "g", "alice");
        assert!(matches!(result, Err(ExpctrError::Launch(_))));
        assert!(!mgr.is_running());
        assert!(mgr.active_session().is_none());
    }

    #[test]
    fn test_end_session_stops_sandbox() {
        let (registry, catalog) = fixtures();
        let runtime = MockRuntime::new();
        let mut mgr = SessionManager::new(Box::new(runtime), false);
        mgr.start_session(&registry, &catalog, "g", "alice").unwrap();
        let sandbox = mgr.sandbox_id().unwrap().clone();

        mgr.end_session().unwrap();
        assert!(!mgr.is_running());
        // the runtime was asked to stop the sandbox; downcast via a fresh
        // manager is not possible, so assert through a second start working
        mgr.start_session(&registry, &catalog, "g", "alice").unwrap();
        assert_ne!(mgr.sandbox_id().unwrap(), &sandbox);
    }

    #[test]
    fn test_end_session_without_active() {
        let mut mgr = manager(MockRuntime::new());
        let result = mgr.end_session();
        assert!(matches!(result, Err(ExpctrError::NoActiveSession)));
    }

    #[test]
    fn test_end_session_swallows_stop_failure() {
        let (registry, catalog) = fixtures();
        let mut mgr = manager(MockRuntime::new().fail_stop());
        mgr.start_session(&registry, &catalog, "g", "alice").unwrap();
        mgr.end_session().unwrap();
        assert!(!mgr.is_running());
    }

    #[test]
    fn test_editor_launch_spec_names_container_after_group_and_participant() {
        let mgr = manager(MockRuntime::new());
        let spec = mgr.editor_launch_spec("g1", "alice");
        assert_eq!(spec.name, "exp_g1_alice");
        assert_eq!(spec.image, EDITOR_IMAGE);
        assert!(spec.network_host);
        assert!(spec.volumes.contains(&SRC_VOLUME.to_string()));
    }
}
