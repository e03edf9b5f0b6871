//! Command dispatcher
//!
//! Maps operator input tokens onto session manager operations. Recoverable
//! errors (no session, task not found, experiment already running) are
//! printed and the shell keeps going; only `quit` ends the loop.

use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

use chrono::Local;
use regex::Regex;
use tracing::{debug, error, info, warn};

use crate::error::{ExpctrError, Result};
use crate::registry::{GroupCatalog, TaskRegistry};
use crate::repl::prompt;
use crate::sandbox::images::{self, DEFAULT_IMAGE_PREFIX};
use crate::sandbox::{ContainerId, ContainerRuntime};
use crate::session::SessionManager;

/// All operator commands, for dispatch and completion
pub const COMMANDS: &[&str] = &[
    "abort_experiment",
    "finished",
    "help",
    "new_experiment",
    "pull_images",
    "quit",
    "start",
    "start_task",
];

/// Everything the dispatcher operates on, wired together at startup
pub struct App {
    pub registry: TaskRegistry,
    pub catalog: GroupCatalog,
    pub manager: SessionManager,
}

/// What the REPL should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Continue,
    Quit,
}

/// Dispatch one input line
pub fn dispatch(line: &str, app: &mut App) -> Dispatch {
    let mut tokens = line.split_whitespace();
    let Some(cmd) = tokens.next() else {
        return Dispatch::Continue;
    };
    let args: Vec<&str> = tokens.collect();

    match cmd {
        "help" => print_help(),
        "quit" => {
            if app.manager.is_running() {
                println!("You have an experiment running, stop it first");
            } else {
                return Dispatch::Quit;
            }
        }
        "new_experiment" => new_experiment(app, &args),
        "start" => start(app, &args),
        "start_task" => start_task(app, &args),
        "finished" => finished(app),
        "abort_experiment" => abort_experiment(app),
        "pull_images" => pull_images(app, &args),
        _ => println!("unknown command '{}'", cmd),
    }
    Dispatch::Continue
}

/// Participant names end up in container and tarball names, so only
/// letters, numbers and underscores are allowed.
pub fn valid_participant(name: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("^[a-zA-Z0-9_]+$").expect("static regex"))
        .is_match(name)
}

fn new_experiment(app: &mut App, args: &[&str]) {
    if app.manager.is_running() {
        println!("experiment already running");
        return;
    }
    if args.len() != 2 {
        println!("error: new_experiment requires two parameter");
        println!("new_experiment: [group] [name]");
        return;
    }

    let group = args[0];
    let participant = args[1];

    if !valid_participant(participant) {
        info!(participant, "invalid participant name used");
        println!("error: name must not contain characters other than letters, numbers and _");
        return;
    }
    if !app.catalog.contains(group) {
        info!(group, "wrong group name used");
        println!("error: group {} not defined", group);
        return;
    }

    info!(group, participant, "starting new experiment");
    println!(
        "starting new experiment for user: {}, group: {}",
        participant, group
    );

    // local X clients must be allowed before the editor comes up
    allow_local_x();

    println!();
    println!("starting new editor container...");
    if let Err(e) = app
        .manager
        .start_session(&app.registry, &app.catalog, group, participant)
    {
        error!(error = %e, "could not start experiment editor container");
        println!("could not start editor container");
        println!("maybe you have to choose a different 'user name'");
    }
}

fn start(app: &mut App, args: &[&str]) {
    if !args.is_empty() {
        println!("start does not take arguments");
        return;
    }
    if !app.manager.is_running() {
        println!("no experiment environment started, use 'new_experiment' first");
        return;
    }
    let Some(editor) = app.manager.sandbox_id().cloned() else {
        return;
    };

    let mut task = match app.manager.active_session_mut() {
        Some(session) => {
            if let Some(current) = session.current() {
                info!("experiment already running, continuing with last task");
                println!("experiment already started, continuing with current task...");
                Some(current)
            } else {
                info!("starting with first task");
                session.advance()
            }
        }
        None => return,
    };

    while let Some(current) = task {
        info!(task = %current.id, "starting task");
        let progress = app
            .manager
            .active_session()
            .and_then(|s| s.progress())
            .unwrap_or_default();
        if let Err(e) = current.run(app.manager.runtime(), &editor, &progress) {
            error!(task = %current.id, error = %e, "task run failed");
            println!("error running task {}: {}", current.id, e);
        }
        task = app
            .manager
            .active_session_mut()
            .and_then(|s| s.advance());
    }

    println!();
    println!();
    println!(" Congratulations !!! you've done all your tasks ;)");
    println!(" Thank you for participating");
    println!();
    println!("if you want to redo a specific task use 'start_task' otherwise just type");
    println!();
    println!(" 'finished'");
}

fn start_task(app: &mut App, args: &[&str]) {
    if !app.manager.is_running() {
        error!("no experiment running");
        println!("no experiment running");
        return;
    }
    let Some(editor) = app.manager.sandbox_id().cloned() else {
        return;
    };

    let (task, progress) = {
        let Some(session) = app.manager.active_session_mut() else {
            return;
        };
        let task_ids = session.task_ids();
        if task_ids.is_empty() {
            error!(group = session.group_name(), "no task for group defined");
            println!("error no task for group {} defined", session.group_name());
            return;
        }

        // without arguments start with the first task
        let task_id = match args.first() {
            Some(id) => id.to_string(),
            None => {
                debug!("starting with first task");
                task_ids[0].clone()
            }
        };

        match session.jump_to(&task_id) {
            Ok(task) => {
                debug!(task = %task_id, "about to start task");
                let progress = session.progress().unwrap_or_default();
                (task, progress)
            }
            Err(ExpctrError::TaskNotFound(id)) => {
                error!(task = %id, group = session.group_name(), "task not defined for group");
                println!("task '{}' not defined for group {}", id, session.group_name());
                return;
            }
            Err(e) => {
                println!("error: {}", e);
                return;
            }
        }
    };

    if let Err(e) = task.run(app.manager.runtime(), &editor, &progress) {
        error!(task = %task.id, error = %e, "task run failed");
        println!("error running task {}: {}", task.id, e);
    }
}

fn finished(app: &mut App) {
    if !app.manager.is_running() {
        println!("no experiment running");
        return;
    }
    match prompt::yes_no("Are you sure you have done all your tasks?") {
        Ok(true) => {}
        _ => return,
    }

    let (group, participant) = match app.manager.active_session() {
        Some(session) => (
            session.group_name().to_string(),
            session.participant().to_string(),
        ),
        None => return,
    };
    let Some(editor) = app.manager.sandbox_id().cloned() else {
        return;
    };

    println!("saving logs...");
    if let Err(e) = save_container_logs(app.manager.runtime(), &editor) {
        warn!(error = %e, "failed saving container logs");
        println!("error saving logs: {}", e);
    }

    let tarball = format!(
        "exp_{}_{}_{}.tar.gz",
        group,
        participant,
        Local::now().format("%Y%m%d_%H%M%S")
    );
    println!("saving sources to {} ...", tarball);
    if let Err(e) = save_sources(app.manager.runtime(), &editor, &tarball) {
        warn!(error = %e, "failed saving source tarball");
        println!("error saving sources: {}", e);
    }

    println!("stopping editor container...");
    if let Err(e) = app.manager.end_session() {
        println!("error: {}", e);
    }

    println!("saving editor container...");
    match app
        .manager
        .runtime()
        .commit(&editor, &format!("exp_{}_{}", group, participant))
    {
        Ok(output) => println!("{}", output.trim_end()),
        Err(e) => {
            warn!(error = %e, "failed committing editor container");
            println!("error saving editor container: {}", e);
        }
    }
}

fn abort_experiment(app: &mut App) {
    if !app.manager.is_running() {
        println!("no experiment running");
        return;
    }
    match prompt::yes_no("Do you really want to quit the running experiment?") {
        Ok(true) => {}
        _ => return,
    }

    debug!("killing editor container");
    println!("stopping editor container...");
    if let Err(e) = app.manager.end_session() {
        println!("error: {}", e);
    }
}

fn pull_images(app: &mut App, args: &[&str]) {
    if args.len() > 1 {
        println!("pull_images: [image repo/prefix]");
        println!("    default prefix: '{}'", DEFAULT_IMAGE_PREFIX);
        return;
    }
    let prefix = args.first().copied().unwrap_or(DEFAULT_IMAGE_PREFIX);

    if let Err(e) = images::pull_images(app.manager.runtime(), &app.registry, prefix) {
        println!("error pulling images: {}", e);
    }
}

/// Copy the sandbox's own logs into it before it is committed
fn save_container_logs(runtime: &dyn ContainerRuntime, editor: &ContainerId) -> Result<()> {
    let logs = runtime.logs(editor)?;
    let staging = std::env::temp_dir().join(format!(
        "expctr_logs_{}.log",
        Local::now().format("%Y%m%d_%H%M%S")
    ));
    std::fs::write(&staging, logs)?;
    let result = runtime.copy_to(&staging, editor, "/var/log/experiment_container.log");
    let _ = std::fs::remove_file(&staging);
    result
}

/// Build the source tarball inside the sandbox and copy it out
fn save_sources(runtime: &dyn ContainerRuntime, editor: &ContainerId, tarball: &str) -> Result<()> {
    let remote = format!("/root/{}", tarball);
    let out = runtime.exec_captured(
        editor,
        &["/bin/build_src_tarball.sh".to_string(), remote.clone()],
    )?;
    if !out.success() {
        return Err(ExpctrError::Runtime(format!(
            "build_src_tarball.sh exited with {}",
            out.exit_code
        )));
    }
    runtime.copy_from(editor, &remote, Path::new(tarball))
}

/// `xhost +local:` so the editor container may talk to the local display;
/// best-effort, the operator sees X errors soon enough if it fails
fn allow_local_x() {
    match Command::new("xhost").arg("+local:").output() {
        Ok(out) if !out.status.success() => debug!("xhost +local: failed"),
        Ok(_) => {}
        Err(e) => debug!(error = %e, "could not run xhost"),
    }
}

fn print_help() {
    println!(
        r#"available commands:

  new_experiment [group] [name]  start an editor sandbox for a participant
  start                          run the experiment tasks in order
  start_task [id]                jump to a specific task (first task if no id)
  finished                       collect artifacts and stop the experiment
  abort_experiment               discard the running experiment
  pull_images [prefix]           pull all catalog images (default prefix: '{}')
  help                           show this help
  quit                           exit (refused while an experiment is running)
"#,
        DEFAULT_IMAGE_PREFIX
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin;
    use crate::sandbox::mock::MockRuntime;
    use crate::session::SessionState;

    fn app() -> App {
        let (registry, catalog) = builtin::catalog().build().unwrap();
        App {
            registry,
            catalog,
            manager: SessionManager::new(Box::new(MockRuntime::new()), false),
        }
    }

    #[test]
    fn test_valid_participant() {
        assert!(valid_participant("alice"));
        assert!(valid_participant("p_01"));
        assert!(!valid_participant("alice smith"));
        assert!(!valid_participant("p-01"));
        assert!(!valid_participant(""));
    }

    #[test]
    fn test_quit_refused_while_running() {
        let mut app = app();
        app.manager
            .start_session(&app.registry, &app.catalog, "g1", "alice")
            .unwrap();
        assert_eq!(dispatch("quit", &mut app), Dispatch::Continue);
        assert!(app.manager.is_running());
    }

    #[test]
    fn test_quit_when_idle() {
        let mut app = app();
        assert_eq!(dispatch("quit", &mut app), Dispatch::Quit);
    }

    #[test]
    fn test_unknown_command_continues() {
        let mut app = app();
        assert_eq!(dispatch("frobnicate", &mut app), Dispatch::Continue);
    }

    #[test]
    fn test_new_experiment_rejects_bad_participant() {
        let mut app = app();
        dispatch("new_experiment g1 bad-name", &mut app);
        assert!(!app.manager.is_running());
    }

    #[test]
    fn test_new_experiment_rejects_unknown_group() {
        let mut app = app();
        dispatch("new_experiment nope alice", &mut app);
        assert!(!app.manager.is_running());
    }

    #[test]
    fn test_new_experiment_requires_two_args() {
        let mut app = app();
        dispatch("new_experiment g1", &mut app);
        assert!(!app.manager.is_running());
    }

    #[test]
    fn test_new_experiment_does_not_touch_running_session() {
        let mut app = app();
        app.manager
            .start_session(&app.registry, &app.catalog, "g1", "alice")
            .unwrap();
        app.manager.active_session_mut().unwrap().advance();

        dispatch("new_experiment g2 bob", &mut app);
        let session = app.manager.active_session().unwrap();
        assert_eq!(session.participant(), "alice");
        assert_eq!(session.state(), SessionState::InProgress(0));
    }
}
