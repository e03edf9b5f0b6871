//! Task definitions
//!
//! A [`Task`] is an immutable descriptor for one step of an experiment: a
//! containerized coding exercise ([`TaskKind::Work`]) or a questionnaire
//! opened in the participant's editor ([`TaskKind::Question`]). Both share
//! the same identity and ordering contract and differ only in payload.

use tracing::{debug, error, info};

use crate::error::{ExpctrError, Result};
use crate::repl::prompt;
use crate::sandbox::{ContainerId, ContainerRuntime, RunSpec};

/// Root of the participant's source tree inside the editor container
pub const SRC_ROOT: &str = "/home/user/src";

/// One step of an experiment track
#[derive(Debug, Clone)]
pub struct Task {
    /// Unique task id (key in the registry)
    pub id: String,
    /// Operator-facing display name
    pub name: String,
    /// Expected duration in minutes, advisory only
    pub duration: Option<u32>,
    /// Variant payload
    pub kind: TaskKind,
}

/// Task variant payload
#[derive(Debug, Clone)]
pub enum TaskKind {
    Work(WorkTask),
    Question(QuestionTask),
}

/// A full container-backed coding exercise
#[derive(Debug, Clone)]
pub struct WorkTask {
    /// Operator-facing task text, printed before the run
    pub description: String,
    /// Image for the per-task container
    pub image: String,
    /// Method label, also used to derive paths and the container hostname
    pub method: String,
    /// Project directory opened in the editor (absolute, inside the container)
    pub src_dir: String,
    /// MODULES environment value for the task container
    pub modules: String,
    /// MANIFEST environment value for the task container
    pub manifest: String,
}

/// A questionnaire shown in the editor between work tasks
#[derive(Debug, Clone)]
pub struct QuestionTask {
    /// Directory under the source root holding the questionnaire
    pub task_dir: String,
    /// Questionnaire file name
    pub question_file: String,
}

impl Task {
    /// Create a work task. `modules` and `manifest` default to the
    /// conventional locations under `method`.
    pub fn work(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        image: impl Into<String>,
        method: impl Into<String>,
        src_dir: impl Into<String>,
        duration: Option<u32>,
    ) -> Self {
        let method = method.into();
        Self {
            id: id.into(),
            name: name.into(),
            duration,
            kind: TaskKind::Work(WorkTask {
                description: description.into(),
                image: image.into(),
                modules: format!("{}/modules", method),
                manifest: format!("{}/manifests/site.pp", method),
                src_dir: format!("{}/{}", SRC_ROOT, src_dir.into()),
                method,
            }),
        }
    }

    /// Create a questionnaire task. The questionnaire lives in
    /// `<SRC_ROOT>/<task_dir>/questions.txt` and is budgeted at 5 minutes.
    pub fn question(
        id: impl Into<String>,
        name: impl Into<String>,
        task_dir: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            duration: Some(5),
            kind: TaskKind::Question(QuestionTask {
                task_dir: task_dir.into(),
                question_file: "questions.txt".to_string(),
            }),
        }
    }

    /// Override the MODULES path of a work task
    pub fn with_modules(mut self, modules: impl Into<String>) -> Self {
        if let TaskKind::Work(ref mut w) = self.kind {
            w.modules = modules.into();
        }
        self
    }

    /// Override the MANIFEST path of a work task
    pub fn with_manifest(mut self, manifest: impl Into<String>) -> Self {
        if let TaskKind::Work(ref mut w) = self.kind {
            w.manifest = manifest.into();
        }
        self
    }

    /// Override the questionnaire file name of a question task
    pub fn with_question_file(mut self, file: impl Into<String>) -> Self {
        if let TaskKind::Question(ref mut q) = self.kind {
            q.question_file = file.into();
        }
        self
    }

    /// Container image driven by this task, if any
    pub fn image(&self) -> Option<&str> {
        match &self.kind {
            TaskKind::Work(w) => Some(&w.image),
            TaskKind::Question(_) => None,
        }
    }

    /// Run the task against the editor sandbox. Blocks on operator input
    /// between every step; exit codes are surfaced, never interpreted
    /// beyond zero/non-zero.
    pub fn run(
        &self,
        runtime: &dyn ContainerRuntime,
        editor: &ContainerId,
        progress: &Progress,
    ) -> Result<()> {
        match &self.kind {
            TaskKind::Work(w) => self.run_work(w, runtime, editor, progress),
            TaskKind::Question(q) => self.run_question(q, runtime, editor, progress),
        }
    }

    fn run_work(
        &self,
        work: &WorkTask,
        runtime: &dyn ContainerRuntime,
        editor: &ContainerId,
        progress: &Progress,
    ) -> Result<()> {
        info!(task = %self.id, "starting task");

        println!(
            "----------------------------------------------------------------------\n\
             {} test container\n\n\
             {}\n\
             -----------------------------------------------------------------------",
            self.name, work.description
        );
        println!("{}", progress.render());

        if let Some(minutes) = self.duration {
            println!(
                "\n  Expected time for solving: {} min. Might be a good time for a break now.\n",
                minutes
            );
        }

        while !prompt::yes_no("if you are ready press 'y' to start")? {}

        loop {
            println!(
                "\nstarting {name}\n\n\
                 adding project folder '{method}' to the editor\n\n\
                 use one of the following commands to test your code:\n\n\
                 \x20 run_puppet    ... execute puppet\n\
                 \x20 run_test [-a] ... run puppet and all test cases\n\
                 \x20                   (without -a stop on first failing test)\n\n\
                 if you have done the task run\n\n\
                 \x20 exit\n\n\
                 -------------------------------------------------------------------------",
                name = self.name,
                method = work.method
            );

            // open the project folder in the editor
            let out = runtime.exec_captured(
                editor,
                &["/bin/atom_open_file".to_string(), work.src_dir.clone()],
            )?;
            if out.exit_code != 0 {
                error!(task = %self.id, code = out.exit_code, "editor command failed");
                println!("error while executing editor command:");
                println!("{}", out.stdout);
                return Err(ExpctrError::Runtime(format!(
                    "editor command exited with {}",
                    out.exit_code
                )));
            }

            let status = runtime.run_interactive(&RunSpec {
                image: work.image.clone(),
                volumes_from: editor.clone(),
                env: vec![
                    ("MANIFEST".to_string(), work.manifest.clone()),
                    ("MODULES".to_string(), work.modules.clone()),
                ],
                hostname: hostname_label(&work.method),
                command: "/bin/container_init.sh".to_string(),
            })?;
            debug!(task = %self.id, status, "task container exited");

            println!();
            if prompt::yes_no(
                "Are you sure you want to terminate this container and proceed with the next task?",
            )? {
                break;
            }
            debug!(task = %self.id, "restart task");
            println!("restarting current task");
        }

        info!(task = %self.id, "task finished");
        Ok(())
    }

    fn run_question(
        &self,
        question: &QuestionTask,
        runtime: &dyn ContainerRuntime,
        editor: &ContainerId,
        progress: &Progress,
    ) -> Result<()> {
        info!(task = %self.id, "starting questionnaire");

        println!("{}", progress.render());
        println!("\n  please answer the questionnaire appearing in the editor window\n");

        let path = format!("{}/{}/{}", SRC_ROOT, question.task_dir, question.question_file);
        let out = runtime.exec_captured(editor, &["/bin/atom_open_file".to_string(), path])?;
        if out.exit_code != 0 {
            error!(task = %self.id, code = out.exit_code, "editor command failed");
            println!("error while executing editor command:");
            println!("{}", out.stdout);
            return Err(ExpctrError::Runtime(format!(
                "editor command exited with {}",
                out.exit_code
            )));
        }

        while !prompt::yes_no(
            "if you have answered all questions press 'y' to proceed (don't forget to save (CTRL-s))",
        )? {}

        info!(task = %self.id, "questionnaire finished");
        Ok(())
    }
}

/// Progress through the running experiment, rendered before each task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// 1-based position of the current task
    pub position: usize,
    /// Total number of tasks in the track
    pub total: usize,
    /// Advisory minutes left, current task included
    pub remaining_minutes: u32,
}

impl Progress {
    /// Render the operator-facing progress bar line
    pub fn render(&self) -> String {
        let done = "=".repeat(self.position.min(self.total));
        let todo = " ".repeat(self.total.saturating_sub(self.position));
        format!(
            "\nprogress: [{}{}] task {}/{} (including questionnaires) (expected: {} min)",
            done, todo, self.position, self.total, self.remaining_minutes
        )
    }
}

/// Map a method label to a hostname-safe container label
fn hostname_label(method: &str) -> String {
    method
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
