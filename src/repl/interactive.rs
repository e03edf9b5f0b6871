//! Interactive operator shell

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use tracing::{debug, error};

use super::commands::{dispatch, App, Dispatch, COMMANDS};
use super::completion::ReplHelper;
use crate::error::{ExpctrError, Result};

/// Run the operator shell until `quit` or end of input
pub fn run_repl(app: &mut App) -> Result<()> {
    let mut rl: Editor<ReplHelper, DefaultHistory> =
        Editor::new().map_err(|e| ExpctrError::Runtime(e.to_string()))?;

    let mut helper = ReplHelper::new(COMMANDS);
    helper.set_groups(app.catalog.names().iter().map(|s| s.to_string()).collect());
    rl.set_helper(Some(helper));

    loop {
        // session state may have changed, refresh the completion candidates
        if let Some(helper) = rl.helper_mut() {
            helper.set_task_ids(
                app.manager
                    .active_session()
                    .map(|s| s.task_ids())
                    .unwrap_or_default(),
            );
        }

        match rl.readline(&full_prompt(app)) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);
                debug!(command = line, "running command");
                if dispatch(line, app) == Dispatch::Quit {
                    break;
                }
                debug!(command = line, "command ended");
            }
            Err(ReadlineError::Interrupted) => {
                println!("use 'quit' to exit");
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                error!(error = %err, "readline error");
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}

/// `Exp sh :>`, with the group and participant shown while an experiment
/// is running
fn full_prompt(app: &App) -> String {
    match app.manager.active_session() {
        Some(session) => format!(
            "Exp sh ({}) {} :> ",
            session.group_name(),
            session.participant()
        ),
        None => "Exp sh :> ".to_string(),
    }
}
