//! Tab completion for the operator shell
//!
//! The first word completes to command keywords; `new_experiment` completes
//! group names and `start_task` completes the active session's task ids.
//! Candidate lists are pushed into the helper by the REPL loop before each
//! read.

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

/// rustyline helper carrying the current completion candidates
pub struct ReplHelper {
    commands: Vec<String>,
    groups: Vec<String>,
    task_ids: Vec<String>,
}

impl ReplHelper {
    pub fn new(commands: &[&str]) -> Self {
        Self {
            commands: commands.iter().map(|s| s.to_string()).collect(),
            groups: Vec::new(),
            task_ids: Vec::new(),
        }
    }

    pub fn set_groups(&mut self, groups: Vec<String>) {
        self.groups = groups;
    }

    pub fn set_task_ids(&mut self, task_ids: Vec<String>) {
        self.task_ids = task_ids;
    }
}

/// Byte offset where the word being completed starts
fn word_start(line: &str, pos: usize) -> usize {
    line[..pos]
        .rfind(char::is_whitespace)
        .map(|i| i + 1)
        .unwrap_or(0)
}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = word_start(line, pos);
        let word = &line[start..pos];
        let completed: Vec<&str> = line[..start].split_whitespace().collect();

        let candidates: &[String] = if completed.is_empty() {
            &self.commands
        } else {
            match (completed[0], completed.len()) {
                ("new_experiment", 1) => &self.groups,
                ("start_task", 1) => &self.task_ids,
                _ => &[],
            }
        };

        let pairs = candidates
            .iter()
            .filter(|c| c.starts_with(word))
            .map(|c| Pair {
                display: c.clone(),
                replacement: c.clone(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ReplHelper {
    type Hint = String;
}

impl Highlighter for ReplHelper {}
impl Validator for ReplHelper {}
impl Helper for ReplHelper {}

#[cfg(test)]
mod tests {
    use super::*;
    use rustyline::history::MemHistory;

    fn helper() -> ReplHelper {
        let mut helper = ReplHelper::new(&["new_experiment", "start", "start_task", "quit"]);
        helper.set_groups(vec!["g1".to_string(), "g2".to_string()]);
        helper.set_task_ids(vec!["task1a".to_string(), "q1".to_string()]);
        helper
    }

    fn complete(helper: &ReplHelper, line: &str) -> (usize, Vec<String>) {
        let history = MemHistory::new();
        let ctx = Context::new(&history);
        let (start, pairs) = helper.complete(line, line.len(), &ctx).unwrap();
        (start, pairs.into_iter().map(|p| p.replacement).collect())
    }

    #[test]
    fn test_completes_commands_on_first_word() {
        let helper = helper();
        let (start, words) = complete(&helper, "sta");
        assert_eq!(start, 0);
        assert_eq!(words, vec!["start", "start_task"]);
    }

    #[test]
    fn test_completes_groups_after_new_experiment() {
        let helper = helper();
        let (start, words) = complete(&helper, "new_experiment g");
        assert_eq!(start, 15);
        assert_eq!(words, vec!["g1", "g2"]);
    }

    #[test]
    fn test_completes_task_ids_after_start_task() {
        let helper = helper();
        let (_, words) = complete(&helper, "start_task ta");
        assert_eq!(words, vec!["task1a"]);
    }

    #[test]
    fn test_no_candidates_for_later_words() {
        let helper = helper();
        let (_, words) = complete(&helper, "new_experiment g1 ");
        assert!(words.is_empty());
    }
}
