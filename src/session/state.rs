//! Session state machine
//!
//! The ordered progression through a resolved task list:
//! `NotStarted` -> `InProgress(k)` -> `Completed`. `Completed` is terminal
//! for linear advancement, but the operator may still re-enter any task by
//! id, which does not reset the completed-ness bookkeeping.

use std::sync::Arc;

use crate::error::{ExpctrError, Result};
use crate::task::{Progress, Task};

/// Observable session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    InProgress(usize),
    Completed,
}

/// Runtime progression of one participant through one group
#[derive(Debug)]
pub struct Session {
    group_name: String,
    participant: String,
    /// Resolved task list, shared with the registry
    tasks: Vec<Arc<Task>>,
    /// Position in `tasks`; `None` before the first advance and after the
    /// last task
    current_index: Option<usize>,
    /// Distinguishes `Completed` from `NotStarted` while the index is unset
    ever_started: bool,
}

impl Session {
    pub fn new(
        group_name: impl Into<String>,
        participant: impl Into<String>,
        tasks: Vec<Arc<Task>>,
    ) -> Self {
        Self {
            group_name: group_name.into(),
            participant: participant.into(),
            tasks,
            current_index: None,
            ever_started: false,
        }
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    pub fn participant(&self) -> &str {
        &self.participant
    }

    pub fn state(&self) -> SessionState {
        match self.current_index {
            Some(index) => SessionState::InProgress(index),
            None if self.ever_started => SessionState::Completed,
            None => SessionState::NotStarted,
        }
    }

    /// Task at the current position, if any
    pub fn current(&self) -> Option<Arc<Task>> {
        self.current_index.map(|i| Arc::clone(&self.tasks[i]))
    }

    /// Move to the next task and return it. The first call enters the list
    /// at index 0; advancing past the last task completes the session and
    /// returns `None`; further calls are no-ops. An empty task list
    /// completes immediately.
    pub fn advance(&mut self) -> Option<Arc<Task>> {
        match self.current_index {
            None if self.ever_started => None,
            None => {
                self.ever_started = true;
                if self.tasks.is_empty() {
                    None
                } else {
                    self.current_index = Some(0);
                    self.current()
                }
            }
            Some(index) => {
                if index + 1 < self.tasks.len() {
                    self.current_index = Some(index + 1);
                    self.current()
                } else {
                    self.current_index = None;
                    None
                }
            }
        }
    }

    /// Jump to the first task whose id matches. Groups may repeat ids, so
    /// later occurrences are only reachable through [`Session::advance`].
    pub fn jump_to(&mut self, task_id: &str) -> Result<Arc<Task>> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or_else(|| ExpctrError::TaskNotFound(task_id.to_string()))?;

        self.current_index = Some(index);
        self.ever_started = true;
        Ok(Arc::clone(&self.tasks[index]))
    }

    /// Advisory minutes left, the current task included; 0 whenever no
    /// task is current.
    pub fn remaining_minutes(&self) -> u32 {
        match self.current_index {
            Some(index) => self.tasks[index..]
                .iter()
                .map(|t| t.duration.unwrap_or(0))
                .sum(),
            None => 0,
        }
    }

    /// Ordered task ids, for completion and validation
    pub fn task_ids(&self) -> Vec<String> {
        self.tasks.iter().map(|t| t.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Progress banner data for the current task
    pub fn progress(&self) -> Option<Progress> {
        self.current_index.map(|index| Progress {
            position: index + 1,
            total: self.tasks.len(),
            remaining_minutes: self.remaining_minutes(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;

    fn session(ids_and_durations: &[(&str, Option<u32>)]) -> Session {
        let tasks = ids_and_durations
            .iter()
            .map(|(id, duration)| {
                Arc::new(Task::work(*id, *id, "d", "img", "m", "s", *duration))
            })
            .collect();
        Session::new("g", "alice", tasks)
    }

    #[test]
    fn test_advance_visits_declared_order_including_repeats() {
        let mut s = session(&[("a", None), ("q", None), ("b", None), ("q", None)]);
        assert_eq!(s.state(), SessionState::NotStarted);

        let visited: Vec<String> = (0..4).map(|_| s.advance().unwrap().id.clone()).collect();
        assert_eq!(visited, vec!["a", "q", "b", "q"]);

        assert!(s.advance().is_none());
        assert_eq!(s.state(), SessionState::Completed);
    }

    #[test]
    fn test_advance_idempotent_once_completed() {
        let mut s = session(&[("a", None)]);
        s.advance();
        assert!(s.advance().is_none());
        assert!(s.advance().is_none());
        assert_eq!(s.state(), SessionState::Completed);
    }

    #[test]
    fn test_advance_on_empty_group_completes_immediately() {
        let mut s = session(&[]);
        assert!(s.advance().is_none());
        assert_eq!(s.state(), SessionState::Completed);
        assert_eq!(s.remaining_minutes(), 0);
    }

    #[test]
    fn test_jump_to_selects_first_occurrence() {
        let mut s = session(&[("a", None), ("q", None), ("b", None), ("q", None)]);
        // from any state, jumping to "q" lands on index 1, never index 3
        for _ in 0..4 {
            s.advance();
        }
        let task = s.jump_to("q").unwrap();
        assert_eq!(task.id, "q");
        assert_eq!(s.state(), SessionState::InProgress(1));
    }

    #[test]
    fn test_jump_to_after_advancing_past_repeat() {
        let mut s = session(&[("t1", None), ("t2", None), ("t1", None)]);
        s.advance();
        s.advance();
        s.advance();
        assert_eq!(s.state(), SessionState::InProgress(2));
        s.jump_to("t1").unwrap();
        assert_eq!(s.state(), SessionState::InProgress(0));
    }

    #[test]
    fn test_jump_to_unknown_task() {
        let mut s = session(&[("a", None)]);
        let result = s.jump_to("nope");
        assert!(matches!(result, Err(ExpctrError::TaskNotFound(id)) if id == "nope"));
        assert_eq!(s.state(), SessionState::NotStarted);
    }

    #[test]
    fn test_jump_does_not_reset_completedness() {
        let mut s = session(&[("a", None), ("b", None)]);
        s.advance();
        s.advance();
        s.advance();
        assert_eq!(s.state(), SessionState::Completed);
        s.jump_to("a").unwrap();
        assert_eq!(s.state(), SessionState::InProgress(0));
        // advancing past the end completes again without revisiting NotStarted
        s.advance();
        assert!(s.advance().is_none());
        assert_eq!(s.state(), SessionState::Completed);
    }

    #[test]
    fn test_remaining_minutes_scenario() {
        let mut s = session(&[("t1", Some(10)), ("t2", Some(20))]);
        assert_eq!(s.remaining_minutes(), 0);

        let t1 = s.advance().unwrap();
        assert_eq!(t1.id, "t1");
        assert_eq!(s.remaining_minutes(), 30);

        let t2 = s.advance().unwrap();
        assert_eq!(t2.id, "t2");
        assert_eq!(s.remaining_minutes(), 20);

        assert!(s.advance().is_none());
        assert_eq!(s.state(), SessionState::Completed);
        assert_eq!(s.remaining_minutes(), 0);
    }

    #[test]
    fn test_remaining_minutes_treats_missing_duration_as_zero() {
        let mut s = session(&[("t1", Some(10)), ("t2", None), ("t3", Some(5))]);
        s.advance();
        assert_eq!(s.remaining_minutes(), 15);
    }

    #[test]
    fn test_remaining_minutes_monotonically_non_increasing() {
        let mut s = session(&[("a", Some(10)), ("b", Some(20)), ("c", Some(5))]);
        s.advance();
        let mut previous = s.remaining_minutes();
        while s.advance().is_some() {
            let now = s.remaining_minutes();
            assert!(now <= previous);
            previous = now;
        }
        assert_eq!(s.remaining_minutes(), 0);
    }

    #[test]
    fn test_task_ids_and_progress() {
        let mut s = session(&[("a", Some(10)), ("b", Some(20))]);
        assert_eq!(s.task_ids(), vec!["a", "b"]);
        assert!(s.progress().is_none());

        s.advance();
        let progress = s.progress().unwrap();
        assert_eq!(progress.position, 1);
        assert_eq!(progress.total, 2);
        assert_eq!(progress.remaining_minutes, 30);
    }
}
