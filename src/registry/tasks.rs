//! Task registry
//!
//! Immutable catalog of task definitions, keyed by id. Tasks are held
//! behind `Arc` so sessions share them by reference instead of copying.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{ExpctrError, Result};
use crate::task::Task;

/// Ordered, duplicate-checked catalog of all known tasks
#[derive(Debug, Default)]
pub struct TaskRegistry {
    /// Tasks by id
    tasks: HashMap<String, Arc<Task>>,
    /// Registration order, for cross-cutting iteration
    order: Vec<Arc<Task>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task. Fails if the id is already taken.
    pub fn register(&mut self, task: Task) -> Result<()> {
        debug!(task = %task.id, "add task");
        if self.tasks.contains_key(&task.id) {
            return Err(ExpctrError::DuplicateTask(task.id));
        }

        let task = Arc::new(task);
        self.tasks.insert(task.id.clone(), Arc::clone(&task));
        self.order.push(task);
        Ok(())
    }

    /// Look up a task by id
    pub fn lookup(&self, id: &str) -> Option<Arc<Task>> {
        self.tasks.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tasks.contains_key(id)
    }

    /// All tasks in registration order
    pub fn all(&self) -> impl Iterator<Item = &Arc<Task>> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
