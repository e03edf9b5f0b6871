//! Group catalog
//!
//! A group is a named ordered sequence of task ids defining one experiment
//! track. The same id may appear multiple times (questionnaires interleaved
//! with work tasks). Sequences are validated against the task registry at
//! registration time and stored verbatim.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{ExpctrError, Result};
use crate::registry::TaskRegistry;
use crate::task::Task;

/// Named, validated experiment tracks
#[derive(Debug, Default)]
pub struct GroupCatalog {
    /// Id sequences by group name
    groups: HashMap<String, Vec<String>>,
    /// Registration order of group names
    order: Vec<String>,
}

impl GroupCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a group. Every id must already exist in the registry; on
    /// any failure the catalog is left unchanged.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        ids: Vec<String>,
        registry: &TaskRegistry,
    ) -> Result<()> {
        let name = name.into();
        debug!(group = %name, "add group");
        if self.groups.contains_key(&name) {
            return Err(ExpctrError::DuplicateGroup(name));
        }

        for id in &ids {
            if !registry.contains(id) {
                return Err(ExpctrError::UnknownTask(id.clone()));
            }
        }

        self.groups.insert(name.clone(), ids);
        self.order.push(name);
        Ok(())
    }

    /// Expand a group into its ordered task list. Pure and deterministic;
    /// tasks are shared with the registry, never copied.
    pub fn resolve(&self, name: &str, registry: &TaskRegistry) -> Result<Vec<Arc<Task>>> {
        let ids = self
            .groups
            .get(name)
            .ok_or_else(|| ExpctrError::UnknownGroup(name.to_string()))?;

        // registration validated every id, so lookups cannot miss
        Ok(ids.iter().filter_map(|id| registry.lookup(id)).collect())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    /// Group names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn registry() -> TaskRegistry {
        let mut registry = TaskRegistry::new();
        for id in ["t1", "t2", "q1"] {
            registry
                .register(Task::work(id, id, "d", "img", "m", "s", None))
                .unwrap();
        }
        registry
    }

    #[test]
    fn test_register_and_resolve_order_with_repeats() {
        let registry = registry();
        let mut catalog = GroupCatalog::new();
        catalog
            .register("g1", ids(&["t1", "q1", "t2", "q1"]), &registry)
            .unwrap();

        let tasks = catalog.resolve("g1", &registry).unwrap();
        let resolved: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(resolved, vec!["t1", "q1", "t2", "q1"]);
    }

    #[test]
    fn test_register_duplicate_group() {
        let registry = registry();
        let mut catalog = GroupCatalog::new();
        catalog.register("g1", ids(&["t1"]), &registry).unwrap();
        let result = catalog.register("g1", ids(&["t2"]), &registry);
        assert!(matches!(result, Err(ExpctrError::DuplicateGroup(name)) if name == "g1"));
    }

    #[test]
    fn test_register_unknown_task_no_partial_insert() {
        let registry = registry();
        let mut catalog = GroupCatalog::new();
        let result = catalog.register("g1", ids(&["t1", "nope", "t2"]), &registry);
        assert!(matches!(result, Err(ExpctrError::UnknownTask(id)) if id == "nope"));
        assert!(!catalog.contains("g1"));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_resolve_unknown_group() {
        let registry = registry();
        let catalog = GroupCatalog::new();
        let result = catalog.resolve("missing", &registry);
        assert!(matches!(result, Err(ExpctrError::UnknownGroup(name)) if name == "missing"));
    }

    #[test]
    fn test_names_in_registration_order() {
        let registry = registry();
        let mut catalog = GroupCatalog::new();
        catalog.register("g2", ids(&["t1"]), &registry).unwrap();
        catalog.register("g1", ids(&["t2"]), &registry).unwrap();
        assert_eq!(catalog.names(), vec!["g2", "g1"]);
    }

    #[test]
    fn test_resolved_tasks_are_shared_not_copied() {
        let registry = registry();
        let mut catalog = GroupCatalog::new();
        catalog.register("g1", ids(&["t1", "t1"]), &registry).unwrap();
        let tasks = catalog.resolve("g1", &registry).unwrap();
        assert!(Arc::ptr_eq(&tasks[0], &tasks[1]));
        assert!(Arc::ptr_eq(&tasks[0], &registry.lookup("t1").unwrap()));
    }
}
