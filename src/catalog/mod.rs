//! Experiment catalog definitions
//!
//! The registration phase: task and group definitions are turned into the
//! immutable [`TaskRegistry`] and [`GroupCatalog`] once at process start.
//! Definitions come from the built-in study catalog
//! ([`builtin::catalog`]) or from a JSON file passed via `--catalog`.

pub mod builtin;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ExpctrError, Result};
use crate::registry::{GroupCatalog, TaskRegistry};
use crate::task::Task;

/// Top-level catalog document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub tasks: Vec<TaskDef>,
    pub groups: Vec<GroupDef>,
}

/// One task definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskDef {
    Work {
        id: String,
        name: String,
        description: String,
        image: String,
        method: String,
        src_dir: String,
        #[serde(default)]
        duration: Option<u32>,
        #[serde(default)]
        modules: Option<String>,
        #[serde(default)]
        manifest: Option<String>,
    },
    Question {
        id: String,
        name: String,
        task_dir: String,
        #[serde(default)]
        question_file: Option<String>,
    },
}

/// One named experiment track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDef {
    pub name: String,
    pub tasks: Vec<String>,
}

/// Load a catalog document from a JSON file
pub fn load(path: &Path) -> Result<CatalogFile> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| ExpctrError::Catalog(e.to_string()))
}

impl CatalogFile {
    /// Build the registry and group catalog. Any duplicate or unknown id
    /// fails the whole build; this runs at startup and is fatal there.
    pub fn build(&self) -> Result<(TaskRegistry, GroupCatalog)> {
        let mut registry = TaskRegistry::new();
        for def in &self.tasks {
            registry.register(def.to_task())?;
        }

        let mut groups = GroupCatalog::new();
        for def in &self.groups {
            groups.register(def.name.clone(), def.tasks.clone(), &registry)?;
        }

        Ok((registry, groups))
    }
}

impl TaskDef {
    fn to_task(&self) -> Task {
        match self {
            TaskDef::Work {
                id,
                name,
                description,
                image,
                method,
                src_dir,
                duration,
                modules,
                manifest,
            } => {
                let mut task = Task::work(id, name, description, image, method, src_dir, *duration);
                if let Some(modules) = modules {
                    task = task.with_modules(modules);
                }
                if let Some(manifest) = manifest {
                    task = task.with_manifest(manifest);
                }
                task
            }
            TaskDef::Question {
                id,
                name,
                task_dir,
                question_file,
            } => {
                let mut task = Task::question(id, name, task_dir);
                if let Some(file) = question_file {
                    task = task.with_question_file(file);
                }
                task
            }
        }
    }
}
