//! Board Data Model
//!
//! Typed representation of a board file: ordered columns and tasks keyed by id.
//!
//! # Example YAML Format
//!
//! ```yaml
//! board: Auth Service
//! columns:
//!   - Backlog
//!   - Ready
//!   - name: In Progress
//!     limit: 3
//!   - Done
//! tasks:
//!   AUTH-7:
//!     title: Audit existing JWT usage
//!     status: Done
//!   AUTH-12:
//!     title: Replace JWT with PASETO
//!     status: In Progress
//!     spec: tasks/AUTH-12.md
//!     depends_on: AUTH-7
//! ```

use indexmap::IndexMap;
use serde::Serialize;

/// A named lane on the board, optionally capped by a WIP limit.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,

    /// Maximum number of tasks allowed in this column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl Column {
    /// Creates a column without a WIP limit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            limit: None,
        }
    }

    /// Sets the WIP limit for this column.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A unit of work. `status` is expected to name one of the board's columns.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub title: String,
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Path to the task's markdown spec, relative to the board directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    /// Ids of tasks this task depends on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Vec<String>>,
}

impl Task {
    /// Creates a task with only the required fields set.
    ///
    /// # Example
    ///
    /// ```
    /// use statecraft::board::Task;
    ///
    /// let task = Task::new("Replace JWT with PASETO", "In Progress")
    ///     .with_owner("alice")
    ///     .depends_on("AUTH-7");
    /// assert_eq!(task.dependencies(), ["AUTH-7".to_string()]);
    /// ```
    pub fn new(title: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: status.into(),
            description: None,
            spec: None,
            owner: None,
            priority: None,
            depends_on: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_spec(mut self, spec: impl Into<String>) -> Self {
        self.spec = Some(spec.into());
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Adds a dependency on another task.
    pub fn depends_on(mut self, task_id: impl Into<String>) -> Self {
        self.depends_on
            .get_or_insert_with(Vec::new)
            .push(task_id.into());
        self
    }

    /// Dependency ids, empty when the task declares none.
    pub fn dependencies(&self) -> &[String] {
        self.depends_on.as_deref().unwrap_or(&[])
    }
}

/// A whole board document.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Board name (the `board` key in YAML)
    #[serde(rename = "board")]
    pub name: String,

    /// Columns in file order
    pub columns: Vec<Column>,

    /// Tasks keyed by id, in file order
    pub tasks: IndexMap<String, Task>,
}

impl Board {
    /// Creates a board with the given columns and no tasks.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
            tasks: IndexMap::new(),
        }
    }

    /// Adds (or replaces) a task under the given id.
    pub fn with_task(mut self, id: impl Into<String>, task: Task) -> Self {
        self.tasks.insert(id.into(), task);
        self
    }

    pub fn get_task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Position of the last column with the given name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().rposition(|c| c.name == name)
    }

    /// The final column; tasks there count as finished.
    pub fn last_column(&self) -> Option<&Column> {
        self.columns.last()
    }

    /// Number of tasks whose status equals `column`.
    pub fn task_count(&self, column: &str) -> usize {
        self.tasks.values().filter(|t| t.status == column).count()
    }

    /// Returns the number of tasks on the board.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if the board has no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
