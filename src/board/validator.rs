//! Board Validation
//!
//! Structural checks over a parsed board:
//! - Canonical column layout
//! - Unique column names
//! - Task status membership
//! - Dependency reference integrity
//! - WIP limits
//!
//! Validation never fails; it collects every problem it finds so a single
//! run reports all of them.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::path::Path;

use log::{debug, info};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::model::Board;

/// Required column names, in order.
pub const CANONICAL_COLUMNS: [&str; 4] = ["Backlog", "Ready", "In Progress", "Done"];

/// Machine-readable classification of a validation problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ColumnsNotCanonical,
    DuplicateColumn,
    StatusInvalid,
    DependsOnInvalid,
    WipLimitExceeded,
    DependencyCycle,
    SpecFileMissing,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ColumnsNotCanonical => "COLUMNS_NOT_CANONICAL",
            Self::DuplicateColumn => "DUPLICATE_COLUMN",
            Self::StatusInvalid => "STATUS_INVALID",
            Self::DependsOnInvalid => "DEPENDS_ON_INVALID",
            Self::WipLimitExceeded => "WIP_LIMIT_EXCEEDED",
            Self::DependencyCycle => "DEPENDENCY_CYCLE",
            Self::SpecFileMissing => "SPEC_FILE_MISSING",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single problem found on a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    ColumnCount { actual: usize },
    ColumnOutOfPlace { index: usize, expected: &'static str, actual: String },
    DuplicateColumn { index: usize, name: String },
    StatusInvalid { task: String, status: String, columns: Vec<String> },
    DependsOnInvalid { task: String, dependency: String },
    WipLimitExceeded { index: usize, column: String, limit: usize, count: usize },
    DependencyCycle { task: String },
    SpecFileMissing { task: String, spec: String },
}

impl ValidationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::ColumnCount { .. } | Self::ColumnOutOfPlace { .. } => {
                ErrorCode::ColumnsNotCanonical
            }
            Self::DuplicateColumn { .. } => ErrorCode::DuplicateColumn,
            Self::StatusInvalid { .. } => ErrorCode::StatusInvalid,
            Self::DependsOnInvalid { .. } => ErrorCode::DependsOnInvalid,
            Self::WipLimitExceeded { .. } => ErrorCode::WipLimitExceeded,
            Self::DependencyCycle { .. } => ErrorCode::DependencyCycle,
            Self::SpecFileMissing { .. } => ErrorCode::SpecFileMissing,
        }
    }

    /// Locator of the offending element, e.g. `tasks.T1.status`.
    pub fn path(&self) -> Option<String> {
        let path = match self {
            Self::ColumnCount { .. } => "columns".to_string(),
            Self::ColumnOutOfPlace { index, .. }
            | Self::DuplicateColumn { index, .. }
            | Self::WipLimitExceeded { index, .. } => format!("columns[{}]", index),
            Self::StatusInvalid { task, .. } => format!("tasks.{}.status", task),
            Self::DependsOnInvalid { task, .. } | Self::DependencyCycle { task } => {
                format!("tasks.{}.depends_on", task)
            }
            Self::SpecFileMissing { task, .. } => format!("tasks.{}.spec", task),
        };
        Some(path)
    }

    pub fn message(&self) -> String {
        match self {
            Self::ColumnCount { actual } => format!(
                "Board must have exactly {} columns: {}. Got {}.",
                CANONICAL_COLUMNS.len(),
                CANONICAL_COLUMNS.join(", "),
                actual
            ),
            Self::ColumnOutOfPlace { index, expected, actual } => format!(
                "Column at index {} must be \"{}\". Got \"{}\". Canonical order: {}.",
                index,
                expected,
                actual,
                CANONICAL_COLUMNS.join(", ")
            ),
            Self::DuplicateColumn { name, .. } => format!("Duplicate column name: \"{}\"", name),
            Self::StatusInvalid { status, columns, .. } => format!(
                "Task status \"{}\" does not match any column. Valid columns: {}",
                status,
                columns.join(", ")
            ),
            Self::DependsOnInvalid { task, dependency } => format!(
                "Task \"{}\" depends on \"{}\", which does not exist",
                task, dependency
            ),
            Self::WipLimitExceeded { column, limit, count, .. } => format!(
                "Column \"{}\" has limit {} but {} task(s) in that status",
                column, limit, count
            ),
            Self::DependencyCycle { task } => {
                format!("Task \"{}\" is part of a dependency cycle", task)
            }
            Self::SpecFileMissing { task, spec } => {
                format!("Spec file \"{}\" for task \"{}\" does not exist", spec, task)
            }
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path() {
            Some(path) => write!(f, "{}: {}", path, self.message()),
            None => f.write_str(&self.message()),
        }
    }
}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let path = self.path();
        let mut state = serializer.serialize_struct("ValidationError", 3)?;
        state.serialize_field("message", &self.message())?;
        if let Some(path) = &path {
            state.serialize_field("path", path)?;
        } else {
            state.skip_field("path")?;
        }
        state.serialize_field("code", self.code().as_str())?;
        state.end()
    }
}

/// Outcome of validating a board.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ValidationResult {
    /// True if there are no errors. Warnings do not count.
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationError>,
}

impl ValidationResult {
    /// Appends extra warnings (e.g. from [`check_spec_files`]).
    pub fn with_warnings(mut self, warnings: impl IntoIterator<Item = ValidationError>) -> Self {
        self.warnings.extend(warnings);
        self
    }
}

/// Runs every validation rule and returns the errors found, in rule order.
pub fn validate_board(board: &Board) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    check_canonical_columns(board, &mut errors);
    check_duplicate_columns(board, &mut errors);
    check_tasks(board, &mut errors);
    check_wip_limits(board, &mut errors);

    debug!("Board '{}': {} validation error(s)", board.name, errors.len());
    errors
}

/// Validates a board, returning errors plus advisory warnings.
///
/// # Example
///
/// ```
/// use statecraft::board::{validate, Board, Column, Task};
///
/// let board = Board::new(
///     "Demo",
///     ["Backlog", "Ready", "In Progress", "Done"].into_iter().map(Column::new).collect(),
/// )
/// .with_task("t1", Task::new("Write docs", "Ready"));
///
/// let result = validate(&board);
/// assert!(result.valid);
/// assert!(result.errors.is_empty());
/// ```
pub fn validate(board: &Board) -> ValidationResult {
    let errors = validate_board(board);
    let warnings = dependency_cycles(board);

    info!(
        "Validated board '{}': {} error(s), {} warning(s)",
        board.name,
        errors.len(),
        warnings.len()
    );

    ValidationResult {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

fn check_canonical_columns(board: &Board, errors: &mut Vec<ValidationError>) {
    if board.columns.len() != CANONICAL_COLUMNS.len() {
        errors.push(ValidationError::ColumnCount {
            actual: board.columns.len(),
        });
        return;
    }

    for (index, (column, expected)) in board.columns.iter().zip(CANONICAL_COLUMNS).enumerate() {
        if column.name != expected {
            errors.push(ValidationError::ColumnOutOfPlace {
                index,
                expected,
                actual: column.name.clone(),
            });
        }
    }
}

fn check_duplicate_columns(board: &Board, errors: &mut Vec<ValidationError>) {
    let mut seen: HashSet<&str> = HashSet::new();
    for (index, column) in board.columns.iter().enumerate() {
        if !seen.insert(column.name.as_str()) {
            errors.push(ValidationError::DuplicateColumn {
                index,
                name: column.name.clone(),
            });
        }
    }
}

fn check_tasks(board: &Board, errors: &mut Vec<ValidationError>) {
    let column_names = board.column_names();

    for (id, task) in &board.tasks {
        if !column_names.contains(&task.status.as_str()) {
            errors.push(ValidationError::StatusInvalid {
                task: id.clone(),
                status: task.status.clone(),
                columns: column_names.iter().map(|s| s.to_string()).collect(),
            });
        }

        for dependency in task.dependencies() {
            if !board.tasks.contains_key(dependency) {
                errors.push(ValidationError::DependsOnInvalid {
                    task: id.clone(),
                    dependency: dependency.clone(),
                });
            }
        }
    }
}

fn check_wip_limits(board: &Board, errors: &mut Vec<ValidationError>) {
    let mut count_by_status: HashMap<&str, usize> = HashMap::new();
    for task in board.tasks.values() {
        *count_by_status.entry(task.status.as_str()).or_default() += 1;
    }

    for (index, column) in board.columns.iter().enumerate() {
        let Some(limit) = column.limit else {
            continue;
        };
        let count = count_by_status.get(column.name.as_str()).copied().unwrap_or(0);
        if count > limit {
            errors.push(ValidationError::WipLimitExceeded {
                index,
                column: column.name.clone(),
                limit,
                count,
            });
        }
    }
}

/// Reports tasks that can never be unblocked because their dependencies
/// loop back on them.
///
/// Uses Kahn's algorithm over the existing dependency edges: whatever is
/// left once every task with satisfied in-degree has been drained sits on
/// or behind a cycle. Only leftovers that can reach themselves are reported.
/// Dangling references are ignored here.
fn dependency_cycles(board: &Board) -> Vec<ValidationError> {
    let mut in_degree: HashMap<&str, usize> = HashMap::new();
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();

    for (id, task) in &board.tasks {
        let mut degree = 0;
        for dependency in task.dependencies() {
            if board.tasks.contains_key(dependency) {
                degree += 1;
                dependents.entry(dependency.as_str()).or_default().push(id.as_str());
            }
        }
        in_degree.insert(id.as_str(), degree);
    }

    let mut queue: VecDeque<&str> = board
        .tasks
        .keys()
        .map(String::as_str)
        .filter(|id| in_degree.get(id) == Some(&0))
        .collect();

    let mut resolved: HashSet<&str> = HashSet::new();
    while let Some(current) = queue.pop_front() {
        resolved.insert(current);
        for &dependent in dependents.get(current).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(dependent) {
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(dependent);
                }
            }
        }
    }

    let remaining: HashSet<&str> = board
        .tasks
        .keys()
        .map(String::as_str)
        .filter(|id| !resolved.contains(id))
        .collect();

    board
        .tasks
        .keys()
        .filter(|id| remaining.contains(id.as_str()) && on_cycle(board, id.as_str(), &remaining))
        .map(|id| ValidationError::DependencyCycle { task: id.clone() })
        .collect()
}

/// Whether following dependencies from `start` through `remaining` leads back
/// to `start`.
fn on_cycle<'a>(board: &'a Board, start: &'a str, remaining: &HashSet<&'a str>) -> bool {
    let mut stack = vec![start];
    let mut seen: HashSet<&str> = HashSet::new();

    while let Some(current) = stack.pop() {
        let Some(task) = board.get_task(current) else {
            continue;
        };
        for dependency in task.dependencies() {
            let dependency = dependency.as_str();
            if dependency == start {
                return true;
            }
            if remaining.contains(dependency) && seen.insert(dependency) {
                stack.push(dependency);
            }
        }
    }
    false
}

/// Warns about tasks whose `spec` file is missing.
///
/// `base_dir` is the directory holding the board file; spec paths are
/// resolved relative to it.
pub fn check_spec_files(board: &Board, base_dir: &Path) -> Vec<ValidationError> {
    board
        .tasks
        .iter()
        .filter_map(|(id, task)| {
            let spec = task.spec.as_ref()?;
            if base_dir.join(spec).is_file() {
                None
            } else {
                Some(ValidationError::SpecFileMissing {
                    task: id.clone(),
                    spec: spec.clone(),
                })
            }
        })
        .collect()
}
