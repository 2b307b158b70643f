//! Board Parser
//!
//! Turns YAML text (or a file containing it) into a typed [`Board`].
//! The document is first read as an untyped `serde_yaml::Value` and then
//! walked field by field, so every rejection names the offending location
//! (`columns[2].limit`, `tasks.AUTH-12.depends_on[0]`, ...).

use std::fs;
use std::io;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use indexmap::IndexMap;
use log::{debug, info};
use serde_yaml::{Mapping, Value};
use thiserror::Error;

use super::model::{Board, Column, Task};

/// Errors produced while loading a board.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The board file could not be opened or read.
    #[error("Cannot read file \"{}\": {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The content is not well-formed YAML.
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The YAML is well-formed but does not describe a board.
    #[error("{0}")]
    Invalid(String),
}

impl ParseError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    /// True when the file itself was unreadable, as opposed to malformed.
    pub fn is_read_error(&self) -> bool {
        matches!(self, Self::Read { .. })
    }
}

type Result<T> = std::result::Result<T, ParseError>;

/// Parses a board from raw YAML content.
///
/// # Example
///
/// ```
/// use statecraft::board::parse_board_from_str;
///
/// let board = parse_board_from_str(
///     "board: Demo\ncolumns: [Backlog, Done]\ntasks:\n  t1: { title: Write docs, status: Backlog }\n",
/// )?;
/// assert_eq!(board.name, "Demo");
/// assert_eq!(board.columns.len(), 2);
/// # Ok::<(), statecraft::board::ParseError>(())
/// ```
pub fn parse_board_from_str(content: &str) -> Result<Board> {
    let raw: Value = serde_yaml::from_str(content)?;
    let root = expect_mapping(&raw, "root")?;

    let name = match field(root, "board") {
        Some(value) => expect_str(value, "board")?,
        None => return Err(ParseError::invalid("Missing required field: board")),
    };
    if name.trim().is_empty() {
        return Err(ParseError::invalid("board must be a non-empty string"));
    }

    let columns = match field(root, "columns") {
        Some(value) => parse_columns(value)?,
        None => return Err(ParseError::invalid("Missing required field: columns")),
    };

    let tasks = match field(root, "tasks") {
        Some(value) => parse_tasks(value)?,
        None => return Err(ParseError::invalid("Missing required field: tasks")),
    };

    debug!(
        "Parsed board '{}': {} columns, {} tasks",
        name,
        columns.len(),
        tasks.len()
    );

    Ok(Board {
        name: name.to_string(),
        columns,
        tasks,
    })
}

/// Parses a board from either a file path or raw YAML content.
///
/// `input` is read from disk when it looks like a path: a single line that
/// ends in `.yaml`/`.yml` or contains a path separator. Anything else is
/// parsed as YAML text.
pub fn parse_board(input: &str) -> Result<Board> {
    if looks_like_path(input) {
        load_board(input.trim())
    } else {
        parse_board_from_str(input)
    }
}

/// Reads and parses a board file. Relative paths resolve against the
/// current directory.
pub fn load_board(path: impl AsRef<Path>) -> Result<Board> {
    let path = absolute(path.as_ref());
    info!("Loading board from: {}", path.display());

    let content = fs::read_to_string(&path).map_err(|source| ParseError::Read {
        path: path.clone(),
        source,
    })?;

    debug!("YAML content loaded ({} bytes)", content.len());
    parse_board_from_str(&content)
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn looks_like_path(input: &str) -> bool {
    if input.contains('\n') {
        return false;
    }
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return false;
    }
    trimmed.ends_with(".yaml")
        || trimmed.ends_with(".yml")
        || trimmed.contains('/')
        || trimmed.contains(MAIN_SEPARATOR)
}

fn parse_columns(value: &Value) -> Result<Vec<Column>> {
    let items = value
        .as_sequence()
        .ok_or_else(|| ParseError::invalid("columns: expected an array"))?;
    if items.is_empty() {
        return Err(ParseError::invalid("columns must be a non-empty array"));
    }

    items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_column(item, &format!("columns[{}]", i)))
        .collect()
}

fn parse_column(item: &Value, path: &str) -> Result<Column> {
    match item {
        Value::String(name) => {
            if name.trim().is_empty() {
                return Err(ParseError::invalid(format!(
                    "{}: column name must be non-empty",
                    path
                )));
            }
            Ok(Column::new(name.as_str()))
        }
        Value::Mapping(obj) => {
            let name = field(obj, "name").ok_or_else(|| {
                ParseError::invalid(format!("{}: column object must have \"name\"", path))
            })?;
            let name = expect_str(name, &format!("{}.name", path))?;
            if name.trim().is_empty() {
                return Err(ParseError::invalid(format!("{}.name: must be non-empty", path)));
            }

            let mut column = Column::new(name);
            if let Some(limit) = field(obj, "limit") {
                column.limit = Some(positive_integer(limit).ok_or_else(|| {
                    ParseError::invalid(format!("{}.limit: must be a positive integer", path))
                })?);
            }
            Ok(column)
        }
        _ => Err(ParseError::invalid(format!(
            "{}: expected a string or object with \"name\" (and optional \"limit\")",
            path
        ))),
    }
}

/// Accepts integers >= 1, including integral floats such as `2.0`.
fn positive_integer(value: &Value) -> Option<usize> {
    if let Some(n) = value.as_u64() {
        return usize::try_from(n).ok().filter(|n| *n >= 1);
    }
    let f = value.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f >= 1.0 && f <= usize::MAX as f64 {
        Some(f as usize)
    } else {
        None
    }
}

fn parse_tasks(value: &Value) -> Result<IndexMap<String, Task>> {
    let entries = value.as_mapping().ok_or_else(|| {
        ParseError::invalid("tasks must be an object (map of task id to task)")
    })?;

    let mut tasks = IndexMap::with_capacity(entries.len());
    for (key, raw) in entries {
        let id = task_id(key)?;
        let task = parse_task(raw, &format!("tasks.{}", id))?;
        tasks.insert(id, task);
    }
    Ok(tasks)
}

fn task_id(key: &Value) -> Result<String> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) if n.is_f64() => Ok(n.as_f64().map(float_key).unwrap_or_default()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(ParseError::invalid("tasks: task ids must be strings")),
    }
}

/// Float keys print without a trailing `.0`, so `1.0` and `1` name the same task.
fn float_key(f: f64) -> String {
    if f.is_infinite() {
        let sign = if f < 0.0 { "-" } else { "" };
        format!("{}Infinity", sign)
    } else {
        f.to_string()
    }
}

fn parse_task(raw: &Value, path: &str) -> Result<Task> {
    let obj = expect_mapping(raw, path)?;

    let title = field(obj, "title").ok_or_else(|| {
        ParseError::invalid(format!("{}: missing required field \"title\"", path))
    })?;
    let title = expect_str(title, &format!("{}.title", path))?;

    let status = field(obj, "status").ok_or_else(|| {
        ParseError::invalid(format!("{}: missing required field \"status\"", path))
    })?;
    let status = expect_str(status, &format!("{}.status", path))?;

    let mut task = Task::new(title, status);
    task.description = optional_str(obj, "description", path)?;
    task.spec = optional_str(obj, "spec", path)?;
    task.owner = optional_str(obj, "owner", path)?;
    task.priority = optional_str(obj, "priority", path)?;
    task.depends_on = match field(obj, "depends_on") {
        Some(value) => Some(single_or_vec(value, &format!("{}.depends_on", path))?),
        None => None,
    };

    Ok(task)
}

/// A single id becomes a one-element list; a list is kept as written.
fn single_or_vec(value: &Value, path: &str) -> Result<Vec<String>> {
    match value {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| expect_str(item, &format!("{}[{}]", path, i)).map(str::to_string))
            .collect(),
        _ => Err(ParseError::invalid(format!(
            "{}: expected a string or array of strings",
            path
        ))),
    }
}

fn optional_str(obj: &Mapping, key: &str, path: &str) -> Result<Option<String>> {
    field(obj, key)
        .map(|value| expect_str(value, &format!("{}.{}", path, key)).map(str::to_string))
        .transpose()
}

fn field<'a>(obj: &'a Mapping, key: &str) -> Option<&'a Value> {
    obj.get(key)
}

fn expect_mapping<'a>(value: &'a Value, path: &str) -> Result<&'a Mapping> {
    value
        .as_mapping()
        .ok_or_else(|| ParseError::invalid(format!("{}: expected an object", path)))
}

fn expect_str<'a>(value: &'a Value, path: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| ParseError::invalid(format!("{}: expected a string", path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTH_BOARD: &str = r#"
board: "Auth Service"
columns:
  - Backlog
  - name: In Progress
    limit: 3
  - Review
  - Done
tasks:
  AUTH-7:
    title: "Audit existing JWT usage"
    status: Done
    description: "List all endpoints and call sites using JWT."
  AUTH-12:
    title: "Replace JWT with PASETO"
    status: In Progress
    spec: tasks/AUTH-12.md
    depends_on: AUTH-7
  AUTH-13:
    title: "Add rate limiting to auth endpoints"
    status: Backlog
    priority: medium
"#;

    fn parse_err(yaml: &str) -> String {
        parse_board_from_str(yaml).unwrap_err().to_string()
    }

    #[test]
    fn test_parse_valid_board() {
        let board = parse_board_from_str(AUTH_BOARD).unwrap();

        assert_eq!(board.name, "Auth Service");
        assert_eq!(
            board.columns,
            vec![
                Column::new("Backlog"),
                Column::new("In Progress").with_limit(3),
                Column::new("Review"),
                Column::new("Done"),
            ]
        );

        let ids: Vec<&str> = board.tasks.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["AUTH-7", "AUTH-12", "AUTH-13"]);

        let audit = &board.tasks["AUTH-7"];
        assert_eq!(audit.status, "Done");
        assert_eq!(
            audit.description.as_deref(),
            Some("List all endpoints and call sites using JWT.")
        );

        let paseto = &board.tasks["AUTH-12"];
        assert_eq!(paseto.spec.as_deref(), Some("tasks/AUTH-12.md"));
        assert_eq!(paseto.depends_on, Some(vec!["AUTH-7".to_string()]));

        assert_eq!(board.tasks["AUTH-13"].priority.as_deref(), Some("medium"));
    }

    #[test]
    fn test_depends_on_list_preserved() {
        let yaml = r#"
board: Deps
columns: [Backlog]
tasks:
  t1: { title: A, status: Backlog }
  t2: { title: B, status: Backlog }
  t3: { title: C, status: Backlog, depends_on: [t1, t2] }
"#;
        let board = parse_board_from_str(yaml).unwrap();
        assert_eq!(
            board.tasks["t3"].depends_on,
            Some(vec!["t1".to_string(), "t2".to_string()])
        );
        assert!(board.tasks["t1"].depends_on.is_none());
    }

    #[test]
    fn test_minimal_board_with_empty_tasks() {
        let board = parse_board_from_str("board: Minimal\ncolumns: [Todo, Done]\ntasks: {}\n").unwrap();
        assert_eq!(board.name, "Minimal");
        assert_eq!(board.columns.len(), 2);
        assert!(board.is_empty());
    }

    #[test]
    fn test_numeric_task_ids_are_stringified() {
        let board = parse_board_from_str(
            "board: N\ncolumns: [Backlog]\ntasks:\n  42: { title: Answer, status: Backlog }\n",
        )
        .unwrap();
        assert!(board.get_task("42").is_some());
    }

    #[test]
    fn test_float_task_ids_drop_trailing_zero() {
        let board = parse_board_from_str(
            "board: Floats\ncolumns: [A]\ntasks:\n  1.0: {title: One, status: A}\n  2.5: {title: Half, status: A}\n",
        )
        .unwrap();
        let ids: Vec<&str> = board.tasks.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["1", "2.5"]);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = parse_board_from_str("not: valid: yaml:").unwrap_err();
        assert!(matches!(err, ParseError::Yaml(_)));
        assert!(err.to_string().starts_with("Invalid YAML"));

        assert!(parse_err("[").starts_with("Invalid YAML"));
    }

    #[test]
    fn test_root_must_be_mapping() {
        assert_eq!(parse_err("- a\n- b\n"), "root: expected an object");
    }

    #[test]
    fn test_missing_required_fields() {
        assert_eq!(
            parse_err("columns: [Backlog]\ntasks: {}\n"),
            "Missing required field: board"
        );
        assert_eq!(
            parse_err("board: X\ntasks: {}\n"),
            "Missing required field: columns"
        );
        assert_eq!(
            parse_err("board: X\ncolumns: [Backlog]\n"),
            "Missing required field: tasks"
        );
    }

    #[test]
    fn test_board_name_rules() {
        assert!(parse_err("board: \"  \"\ncolumns: [A]\ntasks: {}\n").contains("non-empty"));
        assert_eq!(
            parse_err("board: [x]\ncolumns: [A]\ntasks: {}\n"),
            "board: expected a string"
        );
    }

    #[test]
    fn test_columns_rules() {
        assert!(parse_err("board: X\ncolumns: Backlog\ntasks: {}\n").contains("expected an array"));
        assert!(parse_err("board: X\ncolumns: []\ntasks: {}\n").contains("non-empty array"));
        assert_eq!(
            parse_err("board: X\ncolumns: [\"\"]\ntasks: {}\n"),
            "columns[0]: column name must be non-empty"
        );
        assert_eq!(
            parse_err("board: X\ncolumns:\n  - limit: 2\ntasks: {}\n"),
            "columns[0]: column object must have \"name\""
        );
        assert_eq!(
            parse_err("board: X\ncolumns: [A, 7]\ntasks: {}\n"),
            "columns[1]: expected a string or object with \"name\" (and optional \"limit\")"
        );
    }

    #[test]
    fn test_column_limit_must_be_positive_integer() {
        for limit in ["0", "-1", "1.5", "two", "~"] {
            let yaml = format!(
                "board: X\ncolumns:\n  - name: A\n    limit: {}\ntasks: {{}}\n",
                limit
            );
            assert_eq!(parse_err(&yaml), "columns[0].limit: must be a positive integer");
        }

        let board = parse_board_from_str(
            "board: X\ncolumns:\n  - name: A\n    limit: 2.0\ntasks: {}\n",
        )
        .unwrap();
        assert_eq!(board.columns[0].limit, Some(2));
    }

    #[test]
    fn test_tasks_must_be_mapping() {
        assert_eq!(
            parse_err("board: X\ncolumns: [A]\ntasks: [t1]\n"),
            "tasks must be an object (map of task id to task)"
        );
    }

    #[test]
    fn test_task_field_rules() {
        assert_eq!(
            parse_err("board: X\ncolumns: [A]\ntasks:\n  t1: { status: A }\n"),
            "tasks.t1: missing required field \"title\""
        );
        assert_eq!(
            parse_err("board: X\ncolumns: [A]\ntasks:\n  t1: { title: T }\n"),
            "tasks.t1: missing required field \"status\""
        );
        assert_eq!(
            parse_err("board: X\ncolumns: [A]\ntasks:\n  t1: { title: T, status: A, owner: [a] }\n"),
            "tasks.t1.owner: expected a string"
        );
        assert_eq!(
            parse_err("board: X\ncolumns: [A]\ntasks:\n  t1: { title: T, status: A, depends_on: [x, 3] }\n"),
            "tasks.t1.depends_on[1]: expected a string"
        );
        assert_eq!(
            parse_err("board: X\ncolumns: [A]\ntasks:\n  t1: { title: T, status: A, depends_on: {a: b} }\n"),
            "tasks.t1.depends_on: expected a string or array of strings"
        );
        assert_eq!(
            parse_err("board: X\ncolumns: [A]\ntasks:\n  t1: just a string\n"),
            "tasks.t1: expected an object"
        );
    }

    #[test]
    fn test_looks_like_path() {
        assert!(looks_like_path("board.yaml"));
        assert!(looks_like_path("  boards/main.yml  "));
        assert!(looks_like_path("./board"));
        assert!(!looks_like_path("board: X"));
        assert!(!looks_like_path("board.yaml\ncolumns: []"));
        assert!(!looks_like_path("   "));
    }

    #[test]
    fn test_parse_board_from_content() {
        let board = parse_board("board: From Content\ncolumns: [A]\ntasks: {}\n").unwrap();
        assert_eq!(board.name, "From Content");
    }

    #[test]
    fn test_parse_board_from_path() {
        use tempfile::tempdir;

        let temp_dir = tempdir().unwrap();
        let board_path = temp_dir.path().join("board.yaml");
        std::fs::write(
            &board_path,
            "board: Fixture Board\ncolumns: [A, B]\ntasks:\n  f1: { title: Fixture task, status: A }\n",
        )
        .unwrap();

        let board = parse_board(board_path.to_str().unwrap()).unwrap();
        assert_eq!(board.name, "Fixture Board");
        assert_eq!(board.tasks["f1"].title, "Fixture task");
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = parse_board("/nonexistent/board.yaml").unwrap_err();
        assert!(err.is_read_error());
        assert!(err.to_string().starts_with("Cannot read file \"/nonexistent/board.yaml\""));
    }

    #[test]
    fn test_malformed_file_is_not_read_error() {
        use tempfile::tempdir;

        let temp_dir = tempdir().unwrap();
        let board_path = temp_dir.path().join("bad.yaml");
        std::fs::write(&board_path, "this is not valid yaml: [[[").unwrap();

        let err = load_board(&board_path).unwrap_err();
        assert!(!err.is_read_error());
        assert!(err.to_string().starts_with("Invalid YAML"));
    }
}
