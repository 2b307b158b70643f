//! Plain-text board summary for terminals, chat, and docs.

use std::fmt::Write;

use super::model::{Board, Task};

/// Renders a deterministic text summary of the board.
///
/// Sections: board name, per-column task counts, columns at or over their
/// WIP limit, the task list (column order, then id), and one `Blocked:` line
/// per task waiting on a dependency outside the last column. The result
/// always ends with exactly one newline.
pub fn summarize(board: &Board) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("Board: {}", board.name));
    lines.push(String::new());

    let columns = board
        .columns
        .iter()
        .map(|c| format!("{} ({})", c.name, board.task_count(&c.name)))
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!("Columns: {}", columns));

    for column in &board.columns {
        if let Some(limit) = column.limit.filter(|l| *l >= 1) {
            let count = board.task_count(&column.name);
            if count >= limit {
                lines.push(format!("  {} at WIP limit ({}/{})", column.name, count, limit));
            }
        }
    }

    lines.push(String::new());
    lines.push("Tasks:".to_string());

    let sorted = sorted_tasks(board);
    if sorted.is_empty() {
        lines.push("  (none)".to_string());
    }
    for (id, task) in sorted {
        lines.push(format!("  {} [{}] {}", id, task.status, task.title));
    }

    let blocked = blocked_tasks(board);
    if !blocked.is_empty() {
        lines.push(String::new());
        for (id, unmet) in blocked {
            lines.push(format!("Blocked: {} (depends on {})", id, unmet.join(", ")));
        }
    }

    let mut out = String::new();
    for line in lines {
        let _ = writeln!(out, "{}", line);
    }
    out
}

/// Tasks ordered by column position, then id. Unknown statuses sort last.
fn sorted_tasks(board: &Board) -> Vec<(&String, &Task)> {
    let mut tasks: Vec<(&String, &Task)> = board.tasks.iter().collect();
    tasks.sort_by(|(id_a, a), (id_b, b)| {
        let rank_a = board.column_index(&a.status).unwrap_or(usize::MAX);
        let rank_b = board.column_index(&b.status).unwrap_or(usize::MAX);
        rank_a.cmp(&rank_b).then_with(|| id_a.cmp(id_b))
    });
    tasks
}

/// Tasks with at least one existing dependency not yet in the last column,
/// paired with those unmet dependency ids. Follows task insertion order.
fn blocked_tasks(board: &Board) -> Vec<(&str, Vec<&str>)> {
    let done = board.last_column().map(|c| c.name.as_str()).unwrap_or("");

    board
        .tasks
        .iter()
        .filter_map(|(id, task)| {
            let unmet: Vec<&str> = task
                .dependencies()
                .iter()
                .filter(|dep| {
                    board
                        .get_task(dep)
                        .is_some_and(|target| target.status != done)
                })
                .map(String::as_str)
                .collect();
            (!unmet.is_empty()).then_some((id.as_str(), unmet))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::model::Column;
    use crate::board::parser::parse_board_from_str;

    fn canonical(name: &str) -> Board {
        Board::new(
            name,
            ["Backlog", "Ready", "In Progress", "Done"]
                .into_iter()
                .map(Column::new)
                .collect(),
        )
    }

    #[test]
    fn test_full_layout() {
        let yaml = r#"
board: "Summary Test"
columns: [Backlog, Ready, In Progress, Done]
tasks:
  T2:
    title: "Second task"
    status: Done
  T1:
    title: "First task"
    status: Backlog
"#;
        let board = parse_board_from_str(yaml).unwrap();
        assert_eq!(
            summarize(&board),
            "Board: Summary Test\n\
             \n\
             Columns: Backlog (1), Ready (0), In Progress (0), Done (1)\n\
             \n\
             Tasks:\n  \
             T1 [Backlog] First task\n  \
             T2 [Done] Second task\n"
        );
    }

    #[test]
    fn test_empty_tasks_render_none() {
        let out = summarize(&canonical("Empty"));
        assert!(out.starts_with("Board: Empty\n"));
        assert!(out.ends_with("Tasks:\n  (none)\n"));
        assert!(!out.ends_with("\n\n"));
    }

    #[test]
    fn test_wip_limit_line() {
        let mut board = canonical("WIP")
            .with_task("t1", Task::new("A", "In Progress"))
            .with_task("t2", Task::new("B", "In Progress"));
        board.columns[2] = Column::new("In Progress").with_limit(2);
        board.columns[0] = Column::new("Backlog").with_limit(5);

        let out = summarize(&board);
        assert!(out.contains("\n  In Progress at WIP limit (2/2)\n"));
        assert!(!out.contains("Backlog at WIP limit"));
    }

    #[test]
    fn test_sort_by_column_then_id() {
        let board = canonical("Sort")
            .with_task("b", Task::new("B", "Ready"))
            .with_task("z", Task::new("Z", "Backlog"))
            .with_task("lost", Task::new("Lost", "Review"))
            .with_task("a", Task::new("A", "Ready"));

        let out = summarize(&board);
        let task_lines: Vec<&str> = out
            .lines()
            .skip_while(|l| *l != "Tasks:")
            .skip(1)
            .collect();
        assert_eq!(
            task_lines,
            vec![
                "  z [Backlog] Z",
                "  a [Ready] A",
                "  b [Ready] B",
                "  lost [Review] Lost",
            ]
        );
    }

    #[test]
    fn test_repeated_column_ranks_by_last_position() {
        let columns = ["A", "B", "A"].into_iter().map(Column::new).collect();
        let board = Board::new("Repeat", columns)
            .with_task("x", Task::new("X", "A"))
            .with_task("y", Task::new("Y", "B"));

        let out = summarize(&board);
        let task_lines: Vec<&str> = out
            .lines()
            .skip_while(|l| *l != "Tasks:")
            .skip(1)
            .collect();
        assert_eq!(task_lines, vec!["  y [B] Y", "  x [A] X"]);
    }

    #[test]
    fn test_blocked_lines() {
        let board = canonical("Blocked")
            .with_task("t1", Task::new("First", "Backlog"))
            .with_task("t0", Task::new("Zero", "Done"))
            .with_task(
                "t2",
                Task::new("Second", "Backlog")
                    .depends_on("t1")
                    .depends_on("t0")
                    .depends_on("ghost"),
            );

        let out = summarize(&board);
        assert!(out.ends_with("  t2 [Backlog] Second\n  t0 [Done] Zero\n\nBlocked: t2 (depends on t1)\n"));
    }

    #[test]
    fn test_no_blocked_when_dependencies_done() {
        let board = canonical("Unblocked")
            .with_task("t1", Task::new("First", "Done"))
            .with_task("t2", Task::new("Second", "Backlog").depends_on("t1"));

        assert!(!summarize(&board).contains("Blocked:"));
    }
}
