//! Task CLI commands

use anyhow::{bail, Result};
use clap::Subcommand;

use super::list::resolve_list;
use super::output::Output;
use crate::domain::{Document, ListId, Task, TaskId};
use crate::storage::{Config, FileStorage, Session};

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task to a list
    ///
    /// Examples:
    ///   tally task add "Anti-air drill"              # Current list
    ///   tally task add "Punish DP" --list "Ken Plan"  # Named list
    Add {
        /// Task title
        title: String,

        /// List id or name (defaults to the current list)
        #[arg(long, short)]
        list: Option<String>,
    },

    /// List the tasks of a list
    List {
        /// List id or name (defaults to the current list)
        list: Option<String>,

        /// Show only active tasks
        #[arg(long)]
        active: bool,
    },

    /// Increment a task's counter
    Inc {
        /// Task ID
        id: String,
    },

    /// Reset a task's counter to zero
    Reset {
        /// Task ID
        id: String,
    },

    /// Mark a task as done
    Done {
        /// Task ID
        id: String,
    },

    /// Mark a done task as active again
    Restore {
        /// Task ID
        id: String,
    },

    /// Delete a task
    Rm {
        /// Task ID
        id: String,
    },

    /// Move an active task to a new position among its list's active tasks
    Reorder {
        /// Task ID
        id: String,

        /// Zero-based target position (clamped)
        to: usize,
    },

    /// Copy tasks into another list
    Copy {
        /// Task IDs
        #[arg(required = true)]
        ids: Vec<String>,

        /// Destination list id or name
        #[arg(long)]
        to: String,
    },

    /// Move tasks into another list
    Move {
        /// Task IDs
        #[arg(required = true)]
        ids: Vec<String>,

        /// Destination list id or name
        #[arg(long)]
        to: String,
    },
}

pub fn run(cmd: TaskCommands, config: &Config, output: &Output) -> Result<()> {
    let mut session = Session::from_config(config)?;

    match cmd {
        TaskCommands::Add { title, list } => add_task(&mut session, output, &title, list.as_deref()),
        TaskCommands::List { list, active } => list_tasks(session.document(), output, list.as_deref(), active),
        TaskCommands::Inc { id } => increment(&mut session, output, &id),
        TaskCommands::Reset { id } => reset(&mut session, output, &id),
        TaskCommands::Done { id } => complete(&mut session, output, &id),
        TaskCommands::Restore { id } => restore(&mut session, output, &id),
        TaskCommands::Rm { id } => delete(&mut session, output, &id),
        TaskCommands::Reorder { id, to } => reorder(&mut session, output, &id, to),
        TaskCommands::Copy { ids, to } => transfer(&mut session, output, &ids, &to, Transfer::Copy),
        TaskCommands::Move { ids, to } => transfer(&mut session, output, &ids, &to, Transfer::Move),
    }
}

/// Looks up a task by id, failing with a readable message
fn find_task<'a>(doc: &'a Document, id_str: &str) -> Result<&'a Task> {
    let id: TaskId = id_str.parse()?;
    match doc.task(&id) {
        Some(task) => Ok(task),
        None => bail!("Task not found: {}", id),
    }
}

fn print_task(output: &Output, task: &Task, message: &str) {
    if output.is_json() {
        output.data(task);
    } else {
        output.success(message);
    }
}

fn add_task(
    session: &mut Session<FileStorage>,
    output: &Output,
    title: &str,
    list: Option<&str>,
) -> Result<()> {
    let list_id = resolve_list(session.document(), list)?;
    if title.trim().is_empty() {
        bail!("Task title must not be empty");
    }

    let outcome = session.document().add_task(title, &list_id);
    if !session.commit(outcome)? {
        bail!("Task was not added");
    }

    if let Some(task) = session.document().tasks.last() {
        print_task(output, task, &format!("Created task: {} - {}", task.id, task.title));
    }
    Ok(())
}

fn list_tasks(doc: &Document, output: &Output, list: Option<&str>, active_only: bool) -> Result<()> {
    let list_id = resolve_list(doc, list)?;
    let tasks: Vec<&Task> = doc
        .tasks_by_list(&list_id)
        .into_iter()
        .filter(|task| !active_only || task.is_active())
        .collect();

    if output.is_json() {
        output.data(&tasks);
    } else if tasks.is_empty() {
        println!("No tasks");
    } else {
        if let Some(list) = doc.list(&list_id) {
            println!("{}", list.name);
            if !list.description.is_empty() {
                println!("{}", list.description);
            }
            println!();
        }
        output.task_table(&tasks);
    }

    Ok(())
}

fn increment(session: &mut Session<FileStorage>, output: &Output, id_str: &str) -> Result<()> {
    let id = find_task(session.document(), id_str)?.id.clone();

    let outcome = session.document().inc_count(&id);
    if !session.commit(outcome)? {
        bail!("Counter of task {} is already at its maximum", id);
    }

    if let Some(task) = session.document().task(&id) {
        print_task(output, task, &format!("{}: {}", task.title, task.count));
    }
    Ok(())
}

fn reset(session: &mut Session<FileStorage>, output: &Output, id_str: &str) -> Result<()> {
    let id = find_task(session.document(), id_str)?.id.clone();

    let outcome = session.document().reset_count(&id);
    if !session.commit(outcome)? {
        log::debug!("Counter of {} was already zero", id);
    }

    if let Some(task) = session.document().task(&id) {
        print_task(output, task, &format!("Reset counter: {}", task.title));
    }
    Ok(())
}

fn complete(session: &mut Session<FileStorage>, output: &Output, id_str: &str) -> Result<()> {
    let task = find_task(session.document(), id_str)?;
    if task.is_done() {
        bail!("Task is already done: {}", task.id);
    }
    let id = task.id.clone();

    let outcome = session.document().complete_task(&id);
    session.commit(outcome)?;

    if let Some(task) = session.document().task(&id) {
        print_task(output, task, &format!("Completed task: {} - {}", task.id, task.title));
    }
    Ok(())
}

fn restore(session: &mut Session<FileStorage>, output: &Output, id_str: &str) -> Result<()> {
    let task = find_task(session.document(), id_str)?;
    if task.is_active() {
        bail!("Task is not done: {}", task.id);
    }
    let id = task.id.clone();

    let outcome = session.document().restore_task(&id);
    session.commit(outcome)?;

    if let Some(task) = session.document().task(&id) {
        print_task(output, task, &format!("Restored task: {} - {}", task.id, task.title));
    }
    Ok(())
}

fn delete(session: &mut Session<FileStorage>, output: &Output, id_str: &str) -> Result<()> {
    let task = find_task(session.document(), id_str)?.clone();

    let outcome = session.document().delete_task(&task.id);
    session.commit(outcome)?;

    print_task(output, &task, &format!("Deleted task: {} - {}", task.id, task.title));
    Ok(())
}

fn reorder(session: &mut Session<FileStorage>, output: &Output, id_str: &str, to: usize) -> Result<()> {
    let task = find_task(session.document(), id_str)?;
    if !task.is_active() {
        bail!("Only active tasks can be reordered: {}", task.id);
    }
    let (id, list_id) = (task.id.clone(), task.list_id.clone());

    let outcome = session.document().reorder_active_task(&list_id, &id, to);
    let changed = session.commit(outcome)?;

    let position = session
        .document()
        .tasks_by_list(&list_id)
        .into_iter()
        .filter(|task| task.is_active())
        .position(|task| task.id == id)
        .unwrap_or_default();

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id,
            "listId": list_id,
            "position": position,
            "changed": changed,
        }));
    } else {
        output.success(&format!("Task {} is at position {}", id, position));
    }
    Ok(())
}

#[derive(Clone, Copy)]
enum Transfer {
    Copy,
    Move,
}

fn transfer(
    session: &mut Session<FileStorage>,
    output: &Output,
    ids: &[String],
    destination: &str,
    mode: Transfer,
) -> Result<()> {
    let destination: ListId = resolve_list(session.document(), Some(destination))?;
    let ids = ids
        .iter()
        .map(|id| find_task(session.document(), id).map(|task| task.id.clone()))
        .collect::<Result<Vec<_>>>()?;

    let outcome = match mode {
        Transfer::Copy => session.document().copy_tasks_to_list(&ids, &destination),
        Transfer::Move => session.document().move_tasks_to_list(&ids, &destination),
    };
    if !session.commit(outcome)? {
        bail!("Nothing to transfer: tasks already belong to {}", destination);
    }

    let verb = match mode {
        Transfer::Copy => "Copied",
        Transfer::Move => "Moved",
    };
    if output.is_json() {
        output.data(&serde_json::json!({
            "listId": destination,
            "tasks": session.document().tasks_by_list(&destination),
        }));
    } else {
        output.success(&format!("{} {} task(s) to {}", verb, ids.len(), destination));
    }
    Ok(())
}
