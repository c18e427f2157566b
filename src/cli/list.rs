//! List CLI commands

use anyhow::{bail, Result};
use clap::Subcommand;

use super::output::Output;
use crate::domain::{Document, ListId, TaskList};
use crate::storage::{Config, FileStorage, Session};

#[derive(Subcommand)]
pub enum ListCommands {
    /// Create a list and make it current
    New {
        /// List name (must be unique)
        name: String,
    },

    /// Show all lists
    Ls,

    /// Switch the current list
    Use {
        /// List id or name
        list: String,
    },

    /// Rename a list
    Rename {
        /// List id or name
        list: String,

        /// New name (must be unique)
        name: String,
    },

    /// Set or clear a list's description
    Describe {
        /// List id or name
        list: String,

        /// Description text (empty clears it)
        #[arg(default_value = "")]
        description: String,
    },

    /// Delete a list and its tasks
    Rm {
        /// List id or name
        list: String,
    },
}

/// Resolves a list by exact id, then exact name; `None` means the current list
pub(super) fn resolve_list(doc: &Document, selector: Option<&str>) -> Result<ListId> {
    let Some(selector) = selector.map(str::trim) else {
        return match doc.current_list() {
            Some(list) => Ok(list.id.clone()),
            None => bail!("No current list"),
        };
    };

    doc.lists
        .iter()
        .find(|list| list.id.as_str() == selector)
        .or_else(|| doc.list_by_name(selector))
        .map(|list| list.id.clone())
        .ok_or_else(|| anyhow::anyhow!("List not found: {}", selector))
}

pub fn run(cmd: ListCommands, config: &Config, output: &Output) -> Result<()> {
    let mut session = Session::from_config(config)?;

    match cmd {
        ListCommands::New { name } => create(&mut session, output, &name),
        ListCommands::Ls => show_lists(session.document(), output),
        ListCommands::Use { list } => select(&mut session, output, &list),
        ListCommands::Rename { list, name } => rename(&mut session, output, &list, &name),
        ListCommands::Describe { list, description } => describe(&mut session, output, &list, &description),
        ListCommands::Rm { list } => delete(&mut session, output, &list),
    }
}

fn print_list(output: &Output, list: &TaskList, message: &str) {
    if output.is_json() {
        output.data(list);
    } else {
        output.success(message);
    }
}

fn check_name(doc: &Document, name: &str, except: Option<&ListId>) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("List name must not be empty");
    }
    if doc.name_taken(name, except) {
        bail!("A list named '{}' already exists", name);
    }
    Ok(())
}

fn create(session: &mut Session<FileStorage>, output: &Output, name: &str) -> Result<()> {
    check_name(session.document(), name, None)?;

    let outcome = session.document().create_list(name);
    if !session.commit(outcome)? {
        bail!("List was not created");
    }

    if let Some(list) = session.document().current_list() {
        print_list(output, list, &format!("Created list: {} - {}", list.id, list.name));
    }
    Ok(())
}

fn show_lists(doc: &Document, output: &Output) -> Result<()> {
    let rows: Vec<(&TaskList, usize)> = doc
        .lists
        .iter()
        .map(|list| (list, doc.tasks_by_list(&list.id).len()))
        .collect();

    if output.is_json() {
        let items: Vec<_> = rows
            .iter()
            .map(|(list, count)| {
                serde_json::json!({
                    "id": list.id,
                    "name": list.name,
                    "description": list.description,
                    "createdAt": list.created_at,
                    "taskCount": count,
                    "current": list.id == doc.current_list_id,
                })
            })
            .collect();
        output.data(&items);
    } else {
        output.list_table(&rows, doc.current_list_id.as_str());
    }

    Ok(())
}

fn select(session: &mut Session<FileStorage>, output: &Output, selector: &str) -> Result<()> {
    let list_id = resolve_list(session.document(), Some(selector))?;

    let outcome = session.document().select_list(&list_id);
    if !session.commit(outcome)? {
        log::debug!("{} is already the current list", list_id);
    }

    if let Some(list) = session.document().current_list() {
        print_list(output, list, &format!("Now using list: {}", list.name));
    }
    Ok(())
}

fn rename(session: &mut Session<FileStorage>, output: &Output, selector: &str, name: &str) -> Result<()> {
    let list_id = resolve_list(session.document(), Some(selector))?;
    check_name(session.document(), name, Some(&list_id))?;

    let outcome = session.document().rename_list(&list_id, name);
    session.commit(outcome)?;

    if let Some(list) = session.document().list(&list_id) {
        print_list(output, list, &format!("Renamed list {} to {}", list.id, list.name));
    }
    Ok(())
}

fn describe(
    session: &mut Session<FileStorage>,
    output: &Output,
    selector: &str,
    description: &str,
) -> Result<()> {
    let list_id = resolve_list(session.document(), Some(selector))?;

    let outcome = session.document().describe_list(&list_id, description);
    session.commit(outcome)?;

    if let Some(list) = session.document().list(&list_id) {
        let message = if list.description.is_empty() {
            format!("Cleared description of {}", list.name)
        } else {
            format!("Updated description of {}", list.name)
        };
        print_list(output, list, &message);
    }
    Ok(())
}

fn delete(session: &mut Session<FileStorage>, output: &Output, selector: &str) -> Result<()> {
    let list_id = resolve_list(session.document(), Some(selector))?;
    let Some(list) = session.document().list(&list_id).cloned() else {
        bail!("List not found: {}", list_id);
    };

    let outcome = session.document().delete_list(&list_id);
    if !session.commit(outcome)? {
        bail!("Cannot delete the last remaining list");
    }

    print_list(output, &list, &format!("Deleted list: {} - {}", list.id, list.name));
    Ok(())
}
