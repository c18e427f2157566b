//! Backup CLI commands

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;

use super::output::Output;
use crate::domain::{merge_imported_state, Document, MergeResult};
use crate::storage::{export_state_data, import_state_data, Config, FileStorage, Session};

#[derive(Subcommand)]
pub enum BackupCommands {
    /// Write the whole document as a backup
    Export {
        /// Output file (defaults to stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Merge a backup into the current document
    ///
    /// Imported lists and tasks are added alongside existing ones; nothing
    /// is overwritten.
    Import {
        /// Backup file
        file: PathBuf,
    },
}

pub fn run(cmd: BackupCommands, config: &Config, output: &Output) -> Result<()> {
    let mut session = Session::from_config(config)?;

    match cmd {
        BackupCommands::Export { output: path } => export(session.document(), output, path.as_deref()),
        BackupCommands::Import { file } => import(&mut session, output, &file),
    }
}

fn export(doc: &Document, output: &Output, path: Option<&Path>) -> Result<()> {
    let data = export_state_data(doc)?;

    match path {
        None => println!("{}", data),
        Some(path) => {
            fs::write(path, &data)
                .with_context(|| format!("Failed to write backup: {}", path.display()))?;
            if output.is_json() {
                output.data(&serde_json::json!({
                    "path": path.display().to_string(),
                    "lists": doc.lists.len(),
                    "tasks": doc.tasks.len(),
                }));
            } else {
                output.success(&format!(
                    "Exported {} list(s) and {} task(s) to {}",
                    doc.lists.len(),
                    doc.tasks.len(),
                    path.display()
                ));
            }
        }
    }

    Ok(())
}

fn import(session: &mut Session<FileStorage>, output: &Output, file: &Path) -> Result<()> {
    let raw = fs::read_to_string(file)
        .with_context(|| format!("Failed to read backup: {}", file.display()))?;
    let imported =
        import_state_data(&raw).with_context(|| format!("Cannot import {}", file.display()))?;

    let merged = merge_imported_state(session.document(), &imported);
    session.replace(merged.document.clone())?;
    report_merge(output, &merged);

    Ok(())
}

/// Prints a summary of an additive merge
pub(super) fn report_merge(output: &Output, merged: &MergeResult) {
    if merged.dropped_tasks > 0 {
        log::warn!(
            "Dropped {} imported task(s) without a matching list",
            merged.dropped_tasks
        );
    }

    if output.is_json() {
        output.data(&serde_json::json!({
            "addedLists": merged.added_lists,
            "addedTasks": merged.added_tasks,
            "droppedTasks": merged.dropped_tasks,
            "currentListId": merged.document.current_list_id,
        }));
    } else {
        let names: Vec<&str> = merged
            .added_lists
            .iter()
            .filter_map(|id| merged.document.list(id))
            .map(|list| list.name.as_str())
            .collect();
        output.success(&format!(
            "Imported {} list(s) and {} task(s): {}",
            merged.added_lists.len(),
            merged.added_tasks,
            names.join(", ")
        ));
    }
}
