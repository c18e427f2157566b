//! Output formatting for CLI commands

use serde::Serialize;

use crate::domain::{Task, TaskList};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Prints a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "message": message
                    })
                );
            }
        }
    }

    /// Prints structured data
    pub fn data<T: Serialize>(&self, data: &T) {
        let json = match self.format {
            OutputFormat::Text => serde_json::to_string_pretty(data),
            OutputFormat::Json => serde_json::to_string(data),
        };
        if let Ok(json) = json {
            println!("{}", json);
        }
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Prints a task table (text only)
    pub fn task_table(&self, tasks: &[&Task]) {
        println!("{:<4} {:<36} {:<7} {:>5}  TITLE", "#", "ID", "STATUS", "COUNT");
        println!("{}", "-".repeat(72));
        for (index, task) in tasks.iter().enumerate() {
            println!(
                "{:<4} {:<36} {:<7} {:>5}  {}",
                index,
                task.id,
                task.status.as_str(),
                task.count,
                task.title
            );
        }
    }

    /// Prints a list table (text only), marking the current list
    pub fn list_table(&self, lists: &[(&TaskList, usize)], current: &str) {
        println!("  {:<36} {:>5}  NAME", "ID", "TASKS");
        println!("{}", "-".repeat(60));
        for (list, count) in lists {
            let marker = if list.id.as_str() == current { "*" } else { " " };
            println!("{} {:<36} {:>5}  {}", marker, list.id, count, list.name);
        }
    }
}
