use clap::{Parser, Subcommand};
use itertools::Itertools;
use kairo::prelude::*;
use std::fs;

/// A workbench CLI for inspecting and editing persisted call-flow graphs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory holding the persisted flow state
    #[arg(short, long, default_value = ".kairo")]
    dir: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize the directory with the default starter flow
    Init,
    /// Print a summary of the persisted flow
    Inspect,
    /// Parse an action batch (or a full assistant reply) and list what it
    /// would do, without touching the flow
    ValidateActions {
        /// Path to the batch JSON or assistant reply text
        path: String,
    },
    /// Apply an action batch to the persisted flow
    Apply {
        /// Path to the batch JSON or assistant reply text
        path: String,
    },
    /// Snapshot the persisted flow into the backup ring
    Backup,
    /// List retained backups, newest first
    Backups,
    /// Restore a backup by ID
    Restore { backup_id: String },
    /// Export the persisted flow as JSON to stdout
    Export,
    /// Import a flow document, replacing the persisted flow
    Import {
        /// Path to the exported flow JSON
        path: String,
    },
}

fn main() {
    let cli = Cli::parse();
    let mut storage = FileStorage::new(&cli.dir);

    match cli.command {
        Command::Init => {
            let store = FlowStore::new();
            persist(&store, &mut storage)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to write flow: {}", e)));
            println!(
                "Initialized flow in '{}' ({} nodes, {} edges)",
                cli.dir,
                store.nodes().len(),
                store.edges().len()
            );
        }
        Command::Inspect => {
            let store = rehydrate(&storage);
            println!("Nodes: {}", store.nodes().len());
            println!("Edges: {}", store.edges().len());
            for node in store.nodes() {
                println!(
                    "  {} [{}] \"{}\" at ({}, {}) with {} transitions{}",
                    node.id,
                    node.kind,
                    node.config.label,
                    node.position.x,
                    node.position.y,
                    node.config.transitions.len(),
                    if node.protected { " (protected)" } else { "" }
                );
            }
            for edge in store.edges() {
                println!("  {}: {} -> {}", edge.id, edge.source, edge.target);
            }
        }
        Command::ValidateActions { path } => {
            let actions = load_actions(&path);
            println!("{} action(s):", actions.len());
            println!(
                "{}",
                actions
                    .iter()
                    .map(|action| format!("  - {}", action.describe()))
                    .join("\n")
            );
        }
        Command::Apply { path } => {
            let actions = load_actions(&path);
            let mut store = rehydrate(&storage);
            let report = apply_actions(&mut store, &actions);
            persist(&store, &mut storage)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to write flow: {}", e)));
            println!(
                "Applied {} action(s), skipped {}",
                report.applied, report.skipped
            );
            if !report.created_node_ids.is_empty() {
                println!("Created nodes: {}", report.created_node_ids.iter().join(", "));
            }
        }
        Command::Backup => {
            let store = rehydrate(&storage);
            let id = BackupManager::new()
                .create_backup(&store, &mut storage)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to create backup: {}", e)));
            println!("Created backup {}", id);
        }
        Command::Backups => {
            let records = BackupManager::new().backups(&storage);
            if records.is_empty() {
                println!("No backups.");
            }
            for record in records {
                println!(
                    "  {} ({} nodes, {} edges)",
                    record.id, record.node_count, record.edge_count
                );
            }
        }
        Command::Restore { backup_id } => {
            let mut store = rehydrate(&storage);
            if !BackupManager::new().restore_backup(&mut store, &storage, &backup_id) {
                exit_with_error(&format!("No restorable backup with ID '{}'", backup_id));
            }
            persist(&store, &mut storage)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to write flow: {}", e)));
            println!("Restored backup {}", backup_id);
        }
        Command::Export => {
            let store = rehydrate(&storage);
            println!("{}", store.export_snapshot());
        }
        Command::Import { path } => {
            let document = fs::read_to_string(&path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to read '{}': {}", path, e))
            });
            let mut store = rehydrate(&storage);
            if !store.import_snapshot(&document) {
                exit_with_error("Import rejected: not a valid flow document");
            }
            persist(&store, &mut storage)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to write flow: {}", e)));
            println!(
                "Imported flow ({} nodes, {} edges)",
                store.nodes().len(),
                store.edges().len()
            );
        }
    }
}

/// Reads a file as either a bare JSON action array or a full assistant reply
/// carrying `HUMAN_EXPLANATION:` / `ACTIONS:` sections.
fn load_actions(path: &str) -> Vec<WorkflowAction> {
    let text = fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read '{}': {}", path, e)));

    if let Some(proposal) = parse_assistant_reply(&text) {
        if !proposal.explanation.is_empty() {
            println!("{}\n", proposal.explanation);
        }
        return proposal.actions;
    }

    parse_actions(&text)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse action batch: {}", e)))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
