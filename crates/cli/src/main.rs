//! Storyboard CLI - drive a headless workspace from JSON.
//!
//! Runs command scripts against an in-memory store and prints the resulting
//! objects, selection and camera. Useful for reproducing canvas behavior
//! without a window.

mod images;
mod logger;

use anyhow::{Context, Result};
use api::{Command, MemoryStore, Query};
use canvas::HeadlessSurface;
use clap::{Parser, Subcommand};
use images::ImageResolver;
use log::LevelFilter;
use logger::CliLogger;
use node::CanvasObject;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use storyboard::{execute_command, execute_query, Workspace, WorkspaceConfig};

type HeadlessWorkspace = Workspace<HeadlessSurface, MemoryStore>;

/// Storyboard CLI - run canvas workspace scripts
#[derive(Parser)]
#[command(name = "storyboard")]
#[command(about = "Headless driver for the storyboard canvas workspace")]
struct Cli {
    /// Workspace config (JSON). Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Objects to load before running (JSON array).
    #[arg(short, long, global = true)]
    objects: Option<PathBuf>,

    /// Directory image sources are resolved against.
    #[arg(long, global = true)]
    images: Option<PathBuf>,

    /// off, error, warn, info, debug or trace
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Also append log lines to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a script of commands and print the final state
    Run {
        /// JSON file: an array of commands, or `{ "commands": [...], "queries": [...] }`
        script: PathBuf,
    },

    /// Read commands and queries from stdin, one JSON value per line
    Repl,

    /// List the keyboard bindings
    Keys,

    /// Print the effective config
    Config,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Script {
    Commands(Vec<Command>),
    Full {
        #[serde(default)]
        commands: Vec<Command>,
        #[serde(default)]
        queries: Vec<Query>,
    },
}

/// Everything `run` prints.
#[derive(Serialize)]
struct RunReport {
    results: Vec<api::CommandResult>,
    queries: Vec<api::QueryResult>,
    objects: Vec<CanvasObject>,
    selection: Vec<node::ObjectId>,
    viewport: canvas::Viewport,
    tool: canvas::Tool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level: LevelFilter = cli
        .log_level
        .parse()
        .map_err(|_| anyhow::anyhow!("Unknown log level: {}", cli.log_level))?;
    CliLogger::init(level, cli.log_file.clone())?;

    let config = match &cli.config {
        Some(path) => WorkspaceConfig::from_path(path)?,
        None => WorkspaceConfig::default(),
    };

    match &cli.command {
        Commands::Run { script } => run_script(&cli, config, script),
        Commands::Repl => repl(&cli, config),
        Commands::Keys => print_keys(config),
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn open_workspace(cli: &Cli, config: WorkspaceConfig) -> Result<HeadlessWorkspace> {
    let store = match &cli.objects {
        Some(path) => MemoryStore::with_objects(load_objects(path)?),
        None => MemoryStore::new(),
    };
    let mut workspace = Workspace::new(HeadlessSurface::new(), store, config)?;
    resolve_images(cli, &mut workspace);
    Ok(workspace)
}

fn load_objects(path: &Path) -> Result<Vec<CanvasObject>> {
    let json =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read objects from {}", path.display()))?;
    let objects: Vec<CanvasObject> =
        serde_json::from_str(&json).with_context(|| format!("Invalid objects in {}", path.display()))?;
    log::info!("loaded {} object(s) from {}", objects.len(), path.display());
    Ok(objects)
}

/// Settle every outstanding image request, then replay whatever the surface raised.
fn settle(cli: &Cli, workspace: &mut HeadlessWorkspace) {
    resolve_images(cli, workspace);
    for event in workspace.surface_mut().take_events() {
        workspace.handle_surface_event(event);
    }
}

fn resolve_images(cli: &Cli, workspace: &mut HeadlessWorkspace) {
    let requests = workspace.take_image_requests();
    let Some(root) = &cli.images else {
        if !requests.is_empty() {
            log::debug!("no image directory; {} image(s) keep their placeholder", requests.len());
        }
        return;
    };
    let resolver = ImageResolver::new(root);
    for request in requests {
        let result = resolver.resolve(&request.src);
        workspace.complete_image_load(request.id, &request.src, result);
    }
}

fn run_script(cli: &Cli, config: WorkspaceConfig, path: &Path) -> Result<()> {
    let json = std::fs::read_to_string(path).with_context(|| format!("Failed to read script {}", path.display()))?;
    let (commands, queries) = match serde_json::from_str::<Script>(&json).with_context(|| "Invalid script JSON")? {
        Script::Commands(commands) => (commands, Vec::new()),
        Script::Full { commands, queries } => (commands, queries),
    };

    let mut workspace = open_workspace(cli, config)?;
    let mut results = Vec::with_capacity(commands.len());
    for command in commands {
        let result = execute_command(&mut workspace, command);
        if let api::CommandResult::Error { message } = &result {
            log::warn!("command failed: {message}");
        }
        results.push(result);
        settle(cli, &mut workspace);
    }

    let report = RunReport {
        results,
        queries: queries.iter().map(|q| execute_query(&workspace, q)).collect(),
        objects: workspace.objects().to_vec(),
        selection: workspace.selection().ids(),
        viewport: *workspace.viewport(),
        tool: workspace.tool(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn repl(cli: &Cli, config: WorkspaceConfig) -> Result<()> {
    let mut workspace = open_workspace(cli, config)?;
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let output = match input {
            "help" | "?" => {
                print_help();
                continue;
            }
            "quit" | "exit" => break,
            "objects" => serde_json::to_value(execute_query(&workspace, &Query::GetAllObjects))?,
            "selection" => serde_json::to_value(execute_query(&workspace, &Query::GetSelection))?,
            "layers" => serde_json::to_value(execute_query(&workspace, &Query::GetLayers))?,
            _ if input.starts_with("key ") => {
                let keystroke = input.trim_start_matches("key ").trim();
                match workspace.handle_keystroke(keystroke) {
                    Ok(action) => serde_json::json!({ "action": action }),
                    Err(err) => serde_json::json!({ "error": err.to_string() }),
                }
            }
            _ => {
                if let Ok(command) = serde_json::from_str::<Command>(input) {
                    serde_json::to_value(execute_command(&mut workspace, command))?
                } else if let Ok(query) = serde_json::from_str::<Query>(input) {
                    serde_json::to_value(execute_query(&workspace, &query))?
                } else {
                    serde_json::json!({ "error": "not a command or query" })
                }
            }
        };
        settle(cli, &mut workspace);
        writeln!(stdout, "{}", serde_json::to_string(&output)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn print_help() {
    println!("Storyboard REPL");
    println!("===============");
    println!();
    println!("Built-in commands:");
    println!("  objects       - All objects on the canvas");
    println!("  selection     - Current selection");
    println!("  layers        - Layers panel rows");
    println!("  key <stroke>  - Press a keystroke, e.g. key cmd-d");
    println!("  help, ?       - Show this help");
    println!("  quit, exit    - Exit");
    println!();
    println!("JSON Commands (examples):");
    println!("  {{\"type\": \"create\", \"kind\": \"note\"}}");
    println!("  {{\"type\": \"move\", \"target\": \"selection\", \"delta\": [10, 0]}}");
    println!("  {{\"type\": \"edit_field\", \"field\": \"opacity\", \"value\": \"50\"}}");
    println!();
    println!("JSON Queries:");
    println!("  {{\"type\": \"get_viewport\"}}");
    println!("  {{\"type\": \"get_inspector\"}}");
}

fn print_keys(config: WorkspaceConfig) -> Result<()> {
    let keymap = config.keymap()?;
    for (keystroke, action) in keymap.bindings() {
        println!("{:<12} {:<20} {}", keystroke.to_string(), action.to_string(), action.description());
    }
    Ok(())
}
