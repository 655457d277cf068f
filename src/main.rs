//! Fim - a vim-like text editor
//! Main entry point

use anyhow::{Context as _, Result};
use clap::Parser;
use fim::config::Config;
use fim::constants::paths;
use fim::context::ContextRegistry;
use fim::document::Document;
use fim::editor::Editor;
use fim::layout::LayoutType;
use fim::logging::{self, LogConfig};
use fim::state::EditorState;
use fim::term::crossterm::CrosstermBackend;
use std::path::PathBuf;

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "fim", version, about = "A vim-like editor that speaks your keyboard layout")]
struct Cli {
    /// File to open; created on first write if it does not exist
    file: Option<PathBuf>,
    /// Config file to load instead of the user config
    #[arg(short = 'u', long = "config", env = "FIM_CONFIG")]
    config: Option<PathBuf>,
    /// Keyboard layout: qwerty, dvorak, colemak, or a layout file
    #[arg(long)]
    layout: Option<LayoutType>,
    /// Log file, or directory for the log file
    #[arg(long, env = "FIM_LOG_FILE")]
    log_file: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let _log_guard = match logging::init(LogConfig {
        log_file_path: cli.log_file.clone(),
    }) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {e}");
            None
        }
    };

    let state = match build_state(&cli) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "startup failed");
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    };

    let backend = match CrosstermBackend::new() {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Failed to create terminal backend: {e}");
            std::process::exit(1);
        }
    };

    let mut editor = Editor::new(backend, state);
    let result = editor.run();
    // Restore the terminal before printing anything
    drop(editor);

    if let Err(e) = result {
        tracing::error!(error = %e, "editor exited with an error");
        eprintln!("Editor error: {e}");
        std::process::exit(1);
    }
}

/// Load config, layout and document as the command line asks
fn build_state(cli: &Cli) -> Result<EditorState> {
    let registry = ContextRegistry::default();
    let mut config = Config::builtin_with(&registry).context("built-in bindings are invalid")?;

    let config_path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => user_config_path().filter(|path| path.is_file()),
    };
    if let Some(path) = &config_path {
        config
            .extend_from_file(path, &registry)
            .with_context(|| format!("failed to load config {}", path.display()))?;
    }

    if let Some(layout) = &cli.layout {
        // Layout files named on the command line are relative to the working directory
        let cwd = std::env::current_dir().context("failed to read the working directory")?;
        config.options_mut().layout = layout.resolved(&cwd);
    }

    let document = match &cli.file {
        Some(path) => Document::load(path)
            .with_context(|| format!("failed to open {}", path.display()))?,
        None => Document::new(),
    };

    let mut state = EditorState::new(config, registry, document);
    state.set_config_path(config_path);
    state
        .sync_options()
        .context("failed to apply options")?;
    Ok(state)
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(paths::APP_DIR).join(paths::CONFIG_FILE))
}
