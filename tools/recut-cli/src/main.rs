//! Recut CLI: create, inspect and edit projects from the shell.
//!
//! Usage:
//!   recut init <NAME>                    Create an empty project
//!   recut list                           List projects in the projects directory
//!   recut info <PROJECT>                 Show project information
//!   recut validate <PROJECT>             Check a project for structural problems
//!   recut analyze <PROJECT>              Regenerate the automatic zoom schedule
//!   recut map <PROJECT> <MS>             Map an instant between time domains
//!   recut split <PROJECT> <WINDOW>       Split an output window
//!   recut remove-window <PROJECT> <ID>   Delete an output window
//!
//! `<PROJECT>` is a project directory, or the name of a project inside the
//! configured projects directory.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use recut_common::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "recut",
    about = "Non-destructive screen recording editor",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Time domain of an instant given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TimeDomain {
    /// Position in the original recording
    Source,
    /// Position in the edited result
    Output,
    /// Position on the on-screen ruler
    Timeline,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project
    Init {
        /// Project name (also the directory name)
        name: String,

        /// Parent directory (defaults to the configured projects directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Length of the screen recording in milliseconds
        #[arg(long, default_value = "60000")]
        duration_ms: f64,

        /// Capture width
        #[arg(long, default_value = "1920")]
        width: u32,

        /// Capture height
        #[arg(long, default_value = "1080")]
        height: u32,
    },

    /// List projects in the projects directory
    List,

    /// Show project information
    Info {
        /// Project directory or name
        project: String,
    },

    /// Check a project for structural problems
    Validate {
        /// Project directory or name
        project: String,
    },

    /// Regenerate the automatic zoom schedule from recorded events
    Analyze {
        /// Project directory or name
        project: String,

        /// Override the maximum zoom factor
        #[arg(long)]
        max_zoom: Option<f64>,

        /// Print the schedule without saving it
        #[arg(long)]
        dry_run: bool,
    },

    /// Map an instant between source, output and timeline time
    Map {
        /// Project directory or name
        project: String,

        /// Instant in milliseconds
        time_ms: f64,

        /// Domain of the given instant
        #[arg(long, value_enum, default_value = "output")]
        from: TimeDomain,

        /// Print the frame state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Split an output window in two
    Split {
        /// Project directory or name
        project: String,

        /// Window id
        window: String,

        /// Split point in source time
        #[arg(long, conflicts_with = "output", required_unless_present = "output")]
        source: Option<f64>,

        /// Split point in output time
        #[arg(long)]
        output: Option<f64>,
    },

    /// Delete an output window
    RemoveWindow {
        /// Project directory or name
        project: String,

        /// Window id
        window: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
        None => AppConfig::load(),
    };

    recut_common::logging::init_logging(&config.logging, cli.verbose);

    match cli.command {
        Commands::Init {
            name,
            output,
            duration_ms,
            width,
            height,
        } => {
            let parent = output.unwrap_or_else(|| config.projects_dir.clone());
            commands::init::run(name, parent, duration_ms, width, height)
        }
        Commands::List => commands::list::run(&config),
        Commands::Info { project } => commands::info::run(&project, &config),
        Commands::Validate { project } => commands::validate::run(&project, &config),
        Commands::Analyze {
            project,
            max_zoom,
            dry_run,
        } => commands::analyze::run(&project, &config, max_zoom, dry_run),
        Commands::Map {
            project,
            time_ms,
            from,
            json,
        } => commands::map::run(&project, &config, time_ms, from, json),
        Commands::Split {
            project,
            window,
            source,
            output,
        } => commands::split::run(&project, &config, &window, source, output),
        Commands::RemoveWindow { project, window } => {
            commands::remove_window::run(&project, &config, &window)
        }
    }
}
