mod cmd;
mod host;
mod output;

use clap::{Parser, Subcommand};
use cmd::{image::ImageSubcommand, project::FieldArgs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tracker",
    about = "Track web-development projects: contacts, vendors, status, notes and images",
    version,
    propagate_version = true
)]
struct Cli {
    /// Data directory holding projects.json (default: the platform data dir)
    #[arg(long, global = true, env = "TRACKER_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List projects
    List,

    /// Show one project
    Show { index: usize },

    /// Add a project
    Add {
        #[command(flatten)]
        fields: FieldArgs,
        /// Attach an image file (repeatable)
        #[arg(long = "image", value_name = "PATH")]
        images: Vec<PathBuf>,
    },

    /// Edit a project; omitted fields keep their value
    Edit {
        index: usize,
        #[command(flatten)]
        fields: FieldArgs,
        /// Append an image file (repeatable)
        #[arg(long = "image", value_name = "PATH")]
        images: Vec<PathBuf>,
    },

    /// Delete a project
    Delete {
        index: usize,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Delete, export or reveal project images
    Image {
        #[command(subcommand)]
        subcommand: ImageSubcommand,
    },

    /// Show where data is saved
    Path,

    /// Print the app version
    Version,

    /// Interactive session
    Shell,
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Shell => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = tracker_core::paths::resolve_data_dir(cli.data_dir.as_deref())
        .map_err(anyhow::Error::from)
        .and_then(|data_dir| run(&data_dir, cli.command, cli.json));

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(data_dir: &std::path::Path, command: Commands, json: bool) -> anyhow::Result<()> {
    match command {
        Commands::List => cmd::project::list(data_dir, json),
        Commands::Show { index } => cmd::project::show(data_dir, index, json),
        Commands::Add { fields, images } => cmd::project::add(data_dir, fields, &images, json),
        Commands::Edit {
            index,
            fields,
            images,
        } => cmd::project::edit(data_dir, index, fields, &images, json),
        Commands::Delete { index, yes } => cmd::project::delete(data_dir, index, yes, json),
        Commands::Image { subcommand } => cmd::image::run(data_dir, subcommand, json),
        Commands::Path => cmd::info::path(data_dir, json),
        Commands::Version => cmd::info::version(data_dir, json),
        Commands::Shell => cmd::shell::run(data_dir),
    }
}
