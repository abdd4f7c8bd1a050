use crate::cmd::{load_config, open};
use crate::host::CliHost;
use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use std::path::{Path, PathBuf};
use tracker_core::controller::ImageAction;

#[derive(Subcommand)]
pub enum ImageSubcommand {
    /// Delete one image from a project
    Delete {
        /// Project index
        index: usize,
        /// Image index within the project
        image: usize,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Save an image to a file in the format its tag names
    Export {
        index: usize,
        image: usize,
        /// Destination file; an extension is added when it has none
        #[arg(long, short = 'o')]
        out: PathBuf,
    },
    /// Write an image into the data directory and show it in the file browser
    Reveal {
        index: usize,
        image: usize,
        /// Print the file path without opening a file browser
        #[arg(long)]
        no_open: bool,
    },
}

pub fn run(data_dir: &Path, subcmd: ImageSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ImageSubcommand::Delete { index, image, yes } => delete(data_dir, index, image, yes, json),
        ImageSubcommand::Export { index, image, out } => export(data_dir, index, image, out, json),
        ImageSubcommand::Reveal {
            index,
            image,
            no_open,
        } => reveal(data_dir, index, image, no_open),
    }
}

fn delete(data_dir: &Path, index: usize, image: usize, yes: bool, json: bool) -> anyhow::Result<()> {
    let config = load_config(data_dir)?;
    let mut controller = open(CliHost::new(data_dir, config).assume_yes(yes))?;
    controller
        .select(index)
        .with_context(|| format!("cannot delete image from project {index}"))?;
    let deleted = controller
        .delete_image(image)
        .with_context(|| format!("cannot delete image {image} of project {index}"))?;
    let remaining = controller.store().get(index)?.images.len();

    if json {
        print_json(&serde_json::json!({
            "index": index,
            "image": image,
            "deleted": deleted,
            "remaining": remaining,
        }))?;
    } else if deleted {
        println!("Deleted image {image} from project {index} ({remaining} left).");
    } else {
        println!("Delete cancelled.");
    }
    Ok(())
}

fn export(
    data_dir: &Path,
    index: usize,
    image: usize,
    out: PathBuf,
    json: bool,
) -> anyhow::Result<()> {
    let config = load_config(data_dir)?;
    let mut controller = open(CliHost::new(data_dir, config).save_to(Some(out)))?;
    controller
        .select(index)
        .with_context(|| format!("cannot export from project {index}"))?;
    let written = controller
        .image_action(image, ImageAction::SaveAs)
        .with_context(|| format!("failed to export image {image} of project {index}"))?;

    match (written, json) {
        (Some(path), true) => print_json(&serde_json::json!({ "path": path })),
        (Some(path), false) => {
            println!("Saved {}", path.display());
            Ok(())
        }
        (None, _) => anyhow::bail!("export cancelled"),
    }
}

fn reveal(data_dir: &Path, index: usize, image: usize, no_open: bool) -> anyhow::Result<()> {
    let config = load_config(data_dir)?;
    let mut controller = open(CliHost::new(data_dir, config).open_browser(!no_open))?;
    controller
        .select(index)
        .with_context(|| format!("cannot reveal image from project {index}"))?;
    controller
        .image_action(image, ImageAction::Reveal)
        .with_context(|| format!("failed to reveal image {image} of project {index}"))?;
    Ok(())
}
