use crate::host::CliHost;
use crate::output::print_json;
use std::path::Path;
use tracker_core::{config::Config, host::Host, paths};

/// Print where data lives.
pub fn path(data_dir: &Path, json: bool) -> anyhow::Result<()> {
    let projects = paths::projects_path(data_dir);
    let config = paths::config_path(data_dir);
    if json {
        print_json(&serde_json::json!({
            "data_dir": data_dir,
            "projects_file": projects,
            "config_file": config,
        }))
    } else {
        println!("Data saved in: {}", data_dir.display());
        println!("  projects: {}", projects.display());
        println!("  config:   {}", config.display());
        Ok(())
    }
}

pub fn version(data_dir: &Path, json: bool) -> anyhow::Result<()> {
    let version = CliHost::new(data_dir, Config::default()).app_version();
    if json {
        print_json(&serde_json::json!({ "version": version }))
    } else {
        println!("{version}");
        Ok(())
    }
}
