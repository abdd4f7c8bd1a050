pub mod image;
pub mod info;
pub mod project;
pub mod shell;

use crate::host::CliHost;
use anyhow::Context;
use std::future::Future;
use std::path::Path;
use tracker_core::{config::Config, controller::Controller};

pub fn load_config(data_dir: &Path) -> anyhow::Result<Config> {
    Config::load(data_dir)
        .with_context(|| format!("failed to load config from '{}'", data_dir.display()))
}

pub fn open(host: CliHost) -> anyhow::Result<Controller<CliHost>> {
    Controller::open(host).context("failed to load projects")
}

pub fn block_on<F: Future>(fut: F) -> anyhow::Result<F::Output> {
    let rt = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    Ok(rt.block_on(fut))
}
