use crate::cmd::{block_on, load_config, open};
use crate::host::CliHost;
use crate::output::{print_detail, print_json, print_list};
use anyhow::Context;
use clap::Args;
use std::path::{Path, PathBuf};
use tracker_core::project::ProjectForm;

/// Form fields shared by `add` and `edit`. Omitted flags leave the field as
/// it was (blank for a new project).
#[derive(Args, Debug, Default, Clone)]
pub struct FieldArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub contact: Option<String>,
    #[arg(long)]
    pub vendor: Option<String>,
    #[arg(long)]
    pub vendor_contact: Option<String>,
    #[arg(long)]
    pub designer: Option<String>,
    #[arg(long)]
    pub production_person: Option<String>,
    #[arg(long)]
    pub dev_url: Option<String>,
    #[arg(long)]
    pub staging_url: Option<String>,
    #[arg(long)]
    pub prod_url: Option<String>,
    #[arg(long)]
    pub project_type: Option<String>,
    /// None, To-Do, In Progress, Canceled or Done
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub drupal_version: Option<String>,
    /// Notes (HTML allowed)
    #[arg(long)]
    pub notes: Option<String>,
    /// Two-letter US state or territory code
    #[arg(long)]
    pub state: Option<String>,
    /// District number (up to two digits)
    #[arg(long)]
    pub district: Option<String>,
}

impl FieldArgs {
    pub fn apply(self, form: &mut ProjectForm) {
        let pairs = [
            (self.title, &mut form.title),
            (self.contact, &mut form.contact),
            (self.vendor, &mut form.vendor),
            (self.vendor_contact, &mut form.vendor_contact),
            (self.designer, &mut form.designer),
            (self.production_person, &mut form.production_person),
            (self.dev_url, &mut form.dev_url),
            (self.staging_url, &mut form.staging_url),
            (self.prod_url, &mut form.prod_url),
            (self.project_type, &mut form.project_type),
            (self.status, &mut form.project_status),
            (self.drupal_version, &mut form.drupal_version),
            (self.notes, &mut form.notes),
            (self.state, &mut form.state),
            (self.district, &mut form.district_number),
        ];
        for (value, slot) in pairs {
            if let Some(v) = value {
                *slot = v;
            }
        }
    }
}

pub fn list(data_dir: &Path, json: bool) -> anyhow::Result<()> {
    let config = load_config(data_dir)?;
    let controller = open(CliHost::new(data_dir, config))?;
    let items = controller.render_list();
    if json {
        print_json(&items)
    } else {
        print_list(&items);
        Ok(())
    }
}

pub fn show(data_dir: &Path, index: usize, json: bool) -> anyhow::Result<()> {
    let config = load_config(data_dir)?;
    let mut controller = open(CliHost::new(data_dir, config))?;
    let view = controller
        .select(index)
        .with_context(|| format!("cannot show project {index}"))?;
    if json {
        print_json(&view)
    } else {
        print_detail(&view);
        Ok(())
    }
}

pub fn add(
    data_dir: &Path,
    fields: FieldArgs,
    images: &[PathBuf],
    json: bool,
) -> anyhow::Result<()> {
    let config = load_config(data_dir)?;
    let mut controller = open(CliHost::new(data_dir, config))?;
    let mut form = controller.begin_add().form;
    fields.apply(&mut form);

    let index = block_on(controller.submit(form, images))?.context("failed to add project")?;
    let project = controller.store().get(index)?;

    if json {
        print_json(&serde_json::json!({
            "index": index,
            "id": project.id,
            "title": project.display_title(),
            "images": project.images.len(),
        }))?;
    } else {
        println!("Added project {index}: {}", project.display_title());
    }
    Ok(())
}

pub fn edit(
    data_dir: &Path,
    index: usize,
    fields: FieldArgs,
    images: &[PathBuf],
    json: bool,
) -> anyhow::Result<()> {
    let config = load_config(data_dir)?;
    let mut controller = open(CliHost::new(data_dir, config))?;
    controller
        .select(index)
        .with_context(|| format!("cannot edit project {index}"))?;
    let mut form = controller.begin_edit()?.form;
    fields.apply(&mut form);

    let index = block_on(controller.submit(form, images))?
        .with_context(|| format!("failed to update project {index}"))?;
    let project = controller.store().get(index)?;

    if json {
        print_json(&serde_json::json!({
            "index": index,
            "id": project.id,
            "title": project.display_title(),
            "images": project.images.len(),
        }))?;
    } else {
        println!("Updated project {index}: {}", project.display_title());
    }
    Ok(())
}

pub fn delete(data_dir: &Path, index: usize, yes: bool, json: bool) -> anyhow::Result<()> {
    let config = load_config(data_dir)?;
    let mut controller = open(CliHost::new(data_dir, config).assume_yes(yes))?;
    controller
        .select(index)
        .with_context(|| format!("cannot delete project {index}"))?;
    let deleted = controller.delete_project()?;

    if json {
        print_json(&serde_json::json!({ "index": index, "deleted": deleted }))?;
    } else if deleted {
        println!("Deleted project {index}.");
    } else {
        println!("Delete cancelled.");
    }
    Ok(())
}
