use crate::cmd::{load_config, open};
use crate::host::{prompt, CliHost};
use crate::output::{print_detail, print_list};
use anyhow::{anyhow, Context};
use std::path::{Path, PathBuf};
use tracker_core::controller::{Controller, ImageAction};
use tracker_core::project::ProjectForm;

const HELP: &str = "\
commands:
  list                 list projects
  show N               show project N
  hide                 close the detail pane
  add                  add a project (prompts for each field)
  edit                 edit the shown project
  delete               delete the shown project
  image-delete J       delete image J of the shown project
  reveal J             show image J in the file browser
  save J               save image J to a file
  restart              restart the tracker
  path                 where data is saved
  quit                 leave the shell";

/// Interactive session: one controller for the whole run, re-rendering the
/// list after every change.
pub fn run(data_dir: &Path) -> anyhow::Result<()> {
    let config = load_config(data_dir)?;
    let mut controller = open(CliHost::new(data_dir, config).interactive(true))?;
    let rt = tokio::runtime::Runtime::new().context("failed to start async runtime")?;

    println!("{}", controller.footer());
    print_list(&controller.render_list());

    while let Some(line) = prompt("> ") {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let arg = words.next();

        let result = match command {
            "quit" | "exit" => break,
            "help" | "?" => {
                println!("{HELP}");
                Ok(())
            }
            "list" | "ls" => {
                print_list(&controller.render_list());
                Ok(())
            }
            "show" | "select" => show(&mut controller, arg),
            "hide" => {
                controller.hide();
                Ok(())
            }
            "add" => {
                let form = controller.begin_add().form;
                fill_and_submit(&mut controller, &rt, form)
            }
            "edit" => match controller.begin_edit() {
                Ok(view) => fill_and_submit(&mut controller, &rt, view.form),
                Err(e) => Err(e.into()),
            },
            "delete" => delete_project(&mut controller),
            "image-delete" => delete_image(&mut controller, arg),
            "reveal" => parse_index(arg).and_then(|j| {
                controller.image_action(j, ImageAction::Reveal)?;
                Ok(())
            }),
            "save" => parse_index(arg).and_then(|j| {
                match controller.image_action(j, ImageAction::SaveAs)? {
                    Some(path) => println!("Saved {}", path.display()),
                    None => println!("Save cancelled."),
                }
                Ok(())
            }),
            "restart" => controller.restart().map_err(Into::into),
            "path" => {
                println!("{}", controller.footer());
                Ok(())
            }
            other => Err(anyhow!("unknown command '{other}' (try 'help')")),
        };

        if let Err(e) = result {
            eprintln!("error: {e:#}");
        }
    }
    Ok(())
}

fn parse_index(arg: Option<&str>) -> anyhow::Result<usize> {
    let arg = arg.ok_or_else(|| anyhow!("missing index"))?;
    arg.parse()
        .with_context(|| format!("'{arg}' is not a valid index"))
}

fn show(controller: &mut Controller<CliHost>, arg: Option<&str>) -> anyhow::Result<()> {
    let index = parse_index(arg)?;
    let view = controller.select(index)?;
    print_detail(&view);
    Ok(())
}

fn delete_project(controller: &mut Controller<CliHost>) -> anyhow::Result<()> {
    if controller.delete_project()? {
        println!("Deleted.");
        print_list(&controller.render_list());
    } else {
        println!("Delete cancelled.");
    }
    Ok(())
}

fn delete_image(controller: &mut Controller<CliHost>, arg: Option<&str>) -> anyhow::Result<()> {
    let image = parse_index(arg)?;
    if controller.delete_image(image)? {
        if let Some(view) = controller.current_view() {
            print_detail(&view);
        }
    } else {
        println!("Delete cancelled.");
    }
    Ok(())
}

/// Prompt for every field, showing the current value. A blank answer keeps
/// it, `-` clears it. Returns `None` when stdin closes mid-form.
fn fill_form(form: &mut ProjectForm) -> Option<Vec<PathBuf>> {
    let fields = [
        ("Title", &mut form.title),
        ("Contact", &mut form.contact),
        ("Vendor", &mut form.vendor),
        ("Vendor Contact", &mut form.vendor_contact),
        ("Designer", &mut form.designer),
        ("Production Person", &mut form.production_person),
        ("Drupal Version", &mut form.drupal_version),
        ("Dev URL", &mut form.dev_url),
        ("Staging URL", &mut form.staging_url),
        ("Prod URL", &mut form.prod_url),
        ("Project Type", &mut form.project_type),
        (
            "Project Status (None/To-Do/In Progress/Canceled/Done)",
            &mut form.project_status,
        ),
        ("Notes", &mut form.notes),
        ("State", &mut form.state),
        ("District", &mut form.district_number),
    ];
    for (label, slot) in fields {
        let answer = prompt(&format!("{label} [{slot}]: "))?;
        match answer.trim() {
            "" => {}
            "-" => slot.clear(),
            _ => *slot = answer.clone(),
        }
    }

    let images = prompt("Images (comma-separated paths): ")?;
    Some(
        images
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect(),
    )
}

fn fill_and_submit(
    controller: &mut Controller<CliHost>,
    rt: &tokio::runtime::Runtime,
    mut form: ProjectForm,
) -> anyhow::Result<()> {
    let Some(attachments) = fill_form(&mut form) else {
        controller.hide();
        return Err(anyhow!("input closed, form discarded"));
    };
    let index = rt
        .block_on(controller.submit(form, &attachments))
        .context("project not saved")?;
    println!("Saved project {index}.");
    print_list(&controller.render_list());
    Ok(())
}
