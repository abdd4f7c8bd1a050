//! View models for the project list and the detail pane.
//!
//! Every function here is a pure function of the store contents, so
//! rendering the same project twice yields the same view.

use crate::project::{Project, ProjectForm, ProjectStatus};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub index: usize,
    pub title: String,
    pub status: ProjectStatus,
    pub image_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageView {
    pub index: usize,
    pub format: String,
    /// Encoded size of the data URL.
    pub encoded_len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailView {
    pub index: usize,
    pub title: String,
    pub fields: Vec<Field>,
    /// Notes as stored (HTML).
    pub notes: String,
    pub images: Vec<ImageView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub heading: &'static str,
    pub submit_label: &'static str,
    pub form: ProjectForm,
    pub status_options: Vec<&'static str>,
    pub existing_images: usize,
}

pub fn render_list(projects: &[Project]) -> Vec<ListItem> {
    projects
        .iter()
        .enumerate()
        .map(|(index, p)| ListItem {
            index,
            title: p.display_title().to_string(),
            status: p.project_status,
            image_count: p.images.len(),
        })
        .collect()
}

fn field(label: &'static str, value: &Option<String>) -> Field {
    Field {
        label,
        value: value.clone().unwrap_or_default(),
    }
}

pub fn render_detail(index: usize, project: &Project) -> DetailView {
    let fields = vec![
        field("Contact", &project.contact),
        field("Vendor", &project.vendor),
        field("Vendor Contact", &project.vendor_contact),
        field("Designer", &project.designer),
        field("Production Person", &project.production_person),
        field("Dev URL", &project.dev_url),
        field("Staging URL", &project.staging_url),
        field("Prod URL", &project.prod_url),
        field("Project Type", &project.project_type),
        Field {
            label: "Project Status",
            value: project.project_status.to_string(),
        },
        field("Drupal Version", &project.drupal_version),
        field("State", &project.state),
        field("District", &project.district_number),
    ];

    DetailView {
        index,
        title: project.display_title().to_string(),
        fields,
        notes: project.notes.clone().unwrap_or_default(),
        images: project
            .images
            .iter()
            .enumerate()
            .map(|(i, img)| ImageView {
                index: i,
                format: img.format_tag(),
                encoded_len: img.as_str().len(),
            })
            .collect(),
    }
}

/// Form for a new project (`None`) or prefilled from an existing one.
pub fn render_form(project: Option<&Project>) -> FormView {
    let (heading, submit_label) = match project {
        Some(_) => ("Edit Project", "Save Project"),
        None => ("Add Project", "Add Project"),
    };
    let mut form = project.map(ProjectForm::from_project).unwrap_or_default();
    if project.is_none() {
        form.project_status = ProjectStatus::ToDo.to_string();
    }
    FormView {
        heading,
        submit_label,
        form,
        status_options: ProjectStatus::all().iter().map(|s| s.as_str()).collect(),
        existing_images: project.map(|p| p.images.len()).unwrap_or(0),
    }
}

/// Drop HTML tags and decode the handful of entities a rich-text editor
/// emits, for terminal display.
pub fn plain_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut tag = String::new();
    for c in html.chars() {
        match (in_tag, c) {
            (false, '<') => {
                in_tag = true;
                tag.clear();
            }
            (true, '>') => {
                in_tag = false;
                let name = tag
                    .trim_start_matches('/')
                    .split_whitespace()
                    .next()
                    .unwrap_or("")
                    .to_ascii_lowercase();
                if matches!(name.as_str(), "br" | "br/" | "p" | "div" | "li") && !out.ends_with('\n')
                {
                    out.push('\n');
                }
            }
            (true, c) => tag.push(c),
            (false, c) => out.push(c),
        }
    }
    out.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}
