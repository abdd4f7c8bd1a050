use crate::error::{Result, TrackerError};
use crate::payload::ImagePayload;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// ProjectStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[default]
    #[serde(rename = "None", alias = "")]
    None,
    #[serde(rename = "To-Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Canceled")]
    Canceled,
    #[serde(rename = "Done")]
    Done,
}

impl ProjectStatus {
    pub fn all() -> &'static [ProjectStatus] {
        &[
            ProjectStatus::None,
            ProjectStatus::ToDo,
            ProjectStatus::InProgress,
            ProjectStatus::Canceled,
            ProjectStatus::Done,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::None => "None",
            ProjectStatus::ToDo => "To-Do",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Canceled => "Canceled",
            ProjectStatus::Done => "Done",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = TrackerError;

    /// Accepts the display labels as well as the usual CLI spellings
    /// (`todo`, `in-progress`, `cancelled`).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "" | "none" => Ok(ProjectStatus::None),
            "todo" => Ok(ProjectStatus::ToDo),
            "inprogress" => Ok(ProjectStatus::InProgress),
            "canceled" | "cancelled" => Ok(ProjectStatus::Canceled),
            "done" => Ok(ProjectStatus::Done),
            _ => Err(TrackerError::InvalidField {
                field: "project_status",
                value: s.to_string(),
                reason: "expected one of None, To-Do, In Progress, Canceled, Done".to_string(),
            }),
        }
    }
}

fn status_or_none<'de, D>(deserializer: D) -> std::result::Result<ProjectStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ProjectStatus>::deserialize(deserializer)?.unwrap_or_default())
}

fn images_or_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<ImagePayload>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ImagePayload>>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// State / district
// ---------------------------------------------------------------------------

/// US states, DC and the inhabited territories.
pub const STATE_CODES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY", "AS", "GU", "MP", "PR", "VI",
];

/// Normalize a state field. Blank or `None` clears it.
pub fn normalize_state(input: &str) -> Result<Option<String>> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    let code = trimmed.to_ascii_uppercase();
    if STATE_CODES.contains(&code.as_str()) {
        Ok(Some(code))
    } else {
        Err(TrackerError::InvalidField {
            field: "state",
            value: input.to_string(),
            reason: "not a US state or territory code".to_string(),
        })
    }
}

/// Normalize a district number: up to two ASCII digits.
pub fn normalize_district(input: &str) -> Result<Option<String>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.len() <= 2 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        Ok(Some(trimmed.to_string()))
    } else {
        Err(TrackerError::InvalidField {
            field: "district_number",
            value: input.to_string(),
            reason: "expected at most two digits".to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Stable identity. Records written before ids existed get one on load.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staging_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prod_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(default, deserialize_with = "status_or_none")]
    pub project_status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drupal_version: Option<String>,
    /// Rich text, stored as HTML.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district_number: Option<String>,
    #[serde(default, deserialize_with = "images_or_empty")]
    pub images: Vec<ImagePayload>,
}

impl Project {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: Some(title.into()),
            contact: None,
            vendor: None,
            vendor_contact: None,
            designer: None,
            production_person: None,
            dev_url: None,
            staging_url: None,
            prod_url: None,
            project_type: None,
            project_status: ProjectStatus::None,
            drupal_version: None,
            notes: None,
            state: None,
            district_number: None,
            images: Vec::new(),
        }
    }

    /// Title for list display; untitled records show an empty string.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// ProjectForm
// ---------------------------------------------------------------------------

/// Raw add/edit form values. Every field is the string the user typed;
/// blank means "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectForm {
    pub title: String,
    pub contact: String,
    pub vendor: String,
    pub vendor_contact: String,
    pub designer: String,
    pub production_person: String,
    pub drupal_version: String,
    pub dev_url: String,
    pub staging_url: String,
    pub prod_url: String,
    pub project_type: String,
    pub project_status: String,
    pub notes: String,
    pub state: String,
    pub district_number: String,
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn optional(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

impl ProjectForm {
    /// Prefill the form from an existing record.
    pub fn from_project(project: &Project) -> Self {
        Self {
            title: text(&project.title),
            contact: text(&project.contact),
            vendor: text(&project.vendor),
            vendor_contact: text(&project.vendor_contact),
            designer: text(&project.designer),
            production_person: text(&project.production_person),
            drupal_version: text(&project.drupal_version),
            dev_url: text(&project.dev_url),
            staging_url: text(&project.staging_url),
            prod_url: text(&project.prod_url),
            project_type: text(&project.project_type),
            project_status: project.project_status.to_string(),
            notes: text(&project.notes),
            state: text(&project.state),
            district_number: text(&project.district_number),
        }
    }

    /// Build a record from the form. `base` is the record being edited, whose
    /// id and images carry over; `None` creates a fresh record.
    pub fn into_project(self, base: Option<&Project>) -> Result<Project> {
        if self.title.trim().is_empty() {
            return Err(TrackerError::MissingField("title"));
        }
        let project_status: ProjectStatus = self.project_status.parse()?;
        let state = normalize_state(&self.state)?;
        let district_number = normalize_district(&self.district_number)?;

        Ok(Project {
            id: base.map(|p| p.id).unwrap_or_else(Uuid::new_v4),
            title: Some(self.title),
            contact: optional(self.contact),
            vendor: optional(self.vendor),
            vendor_contact: optional(self.vendor_contact),
            designer: optional(self.designer),
            production_person: optional(self.production_person),
            dev_url: optional(self.dev_url),
            staging_url: optional(self.staging_url),
            prod_url: optional(self.prod_url),
            project_type: optional(self.project_type),
            project_status,
            drupal_version: optional(self.drupal_version),
            notes: optional(self.notes),
            state,
            district_number,
            images: base.map(|p| p.images.clone()).unwrap_or_default(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
