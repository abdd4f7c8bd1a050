use crate::error::{Result, TrackerError};
use crate::payload::ImagePayload;
use crate::project::Project;
use std::path::{Path, PathBuf};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Ordered list of projects backed by one JSON document.
///
/// Position in the list is the address every mutation takes. Each mutation
/// rewrites the whole document before returning.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    projects: Vec<Project>,
}

impl Store {
    /// Load the document at `path`. A missing file is an empty store; a
    /// malformed one is an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no projects file yet");
            return Ok(Self {
                path,
                projects: Vec::new(),
            });
        }
        let data = std::fs::read_to_string(&path)?;
        let projects: Vec<Project> = serde_json::from_str(&data)?;
        tracing::debug!(path = %path.display(), count = projects.len(), "projects loaded");
        Ok(Self { path, projects })
    }

    pub fn save(&self) -> Result<()> {
        let data = serde_json::to_string(&self.projects)?;
        crate::io::atomic_write(&self.path, data.as_bytes())?;
        tracing::debug!(path = %self.path.display(), count = self.projects.len(), "projects saved");
        Ok(())
    }

    // ---------------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------------

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Project> {
        self.projects
            .get(index)
            .ok_or(TrackerError::ProjectNotFound(index))
    }

    /// Current position of the project with `id`.
    pub fn index_of(&self, id: Uuid) -> Option<usize> {
        self.projects.iter().position(|p| p.id == id)
    }

    // ---------------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------------

    // A failed save puts the previous in-memory state back before returning,
    // so the list never holds a change that is not on disk.

    /// Append a project. Returns its index.
    pub fn add(&mut self, project: Project) -> Result<usize> {
        tracing::info!(title = project.display_title(), "adding project");
        self.projects.push(project);
        if let Err(e) = self.save() {
            self.projects.pop();
            return Err(e);
        }
        Ok(self.projects.len() - 1)
    }

    /// Replace the project at `index` wholesale. The stored id is kept.
    pub fn update(&mut self, index: usize, mut project: Project) -> Result<()> {
        let slot = self
            .projects
            .get_mut(index)
            .ok_or(TrackerError::ProjectNotFound(index))?;
        project.id = slot.id;
        tracing::info!(index, title = project.display_title(), "updating project");
        let previous = std::mem::replace(slot, project);
        if let Err(e) = self.save() {
            self.projects[index] = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Remove the project at `index`; later projects shift down by one.
    pub fn remove(&mut self, index: usize) -> Result<Project> {
        if index >= self.projects.len() {
            return Err(TrackerError::ProjectNotFound(index));
        }
        let removed = self.projects.remove(index);
        if let Err(e) = self.save() {
            self.projects.insert(index, removed);
            return Err(e);
        }
        tracing::info!(index, title = removed.display_title(), "removed project");
        Ok(removed)
    }

    /// Remove one image from one project; later images shift down by one.
    pub fn remove_image(&mut self, index: usize, image_index: usize) -> Result<ImagePayload> {
        let project = self
            .projects
            .get_mut(index)
            .ok_or(TrackerError::ProjectNotFound(index))?;
        if image_index >= project.images.len() {
            return Err(TrackerError::ImageNotFound {
                project: index,
                image: image_index,
            });
        }
        let removed = project.images.remove(image_index);
        if let Err(e) = self.save() {
            self.projects[index].images.insert(image_index, removed);
            return Err(e);
        }
        tracing::info!(index, image_index, "removed image");
        Ok(removed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
