use crate::error::{Result, TrackerError};
use crate::host::Host;
use crate::paths;
use crate::payload;
use crate::project::ProjectForm;
use crate::render::{self, DetailView, FormView, ListItem};
use crate::store::Store;
use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Pane
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    New,
    Existing(usize),
}

/// What the detail pane is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Hidden,
    Viewing(usize),
    Editing(EditTarget),
}

impl fmt::Display for Pane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pane::Hidden => f.write_str("no project is selected"),
            Pane::Viewing(i) => write!(f, "viewing project {i}"),
            Pane::Editing(EditTarget::New) => f.write_str("adding a project"),
            Pane::Editing(EditTarget::Existing(i)) => write!(f, "editing project {i}"),
        }
    }
}

/// Right-click actions on a displayed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageAction {
    Reveal,
    SaveAs,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Drives the detail pane. All project changes go through the store, and
/// every view is re-read from the store after a mutation.
pub struct Controller<H: Host> {
    store: Store,
    host: H,
    pane: Pane,
}

impl<H: Host> Controller<H> {
    pub fn new(store: Store, host: H) -> Self {
        Self {
            store,
            host,
            pane: Pane::Hidden,
        }
    }

    /// Load `projects.json` from the host's data directory.
    pub fn open(host: H) -> Result<Self> {
        let store = Store::load(paths::projects_path(&host.user_data_dir()))?;
        Ok(Self::new(store, host))
    }

    pub fn pane(&self) -> Pane {
        self.pane
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn render_list(&self) -> Vec<ListItem> {
        render::render_list(self.store.projects())
    }

    /// Status line: where data lives and which version is running.
    pub fn footer(&self) -> String {
        format!(
            "Data saved in: {} (v{})",
            self.host.user_data_dir().display(),
            self.host.app_version()
        )
    }

    /// The detail view for the pane, when it is showing a project.
    pub fn current_view(&self) -> Option<DetailView> {
        match self.pane {
            Pane::Viewing(i) => self
                .store
                .get(i)
                .ok()
                .map(|p| render::render_detail(i, p)),
            _ => None,
        }
    }

    // ---------------------------------------------------------------------------
    // Transitions
    // ---------------------------------------------------------------------------

    pub fn select(&mut self, index: usize) -> Result<DetailView> {
        let project = self.store.get(index)?;
        let view = render::render_detail(index, project);
        self.pane = Pane::Viewing(index);
        Ok(view)
    }

    pub fn hide(&mut self) {
        self.pane = Pane::Hidden;
    }

    pub fn begin_add(&mut self) -> FormView {
        self.pane = Pane::Editing(EditTarget::New);
        render::render_form(None)
    }

    pub fn begin_edit(&mut self) -> Result<FormView> {
        let Pane::Viewing(index) = self.pane else {
            return Err(self.invalid("edit"));
        };
        let view = render::render_form(Some(self.store.get(index)?));
        self.pane = Pane::Editing(EditTarget::Existing(index));
        Ok(view)
    }

    /// Commit the open form. Attachments are resolved concurrently and the
    /// record is written only once every one of them has been read; any
    /// failure leaves the store untouched and the form open.
    ///
    /// Returns the index of the committed project.
    pub async fn submit(&mut self, form: ProjectForm, attachments: &[PathBuf]) -> Result<usize> {
        let Pane::Editing(target) = self.pane else {
            return Err(self.invalid("submit a form"));
        };
        let base = match target {
            EditTarget::New => None,
            EditTarget::Existing(i) => Some(self.store.get(i)?.clone()),
        };
        let mut project = form.into_project(base.as_ref())?;

        let resolved = payload::resolve_attachments(attachments).await?;
        project.images.extend(resolved);

        let index = match (target, base) {
            (EditTarget::Existing(i), Some(base)) => {
                let index = self
                    .store
                    .index_of(base.id)
                    .ok_or(TrackerError::ProjectNotFound(i))?;
                self.store.update(index, project)?;
                index
            }
            _ => self.store.add(project)?,
        };
        self.pane = Pane::Hidden;
        Ok(index)
    }

    /// Delete the viewed project after the host confirms. Returns whether the
    /// delete happened.
    pub fn delete_project(&mut self) -> Result<bool> {
        let Pane::Viewing(index) = self.pane else {
            return Err(self.invalid("delete a project"));
        };
        self.store.get(index)?;
        if !self.host.confirm_delete_project(index) {
            tracing::debug!(index, "project delete declined");
            return Ok(false);
        }
        self.store.remove(index)?;
        self.pane = Pane::Hidden;
        Ok(true)
    }

    /// Delete one image of the viewed project after the host confirms. The
    /// pane keeps showing the project.
    pub fn delete_image(&mut self, image_index: usize) -> Result<bool> {
        let Pane::Viewing(index) = self.pane else {
            return Err(self.invalid("delete an image"));
        };
        let project = self.store.get(index)?;
        if image_index >= project.images.len() {
            return Err(TrackerError::ImageNotFound {
                project: index,
                image: image_index,
            });
        }
        if !self.host.confirm_delete_image(index, image_index) {
            tracing::debug!(index, image_index, "image delete declined");
            return Ok(false);
        }
        self.store.remove_image(index, image_index)?;
        self.pane = Pane::Viewing(index);
        Ok(true)
    }

    /// Route a right-click on an image of the viewed project to the host.
    /// Returns the written path for a completed save-as.
    pub fn image_action(&self, image_index: usize, action: ImageAction) -> Result<Option<PathBuf>> {
        let Pane::Viewing(index) = self.pane else {
            return Err(self.invalid("open an image menu"));
        };
        let image = self
            .store
            .get(index)?
            .images
            .get(image_index)
            .ok_or(TrackerError::ImageNotFound {
                project: index,
                image: image_index,
            })?;
        match action {
            ImageAction::Reveal => {
                self.host.reveal(image)?;
                Ok(None)
            }
            ImageAction::SaveAs => self.host.save_image_as(image),
        }
    }

    /// Ask the host to restart. Nothing to flush: every mutation is already
    /// on disk.
    pub fn restart(&self) -> Result<()> {
        self.host.relaunch()
    }

    fn invalid(&self, action: &'static str) -> TrackerError {
        TrackerError::InvalidTransition {
            action,
            pane: self.pane.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::ImagePayload;
    use crate::project::Project;
    use std::cell::{Cell, RefCell};
    use std::path::Path;
    use tempfile::TempDir;

    struct FakeHost {
        dir: PathBuf,
        answer: Cell<bool>,
        asked: RefCell<Vec<String>>,
        relaunched: Cell<bool>,
    }

    impl FakeHost {
        fn new(dir: &Path, answer: bool) -> Self {
            Self {
                dir: dir.to_path_buf(),
                answer: Cell::new(answer),
                asked: RefCell::new(Vec::new()),
                relaunched: Cell::new(false),
            }
        }
    }

    impl Host for FakeHost {
        fn user_data_dir(&self) -> PathBuf {
            self.dir.clone()
        }

        fn app_version(&self) -> String {
            "1.2.3".to_string()
        }

        fn relaunch(&self) -> Result<()> {
            self.relaunched.set(true);
            Ok(())
        }

        fn confirm_delete_project(&self, index: usize) -> bool {
            self.asked.borrow_mut().push(format!("project {index}"));
            self.answer.get()
        }

        fn confirm_delete_image(&self, project: usize, image: usize) -> bool {
            self.asked
                .borrow_mut()
                .push(format!("image {project}/{image}"));
            self.answer.get()
        }

        fn reveal(&self, _payload: &ImagePayload) -> Result<()> {
            self.asked.borrow_mut().push("reveal".to_string());
            Ok(())
        }

        fn save_image_as(&self, payload: &ImagePayload) -> Result<Option<PathBuf>> {
            let dest = self.dir.join("saved");
            payload::export(payload, &dest, "png").map(Some)
        }
    }

    fn controller(dir: &TempDir, answer: bool, titles: &[&str]) -> Controller<FakeHost> {
        let mut c = Controller::open(FakeHost::new(dir.path(), answer)).unwrap();
        for t in titles {
            c.begin_add();
            let form = ProjectForm {
                title: t.to_string(),
                ..Default::default()
            };
            futures::executor::block_on(c.submit(form, &[])).unwrap();
        }
        c
    }

    fn write_images(dir: &TempDir, names: &[&str]) -> Vec<PathBuf> {
        names
            .iter()
            .enumerate()
            .map(|(n, name)| {
                let path = dir.path().join(name);
                // Different sizes so the reads finish at different times.
                std::fs::write(&path, vec![n as u8; 1 + n * 4096]).unwrap();
                path
            })
            .collect()
    }

    #[test]
    fn starts_hidden_and_selects() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir, true, &["A", "B"]);
        assert_eq!(c.pane(), Pane::Hidden);
        let view = c.select(1).unwrap();
        assert_eq!(view.title, "B");
        assert_eq!(c.pane(), Pane::Viewing(1));
    }

    #[test]
    fn select_out_of_range_keeps_pane() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir, true, &["A"]);
        c.select(0).unwrap();
        assert!(matches!(c.select(4), Err(TrackerError::ProjectNotFound(4))));
        assert_eq!(c.pane(), Pane::Viewing(0));
    }

    #[test]
    fn selecting_twice_renders_identically() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir, true, &["A"]);
        let first = c.select(0).unwrap();
        let second = c.select(0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn edit_requires_viewing() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir, true, &["A"]);
        assert!(matches!(
            c.begin_edit(),
            Err(TrackerError::InvalidTransition { .. })
        ));
        c.select(0).unwrap();
        let form = c.begin_edit().unwrap();
        assert_eq!(form.form.title, "A");
        assert_eq!(c.pane(), Pane::Editing(EditTarget::Existing(0)));
    }

    #[tokio::test]
    async fn add_submit_appends_and_hides() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir, true, &["A"]);
        c.begin_add();
        let form = ProjectForm {
            title: "New".to_string(),
            vendor: "Vend".to_string(),
            ..Default::default()
        };
        let index = c.submit(form, &[]).await.unwrap();
        assert_eq!(index, 1);
        assert_eq!(c.pane(), Pane::Hidden);
        assert_eq!(c.render_list()[1].title, "New");

        let reopened = Store::load(paths::projects_path(dir.path())).unwrap();
        assert_eq!(reopened.len(), 2);
    }

    #[tokio::test]
    async fn submit_without_form_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir, true, &[]);
        let result = c.submit(ProjectForm::default(), &[]).await;
        assert!(matches!(
            result,
            Err(TrackerError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn edit_with_attachments_appends_all_of_them() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir, true, &["A"]);

        // Seed one existing image through a first edit.
        c.select(0).unwrap();
        let seed = write_images(&dir, &["seed.png"]);
        let form = c.begin_edit().unwrap().form;
        c.submit(form, &seed).await.unwrap();

        c.select(0).unwrap();
        let form = c.begin_edit().unwrap().form;
        let attachments = write_images(&dir, &["one.png", "two.jpg", "three.webp"]);
        c.submit(form, &attachments).await.unwrap();

        let images = &c.store().get(0).unwrap().images;
        assert_eq!(images.len(), 4);
        let tags: Vec<String> = images[1..].iter().map(|i| i.format_tag()).collect();
        assert_eq!(tags, vec!["png", "jpeg", "webp"]);
        assert_eq!(images[3].decode().unwrap().len(), 1 + 2 * 4096);
    }

    #[tokio::test]
    async fn failed_attachment_commits_nothing() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir, true, &["A"]);
        c.select(0).unwrap();
        let mut form = c.begin_edit().unwrap().form;
        form.title = "Renamed".to_string();

        let mut attachments = write_images(&dir, &["ok.png"]);
        attachments.push(dir.path().join("missing.png"));
        assert!(c.submit(form, &attachments).await.is_err());

        assert_eq!(c.pane(), Pane::Editing(EditTarget::Existing(0)));
        let reopened = Store::load(paths::projects_path(dir.path())).unwrap();
        assert_eq!(reopened.get(0).unwrap().display_title(), "A");
        assert!(reopened.get(0).unwrap().images.is_empty());
    }

    #[tokio::test]
    async fn missing_title_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir, true, &[]);
        c.begin_add();
        let result = c.submit(ProjectForm::default(), &[]).await;
        assert!(matches!(result, Err(TrackerError::MissingField("title"))));
        assert!(c.store().is_empty());
    }

    #[test]
    fn declined_delete_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir, false, &["A", "B"]);
        c.select(1).unwrap();
        assert!(!c.delete_project().unwrap());
        assert_eq!(c.store().len(), 2);
        assert_eq!(c.pane(), Pane::Viewing(1));
        assert_eq!(c.host().asked.borrow().as_slice(), ["project 1"]);
    }

    #[test]
    fn confirmed_delete_removes_and_hides() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir, true, &["A", "B", "C"]);
        c.select(1).unwrap();
        assert!(c.delete_project().unwrap());
        assert_eq!(c.pane(), Pane::Hidden);
        let titles: Vec<String> = c.render_list().into_iter().map(|i| i.title).collect();
        assert_eq!(titles, vec!["A", "C"]);
    }

    #[test]
    fn delete_image_keeps_viewing() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir, true, &[]);
        let mut p = Project::new("A");
        p.images.push(ImagePayload::from_bytes(b"0", "image/png"));
        p.images.push(ImagePayload::from_bytes(b"1", "image/png"));
        c.store.add(p).unwrap();

        c.select(0).unwrap();
        assert!(c.delete_image(0).unwrap());
        assert_eq!(c.pane(), Pane::Viewing(0));
        let view = c.current_view().unwrap();
        assert_eq!(view.images.len(), 1);
        assert_eq!(
            c.store().get(0).unwrap().images[0].decode().unwrap(),
            b"1"
        );
    }

    #[test]
    fn declined_image_delete_keeps_image() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir, false, &[]);
        let mut p = Project::new("A");
        p.images.push(ImagePayload::from_bytes(b"0", "image/png"));
        c.store.add(p).unwrap();

        c.select(0).unwrap();
        assert!(!c.delete_image(0).unwrap());
        assert_eq!(c.store().get(0).unwrap().images.len(), 1);
        assert!(matches!(
            c.delete_image(3),
            Err(TrackerError::ImageNotFound { .. })
        ));
    }

    #[test]
    fn image_actions_route_to_host() {
        let dir = TempDir::new().unwrap();
        let mut c = controller(&dir, true, &[]);
        let mut p = Project::new("A");
        p.images.push(ImagePayload::from_bytes(b"raw", "image/png"));
        c.store.add(p).unwrap();

        assert!(c.image_action(0, ImageAction::Reveal).is_err());
        c.select(0).unwrap();
        assert_eq!(c.image_action(0, ImageAction::Reveal).unwrap(), None);
        assert_eq!(c.host().asked.borrow().last().unwrap(), "reveal");

        let saved = c.image_action(0, ImageAction::SaveAs).unwrap().unwrap();
        assert_eq!(saved, dir.path().join("saved.png"));
        assert_eq!(std::fs::read(saved).unwrap(), b"raw");
    }

    #[test]
    fn restart_delegates_and_footer_reports() {
        let dir = TempDir::new().unwrap();
        let c = controller(&dir, true, &[]);
        c.restart().unwrap();
        assert!(c.host().relaunched.get());
        assert!(c.footer().contains("Data saved in:"));
        assert!(c.footer().contains("v1.2.3"));
    }
}
