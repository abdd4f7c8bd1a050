use crate::error::Result;
use crate::payload::ImagePayload;
use std::path::PathBuf;

/// Host-side operations the controller calls but does not implement:
/// paths, version, process control and anything that needs the user's
/// answer or the OS file browser.
pub trait Host {
    fn user_data_dir(&self) -> PathBuf;

    fn app_version(&self) -> String;

    /// Restart the application. Implementations normally do not return.
    fn relaunch(&self) -> Result<()>;

    /// `true` only on an explicit affirmative answer.
    fn confirm_delete_project(&self, index: usize) -> bool;

    /// `true` only on an explicit affirmative answer.
    fn confirm_delete_image(&self, project: usize, image: usize) -> bool;

    /// Best-effort: show the image in the OS file browser.
    fn reveal(&self, payload: &ImagePayload) -> Result<()>;

    /// Write the image to a user-chosen file. `None` when the user cancels.
    fn save_image_as(&self, payload: &ImagePayload) -> Result<Option<PathBuf>>;
}
