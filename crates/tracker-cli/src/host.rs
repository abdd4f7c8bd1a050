use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracker_core::{
    config::Config, host::Host, paths, payload, payload::ImagePayload, Result,
};

/// Terminal implementation of the host boundary.
///
/// Confirmations are asked on stderr and answered on stdin; only `y`/`yes`
/// counts as agreement. Save-as uses `save_to` when given, otherwise it asks
/// for a path when interactive and cancels when not.
pub struct CliHost {
    data_dir: PathBuf,
    config: Config,
    assume_yes: bool,
    interactive: bool,
    save_to: Option<PathBuf>,
    open_browser: bool,
}

impl CliHost {
    pub fn new(data_dir: &Path, config: Config) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            config,
            assume_yes: false,
            interactive: false,
            save_to: None,
            open_browser: true,
        }
    }

    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn save_to(mut self, dest: Option<PathBuf>) -> Self {
        self.save_to = dest;
        self
    }

    pub fn open_browser(mut self, open: bool) -> Self {
        self.open_browser = open;
        self
    }

    fn confirm(&self, question: &str) -> bool {
        if self.assume_yes || !self.config.confirm_deletes {
            return true;
        }
        match prompt(&format!("{question} [y/N] ")) {
            Some(answer) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            None => false,
        }
    }
}

/// Print `label` to stderr and read one line from stdin. `None` on EOF.
pub fn prompt(label: &str) -> Option<String> {
    eprint!("{label}");
    let _ = std::io::stderr().flush();
    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}

fn content_stem(payload: &ImagePayload) -> String {
    use std::hash::{DefaultHasher, Hash, Hasher};
    let mut hasher = DefaultHasher::new();
    payload.hash(&mut hasher);
    format!("image-{:016x}", hasher.finish())
}

impl Host for CliHost {
    fn user_data_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }

    fn app_version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn relaunch(&self) -> Result<()> {
        let exe = std::env::current_exe()?;
        tracing::info!(exe = %exe.display(), "relaunching");
        std::process::Command::new(exe)
            .args(std::env::args_os().skip(1))
            .spawn()?;
        std::process::exit(0);
    }

    fn confirm_delete_project(&self, _index: usize) -> bool {
        self.confirm("Are you sure you want to delete this project?")
    }

    fn confirm_delete_image(&self, _project: usize, _image: usize) -> bool {
        self.confirm("Are you sure you want to delete this image?")
    }

    fn reveal(&self, payload: &ImagePayload) -> Result<()> {
        let dir = paths::images_dir(&self.data_dir);
        let path = payload::materialize(payload, &dir, &content_stem(payload))?;
        println!("{}", path.display());
        if self.open_browser {
            if let Err(e) = open::that(&dir) {
                tracing::warn!(dir = %dir.display(), "could not open file browser: {e}");
            }
        }
        Ok(())
    }

    fn save_image_as(&self, payload: &ImagePayload) -> Result<Option<PathBuf>> {
        let dest = match &self.save_to {
            Some(dest) => dest.clone(),
            None if self.interactive => match prompt("Save image as: ") {
                Some(p) if !p.trim().is_empty() => PathBuf::from(p.trim()),
                _ => return Ok(None),
            },
            None => return Ok(None),
        };
        payload::export(payload, &dest, &self.config.default_export_format).map(Some)
    }
}
