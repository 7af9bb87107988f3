//! Where Scopemark keeps its files.
//!
//! Development runs (`cargo run`, debug builds) keep everything in the
//! working directory. Installed builds use the platform folders from `dirs`:
//! `~/.config/scopemark` for settings on Linux, the application data folder
//! for everything on Windows and macOS, and the data folder for logs.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "scopemark";
const CONFIG_FILE: &str = "config.json";
const LOGS_DIR: &str = "logs";

/// Development runs are detected by cargo's `CARGO` variable or a debug build.
pub fn is_dev_mode() -> bool {
    std::env::var_os("CARGO").is_some() || cfg!(debug_assertions)
}

/// Root folders for settings and data; `None` when the platform has none.
struct Roots {
    config: Option<PathBuf>,
    data: Option<PathBuf>,
}

impl Roots {
    fn resolve() -> Self {
        if is_dev_mode() {
            return Self::local();
        }
        let data = dirs::data_dir().map(|d| d.join(APP_DIR));
        let config = if cfg!(target_os = "linux") {
            dirs::config_dir().map(|d| d.join(APP_DIR))
        } else {
            data.clone()
        };
        Self { config, data }
    }

    fn local() -> Self {
        Self {
            config: Some(PathBuf::from(".")),
            data: Some(PathBuf::from(".")),
        }
    }

    fn config_file(&self) -> PathBuf {
        under(self.config.as_deref(), CONFIG_FILE)
    }

    fn logs_dir(&self) -> PathBuf {
        under(self.data.as_deref(), LOGS_DIR)
    }
}

/// `root/name`, or a bare relative `name` without a root
fn under(root: Option<&Path>, name: &str) -> PathBuf {
    root.map_or_else(|| PathBuf::from(name), |r| r.join(name))
}

pub fn config_file() -> PathBuf {
    Roots::resolve().config_file()
}

pub fn logs_dir() -> PathBuf {
    Roots::resolve().logs_dir()
}

/// Starting folder for export/import dialogs: the user's documents folder
/// when known.
pub fn default_export_dir() -> Option<PathBuf> {
    dirs::document_dir().or_else(dirs::home_dir)
}

/// Create the settings and log folders of an installed build.
pub fn ensure_directories() -> std::io::Result<()> {
    if is_dev_mode() {
        return Ok(());
    }
    let roots = Roots::resolve();
    if let Some(config) = &roots.config {
        std::fs::create_dir_all(config)?;
    }
    std::fs::create_dir_all(roots.logs_dir())
}
