//! Debug-build log sink: stdout plus a per-session section in
//! `scopemark.log` under [`crate::paths::logs_dir`].

use std::path::Path;

const LOG_FILE: &str = "scopemark.log";
const DEFAULT_FILTER: &str = "info,scopemark=debug";

/// Header written above each session's log lines
fn session_banner(started: &str) -> String {
    let rule = "=".repeat(80);
    format!("\n\n{rule}\n=== Scopemark session {started} ===\n{rule}\n")
}

fn append_banner(log_file: &Path) {
    use std::io::Write;

    let Ok(mut file) = std::fs::OpenOptions::new().append(true).open(log_file) else {
        // first run: the appender creates the file
        return;
    };
    let started = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let _ = write!(file, "{}", session_banner(&started));
}

/// Install the tracing subscriber. The returned guard flushes the file
/// writer and must live until exit.
#[cfg(debug_assertions)]
pub fn init() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let dir = crate::paths::logs_dir();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("Logging to stdout only, cannot create {:?}: {}", dir, e);
        return None;
    }
    append_banner(&dir.join(LOG_FILE));

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(&dir, LOG_FILE));

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .with(fmt::layer().with_writer(std::io::stdout))
        .init();

    Some(guard)
}

/// Release builds keep bevy's own `LogPlugin` output.
#[cfg(not(debug_assertions))]
pub fn init() -> Option<()> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_names_session_start() {
        let banner = session_banner("2026-01-02 03:04:05");
        assert!(banner.contains("=== Scopemark session 2026-01-02 03:04:05 ==="));
        assert_eq!(banner.lines().filter(|l| l.len() == 80).count(), 2);
    }

    #[test]
    fn test_banner_appended_to_existing_log() {
        let dir = std::env::temp_dir().join(format!("scopemark_log_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join(LOG_FILE);
        std::fs::write(&file, "previous line\n").unwrap();

        append_banner(&file);
        let contents = std::fs::read_to_string(&file).unwrap();
        assert!(contents.starts_with("previous line\n"));
        assert!(contents.contains("Scopemark session"));

        // a missing file is left for the appender to create
        append_banner(&dir.join("absent.log"));
        assert!(!dir.join("absent.log").exists());

        let _ = std::fs::remove_dir_all(dir);
    }
}
