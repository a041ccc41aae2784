//! Logger setup and log retention
//!
//! Each run writes `latest.log`. On startup the previous run's log is
//! archived as `run-<timestamp>.log` and only the newest archives are kept.

use std::fs;
use std::fs::File;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;

use simplelog::ColorChoice;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;

use crate::paths;

const ARCHIVE_PREFIX: &str = "run-";

/// Logs to `latest.log` in the cache directory, or to stderr when that
/// directory cannot be created. `keep` archived logs from earlier runs
/// survive.
pub fn init(verbose: bool, keep: usize) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };

    let file = paths::log_file().and_then(|path| {
        let dir = path.parent()?;
        fs::create_dir_all(dir).ok()?;
        archive(&path, dir, keep);
        File::create(&path).ok()
    });

    let result = match file {
        Some(file) => WriteLogger::init(level, Config::default(), file),
        None => TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto),
    };
    if let Err(err) = result {
        eprintln!("Logging disabled: {err}");
    }
}

/// Moves the previous run's log aside and prunes archives beyond `keep`.
fn archive(latest: &Path, dir: &Path, keep: usize) {
    if latest.exists() {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        if let Err(err) = fs::rename(latest, dir.join(format!("{ARCHIVE_PREFIX}{stamp}.log"))) {
            eprintln!("Could not archive {}: {err}", latest.display());
        }
    }

    let Ok(entries) = fs::read_dir(dir) else { return };
    let archives = entries
        .filter_map(Result::ok)
        .filter(|entry| is_archive(&entry.file_name().to_string_lossy()))
        .map(|entry| {
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (entry.path(), modified)
        })
        .collect();
    for path in expired(archives, keep) {
        let _ = fs::remove_file(path);
    }
}

fn is_archive(name: &str) -> bool {
    name.starts_with(ARCHIVE_PREFIX) && name.ends_with(".log")
}

/// Archives to delete: everything but the `keep` most recent.
fn expired(mut archives: Vec<(PathBuf, SystemTime)>, keep: usize) -> Vec<PathBuf> {
    archives.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));
    archives.into_iter().skip(keep).map(|(path, _)| path).collect()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_expired_keeps_newest() {
        let archives = vec![
            (PathBuf::from("run-b.log"), at(20)),
            (PathBuf::from("run-a.log"), at(10)),
            (PathBuf::from("run-c.log"), at(30)),
        ];
        assert_eq!(expired(archives.clone(), 2), [PathBuf::from("run-a.log")]);
        assert_eq!(expired(archives.clone(), 0).len(), 3);
        assert!(expired(archives, 5).is_empty());
    }

    #[test]
    fn test_only_run_logs_are_archives() {
        assert!(is_archive("run-20240101_120000.log"));
        assert!(!is_archive("latest.log"));
        assert!(!is_archive("notes.log"));
        assert!(!is_archive("run-20240101_120000.txt"));
    }
}
