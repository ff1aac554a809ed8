//! Report file helpers.

use std::{
    fs::{File, OpenOptions},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use time::{macros::format_description, OffsetDateTime};

fn make_unique_report_path(dir: &Path, now: OffsetDateTime, extension: &str) -> Option<PathBuf> {
    let date_format = format_description!("[year]-[month]-[day]-[hour][minute][second]");
    let formatted_date = now.format(&date_format).ok()?;

    let p = dir.join(format!("sched-sim-{}.{}", formatted_date, extension));

    if !p.exists() {
        return Some(p);
    }

    for c in 'a'..='z' {
        let p = dir.join(format!("sched-sim-{}-{}.{}", formatted_date, c, extension));

        if !p.exists() {
            return Some(p);
        }
    }

    None
}

/// Returns a timestamped report path in `dir` that does not exist yet.
pub fn unique_report_path<P: AsRef<Path>>(dir: P, extension: &str) -> Result<PathBuf> {
    let dir = dir.as_ref();
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());

    match make_unique_report_path(dir, now, extension) {
        Some(p) => Ok(p),
        None => bail!("Could not find a free report file name in {}", dir.display()),
    }
}

/// Create `path` for writing. Fails if it already exists.
pub fn create_report_file<P: AsRef<Path>>(path: P) -> Result<File> {
    let path = path.as_ref();

    if path.exists() {
        bail!("File {} already exists", path.display());
    }

    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .with_context(|| format!("Cannot create {}", path.display()))
}
