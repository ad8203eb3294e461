use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::NaiveDate;
use tempfile::NamedTempFile;

use crate::formats::Schedule;

pub fn schedule_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}.json", date.format("%Y-%m-%d")))
}

/// Writes the schedule next to `path` and renames it into place, so the target
/// is either the previous file or the complete new one.
pub fn write_schedule(path: &Path, schedule: &Schedule, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("schedule output already exists: {}", path.display());
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create schedule dir: {}", dir.display()))?;

    let mut data = serde_json::to_vec_pretty(schedule).context("serialize schedule json")?;
    data.push(b'\n');

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("create temp schedule in: {}", dir.display()))?;
    tmp.write_all(&data)
        .with_context(|| format!("write temp schedule: {}", tmp.path().display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("sync temp schedule: {}", tmp.path().display()))?;

    let persisted = if force {
        tmp.persist(path)
    } else {
        tmp.persist_noclobber(path)
    };
    persisted
        .map_err(|err| err.error)
        .with_context(|| format!("move schedule into place: {}", path.display()))?;

    Ok(())
}

pub fn read_schedule(path: &Path) -> anyhow::Result<Schedule> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read schedule: {}", path.display()))?;
    let schedule = serde_json::from_str(&contents)
        .with_context(|| format!("parse schedule: {}", path.display()))?;
    Ok(schedule)
}
