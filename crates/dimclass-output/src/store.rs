//! All-or-nothing commit of a run's outputs.
//!
//! Every file is first written to a hidden temp file in the output
//! directory and synced. The temps are then renamed over the previous
//! outputs one by one, keeping a `.bak` copy of each replaced file. If any
//! rename fails, files already swapped are restored from their backups so
//! the directory keeps the previous successful run.
//!
//! Before the first rename a journal (`.commit.pending`) lists every target
//! and whether it had a previous version. The journal is removed once all
//! renames succeed; backups are deleted only after that. A journal found at
//! the start of the next commit means the process died mid-swap, and
//! [`ResultStore::recover`] puts the previous outputs back.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use dimclass_model::{ClassifiedOption, DatasetProfile};

use crate::error::OutputError;
use crate::format::OutputFormat;
use crate::manifest::RunManifest;
use crate::writers::{
    CLASSIFIED_OPTIONS, DATASET_PROFILES, RUN_MANIFEST_FILE, render_manifest, render_options,
    render_profiles,
};

/// Marks a commit whose renames have not all completed.
pub const COMMIT_JOURNAL: &str = ".commit.pending";

/// Files written by a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReport {
    pub classified_options: PathBuf,
    pub dataset_profiles: PathBuf,
    pub manifest: PathBuf,
}

/// Output directory plus the relation format.
#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
    format: OutputFormat,
}

struct StagedFile {
    temp: PathBuf,
    target: PathBuf,
}

struct SwappedFile<'a> {
    staged: &'a StagedFile,
    backup: Option<PathBuf>,
}

impl ResultStore {
    pub fn new(dir: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn options_path(&self) -> PathBuf {
        self.relation_path(CLASSIFIED_OPTIONS)
    }

    pub fn profiles_path(&self) -> PathBuf {
        self.relation_path(DATASET_PROFILES)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(RUN_MANIFEST_FILE)
    }

    pub fn journal_path(&self) -> PathBuf {
        self.dir.join(COMMIT_JOURNAL)
    }

    fn relation_path(&self, stem: &str) -> PathBuf {
        self.dir
            .join(format!("{stem}.{}", self.format.extension()))
    }

    /// Writes both relations and the manifest, replacing previous outputs.
    ///
    /// On error the previous outputs are left in place.
    pub fn commit(
        &self,
        options: &[ClassifiedOption],
        profiles: &[DatasetProfile],
        manifest: &RunManifest,
    ) -> Result<CommitReport, OutputError> {
        let report = CommitReport {
            classified_options: self.options_path(),
            dataset_profiles: self.profiles_path(),
            manifest: self.manifest_path(),
        };

        let mut manifest = manifest.clone();
        manifest.format = self.format;
        manifest.files = [&report.classified_options, &report.dataset_profiles]
            .iter()
            .filter_map(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect();

        // Render everything before touching the filesystem.
        let contents = [
            (&report.classified_options, render_options(options, self.format)?),
            (&report.dataset_profiles, render_profiles(profiles, self.format)?),
            (&report.manifest, render_manifest(&manifest)?),
        ];

        fs::create_dir_all(&self.dir)
            .map_err(|e| OutputError::io("create directory", &self.dir, e))?;
        self.recover()?;

        let mut staged: Vec<StagedFile> = Vec::with_capacity(contents.len());
        for (target, bytes) in &contents {
            match write_temp(target, bytes) {
                Ok(temp) => staged.push(StagedFile {
                    temp,
                    target: (*target).clone(),
                }),
                Err(e) => {
                    discard_temps(&staged);
                    return Err(e);
                }
            }
        }

        if let Err(e) = self.begin_journal(&staged) {
            discard_temps(&staged);
            return Err(e);
        }
        swap_all(&staged, &self.journal_path())?;
        tracing::info!(
            dir = %self.dir.display(),
            format = %self.format,
            options = options.len(),
            profiles = profiles.len(),
            "outputs committed"
        );
        Ok(report)
    }

    /// Restores the previous outputs if a commit was interrupted mid-swap.
    ///
    /// Returns `true` when a journal was found and rolled back.
    pub fn recover(&self) -> Result<bool, OutputError> {
        let journal = self.journal_path();
        let text = match fs::read_to_string(&journal) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(OutputError::io("read", &journal, e)),
        };
        let entries = parse_journal(&text).map_err(|line| OutputError::CorruptJournal {
            path: journal.clone(),
            line,
        })?;

        for (name, had_previous) in entries {
            let target = self.dir.join(name);
            let backup = backup_path(&target);
            if had_previous {
                if backup.exists() {
                    fs::rename(&backup, &target)
                        .map_err(|e| OutputError::io("restore", &target, e))?;
                }
            } else if target.exists() {
                fs::remove_file(&target).map_err(|e| OutputError::io("remove", &target, e))?;
            }
            let temp = temp_path(&target);
            if temp.exists() {
                fs::remove_file(&temp).map_err(|e| OutputError::io("remove", &temp, e))?;
            }
        }
        fs::remove_file(&journal).map_err(|e| OutputError::io("remove", &journal, e))?;
        tracing::warn!(dir = %self.dir.display(), "interrupted commit rolled back");
        Ok(true)
    }

    /// Clears stale backups, then records the targets about to be replaced.
    fn begin_journal(&self, staged: &[StagedFile]) -> Result<(), OutputError> {
        let mut text = String::new();
        for file in staged {
            let backup = backup_path(&file.target);
            if backup.is_file() {
                fs::remove_file(&backup).map_err(|e| OutputError::io("remove", &backup, e))?;
            }
            let name = file
                .target
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let state = if file.target.exists() { PREVIOUS } else { NEW };
            text.push_str(&format!("{name}\t{state}\n"));
        }
        let journal = self.journal_path();
        let mut out = File::create(&journal).map_err(|e| OutputError::io("create", &journal, e))?;
        out.write_all(text.as_bytes())
            .map_err(|e| OutputError::io("write", &journal, e))?;
        out.sync_all()
            .map_err(|e| OutputError::io("sync", &journal, e))
    }
}

const PREVIOUS: &str = "previous";
const NEW: &str = "new";

/// Journal lines are `<file name>\t<previous|new>`.
fn parse_journal(text: &str) -> Result<Vec<(&str, bool)>, String> {
    text.lines()
        .filter(|line| !line.is_empty())
        .map(|line| match line.split_once('\t') {
            Some((name, PREVIOUS)) if is_plain_name(name) => Ok((name, true)),
            Some((name, NEW)) if is_plain_name(name) => Ok((name, false)),
            _ => Err(line.to_string()),
        })
        .collect()
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && name != ".." && name != "."
}

fn temp_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.tmp"))
}

fn backup_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!("{name}.bak"))
}

fn write_temp(target: &Path, bytes: &[u8]) -> Result<PathBuf, OutputError> {
    let temp = temp_path(target);
    let mut file = File::create(&temp).map_err(|e| OutputError::io("create", &temp, e))?;
    file.write_all(bytes)
        .map_err(|e| OutputError::io("write", &temp, e))?;
    file.sync_all()
        .map_err(|e| OutputError::io("sync", &temp, e))?;
    Ok(temp)
}

fn swap_all(staged: &[StagedFile], journal: &Path) -> Result<(), OutputError> {
    let mut swapped: Vec<SwappedFile<'_>> = Vec::with_capacity(staged.len());
    for file in staged {
        match swap_one(file) {
            Ok(backup) => swapped.push(SwappedFile {
                staged: file,
                backup,
            }),
            Err(source) => {
                tracing::error!(
                    target_path = %file.target.display(),
                    error = %source,
                    "failed to replace output, rolling back"
                );
                if rollback(&swapped) {
                    let _ = fs::remove_file(journal);
                }
                discard_temps(staged);
                return Err(OutputError::AtomicWriteFailed {
                    temp_path: file.temp.clone(),
                    target_path: file.target.clone(),
                    source,
                });
            }
        }
    }
    // Commit point: from here the new outputs stand.
    if let Err(e) = fs::remove_file(journal) {
        tracing::error!(path = %journal.display(), error = %e, "failed to clear journal, rolling back");
        rollback(&swapped);
        let _ = fs::remove_file(journal);
        return Err(OutputError::io("remove", journal, e));
    }
    for file in &swapped {
        if let Some(backup) = &file.backup
            && let Err(e) = fs::remove_file(backup)
        {
            tracing::warn!(path = %backup.display(), error = %e, "failed to remove backup");
        }
    }
    Ok(())
}

/// Moves the current target aside (if any) and renames the temp over it.
fn swap_one(file: &StagedFile) -> std::io::Result<Option<PathBuf>> {
    let backup = if file.target.exists() {
        let backup = backup_path(&file.target);
        if backup.exists() {
            fs::remove_file(&backup)?;
        }
        fs::rename(&file.target, &backup)?;
        Some(backup)
    } else {
        None
    };
    if let Err(e) = fs::rename(&file.temp, &file.target) {
        if let Some(backup) = &backup {
            let _ = fs::rename(backup, &file.target);
        }
        return Err(e);
    }
    Ok(backup)
}

/// Returns `false` if any file could not be restored.
fn rollback(swapped: &[SwappedFile<'_>]) -> bool {
    let mut clean = true;
    for file in swapped.iter().rev() {
        let target = &file.staged.target;
        let restored = match &file.backup {
            Some(backup) => fs::rename(backup, target),
            None => fs::remove_file(target),
        };
        match restored {
            Ok(()) => tracing::debug!(path = %target.display(), "output restored"),
            Err(e) => {
                clean = false;
                tracing::error!(
                    path = %target.display(),
                    error = %e,
                    "rollback failed"
                );
            }
        }
    }
    clean
}

fn discard_temps(staged: &[StagedFile]) {
    for file in staged {
        if file.temp.exists() {
            let _ = fs::remove_file(&file.temp);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_follow_format() {
        let store = ResultStore::new("/out", OutputFormat::Json);
        assert_eq!(store.options_path(), PathBuf::from("/out/classified_options.json"));
        assert_eq!(store.manifest_path(), PathBuf::from("/out/run_manifest.json"));
        assert_eq!(
            temp_path(&store.profiles_path()),
            PathBuf::from("/out/.dataset_profiles.json.tmp")
        );
        assert_eq!(
            backup_path(&store.profiles_path()),
            PathBuf::from("/out/dataset_profiles.json.bak")
        );
    }

    #[test]
    fn test_parse_journal() {
        let entries = parse_journal("a.csv\tprevious\nb.csv\tnew\n").unwrap();
        assert_eq!(entries, vec![("a.csv", true), ("b.csv", false)]);
        assert!(parse_journal("a.csv\tmaybe\n").is_err());
        assert!(parse_journal("../a.csv\tnew\n").is_err());
    }
}
